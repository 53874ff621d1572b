use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span, Text},
};

use super::helpers::{row_style, selection_marker};
use super::theme::Theme;
use crate::app::App;

pub fn build_entries_text(app: &App) -> Text<'_> {
    let mut lines = Vec::new();

    lines.push(Line::from(vec![
        Span::styled(
            format!("{} entries", app.entries.len()),
            Style::default()
                .fg(Theme::accent())
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" · {} fulfilled", app.entries.fulfilled_count()),
            Style::default().fg(Theme::dim()),
        ),
    ]));
    lines.push(Line::from(""));

    if app.entries.is_empty() {
        lines.push(Line::from(Span::styled(
            "Nothing logged yet. Press 'n' when you finish something.",
            Style::default().fg(Theme::dim()),
        )));
        return Text::from(lines);
    }

    for (index, entry) in app.entries.list().iter().enumerate() {
        let selected = index == app.selected_entry_index;
        let (mark, color) = if entry.fulfilled {
            ("✓ ", Theme::success())
        } else {
            ("✗ ", Theme::warn())
        };
        lines.push(Line::from(vec![
            selection_marker(selected),
            Span::styled(
                format!("{} ", entry.date.format("%Y-%m-%d")),
                Style::default().fg(Theme::dim()),
            ),
            Span::styled(mark, Style::default().fg(color)),
            Span::styled(entry.output.as_str(), row_style(selected)),
        ]));
    }

    Text::from(lines)
}
