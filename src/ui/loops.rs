use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span, Text},
};

use super::helpers::{format_timestamp, row_style, selection_marker};
use super::theme::Theme;
use crate::app::App;

pub fn build_loops_text(app: &App) -> Text<'_> {
    let mut lines = Vec::new();

    let filter = if app.show_only_open {
        "open only"
    } else {
        "all"
    };
    lines.push(Line::from(vec![
        Span::styled(
            format!("{} open", app.loops.open_count()),
            Style::default()
                .fg(Theme::accent())
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" / {} total · showing {filter}", app.loops.len()),
            Style::default().fg(Theme::dim()),
        ),
    ]));
    lines.push(Line::from(""));

    let visible = app.visible_loops();
    if visible.is_empty() {
        lines.push(Line::from(Span::styled(
            "No loops in this view. Press 'n' to open one.",
            Style::default().fg(Theme::dim()),
        )));
        return Text::from(lines);
    }

    for (index, item) in visible.into_iter().enumerate() {
        let selected = index == app.selected_loop_index;
        let (mark, mark_color) = if item.is_open() {
            ("[ ] ", Theme::warn())
        } else {
            ("[x] ", Theme::success())
        };
        let mut spans = vec![
            selection_marker(selected),
            Span::styled(mark, Style::default().fg(mark_color)),
            Span::styled(item.title.as_str(), row_style(selected)),
        ];
        if app.focus.loop_id() == Some(item.id.as_str()) {
            spans.push(Span::styled(
                "  ◎ focus",
                Style::default().fg(Theme::active()),
            ));
        }
        lines.push(Line::from(spans));

        let meta = match &item.completed_at {
            Some(completed) => format!("      done {}", format_timestamp(completed)),
            None => format!("      opened {}", format_timestamp(&item.created_at)),
        };
        lines.push(Line::from(Span::styled(
            meta,
            Style::default().fg(Theme::dim()),
        )));
        if !item.criterion.is_empty() {
            lines.push(Line::from(Span::styled(
                format!("      done when: {}", item.criterion),
                Style::default().fg(Theme::text()),
            )));
        }
    }

    Text::from(lines)
}
