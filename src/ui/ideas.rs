use ratatui::{
    style::Style,
    text::{Line, Span, Text},
};

use super::helpers::{clamp_name, row_style, selection_marker};
use super::theme::Theme;
use crate::app::App;

const NOTES_PREVIEW_WIDTH: usize = 60;

pub fn build_ideas_text(app: &App) -> Text<'_> {
    let mut lines = Vec::new();

    if app.ideas.is_empty() {
        lines.push(Line::from(Span::styled(
            "No parked ideas. Press 'n' to park one.",
            Style::default().fg(Theme::dim()),
        )));
        return Text::from(lines);
    }

    for (index, idea) in app.ideas.list().iter().enumerate() {
        let selected = index == app.selected_idea_index;
        lines.push(Line::from(vec![
            selection_marker(selected),
            Span::styled(idea.title.as_str(), row_style(selected)),
            Span::styled(
                format!("  {}", idea.created_at.format("%Y-%m-%d")),
                Style::default().fg(Theme::dim()),
            ),
        ]));
        if let Some(first) = idea.notes.lines().find(|line| !line.trim().is_empty()) {
            lines.push(Line::from(Span::styled(
                format!("    {}", clamp_name(first.trim(), NOTES_PREVIEW_WIDTH)),
                Style::default().fg(Theme::dim()),
            )));
        }
    }

    Text::from(lines)
}
