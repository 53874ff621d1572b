use chrono::{DateTime, Local};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::Span,
};

use super::theme::Theme;

/// `mm:ss`, or `h:mm:ss` for blocks of an hour or more.
pub fn format_countdown(total_seconds: i64) -> String {
    let total_seconds = total_seconds.max(0);
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    if hours > 0 {
        format!("{hours}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes:02}:{seconds:02}")
    }
}

pub fn format_timestamp(value: &DateTime<Local>) -> String {
    value.format("%Y-%m-%d %H:%M").to_string()
}

pub fn clamp_name(value: &str, width: usize) -> String {
    let value_len = value.chars().count();
    if value_len <= width {
        return value.to_string();
    }
    let trimmed = value
        .chars()
        .take(width.saturating_sub(2))
        .collect::<String>();
    format!("{trimmed}..")
}

pub fn selection_marker(selected: bool) -> Span<'static> {
    if selected {
        Span::styled("> ", Style::default().fg(Theme::selection_marker()))
    } else {
        Span::styled("  ", Style::default().fg(Theme::dim()))
    }
}

pub fn row_style(selected: bool) -> Style {
    if selected {
        Style::default()
            .fg(Theme::highlight())
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Theme::text())
    }
}

pub fn field_style(active: bool) -> Style {
    if active {
        Style::default()
            .fg(Theme::highlight())
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Theme::text())
    }
}

pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn countdown_formats() {
        assert_eq!(format_countdown(1500), "25:00");
        assert_eq!(format_countdown(61), "01:01");
        assert_eq!(format_countdown(7200), "2:00:00");
        assert_eq!(format_countdown(-3), "00:00");
    }

    #[test]
    fn clamp_name_truncates() {
        assert_eq!(clamp_name("short", 10), "short");
        assert_eq!(clamp_name("a very long loop title", 8), "a very..");
    }
}
