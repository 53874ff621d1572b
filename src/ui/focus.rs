use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span, Text},
};

use super::helpers::format_countdown;
use super::theme::Theme;
use crate::app::App;
use crate::focus::FocusPhase;

pub fn build_focus_text(app: &App) -> Text<'_> {
    let mut lines = Vec::new();
    let focus = &app.focus;

    let (phase, color) = phase_label(focus.phase());
    lines.push(Line::from(vec![
        Span::styled(
            format!("  {}  ", format_countdown(focus.remaining_sec())),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ),
        Span::styled(phase, Style::default().fg(color)),
    ]));
    lines.push(Line::from(""));

    lines.push(Line::from(vec![
        Span::styled("Block length:  ", Style::default().fg(Theme::dim())),
        Span::styled(
            format!("{} min", focus.minutes()),
            Style::default().fg(Theme::accent()),
        ),
    ]));
    lines.push(Line::from(vec![
        Span::styled("Focus loop:    ", Style::default().fg(Theme::dim())),
        Span::styled(
            app.focus_loop_title().unwrap_or("none"),
            Style::default().fg(Theme::text()),
        ),
    ]));
    lines.push(Line::from(vec![
        Span::styled("Notifications: ", Style::default().fg(Theme::dim())),
        Span::styled(
            notifications_label(app),
            Style::default().fg(Theme::text()),
        ),
    ]));

    Text::from(lines)
}

pub fn phase_label(phase: FocusPhase) -> (&'static str, ratatui::style::Color) {
    match phase {
        FocusPhase::Idle => ("ready", Theme::dim()),
        FocusPhase::Paused => ("paused", Theme::warn()),
        FocusPhase::Running => ("running", Theme::active()),
        FocusPhase::Expired => ("done", Theme::success()),
    }
}

fn notifications_label(app: &App) -> &'static str {
    if !app.alerts.notifications_available() {
        "unavailable"
    } else if app.focus.notifications_enabled() {
        "on"
    } else {
        "off"
    }
}
