use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span, Text},
};

use super::theme::Theme;
use crate::app::App;
use crate::types::Mode;

pub fn build_mode_text(app: &App) -> Text<'_> {
    let mut lines = Vec::new();

    let mut switch = vec![Span::styled("Mode: ", Style::default().fg(Theme::dim()))];
    for mode in [Mode::Operator, Mode::Overload] {
        let style = if mode == app.mode {
            Style::default()
                .fg(Theme::mode(mode))
                .add_modifier(Modifier::BOLD | Modifier::REVERSED)
        } else {
            Style::default().fg(Theme::dim())
        };
        switch.push(Span::styled(format!(" {} ", mode.label()), style));
        switch.push(Span::raw(" "));
    }
    lines.push(Line::from(switch));
    lines.push(Line::from(""));

    for tip in app.mode.guidance() {
        lines.push(Line::from(vec![
            Span::styled("  • ", Style::default().fg(Theme::dim())),
            Span::styled(*tip, Style::default().fg(Theme::text())),
        ]));
    }

    Text::from(lines)
}
