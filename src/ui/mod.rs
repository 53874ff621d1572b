mod entries;
mod focus;
mod help;
mod helpers;
mod ideas;
mod loops;
mod mode;
mod theme;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
    prelude::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
};

use crate::app::{
    App, AppView, ConfirmPopup, EntryField, IdeaField, LoopField, NewEntryPopup, NewIdeaPopup,
    NewLoopPopup, TABS,
};
use theme::Theme;

use helpers::{centered_rect, field_style, format_countdown};

/// Renders the entire UI for a single frame.
pub fn draw(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let body_text = match app.view {
        AppView::Loops => loops::build_loops_text(app),
        AppView::Entries => entries::build_entries_text(app),
        AppView::Ideas => ideas::build_ideas_text(app),
        AppView::Mode => mode::build_mode_text(app),
        AppView::Focus => focus::build_focus_text(app),
        AppView::Help => help::build_help_text(),
    };

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(3),
        ])
        .split(area);

    let header_lines = vec![Line::from(vec![
        Span::styled(
            "  LoopOS  ",
            Style::default().fg(Color::Black).bg(Theme::primary()),
        ),
        Span::raw(" "),
        Span::styled(
            format!("mode: {}", app.mode.label()),
            Style::default()
                .fg(Theme::mode(app.mode))
                .add_modifier(Modifier::BOLD),
        ),
    ])];
    let header = Paragraph::new(Text::from(header_lines))
        .alignment(Alignment::Left)
        .block(rounded_block());
    frame.render_widget(header, layout[0]);

    let mut body_lines = vec![
        tabs_line(app),
        Line::from(""),
        Line::from(Span::styled(
            format!("  {}", app.view.label()),
            Style::default()
                .fg(Theme::accent())
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];
    if let Some(status) = &app.status {
        body_lines.push(Line::from(Span::styled(
            status.as_str(),
            Style::default().fg(Theme::warn()),
        )));
        body_lines.push(Line::from(""));
    }
    body_lines.extend(body_text.lines);
    body_lines.push(Line::from(""));
    body_lines.push(Line::from(Span::styled(
        "----------------------------------------",
        Style::default().fg(Theme::dim()),
    )));
    body_lines.push(keybinds_line(app));
    let body = Paragraph::new(Text::from(body_lines))
        .style(Style::default().fg(Theme::text()))
        .alignment(Alignment::Left)
        .block(rounded_block());
    frame.render_widget(body, layout[1]);

    let footer = Paragraph::new(Text::from(focus_status_line(app)))
        .alignment(Alignment::Left)
        .block(rounded_block());
    frame.render_widget(footer, layout[2]);

    if let Some(popup) = &app.loop_popup {
        render_loop_popup(frame, popup);
    }
    if let Some(popup) = &app.entry_popup {
        render_entry_popup(frame, popup);
    }
    if let Some(popup) = &app.idea_popup {
        render_idea_popup(frame, popup);
    }
    if let Some(popup) = &app.confirm_popup {
        render_confirm_popup(frame, popup);
    }
    if app.watchdog.overlay_visible() {
        render_idle_overlay(frame, app);
    }
}

fn rounded_block() -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .style(Style::default().fg(Theme::secondary()))
}

fn tabs_line(app: &App) -> Line<'static> {
    let mut spans = vec![Span::raw("  ")];
    for view in TABS {
        let style = if view == app.view {
            Style::default()
                .fg(Color::Black)
                .bg(Theme::highlight())
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Theme::dim())
        };
        spans.push(Span::styled(format!(" {} ", view.label()), style));
        spans.push(Span::raw(" "));
    }
    Line::from(spans)
}

fn focus_status_line(app: &App) -> Line<'_> {
    let (phase, color) = focus::phase_label(app.focus.phase());
    let mut spans = vec![
        Span::styled("Focus ", Style::default().fg(Theme::dim())),
        Span::styled(
            format_countdown(app.focus.remaining_sec()),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!(" {phase}"), Style::default().fg(color)),
    ];
    if let Some(title) = app.focus_loop_title() {
        spans.push(Span::styled(" · ", Style::default().fg(Theme::dim())));
        spans.push(Span::styled(title, Style::default().fg(Theme::text())));
    }
    spans.push(Span::styled(
        format!("   {} open loops", app.loops.open_count()),
        Style::default().fg(Theme::dim()),
    ));
    Line::from(spans)
}

fn keybinds_line(app: &App) -> Line<'static> {
    let hint = if app.has_popup() {
        "Tab: next field  Enter: save  Esc: cancel"
    } else {
        match app.view {
            AppView::Loops => "n: New  space: Close/Reopen  d: Delete  o: Filter  p: Focus  ?: Help",
            AppView::Entries => "n: New entry  C: Clear all  x: Export  ?: Help",
            AppView::Ideas => "n: Park idea  d: Delete  x: Export  ?: Help",
            AppView::Mode => "space: Toggle  o: Operator  v: Overload  ?: Help",
            AppView::Focus => "space: Start/Pause  r: Reset  +/-: Length  a: Loop  n: Notify",
            AppView::Help => "Press ? or Esc to close help",
        }
    };
    Line::from(Span::styled(hint, Style::default().fg(Theme::dim())))
}

fn render_popup(frame: &mut Frame, title: &'static str, lines: Vec<Line<'_>>, height: u16) {
    let area = centered_rect(70, height, frame.area());
    frame.render_widget(Clear, area);
    let popup = Paragraph::new(Text::from(lines))
        .alignment(Alignment::Left)
        .wrap(Wrap { trim: false })
        .block(rounded_block().title(title));
    frame.render_widget(popup, area);
}

fn popup_heading(text: &'static str) -> Line<'static> {
    Line::from(Span::styled(
        text,
        Style::default()
            .fg(Theme::accent())
            .add_modifier(Modifier::BOLD),
    ))
}

fn text_field<'a>(label: &'static str, value: &'a str, active: bool) -> Line<'a> {
    let mut spans = vec![
        Span::styled(label, Style::default().fg(Theme::dim())),
        Span::styled(value, field_style(active)),
    ];
    if active {
        spans.push(Span::styled("_", Style::default().fg(Theme::highlight())));
    }
    Line::from(spans)
}

fn popup_hint(text: &'static str) -> Line<'static> {
    Line::from(Span::styled(text, Style::default().fg(Theme::dim())))
}

fn render_loop_popup(frame: &mut Frame, popup: &NewLoopPopup) {
    let lines = vec![
        popup_heading("Open a loop"),
        Line::from(""),
        text_field("Title: ", &popup.title, popup.field == LoopField::Title),
        text_field(
            "Done when: ",
            &popup.criterion,
            popup.field == LoopField::Criterion,
        ),
        Line::from(""),
        popup_hint("Type to edit. Tab: switch field. Enter: save. Esc: cancel."),
    ];
    render_popup(frame, " New Loop ", lines, 40);
}

fn render_entry_popup(frame: &mut Frame, popup: &NewEntryPopup) {
    let checkbox = if popup.fulfilled { "[x] " } else { "[ ] " };
    let lines = vec![
        popup_heading("Log an entry"),
        Line::from(""),
        text_field("Output: ", &popup.output, popup.field == EntryField::Output),
        Line::from(vec![
            Span::styled("Fulfilled: ", Style::default().fg(Theme::dim())),
            Span::styled(
                checkbox,
                field_style(popup.field == EntryField::Fulfilled),
            ),
        ]),
        Line::from(""),
        popup_hint("Tab: switch field. Space: toggle fulfilled. Enter: save. Esc: cancel."),
    ];
    render_popup(frame, " New Entry ", lines, 40);
}

fn render_idea_popup(frame: &mut Frame, popup: &NewIdeaPopup) {
    let lines = vec![
        popup_heading("Park an idea"),
        Line::from(""),
        text_field("Title: ", &popup.title, popup.field == IdeaField::Title),
        text_field("Notes: ", &popup.notes, popup.field == IdeaField::Notes),
        Line::from(""),
        popup_hint("Type to edit. Tab: switch field. Enter: save. Esc: cancel."),
    ];
    render_popup(frame, " New Idea ", lines, 40);
}

fn render_confirm_popup(frame: &mut Frame, popup: &ConfirmPopup) {
    let lines = vec![
        popup_heading("Confirm Action"),
        Line::from(""),
        Line::from(Span::styled(
            popup.message.as_str(),
            Style::default().fg(Theme::text()),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("Press ", Style::default().fg(Theme::dim())),
            Span::styled(
                "Y",
                Style::default()
                    .fg(Theme::highlight())
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(" to confirm or ", Style::default().fg(Theme::dim())),
            Span::styled(
                "N",
                Style::default()
                    .fg(Theme::highlight())
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(" to cancel", Style::default().fg(Theme::dim())),
        ]),
    ];
    render_popup(frame, " Confirm ", lines, 30);
}

fn render_idle_overlay(frame: &mut Frame, app: &App) {
    let suggestion = match app.focus_loop_title() {
        Some(title) => format!("Start a focus block on '{title}'."),
        None if app.loops.open_count() > 0 => {
            format!("{} loops are open. Close one.", app.loops.open_count())
        }
        None => "Park an idea or log what you just finished.".to_string(),
    };
    let lines = vec![
        popup_heading("Still there?"),
        Line::from(""),
        Line::from(Span::styled(
            "Nothing has happened for a while.",
            Style::default().fg(Theme::text()),
        )),
        Line::from(Span::styled(suggestion, Style::default().fg(Theme::warn()))),
        Line::from(""),
        popup_hint("Press any key to continue."),
    ];
    render_popup(frame, " Idle ", lines, 35);
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use chrono::{Duration, Local};
    use crossterm::event::KeyCode;
    use ratatui::{Terminal, backend::TestBackend};

    use super::*;
    use crate::app::AppEvent;
    use crate::focus::{Alerts, testing::RecordingSink};
    use crate::store::Store;

    fn render(app: &App) -> String {
        let backend = TestBackend::new(100, 40);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|frame| draw(frame, app)).unwrap();
        let buf = terminal.backend().buffer().clone();
        let width = buf.area.width as usize;
        buf.content
            .chunks(width)
            .map(|row| {
                let line: String = row.iter().map(|cell| cell.symbol()).collect();
                line.trim_end().to_string()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn test_app() -> App {
        let alerts = Alerts::new(Box::new(RecordingSink::default()));
        App::new(
            Store::open_in_memory().unwrap(),
            PathBuf::from("."),
            alerts,
            Local::now(),
        )
    }

    #[test]
    fn renders_loops_with_focus_footer() {
        let mut app = test_app();
        let now = Local::now();
        app.loops.create("Ship report", "sent to Anna", now, &app.store);
        let screen = render(&app);
        assert!(screen.contains("Ship report"));
        assert!(screen.contains("done when: sent to Anna"));
        assert!(screen.contains("Focus 25:00 ready"));
        assert!(screen.contains("1 open loops"));
    }

    #[test]
    fn renders_focus_view_countdown() {
        let mut app = test_app();
        let now = Local::now();
        app.update_at(AppEvent::KeyPress(KeyCode::Char('f')), now);
        app.update_at(AppEvent::KeyPress(KeyCode::Char(' ')), now);
        app.update_at(AppEvent::Tick, now + Duration::seconds(61));
        let screen = render(&app);
        assert!(screen.contains("23:59"));
        assert!(screen.contains("running"));
        assert!(screen.contains("Notifications: unavailable"));
    }

    #[test]
    fn renders_idle_overlay() {
        let mut app = test_app();
        app.update_at(AppEvent::Tick, Local::now() + Duration::seconds(91));
        let screen = render(&app);
        assert!(screen.contains("Still there?"));
    }
}
