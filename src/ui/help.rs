use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span, Text},
};

use super::theme::Theme;

type Binding = (&'static str, &'static str);

const KEY_COLUMN: usize = 14;

const SECTIONS: &[(&str, &[Binding])] = &[
    (
        "Global",
        &[
            ("q", "Quit"),
            ("?", "Toggle help"),
            ("l e i m f", "Loops, Entries, Ideas, Mode, Focus"),
            ("Left/Right", "Switch tabs (Tab also moves right)"),
            ("Up/Down", "Move selection"),
            ("x", "Export entries and ideas to a text file"),
            ("Esc", "Clear status, close help"),
        ],
    ),
    (
        "Loops",
        &[
            ("n", "Open a new loop"),
            ("space/Enter", "Close or reopen"),
            ("d", "Delete"),
            ("o", "Show open only / all"),
            ("p", "Make it the focus loop"),
        ],
    ),
    (
        "Entries & Ideas",
        &[
            ("n", "Log an entry / park an idea"),
            ("C", "Clear all entries"),
            ("d", "Delete idea"),
        ],
    ),
    (
        "Mode",
        &[("space", "Toggle"), ("o", "Operator"), ("v", "Overload")],
    ),
    (
        "Focus",
        &[
            ("space", "Start or pause"),
            ("r", "Reset"),
            ("+/-", "Block length, 5 to 120 min"),
            ("a", "Cycle focus loop"),
            ("n", "Desktop notifications on/off"),
        ],
    ),
    (
        "Popups",
        &[
            ("Tab", "Switch field"),
            ("Enter/Esc", "Save / cancel"),
            ("y/n", "Confirm / keep"),
        ],
    ),
];

pub fn build_help_text() -> Text<'static> {
    let mut lines = vec![
        Line::from(Span::styled(
            "Key bindings",
            Style::default()
                .fg(Theme::accent())
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];

    for (index, (title, bindings)) in SECTIONS.iter().enumerate() {
        if index > 0 {
            lines.push(Line::from(""));
        }
        lines.push(Line::from(Span::styled(
            format!("  {title}"),
            Style::default()
                .fg(Theme::secondary())
                .add_modifier(Modifier::BOLD),
        )));
        lines.extend(bindings.iter().map(|&(key, action)| binding_line(key, action)));
    }

    Text::from(lines)
}

fn binding_line(key: &'static str, action: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            format!("    {key:<KEY_COLUMN$}"),
            Style::default().fg(Theme::highlight()),
        ),
        Span::styled(action, Style::default().fg(Theme::text())),
    ])
}
