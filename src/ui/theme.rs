use ratatui::style::Color;

use crate::types::Mode;

/// Colors shared by every view.
pub struct Theme;

impl Theme {
    /// Header badge
    pub fn primary() -> Color {
        Color::LightMagenta
    }

    /// Borders and section titles
    pub fn secondary() -> Color {
        Color::Cyan
    }

    pub fn success() -> Color {
        Color::Green
    }

    /// Running focus block
    pub fn active() -> Color {
        Color::LightGreen
    }

    pub fn warn() -> Color {
        Color::Yellow
    }

    pub fn highlight() -> Color {
        Color::LightCyan
    }

    pub fn selection_marker() -> Color {
        Color::Green
    }

    pub fn dim() -> Color {
        Color::DarkGray
    }

    pub fn text() -> Color {
        Color::White
    }

    /// Counts and headings
    pub fn accent() -> Color {
        Color::LightBlue
    }

    /// Operator is calm, overload is a warning.
    pub fn mode(mode: Mode) -> Color {
        match mode {
            Mode::Operator => Self::success(),
            Mode::Overload => Self::warn(),
        }
    }
}
