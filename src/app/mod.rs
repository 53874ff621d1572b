mod state;

use crossterm::event::KeyCode;

pub use state::{
    App, ConfirmAction, ConfirmPopup, EntryField, IdeaField, LoopField, NewEntryPopup,
    NewIdeaPopup, NewLoopPopup,
};

/// Possible input events the app reacts to.
pub enum AppEvent {
    Tick,
    KeyPress(KeyCode),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppView {
    Loops,
    Entries,
    Ideas,
    Mode,
    Focus,
    Help,
}

pub const TABS: [AppView; 6] = [
    AppView::Loops,
    AppView::Entries,
    AppView::Ideas,
    AppView::Mode,
    AppView::Focus,
    AppView::Help,
];

impl AppView {
    pub fn label(self) -> &'static str {
        match self {
            AppView::Loops => "Loops",
            AppView::Entries => "Entries",
            AppView::Ideas => "Ideas",
            AppView::Mode => "Mode",
            AppView::Focus => "Focus",
            AppView::Help => "Help",
        }
    }
}
