use std::path::PathBuf;

use chrono::{DateTime, Local};
use crossterm::event::KeyCode;

use crate::domain::{Entries, Ideas, Loops, load_mode, save_mode};
use crate::export;
use crate::focus::{Alerts, Completion, EpochMs, FocusTimer, InactivityWatchdog};
use crate::store::Store;
use crate::types::{IdeaId, Loop, LoopId, Mode};

use super::{AppEvent, AppView, TABS};

const MINUTES_STEP: u32 = 5;

/// The top-level application state.
pub struct App {
    pub running: bool,
    pub store: Store,
    pub data_dir: PathBuf,
    pub loops: Loops,
    pub entries: Entries,
    pub ideas: Ideas,
    pub mode: Mode,
    pub focus: FocusTimer,
    pub watchdog: InactivityWatchdog,
    pub alerts: Alerts,
    pub view: AppView,
    help_parent: AppView,
    pub show_only_open: bool,
    pub selected_loop_index: usize,
    pub selected_entry_index: usize,
    pub selected_idea_index: usize,
    pub status: Option<String>,
    pub loop_popup: Option<NewLoopPopup>,
    pub entry_popup: Option<NewEntryPopup>,
    pub idea_popup: Option<NewIdeaPopup>,
    pub confirm_popup: Option<ConfirmPopup>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopField {
    Title,
    Criterion,
}

#[derive(Clone, Debug)]
pub struct NewLoopPopup {
    pub title: String,
    pub criterion: String,
    pub field: LoopField,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntryField {
    Output,
    Fulfilled,
}

#[derive(Clone, Debug)]
pub struct NewEntryPopup {
    pub output: String,
    pub fulfilled: bool,
    pub field: EntryField,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IdeaField {
    Title,
    Notes,
}

#[derive(Clone, Debug)]
pub struct NewIdeaPopup {
    pub title: String,
    pub notes: String,
    pub field: IdeaField,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfirmAction {
    DeleteLoop(LoopId),
    DeleteIdea(IdeaId),
    ClearEntries,
}

#[derive(Clone, Debug)]
pub struct ConfirmPopup {
    pub message: String,
    pub action: ConfirmAction,
}

impl App {
    /// Loads every record and reconciles a focus block left running.
    pub fn new(store: Store, data_dir: PathBuf, alerts: Alerts, now: DateTime<Local>) -> Self {
        let now_ms = now.timestamp_millis();
        let loops = Loops::load(&store);
        let entries = Entries::load(&store);
        let ideas = Ideas::load(&store);
        let mode = load_mode(&store);
        let focus = FocusTimer::load(&store);

        let mut app = Self {
            running: true,
            store,
            data_dir,
            loops,
            entries,
            ideas,
            mode,
            focus,
            watchdog: InactivityWatchdog::new(now_ms),
            alerts,
            view: AppView::Loops,
            help_parent: AppView::Loops,
            show_only_open: true,
            selected_loop_index: 0,
            selected_entry_index: 0,
            selected_idea_index: 0,
            status: None,
            loop_popup: None,
            entry_popup: None,
            idea_popup: None,
            confirm_popup: None,
        };

        app.alerts.init_title();
        app.focus.sync_loop(&app.loops, &app.store);
        if let Some(completion) = app.focus.restore_on_resume(now_ms, &app.store) {
            app.on_focus_completed(completion, now_ms);
        }
        app
    }

    /// Central update function - process an event and mutate state.
    pub fn update(&mut self, event: AppEvent) {
        self.update_at(event, Local::now());
    }

    pub fn update_at(&mut self, event: AppEvent, now: DateTime<Local>) {
        let now_ms = now.timestamp_millis();
        match event {
            AppEvent::Tick => {}
            AppEvent::KeyPress(key) => {
                let dismissed_overlay = self.watchdog.overlay_visible();
                self.watchdog.activity(now_ms);
                if !dismissed_overlay {
                    self.handle_key(key, now);
                }
            }
        }

        if let Some(completion) = self.focus.poll(now_ms, &self.store) {
            self.on_focus_completed(completion, now_ms);
        }
        self.watchdog.poll(now_ms, self.focus.is_running());
        self.alerts.poll(now_ms);
    }

    fn handle_key(&mut self, key: KeyCode, now: DateTime<Local>) {
        if self.confirm_popup.is_some() {
            self.handle_confirm_key(key);
            return;
        }
        if self.loop_popup.is_some() {
            self.handle_loop_popup_key(key, now);
            return;
        }
        if self.entry_popup.is_some() {
            self.handle_entry_popup_key(key, now);
            return;
        }
        if self.idea_popup.is_some() {
            self.handle_idea_popup_key(key, now);
            return;
        }

        match key {
            KeyCode::Char('q') => self.running = false,
            KeyCode::Char('l') => self.navigate_to(AppView::Loops),
            KeyCode::Char('e') => self.navigate_to(AppView::Entries),
            KeyCode::Char('i') => self.navigate_to(AppView::Ideas),
            KeyCode::Char('m') => self.navigate_to(AppView::Mode),
            KeyCode::Char('f') => self.navigate_to(AppView::Focus),
            KeyCode::Char('?') => {
                if self.view == AppView::Help {
                    self.navigate_to(self.help_parent);
                } else {
                    self.navigate_to(AppView::Help);
                }
            }
            KeyCode::Char('x') => self.export(now),
            KeyCode::Left => self.navigate_tab_left(),
            KeyCode::Right | KeyCode::Tab => self.navigate_tab_right(),
            KeyCode::Up => self.move_selection_up(),
            KeyCode::Down => self.move_selection_down(),
            KeyCode::Esc => {
                if self.view == AppView::Help {
                    self.navigate_to(self.help_parent);
                }
                self.clear_status();
            }
            _ => match self.view {
                AppView::Loops => self.handle_loops_key(key, now),
                AppView::Entries => self.handle_entries_key(key),
                AppView::Ideas => self.handle_ideas_key(key),
                AppView::Mode => self.handle_mode_key(key),
                AppView::Focus => self.handle_focus_key(key, now.timestamp_millis()),
                AppView::Help => {}
            },
        }
    }

    fn handle_loops_key(&mut self, key: KeyCode, now: DateTime<Local>) {
        match key {
            KeyCode::Char('n') => {
                self.loop_popup = Some(NewLoopPopup {
                    title: String::new(),
                    criterion: String::new(),
                    field: LoopField::Title,
                });
            }
            KeyCode::Char(' ') | KeyCode::Enter => self.toggle_selected_loop(now),
            KeyCode::Char('d') => {
                if let Some(item) = self.selected_loop() {
                    self.confirm_popup = Some(ConfirmPopup {
                        message: format!("Delete loop '{}'?", item.title),
                        action: ConfirmAction::DeleteLoop(item.id.clone()),
                    });
                }
            }
            KeyCode::Char('o') => {
                self.show_only_open = !self.show_only_open;
                self.clamp_selections();
            }
            KeyCode::Char('p') => self.pin_selected_loop(),
            _ => {}
        }
    }

    fn handle_entries_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('n') => {
                self.entry_popup = Some(NewEntryPopup {
                    output: String::new(),
                    fulfilled: true,
                    field: EntryField::Output,
                });
            }
            KeyCode::Char('C') => {
                if !self.entries.is_empty() {
                    self.confirm_popup = Some(ConfirmPopup {
                        message: format!("Clear all {} entries?", self.entries.len()),
                        action: ConfirmAction::ClearEntries,
                    });
                }
            }
            _ => {}
        }
    }

    fn handle_ideas_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('n') => {
                self.idea_popup = Some(NewIdeaPopup {
                    title: String::new(),
                    notes: String::new(),
                    field: IdeaField::Title,
                });
            }
            KeyCode::Char('d') => {
                if let Some(idea) = self.ideas.list().get(self.selected_idea_index) {
                    self.confirm_popup = Some(ConfirmPopup {
                        message: format!("Delete idea '{}'?", idea.title),
                        action: ConfirmAction::DeleteIdea(idea.id.clone()),
                    });
                }
            }
            _ => {}
        }
    }

    fn handle_mode_key(&mut self, key: KeyCode) {
        let mode = match key {
            KeyCode::Char(' ') | KeyCode::Enter => self.mode.toggled(),
            KeyCode::Char('o') => Mode::Operator,
            KeyCode::Char('v') => Mode::Overload,
            _ => return,
        };
        self.set_mode(mode);
    }

    fn handle_focus_key(&mut self, key: KeyCode, now_ms: EpochMs) {
        match key {
            KeyCode::Char(' ') | KeyCode::Enter => self.toggle_focus(now_ms),
            KeyCode::Char('r') => {
                self.focus.reset(now_ms, &self.store);
                self.status = Some("Focus block reset.".to_string());
            }
            KeyCode::Char('+') | KeyCode::Char('=') => {
                let minutes = self.focus.minutes().saturating_add(MINUTES_STEP);
                self.focus.configure(minutes, &self.store);
            }
            KeyCode::Char('-') => {
                let minutes = self.focus.minutes().saturating_sub(MINUTES_STEP);
                self.focus.configure(minutes, &self.store);
            }
            KeyCode::Char('n') => self.toggle_notifications(),
            KeyCode::Char('a') => self.cycle_focus_loop(),
            _ => {}
        }
    }

    fn handle_confirm_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('y') | KeyCode::Char('Y') => {
                if let Some(popup) = self.confirm_popup.take() {
                    self.apply_confirm(popup.action);
                }
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                self.confirm_popup = None;
            }
            _ => {}
        }
    }

    fn handle_loop_popup_key(&mut self, key: KeyCode, now: DateTime<Local>) {
        let Some(popup) = self.loop_popup.as_mut() else {
            return;
        };
        match key {
            KeyCode::Esc => self.loop_popup = None,
            KeyCode::Enter => self.apply_loop_popup(now),
            KeyCode::Tab | KeyCode::Up | KeyCode::Down => {
                popup.field = match popup.field {
                    LoopField::Title => LoopField::Criterion,
                    LoopField::Criterion => LoopField::Title,
                };
            }
            _ => match popup.field {
                LoopField::Title => edit_text(&mut popup.title, key),
                LoopField::Criterion => edit_text(&mut popup.criterion, key),
            },
        }
    }

    fn handle_entry_popup_key(&mut self, key: KeyCode, now: DateTime<Local>) {
        let Some(popup) = self.entry_popup.as_mut() else {
            return;
        };
        match key {
            KeyCode::Esc => self.entry_popup = None,
            KeyCode::Enter => self.apply_entry_popup(now),
            KeyCode::Tab | KeyCode::Up | KeyCode::Down => {
                popup.field = match popup.field {
                    EntryField::Output => EntryField::Fulfilled,
                    EntryField::Fulfilled => EntryField::Output,
                };
            }
            KeyCode::Char(' ') if popup.field == EntryField::Fulfilled => {
                popup.fulfilled = !popup.fulfilled;
            }
            _ => {
                if popup.field == EntryField::Output {
                    edit_text(&mut popup.output, key);
                }
            }
        }
    }

    fn handle_idea_popup_key(&mut self, key: KeyCode, now: DateTime<Local>) {
        let Some(popup) = self.idea_popup.as_mut() else {
            return;
        };
        match key {
            KeyCode::Esc => self.idea_popup = None,
            KeyCode::Enter => self.apply_idea_popup(now),
            KeyCode::Tab | KeyCode::Up | KeyCode::Down => {
                popup.field = match popup.field {
                    IdeaField::Title => IdeaField::Notes,
                    IdeaField::Notes => IdeaField::Title,
                };
            }
            _ => match popup.field {
                IdeaField::Title => edit_text(&mut popup.title, key),
                IdeaField::Notes => edit_text(&mut popup.notes, key),
            },
        }
    }

    // Blank required fields keep the popup open without complaint.
    fn apply_loop_popup(&mut self, now: DateTime<Local>) {
        let Some(popup) = self.loop_popup.take() else {
            return;
        };
        if self
            .loops
            .create(&popup.title, &popup.criterion, now, &self.store)
            .is_none()
        {
            self.loop_popup = Some(popup);
            return;
        }
        self.selected_loop_index = 0;
        self.status = Some("Loop opened.".to_string());
    }

    fn apply_entry_popup(&mut self, now: DateTime<Local>) {
        let Some(popup) = self.entry_popup.take() else {
            return;
        };
        if self
            .entries
            .create(&popup.output, popup.fulfilled, None, now, &self.store)
            .is_none()
        {
            self.entry_popup = Some(popup);
            return;
        }
        self.selected_entry_index = 0;
        self.status = Some("Entry logged.".to_string());
    }

    fn apply_idea_popup(&mut self, now: DateTime<Local>) {
        let Some(popup) = self.idea_popup.take() else {
            return;
        };
        if self
            .ideas
            .create(&popup.title, &popup.notes, now, &self.store)
            .is_none()
        {
            self.idea_popup = Some(popup);
            return;
        }
        self.selected_idea_index = 0;
        self.status = Some("Idea parked.".to_string());
    }

    fn apply_confirm(&mut self, action: ConfirmAction) {
        match action {
            ConfirmAction::DeleteLoop(id) => {
                if self.loops.delete(&id, &self.store) {
                    self.status = Some("Loop deleted.".to_string());
                }
                self.focus.sync_loop(&self.loops, &self.store);
            }
            ConfirmAction::DeleteIdea(id) => {
                if self.ideas.delete(&id, &self.store) {
                    self.status = Some("Idea deleted.".to_string());
                }
            }
            ConfirmAction::ClearEntries => {
                self.entries.clear(&self.store);
                self.status = Some("Entries cleared.".to_string());
            }
        }
        self.clamp_selections();
    }

    fn toggle_selected_loop(&mut self, now: DateTime<Local>) {
        let Some(item) = self.selected_loop() else {
            return;
        };
        let id = item.id.clone();
        if item.is_open() {
            self.loops.complete(&id, now, &self.store);
            self.status = Some("Loop closed.".to_string());
        } else {
            self.loops.reopen(&id, &self.store);
            self.status = Some("Loop reopened.".to_string());
        }
        self.focus.sync_loop(&self.loops, &self.store);
        self.clamp_selections();
    }

    fn pin_selected_loop(&mut self) {
        let Some(id) = self.selected_loop().map(|item| item.id.clone()) else {
            return;
        };
        if self.focus.select_loop(Some(id), &self.loops, &self.store) {
            self.status = Some("Loop set as focus target.".to_string());
        } else {
            self.status = Some("Only open loops can be focused.".to_string());
        }
    }

    fn cycle_focus_loop(&mut self) {
        let open: Vec<LoopId> = self
            .loops
            .visible(true)
            .into_iter()
            .map(|item| item.id.clone())
            .collect();
        let next = match self.focus.loop_id() {
            None => open.first().cloned(),
            Some(current) => open
                .iter()
                .position(|id| id == current)
                .and_then(|index| open.get(index + 1))
                .cloned(),
        };
        self.focus.select_loop(next, &self.loops, &self.store);
    }

    fn toggle_focus(&mut self, now_ms: EpochMs) {
        if self.focus.is_running() {
            if let Some(completion) = self.focus.pause(now_ms, &self.store) {
                self.on_focus_completed(completion, now_ms);
            }
        } else {
            self.focus.start(now_ms, &self.store);
            self.watchdog.focus_started();
        }
    }

    fn toggle_notifications(&mut self) {
        if self.focus.notifications_enabled() {
            self.focus.set_notifications(false, &self.store);
            return;
        }
        if !self.alerts.notifications_available() {
            self.status = Some("Desktop notifications are not available here.".to_string());
            return;
        }
        self.focus.set_notifications(true, &self.store);
    }

    fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
        save_mode(mode, &self.store);
    }

    fn on_focus_completed(&mut self, completion: Completion, now_ms: EpochMs) {
        self.alerts
            .focus_completed(self.focus.notifications_enabled(), now_ms);
        let target = completion
            .loop_id
            .as_deref()
            .and_then(|id| self.loops.get(id))
            .map(|item| format!(" on '{}'", item.title))
            .unwrap_or_default();
        self.status = Some(format!("Focus block finished{target}."));
    }

    fn export(&mut self, now: DateTime<Local>) {
        let text = export::render_export(self.entries.list(), self.ideas.list(), now);
        let path = export::default_export_path(&self.data_dir, now);
        match export::write_export(&path, &text) {
            Ok(()) => self.status = Some(format!("Exported to {}", path.display())),
            Err(err) => {
                log::warn!("export to {} failed: {err}", path.display());
                self.status = Some(format!("Export failed: {err}"));
            }
        }
    }

    fn navigate_to(&mut self, view: AppView) {
        if view == AppView::Help && self.view != AppView::Help {
            self.help_parent = self.view;
        }
        self.view = view;
        self.clamp_selections();
    }

    fn navigate_tab_left(&mut self) {
        let index = self.tab_index();
        let target = if index == 0 { TABS.len() - 1 } else { index - 1 };
        self.navigate_to(TABS[target]);
    }

    fn navigate_tab_right(&mut self) {
        let target = (self.tab_index() + 1) % TABS.len();
        self.navigate_to(TABS[target]);
    }

    pub fn tab_index(&self) -> usize {
        TABS.iter().position(|view| *view == self.view).unwrap_or(0)
    }

    fn move_selection_up(&mut self) {
        let len = self.current_list_len();
        let Some(index) = self.current_selection_mut() else {
            return;
        };
        if len == 0 {
            return;
        }
        *index = if *index == 0 { len - 1 } else { *index - 1 };
    }

    fn move_selection_down(&mut self) {
        let len = self.current_list_len();
        let Some(index) = self.current_selection_mut() else {
            return;
        };
        if len == 0 {
            return;
        }
        *index = (*index + 1) % len;
    }

    fn current_list_len(&self) -> usize {
        match self.view {
            AppView::Loops => self.visible_loops().len(),
            AppView::Entries => self.entries.len(),
            AppView::Ideas => self.ideas.len(),
            _ => 0,
        }
    }

    fn current_selection_mut(&mut self) -> Option<&mut usize> {
        match self.view {
            AppView::Loops => Some(&mut self.selected_loop_index),
            AppView::Entries => Some(&mut self.selected_entry_index),
            AppView::Ideas => Some(&mut self.selected_idea_index),
            _ => None,
        }
    }

    fn clamp_selections(&mut self) {
        let loops = self.visible_loops().len();
        self.selected_loop_index = self.selected_loop_index.min(loops.saturating_sub(1));
        self.selected_entry_index = self
            .selected_entry_index
            .min(self.entries.len().saturating_sub(1));
        self.selected_idea_index = self
            .selected_idea_index
            .min(self.ideas.len().saturating_sub(1));
    }

    fn clear_status(&mut self) {
        self.status = None;
    }

    pub fn visible_loops(&self) -> Vec<&Loop> {
        self.loops.visible(self.show_only_open)
    }

    pub fn selected_loop(&self) -> Option<&Loop> {
        self.visible_loops()
            .get(self.selected_loop_index)
            .copied()
    }

    /// Title of the loop the focus block is attached to.
    pub fn focus_loop_title(&self) -> Option<&str> {
        self.focus
            .loop_id()
            .and_then(|id| self.loops.get(id))
            .map(|item| item.title.as_str())
    }

    pub fn has_popup(&self) -> bool {
        self.loop_popup.is_some()
            || self.entry_popup.is_some()
            || self.idea_popup.is_some()
            || self.confirm_popup.is_some()
    }
}

fn edit_text(text: &mut String, key: KeyCode) {
    match key {
        KeyCode::Backspace | KeyCode::Delete => {
            text.pop();
        }
        KeyCode::Char(ch) => {
            if !ch.is_control() {
                text.push(ch);
            }
        }
        _ => {}
    }
}
