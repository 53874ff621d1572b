use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};

use crate::app::{App, AppEvent};

const TICK_RATE: Duration = Duration::from_millis(250);

/// Waits up to `timeout` for a key press. Anything else becomes a `Tick`,
/// so the focus timer and the watchdog keep moving while the user is idle.
pub fn poll(timeout: Duration) -> Result<AppEvent> {
    if event::poll(timeout)? {
        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                return Ok(AppEvent::KeyPress(key.code));
            }
        }
    }
    Ok(AppEvent::Tick)
}

/// Runs the main event loop until the app asks to quit.
pub fn run(app: &mut App, terminal: &mut crate::tui::Terminal) -> Result<()> {
    while app.running {
        terminal.draw(|frame| crate::ui::draw(frame, app))?;
        let event = poll(TICK_RATE)?;
        app.update(event);
    }
    log::info!("event loop stopped");
    Ok(())
}
