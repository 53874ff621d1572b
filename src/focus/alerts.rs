/// Side effects fired when a focus block completes.
use std::io::{self, Write};

use anyhow::Result;
use crossterm::{execute, terminal::SetTitle};
use notify_rust::Notification;

use super::schedule::{Deadline, EpochMs, fire_due};

pub const APP_TITLE: &str = "LoopOS";
pub const FLASH_TITLE: &str = "✔ Focus block done · LoopOS";
pub const TITLE_FLASH_MS: i64 = 10_000;

const NOTIFICATION_TITLE: &str = "Focus block finished";
const NOTIFICATION_BODY: &str = "Log what you got done, then take a short break.";
const NOTIFICATION_ICON: &str = "alarm-clock";

/// Where completion cues end up. Every cue is best effort.
pub trait AlertSink {
    fn bell(&mut self) -> Result<()>;
    fn notify(&mut self, title: &str, body: &str, icon: &str) -> Result<()>;
    fn set_title(&mut self, title: &str) -> Result<()>;
    fn notifications_available(&self) -> bool;
}

/// Terminal bell, desktop notifications and the terminal window title.
pub struct TerminalAlerts {
    notifications_available: bool,
}

impl TerminalAlerts {
    pub fn new() -> Self {
        let notifications_available = if cfg!(target_os = "linux") {
            std::env::var_os("DBUS_SESSION_BUS_ADDRESS").is_some()
        } else {
            cfg!(any(target_os = "macos", target_os = "windows"))
        };
        Self {
            notifications_available,
        }
    }
}

impl AlertSink for TerminalAlerts {
    fn bell(&mut self) -> Result<()> {
        let mut stdout = io::stdout();
        stdout.write_all(b"\x07")?;
        stdout.flush()?;
        Ok(())
    }

    fn notify(&mut self, title: &str, body: &str, icon: &str) -> Result<()> {
        Notification::new()
            .summary(title)
            .body(body)
            .appname("loopos")
            .icon(icon)
            .show()
            .map(|_| ())?;
        Ok(())
    }

    fn set_title(&mut self, title: &str) -> Result<()> {
        execute!(io::stdout(), SetTitle(title))?;
        Ok(())
    }

    fn notifications_available(&self) -> bool {
        self.notifications_available
    }
}

pub struct Alerts {
    sink: Box<dyn AlertSink>,
    title_revert: Option<Deadline>,
}

impl Alerts {
    pub fn new(sink: Box<dyn AlertSink>) -> Self {
        Self {
            sink,
            title_revert: None,
        }
    }

    pub fn notifications_available(&self) -> bool {
        self.sink.notifications_available()
    }

    #[cfg(test)]
    pub fn title_flashing(&self) -> bool {
        self.title_revert.is_some()
    }

    /// Sets the window title at startup.
    pub fn init_title(&mut self) {
        if let Err(err) = self.sink.set_title(APP_TITLE) {
            log::debug!("could not set terminal title: {err}");
        }
    }

    /// Plays the bell, optionally notifies, and flashes the title.
    pub fn focus_completed(&mut self, notifications_enabled: bool, now: EpochMs) {
        if let Err(err) = self.sink.bell() {
            log::warn!("focus bell failed: {err}");
        }
        if notifications_enabled && self.sink.notifications_available() {
            if let Err(err) =
                self.sink
                    .notify(NOTIFICATION_TITLE, NOTIFICATION_BODY, NOTIFICATION_ICON)
            {
                log::warn!("focus notification failed: {err}");
            }
        }
        if let Err(err) = self.sink.set_title(FLASH_TITLE) {
            log::debug!("could not flash terminal title: {err}");
        }
        self.title_revert = Some(Deadline::after(TITLE_FLASH_MS, now));
    }

    pub fn poll(&mut self, now: EpochMs) {
        if fire_due(&mut self.title_revert, now) {
            if let Err(err) = self.sink.set_title(APP_TITLE) {
                log::debug!("could not restore terminal title: {err}");
            }
        }
    }
}


#[cfg(test)]
mod tests {
    use super::testing::RecordingSink;
    use super::*;

    #[test]
    fn completion_rings_notifies_and_flashes() {
        let sink = RecordingSink {
            available: true,
            ..Default::default()
        };
        let mut alerts = Alerts::new(Box::new(sink.clone()));
        alerts.focus_completed(true, 0);
        assert_eq!(
            sink.entries(),
            vec![
                "bell".to_string(),
                format!("notify:{NOTIFICATION_TITLE}"),
                format!("title:{FLASH_TITLE}"),
            ]
        );
        assert!(alerts.title_flashing());

        alerts.poll(TITLE_FLASH_MS - 1);
        assert!(alerts.title_flashing());
        alerts.poll(TITLE_FLASH_MS);
        assert!(!alerts.title_flashing());
        assert_eq!(sink.entries().last().unwrap(), &format!("title:{APP_TITLE}"));
    }

    #[test]
    fn skips_notification_when_disabled_or_unavailable() {
        let sink = RecordingSink::default();
        let mut alerts = Alerts::new(Box::new(sink.clone()));
        alerts.focus_completed(true, 0);
        let available = RecordingSink {
            available: true,
            ..Default::default()
        };
        let mut opted_out = Alerts::new(Box::new(available.clone()));
        opted_out.focus_completed(false, 0);

        for entries in [sink.entries(), available.entries()] {
            assert!(entries.iter().all(|entry| !entry.starts_with("notify:")));
            assert_eq!(entries[0], "bell");
        }
    }

    #[test]
    fn failing_cues_do_not_stop_the_rest() {
        let sink = RecordingSink {
            available: true,
            failing: true,
            ..Default::default()
        };
        let mut alerts = Alerts::new(Box::new(sink.clone()));
        alerts.focus_completed(true, 0);
        assert_eq!(sink.entries().len(), 3);
        assert!(alerts.title_flashing());
    }
}
