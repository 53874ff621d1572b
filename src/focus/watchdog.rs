use super::schedule::{Deadline, EpochMs, fire_due};

pub const INACTIVITY_LIMIT_MS: i64 = 90_000;

/// Shows a "nothing is happening" overlay after a stretch without input,
/// unless a focus block is running.
#[derive(Debug)]
pub struct InactivityWatchdog {
    limit_ms: i64,
    deadline: Option<Deadline>,
    overlay_visible: bool,
}

impl InactivityWatchdog {
    pub fn new(now: EpochMs) -> Self {
        Self::with_limit(INACTIVITY_LIMIT_MS, now)
    }

    pub fn with_limit(limit_ms: i64, now: EpochMs) -> Self {
        Self {
            limit_ms,
            deadline: Some(Deadline::after(limit_ms, now)),
            overlay_visible: false,
        }
    }

    pub fn overlay_visible(&self) -> bool {
        self.overlay_visible
    }

    #[cfg(test)]
    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// A qualifying input event: hide the overlay and re-arm.
    pub fn activity(&mut self, now: EpochMs) {
        self.overlay_visible = false;
        self.deadline = Some(Deadline::after(self.limit_ms, now));
    }

    pub fn focus_started(&mut self) {
        self.overlay_visible = false;
    }

    pub fn poll(&mut self, now: EpochMs, focus_running: bool) {
        if fire_due(&mut self.deadline, now) && !focus_running {
            log::debug!("no activity for {}s, showing overlay", self.limit_ms / 1000);
            self.overlay_visible = true;
        }
    }
}
