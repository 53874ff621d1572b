//! Focus block countdown.
//!
//! Remaining time is always derived from an absolute deadline (`end_ts`), never
//! decremented, so the countdown stays correct when the process is suspended,
//! backgrounded or restarted. The caller polls the timer with the current time.
//!
//! ```text
//! Idle --start--> Running --pause--> Paused --start--> Running
//!                    |
//!                    +--tick (deadline passed)--> Expired
//! ```

use serde::{Deserialize, Serialize};

use super::schedule::{EpochMs, Interval};
use crate::domain::Loops;
use crate::store::{FOCUS_KEY, Store};
use crate::types::LoopId;

pub const MIN_MINUTES: u32 = 5;
pub const MAX_MINUTES: u32 = 120;
pub const DEFAULT_MINUTES: u32 = 25;
const TICK_MS: i64 = 1000;

/// Persisted timer record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FocusState {
    pub minutes: u32,
    pub remaining_sec: i64,
    pub running: bool,
    /// Absolute deadline, present iff `running`.
    pub end_ts: Option<EpochMs>,
    pub notifications: bool,
    pub loop_id: Option<LoopId>,
    /// Set once a block starts; separates a paused block from a fresh one.
    pub started: bool,
}

impl Default for FocusState {
    fn default() -> Self {
        Self {
            minutes: DEFAULT_MINUTES,
            remaining_sec: i64::from(DEFAULT_MINUTES) * 60,
            running: false,
            end_ts: None,
            notifications: false,
            loop_id: None,
            started: false,
        }
    }
}

impl FocusState {
    pub fn total_sec(&self) -> i64 {
        i64::from(self.minutes) * 60
    }

    /// Repairs records written by older builds or edited by hand.
    fn normalized(mut self) -> Self {
        self.minutes = self.minutes.clamp(MIN_MINUTES, MAX_MINUTES);
        self.remaining_sec = self.remaining_sec.clamp(0, self.total_sec());
        match (self.running, self.end_ts) {
            (true, None) => self.running = false,
            (false, Some(_)) => self.end_ts = None,
            _ => {}
        }
        if self.running {
            self.started = true;
        }
        if self.loop_id.as_deref().is_some_and(str::is_empty) {
            self.loop_id = None;
        }
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FocusPhase {
    Idle,
    Paused,
    Running,
    Expired,
}

/// Returned exactly once when a running block reaches its deadline.
#[must_use]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Completion {
    pub loop_id: Option<LoopId>,
}

#[derive(Debug)]
pub struct FocusTimer {
    state: FocusState,
    ticker: Option<Interval>,
}

impl FocusTimer {
    /// Loads the persisted record. Call [`FocusTimer::restore_on_resume`]
    /// afterwards to reconcile a block that was running.
    pub fn load(store: &Store) -> Self {
        Self::from_state(store.read(FOCUS_KEY).unwrap_or_default())
    }

    pub fn from_state(state: FocusState) -> Self {
        Self {
            state: state.normalized(),
            ticker: None,
        }
    }

    #[cfg(test)]
    pub fn state(&self) -> &FocusState {
        &self.state
    }

    pub fn phase(&self) -> FocusPhase {
        if self.state.running {
            FocusPhase::Running
        } else if self.state.remaining_sec == 0 {
            FocusPhase::Expired
        } else if self.state.started || self.state.remaining_sec < self.state.total_sec() {
            FocusPhase::Paused
        } else {
            FocusPhase::Idle
        }
    }

    pub fn is_running(&self) -> bool {
        self.state.running
    }

    pub fn minutes(&self) -> u32 {
        self.state.minutes
    }

    pub fn remaining_sec(&self) -> i64 {
        self.state.remaining_sec
    }

    pub fn notifications_enabled(&self) -> bool {
        self.state.notifications
    }

    pub fn loop_id(&self) -> Option<&str> {
        self.state.loop_id.as_deref()
    }

    /// Whether a periodic recomputation is currently scheduled.
    #[cfg(test)]
    pub fn is_ticking(&self) -> bool {
        self.ticker.is_some()
    }

    pub fn configure(&mut self, minutes: u32, store: &Store) {
        self.state.minutes = minutes.clamp(MIN_MINUTES, MAX_MINUTES);
        if !self.state.running {
            self.state.remaining_sec = self.state.total_sec();
            self.state.started = false;
        }
        self.persist(store);
    }

    pub fn start(&mut self, now: EpochMs, store: &Store) {
        if self.state.running {
            return;
        }
        if self.state.remaining_sec <= 0 {
            self.state.remaining_sec = self.state.total_sec();
        }
        self.state.end_ts = Some(now + self.state.remaining_sec * 1000);
        self.state.running = true;
        self.state.started = true;
        self.ticker = Some(Interval::every(TICK_MS, now));
        self.persist(store);
        log::info!(
            "focus block started: {}s remaining of {} min",
            self.state.remaining_sec,
            self.state.minutes
        );
    }

    /// Recomputes the remaining time from the deadline.
    pub fn tick(&mut self, now: EpochMs, store: &Store) -> Option<Completion> {
        if !self.state.running {
            return None;
        }
        let end_ts = self.state.end_ts?;
        // Nearest second. `end_ts` may come from a hand-edited record.
        let mut remaining = end_ts.saturating_sub(now).saturating_add(500).div_euclid(1000);
        if remaining <= 0 {
            return Some(self.expire(store));
        }
        if remaining > self.state.total_sec() {
            log::warn!("focus deadline {end_ts} lies beyond the block length, clamping");
            remaining = self.state.total_sec();
            self.state.end_ts = Some(now.saturating_add(remaining * 1000));
        }
        self.state.remaining_sec = remaining;
        self.persist(store);
        None
    }

    /// Drives the periodic recomputation; call as often as convenient.
    pub fn poll(&mut self, now: EpochMs, store: &Store) -> Option<Completion> {
        let due = self.ticker.as_mut().is_some_and(|ticker| ticker.poll(now));
        if !due {
            return None;
        }
        self.tick(now, store)
    }

    /// Freezes the remaining time. A block whose deadline has already passed
    /// expires instead, and its completion is returned.
    pub fn pause(&mut self, now: EpochMs, store: &Store) -> Option<Completion> {
        if !self.state.running {
            return None;
        }
        if let Some(completion) = self.tick(now, store) {
            return Some(completion);
        }
        self.state.running = false;
        self.state.end_ts = None;
        self.ticker = None;
        self.persist(store);
        log::info!("focus block paused at {}s", self.state.remaining_sec);
        None
    }

    pub fn reset(&mut self, now: EpochMs, store: &Store) {
        // A block that ran out at this very moment is aborted, not announced.
        let _ = self.pause(now, store);
        self.state.remaining_sec = self.state.total_sec();
        self.state.started = false;
        self.persist(store);
    }

    /// Reconciles a block that was running when the process last stopped.
    pub fn restore_on_resume(&mut self, now: EpochMs, store: &Store) -> Option<Completion> {
        if !self.state.running {
            return None;
        }
        if let Some(completion) = self.tick(now, store) {
            log::info!("focus block ran out while LoopOS was closed");
            return Some(completion);
        }
        self.ticker = Some(Interval::every(TICK_MS, now));
        log::info!("focus block resumed with {}s remaining", self.state.remaining_sec);
        None
    }

    pub fn set_notifications(&mut self, enabled: bool, store: &Store) {
        self.state.notifications = enabled;
        self.persist(store);
    }

    /// Associates the block with an open loop. Closed or unknown loops are
    /// refused.
    pub fn select_loop(&mut self, loop_id: Option<LoopId>, loops: &Loops, store: &Store) -> bool {
        if loop_id.as_deref().is_some_and(|id| !loops.is_open(id)) {
            return false;
        }
        self.state.loop_id = loop_id;
        self.persist(store);
        true
    }

    /// Drops the association if its loop closed or disappeared.
    pub fn sync_loop(&mut self, loops: &Loops, store: &Store) -> bool {
        if !self.loop_id().is_some_and(|id| !loops.is_open(id)) {
            return false;
        }
        self.state.loop_id = None;
        self.persist(store);
        true
    }

    fn expire(&mut self, store: &Store) -> Completion {
        self.ticker = None;
        self.state.running = false;
        self.state.end_ts = None;
        self.state.remaining_sec = 0;
        self.state.started = false;
        self.persist(store);
        log::info!("focus block finished");
        Completion {
            loop_id: self.state.loop_id.clone(),
        }
    }

    fn persist(&self, store: &Store) {
        store.write(FOCUS_KEY, &self.state);
    }
}
