/// Focus timer, inactivity watchdog and completion cues.
mod alerts;
mod schedule;
mod timer;
mod watchdog;

pub use alerts::{Alerts, TerminalAlerts};
pub use schedule::EpochMs;
pub use timer::{Completion, FocusPhase, FocusTimer, MAX_MINUTES, MIN_MINUTES};
#[cfg(test)]
pub use timer::FocusState;
pub use watchdog::InactivityWatchdog;

#[cfg(test)]
pub(crate) use alerts::testing;
