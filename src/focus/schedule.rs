//! Cancellation handles for scheduled work.
//!
//! The event loop never registers callbacks anywhere. Instead the owning state
//! machine holds one of these handles and polls it with the current time;
//! dropping the handle is the cancellation.

/// Milliseconds since the Unix epoch.
pub type EpochMs = i64;

/// Repeating schedule that is due every `period_ms`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Interval {
    period_ms: i64,
    next_due: EpochMs,
}

impl Interval {
    pub fn every(period_ms: i64, now: EpochMs) -> Self {
        Self {
            period_ms,
            next_due: now + period_ms,
        }
    }

    /// Returns true once per elapsed period. After a long gap (suspension)
    /// it fires a single time and re-arms relative to `now`.
    pub fn poll(&mut self, now: EpochMs) -> bool {
        if now < self.next_due {
            return false;
        }
        self.next_due = now + self.period_ms;
        true
    }
}

/// One-shot schedule.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Deadline {
    due: EpochMs,
}

impl Deadline {
    pub fn after(delay_ms: i64, now: EpochMs) -> Self {
        Self {
            due: now + delay_ms,
        }
    }

    pub fn is_due(&self, now: EpochMs) -> bool {
        now >= self.due
    }

    #[cfg(test)]
    pub fn remaining_ms(&self, now: EpochMs) -> i64 {
        (self.due - now).max(0)
    }
}

/// Takes the deadline out of `slot` if it is due, releasing the handle.
pub fn fire_due(slot: &mut Option<Deadline>, now: EpochMs) -> bool {
    slot.take_if(|deadline| deadline.is_due(now)).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interval_fires_once_per_period() {
        let mut interval = Interval::every(1000, 0);
        assert!(!interval.poll(999));
        assert!(interval.poll(1000));
        assert!(!interval.poll(1500));
        assert!(interval.poll(2000));
    }

    #[test]
    fn interval_fires_once_after_gap() {
        let mut interval = Interval::every(1000, 0);
        assert!(interval.poll(60_000));
        assert!(!interval.poll(60_500));
        assert!(interval.poll(61_000));
    }

    #[test]
    fn deadline_fires_once() {
        let mut slot = Some(Deadline::after(90_000, 0));
        assert!(!fire_due(&mut slot, 89_999));
        assert_eq!(slot.map(|d| d.remaining_ms(89_999)), Some(1));
        assert!(fire_due(&mut slot, 90_000));
        assert!(slot.is_none());
        assert!(!fire_due(&mut slot, 200_000));
    }
}
