//! Cancellable fixed-period tick source

use std::time::{Duration, Instant};

pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// A single cadence. Starting it again replaces the previous schedule, so
/// there is never more than one pending tick.
#[derive(Debug, Clone)]
pub struct Ticker {
    period: Duration,
    next_due: Option<Instant>,
}

impl Ticker {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            next_due: None,
        }
    }

    /// Arm the cadence; the first tick is due one period after `now`
    pub fn start(&mut self, now: Instant) {
        self.next_due = Some(now + self.period);
    }

    pub fn cancel(&mut self) {
        self.next_due = None;
    }

    pub fn is_active(&self) -> bool {
        self.next_due.is_some()
    }

    pub fn next_due(&self) -> Option<Instant> {
        self.next_due
    }

    /// Consume one due tick, if any. Call repeatedly to catch up after a
    /// long wait; each call moves the schedule forward by one period.
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.next_due {
            Some(due) if now >= due => {
                self.next_due = Some(due + self.period);
                true
            }
            _ => false,
        }
    }
}

impl Default for Ticker {
    fn default() -> Self {
        Self::new(TICK_PERIOD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_once_per_period() {
        let t0 = Instant::now();
        let mut ticker = Ticker::default();
        ticker.start(t0);

        assert!(!ticker.fire(t0 + Duration::from_millis(999)));
        assert!(ticker.fire(t0 + Duration::from_secs(1)));
        assert!(!ticker.fire(t0 + Duration::from_millis(1500)));
        assert_eq!(ticker.next_due(), Some(t0 + Duration::from_secs(2)));
    }

    #[test]
    fn catches_up_after_a_long_wait() {
        let t0 = Instant::now();
        let mut ticker = Ticker::default();
        ticker.start(t0);

        let now = t0 + Duration::from_millis(3500);
        let mut fired = 0;
        while ticker.fire(now) {
            fired += 1;
        }
        assert_eq!(fired, 3);
    }

    #[test]
    fn cancel_drops_pending_tick() {
        let t0 = Instant::now();
        let mut ticker = Ticker::default();
        ticker.start(t0);
        ticker.cancel();

        assert!(!ticker.is_active());
        assert!(!ticker.fire(t0 + Duration::from_secs(5)));
    }

    #[test]
    fn restart_replaces_schedule() {
        let t0 = Instant::now();
        let mut ticker = Ticker::default();
        ticker.start(t0);
        ticker.start(t0 + Duration::from_millis(600));

        assert!(!ticker.fire(t0 + Duration::from_secs(1)));
        assert!(ticker.fire(t0 + Duration::from_millis(1600)));
    }
}
