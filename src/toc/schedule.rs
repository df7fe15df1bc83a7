//! Deadline-based timers driven by the host's clock
//!
//! Nothing here sleeps or spawns. The owner passes `now` in and asks what has
//! come due, which keeps the controller single-threaded and lets tests drive
//! time by adding [`Duration`]s to an [`Instant`].

use std::time::{Duration, Instant};

// ─────────────────────────────────────────────────────────────────────────────
// Debouncer
// ─────────────────────────────────────────────────────────────────────────────

/// Trailing-edge debounce: each `schedule` pushes the deadline out again.
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    /// (Re)arm the timer so it fires `delay` after `now`.
    pub fn schedule(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    /// Returns true once when the deadline has passed, disarming the timer.
    pub fn fire_due(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.deadline
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// IntervalTimer
// ─────────────────────────────────────────────────────────────────────────────

/// Repeating timer. Missed periods collapse into a single firing.
#[derive(Debug, Clone)]
pub struct IntervalTimer {
    period: Duration,
    next: Option<Instant>,
}

impl IntervalTimer {
    pub fn new(period: Duration) -> Self {
        Self { period, next: None }
    }

    /// Start ticking; the first firing is one period after `now`.
    /// Restarting a running timer resets its phase.
    pub fn start(&mut self, now: Instant) {
        self.next = Some(now + self.period);
    }

    pub fn stop(&mut self) {
        self.next = None;
    }

    pub fn is_running(&self) -> bool {
        self.next.is_some()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.next
    }

    /// Returns true when a period has elapsed and schedules the next one.
    pub fn fire_due(&mut self, now: Instant) -> bool {
        match self.next {
            Some(next) if now >= next => {
                self.next = Some(now + self.period);
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debounce_coalesces_bursts() {
        let start = Instant::now();
        let mut debounce = Debouncer::new(Duration::from_millis(250));

        for ms in [0, 50, 100, 200] {
            debounce.schedule(start + Duration::from_millis(ms));
        }
        assert!(!debounce.fire_due(start + Duration::from_millis(300)));
        assert!(debounce.fire_due(start + Duration::from_millis(450)));
        assert!(!debounce.fire_due(start + Duration::from_millis(900)));
        assert!(!debounce.is_pending());
    }

    #[test]
    fn test_debounce_cancel() {
        let start = Instant::now();
        let mut debounce = Debouncer::new(Duration::from_millis(10));
        debounce.schedule(start);
        debounce.cancel();
        assert!(!debounce.fire_due(start + Duration::from_secs(1)));
        assert_eq!(debounce.next_deadline(), None);
    }

    #[test]
    fn test_interval_fires_each_period() {
        let start = Instant::now();
        let mut timer = IntervalTimer::new(Duration::from_millis(300));
        assert!(!timer.fire_due(start + Duration::from_secs(5)));

        timer.start(start);
        assert!(!timer.fire_due(start + Duration::from_millis(299)));
        assert!(timer.fire_due(start + Duration::from_millis(300)));
        assert!(!timer.fire_due(start + Duration::from_millis(400)));
        assert!(timer.fire_due(start + Duration::from_millis(700)));

        timer.stop();
        assert!(!timer.is_running());
        assert!(!timer.fire_due(start + Duration::from_secs(10)));
    }

    #[test]
    fn test_interval_collapses_missed_periods() {
        let start = Instant::now();
        let mut timer = IntervalTimer::new(Duration::from_millis(100));
        timer.start(start);
        let late = start + Duration::from_secs(3);
        assert!(timer.fire_due(late));
        assert!(!timer.fire_due(late));
    }
}
