//! Poll-driven timers for the interaction loop.
//!
//! The dashboard is single-threaded and event-driven, so these are not
//! background tasks: the host loop calls `fire(now)` each pass and acts
//! when it returns true.

use std::time::{Duration, Instant};

// ---------------------------------------------------------------------------
// Debouncer – collapse a burst of triggers into one recomputation
// ---------------------------------------------------------------------------

/// Delays a recomputation until its trigger has been quiet for `delay`.
/// Each new trigger cancels the previously pending one, so a slider drag
/// fires once, after the user stops moving.
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

    /// Schedule (or re-schedule) the pending recomputation.
    pub fn trigger(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    /// Drop any pending recomputation.
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// True exactly once per trigger, when the quiet window has elapsed.
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

// ---------------------------------------------------------------------------
// Ticker – fixed-period repeat, gated by a running flag
// ---------------------------------------------------------------------------

/// Repeating tick for the word-cloud play mode. A stopped ticker never
/// fires; starting it schedules the first tick one full period out.
#[derive(Debug, Clone)]
pub struct Ticker {
    period: Duration,
    next: Instant,
    running: bool,
}

impl Ticker {
    pub fn new(period: Duration, now: Instant) -> Self {
        Self {
            period,
            next: now + period,
            running: false,
        }
    }

    pub fn start(&mut self, now: Instant) {
        if !self.running {
            self.running = true;
            self.next = now + self.period;
        }
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// True when a period has elapsed since the last tick. Missed periods
    /// (a slow host loop) collapse into a single tick.
    pub fn fire(&mut self, now: Instant) -> bool {
        if !self.running || now < self.next {
            return false;
        }
        while self.next <= now {
            self.next += self.period;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS: Duration = Duration::from_millis(1);

    #[test]
    fn debounce_waits_for_quiet_window() {
        let t0 = Instant::now();
        let mut d = Debouncer::new(100 * MS);
        d.trigger(t0);
        assert!(!d.fire(t0 + 50 * MS));
        assert!(d.fire(t0 + 100 * MS));
        // fired once, nothing pending
        assert!(!d.fire(t0 + 200 * MS));
    }

    #[test]
    fn retrigger_cancels_pending_deadline() {
        let t0 = Instant::now();
        let mut d = Debouncer::new(100 * MS);
        d.trigger(t0);
        d.trigger(t0 + 80 * MS);
        assert!(!d.fire(t0 + 120 * MS));
        assert!(d.fire(t0 + 180 * MS));
    }

    #[test]
    fn cancel_drops_pending_recomputation() {
        let t0 = Instant::now();
        let mut d = Debouncer::new(100 * MS);
        d.trigger(t0);
        d.cancel();
        assert!(!d.is_pending());
        assert!(!d.fire(t0 + 500 * MS));
    }

    #[test]
    fn stopped_ticker_never_fires() {
        let t0 = Instant::now();
        let mut t = Ticker::new(100 * MS, t0);
        assert!(!t.fire(t0 + 500 * MS));
    }

    #[test]
    fn ticker_fires_once_per_period() {
        let t0 = Instant::now();
        let mut t = Ticker::new(100 * MS, t0);
        t.start(t0);
        assert!(!t.fire(t0 + 50 * MS));
        assert!(t.fire(t0 + 100 * MS));
        assert!(!t.fire(t0 + 150 * MS));
        assert!(t.fire(t0 + 200 * MS));
    }

    #[test]
    fn missed_periods_collapse_into_one_tick() {
        let t0 = Instant::now();
        let mut t = Ticker::new(100 * MS, t0);
        t.start(t0);
        assert!(t.fire(t0 + 350 * MS));
        assert!(!t.fire(t0 + 360 * MS));
        assert!(t.fire(t0 + 400 * MS));
    }

    #[test]
    fn restart_reschedules_from_now() {
        let t0 = Instant::now();
        let mut t = Ticker::new(100 * MS, t0);
        t.start(t0);
        t.stop();
        t.start(t0 + 500 * MS);
        assert!(!t.fire(t0 + 550 * MS));
        assert!(t.fire(t0 + 600 * MS));
    }
}
