//! Throttle and debounce on host-supplied millisecond timestamps
//!
//! The core never reads a clock. Hosts pass `performance.now()` (web) or a
//! simulated time (native/tests), and deadlines are polled from the frame
//! loop, so cancelling a timer is just clearing its deadline.

/// Accepts at most one call per `interval_ms` (sampled, not debounced)
#[derive(Debug, Clone)]
pub struct Throttle {
    interval_ms: f64,
    last: Option<f64>,
}

impl Throttle {
    pub fn new(interval_ms: f64) -> Self {
        Self {
            interval_ms,
            last: None,
        }
    }

    /// Returns true (and records `now`) if enough time has passed
    pub fn ready(&mut self, now: f64) -> bool {
        match self.last {
            Some(last) if now - last < self.interval_ms => false,
            _ => {
                self.last = Some(now);
                true
            }
        }
    }

    pub fn reset(&mut self) {
        self.last = None;
    }
}

/// Coalesces bursts into a single firing `delay_ms` after the last trigger
#[derive(Debug, Clone)]
pub struct Debounce {
    delay_ms: f64,
    deadline: Option<f64>,
}

impl Debounce {
    pub fn new(delay_ms: f64) -> Self {
        Self {
            delay_ms,
            deadline: None,
        }
    }

    /// Arm (or re-arm) the deadline
    pub fn trigger(&mut self, now: f64) {
        self.deadline = Some(now + self.delay_ms);
    }

    /// True exactly once when the deadline has passed
    pub fn fire(&mut self, now: f64) -> bool {
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
}
