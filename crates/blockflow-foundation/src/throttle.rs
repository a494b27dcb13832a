use std::time::Duration;
use web_time::Instant;

/// Lets an action through at most once per interval.
#[derive(Clone, Copy, Debug)]
pub struct Throttle {
    interval: Duration,
    last: Option<Instant>,
}

impl Throttle {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: None,
        }
    }

    /// Returns true, and restarts the interval, when `now` is far enough past
    /// the previous accepted call.
    pub fn ready_at(&mut self, now: Instant) -> bool {
        match self.last {
            Some(last) if now.saturating_duration_since(last) < self.interval => false,
            _ => {
                self.last = Some(now);
                true
            }
        }
    }

    pub fn ready(&mut self) -> bool {
        self.ready_at(Instant::now())
    }

    /// Forgets the previous call so the next one always passes.
    pub fn reset(&mut self) {
        self.last = None;
    }
}
