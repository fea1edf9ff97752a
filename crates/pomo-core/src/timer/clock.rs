//! Countdown progress and elapsed-time bookkeeping.
//!
//! The countdown never reads the wall clock. It only moves when the owner
//! calls [`Countdown::advance`] with the tick interval, so a paused timer
//! (no advances) keeps its elapsed value exactly.

use chrono::{DateTime, Duration, Utc};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Countdown {
    elapsed: Duration,
    duration: Duration,
}

impl Countdown {
    pub fn new(duration: Duration) -> Self {
        Self {
            elapsed: Duration::zero(),
            duration,
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Time left, never negative.
    pub fn remaining(&self) -> Duration {
        (self.duration - self.elapsed).max(Duration::zero())
    }

    /// 0.0 .. 1.0 progress; a zero-length countdown reports complete.
    pub fn percent(&self) -> f64 {
        let total = self.duration.num_milliseconds();
        if total <= 0 {
            return 1.0;
        }
        (self.elapsed.num_milliseconds() as f64 / total as f64).min(1.0)
    }

    pub fn is_complete(&self) -> bool {
        self.elapsed >= self.duration
    }

    pub fn advance(&mut self, interval: Duration) {
        self.elapsed = self.elapsed + interval;
    }

    /// Start over with a new total.
    pub fn restart(&mut self, duration: Duration) {
        self.elapsed = Duration::zero();
        self.duration = duration;
    }

    pub fn extend(&mut self, extra: Duration) {
        self.duration = self.duration + extra;
    }
}

/// When an interval that has run for `elapsed` up to `now` actually began.
pub fn session_start_time(now: DateTime<Utc>, elapsed: Duration) -> DateTime<Utc> {
    if elapsed <= Duration::zero() {
        return now;
    }
    now - elapsed
}
