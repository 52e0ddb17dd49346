//! Clock capability for the surrounding scheduler.
//!
//! The consensus core never reads time; voting-round timeouts belong to
//! the scheduler, which takes a `Clock` so tests can drive time manually
//! (see `quorus_nullables::NullClock`).

use quorus_types::Timestamp;
use std::time::{SystemTime, UNIX_EPOCH};

/// A source of the current time.
pub trait Clock {
    fn now(&self) -> Timestamp;
}

/// The real system clock.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        Timestamp::new(secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_clock_is_nonzero() {
        assert!(SystemClock.now() > Timestamp::EPOCH);
    }
}
