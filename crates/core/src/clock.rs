// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::sync::atomic::{AtomicI64, Ordering};
use time::{Duration, OffsetDateTime};

/// Source of the current wall-clock instant.
///
/// Injected wherever a component needs "now" so tests can drive time
/// deterministically.
pub trait Clock: Send + Sync {
    /// Returns the current instant.
    fn now(&self) -> OffsetDateTime;
}

/// The real UTC wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }
}

/// A clock that only moves when told to.
///
/// Millisecond resolution, which is enough to exercise deadline edges.
#[derive(Debug)]
pub struct ManualClock {
    unix_millis: AtomicI64,
}

impl ManualClock {
    /// Creates a clock frozen at `start`.
    #[must_use]
    pub fn new(start: OffsetDateTime) -> Self {
        Self {
            unix_millis: AtomicI64::new(to_unix_millis(start)),
        }
    }

    /// Moves the clock forward (or backward, for negative durations).
    pub fn advance(&self, by: Duration) {
        let millis = i64::try_from(by.whole_milliseconds()).unwrap_or(i64::MAX);
        self.unix_millis.fetch_add(millis, Ordering::SeqCst);
    }

    /// Jumps the clock to `instant`.
    pub fn set(&self, instant: OffsetDateTime) {
        self.unix_millis
            .store(to_unix_millis(instant), Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> OffsetDateTime {
        let millis = i128::from(self.unix_millis.load(Ordering::SeqCst));
        OffsetDateTime::from_unix_timestamp_nanos(millis * 1_000_000)
            .unwrap_or(OffsetDateTime::UNIX_EPOCH)
    }
}

fn to_unix_millis(instant: OffsetDateTime) -> i64 {
    i64::try_from(instant.unix_timestamp_nanos() / 1_000_000).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn test_manual_clock_starts_where_told() {
        let clock = ManualClock::new(datetime!(2026-03-02 08:00:00 UTC));
        assert_eq!(clock.now(), datetime!(2026-03-02 08:00:00 UTC));
    }

    #[test]
    fn test_manual_clock_advances_with_millisecond_precision() {
        let clock = ManualClock::new(datetime!(2026-03-02 08:00:00 UTC));
        clock.advance(Duration::milliseconds(60_001));
        assert_eq!(clock.now(), datetime!(2026-03-02 08:01:00.001 UTC));
    }

    #[test]
    fn test_manual_clock_set() {
        let clock = ManualClock::new(datetime!(2026-03-02 08:00:00 UTC));
        clock.set(datetime!(2026-03-02 09:30:00 UTC));
        assert_eq!(clock.now(), datetime!(2026-03-02 09:30:00 UTC));
    }
}
