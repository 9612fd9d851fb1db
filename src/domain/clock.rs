//! Injectable time source
//!
//! Freshness decisions (persistent-cache windows, memory-cache TTLs,
//! scoring recency) all read the clock through this trait so tests can
//! drive the boundaries deterministically.

use std::fmt::Debug;

use chrono::{DateTime, Utc};

/// Time source abstraction
pub trait Clock: Send + Sync + Debug {
    /// Current wall-clock time
    fn now(&self) -> DateTime<Utc>;
}

/// Production clock backed by the system time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[cfg(test)]
pub mod mock {
    use std::sync::Mutex;

    use chrono::Duration;

    use super::*;

    /// Manually advanced clock for tests
    #[derive(Debug)]
    pub struct ManualClock {
        now: Mutex<DateTime<Utc>>,
    }

    impl ManualClock {
        pub fn new(start: DateTime<Utc>) -> Self {
            Self {
                now: Mutex::new(start),
            }
        }

        pub fn set(&self, now: DateTime<Utc>) {
            *self.now.lock().unwrap() = now;
        }

        pub fn advance(&self, by: Duration) {
            let mut now = self.now.lock().unwrap();
            *now += by;
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> DateTime<Utc> {
            *self.now.lock().unwrap()
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_manual_clock_advance() {
            let start = Utc::now();
            let clock = ManualClock::new(start);

            clock.advance(Duration::seconds(90));
            assert_eq!(clock.now(), start + Duration::seconds(90));
        }
    }
}
