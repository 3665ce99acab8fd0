// SPDX-License-Identifier: MIT

//! Clock abstraction. The cron-parsing/scheduling side of the contract
//! (`parse`/`add`/`remove`/`entry`/`humanize`) lives in `dropjob-adapters`;
//! this trait is only the "what time is it" collaborator the engine needs
//! to stamp start/end times and compute `scheduled_dt` without depending
//! on wall-clock reality in tests.

use chrono::{DateTime, Utc};

/// Wall-clock time source.
pub trait Clock: Clone + Send + Sync + 'static {
    /// Current time.
    fn now(&self) -> DateTime<Utc>;
}

/// Real system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeClock;

#[cfg(any(test, feature = "test-support"))]
mod fake {
    use super::Clock;
    use chrono::{DateTime, Utc};
    use parking_lot::Mutex;
    use std::sync::Arc;

    /// Clock with an explicitly-advanced time, for deterministic tests.
    #[derive(Debug, Clone)]
    pub struct FakeClock(Arc<Mutex<DateTime<Utc>>>);

    impl FakeClock {
        pub fn new(start: DateTime<Utc>) -> Self {
            Self(Arc::new(Mutex::new(start)))
        }

        pub fn advance(&self, delta: chrono::Duration) {
            *self.0.lock() += delta;
        }

        pub fn set(&self, to: DateTime<Utc>) {
            *self.0.lock() = to;
        }
    }

    impl Clock for FakeClock {
        fn now(&self) -> DateTime<Utc> {
            *self.0.lock()
        }
    }
}
