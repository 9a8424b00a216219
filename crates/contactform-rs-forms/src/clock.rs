//! Time sources for the honeypot guard.
//!
//! The form never reads wall-clock time directly. It asks a [`Clock`],
//! which is [`SystemClock`] in production and [`FixedClock`] in tests.

use std::fmt;

use chrono::{DateTime, Utc};

/// A source of the current server time.
pub trait Clock: Send + Sync + fmt::Debug {
    /// Returns the current time.
    fn now(&self) -> DateTime<Utc>;
}

/// The wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock frozen at a single instant.
///
/// # Examples
///
/// ```
/// use contactform_rs_forms::clock::{Clock, FixedClock};
///
/// let clock = FixedClock::at_timestamp(1_700_000_000);
/// assert_eq!(clock.now().timestamp(), 1_700_000_000);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock {
    now: DateTime<Utc>,
}

impl FixedClock {
    /// Creates a clock that always reports `now`.
    pub const fn new(now: DateTime<Utc>) -> Self {
        Self { now }
    }

    /// Creates a clock from Unix seconds. Out-of-range values fall back to the epoch.
    pub fn at_timestamp(secs: i64) -> Self {
        Self::new(DateTime::from_timestamp(secs, 0).unwrap_or_default())
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.now
    }
}
