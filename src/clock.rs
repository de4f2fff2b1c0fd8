use chrono::{DateTime, Utc};

/// Source of the instant a series is anchored to.
///
/// The last timestamp of every generated series equals [`Clock::now`].
pub trait Clock {
    /// Returns the current instant.
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Always returns the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(DateTime<Utc>);

impl FixedClock {
    /// Pins the clock at `instant`.
    pub fn new(instant: DateTime<Utc>) -> Self {
        Self(instant)
    }
}

impl From<DateTime<Utc>> for FixedClock {
    fn from(instant: DateTime<Utc>) -> Self {
        Self::new(instant)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}

#[cfg(test)]
#[test]
fn fixed_clock_does_not_move() {
    let instant = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
    let clock = FixedClock::new(instant);
    assert_eq!(clock.now(), instant);
    assert_eq!(clock.now(), clock.now());
}

#[cfg(test)]
#[test]
fn system_clock_is_monotonic_enough() {
    let clock = SystemClock;
    let before = clock.now();
    let after = clock.now();
    assert!(after >= before);
}
