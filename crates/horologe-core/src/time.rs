//! Wall-clock sampling.
//!
//! `TimeSource` is the seam between the clock logic and the host clock.
//! Production code uses [`LocalTimeSource`]; tests pin the time with
//! [`FixedTimeSource`].

use std::cell::Cell;

use chrono::Timelike;

use crate::error::ClockError;

/// Hour/minute/second of the local time at the instant it was sampled.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct WallClockTime {
    hour: u32,
    minute: u32,
    second: u32,
}

impl WallClockTime {
    /// Validates and builds a time. Hours are 0–23, minutes and seconds 0–59.
    pub fn new(hour: u32, minute: u32, second: u32) -> Result<Self, ClockError> {
        if hour > 23 || minute > 59 || second > 59 {
            return Err(ClockError::InvalidTime { hour, minute, second });
        }
        Ok(Self { hour, minute, second })
    }

    /// Builds a time from any `chrono` value carrying time-of-day fields.
    ///
    /// chrono folds leap seconds into the nanosecond field; the clamp only matters
    /// for foreign `Timelike` impls that report second 60.
    pub fn from_timelike<T: Timelike>(t: &T) -> Self {
        Self {
            hour: t.hour(),
            minute: t.minute(),
            second: t.second().min(59),
        }
    }

    #[inline]
    pub fn hour(self) -> u32 {
        self.hour
    }

    #[inline]
    pub fn minute(self) -> u32 {
        self.minute
    }

    #[inline]
    pub fn second(self) -> u32 {
        self.second
    }
}

/// Source of the current wall-clock time.
pub trait TimeSource {
    /// Samples the current time.
    fn now(&self) -> Result<WallClockTime, ClockError>;
}

/// Host local time via `chrono::Local`.
#[derive(Debug, Copy, Clone, Default)]
pub struct LocalTimeSource;

impl LocalTimeSource {
    pub fn new() -> Self {
        Self
    }
}

impl TimeSource for LocalTimeSource {
    fn now(&self) -> Result<WallClockTime, ClockError> {
        Ok(WallClockTime::from_timelike(&chrono::Local::now()))
    }
}

/// A settable time source.
///
/// Interior mutability lets a test keep a shared reference in the ticker and
/// still move the time forward between fires.
#[derive(Debug, Default)]
pub struct FixedTimeSource {
    current: Cell<Option<WallClockTime>>,
}

impl FixedTimeSource {
    pub fn new(time: WallClockTime) -> Self {
        Self { current: Cell::new(Some(time)) }
    }

    /// A source that always fails, as a host with no readable clock would.
    pub fn unavailable() -> Self {
        Self { current: Cell::new(None) }
    }

    pub fn set(&self, time: WallClockTime) {
        self.current.set(Some(time));
    }

    /// Makes every later read fail until [`set`](Self::set) is called again.
    pub fn clear(&self) {
        self.current.set(None);
    }
}

impl TimeSource for FixedTimeSource {
    fn now(&self) -> Result<WallClockTime, ClockError> {
        self.current
            .get()
            .ok_or_else(|| ClockError::ClockUnavailable("no time set".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    #[test]
    fn accepts_bounds() {
        assert!(WallClockTime::new(0, 0, 0).is_ok());
        assert!(WallClockTime::new(23, 59, 59).is_ok());
    }

    #[test]
    fn rejects_out_of_range() {
        assert_eq!(
            WallClockTime::new(24, 0, 0),
            Err(ClockError::InvalidTime { hour: 24, minute: 0, second: 0 })
        );
        assert!(WallClockTime::new(0, 60, 0).is_err());
        assert!(WallClockTime::new(0, 0, 60).is_err());
    }

    #[test]
    fn from_naive_time() {
        let t = NaiveTime::from_hms_opt(14, 30, 5).unwrap();
        let w = WallClockTime::from_timelike(&t);
        assert_eq!((w.hour(), w.minute(), w.second()), (14, 30, 5));
    }

    #[test]
    fn local_source_is_in_range() {
        let t = LocalTimeSource::new().now().unwrap();
        assert!(t.hour() < 24 && t.minute() < 60 && t.second() < 60);
    }

    #[test]
    fn fixed_source_can_be_moved() {
        let src = FixedTimeSource::new(WallClockTime::new(1, 2, 3).unwrap());
        src.set(WallClockTime::new(4, 5, 6).unwrap());
        assert_eq!(src.now().unwrap(), WallClockTime::new(4, 5, 6).unwrap());
    }

    #[test]
    fn unavailable_source_errors() {
        let err = FixedTimeSource::unavailable().now().unwrap_err();
        assert!(matches!(err, ClockError::ClockUnavailable(_)));
    }

    #[test]
    fn cleared_source_fails_until_set() {
        let src = FixedTimeSource::new(WallClockTime::new(1, 2, 3).unwrap());
        src.clear();
        assert!(src.now().is_err());
        src.set(WallClockTime::new(1, 2, 4).unwrap());
        assert_eq!(src.now().unwrap(), WallClockTime::new(1, 2, 4).unwrap());
    }
}
