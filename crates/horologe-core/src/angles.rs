//! Time-to-angle conversion.
//!
//! Angles are radians measured clockwise from 12 o'clock, always in `[0, 2π)`.

use std::f64::consts::TAU;

use crate::time::WallClockTime;

/// One of the three clock hands.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Hand {
    Hour,
    Minute,
    Second,
}

impl Hand {
    /// Paint order: hour at the back, second on top.
    pub const ALL: [Hand; 3] = [Hand::Hour, Hand::Minute, Hand::Second];
}

/// Rotation of each hand for one sampled time.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct HandAngles {
    pub hour: f64,
    pub minute: f64,
    pub second: f64,
}

impl HandAngles {
    /// Derives the three hand angles from a wall-clock time.
    ///
    /// The hour hand sweeps continuously: at 15:30 it sits halfway between 3 and 4.
    /// Minute and second hands move in whole steps of their 60-unit cycle.
    pub fn from_time(t: WallClockTime) -> Self {
        let hour_with_minutes = f64::from(t.hour()) + f64::from(t.minute()) / 60.0;

        Self {
            hour: normalize_angle(hour_with_minutes / 12.0 * TAU),
            minute: f64::from(t.minute()) / 60.0 * TAU,
            second: f64::from(t.second()) / 60.0 * TAU,
        }
    }

    #[inline]
    pub fn get(&self, hand: Hand) -> f64 {
        match hand {
            Hand::Hour => self.hour,
            Hand::Minute => self.minute,
            Hand::Second => self.second,
        }
    }
}

/// Wraps any finite angle into `[0, 2π)`.
pub fn normalize_angle(radians: f64) -> f64 {
    let r = radians.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs.
    if r >= TAU { 0.0 } else { r }
}

/// Signed shortest rotation from `from` to `to`, in `(-π, π]`.
pub fn shortest_delta(from: f64, to: f64) -> f64 {
    let d = normalize_angle(to - from);
    if d > TAU / 2.0 { d - TAU } else { d }
}
