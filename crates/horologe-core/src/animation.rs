//! Hand rotation animation.
//!
//! Each hand eases from the angle currently on screen to an absolute target over a
//! fixed duration, along the shortest arc, then holds the target. Retargeting in
//! the middle of an animation starts from wherever the hand is drawn right now.

use std::time::Duration;

use crate::angles::{normalize_angle, shortest_delta, Hand, HandAngles};

/// Animated rotation of a single hand.
#[derive(Debug, Clone, PartialEq)]
pub struct HandAnimator {
    displayed: f64,
    from: f64,
    delta: f64,
    target: f64,
    elapsed: Duration,
    duration: Duration,
}

impl HandAnimator {
    pub fn new(initial: f64, duration: Duration) -> Self {
        let initial = normalize_angle(initial);
        Self {
            displayed: initial,
            from: initial,
            delta: 0.0,
            target: initial,
            elapsed: duration,
            duration,
        }
    }

    /// Angle to draw this frame, in `[0, 2π)`.
    #[inline]
    pub fn angle(&self) -> f64 {
        self.displayed
    }

    #[inline]
    pub fn target(&self) -> f64 {
        self.target
    }

    pub fn is_animating(&self) -> bool {
        self.elapsed < self.duration
    }

    /// Starts rotating toward `target`. With a zero duration the hand jumps.
    pub fn set_target(&mut self, target: f64) {
        let target = normalize_angle(target);
        self.from = self.displayed;
        self.delta = shortest_delta(self.displayed, target);
        self.target = target;

        if self.duration.is_zero() || self.delta == 0.0 {
            self.displayed = target;
            self.elapsed = self.duration;
        } else {
            self.elapsed = Duration::ZERO;
        }
    }

    /// Advances by one frame. Returns whether the hand is still moving.
    pub fn advance(&mut self, dt: Duration) -> bool {
        if !self.is_animating() {
            return false;
        }

        self.elapsed = (self.elapsed + dt).min(self.duration);
        if !self.is_animating() {
            self.displayed = self.target;
            return false;
        }

        let t = self.elapsed.as_secs_f64() / self.duration.as_secs_f64();
        self.displayed = normalize_angle(self.from + self.delta * smoothstep(t));
        true
    }
}

fn smoothstep(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// The three animated hands of a clock face.
#[derive(Debug, Clone, PartialEq)]
pub struct ClockHands {
    hour: HandAnimator,
    minute: HandAnimator,
    second: HandAnimator,
}

impl ClockHands {
    /// All hands start at 12 o'clock.
    pub fn new(duration: Duration) -> Self {
        Self {
            hour: HandAnimator::new(0.0, duration),
            minute: HandAnimator::new(0.0, duration),
            second: HandAnimator::new(0.0, duration),
        }
    }

    pub fn retarget(&mut self, angles: &HandAngles) {
        for hand in Hand::ALL {
            self.hand_mut(hand).set_target(angles.get(hand));
        }
    }

    /// Advances every hand. Returns whether any hand is still moving.
    pub fn advance(&mut self, dt: Duration) -> bool {
        // Non-short-circuiting so all three hands step this frame.
        self.hour.advance(dt) | self.minute.advance(dt) | self.second.advance(dt)
    }

    pub fn is_animating(&self) -> bool {
        Hand::ALL.iter().any(|&h| self.hand(h).is_animating())
    }

    /// Angles as currently drawn.
    pub fn displayed(&self) -> HandAngles {
        HandAngles {
            hour: self.hour.angle(),
            minute: self.minute.angle(),
            second: self.second.angle(),
        }
    }

    pub fn hand(&self, hand: Hand) -> &HandAnimator {
        match hand {
            Hand::Hour => &self.hour,
            Hand::Minute => &self.minute,
            Hand::Second => &self.second,
        }
    }

    fn hand_mut(&mut self, hand: Hand) -> &mut HandAnimator {
        match hand {
            Hand::Hour => &mut self.hour,
            Hand::Minute => &mut self.minute,
            Hand::Second => &mut self.second,
        }
    }
}
