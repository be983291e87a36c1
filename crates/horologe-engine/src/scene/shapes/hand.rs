//! Clock hands: solid bars rotated about a pivot.

use crate::coords::Vec2;
use crate::paint::Color;
use crate::scene::{DrawCmd, DrawList, ZIndex};

/// A bar of `size` (`x` = width, `y` = length) drawn pointing at 12 o'clock,
/// then rotated clockwise by `angle` radians about `pivot`.
///
/// `anchor` is the pivot's position inside the unrotated bar in unit
/// coordinates: `(0.5, 0.0)` is the middle of the tip, `(0.5, 1.0)` the middle of
/// the tail.
#[derive(Debug, Clone, PartialEq)]
pub struct HandCmd {
    pub pivot: Vec2,
    pub size: Vec2,
    pub anchor: Vec2,
    pub angle: f32,
    pub color: Color,
}

impl HandCmd {
    /// Maps a unit-square point of the bar to logical pixels.
    ///
    /// The hand shader performs the same transform per vertex.
    pub fn point(&self, unit: Vec2) -> Vec2 {
        let local = Vec2::new(
            (unit.x - self.anchor.x) * self.size.x,
            (unit.y - self.anchor.y) * self.size.y,
        );
        self.pivot + local.rotated(self.angle)
    }

    /// Middle of the tip edge.
    pub fn tip(&self) -> Vec2 {
        self.point(Vec2::new(0.5, 0.0))
    }

    /// Corners clockwise from the top-left of the unrotated bar.
    pub fn corners(&self) -> [Vec2; 4] {
        [
            self.point(Vec2::new(0.0, 0.0)),
            self.point(Vec2::new(1.0, 0.0)),
            self.point(Vec2::new(1.0, 1.0)),
            self.point(Vec2::new(0.0, 1.0)),
        ]
    }
}

impl DrawList {
    /// Records a clock hand.
    #[inline]
    pub fn push_hand(&mut self, z: ZIndex, hand: HandCmd) {
        self.push(z, DrawCmd::Hand(hand));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, PI};

    fn hand(angle: f32) -> HandCmd {
        HandCmd {
            pivot: Vec2::new(100.0, 100.0),
            size: Vec2::new(10.0, 100.0),
            anchor: Vec2::new(0.5, 0.9),
            angle,
            color: Color::BLACK,
        }
    }

    fn close(a: Vec2, b: Vec2) -> bool {
        (a - b).length() < 1e-3
    }

    #[test]
    fn pivot_is_fixed_under_rotation() {
        for angle in [0.0, 1.0, PI, 5.5] {
            let h = hand(angle);
            assert!(close(h.point(h.anchor), h.pivot));
        }
    }

    #[test]
    fn unrotated_hand_points_up() {
        assert!(close(hand(0.0).tip(), Vec2::new(100.0, 10.0)));
    }

    #[test]
    fn quarter_turn_points_at_three() {
        assert!(close(hand(FRAC_PI_2).tip(), Vec2::new(190.0, 100.0)));
    }

    #[test]
    fn tail_overhangs_pivot() {
        // The tenth of the bar below the anchor sticks out past the pivot.
        let h = hand(PI);
        let tail = h.point(Vec2::new(0.5, 1.0));
        assert!(close(tail, Vec2::new(100.0, 90.0)));
        assert!(close(h.tip(), Vec2::new(100.0, 190.0)));
    }

    #[test]
    fn corners_keep_bar_dimensions() {
        let c = hand(0.7).corners();
        assert!(((c[1] - c[0]).length() - 10.0).abs() < 1e-3);
        assert!(((c[3] - c[0]).length() - 100.0).abs() < 1e-3);
    }
}
