//! Clock face geometry and painting.
//!
//! All sizes are logical pixels. The dial is centered in the viewport; the
//! digital label floats above it.

use horologe_core::{Hand, HandAngles};
use horologe_engine::coords::{Vec2, Viewport};
use horologe_engine::paint::Color;
use horologe_engine::scene::shapes::Border;
use horologe_engine::scene::shapes::hand::HandCmd;
use horologe_engine::scene::{DrawList, ZIndex};
use horologe_engine::text::{FontId, FontSystem};

pub const BACKGROUND: Color = Color::WHITE;

const DIAL_RADIUS: f32 = 100.0;
const DIAL_BORDER: f32 = 1.0;
const FACE_INSET: f32 = 3.0;
const FACE_COLOR: Color = Color::from_premul(1.0, 1.0, 0.0, 1.0);

const NUMERAL_SIZE: f32 = 20.0;
/// Distance from the center to the middle of each numeral.
const NUMERAL_RADIUS: f32 = 83.0;
const NUMERALS: [(&str, Vec2); 4] = [
    ("12", Vec2::new(0.0, -1.0)),
    ("3", Vec2::new(1.0, 0.0)),
    ("6", Vec2::new(0.0, 1.0)),
    ("9", Vec2::new(-1.0, 0.0)),
];

const LABEL_SIZE: f32 = 20.0;
/// Label color while the clock cannot be read.
const STALE_LABEL: Color = Color::from_premul(0.5, 0.5, 0.5, 1.0);
/// Gap between the bottom of the label and the top of the dial.
const LABEL_GAP: f32 = 20.0;

/// Pivot position inside every hand: centered, a tenth of the length from the tail.
pub const HAND_ANCHOR: Vec2 = Vec2::new(0.5, 0.9);

const DIAL_Z: ZIndex = ZIndex(0);
const TEXT_Z: ZIndex = DIAL_Z.above();
const HANDS_Z: ZIndex = TEXT_Z.above();

/// Width, length and color of a hand.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct HandStyle {
    pub width: f32,
    pub length: f32,
    pub color: Color,
}

impl HandStyle {
    pub const fn of(hand: Hand) -> Self {
        match hand {
            Hand::Hour => Self {
                width: 15.0,
                length: 80.0,
                color: Color::from_premul(1.0, 0.5, 0.0, 1.0),
            },
            Hand::Minute => Self {
                width: 10.0,
                length: 100.0,
                color: Color::from_premul(0.0, 0.0, 1.0, 1.0),
            },
            Hand::Second => Self {
                width: 5.0,
                length: 90.0,
                color: Color::from_premul(1.0, 0.0, 0.0, 1.0),
            },
        }
    }
}

/// Where the face sits in a viewport.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FaceLayout {
    pub center: Vec2,
    pub dial_radius: f32,
    pub face_radius: f32,
}

impl FaceLayout {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            center: viewport.center(),
            dial_radius: DIAL_RADIUS,
            face_radius: DIAL_RADIUS - FACE_INSET,
        }
    }

    pub fn dial_top(&self) -> f32 {
        self.center.y - self.dial_radius
    }

    /// Top-left origin that centers a block of `size` on `at`.
    fn centered_origin(at: Vec2, size: Vec2) -> Vec2 {
        at - size * 0.5
    }

    /// Top-left origin of the digital label, given its measured size.
    pub fn label_origin(&self, size: Vec2) -> Vec2 {
        Vec2::new(
            self.center.x - size.x * 0.5,
            self.dial_top() - LABEL_GAP - size.y,
        )
    }

    /// Middle of a numeral's text block; `direction` is a unit vector from the center.
    pub fn numeral_center(&self, direction: Vec2) -> Vec2 {
        self.center + direction * NUMERAL_RADIUS
    }

    pub fn hand(&self, hand: Hand, angle: f64) -> HandCmd {
        let style = HandStyle::of(hand);
        HandCmd {
            pivot: self.center,
            size: Vec2::new(style.width, style.length),
            anchor: HAND_ANCHOR,
            angle: angle as f32,
            color: style.color,
        }
    }
}

/// Font used for the numerals and the label.
#[derive(Clone, Copy)]
pub struct FaceText<'a> {
    pub fonts: &'a FontSystem,
    pub font: FontId,
}

/// Records the whole face into `list`: dial, numerals, label, then the hands
/// in hour, minute, second order.
///
/// Without a font the face is drawn without any text. A `stale` label is dimmed.
pub fn paint_face(
    list: &mut DrawList,
    layout: &FaceLayout,
    angles: &HandAngles,
    label: &str,
    stale: bool,
    text: Option<FaceText<'_>>,
) {
    list.push_circle(
        DIAL_Z,
        layout.center,
        layout.dial_radius,
        Color::WHITE,
        Some(Border::new(DIAL_BORDER, Color::BLACK)),
    );
    list.push_solid_circle(DIAL_Z, layout.center, layout.face_radius, FACE_COLOR);

    if let Some(FaceText { fonts, font }) = text {
        for (numeral, direction) in NUMERALS {
            let size = fonts.measure_text(numeral, font, NUMERAL_SIZE);
            let origin = FaceLayout::centered_origin(layout.numeral_center(direction), size);
            list.push_text(TEXT_Z, numeral, font, NUMERAL_SIZE, Color::BLACK, origin);
        }

        if !label.is_empty() {
            let size = fonts.measure_text(label, font, LABEL_SIZE);
            let color = if stale { STALE_LABEL } else { Color::BLACK };
            list.push_text(TEXT_Z, label, font, LABEL_SIZE, color, layout.label_origin(size));
        }
    }

    for hand in Hand::ALL {
        list.push_hand(HANDS_Z, layout.hand(hand, angles.get(hand)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use horologe_engine::scene::DrawCmd;
    use std::f64::consts::PI;

    fn layout() -> FaceLayout {
        FaceLayout::new(Viewport::new(320.0, 360.0))
    }

    #[test]
    fn dial_is_centered() {
        let l = layout();
        assert_eq!(l.center, Vec2::new(160.0, 180.0));
        assert_eq!(l.dial_top(), 80.0);
        assert_eq!(l.face_radius, 97.0);
    }

    #[test]
    fn label_sits_above_dial() {
        let l = layout();
        let size = Vec2::new(80.0, 24.0);
        let origin = l.label_origin(size);
        assert_eq!(origin.x + size.x * 0.5, l.center.x);
        assert_eq!(origin.y + size.y, l.dial_top() - 20.0);
    }

    #[test]
    fn numerals_are_symmetric_inside_face() {
        let l = layout();
        let centers: Vec<Vec2> = NUMERALS.iter().map(|&(_, d)| l.numeral_center(d)).collect();
        assert_eq!(centers[0], Vec2::new(160.0, 97.0));
        assert_eq!(centers[1], Vec2::new(243.0, 180.0));
        assert_eq!(centers[2], Vec2::new(160.0, 263.0));
        assert_eq!(centers[3], Vec2::new(77.0, 180.0));
        for c in centers {
            assert!((c - l.center).length() < l.face_radius);
        }
    }

    #[test]
    fn hands_pivot_at_center() {
        let l = layout();
        let hour = l.hand(Hand::Hour, PI);
        assert_eq!(hour.pivot, l.center);
        assert_eq!(hour.size, Vec2::new(15.0, 80.0));
        assert_eq!(hour.anchor, HAND_ANCHOR);
        assert_eq!(hour.angle, PI as f32);

        let minute = l.hand(Hand::Minute, 0.0);
        // 90 % of the length reaches past the pivot toward 12.
        assert!((minute.tip() - Vec2::new(160.0, 90.0)).length() < 1e-3);
    }

    #[test]
    fn paints_dial_then_hands_without_font() {
        let mut list = DrawList::new();
        let angles = HandAngles { hour: 1.0, minute: 2.0, second: 3.0 };
        paint_face(&mut list, &layout(), &angles, "14 :30 :5 ", false, None);

        let kinds: Vec<&str> = list
            .iter_in_paint_order()
            .map(|item| match &item.cmd {
                DrawCmd::Circle(_) => "circle",
                DrawCmd::Hand(_) => "hand",
                DrawCmd::Text(_) => "text",
            })
            .collect();
        assert_eq!(kinds, ["circle", "circle", "hand", "hand", "hand"]);
    }

    #[test]
    fn hands_paint_hour_minute_second() {
        let mut list = DrawList::new();
        let angles = HandAngles { hour: 1.0, minute: 2.0, second: 3.0 };
        paint_face(&mut list, &layout(), &angles, "", false, None);

        let widths: Vec<f32> = list
            .iter_in_paint_order()
            .filter_map(|item| match &item.cmd {
                DrawCmd::Hand(h) => Some(h.size.x),
                _ => None,
            })
            .collect();
        assert_eq!(widths, [15.0, 10.0, 5.0]);
    }

    #[test]
    fn inner_face_paints_over_dial() {
        let mut list = DrawList::new();
        paint_face(&mut list, &layout(), &HandAngles::default(), "", true, None);

        let radii: Vec<f32> = list
            .iter_in_paint_order()
            .filter_map(|item| match &item.cmd {
                DrawCmd::Circle(c) => Some(c.radius),
                _ => None,
            })
            .collect();
        assert_eq!(radii, [100.0, 97.0]);
    }
}
