//! Presentation side of the clock: what the face shows right now.

use std::time::Duration;

use horologe_core::{ClockError, ClockHands, ClockReading, HandAngles, PresentationSink};

/// Receives clock readings and turns them into animated hand angles and a label.
///
/// Every reading is absolute: hands are retargeted to the new angles and the
/// label is replaced, independent of what was shown before.
#[derive(Debug)]
pub struct FacePresenter {
    hands: ClockHands,
    label: String,
    dirty: bool,
    unavailable: bool,
}

impl FacePresenter {
    pub fn new(animation: Duration) -> Self {
        Self {
            hands: ClockHands::new(animation),
            label: String::new(),
            dirty: true,
            unavailable: false,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Hand angles to draw this frame.
    pub fn displayed_angles(&self) -> HandAngles {
        self.hands.displayed()
    }

    /// The last tick could not read the clock; the face shows the previous reading.
    pub fn is_stale(&self) -> bool {
        self.unavailable
    }

    /// Steps hand animations by one frame.
    pub fn advance(&mut self, dt: Duration) {
        self.hands.advance(dt);
    }

    pub fn needs_redraw(&self) -> bool {
        self.dirty || self.hands.is_animating()
    }

    /// Marks the current state as on screen.
    pub fn mark_drawn(&mut self) {
        self.dirty = false;
    }
}

impl PresentationSink for FacePresenter {
    fn present(&mut self, reading: &ClockReading) {
        self.hands.retarget(&reading.angles);
        if self.label != reading.text {
            self.label.clone_from(&reading.text);
        }
        self.unavailable = false;
        self.dirty = true;
        log::trace!("presented {}", reading.text);
    }

    fn clock_unavailable(&mut self, err: &ClockError) {
        if !self.unavailable {
            log::warn!("clock unavailable, keeping last reading: {err}");
            // The label is repainted dimmed.
            self.dirty = true;
        }
        self.unavailable = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use horologe_core::{TextStyle, WallClockTime};
    use std::f64::consts::PI;

    const MS: Duration = Duration::from_millis(1);

    fn reading(h: u32, m: u32, s: u32) -> ClockReading {
        ClockReading::new(WallClockTime::new(h, m, s).unwrap(), TextStyle::Legacy)
    }

    #[test]
    fn reading_sets_label_and_starts_animation() {
        let mut p = FacePresenter::new(100 * MS);
        p.present(&reading(6, 0, 0));
        assert_eq!(p.label(), "6 :0 :0 ");
        assert!(p.needs_redraw());

        p.advance(100 * MS);
        assert!((p.displayed_angles().hour - PI).abs() < 1e-9);
    }

    #[test]
    fn settles_once_drawn_and_animated() {
        let mut p = FacePresenter::new(100 * MS);
        p.present(&reading(0, 0, 30));
        p.advance(150 * MS);
        p.mark_drawn();
        assert!(!p.needs_redraw());
    }

    #[test]
    fn zero_duration_jumps_to_target() {
        let mut p = FacePresenter::new(Duration::ZERO);
        p.present(&reading(0, 0, 30));
        assert!((p.displayed_angles().second - PI).abs() < 1e-9);
    }

    #[test]
    fn unavailable_clock_keeps_previous_face() {
        let mut p = FacePresenter::new(Duration::ZERO);
        p.present(&reading(3, 30, 0));
        p.mark_drawn();

        p.clock_unavailable(&ClockError::ClockUnavailable("gone".into()));
        assert!(p.is_stale());
        assert_eq!(p.label(), "3 :30 :0 ");
        assert!(p.needs_redraw(), "dimmed label must reach the screen");

        // Repeated failures do not keep the window redrawing.
        p.mark_drawn();
        p.clock_unavailable(&ClockError::ClockUnavailable("gone".into()));
        assert!(!p.needs_redraw());

        p.present(&reading(3, 30, 1));
        assert!(!p.is_stale());
    }
}
