use std::time::Instant;

use winit::event::WindowEvent;
use winit::window::WindowId;

use super::ctx::FrameCtx;

/// Whether the runtime keeps going after a callback.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// The application driven by [`Runtime`](crate::window::Runtime).
///
/// All callbacks run on the event loop thread, one at a time.
pub trait App {
    /// Called for every window event before the runtime handles it.
    fn on_window_event(&mut self, window_id: WindowId, event: &WindowEvent) -> AppControl {
        let _ = (window_id, event);
        AppControl::Continue
    }

    /// The window exists and the app is active.
    ///
    /// May be called again after a suspend/resume cycle.
    fn on_resumed(&mut self) {}

    /// Services timers due at `now` and returns the next wake-up deadline.
    ///
    /// Called whenever the event loop is about to sleep. `None` sleeps until
    /// the next platform event.
    fn poll_timers(&mut self, now: Instant) -> Option<Instant> {
        let _ = now;
        None
    }

    /// Whether another frame should be drawn now.
    fn needs_redraw(&self) -> bool {
        false
    }

    /// Called once per rendered frame.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl;

    /// Called once while the event loop shuts down.
    fn on_exit(&mut self) {}
}
