//! Frame timing.
//!
//! One `FrameClock` per window; call `tick()` once per presented frame and feed
//! `FrameTime::dt` to whatever animates.

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
