//! Window + runtime loop.
//!
//! Owns the `winit` EventLoop and the single clock window, and wires them to
//! the GPU layer and the application's timers.

mod runtime;

pub use runtime::{Runtime, RuntimeConfig};
