//! Horologe engine crate.
//!
//! Owns the platform + GPU runtime the clock app draws through: the winit
//! event loop, the wgpu surface, a z-ordered draw list, and renderers for the
//! three shapes a clock face is made of (circles, hands, text).

pub mod coords;
pub mod core;
pub mod device;
pub mod logging;
pub mod paint;
pub mod render;
pub mod scene;
pub mod text;
pub mod time;
pub mod window;
