//! What the runtime expects from the application it drives.
//!
//! The runtime owns the window and the event loop; the clock plugs in through
//! [`App`] and draws through [`FrameCtx`].

mod app;
mod ctx;

pub use app::{App, AppControl};
pub use ctx::{FrameCtx, WindowCtx};
