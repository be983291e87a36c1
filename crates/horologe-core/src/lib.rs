//! Clock logic for **horologe**: wall-clock sampling, hand angles, digital text,
//! single-threaded timers, and the one-second ticker that ties them together.
//!
//! Nothing in here touches a window or a GPU, so the whole crate runs under
//! plain `cargo test`.
//!
//! # Structure
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`time`] | `WallClockTime`, `TimeSource`, `LocalTimeSource`, `FixedTimeSource` |
//! | [`angles`] | `Hand`, `HandAngles`, angle normalization |
//! | [`format`] | `TextStyle`, `digital_time_text` |
//! | [`run_loop`] | `RunLoop`, `TimerHandle` |
//! | [`ticker`] | `ClockTicker`, `ClockReading`, `PresentationSink` |
//! | [`animation`] | `HandAnimator`, `ClockHands` |
//! | [`config`] | `ClockConfig` |
//! | [`error`] | `ClockError` |
//!
//! # Quick start
//!
//! ```rust
//! use std::{cell::RefCell, rc::Rc};
//! use horologe_core::{
//!     ClockConfig, ClockReading, ClockTicker, FixedTimeSource, PresentationSink, RunLoop,
//!     WallClockTime,
//! };
//!
//! #[derive(Default)]
//! struct Label(String);
//!
//! impl PresentationSink for Label {
//!     fn present(&mut self, reading: &ClockReading) {
//!         self.0 = reading.text.clone();
//!     }
//! }
//!
//! let run_loop = RunLoop::new();
//! let source = FixedTimeSource::new(WallClockTime::new(14, 30, 5).unwrap());
//! let mut ticker = ClockTicker::new(run_loop.clone(), source, ClockConfig::default());
//!
//! let label = Rc::new(RefCell::new(Label::default()));
//! ticker.start(&label).unwrap();
//! assert_eq!(label.borrow().0, "14 :30 :5 ");
//! ```

pub mod angles;
pub mod animation;
pub mod config;
pub mod error;
pub mod format;
pub mod run_loop;
pub mod ticker;
pub mod time;

pub use angles::{Hand, HandAngles};
pub use animation::{ClockHands, HandAnimator};
pub use config::ClockConfig;
pub use error::ClockError;
pub use format::{digital_time_text, TextStyle};
pub use run_loop::{RunLoop, TimerHandle, TimerId};
pub use ticker::{ClockReading, ClockTicker, PresentationSink, TickerState};
pub use time::{FixedTimeSource, LocalTimeSource, TimeSource, WallClockTime};
