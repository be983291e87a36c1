//! Paint model shared between the face layout and renderers.
//!
//! Every shape on the clock is a flat fill, so a paint is just a [`Color`].

pub mod color;

pub use color::Color;
