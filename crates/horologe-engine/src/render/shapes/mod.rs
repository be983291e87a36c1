//! Shape renderers, one per `DrawCmd` variant.

mod common;

pub mod circle;
pub mod hand;
pub mod text;
