pub mod circle;
pub mod hand;
pub mod text;

use crate::paint::Color;

/// Stroke drawn along the outer edge of a shape.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Border {
    pub width: f32,
    pub color: Color,
}

impl Border {
    #[inline]
    pub fn new(width: f32, color: Color) -> Self {
        Self { width, color }
    }
}
