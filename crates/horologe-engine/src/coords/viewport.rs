use super::Vec2;

/// Viewport size in logical pixels.
///
/// Renderers use this as the basis for converting logical px positions to NDC.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite()
    }

    #[inline]
    pub fn center(self) -> Vec2 {
        Vec2::new(self.width * 0.5, self.height * 0.5)
    }

    /// Uniform payload for shaders; never zero so the NDC divide stays finite.
    #[inline]
    pub(crate) fn shader_size(self) -> [f32; 2] {
        [self.width.max(1.0), self.height.max(1.0)]
    }
}
