//! Instanced renderers for the clock's circles, hands and text.
//!
//! A renderer owns its pipeline and buffers and picks its own commands out of
//! a [`DrawList`](crate::scene::DrawList). Positions stay in logical pixels
//! with +Y down until the shaders map them through the viewport uniform.
//! Every renderer records its own pass, so passes run in call order and z
//! only orders items within one shape kind.

mod ctx;
pub mod shapes;

pub use ctx::{RenderCtx, RenderTarget};
