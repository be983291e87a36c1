//! The clock window's GPU: device setup, swapchain configuration and the
//! acquire/present cycle of each frame.

mod gpu;
mod surface;

pub use gpu::{Gpu, GpuFrame, GpuInit};
pub use surface::SurfaceErrorAction;
