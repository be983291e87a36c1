use winit::window::{Window, WindowId};

use crate::coords::Viewport;
use crate::device::{Gpu, GpuFrame, SurfaceErrorAction};
use crate::paint::Color;
use crate::render::{RenderCtx, RenderTarget};
use crate::time::FrameTime;

use super::app::AppControl;

/// The clock window as seen from a frame callback.
pub struct WindowCtx<'a> {
    pub id: WindowId,
    pub window: &'a Window,
}

impl WindowCtx<'_> {
    /// Inner size in logical pixels.
    pub fn viewport(&self) -> Viewport {
        let logical: winit::dpi::LogicalSize<f64> =
            self.window.inner_size().to_logical(self.window.scale_factor());
        Viewport::new(logical.width as f32, logical.height as f32)
    }

    fn scale_factor(&self) -> f32 {
        self.window.scale_factor() as f32
    }
}

/// Everything [`App::on_frame`](super::App::on_frame) may touch while drawing.
///
/// `'w` is the window borrow inside [`Gpu`]; `'a` only lasts for the callback.
pub struct FrameCtx<'a, 'w> {
    pub window: WindowCtx<'a>,
    pub gpu: &'a mut Gpu<'w>,
    pub time: FrameTime,
}

impl FrameCtx<'_, '_> {
    /// Draws one frame on a background of `clear` and presents it.
    ///
    /// A collapsed window or a lost swapchain image skips the frame. Only a
    /// fatal surface error returns [`AppControl::Exit`].
    pub fn render<F>(&mut self, clear: Color, draw: F) -> AppControl
    where
        F: FnOnce(&RenderCtx<'_>, &mut RenderTarget<'_>),
    {
        let viewport = self.window.viewport();
        if !viewport.is_valid() {
            return AppControl::Continue;
        }

        let mut frame = match self.acquire() {
            Ok(frame) => frame,
            Err(control) => return control,
        };

        let rctx = RenderCtx {
            device: self.gpu.device(),
            queue: self.gpu.queue(),
            surface_format: self.gpu.surface_format(),
            viewport,
            scale_factor: self.window.scale_factor(),
        };
        let mut target = RenderTarget { encoder: &mut frame.encoder, color_view: &frame.view };
        target.clear(clear);
        draw(&rctx, &mut target);

        self.window.window.pre_present_notify();
        self.gpu.submit(frame);
        AppControl::Continue
    }

    fn acquire(&mut self) -> Result<GpuFrame, AppControl> {
        self.gpu.begin_frame().map_err(|err| match self.gpu.handle_surface_error(err) {
            SurfaceErrorAction::Fatal => AppControl::Exit,
            SurfaceErrorAction::Reconfigure | SurfaceErrorAction::SkipFrame => AppControl::Continue,
        })
    }
}
