use crate::coords::Viewport;
use crate::paint::Color;

/// What a renderer needs to upload and build pipelines for one frame.
pub struct RenderCtx<'a> {
    pub device: &'a wgpu::Device,
    pub queue: &'a wgpu::Queue,
    /// Pipelines must target this format.
    pub surface_format: wgpu::TextureFormat,
    /// Logical px.
    pub viewport: Viewport,
    /// Physical pixels per logical pixel.
    pub scale_factor: f32,
}

/// The swapchain view of the current frame and the encoder recording into it.
///
/// Every renderer records its own pass here, so later renderers paint on top.
pub struct RenderTarget<'a> {
    pub encoder: &'a mut wgpu::CommandEncoder,
    pub color_view: &'a wgpu::TextureView,
}

impl RenderTarget<'_> {
    /// Fills the whole target with `color`.
    pub(crate) fn clear(&mut self, color: Color) {
        drop(self.color_pass("horologe clear", wgpu::LoadOp::Clear(color.to_wgpu())));
    }

    /// Begins a pass that draws over what earlier passes left in the target.
    pub(crate) fn begin_overlay_pass(&mut self, label: &str) -> wgpu::RenderPass<'_> {
        self.color_pass(label, wgpu::LoadOp::Load)
    }

    fn color_pass(&mut self, label: &str, load: wgpu::LoadOp<wgpu::Color>) -> wgpu::RenderPass<'_> {
        let attachment = wgpu::RenderPassColorAttachment {
            view: self.color_view,
            resolve_target: None,
            ops: wgpu::Operations { load, store: wgpu::StoreOp::Store },
            depth_slice: None,
        };
        self.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some(label),
            color_attachments: &[Some(attachment)],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        })
    }
}
