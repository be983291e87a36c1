use anyhow::{Context, Result};
use wgpu::SurfaceError;
use winit::dpi::PhysicalSize;
use winit::window::Window;

use super::surface::{choose_alpha_mode, choose_surface_format, SurfaceErrorAction};

/// What the clock asks of the GPU when the window opens.
#[derive(Debug, Clone)]
pub struct GpuInit {
    pub srgb: bool,
    /// Fifo paces redraws to vsync, which is all a clock needs.
    pub present_mode: wgpu::PresentMode,
    /// Ignored when the surface does not offer it.
    pub alpha_mode: Option<wgpu::CompositeAlphaMode>,
    pub features: wgpu::Features,
    pub limits: wgpu::Limits,
    pub frame_latency: u32,
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            srgb: true,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: None,
            features: wgpu::Features::empty(),
            limits: wgpu::Limits::downlevel_webgl2_defaults(),
            frame_latency: 2,
        }
    }
}

/// Device, queue and the swapchain of the clock window.
///
/// `'w` is the window borrow held by the surface. The runtime stores the
/// window and this value side by side in one self-referencing entry.
pub struct Gpu<'w> {
    surface: wgpu::Surface<'w>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    /// Zero while the window is minimized; the surface keeps its last extent.
    window_size: PhysicalSize<u32>,
}

/// One swapchain image plus the encoder recording into it.
///
/// Hand it back through [`Gpu::submit`] in the same frame; an unreturned
/// texture stalls the next acquire.
pub struct GpuFrame {
    pub surface_texture: wgpu::SurfaceTexture,
    pub view: wgpu::TextureView,
    pub encoder: wgpu::CommandEncoder,
}

/// Surface extent for a window size, `None` when there is nothing to draw on.
fn drawable_extent(size: PhysicalSize<u32>) -> Option<(u32, u32)> {
    (size.width > 0 && size.height > 0).then_some((size.width, size.height))
}

async fn open_device(adapter: &wgpu::Adapter, init: &GpuInit) -> Result<(wgpu::Device, wgpu::Queue)> {
    let descriptor = wgpu::DeviceDescriptor {
        label: Some("horologe device"),
        required_features: init.features,
        required_limits: init.limits.clone().using_resolution(adapter.limits()),
        experimental_features: wgpu::ExperimentalFeatures::disabled(),
        memory_hints: wgpu::MemoryHints::MemoryUsage,
        trace: wgpu::Trace::Off,
    };
    adapter
        .request_device(&descriptor)
        .await
        .context("GPU adapter refused to open a device")
}

impl<'w> Gpu<'w> {
    pub async fn new(window: &'w Window, init: GpuInit) -> Result<Self> {
        let window_size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
        let surface = instance
            .create_surface(window)
            .context("cannot create a surface for the clock window")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                force_fallback_adapter: false,
                compatible_surface: Some(&surface),
            })
            .await
            .context("no GPU adapter can present to the clock window")?;
        log::info!("using adapter {:?}", adapter.get_info().name);

        let (device, queue) = open_device(&adapter, &init).await?;

        let caps = surface.get_capabilities(&adapter);
        let format = choose_surface_format(&caps, init.srgb)
            .context("surface reports no texture formats")?;
        // Some platforms report 0x0 before the first resize.
        let (width, height) = drawable_extent(window_size).unwrap_or((1, 1));

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: init.present_mode,
            alpha_mode: choose_alpha_mode(&caps, init.alpha_mode),
            view_formats: Vec::new(),
            desired_maximum_frame_latency: init.frame_latency,
        };
        surface.configure(&device, &config);

        Ok(Self { surface, device, queue, config, window_size })
    }

    #[inline]
    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    #[inline]
    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    #[inline]
    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    /// Follows the window to `new_size`. A minimized window leaves the surface alone.
    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        self.window_size = new_size;
        let Some((width, height)) = drawable_extent(new_size) else { return };

        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
    }

    pub fn begin_frame(&self) -> std::result::Result<GpuFrame, SurfaceError> {
        let surface_texture = self.surface.get_current_texture()?;
        let view = surface_texture.texture.create_view(&Default::default());
        let encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("horologe frame"),
        });

        Ok(GpuFrame { surface_texture, view, encoder })
    }

    /// Submits what the frame recorded and shows it.
    pub fn submit(&self, frame: GpuFrame) {
        let GpuFrame { surface_texture, view, encoder } = frame;
        self.queue.submit([encoder.finish()]);
        drop(view);
        surface_texture.present();
    }

    /// Recovers from `err` where possible and says what the caller should do.
    pub fn handle_surface_error(&mut self, err: SurfaceError) -> SurfaceErrorAction {
        let action = SurfaceErrorAction::for_error(&err);
        match action {
            SurfaceErrorAction::Reconfigure => {
                if drawable_extent(self.window_size).is_some() {
                    self.surface.configure(&self.device, &self.config);
                }
                log::debug!("surface {err}; reconfigured");
            }
            SurfaceErrorAction::SkipFrame => log::debug!("surface {err}; frame skipped"),
            SurfaceErrorAction::Fatal => log::error!("surface {err}; giving up"),
        }
        action
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimized_window_has_no_extent() {
        assert_eq!(drawable_extent(PhysicalSize::new(0, 0)), None);
        assert_eq!(drawable_extent(PhysicalSize::new(640, 0)), None);
        assert_eq!(drawable_extent(PhysicalSize::new(640, 720)), Some((640, 720)));
    }

    #[test]
    fn default_init_targets_modest_hardware() {
        let init = GpuInit::default();
        assert!(init.srgb);
        assert_eq!(init.present_mode, wgpu::PresentMode::Fifo);
        assert!(init.features.is_empty());
        assert_eq!(
            init.limits.max_texture_dimension_2d,
            wgpu::Limits::downlevel_webgl2_defaults().max_texture_dimension_2d
        );
    }
}
