use std::collections::HashMap;

use bytemuck::{Pod, Zeroable};
use fontdue::layout::{CoordinateSystem, GlyphRasterConfig, Layout, LayoutSettings, TextStyle};

use crate::render::{RenderCtx, RenderTarget};
use crate::scene::{DrawCmd, DrawList};
use crate::text::FontSystem;

use super::common::{
    create_quad_pipeline, create_viewport_ubo, draw_quads, viewport_layout_entry,
    write_viewport_ubo, InstanceBuffer, StaticQuad,
};

const ATLAS_SIZE: u32 = 1024;
const GLYPH_PADDING: u32 = 1;

struct CachedGlyph {
    uv_min: [f32; 2],
    uv_max: [f32; 2],
}

/// Renderer for `DrawCmd::Text`.
///
/// Glyphs are rasterized by fontdue at physical pixel size on first use and
/// packed into an R8 atlas that lives as long as the renderer. The cache key
/// (`GlyphRasterConfig`) covers font, glyph and pixel size, so the digits the
/// clock redraws every second are rasterized once.
pub struct TextRenderer {
    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,
    bind_group: Option<wgpu::BindGroup>,
    viewport_ubo: Option<wgpu::Buffer>,

    atlas: Option<wgpu::Texture>,
    packer: ShelfPacker,
    glyph_cache: HashMap<GlyphRasterConfig, CachedGlyph>,

    quad: Option<StaticQuad>,
    instances: InstanceBuffer,
    scratch: Vec<GlyphInstance>,

    layout: Layout<()>,
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self {
            pipeline_format: None,
            pipeline: None,
            bind_group: None,
            viewport_ubo: None,
            atlas: None,
            packer: ShelfPacker::new(ATLAS_SIZE, GLYPH_PADDING),
            glyph_cache: HashMap::new(),
            quad: None,
            instances: InstanceBuffer::default(),
            scratch: Vec::new(),
            layout: Layout::new(CoordinateSystem::PositiveYDown),
        }
    }
}

impl TextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        draw_list: &mut DrawList,
        font_system: &FontSystem,
    ) {
        self.ensure_resources(ctx);
        self.scratch.clear();

        // Layout happens at physical size so glyph bitmaps map 1:1 to pixels.
        let scale = ctx.scale_factor.max(0.01);

        for item in draw_list.iter_in_paint_order() {
            let DrawCmd::Text(cmd) = &item.cmd else { continue };
            let Some(font) = font_system.get(cmd.font) else {
                log::warn!("unknown {:?}, text skipped", cmd.font);
                continue;
            };

            self.layout.reset(&LayoutSettings {
                x: cmd.origin.x * scale,
                y: cmd.origin.y * scale,
                ..LayoutSettings::default()
            });
            self.layout.append(&[font], &TextStyle::new(&cmd.text, cmd.size * scale, 0));

            let color = cmd.color.to_array();
            for g in self.layout.glyphs() {
                if !g.char_data.rasterize() || g.width == 0 || g.height == 0 {
                    continue;
                }

                if !self.glyph_cache.contains_key(&g.key) {
                    let (metrics, bitmap) = font.rasterize_config(g.key);
                    let placed = place_glyph(
                        ctx,
                        self.atlas.as_ref(),
                        &mut self.packer,
                        &bitmap,
                        metrics.width as u32,
                        metrics.height as u32,
                    );
                    match placed {
                        Some(entry) => {
                            self.glyph_cache.insert(g.key, entry);
                        }
                        None => continue,
                    }
                }
                let Some(cached) = self.glyph_cache.get(&g.key) else { continue };

                self.scratch.push(GlyphInstance {
                    dst_min: [g.x / scale, g.y / scale],
                    dst_max: [(g.x + g.width as f32) / scale, (g.y + g.height as f32) / scale],
                    uv_min: cached.uv_min,
                    uv_max: cached.uv_max,
                    color,
                });
            }
        }

        if self.scratch.is_empty() {
            return;
        }

        let instances = self.instances.upload(ctx, "horologe glyph instances", &self.scratch);
        let Some(instance_vbo) = instances else { return };
        let (Some(pipeline), Some(bind_group), Some(ubo), Some(quad)) = (
            self.pipeline.as_ref(),
            self.bind_group.as_ref(),
            self.viewport_ubo.as_ref(),
            self.quad.as_ref(),
        ) else {
            return;
        };

        write_viewport_ubo(ctx, ubo);

        let mut rpass = target.begin_overlay_pass("horologe text pass");
        draw_quads(&mut rpass, pipeline, bind_group, quad, instance_vbo, self.scratch.len() as u32);
    }

    // ── lazy-init ──────────────────────────────────────────────────────────

    fn ensure_resources(&mut self, ctx: &RenderCtx<'_>) {
        if self.quad.is_none() {
            self.quad = Some(StaticQuad::new(ctx, "horologe text"));
        }
        if self.atlas.is_none() {
            self.atlas = Some(create_atlas(ctx));
            self.packer = ShelfPacker::new(ATLAS_SIZE, GLYPH_PADDING);
            self.glyph_cache.clear();
            self.pipeline_format = None;
        }
        if self.pipeline_format == Some(ctx.surface_format) && self.pipeline.is_some() {
            return;
        }
        let Some(atlas) = self.atlas.as_ref() else { return };

        let bgl = ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("horologe text bgl"),
            entries: &[
                viewport_layout_entry(),
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let atlas_view = atlas.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = ctx.device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("horologe text sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::MipmapFilterMode::Nearest,
            ..Default::default()
        });
        let ubo = create_viewport_ubo(ctx, "horologe text viewport ubo");

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("horologe text bind group"),
            layout: &bgl,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: ubo.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&atlas_view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
            ],
        });

        self.pipeline = Some(create_quad_pipeline(
            ctx,
            "horologe text",
            include_str!("shaders/text.wgsl"),
            &bgl,
            GlyphInstance::layout(),
        ));
        self.pipeline_format = Some(ctx.surface_format);
        self.bind_group = Some(bind_group);
        self.viewport_ubo = Some(ubo);
    }
}

fn create_atlas(ctx: &RenderCtx<'_>) -> wgpu::Texture {
    ctx.device.create_texture(&wgpu::TextureDescriptor {
        label: Some("horologe glyph atlas"),
        size: wgpu::Extent3d {
            width: ATLAS_SIZE,
            height: ATLAS_SIZE,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::R8Unorm,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    })
}

/// Copies a glyph bitmap into the atlas. `None` when it does not fit.
fn place_glyph(
    ctx: &RenderCtx<'_>,
    atlas: Option<&wgpu::Texture>,
    packer: &mut ShelfPacker,
    bitmap: &[u8],
    w: u32,
    h: u32,
) -> Option<CachedGlyph> {
    let atlas = atlas?;
    if w == 0 || h == 0 {
        return None;
    }
    let Some((x, y)) = packer.place(w, h) else {
        log::warn!("glyph atlas full ({ATLAS_SIZE}x{ATLAS_SIZE}); glyph dropped");
        return None;
    };

    ctx.queue.write_texture(
        wgpu::TexelCopyTextureInfo {
            texture: atlas,
            mip_level: 0,
            origin: wgpu::Origin3d { x, y, z: 0 },
            aspect: wgpu::TextureAspect::All,
        },
        bitmap,
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(w),
            rows_per_image: Some(h),
        },
        wgpu::Extent3d { width: w, height: h, depth_or_array_layers: 1 },
    );

    let size = packer.size as f32;
    Some(CachedGlyph {
        uv_min: [x as f32 / size, y as f32 / size],
        uv_max: [(x + w) as f32 / size, (y + h) as f32 / size],
    })
}

/// Row-by-row ("shelf") rectangle packer for the glyph atlas.
#[derive(Debug)]
struct ShelfPacker {
    size: u32,
    padding: u32,
    cursor_x: u32,
    cursor_y: u32,
    row_height: u32,
    full: bool,
}

impl ShelfPacker {
    fn new(size: u32, padding: u32) -> Self {
        Self {
            size,
            padding,
            cursor_x: padding,
            cursor_y: padding,
            row_height: 0,
            full: false,
        }
    }

    /// Reserves a `w` x `h` slot and returns its top-left corner.
    fn place(&mut self, w: u32, h: u32) -> Option<(u32, u32)> {
        if self.full {
            return None;
        }

        if self.cursor_x + w + self.padding > self.size {
            self.cursor_y += self.row_height + self.padding;
            self.cursor_x = self.padding;
            self.row_height = 0;
        }

        if self.cursor_x + w + self.padding > self.size || self.cursor_y + h + self.padding > self.size {
            self.full = true;
            return None;
        }

        let slot = (self.cursor_x, self.cursor_y);
        self.cursor_x += w + self.padding;
        self.row_height = self.row_height.max(h);
        Some(slot)
    }
}

/// Instance data layout (48 bytes):
///
///  offset  0  dst_min  [f32; 2]   loc 1
///  offset  8  dst_max  [f32; 2]   loc 2
///  offset 16  uv_min   [f32; 2]   loc 3
///  offset 24  uv_max   [f32; 2]   loc 4
///  offset 32  color    [f32; 4]   loc 5
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct GlyphInstance {
    dst_min: [f32; 2],
    dst_max: [f32; 2],
    uv_min: [f32; 2],
    uv_max: [f32; 2],
    color: [f32; 4],
}

impl GlyphInstance {
    const ATTRS: [wgpu::VertexAttribute; 5] = wgpu::vertex_attr_array![
        1 => Float32x2, // dst_min
        2 => Float32x2, // dst_max
        3 => Float32x2, // uv_min
        4 => Float32x2, // uv_max
        5 => Float32x4  // color
    ];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<GlyphInstance>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packer_fills_rows_left_to_right() {
        let mut p = ShelfPacker::new(32, 1);
        assert_eq!(p.place(10, 5), Some((1, 1)));
        assert_eq!(p.place(10, 8), Some((12, 1)));
        // 23 + 10 + 1 > 32: wraps below the tallest glyph of the row.
        assert_eq!(p.place(10, 4), Some((1, 10)));
    }

    #[test]
    fn packer_reports_full_and_stays_full() {
        let mut p = ShelfPacker::new(16, 1);
        assert_eq!(p.place(14, 14), Some((1, 1)));
        assert_eq!(p.place(14, 14), None);
        assert_eq!(p.place(1, 1), None);
    }

    #[test]
    fn oversized_glyph_is_rejected() {
        let mut p = ShelfPacker::new(16, 1);
        assert_eq!(p.place(20, 2), None);
    }
}
