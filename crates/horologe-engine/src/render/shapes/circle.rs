use bytemuck::{Pod, Zeroable};

use crate::render::{RenderCtx, RenderTarget};
use crate::scene::shapes::circle::CircleCmd;
use crate::scene::{DrawCmd, DrawList};

use super::common::{
    create_quad_pipeline, create_viewport_ubo, draw_quads, viewport_layout_entry,
    write_viewport_ubo, InstanceBuffer, StaticQuad,
};

const LABEL: &str = "horologe circle";

/// Renderer for `DrawCmd::Circle`.
///
/// Edges are antialiased over one logical pixel in the fragment shader; the
/// border is a ring just inside the radius.
#[derive(Default)]
pub struct CircleRenderer {
    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,
    bind_group: Option<wgpu::BindGroup>,
    viewport_ubo: Option<wgpu::Buffer>,

    quad: Option<StaticQuad>,
    instances: InstanceBuffer,
    scratch: Vec<CircleInstance>,
}

impl CircleRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        draw_list: &mut DrawList,
    ) {
        self.scratch.clear();
        self.scratch.extend(draw_list.iter_in_paint_order().filter_map(|item| match &item.cmd {
            DrawCmd::Circle(cmd) => CircleInstance::from_cmd(cmd),
            _ => None,
        }));

        if self.scratch.is_empty() {
            return;
        }

        self.ensure_pipeline(ctx);

        let instances = self.instances.upload(ctx, "horologe circle instances", &self.scratch);
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

        let mut rpass = target.begin_overlay_pass("horologe circle pass");
        draw_quads(&mut rpass, pipeline, bind_group, quad, instance_vbo, self.scratch.len() as u32);
    }

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>) {
        if self.quad.is_none() {
            self.quad = Some(StaticQuad::new(ctx, LABEL));
        }
        if self.pipeline_format == Some(ctx.surface_format) && self.pipeline.is_some() {
            return;
        }

        let bgl = ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("horologe circle bgl"),
            entries: &[viewport_layout_entry()],
        });
        let ubo = create_viewport_ubo(ctx, "horologe circle viewport ubo");
        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("horologe circle bind group"),
            layout: &bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: ubo.as_entire_binding(),
            }],
        });

        self.pipeline = Some(create_quad_pipeline(
            ctx,
            LABEL,
            include_str!("shaders/circle.wgsl"),
            &bgl,
            CircleInstance::layout(),
        ));
        self.pipeline_format = Some(ctx.surface_format);
        self.bind_group = Some(bind_group);
        self.viewport_ubo = Some(ubo);
    }
}

// ── GPU types ─────────────────────────────────────────────────────────────

/// Instance data layout (48 bytes):
///
///  offset  0  center        [f32; 2]   loc 1
///  offset  8  radius_bw     [f32; 2]   loc 2  (.x = radius, .y = border width)
///  offset 16  fill          [f32; 4]   loc 3
///  offset 32  border_color  [f32; 4]   loc 4
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
struct CircleInstance {
    center: [f32; 2],
    radius_bw: [f32; 2],
    fill: [f32; 4],
    border_color: [f32; 4],
}

impl CircleInstance {
    const ATTRS: [wgpu::VertexAttribute; 4] = wgpu::vertex_attr_array![
        1 => Float32x2, // center
        2 => Float32x2, // radius_bw
        3 => Float32x4, // fill
        4 => Float32x4  // border_color
    ];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<CircleInstance>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRS,
        }
    }

    /// `None` for circles with nothing to draw.
    fn from_cmd(cmd: &CircleCmd) -> Option<Self> {
        if cmd.radius.is_nan() || cmd.radius <= 0.0 || !cmd.center.is_finite() {
            return None;
        }

        let (border_width, border_color) = match cmd.border {
            Some(b) => (b.width.clamp(0.0, cmd.radius), b.color.to_array()),
            None => (0.0, [0.0; 4]),
        };

        Some(Self {
            center: [cmd.center.x, cmd.center.y],
            radius_bw: [cmd.radius, border_width],
            fill: cmd.fill.to_array(),
            border_color,
        })
    }
}
