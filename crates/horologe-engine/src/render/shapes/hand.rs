use bytemuck::{Pod, Zeroable};

use crate::render::{RenderCtx, RenderTarget};
use crate::scene::shapes::hand::HandCmd;
use crate::scene::{DrawCmd, DrawList};

use super::common::{
    create_quad_pipeline, create_viewport_ubo, draw_quads, viewport_layout_entry,
    write_viewport_ubo, InstanceBuffer, StaticQuad,
};

/// Renderer for `DrawCmd::Hand`.
///
/// The rotation happens in the vertex shader; instances carry the pivot,
/// bar size, anchor and `(cos, sin)` of the angle.
#[derive(Default)]
pub struct HandRenderer {
    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,
    bind_group: Option<wgpu::BindGroup>,
    viewport_ubo: Option<wgpu::Buffer>,

    quad: Option<StaticQuad>,
    instances: InstanceBuffer,
    scratch: Vec<HandInstance>,
}

impl HandRenderer {
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
        for item in draw_list.iter_in_paint_order() {
            let DrawCmd::Hand(cmd) = &item.cmd else { continue };
            match HandInstance::from_cmd(cmd) {
                Some(inst) => self.scratch.push(inst),
                None => log::trace!("skipping degenerate hand {cmd:?}"),
            }
        }

        if self.scratch.is_empty() {
            return;
        }

        self.ensure_pipeline(ctx);

        let instances = self.instances.upload(ctx, "horologe hand instances", &self.scratch);
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

        let mut rpass = target.begin_overlay_pass("horologe hand pass");
        draw_quads(&mut rpass, pipeline, bind_group, quad, instance_vbo, self.scratch.len() as u32);
    }

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>) {
        if self.quad.is_none() {
            self.quad = Some(StaticQuad::new(ctx, "horologe hand"));
        }
        if self.pipeline_format == Some(ctx.surface_format) && self.pipeline.is_some() {
            return;
        }

        let bgl = ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("horologe hand bgl"),
            entries: &[viewport_layout_entry()],
        });
        let ubo = create_viewport_ubo(ctx, "horologe hand viewport ubo");
        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("horologe hand bind group"),
            layout: &bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: ubo.as_entire_binding(),
            }],
        });

        self.pipeline = Some(create_quad_pipeline(
            ctx,
            "horologe hand",
            include_str!("shaders/hand.wgsl"),
            &bgl,
            HandInstance::layout(),
        ));
        self.pipeline_format = Some(ctx.surface_format);
        self.bind_group = Some(bind_group);
        self.viewport_ubo = Some(ubo);
    }
}

/// Instance data layout (48 bytes):
///
///  offset  0  pivot     [f32; 2]   loc 1
///  offset  8  size      [f32; 2]   loc 2  (.x = width, .y = length)
///  offset 16  anchor    [f32; 2]   loc 3
///  offset 24  rotation  [f32; 2]   loc 4  (cos, sin)
///  offset 32  color     [f32; 4]   loc 5
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
struct HandInstance {
    pivot: [f32; 2],
    size: [f32; 2],
    anchor: [f32; 2],
    rotation: [f32; 2],
    color: [f32; 4],
}

impl HandInstance {
    const ATTRS: [wgpu::VertexAttribute; 5] = wgpu::vertex_attr_array![
        1 => Float32x2, // pivot
        2 => Float32x2, // size
        3 => Float32x2, // anchor
        4 => Float32x2, // rotation
        5 => Float32x4  // color
    ];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<HandInstance>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRS,
        }
    }

    fn from_cmd(cmd: &HandCmd) -> Option<Self> {
        let visible = cmd.size.x > 0.0 && cmd.size.y > 0.0;
        if !visible || !cmd.angle.is_finite() || !cmd.pivot.is_finite() {
            return None;
        }

        let (sin, cos) = cmd.angle.sin_cos();
        Some(Self {
            pivot: [cmd.pivot.x, cmd.pivot.y],
            size: [cmd.size.x, cmd.size.y],
            anchor: [cmd.anchor.x, cmd.anchor.y],
            rotation: [cos, sin],
            color: cmd.color.to_array(),
        })
    }
}
