use crate::postfx::{
    EffectMaterial, GraphicsFrame, QuadVertex, RenderTargetBinding, ShaderConstantCallback,
};

use super::ctx::{RenderCtx, RenderTarget};
use super::store::GpuStore;

/// wgpu implementation of [`GraphicsFrame`] for one acquired frame.
///
/// Render-target switches become clear passes; scene renderers draw into
/// the views returned by [`Self::scene_target`] between them.
pub struct WgpuFrame<'a, 't> {
    ctx: &'a RenderCtx<'a>,
    target: &'a mut RenderTarget<'t>,
    store: &'a mut GpuStore,
    active: RenderTargetBinding,
    material: Option<EffectMaterial>,
}

impl<'a, 't> WgpuFrame<'a, 't> {
    pub fn new(ctx: &'a RenderCtx<'a>, target: &'a mut RenderTarget<'t>, store: &'a mut GpuStore) -> Self {
        Self {
            ctx,
            target,
            store,
            active: RenderTargetBinding::Framebuffer,
            material: None,
        }
    }

    /// Splits out the encoder together with the active views so a scene
    /// pass can borrow all three at once.
    pub fn scene_target(&mut self) -> (&mut wgpu::CommandEncoder, &wgpu::TextureView, &wgpu::TextureView) {
        let (color, depth) = match self.active {
            RenderTargetBinding::Offscreen(id) => match self.store.target(id) {
                Some(t) => (&t.color_view, &t.depth.view),
                None => (self.target.color_view, self.target.depth_view),
            },
            RenderTargetBinding::Framebuffer => (self.target.color_view, self.target.depth_view),
        };
        (&mut *self.target.encoder, color, depth)
    }

    fn clear_active(&mut self, clear_color: bool, clear_depth: bool) {
        let color_load = if clear_color {
            wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT)
        } else {
            wgpu::LoadOp::Load
        };
        let depth_load = if clear_depth {
            wgpu::LoadOp::Clear(1.0)
        } else {
            wgpu::LoadOp::Load
        };

        let (encoder, color, depth) = self.scene_target();
        let _rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("slipstream target clear"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: color,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: color_load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: depth,
                depth_ops: Some(wgpu::Operations {
                    load: depth_load,
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });
    }
}

impl GraphicsFrame for WgpuFrame<'_, '_> {
    fn set_render_target(&mut self, binding: RenderTargetBinding, clear_color: bool, clear_depth: bool) {
        if let RenderTargetBinding::Offscreen(id) = binding {
            if self.store.target(id).is_none() {
                log::warn!(target: "postfx", "unknown render target {id:?}; staying on {:?}", self.active);
                return;
            }
        }

        self.active = binding;
        if clear_color || clear_depth {
            self.clear_active(clear_color, clear_depth);
        }
    }

    fn set_material(&mut self, material: &EffectMaterial) {
        if let Some(reason) = unsupported_material_state(material) {
            log::warn!(target: "postfx", "effect material rejected: {reason}");
            self.material = None;
            return;
        }
        self.material = Some(*material);
    }

    fn draw_indexed_triangles(
        &mut self,
        vertices: &[QuadVertex],
        indices: &[u16],
        triangle_count: u32,
        constants: &dyn ShaderConstantCallback,
    ) {
        let Some(material) = self.material else {
            log::debug!(target: "postfx", "draw without an active material ignored");
            return;
        };

        let index_count = composite_index_count(triangle_count, indices.len());
        if index_count == 0 || vertices.is_empty() {
            return;
        }

        if !self
            .store
            .ensure_bind_group(self.ctx.device, material.program(), material.texture())
        {
            log::warn!(target: "postfx", "effect material references missing resources; draw skipped");
            return;
        }

        // Copies must be 4-byte aligned; pad odd index counts.
        let mut index_data: Vec<u16> = indices[..index_count as usize].to_vec();
        if index_data.len() % 2 == 1 {
            index_data.push(0);
        }
        let vertex_bytes: &[u8] = bytemuck::cast_slice(vertices);
        let index_bytes: &[u8] = bytemuck::cast_slice(&index_data);

        self.store
            .ensure_geometry_capacity(self.ctx.device, vertex_bytes.len() as u64, index_bytes.len() as u64);

        // Constants are gathered right before the draw so they see live values.
        let Some(program) = self.store.programs.get_mut(material.program().0 as usize) else { return };
        constants.supply_shader_constants(&mut program.constants);
        self.ctx
            .queue
            .write_buffer(&program.uniform_buffer, 0, program.constants.bytes());

        let (Some(vbo), Some(ibo)) = (self.store.vertex_buffer.as_ref(), self.store.index_buffer.as_ref())
        else {
            return;
        };
        self.ctx.queue.write_buffer(vbo, 0, vertex_bytes);
        self.ctx.queue.write_buffer(ibo, 0, index_bytes);

        let Some(program) = self.store.program(material.program()) else { return };
        let Some(bind_group) = self.store.bind_groups.get(&(material.program(), material.texture())) else {
            return;
        };

        let color_view = match self.active {
            RenderTargetBinding::Offscreen(id) if id == material.texture() => {
                log::warn!(target: "postfx", "effect would sample its own render target; draw skipped");
                return;
            }
            RenderTargetBinding::Offscreen(id) => match self.store.target(id) {
                Some(t) => &t.color_view,
                None => return,
            },
            RenderTargetBinding::Framebuffer => self.target.color_view,
        };

        let mut rpass = self.target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("slipstream effect composite"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_pipeline(&program.pipeline);
        rpass.set_bind_group(0, bind_group, &[]);
        rpass.set_vertex_buffer(0, vbo.slice(..vertex_bytes.len() as u64));
        rpass.set_index_buffer(ibo.slice(..), wgpu::IndexFormat::Uint16);
        rpass.draw_indexed(0..index_count, 0, 0..1);
    }
}

/// Checks a material against the fixed composite pipeline: the scene texture
/// sits in the first sampler slot, fill mode, no depth attachment.
fn unsupported_material_state(material: &EffectMaterial) -> Option<&'static str> {
    let flags = material.flags();
    if material.texture_unit() != 0 {
        return Some("scene texture must use sampler slot 0");
    }
    if flags.wireframe {
        return Some("wireframe composite is not supported");
    }
    if flags.depth_write {
        return Some("composite pass has no depth attachment");
    }
    None
}

fn composite_index_count(triangle_count: u32, available: usize) -> u32 {
    let available = u32::try_from(available).unwrap_or(u32::MAX);
    triangle_count.saturating_mul(3).min(available)
}
