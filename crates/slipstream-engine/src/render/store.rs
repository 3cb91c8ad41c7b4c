use std::collections::HashMap;

use crate::device::DepthBuffer;
use crate::postfx::{ProgramId, RenderTargetId};

use super::program::EffectProgram;

/// Offscreen color+depth target.
pub(crate) struct OffscreenTarget {
    pub color_view: wgpu::TextureView,
    pub depth: DepthBuffer,
}

/// GPU resources created through the backend, addressed by handle.
///
/// Lives as long as the graphics context; handles index into it.
#[derive(Default)]
pub struct GpuStore {
    pub(crate) targets: Vec<OffscreenTarget>,
    pub(crate) programs: Vec<EffectProgram>,
    pub(crate) bind_groups: HashMap<(ProgramId, RenderTargetId), wgpu::BindGroup>,
    pub(crate) sampler: Option<wgpu::Sampler>,

    pub(crate) vertex_buffer: Option<wgpu::Buffer>,
    pub(crate) vertex_capacity: u64,
    pub(crate) index_buffer: Option<wgpu::Buffer>,
    pub(crate) index_capacity: u64,
}

impl GpuStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn target(&self, id: RenderTargetId) -> Option<&OffscreenTarget> {
        self.targets.get(id.0 as usize)
    }

    pub(crate) fn program(&self, id: ProgramId) -> Option<&EffectProgram> {
        self.programs.get(id.0 as usize)
    }

    pub(crate) fn ensure_sampler(&mut self, device: &wgpu::Device) {
        if self.sampler.is_some() {
            return;
        }
        self.sampler = Some(device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("slipstream effect sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        }));
    }

    /// Grows the streaming vertex/index buffers to hold at least the given byte sizes.
    pub(crate) fn ensure_geometry_capacity(
        &mut self,
        device: &wgpu::Device,
        vertex_bytes: u64,
        index_bytes: u64,
    ) {
        if vertex_bytes > self.vertex_capacity || self.vertex_buffer.is_none() {
            let cap = vertex_bytes.next_power_of_two().max(256);
            self.vertex_buffer = Some(device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("slipstream effect vbo"),
                size: cap,
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            }));
            self.vertex_capacity = cap;
        }

        if index_bytes > self.index_capacity || self.index_buffer.is_none() {
            let cap = index_bytes.next_power_of_two().max(64);
            self.index_buffer = Some(device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("slipstream effect ibo"),
                size: cap,
                usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            }));
            self.index_capacity = cap;
        }
    }

    /// Bind group pairing `program` with `target` as its sampled texture.
    pub(crate) fn ensure_bind_group(
        &mut self,
        device: &wgpu::Device,
        program: ProgramId,
        target: RenderTargetId,
    ) -> bool {
        if self.bind_groups.contains_key(&(program, target)) {
            return true;
        }
        self.ensure_sampler(device);

        let (Some(p), Some(t), Some(sampler)) =
            (self.program(program), self.target(target), self.sampler.as_ref())
        else {
            return false;
        };

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("slipstream effect bind group"),
            layout: &p.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: p.uniform_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&t.color_view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        });

        self.bind_groups.insert((program, target), bind_group);
        true
    }
}
