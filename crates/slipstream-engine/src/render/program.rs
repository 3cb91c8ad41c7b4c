use std::path::Path;

use anyhow::{Context, Result};

use crate::postfx::QuadVertex;

use super::uniforms::ConstantBlock;

const QUAD_ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
    0 => Float32x3, // pos
    1 => Float32x2  // uv
];

fn quad_vertex_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<QuadVertex>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &QUAD_ATTRS,
    }
}

/// Compiled effect program: pipeline, bind group layout and constant block.
///
/// Binding layout (group 0):
/// - 0: constants uniform
/// - 1: sampled scene texture
/// - 2: filtering sampler
pub(crate) struct EffectProgram {
    pub pipeline: wgpu::RenderPipeline,
    pub bind_group_layout: wgpu::BindGroupLayout,
    pub uniform_buffer: wgpu::Buffer,
    pub constants: ConstantBlock,
}

impl EffectProgram {
    pub(crate) fn from_files(
        device: &wgpu::Device,
        target_format: wgpu::TextureFormat,
        vertex: &Path,
        fragment: &Path,
        constants: &[&str],
    ) -> Result<Self> {
        let vs_src = std::fs::read_to_string(vertex)
            .with_context(|| format!("failed to read vertex shader {}", vertex.display()))?;
        let fs_src = std::fs::read_to_string(fragment)
            .with_context(|| format!("failed to read fragment shader {}", fragment.display()))?;

        anyhow::ensure!(vs_src.contains("vs_main"), "{} has no vs_main entry point", vertex.display());
        anyhow::ensure!(fs_src.contains("fs_main"), "{} has no fs_main entry point", fragment.display());

        let vs = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("slipstream effect vs"),
            source: wgpu::ShaderSource::Wgsl(vs_src.into()),
        });
        let fs = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("slipstream effect fs"),
            source: wgpu::ShaderSource::Wgsl(fs_src.into()),
        });

        let constants = ConstantBlock::new(constants);

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("slipstream effect bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: std::num::NonZeroU64::new(constants.size()),
                    },
                    count: None,
                },
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

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("slipstream effect pipeline layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("slipstream effect pipeline"),
            layout: Some(&pipeline_layout),

            vertex: wgpu::VertexState {
                module: &vs,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[quad_vertex_layout()],
            },

            fragment: Some(wgpu::FragmentState {
                module: &fs,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: target_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },

            // Composite never touches depth.
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("slipstream effect constants ubo"),
            size: constants.size(),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Ok(Self {
            pipeline,
            bind_group_layout,
            uniform_buffer,
            constants,
        })
    }
}
