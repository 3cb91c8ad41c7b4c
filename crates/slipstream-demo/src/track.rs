use bytemuck::{Pod, Zeroable};

use slipstream_engine::render::RenderCtx;

/// Scrolling speed at rest and the extra speed a full boost adds.
const CRUISE_SPEED: f32 = 4.0;
const BOOST_SPEED: f32 = 6.0;

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct TrackUniform {
    time: f32,
    speed: f32,
    aspect: f32,
    _pad: f32,
}

/// Renders the demo scene: a procedural road scrolling toward the camera.
#[derive(Default)]
pub struct TrackRenderer {
    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,
    bind_group_layout: Option<wgpu::BindGroupLayout>,
    bind_group: Option<wgpu::BindGroup>,
    ubo: Option<wgpu::Buffer>,

    distance: f32,
}

impl TrackRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advances the road by `dt` seconds; `boost` speeds it up.
    pub fn advance(&mut self, dt: f32, boost: f32) {
        let speed = CRUISE_SPEED + BOOST_SPEED * (boost / slipstream_engine::postfx::BOOST_SPIKE);
        self.distance += dt * speed;
    }

    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        encoder: &mut wgpu::CommandEncoder,
        color_view: &wgpu::TextureView,
    ) {
        self.ensure_pipeline(ctx);
        self.ensure_bindings(ctx);
        self.write_uniform(ctx);

        let Some(pipeline) = self.pipeline.as_ref() else { return };
        let Some(bind_group) = self.bind_group.as_ref() else { return };

        let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("demo track pass"),
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

        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, bind_group, &[]);
        rpass.draw(0..3, 0..1);
    }

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format == Some(ctx.surface_format) && self.pipeline.is_some() {
            return;
        }

        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("demo track shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../shaders/track.wgsl").into()),
        });

        let bind_group_layout = ctx
            .device
            .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("demo track bgl"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            });

        let pipeline_layout = ctx
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("demo track pipeline layout"),
                bind_group_layouts: &[&bind_group_layout],
                immediate_size: 0,
            });

        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("demo track pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.surface_format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        self.pipeline_format = Some(ctx.surface_format);
        self.pipeline = Some(pipeline);
        self.bind_group_layout = Some(bind_group_layout);

        self.bind_group = None;
        self.ubo = None;
    }

    fn ensure_bindings(&mut self, ctx: &RenderCtx<'_>) {
        if self.bind_group.is_some() && self.ubo.is_some() {
            return;
        }
        let Some(bgl) = self.bind_group_layout.as_ref() else { return };

        let ubo = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("demo track ubo"),
            size: std::mem::size_of::<TrackUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("demo track bind group"),
            layout: bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: ubo.as_entire_binding(),
            }],
        });

        self.ubo = Some(ubo);
        self.bind_group = Some(bind_group);
    }

    fn write_uniform(&self, ctx: &RenderCtx<'_>) {
        let Some(ubo) = self.ubo.as_ref() else { return };
        let u = TrackUniform {
            time: self.distance,
            speed: 1.0,
            aspect: ctx.size.width.max(1) as f32 / ctx.size.height.max(1) as f32,
            _pad: 0.0,
        };
        ctx.queue.write_buffer(ubo, 0, bytemuck::bytes_of(&u));
    }
}
