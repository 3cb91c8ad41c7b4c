use crate::postfx::TextureSize;

/// Renderer-facing context (device/queue + surface format + size).
pub struct RenderCtx<'a> {
    pub adapter: &'a wgpu::Adapter,
    pub device: &'a wgpu::Device,
    pub queue: &'a wgpu::Queue,
    pub surface_format: wgpu::TextureFormat,
    pub size: TextureSize, // physical px
}

impl<'a> RenderCtx<'a> {
    #[inline]
    pub fn new(
        adapter: &'a wgpu::Adapter,
        device: &'a wgpu::Device,
        queue: &'a wgpu::Queue,
        surface_format: wgpu::TextureFormat,
        size: TextureSize,
    ) -> Self {
        Self {
            adapter,
            device,
            queue,
            surface_format,
            size,
        }
    }
}

/// The presentation framebuffer for this frame (encoder + color/depth views).
pub struct RenderTarget<'a> {
    pub encoder: &'a mut wgpu::CommandEncoder,
    pub color_view: &'a wgpu::TextureView,
    pub depth_view: &'a wgpu::TextureView,
}

impl<'a> RenderTarget<'a> {
    #[inline]
    pub fn new(
        encoder: &'a mut wgpu::CommandEncoder,
        color_view: &'a wgpu::TextureView,
        depth_view: &'a wgpu::TextureView,
    ) -> Self {
        Self {
            encoder,
            color_view,
            depth_view,
        }
    }
}
