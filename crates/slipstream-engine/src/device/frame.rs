/// Represents a single acquired frame.
///
/// Holding the surface texture blocks acquisition of the next frame, so
/// submit promptly.
pub struct GpuFrame {
    pub surface_texture: wgpu::SurfaceTexture,
    pub view: wgpu::TextureView,
    pub encoder: wgpu::CommandEncoder,
}

impl GpuFrame {
    /// Submits the recorded commands on `queue` and presents the surface texture.
    pub fn present(self, queue: &wgpu::Queue) {
        let Self {
            surface_texture,
            view,
            encoder,
        } = self;

        queue.submit(std::iter::once(encoder.finish()));
        drop(view);
        surface_texture.present();
    }
}
