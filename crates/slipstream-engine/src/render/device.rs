use std::path::Path;

use anyhow::Result;

use crate::device::DepthBuffer;
use crate::postfx::{DeviceFeature, GraphicsDevice, ProgramId, RenderTargetId, TextureSize};

use super::ctx::RenderCtx;
use super::program::EffectProgram;
use super::store::{GpuStore, OffscreenTarget};

/// wgpu implementation of [`GraphicsDevice`].
///
/// Resources land in the borrowed [`GpuStore`]; handles index into it.
pub struct WgpuDevice<'a> {
    ctx: &'a RenderCtx<'a>,
    store: &'a mut GpuStore,
}

impl<'a> WgpuDevice<'a> {
    pub fn new(ctx: &'a RenderCtx<'a>, store: &'a mut GpuStore) -> Self {
        Self { ctx, store }
    }
}

impl GraphicsDevice for WgpuDevice<'_> {
    fn query_feature(&self, feature: DeviceFeature) -> bool {
        let downlevel = self.ctx.adapter.get_downlevel_capabilities();

        match feature {
            // Every wgpu backend runs programmable vertex/fragment stages.
            DeviceFeature::ProgrammableShading => true,
            DeviceFeature::ShaderModel2 => downlevel.shader_model >= wgpu::ShaderModel::Sm2,
            DeviceFeature::RenderToTexture => self
                .ctx
                .adapter
                .get_texture_format_features(self.ctx.surface_format)
                .allowed_usages
                .contains(wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING),
            DeviceFeature::NonPowerOfTwoTextures => downlevel
                .flags
                .contains(wgpu::DownlevelFlags::NON_POWER_OF_TWO_MIPMAPPED_TEXTURES),
            DeviceFeature::NonSquareTextures => true,
        }
    }

    fn screen_size(&self) -> TextureSize {
        self.ctx.size
    }

    fn max_texture_dimension(&self) -> u32 {
        self.ctx.device.limits().max_texture_dimension_2d
    }

    fn create_render_target(&mut self, size: TextureSize, label: &str) -> Option<RenderTargetId> {
        let max = self.max_texture_dimension();
        if size.width == 0 || size.height == 0 || size.width > max || size.height > max {
            log::debug!(target: "postfx", "render target {}x{} out of range (max {max})", size.width, size.height);
            return None;
        }

        let id = RenderTargetId(u32::try_from(self.store.targets.len()).ok()?);

        let color = self.ctx.device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width: size.width,
                height: size.height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: self.ctx.surface_format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        let color_view = color.create_view(&wgpu::TextureViewDescriptor::default());
        let depth = DepthBuffer::new(self.ctx.device, size.width, size.height, label);

        self.store.targets.push(OffscreenTarget { color_view, depth });

        Some(id)
    }

    fn create_program(
        &mut self,
        vertex: &Path,
        fragment: &Path,
        constants: &[&str],
    ) -> Result<ProgramId> {
        let id = ProgramId(u32::try_from(self.store.programs.len())?);
        let program = EffectProgram::from_files(
            self.ctx.device,
            self.ctx.surface_format,
            vertex,
            fragment,
            constants,
        )?;
        self.store.programs.push(program);
        Ok(id)
    }
}
