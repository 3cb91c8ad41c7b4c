//! Graphics backend contract consumed by the post-processing pipeline.
//!
//! The contract is split the same way wgpu splits its API: long-lived
//! resource creation lives on [`GraphicsDevice`], per-frame commands live on
//! [`GraphicsFrame`]. The wgpu implementation is in `crate::render`; tests
//! use a recording fake.

use std::path::Path;

use anyhow::Result;

use super::caps::{DeviceFeature, TextureSize};
use super::constants::ShaderConstantCallback;
use super::material::EffectMaterial;
use super::quad::QuadVertex;

/// Opaque handle to an offscreen color+depth render target.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct RenderTargetId(pub u32);

/// Opaque handle to a compiled vertex+fragment program.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct ProgramId(pub u32);

/// Where subsequent scene rendering goes.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum RenderTargetBinding {
    /// The presentation surface.
    #[default]
    Framebuffer,
    /// An offscreen target created through [`GraphicsDevice::create_render_target`].
    Offscreen(RenderTargetId),
}

/// Resource creation and capability queries.
pub trait GraphicsDevice {
    /// Returns whether the adapter supports `feature`.
    fn query_feature(&self, feature: DeviceFeature) -> bool;

    /// Current presentation size in physical pixels.
    fn screen_size(&self) -> TextureSize;

    /// Largest legal 2D texture side, or `0` when the device reports no limit.
    fn max_texture_dimension(&self) -> u32 {
        0
    }

    /// Allocates an offscreen color+depth target. `None` means allocation failed.
    fn create_render_target(&mut self, size: TextureSize, label: &str) -> Option<RenderTargetId>;

    /// Compiles a program from a vertex and a fragment source file.
    ///
    /// `constants` lists the named scalar constants the program reads; the
    /// backend lays them out in declaration order.
    fn create_program(
        &mut self,
        vertex: &Path,
        fragment: &Path,
        constants: &[&str],
    ) -> Result<ProgramId>;
}

/// Per-frame command recording.
pub trait GraphicsFrame {
    /// Redirects rendering to `binding`, optionally clearing color and depth.
    fn set_render_target(&mut self, binding: RenderTargetBinding, clear_color: bool, clear_depth: bool);

    /// Makes `material` the active material for subsequent draws.
    fn set_material(&mut self, material: &EffectMaterial);

    /// Draws `triangle_count` indexed triangles with the active material.
    ///
    /// `constants` is invoked right before the pixel stage runs so that it
    /// can feed the program's named constants.
    fn draw_indexed_triangles(
        &mut self,
        vertices: &[QuadVertex],
        indices: &[u16],
        triangle_count: u32,
        constants: &dyn ShaderConstantCallback,
    );
}
