use super::backend::{ProgramId, RenderTargetId};

/// Fixed rasterization flags for the composite draw.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct RasterFlags {
    pub wireframe: bool,
    pub lighting: bool,
    pub depth_write: bool,
}

impl RasterFlags {
    /// Flat, unlit, no depth writes: what a full-screen composite needs.
    pub const COMPOSITE: Self = Self {
        wireframe: false,
        lighting: false,
        depth_write: false,
    };
}

/// Binds the effect program to the captured scene texture.
///
/// Built once by the provisioner and never mutated afterwards.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct EffectMaterial {
    program: ProgramId,
    texture: RenderTargetId,
    texture_unit: u32,
    flags: RasterFlags,
}

impl EffectMaterial {
    pub(crate) fn new(program: ProgramId, texture: RenderTargetId) -> Self {
        Self {
            program,
            texture,
            texture_unit: 0,
            flags: RasterFlags::COMPOSITE,
        }
    }

    pub fn program(&self) -> ProgramId {
        self.program
    }

    /// Render target sampled by the program.
    pub fn texture(&self) -> RenderTargetId {
        self.texture
    }

    /// Sampler slot holding [`Self::texture`].
    pub fn texture_unit(&self) -> u32 {
        self.texture_unit
    }

    pub fn flags(&self) -> RasterFlags {
        self.flags
    }
}
