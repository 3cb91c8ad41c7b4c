//! Hardware capability probing and render-target size adaptation.

use super::backend::GraphicsDevice;

/// Hardware features the effect depends on.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum DeviceFeature {
    /// Programmable vertex/fragment stages.
    ProgrammableShading,
    /// Shader model 2.0 or better for the fragment stage.
    ShaderModel2,
    /// Rendering into a texture that is sampled later.
    RenderToTexture,
    /// Texture sides that are not powers of two.
    NonPowerOfTwoTextures,
    /// Textures whose width differs from their height.
    NonSquareTextures,
}

/// Texture/surface dimensions in physical pixels.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub struct TextureSize {
    pub width: u32,
    pub height: u32,
}

impl TextureSize {
    #[inline]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Adjusts `self` to the nearest legal texture size at or above it.
    ///
    /// - `pow2`: each side rounds up to the next power of two (`0` becomes `1`)
    /// - `square`: both sides take the larger side
    /// - `max_side`: each side is clamped to it when non-zero
    pub fn optimal(self, pow2: bool, square: bool, max_side: u32) -> Self {
        let (mut w, mut h) = if pow2 {
            (self.width.max(1).next_power_of_two(), self.height.max(1).next_power_of_two())
        } else {
            (self.width, self.height)
        };

        if square {
            let side = w.max(h);
            w = side;
            h = side;
        }

        if max_side > 0 {
            w = w.min(max_side);
            h = h.min(max_side);
        }

        Self::new(w, h)
    }
}

/// Outcome of the one-time capability probe.
///
/// `supported` is the verdict; the two dimension flags are advisory and only
/// steer render-target sizing.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub struct EffectSupport {
    pub supported: bool,
    pub non_power_of_two: bool,
    pub non_square: bool,
}

impl EffectSupport {
    /// Size adaptation for `screen` under this probe's dimension constraints.
    pub fn adapt_size(&self, screen: TextureSize, max_side: u32) -> TextureSize {
        screen.optimal(!self.non_power_of_two, !self.non_square, max_side)
    }
}

/// Probes `device` for everything the effect needs.
///
/// An unsupported verdict is a normal result, not an error. A warning is
/// logged for each texture dimension mode the hardware lacks, whatever the
/// verdict.
pub fn detect_support<D: GraphicsDevice + ?Sized>(device: &D) -> EffectSupport {
    let supported = device.query_feature(DeviceFeature::ProgrammableShading)
        && device.query_feature(DeviceFeature::ShaderModel2)
        && device.query_feature(DeviceFeature::RenderToTexture);

    let non_square = device.query_feature(DeviceFeature::NonSquareTextures);
    let non_power_of_two = device.query_feature(DeviceFeature::NonPowerOfTwoTextures);

    if !non_power_of_two {
        log::warn!(target: "postfx", "only power of two textures are supported");
    }
    if !non_square {
        log::warn!(target: "postfx", "only square textures are supported");
    }

    log::debug!(target: "postfx", "post-processing supported: {supported}");

    EffectSupport {
        supported,
        non_power_of_two,
        non_square,
    }
}
