//! Full-screen boost post-processing.
//!
//! Flow per session:
//! - `PostProcessing::init` probes the device once and, if it can, allocates
//!   one offscreen render target plus the effect material
//! - every frame the pipeline optionally captures the scene into that target
//!   and composites it back with the effect shader
//!
//! Backend access goes through the [`GraphicsDevice`] / [`GraphicsFrame`]
//! traits so the frame protocol can run against wgpu or a test double.

mod backend;
mod boost;
mod caps;
mod constants;
mod material;
mod pipeline;
mod provision;
mod quad;
mod settings;

#[cfg(test)]
pub(crate) mod fake;

pub use backend::{GraphicsDevice, GraphicsFrame, ProgramId, RenderTargetBinding, RenderTargetId};
pub use boost::{Boost, BOOST_DECAY_RATE, BOOST_REST_EPSILON, BOOST_SPIKE};
pub use caps::{detect_support, DeviceFeature, EffectSupport, TextureSize};
pub use constants::{
    ShaderConstantCallback, ShaderConstantSink, BOOST_AMOUNT, COLOR_BUFFER, EFFECT_CONSTANTS,
};
pub use material::{EffectMaterial, RasterFlags};
pub use pipeline::{effect_allowed, FrameStage, PostProcessing};
pub use provision::{
    provision, EffectResources, ShaderDir, ShaderLocator, FRAGMENT_SHADER_FILE,
    VERTEX_SHADER_FILE,
};
pub use quad::{QuadVertex, FULLSCREEN_INDICES, FULLSCREEN_TRIANGLES, FULLSCREEN_VERTICES};
pub use settings::{EffectSettings, UserSettings};
