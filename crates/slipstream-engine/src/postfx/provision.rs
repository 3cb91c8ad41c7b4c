//! One-time allocation of the offscreen target and effect material.

use std::path::PathBuf;

use super::backend::{GraphicsDevice, RenderTargetId};
use super::caps::{EffectSupport, TextureSize};
use super::constants::EFFECT_CONSTANTS;
use super::material::EffectMaterial;
use super::settings::EffectSettings;

/// Vertex stage source of the effect, relative to the shader directory.
pub const VERTEX_SHADER_FILE: &str = "motion_blur.vert.wgsl";

/// Fragment stage source of the effect, relative to the shader directory.
pub const FRAGMENT_SHADER_FILE: &str = "motion_blur.frag.wgsl";

/// Resolves where shader sources live.
pub trait ShaderLocator {
    fn shader_dir(&self) -> PathBuf;
}

/// Shader sources under a fixed directory.
#[derive(Debug, Clone)]
pub struct ShaderDir(pub PathBuf);

impl ShaderLocator for ShaderDir {
    fn shader_dir(&self) -> PathBuf {
        self.0.clone()
    }
}

/// Everything the pipeline allocates up front.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct EffectResources {
    pub target: RenderTargetId,
    pub target_size: TextureSize,
    pub material: EffectMaterial,
}

/// Allocates the render target and effect material.
///
/// Returns `None` when `support` says the hardware can't run the effect, or
/// when allocation fails. Allocation failures turn the post-processing option
/// off through `settings` and log a warning; nothing is retried.
pub fn provision<D, S, L>(
    device: &mut D,
    support: &EffectSupport,
    settings: &mut S,
    shaders: &L,
) -> Option<EffectResources>
where
    D: GraphicsDevice + ?Sized,
    S: EffectSettings + ?Sized,
    L: ShaderLocator + ?Sized,
{
    if !support.supported {
        return None;
    }

    let target_size = support.adapt_size(device.screen_size(), device.max_texture_dimension());

    let Some(target) = device.create_render_target(target_size, "postprocess") else {
        log::warn!(
            target: "postfx",
            "couldn't create the render target for post-processing, disabling it"
        );
        settings.disable_postprocess();
        return None;
    };

    let dir = shaders.shader_dir();
    let program = match device.create_program(
        &dir.join(VERTEX_SHADER_FILE),
        &dir.join(FRAGMENT_SHADER_FILE),
        &EFFECT_CONSTANTS,
    ) {
        Ok(p) => p,
        Err(e) => {
            log::warn!(
                target: "postfx",
                "couldn't build the post-processing shaders, disabling it: {e:#}"
            );
            settings.disable_postprocess();
            return None;
        }
    };

    log::debug!(
        target: "postfx",
        "render target {}x{} provisioned",
        target_size.width,
        target_size.height
    );

    Some(EffectResources {
        target,
        target_size,
        material: EffectMaterial::new(program, target),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::postfx::caps::{detect_support, DeviceFeature};
    use crate::postfx::fake::FakeDevice;
    use crate::postfx::settings::UserSettings;

    fn shaders() -> ShaderDir {
        ShaderDir(PathBuf::from("/assets/shaders"))
    }

    #[test]
    fn provisions_target_at_screen_size_when_unconstrained() {
        let mut dev = FakeDevice::capable().with_screen(1280, 720);
        let support = detect_support(&dev);
        let mut settings = UserSettings::default();

        let res = provision(&mut dev, &support, &mut settings, &shaders()).unwrap();

        assert_eq!(res.target_size, TextureSize::new(1280, 720));
        assert_eq!(dev.targets, vec![(TextureSize::new(1280, 720), "postprocess".to_string())]);
        assert_eq!(res.material.texture(), res.target);
        assert!(settings.postprocess_enabled);
    }

    #[test]
    fn target_size_respects_dimension_constraints() {
        let mut dev = FakeDevice::capable()
            .with_screen(1280, 720)
            .without(DeviceFeature::NonPowerOfTwoTextures)
            .without(DeviceFeature::NonSquareTextures);
        let support = detect_support(&dev);
        let mut settings = UserSettings::default();

        let res = provision(&mut dev, &support, &mut settings, &shaders()).unwrap();
        assert_eq!(res.target_size, TextureSize::new(2048, 2048));
    }

    #[test]
    fn target_size_is_clamped_to_device_limit() {
        let mut dev = FakeDevice::capable()
            .with_screen(3000, 1000)
            .with_max_texture_dimension(2048);
        let support = detect_support(&dev);
        let mut settings = UserSettings::default();

        let res = provision(&mut dev, &support, &mut settings, &shaders()).unwrap();
        assert_eq!(res.target_size, TextureSize::new(2048, 1000));
    }

    #[test]
    fn program_is_built_from_both_shader_files() {
        let mut dev = FakeDevice::capable();
        let support = detect_support(&dev);
        let mut settings = UserSettings::default();

        provision(&mut dev, &support, &mut settings, &shaders()).unwrap();

        assert_eq!(dev.programs.len(), 1);
        let (vs, fs, constants) = &dev.programs[0];
        assert_eq!(vs, &PathBuf::from("/assets/shaders/motion_blur.vert.wgsl"));
        assert_eq!(fs, &PathBuf::from("/assets/shaders/motion_blur.frag.wgsl"));
        assert_eq!(constants, &vec!["boost_amount".to_string(), "color_buffer".to_string()]);
    }

    #[test]
    fn unsupported_hardware_allocates_nothing() {
        let mut dev = FakeDevice::capable().without(DeviceFeature::RenderToTexture);
        let support = detect_support(&dev);
        let mut settings = UserSettings::default();

        assert!(provision(&mut dev, &support, &mut settings, &shaders()).is_none());
        assert!(dev.targets.is_empty());
        assert!(dev.programs.is_empty());
        // Unsupported is not a configuration change.
        assert!(settings.postprocess_enabled);
    }

    #[test]
    fn target_allocation_failure_disables_postprocessing() {
        let mut dev = FakeDevice::capable().failing_targets();
        let support = detect_support(&dev);
        let mut settings = UserSettings::default();

        assert!(provision(&mut dev, &support, &mut settings, &shaders()).is_none());
        assert!(!settings.postprocess_enabled);
        assert!(dev.programs.is_empty());
    }

    #[test]
    fn program_failure_disables_postprocessing() {
        let mut dev = FakeDevice::capable().failing_programs();
        let support = detect_support(&dev);
        let mut settings = UserSettings::default();

        assert!(provision(&mut dev, &support, &mut settings, &shaders()).is_none());
        assert!(!settings.postprocess_enabled);
    }
}
