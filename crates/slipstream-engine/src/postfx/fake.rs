//! Recording backend for pipeline tests.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{bail, Result};

use super::backend::{GraphicsDevice, GraphicsFrame, ProgramId, RenderTargetBinding, RenderTargetId};
use super::caps::{DeviceFeature, TextureSize};
use super::constants::{ShaderConstantCallback, ShaderConstantSink};
use super::material::EffectMaterial;
use super::quad::QuadVertex;

pub(crate) struct FakeDevice {
    features: HashSet<DeviceFeature>,
    screen: TextureSize,
    max_side: u32,
    fail_targets: bool,
    fail_programs: bool,

    pub targets: Vec<(TextureSize, String)>,
    pub programs: Vec<(PathBuf, PathBuf, Vec<String>)>,
}

impl FakeDevice {
    /// A device that supports everything, with a 1280x720 screen.
    pub fn capable() -> Self {
        Self {
            features: [
                DeviceFeature::ProgrammableShading,
                DeviceFeature::ShaderModel2,
                DeviceFeature::RenderToTexture,
                DeviceFeature::NonPowerOfTwoTextures,
                DeviceFeature::NonSquareTextures,
            ]
            .into_iter()
            .collect(),
            screen: TextureSize::new(1280, 720),
            max_side: 0,
            fail_targets: false,
            fail_programs: false,
            targets: Vec::new(),
            programs: Vec::new(),
        }
    }

    pub fn without(mut self, feature: DeviceFeature) -> Self {
        self.features.remove(&feature);
        self
    }

    pub fn with_screen(mut self, width: u32, height: u32) -> Self {
        self.screen = TextureSize::new(width, height);
        self
    }

    pub fn with_max_texture_dimension(mut self, max_side: u32) -> Self {
        self.max_side = max_side;
        self
    }

    pub fn failing_targets(mut self) -> Self {
        self.fail_targets = true;
        self
    }

    pub fn failing_programs(mut self) -> Self {
        self.fail_programs = true;
        self
    }
}

impl GraphicsDevice for FakeDevice {
    fn query_feature(&self, feature: DeviceFeature) -> bool {
        self.features.contains(&feature)
    }

    fn screen_size(&self) -> TextureSize {
        self.screen
    }

    fn max_texture_dimension(&self) -> u32 {
        self.max_side
    }

    fn create_render_target(&mut self, size: TextureSize, label: &str) -> Option<RenderTargetId> {
        if self.fail_targets {
            return None;
        }
        self.targets.push((size, label.to_string()));
        Some(RenderTargetId(self.targets.len() as u32 - 1))
    }

    fn create_program(
        &mut self,
        vertex: &Path,
        fragment: &Path,
        constants: &[&str],
    ) -> Result<ProgramId> {
        if self.fail_programs {
            bail!("fragment shader rejected");
        }
        self.programs.push((
            vertex.to_path_buf(),
            fragment.to_path_buf(),
            constants.iter().map(|c| c.to_string()).collect(),
        ));
        Ok(ProgramId(self.programs.len() as u32 - 1))
    }
}

/// Named constants captured during a draw.
#[derive(Debug, Default, Clone, PartialEq)]
pub(crate) struct RecordedConstants {
    pub floats: Vec<(String, Vec<f32>)>,
    pub ints: Vec<(String, Vec<i32>)>,
}

impl RecordedConstants {
    pub fn float(&self, name: &str) -> Option<f32> {
        self.floats
            .iter()
            .find(|(n, _)| n == name)
            .and_then(|(_, v)| v.first().copied())
    }

    pub fn int(&self, name: &str) -> Option<i32> {
        self.ints
            .iter()
            .find(|(n, _)| n == name)
            .and_then(|(_, v)| v.first().copied())
    }
}

impl ShaderConstantSink for RecordedConstants {
    fn set_pixel_f32(&mut self, name: &str, values: &[f32]) {
        self.floats.push((name.to_string(), values.to_vec()));
    }

    fn set_pixel_i32(&mut self, name: &str, values: &[i32]) {
        self.ints.push((name.to_string(), values.to_vec()));
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum FrameCall {
    SetTarget {
        binding: RenderTargetBinding,
        clear_color: bool,
        clear_depth: bool,
    },
    SetMaterial(EffectMaterial),
    Draw {
        vertices: Vec<QuadVertex>,
        indices: Vec<u16>,
        triangles: u32,
        material: Option<EffectMaterial>,
        constants: RecordedConstants,
    },
}

#[derive(Debug, Default)]
pub(crate) struct FakeFrame {
    pub calls: Vec<FrameCall>,
    pub active: RenderTargetBinding,
    material: Option<EffectMaterial>,
}

impl FakeFrame {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn draws(&self) -> Vec<&FrameCall> {
        self.calls
            .iter()
            .filter(|c| matches!(c, FrameCall::Draw { .. }))
            .collect()
    }

    pub fn bound_offscreen(&self) -> bool {
        self.calls.iter().any(|c| {
            matches!(
                c,
                FrameCall::SetTarget { binding: RenderTargetBinding::Offscreen(_), .. }
            )
        })
    }
}

impl GraphicsFrame for FakeFrame {
    fn set_render_target(&mut self, binding: RenderTargetBinding, clear_color: bool, clear_depth: bool) {
        self.active = binding;
        self.calls.push(FrameCall::SetTarget {
            binding,
            clear_color,
            clear_depth,
        });
    }

    fn set_material(&mut self, material: &EffectMaterial) {
        self.material = Some(*material);
        self.calls.push(FrameCall::SetMaterial(*material));
    }

    fn draw_indexed_triangles(
        &mut self,
        vertices: &[QuadVertex],
        indices: &[u16],
        triangle_count: u32,
        constants: &dyn ShaderConstantCallback,
    ) {
        let mut recorded = RecordedConstants::default();
        constants.supply_shader_constants(&mut recorded);
        self.calls.push(FrameCall::Draw {
            vertices: vertices.to_vec(),
            indices: indices.to_vec(),
            triangles: triangle_count,
            material: self.material,
            constants: recorded,
        });
    }
}
