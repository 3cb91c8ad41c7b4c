use super::backend::{GraphicsDevice, GraphicsFrame, RenderTargetBinding};
use super::boost::Boost;
use super::caps::{detect_support, EffectSupport};
use super::constants::{ShaderConstantCallback, ShaderConstantSink, BOOST_AMOUNT, COLOR_BUFFER};
use super::provision::{provision, EffectResources, ShaderLocator};
use super::quad::{FULLSCREEN_INDICES, FULLSCREEN_TRIANGLES, FULLSCREEN_VERTICES};
use super::settings::EffectSettings;

/// Where the pipeline is within the current frame.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum FrameStage {
    #[default]
    Idle,
    /// Scene rendering is redirected to the offscreen target.
    Capturing,
    /// The composite draw is being issued.
    Compositing,
}

/// Returns whether the effect may run at all this frame.
///
/// Boost is deliberately not part of this predicate: it only decides whether
/// a capture starts, not whether a started capture is restored.
pub fn effect_allowed<S: EffectSettings + ?Sized>(supported: bool, settings: &S) -> bool {
    supported && settings.postprocess_enabled() && settings.local_player_count() <= 1
}

/// Single-pass full-screen boost effect.
///
/// Per-frame protocol, in this order:
/// 1. [`begin_capture`](Self::begin_capture) before the scene is drawn
/// 2. scene rendering into the frame's active target
/// 3. [`end_capture`](Self::end_capture)
/// 4. [`render`](Self::render)
/// 5. [`update`](Self::update) once, whatever happened above
///
/// The order is the caller's responsibility. Every call degrades to a no-op
/// when the hardware is unsupported, the option is off, or more than one
/// local player is active.
#[derive(Debug, Default)]
pub struct PostProcessing {
    support: EffectSupport,
    resources: Option<EffectResources>,
    boost: Boost,
    stage: FrameStage,
    captured_this_frame: bool,
    initialized: bool,
}

impl PostProcessing {
    pub fn new() -> Self {
        Self::default()
    }

    /// Probes the device and allocates the effect resources.
    ///
    /// Runs once; later calls are ignored.
    pub fn init<D, S, L>(&mut self, device: &mut D, settings: &mut S, shaders: &L)
    where
        D: GraphicsDevice + ?Sized,
        S: EffectSettings + ?Sized,
        L: ShaderLocator + ?Sized,
    {
        if self.initialized {
            log::debug!(target: "postfx", "init called twice; ignored");
            return;
        }
        self.initialized = true;

        self.support = detect_support(&*device);
        self.resources = provision(device, &self.support, settings, shaders);
    }

    /// GPU resources are released with the graphics context; nothing to do
    /// beyond leaving the frame state clean.
    pub fn shutdown(&mut self) {
        if !self.support.supported {
            return;
        }
        self.stage = FrameStage::Idle;
        self.captured_this_frame = false;
        log::debug!(target: "postfx", "post-processing shut down");
    }

    pub fn support(&self) -> EffectSupport {
        self.support
    }

    pub fn is_supported(&self) -> bool {
        self.support.supported
    }

    pub fn resources(&self) -> Option<&EffectResources> {
        self.resources.as_ref()
    }

    pub fn boost_amount(&self) -> f32 {
        self.boost.amount()
    }

    pub fn stage(&self) -> FrameStage {
        self.stage
    }

    /// Whether this frame's scene went to the offscreen target.
    pub fn captured_this_frame(&self) -> bool {
        self.captured_this_frame
    }

    /// Redirects scene rendering to the offscreen target if the effect is
    /// going to be visible this frame.
    ///
    /// With no boost the capture is skipped so the scene renders straight
    /// to the framebuffer, keeping its anti-aliasing and saving a pass.
    pub fn begin_capture<F, S>(&mut self, frame: &mut F, settings: &S)
    where
        F: GraphicsFrame + ?Sized,
        S: EffectSettings + ?Sized,
    {
        self.captured_this_frame = false;
        self.stage = FrameStage::Idle;

        if !effect_allowed(self.support.supported, settings) {
            return;
        }
        if !self.boost.is_active() {
            return;
        }
        let Some(res) = self.resources.as_ref() else { return };

        self.captured_this_frame = true;
        self.stage = FrameStage::Capturing;
        frame.set_render_target(RenderTargetBinding::Offscreen(res.target), true, true);
    }

    /// Restores the real framebuffer after a capture.
    pub fn end_capture<F, S>(&mut self, frame: &mut F, settings: &S)
    where
        F: GraphicsFrame + ?Sized,
        S: EffectSettings + ?Sized,
    {
        if !effect_allowed(self.support.supported, settings) {
            return;
        }
        if !self.captured_this_frame {
            return;
        }

        frame.set_render_target(RenderTargetBinding::Framebuffer, true, true);
        self.stage = FrameStage::Idle;
    }

    /// Composites the captured scene onto the framebuffer.
    ///
    /// Draws one full-screen quad with the effect material; this pipeline
    /// supplies the shader constants during the draw.
    pub fn render<F, S>(&mut self, frame: &mut F, settings: &S)
    where
        F: GraphicsFrame + ?Sized,
        S: EffectSettings + ?Sized,
    {
        if !effect_allowed(self.support.supported, settings) {
            return;
        }
        if !self.captured_this_frame {
            return;
        }
        let Some(material) = self.resources.as_ref().map(|r| r.material) else { return };

        self.stage = FrameStage::Compositing;
        frame.set_material(&material);
        frame.draw_indexed_triangles(
            &FULLSCREEN_VERTICES,
            &FULLSCREEN_INDICES,
            FULLSCREEN_TRIANGLES,
            &*self,
        );
        self.stage = FrameStage::Idle;
        self.captured_this_frame = false;
    }

    /// Per-frame decay; call exactly once per frame.
    pub fn update(&mut self, dt: f32) {
        self.boost.decay(dt);
    }

    /// Spikes the boost intensity.
    pub fn trigger_boost(&mut self) {
        self.boost.trigger();
    }
}

impl ShaderConstantCallback for PostProcessing {
    fn supply_shader_constants(&self, sink: &mut dyn ShaderConstantSink) {
        sink.set_pixel_f32(BOOST_AMOUNT, &[self.boost.amount()]);
        // The captured scene is always bound to the first sampler slot.
        sink.set_pixel_i32(COLOR_BUFFER, &[0]);
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::postfx::boost::{BOOST_DECAY_RATE, BOOST_SPIKE};
    use crate::postfx::caps::DeviceFeature;
    use crate::postfx::fake::{FakeDevice, FakeFrame, FrameCall, RecordedConstants};
    use crate::postfx::provision::ShaderDir;
    use crate::postfx::settings::UserSettings;

    fn shaders() -> ShaderDir {
        ShaderDir(PathBuf::from("shaders"))
    }

    fn ready(dev: &mut FakeDevice, settings: &mut UserSettings) -> PostProcessing {
        let mut pp = PostProcessing::new();
        pp.init(dev, settings, &shaders());
        pp
    }

    fn run_frame(pp: &mut PostProcessing, settings: &UserSettings) -> FakeFrame {
        let mut frame = FakeFrame::new();
        pp.begin_capture(&mut frame, settings);
        pp.end_capture(&mut frame, settings);
        pp.render(&mut frame, settings);
        frame
    }

    // ── init ──────────────────────────────────────────────────────────────

    #[test]
    fn init_provisions_on_capable_hardware() {
        let mut dev = FakeDevice::capable();
        let mut settings = UserSettings::default();
        let pp = ready(&mut dev, &mut settings);

        assert!(pp.is_supported());
        assert!(pp.resources().is_some());
        assert_eq!(pp.stage(), FrameStage::Idle);
        assert_eq!(pp.boost_amount(), 0.0);
    }

    #[test]
    fn init_runs_once() {
        let mut dev = FakeDevice::capable();
        let mut settings = UserSettings::default();
        let mut pp = ready(&mut dev, &mut settings);
        pp.init(&mut dev, &mut settings, &shaders());

        assert_eq!(dev.targets.len(), 1);
        assert_eq!(dev.programs.len(), 1);
    }

    #[test]
    fn unsupported_hardware_has_no_resources() {
        let mut dev = FakeDevice::capable().without(DeviceFeature::ShaderModel2);
        let mut settings = UserSettings::default();
        let pp = ready(&mut dev, &mut settings);

        assert!(!pp.is_supported());
        assert!(pp.resources().is_none());
    }

    // ── guard predicate ───────────────────────────────────────────────────

    #[test]
    fn effect_allowed_requires_support_option_and_single_player() {
        let on = UserSettings::default();
        assert!(effect_allowed(true, &on));
        assert!(!effect_allowed(false, &on));

        let off = UserSettings { postprocess_enabled: false, ..on };
        assert!(!effect_allowed(true, &off));

        let split = UserSettings { local_players: 2, ..on };
        assert!(!effect_allowed(true, &split));

        let none = UserSettings { local_players: 0, ..on };
        assert!(effect_allowed(true, &none));
    }

    // ── frame protocol ────────────────────────────────────────────────────

    #[test]
    fn boosted_frame_captures_restores_and_composites_once() {
        let mut dev = FakeDevice::capable();
        let mut settings = UserSettings::default();
        let mut pp = ready(&mut dev, &mut settings);
        pp.trigger_boost();

        let res = *pp.resources().unwrap();
        let mut frame = FakeFrame::new();

        pp.begin_capture(&mut frame, &settings);
        assert_eq!(pp.stage(), FrameStage::Capturing);
        assert!(pp.captured_this_frame());
        assert_eq!(frame.active, RenderTargetBinding::Offscreen(res.target));

        pp.end_capture(&mut frame, &settings);
        assert_eq!(pp.stage(), FrameStage::Idle);
        assert_eq!(frame.active, RenderTargetBinding::Framebuffer);

        pp.render(&mut frame, &settings);
        assert_eq!(pp.stage(), FrameStage::Idle);

        assert_eq!(
            frame.calls[..3],
            [
                FrameCall::SetTarget {
                    binding: RenderTargetBinding::Offscreen(res.target),
                    clear_color: true,
                    clear_depth: true,
                },
                FrameCall::SetTarget {
                    binding: RenderTargetBinding::Framebuffer,
                    clear_color: true,
                    clear_depth: true,
                },
                FrameCall::SetMaterial(res.material),
            ]
        );

        let draws = frame.draws();
        assert_eq!(draws.len(), 1);
        let FrameCall::Draw { vertices, indices, triangles, material, constants } = draws[0] else {
            unreachable!()
        };
        assert_eq!(vertices.len(), 4);
        assert_eq!(indices.len(), 6);
        assert_eq!(*triangles, 2);
        assert_eq!(*material, Some(res.material));
        assert_eq!(constants.float("boost_amount"), Some(BOOST_SPIKE));
        assert_eq!(constants.int("color_buffer"), Some(0));
    }

    #[test]
    fn constants_reflect_decay_applied_earlier_in_the_frame() {
        let mut dev = FakeDevice::capable();
        let mut settings = UserSettings::default();
        let mut pp = ready(&mut dev, &mut settings);
        pp.trigger_boost();

        let mut frame = FakeFrame::new();
        pp.begin_capture(&mut frame, &settings);
        pp.end_capture(&mut frame, &settings);
        pp.update(0.1);
        pp.render(&mut frame, &settings);

        let draws = frame.draws();
        let FrameCall::Draw { constants, .. } = draws[0] else { unreachable!() };
        let expected = BOOST_SPIKE - 0.1 * BOOST_DECAY_RATE;
        assert!((constants.float("boost_amount").unwrap() - expected).abs() < 1e-6);
    }

    #[test]
    fn begin_then_end_restores_framebuffer() {
        let mut dev = FakeDevice::capable();
        let mut settings = UserSettings::default();
        let mut pp = ready(&mut dev, &mut settings);
        pp.trigger_boost();

        let mut frame = FakeFrame::new();
        let before = frame.active;
        pp.begin_capture(&mut frame, &settings);
        pp.end_capture(&mut frame, &settings);

        assert_eq!(frame.active, before);
        assert_eq!(frame.active, RenderTargetBinding::Framebuffer);
    }

    #[test]
    fn no_boost_skips_capture_and_composite() {
        let mut dev = FakeDevice::capable();
        let mut settings = UserSettings::default();
        let mut pp = ready(&mut dev, &mut settings);

        let frame = run_frame(&mut pp, &settings);

        assert!(!pp.captured_this_frame());
        assert!(frame.calls.is_empty());
    }

    #[test]
    fn fully_decayed_boost_skips_capture() {
        let mut dev = FakeDevice::capable();
        let mut settings = UserSettings::default();
        let mut pp = ready(&mut dev, &mut settings);
        pp.trigger_boost();
        pp.update(BOOST_SPIKE / BOOST_DECAY_RATE + 0.01);
        assert_eq!(pp.boost_amount(), 0.0);

        let frame = run_frame(&mut pp, &settings);
        assert!(frame.calls.is_empty());
    }

    #[test]
    fn unsupported_hardware_never_binds_or_draws() {
        let mut dev = FakeDevice::capable().without(DeviceFeature::ProgrammableShading);
        let mut settings = UserSettings::default();
        let mut pp = ready(&mut dev, &mut settings);
        pp.trigger_boost();

        for players in [0, 1, 2, 4] {
            for enabled in [true, false] {
                let s = UserSettings { postprocess_enabled: enabled, local_players: players };
                let frame = run_frame(&mut pp, &s);
                assert!(frame.calls.is_empty());
            }
        }
    }

    #[test]
    fn split_screen_suppresses_everything() {
        let mut dev = FakeDevice::capable();
        let mut settings = UserSettings::default();
        let mut pp = ready(&mut dev, &mut settings);
        pp.trigger_boost();

        let split = UserSettings { local_players: 2, ..settings };
        let frame = run_frame(&mut pp, &split);

        assert!(!frame.bound_offscreen());
        assert!(frame.draws().is_empty());
        assert!(!pp.captured_this_frame());
    }

    #[test]
    fn disabled_option_suppresses_everything() {
        let mut dev = FakeDevice::capable();
        let mut settings = UserSettings::default();
        let mut pp = ready(&mut dev, &mut settings);
        pp.trigger_boost();

        let off = UserSettings { postprocess_enabled: false, ..settings };
        let frame = run_frame(&mut pp, &off);
        assert!(frame.calls.is_empty());
    }

    #[test]
    fn render_without_capture_is_noop() {
        let mut dev = FakeDevice::capable();
        let mut settings = UserSettings::default();
        let mut pp = ready(&mut dev, &mut settings);
        pp.trigger_boost();

        let mut frame = FakeFrame::new();
        pp.render(&mut frame, &settings);
        assert!(frame.calls.is_empty());
    }

    #[test]
    fn capture_flag_does_not_leak_into_next_frame() {
        let mut dev = FakeDevice::capable();
        let mut settings = UserSettings::default();
        let mut pp = ready(&mut dev, &mut settings);
        pp.trigger_boost();

        assert_eq!(run_frame(&mut pp, &settings).draws().len(), 1);

        // Next frame: render alone must not composite a stale capture.
        let mut frame = FakeFrame::new();
        pp.render(&mut frame, &settings);
        assert!(frame.calls.is_empty());
    }

    #[test]
    fn option_turned_off_mid_frame_returns_to_idle_next_frame() {
        let mut dev = FakeDevice::capable();
        let mut settings = UserSettings::default();
        let mut pp = ready(&mut dev, &mut settings);
        pp.trigger_boost();

        let mut frame = FakeFrame::new();
        pp.begin_capture(&mut frame, &settings);
        assert_eq!(pp.stage(), FrameStage::Capturing);

        let off = UserSettings { postprocess_enabled: false, ..settings };
        pp.end_capture(&mut frame, &off);
        pp.render(&mut frame, &off);
        assert!(frame.draws().is_empty());
        pp.update(10.0);

        let mut next = FakeFrame::new();
        pp.begin_capture(&mut next, &settings);
        assert_eq!(pp.stage(), FrameStage::Idle);
        assert!(!pp.captured_this_frame());
        assert!(next.calls.is_empty());
    }

    #[test]
    fn boost_decays_while_effect_is_suppressed() {
        let mut dev = FakeDevice::capable();
        let mut settings = UserSettings::default();
        let mut pp = ready(&mut dev, &mut settings);
        pp.trigger_boost();

        let split = UserSettings { local_players: 2, ..settings };
        for _ in 0..60 {
            run_frame(&mut pp, &split);
            pp.update(1.0 / 60.0);
        }
        assert_eq!(pp.boost_amount(), 0.0);

        // Back to one player: nothing left to show.
        assert!(run_frame(&mut pp, &settings).calls.is_empty());
    }

    // ── allocation failure ────────────────────────────────────────────────

    #[test]
    fn allocation_failure_behaves_like_unsupported() {
        let mut dev = FakeDevice::capable().failing_targets();
        let mut settings = UserSettings::default();
        let mut pp = ready(&mut dev, &mut settings);
        assert!(!settings.postprocess_enabled);

        pp.trigger_boost();
        let frame = run_frame(&mut pp, &settings);
        assert!(frame.calls.is_empty());

        // Flipping the option back on does not resurrect the effect.
        settings.postprocess_enabled = true;
        let frame = run_frame(&mut pp, &settings);
        assert!(frame.calls.is_empty());
    }

    // ── shader constants ──────────────────────────────────────────────────

    #[test]
    fn supplies_live_boost_and_texture_unit_zero() {
        let mut pp = PostProcessing::new();
        pp.trigger_boost();
        pp.update(0.2);

        let mut sink = RecordedConstants::default();
        pp.supply_shader_constants(&mut sink);

        let expected = BOOST_SPIKE - 0.2 * BOOST_DECAY_RATE;
        assert!((sink.float("boost_amount").unwrap() - expected).abs() < 1e-6);
        assert_eq!(sink.int("color_buffer"), Some(0));
    }

    // ── shutdown ──────────────────────────────────────────────────────────

    #[test]
    fn shutdown_leaves_frame_state_idle() {
        let mut dev = FakeDevice::capable();
        let mut settings = UserSettings::default();
        let mut pp = ready(&mut dev, &mut settings);
        pp.trigger_boost();

        let mut frame = FakeFrame::new();
        pp.begin_capture(&mut frame, &settings);
        pp.shutdown();

        assert_eq!(pp.stage(), FrameStage::Idle);
        assert!(!pp.captured_this_frame());
    }
}
