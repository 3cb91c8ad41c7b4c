mod track;

use winit::event::{ElementState, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

use slipstream_engine::core::{App, AppControl, FrameCtx};
use slipstream_engine::device::GpuInit;
use slipstream_engine::logging::{init_logging, LoggingConfig};
use slipstream_engine::postfx::{PostProcessing, ShaderDir, UserSettings};
use slipstream_engine::render::{GpuStore, WgpuDevice, WgpuFrame};
use slipstream_engine::window::{Runtime, RuntimeConfig};

use track::TrackRenderer;

const CLEAR: wgpu::Color = wgpu::Color { r: 0.02, g: 0.02, b: 0.03, a: 1.0 };

struct Demo {
    postfx: PostProcessing,
    settings: UserSettings,
    shaders: ShaderDir,
    store: GpuStore,
    track: TrackRenderer,
    initialized: bool,
}

impl Demo {
    fn new(shaders: ShaderDir) -> Self {
        Self {
            postfx: PostProcessing::new(),
            settings: UserSettings::default(),
            shaders,
            store: GpuStore::new(),
            track: TrackRenderer::new(),
            initialized: false,
        }
    }

    fn on_key(&mut self, code: KeyCode) -> AppControl {
        match code {
            KeyCode::Space => {
                self.postfx.trigger_boost();
                log::info!("boost!");
            }
            KeyCode::KeyP => {
                self.settings.postprocess_enabled = !self.settings.postprocess_enabled;
                log::info!("post-processing enabled: {}", self.settings.postprocess_enabled);
            }
            KeyCode::Digit2 => {
                self.settings.local_players = if self.settings.local_players > 1 { 1 } else { 2 };
                log::info!("local players: {}", self.settings.local_players);
            }
            KeyCode::Escape => return AppControl::Exit,
            _ => {}
        }
        AppControl::Continue
    }
}

impl App for Demo {
    fn on_window_event(&mut self, event: &WindowEvent) -> AppControl {
        let WindowEvent::KeyboardInput { event, .. } = event else {
            return AppControl::Continue;
        };
        if event.state != ElementState::Pressed || event.repeat {
            return AppControl::Continue;
        }
        match event.physical_key {
            PhysicalKey::Code(code) => self.on_key(code),
            PhysicalKey::Unidentified(_) => AppControl::Continue,
        }
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        let dt = ctx.time.dt;
        let Self {
            postfx,
            settings,
            shaders,
            store,
            track,
            initialized,
        } = self;

        track.advance(dt, postfx.boost_amount());

        let control = ctx.render(CLEAR, |rctx, target| {
            if !*initialized {
                let mut device = WgpuDevice::new(rctx, store);
                postfx.init(&mut device, settings, shaders);
                *initialized = true;
                if !postfx.is_supported() {
                    log::warn!("post-processing unsupported on this adapter; rendering directly");
                }
            }

            let mut frame = WgpuFrame::new(rctx, target, store);

            postfx.begin_capture(&mut frame, settings);
            {
                let (encoder, color_view, _depth_view) = frame.scene_target();
                track.render(rctx, encoder, color_view);
            }
            postfx.end_capture(&mut frame, settings);
            postfx.render(&mut frame, settings);
        });

        // Decay runs every frame, rendered or not.
        postfx.update(dt);

        control
    }

    fn on_exit(&mut self) {
        self.postfx.shutdown();
    }
}

fn main() -> anyhow::Result<()> {
    init_logging(LoggingConfig::default());

    log::info!("slipstream demo: Space = boost, P = toggle post-processing, 2 = split-screen, Esc = quit");

    let shaders = ShaderDir(slipstream_engine::bundled_shader_dir());

    Runtime::run(
        RuntimeConfig {
            title: "Slipstream".to_string(),
            ..Default::default()
        },
        GpuInit::default(),
        Demo::new(shaders),
    )
}
