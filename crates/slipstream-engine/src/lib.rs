//! Slipstream engine crate.
//!
//! Platform + GPU runtime pieces and the full-screen boost post-processing
//! pipeline built on them.

pub mod core;
pub mod device;
pub mod time;
pub mod window;

pub mod logging;
pub mod postfx;
pub mod render;

/// Directory holding the engine's bundled WGSL sources.
pub fn bundled_shader_dir() -> std::path::PathBuf {
    std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("shaders")
}
