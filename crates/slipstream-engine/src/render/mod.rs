//! wgpu rendering backend.
//!
//! Implements the post-processing backend contract on top of wgpu:
//! - [`WgpuDevice`] probes the adapter and creates targets/programs
//! - [`WgpuFrame`] records target switches and the composite draw for one
//!   acquired frame
//!
//! Resources are owned by a [`GpuStore`] that lives as long as the window's
//! GPU context.

mod ctx;
mod device;
mod frame;
mod program;
mod store;
mod uniforms;

pub use ctx::{RenderCtx, RenderTarget};
pub use device::WgpuDevice;
pub use frame::WgpuFrame;
pub use store::GpuStore;
