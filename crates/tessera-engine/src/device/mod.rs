//! wgpu device and window surface ownership.
//!
//! [`Gpu`] creates the instance, adapter, device and queue, configures the
//! window surface, and hands out one [`GpuFrame`] per presented image.

mod context;
mod error;
mod frame;
mod init;
mod surface;

pub use context::Gpu;
pub use error::SurfaceErrorAction;
pub use frame::GpuFrame;
pub use init::GpuInit;
