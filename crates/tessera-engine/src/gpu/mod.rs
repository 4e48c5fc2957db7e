//! Backend-neutral GPU command interface.
//!
//! Renderers talk to a [`GpuDriver`] in terms of opaque handles; the wgpu
//! implementation lives in [`WgpuDriver`].

mod driver;
mod error;
pub(crate) mod reflect;
mod types;
pub(crate) mod uniform_block;
mod wgpu_driver;

#[cfg(test)]
pub(crate) mod recording;

pub use driver::GpuDriver;
pub use error::GpuError;
pub use types::{
    Attribute, BufferHandle, BufferKind, BufferLayout, CompiledShader, Filtering, IndexFormat,
    ShaderHandle, ShaderSource, TextureHandle, UniformDecl, UniformKind, UniformLocation,
    VertexArrayHandle, Wrapping,
};
pub use wgpu_driver::WgpuDriver;
