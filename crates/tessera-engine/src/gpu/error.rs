use std::path::PathBuf;

use thiserror::Error;

/// Errors reported by a [`GpuDriver`](super::GpuDriver).
///
/// Only resource creation can fail; draw-time commands assume valid state.
#[derive(Error, Debug)]
pub enum GpuError {
    /// A shader source file could not be read.
    #[error("failed to read shader source '{}': {source}", path.display())]
    ShaderSource {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The backend rejected a shader or the pipeline built from it.
    #[error("shader '{label}' failed to compile: {details}")]
    ShaderCompile { label: String, details: String },

    /// A uniform was looked up by a name the shader does not declare.
    #[error("uniform '{name}' is not declared by shader '{label}'")]
    UnknownUniform { label: String, name: String },

    /// A handle is zero or was already destroyed.
    #[error("invalid {kind} handle {id}")]
    InvalidHandle { kind: &'static str, id: u32 },

    /// Texture dimensions are non-positive or exceed device limits.
    #[error("unsupported texture size {width}x{height}")]
    TextureSize { width: i32, height: i32 },

    /// Texel data does not match the texture dimensions.
    #[error("texture data is {actual} bytes, expected {expected}")]
    TextureData { expected: usize, actual: usize },

    /// Backend-specific failure.
    #[error("backend error: {0}")]
    Backend(String),
}
