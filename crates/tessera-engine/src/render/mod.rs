//! 2D rendering on top of a [`GpuDriver`](crate::gpu::GpuDriver).
//!
//! Conventions:
//! - World and screen space have their origin at the bottom-left, +Y up.
//! - Every primitive is the unit quad (`-0.5..0.5`) placed by a world
//!   transform; the scene's view-projection maps world space to NDC.
//! - Matrices are built as [`TransformationMatrix`](crate::math::TransformationMatrix)
//!   and converted with [`to_gpu_mat3`] right before upload.

mod config;
mod immediate;
mod ndc;
mod renderer2d;
mod utils;

pub use config::RendererConfig;
pub use immediate::ImmediateRenderer2D;
pub use ndc::build_ndc_matrix;
pub use renderer2d::Renderer2D;
pub use utils::{
    calculate_line_transform, calculate_sdf_transform, sdf_world_size, to_gpu_mat3, Mat3,
    SdfTransform,
};
