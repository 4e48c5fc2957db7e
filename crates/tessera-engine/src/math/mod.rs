//! Vector and transformation-matrix math.
//!
//! World space is double precision. Conversion to the single-precision,
//! column-major layout the GPU expects lives in `render::utils`.

mod matrix;
mod vec2;

pub use matrix::TransformationMatrix;
pub use vec2::{IVec2, Vec2};
