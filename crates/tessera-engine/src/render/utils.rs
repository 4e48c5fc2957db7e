//! Conversions between engine matrices and the values shaders consume.

use crate::math::{TransformationMatrix, Vec2};

/// Column-major 3×3 float matrix, as uploaded to a `mat3x3<f32>` uniform.
pub type Mat3 = [f32; 9];

/// Converts a row-major `f64` transform to column-major `f32`:
/// `out[3 * col + row] == transform[row][col]`.
pub fn to_gpu_mat3(transform: &TransformationMatrix) -> Mat3 {
    let mut out = [0.0; 9];
    for row in 0..3 {
        for col in 0..3 {
            out[3 * col + row] = transform[row][col] as f32;
        }
    }
    out
}

/// Places the unit quad as a bar from `start` to `end`, `line_width` thick.
///
/// `start == end` is allowed and yields a zero-length bar with no rotation.
pub fn calculate_line_transform(
    transform: &TransformationMatrix,
    start: Vec2,
    end: Vec2,
    line_width: f64,
) -> TransformationMatrix {
    let direction = end - start;
    let angle = direction.y.atan2(direction.x);
    let center = (start + end) * 0.5;

    *transform
        * TransformationMatrix::translation(center)
        * TransformationMatrix::rotation(angle)
        * TransformationMatrix::scale(Vec2::new(direction.length(), line_width))
}

/// Quad placement for distance-field shapes.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SdfTransform {
    /// `transform` with its axes stretched to cover `quad_size`.
    pub quad_transform: Mat3,
    /// Size of the shape itself in world units.
    pub world_size: [f32; 2],
    /// Shape size padded by the outline on every side.
    pub quad_size: [f32; 2],
}

/// How far `transform` stretches the unit axes: the norms of its first two
/// columns.
pub fn sdf_world_size(transform: &TransformationMatrix) -> [f32; 2] {
    let m = transform.rows();
    [
        m[0][0].hypot(m[1][0]) as f32,
        m[0][1].hypot(m[1][1]) as f32,
    ]
}

/// Grows the quad described by `transform` by `line_width` on each side so
/// outlines and edge anti-aliasing are not clipped.
///
/// The transform must not collapse either axis.
pub fn calculate_sdf_transform(transform: &TransformationMatrix, line_width: f64) -> SdfTransform {
    let world_size = sdf_world_size(transform);
    debug_assert!(
        world_size[0] != 0.0 && world_size[1] != 0.0,
        "SDF transform has a zero-length axis: {world_size:?}"
    );

    let pad = 2.0 * line_width as f32;
    let quad_size = [world_size[0] + pad, world_size[1] + pad];
    let scale_up = [quad_size[0] / world_size[0], quad_size[1] / world_size[1]];

    let mut quad_transform = to_gpu_mat3(transform);
    quad_transform[0] *= scale_up[0];
    quad_transform[1] *= scale_up[0];
    quad_transform[3] *= scale_up[1];
    quad_transform[4] *= scale_up[1];

    SdfTransform {
        quad_transform,
        world_size,
        quad_size,
    }
}
