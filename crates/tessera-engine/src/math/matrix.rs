use std::ops::{Index, IndexMut, Mul, MulAssign};

use super::Vec2;

/// 3×3 homogeneous matrix describing a 2D affine transform.
///
/// Storage is row-major: `m[row][col]`. Points are column vectors, so the
/// translation lives in the last column and `a * b` applies `b` first.
///
/// The bottom row is `[0, 0, 1]` for every matrix produced by the builders
/// below; arbitrary matrices built from raw rows are not checked.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TransformationMatrix {
    m: [[f64; 3]; 3],
}

impl TransformationMatrix {
    pub const IDENTITY: Self = Self {
        m: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
    };

    #[inline]
    pub const fn identity() -> Self {
        Self::IDENTITY
    }

    #[inline]
    pub const fn from_rows(m: [[f64; 3]; 3]) -> Self {
        Self { m }
    }

    #[inline]
    pub const fn rows(&self) -> &[[f64; 3]; 3] {
        &self.m
    }

    /// Sets the matrix back to identity.
    #[inline]
    pub fn reset(&mut self) {
        *self = Self::IDENTITY;
    }

    /// Identity with translation column `t`.
    pub const fn translation(t: Vec2) -> Self {
        Self {
            m: [[1.0, 0.0, t.x], [0.0, 1.0, t.y], [0.0, 0.0, 1.0]],
        }
    }

    /// Counter-clockwise rotation by `theta` radians.
    pub fn rotation(theta: f64) -> Self {
        let (sine, cosine) = theta.sin_cos();
        Self {
            m: [[cosine, -sine, 0.0], [sine, cosine, 0.0], [0.0, 0.0, 1.0]],
        }
    }

    /// Per-axis scale.
    pub const fn scale(s: Vec2) -> Self {
        Self {
            m: [[s.x, 0.0, 0.0], [0.0, s.y, 0.0], [0.0, 0.0, 1.0]],
        }
    }

    /// Uniform scale.
    pub const fn scale_uniform(s: f64) -> Self {
        Self::scale(Vec2::splat(s))
    }

    /// Component-wise comparison within `eps`.
    pub fn approx_eq(&self, other: &Self, eps: f64) -> bool {
        self.m
            .iter()
            .flatten()
            .zip(other.m.iter().flatten())
            .all(|(a, b)| (a - b).abs() <= eps)
    }
}

impl Default for TransformationMatrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Index<usize> for TransformationMatrix {
    type Output = [f64; 3];
    #[inline]
    fn index(&self, row: usize) -> &[f64; 3] {
        &self.m[row]
    }
}

impl IndexMut<usize> for TransformationMatrix {
    #[inline]
    fn index_mut(&mut self, row: usize) -> &mut [f64; 3] {
        &mut self.m[row]
    }
}

impl Mul for TransformationMatrix {
    type Output = TransformationMatrix;

    fn mul(self, rhs: TransformationMatrix) -> TransformationMatrix {
        let a = &self.m;
        let b = &rhs.m;
        let mut out = [[0.0; 3]; 3];
        for (row, out_row) in out.iter_mut().enumerate() {
            for (col, cell) in out_row.iter_mut().enumerate() {
                *cell = a[row][0] * b[0][col] + a[row][1] * b[1][col] + a[row][2] * b[2][col];
            }
        }
        TransformationMatrix { m: out }
    }
}

impl MulAssign for TransformationMatrix {
    #[inline]
    fn mul_assign(&mut self, rhs: TransformationMatrix) {
        *self = *self * rhs;
    }
}

/// Transforms a point (`w = 1`); only the top two rows are used.
impl Mul<Vec2> for TransformationMatrix {
    type Output = Vec2;

    #[inline]
    fn mul(self, v: Vec2) -> Vec2 {
        let m = &self.m;
        Vec2::new(
            m[0][0] * v.x + m[0][1] * v.y + m[0][2],
            m[1][0] * v.x + m[1][1] * v.y + m[1][2],
        )
    }
}
