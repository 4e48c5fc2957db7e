use crate::math::{IVec2, TransformationMatrix, Vec2};

/// Matrix mapping window pixels (origin bottom-left) to normalized device
/// coordinates: `[0,w]×[0,h]` lands on `[-1,1]×[-1,1]`.
///
/// `view_size` must be positive on both axes. Rebuild it whenever the
/// window size changes.
pub fn build_ndc_matrix(view_size: IVec2) -> TransformationMatrix {
    debug_assert!(
        view_size.x > 0 && view_size.y > 0,
        "view size must be positive, got {view_size:?}"
    );
    let size = Vec2::from(view_size);
    TransformationMatrix::translation(Vec2::new(-1.0, -1.0))
        * TransformationMatrix::scale(Vec2::new(2.0 / size.x, 2.0 / size.y))
}
