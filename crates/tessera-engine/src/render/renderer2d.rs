use crate::color::{Rgba, WHITE};
use crate::gpu::{GpuError, TextureHandle};
use crate::math::{TransformationMatrix, Vec2};

/// A 2D renderer that draws transformed unit quads.
///
/// Lifecycle: `init` once, then any number of
/// `begin_scene` / draw calls / `end_scene` brackets, then `shutdown`
/// (after which `init` may be called again).
///
/// Every draw places the canonical unit quad, spanning `-0.5..0.5` on both
/// axes, with a world `transform`. The scene's view-projection then maps
/// world space to normalized device coordinates.
pub trait Renderer2D {
    /// Creates the renderer's GPU resources.
    fn init(&mut self) -> Result<(), GpuError>;

    /// Releases all GPU resources. Safe to call repeatedly.
    fn shutdown(&mut self);

    fn begin_scene(&mut self, view_projection: &TransformationMatrix);

    fn end_scene(&mut self);

    /// Draws one textured quad.
    ///
    /// `uv_bl` and `uv_tr` select the texture sub-rectangle (bottom-left
    /// origin) and `tint` multiplies every sampled texel.
    fn draw_quad(
        &mut self,
        transform: &TransformationMatrix,
        texture: TextureHandle,
        uv_bl: Vec2,
        uv_tr: Vec2,
        tint: Rgba,
    );

    /// [`draw_quad`](Self::draw_quad) with the whole texture and no tint.
    fn draw_texture(&mut self, transform: &TransformationMatrix, texture: TextureHandle) {
        self.draw_quad(transform, texture, Vec2::zero(), Vec2::splat(1.0), WHITE);
    }

    /// Draws an ellipse inscribed in the transformed unit quad, with an
    /// outline `line_width` world units wide drawn outside the fill.
    fn draw_circle(
        &mut self,
        transform: &TransformationMatrix,
        fill: Rgba,
        line: Rgba,
        line_width: f64,
    );

    /// Like [`draw_circle`](Self::draw_circle) but fills the whole quad.
    fn draw_rectangle(
        &mut self,
        transform: &TransformationMatrix,
        fill: Rgba,
        line: Rgba,
        line_width: f64,
    );

    /// Draws a solid segment from `start` to `end` in the space of `transform`.
    fn draw_line(
        &mut self,
        transform: &TransformationMatrix,
        start: Vec2,
        end: Vec2,
        color: Rgba,
        line_width: f64,
    );
}
