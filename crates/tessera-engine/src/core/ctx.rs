use winit::window::Window;

use crate::color::{self, Rgba};
use crate::device::{Gpu, SurfaceErrorAction};
use crate::math::IVec2;
use crate::time::FrameTime;
use crate::window::RuntimeCtx;

use super::app::AppControl;

/// Context for [`App::on_start`](super::App::on_start).
pub struct StartCtx<'a, 'w> {
    pub window: &'a Window,
    pub gpu: &'a Gpu<'w>,
}

/// The color target of the frame being rendered.
pub struct FrameTarget<'a> {
    pub view: &'a wgpu::TextureView,
    pub format: wgpu::TextureFormat,
    /// Size in physical pixels.
    pub size: IVec2,
}

/// Per-frame context passed to [`App::on_frame`](super::App::on_frame).
///
/// `'a` is the callback duration, `'w` the window borrow held by `Gpu<'w>`.
pub struct FrameCtx<'a, 'w> {
    pub window: &'a Window,
    pub gpu: &'a mut Gpu<'w>,
    pub time: FrameTime,
    pub runtime: &'a mut RuntimeCtx,
}

impl FrameCtx<'_, '_> {
    /// Drawable size in physical pixels.
    pub fn size(&self) -> IVec2 {
        let size = self.gpu.size();
        IVec2::new(size.width as i32, size.height as i32)
    }

    /// Acquires the next surface image, clears it to `clear`, runs `draw`
    /// against it and presents it.
    ///
    /// Surface errors skip the frame; only a fatal one returns
    /// [`AppControl::Exit`].
    pub fn render<F>(&mut self, clear: Rgba, draw: F) -> AppControl
    where
        F: FnOnce(&FrameTarget<'_>),
    {
        let size = self.size();
        if size.x <= 0 || size.y <= 0 {
            return AppControl::Continue;
        }

        let frame = match self.gpu.begin_frame() {
            Ok(f) => f,
            Err(err) => {
                return match self.gpu.handle_surface_error(err) {
                    SurfaceErrorAction::Fatal => AppControl::Exit,
                    _ => AppControl::Continue,
                };
            }
        };

        self.gpu.clear(&frame, color::to_wgpu_color(clear));

        draw(&FrameTarget {
            view: &frame.view,
            format: self.gpu.surface_format(),
            size,
        });

        self.window.pre_present_notify();
        self.gpu.present(frame);

        AppControl::Continue
    }
}
