use tessera_engine::gpu::WgpuDriver;
use tessera_engine::math::IVec2;
use tessera_engine::render::ImmediateRenderer2D;
use tessera_engine::texture::TextureManager;
use tessera_engine::time::FrameTime;
use winit::keyboard::KeyCode;

/// Everything a demo state can reach while it runs.
pub struct DemoCtx {
    pub renderer: ImmediateRenderer2D<WgpuDriver>,
    pub textures: TextureManager,
    pub time: Option<FrameTime>,
    /// Framebuffer size in pixels.
    pub view_size: IVec2,
    /// Keys pressed since the previous update.
    pub pressed: Vec<KeyCode>,
}

impl DemoCtx {
    pub fn was_pressed(&self, key: KeyCode) -> bool {
        self.pressed.contains(&key)
    }

    /// Seconds since the first frame.
    pub fn elapsed(&self) -> f64 {
        self.time.map_or(0.0, |t| t.elapsed)
    }
}
