use anyhow::Context;
use tessera_engine::assets::AssetLocator;
use tessera_engine::core::{App, AppControl, FrameCtx, StartCtx};
use tessera_engine::gpu::WgpuDriver;
use tessera_engine::math::IVec2;
use tessera_engine::render::{build_ndc_matrix, ImmediateRenderer2D, Renderer2D, RendererConfig};
use tessera_engine::state::GameStateManager;
use tessera_engine::texture::TextureManager;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

use crate::context::DemoCtx;
use crate::sprites::SpritesState;

/// Hosts the renderer and the state stack inside the window runtime.
pub struct DemoApp {
    assets: AssetLocator,
    ctx: Option<DemoCtx>,
    states: GameStateManager<DemoCtx>,
    pending_keys: Vec<KeyCode>,
    shown_state: Option<String>,
}

impl DemoApp {
    pub fn new(assets: AssetLocator) -> Self {
        Self {
            assets,
            ctx: None,
            states: GameStateManager::new(),
            pending_keys: Vec::new(),
            shown_state: None,
        }
    }
}

impl App for DemoApp {
    fn on_start(&mut self, start: &mut StartCtx<'_, '_>) -> anyhow::Result<()> {
        let gpu = start.gpu;
        log::info!("adapter: {}", gpu.adapter_info().name);

        let driver = WgpuDriver::new(gpu.device().clone(), gpu.queue().clone(), gpu.surface_format());
        let config = RendererConfig::default()
            .resolve(&self.assets)
            .context("renderer shaders not found")?;

        let mut renderer = ImmediateRenderer2D::new(driver, config);
        renderer.init().context("failed to initialize the 2D renderer")?;

        let size = gpu.size();
        let mut ctx = DemoCtx {
            renderer,
            textures: TextureManager::new(self.assets.clone()),
            time: None,
            view_size: IVec2::new(size.width as i32, size.height as i32),
            pressed: Vec::new(),
        };

        self.states.push_state(Box::new(SpritesState::new()), &mut ctx)?;
        self.ctx = Some(ctx);
        Ok(())
    }

    fn on_window_event(&mut self, event: &WindowEvent) -> AppControl {
        if let WindowEvent::KeyboardInput {
            event:
                KeyEvent {
                    physical_key: PhysicalKey::Code(code),
                    state: ElementState::Pressed,
                    repeat: false,
                    ..
                },
            ..
        } = event
        {
            if *code == KeyCode::Escape {
                return AppControl::Exit;
            }
            self.pending_keys.push(*code);
        }
        AppControl::Continue
    }

    fn on_frame(&mut self, frame: &mut FrameCtx<'_, '_>) -> AppControl {
        let Some(ctx) = self.ctx.as_mut() else {
            return AppControl::Exit;
        };

        ctx.time = Some(frame.time);
        ctx.view_size = frame.size();
        ctx.pressed = std::mem::take(&mut self.pending_keys);

        if let Err(err) = self.states.update(ctx) {
            log::error!("{err:#}");
            return AppControl::Exit;
        }
        if self.states.has_game_ended() {
            return AppControl::Exit;
        }

        let name = self.states.active_state_name().map(str::to_owned);
        if name != self.shown_state {
            if let Some(name) = &name {
                frame.runtime.set_title(format!("tessera demo - {name}"));
            }
            self.shown_state = name;
        }

        let states = &mut self.states;
        let clear = frame.runtime.clear_color();
        frame.render(clear, |target| {
            let driver = ctx.renderer.gpu_mut();
            if driver.target_format() != target.format {
                driver.set_target_format(target.format);
            }
            driver.set_target(Some(target.view.clone()));

            ctx.renderer.begin_scene(&build_ndc_matrix(target.size));
            states.draw(ctx);
            ctx.renderer.end_scene();

            ctx.renderer.gpu_mut().set_target(None);
        })
    }

    fn on_exit(&mut self) {
        if let Some(mut ctx) = self.ctx.take() {
            self.states.clear(&mut ctx);
            ctx.textures.unload(ctx.renderer.gpu_mut());
            ctx.renderer.shutdown();
        }
        log::info!("demo shut down");
    }
}
