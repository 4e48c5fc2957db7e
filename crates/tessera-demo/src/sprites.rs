use std::path::PathBuf;

use anyhow::Context;
use tessera_engine::color::WHITE;
use tessera_engine::gpu::{Filtering, Wrapping};
use tessera_engine::math::{IVec2, TransformationMatrix, Vec2};
use tessera_engine::state::{GameState, Transition};
use tessera_engine::texture::Texture;
use winit::keyboard::KeyCode;

use crate::context::DemoCtx;
use crate::procedural::{self, FRAME_COUNT, FRAME_SIZE};
use crate::shapes::ShapesState;

const PICTURE_PATH: &str = "images/duck.png";
const FRAMES_PER_SECOND: f64 = 8.0;
const SPRITE_SCALE: f64 = 4.0;

/// Either a file cached by the texture manager or a generated fallback.
enum Picture {
    Cached(PathBuf),
    Generated(Texture),
}

/// Animated sprite sheet, a tinted copy of the whole sheet and a picture.
pub struct SpritesState {
    sheet: Option<Texture>,
    picture: Option<Picture>,
}

impl SpritesState {
    pub fn new() -> Self {
        Self {
            sheet: None,
            picture: None,
        }
    }

    fn load_picture(ctx: &mut DemoCtx) -> anyhow::Result<Picture> {
        match ctx.textures.load(ctx.renderer.gpu_mut(), PICTURE_PATH) {
            Ok(_) => return Ok(Picture::Cached(PathBuf::from(PICTURE_PATH))),
            Err(err) => log::warn!("{PICTURE_PATH} unavailable ({err}); using a checkerboard"),
        }

        let size = IVec2::new(64, 64);
        let colors = procedural::checkerboard(size, 8, 0xDDDD_DDFF, 0x5555_66FF);
        let texture = Texture::from_colors(
            ctx.renderer.gpu_mut(),
            size,
            &colors,
            Filtering::NearestPixel,
            Wrapping::Repeat,
        )?;
        Ok(Picture::Generated(texture))
    }
}

impl GameState<DemoCtx> for SpritesState {
    fn name(&self) -> &str {
        "Sprites"
    }

    fn load(&mut self, ctx: &mut DemoCtx) -> anyhow::Result<()> {
        let (size, colors) = procedural::sprite_sheet();
        let sheet = Texture::from_colors(
            ctx.renderer.gpu_mut(),
            size,
            &colors,
            Filtering::NearestPixel,
            Wrapping::ClampToEdge,
        )
        .context("failed to create the sprite sheet")?;

        match Self::load_picture(ctx) {
            Ok(picture) => {
                self.sheet = Some(sheet);
                self.picture = Some(picture);
                Ok(())
            }
            Err(err) => {
                sheet.release(ctx.renderer.gpu_mut());
                Err(err)
            }
        }
    }

    fn update(&mut self, ctx: &mut DemoCtx) -> Transition<DemoCtx> {
        if ctx.was_pressed(KeyCode::Digit2) {
            return Transition::Replace(Box::new(ShapesState::new()));
        }
        Transition::None
    }

    fn draw(&mut self, ctx: &mut DemoCtx) {
        let view = Vec2::from(ctx.view_size);
        let renderer = &mut ctx.renderer;

        match &self.picture {
            Some(Picture::Cached(path)) => {
                if let Some(texture) = ctx.textures.get(path) {
                    let at = TransformationMatrix::translation(Vec2::new(view.x * 0.6, view.y * 0.2));
                    texture.draw(renderer, &at, WHITE);
                }
            }
            Some(Picture::Generated(texture)) => {
                let at = TransformationMatrix::translation(Vec2::new(view.x * 0.6, view.y * 0.2))
                    * TransformationMatrix::scale_uniform(SPRITE_SCALE);
                texture.draw(renderer, &at, WHITE);
            }
            None => {}
        }

        let Some(sheet) = &self.sheet else {
            return;
        };

        let frame = (ctx.time.map_or(0.0, |t| t.elapsed) * FRAMES_PER_SECOND) as i32 % FRAME_COUNT;
        let sprite_at = TransformationMatrix::translation(Vec2::new(view.x * 0.15, view.y * 0.5))
            * TransformationMatrix::scale_uniform(SPRITE_SCALE);
        sheet.draw_frame(
            renderer,
            &sprite_at,
            IVec2::new(frame * FRAME_SIZE, 0),
            IVec2::splat(FRAME_SIZE),
            WHITE,
        );

        let strip_at = TransformationMatrix::translation(Vec2::new(view.x * 0.15, view.y * 0.2))
            * TransformationMatrix::scale_uniform(2.0);
        sheet.draw(renderer, &strip_at, 0xFFB0_B0FF);
    }

    fn unload(&mut self, ctx: &mut DemoCtx) {
        if let Some(sheet) = self.sheet.take() {
            sheet.release(ctx.renderer.gpu_mut());
        }
        if let Some(Picture::Generated(texture)) = self.picture.take() {
            texture.release(ctx.renderer.gpu_mut());
        }
    }
}
