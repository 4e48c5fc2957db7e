use std::f64::consts::TAU;

use tessera_engine::color::{CLEAR, WHITE};
use tessera_engine::math::{TransformationMatrix, Vec2};
use tessera_engine::render::Renderer2D;
use tessera_engine::state::{GameState, Transition};
use winit::keyboard::KeyCode;

use crate::context::DemoCtx;
use crate::sprites::SpritesState;

const FAN_LINES: usize = 12;
const FAN_SPEED: f64 = 0.5;

/// Outlined circles and rectangles plus a rotating fan of lines.
pub struct ShapesState;

impl ShapesState {
    pub fn new() -> Self {
        Self
    }
}

impl GameState<DemoCtx> for ShapesState {
    fn name(&self) -> &str {
        "Shapes"
    }

    fn load(&mut self, _ctx: &mut DemoCtx) -> anyhow::Result<()> {
        Ok(())
    }

    fn update(&mut self, ctx: &mut DemoCtx) -> Transition<DemoCtx> {
        if ctx.was_pressed(KeyCode::Digit1) {
            return Transition::Replace(Box::new(SpritesState::new()));
        }
        Transition::None
    }

    fn draw(&mut self, ctx: &mut DemoCtx) {
        let view = Vec2::from(ctx.view_size);
        let t = ctx.elapsed();
        let r = &mut ctx.renderer;

        let at = |x: f64, y: f64| TransformationMatrix::translation(Vec2::new(view.x * x, view.y * y));

        r.draw_circle(
            &(at(0.2, 0.7) * TransformationMatrix::scale_uniform(120.0)),
            0xE74C_3CFF,
            WHITE,
            4.0,
        );
        r.draw_circle(
            &(at(0.4, 0.7) * TransformationMatrix::scale(Vec2::new(160.0, 80.0))),
            0x3498_DBFF,
            0x1B4F_72FF,
            8.0,
        );
        r.draw_circle(
            &(at(0.2, 0.3) * TransformationMatrix::scale_uniform(100.0)),
            CLEAR,
            0xF1C4_0FFF,
            6.0,
        );

        r.draw_rectangle(
            &(at(0.4, 0.3) * TransformationMatrix::rotation(t * 0.8) * TransformationMatrix::scale(Vec2::new(140.0, 70.0))),
            0x2ECC_71FF,
            0x145A_32FF,
            5.0,
        );
        r.draw_rectangle(
            &(at(0.4, 0.5) * TransformationMatrix::scale(Vec2::new(60.0, 20.0))),
            0x9B59_B6FF,
            0x9B59_B6FF,
            0.0,
        );

        let center = Vec2::new(view.x * 0.75, view.y * 0.5);
        let radius = view.x.min(view.y) * 0.2;
        for i in 0..FAN_LINES {
            let angle = t * FAN_SPEED + TAU * i as f64 / FAN_LINES as f64;
            let end = center + Vec2::new(angle.cos(), angle.sin()) * radius;
            let shade = (i * 255 / FAN_LINES) as u32;
            let color = 0xFF00_00FF | (shade << 16) | ((255 - shade) << 8);
            r.draw_line(&TransformationMatrix::IDENTITY, center, end, color, 3.0);
        }
    }

    fn unload(&mut self, _ctx: &mut DemoCtx) {}
}
