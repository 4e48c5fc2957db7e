//! Textures generated at startup so the demo runs without image files.

use tessera_engine::color::{Rgba, CLEAR};
use tessera_engine::math::IVec2;

pub const FRAME_SIZE: i32 = 32;
pub const FRAME_COUNT: i32 = 4;

const BALL_COLORS: [Rgba; FRAME_COUNT as usize] = [0xE6_4A_3CFF, 0xF1_C4_0FFF, 0x2E_CC_71FF, 0x34_98_DBFF];
const BALL_RADIUS: i32 = 7;

/// A strip of `FRAME_COUNT` square frames, left to right, each showing a
/// ball a little higher than the one before.
///
/// Colors are returned bottom row first.
pub fn sprite_sheet() -> (IVec2, Vec<Rgba>) {
    let size = IVec2::new(FRAME_SIZE * FRAME_COUNT, FRAME_SIZE);
    let mut colors = vec![CLEAR; size.area()];

    for frame in 0..FRAME_COUNT {
        let cx = frame * FRAME_SIZE + FRAME_SIZE / 2;
        let cy = ball_height(frame);
        for y in 0..size.y {
            for x in frame * FRAME_SIZE..(frame + 1) * FRAME_SIZE {
                let (dx, dy) = (x - cx, y - cy);
                if dx * dx + dy * dy <= BALL_RADIUS * BALL_RADIUS {
                    colors[(y * size.x + x) as usize] = BALL_COLORS[frame as usize];
                }
            }
        }
    }
    (size, colors)
}

/// Ball center row, counted from the bottom, for `frame`.
pub fn ball_height(frame: i32) -> i32 {
    BALL_RADIUS + 1 + frame * 4
}

/// Two-color checkerboard with square cells of `cell` texels, starting
/// with `a` in the bottom-left corner.
pub fn checkerboard(size: IVec2, cell: i32, a: Rgba, b: Rgba) -> Vec<Rgba> {
    let cell = cell.max(1);
    (0..size.y)
        .flat_map(|y| (0..size.x).map(move |x| if ((x / cell) + (y / cell)) % 2 == 0 { a } else { b }))
        .collect()
}
