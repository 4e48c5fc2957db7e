//! Tessera engine crate.
//!
//! A small 2D game engine: a window runtime over `winit` and `wgpu`, an
//! immediate-mode quad renderer behind a mockable GPU driver, textures and
//! a stack of game states.

pub mod assets;
pub mod color;
pub mod core;
pub mod device;
pub mod gpu;
pub mod image;
pub mod logging;
pub mod math;
pub mod render;
pub mod state;
pub mod texture;
pub mod time;
pub mod window;
