//! Window and event loop.
//!
//! Owns the `winit` event loop and the window, and wires them to the GPU
//! layer and the [`App`](crate::core::App).

mod runtime;

pub use runtime::{Runtime, RuntimeConfig, RuntimeCtx};
