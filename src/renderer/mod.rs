//! Rendering module
//!
//! Software rasterization onto [`Canvas`] surfaces, projected through a 2D
//! [`Camera`], and presented on screen with wgpu.

mod camera;
mod canvas;
mod context;
mod font;
mod present;
mod sprite;

pub use camera::{Camera, CameraHandle, Followable};
pub use canvas::{BlendMode, Canvas, Color, PixelRect, Quadrants, SurfaceHandle};
pub use context::{
    BindError, DEFAULT_CLEAR_COLOR, DEFAULT_LINE_WIDTH, DEFAULT_RENDER_COLOR,
    DEFAULT_WORLD_LINE_WIDTH, Renderer, WorldRect,
};
pub use font::{Font, GLYPH_HEIGHT, GLYPH_WIDTH};
pub use present::Presenter;
pub use sprite::Sprite;
