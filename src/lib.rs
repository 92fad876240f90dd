//! A small 2D game framework built in Rust
//!
//! Games are written as [`core::Scene`]s that the [`core::EngineRuntime`]
//! runs frame by frame. Drawing happens on a software framebuffer through
//! a world-space camera, physics is simulated with rapier2d, and the
//! framebuffer is presented with wgpu in a winit window.

pub mod assets;
pub mod core;
pub mod input;
pub mod physics;
pub mod platform;
pub mod renderer;
pub mod scenes;

// Re-exports for convenience
pub use glam;
pub use rapier2d_f64;
pub use wgpu;
pub use winit;

/// Prelude module for common imports
pub mod prelude {
    pub use crate::assets::{Asset, AssetHandle, AssetKind, AssetManager, Config};
    pub use crate::core::{EngineConfig, EngineError, EngineRuntime, FrameStats, Scene, SceneContext, SceneSettings};
    pub use crate::input::{Input, InputEvent, KeyCode, MouseButton};
    pub use crate::physics::{BodyDesc, BodyKind, PhysicsAdapter, PhysicsBody, Shape};
    pub use crate::platform::{DesktopPlatform, HeadlessPlatform, Platform, Window};
    pub use crate::renderer::{BlendMode, Camera, Canvas, Color, Quadrants, Renderer, Sprite, WorldRect};
    pub use glam::DVec2;
}
