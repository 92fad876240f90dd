//! Engine-level errors

use std::path::PathBuf;

use crate::assets::AssetError;
use crate::physics::PhysicsError;

/// Fatal errors surfaced by the engine runtime
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The OS event loop could not be created or pumped
    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    /// The OS refused to create a window
    #[error("window creation failed: {0}")]
    CreateWindow(#[from] winit::error::OsError),

    /// The window could not be turned into a GPU surface
    #[error("surface creation failed: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),

    /// No GPU adapter is compatible with the window surface
    #[error("no compatible GPU adapter found")]
    NoAdapter,

    /// The GPU adapter refused to hand out a device
    #[error("GPU device request failed: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),

    /// An asset required by a scene failed to load
    #[error(transparent)]
    Asset(#[from] AssetError),

    /// A body could not be added to the simulation
    #[error(transparent)]
    Physics(#[from] PhysicsError),

    /// The engine configuration file could not be read or parsed
    #[error("engine config {path:?}: {message}")]
    Config {
        /// Config file path
        path: PathBuf,
        /// What went wrong
        message: String,
    },
}
