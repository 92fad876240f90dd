//! Core engine module
//!
//! The runtime, the scene lifecycle, frame timing and engine errors

mod debug;
mod engine;
mod error;
mod scene;
mod time;

pub use debug::FrameStats;
pub use engine::{EngineConfig, EngineRuntime};
pub use error::EngineError;
pub use scene::{PhysicsSetting, Scene, SceneContext, SceneSettings};
pub use time::{DEFAULT_FRAMETIME_MS, FrameClock};
