//! Physics simulation module
//!
//! A narrow [`PhysicsEngine`] capability with a rapier2d backend, and the
//! [`PhysicsAdapter`] scenes talk to.

mod adapter;
mod body;
mod engine;
mod rapier;

pub use adapter::{DEFAULT_GRAVITY, PhysicsAdapter};
pub use body::{BodyDesc, BodyId, BodyKind, PhysicsBody, Shape};
pub use engine::{PhysicsEngine, PhysicsError};
pub use rapier::RapierEngine;
