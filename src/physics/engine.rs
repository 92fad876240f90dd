//! The capability a physics backend provides

use glam::DVec2;

use super::body::{BodyDesc, BodyId};

/// Errors raised while registering bodies
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PhysicsError {
    /// The shape cannot be built (non-positive size, degenerate polygon)
    #[error("invalid shape: {0}")]
    InvalidShape(String),
    /// Mass must be finite and positive for dynamic bodies
    #[error("invalid mass {0}")]
    InvalidMass(f64),
}

/// A rigid-body simulation backend.
///
/// Implementations own every simulated body and hand out [`BodyId`]s.
/// Unknown ids are ignored by the mutating methods and yield `None` from
/// the queries.
pub trait PhysicsEngine {
    fn set_gravity(&mut self, gravity: DVec2);

    /// Create a body and its collider
    ///
    /// # Errors
    ///
    /// Returns an error if the shape or mass cannot be simulated
    fn add_body(&mut self, desc: &BodyDesc) -> Result<BodyId, PhysicsError>;

    /// Advance by `dt` seconds. Callers guarantee `dt` is finite and positive.
    fn step(&mut self, dt: f64);

    /// World position and rotation (radians)
    fn transform(&self, body: BodyId) -> Option<(DVec2, f64)>;

    /// Apply `force` (world frame) at `local_point` (body frame) for the next
    /// step only
    fn apply_force(&mut self, body: BodyId, force: DVec2, local_point: DVec2);

    fn velocity(&self, body: BodyId) -> Option<DVec2>;

    fn set_velocity(&mut self, body: BodyId, velocity: DVec2);
}
