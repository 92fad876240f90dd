//! Scene-facing physics wrapper

use std::fmt;

use glam::DVec2;

use super::body::{BodyId, PhysicsBody, Shape};
use super::engine::{PhysicsEngine, PhysicsError};
use super::rapier::RapierEngine;
use crate::renderer::{Color, DEFAULT_WORLD_LINE_WIDTH, Quadrants, Renderer};

/// Gravity a new adapter starts with
pub const DEFAULT_GRAVITY: DVec2 = DVec2::new(0.0, -9.81);

/// Owns a physics engine and the bodies registered with it.
///
/// Bodies are kept in insertion order, which is also the order the debug
/// overlay draws them in.
pub struct PhysicsAdapter {
    engine: Box<dyn PhysicsEngine>,
    gravity: DVec2,
    bodies: Vec<PhysicsBody>,
    /// Engine id of each entry in `bodies`
    ids: Vec<BodyId>,
    /// Outline every body after the scene has drawn
    pub debug_draw: bool,
    /// Color of the debug outlines
    pub debug_color: Color,
    steps: u64,
}

impl PhysicsAdapter {
    /// Adapter over the default rapier engine
    pub fn new() -> Self {
        Self::with_engine(Box::new(RapierEngine::new()))
    }

    /// Adapter over a caller-supplied engine
    pub fn with_engine(mut engine: Box<dyn PhysicsEngine>) -> Self {
        engine.set_gravity(DEFAULT_GRAVITY);
        Self {
            engine,
            gravity: DEFAULT_GRAVITY,
            bodies: Vec::new(),
            ids: Vec::new(),
            debug_draw: false,
            debug_color: Color::rgb(0, 150, 0),
            steps: 0,
        }
    }

    /// Gravity used from the next step on
    pub fn set_gravity(&mut self, gravity: DVec2) {
        self.gravity = gravity;
        self.engine.set_gravity(gravity);
    }

    pub fn gravity(&self) -> DVec2 {
        self.gravity
    }

    /// Register a body. Registering a body twice is a caller error; the
    /// second call only warns and returns the existing id.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine rejects the body's shape or mass
    pub fn add_object(&mut self, body: &PhysicsBody) -> Result<BodyId, PhysicsError> {
        if let Some(id) = self.id_of(body) {
            log::warn!("Body {id:?} is already registered");
            return Ok(id);
        }

        let id = self.engine.add_body(body.desc())?;
        body.bind(id);
        body.set_pose(self.engine.transform(id));
        self.bodies.push(body.clone());
        self.ids.push(id);
        log::debug!("Registered body {id:?} ({} total)", self.bodies.len());
        Ok(id)
    }

    /// Bodies in registration order
    pub fn bodies(&self) -> &[PhysicsBody] {
        &self.bodies
    }

    /// Number of steps taken so far
    pub fn step_count(&self) -> u64 {
        self.steps
    }

    /// Advance the simulation by exactly `dt` seconds.
    ///
    /// A zero step does nothing. Negative or non-finite durations are
    /// refused with a warning.
    pub fn step(&mut self, dt: f64) {
        if !dt.is_finite() || dt < 0.0 {
            log::warn!("Refusing physics step of {dt} s");
            return;
        }
        if dt == 0.0 {
            return;
        }

        self.engine.step(dt);
        self.steps += 1;
        for (body, id) in self.bodies.iter().zip(&self.ids) {
            body.set_pose(self.engine.transform(*id));
        }
        log::trace!("Physics step {} ({dt:.4} s)", self.steps);
    }

    /// Current position and rotation of a registered body
    pub fn transform(&self, body: &PhysicsBody) -> Option<(DVec2, f64)> {
        self.id_of(body).and_then(|id| self.engine.transform(id))
    }

    /// Apply a world-frame force at a body-local point for the next step
    pub fn apply_force_at_local_point(&mut self, body: &PhysicsBody, force: DVec2, point: DVec2) {
        match self.id_of(body) {
            Some(id) => self.engine.apply_force(id, force, point),
            None => log::warn!("Force applied to an unregistered body"),
        }
    }

    pub fn velocity(&self, body: &PhysicsBody) -> Option<DVec2> {
        self.id_of(body).and_then(|id| self.engine.velocity(id))
    }

    pub fn set_velocity(&mut self, body: &PhysicsBody, velocity: DVec2) {
        match self.id_of(body) {
            Some(id) => self.engine.set_velocity(id, velocity),
            None => log::warn!("Velocity set on an unregistered body"),
        }
    }

    /// Id this adapter's engine gave `body`, if it was registered here
    fn id_of(&self, body: &PhysicsBody) -> Option<BodyId> {
        self.bodies
            .iter()
            .position(|b| b.ptr_eq(body))
            .and_then(|index| self.ids.get(index).copied())
    }

    /// Outline every registered body in world space
    pub fn draw_debug(&self, renderer: &Renderer) {
        let color = self.debug_color;
        for body in &self.bodies {
            let Some((position, rotation)) = body.pose() else {
                continue;
            };
            match &body.desc().shape {
                Shape::Circle { radius } => {
                    renderer.draw_circle_outline_world(
                        position,
                        *radius,
                        DEFAULT_WORLD_LINE_WIDTH,
                        color,
                        Quadrants::ALL,
                    );
                    let spoke = DVec2::from_angle(rotation).rotate(DVec2::new(*radius, 0.0));
                    renderer.draw_line_world(position, position + spoke, DEFAULT_WORLD_LINE_WIDTH, color);
                }
                shape => {
                    let Some(outline) = shape.outline() else {
                        continue;
                    };
                    let turn = DVec2::from_angle(rotation);
                    let world: Vec<DVec2> = outline.iter().map(|p| position + turn.rotate(*p)).collect();
                    for (i, start) in world.iter().enumerate() {
                        let end = world[(i + 1) % world.len()];
                        renderer.draw_line_world(*start, end, DEFAULT_WORLD_LINE_WIDTH, color);
                    }
                }
            }
        }
    }
}

impl Default for PhysicsAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for PhysicsAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PhysicsAdapter")
            .field("gravity", &self.gravity)
            .field("bodies", &self.bodies.len())
            .field("debug_draw", &self.debug_draw)
            .field("steps", &self.steps)
            .finish_non_exhaustive()
    }
}
