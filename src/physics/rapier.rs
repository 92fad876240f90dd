//! Default physics backend using rapier2d

use glam::DVec2;
use rapier2d_f64::prelude::*;

use super::body::{BodyDesc, BodyId, BodyKind, Shape};
use super::engine::{PhysicsEngine, PhysicsError};

fn to_vector(v: DVec2) -> Vector<Real> {
    vector![v.x, v.y]
}

fn from_vector(v: &Vector<Real>) -> DVec2 {
    DVec2::new(v.x, v.y)
}

fn collider_for(shape: &Shape) -> Result<ColliderBuilder, PhysicsError> {
    match shape {
        Shape::Circle { radius } => {
            if !(radius.is_finite() && *radius > 0.0) {
                return Err(PhysicsError::InvalidShape(format!("circle radius {radius}")));
            }
            Ok(ColliderBuilder::ball(*radius))
        }
        Shape::Rect { width, height } => {
            let valid = |v: f64| v.is_finite() && v > 0.0;
            if !(valid(*width) && valid(*height)) {
                return Err(PhysicsError::InvalidShape(format!("rect {width}x{height}")));
            }
            Ok(ColliderBuilder::cuboid(width / 2.0, height / 2.0))
        }
        Shape::Polygon { points } => {
            let spans_area = match points.as_slice() {
                [first, second, rest @ ..] => {
                    rest.iter().any(|p| (*second - *first).perp_dot(*p - *first).abs() > 1e-12)
                }
                _ => false,
            };
            if !spans_area {
                return Err(PhysicsError::InvalidShape(format!(
                    "degenerate polygon of {} points",
                    points.len()
                )));
            }
            let points: Vec<Point<Real>> = points.iter().map(|p| point![p.x, p.y]).collect();
            ColliderBuilder::convex_hull(&points).ok_or_else(|| {
                PhysicsError::InvalidShape(format!("degenerate polygon of {} points", points.len()))
            })
        }
    }
}

/// Rigid-body simulation on rapier2d.
///
/// User forces are cleared after every step, so a force added between two
/// steps acts for exactly one step.
pub struct RapierEngine {
    gravity: Vector<Real>,
    pipeline: PhysicsPipeline,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    rigid_body_set: RigidBodySet,
    collider_set: ColliderSet,
    impulse_joint_set: ImpulseJointSet,
    multibody_joint_set: MultibodyJointSet,
    ccd_solver: CCDSolver,
    query_pipeline: QueryPipeline,
    integration_parameters: IntegrationParameters,
    handles: Vec<RigidBodyHandle>,
}

impl RapierEngine {
    /// Create an empty world with standard gravity
    pub fn new() -> Self {
        Self {
            gravity: vector![0.0, -9.81],
            pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            integration_parameters: IntegrationParameters::default(),
            handles: Vec::new(),
        }
    }

    /// Number of bodies in the world
    pub fn body_count(&self) -> usize {
        self.handles.len()
    }

    fn body(&self, id: BodyId) -> Option<&RigidBody> {
        let handle = *self.handles.get(id.0 as usize)?;
        self.rigid_body_set.get(handle)
    }

    fn body_mut(&mut self, id: BodyId) -> Option<&mut RigidBody> {
        let handle = *self.handles.get(id.0 as usize)?;
        self.rigid_body_set.get_mut(handle)
    }
}

impl Default for RapierEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl PhysicsEngine for RapierEngine {
    fn set_gravity(&mut self, gravity: DVec2) {
        self.gravity = to_vector(gravity);
    }

    fn add_body(&mut self, desc: &BodyDesc) -> Result<BodyId, PhysicsError> {
        let mut collider = collider_for(&desc.shape)?;
        if desc.kind == BodyKind::Dynamic {
            if !(desc.mass.is_finite() && desc.mass > 0.0) {
                return Err(PhysicsError::InvalidMass(desc.mass));
            }
            collider = collider.mass(desc.mass);
        }

        let builder = match desc.kind {
            BodyKind::Dynamic => RigidBodyBuilder::dynamic(),
            BodyKind::Fixed => RigidBodyBuilder::fixed(),
            BodyKind::Kinematic => RigidBodyBuilder::kinematic_velocity_based(),
        };
        let body = builder
            .translation(to_vector(desc.position))
            .rotation(desc.rotation)
            .build();

        let handle = self.rigid_body_set.insert(body);
        self.collider_set
            .insert_with_parent(collider.build(), handle, &mut self.rigid_body_set);

        let id = BodyId(self.handles.len() as u32);
        self.handles.push(handle);
        Ok(id)
    }

    fn step(&mut self, dt: f64) {
        self.integration_parameters.dt = dt;

        self.pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &(),
        );

        for handle in &self.handles {
            if let Some(rb) = self.rigid_body_set.get_mut(*handle) {
                rb.reset_forces(false);
            }
        }
    }

    fn transform(&self, body: BodyId) -> Option<(DVec2, f64)> {
        self.body(body)
            .map(|rb| (from_vector(rb.translation()), rb.rotation().angle()))
    }

    fn apply_force(&mut self, body: BodyId, force: DVec2, local_point: DVec2) {
        if let Some(rb) = self.body_mut(body) {
            let point = rb.position() * point![local_point.x, local_point.y];
            rb.add_force_at_point(to_vector(force), point, true);
        }
    }

    fn velocity(&self, body: BodyId) -> Option<DVec2> {
        self.body(body).map(|rb| from_vector(rb.linvel()))
    }

    fn set_velocity(&mut self, body: BodyId, velocity: DVec2) {
        if let Some(rb) = self.body_mut(body) {
            rb.set_linvel(to_vector(velocity), true);
        }
    }
}
