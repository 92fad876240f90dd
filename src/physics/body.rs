//! Body descriptors and handles

use std::cell::Cell;
use std::rc::Rc;

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::renderer::Followable;

/// Identifier an engine hands out for a registered body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyId(pub u32);

/// How a body takes part in the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BodyKind {
    /// Moved by forces and collisions
    #[default]
    Dynamic,
    /// Never moves
    Fixed,
    /// Moved only by setting its velocity
    Kinematic,
}

/// Collision shape in body-local world units
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Circle { radius: f64 },
    Rect { width: f64, height: f64 },
    /// Convex polygon, vertices in counter-clockwise order
    Polygon { points: Vec<DVec2> },
}

impl Shape {
    /// Outline vertices in body-local coordinates, `None` for circles
    pub fn outline(&self) -> Option<Vec<DVec2>> {
        match self {
            Self::Circle { .. } => None,
            Self::Rect { width, height } => {
                let (hw, hh) = (width / 2.0, height / 2.0);
                Some(vec![
                    DVec2::new(-hw, -hh),
                    DVec2::new(hw, -hh),
                    DVec2::new(hw, hh),
                    DVec2::new(-hw, hh),
                ])
            }
            Self::Polygon { points } => Some(points.clone()),
        }
    }
}

/// Shape and mass of a body plus its initial pose
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyDesc {
    pub kind: BodyKind,
    pub shape: Shape,
    /// Mass in kilograms
    pub mass: f64,
    pub position: DVec2,
    /// Radians, counter-clockwise
    pub rotation: f64,
}

impl BodyDesc {
    /// Dynamic body of mass 1 at the origin
    pub fn dynamic(shape: Shape) -> Self {
        Self {
            kind: BodyKind::Dynamic,
            shape,
            mass: 1.0,
            position: DVec2::ZERO,
            rotation: 0.0,
        }
    }

    /// Fixed body at the origin
    pub fn fixed(shape: Shape) -> Self {
        Self {
            kind: BodyKind::Fixed,
            ..Self::dynamic(shape)
        }
    }

    /// Kinematic body at the origin
    pub fn kinematic(shape: Shape) -> Self {
        Self {
            kind: BodyKind::Kinematic,
            ..Self::dynamic(shape)
        }
    }

    #[must_use]
    pub fn with_mass(mut self, mass: f64) -> Self {
        self.mass = mass;
        self
    }

    #[must_use]
    pub fn with_position(mut self, position: DVec2) -> Self {
        self.position = position;
        self
    }

    #[must_use]
    pub fn with_rotation(mut self, rotation: f64) -> Self {
        self.rotation = rotation;
        self
    }
}

#[derive(Debug)]
struct BodyState {
    desc: BodyDesc,
    id: Cell<Option<BodyId>>,
    pose: Cell<Option<(DVec2, f64)>>,
}

/// A body owned by scene code.
///
/// Handles are cheap to clone and all clones observe the same body. The pose
/// is a snapshot refreshed by [`PhysicsAdapter`](super::PhysicsAdapter) after
/// every step; it is `None` until the body is registered.
#[derive(Debug, Clone)]
pub struct PhysicsBody {
    state: Rc<BodyState>,
}

impl PhysicsBody {
    pub fn new(desc: BodyDesc) -> Self {
        Self {
            state: Rc::new(BodyState {
                desc,
                id: Cell::new(None),
                pose: Cell::new(None),
            }),
        }
    }

    pub fn desc(&self) -> &BodyDesc {
        &self.state.desc
    }

    /// Engine id, once registered
    pub fn id(&self) -> Option<BodyId> {
        self.state.id.get()
    }

    pub fn is_registered(&self) -> bool {
        self.id().is_some()
    }

    /// Position and rotation after the latest step
    pub fn pose(&self) -> Option<(DVec2, f64)> {
        self.state.pose.get()
    }

    pub fn position(&self) -> Option<DVec2> {
        self.pose().map(|(position, _)| position)
    }

    pub fn rotation(&self) -> Option<f64> {
        self.pose().map(|(_, rotation)| rotation)
    }

    /// Whether two handles refer to the same body
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.state, &other.state)
    }

    pub(super) fn bind(&self, id: BodyId) {
        self.state.id.set(Some(id));
    }

    pub(super) fn set_pose(&self, pose: Option<(DVec2, f64)>) {
        self.state.pose.set(pose);
    }
}

impl Followable for PhysicsBody {
    fn follow_state(&self) -> Option<(DVec2, f64)> {
        self.pose()
    }
}
