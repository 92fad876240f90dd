//! 2D camera and the world <-> screen mapping
//!
//! World space is Y-up in simulation units, screen space is Y-down in pixels
//! with the origin at the top-left corner. The viewport is passed to every
//! transform so one camera can project onto surfaces of different sizes.

use std::cell::RefCell;
use std::ops::{Div, Mul};
use std::rc::Rc;

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Shared handle to a camera, bound by a [`Renderer`](super::Renderer)
pub type CameraHandle = Rc<RefCell<Camera>>;

/// Anything the camera can track.
///
/// `follow_state` returns `None` when the object cannot currently report
/// a pose (for instance because it is borrowed elsewhere).
pub trait Followable {
    /// Current `(position, rotation)` in world space
    fn follow_state(&self) -> Option<(DVec2, f64)>;
}

impl<T: Followable + ?Sized> Followable for Rc<T> {
    fn follow_state(&self) -> Option<(DVec2, f64)> {
        (**self).follow_state()
    }
}

impl<T: Followable> Followable for RefCell<T> {
    fn follow_state(&self) -> Option<(DVec2, f64)> {
        self.try_borrow().ok()?.follow_state()
    }
}

impl Followable for (DVec2, f64) {
    fn follow_state(&self) -> Option<(DVec2, f64)> {
        Some(*self)
    }
}

/// Orthographic 2D camera
#[derive(Serialize, Deserialize)]
pub struct Camera {
    /// Camera position in world space
    pub position: DVec2,
    /// Rotation in radians
    pub rotation: f64,
    /// Pixels per world unit, must stay finite and positive
    pub zoom: f64,
    #[serde(skip)]
    target: Option<Box<dyn Followable>>,
    #[serde(skip)]
    target_lost: bool,
}

impl Camera {
    /// Default zoom: one world unit spans 100 pixels
    pub const DEFAULT_ZOOM: f64 = 100.0;

    /// Create a camera at the world origin
    pub fn new() -> Self {
        Self::at(DVec2::ZERO)
    }

    /// Create a camera looking at a world position
    pub fn at(position: DVec2) -> Self {
        Self {
            position,
            rotation: 0.0,
            zoom: Self::DEFAULT_ZOOM,
            target: None,
            target_lost: false,
        }
    }

    /// Wrap the camera in a shareable handle
    pub fn into_handle(self) -> CameraHandle {
        Rc::new(RefCell::new(self))
    }

    /// Whether the zoom factor can be used for projection
    pub fn has_valid_zoom(&self) -> bool {
        self.zoom.is_finite() && self.zoom > 0.0
    }

    /// Track a target; `update` copies its pose every frame.
    ///
    /// If the target cannot report a pose right now, the binding is skipped
    /// with a warning and the previous target (if any) stays active.
    pub fn set_target<F: Followable + 'static>(&mut self, target: F) -> bool {
        if target.follow_state().is_none() {
            log::warn!("Camera target cannot report a pose, ignoring it");
            return false;
        }
        self.target = Some(Box::new(target));
        self.target_lost = false;
        true
    }

    /// Stop tracking the current target
    pub fn clear_target(&mut self) {
        self.target = None;
        self.target_lost = false;
    }

    /// Whether a follow target is bound
    pub fn has_target(&self) -> bool {
        self.target.is_some()
    }

    /// Pull position and rotation from the follow target. Zoom is never touched.
    pub fn update(&mut self) {
        let Some(target) = &self.target else {
            return;
        };

        match target.follow_state() {
            Some((position, rotation)) => {
                self.position = position;
                self.rotation = rotation;
                self.target_lost = false;
            }
            None => {
                if !self.target_lost {
                    log::warn!("Camera target stopped reporting a pose, keeping last pose");
                    self.target_lost = true;
                }
            }
        }
    }

    /// Unit vector pointing up relative to the camera
    pub fn up(&self) -> DVec2 {
        DVec2::from_angle(self.rotation).rotate(DVec2::Y)
    }

    /// Unit vector pointing right relative to the camera
    pub fn right(&self) -> DVec2 {
        DVec2::from_angle(self.rotation).rotate(DVec2::X)
    }

    /// World size to pixel size (no translation)
    pub fn scale<T: Mul<f64, Output = T>>(&self, value: T) -> T {
        value * self.zoom
    }

    /// Pixel size to world size (no translation)
    pub fn unscale<T: Div<f64, Output = T>>(&self, value: T) -> T {
        value / self.zoom
    }

    /// Project a world point onto a surface of `viewport` pixels
    pub fn world_to_screen(&self, world: DVec2, viewport: (u32, u32)) -> DVec2 {
        let mut relative = world - self.position;
        relative.y = -relative.y;
        let rotated = DVec2::from_angle(self.rotation).rotate(relative);
        rotated * self.zoom + viewport_center(viewport)
    }

    /// Inverse of [`world_to_screen`](Self::world_to_screen)
    pub fn screen_to_world(&self, screen: DVec2, viewport: (u32, u32)) -> DVec2 {
        let rotated = (screen - viewport_center(viewport)) / self.zoom;
        let mut relative = DVec2::from_angle(-self.rotation).rotate(rotated);
        relative.y = -relative.y;
        relative + self.position
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Camera {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Camera")
            .field("position", &self.position)
            .field("rotation", &self.rotation)
            .field("zoom", &self.zoom)
            .field("has_target", &self.target.is_some())
            .finish()
    }
}

fn viewport_center(viewport: (u32, u32)) -> DVec2 {
    DVec2::new(f64::from(viewport.0) / 2.0, f64::from(viewport.1) / 2.0)
}
