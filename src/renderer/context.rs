//! World-space renderer
//!
//! Every primitive takes world coordinates and world-unit sizes, projects
//! them through the active camera and only then touches the active surface.

use glam::DVec2;

use super::camera::{Camera, CameraHandle};
use super::canvas::{BlendMode, Canvas, Color, Quadrants, SurfaceHandle};
use super::font::Font;
use super::sprite::Sprite;

/// Color used when a scene has no better idea
pub const DEFAULT_RENDER_COLOR: Color = Color::rgb(200, 0, 0);
/// Default clear color
pub const DEFAULT_CLEAR_COLOR: Color = Color::rgb(240, 240, 240);
/// Default screen-space line width in pixels
pub const DEFAULT_LINE_WIDTH: f64 = 1.0;
/// Default world-space line width
pub const DEFAULT_WORLD_LINE_WIDTH: f64 = 0.05;

/// Why a surface or camera could not be bound
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum BindError {
    /// The surface has zero width or height
    #[error("surface has zero area")]
    EmptySurface,
    /// The surface is borrowed elsewhere
    #[error("surface is borrowed elsewhere")]
    SurfaceBusy,
    /// The camera is mutably borrowed elsewhere
    #[error("camera is borrowed elsewhere")]
    CameraBusy,
    /// The camera zoom is not a finite positive number
    #[error("camera zoom must be finite and positive")]
    InvalidZoom,
}

/// Rectangle in world space: `position` is the top-left corner (Y-up, so
/// the corner with the largest y), `size` extends right and down.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldRect {
    pub position: DVec2,
    pub size: DVec2,
}

impl WorldRect {
    pub const fn new(position: DVec2, size: DVec2) -> Self {
        Self { position, size }
    }

    /// Center point in world space
    pub fn center(&self) -> DVec2 {
        self.position + DVec2::new(self.size.x / 2.0, -self.size.y / 2.0)
    }
}

/// Immediate-mode 2D renderer bound to one surface and one camera
pub struct Renderer {
    /// Color used by [`clear`](Self::clear)
    pub clear_color: Color,
    /// Font used by the text primitives
    pub font: Font,
    active_surface: SurfaceHandle,
    active_camera: CameraHandle,
}

impl Renderer {
    /// Create a renderer drawing onto `surface` through `camera`
    pub fn new(surface: SurfaceHandle, camera: CameraHandle) -> Self {
        Self {
            clear_color: DEFAULT_CLEAR_COLOR,
            font: Font::default(),
            active_surface: surface,
            active_camera: camera,
        }
    }

    /// Set the clear color
    #[must_use]
    pub fn with_clear_color(mut self, color: Color) -> Self {
        self.clear_color = color;
        self
    }

    /// Bind a camera, reporting why it was refused
    pub fn try_set_active_camera(&mut self, camera: &CameraHandle) -> Result<(), BindError> {
        let cam = camera.try_borrow().map_err(|_| BindError::CameraBusy)?;
        if !cam.has_valid_zoom() {
            return Err(BindError::InvalidZoom);
        }
        drop(cam);
        self.active_camera = CameraHandle::clone(camera);
        Ok(())
    }

    /// Bind a camera; an unusable camera is skipped with a warning
    pub fn set_active_camera(&mut self, camera: &CameraHandle) {
        if let Err(e) = self.try_set_active_camera(camera) {
            log::warn!("Camera not bound to renderer: {e}");
        }
    }

    /// The camera draws are projected through
    pub fn active_camera(&self) -> CameraHandle {
        CameraHandle::clone(&self.active_camera)
    }

    /// Redirect draws to another surface, reporting why it was refused
    pub fn try_set_active_surface(&mut self, surface: &SurfaceHandle) -> Result<(), BindError> {
        let canvas = surface.try_borrow_mut().map_err(|_| BindError::SurfaceBusy)?;
        if canvas.is_empty() {
            return Err(BindError::EmptySurface);
        }
        drop(canvas);
        self.active_surface = SurfaceHandle::clone(surface);
        Ok(())
    }

    /// Redirect draws to another surface; the caller restores the previous one.
    /// An unusable surface is skipped with a warning.
    pub fn set_active_surface(&mut self, surface: &SurfaceHandle) {
        if let Err(e) = self.try_set_active_surface(surface) {
            log::warn!("Surface not bound to renderer: {e}");
        }
    }

    /// The surface draws currently land on
    pub fn get_active_surface(&self) -> SurfaceHandle {
        SurfaceHandle::clone(&self.active_surface)
    }

    /// Pixel size of the active surface
    pub fn viewport(&self) -> (u32, u32) {
        self.active_surface
            .try_borrow()
            .map(|canvas| canvas.size())
            .unwrap_or((0, 0))
    }

    fn with_target(&self, primitive: &str, draw: impl FnOnce(&mut Canvas, &Camera)) {
        let Ok(camera) = self.active_camera.try_borrow() else {
            log::warn!("Skipping {primitive}: active camera is borrowed elsewhere");
            return;
        };
        let Ok(mut canvas) = self.active_surface.try_borrow_mut() else {
            log::warn!("Skipping {primitive}: active surface is borrowed elsewhere");
            return;
        };
        draw(&mut canvas, &camera);
    }

    /// Fill the active surface with the clear color
    pub fn clear(&self) {
        let color = self.clear_color;
        self.with_target("clear", |canvas, _| canvas.fill(color));
    }

    /// Draw a sprite centered at `world` (plus its offset), `rotation` relative
    /// to the camera
    pub fn draw_sprite(&self, sprite: &Sprite, world: DVec2, rotation: f64) {
        let pixel_size = match self.active_camera.try_borrow() {
            Ok(camera) => {
                let scaled = camera.scale(sprite.size);
                (to_pixels(scaled.x), to_pixels(scaled.y))
            }
            Err(_) => {
                log::warn!("Skipping sprite: active camera is borrowed elsewhere");
                return;
            }
        };

        let texture = sprite.texture_at(pixel_size);
        self.blit_surface_world(&texture, world + sprite.offset, rotation, BlendMode::Normal);
    }

    /// Composite a surface in screen space, top-left at `coords`, rotated
    /// counter-clockwise by `rotation` radians
    pub fn blit_surface(&self, surface: &Canvas, coords: DVec2, rotation: f64, mode: BlendMode) {
        let rotated = surface.rotated(rotation.to_degrees());
        self.with_target("blit", |canvas, _| canvas.blit(&rotated, coords, mode));
    }

    /// Composite a surface centered on a world position. The rotation applied
    /// is `-(camera.rotation - rotation)`, so `rotation` is relative to the camera.
    pub fn blit_surface_world(&self, surface: &Canvas, world: DVec2, rotation: f64, mode: BlendMode) {
        self.with_target("world blit", |canvas, camera| {
            let screen = camera.world_to_screen(world, canvas.size());
            let rotated = surface.rotated((-(camera.rotation - rotation)).to_degrees());
            let half = DVec2::new(f64::from(rotated.width()), f64::from(rotated.height())) / 2.0;
            canvas.blit(&rotated, screen - half, mode);
        });
    }

    /// Text in screen space, top-left at `coords`
    pub fn draw_text(&self, text: &str, coords: DVec2, color: Color, background: Option<Color>) {
        let rendered = Canvas::render_text(text, &self.font, color, background);
        self.blit_surface(&rendered, coords, 0.0, BlendMode::Normal);
    }

    /// Text centered on a world position
    pub fn draw_text_world(
        &self,
        text: &str,
        world: DVec2,
        rotation: f64,
        color: Color,
        background: Option<Color>,
    ) {
        let rendered = Canvas::render_text(text, &self.font, color, background);
        self.blit_surface_world(&rendered, world, rotation, BlendMode::Normal);
    }

    /// Line in screen space, `width` in pixels
    pub fn draw_line(&self, start: DVec2, end: DVec2, width: f64, color: Color) {
        self.with_target("line", |canvas, _| {
            canvas.draw_line(start, end, to_pixels(width), color);
        });
    }

    /// Line between two world points, `width` in world units
    pub fn draw_line_world(&self, start: DVec2, end: DVec2, width: f64, color: Color) {
        self.with_target("world line", |canvas, camera| {
            let viewport = canvas.size();
            let start = camera.world_to_screen(start, viewport);
            let end = camera.world_to_screen(end, viewport);
            canvas.draw_line(start, end, to_pixels(camera.scale(width)), color);
        });
    }

    /// Filled circle, `radius` in world units
    pub fn draw_circle_fill_world(
        &self,
        center: DVec2,
        radius: f64,
        color: Color,
        quadrants: Quadrants,
    ) {
        self.with_target("world circle", |canvas, camera| {
            let center = camera.world_to_screen(center, canvas.size());
            canvas.draw_circle(center, camera.scale(radius), 0, color, quadrants);
        });
    }

    /// Circle outline, `radius` and `width` in world units
    pub fn draw_circle_outline_world(
        &self,
        center: DVec2,
        radius: f64,
        width: f64,
        color: Color,
        quadrants: Quadrants,
    ) {
        self.with_target("world circle outline", |canvas, camera| {
            let center = camera.world_to_screen(center, canvas.size());
            let width = to_pixels(camera.scale(width));
            if width == 0 {
                return;
            }
            canvas.draw_circle(center, camera.scale(radius), width, color, quadrants);
        });
    }

    /// Filled rectangle rotated about its center. `border_radius` is in world units.
    pub fn draw_rect_fill_world(
        &self,
        rect: WorldRect,
        rotation: f64,
        color: Color,
        border_radius: f64,
    ) {
        self.draw_rect_world(rect, rotation, 0.0, color, border_radius);
    }

    /// Rectangle outline rotated about its center. `width` and
    /// `border_radius` are in world units.
    pub fn draw_rect_outline_world(
        &self,
        rect: WorldRect,
        rotation: f64,
        width: f64,
        color: Color,
        border_radius: f64,
    ) {
        if width <= 0.0 {
            return;
        }
        self.draw_rect_world(rect, rotation, width, color, border_radius);
    }

    /// Net rotation and placement match [`blit_surface_world`](Self::blit_surface_world),
    /// but only pixels on the active surface are rasterized.
    fn draw_rect_world(&self, rect: WorldRect, rotation: f64, width: f64, color: Color, border_radius: f64) {
        self.with_target("world rect", |canvas, camera| {
            let size = camera.scale(rect.size);
            let (w, h) = (to_pixels(size.x), to_pixels(size.y));
            if w == 0 || h == 0 {
                return;
            }

            let stroke = if width > 0.0 {
                to_pixels(camera.scale(width)).max(1)
            } else {
                0
            };
            let radius = camera.scale(border_radius).round() as i32;
            let center = camera.world_to_screen(rect.center(), canvas.size());
            let degrees = (-(camera.rotation - rotation)).to_degrees();
            canvas.draw_rect_rotated(center, (w, h), degrees, stroke, radius, color);
        });
    }
}

fn to_pixels(value: f64) -> u32 {
    value.round().max(0.0) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    const RED: Color = Color::rgb(255, 0, 0);

    fn setup(width: u32, height: u32, zoom: f64) -> (Renderer, SurfaceHandle, CameraHandle) {
        let surface = Canvas::new(width, height, false).into_handle();
        let mut camera = Camera::new();
        camera.zoom = zoom;
        let camera = camera.into_handle();
        let renderer = Renderer::new(SurfaceHandle::clone(&surface), CameraHandle::clone(&camera));
        (renderer, surface, camera)
    }

    #[test]
    fn test_circle_lands_on_projected_point() {
        let (renderer, surface, _) = setup(1280, 720, 100.0);
        renderer.draw_circle_fill_world(DVec2::new(1.0, 1.0), 0.05, RED, Quadrants::ALL);

        let canvas = surface.borrow();
        assert_eq!(canvas.pixel(740, 260), Some(RED));
        assert_eq!(canvas.pixel(640, 360), Some(Color::BLACK));
    }

    #[test]
    fn test_clear_uses_clear_color() {
        let (renderer, surface, _) = setup(4, 4, 1.0);
        renderer.clear();
        assert_eq!(surface.borrow().pixel(3, 3), Some(DEFAULT_CLEAR_COLOR));
    }

    #[test]
    fn test_surface_redirection_and_restore() {
        let (mut renderer, window, _) = setup(100, 100, 10.0);
        let trail = Canvas::new(100, 100, true).into_handle();

        let previous = renderer.get_active_surface();
        renderer.set_active_surface(&trail);
        renderer.draw_line_world(DVec2::new(-1.0, 0.0), DVec2::new(1.0, 0.0), 0.2, RED);
        renderer.set_active_surface(&previous);

        assert_eq!(trail.borrow().pixel(50, 50), Some(RED));
        assert_eq!(window.borrow().pixel(50, 50), Some(Color::BLACK));

        renderer.blit_surface_world(&trail.borrow(), DVec2::ZERO, 0.0, BlendMode::Normal);
        assert_eq!(window.borrow().pixel(50, 50), Some(RED));
        assert_eq!(window.borrow().pixel(50, 20), Some(Color::BLACK));
    }

    #[test]
    fn test_unusable_surfaces_are_not_bound() {
        let (mut renderer, window, _) = setup(10, 10, 1.0);

        let empty = Canvas::new(0, 10, false).into_handle();
        assert_eq!(renderer.try_set_active_surface(&empty), Err(BindError::EmptySurface));

        let busy = Canvas::new(10, 10, false).into_handle();
        let guard = busy.borrow();
        renderer.set_active_surface(&busy);
        drop(guard);

        assert!(std::rc::Rc::ptr_eq(&renderer.get_active_surface(), &window));
    }

    #[test]
    fn test_invalid_camera_is_not_bound() {
        let (mut renderer, _, camera) = setup(10, 10, 1.0);
        let mut broken = Camera::new();
        broken.zoom = 0.0;
        let broken = broken.into_handle();

        assert_eq!(renderer.try_set_active_camera(&broken), Err(BindError::InvalidZoom));
        renderer.set_active_camera(&broken);
        assert!(std::rc::Rc::ptr_eq(&renderer.active_camera(), &camera));

        let other = Camera::new().into_handle();
        assert!(renderer.try_set_active_camera(&other).is_ok());
    }

    #[test]
    fn test_blitting_active_surface_onto_itself_is_skipped() {
        let (renderer, surface, _) = setup(10, 10, 1.0);
        let snapshot = surface.borrow();
        renderer.blit_surface_world(&snapshot, DVec2::ZERO, 0.0, BlendMode::Normal);
        renderer.clear();
        assert_eq!(snapshot.pixel(0, 0), Some(Color::BLACK));
    }

    #[test]
    fn test_world_blit_rotation_is_relative_to_camera() {
        let mut bar = Canvas::new(4, 2, false);
        bar.fill(RED);

        let (renderer, surface, camera) = setup(100, 100, 1.0);
        camera.borrow_mut().rotation = FRAC_PI_2;
        renderer.blit_surface_world(&bar, DVec2::ZERO, FRAC_PI_2, BlendMode::Normal);
        {
            let canvas = surface.borrow();
            assert_eq!(canvas.pixel(48, 49), Some(RED));
            assert_eq!(canvas.pixel(49, 47), Some(Color::BLACK));
        }

        let (renderer, surface, camera) = setup(100, 100, 1.0);
        camera.borrow_mut().rotation = FRAC_PI_2;
        renderer.blit_surface_world(&bar, DVec2::ZERO, 0.0, BlendMode::Normal);
        let canvas = surface.borrow();
        assert_eq!(canvas.pixel(49, 48), Some(RED));
        assert_eq!(canvas.pixel(47, 49), Some(Color::BLACK));
    }

    #[test]
    fn test_sprite_rescaled_once_for_constant_zoom() {
        let (renderer, _, camera) = setup(200, 200, 10.0);
        let sprite = Sprite::from_canvas(Canvas::new(3, 3, true)).with_size(DVec2::new(2.0, 1.0));

        for _ in 0..10 {
            renderer.draw_sprite(&sprite, DVec2::ZERO, 0.0);
        }
        assert_eq!(sprite.generation(), 1);
        assert_eq!(sprite.texture_size(), (20, 10));

        camera.borrow_mut().zoom = 20.0;
        renderer.draw_sprite(&sprite, DVec2::ZERO, 0.0);
        renderer.draw_sprite(&sprite, DVec2::ZERO, 0.0);
        assert_eq!(sprite.generation(), 2);
        assert_eq!(sprite.texture_size(), (40, 20));
    }

    #[test]
    fn test_rect_fill_world_covers_projected_area() {
        let (renderer, surface, _) = setup(100, 100, 10.0);
        let rect = WorldRect::new(DVec2::new(-1.0, 1.0), DVec2::new(2.0, 2.0));
        renderer.draw_rect_fill_world(rect, 0.0, RED, 0.0);

        let canvas = surface.borrow();
        assert_eq!(canvas.pixel(41, 41), Some(RED));
        assert_eq!(canvas.pixel(58, 58), Some(RED));
        assert_eq!(canvas.pixel(38, 38), Some(Color::BLACK));
    }

    #[test]
    fn test_rect_rotation_is_relative_to_camera() {
        let rect = WorldRect::new(DVec2::new(-2.0, 1.0), DVec2::new(4.0, 2.0));

        let (renderer, surface, _) = setup(100, 100, 1.0);
        renderer.draw_rect_fill_world(rect, FRAC_PI_2, RED, 0.0);
        {
            let canvas = surface.borrow();
            assert_eq!(canvas.pixel(49, 48), Some(RED));
            assert_eq!(canvas.pixel(47, 49), Some(Color::BLACK));
        }

        let (renderer, surface, camera) = setup(100, 100, 1.0);
        camera.borrow_mut().rotation = FRAC_PI_2;
        renderer.draw_rect_fill_world(rect, FRAC_PI_2, RED, 0.0);
        let canvas = surface.borrow();
        assert_eq!(canvas.pixel(48, 49), Some(RED));
        assert_eq!(canvas.pixel(49, 47), Some(Color::BLACK));
    }

    #[test]
    fn test_huge_primitives_only_touch_the_viewport() {
        let (renderer, surface, camera) = setup(100, 100, 1000.0);
        renderer.draw_circle_fill_world(DVec2::ZERO, 5.0, RED, Quadrants::ALL);
        assert_eq!(surface.borrow().pixel(0, 0), Some(RED));
        assert_eq!(surface.borrow().pixel(99, 99), Some(RED));

        renderer.clear();
        let rect = WorldRect::new(DVec2::new(-3.0, 3.0), DVec2::new(6.0, 6.0));
        renderer.draw_rect_fill_world(rect, 0.3, RED, 0.0);
        assert_eq!(surface.borrow().pixel(50, 50), Some(RED));
        assert_eq!(surface.borrow().pixel(0, 99), Some(RED));

        renderer.clear();
        renderer.draw_rect_outline_world(rect, 0.0, 0.01, RED, 0.0);
        assert_eq!(surface.borrow().pixel(50, 50), Some(DEFAULT_CLEAR_COLOR));

        camera.borrow_mut().zoom = 1.0e9;
        renderer.draw_line_world(DVec2::new(-1.0, 0.0), DVec2::new(1.0, 0.0), 0.0, RED);
        renderer.draw_line_world(DVec2::new(-1.0, 0.0), DVec2::new(1.0, 0.0), 1.0e-9, RED);
        assert_eq!(surface.borrow().pixel(50, 50), Some(RED));
        assert_eq!(surface.borrow().pixel(50, 40), Some(DEFAULT_CLEAR_COLOR));
    }

    #[test]
    fn test_world_line_width_is_scaled() {
        let (renderer, surface, _) = setup(100, 100, 100.0);
        renderer.draw_line_world(
            DVec2::new(-0.3, 0.0),
            DVec2::new(0.3, 0.0),
            DEFAULT_WORLD_LINE_WIDTH,
            RED,
        );
        let canvas = surface.borrow();
        assert_eq!(canvas.pixel(50, 48), Some(RED));
        assert_eq!(canvas.pixel(50, 51), Some(RED));
        assert_eq!(canvas.pixel(50, 54), Some(Color::BLACK));
    }

    #[test]
    fn test_world_rect_center() {
        let rect = WorldRect::new(DVec2::new(0.0, 2.0), DVec2::new(4.0, 2.0));
        assert_eq!(rect.center(), DVec2::new(2.0, 1.0));
    }
}
