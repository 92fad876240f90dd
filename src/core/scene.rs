//! Scenes and the per-scene state the runtime hands them

use std::fmt;
use std::path::PathBuf;

use crate::assets::AssetManager;
use crate::core::debug::FrameStats;
use crate::core::time::DEFAULT_FRAMETIME_MS;
use crate::core::EngineError;
use crate::input::Input;
use crate::physics::{PhysicsAdapter, PhysicsEngine};
use crate::platform::WindowHandle;
use crate::renderer::{Camera, CameraHandle, Color, DEFAULT_CLEAR_COLOR, Renderer};

/// A unit of simulation driven by the runtime.
///
/// Every frame the runtime calls `before_update`, `update`, steps physics,
/// then `after_update` and `draw`. `start` runs once before the first frame
/// and `quit` once after the last one.
pub trait Scene {
    /// Name used in log output
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Settings the scene is constructed with
    fn settings() -> SceneSettings
    where
        Self: Sized,
    {
        SceneSettings::default()
    }

    /// Build the scene. Runs when the scene is loaded, before any frame.
    ///
    /// # Errors
    ///
    /// Returns an error if a required asset cannot be loaded
    fn create(ctx: &mut SceneContext) -> Result<Self, EngineError>
    where
        Self: Sized;

    /// One-shot setup before the first frame
    ///
    /// # Errors
    ///
    /// An error stops the engine
    fn start(&mut self, _ctx: &mut SceneContext) -> Result<(), EngineError> {
        Ok(())
    }

    fn before_update(&mut self, _ctx: &mut SceneContext) {}

    fn update(&mut self, _ctx: &mut SceneContext) {}

    fn after_update(&mut self, _ctx: &mut SceneContext) {}

    fn draw(&mut self, _ctx: &mut SceneContext) {}

    fn quit(&mut self, _ctx: &mut SceneContext) {}
}

/// Which physics engine a scene gets, fixed at construction
#[derive(Default)]
pub enum PhysicsSetting {
    #[default]
    Disabled,
    /// The default rapier engine
    Rapier,
    Custom(Box<dyn PhysicsEngine>),
}

impl fmt::Debug for PhysicsSetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disabled => f.write_str("Disabled"),
            Self::Rapier => f.write_str("Rapier"),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Construction-time options of a scene
#[derive(Debug)]
pub struct SceneSettings {
    pub physics: PhysicsSetting,
    /// Frame rate cap; zero runs uncapped
    pub framerate: u32,
    pub clear_color: Color,
    /// Directory scene assets are loaded from
    pub asset_root: PathBuf,
}

impl Default for SceneSettings {
    fn default() -> Self {
        Self {
            physics: PhysicsSetting::Disabled,
            framerate: 60,
            clear_color: DEFAULT_CLEAR_COLOR,
            asset_root: PathBuf::from("assets"),
        }
    }
}

impl SceneSettings {
    /// Enable the default physics engine, or disable physics
    #[must_use]
    pub fn with_physics(mut self, enabled: bool) -> Self {
        self.physics = if enabled {
            PhysicsSetting::Rapier
        } else {
            PhysicsSetting::Disabled
        };
        self
    }

    /// Simulate with a caller-supplied engine
    #[must_use]
    pub fn with_engine(mut self, engine: Box<dyn PhysicsEngine>) -> Self {
        self.physics = PhysicsSetting::Custom(engine);
        self
    }

    #[must_use]
    pub fn with_framerate(mut self, framerate: u32) -> Self {
        self.framerate = framerate;
        self
    }

    #[must_use]
    pub fn with_clear_color(mut self, color: Color) -> Self {
        self.clear_color = color;
        self
    }

    #[must_use]
    pub fn with_asset_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.asset_root = root.into();
        self
    }
}

enum PhysicsMode {
    Enabled(PhysicsAdapter),
    Disabled,
}

/// State the runtime owns on behalf of one scene
pub struct SceneContext {
    /// The window shared by all scenes
    pub window: WindowHandle,
    pub main_camera: CameraHandle,
    pub renderer: Renderer,
    pub assets: AssetManager,
    /// Input captured at the start of the current frame
    pub input: Input,
    /// Frame rate cap; zero runs uncapped
    pub framerate: u32,
    frametime: f64,
    physics: PhysicsMode,
    stats: FrameStats,
    quit: bool,
}

impl SceneContext {
    /// Bind a fresh camera and renderer to the window framebuffer
    pub fn new(window: WindowHandle, settings: SceneSettings) -> Self {
        let main_camera = Camera::new().into_handle();
        let framebuffer = window.borrow().framebuffer();
        let renderer = Renderer::new(framebuffer, CameraHandle::clone(&main_camera))
            .with_clear_color(settings.clear_color);

        let physics = match settings.physics {
            PhysicsSetting::Disabled => PhysicsMode::Disabled,
            PhysicsSetting::Rapier => PhysicsMode::Enabled(PhysicsAdapter::new()),
            PhysicsSetting::Custom(engine) => PhysicsMode::Enabled(PhysicsAdapter::with_engine(engine)),
        };

        Self {
            window,
            main_camera,
            renderer,
            assets: AssetManager::new(settings.asset_root),
            input: Input::new(),
            framerate: settings.framerate,
            frametime: DEFAULT_FRAMETIME_MS,
            physics,
            stats: FrameStats::new(),
            quit: false,
        }
    }

    /// Duration of the previous frame in milliseconds
    pub fn frametime(&self) -> f64 {
        self.frametime
    }

    pub fn has_physics(&self) -> bool {
        matches!(self.physics, PhysicsMode::Enabled(_))
    }

    /// The physics adapter, `None` when the scene was built without physics
    pub fn physics(&self) -> Option<&PhysicsAdapter> {
        match &self.physics {
            PhysicsMode::Enabled(adapter) => Some(adapter),
            PhysicsMode::Disabled => None,
        }
    }

    pub fn physics_mut(&mut self) -> Option<&mut PhysicsAdapter> {
        match &mut self.physics {
            PhysicsMode::Enabled(adapter) => Some(adapter),
            PhysicsMode::Disabled => None,
        }
    }

    /// Frame statistics recorded so far
    pub fn stats(&self) -> &FrameStats {
        &self.stats
    }

    /// End the scene once the current frame has completed
    pub fn quit(&mut self) {
        self.quit = true;
    }

    /// Whether the scene ends after this frame
    pub fn quit_requested(&self) -> bool {
        self.quit || self.input.quit_requested()
    }

    pub(crate) fn begin_frame(&mut self, events: &[crate::input::InputEvent], frametime: f64) {
        self.input.begin_frame(events);
        self.frametime = frametime;
        self.stats.record_frame(frametime);
    }

    /// Step physics by the previous frame's duration
    pub(crate) fn step_physics(&mut self) {
        let dt = self.frametime / 1000.0;
        let dt = if dt.is_finite() && dt > 0.0 { dt } else { 0.0 };
        if let PhysicsMode::Enabled(adapter) = &mut self.physics {
            adapter.step(dt);
        }
    }

    pub(crate) fn update_camera(&self) {
        match self.main_camera.try_borrow_mut() {
            Ok(mut camera) => camera.update(),
            Err(_) => log::warn!("Main camera busy, follow target not applied"),
        }
    }

    pub(crate) fn draw_physics_debug(&self) {
        if let PhysicsMode::Enabled(adapter) = &self.physics
            && adapter.debug_draw
        {
            adapter.draw_debug(&self.renderer);
        }
    }
}

impl fmt::Debug for SceneContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SceneContext")
            .field("framerate", &self.framerate)
            .field("frametime", &self.frametime)
            .field("physics", &self.physics())
            .field("quit", &self.quit)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::Window;

    fn context(settings: SceneSettings) -> SceneContext {
        SceneContext::new(Window::new("test", 64, 48).into_handle(), settings)
    }

    #[test]
    fn test_defaults() {
        let ctx = context(SceneSettings::default());
        assert_eq!(ctx.framerate, 60);
        assert_eq!(ctx.frametime(), DEFAULT_FRAMETIME_MS);
        assert!(!ctx.has_physics());
        assert_eq!(ctx.renderer.clear_color, DEFAULT_CLEAR_COLOR);
        assert_eq!(ctx.renderer.viewport(), (64, 48));
    }

    #[test]
    fn test_physics_choice_fixed_at_construction() {
        let mut ctx = context(SceneSettings::default().with_physics(true));
        assert!(ctx.has_physics());
        assert_eq!(ctx.physics().map(PhysicsAdapter::gravity), Some(crate::physics::DEFAULT_GRAVITY));

        ctx.begin_frame(&[], 20.0);
        ctx.step_physics();
        assert_eq!(ctx.physics().map(PhysicsAdapter::step_count), Some(1));
    }

    #[test]
    fn test_invalid_frametime_becomes_zero_step() {
        let mut ctx = context(SceneSettings::default().with_physics(true));
        for bad in [f64::NAN, -5.0, f64::INFINITY] {
            ctx.begin_frame(&[], bad);
            ctx.step_physics();
        }
        assert_eq!(ctx.physics().map(PhysicsAdapter::step_count), Some(0));
    }

    #[test]
    fn test_renderer_draws_into_window() {
        let ctx = context(SceneSettings::default().with_clear_color(Color::WHITE));
        ctx.renderer.clear();
        let framebuffer = ctx.window.borrow().framebuffer();
        assert_eq!(framebuffer.borrow().pixel(0, 0), Some(Color::WHITE));
    }

    #[test]
    fn test_quit_request() {
        let mut ctx = context(SceneSettings::default());
        assert!(!ctx.quit_requested());
        ctx.begin_frame(&[crate::input::InputEvent::Quit], 16.0);
        assert!(ctx.quit_requested());
        ctx.begin_frame(&[], 16.0);
        assert!(!ctx.quit_requested());
        ctx.quit();
        assert!(ctx.quit_requested());
    }
}
