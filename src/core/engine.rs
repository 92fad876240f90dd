//! Engine runtime and the frame loop

use std::collections::VecDeque;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::scene::{Scene, SceneContext, SceneSettings};
use crate::core::time::FrameClock;
use crate::core::EngineError;
use crate::input::InputEvent;
use crate::platform::{Platform, Window, WindowHandle};

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Window title
    pub title: String,
    /// Initial window width
    pub width: u32,
    /// Initial window height
    pub height: u32,
    /// Enable VSync
    pub vsync: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            title: String::from("Playground"),
            width: 1280,
            height: 720,
            vsync: true,
        }
    }
}

impl EngineConfig {
    /// Create a new config with a title
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set window dimensions
    #[must_use]
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Enable or disable VSync
    #[must_use]
    pub fn with_vsync(mut self, vsync: bool) -> Self {
        self.vsync = vsync;
        self
    }

    /// Load a config from a RON or JSON file. Missing fields keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, has another extension,
    /// or does not parse
    pub fn load(path: impl AsRef<Path>) -> Result<Self, EngineError> {
        let path = path.as_ref();
        let config_error = |message: String| EngineError::Config {
            path: path.to_path_buf(),
            message,
        };

        let text = fs::read_to_string(path).map_err(|e| config_error(e.to_string()))?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("ron") => ron::from_str(&text).map_err(|e| config_error(e.to_string())),
            Some("json") => serde_json::from_str(&text).map_err(|e| config_error(e.to_string())),
            _ => Err(config_error("expected a .ron or .json file".to_owned())),
        }
    }
}

struct LoadedScene {
    scene: Box<dyn Scene>,
    ctx: SceneContext,
}

/// Owns the window, the platform and the queue of loaded scenes
pub struct EngineRuntime<P: Platform> {
    config: EngineConfig,
    platform: P,
    window: WindowHandle,
    scenes: VecDeque<LoadedScene>,
    clock: FrameClock,
    events: Vec<InputEvent>,
    applied_revision: Option<u64>,
}

impl<P: Platform> EngineRuntime<P> {
    pub fn new(config: EngineConfig, platform: P) -> Self {
        let window = Window::new(config.title.clone(), config.width, config.height).into_handle();
        log::info!("Engine created: {} ({}x{})", config.title, config.width, config.height);
        Self {
            config,
            platform,
            window,
            scenes: VecDeque::new(),
            clock: FrameClock::new(),
            events: Vec::new(),
            applied_revision: None,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The window shared by every scene
    pub fn window(&self) -> WindowHandle {
        WindowHandle::clone(&self.window)
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    /// Scenes waiting to run
    pub fn pending_scenes(&self) -> usize {
        self.scenes.len()
    }

    /// Construct a scene and queue it. It does not start until
    /// [`run_engine`](Self::run_engine).
    ///
    /// # Errors
    ///
    /// Returns an error if the scene fails to construct
    pub fn load_scene<S: Scene + 'static>(&mut self) -> Result<(), EngineError> {
        self.load_scene_with(S::settings(), S::create)
    }

    /// Construct a scene with explicit settings and constructor
    ///
    /// # Errors
    ///
    /// Returns whatever `build` returns
    pub fn load_scene_with<S, F>(&mut self, settings: SceneSettings, build: F) -> Result<(), EngineError>
    where
        S: Scene + 'static,
        F: FnOnce(&mut SceneContext) -> Result<S, EngineError>,
    {
        let mut ctx = SceneContext::new(self.window(), settings);
        let scene = build(&mut ctx)?;
        log::info!("Loaded scene {}", scene.name());
        self.scenes.push_back(LoadedScene {
            scene: Box::new(scene),
            ctx,
        });
        Ok(())
    }

    /// Run every loaded scene to completion, one after another, then
    /// release the platform
    ///
    /// # Errors
    ///
    /// Returns the first fatal error; the platform is shut down either way
    pub fn run_engine(&mut self) -> Result<(), EngineError> {
        let result = self.run_scenes();
        self.platform.shutdown();
        log::info!("Engine shut down");
        result
    }

    fn run_scenes(&mut self) -> Result<(), EngineError> {
        self.apply_window()?;
        while let Some(loaded) = self.scenes.pop_front() {
            self.run_scene(loaded)?;
        }
        Ok(())
    }

    fn run_scene(&mut self, loaded: LoadedScene) -> Result<(), EngineError> {
        let LoadedScene { mut scene, mut ctx } = loaded;
        log::info!("Starting scene {}", scene.name());
        scene.start(&mut ctx)?;

        loop {
            self.events.clear();
            self.platform.poll_events(&mut self.events)?;
            self.follow_os_resizes();
            let frametime = self.clock.sample();
            ctx.begin_frame(&self.events, frametime);

            scene.before_update(&mut ctx);
            scene.update(&mut ctx);
            ctx.step_physics();
            scene.after_update(&mut ctx);
            ctx.update_camera();
            scene.draw(&mut ctx);
            ctx.draw_physics_debug();
            self.apply_window()?;
            self.present();
            log::trace!("Frame {} took {frametime:.2} ms", self.clock.frames());

            if ctx.quit_requested() {
                scene.quit(&mut ctx);
                log::info!("Scene {} finished", scene.name());
                log::debug!("{}", ctx.stats().format_stats());
                return Ok(());
            }

            self.clock.wait(ctx.framerate);
        }
    }

    fn follow_os_resizes(&self) {
        let resized = self.events.iter().rev().find_map(|event| match event {
            InputEvent::Resized(w, h) => Some((*w, *h)),
            _ => None,
        });
        if let Some((width, height)) = resized {
            match self.window.try_borrow_mut() {
                Ok(mut window) => window.handle_resize(width, height),
                Err(_) => log::warn!("Window busy, resize to {width}x{height} skipped"),
            }
        }
    }

    fn apply_window(&mut self) -> Result<(), EngineError> {
        let Ok(window) = self.window.try_borrow() else {
            log::warn!("Window busy, requests deferred");
            return Ok(());
        };
        if self.applied_revision != Some(window.revision()) {
            self.platform.apply_window(&window)?;
            self.applied_revision = Some(window.revision());
        }
        Ok(())
    }

    fn present(&mut self) {
        let framebuffer = match self.window.try_borrow() {
            Ok(window) => window.framebuffer(),
            Err(_) => {
                log::warn!("Window busy, frame not presented");
                return;
            }
        };
        match framebuffer.try_borrow() {
            Ok(frame) => self.platform.present(&frame),
            Err(_) => log::warn!("Framebuffer busy, frame not presented"),
        }
    }
}
