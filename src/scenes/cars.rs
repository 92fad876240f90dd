//! Loads a sprite and greeting from a YAML config and animates a marker

use glam::DVec2;
use serde::Deserialize;

use crate::assets::{Asset, AssetError, AssetHandle};
use crate::core::{EngineError, Scene, SceneContext, SceneSettings};
use crate::renderer::{DEFAULT_RENDER_COLOR, Quadrants, Sprite};

const CONFIG_FILE: &str = "config.yaml";
const MARKER_BOUND: f64 = 2.0;
const MARKER_SPEED: f64 = 0.05;

#[derive(Debug, Clone, Deserialize)]
struct CarsConfig {
    cars: CarEntry,
}

#[derive(Debug, Clone, Deserialize)]
struct CarEntry {
    sf25_path: String,
    welcome_text: String,
    #[serde(default = "default_sprite_size")]
    sprite_size: [f64; 2],
}

fn default_sprite_size() -> [f64; 2] {
    [1.0, 1.0]
}

pub struct CarsScene {
    sprite: AssetHandle<Sprite>,
    welcome: String,
    marker: DVec2,
    direction: f64,
}

impl CarsScene {
    pub fn welcome_text(&self) -> &str {
        &self.welcome
    }

    pub fn sprite(&self) -> &AssetHandle<Sprite> {
        &self.sprite
    }

    /// Current marker position, bouncing between the horizontal bounds
    pub fn marker(&self) -> DVec2 {
        self.marker
    }
}

impl Scene for CarsScene {
    fn settings() -> SceneSettings {
        SceneSettings::default().with_asset_root(concat!(env!("CARGO_MANIFEST_DIR"), "/assets/cars"))
    }

    fn create(ctx: &mut SceneContext) -> Result<Self, EngineError> {
        let config = ctx.assets.load_config("config", CONFIG_FILE)?;
        let parsed: CarsConfig = config.deserialize().map_err(|e| AssetError::Parse {
            path: ctx.assets.root().join(CONFIG_FILE),
            message: e.to_string(),
        })?;

        let [width, height] = parsed.cars.sprite_size;
        let sprite_path = ctx.assets.root().join(&parsed.cars.sf25_path);
        let sprite = AssetHandle::new(Sprite::load(&sprite_path)?.with_size(DVec2::new(width, height)));
        ctx.assets.insert("sf25", Asset::Sprite(sprite.clone()));

        log::info!("Loaded {} assets from {}", ctx.assets.len(), ctx.assets.root().display());
        Ok(Self {
            sprite,
            welcome: parsed.cars.welcome_text,
            marker: DVec2::ZERO,
            direction: 1.0,
        })
    }

    fn start(&mut self, ctx: &mut SceneContext) -> Result<(), EngineError> {
        ctx.window.borrow_mut().set_caption("Cars");
        Ok(())
    }

    fn update(&mut self, _ctx: &mut SceneContext) {
        self.marker.x += MARKER_SPEED * self.direction;
        if self.marker.x.abs() >= MARKER_BOUND {
            self.marker.x = self.marker.x.clamp(-MARKER_BOUND, MARKER_BOUND);
            self.direction = -self.direction;
        }
    }

    fn draw(&mut self, ctx: &mut SceneContext) {
        let renderer = &ctx.renderer;
        renderer.clear();
        renderer.draw_circle_fill_world(self.marker, 1.0, DEFAULT_RENDER_COLOR, Quadrants::ALL);
        renderer.draw_text_world(&self.welcome, DVec2::new(0.0, 2.5), 0.0, DEFAULT_RENDER_COLOR, None);
        renderer.draw_sprite(&self.sprite, DVec2::ZERO, 0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{EngineConfig, EngineRuntime};
    use crate::platform::{HeadlessPlatform, Window};

    fn context() -> SceneContext {
        SceneContext::new(Window::new("cars", 640, 480).into_handle(), CarsScene::settings())
    }

    #[test]
    fn test_create_reads_config_and_sprite() {
        let mut ctx = context();
        let scene = CarsScene::create(&mut ctx).unwrap();
        assert_eq!(scene.welcome_text(), "Welcome to the cars scene");
        assert_eq!(scene.sprite().size, DVec2::new(2.0, 1.0));
        assert_eq!(scene.sprite().texture_size(), (64, 32));
        assert!(ctx.assets.sprite("sf25").is_some());
        assert!(ctx.assets.config("config").is_some());
    }

    #[test]
    fn test_missing_config_fails_creation() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = SceneContext::new(
            Window::new("cars", 64, 48).into_handle(),
            SceneSettings::default().with_asset_root(dir.path()),
        );
        let result = CarsScene::create(&mut ctx);
        assert!(matches!(result, Err(EngineError::Asset(AssetError::Io { .. }))));
    }

    #[test]
    fn test_marker_bounces_between_bounds() {
        let mut ctx = context();
        let mut scene = CarsScene::create(&mut ctx).unwrap();
        let mut max = 0.0_f64;
        let mut min = 0.0_f64;
        for _ in 0..400 {
            scene.update(&mut ctx);
            max = max.max(scene.marker().x);
            min = min.min(scene.marker().x);
        }
        assert!((max - MARKER_BOUND).abs() < 1e-9);
        assert!((min + MARKER_BOUND).abs() < 1e-9);
    }

    #[test]
    fn test_welcome_text_visible_above_marker() {
        let mut ctx = SceneContext::new(Window::new("cars", 1280, 720).into_handle(), CarsScene::settings());
        let mut scene = CarsScene::create(&mut ctx).unwrap();
        scene.draw(&mut ctx);

        // text centered 2.5 units above the origin, screen row 110
        let framebuffer = ctx.window.borrow().framebuffer();
        let frame = framebuffer.borrow();
        let text_pixels = (95..125)
            .flat_map(|y| (300..980).map(move |x| (x, y)))
            .filter(|&(x, y)| frame.pixel(x, y) == Some(DEFAULT_RENDER_COLOR))
            .count();
        assert!(text_pixels > 20, "only {text_pixels} text pixels");
    }

    #[test]
    fn test_runs_headless_and_draws_sprite() {
        let platform = HeadlessPlatform::new().with_quit_after(3);
        let mut runtime = EngineRuntime::new(EngineConfig::default().with_size(640, 480), platform);
        runtime
            .load_scene_with(CarsScene::settings().with_framerate(0), CarsScene::create)
            .unwrap();
        runtime.run_engine().unwrap();

        assert_eq!(runtime.platform().presented_frames(), 3);
        assert_eq!(runtime.platform().caption(), "Cars");

        // the sprite covers 200x100 pixels around the window center
        let frame = runtime.platform().last_frame().unwrap();
        let sprite_pixel = frame.pixel(320, 240).unwrap();
        assert_ne!(sprite_pixel, DEFAULT_RENDER_COLOR);
        assert_eq!(frame.pixel(5, 470), Some(crate::renderer::DEFAULT_CLEAR_COLOR));
    }
}
