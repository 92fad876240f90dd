//! A ball pushed around with WASD against quadratic drag, leaving a trail

use glam::DVec2;

use crate::core::{EngineError, Scene, SceneContext, SceneSettings};
use crate::input::KeyCode;
use crate::physics::{BodyDesc, PhysicsBody, Shape};
use crate::renderer::{BlendMode, Canvas, Color, Quadrants, SurfaceHandle};

const THRUST: f64 = 500.0;
const DRAG_COEFFICIENT: f64 = 10.0;
const BALL_RADIUS: f64 = 0.5;
const TRAIL_WIDTH: f64 = 0.01;

pub struct BrownianScene {
    ball: PhysicsBody,
    position: DVec2,
    prev_position: DVec2,
    max_x: f64,
    max_y: f64,
    trail: SurfaceHandle,
}

impl BrownianScene {
    /// The simulated ball
    pub fn ball(&self) -> &PhysicsBody {
        &self.ball
    }

    /// Largest distance from the origin reached along each axis
    pub fn max_extent(&self) -> DVec2 {
        DVec2::new(self.max_x, self.max_y)
    }

    /// Quadratic drag opposing the current velocity
    fn drag(velocity: DVec2) -> DVec2 {
        let speed = velocity.length();
        if speed == 0.0 {
            return DVec2::ZERO;
        }
        -velocity.normalize() * DRAG_COEFFICIENT * speed * speed
    }
}

impl Scene for BrownianScene {
    fn settings() -> SceneSettings {
        SceneSettings::default()
            .with_physics(true)
            .with_clear_color(Color::BLACK)
    }

    fn create(ctx: &mut SceneContext) -> Result<Self, EngineError> {
        let (width, height) = ctx.window.borrow().size();
        Ok(Self {
            ball: PhysicsBody::new(BodyDesc::dynamic(Shape::Circle { radius: BALL_RADIUS }).with_mass(10.0)),
            position: DVec2::ZERO,
            prev_position: DVec2::ZERO,
            max_x: 0.0,
            max_y: 0.0,
            trail: Canvas::new(width, height, true).into_handle(),
        })
    }

    fn start(&mut self, ctx: &mut SceneContext) -> Result<(), EngineError> {
        ctx.window.borrow_mut().set_caption("Brownian Motion Sim");
        if let Some(physics) = ctx.physics_mut() {
            physics.set_gravity(DVec2::ZERO);
            physics.add_object(&self.ball)?;
        }
        Ok(())
    }

    fn update(&mut self, ctx: &mut SceneContext) {
        let thrust = DVec2::new(
            ctx.input.axis(KeyCode::KeyA, KeyCode::KeyD),
            ctx.input.axis(KeyCode::KeyS, KeyCode::KeyW),
        ) * THRUST;

        let Some(physics) = ctx.physics_mut() else {
            return;
        };
        if let Some(velocity) = physics.velocity(&self.ball) {
            physics.apply_force_at_local_point(&self.ball, Self::drag(velocity), DVec2::ZERO);
        }
        if thrust != DVec2::ZERO {
            physics.apply_force_at_local_point(&self.ball, thrust, DVec2::ZERO);
        }

        self.prev_position = self.position;
        self.position = self.ball.position().unwrap_or(self.position);
        self.max_x = self.max_x.max(self.position.x.abs());
        self.max_y = self.max_y.max(self.position.y.abs());
    }

    fn draw(&mut self, ctx: &mut SceneContext) {
        let renderer = &mut ctx.renderer;

        let previous = renderer.get_active_surface();
        renderer.set_active_surface(&self.trail);
        renderer.draw_line_world(self.prev_position, self.position, TRAIL_WIDTH, Color::rgb(0, 255, 0));
        renderer.set_active_surface(&previous);

        // the ball is drawn where this frame's step left it
        let ball = self.ball.position().unwrap_or(self.position);
        renderer.clear();
        renderer.draw_circle_fill_world(ball, BALL_RADIUS, Color::rgb(0, 0, 255), Quadrants::ALL);
        renderer.blit_surface_world(&self.trail.borrow(), DVec2::ZERO, 0.0, BlendMode::Normal);
    }

    fn quit(&mut self, _ctx: &mut SceneContext) {
        log::info!("Max X: {} | Max Y: {}", self.max_x, self.max_y);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{EngineConfig, EngineRuntime};
    use crate::input::InputEvent;
    use crate::platform::HeadlessPlatform;

    #[test]
    fn test_drag_opposes_velocity() {
        assert_eq!(BrownianScene::drag(DVec2::ZERO), DVec2::ZERO);
        let drag = BrownianScene::drag(DVec2::new(2.0, 0.0));
        assert!((drag - DVec2::new(-40.0, 0.0)).length() < 1e-12);
    }

    #[test]
    fn test_ball_drawn_at_post_step_position() {
        let window = crate::platform::Window::new("brownian", 400, 100).into_handle();
        let mut ctx = SceneContext::new(window, BrownianScene::settings());
        let mut scene = BrownianScene::create(&mut ctx).unwrap();
        scene.start(&mut ctx).unwrap();
        ctx.physics_mut().unwrap().set_velocity(scene.ball(), DVec2::X);

        ctx.begin_frame(&[], 1000.0);
        scene.update(&mut ctx);
        ctx.step_physics();
        scene.draw(&mut ctx);

        let x = scene.ball().position().unwrap().x;
        assert!(x > 0.2, "ball only reached {x}");
        let right_edge = (200.0 + (x + BALL_RADIUS) * 100.0 - 3.0).round() as u32;
        let framebuffer = ctx.window.borrow().framebuffer();
        let frame = framebuffer.borrow();
        assert_eq!(frame.pixel(right_edge, 50), Some(Color::rgb(0, 0, 255)));
        // left edge of the pre-step ball
        assert_eq!(frame.pixel(153, 50), Some(Color::BLACK));
    }

    #[test]
    fn test_thrust_moves_ball_and_draws_trail() {
        let platform = HeadlessPlatform::new()
            .with_script(vec![vec![InputEvent::KeyDown(KeyCode::KeyD)]])
            .with_quit_after(6);
        let mut runtime = EngineRuntime::new(EngineConfig::default().with_size(200, 100), platform);

        let mut handles = None;
        runtime
            .load_scene_with(BrownianScene::settings().with_framerate(0), |ctx| {
                let scene = BrownianScene::create(ctx)?;
                handles = Some((scene.ball().clone(), SurfaceHandle::clone(&scene.trail)));
                Ok(scene)
            })
            .unwrap();
        runtime.run_engine().unwrap();

        let (ball, trail) = handles.unwrap();
        let position = ball.position().unwrap();
        assert!(position.x > 0.0);
        assert!(position.y.abs() < 1e-9);
        assert_eq!(runtime.platform().caption(), "Brownian Motion Sim");

        // the ball starts at the window center and the trail leads right from it
        let trail = trail.borrow();
        let drawn = (100..110).any(|x| trail.pixel(x, 50).is_some_and(|c| c.a > 0));
        assert!(drawn);
        assert_eq!(trail.pixel(100, 10).map(|c| c.a), Some(0));

        let frame = runtime.platform().last_frame().unwrap();
        assert_eq!(frame.pixel(100, 30), Some(Color::rgb(0, 0, 255)));
        assert_eq!(frame.pixel(0, 0), Some(Color::BLACK));
    }
}
