//! Per-frame input snapshot

use glam::DVec2;
use rustc_hash::FxHashSet;
use smallvec::SmallVec;
use winit::event::MouseButton;
use winit::keyboard::KeyCode;

use super::event::InputEvent;

/// Input state for the current frame.
///
/// The event buffer is replaced by every call to
/// [`begin_frame`](Self::begin_frame); held keys and buttons persist until
/// their release event arrives.
#[derive(Debug, Default)]
pub struct Input {
    events: SmallVec<[InputEvent; 8]>,
    pressed_keys: FxHashSet<KeyCode>,
    just_pressed_keys: FxHashSet<KeyCode>,
    just_released_keys: FxHashSet<KeyCode>,
    pressed_mouse_buttons: FxHashSet<MouseButton>,
    just_pressed_mouse_buttons: FxHashSet<MouseButton>,
    mouse_position: DVec2,
    mouse_delta: DVec2,
    quit: bool,
}

impl Input {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the per-frame state with this frame's events
    pub fn begin_frame(&mut self, events: &[InputEvent]) {
        self.events.clear();
        self.events.extend_from_slice(events);
        self.just_pressed_keys.clear();
        self.just_released_keys.clear();
        self.just_pressed_mouse_buttons.clear();
        self.mouse_delta = DVec2::ZERO;
        self.quit = false;

        for event in events {
            match *event {
                InputEvent::Quit => self.quit = true,
                InputEvent::KeyDown(key) => {
                    if self.pressed_keys.insert(key) {
                        self.just_pressed_keys.insert(key);
                    }
                }
                InputEvent::KeyUp(key) => {
                    self.pressed_keys.remove(&key);
                    self.just_released_keys.insert(key);
                }
                InputEvent::MouseMoved(position) => {
                    self.mouse_delta += position - self.mouse_position;
                    self.mouse_position = position;
                }
                InputEvent::MouseButtonDown(button) => {
                    if self.pressed_mouse_buttons.insert(button) {
                        self.just_pressed_mouse_buttons.insert(button);
                    }
                }
                InputEvent::MouseButtonUp(button) => {
                    self.pressed_mouse_buttons.remove(&button);
                }
                InputEvent::Resized(..) => {}
            }
        }
    }

    /// Events captured this frame, in arrival order
    pub fn events(&self) -> &[InputEvent] {
        &self.events
    }

    /// Whether a quit signal arrived this frame
    pub fn quit_requested(&self) -> bool {
        self.quit
    }

    pub fn is_key_pressed(&self, key: KeyCode) -> bool {
        self.pressed_keys.contains(&key)
    }

    pub fn is_key_just_pressed(&self, key: KeyCode) -> bool {
        self.just_pressed_keys.contains(&key)
    }

    pub fn is_key_just_released(&self, key: KeyCode) -> bool {
        self.just_released_keys.contains(&key)
    }

    pub fn is_mouse_button_pressed(&self, button: MouseButton) -> bool {
        self.pressed_mouse_buttons.contains(&button)
    }

    pub fn is_mouse_button_just_pressed(&self, button: MouseButton) -> bool {
        self.just_pressed_mouse_buttons.contains(&button)
    }

    /// Cursor position in window pixels
    pub fn mouse_position(&self) -> DVec2 {
        self.mouse_position
    }

    /// Cursor movement since the previous frame
    pub fn mouse_delta(&self) -> DVec2 {
        self.mouse_delta
    }

    /// `+1` when only `positive` is held, `-1` when only `negative` is held
    pub fn axis(&self, negative: KeyCode, positive: KeyCode) -> f64 {
        let mut value = 0.0;
        if self.is_key_pressed(positive) {
            value += 1.0;
        }
        if self.is_key_pressed(negative) {
            value -= 1.0;
        }
        value
    }

    /// Forget every held key and button
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_press_and_release() {
        let mut input = Input::new();

        input.begin_frame(&[InputEvent::KeyDown(KeyCode::KeyW)]);
        assert!(input.is_key_pressed(KeyCode::KeyW));
        assert!(input.is_key_just_pressed(KeyCode::KeyW));

        // key repeat does not count as a fresh press
        input.begin_frame(&[InputEvent::KeyDown(KeyCode::KeyW)]);
        assert!(input.is_key_pressed(KeyCode::KeyW));
        assert!(!input.is_key_just_pressed(KeyCode::KeyW));

        input.begin_frame(&[]);
        assert!(input.is_key_pressed(KeyCode::KeyW));

        input.begin_frame(&[InputEvent::KeyUp(KeyCode::KeyW)]);
        assert!(!input.is_key_pressed(KeyCode::KeyW));
        assert!(input.is_key_just_released(KeyCode::KeyW));
    }

    #[test]
    fn test_events_replaced_every_frame() {
        let mut input = Input::new();
        input.begin_frame(&[InputEvent::Quit, InputEvent::Resized(10, 10)]);
        assert_eq!(input.events().len(), 2);
        assert!(input.quit_requested());

        input.begin_frame(&[]);
        assert!(input.events().is_empty());
        assert!(!input.quit_requested());
    }

    #[test]
    fn test_mouse_tracking() {
        let mut input = Input::new();
        input.begin_frame(&[
            InputEvent::MouseMoved(DVec2::new(10.0, 5.0)),
            InputEvent::MouseMoved(DVec2::new(12.0, 8.0)),
            InputEvent::MouseButtonDown(MouseButton::Left),
        ]);
        assert_eq!(input.mouse_position(), DVec2::new(12.0, 8.0));
        assert_eq!(input.mouse_delta(), DVec2::new(12.0, 8.0));
        assert!(input.is_mouse_button_just_pressed(MouseButton::Left));

        input.begin_frame(&[InputEvent::MouseButtonUp(MouseButton::Left)]);
        assert_eq!(input.mouse_delta(), DVec2::ZERO);
        assert!(!input.is_mouse_button_pressed(MouseButton::Left));
    }

    #[test]
    fn test_axis() {
        let mut input = Input::new();
        input.begin_frame(&[InputEvent::KeyDown(KeyCode::KeyD)]);
        assert_eq!(input.axis(KeyCode::KeyA, KeyCode::KeyD), 1.0);
        input.begin_frame(&[InputEvent::KeyDown(KeyCode::KeyA)]);
        assert_eq!(input.axis(KeyCode::KeyA, KeyCode::KeyD), 0.0);
        input.reset();
        assert_eq!(input.axis(KeyCode::KeyA, KeyCode::KeyD), 0.0);
    }
}
