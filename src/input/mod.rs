//! Input handling module
//!
//! Platforms translate OS events into [`InputEvent`]s once per frame;
//! [`Input`] turns that snapshot into queryable key and mouse state.

mod event;
mod state;

pub use event::InputEvent;
pub use state::Input;
pub use winit::event::MouseButton;
pub use winit::keyboard::KeyCode;
