//! Window, input and presentation backends
//!
//! The runtime talks to the OS only through [`Platform`].

mod desktop;
mod headless;
mod window;

pub use desktop::DesktopPlatform;
pub use headless::HeadlessPlatform;
pub use window::{Window, WindowHandle};

use crate::core::EngineError;
use crate::input::InputEvent;
use crate::renderer::Canvas;

/// What the runtime needs from the host environment
pub trait Platform {
    /// Append every event that arrived since the previous call
    ///
    /// # Errors
    ///
    /// Returns an error if the OS window or GPU could not be set up
    fn poll_events(&mut self, events: &mut Vec<InputEvent>) -> Result<(), EngineError>;

    /// Apply caption, resolution and fullscreen requests
    ///
    /// # Errors
    ///
    /// Returns an error if the OS rejects the requested window
    fn apply_window(&mut self, window: &Window) -> Result<(), EngineError>;

    /// Show a finished frame
    fn present(&mut self, frame: &Canvas);

    /// Release the window and graphics resources
    fn shutdown(&mut self);
}
