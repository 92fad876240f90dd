use glam::DVec2;
use winit::event::MouseButton;
use winit::keyboard::KeyCode;

/// A discrete input event captured during one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// The window was closed or the OS asked the process to exit
    Quit,
    KeyDown(KeyCode),
    KeyUp(KeyCode),
    /// Cursor position in window pixels
    MouseMoved(DVec2),
    MouseButtonDown(MouseButton),
    MouseButtonUp(MouseButton),
    /// New framebuffer size in pixels
    Resized(u32, u32),
}
