//! The shared window every scene draws into

use std::cell::RefCell;
use std::rc::Rc;

use crate::renderer::{Canvas, SurfaceHandle};

/// Shared handle to the engine window
pub type WindowHandle = Rc<RefCell<Window>>;

/// Window state requested by scenes.
///
/// Setters only record the request; the platform applies it at the next
/// frame boundary. The framebuffer handle stays the same for the lifetime
/// of the window so renderer bindings survive resizes.
#[derive(Debug)]
pub struct Window {
    caption: String,
    width: u32,
    height: u32,
    fullscreen: bool,
    framebuffer: SurfaceHandle,
    revision: u64,
}

impl Window {
    pub fn new(caption: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            caption: caption.into(),
            width,
            height,
            fullscreen: false,
            framebuffer: Canvas::new(width, height, false).into_handle(),
            revision: 0,
        }
    }

    pub fn into_handle(self) -> WindowHandle {
        Rc::new(RefCell::new(self))
    }

    pub fn caption(&self) -> &str {
        &self.caption
    }

    pub fn set_caption(&mut self, caption: impl Into<String>) {
        self.caption = caption.into();
        self.revision += 1;
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Request a new resolution; the framebuffer is resized immediately
    pub fn set_resolution(&mut self, width: u32, height: u32) {
        self.resize_framebuffer(width, height);
        self.revision += 1;
    }

    pub fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    pub fn set_fullscreen(&mut self, fullscreen: bool) {
        self.fullscreen = fullscreen;
        self.revision += 1;
    }

    pub fn toggle_fullscreen(&mut self) {
        self.set_fullscreen(!self.fullscreen);
    }

    /// The CPU framebuffer presented every frame
    pub fn framebuffer(&self) -> SurfaceHandle {
        SurfaceHandle::clone(&self.framebuffer)
    }

    /// Bumped by every request; platforms compare it to what they applied
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Follow a resize that came from the OS rather than from a scene
    pub(crate) fn handle_resize(&mut self, width: u32, height: u32) {
        if (width, height) != (self.width, self.height) && width > 0 && height > 0 {
            self.resize_framebuffer(width, height);
        }
    }

    fn resize_framebuffer(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        match self.framebuffer.try_borrow_mut() {
            Ok(mut canvas) => canvas.resize(width, height),
            Err(_) => log::warn!("Framebuffer busy, resize to {width}x{height} skipped"),
        }
    }
}

impl Default for Window {
    fn default() -> Self {
        Self::new("Playground", 1280, 720)
    }
}
