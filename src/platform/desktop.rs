//! winit window with a wgpu presenter

use std::sync::Arc;
use std::time::Duration;

use glam::DVec2;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::keyboard::PhysicalKey;
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
use winit::window::{Fullscreen, WindowId};

use super::{Platform, Window};
use crate::core::EngineError;
use crate::input::InputEvent;
use crate::renderer::{Canvas, Presenter};

#[derive(Debug, Clone, PartialEq)]
struct WindowRequest {
    caption: String,
    size: (u32, u32),
    fullscreen: bool,
}

impl WindowRequest {
    fn from_window(window: &Window) -> Self {
        Self {
            caption: window.caption().to_owned(),
            size: window.size(),
            fullscreen: window.is_fullscreen(),
        }
    }
}

struct DesktopApp {
    vsync: bool,
    request: WindowRequest,
    applied: Option<WindowRequest>,
    window: Option<Arc<winit::window::Window>>,
    presenter: Option<Presenter>,
    pending: Vec<InputEvent>,
    error: Option<EngineError>,
}

impl DesktopApp {
    fn create_window(&mut self, event_loop: &ActiveEventLoop) -> Result<(), EngineError> {
        let (width, height) = self.request.size;
        let mut attributes = winit::window::Window::default_attributes()
            .with_title(&self.request.caption)
            .with_inner_size(PhysicalSize::new(width, height));
        if self.request.fullscreen {
            attributes = attributes.with_fullscreen(Some(Fullscreen::Borderless(None)));
        }

        let window = Arc::new(event_loop.create_window(attributes)?);
        let presenter = pollster::block_on(Presenter::new(Arc::clone(&window), self.vsync))?;
        log::info!("Window created: {:?} {width}x{height}", self.request.caption);

        self.window = Some(window);
        self.presenter = Some(presenter);
        self.applied = Some(self.request.clone());
        Ok(())
    }

    fn apply_request(&mut self) {
        let Some(window) = &self.window else {
            return;
        };
        if self.applied.as_ref() == Some(&self.request) {
            return;
        }

        let previous = self.applied.take();
        if previous.as_ref().is_none_or(|p| p.caption != self.request.caption) {
            window.set_title(&self.request.caption);
        }
        if previous.as_ref().is_none_or(|p| p.size != self.request.size) {
            let (width, height) = self.request.size;
            let _ = window.request_inner_size(PhysicalSize::new(width, height));
        }
        if previous.as_ref().is_none_or(|p| p.fullscreen != self.request.fullscreen) {
            let mode = self.request.fullscreen.then_some(Fullscreen::Borderless(None));
            window.set_fullscreen(mode);
        }
        self.applied = Some(self.request.clone());
    }
}

impl ApplicationHandler for DesktopApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.create_window(event_loop) {
            log::error!("Failed to open window: {e}");
            self.error = Some(e);
            event_loop.exit();
        }
    }

    fn window_event(&mut self, _event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested");
                self.pending.push(InputEvent::Quit);
            }

            WindowEvent::Resized(size) => {
                if size.width > 0 && size.height > 0 {
                    if let Some(presenter) = &mut self.presenter {
                        presenter.resize(size.width, size.height);
                    }
                    self.pending.push(InputEvent::Resized(size.width, size.height));
                }
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(key) = event.physical_key {
                    self.pending.push(match event.state {
                        ElementState::Pressed => InputEvent::KeyDown(key),
                        ElementState::Released => InputEvent::KeyUp(key),
                    });
                }
            }

            WindowEvent::MouseInput { state, button, .. } => {
                self.pending.push(match state {
                    ElementState::Pressed => InputEvent::MouseButtonDown(button),
                    ElementState::Released => InputEvent::MouseButtonUp(button),
                });
            }

            WindowEvent::CursorMoved { position, .. } => {
                self.pending.push(InputEvent::MouseMoved(DVec2::new(position.x, position.y)));
            }

            _ => {}
        }
    }
}

/// Desktop backend: a winit event loop pumped once per frame
pub struct DesktopPlatform {
    event_loop: EventLoop<()>,
    app: DesktopApp,
}

impl DesktopPlatform {
    /// Create the OS event loop. The window opens on the first poll.
    ///
    /// # Errors
    ///
    /// Returns an error if the event loop cannot be created
    pub fn new(vsync: bool) -> Result<Self, EngineError> {
        let event_loop = EventLoop::new()?;
        Ok(Self {
            event_loop,
            app: DesktopApp {
                vsync,
                request: WindowRequest::from_window(&Window::default()),
                applied: None,
                window: None,
                presenter: None,
                pending: Vec::new(),
                error: None,
            },
        })
    }
}

impl Platform for DesktopPlatform {
    fn poll_events(&mut self, events: &mut Vec<InputEvent>) -> Result<(), EngineError> {
        let status = self
            .event_loop
            .pump_app_events(Some(Duration::ZERO), &mut self.app);
        if let Some(e) = self.app.error.take() {
            return Err(e);
        }
        events.append(&mut self.app.pending);
        if let PumpStatus::Exit(code) = status {
            log::info!("Event loop exited with code {code}");
            events.push(InputEvent::Quit);
        }
        Ok(())
    }

    fn apply_window(&mut self, window: &Window) -> Result<(), EngineError> {
        self.app.request = WindowRequest::from_window(window);
        self.app.apply_request();
        Ok(())
    }

    fn present(&mut self, frame: &Canvas) {
        if let Some(presenter) = &mut self.app.presenter {
            presenter.present(frame);
        }
    }

    fn shutdown(&mut self) {
        self.app.presenter = None;
        self.app.window = None;
        log::info!("Window closed");
    }
}
