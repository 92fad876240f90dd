//! A platform without a window, driven by scripted input

use std::collections::VecDeque;

use super::{Platform, Window};
use crate::core::EngineError;
use crate::input::InputEvent;
use crate::renderer::Canvas;

/// Runs scenes with no OS window. Each poll hands out the next scripted
/// batch of events.
#[derive(Debug, Default)]
pub struct HeadlessPlatform {
    script: VecDeque<Vec<InputEvent>>,
    quit_after: Option<u64>,
    polls: u64,
    presented: u64,
    last_frame: Option<Canvas>,
    caption: String,
    fullscreen: bool,
    shut_down: bool,
}

impl HeadlessPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    /// Events for consecutive frames, one batch per frame
    #[must_use]
    pub fn with_script(mut self, frames: Vec<Vec<InputEvent>>) -> Self {
        self.script = frames.into();
        self
    }

    /// Emit a quit event on every `frames`-th poll
    #[must_use]
    pub fn with_quit_after(mut self, frames: u64) -> Self {
        self.quit_after = Some(frames);
        self
    }

    /// Frames polled so far
    pub fn polls(&self) -> u64 {
        self.polls
    }

    pub fn presented_frames(&self) -> u64 {
        self.presented
    }

    pub fn last_frame(&self) -> Option<&Canvas> {
        self.last_frame.as_ref()
    }

    /// Caption last applied
    pub fn caption(&self) -> &str {
        &self.caption
    }

    pub fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down
    }
}

impl Platform for HeadlessPlatform {
    fn poll_events(&mut self, events: &mut Vec<InputEvent>) -> Result<(), EngineError> {
        self.polls += 1;
        if let Some(batch) = self.script.pop_front() {
            events.extend(batch);
        }
        if let Some(n) = self.quit_after
            && n > 0
            && self.polls % n == 0
        {
            events.push(InputEvent::Quit);
        }
        Ok(())
    }

    fn apply_window(&mut self, window: &Window) -> Result<(), EngineError> {
        self.caption = window.caption().to_owned();
        self.fullscreen = window.is_fullscreen();
        Ok(())
    }

    fn present(&mut self, frame: &Canvas) {
        self.presented += 1;
        self.last_frame = Some(frame.clone());
    }

    fn shutdown(&mut self) {
        self.shut_down = true;
    }
}
