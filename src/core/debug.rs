//! Frame statistics

use std::collections::VecDeque;

/// Rolling frame time statistics for one scene
#[derive(Debug, Clone)]
pub struct FrameStats {
    /// Recent frame times in milliseconds
    frame_times: VecDeque<f64>,
    max_samples: usize,
    fps: f64,
    avg_frame_time_ms: f64,
    min_frame_time_ms: f64,
    max_frame_time_ms: f64,
    total_frames: u64,
}

impl FrameStats {
    pub fn new() -> Self {
        Self::with_samples(120)
    }

    /// Keep a window of `max_samples` frames
    pub fn with_samples(max_samples: usize) -> Self {
        Self {
            frame_times: VecDeque::with_capacity(max_samples),
            max_samples: max_samples.max(1),
            fps: 0.0,
            avg_frame_time_ms: 0.0,
            min_frame_time_ms: 0.0,
            max_frame_time_ms: 0.0,
            total_frames: 0,
        }
    }

    /// Record one frame that took `frametime_ms`
    pub fn record_frame(&mut self, frametime_ms: f64) {
        self.total_frames += 1;

        if self.frame_times.len() >= self.max_samples {
            self.frame_times.pop_front();
        }
        self.frame_times.push_back(frametime_ms);

        self.update_stats();
    }

    fn update_stats(&mut self) {
        if self.frame_times.is_empty() {
            return;
        }

        let total: f64 = self.frame_times.iter().sum();
        let count = self.frame_times.len() as f64;

        if total > 0.0 {
            self.avg_frame_time_ms = total / count;
            self.fps = count * 1000.0 / total;
        } else {
            self.avg_frame_time_ms = 0.0;
            self.fps = 0.0;
        }

        self.min_frame_time_ms = self.frame_times.iter().copied().fold(f64::INFINITY, f64::min);
        self.max_frame_time_ms = self.frame_times.iter().copied().fold(0.0, f64::max);
    }

    pub fn fps(&self) -> f64 {
        self.fps
    }

    pub fn avg_frame_time_ms(&self) -> f64 {
        self.avg_frame_time_ms
    }

    pub fn min_frame_time_ms(&self) -> f64 {
        self.min_frame_time_ms
    }

    pub fn max_frame_time_ms(&self) -> f64 {
        self.max_frame_time_ms
    }

    pub fn total_frames(&self) -> u64 {
        self.total_frames
    }

    pub fn format_stats(&self) -> String {
        format!(
            "FPS: {:.1} | Frame: {:.2}ms (min: {:.2}, max: {:.2}) | {} frames",
            self.fps, self.avg_frame_time_ms, self.min_frame_time_ms, self.max_frame_time_ms, self.total_frames
        )
    }
}

impl Default for FrameStats {
    fn default() -> Self {
        Self::new()
    }
}
