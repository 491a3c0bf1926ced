//! Rolling-window frame timing for the stats readout.

use std::collections::VecDeque;
use std::time::Duration;

use instant::Instant;

use crate::constants::FRAME_TIMER_SAMPLES;

#[derive(Debug)]
pub struct FrameTimer {
    frame_times: VecDeque<Duration>,
    last_frame: Instant,
    max_samples: usize,
}

impl FrameTimer {
    pub fn new() -> Self {
        Self::with_samples(FRAME_TIMER_SAMPLES)
    }

    pub fn with_samples(max_samples: usize) -> Self {
        Self {
            frame_times: VecDeque::with_capacity(max_samples),
            last_frame: Instant::now(),
            max_samples: max_samples.max(1),
        }
    }

    /// Mark the start of a frame. Call once per tick.
    pub fn begin_frame(&mut self) {
        let now = Instant::now();
        let dt = now - self.last_frame;
        self.last_frame = now;
        self.record(dt);
    }

    /// Push one frame duration into the window.
    pub fn record(&mut self, dt: Duration) {
        self.frame_times.push_back(dt);
        while self.frame_times.len() > self.max_samples {
            self.frame_times.pop_front();
        }
    }

    fn total_secs(&self) -> f64 {
        self.frame_times.iter().map(|d| d.as_secs_f64()).sum()
    }

    pub fn fps(&self) -> f64 {
        let total = self.total_secs();
        if self.frame_times.is_empty() || total <= 0.0 {
            return 0.0;
        }
        self.frame_times.len() as f64 / total
    }

    pub fn frame_time_ms(&self) -> f64 {
        if self.frame_times.is_empty() {
            return 0.0;
        }
        self.total_secs() / self.frame_times.len() as f64 * 1000.0
    }

    pub fn sample_count(&self) -> usize {
        self.frame_times.len()
    }

    /// Short readout, e.g. `60.0 fps (16.67 ms)`.
    pub fn summary(&self) -> String {
        format!("{:.1} fps ({:.2} ms)", self.fps(), self.frame_time_ms())
    }
}

impl Default for FrameTimer {
    fn default() -> Self {
        Self::new()
    }
}
