// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::thread;
use std::time::{Duration, Instant};

/// Slack allowed past the frame budget before a frame counts as missed.
const MISSED_FRAME_TOLERANCE: Duration = Duration::from_micros(100);
const REPORT_INTERVAL: Duration = Duration::from_secs(1);

/// Measures frame deltas and paces the loop to a target rate.
///
/// Once per second the clock logs the measured frame rate, plus a warning
/// when frames overran their budget during that second.
#[derive(Debug, Clone)]
pub struct FrameClock {
    target_frame_time: Duration,
    frame_start: Instant,
    delta: f32,
    total_time: f64,
    frame_count: u64,
    report_start: Instant,
    report_frames: u32,
    report_missed: u32,
    fps: u32,
    missed_frames: u32,
}

impl FrameClock {
    /// Creates a clock targeting `target_fps`. A non-positive rate disables
    /// pacing.
    pub fn new(target_fps: f32) -> Self {
        Self::starting_at(target_fps, Instant::now())
    }

    /// Creates a clock whose first frame is measured from `now`.
    pub fn starting_at(target_fps: f32, now: Instant) -> Self {
        let target_frame_time = if target_fps > 0.0 && target_fps.is_finite() {
            Duration::from_secs_f64(1.0 / f64::from(target_fps))
        } else {
            Duration::ZERO
        };
        Self {
            target_frame_time,
            frame_start: now,
            delta: 0.0,
            total_time: 0.0,
            frame_count: 0,
            report_start: now,
            report_frames: 0,
            report_missed: 0,
            fps: 0,
            missed_frames: 0,
        }
    }

    /// Starts a frame and returns the seconds elapsed since the previous one.
    pub fn begin_frame(&mut self) -> f32 {
        self.begin_frame_at(Instant::now())
    }

    /// [`begin_frame`](Self::begin_frame) with an explicit timestamp.
    pub fn begin_frame_at(&mut self, now: Instant) -> f32 {
        let elapsed = now.saturating_duration_since(self.frame_start);
        self.frame_start = now;
        self.delta = elapsed.as_secs_f32();
        self.total_time += elapsed.as_secs_f64();
        self.frame_count += 1;
        self.report_frames += 1;

        if now.saturating_duration_since(self.report_start) >= REPORT_INTERVAL {
            self.fps = self.report_frames;
            self.missed_frames = self.report_missed;
            log::info!("FPS: {}", self.fps);
            if self.missed_frames > 0 {
                log::warn!("Missed {} of {} frames", self.missed_frames, self.fps);
            }
            self.report_start = now;
            self.report_frames = 0;
            self.report_missed = 0;
        }

        self.delta
    }

    /// Ends the frame, sleeping out whatever remains of the frame budget.
    pub fn end_frame(&mut self) {
        let wait = self.end_frame_at(Instant::now());
        if !wait.is_zero() {
            thread::sleep(wait);
        }
    }

    /// Ends the frame at `now` and returns how long the caller should wait.
    ///
    /// A frame that overran its budget is counted as missed and yields zero.
    pub fn end_frame_at(&mut self, now: Instant) -> Duration {
        if self.target_frame_time.is_zero() {
            return Duration::ZERO;
        }
        let spent = now.saturating_duration_since(self.frame_start);
        if spent > self.target_frame_time + MISSED_FRAME_TOLERANCE {
            self.report_missed += 1;
            return Duration::ZERO;
        }
        self.target_frame_time.saturating_sub(spent)
    }

    /// Budget for a single frame, zero when pacing is disabled.
    pub fn target_frame_time(&self) -> Duration {
        self.target_frame_time
    }

    /// Seconds between the last two frames.
    pub fn delta(&self) -> f32 {
        self.delta
    }

    /// Seconds accumulated over all frames.
    pub fn total_time(&self) -> f64 {
        self.total_time
    }

    /// Frames started so far.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Frames counted during the last full reporting second.
    pub fn fps(&self) -> u32 {
        self.fps
    }

    /// Missed frames during the last full reporting second.
    pub fn missed_frames(&self) -> u32 {
        self.missed_frames
    }
}
