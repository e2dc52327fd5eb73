//! Per-entity state components reused across enemy variants.

use serde::{Deserialize, Serialize};

/// Animation cursor.
///
/// Presentation data, but the frame index also gates gameplay events such
/// as the ranged attack release frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Animation {
    /// Current frame index.
    pub frame: usize,
    /// Time accumulated toward the next frame (seconds).
    pub timer: f32,
    /// Number of frames in the sequence.
    pub frame_count: usize,
    /// Seconds per frame at normal playback.
    pub frame_time: f32,
}

impl Animation {
    /// Creates a cursor at frame 0.
    #[must_use]
    pub const fn new(frame_count: usize, frame_time: f32) -> Self {
        Self {
            frame: 0,
            timer: 0.0,
            frame_count,
            frame_time,
        }
    }

    /// Accumulates `dt` and advances at most one frame once `step` seconds
    /// have elapsed. Returns true if the frame advanced.
    ///
    /// The frame index is not wrapped; callers decide what reaching
    /// `frame_count` means.
    pub fn advance(&mut self, dt: f32, step: f32) -> bool {
        self.timer += dt;
        if self.timer >= step {
            self.timer -= step;
            self.frame += 1;
            true
        } else {
            false
        }
    }

    /// Advances at normal speed and wraps around `frame_count`.
    pub fn advance_looping(&mut self, dt: f32) {
        if self.advance(dt, self.frame_time) && self.frame >= self.frame_count {
            self.frame = 0;
        }
    }

    /// Returns true once the frame index has run past the last frame.
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        self.frame >= self.frame_count
    }
}

impl Default for Animation {
    fn default() -> Self {
        Self::new(1, 0.1)
    }
}

/// Status effect timers, in seconds.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatusTimers {
    /// Autonomous movement is suppressed while positive.
    pub hit_stun: f32,
    /// Presentation-only hit flash.
    pub hit_flash: f32,
    /// The whole update is suppressed while positive.
    pub frozen: f32,
}

impl StatusTimers {
    /// Counts hit-stun and hit-flash toward zero, never below.
    pub fn decay_hit(&mut self, dt: f32) {
        self.hit_stun = (self.hit_stun - dt).max(0.0);
        self.hit_flash = (self.hit_flash - dt).max(0.0);
    }

    /// Returns true while hit-stunned.
    #[must_use]
    pub fn is_stunned(&self) -> bool {
        self.hit_stun > 0.0
    }

    /// Returns true while frozen.
    #[must_use]
    pub fn is_frozen(&self) -> bool {
        self.frozen > 0.0
    }
}
