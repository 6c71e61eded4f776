//! Frame-stepped path tracing with latest-wins cancellation.
//!
//! Every trace captures an [`AnimationToken`] from the [`AnimationClock`]. Starting
//! another trace, skipping, or regenerating the ladder bumps the clock, and the
//! stale trace notices on its next frame and stops without drawing.

use crate::layout::{Segment, partial_path, total_length};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AnimationToken(u64);

/// Monotonic generation counter.
#[derive(Clone, Debug, Default)]
pub struct AnimationClock {
    current: u64,
}

impl AnimationClock {
    /// New generation; the returned token is the only live one.
    pub fn begin(&mut self) -> AnimationToken {
        self.current += 1;
        AnimationToken(self.current)
    }

    /// Invalidate whatever is running.
    pub fn cancel(&mut self) {
        self.current += 1;
    }

    pub fn is_current(&self, token: AnimationToken) -> bool {
        token.0 == self.current
    }

    pub fn generation(&self) -> u64 {
        self.current
    }
}

/// Result of advancing one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Frame {
    /// Token is stale; do not draw.
    Cancelled,
    Running { progress: f64 },
    /// Path fully drawn.
    Finished,
}

#[derive(Clone, Debug)]
pub struct PathAnimation {
    token: AnimationToken,
    pub top: usize,
    pub bottom: usize,
    segments: Vec<Segment>,
    total_length: f64,
    progress: f64,
    step: f64,
}

impl PathAnimation {
    /// Pixels advanced per frame for a speed setting.
    pub fn step_for(speed: u32) -> f64 {
        3.0 + speed as f64 * 1.2
    }

    pub fn new(
        token: AnimationToken,
        top: usize,
        bottom: usize,
        segments: Vec<Segment>,
        speed: u32,
    ) -> Self {
        let total_length = total_length(&segments);
        Self {
            token,
            top,
            bottom,
            segments,
            total_length,
            progress: 0.0,
            step: Self::step_for(speed),
        }
    }

    pub fn token(&self) -> AnimationToken {
        self.token
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn total_length(&self) -> f64 {
        self.total_length
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn advance(&mut self, clock: &AnimationClock) -> Frame {
        if !clock.is_current(self.token) {
            return Frame::Cancelled;
        }
        self.progress += self.step;
        if self.progress < self.total_length {
            Frame::Running {
                progress: self.progress,
            }
        } else {
            self.progress = self.total_length;
            Frame::Finished
        }
    }

    /// Segments drawn so far.
    pub fn visible(&self) -> Vec<Segment> {
        partial_path(&self.segments, self.progress)
    }
}
