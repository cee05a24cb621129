//! Start/stop-on-idle frame loop
//!
//! The display refresh callback is abstracted as a [`FrameScheduler`]. An
//! [`AnimationLoop`] asks for a frame only while its target has work to do
//! and stops itself once the target goes idle; the next `start` (for
//! example after a fresh spawn) brings it back.

use crate::consts::{FRAME_DT, MAX_FRAME_DELTA, MAX_SUBSTEPS};

/// Something that can run a callback on the next display frame
pub trait FrameScheduler {
    fn request_frame(&mut self);
}

/// Work advanced once per frame
pub trait FrameDriven {
    fn step(&mut self);
    /// Nothing left to animate
    fn is_idle(&self) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum LoopState {
    #[default]
    Stopped,
    Running,
}

/// Frame loop with idempotent start/stop
#[derive(Debug, Default)]
pub struct AnimationLoop {
    state: LoopState,
    frames: u64,
}

impl AnimationLoop {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.state == LoopState::Running
    }

    /// Frames stepped since creation
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Request the first frame if stopped. Returns true if a frame was requested.
    pub fn start<S: FrameScheduler>(&mut self, scheduler: &mut S) -> bool {
        if self.is_running() {
            return false;
        }
        self.state = LoopState::Running;
        scheduler.request_frame();
        log::debug!("Animation loop started");
        true
    }

    /// Stop rescheduling. A frame already requested will find the loop stopped.
    pub fn stop(&mut self) -> bool {
        if !self.is_running() {
            return false;
        }
        self.state = LoopState::Stopped;
        log::debug!("Animation loop stopped after {} frames", self.frames);
        true
    }

    /// Display frame callback: step the target once, then reschedule or stop
    pub fn frame<T: FrameDriven, S: FrameScheduler>(&mut self, target: &mut T, scheduler: &mut S) {
        if !self.is_running() {
            return;
        }
        if !target.is_idle() {
            target.step();
            self.frames += 1;
        }
        if target.is_idle() {
            self.stop();
        } else {
            scheduler.request_frame();
        }
    }
}

/// Turns variable display frame deltas into whole fixed steps
#[derive(Debug, Clone, Default)]
pub struct FixedStep {
    accumulator: f32,
}

impl FixedStep {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }

    /// Add `dt` seconds and return how many `FRAME_DT` steps to run now.
    /// At most `MAX_SUBSTEPS`; time beyond that is dropped so a slow display
    /// never builds up a backlog.
    pub fn advance(&mut self, dt: f32) -> u32 {
        self.accumulator += dt.clamp(0.0, MAX_FRAME_DELTA);
        let mut steps = 0;
        while self.accumulator >= FRAME_DT && steps < MAX_SUBSTEPS {
            self.accumulator -= FRAME_DT;
            steps += 1;
        }
        self.accumulator = self.accumulator.min(FRAME_DT);
        steps
    }
}
