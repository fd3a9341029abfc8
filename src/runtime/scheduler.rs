//! Fixed-Timestep Scheduler
//!
//! Converts wall-clock time into a whole number of simulation steps.
//! Elapsed time is accumulated in step units; every whole unit runs one
//! [`World::step`] with the frame drained from the intent buffer.

use std::time::Duration;

use tracing::debug;

use crate::game::events::GameEvent;
use crate::game::input::{InputRecording, IntentBuffer};
use crate::game::world::World;

/// What one call to [`Scheduler::advance`] did.
#[derive(Debug, Default)]
pub struct Advance {
    /// Steps run
    pub steps: usize,
    /// Events from those steps, in order
    pub events: Vec<GameEvent>,
    /// The world wants to be rebuilt
    pub reset_requested: bool,
}

/// Step accumulator.
#[derive(Clone, Debug)]
pub struct Scheduler {
    updates_per_second: f64,
    accumulator: f64,
    recording: Option<InputRecording>,
}

impl Scheduler {
    /// Scheduler running `updates_per_second` steps per wall-clock second.
    pub fn new(updates_per_second: u32) -> Self {
        Self {
            updates_per_second: updates_per_second.max(1) as f64,
            accumulator: 0.0,
            recording: None,
        }
    }

    /// Record every frame fed to the world.
    pub fn with_recording(mut self, rng_seed: u64) -> Self {
        self.recording = Some(InputRecording::new(rng_seed));
        self
    }

    /// Duration of one step.
    pub fn step_duration(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.updates_per_second)
    }

    /// Fractional steps carried to the next call.
    pub fn pending(&self) -> f64 {
        self.accumulator
    }

    /// Recording so far, if enabled.
    pub fn recording(&self) -> Option<&InputRecording> {
        self.recording.as_ref()
    }

    /// Hand over the recording, leaving a fresh one for `rng_seed`.
    pub fn take_recording(&mut self, rng_seed: u64) -> Option<InputRecording> {
        self.recording
            .as_mut()
            .map(|rec| std::mem::replace(rec, InputRecording::new(rng_seed)))
    }

    /// Drop carried time, e.g. after a rebuild.
    pub fn clear(&mut self) {
        self.accumulator = 0.0;
    }

    /// Account for `elapsed` and run every whole step it covers.
    ///
    /// Nothing runs while the world has a reset pending; the carried time
    /// is discarded so the rebuilt world doesn't start with a burst.
    pub fn advance(&mut self, elapsed: Duration, world: &mut World, input: &mut IntentBuffer) -> Advance {
        let mut advance = Advance::default();
        if world.reset_requested() {
            self.accumulator = 0.0;
            advance.reset_requested = true;
            return advance;
        }

        self.accumulator += elapsed.as_secs_f64() * self.updates_per_second;
        while self.accumulator >= 1.0 {
            self.accumulator -= 1.0;

            let frame = input.take_frame();
            if let Some(rec) = self.recording.as_mut() {
                rec.record(world.steps, frame);
            }
            let result = world.step(frame);
            advance.steps += 1;
            advance.events.extend(result.events);

            if result.reset_requested {
                debug!(steps = advance.steps, "reset requested, holding steps");
                self.accumulator = 0.0;
                advance.reset_requested = true;
                break;
            }
        }
        advance
    }
}
