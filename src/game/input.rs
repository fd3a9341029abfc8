//! Input Buffering and Recording
//!
//! Intents arrive asynchronously from an input source and are folded into
//! one [`IntentFrame`] per simulation step. Held directions are level
//! state; everything else is a one-shot trigger consumed by the step.

use serde::{Deserialize, Serialize};

use crate::core::direction::Direction;

// =============================================================================
// INTENTS
// =============================================================================

/// One decoded input event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Intent {
    /// Press or release a movement direction
    Hold {
        /// Direction
        dir: Direction,
        /// Pressed (true) or released (false)
        held: bool,
    },
    /// Swing towards a side
    Attack(Direction),
    /// Jump in the facing direction
    Jump,
    /// Talk to whoever is close
    Interact,
    /// Pause or resume
    PauseToggle,
    /// Confirm on menus and end screens
    Confirm,
    /// Move the inventory selector
    Selector(Direction),
}

/// Everything one step consumes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntentFrame {
    /// Held directions (N=1, E=2, S=4, W=8)
    pub held: u8,

    /// One-shot flags:
    /// - Bit 0: Jump
    /// - Bit 1: Interact
    /// - Bit 2: Pause toggle
    /// - Bit 3: Confirm
    pub flags: u8,

    /// Swing requested this step
    pub attack: Option<Direction>,

    /// Selector move requested this step
    pub selector: Option<Direction>,
}

impl IntentFrame {
    /// Jump flag bit
    pub const FLAG_JUMP: u8 = 0x01;

    /// Interact flag bit
    pub const FLAG_INTERACT: u8 = 0x02;

    /// Pause toggle flag bit
    pub const FLAG_PAUSE: u8 = 0x04;

    /// Confirm flag bit
    pub const FLAG_CONFIRM: u8 = 0x08;

    /// Nothing held, nothing triggered.
    pub const fn new() -> Self {
        Self {
            held: 0,
            flags: 0,
            attack: None,
            selector: None,
        }
    }

    /// Frame with the given directions held.
    pub fn holding(dirs: &[Direction]) -> Self {
        let mut frame = Self::new();
        for dir in dirs {
            frame.set_held(*dir, true);
        }
        frame
    }

    /// Whether a direction is held.
    #[inline]
    pub fn is_held(&self, dir: Direction) -> bool {
        self.held & (1 << dir as u8) != 0
    }

    /// Press or release a direction.
    #[inline]
    pub fn set_held(&mut self, dir: Direction, held: bool) {
        if held {
            self.held |= 1 << dir as u8;
        } else {
            self.held &= !(1 << dir as u8);
        }
    }

    /// Check if jump was pressed this step.
    #[inline]
    pub fn jump_pressed(&self) -> bool {
        self.flags & Self::FLAG_JUMP != 0
    }

    /// Check if interact was pressed this step.
    #[inline]
    pub fn interact_pressed(&self) -> bool {
        self.flags & Self::FLAG_INTERACT != 0
    }

    /// Check if pause was toggled this step.
    #[inline]
    pub fn pause_pressed(&self) -> bool {
        self.flags & Self::FLAG_PAUSE != 0
    }

    /// Check if confirm was pressed this step.
    #[inline]
    pub fn confirm_pressed(&self) -> bool {
        self.flags & Self::FLAG_CONFIRM != 0
    }

    /// Fold one intent into the frame.
    pub fn apply(&mut self, intent: Intent) {
        match intent {
            Intent::Hold { dir, held } => self.set_held(dir, held),
            Intent::Attack(dir) => self.attack = Some(dir),
            Intent::Jump => self.flags |= Self::FLAG_JUMP,
            Intent::Interact => self.flags |= Self::FLAG_INTERACT,
            Intent::PauseToggle => self.flags |= Self::FLAG_PAUSE,
            Intent::Confirm => self.flags |= Self::FLAG_CONFIRM,
            Intent::Selector(dir) => self.selector = Some(dir),
        }
    }

    /// Same frame with the one-shot triggers cleared.
    pub fn held_only(&self) -> Self {
        Self {
            held: self.held,
            ..Self::new()
        }
    }
}

// =============================================================================
// INTENT BUFFER
// =============================================================================

/// Collects intents between steps.
#[derive(Clone, Debug, Default)]
pub struct IntentBuffer {
    pending: IntentFrame,
}

impl IntentBuffer {
    /// Empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an intent for the next step.
    pub fn push(&mut self, intent: Intent) {
        self.pending.apply(intent);
    }

    /// Frame for the next step. Held directions carry over; one-shot
    /// triggers are handed out once.
    pub fn take_frame(&mut self) -> IntentFrame {
        let frame = self.pending;
        self.pending = frame.held_only();
        frame
    }

    /// Drop everything, held directions included.
    pub fn clear(&mut self) {
        self.pending = IntentFrame::new();
    }
}

// =============================================================================
// RECORDING
// =============================================================================

/// A frame change at a step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntentDelta {
    /// Step when this frame began
    pub step: u64,
    /// The new frame
    pub frame: IntentFrame,
}

/// Delta-compressed record of the frames fed to a world.
///
/// Only steps where the frame CHANGED are stored.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct InputRecording {
    /// RNG seed of the recorded run
    pub rng_seed: u64,

    /// Last recorded step
    pub end_step: u64,

    deltas: Vec<IntentDelta>,

    #[serde(skip)]
    last_frame: IntentFrame,
}

impl InputRecording {
    /// Empty recording for a run seeded with `rng_seed`.
    pub fn new(rng_seed: u64) -> Self {
        Self {
            rng_seed,
            end_step: 0,
            deltas: Vec::new(),
            last_frame: IntentFrame::new(),
        }
    }

    /// Record the frame fed at `step`.
    pub fn record(&mut self, step: u64, frame: IntentFrame) {
        self.end_step = step;
        if frame != self.last_frame {
            self.deltas.push(IntentDelta { step, frame });
            self.last_frame = frame;
        }
    }

    /// Frame in effect at `step`.
    pub fn frame_at(&self, step: u64) -> IntentFrame {
        let idx = self.deltas.partition_point(|d| d.step <= step);
        match idx {
            0 => IntentFrame::new(),
            i => self.deltas[i - 1].frame,
        }
    }

    /// Stored changes.
    pub fn deltas(&self) -> &[IntentDelta] {
        &self.deltas
    }

    /// Number of stored changes.
    pub fn delta_count(&self) -> usize {
        self.deltas.len()
    }

    /// Every `(step, frame)` from step 0 through `end_step`.
    pub fn replay_iter(&self) -> impl Iterator<Item = (u64, IntentFrame)> + '_ {
        let mut idx = 0;
        let mut current = IntentFrame::new();
        (0..=self.end_step).map(move |step| {
            while let Some(delta) = self.deltas.get(idx) {
                if delta.step > step {
                    break;
                }
                current = delta.frame;
                idx += 1;
            }
            (step, current)
        })
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_flags() {
        let mut frame = IntentFrame::new();
        assert_eq!(frame, frame.held_only());

        frame.apply(Intent::Jump);
        frame.apply(Intent::Confirm);
        assert!(frame.jump_pressed());
        assert!(frame.confirm_pressed());
        assert!(!frame.interact_pressed());
        assert!(!frame.pause_pressed());

        frame.apply(Intent::Hold { dir: Direction::West, held: true });
        assert!(frame.is_held(Direction::West));
        assert_eq!(frame.held, 0b1000);
        frame.apply(Intent::Hold { dir: Direction::West, held: false });
        assert_eq!(frame.held, 0);
    }

    #[test]
    fn test_buffer_keeps_held_drops_triggers() {
        let mut buffer = IntentBuffer::new();
        buffer.push(Intent::Hold { dir: Direction::North, held: true });
        buffer.push(Intent::Attack(Direction::East));
        buffer.push(Intent::Selector(Direction::South));

        let first = buffer.take_frame();
        assert!(first.is_held(Direction::North));
        assert_eq!(first.attack, Some(Direction::East));
        assert_eq!(first.selector, Some(Direction::South));

        let second = buffer.take_frame();
        assert!(second.is_held(Direction::North));
        assert_eq!(second, second.held_only());

        buffer.clear();
        assert_eq!(buffer.take_frame(), IntentFrame::new());
    }

    #[test]
    fn test_recording_delta_compression() {
        let mut rec = InputRecording::new(7);
        let walk = IntentFrame::holding(&[Direction::East]);
        for step in 0..4 {
            rec.record(step, walk);
        }
        assert_eq!(rec.delta_count(), 1);

        rec.record(4, IntentFrame::new());
        assert_eq!(rec.delta_count(), 2);
    }

    #[test]
    fn test_recording_frame_at() {
        let mut rec = InputRecording::new(7);
        let a = IntentFrame::holding(&[Direction::North]);
        let b = IntentFrame::holding(&[Direction::South]);
        rec.record(10, a);
        rec.record(20, b);

        assert_eq!(rec.frame_at(5), IntentFrame::new());
        assert_eq!(rec.frame_at(10), a);
        assert_eq!(rec.frame_at(15), a);
        assert_eq!(rec.frame_at(99), b);
    }

    #[test]
    fn test_replay_iter() {
        let mut rec = InputRecording::new(7);
        let mut jump = IntentFrame::new();
        jump.apply(Intent::Jump);
        rec.record(0, IntentFrame::holding(&[Direction::East]));
        rec.record(3, jump);
        rec.record(5, jump);

        let frames: Vec<_> = rec.replay_iter().collect();
        assert_eq!(frames.len(), 6);
        assert!(frames[2].1.is_held(Direction::East));
        assert!(frames[3].1.jump_pressed());
        assert_eq!(frames[5], (5, jump));
    }
}
