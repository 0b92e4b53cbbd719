//! [`RobotState`] – the single authoritative state of the teleoperated
//! robot.
//!
//! The state is split into two critical-section groups:
//!
//! | Group | Fields | Primitive | May be held across backend calls |
//! |---|---|---|---|
//! | lock | `locked` | [`LockGate`] (async mutex) | yes, bounded |
//! | flags | `resting`, `moving`, `muted`, `breathing`, head pose | `std::sync::Mutex` | never |
//!
//! Every flag operation is a single read-modify-write under the flags mutex
//! and returns what the caller needs to act on, so no caller ever holds the
//! mutex while awaiting.

use std::sync::{Mutex, MutexGuard};

use teleop_types::{HeadNudge, HeadPitch, HeadTarget, HeadYaw};

use crate::lock_gate::LockGate;

/// A copy of every state field, for logging and assertions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateSnapshot {
    pub locked: bool,
    pub resting: bool,
    pub muted: bool,
    pub breathing: bool,
    pub moving: bool,
    pub head_pitch: HeadPitch,
    pub head_yaw: HeadYaw,
}

/// Result of recording a locomotion command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MotionUpdate {
    pub was_moving: bool,
    pub moving: bool,
}

impl MotionUpdate {
    /// The base must be commanded when it moves now or has to be stopped.
    pub fn needs_command(&self) -> bool {
        self.was_moving || self.moving
    }
}

#[derive(Debug)]
struct Flags {
    resting: bool,
    muted: bool,
    breathing: bool,
    moving: bool,
    head_pitch: HeadPitch,
    head_yaw: HeadYaw,
}

/// Shared robot state.  Wrap in an `Arc` and hand it to every dispatch task.
#[derive(Debug)]
pub struct RobotState {
    lock: LockGate,
    flags: Mutex<Flags>,
}

impl Default for RobotState {
    fn default() -> Self {
        Self::new()
    }
}

impl RobotState {
    /// Unlocked, awake, muted, not breathing, standing still, head centred.
    pub fn new() -> Self {
        Self {
            lock: LockGate::new(),
            flags: Mutex::new(Flags {
                resting: false,
                muted: true,
                breathing: false,
                moving: false,
                head_pitch: HeadPitch::PitchStraight,
                head_yaw: HeadYaw::YawStraight,
            }),
        }
    }

    /// The emergency lock.
    pub fn lock_gate(&self) -> &LockGate {
        &self.lock
    }

    fn flags(&self) -> MutexGuard<'_, Flags> {
        self.flags.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn is_resting(&self) -> bool {
        self.flags().resting
    }

    pub fn set_resting(&self, resting: bool) {
        self.flags().resting = resting;
    }

    pub fn is_muted(&self) -> bool {
        self.flags().muted
    }

    pub fn is_breathing(&self) -> bool {
        self.flags().breathing
    }

    pub fn is_moving(&self) -> bool {
        self.flags().moving
    }

    /// Flip breathing; returns the new value.
    pub fn toggle_breathing(&self) -> bool {
        let mut flags = self.flags();
        flags.breathing = !flags.breathing;
        flags.breathing
    }

    /// Flip mute; returns the new value.
    pub fn toggle_muted(&self) -> bool {
        let mut flags = self.flags();
        flags.muted = !flags.muted;
        flags.muted
    }

    /// Record the base velocity about to be applied.
    pub fn record_motion(&self, forward: f32, twist: f32) -> MotionUpdate {
        let mut flags = self.flags();
        let was_moving = flags.moving;
        flags.moving = forward.abs() > 0.0 || twist.abs() > 0.0;
        MotionUpdate {
            was_moving,
            moving: flags.moving,
        }
    }

    /// Advance the head pose one step (saturating) and return the pose of
    /// the axis that was nudged.
    pub fn nudge_head(&self, nudge: HeadNudge) -> HeadTarget {
        let mut flags = self.flags();
        match nudge {
            HeadNudge::Up => {
                flags.head_pitch = flags.head_pitch.raised();
                HeadTarget::Pitch(flags.head_pitch)
            }
            HeadNudge::Down => {
                flags.head_pitch = flags.head_pitch.lowered();
                HeadTarget::Pitch(flags.head_pitch)
            }
            HeadNudge::Left => {
                flags.head_yaw = flags.head_yaw.turned_left();
                HeadTarget::Yaw(flags.head_yaw)
            }
            HeadNudge::Right => {
                flags.head_yaw = flags.head_yaw.turned_right();
                HeadTarget::Yaw(flags.head_yaw)
            }
        }
    }

    /// Copy of every field.  `locked` is read without waiting for an
    /// in-flight lock transition.
    pub fn snapshot(&self) -> StateSnapshot {
        let flags = self.flags();
        StateSnapshot {
            locked: self.lock.peek(),
            resting: flags.resting,
            muted: flags.muted,
            breathing: flags.breathing,
            moving: flags.moving,
            head_pitch: flags.head_pitch,
            head_yaw: flags.head_yaw,
        }
    }
}
