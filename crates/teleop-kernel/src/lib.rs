//! `teleop-kernel` – Safety & Arbitration Primitives
//!
//! The brainstem of the teleoperation server.  It does not decide what the
//! robot does; it holds the state and the exclusions that decisions are
//! made under.
//!
//! # Modules
//!
//! - [`state`] – [`RobotState`][state::RobotState]: lock, rest, mute,
//!   breathing, motion and head pose, with a documented critical section per
//!   field group.
//! - [`lock_gate`] – [`LockGate`][lock_gate::LockGate]: the emergency lock;
//!   transitions are atomic with respect to concurrent dispatch tasks.
//! - [`exclusion`] – [`Exclusion`][exclusion::Exclusion]: non-blocking
//!   try-acquire tokens for the behavior slot and the connection attempt.
//! - [`watchdog`] – [`LatencyWatchdog`][watchdog::LatencyWatchdog]:
//!   detects excessive silence between frames on a connection.

pub mod exclusion;
pub mod lock_gate;
pub mod state;
pub mod watchdog;

pub use exclusion::{Exclusion, ExclusionGuard};
pub use lock_gate::{LockGate, LockTransition};
pub use state::{MotionUpdate, RobotState, StateSnapshot};
pub use watchdog::{LatencyWatchdog, LinkHealth};
