//! `teleop-hal` – Hardware Abstraction Layer
//!
//! Everything the stack knows about the robot's body.
//!
//! # Modules
//!
//! - [`actuator`] – [`ActuatorService`]: the async trait every backend
//!   implements (joints, locomotion, stiffness, speech, LEDs, autonomous
//!   life).
//! - [`sim`] – [`SimActuatorService`]: a recording, failure-injectable
//!   backend for tests and dry runs.
//! - [`trajectory`] – S-curve trajectory generation on top of
//!   [`ActuatorService::angle_interpolation`].
//! - [`poses`] – posture, arm, head and wave target tables.
//! - [`expressions`] – speech markup, mood animations and LED colours.

pub mod actuator;
pub mod expressions;
pub mod poses;
pub mod sim;
pub mod trajectory;

pub use actuator::ActuatorService;
pub use expressions::{LedColour, Mood, SpeechAnimation, Utterance};
pub use poses::{ArmPose, BODY_JOINTS, Posture};
pub use sim::{ActuatorCall, SimActuatorService};
pub use trajectory::{Trajectory, interpolate};
