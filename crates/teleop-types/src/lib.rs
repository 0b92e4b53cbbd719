//! `teleop-types` – shared vocabulary of the teleoperation stack.
//!
//! - [`ControlEvent`] – the fixed-schema record carried by every protocol
//!   frame.
//! - [`HeadPitch`] / [`HeadYaw`] / [`HeadNudge`] – the discrete head pose
//!   state machine.
//! - [`TeleopError`] – the error taxonomy shared by every crate, classified
//!   by [`ErrorClass`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ────────────────────────────────────────────────────────────────────────────
// ControlEvent
// ────────────────────────────────────────────────────────────────────────────

/// One controller sample, decoded from exactly one protocol frame.
///
/// The schema is closed: every field must be present and no other field is
/// accepted.  Button fields are momentary and travel on the wire as `0`/`1`
/// integers (`true`/`false` are also accepted when decoding).
///
/// ```
/// use teleop_types::ControlEvent;
///
/// let ev = ControlEvent { info: true, ..ControlEvent::neutral() };
/// assert!(ev.any_active());
/// assert!(!ControlEvent::neutral().any_active());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ControlEvent {
    /// Forward/backward stick, nominally in `[-1, 1]`.
    #[serde(deserialize_with = "stick::deserialize")]
    pub velocity: f32,
    /// Rotation stick, nominally in `[-1, 1]`.
    #[serde(deserialize_with = "stick::deserialize")]
    pub twist: f32,

    /// Standing posture (also the only command accepted while resting).
    #[serde(with = "button")]
    pub a: bool,
    /// Rest.
    #[serde(with = "button")]
    pub b: bool,
    /// Welcoming posture.
    #[serde(with = "button")]
    pub x: bool,
    /// Hands-on-hips posture.
    #[serde(with = "button")]
    pub y: bool,

    /// "What next?" meta behavior.
    #[serde(with = "button")]
    pub lb: bool,
    /// "Thank you" meta behavior.
    #[serde(with = "button")]
    pub rb: bool,
    /// Two-armed aloha gesture.
    #[serde(with = "button")]
    pub center: bool,
    /// Emergency stop + lock.
    #[serde(with = "button")]
    pub info: bool,
    /// Unlock.
    #[serde(with = "button")]
    pub start: bool,

    /// Toggles idle breathing.
    #[serde(rename = "left joy button", alias = "leftJoyButton", with = "button")]
    pub left_joy_button: bool,
    /// Toggles mute.
    #[serde(rename = "right joy button", alias = "rightJoyButton", with = "button")]
    pub right_joy_button: bool,

    #[serde(with = "button")]
    pub up: bool,
    #[serde(with = "button")]
    pub down: bool,
    #[serde(with = "button")]
    pub left: bool,
    #[serde(with = "button")]
    pub right: bool,
}

impl ControlEvent {
    /// An event with the sticks centred and no button pressed.
    pub fn neutral() -> Self {
        Self::default()
    }

    /// `true` when any stick is deflected or any button is pressed.
    pub fn any_active(&self) -> bool {
        self.velocity != 0.0 || self.twist != 0.0 || self.any_button()
    }

    /// `true` when any momentary button is pressed.
    pub fn any_button(&self) -> bool {
        self.a
            || self.b
            || self.x
            || self.y
            || self.lb
            || self.rb
            || self.center
            || self.info
            || self.start
            || self.left_joy_button
            || self.right_joy_button
            || self.up
            || self.down
            || self.left
            || self.right
    }

    /// Release every momentary button while keeping the stick positions.
    pub fn release_buttons(&mut self) {
        *self = Self {
            velocity: self.velocity,
            twist: self.twist,
            ..Self::neutral()
        };
    }
}

/// Stick positions: any finite JSON number.  Out-of-range literals such as
/// `1e39` would otherwise decode to infinity.
mod stick {
    use serde::de::{self, Unexpected};
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<f32, D::Error> {
        let value = f32::deserialize(d)?;
        if value.is_finite() {
            Ok(value)
        } else {
            Err(de::Error::invalid_value(
                Unexpected::Float(f64::from(value)),
                &"a finite stick position",
            ))
        }
    }
}

/// `0`/`1` wire encoding for momentary buttons.
mod button {
    use std::fmt;

    use serde::de::{self, Unexpected, Visitor};
    use serde::{Deserializer, Serializer};

    pub fn serialize<S: Serializer>(pressed: &bool, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u8(u8::from(*pressed))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
        d.deserialize_any(ButtonVisitor)
    }

    struct ButtonVisitor;

    impl<'de> Visitor<'de> for ButtonVisitor {
        type Value = bool;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("0, 1, true or false")
        }

        fn visit_bool<E: de::Error>(self, v: bool) -> Result<bool, E> {
            Ok(v)
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<bool, E> {
            match v {
                0 => Ok(false),
                1 => Ok(true),
                other => Err(E::invalid_value(Unexpected::Unsigned(other), &self)),
            }
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<bool, E> {
            match v {
                0 => Ok(false),
                1 => Ok(true),
                other => Err(E::invalid_value(Unexpected::Signed(other), &self)),
            }
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Head pose
// ────────────────────────────────────────────────────────────────────────────

/// Discrete head pitch.  Steps saturate at [`HeadPitch::Up`] and
/// [`HeadPitch::Down`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum HeadPitch {
    Up,
    #[default]
    PitchStraight,
    Down,
}

impl HeadPitch {
    /// One step toward [`HeadPitch::Up`].
    pub fn raised(self) -> Self {
        match self {
            HeadPitch::Down => HeadPitch::PitchStraight,
            HeadPitch::PitchStraight | HeadPitch::Up => HeadPitch::Up,
        }
    }

    /// One step toward [`HeadPitch::Down`].
    pub fn lowered(self) -> Self {
        match self {
            HeadPitch::Up => HeadPitch::PitchStraight,
            HeadPitch::PitchStraight | HeadPitch::Down => HeadPitch::Down,
        }
    }
}

/// Discrete head yaw.  Steps saturate at [`HeadYaw::Left`] and
/// [`HeadYaw::Right`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum HeadYaw {
    Left,
    #[default]
    YawStraight,
    Right,
}

impl HeadYaw {
    /// One step toward [`HeadYaw::Left`].
    pub fn turned_left(self) -> Self {
        match self {
            HeadYaw::Right => HeadYaw::YawStraight,
            HeadYaw::YawStraight | HeadYaw::Left => HeadYaw::Left,
        }
    }

    /// One step toward [`HeadYaw::Right`].
    pub fn turned_right(self) -> Self {
        match self {
            HeadYaw::Left => HeadYaw::YawStraight,
            HeadYaw::YawStraight | HeadYaw::Right => HeadYaw::Right,
        }
    }
}

/// A single head nudge requested by the d-pad.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeadNudge {
    Up,
    Down,
    Left,
    Right,
}

/// The pose a nudge resolved to: only the axis that moved is reported,
/// because only that joint is commanded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadTarget {
    Pitch(HeadPitch),
    Yaw(HeadYaw),
}

// ────────────────────────────────────────────────────────────────────────────
// Errors
// ────────────────────────────────────────────────────────────────────────────

/// How far an error reaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Retry or carry on; the next event may succeed.
    Transient,
    /// Tear down the current connection (after stop-and-lock).
    ConnectionFatal,
    /// Abort the process.
    ProcessFatal,
}

/// Global error type spanning transport, protocol, actuator and
/// configuration failures.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TeleopError {
    #[error("Transport Error: {0}")]
    Transport(String),

    #[error("Protocol Error: {0}")]
    Protocol(String),

    #[error("Watchdog Timeout: no frame for {gap_ms} ms")]
    WatchdogTimeout { gap_ms: u64 },

    #[error("Actuator Fault on {operation}: {details}")]
    Actuator { operation: String, details: String },

    #[error("Invalid Command: {0}")]
    InvalidCommand(String),

    #[error("Configuration Error: {0}")]
    Config(String),
}

impl TeleopError {
    /// Classify the error for the supervisor's recovery policy.
    pub fn class(&self) -> ErrorClass {
        match self {
            TeleopError::Transport(_)
            | TeleopError::Actuator { .. }
            | TeleopError::InvalidCommand(_) => ErrorClass::Transient,
            TeleopError::Protocol(_) | TeleopError::WatchdogTimeout { .. } => {
                ErrorClass::ConnectionFatal
            }
            TeleopError::Config(_) => ErrorClass::ProcessFatal,
        }
    }

    /// Shorthand for an [`TeleopError::Actuator`] fault.
    pub fn actuator(operation: impl Into<String>, details: impl Into<String>) -> Self {
        TeleopError::Actuator {
            operation: operation.into(),
            details: details.into(),
        }
    }
}
