//! In-process simulated backend for CI/CD testing without a robot.
//!
//! [`SimActuatorService`] records every call as an [`ActuatorCall`], tracks
//! joint angles and group stiffness, and can be told to fail specific
//! operations.  With [`SimActuatorService::with_realtime_motion`] trajectory
//! playback sleeps for the trajectory's duration, which lets tests observe
//! long-running behaviors overlapping newer events.
//!
//! # Example
//!
//! ```rust
//! use teleop_hal::{ActuatorService, ActuatorCall, SimActuatorService};
//!
//! # tokio_test_block_on(async {
//! let sim = SimActuatorService::new().with_angle("HeadYaw", 0.25);
//! let angles = sim.get_angles(&["HeadYaw"]).await.unwrap();
//! assert!((angles[0] - 0.25).abs() < f32::EPSILON);
//! assert!(matches!(sim.calls()[0], ActuatorCall::GetAngles(_)));
//! # });
//! # fn tokio_test_block_on<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap().block_on(f)
//! # }
//! ```

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use teleop_types::TeleopError;
use tracing::debug;

use crate::actuator::ActuatorService;

// ────────────────────────────────────────────────────────────────────────────
// Recorded calls
// ────────────────────────────────────────────────────────────────────────────

/// One call observed by the simulator.
#[derive(Debug, Clone, PartialEq)]
pub enum ActuatorCall {
    GetAngles(Vec<String>),
    SetAngles {
        names: Vec<String>,
        angles: Vec<f32>,
        speed_fraction: f32,
    },
    /// Only the final sample and the duration of each trajectory are kept.
    AngleInterpolation {
        names: Vec<String>,
        final_angles: Vec<f32>,
        duration: f32,
    },
    Move {
        forward: f32,
        lateral: f32,
        yaw: f32,
    },
    GetStiffnesses(String),
    SetStiffnesses {
        group: String,
        value: f32,
    },
    SetBreathEnabled {
        group: String,
        enabled: bool,
    },
    Rest,
    WakeUp,
    Say(String),
    SayAnimated(String),
    StopAll,
    SetVolume(f32),
    FadeRgb {
        target: String,
        colour: u32,
        seconds: f32,
    },
    GetAutonomousLife,
    SetAutonomousLife(String),
}

impl ActuatorCall {
    /// The [`ActuatorService`] method name that produced this call.
    pub fn operation(&self) -> &'static str {
        match self {
            ActuatorCall::GetAngles(_) => "get_angles",
            ActuatorCall::SetAngles { .. } => "set_angles",
            ActuatorCall::AngleInterpolation { .. } => "angle_interpolation",
            ActuatorCall::Move { .. } => "move_velocity",
            ActuatorCall::GetStiffnesses(_) => "get_stiffnesses",
            ActuatorCall::SetStiffnesses { .. } => "set_stiffnesses",
            ActuatorCall::SetBreathEnabled { .. } => "set_breath_enabled",
            ActuatorCall::Rest => "rest",
            ActuatorCall::WakeUp => "wake_up",
            ActuatorCall::Say(_) => "say",
            ActuatorCall::SayAnimated(_) => "say_animated",
            ActuatorCall::StopAll => "stop_all",
            ActuatorCall::SetVolume(_) => "set_volume",
            ActuatorCall::FadeRgb { .. } => "fade_rgb",
            ActuatorCall::GetAutonomousLife => "autonomous_life_state",
            ActuatorCall::SetAutonomousLife(_) => "set_autonomous_life_state",
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// SimActuatorService
// ────────────────────────────────────────────────────────────────────────────

struct SimState {
    calls: Vec<ActuatorCall>,
    angles: HashMap<String, f32>,
    stiffness: HashMap<String, f32>,
    failing: HashSet<String>,
    autonomous_life: String,
}

/// A recording stand-in for the robot backend.  Always succeeds unless an
/// operation was registered with [`fail_on`][Self::fail_on].
pub struct SimActuatorService {
    state: Mutex<SimState>,
    realtime: bool,
}

impl Default for SimActuatorService {
    fn default() -> Self {
        Self::new()
    }
}

impl SimActuatorService {
    /// A simulated robot with every joint at zero, no stiffness, and
    /// autonomous life in `"solitary"` mode.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(SimState {
                calls: Vec::new(),
                angles: HashMap::new(),
                stiffness: HashMap::new(),
                failing: HashSet::new(),
                autonomous_life: "solitary".to_string(),
            }),
            realtime: false,
        }
    }

    /// Preset the sensed angle of `joint`.
    pub fn with_angle(self, joint: &str, radians: f32) -> Self {
        self.lock().angles.insert(joint.to_string(), radians);
        self
    }

    /// Preset the stiffness reported for `group`.
    pub fn with_stiffness(self, group: &str, value: f32) -> Self {
        self.lock().stiffness.insert(group.to_string(), value);
        self
    }

    /// Preset the autonomous-life mode.
    pub fn with_autonomous_life(self, state: &str) -> Self {
        self.lock().autonomous_life = state.to_string();
        self
    }

    /// Make [`angle_interpolation`][ActuatorService::angle_interpolation]
    /// take as long as the trajectory it plays.
    pub fn with_realtime_motion(mut self) -> Self {
        self.realtime = true;
        self
    }

    /// Make every future call to `operation` (an [`ActuatorCall::operation`]
    /// name) fail with [`TeleopError::Actuator`].
    pub fn fail_on(&self, operation: &str) {
        self.lock().failing.insert(operation.to_string());
    }

    /// Snapshot of every call made so far, oldest first.
    pub fn calls(&self) -> Vec<ActuatorCall> {
        self.lock().calls.clone()
    }

    /// Number of recorded calls to `operation`.
    pub fn count(&self, operation: &str) -> usize {
        self.lock()
            .calls
            .iter()
            .filter(|c| c.operation() == operation)
            .count()
    }

    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }

    /// Last commanded (or preset) angle of `joint`; zero when never set.
    pub fn angle(&self, joint: &str) -> f32 {
        self.lock().angles.get(joint).copied().unwrap_or(0.0)
    }

    /// Stiffness reported for `group`, falling back to `"Body"`.
    pub fn stiffness(&self, group: &str) -> f32 {
        let state = self.lock();
        stiffness_of(&state, group)
    }

    fn lock(&self) -> MutexGuard<'_, SimState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Record `call`, failing it when its operation was registered with
    /// [`fail_on`][Self::fail_on].  `apply` runs only for successful calls.
    fn record(
        &self,
        call: ActuatorCall,
        apply: impl FnOnce(&mut SimState),
    ) -> Result<(), TeleopError> {
        let mut state = self.lock();
        let operation = call.operation();
        debug!(?call, "sim actuator call");
        state.calls.push(call);
        if state.failing.contains(operation) {
            return Err(TeleopError::actuator(operation, "simulated failure"));
        }
        apply(&mut state);
        Ok(())
    }
}

fn stiffness_of(state: &SimState, group: &str) -> f32 {
    state
        .stiffness
        .get(group)
        .or_else(|| state.stiffness.get("Body"))
        .copied()
        .unwrap_or(0.0)
}

fn owned(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}

#[async_trait]
impl ActuatorService for SimActuatorService {
    async fn get_angles(&self, names: &[&str]) -> Result<Vec<f32>, TeleopError> {
        let mut angles = Vec::with_capacity(names.len());
        self.record(ActuatorCall::GetAngles(owned(names)), |state| {
            angles.extend(
                names
                    .iter()
                    .map(|n| state.angles.get(*n).copied().unwrap_or(0.0)),
            );
        })?;
        Ok(angles)
    }

    async fn set_angles(
        &self,
        names: &[&str],
        angles: &[f32],
        speed_fraction: f32,
    ) -> Result<(), TeleopError> {
        let call = ActuatorCall::SetAngles {
            names: owned(names),
            angles: angles.to_vec(),
            speed_fraction,
        };
        self.record(call, |state| {
            for (name, angle) in names.iter().zip(angles) {
                state.angles.insert(name.to_string(), *angle);
            }
        })
    }

    async fn angle_interpolation(
        &self,
        names: &[&str],
        angles: &[Vec<f32>],
        times: &[Vec<f32>],
        _absolute: bool,
    ) -> Result<(), TeleopError> {
        let final_angles: Vec<f32> = angles
            .iter()
            .map(|samples| samples.last().copied().unwrap_or(0.0))
            .collect();
        let duration = times
            .iter()
            .filter_map(|samples| samples.last().copied())
            .fold(0.0_f32, f32::max);
        let call = ActuatorCall::AngleInterpolation {
            names: owned(names),
            final_angles: final_angles.clone(),
            duration,
        };
        self.record(call, |state| {
            for (name, angle) in names.iter().zip(&final_angles) {
                state.angles.insert(name.to_string(), *angle);
            }
        })?;
        if self.realtime && duration > 0.0 {
            tokio::time::sleep(Duration::from_secs_f32(duration)).await;
        }
        Ok(())
    }

    async fn move_velocity(
        &self,
        forward: f32,
        lateral: f32,
        yaw: f32,
    ) -> Result<(), TeleopError> {
        self.record(
            ActuatorCall::Move {
                forward,
                lateral,
                yaw,
            },
            |_| {},
        )
    }

    async fn get_stiffnesses(&self, group: &str) -> Result<Vec<f32>, TeleopError> {
        let mut value = 0.0;
        self.record(ActuatorCall::GetStiffnesses(group.to_string()), |state| {
            value = stiffness_of(state, group);
        })?;
        Ok(vec![value])
    }

    async fn set_stiffnesses(&self, group: &str, value: f32) -> Result<(), TeleopError> {
        let call = ActuatorCall::SetStiffnesses {
            group: group.to_string(),
            value,
        };
        self.record(call, |state| {
            state.stiffness.insert(group.to_string(), value);
        })
    }

    async fn set_breath_enabled(&self, group: &str, enabled: bool) -> Result<(), TeleopError> {
        let call = ActuatorCall::SetBreathEnabled {
            group: group.to_string(),
            enabled,
        };
        self.record(call, |_| {})
    }

    async fn rest(&self) -> Result<(), TeleopError> {
        self.record(ActuatorCall::Rest, |state| {
            state.stiffness.clear();
            state.stiffness.insert("Body".to_string(), 0.0);
        })
    }

    async fn wake_up(&self) -> Result<(), TeleopError> {
        self.record(ActuatorCall::WakeUp, |state| {
            state.stiffness.clear();
            state.stiffness.insert("Body".to_string(), 1.0);
        })
    }

    async fn say(&self, text: &str) -> Result<(), TeleopError> {
        self.record(ActuatorCall::Say(text.to_string()), |_| {})
    }

    async fn say_animated(&self, text: &str) -> Result<(), TeleopError> {
        self.record(ActuatorCall::SayAnimated(text.to_string()), |_| {})
    }

    async fn stop_all(&self) -> Result<(), TeleopError> {
        self.record(ActuatorCall::StopAll, |_| {})
    }

    async fn set_volume(&self, value: f32) -> Result<(), TeleopError> {
        self.record(ActuatorCall::SetVolume(value), |_| {})
    }

    async fn fade_rgb(&self, target: &str, colour: u32, seconds: f32) -> Result<(), TeleopError> {
        let call = ActuatorCall::FadeRgb {
            target: target.to_string(),
            colour,
            seconds,
        };
        self.record(call, |_| {})
    }

    async fn autonomous_life_state(&self) -> Result<String, TeleopError> {
        let mut mode = String::new();
        self.record(ActuatorCall::GetAutonomousLife, |state| {
            mode = state.autonomous_life.clone();
        })?;
        Ok(mode)
    }

    async fn set_autonomous_life_state(&self, mode: &str) -> Result<(), TeleopError> {
        self.record(ActuatorCall::SetAutonomousLife(mode.to_string()), |state| {
            state.autonomous_life = mode.to_string();
        })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
