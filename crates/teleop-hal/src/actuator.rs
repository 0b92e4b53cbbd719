//! [`ActuatorService`] – the boundary to the robot's motion, speech and
//! lighting backend.
//!
//! The arbitration engine only ever talks to this trait, so the vendor
//! bridge and the [`SimActuatorService`][crate::sim::SimActuatorService]
//! used in tests and dry runs are interchangeable.
//!
//! Calls that move joints over time (e.g. [`ActuatorService::angle_interpolation`])
//! resolve only once the motion has finished.

use async_trait::async_trait;
use teleop_types::TeleopError;

/// Joint control, locomotion, speech and LED operations exposed by the
/// robot backend.
///
/// Joint names follow the backend's naming (`"HeadPitch"`, `"LWristYaw"`,
/// …); groups are backend chains such as `"Body"`, `"Head"` or `"LArm"`.
/// Angles are radians.
///
/// # Errors
///
/// Every method returns [`TeleopError::Actuator`] when the backend rejects
/// or fails the call.
#[async_trait]
pub trait ActuatorService: Send + Sync {
    /// Read the current (sensed) angle of each joint in `names`.
    async fn get_angles(&self, names: &[&str]) -> Result<Vec<f32>, TeleopError>;

    /// Command each joint to an absolute angle at `speed_fraction` of its
    /// maximum speed.  Returns without waiting for the motion to finish.
    async fn set_angles(
        &self,
        names: &[&str],
        angles: &[f32],
        speed_fraction: f32,
    ) -> Result<(), TeleopError>;

    /// Play a timed trajectory.  `angles[j]` and `times[j]` are the samples
    /// for joint `names[j]`.
    async fn angle_interpolation(
        &self,
        names: &[&str],
        angles: &[Vec<f32>],
        times: &[Vec<f32>],
        absolute: bool,
    ) -> Result<(), TeleopError>;

    /// Set the base velocity (forward, lateral, yaw); all zero stops.
    async fn move_velocity(&self, forward: f32, lateral: f32, yaw: f32)
    -> Result<(), TeleopError>;

    async fn get_stiffnesses(&self, group: &str) -> Result<Vec<f32>, TeleopError>;

    async fn set_stiffnesses(&self, group: &str, value: f32) -> Result<(), TeleopError>;

    async fn set_breath_enabled(&self, group: &str, enabled: bool) -> Result<(), TeleopError>;

    /// Go to the safe rest posture and release stiffness.
    async fn rest(&self) -> Result<(), TeleopError>;

    /// Stiffen and stand up from rest.
    async fn wake_up(&self) -> Result<(), TeleopError>;

    /// Speak `text` without body animation.
    async fn say(&self, text: &str) -> Result<(), TeleopError>;

    /// Speak `text`, honouring embedded `^start(...)` animation tags.
    async fn say_animated(&self, text: &str) -> Result<(), TeleopError>;

    /// Interrupt any utterance in progress.
    async fn stop_all(&self) -> Result<(), TeleopError>;

    /// Global output volume in `[0, 1]`.
    async fn set_volume(&self, value: f32) -> Result<(), TeleopError>;

    /// Fade an LED group to a `0x00RRGGBB` colour.
    async fn fade_rgb(&self, target: &str, colour: u32, seconds: f32) -> Result<(), TeleopError>;

    /// Current autonomous-life mode, e.g. `"solitary"` or `"disabled"`.
    async fn autonomous_life_state(&self) -> Result<String, TeleopError>;

    async fn set_autonomous_life_state(&self, state: &str) -> Result<(), TeleopError>;
}
