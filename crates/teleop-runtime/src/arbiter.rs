//! [`Arbiter`] – turns decoded control events into robot actions.
//!
//! Each event goes through the same gate, top to bottom:
//!
//! 1. **Locked** – only `start` does anything (it unlocks).
//! 2. **Resting** – with the behavior slot free, `a` wakes the robot up;
//!    everything else is rejected.
//! 3. **Awake** – locomotion is always applied and `info` triggers
//!    stop-and-lock without waiting for the slot.  With the slot free the
//!    toggles are applied, then the first matching row of
//!    [`PRIORITY_TABLE`][crate::priority::PRIORITY_TABLE] runs while the
//!    slot is held.
//!
//! Events arrive on separate tasks, so a long behavior can still be running
//! when the next event comes in.  A busy slot is an expected outcome
//! ([`Outcome::Busy`]), never an error.

use std::sync::Arc;

use async_trait::async_trait;
use teleop_hal::{ActuatorService, Posture};
use teleop_kernel::{Exclusion, RobotState};
use teleop_middleware::ControlSink;
use teleop_types::{ControlEvent, TeleopError};
use tracing::{debug, error, info, warn};

use crate::behaviors::Behaviors;
use crate::priority::{self, ExclusiveBehavior};

/// Duration of a button-triggered posture.
const POSTURE_SECONDS: f32 = 4.0;
/// Duration of a head nudge.
const HEAD_SECONDS: f32 = 2.0;

/// Stick scaling applied before locomotion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArbiterConfig {
    pub forward_scale: f32,
    pub twist_scale: f32,
}

impl Default for ArbiterConfig {
    fn default() -> Self {
        Self {
            forward_scale: 0.4,
            twist_scale: 0.6,
        }
    }
}

/// What [`Arbiter::on_event`] did with an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Unlocked,
    IgnoredWhileLocked,
    WokeUp,
    RejectedWhileResting,
    /// Resting and nothing pressed.
    Idle,
    /// Another behavior held the slot; only locomotion was applied.
    Busy,
    StoppedAndLocked,
    /// Toggles applied and at most one exclusive behavior run.
    Executed(Option<ExclusiveBehavior>),
}

pub struct Arbiter {
    behaviors: Arc<Behaviors>,
    slot: Exclusion,
    config: ArbiterConfig,
}

impl Arbiter {
    /// An arbiter over a fresh [`RobotState`].
    pub fn new(actuator: Arc<dyn ActuatorService>, config: ArbiterConfig) -> Self {
        let state = Arc::new(RobotState::new());
        Self::with_behaviors(Arc::new(Behaviors::new(actuator, state)), config)
    }

    pub fn with_behaviors(behaviors: Arc<Behaviors>, config: ArbiterConfig) -> Self {
        Self {
            behaviors,
            slot: Exclusion::new("behavior-slot"),
            config,
        }
    }

    pub fn state(&self) -> &Arc<RobotState> {
        self.behaviors.state()
    }

    pub fn behaviors(&self) -> &Arc<Behaviors> {
        &self.behaviors
    }

    /// The behavior slot.
    pub fn slot(&self) -> &Exclusion {
        &self.slot
    }

    /// See [`Behaviors::prepare_robot`].
    pub async fn prepare(&self) -> Result<(), TeleopError> {
        self.behaviors.prepare_robot().await
    }

    /// See [`Behaviors::stop_and_lock`].
    pub async fn stop_and_lock(&self) -> Result<(), TeleopError> {
        self.behaviors.stop_and_lock().await
    }

    /// Arbitrate one event.
    ///
    /// # Errors
    ///
    /// Returns the first backend failure of the actions the event triggered.
    /// The behavior slot is released on every path.
    pub async fn on_event(&self, ev: ControlEvent) -> Result<Outcome, TeleopError> {
        let state = self.state();

        if state.lock_gate().is_locked().await {
            if ev.start {
                self.behaviors.unlock().await;
                return Ok(Outcome::Unlocked);
            }
            return Ok(Outcome::IgnoredWhileLocked);
        }

        if state.is_resting() {
            let Some(_slot) = self.slot.try_acquire() else {
                if ev.any_active() {
                    info!("behavior busy");
                }
                return Ok(Outcome::Busy);
            };
            if ev.a {
                self.behaviors.wake_up().await?;
                return Ok(Outcome::WokeUp);
            }
            if ev.any_active() {
                info!("behavior rejected while resting");
                return Ok(Outcome::RejectedWhileResting);
            }
            return Ok(Outcome::Idle);
        }

        let forward = ev.velocity * self.config.forward_scale;
        let twist = ev.twist * self.config.twist_scale;
        let moved = self.behaviors.locomote(forward, twist).await;
        if ev.info {
            if let Err(e) = moved {
                warn!(error = %e, "locomotion failed before emergency stop");
            }
            self.behaviors.stop_and_lock().await?;
            return Ok(Outcome::StoppedAndLocked);
        }
        moved?;

        let Some(_slot) = self.slot.try_acquire() else {
            if ev.any_button() {
                info!("behavior busy");
            } else if ev.any_active() {
                debug!("behavior busy");
            }
            return Ok(Outcome::Busy);
        };

        if ev.left_joy_button {
            self.behaviors.toggle_breathing().await?;
        }
        if ev.right_joy_button {
            self.behaviors.toggle_mute().await?;
        }
        let chosen = priority::select(&ev);
        if let Some(behavior) = chosen {
            self.run(behavior).await?;
        }
        Ok(Outcome::Executed(chosen))
    }

    async fn run(&self, behavior: ExclusiveBehavior) -> Result<(), TeleopError> {
        debug!(?behavior, "running exclusive behavior");
        match behavior {
            ExclusiveBehavior::WhatsNext => self.behaviors.whats_next().await,
            ExclusiveBehavior::ThankYou => self.behaviors.thank_you().await,
            ExclusiveBehavior::MotionAloha => self.behaviors.motion_aloha().await,
            ExclusiveBehavior::Stand => {
                self.behaviors
                    .posture(Posture::Standing, POSTURE_SECONDS)
                    .await
            }
            ExclusiveBehavior::Rest => self.behaviors.rest().await,
            ExclusiveBehavior::Welcome => {
                self.behaviors
                    .posture(Posture::Welcoming, POSTURE_SECONDS)
                    .await
            }
            ExclusiveBehavior::HandsOnHips => {
                self.behaviors
                    .posture(Posture::HandsOnHips, POSTURE_SECONDS)
                    .await
            }
            ExclusiveBehavior::Head(nudge) => self.behaviors.head(nudge, HEAD_SECONDS).await,
        }
    }
}

#[async_trait]
impl ControlSink for Arbiter {
    async fn dispatch(&self, event: ControlEvent) {
        match self.on_event(event).await {
            Ok(outcome) => debug!(?outcome, "event handled"),
            Err(e) => warn!(error = %e, "event failed"),
        }
    }

    async fn emergency_stop(&self) {
        if let Err(e) = self.stop_and_lock().await {
            error!(error = %e, "stop-and-lock incomplete");
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
