//! [`Behaviors`] – the physical actions the arbiter can trigger.
//!
//! Every method here talks to the [`ActuatorService`] and updates the
//! [`RobotState`] it owns a handle to.  None of them check the behavior
//! slot or the lock gating policy; that is the arbiter's job.  The only
//! exception is the long-running gestures of [`Behaviors::motion_aloha`],
//! which stop early once the robot is locked.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use teleop_hal::expressions::{MOOD_FADE_SECONDS, MOOD_LED_GROUPS};
use teleop_hal::poses::{
    self, BODY_JOINTS, HEAD_JOINTS, LOOK_AROUND_PITCH, LOOK_AROUND_SECONDS, LOOK_AROUND_YAW,
    WAVE_JOINTS, WAVE_WRIST,
};
use teleop_hal::trajectory::move_joints;
use teleop_hal::{
    ActuatorService, ArmPose, LedColour, Mood, Posture, SpeechAnimation, Utterance,
};
use teleop_kernel::RobotState;
use teleop_types::{HeadNudge, TeleopError};
use tokio::time::Instant;
use tracing::{info, warn};

// ─────────────────────────────────────────────────────────────────────────────
// Constants
// ─────────────────────────────────────────────────────────────────────────────

/// Body stiffness while a posture trajectory plays.
const POSTURE_STIFFNESS: f32 = 0.9;
/// Body stiffness after a posture and after stop-and-lock.
const HOLD_STIFFNESS: f32 = 0.6;
/// Stiffness applied per chain once the robot is prepared.
const IDLE_STIFFNESS: f32 = 0.4;
const IDLE_STIFFNESS_GROUPS: [&str; 4] = ["Head", "LArm", "RArm", "Leg"];
/// Speed fraction used to pin joints in place during stop-and-lock.
const FREEZE_SPEED_FRACTION: f32 = 0.1;

/// Length of the aloha gesture (waving and looking around).
const ALOHA_LENGTH: Duration = Duration::from_secs(12);
const WAVE_RAISE_SECONDS: f32 = 4.0;
const WAVE_SWING_SECONDS: f32 = 2.0;
/// Posture duration inside the "what next?" routine.
const MEETING_POSTURE_SECONDS: f32 = 2.5;

// ─────────────────────────────────────────────────────────────────────────────
// Behaviors
// ─────────────────────────────────────────────────────────────────────────────

/// Library of robot actions bound to one backend and one state.
pub struct Behaviors {
    actuator: Arc<dyn ActuatorService>,
    state: Arc<RobotState>,
    rng: Mutex<StdRng>,
}

impl Behaviors {
    pub fn new(actuator: Arc<dyn ActuatorService>, state: Arc<RobotState>) -> Self {
        Self::with_rng(actuator, state, StdRng::from_os_rng())
    }

    /// Use a specific random source for animation choices.
    pub fn with_rng(
        actuator: Arc<dyn ActuatorService>,
        state: Arc<RobotState>,
        rng: StdRng,
    ) -> Self {
        Self {
            actuator,
            state,
            rng: Mutex::new(rng),
        }
    }

    pub fn state(&self) -> &Arc<RobotState> {
        &self.state
    }

    fn with_rng_locked<T>(&self, f: impl FnOnce(&mut StdRng) -> T) -> T {
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut rng)
    }

    // ── Startup ──────────────────────────────────────────────────────────────

    /// Bring the robot under teleoperation control: autonomous life off,
    /// awake, breathing and volume matching the state, chains at idle
    /// stiffness.
    pub async fn prepare_robot(&self) -> Result<(), TeleopError> {
        let life = self.actuator.autonomous_life_state().await?;
        if life != "disabled" {
            info!(autonomous_life = %life, "disabling autonomous life");
            self.actuator.rest().await?;
            self.actuator.set_autonomous_life_state("disabled").await?;
            self.actuator.wake_up().await?;
        }
        let head = self.actuator.get_stiffnesses("Head").await?;
        if head.first().is_none_or(|s| *s == 0.0) {
            info!("head is limp, waking up");
            self.actuator.wake_up().await?;
        }
        self.actuator
            .set_breath_enabled("Body", self.state.is_breathing())
            .await?;
        self.apply_volume(self.state.is_muted()).await?;
        for group in IDLE_STIFFNESS_GROUPS {
            self.actuator.set_stiffnesses(group, IDLE_STIFFNESS).await?;
        }
        info!("robot prepared for teleoperation");
        Ok(())
    }

    // ── Safety ───────────────────────────────────────────────────────────────

    /// Apply a base velocity.  The base is only commanded when it is moving
    /// or has to be stopped; nothing happens while resting.
    pub async fn locomote(&self, forward: f32, twist: f32) -> Result<(), TeleopError> {
        if self.state.is_resting() {
            return Ok(());
        }
        let update = self.state.record_motion(forward, twist);
        if update.needs_command() {
            if update.moving {
                info!(forward, twist, "moving");
            }
            self.actuator.move_velocity(forward, 0.0, twist).await?;
        }
        Ok(())
    }

    /// Emergency stop: halt the base, silence speech, pin every body joint
    /// where it is, and lock.
    ///
    /// All steps are attempted even when one fails, and the robot ends up
    /// locked in every case; the first failure is returned.
    pub async fn stop_and_lock(&self) -> Result<(), TeleopError> {
        let transition = self.state.lock_gate().begin_lock().await;
        let frozen = self.freeze().await;
        drop(transition);
        warn!("emergency stop and lock; unlock the robot to continue using it");
        frozen
    }

    async fn freeze(&self) -> Result<(), TeleopError> {
        let mut outcome = Ok(());
        self.state.record_motion(0.0, 0.0);
        keep_first_error(&mut outcome, self.actuator.move_velocity(0.0, 0.0, 0.0).await);
        keep_first_error(&mut outcome, self.actuator.stop_all().await);
        match self.actuator.get_angles(&BODY_JOINTS).await {
            Ok(current) => keep_first_error(
                &mut outcome,
                self.actuator
                    .set_angles(&BODY_JOINTS, &current, FREEZE_SPEED_FRACTION)
                    .await,
            ),
            Err(e) => keep_first_error(&mut outcome, Err(e)),
        }
        keep_first_error(
            &mut outcome,
            self.actuator.set_stiffnesses("Body", HOLD_STIFFNESS).await,
        );
        outcome
    }

    /// Clear the lock.  Returns whether the robot was locked.
    pub async fn unlock(&self) -> bool {
        info!("unlocking robot");
        self.state.lock_gate().unlock().await
    }

    // ── Options ──────────────────────────────────────────────────────────────

    pub async fn toggle_breathing(&self) -> Result<(), TeleopError> {
        let breathing = self.state.toggle_breathing();
        info!(breathing, "breathing toggled");
        self.actuator.set_breath_enabled("Body", breathing).await
    }

    pub async fn toggle_mute(&self) -> Result<(), TeleopError> {
        let muted = self.state.toggle_muted();
        info!(muted, "mute toggled");
        self.apply_volume(muted).await
    }

    async fn apply_volume(&self, muted: bool) -> Result<(), TeleopError> {
        self.actuator
            .set_volume(if muted { 0.0 } else { 1.0 })
            .await
    }

    // ── Rest ─────────────────────────────────────────────────────────────────

    pub async fn rest(&self) -> Result<(), TeleopError> {
        info!("going to rest");
        self.state.set_resting(true);
        self.actuator.rest().await
    }

    /// Stand up from rest.  The robot stays resting when the backend fails.
    pub async fn wake_up(&self) -> Result<(), TeleopError> {
        info!("waking up");
        self.actuator.wake_up().await?;
        self.state.set_resting(false);
        Ok(())
    }

    // ── Poses ────────────────────────────────────────────────────────────────

    /// Move the whole body to `posture` over `duration_s`, stiffening for the
    /// move and relaxing to the hold stiffness afterwards.
    pub async fn posture(&self, posture: Posture, duration_s: f32) -> Result<(), TeleopError> {
        info!(posture = posture.name(), duration_s, "posture");
        self.actuator
            .set_stiffnesses("Body", POSTURE_STIFFNESS)
            .await?;
        let moved = move_joints(
            self.actuator.as_ref(),
            &BODY_JOINTS,
            &posture.targets(),
            duration_s,
        )
        .await;
        self.actuator.set_stiffnesses("Body", HOLD_STIFFNESS).await?;
        moved?;
        info!(posture = posture.name(), "posture done");
        Ok(())
    }

    pub async fn arm(&self, pose: ArmPose, duration_s: f32) -> Result<(), TeleopError> {
        info!(?pose, duration_s, "arm pose");
        move_joints(
            self.actuator.as_ref(),
            pose.joints(),
            &pose.targets(),
            duration_s,
        )
        .await
    }

    /// Step the head one notch and move it to the resulting pose.
    pub async fn head(&self, nudge: HeadNudge, duration_s: f32) -> Result<(), TeleopError> {
        let target = self.state.nudge_head(nudge);
        let (joint, angle) = poses::head_target(target);
        info!(?nudge, ?target, duration_s, "head");
        move_joints(self.actuator.as_ref(), &[joint], &[angle], duration_s).await
    }

    // ── Speech & lights ──────────────────────────────────────────────────────

    pub async fn say(&self, utterance: &Utterance) -> Result<(), TeleopError> {
        let (markup, animated) = self.with_rng_locked(|rng| utterance.render(rng));
        info!(text = %utterance.text, animated, "saying");
        if animated {
            self.actuator.say_animated(&markup).await
        } else {
            self.actuator.say(&markup).await
        }
    }

    pub async fn mood(&self, colour: LedColour) -> Result<(), TeleopError> {
        for group in MOOD_LED_GROUPS {
            self.actuator
                .fade_rgb(group, colour.code(), MOOD_FADE_SECONDS)
                .await?;
        }
        Ok(())
    }

    // ── Meta behaviors ───────────────────────────────────────────────────────

    /// Open the arms, ask "What next?", return to standing.
    pub async fn whats_next(&self) -> Result<(), TeleopError> {
        self.posture(Posture::Welcoming, MEETING_POSTURE_SECONDS)
            .await?;
        self.say(&Utterance {
            text: "What \\emph=1\\\\vct=130\\next?".to_string(),
            volume: 200,
            pitch: 100,
            speed: 75,
            animation: SpeechAnimation::None,
        })
        .await?;
        self.posture(Posture::Standing, MEETING_POSTURE_SECONDS)
            .await
    }

    pub async fn thank_you(&self) -> Result<(), TeleopError> {
        self.say(&Utterance {
            text: "Thank you for seeing the potential in robots like me.".to_string(),
            volume: 200,
            pitch: 100,
            speed: 80,
            animation: SpeechAnimation::Mood(Mood::Bowing),
        })
        .await
    }

    /// Wave with the left arm while the head looks around.  Resolves when
    /// both gestures have finished.
    pub async fn motion_aloha(self: &Arc<Self>) -> Result<(), TeleopError> {
        let looker = Arc::clone(self);
        let look = tokio::spawn(async move { looker.look_around(ALOHA_LENGTH).await });
        let waved = self.wave(ALOHA_LENGTH).await;
        if let Err(e) = &waved {
            warn!(error = %e, "wave animation failed");
        }
        match look.await {
            Ok(Err(e)) => warn!(error = %e, "head animation failed"),
            Err(e) => warn!(error = %e, "head animation task aborted"),
            Ok(Ok(())) => {}
        }
        waved
    }

    /// Random glances until `length` has elapsed or the robot is locked.
    pub async fn look_around(&self, length: Duration) -> Result<(), TeleopError> {
        info!("beginning head animation");
        let start = Instant::now();
        while start.elapsed() < length && !self.state.lock_gate().peek() {
            let (targets, seconds) = self.with_rng_locked(|rng| {
                let pitch = rng.random_range(LOOK_AROUND_PITCH.0..=LOOK_AROUND_PITCH.1);
                let yaw = rng.random_range(LOOK_AROUND_YAW.0..=LOOK_AROUND_YAW.1);
                let seconds = rng.random_range(LOOK_AROUND_SECONDS.0..=LOOK_AROUND_SECONDS.1);
                ([pitch.to_radians(), yaw.to_radians()], seconds)
            });
            move_joints(self.actuator.as_ref(), &HEAD_JOINTS, &targets, seconds).await?;
        }
        info!("finished head animation");
        Ok(())
    }

    /// Raise the left arm, then swing the wrist until `length` has elapsed
    /// or the robot is locked.
    pub async fn wave(&self, length: Duration) -> Result<(), TeleopError> {
        info!("setting up wave");
        let start = Instant::now();
        move_joints(
            self.actuator.as_ref(),
            &WAVE_JOINTS,
            &poses::wave_start(),
            WAVE_RAISE_SECONDS,
        )
        .await?;
        let (out, back) = poses::wave_wrist_swing();
        let mut outward = true;
        while start.elapsed() < length && !self.state.lock_gate().peek() {
            let angle = if outward { out } else { back };
            outward = !outward;
            move_joints(
                self.actuator.as_ref(),
                &[WAVE_WRIST],
                &[angle],
                WAVE_SWING_SECONDS,
            )
            .await?;
        }
        info!("wave finished");
        Ok(())
    }
}

fn keep_first_error(outcome: &mut Result<(), TeleopError>, step: Result<(), TeleopError>) {
    if let Err(e) = step {
        warn!(error = %e, "stop-and-lock step failed");
        if outcome.is_ok() {
            *outcome = Err(e);
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use teleop_hal::{ActuatorCall, SimActuatorService};
    use teleop_types::{HeadPitch, HeadYaw};

    fn rig(sim: SimActuatorService) -> (Arc<SimActuatorService>, Arc<Behaviors>) {
        let sim = Arc::new(sim);
        let behaviors = Arc::new(Behaviors::with_rng(
            sim.clone(),
            Arc::new(RobotState::new()),
            StdRng::seed_from_u64(3),
        ));
        (sim, behaviors)
    }

    #[tokio::test]
    async fn prepare_disables_autonomous_life_and_settles_the_robot() {
        let (sim, behaviors) = rig(SimActuatorService::new());
        behaviors.prepare_robot().await.unwrap();

        let calls = sim.calls();
        assert!(calls.contains(&ActuatorCall::SetAutonomousLife("disabled".into())));
        assert_eq!(sim.count("wake_up"), 1);
        assert!(calls.contains(&ActuatorCall::SetVolume(0.0)));
        assert!(calls.contains(&ActuatorCall::SetBreathEnabled {
            group: "Body".into(),
            enabled: false
        }));
        assert!((sim.stiffness("Leg") - IDLE_STIFFNESS).abs() < f32::EPSILON);
    }

    #[tokio::test]
    async fn prepare_leaves_a_disabled_awake_robot_alone() {
        let (sim, behaviors) = rig(
            SimActuatorService::new()
                .with_autonomous_life("disabled")
                .with_stiffness("Body", 1.0),
        );
        behaviors.prepare_robot().await.unwrap();
        assert_eq!(sim.count("rest"), 0);
        assert_eq!(sim.count("wake_up"), 0);
    }

    #[tokio::test]
    async fn locomotion_sends_only_moving_or_stopping_commands() {
        let (sim, behaviors) = rig(SimActuatorService::new());
        behaviors.locomote(0.0, 0.0).await.unwrap();
        behaviors.locomote(0.4, 0.0).await.unwrap();
        behaviors.locomote(0.0, 0.0).await.unwrap();
        behaviors.locomote(0.0, 0.0).await.unwrap();
        let moves: Vec<_> = sim
            .calls()
            .into_iter()
            .filter(|c| c.operation() == "move_velocity")
            .collect();
        assert_eq!(
            moves,
            vec![
                ActuatorCall::Move { forward: 0.4, lateral: 0.0, yaw: 0.0 },
                ActuatorCall::Move { forward: 0.0, lateral: 0.0, yaw: 0.0 },
            ]
        );
    }

    #[tokio::test]
    async fn locomotion_is_ignored_while_resting() {
        let (sim, behaviors) = rig(SimActuatorService::new());
        behaviors.state().set_resting(true);
        behaviors.locomote(0.4, 0.6).await.unwrap();
        assert_eq!(sim.count("move_velocity"), 0);
        assert!(!behaviors.state().is_moving());
    }

    #[tokio::test]
    async fn stop_and_lock_freezes_every_body_joint() {
        let (sim, behaviors) = rig(SimActuatorService::new().with_angle("HipPitch", -0.1));
        behaviors.locomote(0.4, 0.0).await.unwrap();
        behaviors.stop_and_lock().await.unwrap();

        let snap = behaviors.state().snapshot();
        assert!(snap.locked);
        assert!(!snap.moving);
        let calls = sim.calls();
        assert!(calls.contains(&ActuatorCall::Move { forward: 0.0, lateral: 0.0, yaw: 0.0 }));
        assert!(calls.contains(&ActuatorCall::StopAll));
        let pinned = calls
            .iter()
            .find_map(|c| match c {
                ActuatorCall::SetAngles { names, angles, speed_fraction } => {
                    Some((names.clone(), angles.clone(), *speed_fraction))
                }
                _ => None,
            })
            .expect("joints pinned");
        assert_eq!(pinned.0.len(), BODY_JOINTS.len());
        assert!((pinned.1[14] + 0.1).abs() < f32::EPSILON);
        assert!((pinned.2 - FREEZE_SPEED_FRACTION).abs() < f32::EPSILON);
        assert!((sim.stiffness("Body") - HOLD_STIFFNESS).abs() < f32::EPSILON);
    }

    #[tokio::test]
    async fn stop_and_lock_locks_even_when_the_backend_fails() {
        let (sim, behaviors) = rig(SimActuatorService::new());
        sim.fail_on("stop_all");
        sim.fail_on("get_angles");
        let err = behaviors.stop_and_lock().await.unwrap_err();
        assert!(matches!(err, TeleopError::Actuator { ref operation, .. } if operation == "stop_all"));
        assert!(behaviors.state().snapshot().locked);
        // Later steps still ran.
        assert_eq!(sim.count("set_stiffnesses"), 1);
    }

    #[tokio::test]
    async fn unlock_clears_the_lock() {
        let (_sim, behaviors) = rig(SimActuatorService::new());
        behaviors.stop_and_lock().await.unwrap();
        assert!(behaviors.unlock().await);
        assert!(!behaviors.state().snapshot().locked);
    }

    #[tokio::test]
    async fn toggles_drive_breathing_and_volume() {
        let (sim, behaviors) = rig(SimActuatorService::new());
        behaviors.toggle_breathing().await.unwrap();
        behaviors.toggle_mute().await.unwrap();
        let calls = sim.calls();
        assert!(calls.contains(&ActuatorCall::SetBreathEnabled {
            group: "Body".into(),
            enabled: true
        }));
        assert!(calls.contains(&ActuatorCall::SetVolume(1.0)));
        let snap = behaviors.state().snapshot();
        assert!(snap.breathing && !snap.muted);
    }

    #[tokio::test]
    async fn failed_wake_up_keeps_resting() {
        let (sim, behaviors) = rig(SimActuatorService::new());
        behaviors.rest().await.unwrap();
        sim.fail_on("wake_up");
        assert!(behaviors.wake_up().await.is_err());
        assert!(behaviors.state().is_resting());
    }

    #[tokio::test]
    async fn posture_stiffens_moves_and_relaxes() {
        let (sim, behaviors) = rig(SimActuatorService::new());
        behaviors.posture(Posture::HandsOnHips, 4.0).await.unwrap();

        let stiffness: Vec<f32> = sim
            .calls()
            .into_iter()
            .filter_map(|c| match c {
                ActuatorCall::SetStiffnesses { value, .. } => Some(value),
                _ => None,
            })
            .collect();
        assert_eq!(stiffness, vec![POSTURE_STIFFNESS, HOLD_STIFFNESS]);
        assert!((sim.angle("RHand") - 0.02).abs() < f32::EPSILON);
        assert!((sim.angle("LElbowRoll") - (-85.7_f32).to_radians()).abs() < 1e-6);
    }

    #[tokio::test]
    async fn posture_relaxes_even_when_the_move_fails() {
        let (sim, behaviors) = rig(SimActuatorService::new());
        sim.fail_on("angle_interpolation");
        assert!(behaviors.posture(Posture::Standing, 4.0).await.is_err());
        assert!((sim.stiffness("Body") - HOLD_STIFFNESS).abs() < f32::EPSILON);
    }

    #[tokio::test]
    async fn head_moves_only_the_nudged_joint() {
        let (sim, behaviors) = rig(SimActuatorService::new());
        behaviors.head(HeadNudge::Left, 2.0).await.unwrap();
        assert_eq!(behaviors.state().snapshot().head_yaw, HeadYaw::Left);
        assert!((sim.angle("HeadYaw") - 49.0_f32.to_radians()).abs() < 1e-6);
        match sim.calls().last() {
            Some(ActuatorCall::AngleInterpolation { names, duration, .. }) => {
                assert_eq!(names, &vec!["HeadYaw".to_string()]);
                assert!((duration - 2.0).abs() < f32::EPSILON);
            }
            other => panic!("unexpected call {other:?}"),
        }
        assert_eq!(behaviors.state().snapshot().head_pitch, HeadPitch::PitchStraight);
    }

    #[tokio::test]
    async fn arm_pose_moves_its_joints() {
        let (sim, behaviors) = rig(SimActuatorService::new());
        behaviors.arm(ArmPose::RightGrasping, 1.0).await.unwrap();
        assert!((sim.angle("RHand") - 0.26).abs() < f32::EPSILON);
    }

    #[tokio::test]
    async fn thank_you_uses_animated_speech_with_a_bow() {
        let (sim, behaviors) = rig(SimActuatorService::new());
        behaviors.thank_you().await.unwrap();
        match sim.calls().last() {
            Some(ActuatorCall::SayAnimated(text)) => {
                assert!(text.starts_with("^start(animations/Stand/Gestures/BowShort_"));
                assert!(text.ends_with("robots like me."));
            }
            other => panic!("unexpected call {other:?}"),
        }
    }

    #[tokio::test]
    async fn whats_next_welcomes_asks_and_stands() {
        let (sim, behaviors) = rig(SimActuatorService::new());
        behaviors.whats_next().await.unwrap();
        let ops: Vec<&str> = sim.calls().iter().map(|c| c.operation()).collect();
        let say_at = ops.iter().position(|op| *op == "say").expect("spoke");
        assert_eq!(ops.iter().filter(|op| **op == "angle_interpolation").count(), 2);
        assert!(ops[..say_at].contains(&"angle_interpolation"));
        assert!(ops[say_at..].contains(&"angle_interpolation"));
    }

    #[tokio::test]
    async fn mood_fades_face_and_chest() {
        let (sim, behaviors) = rig(SimActuatorService::new());
        behaviors.mood(LedColour::Blue).await.unwrap();
        assert_eq!(
            sim.calls(),
            vec![
                ActuatorCall::FadeRgb { target: "FaceLeds".into(), colour: 0x000D00FF, seconds: 0.2 },
                ActuatorCall::FadeRgb { target: "ChestLeds".into(), colour: 0x000D00FF, seconds: 0.2 },
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn aloha_waves_and_looks_around_for_its_length() {
        let (sim, behaviors) = rig(SimActuatorService::new().with_realtime_motion());
        let start = Instant::now();
        behaviors.motion_aloha().await.unwrap();
        assert!(start.elapsed() >= ALOHA_LENGTH);

        let calls = sim.calls();
        let wrist_swings = calls
            .iter()
            .filter(|c| matches!(c, ActuatorCall::AngleInterpolation { names, .. } if names == &vec![WAVE_WRIST.to_string()]))
            .count();
        let glances = calls
            .iter()
            .filter(|c| matches!(c, ActuatorCall::AngleInterpolation { names, .. } if names.len() == 2))
            .count();
        assert!(wrist_swings >= 4);
        assert!(glances >= 4);
    }

    #[tokio::test(start_paused = true)]
    async fn aloha_stops_early_once_locked() {
        let (sim, behaviors) = rig(SimActuatorService::new().with_realtime_motion());
        let waver = Arc::clone(&behaviors);
        let aloha = tokio::spawn(async move { waver.motion_aloha().await });

        tokio::time::sleep(Duration::from_secs(5)).await;
        behaviors.stop_and_lock().await.unwrap();
        let locked_at = Instant::now();
        aloha.await.unwrap().unwrap();

        // Only the segment in flight is allowed to finish.
        assert!(locked_at.elapsed() <= Duration::from_secs(3));
        assert!(sim.count("stop_all") == 1);
    }
}
