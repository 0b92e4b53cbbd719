//! S-curve joint trajectories.
//!
//! [`interpolate`] samples a move from the current to the target angle of
//! each joint at [`SAMPLE_COUNT`] instants over `(0, duration]`.  The blend
//! fraction follows a logistic curve over `[-6, 6]`, so velocity is close to
//! zero at both ends of the move.
//!
//! ```
//! use teleop_hal::trajectory::{interpolate, SAMPLE_COUNT};
//!
//! let traj = interpolate(&[0.0], &[1.0], 2.0).unwrap();
//! assert_eq!(traj.angles[0].len(), SAMPLE_COUNT);
//! assert_eq!(*traj.times[0].last().unwrap(), 2.0);
//! assert_eq!(*traj.angles[0].last().unwrap(), 1.0);
//! ```

use teleop_types::TeleopError;

use crate::actuator::ActuatorService;

/// Samples per joint.
pub const SAMPLE_COUNT: usize = 100;

/// The logistic input runs over `[-SIGMOID_SPAN, SIGMOID_SPAN]`.
const SIGMOID_SPAN: f32 = 6.0;

/// Per-joint sample lists ready for
/// [`ActuatorService::angle_interpolation`].
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    /// `times[j][k]` – seconds from the start of the move.
    pub times: Vec<Vec<f32>>,
    /// `angles[j][k]` – radians.
    pub angles: Vec<Vec<f32>>,
}

/// Blend fraction of sample `k`: `sigmoid(linspace(-6, 6, 100)[k])`.
fn blend(k: usize) -> f32 {
    let step = 2.0 * SIGMOID_SPAN / (SAMPLE_COUNT - 1) as f32;
    let x = -SIGMOID_SPAN + step * k as f32;
    1.0 / (1.0 + (-x).exp())
}

/// Build the S-curve trajectory from `current` to `target` over
/// `duration_s` seconds.
///
/// The last sample of every joint is at exactly `duration_s` and equals its
/// target exactly.
///
/// # Errors
///
/// [`TeleopError::InvalidCommand`] when the angle lists differ in length or
/// the duration is not a positive finite number.
pub fn interpolate(
    current: &[f32],
    target: &[f32],
    duration_s: f32,
) -> Result<Trajectory, TeleopError> {
    if current.len() != target.len() {
        return Err(TeleopError::InvalidCommand(format!(
            "{} current angles for {} targets",
            current.len(),
            target.len()
        )));
    }
    if !(duration_s.is_finite() && duration_s > 0.0) {
        return Err(TeleopError::InvalidCommand(format!(
            "trajectory duration must be positive, got {duration_s}"
        )));
    }

    let fragment = duration_s / SAMPLE_COUNT as f32;
    let mut times: Vec<f32> = (1..SAMPLE_COUNT).map(|i| i as f32 * fragment).collect();
    times.push(duration_s);

    let angles = current
        .iter()
        .zip(target)
        .map(|(&start, &end)| {
            let mut samples: Vec<f32> = (0..SAMPLE_COUNT - 1)
                .map(|k| start + (end - start) * blend(k))
                .collect();
            samples.push(end);
            samples
        })
        .collect();

    Ok(Trajectory {
        times: vec![times; target.len()],
        angles,
    })
}

/// Read the current angles of `names` and plan a move to `targets`.
///
/// # Errors
///
/// Propagates the backend's angle-read failure and the validation errors
/// of [`interpolate`].
pub async fn plan(
    service: &dyn ActuatorService,
    names: &[&str],
    targets: &[f32],
    duration_s: f32,
) -> Result<Trajectory, TeleopError> {
    if names.len() != targets.len() {
        return Err(TeleopError::InvalidCommand(format!(
            "{} joints for {} targets",
            names.len(),
            targets.len()
        )));
    }
    let current = service.get_angles(names).await?;
    interpolate(&current, targets, duration_s)
}

/// Plan and play a move of `names` to `targets`; resolves once the backend
/// reports the motion finished.
pub async fn move_joints(
    service: &dyn ActuatorService,
    names: &[&str],
    targets: &[f32],
    duration_s: f32,
) -> Result<(), TeleopError> {
    let trajectory = plan(service, names, targets, duration_s).await?;
    service
        .angle_interpolation(names, &trajectory.angles, &trajectory.times, true)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{ActuatorCall, SimActuatorService};

    #[test]
    fn endpoint_is_exact_for_every_joint() {
        let current = [0.3, -1.2, 0.0, 2.0];
        let target = [-0.7, 1.1, 0.98, 2.0];
        let traj = interpolate(&current, &target, 3.7).unwrap();

        for j in 0..target.len() {
            assert_eq!(traj.times[j].len(), SAMPLE_COUNT);
            assert_eq!(traj.angles[j].len(), SAMPLE_COUNT);
            assert_eq!(*traj.times[j].last().unwrap(), 3.7);
            assert_eq!(*traj.angles[j].last().unwrap(), target[j]);
        }
    }

    #[test]
    fn first_sample_lies_strictly_between_start_and_target() {
        let traj = interpolate(&[0.0, 1.0], &[1.0, -1.0], 2.0).unwrap();
        let rising = traj.angles[0][0];
        assert!(rising > 0.0 && rising < 1.0);
        let falling = traj.angles[1][0];
        assert!(falling < 1.0 && falling > -1.0);
        assert!(traj.times[0][0] > 0.0);
    }

    #[test]
    fn samples_are_monotonic_with_gentle_ends() {
        let traj = interpolate(&[0.0], &[1.0], 1.0).unwrap();
        let samples = &traj.angles[0];
        assert!(samples.windows(2).all(|w| w[1] >= w[0]));
        assert!(traj.times[0].windows(2).all(|w| w[1] > w[0]));

        // Ease-in/ease-out: the middle step is far larger than the first.
        let first_step = samples[1] - samples[0];
        let middle_step = samples[50] - samples[49];
        assert!(middle_step > 10.0 * first_step);
    }

    #[test]
    fn rejects_mismatched_lengths() {
        let err = interpolate(&[0.0, 0.0], &[1.0], 1.0).unwrap_err();
        assert!(matches!(err, TeleopError::InvalidCommand(_)));
    }

    #[test]
    fn rejects_non_positive_duration() {
        assert!(interpolate(&[0.0], &[1.0], 0.0).is_err());
        assert!(interpolate(&[0.0], &[1.0], f32::NAN).is_err());
    }

    #[tokio::test]
    async fn plan_reads_current_angles_from_the_backend() {
        let sim = SimActuatorService::new().with_angle("HeadPitch", 0.5);
        let traj = plan(&sim, &["HeadPitch"], &[-0.5], 2.0).await.unwrap();
        assert!(traj.angles[0][0] < 0.5 && traj.angles[0][0] > 0.4);
        assert_eq!(
            sim.calls(),
            vec![ActuatorCall::GetAngles(vec!["HeadPitch".to_string()])]
        );
    }

    #[tokio::test]
    async fn plan_propagates_angle_read_failure() {
        let sim = SimActuatorService::new();
        sim.fail_on("get_angles");
        let err = plan(&sim, &["HeadYaw"], &[0.2], 1.0).await.unwrap_err();
        assert!(matches!(err, TeleopError::Actuator { .. }));
    }

    #[tokio::test]
    async fn move_joints_plays_the_planned_trajectory() {
        let sim = SimActuatorService::new();
        move_joints(&sim, &["RHand"], &[0.26], 1.5).await.unwrap();
        assert!((sim.angle("RHand") - 0.26).abs() < f32::EPSILON);
        assert_eq!(sim.count("angle_interpolation"), 1);
    }
}
