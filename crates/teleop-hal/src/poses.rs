//! Fixed joint-target tables for postures, arm poses, head poses and the
//! waving gesture.
//!
//! Angles are written in degrees and converted with [`f32::to_radians`];
//! hand joints are an opening fraction in `[0, 1]` and are used as-is.

use teleop_types::{HeadPitch, HeadTarget, HeadYaw};

/// The joints a full-body posture commands, in table order.
pub const BODY_JOINTS: [&str; 17] = [
    "HeadPitch",
    "HeadYaw",
    "LWristYaw",
    "LShoulderRoll",
    "LShoulderPitch",
    "LElbowRoll",
    "LElbowYaw",
    "LHand",
    "RWristYaw",
    "RShoulderRoll",
    "RShoulderPitch",
    "RElbowRoll",
    "RElbowYaw",
    "RHand",
    "HipPitch",
    "HipRoll",
    "KneePitch",
];

/// Indexes of the hand joints inside [`BODY_JOINTS`].
const HAND_SLOTS: [usize; 2] = [7, 13];

const LEFT_ARM: [&str; 5] = [
    "LWristYaw",
    "LShoulderRoll",
    "LShoulderPitch",
    "LElbowRoll",
    "LElbowYaw",
];
const RIGHT_ARM: [&str; 5] = [
    "RWristYaw",
    "RShoulderRoll",
    "RShoulderPitch",
    "RElbowRoll",
    "RElbowYaw",
];

fn radians<const N: usize>(degrees: [f32; N]) -> Vec<f32> {
    degrees.iter().map(|d| d.to_radians()).collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Postures
// ────────────────────────────────────────────────────────────────────────────

/// A named full-body posture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Posture {
    Standing,
    Resting,
    Welcoming,
    HandsOnHips,
}

impl Posture {
    pub fn name(self) -> &'static str {
        match self {
            Posture::Standing => "Standing",
            Posture::Resting => "Resting",
            Posture::Welcoming => "Welcoming",
            Posture::HandsOnHips => "Hands on hips",
        }
    }

    /// Target for each joint of [`BODY_JOINTS`].
    pub fn targets(self) -> Vec<f32> {
        #[rustfmt::skip]
        let (degrees, hands): ([f32; 17], [f32; 2]) = match self {
            Posture::Standing => (
                [-11.1, 0.0,
                 1.9, 6.0, 101.2, -6.5, -98.0, 0.0,
                 -1.3, -6.0, 100.0, 5.9, 98.0, 0.0,
                 -2.0, 0.0, 0.6],
                [0.60, 0.60],
            ),
            Posture::Resting => (
                [25.5, 0.0,
                 -46.2, 3.4, 65.5, -0.6, -27.9, 0.0,
                 46.2, -3.6, 65.2, 0.5, 27.8, 0.0,
                 -59.5, 0.0, 28.9],
                [0.60, 0.60],
            ),
            Posture::Welcoming => (
                [-11.1, 0.0,
                 1.9, 43.6, 71.3, -39.8, -119.4, 0.0,
                 22.7, -24.7, 59.9, 41.8, 119.1, 0.0,
                 -2.0, 0.0, 0.6],
                [0.74, 0.70],
            ),
            Posture::HandsOnHips => (
                [-11.1, 0.0,
                 -103.5, 48.5, 85.2, -85.7, -11.0, 0.0,
                 104.1, -48.7, 74.6, 89.5, -7.1, 0.0,
                 -2.0, 0.0, 0.6],
                [0.13, 0.02],
            ),
        };
        let mut targets = radians(degrees);
        for (slot, opening) in HAND_SLOTS.iter().zip(hands) {
            targets[*slot] = opening;
        }
        targets
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Arm poses
// ────────────────────────────────────────────────────────────────────────────

/// A named single-arm or single-hand pose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArmPose {
    LeftExtended,
    RightExtended,
    LeftRetracted,
    RightRetracted,
    LeftOpen,
    RightOpen,
    LeftGrasping,
    RightGrasping,
}

impl ArmPose {
    pub fn joints(self) -> &'static [&'static str] {
        match self {
            ArmPose::LeftExtended | ArmPose::LeftRetracted => &LEFT_ARM,
            ArmPose::RightExtended | ArmPose::RightRetracted => &RIGHT_ARM,
            ArmPose::LeftOpen | ArmPose::LeftGrasping => &["LHand"],
            ArmPose::RightOpen | ArmPose::RightGrasping => &["RHand"],
        }
    }

    /// Target for each joint of [`joints`][Self::joints].
    pub fn targets(self) -> Vec<f32> {
        match self {
            ArmPose::LeftExtended => radians([-81.2, 11.5, 46.9, -40.9, -98.0]),
            ArmPose::RightExtended => radians([81.2, -11.5, 46.9, 40.9, 98.0]),
            ArmPose::LeftRetracted => radians([1.9, 6.0, 101.2, -6.5, -98.0]),
            ArmPose::RightRetracted => radians([-1.3, -6.0, 100.0, 5.9, 98.0]),
            ArmPose::LeftOpen | ArmPose::RightOpen => vec![0.98],
            ArmPose::LeftGrasping | ArmPose::RightGrasping => vec![0.26],
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Head
// ────────────────────────────────────────────────────────────────────────────

/// The joint and absolute angle for a discrete head pose.
pub fn head_target(target: HeadTarget) -> (&'static str, f32) {
    let (joint, degrees) = match target {
        HeadTarget::Pitch(HeadPitch::Up) => ("HeadPitch", -40.5_f32),
        HeadTarget::Pitch(HeadPitch::PitchStraight) => ("HeadPitch", -21.9),
        HeadTarget::Pitch(HeadPitch::Down) => ("HeadPitch", 25.5),
        HeadTarget::Yaw(HeadYaw::Left) => ("HeadYaw", 49.0),
        HeadTarget::Yaw(HeadYaw::YawStraight) => ("HeadYaw", 1.1),
        HeadTarget::Yaw(HeadYaw::Right) => ("HeadYaw", -49.0),
    };
    (joint, degrees.to_radians())
}

/// Head joints driven by the idle look-around animation.
pub const HEAD_JOINTS: [&str; 2] = ["HeadPitch", "HeadYaw"];

/// Pitch range of the look-around animation, degrees.
pub const LOOK_AROUND_PITCH: (f32, f32) = (-21.5, 8.2);
/// Yaw range of the look-around animation, degrees.
pub const LOOK_AROUND_YAW: (f32, f32) = (-41.7, 41.7);
/// Duration range of one look-around glance, seconds.
pub const LOOK_AROUND_SECONDS: (f32, f32) = (1.0, 2.8);

// ────────────────────────────────────────────────────────────────────────────
// Wave
// ────────────────────────────────────────────────────────────────────────────

/// Joints raised for the wave.
pub const WAVE_JOINTS: [&str; 6] = [
    "LWristYaw",
    "LShoulderRoll",
    "LShoulderPitch",
    "LElbowRoll",
    "LElbowYaw",
    "LHand",
];

/// Raised-arm pose the wave starts from, matching [`WAVE_JOINTS`].
pub fn wave_start() -> Vec<f32> {
    let mut targets = radians([62.1, 30.9, -22.9, -52.4, -73.1, 0.0]);
    targets[5] = 0.98;
    targets
}

/// The joint that swings during the wave.
pub const WAVE_WRIST: &str = "LWristYaw";

/// Wrist extremes of one wave cycle, radians.
pub fn wave_wrist_swing() -> (f32, f32) {
    (66.5_f32.to_radians(), (-16.9_f32).to_radians())
}
