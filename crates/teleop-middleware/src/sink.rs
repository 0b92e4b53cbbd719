//! The seam between transport and robot.
//!
//! The supervisor never knows what an event means.  It hands every decoded
//! [`ControlEvent`] to a [`ControlSink`] and calls
//! [`ControlSink::emergency_stop`] whenever a connection ends.

use async_trait::async_trait;
use teleop_types::ControlEvent;

/// Consumer of decoded control events.
///
/// # Contract
///
/// * `dispatch` – called on its own task once per decoded frame, possibly
///   while earlier calls are still running.  Failures are the sink's to
///   report.
/// * `emergency_stop` – bring the robot to a full stop and lock it.  Must
///   leave the robot locked even when part of the stop fails.
#[async_trait]
pub trait ControlSink: Send + Sync + 'static {
    async fn dispatch(&self, event: ControlEvent);

    async fn emergency_stop(&self);
}
