//! `teleop-middleware` – The Transport Layer
//!
//! Moves control events from the controller to the robot without caring
//! what they mean.
//!
//! # Modules
//!
//! - [`framer`] – [`Framer`][framer::Framer]: newline-delimited JSON
//!   framing with latest-wins selection and partial-record carry-over.
//! - [`supervisor`] – [`ConnectionSupervisor`][supervisor::ConnectionSupervisor]:
//!   listen/accept/retry loop, one live connection at a time, latency
//!   watchdog, bounded dispatch and stop-and-lock on every exit.
//! - [`sink`] – [`ControlSink`][sink::ControlSink]: where decoded events go.
//! - [`streamer`] – [`EventStreamer`][streamer::EventStreamer]: the
//!   controller-side sender.

pub mod framer;
pub mod sink;
pub mod streamer;
pub mod supervisor;

pub use framer::Framer;
pub use sink::ControlSink;
pub use streamer::{EventHandle, EventStreamer};
pub use supervisor::{ConnectionPhase, ConnectionSupervisor, Disconnect, SupervisorConfig};
