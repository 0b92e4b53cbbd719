//! `teleop-runtime` – The Behavior Arbitration Engine
//!
//! Decides what the robot does with each decoded control event.
//!
//! # Modules
//!
//! - [`arbiter`] – [`Arbiter`][arbiter::Arbiter]: applies the lock and rest
//!   gating policy, always-on locomotion and emergency stop, and runs at
//!   most one exclusive behavior at a time.  Implements
//!   [`ControlSink`][teleop_middleware::ControlSink] so the connection
//!   supervisor can feed it directly.
//! - [`priority`] – [`PRIORITY_TABLE`][priority::PRIORITY_TABLE]: which
//!   behavior wins when several buttons are pressed in one frame.
//! - [`behaviors`] – [`Behaviors`][behaviors::Behaviors]: postures, head
//!   nudges, speech, gestures, toggles, stop-and-lock and startup
//!   preparation, expressed against
//!   [`ActuatorService`][teleop_hal::ActuatorService].
//! - [`telemetry`] – [`init_tracing`][telemetry::init_tracing]: the global
//!   `tracing` subscriber with optional OTLP span export.

pub mod arbiter;
pub mod behaviors;
pub mod priority;
pub mod telemetry;

pub use arbiter::{Arbiter, ArbiterConfig, Outcome};
pub use behaviors::Behaviors;
pub use priority::{ExclusiveBehavior, PRIORITY_TABLE};
pub use telemetry::{TracerProviderGuard, init_tracing};
