//! `rmc-runtime` – command arbitration and telemetry
//!
//! The layer the transport talks to.  It owns the single lock around the
//! [`Robot`][rmc_kernel::Robot] aggregate and turns decoded command
//! envelopes into interlocked state transitions.
//!
//! # Modules
//!
//! - [`router`] – [`route`][router::route]: exhaustive mapping from a
//!   [`RobotCommand`][rmc_types::RobotCommand] to `set_life`, `set_mode` or an
//!   interlocked subsystem command.
//! - [`controller`] – [`RobotController`][controller::RobotController]:
//!   cloneable handle exposing `submit_command` and `snapshot`.  Commands are
//!   serialized by a write lock; snapshots share a read lock and never observe
//!   a half-applied command.
//! - [`telemetry`] – [`SnapshotPublisher`][telemetry::SnapshotPublisher]:
//!   broadcasts snapshots on a fixed interval in addition to the push that
//!   follows every applied command.
//! - [`supervisor`] – [`LinkSupervisor`][supervisor::LinkSupervisor]: kills
//!   the robot when the operator link goes quiet.
//! - [`logging`] – [`init_tracing`][logging::init_tracing]: process-wide
//!   `tracing` subscriber setup.

pub mod controller;
pub mod logging;
pub mod router;
pub mod supervisor;
pub mod telemetry;

pub use controller::RobotController;
pub use logging::init_tracing;
pub use router::{Route, route};
pub use supervisor::LinkSupervisor;
pub use telemetry::SnapshotPublisher;
