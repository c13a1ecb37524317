//! `rmc-hal` – Subsystem Controllers
//!
//! Each controller owns the commanded state of one physical mechanism and
//! exposes its small command vocabulary.  Controllers perform only
//! subsystem-local validation; life and mode gating happen upstream in
//! `rmc-kernel`, which is the only code that holds a `&mut` to them.
//!
//! # Modules
//!
//! - [`subsystem`] – the [`SubsystemController`] trait shared by every
//!   controller, used by the interlock to force safe-idle on kill.
//! - [`drive_train`] – [`DriveTrain`]: differential drive with brake latch
//!   and enable gate.
//! - [`intake`] – [`Intake`]: bucket-ladder digger and rail actuator.
//! - [`dumper`] – [`Dumper`]: tri-state dump actuator.

pub mod drive_train;
pub mod dumper;
pub mod intake;
pub mod subsystem;

pub use drive_train::DriveTrain;
pub use dumper::Dumper;
pub use intake::Intake;
pub use subsystem::SubsystemController;
