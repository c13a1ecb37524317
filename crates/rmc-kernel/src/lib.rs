//! `rmc-kernel` – Safety & Arbitration
//!
//! The kernel does not decide what the robot should do; it decides whether
//! the robot is allowed to do it.
//!
//! # Modules
//!
//! - [`interlock`] – [`SafetyInterlock`][interlock::SafetyInterlock]:
//!   the single authority for [`Life`][rmc_types::Life] and
//!   [`Mode`][rmc_types::Mode].  Every subsystem command is authorized here
//!   and a kill forces every subsystem to safe-idle in the same step.
//! - [`robot`] – [`Robot`][robot::Robot]: the aggregate root that owns the
//!   interlock and the three subsystem controllers.  It exposes no path to a
//!   controller that bypasses the interlock.
//! - [`watchdog`] – [`LinkWatchdog`][watchdog::LinkWatchdog]: detects a lost
//!   operator link so a supervisor can kill the robot.

pub mod interlock;
pub mod robot;
pub mod watchdog;

pub use interlock::SafetyInterlock;
pub use robot::Robot;
pub use watchdog::{LinkHealth, LinkWatchdog};
