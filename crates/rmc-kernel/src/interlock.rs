//! [`SafetyInterlock`] – life/mode authority and command chokepoint.
//!
//! Two checks stand between a [`SubsystemCommand`] and its controller, in
//! this order:
//!
//! 1. **Life**: nothing reaches a subsystem while the robot is
//!    [`Life::Dead`] ([`RejectReason::Dead`]).
//! 2. **Mode**: the command's subsystem must be the one associated with the
//!    current [`Mode`] ([`RejectReason::WrongMode`]).
//!
//! A kill (`Alive → Dead`) forces every subsystem to safe-idle as part of
//! the same call that flips the life state.  Revive only clears the flag;
//! nothing that was commanded before the kill comes back.
//!
//! # Example
//!
//! ```
//! use rmc_kernel::SafetyInterlock;
//! use rmc_types::{DumperCommand, Life, Mode, RejectReason, SubsystemCommand, InterlockError};
//!
//! let mut interlock = SafetyInterlock::new(Life::Dead, Mode::Dumping);
//! let dump = SubsystemCommand::Dumper(DumperCommand::Dump);
//!
//! assert_eq!(
//!     interlock.authorize(dump),
//!     Err(InterlockError::Rejected { reason: RejectReason::Dead })
//! );
//!
//! interlock.set_life(Life::Alive, &mut []).unwrap();
//! assert_eq!(interlock.authorize(dump), Ok(dump));
//! ```

use rmc_hal::SubsystemController;
use rmc_types::{InterlockError, Life, Mode, RejectReason, SubsystemCommand};
use tracing::{debug, info, warn};

/// Owns [`Life`] and [`Mode`] and gates every subsystem command.
#[derive(Debug, Clone)]
pub struct SafetyInterlock {
    life: Life,
    mode: Mode,
}

impl SafetyInterlock {
    pub fn new(life: Life, mode: Mode) -> Self {
        Self { life, mode }
    }

    pub fn life(&self) -> Life {
        self.life
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Transition the life state.
    ///
    /// `Alive → Dead` forces every controller in `subsystems` to safe-idle
    /// before returning.  Same-state transitions are no-ops.  Never fails;
    /// the `Result` keeps the signature uniform with the other operations.
    pub fn set_life(
        &mut self,
        target: Life,
        subsystems: &mut [&mut dyn SubsystemController],
    ) -> Result<(), InterlockError> {
        match (self.life, target) {
            (Life::Alive, Life::Dead) => {
                self.life = Life::Dead;
                for subsystem in subsystems.iter_mut() {
                    subsystem.force_safe_idle();
                }
                warn!(mode = %self.mode, "robot killed; all subsystems forced to safe-idle");
            }
            (Life::Dead, Life::Alive) => {
                self.life = Life::Alive;
                info!(mode = %self.mode, "robot revived");
            }
            (current, _) => {
                debug!(life = %current, "life unchanged");
            }
        }
        Ok(())
    }

    /// Switch the active mode.  Subsystem outputs are left untouched; only
    /// which commands are accepted afterwards changes.
    pub fn set_mode(&mut self, target: Mode) -> Result<(), InterlockError> {
        if self.mode != target {
            info!(from = %self.mode, to = %target, "mode switched");
            self.mode = target;
        }
        Ok(())
    }

    /// Pass `command` through unchanged if the robot is alive and the
    /// command's subsystem is active under the current mode.
    ///
    /// # Errors
    ///
    /// - [`RejectReason::Dead`] – the robot is dead.  Checked first.
    /// - [`RejectReason::WrongMode`] – the subsystem is inactive.
    pub fn authorize(&self, command: SubsystemCommand) -> Result<SubsystemCommand, InterlockError> {
        if self.life == Life::Dead {
            return Err(InterlockError::Rejected {
                reason: RejectReason::Dead,
            });
        }
        if command.subsystem() != self.mode.subsystem() {
            return Err(InterlockError::Rejected {
                reason: RejectReason::WrongMode,
            });
        }
        Ok(command)
    }
}
