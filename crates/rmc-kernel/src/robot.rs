//! [`Robot`] – the aggregate root.
//!
//! Owns exactly one [`SafetyInterlock`] and one controller per subsystem.
//! Controllers are only reachable through [`Robot::execute`], which runs the
//! interlock check first, so a command either fully applies or leaves every
//! field untouched.
//!
//! `Robot` itself is single-threaded; the runtime wraps it in one lock.

use rmc_hal::{DriveTrain, Dumper, Intake, SubsystemController};
use rmc_types::{
    CommandError, DriveTrainState, DumperState, IntakeState, InterlockError, Life, Mode,
    SubsystemCommand,
};
use tracing::debug;

use crate::interlock::SafetyInterlock;

#[derive(Debug)]
pub struct Robot {
    interlock: SafetyInterlock,
    drive_train: DriveTrain,
    intake: Intake,
    dumper: Dumper,
}

impl Robot {
    /// Create a robot with every subsystem in safe-idle.
    pub fn new(life: Life, mode: Mode) -> Self {
        Self {
            interlock: SafetyInterlock::new(life, mode),
            drive_train: DriveTrain::new(),
            intake: Intake::new(),
            dumper: Dumper::new(),
        }
    }

    pub fn life(&self) -> Life {
        self.interlock.life()
    }

    pub fn mode(&self) -> Mode {
        self.interlock.mode()
    }

    pub fn drive_train(&self) -> DriveTrainState {
        self.drive_train.state()
    }

    pub fn intake(&self) -> IntakeState {
        self.intake.state()
    }

    pub fn dumper(&self) -> DumperState {
        self.dumper.state()
    }

    pub fn dumper_enabled(&self) -> bool {
        self.dumper.is_enabled()
    }

    /// Kill or revive.  A kill idles all three controllers before returning.
    pub fn set_life(&mut self, target: Life) -> Result<(), InterlockError> {
        let Self {
            interlock,
            drive_train,
            intake,
            dumper,
        } = self;
        let mut subsystems: [&mut dyn SubsystemController; 3] = [drive_train, intake, dumper];
        interlock.set_life(target, &mut subsystems)
    }

    pub fn set_mode(&mut self, target: Mode) -> Result<(), InterlockError> {
        self.interlock.set_mode(target)
    }

    /// Authorize `command` and forward it to its controller.
    ///
    /// # Errors
    ///
    /// - [`CommandError::Rejected`] – refused by the interlock.
    /// - [`CommandError::InvalidInput`] – a drive speed was NaN.
    pub fn execute(&mut self, command: SubsystemCommand) -> Result<(), CommandError> {
        match self.interlock.authorize(command)? {
            SubsystemCommand::DriveTrain(cmd) => self.drive_train.apply(cmd)?,
            SubsystemCommand::Intake(cmd) => self.intake.apply(cmd),
            SubsystemCommand::Dumper(cmd) => self.dumper.apply(cmd),
        }
        debug!(?command, "subsystem command applied");
        Ok(())
    }
}

impl Default for Robot {
    fn default() -> Self {
        Self::new(Life::default(), Mode::default())
    }
}
