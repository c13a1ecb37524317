//! Command Router – the exhaustive envelope dispatcher.
//!
//! | Envelope | Target |
//! |---|---|
//! | `SetLife` | [`Robot::set_life`] |
//! | `SetMode` | [`Robot::set_mode`] |
//! | `Drive`, `Brake`, `EnableDriveTrain`, `DisableDriveTrain` | drive train via [`Robot::execute`] |
//! | `SetDigger`, `SetActuator`, `EnableIntake`, `DisableIntake` | intake via [`Robot::execute`] |
//! | `Dump`, `ResetDumper`, `StopDumper`, `EnableDumper`, `DisableDumper` | dumper via [`Robot::execute`] |
//!
//! Adding an envelope variant fails to compile until it is mapped here.

use rmc_kernel::Robot;
use rmc_types::{
    CommandResult, DriveCommand, DumperCommand, IntakeCommand, Life, Mode, RobotCommand,
    SubsystemCommand,
};

/// Where a [`RobotCommand`] is delivered.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Route {
    Life(Life),
    Mode(Mode),
    Subsystem(SubsystemCommand),
}

impl From<RobotCommand> for Route {
    fn from(command: RobotCommand) -> Self {
        match command {
            RobotCommand::SetLife { life } => Route::Life(life),
            RobotCommand::SetMode { mode } => Route::Mode(mode),
            RobotCommand::Drive { left, right } => {
                Route::Subsystem(SubsystemCommand::DriveTrain(DriveCommand::Drive { left, right }))
            }
            RobotCommand::Brake => Route::Subsystem(SubsystemCommand::DriveTrain(DriveCommand::Brake)),
            RobotCommand::EnableDriveTrain => {
                Route::Subsystem(SubsystemCommand::DriveTrain(DriveCommand::Enable))
            }
            RobotCommand::DisableDriveTrain => {
                Route::Subsystem(SubsystemCommand::DriveTrain(DriveCommand::Disable))
            }
            RobotCommand::SetDigger { digger } => {
                Route::Subsystem(SubsystemCommand::Intake(IntakeCommand::SetDigger(digger)))
            }
            RobotCommand::SetActuator { actuator } => {
                Route::Subsystem(SubsystemCommand::Intake(IntakeCommand::SetActuator(actuator)))
            }
            RobotCommand::EnableIntake => {
                Route::Subsystem(SubsystemCommand::Intake(IntakeCommand::Enable))
            }
            RobotCommand::DisableIntake => {
                Route::Subsystem(SubsystemCommand::Intake(IntakeCommand::Disable))
            }
            RobotCommand::Dump => Route::Subsystem(SubsystemCommand::Dumper(DumperCommand::Dump)),
            RobotCommand::ResetDumper => {
                Route::Subsystem(SubsystemCommand::Dumper(DumperCommand::Reset))
            }
            RobotCommand::StopDumper => Route::Subsystem(SubsystemCommand::Dumper(DumperCommand::Stop)),
            RobotCommand::EnableDumper => {
                Route::Subsystem(SubsystemCommand::Dumper(DumperCommand::Enable))
            }
            RobotCommand::DisableDumper => {
                Route::Subsystem(SubsystemCommand::Dumper(DumperCommand::Disable))
            }
        }
    }
}

/// Apply `command` to `robot`.
///
/// The caller must hold exclusive access to `robot` for the whole call; that
/// is what makes authorize + mutate a single step.
pub fn route(robot: &mut Robot, command: RobotCommand) -> CommandResult {
    match Route::from(command) {
        Route::Life(life) => robot.set_life(life)?,
        Route::Mode(mode) => robot.set_mode(mode)?,
        Route::Subsystem(cmd) => robot.execute(cmd)?,
    }
    Ok(())
}
