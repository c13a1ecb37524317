//! `rmc-types` – shared vocabulary for the mining robot control core.
//!
//! Every other crate in the workspace speaks in these types: the life and
//! mode switches, the per-subsystem states, the command envelope accepted by
//! the router, the telemetry snapshot, and the error taxonomy returned to the
//! operator console.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

// ────────────────────────────────────────────────────────────────────────────
// Life / Mode / Subsystem
// ────────────────────────────────────────────────────────────────────────────

/// Top-level safety switch.  While [`Life::Dead`] every subsystem is held in
/// its safe-idle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Life {
    Alive,
    #[default]
    Dead,
}

/// Operational phase.  Exactly one subsystem accepts commands per mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    #[default]
    Driving,
    Digging,
    Dumping,
}

impl Mode {
    /// The subsystem that accepts commands while this mode is active.
    pub fn subsystem(self) -> Subsystem {
        match self {
            Mode::Driving => Subsystem::DriveTrain,
            Mode::Digging => Subsystem::Intake,
            Mode::Dumping => Subsystem::Dumper,
        }
    }
}

/// One independently stateful physical mechanism.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Subsystem {
    DriveTrain,
    Intake,
    Dumper,
}

impl Subsystem {
    /// The mode under which this subsystem accepts commands.
    pub fn mode(self) -> Mode {
        match self {
            Subsystem::DriveTrain => Mode::Driving,
            Subsystem::Intake => Mode::Digging,
            Subsystem::Dumper => Mode::Dumping,
        }
    }
}

impl fmt::Display for Life {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Life::Alive => write!(f, "alive"),
            Life::Dead => write!(f, "dead"),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Driving => write!(f, "driving"),
            Mode::Digging => write!(f, "digging"),
            Mode::Dumping => write!(f, "dumping"),
        }
    }
}

impl fmt::Display for Subsystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Subsystem::DriveTrain => write!(f, "drive_train"),
            Subsystem::Intake => write!(f, "intake"),
            Subsystem::Dumper => write!(f, "dumper"),
        }
    }
}

/// Returned when a textual life or mode value (config files, env vars) does
/// not name a known variant.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

impl FromStr for Life {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "alive" => Ok(Life::Alive),
            "dead" => Ok(Life::Dead),
            _ => Err(UnknownVariant {
                kind: "life",
                value: s.to_string(),
            }),
        }
    }
}

impl FromStr for Mode {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "driving" => Ok(Mode::Driving),
            "digging" => Ok(Mode::Digging),
            "dumping" => Ok(Mode::Dumping),
            _ => Err(UnknownVariant {
                kind: "mode",
                value: s.to_string(),
            }),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Subsystem states
// ────────────────────────────────────────────────────────────────────────────

/// Commanded state of the drive train.  Speeds are normalised to `[-1, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DriveTrainState {
    pub enabled: bool,
    pub left_speed: f32,
    pub right_speed: f32,
    pub braked: bool,
}

impl DriveTrainState {
    /// Boot state: enabled, stationary, brakes engaged.
    pub fn safe_idle() -> Self {
        Self {
            enabled: true,
            left_speed: 0.0,
            right_speed: 0.0,
            braked: true,
        }
    }

    /// Safe-idle projection of this state: zero speed and brakes engaged.
    /// The enable gate is left as it was.
    pub fn killed(self) -> Self {
        Self {
            left_speed: 0.0,
            right_speed: 0.0,
            braked: true,
            ..self
        }
    }

    /// `true` when no motive force is commanded.
    pub fn is_safe_idle(&self) -> bool {
        self.left_speed == 0.0 && self.right_speed == 0.0 && self.braked
    }
}

impl Default for DriveTrainState {
    fn default() -> Self {
        Self::safe_idle()
    }
}

/// Bucket-ladder digger motor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Digger {
    Dig,
    #[default]
    Stop,
}

/// Rail actuator that raises and lowers the bucket ladder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Actuator {
    Raise,
    Lower,
    #[default]
    Stop,
}

/// Commanded state of the intake.  Digger and actuator are independent;
/// while `enabled` is false neither can be started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntakeState {
    pub enabled: bool,
    pub digger: Digger,
    pub actuator: Actuator,
}

impl IntakeState {
    /// `true` when both motors are stopped.  The enable gate is not
    /// considered.
    pub fn is_safe_idle(&self) -> bool {
        self.digger == Digger::Stop && self.actuator == Actuator::Stop
    }
}

impl Default for IntakeState {
    fn default() -> Self {
        Self {
            enabled: true,
            digger: Digger::Stop,
            actuator: Actuator::Stop,
        }
    }
}

/// Commanded state of the dumper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DumperState {
    #[default]
    Idle,
    Dumping,
    Resetting,
    Stopped,
}

// ────────────────────────────────────────────────────────────────────────────
// Commands
// ────────────────────────────────────────────────────────────────────────────

/// Command envelope accepted by the router.
///
/// The wire form is internally tagged on `command`, e.g.
/// `{"command":"drive","left":0.5,"right":0.5}` or `{"command":"dump"}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum RobotCommand {
    SetLife { life: Life },
    SetMode { mode: Mode },
    Drive { left: f32, right: f32 },
    Brake,
    EnableDriveTrain,
    DisableDriveTrain,
    SetDigger { digger: Digger },
    SetActuator { actuator: Actuator },
    EnableIntake,
    DisableIntake,
    Dump,
    ResetDumper,
    StopDumper,
    EnableDumper,
    DisableDumper,
}

impl RobotCommand {
    /// The subsystem this command is addressed to, or `None` for life/mode
    /// commands.
    pub fn subsystem(&self) -> Option<Subsystem> {
        match self {
            RobotCommand::SetLife { .. } | RobotCommand::SetMode { .. } => None,
            RobotCommand::Drive { .. }
            | RobotCommand::Brake
            | RobotCommand::EnableDriveTrain
            | RobotCommand::DisableDriveTrain => Some(Subsystem::DriveTrain),
            RobotCommand::SetDigger { .. }
            | RobotCommand::SetActuator { .. }
            | RobotCommand::EnableIntake
            | RobotCommand::DisableIntake => Some(Subsystem::Intake),
            RobotCommand::Dump
            | RobotCommand::ResetDumper
            | RobotCommand::StopDumper
            | RobotCommand::EnableDumper
            | RobotCommand::DisableDumper => Some(Subsystem::Dumper),
        }
    }
}

/// Drive train command vocabulary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DriveCommand {
    Drive { left: f32, right: f32 },
    Brake,
    Enable,
    Disable,
}

/// Intake command vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntakeCommand {
    SetDigger(Digger),
    SetActuator(Actuator),
    Enable,
    Disable,
}

/// Dumper command vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DumperCommand {
    Dump,
    Reset,
    Stop,
    Enable,
    Disable,
}

/// A command addressed to exactly one subsystem; the unit the safety
/// interlock authorizes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SubsystemCommand {
    DriveTrain(DriveCommand),
    Intake(IntakeCommand),
    Dumper(DumperCommand),
}

impl SubsystemCommand {
    pub fn subsystem(&self) -> Subsystem {
        match self {
            SubsystemCommand::DriveTrain(_) => Subsystem::DriveTrain,
            SubsystemCommand::Intake(_) => Subsystem::Intake,
            SubsystemCommand::Dumper(_) => Subsystem::Dumper,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Telemetry
// ────────────────────────────────────────────────────────────────────────────

/// Immutable point-in-time copy of the whole robot state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RobotSnapshot {
    /// Identifies the process lifetime that produced this snapshot.
    pub boot_id: Uuid,
    /// Number of commands applied since boot.
    pub sequence: u64,
    pub taken_at: DateTime<Utc>,
    pub life: Life,
    pub mode: Mode,
    pub drive_train: DriveTrainState,
    pub intake: IntakeState,
    pub dumper: DumperState,
    /// Whether the dumper accepts `dump`/`reset`.
    pub dumper_enabled: bool,
}

impl RobotSnapshot {
    /// `true` when every subsystem is in its safe-idle variant.
    pub fn is_safe_idle(&self) -> bool {
        self.drive_train.is_safe_idle()
            && self.intake.is_safe_idle()
            && self.dumper == DumperState::Idle
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Errors
// ────────────────────────────────────────────────────────────────────────────

/// Why the interlock refused a subsystem command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    /// The robot is dead.
    Dead,
    /// The command's subsystem is not active under the current mode.
    WrongMode,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::Dead => write!(f, "robot is dead"),
            RejectReason::WrongMode => write!(f, "subsystem inactive in current mode"),
        }
    }
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InterlockError {
    #[error("Command rejected: {reason}")]
    Rejected { reason: RejectReason },
}

#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DriveError {
    #[error(transparent)]
    Rejected(#[from] InterlockError),

    #[error("Drive input cannot be clamped: left={left}, right={right}")]
    InvalidInput { left: f32, right: f32 },
}

/// Error returned to the submitter of a [`RobotCommand`].
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CommandError {
    #[error("Command rejected: {reason}")]
    Rejected { reason: RejectReason },

    #[error("Invalid input: {details}")]
    InvalidInput { details: String },
}

impl From<InterlockError> for CommandError {
    fn from(err: InterlockError) -> Self {
        match err {
            InterlockError::Rejected { reason } => CommandError::Rejected { reason },
        }
    }
}

impl From<DriveError> for CommandError {
    fn from(err: DriveError) -> Self {
        match err {
            DriveError::Rejected(inner) => inner.into(),
            invalid @ DriveError::InvalidInput { .. } => CommandError::InvalidInput {
                details: invalid.to_string(),
            },
        }
    }
}

/// Outcome of a single command submission.
pub type CommandResult = Result<(), CommandError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_subsystem_mapping_is_bijective() {
        for mode in [Mode::Driving, Mode::Digging, Mode::Dumping] {
            assert_eq!(mode.subsystem().mode(), mode);
        }
    }

    #[test]
    fn drive_command_wire_format() {
        let cmd: RobotCommand =
            serde_json::from_str(r#"{"command":"drive","left":0.5,"right":-0.25}"#).unwrap();
        assert_eq!(
            cmd,
            RobotCommand::Drive {
                left: 0.5,
                right: -0.25
            }
        );
        assert_eq!(cmd.subsystem(), Some(Subsystem::DriveTrain));
    }

    #[test]
    fn unit_and_enum_commands_parse() {
        let dump: RobotCommand = serde_json::from_str(r#"{"command":"dump"}"#).unwrap();
        assert_eq!(dump, RobotCommand::Dump);

        let dig: RobotCommand =
            serde_json::from_str(r#"{"command":"set_digger","digger":"dig"}"#).unwrap();
        assert_eq!(dig, RobotCommand::SetDigger { digger: Digger::Dig });

        let kill: RobotCommand =
            serde_json::from_str(r#"{"command":"set_life","life":"dead"}"#).unwrap();
        assert_eq!(kill, RobotCommand::SetLife { life: Life::Dead });
        assert_eq!(kill.subsystem(), None);
    }

    #[test]
    fn unknown_command_is_rejected_by_decoder() {
        let result = serde_json::from_str::<RobotCommand>(r#"{"command":"self_destruct"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn life_and_mode_parse_case_insensitively() {
        assert_eq!("Alive".parse::<Life>().unwrap(), Life::Alive);
        assert_eq!(" DUMPING ".parse::<Mode>().unwrap(), Mode::Dumping);
        let err = "flying".parse::<Mode>().unwrap_err();
        assert!(err.to_string().contains("flying"));
    }

    #[test]
    fn defaults_are_safe_idle() {
        assert_eq!(Life::default(), Life::Dead);
        assert!(DriveTrainState::default().is_safe_idle());
        assert!(IntakeState::default().is_safe_idle());
        assert_eq!(DumperState::default(), DumperState::Idle);
    }

    #[test]
    fn enable_gate_commands_parse() {
        let cases = [
            (r#"{"command":"enable_intake"}"#, RobotCommand::EnableIntake, Subsystem::Intake),
            (r#"{"command":"disable_intake"}"#, RobotCommand::DisableIntake, Subsystem::Intake),
            (r#"{"command":"enable_dumper"}"#, RobotCommand::EnableDumper, Subsystem::Dumper),
            (r#"{"command":"disable_dumper"}"#, RobotCommand::DisableDumper, Subsystem::Dumper),
        ];
        for (raw, expected, subsystem) in cases {
            let cmd: RobotCommand = serde_json::from_str(raw).unwrap();
            assert_eq!(cmd, expected);
            assert_eq!(cmd.subsystem(), Some(subsystem));
        }
        assert!(IntakeState::default().enabled);
    }

    #[test]
    fn killed_projection_keeps_enable_gate() {
        let moving = DriveTrainState {
            enabled: false,
            left_speed: 0.7,
            right_speed: -0.2,
            braked: false,
        };
        let killed = moving.killed();
        assert!(killed.is_safe_idle());
        assert!(!killed.enabled);
    }

    #[test]
    fn drive_error_converts_to_command_error() {
        let rejected: CommandError = DriveError::Rejected(InterlockError::Rejected {
            reason: RejectReason::Dead,
        })
        .into();
        assert_eq!(
            rejected,
            CommandError::Rejected {
                reason: RejectReason::Dead
            }
        );

        let invalid: CommandError = DriveError::InvalidInput {
            left: f32::NAN,
            right: 0.0,
        }
        .into();
        assert!(matches!(invalid, CommandError::InvalidInput { .. }));
    }

    #[test]
    fn command_error_wire_format() {
        let err = CommandError::Rejected {
            reason: RejectReason::WrongMode,
        };
        let json = serde_json::to_string(&err).unwrap();
        assert_eq!(json, r#"{"kind":"rejected","reason":"wrong_mode"}"#);
    }
}
