//! [`DriveTrain`] – differential drive controller.
//!
//! Speeds are normalised to `[-1.0, 1.0]` (the range of a joystick axis).
//! Out-of-range inputs are clamped rather than rejected; only NaN, which
//! cannot be clamped, is refused.
//!
//! The controller carries two independent safety latches:
//!
//! - **brake** – set by [`DriveTrain::brake`], cleared by the next accepted
//!   [`DriveTrain::drive`].
//! - **enable gate** – while disabled, `drive` is accepted but has no effect.
//!   [`DriveTrain::disable`] also stops and brakes the wheels.

use rmc_types::{DriveCommand, DriveError, DriveTrainState, Subsystem};
use tracing::debug;

use crate::subsystem::SubsystemController;

const MIN_SPEED: f32 = -1.0;
const MAX_SPEED: f32 = 1.0;

/// Owns the commanded [`DriveTrainState`].
///
/// # Example
///
/// ```
/// use rmc_hal::DriveTrain;
///
/// let mut drive = DriveTrain::new();
/// drive.drive(2.0, -5.0).unwrap();
/// assert_eq!(drive.state().left_speed, 1.0);
/// assert_eq!(drive.state().right_speed, -1.0);
/// ```
#[derive(Debug, Default)]
pub struct DriveTrain {
    state: DriveTrainState,
}

impl DriveTrain {
    /// Create a drive train in its safe-idle state (enabled, braked, still).
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> DriveTrainState {
        self.state
    }

    /// Apply one drive train command.
    pub fn apply(&mut self, command: DriveCommand) -> Result<(), DriveError> {
        match command {
            DriveCommand::Drive { left, right } => self.drive(left, right),
            DriveCommand::Brake => self.brake(),
            DriveCommand::Enable => self.enable(),
            DriveCommand::Disable => self.disable(),
        }
    }

    /// Drive both sides at the given speeds, clamped to `[-1, 1]`.
    ///
    /// Clears the brake latch.  A no-op while the drive train is disabled.
    ///
    /// # Errors
    ///
    /// [`DriveError::InvalidInput`] when either speed is NaN.  No state is
    /// changed in that case.
    pub fn drive(&mut self, left: f32, right: f32) -> Result<(), DriveError> {
        if left.is_nan() || right.is_nan() {
            return Err(DriveError::InvalidInput { left, right });
        }
        if !self.state.enabled {
            debug!(left, right, "drive ignored: drive train disabled");
            return Ok(());
        }
        self.state.left_speed = left.clamp(MIN_SPEED, MAX_SPEED);
        self.state.right_speed = right.clamp(MIN_SPEED, MAX_SPEED);
        self.state.braked = false;
        Ok(())
    }

    /// Stop both sides and latch the brake.  Idempotent.
    pub fn brake(&mut self) -> Result<(), DriveError> {
        self.state = self.state.killed();
        Ok(())
    }

    /// Re-open the enable gate.  Does not release the brake.
    pub fn enable(&mut self) -> Result<(), DriveError> {
        self.state.enabled = true;
        Ok(())
    }

    /// Close the enable gate, stopping and braking the wheels.
    pub fn disable(&mut self) -> Result<(), DriveError> {
        self.state.enabled = false;
        self.brake()
    }
}

impl SubsystemController for DriveTrain {
    fn subsystem(&self) -> Subsystem {
        Subsystem::DriveTrain
    }

    fn force_safe_idle(&mut self) {
        self.state = self.state.killed();
    }

    fn is_safe_idle(&self) -> bool {
        self.state.is_safe_idle()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_drive_train_is_enabled_and_braked() {
        let drive = DriveTrain::new();
        assert_eq!(drive.state(), DriveTrainState::safe_idle());
        assert!(drive.state().enabled);
        assert!(drive.state().braked);
    }

    #[test]
    fn drive_sets_speeds_and_releases_brake() {
        let mut drive = DriveTrain::new();
        drive.drive(0.5, -0.25).unwrap();
        let state = drive.state();
        assert_eq!(state.left_speed, 0.5);
        assert_eq!(state.right_speed, -0.25);
        assert!(!state.braked);
        assert!(state.enabled);
    }

    #[test]
    fn out_of_range_speeds_are_clamped() {
        let mut drive = DriveTrain::new();
        drive.drive(2.0, -5.0).unwrap();
        assert_eq!(drive.state().left_speed, 1.0);
        assert_eq!(drive.state().right_speed, -1.0);

        drive.drive(f32::INFINITY, f32::NEG_INFINITY).unwrap();
        assert_eq!(drive.state().left_speed, 1.0);
        assert_eq!(drive.state().right_speed, -1.0);
    }

    #[test]
    fn nan_is_rejected_without_side_effects() {
        let mut drive = DriveTrain::new();
        drive.drive(0.3, 0.3).unwrap();
        let before = drive.state();

        let result = drive.drive(f32::NAN, 0.1);
        assert!(matches!(result, Err(DriveError::InvalidInput { .. })));
        assert_eq!(drive.state(), before);
    }

    #[test]
    fn brake_is_idempotent() {
        let mut drive = DriveTrain::new();
        drive.drive(0.8, 0.8).unwrap();
        drive.brake().unwrap();
        let once = drive.state();
        drive.brake().unwrap();
        assert_eq!(drive.state(), once);
        assert!(once.is_safe_idle());
    }

    #[test]
    fn brake_latches_until_next_drive() {
        let mut drive = DriveTrain::new();
        drive.drive(0.4, 0.4).unwrap();
        drive.brake().unwrap();
        assert!(drive.state().braked);

        drive.drive(0.2, 0.1).unwrap();
        assert!(!drive.state().braked);
        assert_eq!(drive.state().left_speed, 0.2);
    }

    #[test]
    fn disable_stops_and_gates_drive() {
        let mut drive = DriveTrain::new();
        drive.drive(0.9, 0.9).unwrap();
        drive.disable().unwrap();
        assert!(!drive.state().enabled);
        assert!(drive.state().is_safe_idle());

        drive.drive(0.5, 0.5).unwrap();
        assert_eq!(drive.state().left_speed, 0.0);
        assert!(drive.state().braked);

        drive.enable().unwrap();
        drive.drive(0.5, 0.5).unwrap();
        assert_eq!(drive.state().left_speed, 0.5);
    }

    #[test]
    fn apply_dispatches_every_variant() {
        let mut drive = DriveTrain::new();
        drive
            .apply(DriveCommand::Drive {
                left: 0.1,
                right: 0.2,
            })
            .unwrap();
        assert_eq!(drive.state().right_speed, 0.2);
        drive.apply(DriveCommand::Brake).unwrap();
        assert!(drive.state().braked);
        drive.apply(DriveCommand::Disable).unwrap();
        assert!(!drive.state().enabled);
        drive.apply(DriveCommand::Enable).unwrap();
        assert!(drive.state().enabled);
    }

    #[test]
    fn force_safe_idle_preserves_enable_gate() {
        let mut drive = DriveTrain::new();
        drive.disable().unwrap();
        drive.force_safe_idle();
        assert!(!drive.state().enabled);
        assert!(drive.is_safe_idle());
    }
}
