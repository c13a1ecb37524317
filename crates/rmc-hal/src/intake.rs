//! [`Intake`] – bucket-ladder digger and rail actuator.
//!
//! The digger and the actuator are independent: each command touches exactly
//! one field and any combination is legal, mirroring the separate buttons on
//! the operator console.
//!
//! While the enable gate is closed, commands that would start a motor are
//! accepted but have no effect.  Stopping is always allowed.

use rmc_types::{Actuator, Digger, IntakeCommand, IntakeState, Subsystem};
use tracing::debug;

use crate::subsystem::SubsystemController;

/// Owns the commanded [`IntakeState`].
#[derive(Debug, Default)]
pub struct Intake {
    state: IntakeState,
}

impl Intake {
    /// Create an enabled intake with the digger and actuator stopped.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> IntakeState {
        self.state
    }

    pub fn apply(&mut self, command: IntakeCommand) {
        match command {
            IntakeCommand::SetDigger(digger) => self.set_digger(digger),
            IntakeCommand::SetActuator(actuator) => self.set_actuator(actuator),
            IntakeCommand::Enable => self.enable(),
            IntakeCommand::Disable => self.disable(),
        }
    }

    pub fn set_digger(&mut self, digger: Digger) {
        if digger != Digger::Stop && !self.state.enabled {
            debug!(?digger, "digger ignored: intake disabled");
            return;
        }
        self.state.digger = digger;
    }

    pub fn set_actuator(&mut self, actuator: Actuator) {
        if actuator != Actuator::Stop && !self.state.enabled {
            debug!(?actuator, "actuator ignored: intake disabled");
            return;
        }
        self.state.actuator = actuator;
    }

    pub fn enable(&mut self) {
        self.state.enabled = true;
    }

    /// Close the enable gate and stop both motors.
    pub fn disable(&mut self) {
        self.state.enabled = false;
        self.force_safe_idle();
    }
}

impl SubsystemController for Intake {
    fn subsystem(&self) -> Subsystem {
        Subsystem::Intake
    }

    // Leaves the enable gate as it was.
    fn force_safe_idle(&mut self) {
        self.state.digger = Digger::Stop;
        self.state.actuator = Actuator::Stop;
    }

    fn is_safe_idle(&self) -> bool {
        self.state.is_safe_idle()
    }
}
