//! [`Dumper`] – tri-state dump actuator.
//!
//! Every command is a direct transition; there is no sequencing guard.
//! Re-issuing the current command is a harmless re-assertion.
//!
//! While the enable gate is closed, `dump` and `reset` are accepted but have
//! no effect.  `stop` is always allowed.

use rmc_types::{DumperCommand, DumperState, Subsystem};
use tracing::debug;

use crate::subsystem::SubsystemController;

/// Owns the commanded [`DumperState`] and the enable gate.
#[derive(Debug)]
pub struct Dumper {
    state: DumperState,
    enabled: bool,
}

impl Default for Dumper {
    fn default() -> Self {
        Self {
            state: DumperState::Idle,
            enabled: true,
        }
    }
}

impl Dumper {
    /// Create an enabled dumper in [`DumperState::Idle`].
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> DumperState {
        self.state
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn apply(&mut self, command: DumperCommand) {
        match command {
            DumperCommand::Dump => self.dump(),
            DumperCommand::Reset => self.reset(),
            DumperCommand::Stop => self.stop(),
            DumperCommand::Enable => self.enable(),
            DumperCommand::Disable => self.disable(),
        }
    }

    pub fn dump(&mut self) {
        self.transition(DumperState::Dumping);
    }

    pub fn reset(&mut self) {
        self.transition(DumperState::Resetting);
    }

    pub fn stop(&mut self) {
        self.state = DumperState::Stopped;
    }

    pub fn enable(&mut self) {
        self.enabled = true;
    }

    /// Close the enable gate and return to [`DumperState::Idle`].
    pub fn disable(&mut self) {
        self.enabled = false;
        self.force_safe_idle();
    }

    fn transition(&mut self, target: DumperState) {
        if !self.enabled {
            debug!(?target, "dumper command ignored: dumper disabled");
            return;
        }
        self.state = target;
    }
}

impl SubsystemController for Dumper {
    fn subsystem(&self) -> Subsystem {
        Subsystem::Dumper
    }

    // Idle, not Stopped: a killed dumper must look the same as a freshly
    // booted one.
    fn force_safe_idle(&mut self) {
        self.state = DumperState::Idle;
    }

    fn is_safe_idle(&self) -> bool {
        self.state == DumperState::Idle
    }
}
