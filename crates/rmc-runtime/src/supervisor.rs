//! [`LinkSupervisor`] – kills the robot when the operator link goes quiet.
//!
//! The transport calls [`LinkSupervisor::contact`] for every message it
//! receives from the operator console.  [`LinkSupervisor::run`] polls the
//! [`LinkWatchdog`] and issues a single kill per loss.  Contact after a loss
//! only re-arms the watchdog; reviving stays an explicit operator decision.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use rmc_kernel::{LinkHealth, LinkWatchdog};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

use crate::controller::RobotController;

#[derive(Clone, Debug)]
pub struct LinkSupervisor {
    controller: RobotController,
    watchdog: Arc<Mutex<LinkWatchdog>>,
}

impl LinkSupervisor {
    pub fn new(controller: RobotController, timeout: Duration) -> Self {
        Self {
            controller,
            watchdog: Arc::new(Mutex::new(LinkWatchdog::new(timeout))),
        }
    }

    /// Record a message from the operator console.
    pub fn contact(&self) {
        if self.lock().feed() {
            info!("operator link restored; robot stays in its current life state");
        }
    }

    /// Current view of the link.
    pub fn health(&self) -> LinkHealth {
        self.lock().health_at(std::time::Instant::now())
    }

    /// Poll once.  Returns `true` when this call killed the robot.
    pub fn check(&self) -> bool {
        let lost = self.lock().poll();
        if lost {
            let timeout = self.lock().timeout();
            warn!(?timeout, "operator link lost; killing robot");
            self.controller.kill();
        }
        lost
    }

    /// Poll every `period` forever.  Cancel by aborting the task.
    pub async fn run(self, period: Duration) {
        let mut ticker = tokio::time::interval(period.max(Duration::from_millis(1)));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            ticker.tick().await;
            self.check();
        }
    }

    pub fn spawn(self, period: Duration) -> JoinHandle<()> {
        tokio::spawn(self.run(period))
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, LinkWatchdog> {
        self.watchdog.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
