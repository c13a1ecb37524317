//! Telemetry Snapshot Publisher.
//!
//! [`capture`] is the only place a [`RobotSnapshot`] is assembled; callers
//! must hold the robot lock while calling it.  [`SnapshotPublisher`] adds a
//! fixed-interval broadcast on top of the per-command push done by
//! [`RobotController`], so the hardware driver loop and UI pollers see the
//! state even when no commands arrive.

use std::time::Duration;

use chrono::Utc;
use rmc_kernel::Robot;
use rmc_types::RobotSnapshot;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::trace;
use uuid::Uuid;

use crate::controller::RobotController;

/// Default broadcast period, matching the operator console's poll rate.
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(250);

/// Copy every field of `robot` into an immutable snapshot.
pub(crate) fn capture(robot: &Robot, boot_id: Uuid, sequence: u64) -> RobotSnapshot {
    RobotSnapshot {
        boot_id,
        sequence,
        taken_at: Utc::now(),
        life: robot.life(),
        mode: robot.mode(),
        drive_train: robot.drive_train(),
        intake: robot.intake(),
        dumper: robot.dumper(),
        dumper_enabled: robot.dumper_enabled(),
    }
}

/// Periodically broadcasts the controller's snapshot to its subscribers.
///
/// # Example
///
/// ```rust,no_run
/// use std::time::Duration;
/// use rmc_runtime::{RobotController, SnapshotPublisher};
/// use rmc_types::{Life, Mode};
///
/// #[tokio::main]
/// async fn main() {
///     let controller = RobotController::new(Life::Dead, Mode::Driving);
///     let mut rx = controller.subscribe();
///     let handle = SnapshotPublisher::new(controller)
///         .with_interval(Duration::from_millis(100))
///         .spawn();
///     let snapshot = rx.recv().await.unwrap();
///     println!("{}", snapshot.life);
///     handle.abort();
/// }
/// ```
pub struct SnapshotPublisher {
    controller: RobotController,
    interval: Duration,
}

impl SnapshotPublisher {
    pub fn new(controller: RobotController) -> Self {
        Self {
            controller,
            interval: DEFAULT_INTERVAL,
        }
    }

    /// Override the broadcast period (builder-style).  Zero is raised to one
    /// millisecond.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval.max(Duration::from_millis(1));
        self
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Broadcast forever.  Cancel by dropping or aborting the task.
    pub async fn run(self) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            ticker.tick().await;
            let receivers = self.controller.publish_snapshot();
            trace!(receivers, "snapshot published");
        }
    }

    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }
}
