//! [`RobotController`] – the shared, lock-guarded robot handle.
//!
//! One [`RwLock`] guards the whole [`Robot`] aggregate together with the
//! applied-command counter:
//!
//! * [`RobotController::submit_command`] takes the write lock for the entire
//!   authorize + mutate sequence, so commands (kills included) apply one at a
//!   time in lock-acquisition order.
//! * [`RobotController::snapshot`] takes the read lock; any number of
//!   snapshots may run together, and none can see a half-applied command.
//!
//! Every applied command also pushes a fresh snapshot to broadcast
//! subscribers.  The push is made while the lock is still held, so
//! subscribers receive snapshots in apply order and the last push after a
//! kill is always the killed state.  Broadcast sends never block, so a slow
//! or absent subscriber still cannot delay the next command.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use rmc_kernel::Robot;
use rmc_types::{CommandResult, Life, Mode, RobotCommand, RobotSnapshot};
use tokio::sync::broadcast;
use tracing::{debug, info};
use uuid::Uuid;

use crate::router;
use crate::telemetry;

/// Default number of snapshots buffered per subscriber before it lags.
pub const DEFAULT_SNAPSHOT_CAPACITY: usize = 16;

#[derive(Debug)]
struct Shared {
    robot: Robot,
    sequence: u64,
}

/// Cloneable handle to the single robot instance.  All clones share state.
///
/// # Example
///
/// ```
/// use rmc_runtime::RobotController;
/// use rmc_types::{Life, Mode, RobotCommand};
///
/// let controller = RobotController::new(Life::Dead, Mode::Driving);
/// controller.submit_command(RobotCommand::SetLife { life: Life::Alive }).unwrap();
/// controller.submit_command(RobotCommand::Drive { left: 0.5, right: 0.5 }).unwrap();
///
/// let snapshot = controller.snapshot();
/// assert_eq!(snapshot.drive_train.left_speed, 0.5);
/// assert!(!snapshot.drive_train.braked);
/// ```
#[derive(Clone, Debug)]
pub struct RobotController {
    shared: Arc<RwLock<Shared>>,
    boot_id: Uuid,
    updates: broadcast::Sender<RobotSnapshot>,
}

impl RobotController {
    /// Create the robot with every subsystem in safe-idle.
    pub fn new(life: Life, mode: Mode) -> Self {
        Self::with_capacity(life, mode, DEFAULT_SNAPSHOT_CAPACITY)
    }

    /// Like [`RobotController::new`] with an explicit snapshot channel
    /// capacity.  A capacity of zero is raised to one.
    pub fn with_capacity(life: Life, mode: Mode, capacity: usize) -> Self {
        let (updates, _) = broadcast::channel(capacity.max(1));
        let boot_id = Uuid::new_v4();
        info!(%boot_id, %life, %mode, "robot controller started");
        Self {
            shared: Arc::new(RwLock::new(Shared {
                robot: Robot::new(life, mode),
                sequence: 0,
            })),
            boot_id,
            updates,
        }
    }

    pub fn boot_id(&self) -> Uuid {
        self.boot_id
    }

    /// Apply one command atomically.
    ///
    /// Either the command fully applies or it is rejected with no state
    /// change.  Rejections are returned, never retried.
    pub fn submit_command(&self, command: RobotCommand) -> CommandResult {
        let mut shared = self.write();
        let result = router::route(&mut shared.robot, command);
        if result.is_ok() {
            shared.sequence += 1;
            let snapshot = telemetry::capture(&shared.robot, self.boot_id, shared.sequence);
            // No subscribers is a normal condition.
            let _ = self.updates.send(snapshot);
        }
        let sequence = shared.sequence;
        drop(shared);

        match &result {
            Ok(()) => debug!(?command, sequence, "command applied"),
            Err(err) => info!(?command, error = %err, "command rejected"),
        }
        result
    }

    /// Kill the robot.  Infallible; used by watchdogs and signal handlers.
    pub fn kill(&self) {
        // `SetLife` cannot be rejected.
        let _ = self.submit_command(RobotCommand::SetLife { life: Life::Dead });
    }

    /// A consistent point-in-time copy of the whole robot state.
    pub fn snapshot(&self) -> RobotSnapshot {
        let shared = self.read();
        telemetry::capture(&shared.robot, self.boot_id, shared.sequence)
    }

    /// Receive a snapshot after every applied command and on every
    /// [`SnapshotPublisher`][crate::SnapshotPublisher] tick.
    pub fn subscribe(&self) -> broadcast::Receiver<RobotSnapshot> {
        self.updates.subscribe()
    }

    /// Broadcast the current snapshot.  Returns the number of subscribers
    /// that received it.
    pub fn publish_snapshot(&self) -> usize {
        // Held across the send so no command can apply, and push, in between.
        let shared = self.read();
        let snapshot = telemetry::capture(&shared.robot, self.boot_id, shared.sequence);
        self.updates.send(snapshot).unwrap_or(0)
    }

    // Robot state is consistent between lock sections, so a panic in another
    // holder does not invalidate it.
    fn read(&self) -> RwLockReadGuard<'_, Shared> {
        self.shared.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Shared> {
        self.shared.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rmc_types::{Actuator, CommandError, Digger, DumperState, RejectReason};
    use std::thread;

    fn booted() -> RobotController {
        RobotController::new(Life::Dead, Mode::Driving)
    }

    #[test]
    fn end_to_end_drive_then_kill() {
        let controller = booted();
        let boot = controller.snapshot();
        assert_eq!(boot.life, Life::Dead);
        assert_eq!(boot.mode, Mode::Driving);
        assert!(boot.is_safe_idle());

        controller
            .submit_command(RobotCommand::SetLife { life: Life::Alive })
            .unwrap();
        controller
            .submit_command(RobotCommand::Drive {
                left: 0.5,
                right: 0.5,
            })
            .unwrap();
        let driving = controller.snapshot();
        assert_eq!(driving.drive_train.left_speed, 0.5);
        assert_eq!(driving.drive_train.right_speed, 0.5);
        assert!(!driving.drive_train.braked);

        controller
            .submit_command(RobotCommand::SetLife { life: Life::Dead })
            .unwrap();
        let killed = controller.snapshot();
        assert_eq!(killed.life, Life::Dead);
        assert_eq!(killed.drive_train.left_speed, 0.0);
        assert_eq!(killed.drive_train.right_speed, 0.0);
        assert!(killed.drive_train.braked);
    }

    #[test]
    fn revive_leaves_everything_idle() {
        let controller = RobotController::new(Life::Alive, Mode::Dumping);
        controller.submit_command(RobotCommand::Dump).unwrap();
        controller.kill();
        controller
            .submit_command(RobotCommand::SetLife { life: Life::Alive })
            .unwrap();

        let snapshot = controller.snapshot();
        assert_eq!(snapshot.life, Life::Alive);
        assert_eq!(snapshot.dumper, DumperState::Idle);
        assert!(snapshot.is_safe_idle());
    }

    #[test]
    fn sequence_counts_applied_commands_only() {
        let controller = booted();
        assert_eq!(controller.snapshot().sequence, 0);

        let rejected = controller.submit_command(RobotCommand::Brake);
        assert_eq!(
            rejected,
            Err(CommandError::Rejected {
                reason: RejectReason::Dead
            })
        );
        assert_eq!(controller.snapshot().sequence, 0);

        controller
            .submit_command(RobotCommand::SetLife { life: Life::Alive })
            .unwrap();
        controller.submit_command(RobotCommand::Brake).unwrap();
        assert_eq!(controller.snapshot().sequence, 2);
    }

    #[test]
    fn snapshots_carry_the_boot_id() {
        let controller = booted();
        assert_eq!(controller.snapshot().boot_id, controller.boot_id());
        assert_ne!(booted().boot_id(), controller.boot_id());
    }

    #[tokio::test]
    async fn applied_commands_are_pushed_to_subscribers() {
        let controller = booted();
        let mut rx = controller.subscribe();

        let _ = controller.submit_command(RobotCommand::Dump);
        controller
            .submit_command(RobotCommand::SetMode { mode: Mode::Digging })
            .unwrap();

        // The rejected dump produced nothing; the first push is the mode switch.
        let pushed = rx.recv().await.unwrap();
        assert_eq!(pushed.mode, Mode::Digging);
        assert_eq!(pushed.sequence, 1);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn publish_without_subscribers_reports_zero() {
        assert_eq!(booted().publish_snapshot(), 0);
    }

    #[test]
    fn snapshots_never_observe_a_torn_drive_command() {
        let controller = RobotController::new(Life::Alive, Mode::Driving);
        thread::scope(|scope| {
            let writer = controller.clone();
            scope.spawn(move || {
                for i in 0..2_000 {
                    let speed = if i % 2 == 0 { 0.25 } else { -0.75 };
                    writer
                        .submit_command(RobotCommand::Drive {
                            left: speed,
                            right: speed,
                        })
                        .unwrap();
                }
            });
            for _ in 0..4 {
                let reader = controller.clone();
                scope.spawn(move || {
                    for _ in 0..2_000 {
                        let snapshot = reader.snapshot();
                        assert_eq!(
                            snapshot.drive_train.left_speed,
                            snapshot.drive_train.right_speed
                        );
                    }
                });
            }
        });
        assert_eq!(controller.snapshot().sequence, 2_000);
    }

    #[test]
    fn pushes_arrive_in_apply_order_and_end_with_the_kill() {
        for _ in 0..20 {
            let controller = RobotController::with_capacity(Life::Alive, Mode::Driving, 8_192);
            let mut rx = controller.subscribe();
            thread::scope(|scope| {
                for _ in 0..4 {
                    let operator = controller.clone();
                    scope.spawn(move || {
                        for i in 0..250 {
                            let speed = if i % 2 == 0 { 0.5 } else { -0.5 };
                            let _ = operator.submit_command(RobotCommand::Drive {
                                left: speed,
                                right: speed,
                            });
                        }
                    });
                }
                let publisher = controller.clone();
                scope.spawn(move || {
                    for _ in 0..250 {
                        publisher.publish_snapshot();
                    }
                });
                let killer = controller.clone();
                scope.spawn(move || killer.kill());
            });

            let mut last: Option<RobotSnapshot> = None;
            while let Ok(snapshot) = rx.try_recv() {
                if let Some(prev) = &last {
                    assert!(
                        snapshot.sequence >= prev.sequence,
                        "sequence went from {} to {}",
                        prev.sequence,
                        snapshot.sequence
                    );
                }
                last = Some(snapshot);
            }
            let last = last.expect("at least the kill was pushed");
            assert_eq!(last.life, Life::Dead);
            assert!(last.is_safe_idle());
            assert_eq!(last.sequence, controller.snapshot().sequence);
        }
    }

    #[test]
    fn kill_under_contention_ends_idle() {
        let controller = RobotController::new(Life::Alive, Mode::Digging);
        thread::scope(|scope| {
            for _ in 0..4 {
                let operator = controller.clone();
                scope.spawn(move || {
                    for _ in 0..500 {
                        let _ = operator.submit_command(RobotCommand::SetDigger {
                            digger: Digger::Dig,
                        });
                        let _ = operator.submit_command(RobotCommand::SetActuator {
                            actuator: Actuator::Lower,
                        });
                    }
                });
            }
            let killer = controller.clone();
            scope.spawn(move || killer.kill());
        });

        // Whatever interleaving happened, nothing was applied after the kill.
        let snapshot = controller.snapshot();
        assert_eq!(snapshot.life, Life::Dead);
        assert!(snapshot.is_safe_idle());
    }
}
