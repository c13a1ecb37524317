//! Common interface of every subsystem controller.
//!
//! The safety interlock never needs to know which concrete mechanism it is
//! holding; on kill it walks every controller through this trait.

use rmc_types::Subsystem;

/// A controller that owns the commanded state of one subsystem.
pub trait SubsystemController: Send + Sync {
    /// Which subsystem this controller drives.
    fn subsystem(&self) -> Subsystem;

    /// Force the subsystem into its safe-idle variant, discarding whatever
    /// was last commanded.  Must be infallible.
    fn force_safe_idle(&mut self);

    /// `true` when no motive force is currently commanded.
    fn is_safe_idle(&self) -> bool;
}
