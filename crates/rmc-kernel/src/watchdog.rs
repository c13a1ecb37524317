//! [`LinkWatchdog`] – operator link monitor.
//!
//! The transport layer calls [`LinkWatchdog::feed`] every time something
//! arrives from the operator console.  A supervisor loop calls
//! [`LinkWatchdog::poll`]; it returns `true` exactly once per loss, at which
//! point the supervisor is expected to kill the robot.
//!
//! The watchdog stays disarmed until the first contact, so a robot that has
//! never been connected is not killed repeatedly while it boots.

use std::time::{Duration, Instant};

/// Link state as seen by the watchdog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkHealth {
    /// No contact has been recorded yet.
    Disarmed,
    /// Last contact is within the timeout.
    Connected,
    /// The timeout has elapsed since the last contact.
    Lost,
}

/// Tracks the last operator contact against a fixed timeout.
///
/// # Example
///
/// ```
/// use std::time::{Duration, Instant};
/// use rmc_kernel::watchdog::{LinkHealth, LinkWatchdog};
///
/// let start = Instant::now();
/// let mut wd = LinkWatchdog::new(Duration::from_millis(500));
/// wd.feed_at(start);
///
/// assert!(!wd.poll_at(start + Duration::from_millis(100)));
/// assert!(wd.poll_at(start + Duration::from_secs(1)));
/// // Already reported; stays quiet until the link comes back and drops again.
/// assert!(!wd.poll_at(start + Duration::from_secs(2)));
/// assert_eq!(wd.health_at(start + Duration::from_secs(2)), LinkHealth::Lost);
/// ```
#[derive(Debug, Clone)]
pub struct LinkWatchdog {
    timeout: Duration,
    last_contact: Option<Instant>,
    tripped: bool,
}

impl LinkWatchdog {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            last_contact: None,
            tripped: false,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Record operator contact now.
    pub fn feed(&mut self) -> bool {
        self.feed_at(Instant::now())
    }

    /// Record operator contact at `now`.  Returns `true` when this contact
    /// ends a previously reported loss.
    pub fn feed_at(&mut self, now: Instant) -> bool {
        self.last_contact = Some(now);
        std::mem::replace(&mut self.tripped, false)
    }

    pub fn poll(&mut self) -> bool {
        self.poll_at(Instant::now())
    }

    /// Returns `true` the first time the link is seen lost since the last
    /// contact.
    pub fn poll_at(&mut self, now: Instant) -> bool {
        if self.tripped || self.health_at(now) != LinkHealth::Lost {
            return false;
        }
        self.tripped = true;
        true
    }

    pub fn health_at(&self, now: Instant) -> LinkHealth {
        match self.last_contact {
            None => LinkHealth::Disarmed,
            Some(last) if now.saturating_duration_since(last) > self.timeout => LinkHealth::Lost,
            Some(_) => LinkHealth::Connected,
        }
    }
}
