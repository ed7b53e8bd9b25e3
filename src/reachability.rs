//! Live network-reachability tracking.
//!
//! The platform's network-status facility is consumed at its interface: an
//! asynchronous stream of status-change notifications. One monitor task
//! replaces the process-wide status on each notification (single writer,
//! last write wins); any task may read the latest status or the derived
//! "is usable" predicate. The monitor runs for the process lifetime and
//! starting it twice registers no second subscription.

use futures::{Stream, StreamExt};
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use tracing::{debug, info};

/// Last known network path status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReachabilityStatus {
    /// No notification received yet
    Unknown,
    /// No usable network path
    Unreachable,
    /// Reachable over a cellular connection
    Cellular,
    /// Reachable over a local (Wi-Fi / ethernet) network
    LocalNetwork,
}

impl ReachabilityStatus {
    /// True for the two reachable variants
    pub fn is_usable(self) -> bool {
        matches!(
            self,
            ReachabilityStatus::Cellular | ReachabilityStatus::LocalNetwork
        )
    }

    fn as_u8(self) -> u8 {
        match self {
            ReachabilityStatus::Unknown => 0,
            ReachabilityStatus::Unreachable => 1,
            ReachabilityStatus::Cellular => 2,
            ReachabilityStatus::LocalNetwork => 3,
        }
    }

    fn from_u8(value: u8) -> Self {
        match value {
            1 => ReachabilityStatus::Unreachable,
            2 => ReachabilityStatus::Cellular,
            3 => ReachabilityStatus::LocalNetwork,
            _ => ReachabilityStatus::Unknown,
        }
    }
}

static CURRENT_STATUS: AtomicU8 = AtomicU8::new(0);
static MONITOR_STARTED: AtomicBool = AtomicBool::new(false);

/// Process-wide reachability monitor.
pub struct ReachabilityMonitor;

impl ReachabilityMonitor {
    /// Starts consuming the platform's status-change notifications.
    ///
    /// Returns `true` if this call registered the subscription, `false` if
    /// the monitor was already running (idempotent start: the stream is
    /// dropped without being consumed).
    pub fn start<S>(notifications: S) -> bool
    where
        S: Stream<Item = ReachabilityStatus> + Send + 'static,
    {
        if MONITOR_STARTED
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            debug!("Reachability monitor already running, ignoring second start");
            return false;
        }

        info!("Starting reachability monitor");
        tokio::spawn(async move {
            futures::pin_mut!(notifications);
            while let Some(status) = notifications.next().await {
                debug!("Reachability changed: {status:?}");
                CURRENT_STATUS.store(status.as_u8(), Ordering::SeqCst);
            }
            debug!("Reachability notification stream ended");
        });
        true
    }

    /// Latest known status
    pub fn current() -> ReachabilityStatus {
        ReachabilityStatus::from_u8(CURRENT_STATUS.load(Ordering::SeqCst))
    }

    /// True when the last known status is one of the reachable variants
    pub fn is_usable() -> bool {
        Self::current().is_usable()
    }
}
