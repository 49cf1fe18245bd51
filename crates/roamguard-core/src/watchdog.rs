// ── Last-resort watchdog gate ──

use crate::model::{Bssid, FailureReason};

/// Veto point consulted before blocking for reasons that may be caused
/// by client-side rather than AP-side faults. Returning `true` defers
/// the block for this event; counters still advance.
pub trait WatchdogGate {
    fn should_defer_blocking(&self, bssid: &Bssid, reason: FailureReason) -> bool;
}

/// Gate that never defers. For hosts without a watchdog.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoWatchdog;

impl WatchdogGate for NoWatchdog {
    fn should_defer_blocking(&self, _bssid: &Bssid, _reason: FailureReason) -> bool {
        false
    }
}
