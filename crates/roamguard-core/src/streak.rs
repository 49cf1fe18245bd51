// ── Escalation streak store ──
//
// Streaks outlive the in-memory blocklist: they persist the "how many
// times has this AP been blocked for this reason" escalation counter
// across sessions, plus the last successful-connection timestamp per
// (SSID, BSSID). The persistence format belongs to the implementor.

use std::collections::HashMap;

use crate::model::{Bssid, FailureReason, Ssid};

/// Cross-session store for per-(SSID, BSSID, reason) escalation streaks
/// and per-(SSID, BSSID) connection timestamps.
pub trait StreakStore {
    fn streak(&self, ssid: &Ssid, bssid: &Bssid, reason: FailureReason) -> u32;

    /// Bump the streak and return the new value.
    fn increment_streak(&mut self, ssid: &Ssid, bssid: &Bssid, reason: FailureReason) -> u32;

    fn reset_streak(&mut self, ssid: &Ssid, bssid: &Bssid, reason: FailureReason);

    /// Drop every streak and timestamp recorded under `ssid`.
    fn reset_all_for_ssid(&mut self, ssid: &Ssid);

    /// Timestamp of the last recorded successful connection, if any.
    fn last_connection_ms(&self, ssid: &Ssid, bssid: &Bssid) -> Option<i64>;

    fn set_last_connection_ms(&mut self, ssid: &Ssid, bssid: &Bssid, now_ms: i64);
}

/// Process-local streak store.
///
/// Carries nothing across restarts — suitable for hosts that accept
/// per-boot escalation, and for tests.
#[derive(Debug, Default)]
pub struct MemoryStreakStore {
    streaks: HashMap<(Ssid, Bssid, FailureReason), u32>,
    connections: HashMap<(Ssid, Bssid), i64>,
}

impl MemoryStreakStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StreakStore for MemoryStreakStore {
    fn streak(&self, ssid: &Ssid, bssid: &Bssid, reason: FailureReason) -> u32 {
        self.streaks
            .get(&(ssid.clone(), bssid.clone(), reason))
            .copied()
            .unwrap_or(0)
    }

    fn increment_streak(&mut self, ssid: &Ssid, bssid: &Bssid, reason: FailureReason) -> u32 {
        let slot = self
            .streaks
            .entry((ssid.clone(), bssid.clone(), reason))
            .or_insert(0);
        *slot = slot.saturating_add(1);
        *slot
    }

    fn reset_streak(&mut self, ssid: &Ssid, bssid: &Bssid, reason: FailureReason) {
        self.streaks.remove(&(ssid.clone(), bssid.clone(), reason));
    }

    fn reset_all_for_ssid(&mut self, ssid: &Ssid) {
        self.streaks.retain(|(s, _, _), _| s != ssid);
        self.connections.retain(|(s, _), _| s != ssid);
    }

    fn last_connection_ms(&self, ssid: &Ssid, bssid: &Bssid) -> Option<i64> {
        self.connections.get(&(ssid.clone(), bssid.clone())).copied()
    }

    fn set_last_connection_ms(&mut self, ssid: &Ssid, bssid: &Bssid, now_ms: i64) {
        self.connections.insert((ssid.clone(), bssid.clone()), now_ms);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn ids() -> (Ssid, Bssid) {
        (
            Ssid::parse("home").unwrap(),
            Bssid::parse("aa:bb:cc:dd:ee:ff").unwrap(),
        )
    }

    #[test]
    fn streaks_start_at_zero_and_escalate() {
        let (ssid, bssid) = ids();
        let mut store = MemoryStreakStore::new();

        assert_eq!(store.streak(&ssid, &bssid, FailureReason::DhcpFailure), 0);
        assert_eq!(store.increment_streak(&ssid, &bssid, FailureReason::DhcpFailure), 1);
        assert_eq!(store.increment_streak(&ssid, &bssid, FailureReason::DhcpFailure), 2);
        // Other reasons are independent.
        assert_eq!(store.streak(&ssid, &bssid, FailureReason::EapFailure), 0);

        store.reset_streak(&ssid, &bssid, FailureReason::DhcpFailure);
        assert_eq!(store.streak(&ssid, &bssid, FailureReason::DhcpFailure), 0);
    }

    #[test]
    fn reset_all_for_ssid_spares_other_networks() {
        let (home, bssid) = ids();
        let work = Ssid::parse("work").unwrap();
        let mut store = MemoryStreakStore::new();

        store.increment_streak(&home, &bssid, FailureReason::DhcpFailure);
        store.increment_streak(&work, &bssid, FailureReason::DhcpFailure);
        store.set_last_connection_ms(&home, &bssid, 1_000);

        store.reset_all_for_ssid(&home);
        assert_eq!(store.streak(&home, &bssid, FailureReason::DhcpFailure), 0);
        assert_eq!(store.last_connection_ms(&home, &bssid), None);
        assert_eq!(store.streak(&work, &bssid, FailureReason::DhcpFailure), 1);
    }

    #[test]
    fn connection_timestamp_round_trips() {
        let (ssid, bssid) = ids();
        let mut store = MemoryStreakStore::new();

        assert_eq!(store.last_connection_ms(&ssid, &bssid), None);
        store.set_last_connection_ms(&ssid, &bssid, 42_000);
        assert_eq!(store.last_connection_ms(&ssid, &bssid), Some(42_000));
    }
}
