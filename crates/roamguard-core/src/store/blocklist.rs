// ── BSSID status map with lazy eviction ──
//
// One entry per observed BSSID. Expired blocks are evicted only when a
// sweep runs — there is no timer. Until then an expired entry still
// reports itself blocked in raw state; callers that need current truth
// go through the monitor's update_and_get sweep.

use indexmap::IndexMap;
use tracing::debug;

use crate::model::{Bssid, BssidStatus, Ssid};

/// Map of BSSID → tracking status, insertion-ordered for deterministic
/// dump and firmware-list construction.
#[derive(Debug, Default)]
pub struct BlocklistStore {
    entries: IndexMap<Bssid, BssidStatus>,
}

impl BlocklistStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, bssid: &Bssid) -> Option<&BssidStatus> {
        self.entries.get(bssid)
    }

    pub fn get_mut(&mut self, bssid: &Bssid) -> Option<&mut BssidStatus> {
        self.entries.get_mut(bssid)
    }

    /// Fetch the status for `bssid`, creating it on first sight.
    ///
    /// Identity is immutable: if the BSSID now reports a different SSID,
    /// the old status is replaced outright and its counters are gone.
    pub fn get_or_create(&mut self, bssid: &Bssid, ssid: &Ssid) -> &mut BssidStatus {
        match self.entries.entry(bssid.clone()) {
            indexmap::map::Entry::Occupied(mut entry) => {
                if entry.get().ssid() != ssid {
                    debug!(%bssid, old_ssid = %entry.get().ssid(), new_ssid = %ssid,
                        "bssid moved networks, resetting status");
                    entry.insert(BssidStatus::new(bssid.clone(), ssid.clone()));
                }
                entry.into_mut()
            }
            indexmap::map::Entry::Vacant(entry) => {
                entry.insert(BssidStatus::new(bssid.clone(), ssid.clone()))
            }
        }
    }

    pub fn remove(&mut self, bssid: &Bssid) -> Option<BssidStatus> {
        self.entries.shift_remove(bssid)
    }

    /// Remove every blocked entry whose TTL has passed, returning the
    /// evicted statuses for history logging.
    pub fn evict_expired(&mut self, now_ms: i64) -> Vec<BssidStatus> {
        let expired: Vec<Bssid> = self
            .entries
            .values()
            .filter(|status| {
                status
                    .block()
                    .is_some_and(|block| block.end_ms() < now_ms)
            })
            .map(|status| status.bssid().clone())
            .collect();

        expired
            .iter()
            .filter_map(|bssid| self.entries.shift_remove(bssid))
            .collect()
    }

    /// Remove every entry for `ssid`, blocked or not.
    pub fn remove_for_ssid(&mut self, ssid: &Ssid) -> Vec<BssidStatus> {
        let matching: Vec<Bssid> = self
            .entries
            .values()
            .filter(|status| status.ssid() == ssid)
            .map(|status| status.bssid().clone())
            .collect();

        matching
            .iter()
            .filter_map(|bssid| self.entries.shift_remove(bssid))
            .collect()
    }

    /// Remove everything.
    pub fn drain_all(&mut self) -> Vec<BssidStatus> {
        self.entries.drain(..).map(|(_, status)| status).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &BssidStatus> {
        self.entries.values()
    }

    /// Currently blocked entries, in insertion order.
    pub fn blocked(&self) -> impl Iterator<Item = &BssidStatus> {
        self.entries.values().filter(|status| status.is_blocked())
    }

    /// Currently blocked entries for one SSID.
    pub fn blocked_for_ssid<'a>(
        &'a self,
        ssid: &'a Ssid,
    ) -> impl Iterator<Item = &'a BssidStatus> {
        self.blocked().filter(move |status| status.ssid() == ssid)
    }
}
