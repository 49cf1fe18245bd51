// ── Per-BSSID tracking state ──
//
// One BssidStatus exists per observed BSSID. The block state lives in an
// Option so that "in the blocklist" always implies a valid reason and a
// valid time range — the invariant holds by construction.

use std::fmt;

use strum::{EnumCount, IntoEnumIterator};

use super::identity::{Bssid, Ssid};
use super::reason::FailureReason;

/// Non-negative failure counters, one per reason.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FailureCounts([u32; FailureReason::COUNT]);

impl FailureCounts {
    pub fn get(&self, reason: FailureReason) -> u32 {
        self.0[reason.index()]
    }

    /// Increment and return the new count.
    pub fn increment(&mut self, reason: FailureReason) -> u32 {
        let slot = &mut self.0[reason.index()];
        *slot = slot.saturating_add(1);
        *slot
    }

    pub fn reset(&mut self, reason: FailureReason) {
        self.0[reason.index()] = 0;
    }
}

/// Active block details. Present iff the BSSID is in the blocklist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockState {
    reason: FailureReason,
    /// RSSI observed on the failure that triggered the block.
    rssi_dbm: i32,
    start_ms: i64,
    end_ms: i64,
}

impl BlockState {
    pub fn reason(&self) -> FailureReason {
        self.reason
    }

    pub fn rssi_dbm(&self) -> i32 {
        self.rssi_dbm
    }

    pub fn start_ms(&self) -> i64 {
        self.start_ms
    }

    pub fn end_ms(&self) -> i64 {
        self.end_ms
    }

    /// Time left before the block expires. Negative once expired.
    pub fn remaining_ms(&self, now_ms: i64) -> i64 {
        self.end_ms - now_ms
    }
}

/// Tracking state for a single BSSID.
///
/// Identity fields are immutable: when a BSSID is observed under a new
/// SSID, the store replaces the whole status (counters reset) rather
/// than mutating this one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BssidStatus {
    bssid: Bssid,
    ssid: Ssid,
    counts: FailureCounts,
    block: Option<BlockState>,
}

impl BssidStatus {
    pub fn new(bssid: Bssid, ssid: Ssid) -> Self {
        Self {
            bssid,
            ssid,
            counts: FailureCounts::default(),
            block: None,
        }
    }

    pub fn bssid(&self) -> &Bssid {
        &self.bssid
    }

    pub fn ssid(&self) -> &Ssid {
        &self.ssid
    }

    pub fn failure_count(&self, reason: FailureReason) -> u32 {
        self.counts.get(reason)
    }

    pub fn increment_failure_count(&mut self, reason: FailureReason) -> u32 {
        self.counts.increment(reason)
    }

    pub fn reset_failure_count(&mut self, reason: FailureReason) {
        self.counts.reset(reason);
    }

    pub fn is_blocked(&self) -> bool {
        self.block.is_some()
    }

    pub fn block(&self) -> Option<&BlockState> {
        self.block.as_ref()
    }

    /// Put (or re-put) this BSSID in the blocklist. Re-blocking an
    /// already blocked entry overwrites reason, RSSI, and time range.
    pub fn set_blocked(&mut self, reason: FailureReason, rssi_dbm: i32, start_ms: i64, end_ms: i64) {
        debug_assert!(end_ms > start_ms);
        self.block = Some(BlockState {
            reason,
            rssi_dbm,
            start_ms,
            end_ms,
        });
    }
}

impl fmt::Display for BssidStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ssid={}", self.bssid, self.ssid)?;
        match &self.block {
            Some(block) => write!(
                f,
                " blocked reason={} rssi={}dBm window=[{}..{}]",
                block.reason, block.rssi_dbm, block.start_ms, block.end_ms
            )?,
            None => write!(f, " not blocked")?,
        }
        let mut sep = " counts={";
        for reason in FailureReason::iter() {
            let count = self.counts.get(reason);
            if count > 0 {
                write!(f, "{sep}{reason}={count}")?;
                sep = ", ";
            }
        }
        if sep == ", " {
            write!(f, "}}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn status() -> BssidStatus {
        BssidStatus::new(
            Bssid::parse("aa:bb:cc:dd:ee:ff").unwrap(),
            Ssid::parse("home").unwrap(),
        )
    }

    #[test]
    fn counts_start_at_zero_and_increment() {
        let mut st = status();
        assert_eq!(st.failure_count(FailureReason::DhcpFailure), 0);
        assert_eq!(st.increment_failure_count(FailureReason::DhcpFailure), 1);
        assert_eq!(st.increment_failure_count(FailureReason::DhcpFailure), 2);
        assert_eq!(st.failure_count(FailureReason::EapFailure), 0);

        st.reset_failure_count(FailureReason::DhcpFailure);
        assert_eq!(st.failure_count(FailureReason::DhcpFailure), 0);
    }

    #[test]
    fn block_state_carries_reason_and_window() {
        let mut st = status();
        assert!(!st.is_blocked());

        st.set_blocked(FailureReason::DhcpFailure, -70, 1_000, 31_000);
        let block = st.block().unwrap();
        assert_eq!(block.reason(), FailureReason::DhcpFailure);
        assert_eq!(block.rssi_dbm(), -70);
        assert_eq!(block.remaining_ms(21_000), 10_000);
        assert_eq!(block.remaining_ms(40_000), -9_000);
    }

    #[test]
    fn reblocking_overwrites_block_state() {
        let mut st = status();
        st.set_blocked(FailureReason::DhcpFailure, -70, 1_000, 31_000);
        st.set_blocked(FailureReason::AssociationTimeout, -82, 2_000, 62_000);

        let block = st.block().unwrap();
        assert_eq!(block.reason(), FailureReason::AssociationTimeout);
        assert_eq!(block.end_ms(), 62_000);
    }

    #[test]
    fn display_mentions_block_and_nonzero_counts() {
        let mut st = status();
        st.increment_failure_count(FailureReason::DhcpFailure);
        st.set_blocked(FailureReason::DhcpFailure, -70, 0, 30_000);

        let text = st.to_string();
        assert!(text.contains("aa:bb:cc:dd:ee:ff"));
        assert!(text.contains("reason=dhcp_failure"));
        assert!(text.contains("dhcp_failure=1"));
    }
}
