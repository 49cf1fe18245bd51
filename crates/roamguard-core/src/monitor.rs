// ── Blocklist monitor ──
//
// The facade the rest of the Wi-Fi stack talks to. Connection, validation
// and DHCP events come in; roaming and network selection read the swept
// blocklist out. Single-writer by design: every mutating operation takes
// `&mut self`, nothing locks, nothing blocks, and expiry is evaluated
// lazily on read instead of by timers. The firmware push is issued only
// after the in-memory state is committed and its outcome is never
// awaited — software state stays authoritative.

use std::fmt::Write as _;

use indexmap::IndexSet;
use strum::IntoEnumIterator;
use tracing::{debug, info, warn};

use crate::backoff;
use crate::config::BlocklistConfig;
use crate::error::ConfigValidationError;
use crate::history::BlocklistHistory;
use crate::model::{BlockState, Bssid, BssidStatus, FailureReason, ScanObservation, Ssid};
use crate::radio::RoamingRadio;
use crate::scoring::SignalScoring;
use crate::store::BlocklistStore;
use crate::streak::StreakStore;
use crate::time::Clock;
use crate::watchdog::WatchdogGate;

/// Failure-tracking and blocklist engine for one Wi-Fi stack instance.
///
/// Collaborators are injected so hosts wire in their radio, watchdog,
/// scoring and persistence layers, and tests substitute fakes.
pub struct BlocklistMonitor {
    config: BlocklistConfig,
    store: BlocklistStore,
    history: BlocklistHistory,
    clock: Box<dyn Clock>,
    streaks: Box<dyn StreakStore>,
    watchdog: Box<dyn WatchdogGate>,
    radio: Box<dyn RoamingRadio>,
    scoring: Box<dyn SignalScoring>,
}

impl BlocklistMonitor {
    /// Build a monitor. Fails only on invalid configuration — nothing on
    /// the event path can fail after this.
    pub fn new(
        config: BlocklistConfig,
        clock: Box<dyn Clock>,
        streaks: Box<dyn StreakStore>,
        watchdog: Box<dyn WatchdogGate>,
        radio: Box<dyn RoamingRadio>,
        scoring: Box<dyn SignalScoring>,
    ) -> Result<Self, ConfigValidationError> {
        config.validate()?;
        let history = BlocklistHistory::new(config.history_capacity);
        Ok(Self {
            store: BlocklistStore::new(),
            history,
            config,
            clock,
            streaks,
            watchdog,
            radio,
            scoring,
        })
    }

    // ── Event handlers ───────────────────────────────────────────────

    /// Record a connection failure for `bssid` and decide whether it
    /// crosses into the blocklist. Returns `true` iff the blocklist
    /// state changed.
    ///
    /// A BSSID with a prior escalation streak is re-blocked on its first
    /// repeat failure of the same reason, without waiting for the
    /// in-memory count to reach the threshold again.
    pub fn handle_bssid_connection_failure(
        &mut self,
        bssid: &str,
        ssid: &str,
        reason: FailureReason,
        rssi_dbm: i32,
    ) -> bool {
        let Some((bssid, ssid)) = self.validate_identity(bssid, ssid) else {
            return false;
        };
        let now_ms = self.clock.now_ms();

        // Abnormal disconnects only count against the AP when they hit
        // a just-established session.
        if reason == FailureReason::AbnormalDisconnect {
            let in_window = self
                .streaks
                .last_connection_ms(&ssid, &bssid)
                .is_some_and(|last| now_ms - last <= self.config.abnormal_disconnect_window_ms);
            if !in_window {
                debug!(%bssid, %ssid, "abnormal disconnect outside post-connection window, ignoring");
                return false;
            }
        }

        let count = self
            .store
            .get_or_create(&bssid, &ssid)
            .increment_failure_count(reason);
        let streak = self.streaks.streak(&ssid, &bssid, reason);
        let params = self.config.reasons.get(reason);

        if streak == 0 && count < params.threshold {
            return false;
        }

        if reason.is_watchdog_gated() && self.watchdog.should_defer_blocking(&bssid, reason) {
            debug!(%bssid, %reason, "watchdog deferred blocking");
            return false;
        }

        let duration_ms = backoff::block_duration_ms(
            params.base_duration_ms,
            streak,
            self.config.backoff_exponent_cap,
        );
        self.store.get_or_create(&bssid, &ssid).set_blocked(
            reason,
            rssi_dbm,
            now_ms,
            now_ms.saturating_add(duration_ms),
        );
        let streak = self.streaks.increment_streak(&ssid, &bssid, reason);
        info!(%bssid, %ssid, %reason, count, streak, duration_ms, "blocked bssid");
        true
    }

    /// A connection to `bssid` succeeded. Clears the L2 failure classes
    /// this disproves and records the connection timestamp. Does not
    /// lift an existing block — connecting does not prove the AP healthy
    /// for every failure class.
    pub fn handle_bssid_connection_success(&mut self, bssid: &str, ssid: &str) {
        let Some((bssid, ssid)) = self.validate_identity(bssid, ssid) else {
            return;
        };
        let now_ms = self.clock.now_ms();

        for reason in FailureReason::iter().filter(|r| r.resets_on_connection_success()) {
            self.reset_failure_tracking(&bssid, &ssid, reason);
        }

        // Post-connection failure classes only mean something shortly
        // after connecting; across a long gap their state is stale.
        let stale = self
            .streaks
            .last_connection_ms(&ssid, &bssid)
            .is_none_or(|prev| now_ms - prev > self.config.abnormal_disconnect_window_ms);
        if stale {
            self.reset_failure_tracking(&bssid, &ssid, FailureReason::AbnormalDisconnect);
            self.reset_failure_tracking(
                &bssid,
                &ssid,
                FailureReason::FrameworkDisconnectConnectedScore,
            );
        }

        self.streaks.set_last_connection_ms(&ssid, &bssid, now_ms);
    }

    /// Internet validation succeeded on `bssid`. Drops the whole
    /// tracking entry: validation may legitimately take several retries,
    /// so a block set mid-retry must be cleared once it finally passes.
    pub fn handle_network_validation_success(&mut self, bssid: &str, ssid: &str) {
        let Some((bssid, ssid)) = self.validate_identity(bssid, ssid) else {
            return;
        };
        self.streaks
            .reset_streak(&ssid, &bssid, FailureReason::NetworkValidationFailure);

        let Some(status) = self.store.remove(&bssid) else {
            return;
        };
        if status.is_blocked() {
            info!(%bssid, "removing blocked bssid after network validation success");
        }
        let now_ms = self.clock.now_ms();
        self.history
            .add(&status, "network validation success", now_ms);
    }

    /// DHCP provisioning succeeded on `bssid`. Clears DHCP failure
    /// tracking only; a block set for another reason stands.
    pub fn handle_dhcp_provisioning_success(&mut self, bssid: &str, ssid: &str) {
        let Some((bssid, ssid)) = self.validate_identity(bssid, ssid) else {
            return;
        };
        self.reset_failure_tracking(&bssid, &ssid, FailureReason::DhcpFailure);
    }

    /// The network configuration for `ssid` was removed. Drops every
    /// tracked BSSID of that SSID and their persisted streaks.
    pub fn handle_network_removed(&mut self, ssid: &str) {
        let Some(parsed) = Ssid::parse(ssid) else {
            warn!(ssid, "ignoring network-removed event with invalid ssid");
            return;
        };
        self.clear_tracking_for_ssid(&parsed, "network removed");
        self.streaks.reset_all_for_ssid(&parsed);
    }

    /// Block `bssid` for exactly `duration_ms`, bypassing failure
    /// counting. Never shortens a block that already runs longer than
    /// requested. Returns `true` iff the blocklist state changed.
    pub fn block_bssid_for_duration(
        &mut self,
        bssid: &str,
        ssid: &str,
        duration_ms: i64,
        reason: FailureReason,
        rssi_dbm: i32,
    ) -> bool {
        let Some((bssid, ssid)) = self.validate_identity(bssid, ssid) else {
            return false;
        };
        if duration_ms <= 0 {
            warn!(%bssid, duration_ms, "rejecting block request with non-positive duration");
            return false;
        }
        let now_ms = self.clock.now_ms();
        let requested_end_ms = now_ms.saturating_add(duration_ms);

        if let Some(block) = self.store.get(&bssid).and_then(BssidStatus::block) {
            if block.end_ms() >= requested_end_ms {
                debug!(%bssid, "already blocked past the requested expiry, keeping existing block");
                return false;
            }
        }

        self.store
            .get_or_create(&bssid, &ssid)
            .set_blocked(reason, rssi_dbm, now_ms, requested_end_ms);
        info!(%bssid, %ssid, %reason, duration_ms, "blocked bssid on request");
        true
    }

    // ── Blocklist queries (sweeping) ─────────────────────────────────

    /// Evict expired blocks, then return every BSSID still blocked.
    pub fn update_and_get_bssid_blocklist(&mut self) -> IndexSet<Bssid> {
        self.sweep();
        self.store
            .blocked()
            .map(|status| status.bssid().clone())
            .collect()
    }

    /// Evict expired blocks, then return the blocked BSSIDs of `ssid`.
    pub fn update_and_get_bssid_blocklist_for_ssid(&mut self, ssid: &str) -> IndexSet<Bssid> {
        let Some(parsed) = Ssid::parse(ssid) else {
            warn!(ssid, "ignoring blocklist query with invalid ssid");
            return IndexSet::new();
        };
        self.sweep();
        self.store
            .blocked_for_ssid(&parsed)
            .map(|status| status.bssid().clone())
            .collect()
    }

    /// Evict expired blocks, then return the distinct reasons for which
    /// BSSIDs of `ssid` are currently blocked.
    pub fn get_failure_reasons_for_ssid(&mut self, ssid: &str) -> IndexSet<FailureReason> {
        let Some(parsed) = Ssid::parse(ssid) else {
            warn!(ssid, "ignoring failure-reason query with invalid ssid");
            return IndexSet::new();
        };
        self.sweep();
        self.store
            .blocked_for_ssid(&parsed)
            .filter_map(|status| status.block().map(BlockState::reason))
            .collect()
    }

    /// Evict expired blocks, then count the blocked BSSIDs of `ssid`.
    pub fn num_blocked_bssids_for_ssid(&mut self, ssid: &str) -> usize {
        self.update_and_get_bssid_blocklist_for_ssid(ssid).len()
    }

    /// Raw tracking state for one BSSID. No sweep: an expired block
    /// remains visible here until the next blocklist query runs.
    pub fn bssid_status(&self, bssid: &str) -> Option<&BssidStatus> {
        let parsed = Bssid::parse(bssid)?;
        self.store.get(&parsed)
    }

    // ── Opportunistic re-enablement ──────────────────────────────────

    /// Lift blocks whose cause was plausibly just a weak signal, now
    /// that scan results show the signal materially recovered. Only
    /// low-RSSI-sensitive block reasons are eligible; the improvement
    /// must clear the sufficient-RSSI bar and a minimum delta, so
    /// marginal fluctuation does not churn the list. Returns the
    /// re-enabled BSSIDs.
    pub fn try_enabling_blocked_bssids(&mut self, scans: &[ScanObservation]) -> Vec<Bssid> {
        let now_ms = self.clock.now_ms();
        let mut enabled = Vec::new();

        for scan in scans {
            let Some((reason, blocked_rssi)) = self
                .store
                .get(&scan.bssid)
                .and_then(BssidStatus::block)
                .map(|block| (block.reason(), block.rssi_dbm()))
            else {
                continue;
            };
            if !reason.is_low_rssi_sensitive() {
                continue;
            }

            let sufficient = self.scoring.sufficient_rssi_dbm(scan.frequency_mhz);
            let crossed_bar = blocked_rssi < sufficient && scan.rssi_dbm >= sufficient;
            let improvement = scan.rssi_dbm.saturating_sub(blocked_rssi);
            if !crossed_bar || improvement < self.config.min_rssi_improvement_dbm {
                continue;
            }

            if let Some(status) = self.store.remove(&scan.bssid) {
                info!(bssid = %scan.bssid, blocked_rssi, observed_rssi = scan.rssi_dbm,
                    "re-enabling bssid after rssi improvement");
                self.history.add(&status, "rssi significantly improved", now_ms);
                enabled.push(scan.bssid.clone());
            }
        }
        enabled
    }

    // ── Clearing ─────────────────────────────────────────────────────

    /// Drop every tracked BSSID. Persisted streaks are untouched.
    pub fn clear_bssid_blocklist(&mut self) {
        let removed = self.store.drain_all();
        if removed.is_empty() {
            return;
        }
        let now_ms = self.clock.now_ms();
        for status in &removed {
            self.history.add(status, "blocklist cleared", now_ms);
        }
        debug!(removed = removed.len(), "cleared all bssid tracking state");
    }

    /// Drop every tracked BSSID of `ssid`, leaving other networks alone.
    pub fn clear_bssid_blocklist_for_ssid(&mut self, ssid: &str) {
        let Some(parsed) = Ssid::parse(ssid) else {
            warn!(ssid, "ignoring blocklist clear with invalid ssid");
            return;
        };
        self.clear_tracking_for_ssid(&parsed, "blocklist cleared for ssid");
    }

    // ── Firmware sync ────────────────────────────────────────────────

    /// Push the swept blocklist for `ssid` down to the radio firmware,
    /// if supported. When the list exceeds firmware capacity the
    /// longest-remaining blocks win. Push failures are logged and
    /// swallowed; the in-memory blocklist is the source of truth either
    /// way.
    pub fn update_firmware_roaming_configuration(&mut self, ssid: &str) {
        let Some(parsed) = Ssid::parse(ssid) else {
            warn!(ssid, "ignoring firmware sync request with invalid ssid");
            return;
        };
        if !self.radio.supports_firmware_blocklist() {
            debug!("firmware roaming blocklist unsupported, skipping push");
            return;
        }

        let now_ms = self.sweep();
        let mut blocked: Vec<(Bssid, i64)> = self
            .store
            .blocked_for_ssid(&parsed)
            .filter_map(|status| {
                status
                    .block()
                    .map(|block| (status.bssid().clone(), block.remaining_ms(now_ms)))
            })
            .collect();

        // Longest-remaining blocks matter most when capacity is tight.
        blocked.sort_by(|a, b| b.1.cmp(&a.1));
        let capacity = self.radio.max_blocklist_size();
        if blocked.len() > capacity {
            debug!(dropped = blocked.len() - capacity, "truncating firmware blocklist to capacity");
            blocked.truncate(capacity);
        }

        let bssids: Vec<Bssid> = blocked.into_iter().map(|(bssid, _)| bssid).collect();
        if self.radio.push_blocklist(&bssids) {
            debug!(ssid = %parsed, count = bssids.len(), "pushed roaming blocklist to firmware");
        } else {
            warn!(ssid = %parsed, count = bssids.len(), "firmware rejected roaming blocklist push");
        }
    }

    // ── Diagnostics ──────────────────────────────────────────────────

    /// Free-text diagnostic snapshot: raw per-BSSID state (no sweep)
    /// followed by the transition history. Not a stable format.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "BlocklistMonitor: {} tracked bssid(s)", self.store.len());
        for status in self.store.iter() {
            let _ = writeln!(out, "  {status}");
        }
        let _ = writeln!(
            out,
            "history ({} of last {} transitions):",
            self.history.len(),
            self.config.history_capacity
        );
        for line in self.history.iter() {
            let _ = writeln!(out, "  {line}");
        }
        out
    }

    // ── Private helpers ──────────────────────────────────────────────

    /// Parse and sanity-check event identity. Hot-path validation never
    /// errors out; bad input costs a log line and a `None`.
    fn validate_identity(&self, bssid: &str, ssid: &str) -> Option<(Bssid, Ssid)> {
        let Some(parsed_bssid) = Bssid::parse(bssid) else {
            warn!(bssid, "ignoring event with malformed bssid");
            return None;
        };
        if parsed_bssid.is_wildcard() {
            warn!(bssid, "ignoring event with wildcard bssid");
            return None;
        }
        let Some(parsed_ssid) = Ssid::parse(ssid) else {
            warn!(ssid, "ignoring event with invalid ssid");
            return None;
        };
        Some((parsed_bssid, parsed_ssid))
    }

    /// Evict expired blocks into the history. Returns the sweep time.
    fn sweep(&mut self) -> i64 {
        let now_ms = self.clock.now_ms();
        for status in self.store.evict_expired(now_ms) {
            debug!(bssid = %status.bssid(), "block expired");
            self.history.add(&status, "block timed out", now_ms);
        }
        now_ms
    }

    fn reset_failure_tracking(&mut self, bssid: &Bssid, ssid: &Ssid, reason: FailureReason) {
        self.streaks.reset_streak(ssid, bssid, reason);
        if let Some(status) = self.store.get_mut(bssid) {
            status.reset_failure_count(reason);
        }
    }

    fn clear_tracking_for_ssid(&mut self, ssid: &Ssid, trigger: &str) {
        let removed = self.store.remove_for_ssid(ssid);
        if removed.is_empty() {
            return;
        }
        let now_ms = self.clock.now_ms();
        for status in &removed {
            self.history.add(status, trigger, now_ms);
        }
        debug!(%ssid, removed = removed.len(), "cleared bssid tracking state for ssid");
    }
}
