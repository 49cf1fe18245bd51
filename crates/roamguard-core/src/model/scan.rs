// ── Scan observation ──

use super::identity::Bssid;

/// The slice of a scan result the re-enabler cares about.
///
/// Built by the scan pipeline; this crate never collects scans itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanObservation {
    pub bssid: Bssid,
    pub rssi_dbm: i32,
    pub frequency_mhz: u32,
}
