// ── Firmware roaming interface ──

use crate::model::Bssid;

/// Capability and push surface of the radio's firmware-level roaming
/// blocklist.
///
/// `push_blocklist` is best-effort and expected not to block: the engine
/// issues it after the in-memory state is committed, never awaits or
/// retries it, and stays authoritative whatever it returns.
pub trait RoamingRadio {
    fn supports_firmware_blocklist(&self) -> bool;

    /// Most BSSIDs the firmware will hold.
    fn max_blocklist_size(&self) -> usize;

    /// Replace the firmware blocklist. Returns whether the radio
    /// accepted the update.
    fn push_blocklist(&self, bssids: &[Bssid]) -> bool;
}

/// Radio without firmware blocklist support; pushes are never attempted.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFirmwareRoaming;

impl RoamingRadio for NoFirmwareRoaming {
    fn supports_firmware_blocklist(&self) -> bool {
        false
    }

    fn max_blocklist_size(&self) -> usize {
        0
    }

    fn push_blocklist(&self, _bssids: &[Bssid]) -> bool {
        false
    }
}
