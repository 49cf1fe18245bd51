//! BSSID failure tracking and blocklist engine.
//!
//! This crate owns the decision logic a Wi-Fi connectivity stack uses to
//! temporarily avoid misbehaving access points during roaming and
//! network selection:
//!
//! - **[`BlocklistMonitor`]** — Central facade. Connection, validation
//!   and DHCP events flow in through the `handle_*` entry points;
//!   roaming code reads the blocklist back out through the
//!   `update_and_get_*` queries, which lazily evict expired blocks.
//!
//! - **Failure classification** ([`FailureReason`]) — Twelve failure
//!   classes with per-reason thresholds, watchdog gating for the classes
//!   that may be client-side faults, and a low-RSSI-sensitive subset
//!   eligible for opportunistic re-enablement from scan results.
//!
//! - **Escalation** — Block durations start at a per-reason base and
//!   double with every repeat offense ([`backoff`]), driven by streak
//!   counters that an injected [`StreakStore`] carries across sessions.
//!
//! - **Firmware sync** — Best-effort push of the per-SSID blocklist to
//!   the radio firmware ([`RoamingRadio`]), bounded by firmware
//!   capacity. The in-memory list stays authoritative.
//!
//! - **Diagnostics** — A bounded transition history and a free-text
//!   [`dump`](BlocklistMonitor::dump), never consulted for decisions.
//!
//! The engine is single-writer and synchronous: callers serialize
//! access, nothing inside locks or blocks, and no timers run — expiry is
//! evaluated on read. Collaborators ([`Clock`], [`StreakStore`],
//! [`WatchdogGate`], [`RoamingRadio`], [`SignalScoring`]) are injected
//! at construction so hosts and tests can substitute their own.

pub mod backoff;
pub mod config;
pub mod error;
pub mod history;
pub mod model;
pub mod monitor;
pub mod radio;
pub mod scoring;
pub mod store;
pub mod streak;
pub mod time;
pub mod watchdog;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{BlocklistConfig, ReasonParams, ReasonTable};
pub use error::ConfigValidationError;
pub use history::BlocklistHistory;
pub use model::{BlockState, Bssid, BssidStatus, FailureCounts, FailureReason, ScanObservation, Ssid};
pub use monitor::BlocklistMonitor;
pub use radio::{NoFirmwareRoaming, RoamingRadio};
pub use scoring::{BandScoring, SignalScoring};
pub use store::BlocklistStore;
pub use streak::{MemoryStreakStore, StreakStore};
pub use time::{Clock, SystemClock};
pub use watchdog::{NoWatchdog, WatchdogGate};
