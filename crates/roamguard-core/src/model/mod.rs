// ── Domain model ──

pub mod identity;
pub mod reason;
pub mod scan;
pub mod status;

pub use identity::{Bssid, Ssid};
pub use reason::FailureReason;
pub use scan::ScanObservation;
pub use status::{BlockState, BssidStatus, FailureCounts};
