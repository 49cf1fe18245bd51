// ── Failure classification ──

use serde::{Deserialize, Serialize};
use strum::{Display, EnumCount, EnumIter};

/// Why a connection attempt to a BSSID failed.
///
/// A closed enumeration with stable discriminants — the variant order is
/// part of the diagnostic surface and must not be reordered. Display and
/// serde names are the snake_case variant names, which double as the
/// per-reason keys in configuration files.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumCount,
    EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
#[repr(usize)]
pub enum FailureReason {
    /// The AP refused the association because it cannot serve more stations.
    ApUnableToHandleNewSta,
    /// L3 connectivity came up but internet validation failed.
    NetworkValidationFailure,
    WrongPassword,
    EapFailure,
    AssociationRejection,
    AssociationTimeout,
    AuthenticationFailure,
    DhcpFailure,
    /// Disconnect shortly after connecting, with no framework-initiated cause.
    AbnormalDisconnect,
    /// Framework-initiated disconnect on MBO/OCE AP recommendation.
    FrameworkDisconnectMboOce,
    /// Framework tore the link down to immediately reconnect elsewhere.
    FrameworkDisconnectFastReconnect,
    /// Framework disconnected because the connected score dropped too low.
    FrameworkDisconnectConnectedScore,
}

impl FailureReason {
    /// Stable index, usable for per-reason tables.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Reasons strongly correlated with a weak signal at block time.
    /// Only these are eligible for opportunistic RSSI-based re-enablement.
    pub fn is_low_rssi_sensitive(self) -> bool {
        matches!(self, Self::AssociationTimeout | Self::AbnormalDisconnect)
    }

    /// Reasons that may be caused by client-side rather than AP-side
    /// faults. Blocking for these defers to the last-resort watchdog.
    pub fn is_watchdog_gated(self) -> bool {
        matches!(
            self,
            Self::AssociationRejection | Self::AuthenticationFailure | Self::DhcpFailure
        )
    }

    /// L2 failure classes proven irrelevant by a successful connection:
    /// their counters and streaks reset unconditionally on connect.
    pub fn resets_on_connection_success(self) -> bool {
        matches!(
            self,
            Self::ApUnableToHandleNewSta
                | Self::WrongPassword
                | Self::EapFailure
                | Self::AssociationRejection
                | Self::AssociationTimeout
                | Self::AuthenticationFailure
        )
    }
}
