// ── Core error types ──
//
// Only construction-time validation can fail with an error. The event
// handlers sit on a hot failure path and never propagate errors --
// invalid inputs are rejected by returning a failure indicator plus a
// diagnostic log line.

use thiserror::Error;

use crate::model::FailureReason;

/// Rejected `BlocklistConfig` values, surfaced when a monitor is built.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigValidationError {
    #[error("{reason}: blocking threshold must be at least 1")]
    ZeroThreshold { reason: FailureReason },

    #[error("{reason}: base block duration must be positive, got {value_ms}ms")]
    NonPositiveBaseDuration {
        reason: FailureReason,
        value_ms: i64,
    },

    #[error("abnormal-disconnect window must be positive, got {0}ms")]
    NonPositiveDisconnectWindow(i64),

    #[error("minimum RSSI improvement must be positive, got {0}dBm")]
    NonPositiveRssiImprovement(i32),

    #[error("history capacity must be at least 1")]
    ZeroHistoryCapacity,
}
