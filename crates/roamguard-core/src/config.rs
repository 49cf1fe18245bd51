// ── Runtime blocklist configuration ──
//
// An immutable bundle of thresholds and durations, built once and handed
// to the monitor. Hosts construct it directly or load it through
// `roamguard-config` -- core never reads files.

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

use crate::error::ConfigValidationError;
use crate::model::FailureReason;

/// Blocking parameters for one failure reason.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReasonParams {
    /// Consecutive failures of this reason before the BSSID is blocked.
    pub threshold: u32,
    /// Block duration at streak 0; doubled per streak step thereafter.
    pub base_duration_ms: i64,
}

const FIVE_MINUTES_MS: i64 = 5 * 60 * 1000;

impl ReasonParams {
    const fn new(threshold: u32) -> Self {
        Self {
            threshold,
            base_duration_ms: FIVE_MINUTES_MS,
        }
    }
}

/// Per-reason blocking parameters, keyed by the reason's snake_case name
/// in configuration files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReasonTable {
    pub ap_unable_to_handle_new_sta: ReasonParams,
    pub network_validation_failure: ReasonParams,
    pub wrong_password: ReasonParams,
    pub eap_failure: ReasonParams,
    pub association_rejection: ReasonParams,
    pub association_timeout: ReasonParams,
    pub authentication_failure: ReasonParams,
    pub dhcp_failure: ReasonParams,
    pub abnormal_disconnect: ReasonParams,
    pub framework_disconnect_mbo_oce: ReasonParams,
    pub framework_disconnect_fast_reconnect: ReasonParams,
    pub framework_disconnect_connected_score: ReasonParams,
}

impl ReasonTable {
    pub fn get(&self, reason: FailureReason) -> ReasonParams {
        match reason {
            FailureReason::ApUnableToHandleNewSta => self.ap_unable_to_handle_new_sta,
            FailureReason::NetworkValidationFailure => self.network_validation_failure,
            FailureReason::WrongPassword => self.wrong_password,
            FailureReason::EapFailure => self.eap_failure,
            FailureReason::AssociationRejection => self.association_rejection,
            FailureReason::AssociationTimeout => self.association_timeout,
            FailureReason::AuthenticationFailure => self.authentication_failure,
            FailureReason::DhcpFailure => self.dhcp_failure,
            FailureReason::AbnormalDisconnect => self.abnormal_disconnect,
            FailureReason::FrameworkDisconnectMboOce => self.framework_disconnect_mbo_oce,
            FailureReason::FrameworkDisconnectFastReconnect => {
                self.framework_disconnect_fast_reconnect
            }
            FailureReason::FrameworkDisconnectConnectedScore => {
                self.framework_disconnect_connected_score
            }
        }
    }

    fn get_mut(&mut self, reason: FailureReason) -> &mut ReasonParams {
        match reason {
            FailureReason::ApUnableToHandleNewSta => &mut self.ap_unable_to_handle_new_sta,
            FailureReason::NetworkValidationFailure => &mut self.network_validation_failure,
            FailureReason::WrongPassword => &mut self.wrong_password,
            FailureReason::EapFailure => &mut self.eap_failure,
            FailureReason::AssociationRejection => &mut self.association_rejection,
            FailureReason::AssociationTimeout => &mut self.association_timeout,
            FailureReason::AuthenticationFailure => &mut self.authentication_failure,
            FailureReason::DhcpFailure => &mut self.dhcp_failure,
            FailureReason::AbnormalDisconnect => &mut self.abnormal_disconnect,
            FailureReason::FrameworkDisconnectMboOce => &mut self.framework_disconnect_mbo_oce,
            FailureReason::FrameworkDisconnectFastReconnect => {
                &mut self.framework_disconnect_fast_reconnect
            }
            FailureReason::FrameworkDisconnectConnectedScore => {
                &mut self.framework_disconnect_connected_score
            }
        }
    }
}

impl Default for ReasonTable {
    /// Platform defaults: single-strike for deterministic failures
    /// (wrong password, EAP, full AP, framework disconnects, failed
    /// validation), three strikes for the flaky ones.
    fn default() -> Self {
        Self {
            ap_unable_to_handle_new_sta: ReasonParams::new(1),
            network_validation_failure: ReasonParams::new(1),
            wrong_password: ReasonParams::new(1),
            eap_failure: ReasonParams::new(1),
            association_rejection: ReasonParams::new(3),
            association_timeout: ReasonParams::new(3),
            authentication_failure: ReasonParams::new(3),
            dhcp_failure: ReasonParams::new(3),
            abnormal_disconnect: ReasonParams::new(3),
            framework_disconnect_mbo_oce: ReasonParams::new(1),
            framework_disconnect_fast_reconnect: ReasonParams::new(1),
            framework_disconnect_connected_score: ReasonParams::new(1),
        }
    }
}

/// Full engine configuration. Immutable after construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlocklistConfig {
    /// Per-reason thresholds and base durations.
    pub reasons: ReasonTable,

    /// Exponential backoff flattens once the streak reaches this value.
    pub backoff_exponent_cap: u32,

    /// Abnormal disconnects are only counted within this long after the
    /// last successful connection.
    pub abnormal_disconnect_window_ms: i64,

    /// Minimum RSSI gain before a low-RSSI-sensitive block is lifted.
    /// Guards against churn from marginal signal fluctuation.
    pub min_rssi_improvement_dbm: i32,

    /// Ring-buffer capacity of the diagnostic history.
    pub history_capacity: usize,
}

impl Default for BlocklistConfig {
    fn default() -> Self {
        Self {
            reasons: ReasonTable::default(),
            backoff_exponent_cap: 7,
            abnormal_disconnect_window_ms: 30_000,
            min_rssi_improvement_dbm: 5,
            history_capacity: 30,
        }
    }
}

impl BlocklistConfig {
    /// Check every invariant the engine relies on. Called when a monitor
    /// is built, so a bad config can never reach the hot path.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        for reason in FailureReason::iter() {
            let params = self.reasons.get(reason);
            if params.threshold == 0 {
                return Err(ConfigValidationError::ZeroThreshold { reason });
            }
            if params.base_duration_ms <= 0 {
                return Err(ConfigValidationError::NonPositiveBaseDuration {
                    reason,
                    value_ms: params.base_duration_ms,
                });
            }
        }
        if self.abnormal_disconnect_window_ms <= 0 {
            return Err(ConfigValidationError::NonPositiveDisconnectWindow(
                self.abnormal_disconnect_window_ms,
            ));
        }
        if self.min_rssi_improvement_dbm <= 0 {
            return Err(ConfigValidationError::NonPositiveRssiImprovement(
                self.min_rssi_improvement_dbm,
            ));
        }
        if self.history_capacity == 0 {
            return Err(ConfigValidationError::ZeroHistoryCapacity);
        }
        Ok(())
    }

    /// Override one reason's parameters (builder-style, mostly for hosts
    /// applying targeted tuning on top of the defaults).
    pub fn with_reason(mut self, reason: FailureReason, params: ReasonParams) -> Self {
        *self.reasons.get_mut(reason) = params;
        self
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_are_valid() {
        BlocklistConfig::default().validate().unwrap();
    }

    #[test]
    fn default_thresholds_match_platform_values() {
        let table = ReasonTable::default();
        assert_eq!(table.get(FailureReason::WrongPassword).threshold, 1);
        assert_eq!(table.get(FailureReason::DhcpFailure).threshold, 3);
        assert_eq!(
            table.get(FailureReason::DhcpFailure).base_duration_ms,
            300_000
        );
    }

    #[test]
    fn zero_threshold_is_rejected() {
        let config = BlocklistConfig::default().with_reason(
            FailureReason::EapFailure,
            ReasonParams {
                threshold: 0,
                base_duration_ms: 300_000,
            },
        );
        assert_eq!(
            config.validate(),
            Err(ConfigValidationError::ZeroThreshold {
                reason: FailureReason::EapFailure
            })
        );
    }

    #[test]
    fn non_positive_duration_is_rejected() {
        let config = BlocklistConfig::default().with_reason(
            FailureReason::DhcpFailure,
            ReasonParams {
                threshold: 3,
                base_duration_ms: 0,
            },
        );
        assert!(matches!(
            config.validate(),
            Err(ConfigValidationError::NonPositiveBaseDuration { .. })
        ));
    }

    #[test]
    fn non_positive_window_is_rejected() {
        let config = BlocklistConfig {
            abnormal_disconnect_window_ms: 0,
            ..BlocklistConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigValidationError::NonPositiveDisconnectWindow(0))
        );
    }

    #[test]
    fn zero_history_capacity_is_rejected() {
        let config = BlocklistConfig {
            history_capacity: 0,
            ..BlocklistConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigValidationError::ZeroHistoryCapacity)
        );
    }

    #[test]
    fn config_round_trips_through_toml() {
        let config = BlocklistConfig::default();
        let text = toml::to_string(&config).unwrap();
        let back: BlocklistConfig = toml::from_str(&text).unwrap();
        assert_eq!(back, config);
    }
}
