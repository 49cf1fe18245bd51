//! Configuration loading for the roamguard blocklist engine.
//!
//! TOML file + environment overrides merged over the built-in defaults,
//! validated, and handed out as a `roamguard_core::BlocklistConfig`.
//! Hosts that build their configuration programmatically skip this crate
//! entirely — core never reads files.
//!
//! Layering, lowest precedence first:
//!
//! 1. built-in defaults (`BlocklistConfig::default()`)
//! 2. the TOML config file (platform config dir, or an explicit path)
//! 3. `ROAMGUARD_`-prefixed environment variables (top-level keys)

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use thiserror::Error;
use tracing::debug;

use roamguard_core::{BlocklistConfig, ConfigValidationError};

/// Environment variable prefix for overrides, e.g.
/// `ROAMGUARD_BACKOFF_EXPONENT_CAP=4`.
const ENV_PREFIX: &str = "ROAMGUARD_";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("invalid config: {0}")]
    Validation(#[from] ConfigValidationError),

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "roamguard", "roamguard").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("roamguard");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load and validate the blocklist config from the canonical file path
/// plus environment overrides.
pub fn load() -> Result<BlocklistConfig, ConfigError> {
    load_from(config_path())
}

/// Load and validate the blocklist config from an explicit file path
/// plus environment overrides. A missing file just means defaults.
pub fn load_from(path: impl AsRef<Path>) -> Result<BlocklistConfig, ConfigError> {
    let path = path.as_ref();
    debug!(path = %path.display(), "loading blocklist config");

    let figment = Figment::new()
        .merge(Serialized::defaults(BlocklistConfig::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX));

    let config: BlocklistConfig = figment.extract()?;
    config.validate()?;
    Ok(config)
}

/// Load the config, falling back to the defaults if loading or
/// validation fails.
pub fn load_or_default() -> BlocklistConfig {
    load().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize a config to TOML and write it to the given path.
pub fn save_to(config: &BlocklistConfig, path: impl AsRef<Path>) -> Result<(), ConfigError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(config)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use roamguard_core::FailureReason;

    // Every test runs inside a figment Jail: loading consults the
    // environment, and the Jail both isolates and serializes that.

    #[test]
    fn missing_file_yields_defaults() {
        figment::Jail::expect_with(|_jail| {
            let config = load_from("nope.toml").expect("defaults load");
            assert_eq!(config, BlocklistConfig::default());
            Ok(())
        });
    }

    #[test]
    fn file_overrides_only_named_keys() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "config.toml",
                r"
backoff_exponent_cap = 4

[reasons.dhcp_failure]
threshold = 5
base_duration_ms = 60000
",
            )?;

            let config = load_from("config.toml").expect("config loads");
            assert_eq!(config.backoff_exponent_cap, 4);
            assert_eq!(config.reasons.get(FailureReason::DhcpFailure).threshold, 5);
            assert_eq!(
                config
                    .reasons
                    .get(FailureReason::DhcpFailure)
                    .base_duration_ms,
                60_000
            );
            // Untouched keys keep their defaults.
            assert_eq!(
                config.reasons.get(FailureReason::WrongPassword).threshold,
                1
            );
            assert_eq!(config.history_capacity, 30);
            Ok(())
        });
    }

    #[test]
    fn partial_reason_override_keeps_other_fields() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "config.toml",
                r"
[reasons.eap_failure]
threshold = 2
",
            )?;

            let config = load_from("config.toml").expect("config loads");
            assert_eq!(config.reasons.get(FailureReason::EapFailure).threshold, 2);
            assert_eq!(
                config.reasons.get(FailureReason::EapFailure).base_duration_ms,
                300_000
            );
            Ok(())
        });
    }

    #[test]
    fn invalid_merged_config_is_rejected() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "config.toml",
                r"
[reasons.eap_failure]
threshold = 0
base_duration_ms = 300000
",
            )?;

            let err = load_from("config.toml").expect_err("validation rejects");
            assert!(matches!(
                err,
                ConfigError::Validation(ConfigValidationError::ZeroThreshold {
                    reason: FailureReason::EapFailure
                })
            ));
            Ok(())
        });
    }

    #[test]
    fn env_overrides_the_file() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "config.toml",
                r"
backoff_exponent_cap = 4
abnormal_disconnect_window_ms = 10000
",
            )?;
            jail.set_env("ROAMGUARD_BACKOFF_EXPONENT_CAP", "6");

            let config = load_from("config.toml").expect("config loads");
            assert_eq!(config.backoff_exponent_cap, 6);
            assert_eq!(config.abnormal_disconnect_window_ms, 10_000);
            Ok(())
        });
    }

    #[test]
    fn save_round_trips() {
        figment::Jail::expect_with(|_jail| {
            let config = BlocklistConfig {
                min_rssi_improvement_dbm: 7,
                ..BlocklistConfig::default()
            };
            save_to(&config, "nested/config.toml").expect("config saves");

            let back = load_from("nested/config.toml").expect("config loads");
            assert_eq!(back, config);
            Ok(())
        });
    }
}
