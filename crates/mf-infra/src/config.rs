//! # Configuration Loader
//!
//! Reads the TOML file into a [`FormsConfig`] without judging its content.
//! Interpreting the values (empty mode, zero timeout) is left to the
//! bootstrap, which uses [`BackendMode`] and [`ConfigError`] from here.

use std::path::PathBuf;
use std::str::FromStr;

use anyhow::Context;
use thiserror::Error;

use mf_core::FormsConfig;

/// Errors found while interpreting a loaded configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unknown backend mode `{0}`, expected `http` or `fixture`")]
    UnknownBackendMode(String),

    #[error("backend mode `http` requires `backend.base_url`")]
    MissingBaseUrl,
}

/// Which gateways the runtime wires in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendMode {
    Http,
    /// In-memory fixtures; also used when no mode is configured.
    #[default]
    Fixture,
}

impl FromStr for BackendMode {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "" | "fixture" => Ok(BackendMode::Fixture),
            "http" => Ok(BackendMode::Http),
            other => Err(ConfigError::UnknownBackendMode(other.to_string())),
        }
    }
}

/// Load configuration from a TOML file
///
/// Pure data loading: empty strings, zero timeouts and unknown modes are
/// returned as they are.
///
/// # Errors
///
/// Returns error if the file cannot be read or is not valid TOML.
pub fn load_config(config_path: PathBuf) -> anyhow::Result<FormsConfig> {
    let content = std::fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;
    let toml_value: toml::Value =
        toml::from_str(&content).context("Failed to parse config as TOML")?;
    FormsConfig::from_toml(&toml_value)
}
