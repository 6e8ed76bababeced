//! Serializable backfill configuration.
//!
//! Everything the driver touches on disk is named here explicitly —
//! ticker, checkpoint file, hard-stop file — rather than looked up by
//! filesystem convention.

use barvault_core::Month;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors from loading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Configuration for a single-ticker backfill run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BackfillConfig {
    /// Ticker symbol to backfill.
    pub ticker: String,

    /// First path segment of storage keys, identifying provider and bar
    /// size (e.g. `polygon-30m`).
    #[serde(default = "default_provider_segment")]
    pub provider_segment: String,

    /// File holding the next month to fetch (`YYYY-MM`).
    pub checkpoint_path: PathBuf,

    /// File holding the hard-stop year. May not exist.
    pub hard_stop_path: PathBuf,
}

fn default_provider_segment() -> String {
    "polygon-30m".to_string()
}

impl BackfillConfig {
    /// Load a config from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&contents)
    }

    /// Parse a config from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Build a config whose state files live under `state_dir`, using the
    /// conventional `{ticker}_next_month` and `hard_stop_year` names.
    pub fn in_state_dir(ticker: impl Into<String>, state_dir: &Path) -> Self {
        let ticker = ticker.into();
        Self {
            checkpoint_path: state_dir.join(format!("{ticker}_next_month")),
            hard_stop_path: state_dir.join("hard_stop_year"),
            provider_segment: default_provider_segment(),
            ticker,
        }
    }

    /// Storage key for a month's payload:
    /// `{provider_segment}/{ticker}/{month}`.
    pub fn storage_key(&self, month: Month) -> String {
        format!("{}/{}/{month}", self.provider_segment, self.ticker)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_toml() {
        let config = BackfillConfig::from_toml(
            r#"
            ticker = "NVDA"
            provider_segment = "polygon-30m"
            checkpoint_path = "state/NVDA_next_month"
            hard_stop_path = "state/hard_stop_year"
            "#,
        )
        .unwrap();

        assert_eq!(config.ticker, "NVDA");
        assert_eq!(config.checkpoint_path, PathBuf::from("state/NVDA_next_month"));
    }

    #[test]
    fn provider_segment_defaults() {
        let config = BackfillConfig::from_toml(
            r#"
            ticker = "AAPL"
            checkpoint_path = "cp"
            hard_stop_path = "hs"
            "#,
        )
        .unwrap();
        assert_eq!(config.provider_segment, "polygon-30m");
    }

    #[test]
    fn missing_ticker_is_rejected() {
        assert!(BackfillConfig::from_toml("checkpoint_path = \"cp\"").is_err());
    }

    #[test]
    fn storage_key_layout() {
        let config = BackfillConfig::in_state_dir("NVDA", Path::new("/var/lib/barvault"));
        let month: Month = "2024-07".parse().unwrap();
        assert_eq!(config.storage_key(month), "polygon-30m/NVDA/2024-07");
        assert_eq!(
            config.checkpoint_path,
            PathBuf::from("/var/lib/barvault/NVDA_next_month")
        );
    }

    #[test]
    fn config_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let config = BackfillConfig::in_state_dir("MSFT", dir.path());
        let path = dir.path().join("backfill.toml");
        std::fs::write(&path, toml::to_string(&config).unwrap()).unwrap();

        assert_eq!(BackfillConfig::from_file(&path).unwrap(), config);
    }
}
