//! Reconciler configuration.
//!
//! Backoff tuning and the retryability table can be loaded from YAML or JSON.
//! Every section is optional and falls back to the built-in defaults.

use crate::retry::{
    BackoffSettings, ExponentialBackoffProvider, InvalidBackoff, Retryability, RetryabilityTable,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// ConfigError reports a configuration that could not be loaded.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid YAML configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid JSON configuration: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    InvalidBackoff(#[from] InvalidBackoff),

    #[error("invalid retry pattern for status {code}: {source}")]
    InvalidPattern {
        code: u16,
        #[source]
        source: regex::Error,
    },
}

/// Backoff tuning in milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackoffConfig {
    pub initial_interval_ms: u64,
    pub max_interval_ms: u64,
    pub multiplier: f64,
    pub randomization_factor: f64,
    /// Unbounded when absent.
    pub max_elapsed_ms: Option<u64>,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        BackoffConfig::from(BackoffSettings::default())
    }
}

impl From<BackoffSettings> for BackoffConfig {
    fn from(s: BackoffSettings) -> Self {
        BackoffConfig {
            initial_interval_ms: s.initial_interval.as_millis() as u64,
            max_interval_ms: s.max_interval.as_millis() as u64,
            multiplier: s.multiplier,
            randomization_factor: s.randomization_factor,
            max_elapsed_ms: s.max_elapsed.map(|d| d.as_millis() as u64),
        }
    }
}

impl From<&BackoffConfig> for BackoffSettings {
    fn from(c: &BackoffConfig) -> Self {
        BackoffSettings {
            initial_interval: Duration::from_millis(c.initial_interval_ms),
            max_interval: Duration::from_millis(c.max_interval_ms),
            multiplier: c.multiplier,
            randomization_factor: c.randomization_factor,
            max_elapsed: c.max_elapsed_ms.map(Duration::from_millis),
        }
    }
}

/// Retry policy for one status code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryabilityConfig {
    #[serde(default = "default_retryable")]
    pub retryable: bool,
    /// Regular expression the error message must match. Empty matches all.
    #[serde(default)]
    pub pattern: String,
    pub timeout_secs: u64,
}

fn default_retryable() -> bool {
    true
}

/// ReconcilerConfig is the top-level configuration document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconcilerConfig {
    pub backoff: BackoffConfig,
    /// Keyed by status code. The default table applies when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retryability: Option<BTreeMap<u16, RetryabilityConfig>>,
}

impl ReconcilerConfig {
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Loads a `.json` file as JSON and anything else as YAML.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json(&content),
            _ => Self::from_yaml(&content),
        }
    }

    /// The configured backoff tuning, rejected when it is out of range.
    pub fn backoff_settings(&self) -> Result<BackoffSettings, ConfigError> {
        let settings = BackoffSettings::from(&self.backoff);
        settings.validate()?;
        Ok(settings)
    }

    /// A provider that builds a fresh exponential policy per retry loop.
    pub fn backoff_provider(&self) -> Result<ExponentialBackoffProvider, ConfigError> {
        Ok(ExponentialBackoffProvider::new(self.backoff_settings()?))
    }

    /// Compiles the configured table, or returns the default one.
    pub fn retryability_table(&self) -> Result<RetryabilityTable, ConfigError> {
        let Some(codes) = &self.retryability else {
            return Ok(RetryabilityTable::default());
        };
        let mut table = RetryabilityTable::new();
        for (&code, c) in codes {
            let r = Retryability::new(c.retryable, &c.pattern, Duration::from_secs(c.timeout_secs))
                .map_err(|source| ConfigError::InvalidPattern { code, source })?;
            table.insert(code, r);
        }
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = ReconcilerConfig::from_yaml("{}").unwrap();
        assert_eq!(config, ReconcilerConfig::default());
        assert_eq!(config.backoff_settings().unwrap(), BackoffSettings::default());
        assert_eq!(config.retryability_table().unwrap().len(), 5);
    }

    #[test]
    fn test_yaml() {
        let config = ReconcilerConfig::from_yaml(
            r#"
backoff:
  initial_interval_ms: 100
  max_elapsed_ms: 60000
retryability:
  409:
    pattern: "^operation in progress"
    timeout_secs: 120
  429:
    retryable: false
    timeout_secs: 0
"#,
        )
        .unwrap();

        let settings = config.backoff_settings().unwrap();
        assert_eq!(settings.initial_interval, Duration::from_millis(100));
        assert_eq!(settings.max_interval, Duration::from_secs(30));
        assert_eq!(settings.max_elapsed, Some(Duration::from_secs(60)));

        let table = config.retryability_table().unwrap();
        assert_eq!(table.len(), 2);
        assert!(table.is_retryable(409, "operation in progress", Duration::from_secs(5)));
        assert!(!table.is_retryable(409, "conflict", Duration::from_secs(5)));
        assert!(!table.is_retryable(429, "rate limited", Duration::ZERO));
        assert!(!table.is_retryable(503, "unavailable", Duration::ZERO));
    }

    #[test]
    fn test_json() {
        let config = ReconcilerConfig::from_json(
            r#"{"backoff": {"multiplier": 2.0}, "retryability": {"503": {"timeout_secs": 30}}}"#,
        )
        .unwrap();
        assert_eq!(config.backoff.multiplier, 2.0);
        assert!(config
            .retryability_table()
            .unwrap()
            .is_retryable(503, "anything", Duration::from_secs(29)));
    }

    #[test]
    fn test_invalid_pattern() {
        let config = ReconcilerConfig::from_yaml("retryability:\n  500:\n    pattern: \"(\"\n    timeout_secs: 1\n").unwrap();
        let err = config.retryability_table().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPattern { code: 500, .. }));
    }

    #[test]
    fn test_out_of_range_backoff_is_rejected() {
        let documents = [
            "backoff:\n  multiplier: -1.0\n",
            "backoff:\n  multiplier: .nan\n",
            "backoff:\n  randomization_factor: .nan\n",
            "backoff:\n  randomization_factor: 2.0\n",
            "backoff:\n  initial_interval_ms: 60000\n  max_interval_ms: 1000\n",
        ];
        for doc in documents {
            let config = ReconcilerConfig::from_yaml(doc).unwrap();
            assert!(
                matches!(config.backoff_settings(), Err(ConfigError::InvalidBackoff(_))),
                "{}",
                doc
            );
            assert!(config.backoff_provider().is_err(), "{}", doc);
        }
    }

    #[test]
    fn test_backoff_provider() {
        use crate::retry::BackoffProvider;

        let config = ReconcilerConfig::from_yaml("backoff:\n  randomization_factor: 0.0\n").unwrap();
        let provider = config.backoff_provider().unwrap();
        assert_eq!(provider.settings().multiplier, 1.5);
        assert_eq!(provider.backoff().next_backoff(), Some(Duration::from_millis(500)));
    }

    #[test]
    fn test_malformed_documents() {
        assert!(matches!(ReconcilerConfig::from_yaml("backoff: ["), Err(ConfigError::Yaml(_))));
        assert!(matches!(ReconcilerConfig::from_json("{"), Err(ConfigError::Json(_))));
    }

    #[test]
    fn test_from_file() {
        let dir = std::env::temp_dir().join(format!("reconcile-config-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let yaml = dir.join("reconciler.yaml");
        fs::write(&yaml, "backoff:\n  multiplier: 3.0\n").unwrap();
        let json = dir.join("reconciler.json");
        fs::write(&json, r#"{"backoff": {"multiplier": 4.0}}"#).unwrap();

        assert_eq!(ReconcilerConfig::from_file(&yaml).unwrap().backoff.multiplier, 3.0);
        assert_eq!(ReconcilerConfig::from_file(&json).unwrap().backoff.multiplier, 4.0);
        assert!(matches!(
            ReconcilerConfig::from_file(dir.join("missing.yaml")),
            Err(ConfigError::Io { .. })
        ));
        fs::remove_dir_all(&dir).unwrap();
    }
}
