//! Autocomplete configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Malformed configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The JSON could not be parsed into [`AutocompleteConfig`].
    #[error("invalid autocomplete configuration: {0}")]
    Json(#[from] serde_json::Error),
}

/// Settings for [`Completer`](crate::Completer). Every field has a default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutocompleteConfig {
    /// Root URL of the remote namespace service. Level paths are appended to it.
    pub base_url: String,
    /// Seconds a fetched namespace level is trusted.
    pub cache_ttl_secs: u64,
    /// How many recently accepted options are ranked first.
    pub recent_capacity: usize,
    /// Options treated as recently used from the start, most recent last.
    pub seed_recent: Vec<String>,
}

impl AutocompleteConfig {
    /// Parse a configuration; missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// [`cache_ttl_secs`](Self::cache_ttl_secs) as a [`Duration`].
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}

impl Default for AutocompleteConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            cache_ttl_secs: 30,
            recent_capacity: 40,
            seed_recent: vec!["SELECT".to_string()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = AutocompleteConfig::from_json_str(r#"{"base_url": "http://db/nav/"}"#).unwrap();
        assert_eq!(config.base_url, "http://db/nav/");
        assert_eq!(config.cache_ttl(), Duration::from_secs(30));
        assert_eq!(config.recent_capacity, 40);
        assert_eq!(config.seed_recent, vec!["SELECT".to_string()]);
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            AutocompleteConfig::from_json_str("{\"cache_ttl_secs\": \"soon\"}"),
            Err(ConfigError::Json(_))
        ));
    }
}
