//! Client configuration
//!
//! Defaults point at the public SMARD download endpoint. Each value can be
//! overridden from the environment:
//!
//! | Variable | Field | Default |
//! |---|---|---|
//! | `SMARD_ENDPOINT` | `endpoint` | `https://www.smard.de/nip-download-manager/nip/download/market-data` |
//! | `SMARD_TIMEOUT_SECS` | `timeout_secs` | `30` |
//! | `SMARD_USER_AGENT` | `user_agent` | `smard-market-data/<version>` |

use std::time::Duration;

use crate::error::ConfigError;

/// Public SMARD market-data download endpoint
pub const DEFAULT_ENDPOINT: &str =
    "https://www.smard.de/nip-download-manager/nip/download/market-data";

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const ENV_ENDPOINT: &str = "SMARD_ENDPOINT";
pub const ENV_TIMEOUT_SECS: &str = "SMARD_TIMEOUT_SECS";
pub const ENV_USER_AGENT: &str = "SMARD_USER_AGENT";

/// HTTP client settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Download endpoint URL (POST target)
    pub endpoint: String,

    /// Whole-request timeout in seconds
    pub timeout_secs: u64,

    /// `User-Agent` header value
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: format!("smard-market-data/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ClientConfig {
    /// Defaults overridden by `SMARD_*` environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns per variable name
    ///
    /// Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(endpoint) = get(ENV_ENDPOINT) {
            config.endpoint = endpoint.trim().to_string();
        }

        if let Some(raw) = get(ENV_TIMEOUT_SECS) {
            config.timeout_secs = raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or_else(|| ConfigError::InvalidValue {
                    key: ENV_TIMEOUT_SECS.to_string(),
                    value: raw.clone(),
                })?;
        }

        if let Some(user_agent) = get(ENV_USER_AGENT) {
            config.user_agent = user_agent;
        }

        Ok(config)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ClientConfig::from_lookup(lookup(&[])).unwrap();

        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert!(config.user_agent.starts_with("smard-market-data/"));
    }

    #[test]
    fn test_overrides() {
        let config = ClientConfig::from_lookup(lookup(&[
            (ENV_ENDPOINT, " http://localhost:8080/download "),
            (ENV_TIMEOUT_SECS, "5"),
            (ENV_USER_AGENT, "tests"),
        ]))
        .unwrap();

        assert_eq!(config.endpoint, "http://localhost:8080/download");
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.user_agent, "tests");
    }

    #[test]
    fn test_empty_values_are_unset() {
        let config =
            ClientConfig::from_lookup(lookup(&[(ENV_ENDPOINT, ""), (ENV_TIMEOUT_SECS, "  ")]))
                .unwrap();

        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn test_invalid_timeout() {
        for bad in ["soon", "0", "-3"] {
            let err = ClientConfig::from_lookup(lookup(&[(ENV_TIMEOUT_SECS, bad)])).unwrap_err();
            assert_eq!(
                err,
                ConfigError::InvalidValue {
                    key: ENV_TIMEOUT_SECS.to_string(),
                    value: bad.to_string(),
                }
            );
        }
    }
}
