//! Client configuration
//!
//! The only required setting is the API key, read from `BUNDESTAG_API_KEY`.
//! Base URL and timeout have defaults matching the public DIP endpoint.

use std::time::Duration;

use crate::error::{Error, Result};

/// Environment variable holding the DIP API key
pub const API_KEY_ENV: &str = "BUNDESTAG_API_KEY";

/// Environment variable overriding the API base URL
pub const BASE_URL_ENV: &str = "BUNDESTAG_API_BASE";

/// Environment variable overriding the request timeout (seconds)
pub const TIMEOUT_ENV: &str = "BUNDESTAG_API_TIMEOUT";

/// Public DIP API base
pub const DEFAULT_BASE_URL: &str = "https://search.dip.bundestag.de/api/v1";

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Settings for [`DipClient`](crate::DipClient)
#[derive(Clone, PartialEq, Eq)]
pub struct DipConfig {
    /// API key sent as `Authorization: ApiKey <key>`
    pub api_key: Option<String>,
    /// Base URL without trailing slash
    pub base_url: String,
    /// Per-request timeout
    pub timeout: Duration,
}

impl Default for DipConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

// Manual impl so the key never ends up in logs.
impl std::fmt::Debug for DipConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DipConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl DipConfig {
    /// Build a config from explicit values.
    ///
    /// Empty keys are treated as missing and trailing slashes are trimmed
    /// from the base URL.
    pub fn new(api_key: Option<String>, base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout,
        }
    }

    /// Read configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let timeout = match lookup(TIMEOUT_ENV) {
            Some(raw) => raw.trim().parse::<u64>().map_err(|_| Error::InvalidConfig {
                message: format!("{TIMEOUT_ENV} must be a whole number of seconds, got '{raw}'"),
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        let config = Self::new(
            lookup(API_KEY_ENV),
            lookup(BASE_URL_ENV).unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            Duration::from_secs(timeout),
        );
        config.validate()?;
        Ok(config)
    }

    /// Check the base URL and timeout
    pub fn validate(&self) -> Result<()> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(Error::InvalidConfig {
                message: format!("base URL must be http(s), got '{}'", self.base_url),
            });
        }
        if self.timeout.is_zero() {
            return Err(Error::InvalidConfig {
                message: "timeout must be greater than zero".to_string(),
            });
        }
        Ok(())
    }

    /// The API key, or [`Error::MissingApiKey`]
    pub fn require_api_key(&self) -> Result<&str> {
        self.api_key.as_deref().ok_or(Error::MissingApiKey)
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
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults_without_environment() {
        let config = DipConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.api_key, None);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn reads_all_variables() {
        let config = DipConfig::from_lookup(lookup(&[
            (API_KEY_ENV, "secret-key"),
            (BASE_URL_ENV, "http://localhost:8080/api/v1/"),
            (TIMEOUT_ENV, "5"),
        ]))
        .unwrap();
        assert_eq!(config.api_key.as_deref(), Some("secret-key"));
        assert_eq!(config.base_url, "http://localhost:8080/api/v1");
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn empty_key_is_missing() {
        let config = DipConfig::from_lookup(lookup(&[(API_KEY_ENV, "  ")])).unwrap();
        assert!(matches!(config.require_api_key(), Err(Error::MissingApiKey)));
    }

    #[test]
    fn rejects_bad_timeout() {
        let err = DipConfig::from_lookup(lookup(&[(TIMEOUT_ENV, "soon")])).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig { .. }));
    }

    #[test]
    fn rejects_non_http_base() {
        let err = DipConfig::from_lookup(lookup(&[(BASE_URL_ENV, "ftp://example.org")])).unwrap_err();
        assert!(err.to_string().contains("ftp://example.org"));
    }

    #[test]
    fn debug_output_redacts_key() {
        let config = DipConfig::new(
            Some("top-secret".to_string()),
            DEFAULT_BASE_URL,
            Duration::from_secs(1),
        );
        let debug = format!("{:?}", config);
        assert!(!debug.contains("top-secret"));
        assert!(debug.contains("<redacted>"));
    }
}
