//! Transport configuration.

use crate::errors::ConfigurationError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// Configuration for [`crate::transport::ReqwestTransport`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransportConfig {
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: f64,
    /// User agent string.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Maximum number of redirects to follow. Zero disables redirects.
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,
    /// Headers added to every request that does not set them itself.
    #[serde(default)]
    pub default_headers: BTreeMap<String, String>,
}

fn default_timeout() -> f64 {
    30.0
}

fn default_user_agent() -> String {
    format!("querer/{}", env!("CARGO_PKG_VERSION"))
}

fn default_max_redirects() -> usize {
    10
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout(),
            user_agent: default_user_agent(),
            max_redirects: default_max_redirects(),
            default_headers: BTreeMap::new(),
        }
    }
}

impl TransportConfig {
    /// Creates a configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a configuration from JSON; missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::Invalid`] if the JSON is malformed or
    /// the result fails [`TransportConfig::validate`].
    pub fn from_json(json: &str) -> Result<Self, ConfigurationError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigurationError::Invalid(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Sets the timeout.
    #[must_use]
    pub fn with_timeout(mut self, seconds: f64) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    /// Sets the user agent.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Sets the redirect limit.
    #[must_use]
    pub fn with_max_redirects(mut self, max_redirects: usize) -> Self {
        self.max_redirects = max_redirects;
        self
    }

    /// Adds a default header.
    #[must_use]
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.insert(key.into(), value.into());
        self
    }

    /// Gets timeout as Duration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::Invalid`] if the timeout is not a
    /// positive number representable as a [`Duration`].
    pub fn timeout(&self) -> Result<Duration, ConfigurationError> {
        if self.timeout_seconds <= 0.0 {
            return Err(ConfigurationError::Invalid(format!(
                "timeout_seconds must be positive, got {}",
                self.timeout_seconds
            )));
        }
        Duration::try_from_secs_f64(self.timeout_seconds).map_err(|e| {
            ConfigurationError::Invalid(format!(
                "timeout_seconds {} is out of range: {e}",
                self.timeout_seconds
            ))
        })
    }

    /// Checks the values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::Invalid`] if the timeout is not a
    /// positive [`Duration`] or the user agent is empty.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        self.timeout()?;
        if self.user_agent.trim().is_empty() {
            return Err(ConfigurationError::Invalid(
                "user_agent must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
