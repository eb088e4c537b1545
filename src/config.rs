//! Dashboard configuration
//!
//! Settings come from the builder, from `OSIRIS_*` environment variables,
//! or from a JSON document. Every source goes through [`DashboardConfig::validate`].

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::metrics::DEFAULT_SAMPLE_DAYS;
use crate::{Error, Result};

const DEFAULT_BACKEND_URL: &str = "http://localhost:8080";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Longest sample dataset a session may generate (ten years of days).
pub const MAX_SAMPLE_DAYS: usize = 3650;

/// Environment variable overriding the backend base URL
pub const ENV_BACKEND_URL: &str = "OSIRIS_BACKEND_URL";
/// Environment variable overriding the request timeout (seconds)
pub const ENV_REQUEST_TIMEOUT_SECS: &str = "OSIRIS_REQUEST_TIMEOUT_SECS";
/// Environment variable overriding the sample dataset length (days)
pub const ENV_SAMPLE_DAYS: &str = "OSIRIS_SAMPLE_DAYS";
/// Environment variable fixing the sample dataset seed
pub const ENV_SAMPLE_SEED: &str = "OSIRIS_SAMPLE_SEED";

/// Session-wide settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    backend_url: String,
    request_timeout_secs: u64,
    sample_days: usize,
    sample_seed: Option<u64>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            sample_days: DEFAULT_SAMPLE_DAYS,
            sample_seed: None,
        }
    }
}

impl DashboardConfig {
    /// Create a new configuration builder
    #[must_use]
    pub fn builder() -> DashboardConfigBuilder {
        DashboardConfigBuilder::default()
    }

    /// Defaults overridden by any `OSIRIS_*` variables that are set.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if a variable cannot be parsed or the
    /// result fails validation.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with a custom variable source.
    ///
    /// # Errors
    ///
    /// See [`from_env`](Self::from_env).
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(url) = lookup(ENV_BACKEND_URL) {
            config.backend_url = url;
        }
        if let Some(raw) = lookup(ENV_REQUEST_TIMEOUT_SECS) {
            config.request_timeout_secs = parse_var(ENV_REQUEST_TIMEOUT_SECS, &raw)?;
        }
        if let Some(raw) = lookup(ENV_SAMPLE_DAYS) {
            config.sample_days = parse_var(ENV_SAMPLE_DAYS, &raw)?;
        }
        if let Some(raw) = lookup(ENV_SAMPLE_SEED) {
            config.sample_seed = Some(parse_var(ENV_SAMPLE_SEED, &raw)?);
        }
        config.validate()?;
        Ok(config)
    }

    /// Parse a JSON document; missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] on malformed JSON or invalid values.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|err| Error::InvalidConfig(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the settings are usable.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] for a blank or non-http(s) URL, a zero
    /// timeout, or sample days outside `1..=MAX_SAMPLE_DAYS`.
    pub fn validate(&self) -> Result<()> {
        let url = self.backend_url.trim();
        if url.is_empty() {
            return Err(Error::InvalidConfig(
                "backend URL must not be empty".to_string(),
            ));
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(Error::InvalidConfig(format!(
                "backend URL '{url}' must start with http:// or https://"
            )));
        }
        if self.request_timeout_secs == 0 {
            return Err(Error::InvalidConfig(
                "request timeout must be at least one second".to_string(),
            ));
        }
        if self.sample_days == 0 {
            return Err(Error::InvalidConfig(
                "sample dataset needs at least one day".to_string(),
            ));
        }
        if self.sample_days > MAX_SAMPLE_DAYS {
            return Err(Error::InvalidConfig(format!(
                "sample dataset is limited to {MAX_SAMPLE_DAYS} days, got {}",
                self.sample_days
            )));
        }
        Ok(())
    }

    /// Base URL of the prediction backend (without `/predict`).
    #[must_use]
    pub fn backend_url(&self) -> &str {
        &self.backend_url
    }

    /// Timeout applied to each prediction request.
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Number of days in generated sample datasets.
    #[must_use]
    pub const fn sample_days(&self) -> usize {
        self.sample_days
    }

    /// Fixed seed for sample datasets, if any.
    #[must_use]
    pub const fn sample_seed(&self) -> Option<u64> {
        self.sample_seed
    }
}

/// Builder for `DashboardConfig`.
#[derive(Debug, Default)]
pub struct DashboardConfigBuilder {
    config: DashboardConfig,
}

impl DashboardConfigBuilder {
    /// Set the prediction backend base URL
    #[must_use]
    pub fn backend_url(mut self, url: impl Into<String>) -> Self {
        self.config.backend_url = url.into();
        self
    }

    /// Set the request timeout (rounded down to whole seconds)
    #[must_use]
    pub const fn request_timeout(mut self, timeout: Duration) -> Self {
        self.config.request_timeout_secs = timeout.as_secs();
        self
    }

    /// Set the sample dataset length
    #[must_use]
    pub const fn sample_days(mut self, days: usize) -> Self {
        self.config.sample_days = days;
        self
    }

    /// Fix the sample dataset seed
    #[must_use]
    pub const fn sample_seed(mut self, seed: u64) -> Self {
        self.config.sample_seed = Some(seed);
        self
    }

    /// Build the configuration
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if validation fails
    pub fn build(self) -> Result<DashboardConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

fn parse_var<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T> {
    raw.trim()
        .parse()
        .map_err(|_| Error::InvalidConfig(format!("{key}='{raw}' is not a valid value")))
}
