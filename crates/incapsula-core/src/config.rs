//! Configuration structures for Incapsula clients.
//!
//! This module provides the credentials and endpoint settings every API client is
//! built from, together with validation and environment loading.

use crate::Error;
use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;
use url::Url;
use validator::Validate;

/// Default base URL of the provisioning API (`sites/*` endpoints).
pub const DEFAULT_BASE_URL: &str = "https://my.incapsula.com/api/prov/v1";

/// Default base URL of the newer REST APIs (policies, certificates).
pub const DEFAULT_BASE_URL_API: &str = "https://api.imperva.com";

/// Environment variable holding the API id.
pub const ENV_API_ID: &str = "INCAPSULA_API_ID";
/// Environment variable holding the API key.
pub const ENV_API_KEY: &str = "INCAPSULA_API_KEY";
/// Environment variable overriding the provisioning base URL.
pub const ENV_BASE_URL: &str = "INCAPSULA_BASE_URL";
/// Environment variable overriding the REST API base URL.
pub const ENV_BASE_URL_API: &str = "INCAPSULA_BASE_URL_API";

/// Configuration for an Incapsula client instance.
///
/// Holds the API credentials and the two base URLs the service is split across.
#[derive(Debug, Clone, Validate)]
pub struct IncapsulaConfig {
    /// API id sent as `x-API-Id`
    #[validate(length(min = 1))]
    pub api_id: String,

    /// API key sent as `x-API-Key`
    pub api_key: SecretString,

    /// Provisioning API base URL
    #[validate(url)]
    pub base_url: String,

    /// REST API base URL
    #[validate(url)]
    pub base_url_api: String,

    /// Request timeout in seconds
    #[validate(range(min = 1, max = 300))]
    pub request_timeout_secs: u64,

    /// Whether to verify TLS certificates
    pub tls_verify: bool,
}

const fn default_request_timeout_secs() -> u64 {
    30
}

impl IncapsulaConfig {
    /// Create a new configuration with the default endpoints.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails.
    pub fn new(api_id: impl Into<String>, api_key: impl Into<String>) -> Result<Self, Error> {
        let config = Self {
            api_id: api_id.into(),
            api_key: SecretString::from(api_key.into()),
            base_url: DEFAULT_BASE_URL.to_string(),
            base_url_api: DEFAULT_BASE_URL_API.to_string(),
            request_timeout_secs: default_request_timeout_secs(),
            tls_verify: true,
        };

        config.validated()
    }

    /// Load the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the credentials are missing or validation fails.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load the configuration through an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns an error if the credentials are missing or validation fails.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_id = lookup(ENV_API_ID)
            .ok_or_else(|| Error::ConfigError(format!("{ENV_API_ID} is not set")))?;
        let api_key = lookup(ENV_API_KEY)
            .ok_or_else(|| Error::ConfigError(format!("{ENV_API_KEY} is not set")))?;

        let mut config = Self {
            api_id,
            api_key: SecretString::from(api_key),
            base_url: DEFAULT_BASE_URL.to_string(),
            base_url_api: DEFAULT_BASE_URL_API.to_string(),
            request_timeout_secs: default_request_timeout_secs(),
            tls_verify: true,
        };

        if let Some(base_url) = lookup(ENV_BASE_URL) {
            config.base_url = base_url;
        }
        if let Some(base_url_api) = lookup(ENV_BASE_URL_API) {
            config.base_url_api = base_url_api;
        }

        config.validated()
    }

    fn validated(self) -> Result<Self, Error> {
        self.validate()
            .map_err(|e| Error::ConfigError(format!("Invalid configuration: {e}")))?;
        Ok(self)
    }

    /// Override the provisioning base URL.
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Override the REST API base URL.
    #[must_use]
    pub fn with_base_url_api(mut self, url: impl Into<String>) -> Self {
        self.base_url_api = url.into();
        self
    }

    /// Set whether to verify TLS certificates.
    #[must_use]
    pub const fn with_tls_verify(mut self, verify: bool) -> Self {
        self.tls_verify = verify;
        self
    }

    /// Set request timeout in seconds.
    #[must_use]
    pub const fn with_timeout(mut self, seconds: u64) -> Self {
        self.request_timeout_secs = seconds;
        self
    }

    /// Get the request timeout as a Duration.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// The API key in clear text, for header construction only.
    #[must_use]
    pub fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }

    /// Parse the provisioning base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot be parsed.
    pub fn parse_base_url(&self) -> Result<Url, Error> {
        Url::parse(&self.base_url)
            .map_err(|e| Error::ConfigError(format!("Invalid base URL: {e}")))
    }

    /// Parse the REST API base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot be parsed.
    pub fn parse_base_url_api(&self) -> Result<Url, Error> {
        Url::parse(&self.base_url_api)
            .map_err(|e| Error::ConfigError(format!("Invalid API base URL: {e}")))
    }
}
