//! HTTP client settings and endpoint resolution.
//!
//! [`ServiceClient`] is the piece every API crate wraps: it owns the transport and
//! knows how to turn an endpoint path into a URL on either of the service's two
//! base URLs.

use crate::config::IncapsulaConfig;
use crate::transport::{HttpTransport, Transport};
use crate::{Error, Result};
use reqwest::ClientBuilder;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

const USER_AGENT: &str = concat!("incapsula-rust/", env!("CARGO_PKG_VERSION"));

/// Default connect timeout in seconds.
pub const DEFAULT_CONNECT_TIMEOUT: u64 = 10;

// Connection pool settings

/// Default idle timeout for connection pools
pub const DEFAULT_POOL_IDLE_TIMEOUT: u64 = 90;

/// Default maximum idle connections per host
pub const DEFAULT_POOL_MAX_IDLE_PER_HOST: usize = 10;

/// HTTP client configuration.
///
/// Configures connection behavior of the reqwest client behind [`HttpTransport`].
/// The request timeout itself comes from [`IncapsulaConfig`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Connect timeout
    pub connect_timeout: Duration,

    /// Connection pool idle timeout
    pub pool_idle_timeout: Duration,

    /// Maximum idle connections per host
    pub pool_max_idle_per_host: usize,

    /// Enable response compression
    pub enable_compression: bool,
}

impl ClientConfig {
    /// Create a new client configuration with default values.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT),
            pool_idle_timeout: Duration::from_secs(DEFAULT_POOL_IDLE_TIMEOUT),
            pool_max_idle_per_host: DEFAULT_POOL_MAX_IDLE_PER_HOST,
            enable_compression: true,
        }
    }

    /// Set connect timeout.
    #[must_use]
    pub const fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set connection pool idle timeout.
    #[must_use]
    pub const fn with_pool_idle_timeout(mut self, timeout: Duration) -> Self {
        self.pool_idle_timeout = timeout;
        self
    }

    /// Set maximum idle connections per host.
    #[must_use]
    pub const fn with_pool_max_idle(mut self, max: usize) -> Self {
        self.pool_max_idle_per_host = max;
        self
    }

    /// Enable or disable compression.
    #[must_use]
    pub const fn with_compression(mut self, enabled: bool) -> Self {
        self.enable_compression = enabled;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for [`ServiceClient`].
#[derive(Clone)]
pub struct ServiceClientBuilder {
    config: IncapsulaConfig,
    http_config: ClientConfig,
    transport: Option<Arc<dyn Transport>>,
}

impl ServiceClientBuilder {
    /// Create a new builder from an [`IncapsulaConfig`].
    #[must_use]
    pub fn new(config: IncapsulaConfig) -> Self {
        Self {
            config,
            http_config: ClientConfig::new(),
            transport: None,
        }
    }

    /// Override the HTTP client configuration used when building the transport.
    #[must_use]
    pub fn with_http_config(mut self, http_config: ClientConfig) -> Self {
        self.http_config = http_config;
        self
    }

    /// Use a caller-provided transport instead of building one.
    #[must_use]
    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Finalise the builder and create the [`ServiceClient`].
    pub fn build(self) -> Result<ServiceClient> {
        let base_url = self.config.parse_base_url()?;
        let base_url_api = self.config.parse_base_url_api()?;

        let transport = match self.transport {
            Some(transport) => transport,
            None => Arc::new(build_http_transport(&self.config, &self.http_config)?),
        };

        Ok(ServiceClient {
            transport,
            base_url,
            base_url_api,
        })
    }
}

impl fmt::Debug for ServiceClientBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceClientBuilder")
            .field("config", &self.config)
            .field("http_config", &self.http_config)
            .field("custom_transport", &self.transport.is_some())
            .finish()
    }
}

fn build_http_transport(
    config: &IncapsulaConfig,
    http_config: &ClientConfig,
) -> Result<HttpTransport> {
    let mut builder = ClientBuilder::new()
        .user_agent(USER_AGENT)
        .timeout(config.timeout())
        .connect_timeout(http_config.connect_timeout)
        .pool_idle_timeout(http_config.pool_idle_timeout)
        .pool_max_idle_per_host(http_config.pool_max_idle_per_host)
        .gzip(http_config.enable_compression);

    if !config.tls_verify {
        warn!("TLS verification disabled for Incapsula client");
        builder = builder.danger_accept_invalid_certs(true);
    }

    debug!(base_url = %config.base_url, base_url_api = %config.base_url_api, "Building Incapsula HTTP client");
    let http = builder
        .build()
        .map_err(|err| Error::ConfigError(format!("Failed to build HTTP client: {err}")))?;

    Ok(HttpTransport::new(
        http,
        config.api_id.clone(),
        config.api_key.clone(),
    ))
}

/// Transport plus the two base URLs of the service.
#[derive(Clone)]
pub struct ServiceClient {
    transport: Arc<dyn Transport>,
    base_url: Url,
    base_url_api: Url,
}

impl ServiceClient {
    /// Construct a client directly from the configuration.
    pub fn from_config(config: &IncapsulaConfig) -> Result<Self> {
        ServiceClientBuilder::new(config.clone()).build()
    }

    /// Start a builder pre-populated with the provided configuration.
    #[must_use]
    pub fn builder(config: IncapsulaConfig) -> ServiceClientBuilder {
        ServiceClientBuilder::new(config)
    }

    /// Assemble a client from parts.
    #[must_use]
    pub fn with_transport(transport: Arc<dyn Transport>, base_url: Url, base_url_api: Url) -> Self {
        Self {
            transport,
            base_url,
            base_url_api,
        }
    }

    /// The transport requests go through.
    #[must_use]
    pub fn transport(&self) -> &dyn Transport {
        self.transport.as_ref()
    }

    /// Provisioning API base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// REST API base URL.
    #[must_use]
    pub fn base_url_api(&self) -> &Url {
        &self.base_url_api
    }

    /// Resolve a path against the provisioning base URL.
    pub fn endpoint(&self, path: &str) -> Result<Url> {
        join(&self.base_url, path)
    }

    /// Resolve a path against the REST API base URL.
    pub fn api_endpoint(&self, path: &str) -> Result<Url> {
        join(&self.base_url_api, path)
    }

    /// Append `segments` to the REST API base URL, each percent-encoded as a
    /// single path segment.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidEndpoint`] for empty, `.` or `..` segments, which
    /// cannot be addressed as one segment.
    pub fn api_endpoint_segments(&self, segments: &[&str]) -> Result<Url> {
        push_segments(&self.base_url_api, segments)
    }
}

impl fmt::Debug for ServiceClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceClient")
            .field("base_url", &self.base_url.as_str())
            .field("base_url_api", &self.base_url_api.as_str())
            .finish_non_exhaustive()
    }
}

// `Url::join` would drop the last segment of a base without a trailing slash
// (`.../prov/v1` + `sites/add`), so paths are appended textually.
fn join(base: &Url, path: &str) -> Result<Url> {
    let full = format!(
        "{}/{}",
        base.as_str().trim_end_matches('/'),
        path.trim_start_matches('/')
    );
    Url::parse(&full).map_err(|err| Error::InvalidEndpoint(format!("Invalid path `{path}`: {err}")))
}

fn push_segments(base: &Url, segments: &[&str]) -> Result<Url> {
    if let Some(bad) = segments
        .iter()
        .find(|segment| matches!(**segment, "" | "." | ".."))
    {
        return Err(Error::InvalidEndpoint(format!("Invalid path segment `{bad}`")));
    }

    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|()| Error::InvalidEndpoint(format!("{base} cannot take a path")))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> IncapsulaConfig {
        IncapsulaConfig::new("1", "key")
            .unwrap()
            .with_base_url("http://localhost:9000/api/prov/v1")
            .with_base_url_api("http://localhost:9001/")
    }

    #[test]
    fn test_client_config_new() {
        let config = ClientConfig::new();
        assert_eq!(config.connect_timeout, Duration::from_secs(10));
        assert_eq!(config.pool_idle_timeout, Duration::from_secs(90));
        assert_eq!(config.pool_max_idle_per_host, 10);
        assert!(config.enable_compression);
    }

    #[test]
    fn test_client_config_builder() {
        let config = ClientConfig::default()
            .with_connect_timeout(Duration::from_secs(3))
            .with_pool_idle_timeout(Duration::from_secs(120))
            .with_pool_max_idle(20)
            .with_compression(false);

        assert_eq!(config.connect_timeout, Duration::from_secs(3));
        assert_eq!(config.pool_idle_timeout, Duration::from_secs(120));
        assert_eq!(config.pool_max_idle_per_host, 20);
        assert!(!config.enable_compression);
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let client = ServiceClient::from_config(&config()).unwrap();
        assert_eq!(
            client.endpoint("sites/add").unwrap().as_str(),
            "http://localhost:9000/api/prov/v1/sites/add"
        );
        assert_eq!(
            client
                .api_endpoint("certificates-ui/v3/certificates")
                .unwrap()
                .as_str(),
            "http://localhost:9001/certificates-ui/v3/certificates"
        );
    }

    #[test]
    fn test_endpoint_segments_are_encoded() {
        let client = ServiceClient::from_config(&config()).unwrap();
        let url = client
            .api_endpoint_segments(&["policies", "v2", "assets", "../../x?y=#z", "policies"])
            .unwrap();
        assert_eq!(url.host_str(), Some("localhost"));
        assert_eq!(url.query(), None);
        assert_eq!(url.fragment(), None);
        assert_eq!(url.path_segments().unwrap().count(), 5);
        assert!(url.path().starts_with("/policies/v2/assets/..%2F..%2Fx%3Fy=%23z/"));
    }

    #[test]
    fn test_endpoint_segments_reject_dot_segments() {
        let client = ServiceClient::from_config(&config()).unwrap();
        for bad in ["", ".", ".."] {
            let err = client
                .api_endpoint_segments(&["policies", bad])
                .unwrap_err();
            assert!(matches!(err, Error::InvalidEndpoint(_)), "{bad:?}");
        }
    }

    #[test]
    fn test_builder_accepts_custom_transport() {
        let base = ServiceClient::from_config(&config()).unwrap();
        let transport: Arc<dyn Transport> = Arc::new(HttpTransport::new(
            reqwest::Client::new(),
            "other",
            config().api_key,
        ));
        let client = ServiceClient::builder(config())
            .with_transport(transport)
            .build()
            .unwrap();
        assert_eq!(client.base_url(), base.base_url());
    }

    #[test]
    fn test_debug_omits_credentials() {
        let client = ServiceClient::from_config(&config()).unwrap();
        let debug = format!("{client:?}");
        assert!(debug.contains("localhost:9000"));
        assert!(!debug.contains("key"));
    }
}
