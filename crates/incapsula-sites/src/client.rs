//! Asynchronous client for the `sites/*` provisioning endpoints.

use crate::models::{
    AddSiteRequest, CertificateCheckResponse, SiteAddResponse, SiteDeleteResponse,
    SiteStatusResponse, SiteUpdateResponse, PARAM_DOMAIN_VALIDATION,
};
use crate::Result;
use incapsula_core::client::{ClientConfig, ServiceClient, ServiceClientBuilder};
use incapsula_core::config::IncapsulaConfig;
use incapsula_core::form::FormParams;
use incapsula_core::ids::SiteId;
use incapsula_core::transport::{Operation, Transport};
use incapsula_core::Error;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{debug, info, warn};

const ENDPOINT_SITE_ADD: &str = "sites/add";
const ENDPOINT_SITE_STATUS: &str = "sites/status";
const ENDPOINT_SITE_UPDATE: &str = "sites/configure";
const ENDPOINT_SITE_DELETE: &str = "sites/delete";
const ENDPOINT_CERT_DETAILS: &str = "certificates-ui/v3/certificates";

/// Failure of [`SiteClient::site_status`].
///
/// When the service answered with a non-zero result code the decoded body is kept
/// in `response`, so fields such as `exception_id` remain inspectable.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{source}")]
pub struct SiteStatusError {
    /// Partially populated status, present for result-code failures.
    pub response: Option<Box<SiteStatusResponse>>,
    /// Underlying error.
    #[source]
    pub source: Error,
}

impl From<Error> for SiteStatusError {
    fn from(source: Error) -> Self {
        Self {
            response: None,
            source,
        }
    }
}

impl From<SiteStatusError> for Error {
    fn from(err: SiteStatusError) -> Self {
        err.source
    }
}

/// Builder for [`SiteClient`].
#[derive(Debug, Clone)]
pub struct SiteClientBuilder {
    inner: ServiceClientBuilder,
}

impl SiteClientBuilder {
    /// Create a new builder from an [`IncapsulaConfig`].
    #[must_use]
    pub fn new(config: IncapsulaConfig) -> Self {
        Self {
            inner: ServiceClientBuilder::new(config),
        }
    }

    /// Override the HTTP client configuration used when building the client.
    #[must_use]
    pub fn with_http_config(mut self, http_config: ClientConfig) -> Self {
        self.inner = self.inner.with_http_config(http_config);
        self
    }

    /// Send requests through a caller-provided transport.
    #[must_use]
    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.inner = self.inner.with_transport(transport);
        self
    }

    /// Finalise the builder and create the [`SiteClient`].
    pub fn build(self) -> Result<SiteClient> {
        Ok(SiteClient {
            inner: self.inner.build()?,
        })
    }
}

/// Asynchronous client for site provisioning.
#[derive(Debug, Clone)]
pub struct SiteClient {
    inner: ServiceClient,
}

impl SiteClient {
    /// Construct a client directly from the configuration.
    pub fn from_config(config: &IncapsulaConfig) -> Result<Self> {
        SiteClientBuilder::new(config.clone()).build()
    }

    /// Start a builder pre-populated with the provided configuration.
    #[must_use]
    pub fn builder(config: IncapsulaConfig) -> SiteClientBuilder {
        SiteClientBuilder::new(config)
    }

    /// Wrap an already configured [`ServiceClient`].
    #[must_use]
    pub fn from_service_client(inner: ServiceClient) -> Self {
        Self { inner }
    }

    /// Underlying service client.
    #[must_use]
    pub fn service(&self) -> &ServiceClient {
        &self.inner
    }

    /// Onboard a new site.
    pub async fn add_site(&self, request: &AddSiteRequest) -> Result<SiteAddResponse> {
        let domain = &request.domain;
        info!(
            domain = %domain,
            account_id = ?request.account_id,
            "Adding Incapsula site"
        );

        let url = self.inner.endpoint(ENDPOINT_SITE_ADD)?;
        let raw = self
            .inner
            .transport()
            .post_form_with_headers(url, request.to_form(), Operation::CreateSite)
            .await
            .map_err(|err| Error::transport(format!("Error adding site for domain {domain}"), err))?;
        debug!(body = %raw.body, "Incapsula add site JSON response");

        let response: SiteAddResponse = decode(
            &raw.body,
            format!("Error parsing add site JSON response for domain {domain}"),
        )?;
        if !response.res.is_success() {
            return Err(Error::remote(
                format!("Error from Incapsula service when adding site for domain {domain}"),
                raw.body,
            ));
        }

        info!(domain = %domain, site_id = %response.site_id, "Added Incapsula site");
        Ok(response)
    }

    /// Read the full status record of a site.
    pub async fn site_status(
        &self,
        domain: &str,
        site_id: SiteId,
    ) -> std::result::Result<SiteStatusResponse, SiteStatusError> {
        info!(domain = %domain, site_id = %site_id, "Getting Incapsula site status");

        let url = self.inner.endpoint(ENDPOINT_SITE_STATUS)?;
        let form = FormParams::new().with("site_id", site_id).into_pairs();
        let raw = self
            .inner
            .transport()
            .post_form_with_headers(url, form, Operation::ReadSite)
            .await
            .map_err(|err| {
                Error::transport(
                    format!("Error getting site status for domain {domain} (site id: {site_id})"),
                    err,
                )
            })?;
        debug!(body = %raw.body, "Incapsula site status JSON response");

        let response: SiteStatusResponse = decode(
            &raw.body,
            format!(
                "Error parsing site status JSON response for domain {domain} (site id: {site_id})"
            ),
        )?;
        if !response.res.is_success() {
            return Err(SiteStatusError {
                response: Some(Box::new(response)),
                source: Error::remote(
                    format!(
                        "Error from Incapsula service when getting site status for domain {domain} (site id: {site_id})"
                    ),
                    raw.body,
                ),
            });
        }

        Ok(response)
    }

    /// Change one setting of a site.
    ///
    /// `domain_validation` may answer with result code `1` when an existing
    /// wildcard certificate is reused. In that case the site's certificates are
    /// checked and the update is accepted if any SAN is past user action.
    pub async fn update_site(
        &self,
        site_id: SiteId,
        param: &str,
        value: &str,
    ) -> Result<SiteUpdateResponse> {
        info!(site_id = %site_id, param = %param, "Updating Incapsula site");

        let url = self.inner.endpoint(ENDPOINT_SITE_UPDATE)?;
        let form = FormParams::new()
            .with("site_id", site_id)
            .with("param", param)
            .with("value", value)
            .into_pairs();
        let raw = self
            .inner
            .transport()
            .post_form_with_headers(url, form, Operation::UpdateSite)
            .await
            .map_err(|err| {
                Error::transport(
                    format!("Error updating param ({param}) with value ({value}) on site_id: {site_id}"),
                    err,
                )
            })?;
        debug!(body = %raw.body, "Incapsula update site JSON response");

        let response: SiteUpdateResponse = decode(
            &raw.body,
            format!("Error parsing update site JSON response for siteID {site_id}"),
        )?;
        if response.res.is_success() {
            return Ok(response);
        }

        if response.res.is(1)
            && param == PARAM_DOMAIN_VALIDATION
            && self.certificate_already_covers(site_id).await?
        {
            warn!(
                site_id = %site_id,
                "Accepting domain_validation result code 1, an existing certificate covers the site"
            );
            return Ok(response);
        }

        Err(Error::remote(
            format!("Error from Incapsula service when updating site for siteID {site_id}"),
            raw.body,
        ))
    }

    /// Remove a site, skipping the grace period.
    pub async fn delete_site(&self, domain: &str, site_id: SiteId) -> Result<()> {
        info!(domain = %domain, site_id = %site_id, "Deleting Incapsula site");

        let url = self.inner.endpoint(ENDPOINT_SITE_DELETE)?;
        let form = FormParams::new()
            .with("site_id", site_id)
            .with("ignore_grace_period", true)
            .into_pairs();
        let raw = self
            .inner
            .transport()
            .post_form_with_headers(url, form, Operation::DeleteSite)
            .await
            .map_err(|err| {
                Error::transport(
                    format!("Error deleting site for domain {domain} (site id: {site_id})"),
                    err,
                )
            })?;
        debug!(body = %raw.body, "Incapsula delete site JSON response");

        let response: SiteDeleteResponse = decode(
            &raw.body,
            format!(
                "Error parsing delete site JSON response for domain {domain} (site id: {site_id})"
            ),
        )?;
        if !response.res.is_success() {
            return Err(Error::remote(
                format!(
                    "Error from Incapsula service when deleting site for domain {domain} (site id: {site_id})"
                ),
                raw.body,
            ));
        }

        info!(domain = %domain, site_id = %site_id, "Deleted Incapsula site");
        Ok(())
    }

    async fn certificate_already_covers(&self, site_id: SiteId) -> Result<bool> {
        let url = self.inner.api_endpoint(ENDPOINT_CERT_DETAILS)?;
        let query = FormParams::new().with("extSiteId", site_id).into_pairs();
        let raw = self
            .inner
            .transport()
            .get_with_headers(url, query, Operation::UpdateSite)
            .await
            .map_err(|err| {
                Error::transport(format!("Error checking certificate on site_id: {site_id}"), err)
            })?;
        debug!(body = %raw.body, "Incapsula check certificate JSON response");

        let certificates: CertificateCheckResponse = decode(
            &raw.body,
            format!("Error parsing check certificate JSON response for siteID {site_id}"),
        )?;
        Ok(certificates.has_active_san())
    }
}

fn decode<T: DeserializeOwned>(body: &str, context: String) -> Result<T> {
    serde_json::from_str(body).map_err(|err| Error::decode(context, err, body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use incapsula_core::ids::AccountId;
    use serde_json::json;
    use wiremock::matchers::{body_string_contains, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> SiteClient {
        let config = IncapsulaConfig::new("1234", "secret")
            .unwrap()
            .with_base_url(format!("{}/api/prov/v1", server.uri()))
            .with_base_url_api(server.uri());
        SiteClient::from_config(&config).unwrap()
    }

    async fn mount_post(server: &MockServer, endpoint: &str, body: serde_json::Value) {
        Mock::given(method("POST"))
            .and(path(format!("/api/prov/v1/{endpoint}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(server)
            .await;
    }

    async fn mount_certificates(server: &MockServer, body: serde_json::Value) {
        Mock::given(method("GET"))
            .and(path("/certificates-ui/v3/certificates"))
            .and(query_param("extSiteId", "123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .expect(1)
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn add_site_returns_new_id() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/prov/v1/sites/add"))
            .and(body_string_contains("domain=example.com"))
            .and(body_string_contains("account_id=55"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"site_id": 123, "res": 0})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let request = AddSiteRequest::new("example.com").with_account_id(AccountId::new(55));
        let response = client(&server).add_site(&request).await.unwrap();
        assert_eq!(response.site_id, SiteId::new(123));
    }

    #[tokio::test]
    async fn add_site_rejects_non_zero_code() {
        let server = MockServer::start().await;
        mount_post(&server, "sites/add", json!({"res": 2, "res_message": "Invalid input"})).await;

        let err = client(&server)
            .add_site(&AddSiteRequest::new("example.com"))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Remote { .. }));
        let message = err.to_string();
        assert!(message.contains("when adding site for domain example.com"));
        assert!(message.contains("Invalid input"));
    }

    #[tokio::test]
    async fn add_site_reports_malformed_json() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/prov/v1/sites/add"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let err = client(&server)
            .add_site(&AddSiteRequest::new("example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Decode { .. }));
        assert!(err
            .to_string()
            .contains("Error parsing add site JSON response for domain example.com"));
        assert_eq!(err.body(), Some("<html>"));
    }

    #[tokio::test]
    async fn add_site_reports_unreachable_service() {
        let server = MockServer::start().await;
        let client = client(&server);
        drop(server);

        let err = client
            .add_site(&AddSiteRequest::new("example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Transport { .. }));
        assert!(err.to_string().starts_with("Error adding site for domain example.com"));
    }

    #[tokio::test]
    async fn site_status_accepts_string_and_numeric_zero() {
        for res in [json!(0), json!("0")] {
            let server = MockServer::start().await;
            mount_post(
                &server,
                "sites/status",
                json!({"site_id": 123, "domain": "example.com", "res": res}),
            )
            .await;

            let status = client(&server)
                .site_status("example.com", SiteId::new(123))
                .await
                .unwrap();
            assert_eq!(status.domain, "example.com");
        }
    }

    #[tokio::test]
    async fn site_status_failure_keeps_partial_response() {
        let server = MockServer::start().await;
        mount_post(
            &server,
            "sites/status",
            json!({"res": "9413", "res_message": "Unknown site", "exception_id": "abc"}),
        )
        .await;

        let err = client(&server)
            .site_status("example.com", SiteId::new(123))
            .await
            .unwrap_err();

        let partial = err.response.as_deref().unwrap();
        assert_eq!(partial.exception_id, "abc");
        assert_eq!(partial.res.as_str(), "9413");
        assert!(err.to_string().contains("(site id: 123)"));

        let core: Error = err.into();
        assert!(matches!(core, Error::Remote { .. }));
    }

    #[tokio::test]
    async fn site_status_decode_failure_has_no_response() {
        let server = MockServer::start().await;
        mount_post(&server, "sites/status", json!({"res": null})).await;

        let err = client(&server)
            .site_status("example.com", SiteId::new(123))
            .await
            .unwrap_err();
        assert!(err.response.is_none());
        assert!(matches!(err.source, Error::Decode { .. }));
    }

    #[tokio::test]
    async fn update_site_posts_param_and_value() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/prov/v1/sites/configure"))
            .and(body_string_contains("site_id=123"))
            .and(body_string_contains("param=active"))
            .and(body_string_contains("value=bypass"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"site_id": 123, "res": 0})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let response = client(&server)
            .update_site(SiteId::new(123), "active", "bypass")
            .await
            .unwrap();
        assert!(response.res.is_success());
    }

    #[tokio::test]
    async fn update_site_tolerates_reused_wildcard_certificate() {
        let server = MockServer::start().await;
        mount_post(&server, "sites/configure", json!({"site_id": 123, "res": 1})).await;
        mount_certificates(
            &server,
            json!({"data": [{"sans": [
                {"status": "PENDING_USER_ACTION"},
                {"status": "VALIDATED"}
            ]}]}),
        )
        .await;

        let response = client(&server)
            .update_site(SiteId::new(123), PARAM_DOMAIN_VALIDATION, "dns")
            .await
            .unwrap();
        assert!(response.res.is(1));
    }

    #[tokio::test]
    async fn update_site_fails_when_all_sans_pending() {
        let server = MockServer::start().await;
        mount_post(&server, "sites/configure", json!({"site_id": 123, "res": 1})).await;
        mount_certificates(
            &server,
            json!({"data": [{"sans": [{"status": "PENDING_USER_ACTION"}]}]}),
        )
        .await;

        let err = client(&server)
            .update_site(SiteId::new(123), PARAM_DOMAIN_VALIDATION, "dns")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Remote { .. }));
        assert!(err.to_string().contains("updating site for siteID 123"));
    }

    #[tokio::test]
    async fn update_site_fails_without_certificates() {
        let server = MockServer::start().await;
        mount_post(&server, "sites/configure", json!({"site_id": 123, "res": 1})).await;
        mount_certificates(&server, json!({"data": []})).await;

        let err = client(&server)
            .update_site(SiteId::new(123), PARAM_DOMAIN_VALIDATION, "dns")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Remote { .. }));
    }

    #[tokio::test]
    async fn update_site_surfaces_certificate_decode_failure() {
        let server = MockServer::start().await;
        mount_post(&server, "sites/configure", json!({"site_id": 123, "res": 1})).await;
        Mock::given(method("GET"))
            .and(path("/certificates-ui/v3/certificates"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let err = client(&server)
            .update_site(SiteId::new(123), PARAM_DOMAIN_VALIDATION, "dns")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Decode { .. }));
        assert!(err
            .to_string()
            .contains("Error parsing check certificate JSON response for siteID 123"));
    }

    #[tokio::test]
    async fn update_site_code_one_on_other_param_skips_certificate_check() {
        let server = MockServer::start().await;
        mount_post(&server, "sites/configure", json!({"site_id": 123, "res": 1})).await;
        Mock::given(method("GET"))
            .and(path("/certificates-ui/v3/certificates"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
            .expect(0)
            .mount(&server)
            .await;

        let err = client(&server)
            .update_site(SiteId::new(123), "active", "bypass")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Remote { .. }));
    }

    #[tokio::test]
    async fn delete_site_skips_grace_period() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/prov/v1/sites/delete"))
            .and(body_string_contains("site_id=123"))
            .and(body_string_contains("ignore_grace_period=true"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"res": 0, "res_message": "OK"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        client(&server)
            .delete_site("example.com", SiteId::new(123))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn delete_site_rejects_non_zero_code() {
        let server = MockServer::start().await;
        mount_post(&server, "sites/delete", json!({"res": 9413, "res_message": "Unknown site"}))
            .await;

        let err = client(&server)
            .delete_site("example.com", SiteId::new(123))
            .await
            .unwrap_err();
        assert!(err
            .to_string()
            .contains("when deleting site for domain example.com (site id: 123)"));
    }
}
