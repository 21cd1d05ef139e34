//! The HTTP seam every Incapsula client talks through.
//!
//! [`Transport`] attaches the account credentials and executes one request, handing
//! back the status and raw body. Interpreting the body (result codes, JSON shapes) is
//! left to the API crates, which need the raw text for their error messages anyway.

use crate::form::Pairs;
use crate::Result;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use std::fmt;
use tracing::debug;
use url::Url;

/// Header carrying the API id.
pub const HEADER_API_ID: &str = "x-API-Id";
/// Header carrying the API key.
pub const HEADER_API_KEY: &str = "x-API-Key";

/// Logical operation a request belongs to, used to label log records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// `sites/add`
    CreateSite,
    /// `sites/status`
    ReadSite,
    /// `sites/configure` and the follow-up certificate check
    UpdateSite,
    /// `sites/delete`
    DeleteSite,
    /// Policy lookup
    ReadPolicy,
    /// Associate a policy with an asset
    CreatePolicyAssetAssociation,
    /// Check a policy/asset association
    ReadPolicyAssetAssociation,
    /// Remove a policy/asset association
    DeletePolicyAssetAssociation,
}

impl Operation {
    /// Stable name used in log fields.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::CreateSite => "create_site",
            Self::ReadSite => "read_site",
            Self::UpdateSite => "update_site",
            Self::DeleteSite => "delete_site",
            Self::ReadPolicy => "read_policy",
            Self::CreatePolicyAssetAssociation => "create_policy_asset_association",
            Self::ReadPolicyAssetAssociation => "read_policy_asset_association",
            Self::DeletePolicyAssetAssociation => "delete_policy_asset_association",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Status and body of a completed HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    /// HTTP status
    pub status: StatusCode,
    /// Response body as text
    pub body: String,
}

impl RawResponse {
    /// Create a response record.
    #[must_use]
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Whether the HTTP status is 2xx.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

/// Authenticated request execution.
///
/// Errors returned here are transport failures only; any HTTP status, including
/// 4xx/5xx, comes back as a [`RawResponse`].
#[async_trait]
pub trait Transport: Send + Sync {
    /// POST a form-encoded body.
    async fn post_form_with_headers(
        &self,
        url: Url,
        form: Pairs,
        operation: Operation,
    ) -> Result<RawResponse>;

    /// GET with query parameters.
    async fn get_with_headers(
        &self,
        url: Url,
        query: Pairs,
        operation: Operation,
    ) -> Result<RawResponse>;

    /// POST with query parameters and no body.
    async fn post_with_headers(
        &self,
        url: Url,
        query: Pairs,
        operation: Operation,
    ) -> Result<RawResponse>;

    /// DELETE with query parameters.
    async fn delete_with_headers(
        &self,
        url: Url,
        query: Pairs,
        operation: Operation,
    ) -> Result<RawResponse>;
}

/// reqwest-backed [`Transport`] sending the static API id/key headers.
#[derive(Clone)]
pub struct HttpTransport {
    http: Client,
    api_id: String,
    api_key: SecretString,
}

impl HttpTransport {
    /// Wrap a configured reqwest client.
    #[must_use]
    pub fn new(http: Client, api_id: impl Into<String>, api_key: SecretString) -> Self {
        Self {
            http,
            api_id: api_id.into(),
            api_key,
        }
    }

    async fn execute(&self, request: RequestBuilder, operation: Operation) -> Result<RawResponse> {
        let response = request
            .header(HEADER_API_ID, &self.api_id)
            .header(HEADER_API_KEY, self.api_key.expose_secret())
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        debug!(operation = %operation, %status, "Received Incapsula response");

        Ok(RawResponse { status, body })
    }
}

impl fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpTransport")
            .field("api_id", &self.api_id)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post_form_with_headers(
        &self,
        url: Url,
        form: Pairs,
        operation: Operation,
    ) -> Result<RawResponse> {
        debug!(operation = %operation, url = %url, "Sending Incapsula form request");
        self.execute(self.http.post(url).form(&form), operation)
            .await
    }

    async fn get_with_headers(
        &self,
        url: Url,
        query: Pairs,
        operation: Operation,
    ) -> Result<RawResponse> {
        debug!(operation = %operation, url = %url, ?query, "Sending Incapsula GET request");
        self.execute(self.http.get(url).query(&query), operation)
            .await
    }

    async fn post_with_headers(
        &self,
        url: Url,
        query: Pairs,
        operation: Operation,
    ) -> Result<RawResponse> {
        debug!(operation = %operation, url = %url, ?query, "Sending Incapsula POST request");
        self.execute(self.http.post(url).query(&query), operation)
            .await
    }

    async fn delete_with_headers(
        &self,
        url: Url,
        query: Pairs,
        operation: Operation,
    ) -> Result<RawResponse> {
        debug!(operation = %operation, url = %url, ?query, "Sending Incapsula DELETE request");
        self.execute(self.http.delete(url).query(&query), operation)
            .await
    }
}
