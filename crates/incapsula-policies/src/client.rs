//! Asynchronous client for the policy v2 endpoints.

use crate::lookup::PolicyLookup;
use crate::models::PolicyGetResponse;
use crate::Result;
use async_trait::async_trait;
use incapsula_core::client::{ClientConfig, ServiceClient, ServiceClientBuilder};
use incapsula_core::config::IncapsulaConfig;
use incapsula_core::form::{FormParams, Pairs};
use incapsula_core::ids::AccountId;
use incapsula_core::transport::{Operation, RawResponse, Transport};
use incapsula_core::Error;
use reqwest::{StatusCode, Url};
use std::sync::Arc;
use tracing::{debug, info};

/// Builder for [`PolicyClient`].
#[derive(Debug, Clone)]
pub struct PolicyClientBuilder {
    inner: ServiceClientBuilder,
}

impl PolicyClientBuilder {
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

    /// Finalise the builder and create the [`PolicyClient`].
    pub fn build(self) -> Result<PolicyClient> {
        Ok(PolicyClient {
            inner: self.inner.build()?,
        })
    }
}

/// Asynchronous client for policies and their asset associations.
#[derive(Debug, Clone)]
pub struct PolicyClient {
    inner: ServiceClient,
}

impl PolicyClient {
    /// Construct a client directly from the configuration.
    pub fn from_config(config: &IncapsulaConfig) -> Result<Self> {
        PolicyClientBuilder::new(config.clone()).build()
    }

    /// Start a builder pre-populated with the provided configuration.
    #[must_use]
    pub fn builder(config: IncapsulaConfig) -> PolicyClientBuilder {
        PolicyClientBuilder::new(config)
    }

    /// Wrap an already configured [`ServiceClient`].
    #[must_use]
    pub fn from_service_client(inner: ServiceClient) -> Self {
        Self { inner }
    }

    /// Attach a policy to an asset.
    pub async fn add_policy_asset_association(
        &self,
        policy_id: &str,
        asset_id: &str,
        asset_type: &str,
        account_id: Option<AccountId>,
    ) -> Result<()> {
        info!(
            policy_id,
            asset_id,
            asset_type,
            ?account_id,
            "Adding Incapsula policy asset association"
        );

        let url = self.association_url(policy_id, asset_id, asset_type)?;
        let raw = self
            .inner
            .transport()
            .post_with_headers(
                url,
                caid(account_id),
                Operation::CreatePolicyAssetAssociation,
            )
            .await
            .map_err(|err| {
                Error::transport(
                    format!("Error adding policy {policy_id} to asset {asset_id} ({asset_type})"),
                    err,
                )
            })?;
        debug!(status = %raw.status, body = %raw.body, "Incapsula add policy asset association response");

        expect_success(
            raw,
            format!(
                "Error from Incapsula service when adding policy {policy_id} to asset {asset_id} ({asset_type})"
            ),
        )
    }

    /// Whether a policy is attached to an asset. A 404 means it is not.
    pub async fn is_policy_asset_associated(
        &self,
        policy_id: &str,
        asset_id: &str,
        asset_type: &str,
        account_id: Option<AccountId>,
    ) -> Result<bool> {
        let url = self.association_url(policy_id, asset_id, asset_type)?;
        let raw = self
            .inner
            .transport()
            .get_with_headers(url, caid(account_id), Operation::ReadPolicyAssetAssociation)
            .await
            .map_err(|err| {
                Error::transport(
                    format!(
                        "Error checking association of policy {policy_id} with asset {asset_id} ({asset_type})"
                    ),
                    err,
                )
            })?;
        debug!(status = %raw.status, body = %raw.body, "Incapsula policy asset association response");

        match raw.status {
            StatusCode::OK => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            _ => Err(Error::remote(
                format!(
                    "Error from Incapsula service when checking association of policy {policy_id} with asset {asset_id} ({asset_type}), status {}",
                    raw.status
                ),
                raw.body,
            )),
        }
    }

    /// Detach a policy from an asset.
    pub async fn delete_policy_asset_association(
        &self,
        policy_id: &str,
        asset_id: &str,
        asset_type: &str,
        account_id: Option<AccountId>,
    ) -> Result<()> {
        info!(
            policy_id,
            asset_id,
            asset_type,
            ?account_id,
            "Deleting Incapsula policy asset association"
        );

        let url = self.association_url(policy_id, asset_id, asset_type)?;
        let raw = self
            .inner
            .transport()
            .delete_with_headers(
                url,
                caid(account_id),
                Operation::DeletePolicyAssetAssociation,
            )
            .await
            .map_err(|err| {
                Error::transport(
                    format!("Error deleting policy {policy_id} from asset {asset_id} ({asset_type})"),
                    err,
                )
            })?;
        debug!(status = %raw.status, body = %raw.body, "Incapsula delete policy asset association response");

        expect_success(
            raw,
            format!(
                "Error from Incapsula service when deleting policy {policy_id} from asset {asset_id} ({asset_type})"
            ),
        )
    }

    /// Fetch a policy with its extended settings.
    pub async fn get_policy(
        &self,
        policy_id: &str,
        account_id: Option<AccountId>,
    ) -> Result<PolicyGetResponse> {
        info!(policy_id, ?account_id, "Getting Incapsula policy");

        let url = self
            .inner
            .api_endpoint_segments(&["policies", "v2", "policies", policy_id])?;
        let mut query = FormParams::new().with("extended", true);
        query.push_opt("caid", account_id.filter(|id| !id.is_zero()));
        let raw = self
            .inner
            .transport()
            .get_with_headers(url, query.into_pairs(), Operation::ReadPolicy)
            .await
            .map_err(|err| Error::transport(format!("Error getting policy {policy_id}"), err))?;
        debug!(status = %raw.status, body = %raw.body, "Incapsula get policy JSON response");

        if !raw.is_success() {
            return Err(Error::remote(
                format!(
                    "Error from Incapsula service when getting policy {policy_id}, status {}",
                    raw.status
                ),
                raw.body,
            ));
        }

        let response: PolicyGetResponse = serde_json::from_str(&raw.body).map_err(|err| {
            Error::decode(
                format!("Error parsing get policy JSON response for policy {policy_id}"),
                err,
                raw.body.as_str(),
            )
        })?;
        if response.is_error {
            return Err(Error::remote(
                format!("Error from Incapsula service when getting policy {policy_id}"),
                raw.body,
            ));
        }

        Ok(response)
    }

    fn association_url(
        &self,
        policy_id: &str,
        asset_id: &str,
        asset_type: &str,
    ) -> Result<Url> {
        self.inner.api_endpoint_segments(&[
            "policies", "v2", "assets", asset_type, asset_id, "policies", policy_id,
        ])
    }
}

#[async_trait]
impl PolicyLookup for PolicyClient {
    async fn get_policy(
        &self,
        policy_id: &str,
        account_id: Option<AccountId>,
    ) -> Result<PolicyGetResponse> {
        PolicyClient::get_policy(self, policy_id, account_id).await
    }
}

fn caid(account_id: Option<AccountId>) -> Pairs {
    let mut query = FormParams::new();
    query.push_opt("caid", account_id.filter(|id| !id.is_zero()));
    query.into_pairs()
}

fn expect_success(raw: RawResponse, context: String) -> Result<()> {
    if raw.is_success() {
        Ok(())
    } else {
        Err(Error::remote(format!("{context}, status {}", raw.status), raw.body))
    }
}
