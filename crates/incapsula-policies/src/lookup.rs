//! Policy lookup seam.

use crate::models::PolicyGetResponse;
use crate::Result;
use async_trait::async_trait;
use incapsula_core::ids::AccountId;

/// Fetches a policy by id.
///
/// Implemented by [`crate::PolicyClient`]; the validator only needs this much.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PolicyLookup: Send + Sync {
    /// Fetch one policy, optionally on behalf of a sub-account.
    async fn get_policy(
        &self,
        policy_id: &str,
        account_id: Option<AccountId>,
    ) -> Result<PolicyGetResponse>;
}
