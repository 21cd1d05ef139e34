//! Policy records returned by the policy v2 API.

use incapsula_core::ids::AccountId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Asset type accepted by the association endpoints.
pub const ASSET_TYPE_WEBSITE: &str = "WEBSITE";

/// Kind of a policy.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PolicyType {
    /// Access control list.
    Acl,
    /// Allow list.
    Whitelist,
    /// WAF rules. A site may carry at most one of these.
    WafRules,
    /// Any type this crate does not know about.
    Other(String),
}

impl PolicyType {
    /// Wire name of the type.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Acl => "ACL",
            Self::Whitelist => "WHITELIST",
            Self::WafRules => "WAF_RULES",
            Self::Other(other) => other,
        }
    }
}

impl Default for PolicyType {
    fn default() -> Self {
        Self::Other(String::new())
    }
}

impl From<String> for PolicyType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "ACL" => Self::Acl,
            "WHITELIST" => Self::Whitelist,
            "WAF_RULES" => Self::WafRules,
            _ => Self::Other(value),
        }
    }
}

impl From<PolicyType> for String {
    fn from(value: PolicyType) -> Self {
        match value {
            PolicyType::Other(other) => other,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for PolicyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A policy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Policy {
    /// Policy id.
    pub id: u64,
    /// Name.
    pub name: String,
    /// Description.
    pub description: String,
    /// Whether the policy is enabled.
    pub enabled: bool,
    /// Owning account.
    #[serde(alias = "account_id")]
    pub account_id: AccountId,
    /// Kind of policy.
    pub policy_type: PolicyType,
}

/// Answer of `policies/v2/policies/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyGetResponse {
    /// The policy.
    pub value: Policy,
    /// Set by the service when the lookup failed.
    #[serde(rename = "isError")]
    pub is_error: bool,
}
