//! Plan-time check that no asset ends up with two WAF policies.

use crate::lookup::PolicyLookup;
use crate::models::PolicyType;
use crate::resource::RESOURCE_TYPE;
use crate::Result;
use incapsula_core::Error;
use std::collections::{HashMap, HashSet};
use tracing::{debug, error};

/// One resource from the configuration about to be applied.
///
/// Attributes that are not known yet at plan time are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlannedResource {
    /// Resource type name.
    pub resource_type: String,
    /// Planned `policy_id`.
    pub policy_id: Option<String>,
    /// Planned `asset_id`.
    pub asset_id: Option<String>,
}

impl PlannedResource {
    /// A planned policy-asset association.
    #[must_use]
    pub fn association(policy_id: impl Into<String>, asset_id: impl Into<String>) -> Self {
        Self {
            resource_type: RESOURCE_TYPE.to_string(),
            policy_id: Some(policy_id.into()),
            asset_id: Some(asset_id.into()),
        }
    }
}

/// Reject a plan in which one asset is associated with more than one
/// `WAF_RULES` policy.
///
/// Each distinct policy is looked up once. Lookup failures abort validation.
/// An absent plan passes.
pub async fn validate_unique_waf_assignment<L>(
    lookup: &L,
    planned: Option<&[PlannedResource]>,
) -> Result<()>
where
    L: PolicyLookup + ?Sized,
{
    let Some(planned) = planned else {
        return Ok(());
    };

    let mut policy_types: HashMap<&str, PolicyType> = HashMap::new();
    let mut waf_assets: HashSet<&str> = HashSet::new();

    for resource in planned {
        if resource.resource_type != RESOURCE_TYPE {
            continue;
        }
        let (Some(policy_id), Some(asset_id)) =
            (resource.policy_id.as_deref(), resource.asset_id.as_deref())
        else {
            debug!(?resource, "Skipping association with unknown attributes");
            continue;
        };

        let policy_type = match policy_types.get(policy_id) {
            Some(known) => known.clone(),
            None => {
                let response = lookup.get_policy(policy_id, None).await.map_err(|err| {
                    error!(policy_id, error = %err, "Could not get Incapsula policy");
                    err
                })?;
                let policy_type = response.value.policy_type;
                policy_types.insert(policy_id, policy_type.clone());
                policy_type
            }
        };
        debug!(policy_id, asset_id, %policy_type, "Checking planned policy asset association");

        if policy_type == PolicyType::WafRules && !waf_assets.insert(asset_id) {
            return Err(Error::PolicyConflict {
                asset_id: asset_id.to_string(),
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lookup::MockPolicyLookup;
    use crate::models::{Policy, PolicyGetResponse};

    fn policy_type_of(policy_id: &str) -> PolicyType {
        match policy_id {
            "10" | "11" => PolicyType::WafRules,
            "20" => PolicyType::Acl,
            _ => PolicyType::Whitelist,
        }
    }

    fn lookup() -> MockPolicyLookup {
        let mut lookup = MockPolicyLookup::new();
        lookup.expect_get_policy().returning(|policy_id, account_id| {
            assert!(account_id.is_none());
            Ok(PolicyGetResponse {
                value: Policy {
                    policy_type: policy_type_of(policy_id),
                    ..Policy::default()
                },
                is_error: false,
            })
        });
        lookup
    }

    #[tokio::test]
    async fn rejects_two_waf_policies_on_one_site() {
        let planned = vec![
            PlannedResource::association("10", "7654321"),
            PlannedResource::association("20", "7654321"),
            PlannedResource::association("11", "7654321"),
        ];

        let err = validate_unique_waf_assignment(&lookup(), Some(planned.as_slice()))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            Error::PolicyConflict {
                asset_id: "7654321".to_string()
            }
        );
        assert_eq!(
            err.to_string(),
            "site 7654321 has more than one WAF Policy assigned"
        );
    }

    #[tokio::test]
    async fn accepts_one_waf_policy_per_site() {
        let planned = vec![
            PlannedResource::association("10", "1"),
            PlannedResource::association("11", "2"),
            PlannedResource::association("20", "1"),
            PlannedResource::association("30", "1"),
        ];

        validate_unique_waf_assignment(&lookup(), Some(planned.as_slice()))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn non_waf_policies_may_repeat() {
        let planned = vec![
            PlannedResource::association("20", "1"),
            PlannedResource::association("20", "1"),
        ];

        validate_unique_waf_assignment(&lookup(), Some(planned.as_slice()))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn absent_plan_skips_lookups() {
        let mut lookup = MockPolicyLookup::new();
        lookup.expect_get_policy().never();

        validate_unique_waf_assignment(&lookup, None).await.unwrap();
    }

    #[tokio::test]
    async fn ignores_other_resources_and_unknown_attributes() {
        let mut lookup = MockPolicyLookup::new();
        lookup.expect_get_policy().never();

        let planned = vec![
            PlannedResource {
                resource_type: "incapsula_site".to_string(),
                policy_id: Some("10".to_string()),
                asset_id: Some("1".to_string()),
            },
            PlannedResource {
                policy_id: None,
                ..PlannedResource::association("10", "1")
            },
        ];

        validate_unique_waf_assignment(&lookup, Some(planned.as_slice()))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn looks_up_each_policy_once() {
        let mut lookup = MockPolicyLookup::new();
        lookup
            .expect_get_policy()
            .times(1)
            .returning(|_, _| {
                Ok(PolicyGetResponse {
                    value: Policy {
                        policy_type: PolicyType::WafRules,
                        ..Policy::default()
                    },
                    is_error: false,
                })
            });

        let planned = vec![
            PlannedResource::association("10", "1"),
            PlannedResource::association("10", "2"),
            PlannedResource::association("10", "3"),
        ];

        validate_unique_waf_assignment(&lookup, Some(planned.as_slice()))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn propagates_lookup_failure() {
        let mut lookup = MockPolicyLookup::new();
        lookup
            .expect_get_policy()
            .returning(|_, _| Err(Error::remote("Error getting policy 10", "{}")));

        let planned = vec![PlannedResource::association("10", "1")];
        let err = validate_unique_waf_assignment(&lookup, Some(planned.as_slice()))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Remote { .. }));
    }
}
