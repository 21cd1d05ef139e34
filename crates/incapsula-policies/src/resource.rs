//! Lifecycle of a policy-asset association record.
//!
//! The record is persisted by the caller between runs. Each operation reads and
//! updates that record in place; an empty `id` means the association is gone.

use crate::client::PolicyClient;
use crate::id::AssociationId;
use crate::Result;
use incapsula_core::ids::AccountId;
use incapsula_core::Error;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

/// Resource type name used in planned configurations.
pub const RESOURCE_TYPE: &str = "incapsula_policy_asset_association";

/// Persisted state of one association.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceData {
    /// Composite id, empty when the association does not exist.
    pub id: String,
    /// Policy id.
    pub policy_id: String,
    /// Asset id (a site id).
    pub asset_id: String,
    /// Asset type.
    pub asset_type: String,
    /// Account the asset lives in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_id: Option<AccountId>,
}

impl ResourceData {
    /// Desired state for a new association.
    #[must_use]
    pub fn new(
        policy_id: impl Into<String>,
        asset_id: impl Into<String>,
        asset_type: impl Into<String>,
    ) -> Self {
        Self {
            policy_id: policy_id.into(),
            asset_id: asset_id.into(),
            asset_type: asset_type.into(),
            ..Self::default()
        }
    }

    /// Set the account explicitly.
    #[must_use]
    pub fn with_account_id(mut self, account_id: AccountId) -> Self {
        self.account_id = Some(account_id);
        self
    }

    /// Whether the record has been cleared.
    #[must_use]
    pub fn is_gone(&self) -> bool {
        self.id.is_empty()
    }

    fn clear_id(&mut self) {
        self.id.clear();
    }
}

/// Account the provider itself operates as, if known.
///
/// An explicit `account_id` on the record always wins over it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AccountContext {
    current: Option<AccountId>,
}

impl AccountContext {
    /// Context with the given ambient account.
    #[must_use]
    pub const fn new(current: Option<AccountId>) -> Self {
        Self { current }
    }

    /// The ambient account.
    #[must_use]
    pub const fn current(&self) -> Option<AccountId> {
        self.current
    }

    /// Effective account for a record. Zero counts as unset.
    #[must_use]
    pub fn resolve(&self, explicit: Option<AccountId>) -> Option<AccountId> {
        explicit
            .filter(|id| !id.is_zero())
            .or(self.current.filter(|id| !id.is_zero()))
    }
}

/// Value kind of a schema field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    /// String
    String,
    /// Integer
    Int,
}

/// Description of one field of the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSchema {
    /// Field name.
    pub name: &'static str,
    /// Human readable description.
    pub description: &'static str,
    /// Value kind.
    pub field_type: FieldType,
    /// Must be set by the user.
    pub required: bool,
    /// May be set by the user.
    pub optional: bool,
    /// Filled in by the provider when not set.
    pub computed: bool,
    /// Changing it replaces the association.
    pub force_new: bool,
}

const SCHEMA: [FieldSchema; 4] = [
    FieldSchema {
        name: "policy_id",
        description: "The Policy ID for the asset association.",
        field_type: FieldType::String,
        required: true,
        optional: false,
        computed: false,
        force_new: true,
    },
    FieldSchema {
        name: "asset_id",
        description: "The Asset ID for the asset association. Only type of asset supported at the moment is site.",
        field_type: FieldType::String,
        required: true,
        optional: false,
        computed: false,
        force_new: true,
    },
    FieldSchema {
        name: "asset_type",
        description: "The Policy type for the asset association. Only value at the moment is `WEBSITE`.",
        field_type: FieldType::String,
        required: true,
        optional: false,
        computed: false,
        force_new: true,
    },
    FieldSchema {
        name: "account_id",
        description: "The Asset's Account ID",
        field_type: FieldType::Int,
        required: false,
        optional: true,
        computed: true,
        force_new: true,
    },
];

/// Create/read/delete handler for policy-asset associations.
#[derive(Debug, Clone)]
pub struct PolicyAssetAssociationResource {
    client: PolicyClient,
    accounts: AccountContext,
}

impl PolicyAssetAssociationResource {
    /// Handler using `client`, with `accounts` as the ambient account.
    #[must_use]
    pub fn new(client: PolicyClient, accounts: AccountContext) -> Self {
        Self { client, accounts }
    }

    /// Fields of the record.
    #[must_use]
    pub fn schema() -> &'static [FieldSchema] {
        &SCHEMA
    }

    /// Every field forces a new association, so any drift in a user-set field
    /// means replacement. `account_id` is computed and only counts when set.
    #[must_use]
    pub fn requires_replacement(old: &ResourceData, new: &ResourceData) -> bool {
        old.policy_id != new.policy_id
            || old.asset_id != new.asset_id
            || old.asset_type != new.asset_type
            || (new.account_id.is_some() && new.account_id != old.account_id)
    }

    /// Record for an imported association; a following read fills the fields.
    #[must_use]
    pub fn import(id: &str) -> ResourceData {
        ResourceData {
            id: id.to_string(),
            ..ResourceData::default()
        }
    }

    /// Attach the policy, then read the association back.
    pub async fn create(&self, data: &mut ResourceData) -> Result<()> {
        let account_id = self.accounts.resolve(data.account_id);

        if let Err(err) = self
            .client
            .add_policy_asset_association(
                &data.policy_id,
                &data.asset_id,
                &data.asset_type,
                account_id,
            )
            .await
        {
            error!(
                policy_id = %data.policy_id,
                asset_id = %data.asset_id,
                asset_type = %data.asset_type,
                error = %err,
                "Could not create Incapsula policy asset association"
            );
            return Err(err);
        }

        let id = AssociationId::new(&data.policy_id, &data.asset_id, &data.asset_type);
        data.id = id.to_string();
        info!(id = %data.id, "Created Incapsula policy asset association");

        self.read(data).await
    }

    /// Refresh the record. A missing association clears the id and is not an
    /// error; reading a cleared record does nothing.
    pub async fn read(&self, data: &mut ResourceData) -> Result<()> {
        if data.is_gone() {
            return Ok(());
        }
        let id = AssociationId::parse(&data.id)?;
        let account_id = self.accounts.resolve(data.account_id);
        info!(id = %id, ?account_id, "Reading Incapsula policy asset association");

        let associated = match self
            .client
            .is_policy_asset_associated(
                &id.policy_id,
                &id.asset_id,
                &id.asset_type,
                account_id,
            )
            .await
        {
            Ok(associated) => associated,
            Err(err) => {
                error!(id = %id, error = %err, "Could not read Incapsula policy asset association");
                return Err(err);
            }
        };

        if !associated {
            error!(id = %id, "Could not find Incapsula policy asset association");
            data.clear_id();
            return Ok(());
        }

        data.id = id.to_string();
        data.policy_id = id.policy_id;
        data.asset_id = id.asset_id;
        data.asset_type = id.asset_type;
        if account_id.is_some() {
            data.account_id = account_id;
        }
        info!(id = %data.id, "Read Incapsula policy asset association");
        Ok(())
    }

    /// Associations cannot be changed in place.
    pub async fn update(&self, data: &mut ResourceData) -> Result<()> {
        Err(Error::NotImplemented(format!(
            "policy asset association {} cannot be updated, it must be replaced",
            data.id
        )))
    }

    /// Detach the policy and clear the id.
    pub async fn delete(&self, data: &mut ResourceData) -> Result<()> {
        let account_id = self.accounts.resolve(data.account_id);
        info!(
            policy_id = %data.policy_id,
            asset_id = %data.asset_id,
            asset_type = %data.asset_type,
            ?account_id,
            "Deleting Incapsula policy asset association"
        );

        self.client
            .delete_policy_asset_association(
                &data.policy_id,
                &data.asset_id,
                &data.asset_type,
                account_id,
            )
            .await?;

        data.clear_id();
        Ok(())
    }
}
