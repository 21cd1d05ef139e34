//! Composite identifier of a policy-asset association.
//!
//! The service has no id of its own for an association, so the record is keyed by
//! `policy_id/asset_id/asset_type`.

use incapsula_core::Error;
use std::fmt;
use std::str::FromStr;

use crate::Result;

/// Separator between the three parts.
pub const ID_SEPARATOR: char = '/';

/// `policy_id/asset_id/asset_type`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AssociationId {
    /// Policy id.
    pub policy_id: String,
    /// Asset id.
    pub asset_id: String,
    /// Asset type.
    pub asset_type: String,
}

impl AssociationId {
    /// Assemble an id from its parts.
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
        }
    }

    /// Split a composed id. Exactly three parts are accepted; a part may be empty.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidId`] for any other shape.
    pub fn parse(input: &str) -> Result<Self> {
        let mut parts = input.split(ID_SEPARATOR);
        match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some(policy_id), Some(asset_id), Some(asset_type), None) => {
                Ok(Self::new(policy_id, asset_id, asset_type))
            }
            _ => Err(Error::InvalidId(format!(
                "`{input}` is not of the form policy_id/asset_id/asset_type"
            ))),
        }
    }
}

impl fmt::Display for AssociationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{ID_SEPARATOR}{}{ID_SEPARATOR}{}",
            self.policy_id, self.asset_id, self.asset_type
        )
    }
}

impl FromStr for AssociationId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
