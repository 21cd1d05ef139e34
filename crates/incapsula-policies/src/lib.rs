//! Policy lookup and policy-asset association management for Incapsula.
//!
//! The crate is layered the same way as the site client:
//!
//! - [`client`] - HTTP client for the policy v2 endpoints
//! - [`lookup`] - The `PolicyLookup` seam the validator depends on
//! - [`resource`] - Create/read/delete lifecycle of one association record
//! - [`validation`] - Plan-time check that a site carries at most one WAF policy
//! - [`id`] - Composite identifier of an association
//! - [`models`] - Policy records

#![deny(missing_docs)]

pub mod client;
pub mod id;
pub mod lookup;
pub mod models;
pub mod resource;
pub mod validation;

pub use client::{PolicyClient, PolicyClientBuilder};
pub use id::AssociationId;
pub use lookup::PolicyLookup;
pub use models::{Policy, PolicyGetResponse, PolicyType};
pub use resource::{AccountContext, PolicyAssetAssociationResource, ResourceData};
pub use validation::{validate_unique_waf_assignment, PlannedResource};

/// Convenient result alias that reuses the shared Incapsula error type.
pub type Result<T> = incapsula_core::Result<T>;
