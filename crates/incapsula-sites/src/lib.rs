//! Site provisioning client for Incapsula.
//!
//! This crate provides typed models and an asynchronous client for the `sites/*`
//! endpoints: adding a site, reading its status, changing one setting at a time and
//! deleting it.

#![deny(missing_docs)]

pub mod client;
pub mod models;

pub use client::{SiteClient, SiteClientBuilder, SiteStatusError};
pub use models::{
    AddSiteRequest, SiteAddResponse, SiteDeleteResponse, SiteStatusResponse, SiteUpdateResponse,
};

/// Convenient result alias that reuses the shared Incapsula error type.
pub type Result<T> = incapsula_core::Result<T>;
