//! # incapsula-core
//!
//! Core types and HTTP plumbing for working with the Incapsula provisioning APIs.
//!
//! This crate provides the shared error type, configuration, the transport seam used
//! by every API client, and the small value types the remote contract is built from.
//!
//! ## Modules
//!
//! - [`error`] - Error type with identifying context and raw response bodies
//! - [`config`] - Credentials and endpoint configuration
//! - [`client`] - HTTP client settings and endpoint resolution
//! - [`transport`] - The `Transport` trait and its reqwest implementation
//! - [`form`] - Builder for form and query parameter pairs
//! - [`ids`] - Strongly-typed numeric identifiers
//! - [`types`] - Result-code normalization

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod config;
pub mod error;
pub mod form;
pub mod ids;
pub mod transport;
pub mod types;

// Re-export commonly used types
pub use error::{Error, Result};
