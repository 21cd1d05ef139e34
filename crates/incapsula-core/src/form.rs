//! Builder for form-encoded and query parameter pairs.
//!
//! The provisioning API takes every argument as an `application/x-www-form-urlencoded`
//! field; this helper keeps the optional-field handling out of the client crates.

use std::fmt::Display;

/// Key/value pairs in the shape both `reqwest::RequestBuilder::form` and `query` accept.
pub type Pairs = Vec<(&'static str, String)>;

/// Builder for assembling parameter pairs.
#[derive(Debug, Default, Clone)]
pub struct FormParams {
    pairs: Pairs,
}

impl FormParams {
    /// Create a new, empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self { pairs: Vec::new() }
    }

    /// Append a required key/value pair.
    pub fn push<T>(&mut self, key: &'static str, value: T)
    where
        T: Display,
    {
        self.pairs.push((key, value.to_string()));
    }

    /// Append a key/value pair when the value is present.
    pub fn push_opt<T>(&mut self, key: &'static str, value: Option<T>)
    where
        T: Display,
    {
        if let Some(value) = value {
            self.pairs.push((key, value.to_string()));
        }
    }

    /// Chaining variant of [`FormParams::push`].
    #[must_use]
    pub fn with<T>(mut self, key: &'static str, value: T) -> Self
    where
        T: Display,
    {
        self.push(key, value);
        self
    }

    /// Return the collected key/value pairs.
    #[must_use]
    pub fn into_pairs(self) -> Pairs {
        self.pairs
    }

    /// Look up the first value recorded for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Returns true if no parameters have been added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}
