//! Value types shared by every Incapsula response.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Normalized `res` field of an Incapsula response.
///
/// The service reports its result code as a JSON number on most endpoints and as a
/// JSON string on others. Both are folded into the canonical decimal string at decode
/// time, so only `"0"` compares as success no matter how the payload spelled it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ResultCode(String);

/// Canonical success code.
pub const RES_SUCCESS: &str = "0";

impl ResultCode {
    /// Wrap an already-canonical code.
    #[must_use]
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Whether the remote call succeeded.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.0 == RES_SUCCESS
    }

    /// Whether the code equals the given numeric code.
    #[must_use]
    pub fn is(&self, code: i64) -> bool {
        self.as_i64() == Some(code)
    }

    /// Numeric value of the code, if it is numeric.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        self.0.parse().ok()
    }

    /// The canonical string form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// An absent `res` decodes as success, matching how the service omits it on some
// successful answers.
impl Default for ResultCode {
    fn default() -> Self {
        Self(RES_SUCCESS.to_string())
    }
}

impl From<i64> for ResultCode {
    fn from(code: i64) -> Self {
        Self(code.to_string())
    }
}

impl fmt::Display for ResultCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for ResultCode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Int(i64),
            Float(f64),
            Text(String),
        }

        let code = match Raw::deserialize(deserializer)? {
            Raw::Int(n) => n.to_string(),
            #[allow(clippy::cast_possible_truncation)]
            Raw::Float(n) => (n as i64).to_string(),
            Raw::Text(s) => s,
        };
        Ok(Self(code))
    }
}
