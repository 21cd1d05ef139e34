//! Error types for Incapsula operations.
//!
//! Every remote failure carries the caller-supplied context (domain, site id,
//! parameter name) and, where one was received, the raw response body so that a
//! failed call can be diagnosed from the error alone.

use thiserror::Error;

/// Main error type for Incapsula operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Network or HTTP-level failure while talking to the service
    #[error("{context}: {message}")]
    Transport {
        /// What was being attempted
        context: String,
        /// Underlying transport error
        message: String,
    },

    /// Response body could not be decoded
    #[error("{context}: {message} (body: {body})")]
    Decode {
        /// What was being decoded
        context: String,
        /// Decoder error
        message: String,
        /// Raw response body
        body: String,
    },

    /// The service answered with a non-zero result code or error status
    #[error("{context}: {body}")]
    Remote {
        /// What was being attempted
        context: String,
        /// Raw response body
        body: String,
    },

    /// More than one WAF policy targets the same asset
    #[error("site {asset_id} has more than one WAF Policy assigned")]
    PolicyConflict {
        /// Offending asset identifier
        asset_id: String,
    },

    /// Malformed identifier
    #[error("Invalid identifier: {0}")]
    InvalidId(String),

    /// Invalid endpoint
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Operation timed out
    #[error("Timeout: {0}")]
    Timeout(String),

    /// Service could not be reached
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Not implemented
    #[error("Not implemented: {0}")]
    NotImplemented(String),
}

/// Specialized result type for Incapsula operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Build a transport error from any displayable cause.
    pub fn transport(context: impl Into<String>, err: impl std::fmt::Display) -> Self {
        Self::Transport {
            context: context.into(),
            message: err.to_string(),
        }
    }

    /// Build a decode error, keeping the raw body.
    pub fn decode(
        context: impl Into<String>,
        err: impl std::fmt::Display,
        body: impl Into<String>,
    ) -> Self {
        Self::Decode {
            context: context.into(),
            message: err.to_string(),
            body: body.into(),
        }
    }

    /// Build a remote rejection error, keeping the raw body.
    pub fn remote(context: impl Into<String>, body: impl Into<String>) -> Self {
        Self::Remote {
            context: context.into(),
            body: body.into(),
        }
    }

    /// Returns the error code for this error type.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Transport { .. } => "TRANSPORT_ERROR",
            Self::Decode { .. } => "DECODE_ERROR",
            Self::Remote { .. } => "REMOTE_ERROR",
            Self::PolicyConflict { .. } => "POLICY_CONFLICT",
            Self::InvalidId(_) => "INVALID_ID",
            Self::InvalidEndpoint(_) => "INVALID_ENDPOINT",
            Self::ConfigError(_) => "CONFIG_ERROR",
            Self::Timeout(_) => "TIMEOUT",
            Self::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
            Self::NotImplemented(_) => "NOT_IMPLEMENTED",
        }
    }

    /// Returns true if this error should be logged as a serious error.
    #[must_use]
    pub const fn should_log(&self) -> bool {
        matches!(
            self,
            Self::Transport { .. } | Self::Decode { .. } | Self::ConfigError(_)
        )
    }

    /// Raw response body attached to the error, if any.
    #[must_use]
    pub fn body(&self) -> Option<&str> {
        match self {
            Self::Decode { body, .. } | Self::Remote { body, .. } => Some(body),
            _ => None,
        }
    }
}

// Conversions from external error types
impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else if err.is_connect() {
            Self::ServiceUnavailable(err.to_string())
        } else {
            Self::transport("HTTP request failed", err)
        }
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidEndpoint(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::decode("Failed to parse JSON", err, String::new())
    }
}

impl From<validator::ValidationErrors> for Error {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::ConfigError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            Error::transport("ctx", "boom").error_code(),
            "TRANSPORT_ERROR"
        );
        assert_eq!(Error::decode("ctx", "eof", "{").error_code(), "DECODE_ERROR");
        assert_eq!(Error::remote("ctx", "{}").error_code(), "REMOTE_ERROR");
        assert_eq!(
            Error::PolicyConflict {
                asset_id: "1".to_string()
            }
            .error_code(),
            "POLICY_CONFLICT"
        );
        assert_eq!(Error::InvalidId("x".to_string()).error_code(), "INVALID_ID");
        assert_eq!(
            Error::InvalidEndpoint("x".to_string()).error_code(),
            "INVALID_ENDPOINT"
        );
        assert_eq!(
            Error::ConfigError("x".to_string()).error_code(),
            "CONFIG_ERROR"
        );
        assert_eq!(Error::Timeout("x".to_string()).error_code(), "TIMEOUT");
        assert_eq!(
            Error::ServiceUnavailable("x".to_string()).error_code(),
            "SERVICE_UNAVAILABLE"
        );
        assert_eq!(
            Error::NotImplemented("x".to_string()).error_code(),
            "NOT_IMPLEMENTED"
        );
    }

    #[test]
    fn test_error_display_includes_context_and_body() {
        let err = Error::remote(
            "Error from Incapsula service when adding site for domain example.com",
            r#"{"res":1}"#,
        );
        assert_eq!(
            err.to_string(),
            r#"Error from Incapsula service when adding site for domain example.com: {"res":1}"#
        );

        let err = Error::PolicyConflict {
            asset_id: "42".to_string(),
        };
        assert_eq!(err.to_string(), "site 42 has more than one WAF Policy assigned");
    }

    #[test]
    fn test_body_accessor() {
        assert_eq!(Error::remote("ctx", "raw").body(), Some("raw"));
        assert_eq!(Error::decode("ctx", "bad", "raw").body(), Some("raw"));
        assert_eq!(Error::transport("ctx", "refused").body(), None);
    }

    #[test]
    fn test_should_log() {
        assert!(Error::transport("ctx", "refused").should_log());
        assert!(Error::ConfigError("test".to_string()).should_log());
        assert!(!Error::remote("ctx", "{}").should_log());
        assert!(!Error::PolicyConflict {
            asset_id: "1".to_string()
        }
        .should_log());
    }

    #[test]
    fn test_from_url_parse_error() {
        let err = url::Url::parse("not a url").unwrap_err();
        let converted: Error = err.into();
        assert!(matches!(converted, Error::InvalidEndpoint(_)));
    }

    #[test]
    fn test_from_serde_json_error() {
        let err = serde_json::from_str::<serde_json::Value>("{invalid json}").unwrap_err();
        let converted: Error = err.into();
        assert!(matches!(converted, Error::Decode { .. }));
    }

    #[test]
    fn test_error_partial_eq() {
        let err1 = Error::InvalidId("a/b".to_string());
        let err2 = Error::InvalidId("a/b".to_string());
        let err3 = Error::InvalidId("other".to_string());

        assert_eq!(err1, err2.clone());
        assert_ne!(err1, err3);
    }
}
