//! Model-level validation errors.

use thiserror::Error;

/// Errors raised while validating or encoding device credentials.
#[derive(Debug, Error)]
pub enum CredentialsError {
    /// A supplied security-mode string is not part of the fixed set.
    #[error("unknown LwM2M security mode: {value} (expected one of: NO_SEC, PSK, RPK, X509)")]
    UnknownSecurityMode { value: String },

    /// A structured credential payload could not be encoded or decoded.
    #[error("malformed credentials payload: {0}")]
    MalformedPayload(String),

    /// A required credential field is missing or empty.
    #[error("missing credential field: {0}")]
    MissingField(&'static str),
}

impl From<serde_json::Error> for CredentialsError {
    fn from(e: serde_json::Error) -> Self {
        CredentialsError::MalformedPayload(e.to_string())
    }
}
