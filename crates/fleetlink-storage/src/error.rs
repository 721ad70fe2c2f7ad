//! Store-level failures and their mapping onto the service contract.

use thiserror::Error;

use fleetlink_devices::service::ServiceError;

/// Failures raised by the in-memory stores.
///
/// Trait implementations return [`ServiceError`]; the `From` impl below
/// is the single place where store failures are translated, so callers
/// never see store internals.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Unique-constraint violation on a (tenant, name) identity.
    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A stored payload could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// An index entry points at a record that is gone.
    #[error("Store inconsistency: {0}")]
    Inconsistent(String),
}

impl From<Error> for ServiceError {
    fn from(e: Error) -> Self {
        match e {
            Error::NotFound(s) => ServiceError::NotFound(s),
            Error::AlreadyExists(s) => ServiceError::AlreadyExists(s),
            Error::InvalidInput(s) => ServiceError::Validation(s),
            Error::Serialization(s) => ServiceError::Validation(s),
            Error::Inconsistent(s) => ServiceError::Storage(s),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_errors_map_onto_the_service_contract() {
        let err: ServiceError = Error::AlreadyExists("dev-1".to_string()).into();
        assert!(matches!(err, ServiceError::AlreadyExists(_)));

        let err: ServiceError = Error::InvalidInput("empty name".to_string()).into();
        assert!(matches!(err, ServiceError::Validation(_)));

        let err: ServiceError = Error::Serialization("bad json".to_string()).into();
        assert!(matches!(err, ServiceError::Validation(_)));

        let err: ServiceError = Error::Inconsistent("stale index".to_string()).into();
        assert!(matches!(err, ServiceError::Storage(_)));
    }

    #[test]
    fn serde_failures_become_serialization_errors() {
        let bad = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err = Error::from(bad);
        assert!(matches!(err, Error::Serialization(_)));
    }
}
