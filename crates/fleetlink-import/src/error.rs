//! Row-scoped errors of the import flow.

use thiserror::Error;

use fleetlink_devices::service::ServiceError;

pub type ImportResult<T> = Result<T, ImportError>;

/// Failure of a single import row. One row failing never corrupts or
/// blocks another.
#[derive(Debug, Error)]
pub enum ImportError {
    /// Credential columns could not be turned into valid credentials
    /// (bad security mode, malformed structured payload, ...). Carries
    /// the original cause message.
    #[error("Invalid device credentials: {0}")]
    InvalidCredentials(String),

    /// Reading or writing a device profile failed.
    #[error("profile resolution failed: {0}")]
    ProfileResolution(ServiceError),

    /// An existing profile's transport conflicts with the row's LwM2M
    /// credentials and the upgrade policy forbids changing it.
    #[error("device profile '{name}' uses a non-LwM2M transport")]
    ProfileTransportConflict { name: String },

    /// Saving the device/credentials pair failed.
    #[error("persistence failed: {0}")]
    Persistence(ServiceError),
}
