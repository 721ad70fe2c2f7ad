//! Service contracts implemented by the infrastructure layer.

use async_trait::async_trait;
use thiserror::Error;

use crate::credentials::DeviceCredentials;
use crate::device::Device;
use crate::error::CredentialsError;
use crate::ids::TenantId;
use crate::profile::DeviceProfile;

/// Errors surfaced by the persistence collaborators.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("already exists: {0}")]
    AlreadyExists(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("storage error: {0}")]
    Storage(String),
}

impl From<CredentialsError> for ServiceError {
    fn from(e: CredentialsError) -> Self {
        ServiceError::Validation(e.to_string())
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Device persistence contract.
#[async_trait]
pub trait DeviceService: Send + Sync {
    /// Look up a device by its per-tenant unique name.
    async fn find_device_by_name(
        &self,
        tenant_id: TenantId,
        name: &str,
    ) -> ServiceResult<Option<Device>>;

    /// Persist a device together with its credentials as a single
    /// logical operation. No device is ever left without credentials.
    async fn save_device_with_credentials(
        &self,
        device: Device,
        credentials: DeviceCredentials,
    ) -> ServiceResult<Device>;
}

/// Device profile persistence contract.
#[async_trait]
pub trait DeviceProfileService: Send + Sync {
    async fn find_profile_by_name(
        &self,
        tenant_id: TenantId,
        name: &str,
    ) -> ServiceResult<Option<DeviceProfile>>;

    async fn save_profile(&self, profile: DeviceProfile) -> ServiceResult<DeviceProfile>;

    /// The tenant's designated default profile.
    async fn find_default_profile(&self, tenant_id: TenantId) -> ServiceResult<DeviceProfile>;

    /// Find a profile by name or create one with the generic default
    /// transport. An existing profile is reused as-is.
    async fn find_or_create_profile(
        &self,
        tenant_id: TenantId,
        name: &str,
    ) -> ServiceResult<DeviceProfile>;
}

/// Credential normalization contract, applied before persistence.
#[async_trait]
pub trait DeviceCredentialsService: Send + Sync {
    /// Canonicalize credentials and validate that the value encoding
    /// matches the declared type.
    async fn format_credentials(
        &self,
        credentials: DeviceCredentials,
    ) -> ServiceResult<DeviceCredentials>;
}
