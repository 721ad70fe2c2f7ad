//! Device Data Model - Entities and service contracts for device provisioning
//!
//! This crate defines the core entities of the Fleetlink platform:
//!
//! - **Device**: a provisioned device, unique by (tenant, name)
//! - **DeviceProfile**: per-tenant transport profile shared by many devices
//! - **DeviceCredentials**: the 1:1 authentication material of a device
//!
//! plus the async service traits the provisioning flows are written
//! against. Infrastructure crates (e.g. `fleetlink-storage`) implement
//! the traits; business crates (e.g. `fleetlink-import`) consume them.

pub mod credentials;
pub mod device;
pub mod error;
pub mod ids;
pub mod lwm2m;
pub mod profile;
pub mod service;

pub use credentials::{BasicMqttCredentials, DeviceCredentials, DeviceCredentialsType};
pub use device::{Device, DeviceMetadata};
pub use error::CredentialsError;
pub use ids::{DeviceId, DeviceProfileId, TenantId};
pub use lwm2m::{
    Lwm2mBootstrapCredentials, Lwm2mClientCredentials, Lwm2mCredentials, Lwm2mSecurityMode,
    Lwm2mServerCredentials,
};
pub use profile::{
    DeviceProfile, DeviceProfileConfiguration, DeviceProfileData, DeviceProfileProvisionConfiguration,
    DeviceProfileProvisionType, DeviceProfileType, DeviceProfileTransportConfiguration,
    DeviceTransportType,
};
pub use service::{
    DeviceCredentialsService, DeviceProfileService, DeviceService, ServiceError, ServiceResult,
};
