//! Device profiles: per-tenant transport configuration shared by devices.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{DeviceProfileId, TenantId};

/// Profile category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeviceProfileType {
    #[default]
    Default,
}

/// The communication protocol family a profile targets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeviceTransportType {
    #[default]
    Default,
    Mqtt,
    Lwm2m,
}

impl std::fmt::Display for DeviceTransportType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Default => write!(f, "DEFAULT"),
            Self::Mqtt => write!(f, "MQTT"),
            Self::Lwm2m => write!(f, "LWM2M"),
        }
    }
}

/// Whether a profile allows self-registration of new devices.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeviceProfileProvisionType {
    #[default]
    Disabled,
    AllowCreateNewDevices,
}

/// Profile-wide (non-transport) configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DeviceProfileConfiguration {
    #[default]
    #[serde(rename = "DEFAULT")]
    Default,
}

/// Transport-specific profile configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DeviceProfileTransportConfiguration {
    #[default]
    #[serde(rename = "DEFAULT")]
    Default,
    #[serde(rename = "MQTT")]
    Mqtt,
    #[serde(rename = "LWM2M")]
    Lwm2m,
}

impl DeviceProfileTransportConfiguration {
    /// The transport type this configuration belongs to.
    pub fn transport_type(&self) -> DeviceTransportType {
        match self {
            Self::Default => DeviceTransportType::Default,
            Self::Mqtt => DeviceTransportType::Mqtt,
            Self::Lwm2m => DeviceTransportType::Lwm2m,
        }
    }
}

/// Provisioning configuration attached to a profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DeviceProfileProvisionConfiguration {
    #[serde(rename = "DISABLED")]
    Disabled {
        #[serde(rename = "provisionDeviceSecret", skip_serializing_if = "Option::is_none")]
        provision_device_secret: Option<String>,
    },
    #[serde(rename = "ALLOW_CREATE_NEW_DEVICES")]
    AllowCreateNewDevices {
        #[serde(rename = "provisionDeviceSecret")]
        provision_device_secret: String,
    },
}

impl Default for DeviceProfileProvisionConfiguration {
    fn default() -> Self {
        Self::Disabled {
            provision_device_secret: None,
        }
    }
}

/// The configuration payload of a profile: general, transport, and
/// provisioning sub-objects.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceProfileData {
    pub configuration: DeviceProfileConfiguration,
    pub transport_configuration: DeviceProfileTransportConfiguration,
    pub provision_configuration: DeviceProfileProvisionConfiguration,
}

/// A device profile. At most one profile exists per (tenant, name).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceProfile {
    pub id: DeviceProfileId,
    pub tenant_id: TenantId,
    pub name: String,
    pub profile_type: DeviceProfileType,
    pub transport_type: DeviceTransportType,
    pub provision_type: DeviceProfileProvisionType,
    pub profile_data: DeviceProfileData,
    /// Whether this is the tenant's default profile.
    #[serde(default)]
    pub default: bool,
    pub created_at: DateTime<Utc>,
}

impl DeviceProfile {
    /// Create a profile with the generic default transport.
    pub fn new(tenant_id: TenantId, name: impl Into<String>) -> Self {
        Self {
            id: DeviceProfileId::new(),
            tenant_id,
            name: name.into(),
            profile_type: DeviceProfileType::Default,
            transport_type: DeviceTransportType::Default,
            provision_type: DeviceProfileProvisionType::Disabled,
            profile_data: DeviceProfileData::default(),
            default: false,
            created_at: Utc::now(),
        }
    }

    /// Create a profile targeting the LwM2M transport, provisioning
    /// disabled.
    pub fn lwm2m(tenant_id: TenantId, name: impl Into<String>) -> Self {
        let mut profile = Self::new(tenant_id, name);
        profile.transport_type = DeviceTransportType::Lwm2m;
        profile.profile_data.transport_configuration = DeviceProfileTransportConfiguration::Lwm2m;
        profile
    }
}
