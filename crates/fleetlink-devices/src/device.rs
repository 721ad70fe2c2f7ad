//! The device entity and its metadata record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{DeviceId, DeviceProfileId, TenantId};

/// Typed metadata attached to a device.
///
/// Only the keys the platform understands are modeled. Merging fills the
/// keys present on the incoming record and leaves everything else
/// untouched, so repeated imports never erase metadata they did not set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceMetadata {
    /// Human-readable description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Whether the device acts as a gateway for other devices.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gateway: Option<bool>,
}

impl DeviceMetadata {
    /// Merge the keys present on `incoming` into `self`.
    pub fn merge(&mut self, incoming: &DeviceMetadata) {
        if let Some(description) = &incoming.description {
            self.description = Some(description.clone());
        }
        if let Some(gateway) = incoming.gateway {
            self.gateway = Some(gateway);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.description.is_none() && self.gateway.is_none()
    }
}

/// A provisioned device. Within a tenant the device name is unique.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Device {
    pub id: DeviceId,
    pub tenant_id: TenantId,
    pub name: String,
    /// Free-text transport/profile label. During import it doubles as
    /// the intended profile name.
    #[serde(default)]
    pub device_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "DeviceMetadata::is_empty")]
    pub metadata: DeviceMetadata,
    /// Every device references exactly one profile before persistence.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_profile_id: Option<DeviceProfileId>,
    pub created_at: DateTime<Utc>,
}

impl Device {
    /// Create an empty device owned by `tenant_id`.
    pub fn new(tenant_id: TenantId) -> Self {
        Self {
            id: DeviceId::new(),
            tenant_id,
            name: String::new(),
            device_type: String::new(),
            label: None,
            metadata: DeviceMetadata::default(),
            device_profile_id: None,
            created_at: Utc::now(),
        }
    }

    /// Field-wise update from a freshly mapped device.
    ///
    /// Fields the incoming device does not carry are preserved; this is
    /// the merge used by the import upsert path, never a full replace.
    pub fn apply_update(&mut self, incoming: &Device) {
        if !incoming.name.is_empty() {
            self.name = incoming.name.clone();
        }
        if !incoming.device_type.is_empty() {
            self.device_type = incoming.device_type.clone();
        }
        if let Some(label) = &incoming.label {
            self.label = Some(label.clone());
        }
        self.metadata.merge(&incoming.metadata);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metadata_merge_fills_only_present_keys() {
        let mut metadata = DeviceMetadata {
            description: Some("old".to_string()),
            gateway: Some(true),
        };

        metadata.merge(&DeviceMetadata {
            description: Some("new".to_string()),
            gateway: None,
        });

        assert_eq!(metadata.description.as_deref(), Some("new"));
        assert_eq!(metadata.gateway, Some(true));
    }

    #[test]
    fn apply_update_preserves_absent_fields() {
        let tenant_id = TenantId::new();

        let mut existing = Device::new(tenant_id);
        existing.name = "dev-1".to_string();
        existing.device_type = "Sensor-A".to_string();
        existing.label = Some("basement".to_string());
        existing.metadata.description = Some("temperature probe".to_string());

        let mut incoming = Device::new(tenant_id);
        incoming.name = "dev-1".to_string();
        incoming.metadata.gateway = Some(true);

        let original_id = existing.id;
        existing.apply_update(&incoming);

        assert_eq!(existing.id, original_id);
        assert_eq!(existing.device_type, "Sensor-A");
        assert_eq!(existing.label.as_deref(), Some("basement"));
        assert_eq!(existing.metadata.description.as_deref(), Some("temperature probe"));
        assert_eq!(existing.metadata.gateway, Some(true));
    }

    #[test]
    fn apply_update_overwrites_supplied_fields() {
        let tenant_id = TenantId::new();

        let mut existing = Device::new(tenant_id);
        existing.name = "dev-1".to_string();
        existing.label = Some("old label".to_string());

        let mut incoming = Device::new(tenant_id);
        incoming.name = "dev-1".to_string();
        incoming.label = Some("new label".to_string());
        incoming.device_type = "Sensor-B".to_string();

        existing.apply_update(&incoming);

        assert_eq!(existing.label.as_deref(), Some("new label"));
        assert_eq!(existing.device_type, "Sensor-B");
    }
}
