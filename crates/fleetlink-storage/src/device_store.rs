//! In-memory device store.

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use fleetlink_devices::service::{DeviceService, ServiceResult};
use fleetlink_devices::{Device, DeviceCredentials, DeviceId, TenantId};

use crate::error::Error;

/// Device store over concurrent maps, with a (tenant, name) index and a
/// per-device credentials map.
///
/// The name index entry is claimed atomically on save, so two devices
/// can never end up sharing a (tenant, name) pair.
#[derive(Default)]
pub struct InMemoryDeviceStore {
    devices: DashMap<DeviceId, Device>,
    by_name: DashMap<(TenantId, String), DeviceId>,
    credentials: DashMap<DeviceId, DeviceCredentials>,
}

impl InMemoryDeviceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored credentials for a device, if any.
    pub fn credentials_for(&self, device_id: DeviceId) -> Option<DeviceCredentials> {
        self.credentials.get(&device_id).map(|c| c.clone())
    }

    /// Number of stored devices.
    pub fn device_count(&self) -> usize {
        self.devices.len()
    }
}

#[async_trait]
impl DeviceService for InMemoryDeviceStore {
    async fn find_device_by_name(
        &self,
        tenant_id: TenantId,
        name: &str,
    ) -> ServiceResult<Option<Device>> {
        let id = self.by_name.get(&(tenant_id, name.to_string())).map(|e| *e);
        Ok(id.and_then(|id| self.devices.get(&id).map(|d| d.clone())))
    }

    async fn save_device_with_credentials(
        &self,
        device: Device,
        credentials: DeviceCredentials,
    ) -> ServiceResult<Device> {
        if device.name.is_empty() {
            return Err(Error::InvalidInput("device name is empty".to_string()).into());
        }
        if device.device_profile_id.is_none() {
            return Err(Error::InvalidInput(format!("device '{}' has no profile", device.name)).into());
        }

        // Claim the (tenant, name) slot before touching anything else.
        match self.by_name.entry((device.tenant_id, device.name.clone())) {
            Entry::Occupied(entry) => {
                if *entry.get() != device.id {
                    return Err(Error::AlreadyExists(format!(
                        "device with name '{}' already exists",
                        device.name
                    ))
                    .into());
                }
            }
            Entry::Vacant(entry) => {
                entry.insert(device.id);
            }
        }

        // Drop the stale index entry if the device was renamed.
        if let Some(previous) = self.devices.get(&device.id).map(|d| d.clone()) {
            if previous.name != device.name {
                self.by_name
                    .remove(&(previous.tenant_id, previous.name));
            }
        }

        self.devices.insert(device.id, device.clone());
        self.credentials.insert(device.id, credentials);
        tracing::debug!(device_id = %device.id, name = %device.name, "device saved");
        Ok(device)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fleetlink_devices::service::ServiceError;
    use fleetlink_devices::DeviceProfileId;

    fn device(tenant_id: TenantId, name: &str) -> Device {
        let mut device = Device::new(tenant_id);
        device.name = name.to_string();
        device.device_profile_id = Some(DeviceProfileId::new());
        device
    }

    #[tokio::test]
    async fn save_and_find_by_name() {
        let store = InMemoryDeviceStore::new();
        let tenant_id = TenantId::new();

        let saved = store
            .save_device_with_credentials(
                device(tenant_id, "dev-1"),
                DeviceCredentials::access_token("t0ken"),
            )
            .await
            .unwrap();

        let found = store.find_device_by_name(tenant_id, "dev-1").await.unwrap();
        assert_eq!(found.unwrap().id, saved.id);
        assert!(store.credentials_for(saved.id).is_some());
    }

    #[tokio::test]
    async fn duplicate_name_is_rejected() {
        let store = InMemoryDeviceStore::new();
        let tenant_id = TenantId::new();

        store
            .save_device_with_credentials(
                device(tenant_id, "dev-1"),
                DeviceCredentials::access_token("a"),
            )
            .await
            .unwrap();

        let result = store
            .save_device_with_credentials(
                device(tenant_id, "dev-1"),
                DeviceCredentials::access_token("b"),
            )
            .await;

        assert!(matches!(result, Err(ServiceError::AlreadyExists(_))));
        assert_eq!(store.device_count(), 1);
    }

    #[tokio::test]
    async fn same_name_in_another_tenant_is_fine() {
        let store = InMemoryDeviceStore::new();

        for _ in 0..2 {
            store
                .save_device_with_credentials(
                    device(TenantId::new(), "dev-1"),
                    DeviceCredentials::access_token("t"),
                )
                .await
                .unwrap();
        }

        assert_eq!(store.device_count(), 2);
    }

    #[tokio::test]
    async fn rename_releases_old_name() {
        let store = InMemoryDeviceStore::new();
        let tenant_id = TenantId::new();

        let mut saved = store
            .save_device_with_credentials(
                device(tenant_id, "dev-1"),
                DeviceCredentials::access_token("t"),
            )
            .await
            .unwrap();

        saved.name = "dev-2".to_string();
        store
            .save_device_with_credentials(saved, DeviceCredentials::access_token("t"))
            .await
            .unwrap();

        assert!(store
            .find_device_by_name(tenant_id, "dev-1")
            .await
            .unwrap()
            .is_none());
        assert!(store
            .find_device_by_name(tenant_id, "dev-2")
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn device_without_profile_is_rejected() {
        let store = InMemoryDeviceStore::new();
        let mut device = Device::new(TenantId::new());
        device.name = "dev-1".to_string();

        let result = store
            .save_device_with_credentials(device, DeviceCredentials::access_token("t"))
            .await;

        assert!(matches!(result, Err(ServiceError::Validation(_))));
    }
}
