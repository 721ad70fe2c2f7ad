//! In-memory device profile store.

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use fleetlink_devices::service::{DeviceProfileService, ServiceResult};
use fleetlink_devices::{DeviceProfile, DeviceProfileId, TenantId};

use crate::error::Error;

/// Name of the profile created lazily as a tenant's default.
const DEFAULT_PROFILE_NAME: &str = "default";

/// Profile store over concurrent maps with a (tenant, name) index.
///
/// `find_or_create_profile` claims the name-index entry atomically, so
/// the generic find-or-create path cannot produce duplicates even
/// without the import-level creation lock.
#[derive(Default)]
pub struct InMemoryProfileStore {
    profiles: DashMap<DeviceProfileId, DeviceProfile>,
    by_name: DashMap<(TenantId, String), DeviceProfileId>,
    default_by_tenant: DashMap<TenantId, DeviceProfileId>,
}

impl InMemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored profiles.
    pub fn profile_count(&self) -> usize {
        self.profiles.len()
    }

    fn profile_by_id(&self, id: DeviceProfileId) -> ServiceResult<DeviceProfile> {
        self.profiles
            .get(&id)
            .map(|p| p.clone())
            .ok_or_else(|| Error::Inconsistent(format!("profile index out of sync: {id}")).into())
    }
}

#[async_trait]
impl DeviceProfileService for InMemoryProfileStore {
    async fn find_profile_by_name(
        &self,
        tenant_id: TenantId,
        name: &str,
    ) -> ServiceResult<Option<DeviceProfile>> {
        let id = self.by_name.get(&(tenant_id, name.to_string())).map(|e| *e);
        Ok(id.and_then(|id| self.profiles.get(&id).map(|p| p.clone())))
    }

    async fn save_profile(&self, profile: DeviceProfile) -> ServiceResult<DeviceProfile> {
        if profile.name.is_empty() {
            return Err(Error::InvalidInput("profile name is empty".to_string()).into());
        }

        match self.by_name.entry((profile.tenant_id, profile.name.clone())) {
            Entry::Occupied(entry) => {
                if *entry.get() != profile.id {
                    return Err(Error::AlreadyExists(format!(
                        "device profile with name '{}' already exists",
                        profile.name
                    ))
                    .into());
                }
            }
            Entry::Vacant(entry) => {
                entry.insert(profile.id);
            }
        }

        if let Some(previous) = self.profiles.get(&profile.id).map(|p| p.clone()) {
            if previous.name != profile.name {
                self.by_name.remove(&(previous.tenant_id, previous.name));
            }
        }

        self.profiles.insert(profile.id, profile.clone());
        tracing::debug!(profile_id = %profile.id, name = %profile.name, "device profile saved");
        Ok(profile)
    }

    async fn find_default_profile(&self, tenant_id: TenantId) -> ServiceResult<DeviceProfile> {
        let id = match self.default_by_tenant.entry(tenant_id) {
            Entry::Occupied(entry) => *entry.get(),
            Entry::Vacant(entry) => {
                let mut profile = DeviceProfile::new(tenant_id, DEFAULT_PROFILE_NAME);
                profile.default = true;
                self.profiles.insert(profile.id, profile.clone());
                self.by_name
                    .insert((tenant_id, profile.name.clone()), profile.id);
                entry.insert(profile.id);
                tracing::info!(tenant_id = %tenant_id, "created tenant default profile");
                return Ok(profile);
            }
        };
        self.profile_by_id(id)
    }

    async fn find_or_create_profile(
        &self,
        tenant_id: TenantId,
        name: &str,
    ) -> ServiceResult<DeviceProfile> {
        let id = match self.by_name.entry((tenant_id, name.to_string())) {
            Entry::Occupied(entry) => *entry.get(),
            Entry::Vacant(entry) => {
                let profile = DeviceProfile::new(tenant_id, name);
                self.profiles.insert(profile.id, profile.clone());
                entry.insert(profile.id);
                tracing::info!(tenant_id = %tenant_id, name = %name, "created device profile");
                return Ok(profile);
            }
        };
        self.profile_by_id(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fleetlink_devices::service::ServiceError;
    use fleetlink_devices::DeviceTransportType;

    #[tokio::test]
    async fn find_or_create_reuses_existing_profile() {
        let store = InMemoryProfileStore::new();
        let tenant_id = TenantId::new();

        let first = store.find_or_create_profile(tenant_id, "Sensor-A").await.unwrap();
        let second = store.find_or_create_profile(tenant_id, "Sensor-A").await.unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(store.profile_count(), 1);
        assert_eq!(first.transport_type, DeviceTransportType::Default);
    }

    #[tokio::test]
    async fn default_profile_is_created_once_per_tenant() {
        let store = InMemoryProfileStore::new();
        let tenant_id = TenantId::new();

        let first = store.find_default_profile(tenant_id).await.unwrap();
        let second = store.find_default_profile(tenant_id).await.unwrap();

        assert_eq!(first.id, second.id);
        assert!(first.default);
        assert_eq!(store.profile_count(), 1);
    }

    #[tokio::test]
    async fn duplicate_profile_name_is_rejected() {
        let store = InMemoryProfileStore::new();
        let tenant_id = TenantId::new();

        store
            .save_profile(DeviceProfile::new(tenant_id, "Sensor-A"))
            .await
            .unwrap();
        let result = store
            .save_profile(DeviceProfile::new(tenant_id, "Sensor-A"))
            .await;

        assert!(matches!(result, Err(ServiceError::AlreadyExists(_))));
    }

    #[tokio::test]
    async fn save_updates_profile_in_place() {
        let store = InMemoryProfileStore::new();
        let tenant_id = TenantId::new();

        let mut profile = store.find_or_create_profile(tenant_id, "Sensor-A").await.unwrap();
        profile.transport_type = DeviceTransportType::Lwm2m;
        store.save_profile(profile.clone()).await.unwrap();

        let found = store
            .find_profile_by_name(tenant_id, "Sensor-A")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id, profile.id);
        assert_eq!(found.transport_type, DeviceTransportType::Lwm2m);
        assert_eq!(store.profile_count(), 1);
    }
}
