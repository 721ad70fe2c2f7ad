//! Profile resolver: find, upgrade, or create the transport profile a
//! device attaches to.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::{debug, info};

use fleetlink_devices::service::DeviceProfileService;
use fleetlink_devices::{
    DeviceCredentialsType, DeviceProfile, DeviceProfileTransportConfiguration,
    DeviceTransportType, TenantId,
};

use crate::error::{ImportError, ImportResult};

/// What to do when an existing profile's transport does not match the
/// LwM2M credentials of an imported row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ProfileUpgradePolicy {
    /// Switch the profile to the LwM2M transport in place. Matches the
    /// historical behavior; last writer wins if upgrades race.
    #[default]
    UpgradeTransport,
    /// Fail the row instead of mutating a profile other devices may
    /// rely on.
    Reject,
}

/// Resolves the device profile for an import row.
///
/// The LwM2M path is the concurrency-critical one: creation of a missing
/// profile is serialized per (tenant, name) with double-checked locking,
/// so concurrent rows racing on the same name create exactly one
/// profile. The optimistic lookup and the upgrade branch stay outside
/// the lock.
pub struct ProfileResolver {
    profiles: Arc<dyn DeviceProfileService>,
    upgrade_policy: ProfileUpgradePolicy,
    // One creation lock per (tenant, profile name). Stripes are
    // retained for the process lifetime; the key space is the distinct
    // names actually imported.
    create_locks: DashMap<(TenantId, String), Arc<Mutex<()>>>,
}

impl ProfileResolver {
    pub fn new(profiles: Arc<dyn DeviceProfileService>) -> Self {
        Self {
            profiles,
            upgrade_policy: ProfileUpgradePolicy::default(),
            create_locks: DashMap::new(),
        }
    }

    pub fn with_upgrade_policy(mut self, policy: ProfileUpgradePolicy) -> Self {
        self.upgrade_policy = policy;
        self
    }

    /// Resolve the profile for a device with the given type label and
    /// credential type.
    pub async fn resolve(
        &self,
        tenant_id: TenantId,
        device_type: &str,
        credentials_type: DeviceCredentialsType,
    ) -> ImportResult<DeviceProfile> {
        if credentials_type == DeviceCredentialsType::Lwm2mCredentials {
            self.resolve_lwm2m(tenant_id, device_type).await
        } else if !device_type.is_empty() {
            self.profiles
                .find_or_create_profile(tenant_id, device_type)
                .await
                .map_err(ImportError::ProfileResolution)
        } else {
            self.profiles
                .find_default_profile(tenant_id)
                .await
                .map_err(ImportError::ProfileResolution)
        }
    }

    async fn resolve_lwm2m(&self, tenant_id: TenantId, name: &str) -> ImportResult<DeviceProfile> {
        // Optimistic lookup, no lock.
        if let Some(profile) = self
            .profiles
            .find_profile_by_name(tenant_id, name)
            .await
            .map_err(ImportError::ProfileResolution)?
        {
            return self.ensure_lwm2m_transport(profile).await;
        }

        let lock = self.create_lock(tenant_id, name);
        let _guard = lock.lock().await;

        // Re-check under the lock: another row may have created it.
        if let Some(profile) = self
            .profiles
            .find_profile_by_name(tenant_id, name)
            .await
            .map_err(ImportError::ProfileResolution)?
        {
            return self.ensure_lwm2m_transport(profile).await;
        }

        let profile = DeviceProfile::lwm2m(tenant_id, name);
        let profile = self
            .profiles
            .save_profile(profile)
            .await
            .map_err(ImportError::ProfileResolution)?;
        info!(tenant_id = %tenant_id, name = %name, "created LwM2M device profile");
        Ok(profile)
    }

    async fn ensure_lwm2m_transport(
        &self,
        mut profile: DeviceProfile,
    ) -> ImportResult<DeviceProfile> {
        if profile.transport_type == DeviceTransportType::Lwm2m {
            return Ok(profile);
        }
        match self.upgrade_policy {
            ProfileUpgradePolicy::Reject => Err(ImportError::ProfileTransportConflict {
                name: profile.name,
            }),
            ProfileUpgradePolicy::UpgradeTransport => {
                profile.transport_type = DeviceTransportType::Lwm2m;
                profile.profile_data.transport_configuration =
                    DeviceProfileTransportConfiguration::Lwm2m;
                let profile = self
                    .profiles
                    .save_profile(profile)
                    .await
                    .map_err(ImportError::ProfileResolution)?;
                debug!(name = %profile.name, "upgraded device profile transport to LwM2M");
                Ok(profile)
            }
        }
    }

    fn create_lock(&self, tenant_id: TenantId, name: &str) -> Arc<Mutex<()>> {
        self.create_locks
            .entry((tenant_id, name.to_string()))
            .or_default()
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fleetlink_devices::DeviceProfileProvisionType;
    use fleetlink_storage::InMemoryProfileStore;

    fn resolver_with_store() -> (Arc<InMemoryProfileStore>, ProfileResolver) {
        let store = Arc::new(InMemoryProfileStore::new());
        let resolver = ProfileResolver::new(store.clone());
        (store, resolver)
    }

    #[tokio::test]
    async fn non_lwm2m_type_uses_find_or_create() {
        let (store, resolver) = resolver_with_store();
        let tenant_id = TenantId::new();

        let profile = resolver
            .resolve(tenant_id, "Sensor-A", DeviceCredentialsType::AccessToken)
            .await
            .unwrap();

        assert_eq!(profile.name, "Sensor-A");
        assert_eq!(profile.transport_type, DeviceTransportType::Default);
        assert_eq!(store.profile_count(), 1);
    }

    #[tokio::test]
    async fn empty_type_uses_tenant_default() {
        let (_store, resolver) = resolver_with_store();
        let tenant_id = TenantId::new();

        let profile = resolver
            .resolve(tenant_id, "", DeviceCredentialsType::AccessToken)
            .await
            .unwrap();

        assert!(profile.default);
    }

    #[tokio::test]
    async fn lwm2m_profile_is_created_with_lwm2m_transport() {
        let (_store, resolver) = resolver_with_store();
        let tenant_id = TenantId::new();

        let profile = resolver
            .resolve(tenant_id, "Tracker", DeviceCredentialsType::Lwm2mCredentials)
            .await
            .unwrap();

        assert_eq!(profile.transport_type, DeviceTransportType::Lwm2m);
        assert_eq!(profile.provision_type, DeviceProfileProvisionType::Disabled);
        assert_eq!(
            profile.profile_data.transport_configuration,
            DeviceProfileTransportConfiguration::Lwm2m
        );
    }

    #[tokio::test]
    async fn existing_lwm2m_profile_is_reused_unchanged() {
        let (store, resolver) = resolver_with_store();
        let tenant_id = TenantId::new();

        let first = resolver
            .resolve(tenant_id, "Tracker", DeviceCredentialsType::Lwm2mCredentials)
            .await
            .unwrap();
        let second = resolver
            .resolve(tenant_id, "Tracker", DeviceCredentialsType::Lwm2mCredentials)
            .await
            .unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(store.profile_count(), 1);
    }

    #[tokio::test]
    async fn conflicting_profile_is_upgraded_in_place_by_default() {
        let (store, resolver) = resolver_with_store();
        let tenant_id = TenantId::new();

        let existing = resolver
            .resolve(tenant_id, "Tracker", DeviceCredentialsType::AccessToken)
            .await
            .unwrap();
        assert_eq!(existing.transport_type, DeviceTransportType::Default);

        let upgraded = resolver
            .resolve(tenant_id, "Tracker", DeviceCredentialsType::Lwm2mCredentials)
            .await
            .unwrap();

        assert_eq!(upgraded.id, existing.id);
        assert_eq!(upgraded.transport_type, DeviceTransportType::Lwm2m);
        assert_eq!(store.profile_count(), 1);
    }

    #[tokio::test]
    async fn reject_policy_fails_instead_of_upgrading() {
        let store = Arc::new(InMemoryProfileStore::new());
        let resolver = ProfileResolver::new(store.clone())
            .with_upgrade_policy(ProfileUpgradePolicy::Reject);
        let tenant_id = TenantId::new();

        resolver
            .resolve(tenant_id, "Tracker", DeviceCredentialsType::AccessToken)
            .await
            .unwrap();

        let result = resolver
            .resolve(tenant_id, "Tracker", DeviceCredentialsType::Lwm2mCredentials)
            .await;

        assert!(matches!(
            result,
            Err(ImportError::ProfileTransportConflict { .. })
        ));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn concurrent_resolutions_create_exactly_one_profile() {
        let store = Arc::new(InMemoryProfileStore::new());
        let resolver = Arc::new(ProfileResolver::new(store.clone()));
        let tenant_id = TenantId::new();

        let mut handles = Vec::new();
        for _ in 0..32 {
            let resolver = resolver.clone();
            handles.push(tokio::spawn(async move {
                resolver
                    .resolve(tenant_id, "Tracker", DeviceCredentialsType::Lwm2mCredentials)
                    .await
                    .unwrap()
                    .id
            }));
        }

        let mut ids = Vec::new();
        for handle in handles {
            ids.push(handle.await.unwrap());
        }

        assert_eq!(store.profile_count(), 1);
        assert!(ids.windows(2).all(|pair| pair[0] == pair[1]));
    }
}
