//! Upsert coordinator: one row in, one created or updated device out.

use std::sync::Arc;

use tracing::{debug, warn};

use fleetlink_devices::service::{
    DeviceCredentialsService, DeviceProfileService, DeviceService,
};
use fleetlink_devices::{Device, TenantId};

use crate::columns::ImportRow;
use crate::credentials::build_credentials;
use crate::error::{ImportError, ImportResult};
use crate::fields::map_device_fields;
use crate::profile::{ProfileResolver, ProfileUpgradePolicy};

/// Result of importing a single row.
#[derive(Debug, Clone)]
pub struct ImportedEntityInfo<T> {
    pub entity: T,
    /// True when an existing entity was updated rather than created.
    pub updated: bool,
    /// Snapshot of the entity before the update, for downstream
    /// auditing.
    pub old_entity: Option<T>,
}

/// Aggregate outcome of a batch import.
#[derive(Debug, Clone, Default)]
pub struct BulkImportResult {
    pub created: usize,
    pub updated: usize,
    pub errors: usize,
    /// One message per failed row.
    pub error_messages: Vec<String>,
}

/// Per-row device provisioning: field mapping, credential resolution,
/// profile resolution, and the final create-or-update save.
pub struct DeviceImportService {
    devices: Arc<dyn DeviceService>,
    credentials: Arc<dyn DeviceCredentialsService>,
    profile_resolver: ProfileResolver,
}

impl DeviceImportService {
    pub fn new(
        devices: Arc<dyn DeviceService>,
        credentials: Arc<dyn DeviceCredentialsService>,
        profiles: Arc<dyn DeviceProfileService>,
    ) -> Self {
        Self {
            devices,
            credentials,
            profile_resolver: ProfileResolver::new(profiles),
        }
    }

    pub fn with_upgrade_policy(mut self, policy: ProfileUpgradePolicy) -> Self {
        self.profile_resolver = self.profile_resolver.with_upgrade_policy(policy);
        self
    }

    /// Import one row.
    ///
    /// With `update_existing` set, a device matched by (tenant, name)
    /// is merged field-wise and its prior state is returned alongside.
    /// Otherwise a name collision is left to the persistence layer,
    /// which reports a conflict rather than overwriting.
    pub async fn import_row(
        &self,
        tenant_id: TenantId,
        row: &ImportRow,
        update_existing: bool,
    ) -> ImportResult<ImportedEntityInfo<Device>> {
        let mut device = Device::new(tenant_id);
        map_device_fields(&mut device, row);

        let mut updated = false;
        let mut old_entity = None;
        if update_existing {
            let existing = self
                .devices
                .find_device_by_name(tenant_id, &device.name)
                .await
                .map_err(ImportError::Persistence)?;
            if let Some(existing) = existing {
                old_entity = Some(existing.clone());
                let mut merged = existing;
                merged.apply_update(&device);
                device = merged;
                updated = true;
            }
        }

        let credentials = build_credentials(row)?;
        let credentials = self
            .credentials
            .format_credentials(credentials)
            .await
            .map_err(|e| ImportError::InvalidCredentials(e.to_string()))?;

        let profile = self
            .profile_resolver
            .resolve(tenant_id, &device.device_type, credentials.credentials_type)
            .await?;
        device.device_profile_id = Some(profile.id);

        let device = self
            .devices
            .save_device_with_credentials(device, credentials)
            .await
            .map_err(ImportError::Persistence)?;

        debug!(device_id = %device.id, name = %device.name, updated, "imported device");
        Ok(ImportedEntityInfo {
            entity: device,
            updated,
            old_entity,
        })
    }

    /// Import a batch of rows. Failed rows are recorded in the result
    /// and do not stop the remaining rows.
    pub async fn import_rows(
        &self,
        tenant_id: TenantId,
        rows: &[ImportRow],
        update_existing: bool,
    ) -> BulkImportResult {
        let mut result = BulkImportResult::default();
        for (index, row) in rows.iter().enumerate() {
            match self.import_row(tenant_id, row, update_existing).await {
                Ok(info) if info.updated => result.updated += 1,
                Ok(_) => result.created += 1,
                Err(e) => {
                    warn!(row = index + 1, error = %e, "row import failed");
                    result.errors += 1;
                    result.error_messages.push(format!("row {}: {e}", index + 1));
                }
            }
        }
        result
    }
}
