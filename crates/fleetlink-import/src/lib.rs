//! Bulk Device Import - row-by-row device provisioning
//!
//! Turns tabular import rows (column tag → raw string value) into
//! persisted devices. Per row, the flow is:
//!
//! 1. **Field mapping**: descriptive columns onto a device entity
//! 2. **Credential resolution**: pick one credential scheme by a fixed
//!    priority order and build its payload
//! 3. **Profile resolution**: find, upgrade, or create the transport
//!    profile the device attaches to (race-safe for LwM2M)
//! 4. **Upsert**: create the device or merge onto an existing one and
//!    persist device + credentials as one logical operation
//!
//! Rows are independent; a failed row is reported and never blocks the
//! rest of the batch.

pub mod columns;
pub mod credentials;
pub mod error;
pub mod fields;
pub mod import;
pub mod profile;

pub use columns::{BulkImportColumnType, ImportRow};
pub use credentials::{build_credentials, CredentialScheme};
pub use error::{ImportError, ImportResult};
pub use fields::map_device_fields;
pub use import::{BulkImportResult, DeviceImportService, ImportedEntityInfo};
pub use profile::{ProfileResolver, ProfileUpgradePolicy};
