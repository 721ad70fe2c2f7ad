//! Field mapper: descriptive columns onto a device entity.

use fleetlink_devices::Device;

use crate::columns::{BulkImportColumnType, ImportRow};

/// Copy the descriptive columns of a row onto a device.
///
/// Credential columns are left to the credential resolver and columns
/// this version does not recognize are ignored. Metadata keys are set
/// individually, so anything already on the device survives.
pub fn map_device_fields(device: &mut Device, row: &ImportRow) {
    for (column, value) in row.iter() {
        match column {
            BulkImportColumnType::Name => device.name = value.to_string(),
            BulkImportColumnType::Type => device.device_type = value.to_string(),
            BulkImportColumnType::Label => device.label = Some(value.to_string()),
            BulkImportColumnType::Description => {
                device.metadata.description = Some(value.to_string());
            }
            BulkImportColumnType::IsGateway => {
                // Anything that is not "true" (case-insensitive) is false.
                device.metadata.gateway = Some(value.eq_ignore_ascii_case("true"));
            }
            _ => {}
        }
    }
}
