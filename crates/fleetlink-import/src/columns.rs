//! Import column tags and the row type.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Column tags recognized by the bulk-import flow.
///
/// Credential columns additionally carry the JSON key they map to inside
/// a structured payload, and security-mode columns carry a default used
/// when the column is absent from a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BulkImportColumnType {
    Name,
    Type,
    Label,
    Description,
    IsGateway,
    AccessToken,
    X509,
    MqttClientId,
    MqttUserName,
    MqttPassword,
    Lwm2mClientEndpoint,
    Lwm2mClientSecurityConfigMode,
    Lwm2mClientIdentity,
    Lwm2mClientKey,
    Lwm2mClientCert,
    Lwm2mBootstrapServerSecurityMode,
    Lwm2mBootstrapServerPublicKeyOrId,
    Lwm2mBootstrapServerSecretKey,
    Lwm2mServerSecurityMode,
    Lwm2mServerClientPublicKeyOrId,
    Lwm2mServerClientSecretKey,
}

impl BulkImportColumnType {
    /// JSON key this column maps to inside a structured credential
    /// payload. `None` for columns that never appear in a payload.
    pub fn payload_key(&self) -> Option<&'static str> {
        match self {
            Self::MqttClientId => Some("clientId"),
            Self::MqttUserName => Some("userName"),
            Self::MqttPassword => Some("password"),
            Self::Lwm2mClientEndpoint => Some("endpoint"),
            Self::Lwm2mClientSecurityConfigMode => Some("securityConfigClientMode"),
            Self::Lwm2mClientIdentity => Some("identity"),
            Self::Lwm2mClientKey => Some("key"),
            Self::Lwm2mClientCert => Some("cert"),
            Self::Lwm2mBootstrapServerSecurityMode | Self::Lwm2mServerSecurityMode => {
                Some("securityMode")
            }
            Self::Lwm2mBootstrapServerPublicKeyOrId | Self::Lwm2mServerClientPublicKeyOrId => {
                Some("clientPublicKeyOrId")
            }
            Self::Lwm2mBootstrapServerSecretKey | Self::Lwm2mServerClientSecretKey => {
                Some("clientSecretKey")
            }
            _ => None,
        }
    }

    /// Default payload value substituted when the column is absent.
    pub fn default_value(&self) -> Option<&'static str> {
        match self {
            Self::Lwm2mClientSecurityConfigMode
            | Self::Lwm2mBootstrapServerSecurityMode
            | Self::Lwm2mServerSecurityMode => Some("NO_SEC"),
            _ => None,
        }
    }
}

/// One import row: column tag → raw string value. One row describes one
/// device.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImportRow {
    values: HashMap<BulkImportColumnType, String>,
}

impl ImportRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn set(mut self, column: BulkImportColumnType, value: impl Into<String>) -> Self {
        self.values.insert(column, value.into());
        self
    }

    pub fn insert(&mut self, column: BulkImportColumnType, value: impl Into<String>) {
        self.values.insert(column, value.into());
    }

    pub fn get(&self, column: BulkImportColumnType) -> Option<&str> {
        self.values.get(&column).map(String::as_str)
    }

    pub fn contains(&self, column: BulkImportColumnType) -> bool {
        self.values.contains_key(&column)
    }

    pub fn contains_any(&self, columns: &[BulkImportColumnType]) -> bool {
        columns.iter().any(|c| self.contains(*c))
    }

    pub fn iter(&self) -> impl Iterator<Item = (BulkImportColumnType, &str)> {
        self.values.iter().map(|(c, v)| (*c, v.as_str()))
    }
}

impl From<HashMap<BulkImportColumnType, String>> for ImportRow {
    fn from(values: HashMap<BulkImportColumnType, String>) -> Self {
        Self { values }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn security_mode_columns_default_to_no_sec() {
        assert_eq!(
            BulkImportColumnType::Lwm2mClientSecurityConfigMode.default_value(),
            Some("NO_SEC")
        );
        assert_eq!(BulkImportColumnType::Lwm2mClientKey.default_value(), None);
        assert_eq!(BulkImportColumnType::Name.default_value(), None);
    }

    #[test]
    fn descriptive_columns_have_no_payload_key() {
        assert_eq!(BulkImportColumnType::Name.payload_key(), None);
        assert_eq!(BulkImportColumnType::AccessToken.payload_key(), None);
        assert_eq!(BulkImportColumnType::MqttClientId.payload_key(), Some("clientId"));
    }

    #[test]
    fn row_lookup() {
        let row = ImportRow::new()
            .set(BulkImportColumnType::Name, "dev-1")
            .set(BulkImportColumnType::MqttClientId, "c1");

        assert_eq!(row.get(BulkImportColumnType::Name), Some("dev-1"));
        assert!(row.contains_any(&[
            BulkImportColumnType::MqttClientId,
            BulkImportColumnType::MqttUserName,
        ]));
        assert!(!row.contains(BulkImportColumnType::X509));
    }
}
