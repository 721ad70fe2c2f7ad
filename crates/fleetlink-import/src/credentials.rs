//! Credential resolver: pick one scheme per row and build its payload.

use rand::distributions::Alphanumeric;
use rand::Rng;

use fleetlink_devices::{
    BasicMqttCredentials, CredentialsError, DeviceCredentials, DeviceCredentialsType,
    Lwm2mBootstrapCredentials, Lwm2mClientCredentials, Lwm2mCredentials, Lwm2mSecurityMode,
    Lwm2mServerCredentials,
};

use crate::columns::{BulkImportColumnType, ImportRow};
use crate::error::ImportError;

/// Length of a generated access token.
const GENERATED_TOKEN_LEN: usize = 20;

/// The credential scheme selected for a row.
///
/// Rows may carry stray columns for several schemes at once; selection
/// is a strict priority order and the first match wins, so the outcome
/// is deterministic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialScheme {
    Lwm2m,
    X509,
    MqttBasic,
    /// Fallback; always applicable.
    AccessToken,
}

impl CredentialScheme {
    /// Decide the scheme for a row. Priority: LwM2M, then X.509, then
    /// MQTT basic, then access token.
    pub fn for_row(row: &ImportRow) -> Self {
        if row.contains(BulkImportColumnType::Lwm2mClientEndpoint) {
            Self::Lwm2m
        } else if row.contains(BulkImportColumnType::X509) {
            Self::X509
        } else if row.contains_any(&[
            BulkImportColumnType::MqttClientId,
            BulkImportColumnType::MqttUserName,
            BulkImportColumnType::MqttPassword,
        ]) {
            Self::MqttBasic
        } else {
            Self::AccessToken
        }
    }

    pub fn credentials_type(&self) -> DeviceCredentialsType {
        match self {
            Self::Lwm2m => DeviceCredentialsType::Lwm2mCredentials,
            Self::X509 => DeviceCredentialsType::X509Certificate,
            Self::MqttBasic => DeviceCredentialsType::MqttBasic,
            Self::AccessToken => DeviceCredentialsType::AccessToken,
        }
    }
}

/// Build the credentials for a row according to its detected scheme.
///
/// Any failure is wrapped into [`ImportError::InvalidCredentials`] with
/// the original cause message; the row must not proceed past this point.
pub fn build_credentials(row: &ImportRow) -> Result<DeviceCredentials, ImportError> {
    let built = match CredentialScheme::for_row(row) {
        CredentialScheme::AccessToken => Ok(access_token_credentials(row)),
        CredentialScheme::MqttBasic => mqtt_basic_credentials(row),
        CredentialScheme::X509 => Ok(x509_credentials(row)),
        CredentialScheme::Lwm2m => lwm2m_credentials(row),
    };
    built.map_err(|e| ImportError::InvalidCredentials(e.to_string()))
}

fn access_token_credentials(row: &ImportRow) -> DeviceCredentials {
    let token = row
        .get(BulkImportColumnType::AccessToken)
        .map(str::to_string)
        .unwrap_or_else(generate_access_token);
    DeviceCredentials::access_token(token)
}

/// Random 20-character alphanumeric token. Uniqueness is enforced at
/// persistence time, not here.
fn generate_access_token() -> String {
    let rng = rand::thread_rng();
    rng.sample_iter(Alphanumeric)
        .take(GENERATED_TOKEN_LEN)
        .map(char::from)
        .collect()
}

fn mqtt_basic_credentials(row: &ImportRow) -> Result<DeviceCredentials, CredentialsError> {
    let payload = BasicMqttCredentials {
        client_id: row.get(BulkImportColumnType::MqttClientId).map(str::to_string),
        user_name: row.get(BulkImportColumnType::MqttUserName).map(str::to_string),
        password: row.get(BulkImportColumnType::MqttPassword).map(str::to_string),
    };
    Ok(DeviceCredentials::mqtt_basic(&payload)?)
}

fn x509_credentials(row: &ImportRow) -> DeviceCredentials {
    let certificate = row.get(BulkImportColumnType::X509).unwrap_or_default();
    DeviceCredentials::x509_certificate(certificate)
}

fn lwm2m_credentials(row: &ImportRow) -> Result<DeviceCredentials, CredentialsError> {
    // Every security mode actually supplied must be in the fixed set
    // before anything gets encoded.
    for column in [
        BulkImportColumnType::Lwm2mClientSecurityConfigMode,
        BulkImportColumnType::Lwm2mBootstrapServerSecurityMode,
        BulkImportColumnType::Lwm2mServerSecurityMode,
    ] {
        if let Some(value) = row.get(column) {
            value.parse::<Lwm2mSecurityMode>()?;
        }
    }

    // Decoding through the mode-tagged enum keeps only the fields the
    // client's security mode actually uses.
    let client: Lwm2mClientCredentials = serde_json::from_value(column_object(
        row,
        &[
            BulkImportColumnType::Lwm2mClientSecurityConfigMode,
            BulkImportColumnType::Lwm2mClientEndpoint,
            BulkImportColumnType::Lwm2mClientIdentity,
            BulkImportColumnType::Lwm2mClientKey,
            BulkImportColumnType::Lwm2mClientCert,
        ],
    ))?;

    let bootstrap_server: Lwm2mServerCredentials = serde_json::from_value(column_object(
        row,
        &[
            BulkImportColumnType::Lwm2mBootstrapServerSecurityMode,
            BulkImportColumnType::Lwm2mBootstrapServerPublicKeyOrId,
            BulkImportColumnType::Lwm2mBootstrapServerSecretKey,
        ],
    ))?;

    let lwm2m_server: Lwm2mServerCredentials = serde_json::from_value(column_object(
        row,
        &[
            BulkImportColumnType::Lwm2mServerSecurityMode,
            BulkImportColumnType::Lwm2mServerClientPublicKeyOrId,
            BulkImportColumnType::Lwm2mServerClientSecretKey,
        ],
    ))?;

    let payload = Lwm2mCredentials {
        client,
        bootstrap: Lwm2mBootstrapCredentials {
            bootstrap_server,
            lwm2m_server,
        },
    };
    Ok(DeviceCredentials::lwm2m(&payload)?)
}

/// Build a JSON object from the given columns: row value if present,
/// else the column's default, skipped entirely when neither exists.
fn column_object(row: &ImportRow, columns: &[BulkImportColumnType]) -> serde_json::Value {
    let mut object = serde_json::Map::new();
    for column in columns {
        let value = row.get(*column).or_else(|| column.default_value());
        if let (Some(value), Some(key)) = (value, column.payload_key()) {
            object.insert(key.to_string(), serde_json::Value::String(value.to_string()));
        }
    }
    serde_json::Value::Object(object)
}
