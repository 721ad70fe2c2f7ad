//! Device credentials and the MQTT basic-auth payload.

use serde::{Deserialize, Serialize};

use crate::lwm2m::Lwm2mCredentials;

/// The authentication scheme a device uses to connect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeviceCredentialsType {
    AccessToken,
    MqttBasic,
    X509Certificate,
    Lwm2mCredentials,
}

/// Authentication material of a device, 1:1 with the device itself.
///
/// `credentials_value` holds a type-specific encoding: a JSON payload
/// for MQTT basic and LwM2M credentials, the raw certificate for X.509.
/// Access tokens live in `credentials_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceCredentials {
    pub credentials_type: DeviceCredentialsType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credentials_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credentials_value: Option<String>,
}

impl DeviceCredentials {
    pub fn access_token(token: impl Into<String>) -> Self {
        Self {
            credentials_type: DeviceCredentialsType::AccessToken,
            credentials_id: Some(token.into()),
            credentials_value: None,
        }
    }

    pub fn mqtt_basic(payload: &BasicMqttCredentials) -> Result<Self, serde_json::Error> {
        Ok(Self {
            credentials_type: DeviceCredentialsType::MqttBasic,
            credentials_id: None,
            credentials_value: Some(serde_json::to_string(payload)?),
        })
    }

    pub fn x509_certificate(certificate: impl Into<String>) -> Self {
        Self {
            credentials_type: DeviceCredentialsType::X509Certificate,
            credentials_id: None,
            credentials_value: Some(certificate.into()),
        }
    }

    pub fn lwm2m(payload: &Lwm2mCredentials) -> Result<Self, serde_json::Error> {
        Ok(Self {
            credentials_type: DeviceCredentialsType::Lwm2mCredentials,
            credentials_id: None,
            credentials_value: Some(serde_json::to_string(payload)?),
        })
    }
}

/// MQTT basic-auth payload. Absent fields are omitted from the encoded
/// JSON rather than defaulted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BasicMqttCredentials {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}
