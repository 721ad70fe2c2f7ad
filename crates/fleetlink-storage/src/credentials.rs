//! Credential normalization applied before persistence.

use async_trait::async_trait;

use fleetlink_devices::service::{DeviceCredentialsService, ServiceResult};
use fleetlink_devices::{
    BasicMqttCredentials, CredentialsError, DeviceCredentials, DeviceCredentialsType,
    Lwm2mCredentials,
};

use crate::error::Error;

/// Canonicalizes credentials and validates that the stored value parses
/// for the declared type. Structured payloads are re-encoded so that the
/// persisted form is always canonical JSON.
#[derive(Debug, Default, Clone, Copy)]
pub struct CredentialsFormatter;

impl CredentialsFormatter {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl DeviceCredentialsService for CredentialsFormatter {
    async fn format_credentials(
        &self,
        mut credentials: DeviceCredentials,
    ) -> ServiceResult<DeviceCredentials> {
        match credentials.credentials_type {
            DeviceCredentialsType::AccessToken => {
                let token = credentials
                    .credentials_id
                    .as_deref()
                    .map(str::trim)
                    .unwrap_or_default();
                if token.is_empty() {
                    return Err(CredentialsError::MissingField("access token").into());
                }
                credentials.credentials_id = Some(token.to_string());
                credentials.credentials_value = None;
            }
            DeviceCredentialsType::X509Certificate => {
                let certificate = credentials
                    .credentials_value
                    .as_deref()
                    .map(str::trim)
                    .unwrap_or_default();
                if certificate.is_empty() {
                    return Err(CredentialsError::MissingField("certificate").into());
                }
                // Stored without line breaks, the way the transport expects it.
                let flattened: String = certificate
                    .chars()
                    .filter(|c| *c != '\n' && *c != '\r')
                    .collect();
                credentials.credentials_value = Some(flattened);
            }
            DeviceCredentialsType::MqttBasic => {
                let raw = credentials.credentials_value.as_deref().unwrap_or_default();
                let payload: BasicMqttCredentials = serde_json::from_str(raw)
                    .map_err(|e| Error::Serialization(format!("malformed MQTT credentials: {e}")))?;
                if payload.client_id.is_none() && payload.user_name.is_none() {
                    return Err(Error::InvalidInput(
                        "MQTT credentials must contain a client ID or a user name".to_string(),
                    )
                    .into());
                }
                credentials.credentials_value =
                    Some(serde_json::to_string(&payload).map_err(Error::from)?);
            }
            DeviceCredentialsType::Lwm2mCredentials => {
                let raw = credentials.credentials_value.as_deref().unwrap_or_default();
                let payload: Lwm2mCredentials = serde_json::from_str(raw).map_err(|e| {
                    Error::Serialization(format!("malformed LwM2M credentials: {e}"))
                })?;
                // The client endpoint is the external credential identifier.
                credentials.credentials_id = Some(payload.client.endpoint().to_string());
                credentials.credentials_value =
                    Some(serde_json::to_string(&payload).map_err(Error::from)?);
            }
        }
        Ok(credentials)
    }
}
