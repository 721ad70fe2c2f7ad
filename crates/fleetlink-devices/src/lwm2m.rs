//! LwM2M credential payloads.
//!
//! The client section is modeled as an enum tagged by security mode:
//! decoding a raw column object through it projects away every field the
//! detected mode does not use, so a PSK client can never carry a
//! certificate in its encoded form.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CredentialsError;

/// LwM2M security modes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Lwm2mSecurityMode {
    #[default]
    NoSec,
    Psk,
    Rpk,
    X509,
}

impl Lwm2mSecurityMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoSec => "NO_SEC",
            Self::Psk => "PSK",
            Self::Rpk => "RPK",
            Self::X509 => "X509",
        }
    }
}

impl std::fmt::Display for Lwm2mSecurityMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Lwm2mSecurityMode {
    type Err = CredentialsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "NO_SEC" => Ok(Self::NoSec),
            "PSK" => Ok(Self::Psk),
            "RPK" => Ok(Self::Rpk),
            "X509" => Ok(Self::X509),
            _ => Err(CredentialsError::UnknownSecurityMode {
                value: s.to_string(),
            }),
        }
    }
}

/// Client credential section, tagged by security mode.
///
/// Each variant carries exactly the fields its mode uses; serde drops
/// anything else during deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "securityConfigClientMode")]
pub enum Lwm2mClientCredentials {
    #[serde(rename = "NO_SEC")]
    NoSec { endpoint: String },
    #[serde(rename = "PSK")]
    Psk {
        endpoint: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        identity: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        key: Option<String>,
    },
    #[serde(rename = "RPK")]
    Rpk {
        endpoint: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        key: Option<String>,
    },
    #[serde(rename = "X509")]
    X509 {
        endpoint: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        cert: Option<String>,
    },
}

impl Lwm2mClientCredentials {
    pub fn security_mode(&self) -> Lwm2mSecurityMode {
        match self {
            Self::NoSec { .. } => Lwm2mSecurityMode::NoSec,
            Self::Psk { .. } => Lwm2mSecurityMode::Psk,
            Self::Rpk { .. } => Lwm2mSecurityMode::Rpk,
            Self::X509 { .. } => Lwm2mSecurityMode::X509,
        }
    }

    pub fn endpoint(&self) -> &str {
        match self {
            Self::NoSec { endpoint }
            | Self::Psk { endpoint, .. }
            | Self::Rpk { endpoint, .. }
            | Self::X509 { endpoint, .. } => endpoint,
        }
    }
}

/// Security settings for one server of the bootstrap section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lwm2mServerCredentials {
    #[serde(default)]
    pub security_mode: Lwm2mSecurityMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_public_key_or_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_secret_key: Option<String>,
}

/// Bootstrap section: symmetric settings for the bootstrap server and
/// the regular LwM2M server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lwm2mBootstrapCredentials {
    pub bootstrap_server: Lwm2mServerCredentials,
    pub lwm2m_server: Lwm2mServerCredentials,
}

/// Full LwM2M credential payload as stored in the credential value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lwm2mCredentials {
    pub client: Lwm2mClientCredentials,
    pub bootstrap: Lwm2mBootstrapCredentials,
}
