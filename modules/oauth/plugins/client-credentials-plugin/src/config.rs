//! Configuration for the client-credentials provider plugin.

use std::time::Duration;

use oauth_sdk::token::claims;
use serde::{Deserialize, Deserializer};

/// Plugin configuration, one entry per configured issuer.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClientCredentialsPluginConfig {
    /// Stable provider id used for selection and logging.
    pub id: String,

    /// Human readable label.
    pub label: String,

    /// Accepted `iss` value. Without an issuer the provider handles no tokens.
    pub issuer: Option<String>,

    /// Location of the issuer's JWKS document.
    pub public_key_uri: Option<String>,

    /// How often the JWKS document is fetched again.
    #[serde(deserialize_with = "deserialize_duration")]
    pub refresh_interval: Duration,

    /// Payload claim that names the acting identity.
    pub identity_claim: IdentityClaim,
}

impl Default for ClientCredentialsPluginConfig {
    fn default() -> Self {
        Self {
            id: "client-credentials".to_owned(),
            label: "Client Credentials OAuth".to_owned(),
            issuer: None,
            public_key_uri: None,
            refresh_interval: Duration::from_secs(600),
            identity_claim: IdentityClaim::default(),
        }
    }
}

/// Which payload claim identifies the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum IdentityClaim {
    /// `client_id`, set by client-credentials grants.
    #[default]
    ClientId,
    /// `sub`, for issuers that put the client into the subject.
    Sub,
}

impl IdentityClaim {
    #[must_use]
    pub fn claim_name(self) -> &'static str {
        match self {
            IdentityClaim::ClientId => claims::CLIENT_ID,
            IdentityClaim::Sub => claims::SUB,
        }
    }
}

fn deserialize_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    humantime::parse_duration(&raw).map_err(serde::de::Error::custom)
}
