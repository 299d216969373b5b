//! Bearer token model.
//!
//! [`JwtToken::parse`] only decodes the compact JWT form. Nothing in the
//! header or payload is trusted until a provider has verified the signature.

use base64::Engine;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use serde_json::{Map, Value};

use crate::error::TokenError;

/// Well-known claim and header names.
pub mod claims {
    pub const ALG: &str = "alg";
    pub const KID: &str = "kid";
    pub const ISS: &str = "iss";
    pub const SUB: &str = "sub";
    pub const EXP: &str = "exp";
    pub const CLIENT_ID: &str = "client_id";
}

// Some issuers pad their segments, most don't.
const SEGMENT_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// A decoded JWT: header claims, payload claims and the raw compact form.
#[derive(Debug, Clone)]
pub struct JwtToken {
    raw: String,
    header: Map<String, Value>,
    payload: Map<String, Value>,
}

impl JwtToken {
    /// Decode a compact JWT (`header.payload.signature`).
    ///
    /// # Errors
    ///
    /// Returns [`TokenError`] if the token does not have three segments, a
    /// segment is not base64url encoded JSON, or the header has no `alg`.
    pub fn parse(raw: &str) -> Result<Self, TokenError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(TokenError::Empty);
        }

        let segments: Vec<&str> = raw.split('.').collect();
        let [header, payload, _signature] = segments.as_slice() else {
            return Err(TokenError::SegmentCount(segments.len()));
        };

        let header = decode_segment("header", header)?;
        if !header.get(claims::ALG).is_some_and(Value::is_string) {
            return Err(TokenError::MissingAlgorithm);
        }
        let payload = decode_segment("payload", payload)?;

        Ok(Self {
            raw: raw.to_owned(),
            header,
            payload,
        })
    }

    /// The compact form the token was parsed from.
    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    #[must_use]
    pub fn header(&self) -> &Map<String, Value> {
        &self.header
    }

    #[must_use]
    pub fn payload(&self) -> &Map<String, Value> {
        &self.payload
    }

    /// Declared signing algorithm. Always present on a parsed token.
    #[must_use]
    pub fn algorithm(&self) -> &str {
        self.header
            .get(claims::ALG)
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    #[must_use]
    pub fn key_id(&self) -> Option<&str> {
        self.header.get(claims::KID).and_then(Value::as_str)
    }

    #[must_use]
    pub fn issuer(&self) -> Option<&str> {
        self.string_claim(claims::ISS)
    }

    #[must_use]
    pub fn subject(&self) -> Option<&str> {
        self.string_claim(claims::SUB)
    }

    /// Expiry as seconds since the Unix epoch.
    #[must_use]
    pub fn expires_at(&self) -> Option<u64> {
        self.payload.get(claims::EXP).and_then(Value::as_u64)
    }

    /// A payload claim, if present and a non-empty string.
    #[must_use]
    pub fn string_claim(&self, name: &str) -> Option<&str> {
        self.payload
            .get(name)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }
}

fn decode_segment(part: &'static str, segment: &str) -> Result<Map<String, Value>, TokenError> {
    let bytes = SEGMENT_ENGINE
        .decode(segment)
        .map_err(|source| TokenError::Base64 { part, source })?;
    match serde_json::from_slice(&bytes).map_err(|source| TokenError::Json { part, source })? {
        Value::Object(map) => Ok(map),
        _ => Err(TokenError::NotAnObject { part }),
    }
}
