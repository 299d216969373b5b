//! Error types for the OAuth core.

use thiserror::Error;

/// Errors a provider or the dispatcher may signal.
///
/// Ordinary verification failures (wrong algorithm, bad signature, expired
/// token, no owned namespace) are not errors: `verify` returns `Ok(false)`
/// for them. Only the variants below interrupt normal control flow.
#[derive(Debug, Error)]
pub enum OAuthError {
    /// The token lacks a required claim, cannot be decoded, or references an
    /// identity this repository does not know. Points at an integration defect
    /// rather than at bad credentials.
    #[error("malformed token: {0}")]
    MalformedToken(String),

    /// The public key collaborator could not supply key material.
    #[error("public key resolution failed: {0}")]
    KeyResolution(#[from] KeyResolverError),

    /// The account collaborator failed.
    #[error("account resolution failed: {0}")]
    AccountResolution(#[from] AccountResolverError),
}

impl OAuthError {
    #[must_use]
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedToken(reason.into())
    }

    #[must_use]
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::MalformedToken(_))
    }

    /// Whether the error comes from a collaborator rather than from the token.
    #[must_use]
    pub fn is_collaborator_failure(&self) -> bool {
        matches!(self, Self::KeyResolution(_) | Self::AccountResolution(_))
    }
}

impl From<TokenError> for OAuthError {
    fn from(e: TokenError) -> Self {
        Self::MalformedToken(e.to_string())
    }
}

/// Reasons a raw bearer credential could not be decoded into a [`crate::JwtToken`].
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token is empty")]
    Empty,

    #[error("expected 3 dot-separated segments, found {0}")]
    SegmentCount(usize),

    #[error("{part} is not valid base64url: {source}")]
    Base64 {
        part: &'static str,
        #[source]
        source: base64::DecodeError,
    },

    #[error("{part} is not valid JSON: {source}")]
    Json {
        part: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("{part} is not a JSON object")]
    NotAnObject { part: &'static str },

    #[error("header has no 'alg' field")]
    MissingAlgorithm,
}

/// Failures of the public key collaborator.
#[derive(Debug, Clone, Error)]
pub enum KeyResolverError {
    /// No key snapshot has been loaded yet.
    #[error("no public keys loaded for issuer '{issuer}'")]
    NotLoaded { issuer: String },

    #[error("failed to fetch public keys from '{uri}': {reason}")]
    Fetch { uri: String, reason: String },

    #[error("public key endpoint '{uri}' answered with status {status}")]
    Status { uri: String, status: u16 },

    #[error("invalid public key document: {0}")]
    Decode(String),

    #[error("public key document from '{uri}' contains no usable keys")]
    NoUsableKeys { uri: String },
}

/// Failures of the account collaborator.
#[derive(Debug, Clone, Error)]
pub enum AccountResolverError {
    #[error("account service unavailable: {0}")]
    Unavailable(String),

    #[error("account service error: {0}")]
    Internal(String),
}
