#![allow(clippy::unwrap_used, clippy::expect_used, dead_code)]

//! Fixtures shared by the resolver integration tests.

use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::{Algorithm, EncodingKey, Header};
use oauth_resolver::AccountsConfig;
use serde_json::{Value, json};

pub const ISSUER: &str = "https://access.example.com/v2";
pub const PRIMARY_KID: &str = "primary-key";
pub const OTHER_KID: &str = "other-key";

pub const PRIMARY_JWKS: &str = include_str!("../fixtures/primary_jwks.json");
pub const OTHER_JWKS: &str = include_str!("../fixtures/other_jwks.json");

const PRIMARY_PRIVATE_PEM: &[u8] = include_bytes!("../fixtures/primary_private.pem");
const OTHER_PRIVATE_PEM: &[u8] = include_bytes!("../fixtures/other_private.pem");

pub fn now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs()
}

/// `svc-1` is a technical identity of tenant `acme`, which owns `com.acme`.
pub fn acme_accounts() -> AccountsConfig {
    serde_json::from_value(json!({
        "users": [{"username": "svc-1", "technical": true}],
        "tenants": [
            {
                "id": "acme",
                "namespaces": ["com.acme"],
                "members": [{"user": "svc-1", "roles": ["model_viewer", "model_creator"]}],
            },
            {
                "id": "globex",
                "namespaces": ["net.globex"],
                "members": [{"user": "svc-1", "roles": ["model_reviewer"]}],
            },
        ],
    }))
    .unwrap()
}

/// Claims of a client-credentials token for `client_id`, valid for five minutes.
pub fn claims(client_id: &str) -> Value {
    json!({
        "iss": ISSUER,
        "sub": "service-account",
        "client_id": client_id,
        "exp": now() + 300,
    })
}

fn sign(claims: &Value, kid: &str, pem: &[u8]) -> String {
    let mut header = Header::new(Algorithm::RS256);
    header.kid = Some(kid.to_owned());
    jsonwebtoken::encode(&header, claims, &EncodingKey::from_rsa_pem(pem).unwrap()).unwrap()
}

pub fn signed_by_primary(claims: &Value) -> String {
    sign(claims, PRIMARY_KID, PRIMARY_PRIVATE_PEM)
}

pub fn signed_by_other(claims: &Value) -> String {
    sign(claims, OTHER_KID, OTHER_PRIVATE_PEM)
}
