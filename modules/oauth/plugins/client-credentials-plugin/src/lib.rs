#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Client Credentials OAuth Provider Plugin
//!
//! Verifies bearer tokens that an external authorization server issued to
//! technical identities through the client-credentials grant.
//!
//! ## Verification
//!
//! 1. The token must be signed with `RS256`. Nothing else is accepted.
//! 2. The signature must verify against the issuer's current public keys.
//! 3. The token must not be expired.
//! 4. The `client_id` claim must name a technical identity known to the
//!    repository. A missing claim or an unknown identity is a malformed token.
//! 5. If the request targets a model or namespace, one of the identity's
//!    tenants must own a namespace covering it.
//!
//! ## Configuration
//!
//! ```yaml
//! providers:
//!   - id: "client-credentials"
//!     label: "Client Credentials OAuth"
//!     issuer: "https://access.example.com/v2"
//!     public_key_uri: "https://access.example.com/v2/.well-known/jwks.json"
//!     refresh_interval: "10m"
//!     identity_claim: client_id
//! ```

pub mod config;
pub mod domain;

pub use config::{ClientCredentialsPluginConfig, IdentityClaim};
pub use domain::{ACCEPTED_ALGORITHM, ClientCredentialsProvider};
