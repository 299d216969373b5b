//! OAuth Resolver
//!
//! Dispatches bearer tokens to the registered OAuth provider plugins and
//! hosts the collaborators they consume: a JWKS-backed public key cache per
//! issuer and a static account directory. The [`api`] module exposes the
//! dispatcher as an axum middleware.
//!
//! Wiring is explicit: build the providers, hand them to
//! [`ProviderRegistry::new`] in priority order and layer
//! [`api::oauth_middleware`] over the router.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod api;
pub mod config;
pub mod domain;
pub mod infra;

pub use config::{AccountsConfig, OAuthResolverConfig};
pub use domain::{AuthOutcome, ProviderRegistry, RegistryError};
