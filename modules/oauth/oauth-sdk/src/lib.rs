//! OAuth SDK
//!
//! This crate provides the contracts of the repository OAuth core:
//!
//! - [`OAuthProvider`] - Plugin trait, one implementation per token issuer
//! - [`AccountResolver`] - Read-only user/tenant/role lookups the providers consume
//! - [`PublicKeySupplier`] - Current signing keys of an issuer
//! - [`JwtToken`] - Decoded, not yet trusted, bearer token
//! - [`identify_resource`] - Request path to protected [`Resource`]
//! - [`OAuthError`] - Error taxonomy shared by providers and the dispatcher
//!
//! ## Usage
//!
//! ```ignore
//! use oauth_sdk::{AuthRequest, JwtToken, OAuthProvider};
//!
//! let token = JwtToken::parse(bearer)?;
//! if provider.can_handle(&token) && provider.verify(&request, &token)? {
//!     let principal = provider.create_authentication(&request, &token)?;
//! }
//! ```

pub mod api;
pub mod error;
pub mod models;
pub mod plugin_api;
pub mod resource;
pub mod token;

// Re-export main types at crate root
pub use api::{AccountResolver, PublicKeySet, PublicKeySupplier};
pub use error::{AccountResolverError, KeyResolverError, OAuthError, TokenError};
pub use models::{ModelId, ModelIdError, Namespace, Tenant, User};
pub use plugin_api::OAuthProvider;
pub use resource::{AuthRequest, Resource, ResourceKind, identify_resource};
pub use token::JwtToken;
