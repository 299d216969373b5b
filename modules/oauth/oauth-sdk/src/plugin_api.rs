//! Plugin trait for OAuth provider implementations.
//!
//! Each provider is responsible for one class of tokens, usually all tokens
//! of one issuer. The dispatcher holds an ordered list of providers and
//! delegates to the first one whose [`OAuthProvider::can_handle`] accepts
//! the token.

use repo_security::AuthenticatedPrincipal;

use crate::error::OAuthError;
use crate::resource::AuthRequest;
use crate::token::JwtToken;

/// Verification and principal construction for one class of tokens.
///
/// Implementations hold only static configuration set at construction time
/// and are shared across concurrent requests.
pub trait OAuthProvider: Send + Sync {
    /// Stable identifier used for selection and logging.
    fn id(&self) -> &str;

    /// Human readable label.
    fn label(&self) -> &str;

    /// Issuer accepted by this provider, if it matches on issuer at all.
    fn issuer(&self) -> Option<&str>;

    /// Cheap, side-effect free check of the token's shape.
    ///
    /// `false` means the dispatcher moves on to the next provider.
    fn can_handle(&self, token: &JwtToken) -> bool;

    /// Verify the token and authorize the request.
    ///
    /// Returns `Ok(false)` for ordinary verification failures: unexpected
    /// algorithm, invalid signature, expired token, or a resource outside of
    /// the identity's namespaces.
    ///
    /// # Errors
    ///
    /// - [`OAuthError::MalformedToken`] if the identity claim is missing or
    ///   names an unknown identity
    /// - [`OAuthError::KeyResolution`] / [`OAuthError::AccountResolution`]
    ///   if a collaborator fails
    fn verify(&self, request: &AuthRequest, token: &JwtToken) -> Result<bool, OAuthError>;

    /// Build the principal for a request that [`Self::verify`] accepted.
    ///
    /// Must resolve the same identity `verify` resolved for the same
    /// request and token.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Self::verify`] for identity resolution.
    fn create_authentication(
        &self,
        request: &AuthRequest,
        token: &JwtToken,
    ) -> Result<AuthenticatedPrincipal, OAuthError>;
}
