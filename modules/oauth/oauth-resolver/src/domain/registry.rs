//! Ordered provider registry and bearer-token dispatch.

use std::collections::HashSet;
use std::sync::Arc;

use oauth_sdk::{AuthRequest, JwtToken, OAuthError, OAuthProvider};
use repo_security::AuthenticatedPrincipal;
use tracing::debug;

use super::RegistryError;

/// Result of dispatching one request to the providers.
#[derive(Debug)]
pub enum AuthOutcome {
    Authenticated(AuthenticatedPrincipal),

    /// The provider responsible for the token declined it.
    Rejected { provider_id: String },

    /// No provider is responsible for the token.
    Unauthenticated,
}

/// Providers in registration order.
///
/// The first provider whose `can_handle` accepts a token owns it. A provider
/// rejecting a token it owns is final; later providers are not consulted.
pub struct ProviderRegistry {
    providers: Vec<Arc<dyn OAuthProvider>>,
}

impl ProviderRegistry {
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateProvider`] if two providers share an id.
    pub fn new(providers: Vec<Arc<dyn OAuthProvider>>) -> Result<Self, RegistryError> {
        let mut seen = HashSet::new();
        for provider in &providers {
            if !seen.insert(provider.id()) {
                return Err(RegistryError::DuplicateProvider(provider.id().to_owned()));
            }
        }
        Ok(Self { providers })
    }

    #[must_use]
    pub fn providers(&self) -> &[Arc<dyn OAuthProvider>] {
        &self.providers
    }

    #[must_use]
    pub fn provider(&self, id: &str) -> Option<&Arc<dyn OAuthProvider>> {
        self.providers.iter().find(|p| p.id() == id)
    }

    /// Authenticate `request` carrying the raw `bearer` credential.
    ///
    /// # Errors
    ///
    /// - [`OAuthError::MalformedToken`] if the bearer is not a decodable JWT
    ///   or the owning provider finds it malformed
    /// - collaborator failures of the owning provider, unchanged
    #[tracing::instrument(skip_all, fields(path = %request.path()))]
    pub fn authenticate(
        &self,
        request: &AuthRequest,
        bearer: &str,
    ) -> Result<AuthOutcome, OAuthError> {
        let token = JwtToken::parse(bearer)?;

        let Some(provider) = self.providers.iter().find(|p| p.can_handle(&token)) else {
            debug!(iss = ?token.issuer(), "no provider handles the token");
            return Ok(AuthOutcome::Unauthenticated);
        };

        if !provider.verify(request, &token)? {
            return Ok(AuthOutcome::Rejected {
                provider_id: provider.id().to_owned(),
            });
        }

        let principal = provider.create_authentication(request, &token)?;
        Ok(AuthOutcome::Authenticated(principal))
    }
}
