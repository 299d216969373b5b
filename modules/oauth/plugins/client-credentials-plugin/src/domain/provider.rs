//! Provider implementation for client-credentials tokens.

use std::sync::Arc;

use aliri_clock::{Clock, System};
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use oauth_sdk::{
    AccountResolver, AuthRequest, JwtToken, Namespace, OAuthError, OAuthProvider,
    PublicKeySupplier, Resource, User,
};
use repo_security::AuthenticatedPrincipal;
use tracing::debug;

use crate::config::{ClientCredentialsPluginConfig, IdentityClaim};

/// The only signing algorithm this provider accepts.
pub const ACCEPTED_ALGORITHM: Algorithm = Algorithm::RS256;

/// OAuth provider for technical identities authenticated by one issuer.
pub struct ClientCredentialsProvider {
    id: String,
    label: String,
    issuer: Option<String>,
    identity_claim: IdentityClaim,
    keys: Arc<dyn PublicKeySupplier>,
    accounts: Arc<dyn AccountResolver>,
    clock: Arc<dyn Clock + Send + Sync>,
    validation: Validation,
}

impl ClientCredentialsProvider {
    #[must_use]
    pub fn new(
        cfg: &ClientCredentialsPluginConfig,
        keys: Arc<dyn PublicKeySupplier>,
        accounts: Arc<dyn AccountResolver>,
    ) -> Self {
        Self {
            id: cfg.id.clone(),
            label: cfg.label.clone(),
            issuer: cfg.issuer.clone(),
            identity_claim: cfg.identity_claim,
            keys,
            accounts,
            clock: Arc::new(System),
            validation: signature_only_validation(),
        }
    }

    /// Replace the clock used for expiry checks.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock + Send + Sync>) -> Self {
        self.clock = clock;
        self
    }

    fn verify_algorithm(token: &JwtToken) -> bool {
        token
            .algorithm()
            .parse::<Algorithm>()
            .is_ok_and(|alg| alg == ACCEPTED_ALGORITHM)
    }

    fn verify_signature(&self, token: &JwtToken) -> Result<bool, OAuthError> {
        let keys = self.keys.current_keys()?;
        let verified = match token.key_id() {
            Some(kid) => keys.get(kid).is_some_and(|key| self.signed_by(token, key)),
            None => keys.keys().any(|key| self.signed_by(token, key)),
        };
        Ok(verified)
    }

    fn signed_by(&self, token: &JwtToken, key: &DecodingKey) -> bool {
        jsonwebtoken::decode::<serde_json::Value>(token.raw(), key, &self.validation).is_ok()
    }

    fn verify_expiry(&self, token: &JwtToken) -> bool {
        let now = self.clock.now().0;
        token.expires_at().is_some_and(|exp| exp > now)
    }

    /// The identity named by the token. Shared by `verify` and
    /// `create_authentication` so both always act on the same user.
    fn technical_user(&self, token: &JwtToken) -> Result<User, OAuthError> {
        let claim = self.identity_claim.claim_name();
        let id = token
            .string_claim(claim)
            .ok_or_else(|| OAuthError::malformed(format!("token has no '{claim}' claim")))?;
        self.accounts.get_user(id)?.ok_or_else(|| {
            OAuthError::malformed(format!(
                "'{claim}' in token does not name a registered technical user"
            ))
        })
    }

    /// First namespace, over all tenants of `user`, that covers `resource`.
    fn namespace_applicable_to(
        &self,
        user: &User,
        resource: &Resource,
    ) -> Result<Option<Namespace>, OAuthError> {
        let tenants = self.accounts.get_tenants(user)?;
        Ok(tenants
            .into_iter()
            .flat_map(|tenant| tenant.namespaces)
            .find(|ns| ns.applies_to(resource)))
    }
}

impl OAuthProvider for ClientCredentialsProvider {
    fn id(&self) -> &str {
        &self.id
    }

    fn label(&self) -> &str {
        &self.label
    }

    fn issuer(&self) -> Option<&str> {
        self.issuer.as_deref()
    }

    fn can_handle(&self, token: &JwtToken) -> bool {
        self.issuer
            .as_deref()
            .is_some_and(|issuer| token.issuer() == Some(issuer))
    }

    #[tracing::instrument(skip_all, fields(provider = %self.id, path = %request.path()))]
    fn verify(&self, request: &AuthRequest, token: &JwtToken) -> Result<bool, OAuthError> {
        if !Self::verify_algorithm(token) {
            debug!(alg = token.algorithm(), "rejected: unexpected signing algorithm");
            return Ok(false);
        }
        if !self.verify_signature(token)? {
            debug!(kid = ?token.key_id(), "rejected: signature does not verify");
            return Ok(false);
        }
        if !self.verify_expiry(token) {
            debug!(exp = ?token.expires_at(), "rejected: token expired");
            return Ok(false);
        }

        let user = self.technical_user(token)?;

        let Some(resource) = request.resource() else {
            return Ok(true);
        };
        let allowed = self.namespace_applicable_to(&user, &resource)?.is_some();
        if !allowed {
            debug!(
                user = %user.username,
                resource = resource.name(),
                "rejected: no namespace of the identity covers the resource"
            );
        }
        Ok(allowed)
    }

    #[tracing::instrument(skip_all, fields(provider = %self.id, path = %request.path()))]
    fn create_authentication(
        &self,
        request: &AuthRequest,
        token: &JwtToken,
    ) -> Result<AuthenticatedPrincipal, OAuthError> {
        let user = self.technical_user(token)?;

        let namespace = match request.resource() {
            Some(resource) => self.namespace_applicable_to(&user, &resource)?,
            None => None,
        };
        let (roles, tenant_id) = match namespace {
            Some(ns) => (self.accounts.get_roles(&user, &ns.tenant_id)?, Some(ns.tenant_id)),
            None => (self.accounts.get_all_roles(&user)?, None),
        };
        debug!(
            user = %user.username,
            tenant = ?tenant_id,
            roles = roles.len(),
            "principal created"
        );

        Ok(AuthenticatedPrincipal::builder()
            .name(user.username.as_str())
            .display_name(user.username.as_str())
            .roles(roles)
            .provider_id(self.id.as_str())
            .tenant_id(tenant_id)
            .build())
    }
}

/// Validation that checks the signature only. Algorithm and expiry are
/// checked by the provider itself so each failure is reported separately.
fn signature_only_validation() -> Validation {
    let mut validation = Validation::new(ACCEPTED_ALGORITHM);
    validation.validate_exp = false;
    validation.validate_nbf = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();
    validation
}
