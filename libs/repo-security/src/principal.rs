use std::collections::BTreeSet;

use secrecy::SecretString;

use crate::role::Role;
use crate::tenant::TenantId;

/// `AuthenticatedPrincipal` is the identity an OAuth provider established for a request.
///
/// Built by a provider after a token has been verified and passed on to request-level
/// authorization. Lives exactly as long as the request it was created for.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct AuthenticatedPrincipal {
    /// Identity label (username or technical identity id).
    name: String,
    /// Human readable name. Equal to `name` for technical identities.
    display_name: String,
    /// Credential material. Technical identities never carry any.
    /// Never serialized; `SecretString` redacts it in `Debug`.
    #[serde(skip)]
    credentials: Option<SecretString>,
    /// Roles granted for this request.
    #[serde(default)]
    roles: BTreeSet<Role>,
    /// Id of the provider that authenticated the request.
    provider_id: String,
    /// Tenant the roles were scoped to. `None` means the global role set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tenant_id: Option<TenantId>,
}

impl AuthenticatedPrincipal {
    #[must_use]
    pub fn builder() -> AuthenticatedPrincipalBuilder {
        AuthenticatedPrincipalBuilder::default()
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    #[must_use]
    pub fn credentials(&self) -> Option<&SecretString> {
        self.credentials.as_ref()
    }

    #[must_use]
    pub fn roles(&self) -> &BTreeSet<Role> {
        &self.roles
    }

    #[must_use]
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    #[must_use]
    pub fn provider_id(&self) -> &str {
        &self.provider_id
    }

    /// Tenant scope of [`Self::roles`], if the roles were resolved for a single tenant.
    #[must_use]
    pub fn tenant_id(&self) -> Option<&TenantId> {
        self.tenant_id.as_ref()
    }
}

#[derive(Default)]
pub struct AuthenticatedPrincipalBuilder {
    name: String,
    display_name: Option<String>,
    credentials: Option<SecretString>,
    roles: BTreeSet<Role>,
    provider_id: String,
    tenant_id: Option<TenantId>,
}

impl AuthenticatedPrincipalBuilder {
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    #[must_use]
    pub fn display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    #[must_use]
    pub fn credentials(mut self, credentials: impl Into<SecretString>) -> Self {
        self.credentials = Some(credentials.into());
        self
    }

    #[must_use]
    pub fn roles(mut self, roles: BTreeSet<Role>) -> Self {
        self.roles = roles;
        self
    }

    #[must_use]
    pub fn provider_id(mut self, provider_id: impl Into<String>) -> Self {
        self.provider_id = provider_id.into();
        self
    }

    #[must_use]
    pub fn tenant_id(mut self, tenant_id: Option<TenantId>) -> Self {
        self.tenant_id = tenant_id;
        self
    }

    /// Build the principal. The display name defaults to the name.
    #[must_use]
    pub fn build(self) -> AuthenticatedPrincipal {
        let display_name = self.display_name.unwrap_or_else(|| self.name.clone());
        AuthenticatedPrincipal {
            name: self.name,
            display_name,
            credentials: self.credentials,
            roles: self.roles,
            provider_id: self.provider_id,
            tenant_id: self.tenant_id,
        }
    }
}
