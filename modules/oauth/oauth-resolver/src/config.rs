//! Configuration for the OAuth resolver and its static account directory.

use repo_security::Role;
use serde::Deserialize;

/// Resolver configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OAuthResolverConfig {
    /// Prefix the server is mounted under. Stripped from request paths
    /// before resources are identified.
    pub context_path: String,
}

impl Default for OAuthResolverConfig {
    fn default() -> Self {
        Self {
            context_path: "/".to_owned(),
        }
    }
}

/// Users and tenants served by [`crate::infra::StaticAccountResolver`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AccountsConfig {
    pub users: Vec<UserConfig>,

    /// Tenants in lookup order. The first tenant owning a matching
    /// namespace decides which roles apply.
    pub tenants: Vec<TenantConfig>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UserConfig {
    pub username: String,

    /// Technical identities authenticate with client-credentials tokens.
    #[serde(default)]
    pub technical: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TenantConfig {
    pub id: String,

    /// Namespaces owned by the tenant, sub-namespaces included implicitly.
    #[serde(default)]
    pub namespaces: Vec<String>,

    #[serde(default)]
    pub members: Vec<MemberConfig>,
}

/// Roles a user holds within one tenant.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MemberConfig {
    pub user: String,

    #[serde(default)]
    pub roles: Vec<Role>,
}
