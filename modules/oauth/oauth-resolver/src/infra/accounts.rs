//! In-memory account directory built from configuration.

use std::collections::{BTreeSet, HashMap};

use oauth_sdk::{AccountResolver, AccountResolverError, Tenant, User};
use repo_security::{Role, TenantId};
use tracing::warn;

use crate::config::AccountsConfig;

struct Membership {
    tenant: Tenant,
    roles: HashMap<String, BTreeSet<Role>>,
}

/// Account resolver answering from a fixed set of users and tenants.
pub struct StaticAccountResolver {
    users: HashMap<String, User>,
    memberships: Vec<Membership>,
}

impl StaticAccountResolver {
    #[must_use]
    pub fn from_config(cfg: &AccountsConfig) -> Self {
        let users: HashMap<String, User> = cfg
            .users
            .iter()
            .map(|u| {
                let user = if u.technical {
                    User::technical(&u.username)
                } else {
                    User::human(&u.username)
                };
                (u.username.clone(), user)
            })
            .collect();

        let memberships = cfg
            .tenants
            .iter()
            .map(|t| {
                let mut roles: HashMap<String, BTreeSet<Role>> = HashMap::new();
                for member in &t.members {
                    if !users.contains_key(&member.user) {
                        warn!(
                            tenant = %t.id,
                            user = %member.user,
                            "tenant member is not a configured user"
                        );
                    }
                    roles
                        .entry(member.user.clone())
                        .or_default()
                        .extend(member.roles.iter().copied());
                }
                Membership {
                    tenant: Tenant::new(TenantId::new(t.id.as_str()), t.namespaces.iter().cloned()),
                    roles,
                }
            })
            .collect();

        Self { users, memberships }
    }

    fn memberships_of<'a>(
        &'a self,
        user: &'a User,
    ) -> impl Iterator<Item = (&'a Tenant, &'a BTreeSet<Role>)> {
        self.memberships.iter().filter_map(|m| {
            m.roles
                .get(&user.username)
                .map(|roles| (&m.tenant, roles))
        })
    }
}

impl AccountResolver for StaticAccountResolver {
    fn get_user(&self, id: &str) -> Result<Option<User>, AccountResolverError> {
        Ok(self.users.get(id).cloned())
    }

    fn get_tenants(&self, user: &User) -> Result<Vec<Tenant>, AccountResolverError> {
        Ok(self
            .memberships_of(user)
            .map(|(tenant, _)| tenant.clone())
            .collect())
    }

    fn get_roles(
        &self,
        user: &User,
        tenant_id: &TenantId,
    ) -> Result<BTreeSet<Role>, AccountResolverError> {
        Ok(self
            .memberships_of(user)
            .find(|(tenant, _)| tenant.id == *tenant_id)
            .map(|(_, roles)| roles.clone())
            .unwrap_or_default())
    }

    fn get_all_roles(&self, user: &User) -> Result<BTreeSet<Role>, AccountResolverError> {
        Ok(self
            .memberships_of(user)
            .flat_map(|(_, roles)| roles.iter().copied())
            .collect())
    }
}
