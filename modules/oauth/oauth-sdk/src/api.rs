//! Collaborator contracts consumed by OAuth providers.
//!
//! Both traits are synchronous read-only lookups. Implementations that talk to
//! remote systems keep their own caches; providers only ever read the current
//! state.

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::sync::Arc;

use jsonwebtoken::DecodingKey;
use repo_security::{Role, TenantId};

use crate::error::{AccountResolverError, KeyResolverError};
use crate::models::{Tenant, User};

/// Read access to users, their tenants and their roles.
///
/// Resolution must be deterministic: the same identity and tenant scope
/// always produce the same answer while the underlying data is unchanged.
pub trait AccountResolver: Send + Sync {
    /// Look up a user or technical identity by its identifier.
    ///
    /// # Errors
    ///
    /// [`AccountResolverError`] if the account store cannot be queried.
    fn get_user(&self, id: &str) -> Result<Option<User>, AccountResolverError>;

    /// Tenants the user belongs to, in a stable order.
    ///
    /// # Errors
    ///
    /// [`AccountResolverError`] if the account store cannot be queried.
    fn get_tenants(&self, user: &User) -> Result<Vec<Tenant>, AccountResolverError>;

    /// Roles the user holds within one tenant.
    ///
    /// # Errors
    ///
    /// [`AccountResolverError`] if the account store cannot be queried.
    fn get_roles(
        &self,
        user: &User,
        tenant_id: &TenantId,
    ) -> Result<BTreeSet<Role>, AccountResolverError>;

    /// Every role the user holds across all of its tenants.
    ///
    /// # Errors
    ///
    /// [`AccountResolverError`] if the account store cannot be queried.
    fn get_all_roles(&self, user: &User) -> Result<BTreeSet<Role>, AccountResolverError>;
}

/// Supplies the signing keys currently published by one issuer.
pub trait PublicKeySupplier: Send + Sync {
    /// The current key snapshot.
    ///
    /// A snapshot never changes once handed out; refreshes replace it as a whole.
    ///
    /// # Errors
    ///
    /// [`KeyResolverError`] if no key material is available.
    fn current_keys(&self) -> Result<Arc<PublicKeySet>, KeyResolverError>;
}

/// Public keys by key id.
#[derive(Clone, Default)]
pub struct PublicKeySet {
    keys: HashMap<String, DecodingKey>,
}

impl PublicKeySet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, kid: impl Into<String>, key: DecodingKey) {
        self.keys.insert(kid.into(), key);
    }

    #[must_use]
    pub fn get(&self, kid: &str) -> Option<&DecodingKey> {
        self.keys.get(kid)
    }

    pub fn keys(&self) -> impl Iterator<Item = &DecodingKey> {
        self.keys.values()
    }

    pub fn key_ids(&self) -> impl Iterator<Item = &str> {
        self.keys.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl FromIterator<(String, DecodingKey)> for PublicKeySet {
    fn from_iter<T: IntoIterator<Item = (String, DecodingKey)>>(iter: T) -> Self {
        Self {
            keys: iter.into_iter().collect(),
        }
    }
}

impl fmt::Debug for PublicKeySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut kids: Vec<&str> = self.key_ids().collect();
        kids.sort_unstable();
        f.debug_struct("PublicKeySet").field("key_ids", &kids).finish()
    }
}

/// A fixed key snapshot, for issuers with statically configured keys.
impl PublicKeySupplier for Arc<PublicKeySet> {
    fn current_keys(&self) -> Result<Arc<PublicKeySet>, KeyResolverError> {
        Ok(Arc::clone(self))
    }
}
