#![allow(clippy::unwrap_used, clippy::expect_used, dead_code)]

//! Collaborator doubles and token helpers shared by the provider tests.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use aliri_clock::{Clock, UnixTime};
use client_credentials_plugin::{ClientCredentialsPluginConfig, ClientCredentialsProvider};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header};
use oauth_sdk::{
    AccountResolver, AccountResolverError, AuthRequest, JwtToken, KeyResolverError, PublicKeySet,
    PublicKeySupplier, Tenant, User,
};
use repo_security::{Role, TenantId};
use serde_json::Value;

pub const ISSUER: &str = "https://access.example.com/v2";
pub const PRIMARY_KID: &str = "primary-key";
pub const NOW: u64 = 1_700_000_000;

const PRIMARY_PRIVATE_PEM: &[u8] = include_bytes!("../fixtures/primary_private.pem");
const PRIMARY_PUBLIC_PEM: &[u8] = include_bytes!("../fixtures/primary_public.pem");
const OTHER_PRIVATE_PEM: &[u8] = include_bytes!("../fixtures/other_private.pem");

/// Key supplier serving the primary test key, counting lookups.
pub struct CountingKeys {
    keys: Arc<PublicKeySet>,
    calls: AtomicUsize,
}

impl CountingKeys {
    pub fn primary() -> Self {
        let mut set = PublicKeySet::new();
        set.insert(
            PRIMARY_KID,
            DecodingKey::from_rsa_pem(PRIMARY_PUBLIC_PEM).unwrap(),
        );
        Self {
            keys: Arc::new(set),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl PublicKeySupplier for CountingKeys {
    fn current_keys(&self) -> Result<Arc<PublicKeySet>, KeyResolverError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::clone(&self.keys))
    }
}

/// Key supplier that never has keys.
pub struct UnavailableKeys;

impl PublicKeySupplier for UnavailableKeys {
    fn current_keys(&self) -> Result<Arc<PublicKeySet>, KeyResolverError> {
        Err(KeyResolverError::NotLoaded {
            issuer: ISSUER.to_owned(),
        })
    }
}

/// In-memory account directory counting every lookup.
#[derive(Default)]
pub struct InMemoryAccounts {
    users: HashMap<String, User>,
    memberships: HashMap<String, Vec<Tenant>>,
    roles: HashMap<(String, TenantId), BTreeSet<Role>>,
    calls: AtomicUsize,
    unavailable: bool,
}

impl InMemoryAccounts {
    pub fn with_user(mut self, username: &str) -> Self {
        self.users
            .insert(username.to_owned(), User::technical(username));
        self
    }

    pub fn with_membership(
        mut self,
        username: &str,
        tenant: &str,
        namespaces: &[&str],
        roles: &[Role],
    ) -> Self {
        let tenant_id = TenantId::new(tenant);
        self.memberships
            .entry(username.to_owned())
            .or_default()
            .push(Tenant::new(tenant_id.clone(), namespaces.iter().copied()));
        self.roles.insert(
            (username.to_owned(), tenant_id),
            roles.iter().copied().collect(),
        );
        self
    }

    pub fn unavailable(mut self) -> Self {
        self.unavailable = true;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn record(&self) -> Result<(), AccountResolverError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.unavailable {
            return Err(AccountResolverError::Unavailable("connection refused".to_owned()));
        }
        Ok(())
    }
}

impl AccountResolver for InMemoryAccounts {
    fn get_user(&self, id: &str) -> Result<Option<User>, AccountResolverError> {
        self.record()?;
        Ok(self.users.get(id).cloned())
    }

    fn get_tenants(&self, user: &User) -> Result<Vec<Tenant>, AccountResolverError> {
        self.record()?;
        Ok(self
            .memberships
            .get(&user.username)
            .cloned()
            .unwrap_or_default())
    }

    fn get_roles(
        &self,
        user: &User,
        tenant_id: &TenantId,
    ) -> Result<BTreeSet<Role>, AccountResolverError> {
        self.record()?;
        Ok(self
            .roles
            .get(&(user.username.clone(), tenant_id.clone()))
            .cloned()
            .unwrap_or_default())
    }

    fn get_all_roles(&self, user: &User) -> Result<BTreeSet<Role>, AccountResolverError> {
        self.record()?;
        Ok(self
            .roles
            .iter()
            .filter(|((name, _), _)| *name == user.username)
            .flat_map(|(_, roles)| roles.iter().copied())
            .collect())
    }
}

/// Clock frozen at a settable instant.
#[derive(Debug)]
pub struct FixedClock(AtomicU64);

impl FixedClock {
    pub fn at(secs: u64) -> Self {
        Self(AtomicU64::new(secs))
    }
}

impl Clock for FixedClock {
    fn now(&self) -> UnixTime {
        UnixTime(self.0.load(Ordering::SeqCst))
    }
}

/// The accounts of the `svc-1` scenario: tenant `acme` owning `com.acme`.
pub fn acme_accounts() -> InMemoryAccounts {
    InMemoryAccounts::default().with_user("svc-1").with_membership(
        "svc-1",
        "acme",
        &["com.acme"],
        &[Role::ModelViewer, Role::ModelCreator],
    )
}

pub fn config() -> ClientCredentialsPluginConfig {
    ClientCredentialsPluginConfig {
        id: "test-provider".to_owned(),
        issuer: Some(ISSUER.to_owned()),
        ..ClientCredentialsPluginConfig::default()
    }
}

pub fn provider(
    keys: Arc<dyn PublicKeySupplier>,
    accounts: Arc<dyn AccountResolver>,
) -> ClientCredentialsProvider {
    ClientCredentialsProvider::new(&config(), keys, accounts).with_clock(Arc::new(FixedClock::at(NOW)))
}

/// Claims of a valid token for `client_id`, expiring `ttl` seconds after [`NOW`].
pub fn claims(client_id: &str, ttl: u64) -> Value {
    serde_json::json!({
        "iss": ISSUER,
        "sub": "service-account",
        "client_id": client_id,
        "exp": NOW + ttl,
    })
}

fn rs256_header(kid: Option<&str>) -> Header {
    let mut header = Header::new(Algorithm::RS256);
    header.kid = kid.map(str::to_owned);
    header
}

/// RS256 token signed with the primary key and carrying its `kid`.
pub fn signed(claims: &Value) -> JwtToken {
    signed_with(claims, rs256_header(Some(PRIMARY_KID)), PRIMARY_PRIVATE_PEM)
}

pub fn signed_without_kid(claims: &Value) -> JwtToken {
    signed_with(claims, rs256_header(None), PRIMARY_PRIVATE_PEM)
}

/// RS256 token signed with a key the issuer never published.
pub fn signed_by_other_key(claims: &Value) -> JwtToken {
    signed_with(claims, rs256_header(Some(PRIMARY_KID)), OTHER_PRIVATE_PEM)
}

pub fn signed_with_secret(claims: &Value) -> JwtToken {
    let raw = jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(b"shared-secret"),
    )
    .unwrap();
    JwtToken::parse(&raw).unwrap()
}

pub fn signed_rs512(claims: &Value) -> JwtToken {
    let mut header = Header::new(Algorithm::RS512);
    header.kid = Some(PRIMARY_KID.to_owned());
    signed_with(claims, header, PRIMARY_PRIVATE_PEM)
}

fn signed_with(claims: &Value, header: Header, pem: &[u8]) -> JwtToken {
    let key = EncodingKey::from_rsa_pem(pem).unwrap();
    let raw = jsonwebtoken::encode(&header, claims, &key).unwrap();
    JwtToken::parse(&raw).unwrap()
}

pub fn get(path: &str) -> AuthRequest {
    AuthRequest::new(http::Method::GET, path)
}
