//! Explicit construction of key caches, accounts, providers and registry.

use std::sync::Arc;

use anyhow::Context;
use client_credentials_plugin::{ClientCredentialsPluginConfig, ClientCredentialsProvider};
use oauth_resolver::ProviderRegistry;
use oauth_resolver::infra::{HttpJwksSource, JwksKeyCache, StaticAccountResolver};
use oauth_sdk::{AccountResolver, OAuthProvider};
use tracing::{info, warn};

use crate::config::AppConfig;

/// Build the registry described by `cfg`.
///
/// Every key cache gets one refresh before it is used. A failed refresh is
/// logged and left to surface as a key resolution failure on verification.
pub async fn build_registry(cfg: &AppConfig) -> anyhow::Result<ProviderRegistry> {
    let accounts: Arc<dyn AccountResolver> =
        Arc::new(StaticAccountResolver::from_config(&cfg.accounts));

    let mut providers: Vec<Arc<dyn OAuthProvider>> = Vec::with_capacity(cfg.providers.len());
    for provider_cfg in &cfg.providers {
        let keys = key_cache(provider_cfg)?;
        if let Err(e) = keys.refresh().await {
            warn!(provider = %provider_cfg.id, error = %e, "initial public key refresh failed");
        }

        providers.push(Arc::new(ClientCredentialsProvider::new(
            provider_cfg,
            keys,
            Arc::clone(&accounts),
        )));
        info!(
            provider = %provider_cfg.id,
            issuer = provider_cfg.issuer.as_deref().unwrap_or("<none>"),
            "provider wired"
        );
    }

    ProviderRegistry::new(providers).context("invalid provider list")
}

fn key_cache(cfg: &ClientCredentialsPluginConfig) -> anyhow::Result<Arc<JwksKeyCache>> {
    let uri = cfg
        .public_key_uri
        .as_deref()
        .with_context(|| format!("provider '{}' has no public_key_uri", cfg.id))?;
    let source = HttpJwksSource::new(uri)
        .with_context(|| format!("provider '{}' has an unusable public_key_uri", cfg.id))?;
    let issuer = cfg.issuer.as_deref().unwrap_or(&cfg.id);
    Ok(Arc::new(JwksKeyCache::new(issuer, Arc::new(source))))
}
