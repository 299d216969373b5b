//! Refreshable public key snapshot for one issuer.

use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwapOption;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::jwk::{Jwk, PublicKeyUse};
use oauth_sdk::{KeyResolverError, PublicKeySet, PublicKeySupplier};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::jwks::{JwksDocument, JwksSource};

/// Shortest accepted refresh period.
pub const MIN_REFRESH_INTERVAL: Duration = Duration::from_secs(1);

/// Signing keys of one issuer, replaced as a whole on every refresh.
///
/// Readers get the snapshot that was current when they asked and never
/// block on a refresh in progress.
pub struct JwksKeyCache {
    issuer: String,
    source: Arc<dyn JwksSource>,
    snapshot: ArcSwapOption<PublicKeySet>,
}

impl JwksKeyCache {
    pub fn new(issuer: impl Into<String>, source: Arc<dyn JwksSource>) -> Self {
        Self {
            issuer: issuer.into(),
            source,
            snapshot: ArcSwapOption::empty(),
        }
    }

    #[must_use]
    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.snapshot.load().is_some()
    }

    /// Fetch the issuer's document and swap in its usable keys.
    ///
    /// On failure the previous snapshot stays in place.
    ///
    /// # Errors
    ///
    /// - errors of the [`JwksSource`]
    /// - [`KeyResolverError::NoUsableKeys`] if no key of the document can
    ///   verify signatures
    #[tracing::instrument(skip_all, fields(issuer = %self.issuer))]
    pub async fn refresh(&self) -> Result<usize, KeyResolverError> {
        let document = self.source.fetch().await?;
        let keys = usable_keys(&document);
        if keys.is_empty() {
            return Err(KeyResolverError::NoUsableKeys {
                uri: self.source.uri().to_owned(),
            });
        }

        let count = keys.len();
        debug!(key_ids = ?keys.key_ids().collect::<Vec<_>>(), "public keys refreshed");
        self.snapshot.store(Some(Arc::new(keys)));
        Ok(count)
    }
}

impl PublicKeySupplier for JwksKeyCache {
    fn current_keys(&self) -> Result<Arc<PublicKeySet>, KeyResolverError> {
        self.snapshot
            .load_full()
            .ok_or_else(|| KeyResolverError::NotLoaded {
                issuer: self.issuer.clone(),
            })
    }
}

/// Signature keys of `document` that carry a key id.
fn usable_keys(document: &JwksDocument) -> PublicKeySet {
    document
        .keys
        .iter()
        .filter_map(|raw| {
            let jwk: Jwk = match serde_json::from_value(raw.clone()) {
                Ok(jwk) => jwk,
                Err(e) => {
                    debug!(error = %e, "skipping unreadable key");
                    return None;
                }
            };
            if matches!(jwk.common.public_key_use, Some(PublicKeyUse::Encryption)) {
                return None;
            }
            let kid = jwk.common.key_id.clone()?;
            match DecodingKey::from_jwk(&jwk) {
                Ok(key) => Some((kid, key)),
                Err(e) => {
                    debug!(kid = %kid, error = %e, "skipping unsupported key");
                    None
                }
            }
        })
        .collect()
}

/// Refresh `cache` every `interval` until `cancel` fires.
///
/// The first refresh runs immediately. Failures are logged and the previous
/// keys stay in use. Intervals below [`MIN_REFRESH_INTERVAL`] are raised to it.
#[must_use = "dropping the handle detaches the refresher"]
pub fn spawn_key_refresher(
    cache: Arc<JwksKeyCache>,
    interval: Duration,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    let interval = interval.max(MIN_REFRESH_INTERVAL);
    tokio::spawn(async move {
        info!(issuer = cache.issuer(), ?interval, "public key refresher started");
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                () = cancel.cancelled() => break,
                _ = ticker.tick() => {
                    if let Err(e) = cache.refresh().await {
                        warn!(issuer = cache.issuer(), error = %e, "public key refresh failed");
                    }
                }
            }
        }
        info!(issuer = cache.issuer(), "public key refresher stopped");
    })
}
