//! Layered configuration: YAML file first, `REPO_OAUTH__` environment second.

use std::path::Path;

use anyhow::{Context, bail};
use client_credentials_plugin::ClientCredentialsPluginConfig;
use figment::Figment;
use figment::providers::{Env, Format, Yaml};
use oauth_resolver::{AccountsConfig, OAuthResolverConfig};
use serde::Deserialize;

pub const ENV_PREFIX: &str = "REPO_OAUTH__";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub resolver: OAuthResolverConfig,

    /// Providers in dispatch order.
    pub providers: Vec<ClientCredentialsPluginConfig>,

    pub accounts: AccountsConfig,
}

impl AppConfig {
    /// Load `path`, then apply environment overrides such as
    /// `REPO_OAUTH__RESOLVER__CONTEXT_PATH`.
    ///
    /// # Errors
    ///
    /// Fails if the file is missing or the merged configuration does not
    /// deserialize.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.is_file() {
            bail!("config file {} does not exist", path.display());
        }

        Figment::new()
            .merge(Yaml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .with_context(|| format!("invalid configuration in {}", path.display()))
    }
}
