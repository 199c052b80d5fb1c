//! Application context wiring configuration to components.

use std::path::{Path, PathBuf};

use anyhow::Context;
use url::Url;

use crate::config::{ConfigStore, VsxmConfig};
use crate::gallery::CatalogClient;
use crate::install::PackageInstaller;
use crate::tools::ExtensionTools;

/// Resolved configuration plus a shared HTTP client.
///
/// Frontends create this once and hand out components from it. The
/// extensions directory is fixed at construction, so tests can point it at
/// a temporary directory.
#[derive(Debug, Clone)]
pub struct AppContext {
    config: VsxmConfig,
    extensions_dir: PathBuf,
    base_url: Url,
    http: reqwest::Client,
}

impl AppContext {
    /// Build a context from an already loaded configuration.
    pub fn from_config(config: VsxmConfig) -> anyhow::Result<Self> {
        config.validate()?;

        let extensions_dir = config.resolve_extensions_dir()?;
        let base_url = Url::parse(&config.marketplace.base_url).with_context(|| {
            format!(
                "Invalid marketplace URL: {}",
                config.marketplace.base_url
            )
        })?;

        // No total timeout: package downloads may stream for longer than
        // `timeout_secs` as long as data keeps arriving.
        let timeout = config.timeout();
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent())
            .connect_timeout(timeout)
            .read_timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            config,
            extensions_dir,
            base_url,
            http,
        })
    }

    /// Load `vsxm.toml` from the default location and apply `VSXM_*`
    /// environment overrides.
    pub fn with_defaults() -> anyhow::Result<Self> {
        let store = ConfigStore::with_defaults()?;
        Self::load(&store)
    }

    /// Load from an explicit store and apply `VSXM_*` environment overrides.
    pub fn load(store: &ConfigStore) -> anyhow::Result<Self> {
        let mut config = store.load()?;
        config.apply_env_overrides(|key| std::env::var(key).ok());
        Self::from_config(config)
    }

    /// Same context with a different install destination.
    pub fn with_extensions_dir(mut self, extensions_dir: PathBuf) -> Self {
        self.config.extensions_dir = Some(extensions_dir.clone());
        self.extensions_dir = extensions_dir;
        self
    }

    pub fn config(&self) -> &VsxmConfig {
        &self.config
    }

    pub fn extensions_dir(&self) -> &Path {
        &self.extensions_dir
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn catalog_client(&self) -> anyhow::Result<CatalogClient> {
        CatalogClient::new(
            self.http.clone(),
            &self.base_url,
            self.config.marketplace.page_size,
        )
        .map(|client| client.with_timeout(self.config.timeout()))
        .context("Failed to create catalog client")
    }

    pub fn installer(&self) -> PackageInstaller {
        PackageInstaller::new(
            self.http.clone(),
            self.base_url.clone(),
            self.extensions_dir.clone(),
        )
    }

    pub fn tools(&self) -> anyhow::Result<ExtensionTools> {
        Ok(ExtensionTools::new(self.catalog_client()?, self.installer()))
    }
}
