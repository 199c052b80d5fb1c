//! Configuration schema for vsxm.toml
//!
//! Every field is optional; a missing file or an empty table resolves to the
//! defaults below:
//! - extensions_dir: ~/.cursor/extensions
//! - marketplace.base_url: https://marketplace.visualstudio.com

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use serde::{Deserialize, Serialize};

pub const DEFAULT_MARKETPLACE_URL: &str = "https://marketplace.visualstudio.com";
pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Environment variable overriding `extensions_dir`
pub const ENV_EXTENSIONS_DIR: &str = "VSXM_EXTENSIONS_DIR";
/// Environment variable overriding `marketplace.base_url`
pub const ENV_MARKETPLACE_URL: &str = "VSXM_MARKETPLACE_URL";

/// Root configuration structure for vsxm.toml
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct VsxmConfig {
    /// Install destination for downloaded packages
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions_dir: Option<PathBuf>,

    /// Marketplace endpoint settings
    #[serde(default)]
    pub marketplace: MarketplaceConfig,
}

/// `[marketplace]` table
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MarketplaceConfig {
    /// Root of the gallery API; search and download URLs hang off it
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Candidates requested from the search endpoint before ranking
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Connect and idle-read timeout in seconds; also caps a whole search
    /// request. Downloads are not capped while data keeps arriving.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

impl Default for MarketplaceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            page_size: default_page_size(),
            timeout_secs: default_timeout_secs(),
            user_agent: None,
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_MARKETPLACE_URL.to_string()
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

/// Default install destination: `~/.cursor/extensions`.
pub fn default_extensions_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".cursor").join("extensions"))
}

impl VsxmConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate field values that serde cannot express.
    pub fn validate(&self) -> anyhow::Result<()> {
        let url = url::Url::parse(&self.marketplace.base_url).with_context(|| {
            format!(
                "Invalid marketplace.base_url: {}",
                self.marketplace.base_url
            )
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            anyhow::bail!(
                "marketplace.base_url must use http or https, got '{}'",
                url.scheme()
            );
        }
        if url.cannot_be_a_base() {
            anyhow::bail!(
                "marketplace.base_url is not a base URL: {}",
                self.marketplace.base_url
            );
        }
        if self.marketplace.page_size == 0 {
            anyhow::bail!("marketplace.page_size must be at least 1");
        }
        if self.marketplace.timeout_secs == 0 {
            anyhow::bail!("marketplace.timeout_secs must be at least 1");
        }
        if let Some(dir) = &self.extensions_dir
            && dir.as_os_str().is_empty()
        {
            anyhow::bail!("extensions_dir must not be empty");
        }
        Ok(())
    }

    /// Apply `VSXM_*` overrides using the given lookup.
    ///
    /// Takes a lookup function instead of reading the process environment
    /// directly so callers (and tests) control the source.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup(ENV_EXTENSIONS_DIR).filter(|v| !v.trim().is_empty()) {
            self.extensions_dir = Some(PathBuf::from(dir));
        }
        if let Some(url) = lookup(ENV_MARKETPLACE_URL).filter(|v| !v.trim().is_empty()) {
            self.marketplace.base_url = url;
        }
    }

    /// Resolved install destination (configured value or the default).
    pub fn resolve_extensions_dir(&self) -> anyhow::Result<PathBuf> {
        match &self.extensions_dir {
            Some(dir) => Ok(dir.clone()),
            None => default_extensions_dir()
                .ok_or_else(|| anyhow::anyhow!("Could not determine home directory")),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.marketplace.timeout_secs)
    }

    /// User agent sent with every marketplace request.
    pub fn user_agent(&self) -> String {
        self.marketplace
            .user_agent
            .clone()
            .unwrap_or_else(|| format!("vsxm/{}", env!("CARGO_PKG_VERSION")))
    }
}
