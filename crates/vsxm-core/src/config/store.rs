//! Config store for loading and saving vsxm.toml.

use std::path::{Path, PathBuf};

use anyhow::Context;

use super::{VsxmConfig, parser};

#[derive(Debug, Clone)]
pub struct ConfigStore {
    config_path: PathBuf,
}

impl ConfigStore {
    /// Store backed by `<config_dir>/vsxm/vsxm.toml`.
    pub fn with_defaults() -> anyhow::Result<Self> {
        let global_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?
            .join("vsxm");

        Ok(Self::from_dir(&global_dir))
    }

    pub fn from_dir(config_dir: &Path) -> Self {
        Self::from_path(config_dir.join("vsxm.toml"))
    }

    pub fn from_path(config_path: PathBuf) -> Self {
        Self { config_path }
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Load the config file, falling back to defaults when it does not exist.
    pub fn load(&self) -> anyhow::Result<VsxmConfig> {
        if !self.config_path.exists() {
            tracing::debug!(path = %self.config_path.display(), "no config file, using defaults");
            return Ok(VsxmConfig::new());
        }
        parser::parse_vsxm_toml(&self.config_path)
    }

    pub fn save(&self, config: &VsxmConfig) -> anyhow::Result<()> {
        config.validate()?;
        let content = parser::to_toml(config)?;
        if let Some(parent) = self.config_path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }
        std::fs::write(&self.config_path, content).with_context(|| {
            format!("Failed to write config: {}", self.config_path.display())
        })?;
        Ok(())
    }
}
