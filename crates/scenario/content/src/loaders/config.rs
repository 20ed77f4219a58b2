//! Experience engine configuration loader.

use std::path::Path;

use discen_core::XpConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for engine configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file. Missing keys keep their defaults.
    pub fn load(path: &Path) -> LoadResult<XpConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<XpConfig> {
        let config: XpConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;
        if config.max_episode_steps == 0 {
            anyhow::bail!("max_episode_steps must be at least 1");
        }
        Ok(config)
    }
}
