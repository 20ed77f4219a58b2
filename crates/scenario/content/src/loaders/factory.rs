//! Content factory for loading a scenario project's data files.

use std::path::{Path, PathBuf};

use discen_core::{DigitalSystem, Timeline, XpConfig};

use crate::loaders::{ConfigLoader, LoadResult, SimulationLoader, SystemLoader};

/// Content factory that loads scenario content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// ├── systems/
/// │   └── corridor.ron
/// └── simulations/
///     └── delivery.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load engine configuration from `config.toml`, falling back to the
    /// defaults when the file does not exist.
    pub fn load_config(&self) -> LoadResult<XpConfig> {
        let path = self.data_dir.join("config.toml");
        if path.exists() {
            ConfigLoader::load(&path)
        } else {
            Ok(XpConfig::default())
        }
    }

    /// Load a digital system from `systems/<name>.ron` (or `.json`).
    pub fn load_system(&self, name: &str) -> LoadResult<DigitalSystem> {
        let path = self.resolve("systems", name)?;
        SystemLoader::load(&path)
    }

    /// Load a timeline from `simulations/<name>.ron` (or `.json`).
    pub fn load_simulation(&self, name: &str) -> LoadResult<Timeline> {
        let path = self.resolve("simulations", name)?;
        SimulationLoader::load(&path)
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn resolve(&self, dir: &str, name: &str) -> LoadResult<PathBuf> {
        let base = self.data_dir.join(dir);
        ["ron", "json"]
            .iter()
            .map(|ext| base.join(format!("{}.{}", name, ext)))
            .find(|path| path.exists())
            .ok_or_else(|| {
                anyhow::anyhow!("No {}.ron or {}.json in {}", name, name, base.display())
            })
    }
}
