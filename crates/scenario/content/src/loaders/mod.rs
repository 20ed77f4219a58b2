//! Content loaders for reading scenario data from files.
//!
//! Digital systems and simulation timelines are read from RON or JSON,
//! picked by file extension. Engine configuration is read from TOML.

pub mod config;
pub mod factory;
pub mod simulation;
pub mod system;

pub use config::ConfigLoader;
pub use factory::ContentFactory;
pub use simulation::SimulationLoader;
pub use system::SystemLoader;

use std::path::Path;

use serde::de::DeserializeOwned;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}

/// Structured data formats accepted for systems and timelines.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DataFormat {
    Ron,
    Json,
}

impl DataFormat {
    /// Picks the format from the file extension (`.ron` or `.json`).
    pub fn from_path(path: &Path) -> LoadResult<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("ron") => Ok(Self::Ron),
            Some(ext) if ext.eq_ignore_ascii_case("json") => Ok(Self::Json),
            _ => Err(anyhow::anyhow!(
                "Unsupported data file {} (expected .ron or .json)",
                path.display()
            )),
        }
    }

    pub fn parse<T: DeserializeOwned>(self, content: &str) -> LoadResult<T> {
        match self {
            Self::Ron => {
                ron::from_str(content).map_err(|e| anyhow::anyhow!("Failed to parse RON: {}", e))
            }
            Self::Json => serde_json::from_str(content)
                .map_err(|e| anyhow::anyhow!("Failed to parse JSON: {}", e)),
        }
    }
}

/// Reads and parses a RON or JSON file.
pub(crate) fn load_structured<T: DeserializeOwned>(path: &Path) -> LoadResult<T> {
    let format = DataFormat::from_path(path)?;
    let content = read_file(path)?;
    format
        .parse(&content)
        .map_err(|e| anyhow::anyhow!("{} ({})", e, path.display()))
}
