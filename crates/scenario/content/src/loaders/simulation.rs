//! Simulation timeline loader.

use std::path::Path;

use discen_core::Timeline;

use crate::loaders::{LoadResult, load_structured};

/// Loader for keyframed simulation timelines (RON or JSON).
pub struct SimulationLoader;

impl SimulationLoader {
    /// Loads a timeline; tracks are validated and sorted by time.
    pub fn load(path: &Path) -> LoadResult<Timeline> {
        let timeline: Timeline = load_structured(path)?;
        timeline
            .normalized()
            .map_err(|e| anyhow::anyhow!("Invalid timeline {}: {}", path.display(), e))
    }
}
