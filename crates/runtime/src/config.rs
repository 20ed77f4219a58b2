//! Runtime configuration.

use std::env;
use std::path::{Path, PathBuf};

use discen_core::XpConfig;

/// Settings shared by the context and the experience session.
#[derive(Clone, Debug, PartialEq)]
pub struct RuntimeConfig {
    /// Base for relative scenario, experience and simulation paths.
    pub project_dir: PathBuf,
    pub xp: XpConfig,
    /// Category attached to framework messages.
    pub message_category: String,
    /// Push every element to the scene after a scenario is loaded.
    pub resync_on_load: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            project_dir: PathBuf::from("."),
            xp: XpConfig::default(),
            message_category: "discen".to_owned(),
            resync_on_load: true,
        }
    }
}

impl RuntimeConfig {
    /// Construct configuration from environment variables.
    ///
    /// Environment variables:
    /// - `DISCEN_PROJECT_DIR` - Project directory (default: `.`)
    /// - `DISCEN_DEADLOCK_DETECTION` - `true`/`false` (default: false)
    /// - `DISCEN_MAX_EPISODE_STEPS` - Training step bound (default: 256)
    /// - `DISCEN_MESSAGE_CATEGORY` - Message category (default: `discen`)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(dir) = read_env::<PathBuf>("DISCEN_PROJECT_DIR") {
            config.project_dir = dir;
        }
        if let Some(enabled) = read_env::<bool>("DISCEN_DEADLOCK_DETECTION") {
            config.xp.deadlock_detection = enabled;
        }
        if let Some(steps) = read_env::<u32>("DISCEN_MAX_EPISODE_STEPS") {
            config.xp.max_episode_steps = steps.max(1);
        }
        if let Some(category) = read_env::<String>("DISCEN_MESSAGE_CATEGORY")
            && !category.is_empty()
        {
            config.message_category = category;
        }

        config
    }

    pub fn with_project_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.project_dir = dir.into();
        self
    }

    pub fn with_xp(mut self, xp: XpConfig) -> Self {
        self.xp = xp;
        self
    }

    /// Resolves `path` against the project directory unless it is absolute.
    pub fn resolve(&self, path: impl AsRef<Path>) -> PathBuf {
        let path = path.as_ref();
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.project_dir.join(path)
        }
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
