//! Experience session: an [`XpEngine`] bound to the project's files.

use std::path::Path;
use std::sync::Arc;

use discen_content::{ConfigLoader, SystemLoader};
use discen_core::{DigitalSystem, XpConfig, XpEngine, XpError};

use crate::api::{Result, RuntimeError};
use crate::config::RuntimeConfig;
use crate::repository::{
    DocumentRepository, ExperienceDocument, from_json_str, read_json, to_json_string,
    write_json_atomic,
};

/// Owns the experience engine and persists its goals.
///
/// Paths are resolved against the configured project directory. Named saves
/// go through an optional [`DocumentRepository`].
pub struct ExperienceSession {
    config: RuntimeConfig,
    engine: XpEngine,
    repository: Option<Arc<dyn DocumentRepository<ExperienceDocument>>>,
}

impl ExperienceSession {
    pub fn new(config: RuntimeConfig) -> Self {
        let engine = XpEngine::new(config.xp.clone());
        Self {
            config,
            engine,
            repository: None,
        }
    }

    pub fn with_repository(
        mut self,
        repository: Arc<dyn DocumentRepository<ExperienceDocument>>,
    ) -> Self {
        self.repository = Some(repository);
        self
    }

    pub fn engine(&self) -> &XpEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut XpEngine {
        &mut self.engine
    }

    /// Loads and installs a digital system description (RON or JSON).
    pub fn load_digital_system(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = self.config.resolve(path);
        let system = SystemLoader::load(&path)?;
        self.set_digital_system(system)?;
        tracing::info!(
            target: "discen::xp",
            path = %path.display(),
            "digital system loaded"
        );
        Ok(())
    }

    pub fn set_digital_system(&mut self, system: DigitalSystem) -> Result<()> {
        let name = system.name.clone();
        self.engine.load_digital_system(system)?;
        tracing::debug!(
            target: "discen::xp",
            system = %name,
            entities = self.engine.state().entity_ids().count(),
            "digital system installed"
        );
        Ok(())
    }

    /// Replaces the engine configuration from a TOML file.
    pub fn load_configuration(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let config = ConfigLoader::load(&self.config.resolve(path))?;
        self.engine.set_configuration(config);
        Ok(())
    }

    /// Engine configuration as JSON.
    pub fn configuration(&self) -> Result<String> {
        Ok(to_json_string(self.engine.configuration())?)
    }

    pub fn set_configuration(&mut self, json: &str) -> Result<()> {
        let config: XpConfig = from_json_str(json)?;
        if config.max_episode_steps == 0 {
            return Err(RuntimeError::InvalidConfiguration(
                "max_episode_steps must be at least 1".to_owned(),
            ));
        }
        self.engine.set_configuration(config);
        Ok(())
    }

    /// Writes the current goal and its experience to `path`.
    pub fn save_current_experience(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = self.config.resolve(path);
        let goal = self.engine.current_experience()?;
        write_json_atomic(&path, &ExperienceDocument::new(goal.clone()))?;
        tracing::info!(
            target: "discen::xp",
            goal = %goal.name,
            transitions = goal.experience.transitions.len(),
            path = %path.display(),
            "experience saved"
        );
        Ok(())
    }

    /// Restores a goal from `path` and makes it current.
    pub fn load_current_experience(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let document: ExperienceDocument = read_json(&self.config.resolve(path))?;
        self.restore(document)
    }

    /// Stores the current goal under its own name in the repository.
    pub fn save_experience(&self) -> Result<String> {
        let repository = self.repository.as_ref().ok_or(RuntimeError::NoRepository)?;
        let goal = self.engine.current_experience()?;
        repository.save(&goal.name, &ExperienceDocument::new(goal.clone()))?;
        Ok(goal.name.clone())
    }

    /// Restores the goal stored as `name` and makes it current.
    pub fn load_experience(&mut self, name: &str) -> Result<()> {
        let repository = self.repository.as_ref().ok_or(RuntimeError::NoRepository)?;
        let document = repository
            .load(name)?
            .ok_or_else(|| XpError::GoalNotFound {
                name: name.to_owned(),
            })?;
        self.restore(document)
    }

    /// Names of the experiences in the repository.
    pub fn stored_experiences(&self) -> Result<Vec<String>> {
        let repository = self.repository.as_ref().ok_or(RuntimeError::NoRepository)?;
        Ok(repository.list()?)
    }

    fn restore(&mut self, document: ExperienceDocument) -> Result<()> {
        document.check_version()?;
        let name = document.experience.name.clone();
        self.engine.restore_goal(document.experience)?;
        tracing::info!(target: "discen::xp", goal = %name, "experience restored");
        Ok(())
    }
}
