//! Scenario context: lifecycle, scene synchronization and simulation playback.
//!
//! [`ScenarioContext`] owns the authoritative scenario and talks to the host
//! through the listeners registered on its [`ContextBuilder`]. Listeners stay
//! silent until [`ScenarioContext::initialize`] (and, for simulation events,
//! [`ScenarioContext::initialize_simulation`]) activates them.
//!
//! Failed operations return an error and are also reported to the message
//! sink at [`LogLevel::Warning`].

use std::path::Path;
use std::sync::Arc;

use discen_content::SimulationLoader;
use discen_core::{
    ElementData, EntityData, FrameworkError, LocalTransformData, ScenarioError, ScenarioState,
    Vector3D,
};

use crate::api::{Result, RuntimeError};
use crate::bridge::{
    Delivery, DisplayMessage, ListenerRegistry, LogLevel, MessageSink, SceneSync,
    SimulationEvent, SimulationListener,
};
use crate::config::RuntimeConfig;
use crate::repository::{
    ScenarioDocument, SimulationDocument, from_json_str, read_json, to_json_string,
    write_json_atomic,
};
use crate::simulation::SimulationPlayer;

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum LifecycleState {
    #[default]
    Uninitialized,
    Initialized,
    ScenarioEmpty,
    ScenarioLoaded,
}

/// Builder for [`ScenarioContext`].
#[derive(Default)]
pub struct ContextBuilder {
    config: RuntimeConfig,
    listeners: ListenerRegistry,
}

impl ContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    pub fn message_sink(mut self, sink: Arc<dyn MessageSink>) -> Self {
        self.listeners.set_sink(sink);
        self
    }

    pub fn scene(mut self, scene: Arc<dyn SceneSync>) -> Self {
        self.listeners.set_scene(scene);
        self
    }

    pub fn simulation_listener(mut self, listener: Arc<dyn SimulationListener>) -> Self {
        self.listeners.set_simulation(listener);
        self
    }

    pub fn build(self) -> ScenarioContext {
        ScenarioContext {
            config: self.config,
            listeners: self.listeners,
            lifecycle: LifecycleState::Uninitialized,
            scenario: ScenarioState::new(),
            simulation: None,
        }
    }
}

/// Authoritative scenario plus the host-facing protocol around it.
pub struct ScenarioContext {
    config: RuntimeConfig,
    listeners: ListenerRegistry,
    lifecycle: LifecycleState,
    scenario: ScenarioState,
    simulation: Option<SimulationPlayer>,
}

impl ScenarioContext {
    pub fn builder() -> ContextBuilder {
        ContextBuilder::new()
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn lifecycle(&self) -> LifecycleState {
        self.lifecycle
    }

    pub fn is_initialized(&self) -> bool {
        self.lifecycle != LifecycleState::Uninitialized
    }

    pub fn is_simulation_initialized(&self) -> bool {
        self.listeners.is_simulation_active()
    }

    pub fn scenario(&self) -> &ScenarioState {
        &self.scenario
    }

    pub fn simulation(&self) -> Option<&SimulationPlayer> {
        self.simulation.as_ref()
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Activates the registered listeners. Repeated calls are no-ops.
    pub fn initialize(&mut self) {
        if self.is_initialized() {
            return;
        }
        self.listeners.activate();
        self.lifecycle = LifecycleState::Initialized;
        tracing::info!(
            target: "discen::context",
            project_dir = %self.config.project_dir.display(),
            scene = self.listeners.has_scene(),
            "context initialized"
        );
    }

    /// Initializes the context and activates the simulation listener.
    pub fn initialize_simulation(&mut self) {
        self.initialize();
        if !self.listeners.is_simulation_active() {
            self.listeners.activate_simulation();
            tracing::info!(target: "discen::context", "simulation initialized");
        }
    }

    /// Drops scenario and simulation content and silences every listener.
    pub fn deinitialize(&mut self) {
        if !self.is_initialized() {
            return;
        }
        self.listeners.deactivate();
        self.scenario.clear();
        self.simulation = None;
        self.lifecycle = LifecycleState::Uninitialized;
        tracing::info!(target: "discen::context", "context deinitialized");
    }

    // ========================================================================
    // Messages
    // ========================================================================

    pub fn log(&self, level: LogLevel, message: impl Into<String>) -> Delivery {
        let message = DisplayMessage::new(level, message, self.config.message_category.as_str());
        self.display_message(&message)
    }

    pub fn display_message(&self, message: &DisplayMessage) -> Delivery {
        tracing::debug!(
            target: "discen::context",
            level = %message.level,
            category = %message.category,
            "{}",
            message.message
        );
        self.listeners.display_message(message)
    }

    fn warn(&self, operation: &str, err: &RuntimeError) {
        tracing::warn!(
            target: "discen::context",
            operation,
            code = err.error_code(),
            severity = %err.severity(),
            "{}",
            err
        );
        let message = DisplayMessage::new(
            LogLevel::Warning,
            format!("{}: {}", operation, err),
            self.config.message_category.as_str(),
        );
        self.listeners.display_message(&message);
    }

    fn reporting<T>(
        &mut self,
        operation: &'static str,
        f: impl FnOnce(&mut Self) -> Result<T>,
    ) -> Result<T> {
        let result = f(self);
        if let Err(err) = &result {
            self.warn(operation, err);
        }
        result
    }

    fn checked<T>(&self, operation: &'static str, f: impl FnOnce(&Self) -> Result<T>) -> Result<T> {
        let result = f(self);
        if let Err(err) = &result {
            self.warn(operation, err);
        }
        result
    }

    fn require_initialized(&self) -> Result<()> {
        if self.is_initialized() {
            Ok(())
        } else {
            Err(RuntimeError::NotInitialized)
        }
    }

    fn require_scene(&self) -> Result<&Arc<dyn SceneSync>> {
        self.listeners
            .scene()
            .ok_or(RuntimeError::NoListener { callback: "scene" })
    }

    fn refresh_lifecycle(&mut self) {
        if self.is_initialized() {
            self.lifecycle = if self.scenario.is_empty() {
                LifecycleState::ScenarioEmpty
            } else {
                LifecycleState::ScenarioLoaded
            };
        }
    }

    // ========================================================================
    // Transform synchronization
    // ========================================================================

    /// Pulls the scene's transform of `id` into the scenario.
    pub fn sync_element_from_scene(&mut self, id: &str) -> Result<LocalTransformData> {
        self.reporting("sync_element_from_scene", |ctx| {
            ctx.require_initialized()?;
            ctx.scenario.transform(id)?;
            let pulled = ctx
                .require_scene()?
                .pull_transform(id)
                .ok_or_else(|| RuntimeError::SceneMissingElement { id: id.to_owned() })?;
            ctx.scenario.set_transform(id, pulled.clone())?;
            Ok(pulled)
        })
    }

    /// Stores `transform` as authoritative for `id` and pushes it to the scene.
    pub fn sync_scene_from_scenario(&mut self, id: &str, transform: LocalTransformData) -> Result<()> {
        self.reporting("sync_scene_from_scenario", |ctx| {
            ctx.require_initialized()?;
            ctx.require_scene()?;
            ctx.scenario.set_transform(id, transform)?;
            let stored = ctx.scenario.transform(id)?;
            ctx.listeners.push_transform(id, stored);
            Ok(())
        })
    }

    /// Forwards a lerp directive for `id` to the scene.
    pub fn lerp_transform(
        &self,
        id: &str,
        from: &LocalTransformData,
        to: &LocalTransformData,
        trim: f32,
    ) -> Result<()> {
        self.checked("lerp_transform", |ctx| {
            ctx.require_initialized()?;
            if !trim.is_finite() || !(0.0..=1.0).contains(&trim) {
                return Err(RuntimeError::InvalidTrim { trim });
            }
            if !ctx.scenario.is_element(id) {
                return Err(ScenarioError::NotFound { id: id.to_owned() }.into());
            }
            if !from.is_finite() || !to.is_finite() {
                return Err(ScenarioError::NonFiniteTransform { id: id.to_owned() }.into());
            }
            ctx.require_scene()?.lerp_transform(id, from, to, trim);
            Ok(())
        })
    }

    /// Pushes every element to the scene, then notifies `scene_resynced`.
    pub fn sync_scene(&self) -> Result<usize> {
        self.checked("sync_scene", |ctx| {
            ctx.require_initialized()?;
            let scene = ctx.require_scene()?;
            let mut pushed = 0;
            for id in ctx.scenario.element_ids() {
                scene.push_transform(id, ctx.scenario.transform(id)?);
                pushed += 1;
            }
            scene.scene_resynced();
            tracing::debug!(target: "discen::context", pushed, "scene resynced");
            Ok(pushed)
        })
    }

    /// Pulls every element the scene knows. Applied as a whole or not at all.
    pub fn sync_scenario(&mut self) -> Result<usize> {
        self.reporting("sync_scenario", |ctx| {
            ctx.require_initialized()?;
            let scene = Arc::clone(ctx.require_scene()?);
            let mut staged = ctx.scenario.clone();
            let ids: Vec<String> = ctx.scenario.element_ids().map(str::to_owned).collect();

            let mut pulled = 0;
            for id in &ids {
                if let Some(transform) = scene.pull_transform(id) {
                    staged.set_transform(id, transform)?;
                    pulled += 1;
                }
            }

            ctx.scenario = staged;
            tracing::debug!(target: "discen::context", pulled, "scenario resynced");
            Ok(pulled)
        })
    }

    /// Asks the host to send its scene state back.
    pub fn request_scenario_resync(&self) -> Result<Delivery> {
        self.checked("request_scenario_resync", |ctx| {
            ctx.require_initialized()?;
            ctx.require_scene()?;
            Ok(ctx.listeners.scenario_resync_requested())
        })
    }

    // ========================================================================
    // Scenario
    // ========================================================================

    pub fn clear_scenario(&mut self) -> Result<()> {
        self.reporting("clear_scenario", |ctx| {
            ctx.require_initialized()?;
            ctx.scenario.clear();
            ctx.lifecycle = LifecycleState::ScenarioEmpty;
            Ok(())
        })
    }

    /// Loads a scenario document. The current scenario is replaced only if
    /// the whole document parses and validates.
    pub fn load_scenario(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = self.config.resolve(path);
        self.reporting("load_scenario", |ctx| {
            ctx.require_initialized()?;
            let document: ScenarioDocument = read_json(&path)?;
            document.check_version()?;
            let scenario = document.into_state()?;
            ctx.replace_scenario(scenario)?;
            ctx.log(
                LogLevel::Log,
                format!("loaded scenario {}", path.display()),
            );
            Ok(())
        })
    }

    pub fn save_scenario(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = self.config.resolve(path);
        self.reporting("save_scenario", |ctx| {
            ctx.require_initialized()?;
            write_json_atomic(&path, &ScenarioDocument::from_state(&ctx.scenario))?;
            Ok(())
        })
    }

    /// The scenario as a JSON document.
    pub fn scenario_json(&self) -> Result<String> {
        self.checked("scenario_json", |ctx| {
            ctx.require_initialized()?;
            Ok(to_json_string(&ScenarioDocument::from_state(&ctx.scenario))?)
        })
    }

    /// Replaces the scenario from a JSON document and resyncs the scene.
    pub fn set_scenario_json(&mut self, text: &str) -> Result<()> {
        self.reporting("set_scenario_json", |ctx| {
            ctx.require_initialized()?;
            let document: ScenarioDocument = from_json_str(text)?;
            document.check_version()?;
            let scenario = document.into_state()?;
            ctx.replace_scenario(scenario)
        })
    }

    fn replace_scenario(&mut self, scenario: ScenarioState) -> Result<()> {
        self.scenario = scenario;
        self.refresh_lifecycle();
        tracing::info!(
            target: "discen::context",
            entities = self.scenario.len(),
            elements = self.scenario.element_count(),
            "scenario replaced"
        );
        if self.config.resync_on_load && self.listeners.has_scene() {
            self.sync_scene()?;
        }
        Ok(())
    }

    pub fn add_entity(&mut self, entity: EntityData) -> Result<()> {
        self.reporting("add_entity", |ctx| {
            ctx.require_initialized()?;
            ctx.scenario.add_entity(entity)?;
            ctx.refresh_lifecycle();
            Ok(())
        })
    }

    /// Adds an element and places it in the scene.
    pub fn add_element(&mut self, element: ElementData) -> Result<()> {
        self.reporting("add_element", |ctx| {
            ctx.require_initialized()?;
            let id = element.identifier().to_owned();
            ctx.scenario.add_element(element)?;
            ctx.refresh_lifecycle();
            ctx.listeners.push_transform(&id, ctx.scenario.transform(&id)?);
            Ok(())
        })
    }

    /// Adds elements as one batch and places them in the scene.
    pub fn add_elements(&mut self, elements: Vec<ElementData>) -> Result<()> {
        self.reporting("add_elements", |ctx| {
            ctx.require_initialized()?;
            let ids: Vec<String> = elements.iter().map(|e| e.identifier().to_owned()).collect();
            ctx.scenario.add_elements(elements)?;
            ctx.refresh_lifecycle();
            for id in &ids {
                ctx.listeners.push_transform(id, ctx.scenario.transform(id)?);
            }
            Ok(())
        })
    }

    /// Removes an element. Its children keep their world pose and are pushed
    /// to the scene under their new parent.
    pub fn delete_element(&mut self, id: &str) -> Result<ElementData> {
        self.reporting("delete_element", |ctx| {
            ctx.require_initialized()?;
            ctx.remove_element(id)
        })
    }

    /// Removes an entity. Elements are removed like [`Self::delete_element`].
    pub fn delete_entity(&mut self, id: &str) -> Result<EntityData> {
        self.reporting("delete_entity", |ctx| {
            ctx.require_initialized()?;
            if ctx.scenario.is_element(id) {
                return ctx.remove_element(id).map(|element| element.entity);
            }
            let removed = ctx.scenario.delete_entity(id)?;
            ctx.refresh_lifecycle();
            Ok(removed)
        })
    }

    fn remove_element(&mut self, id: &str) -> Result<ElementData> {
        let children: Vec<String> = self
            .scenario
            .element_ids()
            .filter(|child| {
                self.scenario
                    .transform(child)
                    .is_ok_and(|t| t.parent() == Some(id))
            })
            .map(str::to_owned)
            .collect();

        let removed = self.scenario.delete_element(id)?;
        self.refresh_lifecycle();
        for child in &children {
            self.listeners
                .push_transform(child, self.scenario.transform(child)?);
        }
        Ok(removed)
    }

    pub fn entities(&self) -> Result<Vec<EntityData>> {
        self.checked("entities", |ctx| {
            ctx.require_initialized()?;
            Ok(ctx.scenario.entities().cloned().collect())
        })
    }

    pub fn elements(&self) -> Result<Vec<ElementData>> {
        self.checked("elements", |ctx| {
            ctx.require_initialized()?;
            Ok(ctx.scenario.elements().collect())
        })
    }

    pub fn element(&self, id: &str) -> Result<ElementData> {
        self.checked("element", |ctx| {
            ctx.require_initialized()?;
            ctx.scenario
                .element(id)
                .ok_or_else(|| ScenarioError::NotFound { id: id.to_owned() }.into())
        })
    }

    /// World-space origin of `id`.
    pub fn element_location(&self, id: &str) -> Result<Vector3D> {
        self.checked("element_location", |ctx| {
            ctx.require_initialized()?;
            Ok(ctx.scenario.element_location(id)?)
        })
    }

    pub fn entity_configuration(&self, id: &str) -> Result<String> {
        self.checked("entity_configuration", |ctx| {
            ctx.require_initialized()?;
            Ok(ctx.scenario.entity_configuration(id)?.to_owned())
        })
    }

    pub fn set_entity_configuration(&mut self, id: &str, configuration: String) -> Result<()> {
        self.reporting("set_entity_configuration", |ctx| {
            ctx.require_initialized()?;
            Ok(ctx.scenario.set_entity_configuration(id, configuration)?)
        })
    }

    // ========================================================================
    // Simulation
    // ========================================================================

    fn require_simulation_initialized(&self) -> Result<()> {
        if self.listeners.is_simulation_active() {
            Ok(())
        } else {
            Err(RuntimeError::SimulationNotInitialized)
        }
    }

    fn player_mut(&mut self) -> Result<&mut SimulationPlayer> {
        self.simulation.as_mut().ok_or(RuntimeError::NoSimulation)
    }

    fn player(&self) -> Result<&SimulationPlayer> {
        self.simulation.as_ref().ok_or(RuntimeError::NoSimulation)
    }

    /// Loads a timeline. `.ron` files are authored timelines; anything else
    /// is read as a JSON simulation document.
    pub fn load_simulation(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = self.config.resolve(path);
        self.reporting("load_simulation", |ctx| {
            ctx.require_simulation_initialized()?;
            let player = if path.extension().is_some_and(|ext| ext == "ron") {
                SimulationPlayer::new(SimulationLoader::load(&path)?, None)
            } else {
                let document: SimulationDocument = read_json(&path)?;
                document.check_version()?;
                SimulationPlayer::from_document(document)?
            };
            ctx.install_simulation(player);
            Ok(())
        })
    }

    /// Installs an in-memory player, replacing any loaded simulation.
    pub fn set_simulation(&mut self, player: SimulationPlayer) -> Result<()> {
        self.reporting("set_simulation", |ctx| {
            ctx.require_simulation_initialized()?;
            ctx.install_simulation(player);
            Ok(())
        })
    }

    fn install_simulation(&mut self, player: SimulationPlayer) {
        tracing::info!(
            target: "discen::simulation",
            duration = player.timeline().duration,
            tracks = player.timeline().tracks.len(),
            "simulation loaded"
        );
        self.simulation = Some(player);
        self.listeners.simulation_event(SimulationEvent::Loaded);
    }

    pub fn save_simulation(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = self.config.resolve(path);
        self.reporting("save_simulation", |ctx| {
            ctx.require_simulation_initialized()?;
            write_json_atomic(&path, &ctx.player()?.to_document())?;
            Ok(())
        })
    }

    pub fn clear_simulation(&mut self) -> Result<()> {
        self.reporting("clear_simulation", |ctx| {
            ctx.require_simulation_initialized()?;
            ctx.simulation = None;
            Ok(())
        })
    }

    /// A simulation is loaded and animates at least one element.
    pub fn valid_simulation(&self) -> bool {
        self.simulation
            .as_ref()
            .is_some_and(|player| !player.timeline().is_empty())
    }

    pub fn simulation_started(&self) -> bool {
        self.simulation
            .as_ref()
            .is_some_and(SimulationPlayer::is_started)
    }

    pub fn play_simulation(&mut self) -> Result<()> {
        self.reporting("play_simulation", |ctx| {
            ctx.require_simulation_initialized()?;
            ctx.player_mut()?.play();
            ctx.listeners.simulation_event(SimulationEvent::Play);
            Ok(())
        })
    }

    pub fn pause_simulation(&mut self) -> Result<()> {
        self.reporting("pause_simulation", |ctx| {
            ctx.require_simulation_initialized()?;
            ctx.player_mut()?.pause();
            ctx.listeners.simulation_event(SimulationEvent::Pause);
            Ok(())
        })
    }

    /// Stops and rewinds, placing every tracked element at the start.
    pub fn stop_simulation(&mut self) -> Result<()> {
        self.reporting("stop_simulation", |ctx| {
            ctx.require_simulation_initialized()?;
            ctx.player_mut()?.stop();
            ctx.apply_directives();
            ctx.listeners.simulation_event(SimulationEvent::Stop);
            Ok(())
        })
    }

    /// Advances playback by `dt` seconds.
    ///
    /// Returns whether time moved. When it did, every tracked element that
    /// is part of the scenario receives a lerp directive, followed by
    /// `Updated` and `TimeChanged`; reaching the end also emits `Stop`.
    pub fn update_simulation(&mut self, dt: f32) -> Result<bool> {
        self.reporting("update_simulation", |ctx| {
            ctx.require_simulation_initialized()?;
            let player = ctx.player_mut()?;
            if !player.advance(dt) {
                return Ok(false);
            }
            let finished = !player.is_started();
            let progress = player.progress();

            ctx.apply_directives();
            ctx.listeners.simulation_event(SimulationEvent::Updated);
            ctx.listeners
                .simulation_event(SimulationEvent::TimeChanged(progress));
            if finished {
                ctx.listeners.simulation_event(SimulationEvent::Stop);
            }
            Ok(true)
        })
    }

    pub fn set_simulation_progress(&mut self, progress: f32) -> Result<()> {
        self.reporting("set_simulation_progress", |ctx| {
            ctx.require_simulation_initialized()?;
            ctx.player_mut()?.set_progress(progress)?;
            ctx.apply_directives();
            ctx.listeners
                .simulation_event(SimulationEvent::TimeChanged(progress));
            Ok(())
        })
    }

    pub fn simulation_progress(&self) -> Result<f32> {
        self.checked("simulation_progress", |ctx| {
            ctx.require_simulation_initialized()?;
            Ok(ctx.player()?.progress())
        })
    }

    /// Simulated wall-clock time, or `None` when the timeline has no start.
    pub fn simulation_datetime_string(&self) -> Result<Option<String>> {
        self.checked("simulation_datetime_string", |ctx| {
            ctx.require_simulation_initialized()?;
            Ok(ctx.player()?.datetime_string())
        })
    }

    fn apply_directives(&self) -> usize {
        let Some(player) = &self.simulation else {
            return 0;
        };
        let mut issued = 0;
        for (element, sample) in player.samples() {
            if !self.scenario.is_element(element) {
                continue;
            }
            if self
                .listeners
                .lerp_transform(element, sample.from, sample.to, sample.trim)
                .is_delivered()
            {
                issued += 1;
            }
        }
        tracing::trace!(target: "discen::simulation", issued, elapsed = player.elapsed(), "directives");
        issued
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operations_require_initialize() {
        let mut ctx = ScenarioContext::builder().build();
        assert!(matches!(ctx.entities(), Err(RuntimeError::NotInitialized)));
        assert!(matches!(
            ctx.clear_scenario(),
            Err(RuntimeError::NotInitialized)
        ));

        ctx.initialize();
        ctx.initialize();
        assert_eq!(ctx.lifecycle(), LifecycleState::Initialized);
        ctx.clear_scenario().unwrap();
        assert_eq!(ctx.lifecycle(), LifecycleState::ScenarioEmpty);

        ctx.deinitialize();
        assert_eq!(ctx.lifecycle(), LifecycleState::Uninitialized);
    }

    #[test]
    fn test_simulation_requires_its_own_initialize() {
        let mut ctx = ScenarioContext::builder().build();
        ctx.initialize();
        assert!(matches!(
            ctx.play_simulation(),
            Err(RuntimeError::SimulationNotInitialized)
        ));

        ctx.initialize_simulation();
        assert!(matches!(ctx.play_simulation(), Err(RuntimeError::NoSimulation)));
        assert!(!ctx.valid_simulation());
    }
}
