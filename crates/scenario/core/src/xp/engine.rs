//! Experience engine: goals, action resolution and training episodes.

use std::collections::{BTreeMap, BTreeSet};

use super::condition::all_hold;
use super::{
    ActionData, ActionResult, DigitalSystem, EntityCondition, Goal, StateKey,
    SystemState, Transition, XpConfig, XpError,
};
use crate::entity::{PropertyData, RelationshipData};

pub type Result<T> = std::result::Result<T, XpError>;

/// Bookkeeping of the running episode.
#[derive(Clone, Debug, Default)]
struct Episode {
    visited: BTreeSet<StateKey>,
    steps: u32,
    changed_entities: BTreeSet<String>,
    last_result: Option<ActionResult>,
}

impl Episode {
    fn starting_at(state: StateKey) -> Self {
        Self {
            visited: BTreeSet::from([state]),
            ..Self::default()
        }
    }
}

/// Runs actions of a [`DigitalSystem`] against goals and records what
/// happened.
///
/// Only one goal is current at a time. Switching goals replaces the active
/// experience in a single assignment, so no call observes a half-switched
/// engine.
#[derive(Clone, Debug, Default)]
pub struct XpEngine {
    config: XpConfig,
    system: Option<DigitalSystem>,
    state: SystemState,
    goals: BTreeMap<String, Goal>,
    current_goal: Option<String>,
    episode: Episode,
    entity_configuration: BTreeMap<String, String>,
}

impl XpEngine {
    pub fn new(config: XpConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    // ========================================================================
    // System & configuration
    // ========================================================================

    /// Validates and installs a system, then starts a fresh episode.
    ///
    /// Goals and their conditions are kept; recorded experiences refer to
    /// states of the previous system and are cleared.
    pub fn load_digital_system(&mut self, system: DigitalSystem) -> Result<()> {
        system.validate()?;
        self.entity_configuration = system
            .entities
            .iter()
            .map(|entity| (entity.id.clone(), entity.configuration.clone()))
            .collect();
        self.system = Some(system);
        for goal in self.goals.values_mut() {
            goal.experience.clear();
        }
        self.new_episode()
    }

    pub fn system(&self) -> Option<&DigitalSystem> {
        self.system.as_ref()
    }

    pub fn configuration(&self) -> &XpConfig {
        &self.config
    }

    pub fn set_configuration(&mut self, config: XpConfig) {
        self.config = config;
    }

    pub fn set_deadlock_detection(&mut self, enabled: bool) {
        self.config.deadlock_detection = enabled;
    }

    pub fn deadlock_detection(&self) -> bool {
        self.config.deadlock_detection
    }

    // ========================================================================
    // Episodes & experiences
    // ========================================================================

    /// Resets the system state to its initial values and forgets the states
    /// visited so far.
    pub fn new_episode(&mut self) -> Result<()> {
        let system = self.system.as_ref().ok_or(XpError::NoSystemLoaded)?;
        self.state = system.initial_state();
        self.episode = Episode::starting_at(self.state.fingerprint());
        if let Some(goal) = self.current_goal_entry_mut() {
            goal.experience.episodes += 1;
        }
        Ok(())
    }

    pub fn clear_current_experience(&mut self) -> Result<()> {
        self.current_goal_entry_mut()
            .ok_or(XpError::NoCurrentGoal)?
            .experience
            .clear();
        Ok(())
    }

    pub fn clear_all_experiences(&mut self) {
        for goal in self.goals.values_mut() {
            goal.experience.clear();
        }
    }

    pub fn current_experience(&self) -> Result<&Goal> {
        self.current_goal_entry().ok_or(XpError::NoCurrentGoal)
    }

    /// Installs a persisted goal, replacing any goal of the same name, and
    /// makes it current.
    pub fn restore_goal(&mut self, goal: Goal) -> Result<()> {
        if goal.name.is_empty() {
            return Err(XpError::EmptyGoalName);
        }
        let name = goal.name.clone();
        self.goals.insert(name.clone(), goal);
        self.set_current_goal(&name)
    }

    // ========================================================================
    // Goals
    // ========================================================================

    pub fn goals(&self) -> impl Iterator<Item = &str> {
        self.goals.keys().map(String::as_str)
    }

    pub fn goal_count(&self) -> usize {
        self.goals.len()
    }

    pub fn goal(&self, name: &str) -> Option<&Goal> {
        self.goals.get(name)
    }

    pub fn current_goal(&self) -> Option<&str> {
        self.current_goal.as_deref()
    }

    pub fn add_new_goal(&mut self, name: &str) -> Result<()> {
        if name.is_empty() {
            return Err(XpError::EmptyGoalName);
        }
        if self.goals.contains_key(name) {
            return Err(XpError::DuplicateGoal {
                name: name.to_owned(),
            });
        }
        self.goals.insert(name.to_owned(), Goal::new(name));
        Ok(())
    }

    /// Makes `name` the current goal. The deadlock memory restarts from the
    /// present state.
    pub fn set_current_goal(&mut self, name: &str) -> Result<()> {
        if !self.goals.contains_key(name) {
            return Err(XpError::GoalNotFound {
                name: name.to_owned(),
            });
        }
        self.current_goal = Some(name.to_owned());
        self.episode.visited = BTreeSet::from([self.state.fingerprint()]);
        Ok(())
    }

    /// Removes a goal. Removing the current goal leaves no goal selected.
    pub fn remove_goal(&mut self, name: &str) -> Result<Goal> {
        let goal = self
            .goals
            .remove(name)
            .ok_or_else(|| XpError::GoalNotFound {
                name: name.to_owned(),
            })?;
        if self.current_goal.as_deref() == Some(name) {
            self.current_goal = None;
        }
        Ok(goal)
    }

    pub fn reset_success_condition(&mut self) -> Result<()> {
        self.current_goal_entry_mut()
            .ok_or(XpError::NoCurrentGoal)?
            .success_conditions
            .clear();
        Ok(())
    }

    pub fn add_success_condition(&mut self, condition: EntityCondition) -> Result<()> {
        self.current_goal_entry_mut()
            .ok_or(XpError::NoCurrentGoal)?
            .success_conditions
            .push(condition);
        Ok(())
    }

    pub fn success_conditions(&self) -> Result<&[EntityCondition]> {
        self.current_goal_entry()
            .map(|goal| goal.success_conditions.as_slice())
            .ok_or(XpError::NoCurrentGoal)
    }

    /// Whether the current goal's conditions hold in the present state.
    pub fn is_goal_reached(&self) -> bool {
        self.current_goal_entry()
            .is_some_and(|goal| all_hold(&goal.success_conditions, &self.state))
    }

    // ========================================================================
    // Actions
    // ========================================================================

    pub fn available_actions(&self) -> Result<Vec<ActionData>> {
        Ok(self.loaded_system()?.available_actions(&self.state))
    }

    /// Actions recorded as failing, deadlocking or denied from the present
    /// state.
    pub fn forbidden_actions(&self) -> Result<Vec<ActionData>> {
        let goal = self.current_experience()?;
        Ok(goal.experience.forbidden_from(self.state.fingerprint()))
    }

    /// Recorded actions from the present state that lead to a success.
    pub fn suggested_actions(&self) -> Result<Vec<ActionData>> {
        let goal = self.current_experience()?;
        Ok(goal.experience.suggested_from(self.state.fingerprint()))
    }

    pub fn take_action(
        &mut self,
        action_id: &str,
        params: &[String],
        update_xp: bool,
    ) -> Result<ActionResult> {
        self.do_action(
            &ActionData {
                action_id: action_id.to_owned(),
                params: params.to_vec(),
            },
            update_xp,
        )
    }

    /// Resolves one action against the present state.
    ///
    /// With `update_xp` the transition is recorded into the current goal's
    /// experience, which requires a current goal. Without it the call is a
    /// probe: the state still advances but nothing is recorded.
    pub fn do_action(&mut self, action: &ActionData, update_xp: bool) -> Result<ActionResult> {
        let system = self.system.as_ref().ok_or(XpError::NoSystemLoaded)?;
        if update_xp && self.current_goal.is_none() {
            return Err(XpError::NoCurrentGoal);
        }
        let from = self.state.fingerprint();

        let result = if !system.is_available(action, &self.state) {
            ActionResult::Denied
        } else {
            // `is_available` guarantees the rule exists.
            let changed = match system.rule(&action.action_id) {
                Some(rule) => rule.apply(&action.params, &mut self.state),
                None => BTreeSet::new(),
            };
            self.episode.changed_entities.extend(changed);
            self.episode.steps += 1;

            let to = self.state.fingerprint();
            let revisited = !self.episode.visited.insert(to);
            if revisited && self.config.deadlock_detection {
                ActionResult::Deadlock
            } else if self.is_goal_reached() {
                ActionResult::Succeeded
            } else if system.available_actions(&self.state).is_empty() {
                ActionResult::Failed
            } else {
                ActionResult::InProgress
            }
        };

        if update_xp {
            let to = self.state.fingerprint();
            if let Some(goal) = self.current_goal_entry_mut() {
                goal.experience.record(Transition {
                    from,
                    action: action.clone(),
                    to,
                    result,
                });
            }
        }
        self.episode.last_result = Some(result);
        Ok(result)
    }

    pub fn last_result(&self) -> Option<ActionResult> {
        self.episode.last_result
    }

    pub fn episode_steps(&self) -> u32 {
        self.episode.steps
    }

    /// Runs one episode from the initial state.
    ///
    /// Each step takes the best suggested action when one is known. Otherwise,
    /// with `agent_learning`, an action not yet tried from the present state;
    /// failing that, any available action not recorded as forbidden.
    /// Forbidden actions are never chosen. When nothing can be chosen the
    /// episode fails and the step that led there becomes forbidden. The
    /// episode also ends on a terminal result or after
    /// [`XpConfig::max_episode_steps`] actions.
    pub fn train_agent(&mut self, update_xp: bool, agent_learning: bool) -> Result<ActionResult> {
        if self.current_goal.is_none() {
            return Err(XpError::NoCurrentGoal);
        }
        self.new_episode()?;

        let mut result = ActionResult::InProgress;
        let mut last_step: Option<Transition> = None;
        while self.episode.steps < self.config.max_episode_steps {
            let Some(action) = self.choose_action(agent_learning)? else {
                // Dead end: the step that led here is recorded as failed so
                // later episodes avoid it.
                if update_xp
                    && let Some(step) = last_step.take()
                    && let Some(goal) = self.current_goal_entry_mut()
                {
                    goal.experience.record(Transition {
                        result: ActionResult::Failed,
                        ..step
                    });
                }
                result = ActionResult::Failed;
                break;
            };
            let from = self.state.fingerprint();
            result = self.do_action(&action, update_xp)?;
            if result.is_terminal() {
                break;
            }
            last_step = Some(Transition {
                from,
                action,
                to: self.state.fingerprint(),
                result,
            });
        }
        if result == ActionResult::InProgress {
            // Step budget exhausted.
            result = ActionResult::Failed;
        }
        self.episode.last_result = Some(result);
        Ok(result)
    }

    fn choose_action(&self, agent_learning: bool) -> Result<Option<ActionData>> {
        let goal = self.current_experience()?;
        let here = self.state.fingerprint();
        let forbidden = goal.experience.forbidden_from(here);

        if let Some(action) = goal.experience.suggested_from(here).into_iter().next() {
            return Ok(Some(action));
        }

        let available: Vec<ActionData> = self
            .available_actions()?
            .into_iter()
            .filter(|action| !forbidden.contains(action))
            .collect();

        if agent_learning {
            let tried = goal.experience.tried_from(here);
            if let Some(action) = available.iter().find(|action| !tried.contains(action)) {
                return Ok(Some(action.clone()));
            }
        }
        Ok(available.into_iter().next())
    }

    // ========================================================================
    // Entity queries
    // ========================================================================

    /// Identifiers of every entity of the loaded system.
    pub fn scenario_entities(&self) -> Result<Vec<&str>> {
        self.loaded_system()?;
        Ok(self.state.entity_ids().collect())
    }

    /// Entities modified since the episode started.
    pub fn changed_entities(&self) -> impl Iterator<Item = &str> {
        self.episode.changed_entities.iter().map(String::as_str)
    }

    pub fn entity_properties(&self, id: &str) -> Result<Vec<PropertyData>> {
        self.state.properties(id).ok_or_else(|| unknown_entity(id))
    }

    pub fn entity_relationships(&self, id: &str) -> Result<Vec<RelationshipData>> {
        self.state.relationships(id).ok_or_else(|| unknown_entity(id))
    }

    pub fn entity_property(&self, id: &str, property: &str) -> Result<Option<&str>> {
        self.require_entity(id)?;
        Ok(self.state.property(id, property))
    }

    pub fn check_entity_property(&self, id: &str, property: &str, value: &str) -> Result<bool> {
        Ok(self.entity_property(id, property)? == Some(value))
    }

    /// An empty `related` matches a relationship to any entity.
    pub fn entity_has_relationship(
        &self,
        id: &str,
        relationship_id: &str,
        related: &str,
    ) -> Result<bool> {
        self.require_entity(id)?;
        Ok(self.state.has_relationship(id, relationship_id, related))
    }

    pub fn entity_configuration(&self, id: &str) -> Result<&str> {
        self.entity_configuration
            .get(id)
            .map(String::as_str)
            .ok_or_else(|| unknown_entity(id))
    }

    pub fn set_entity_configuration(&mut self, id: &str, configuration: String) -> Result<()> {
        let slot = self
            .entity_configuration
            .get_mut(id)
            .ok_or_else(|| unknown_entity(id))?;
        *slot = configuration;
        Ok(())
    }

    pub fn entity_type(&self, id: &str) -> Result<&str> {
        self.loaded_system()?
            .entity(id)
            .map(|entity| entity.entity_type.as_str())
            .ok_or_else(|| unknown_entity(id))
    }

    pub fn possible_properties(&self, entity_type: &str) -> Result<Vec<&str>> {
        let schema = self.loaded_system()?.schema(entity_type)?;
        Ok(schema.properties.keys().map(String::as_str).collect())
    }

    pub fn possible_property_values(&self, entity_type: &str, property: &str) -> Result<Vec<&str>> {
        let schema = self.loaded_system()?.schema(entity_type)?;
        schema
            .properties
            .get(property)
            .map(|values| values.iter().map(String::as_str).collect())
            .ok_or_else(|| XpError::UnknownProperty {
                entity_type: entity_type.to_owned(),
                property: property.to_owned(),
            })
    }

    pub fn entity_possible_properties(&self, id: &str) -> Result<Vec<&str>> {
        self.possible_properties(self.entity_type(id)?)
    }

    pub fn entity_possible_property_values(&self, id: &str, property: &str) -> Result<Vec<&str>> {
        self.possible_property_values(self.entity_type(id)?, property)
    }

    /// Named engine facts for diagnostics. Unknown keys yield `None`.
    pub fn info(&self, key: &str) -> Option<String> {
        let goal = self.current_goal_entry();
        match key {
            "system" => self.system.as_ref().map(|system| system.name.clone()),
            "goal_count" => Some(self.goals.len().to_string()),
            "current_goal" => self.current_goal.clone(),
            "episode_steps" => Some(self.episode.steps.to_string()),
            "episodes" => goal.map(|goal| goal.experience.episodes.to_string()),
            "transitions" => goal.map(|goal| goal.experience.transitions.len().to_string()),
            "deadlock_detection" => Some(self.config.deadlock_detection.to_string()),
            "state" => Some(self.state.fingerprint().to_hex()),
            "last_result" => self.episode.last_result.map(|result| result.to_string()),
            _ => None,
        }
    }

    pub fn state(&self) -> &SystemState {
        &self.state
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    fn loaded_system(&self) -> Result<&DigitalSystem> {
        self.system.as_ref().ok_or(XpError::NoSystemLoaded)
    }

    fn require_entity(&self, id: &str) -> Result<()> {
        if self.state.contains(id) {
            Ok(())
        } else {
            Err(unknown_entity(id))
        }
    }

    fn current_goal_entry(&self) -> Option<&Goal> {
        self.current_goal
            .as_deref()
            .and_then(|name| self.goals.get(name))
    }

    fn current_goal_entry_mut(&mut self) -> Option<&mut Goal> {
        let name = self.current_goal.as_deref()?;
        self.goals.get_mut(name)
    }
}

fn unknown_entity(id: &str) -> XpError {
    XpError::UnknownEntity { id: id.to_owned() }
}
