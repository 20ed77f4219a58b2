//! Authoritative scenario store.
//!
//! Entities are keyed by identifier; the subset that carries a transform are
//! the elements. Every mutation validates before it writes, so a rejected call
//! leaves the store exactly as it was.
mod error;

pub use error::ScenarioError;

use std::collections::{BTreeMap, BTreeSet};

use crate::entity::{ElementData, EntityData};
use crate::geometry::{LocalTransformData, Vector3D};

pub type Result<T> = std::result::Result<T, ScenarioError>;

/// Entities and element transforms of one scenario.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScenarioState {
    entities: BTreeMap<String, EntityData>,
    transforms: BTreeMap<String, LocalTransformData>,
}

impl ScenarioState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store from persisted parts, validating identifiers and the
    /// parent graph as a whole. Elements may reference parents that appear
    /// later in the list.
    pub fn from_parts(entities: Vec<EntityData>, elements: Vec<ElementData>) -> Result<Self> {
        let mut state = Self::new();
        for entity in entities {
            state.insert_entity(entity)?;
        }
        state.add_elements(elements)?;
        Ok(state)
    }

    /// Splits the store into plain entities and elements.
    pub fn into_parts(self) -> (Vec<EntityData>, Vec<ElementData>) {
        let Self {
            entities,
            mut transforms,
        } = self;

        let mut plain = Vec::new();
        let mut elements = Vec::new();
        for (id, entity) in entities {
            match transforms.remove(&id) {
                Some(local_transform) => elements.push(ElementData::new(entity, local_transform)),
                None => plain.push(entity),
            }
        }
        (plain, elements)
    }

    // ========================================================================
    // Mutation
    // ========================================================================

    /// Adds an entity without a transform.
    pub fn add_entity(&mut self, entity: EntityData) -> Result<()> {
        self.insert_entity(entity)
    }

    /// Adds an element. Its parent, if any, must already be an element.
    pub fn add_element(&mut self, element: ElementData) -> Result<()> {
        let ElementData {
            entity,
            local_transform,
        } = element;
        Self::check_identifier(&entity.identifier)?;
        if self.entities.contains_key(&entity.identifier) {
            return Err(ScenarioError::DuplicateIdentifier {
                id: entity.identifier,
            });
        }
        self.check_transform(&entity.identifier, &local_transform)?;

        self.transforms
            .insert(entity.identifier.clone(), local_transform);
        self.entities.insert(entity.identifier.clone(), entity);
        Ok(())
    }

    /// Adds a batch of elements atomically.
    ///
    /// Duplicates inside the batch or against the store, unknown parents and
    /// parent cycles reject the whole batch.
    pub fn add_elements(&mut self, elements: Vec<ElementData>) -> Result<()> {
        let mut staged = self.clone();
        let mut added = Vec::with_capacity(elements.len());
        for ElementData {
            entity,
            local_transform,
        } in elements
        {
            if !local_transform.is_finite() {
                return Err(ScenarioError::NonFiniteTransform {
                    id: entity.identifier,
                });
            }
            added.push(entity.identifier.clone());
            staged
                .transforms
                .insert(entity.identifier.clone(), local_transform);
            staged.insert_entity(entity)?;
        }

        for id in &added {
            if let Some(transform) = staged.transforms.get(id) {
                staged.check_parent(id, transform.parent())?;
            }
        }

        *self = staged;
        Ok(())
    }

    /// Removes an element and returns it.
    ///
    /// Children of the removed element are re-parented to its parent with
    /// their transform composed, so their world pose does not move.
    pub fn delete_element(&mut self, id: &str) -> Result<ElementData> {
        let removed_transform = self.transforms.get(id).cloned().ok_or_else(|| {
            if self.entities.contains_key(id) {
                ScenarioError::NotAnElement { id: id.to_owned() }
            } else {
                ScenarioError::not_found(id)
            }
        })?;

        for transform in self.transforms.values_mut() {
            if transform.parent() == Some(id) {
                *transform = transform.compose_with(&removed_transform);
            }
        }

        self.transforms.remove(id);
        let entity = self
            .entities
            .remove(id)
            .ok_or_else(|| ScenarioError::not_found(id))?;
        Ok(ElementData::new(entity, removed_transform))
    }

    /// Removes an entity that carries no transform.
    pub fn delete_entity(&mut self, id: &str) -> Result<EntityData> {
        if self.transforms.contains_key(id) {
            return self.delete_element(id).map(|element| element.entity);
        }
        self.entities
            .remove(id)
            .ok_or_else(|| ScenarioError::not_found(id))
    }

    pub fn clear(&mut self) {
        self.entities.clear();
        self.transforms.clear();
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn element_count(&self) -> usize {
        self.transforms.len()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entities.contains_key(id)
    }

    pub fn is_element(&self, id: &str) -> bool {
        self.transforms.contains_key(id)
    }

    pub fn entity(&self, id: &str) -> Option<&EntityData> {
        self.entities.get(id)
    }

    pub fn element(&self, id: &str) -> Option<ElementData> {
        let transform = self.transforms.get(id)?;
        let entity = self.entities.get(id)?;
        Some(ElementData::new(entity.clone(), transform.clone()))
    }

    /// All entities, elements included, ordered by identifier.
    pub fn entities(&self) -> impl Iterator<Item = &EntityData> {
        self.entities.values()
    }

    pub fn elements(&self) -> impl Iterator<Item = ElementData> + '_ {
        self.transforms.iter().filter_map(|(id, transform)| {
            self.entities
                .get(id)
                .map(|entity| ElementData::new(entity.clone(), transform.clone()))
        })
    }

    pub fn element_ids(&self) -> impl Iterator<Item = &str> {
        self.transforms.keys().map(String::as_str)
    }

    // ========================================================================
    // Transforms
    // ========================================================================

    pub fn transform(&self, id: &str) -> Result<&LocalTransformData> {
        self.transforms.get(id).ok_or_else(|| self.missing_element(id))
    }

    /// Replaces the authoritative transform of an element.
    pub fn set_transform(&mut self, id: &str, transform: LocalTransformData) -> Result<()> {
        if !self.transforms.contains_key(id) {
            return Err(self.missing_element(id));
        }
        self.check_transform(id, &transform)?;
        self.transforms.insert(id.to_owned(), transform);
        Ok(())
    }

    /// Resolves the parent chain and returns the transform in world space.
    pub fn world_transform(&self, id: &str) -> Result<LocalTransformData> {
        let mut world = self.transform(id)?.clone();
        let mut visited = BTreeSet::from([id.to_owned()]);

        while let Some(parent_id) = world.parent().map(str::to_owned) {
            if !visited.insert(parent_id.clone()) {
                return Err(ScenarioError::ParentCycle { id: id.to_owned() });
            }
            let parent = self
                .transforms
                .get(&parent_id)
                .ok_or_else(|| ScenarioError::UnknownParent {
                    id: id.to_owned(),
                    parent: parent_id.clone(),
                })?;
            world = world.compose_with(parent);
        }
        // An empty parent string is normalized away once resolved.
        world.parent_id = None;
        Ok(world)
    }

    /// World-space origin of an element.
    pub fn element_location(&self, id: &str) -> Result<Vector3D> {
        self.world_transform(id).map(|world| world.origin)
    }

    pub fn entity_configuration(&self, id: &str) -> Result<&str> {
        self.entities
            .get(id)
            .map(|entity| entity.configuration.as_str())
            .ok_or_else(|| ScenarioError::not_found(id))
    }

    pub fn set_entity_configuration(&mut self, id: &str, configuration: String) -> Result<()> {
        let entity = self
            .entities
            .get_mut(id)
            .ok_or_else(|| ScenarioError::not_found(id))?;
        entity.configuration = configuration;
        Ok(())
    }

    // ========================================================================
    // Validation helpers
    // ========================================================================

    fn insert_entity(&mut self, entity: EntityData) -> Result<()> {
        Self::check_identifier(&entity.identifier)?;
        if self.entities.contains_key(&entity.identifier) {
            return Err(ScenarioError::DuplicateIdentifier {
                id: entity.identifier,
            });
        }
        self.entities.insert(entity.identifier.clone(), entity);
        Ok(())
    }

    fn check_identifier(id: &str) -> Result<()> {
        if id.is_empty() {
            Err(ScenarioError::EmptyIdentifier)
        } else {
            Ok(())
        }
    }

    fn check_transform(&self, id: &str, transform: &LocalTransformData) -> Result<()> {
        if !transform.is_finite() {
            return Err(ScenarioError::NonFiniteTransform { id: id.to_owned() });
        }
        self.check_parent(id, transform.parent())
    }

    /// The parent must be an element and walking up from it must never reach
    /// `id`.
    fn check_parent(&self, id: &str, parent: Option<&str>) -> Result<()> {
        let mut current = parent;
        let mut steps = 0;
        while let Some(parent_id) = current {
            if parent_id == id || steps > self.transforms.len() {
                return Err(ScenarioError::ParentCycle { id: id.to_owned() });
            }
            let parent_transform =
                self.transforms
                    .get(parent_id)
                    .ok_or_else(|| ScenarioError::UnknownParent {
                        id: id.to_owned(),
                        parent: parent_id.to_owned(),
                    })?;
            current = parent_transform.parent();
            steps += 1;
        }
        Ok(())
    }

    fn missing_element(&self, id: &str) -> ScenarioError {
        if self.entities.contains_key(id) {
            ScenarioError::NotAnElement { id: id.to_owned() }
        } else {
            ScenarioError::not_found(id)
        }
    }
}
