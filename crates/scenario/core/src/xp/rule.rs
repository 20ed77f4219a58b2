//! Action rules of a digital system.
//!
//! A rule declares typed parameters, preconditions that must hold for an
//! action to be available, and effects applied when it is taken. Strings of
//! the form `$name` inside conditions and effects are replaced by the value
//! bound to parameter `name`.

use std::collections::BTreeSet;

use super::{EntityCondition, SystemState};
use crate::entity::RelationshipData;

/// Prefix that marks a parameter placeholder.
pub const PLACEHOLDER_PREFIX: char = '$';

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParameterSpec {
    pub name: String,
    pub kind: ParameterKind,
}

/// What a parameter may be bound to.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ParameterKind {
    /// Any entity, or only entities of the given type.
    Entity {
        #[cfg_attr(feature = "serde", serde(default))]
        entity_type: Option<String>,
    },
    /// One of an enumerated set of literal values.
    Value { values: Vec<String> },
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Precondition {
    Property(EntityCondition),
    NotProperty(EntityCondition),
    Relationship {
        entity_id: String,
        relationship_id: String,
        related_entity_id: String,
    },
    NoRelationship {
        entity_id: String,
        relationship_id: String,
        related_entity_id: String,
    },
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Effect {
    SetProperty {
        entity_id: String,
        property_id: String,
        property_value: String,
    },
    AddRelationship {
        entity_id: String,
        relationship_id: String,
        related_entity_id: String,
        #[cfg_attr(feature = "serde", serde(default))]
        related_end_point: String,
    },
    RemoveRelationship {
        entity_id: String,
        relationship_id: String,
        related_entity_id: String,
    },
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionRule {
    pub action_id: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub parameters: Vec<ParameterSpec>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub preconditions: Vec<Precondition>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub effects: Vec<Effect>,
}

/// Parameter names paired with the values bound to them.
pub(crate) struct Bindings<'a> {
    specs: &'a [ParameterSpec],
    params: &'a [String],
}

impl<'a> Bindings<'a> {
    pub(crate) fn new(specs: &'a [ParameterSpec], params: &'a [String]) -> Self {
        Self { specs, params }
    }

    /// Replaces a `$name` placeholder with its bound value. Anything else is
    /// returned unchanged.
    pub(crate) fn resolve<'s>(&self, text: &'s str) -> &'s str
    where
        'a: 's,
    {
        let Some(name) = text.strip_prefix(PLACEHOLDER_PREFIX) else {
            return text;
        };
        self.specs
            .iter()
            .position(|spec| spec.name == name)
            .and_then(|index| self.params.get(index))
            .map_or(text, String::as_str)
    }

    fn condition(&self, condition: &EntityCondition) -> EntityCondition {
        EntityCondition::new(
            self.resolve(&condition.entity_id),
            self.resolve(&condition.property_id),
            self.resolve(&condition.property_value),
        )
    }
}

impl ActionRule {
    /// Whether every precondition holds under the given parameter values.
    pub fn preconditions_hold(&self, params: &[String], state: &SystemState) -> bool {
        let bindings = Bindings::new(&self.parameters, params);
        self.preconditions.iter().all(|precondition| match precondition {
            Precondition::Property(condition) => bindings.condition(condition).evaluate(state),
            Precondition::NotProperty(condition) => !bindings.condition(condition).evaluate(state),
            Precondition::Relationship {
                entity_id,
                relationship_id,
                related_entity_id,
            } => state.has_relationship(
                bindings.resolve(entity_id),
                bindings.resolve(relationship_id),
                bindings.resolve(related_entity_id),
            ),
            Precondition::NoRelationship {
                entity_id,
                relationship_id,
                related_entity_id,
            } => !state.has_relationship(
                bindings.resolve(entity_id),
                bindings.resolve(relationship_id),
                bindings.resolve(related_entity_id),
            ),
        })
    }

    /// Applies the effects and returns the identifiers of entities whose
    /// properties or relationships actually changed.
    pub fn apply(&self, params: &[String], state: &mut SystemState) -> BTreeSet<String> {
        let bindings = Bindings::new(&self.parameters, params);
        let mut changed = BTreeSet::new();

        for effect in &self.effects {
            let (entity, modified) = match effect {
                Effect::SetProperty {
                    entity_id,
                    property_id,
                    property_value,
                } => {
                    let entity = bindings.resolve(entity_id);
                    let modified = state.set_property(
                        entity,
                        bindings.resolve(property_id),
                        bindings.resolve(property_value),
                    );
                    (entity, modified)
                }
                Effect::AddRelationship {
                    entity_id,
                    relationship_id,
                    related_entity_id,
                    related_end_point,
                } => {
                    let entity = bindings.resolve(entity_id);
                    let link = RelationshipData::new(
                        bindings.resolve(relationship_id),
                        bindings.resolve(related_entity_id),
                        bindings.resolve(related_end_point),
                    );
                    (entity, state.add_relationship(entity, link))
                }
                Effect::RemoveRelationship {
                    entity_id,
                    relationship_id,
                    related_entity_id,
                } => {
                    let entity = bindings.resolve(entity_id);
                    let modified = state.remove_relationship(
                        entity,
                        bindings.resolve(relationship_id),
                        bindings.resolve(related_entity_id),
                    );
                    (entity, modified)
                }
            };
            if modified {
                changed.insert(entity.to_owned());
            }
        }
        changed
    }

    /// Every string in conditions and effects, for placeholder validation.
    pub(crate) fn referenced_strings(&self) -> Vec<&str> {
        let mut out = Vec::new();
        for precondition in &self.preconditions {
            match precondition {
                Precondition::Property(c) | Precondition::NotProperty(c) => {
                    out.extend([
                        c.entity_id.as_str(),
                        c.property_id.as_str(),
                        c.property_value.as_str(),
                    ]);
                }
                Precondition::Relationship {
                    entity_id,
                    relationship_id,
                    related_entity_id,
                }
                | Precondition::NoRelationship {
                    entity_id,
                    relationship_id,
                    related_entity_id,
                } => out.extend([
                    entity_id.as_str(),
                    relationship_id.as_str(),
                    related_entity_id.as_str(),
                ]),
            }
        }
        for effect in &self.effects {
            match effect {
                Effect::SetProperty {
                    entity_id,
                    property_id,
                    property_value,
                } => out.extend([
                    entity_id.as_str(),
                    property_id.as_str(),
                    property_value.as_str(),
                ]),
                Effect::AddRelationship {
                    entity_id,
                    relationship_id,
                    related_entity_id,
                    related_end_point,
                } => out.extend([
                    entity_id.as_str(),
                    relationship_id.as_str(),
                    related_entity_id.as_str(),
                    related_end_point.as_str(),
                ]),
                Effect::RemoveRelationship {
                    entity_id,
                    relationship_id,
                    related_entity_id,
                } => out.extend([
                    entity_id.as_str(),
                    relationship_id.as_str(),
                    related_entity_id.as_str(),
                ]),
            }
        }
        out
    }
}
