//! Digital system description: entity types, entities and action rules.

use std::collections::{BTreeMap, BTreeSet};

use super::rule::{PLACEHOLDER_PREFIX, ParameterKind};
use super::{ActionData, ActionRule, SystemState, XpError};
use crate::entity::RelationshipData;

/// Possible properties of an entity type and, per property, its possible
/// values. An empty value list accepts any value.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EntityTypeSchema {
    pub properties: BTreeMap<String, Vec<String>>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SystemEntity {
    pub id: String,
    pub entity_type: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub properties: BTreeMap<String, String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub relationships: Vec<RelationshipData>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub configuration: String,
}

/// Description the experience engine runs over.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DigitalSystem {
    pub name: String,
    pub entity_types: BTreeMap<String, EntityTypeSchema>,
    pub entities: Vec<SystemEntity>,
    pub actions: Vec<ActionRule>,
}

impl DigitalSystem {
    /// Checks identifiers, schema conformance of initial values and that every
    /// placeholder names a declared parameter.
    pub fn validate(&self) -> Result<(), XpError> {
        let mut ids = BTreeSet::new();
        for entity in &self.entities {
            if entity.id.is_empty() {
                return Err(XpError::invalid("entity with empty id"));
            }
            if !ids.insert(entity.id.as_str()) {
                return Err(XpError::invalid(format!("duplicate entity '{}'", entity.id)));
            }
            let schema = self.schema(&entity.entity_type)?;
            for (property, value) in &entity.properties {
                let values = schema.properties.get(property).ok_or_else(|| {
                    XpError::UnknownProperty {
                        entity_type: entity.entity_type.clone(),
                        property: property.clone(),
                    }
                })?;
                if !values.is_empty() && !values.contains(value) {
                    return Err(XpError::invalid(format!(
                        "value '{value}' not allowed for {}.{property}",
                        entity.id
                    )));
                }
            }
        }
        for entity in &self.entities {
            for link in &entity.relationships {
                if !ids.contains(link.related_entity_id.as_str()) {
                    return Err(XpError::invalid(format!(
                        "relationship '{}' of '{}' targets unknown entity '{}'",
                        link.relationship_id, entity.id, link.related_entity_id
                    )));
                }
            }
        }

        let mut action_ids = BTreeSet::new();
        for rule in &self.actions {
            if rule.action_id.is_empty() {
                return Err(XpError::invalid("action with empty id"));
            }
            if !action_ids.insert(rule.action_id.as_str()) {
                return Err(XpError::invalid(format!(
                    "duplicate action '{}'",
                    rule.action_id
                )));
            }
            let mut names = BTreeSet::new();
            for spec in &rule.parameters {
                if spec.name.is_empty() || !names.insert(spec.name.as_str()) {
                    return Err(XpError::invalid(format!(
                        "action '{}' has an empty or repeated parameter name",
                        rule.action_id
                    )));
                }
                match &spec.kind {
                    ParameterKind::Entity {
                        entity_type: Some(entity_type),
                    } => {
                        self.schema(entity_type)?;
                    }
                    ParameterKind::Entity { entity_type: None } => {}
                    ParameterKind::Value { values } if values.is_empty() => {
                        return Err(XpError::invalid(format!(
                            "parameter '{}' of action '{}' has no values",
                            spec.name, rule.action_id
                        )));
                    }
                    ParameterKind::Value { .. } => {}
                }
            }
            for text in rule.referenced_strings() {
                if let Some(name) = text.strip_prefix(PLACEHOLDER_PREFIX)
                    && !names.contains(name)
                {
                    return Err(XpError::invalid(format!(
                        "action '{}' refers to undeclared parameter '{text}'",
                        rule.action_id
                    )));
                }
            }
        }
        Ok(())
    }

    pub fn schema(&self, entity_type: &str) -> Result<&EntityTypeSchema, XpError> {
        self.entity_types
            .get(entity_type)
            .ok_or_else(|| XpError::UnknownEntityType {
                entity_type: entity_type.to_owned(),
            })
    }

    pub fn entity(&self, id: &str) -> Option<&SystemEntity> {
        self.entities.iter().find(|entity| entity.id == id)
    }

    pub fn rule(&self, action_id: &str) -> Option<&ActionRule> {
        self.actions.iter().find(|rule| rule.action_id == action_id)
    }

    /// State every episode starts from.
    pub fn initial_state(&self) -> SystemState {
        let mut state = SystemState::new();
        for entity in &self.entities {
            state.insert_entity(&entity.id);
            for (property, value) in &entity.properties {
                state.set_property(&entity.id, property, value);
            }
            for link in &entity.relationships {
                state.add_relationship(&entity.id, link.clone());
            }
        }
        state
    }

    /// Values a parameter may be bound to, in declaration order.
    pub fn candidates<'a>(&'a self, kind: &'a ParameterKind) -> Vec<&'a str> {
        match kind {
            ParameterKind::Entity { entity_type } => self
                .entities
                .iter()
                .filter(|entity| {
                    entity_type
                        .as_deref()
                        .is_none_or(|wanted| entity.entity_type == wanted)
                })
                .map(|entity| entity.id.as_str())
                .collect(),
            ParameterKind::Value { values } => values.iter().map(String::as_str).collect(),
        }
    }

    /// Whether `action` binds valid parameters and its preconditions hold.
    pub fn is_available(&self, action: &ActionData, state: &SystemState) -> bool {
        let Some(rule) = self.rule(&action.action_id) else {
            return false;
        };
        rule.parameters.len() == action.params.len()
            && rule
                .parameters
                .iter()
                .zip(&action.params)
                .all(|(spec, param)| self.candidates(&spec.kind).contains(&param.as_str()))
            && rule.preconditions_hold(&action.params, state)
    }

    /// Every bound action whose preconditions hold, in rule then binding
    /// order.
    pub fn available_actions(&self, state: &SystemState) -> Vec<ActionData> {
        let mut out = Vec::new();
        for rule in &self.actions {
            let domains: Vec<Vec<&str>> = rule
                .parameters
                .iter()
                .map(|spec| self.candidates(&spec.kind))
                .collect();
            for params in cartesian(&domains) {
                if rule.preconditions_hold(&params, state) {
                    out.push(ActionData {
                        action_id: rule.action_id.clone(),
                        params,
                    });
                }
            }
        }
        out
    }
}

/// All combinations picking one value from each domain. No domains yield a
/// single empty combination.
fn cartesian(domains: &[Vec<&str>]) -> Vec<Vec<String>> {
    domains.iter().fold(vec![Vec::new()], |acc, domain| {
        acc.iter()
            .flat_map(|prefix| {
                domain.iter().map(move |value| {
                    let mut next = prefix.clone();
                    next.push((*value).to_owned());
                    next
                })
            })
            .collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xp::{Effect, EntityCondition, ParameterSpec, Precondition};

    fn lamp_system() -> DigitalSystem {
        let mut entity_types = BTreeMap::new();
        entity_types.insert(
            "Lamp".to_owned(),
            EntityTypeSchema {
                properties: BTreeMap::from([(
                    "power".to_owned(),
                    vec!["on".to_owned(), "off".to_owned()],
                )]),
            },
        );
        let lamp = |id: &str| SystemEntity {
            id: id.into(),
            entity_type: "Lamp".into(),
            properties: BTreeMap::from([("power".to_owned(), "off".to_owned())]),
            ..SystemEntity::default()
        };
        DigitalSystem {
            name: "lamps".into(),
            entity_types,
            entities: vec![lamp("lamp1"), lamp("lamp2")],
            actions: vec![ActionRule {
                action_id: "set_power".into(),
                parameters: vec![
                    ParameterSpec {
                        name: "lamp".into(),
                        kind: ParameterKind::Entity {
                            entity_type: Some("Lamp".into()),
                        },
                    },
                    ParameterSpec {
                        name: "value".into(),
                        kind: ParameterKind::Value {
                            values: vec!["on".into(), "off".into()],
                        },
                    },
                ],
                preconditions: vec![Precondition::NotProperty(EntityCondition::new(
                    "$lamp", "power", "$value",
                ))],
                effects: vec![Effect::SetProperty {
                    entity_id: "$lamp".into(),
                    property_id: "power".into(),
                    property_value: "$value".into(),
                }],
            }],
        }
    }

    #[test]
    fn valid_system_passes() {
        assert_eq!(lamp_system().validate(), Ok(()));
    }

    #[test]
    fn undeclared_placeholder_is_rejected() {
        let mut system = lamp_system();
        system.actions[0].effects.push(Effect::SetProperty {
            entity_id: "$ghost".into(),
            property_id: "power".into(),
            property_value: "on".into(),
        });
        assert!(matches!(
            system.validate(),
            Err(XpError::InvalidSystem { .. })
        ));
    }

    #[test]
    fn disallowed_initial_value_is_rejected() {
        let mut system = lamp_system();
        system.entities[0]
            .properties
            .insert("power".into(), "dim".into());
        assert!(system.validate().is_err());
    }

    #[test]
    fn available_actions_enumerate_bindings() {
        let system = lamp_system();
        let state = system.initial_state();
        let available = system.available_actions(&state);
        assert_eq!(
            available,
            vec![
                ActionData::new("set_power", ["lamp1", "on"]),
                ActionData::new("set_power", ["lamp2", "on"]),
            ]
        );
        assert!(system.is_available(&available[0], &state));
        assert!(!system.is_available(&ActionData::new("set_power", ["lamp1", "off"]), &state));
        assert!(!system.is_available(&ActionData::new("set_power", ["lamp9", "on"]), &state));
        assert!(!system.is_available(&ActionData::new("set_power", ["lamp1"]), &state));
    }

    #[test]
    fn candidates_cover_entities_and_literals() {
        let system = lamp_system();
        let lamps = ParameterKind::Entity {
            entity_type: Some("Lamp".into()),
        };
        assert_eq!(system.candidates(&lamps), vec!["lamp1", "lamp2"]);

        let literals = ParameterKind::Value {
            values: vec!["dim".into(), "bright".into()],
        };
        assert_eq!(system.candidates(&literals), vec!["dim", "bright"]);
    }
}
