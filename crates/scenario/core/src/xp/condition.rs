use core::fmt;

use super::SystemState;

/// Predicate over a property of one entity, or of the entity population when
/// `entity_id` is one of the wildcard tokens.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntityCondition {
    pub entity_id: String,
    pub property_id: String,
    pub property_value: String,
}

impl EntityCondition {
    /// Matches when at least one entity has the property at the value.
    pub const ANY_ENTITY: &'static str = "___ANY_ENTITY___";
    /// Matches when every entity that has the property has the value, and at
    /// least one entity has it.
    pub const ALL_ENTITIES: &'static str = "___ALL_ENTITIES___";

    pub fn new(
        entity_id: impl Into<String>,
        property_id: impl Into<String>,
        property_value: impl Into<String>,
    ) -> Self {
        Self {
            entity_id: entity_id.into(),
            property_id: property_id.into(),
            property_value: property_value.into(),
        }
    }

    pub fn any(property_id: impl Into<String>, property_value: impl Into<String>) -> Self {
        Self::new(Self::ANY_ENTITY, property_id, property_value)
    }

    pub fn all(property_id: impl Into<String>, property_value: impl Into<String>) -> Self {
        Self::new(Self::ALL_ENTITIES, property_id, property_value)
    }

    pub fn is_wildcard(&self) -> bool {
        self.entity_id == Self::ANY_ENTITY || self.entity_id == Self::ALL_ENTITIES
    }

    pub fn evaluate(&self, state: &SystemState) -> bool {
        let value = self.property_value.as_str();
        match self.entity_id.as_str() {
            Self::ANY_ENTITY => state
                .holders(&self.property_id)
                .any(|(_, current)| current == value),
            Self::ALL_ENTITIES => {
                let mut holders = state.holders(&self.property_id).peekable();
                holders.peek().is_some() && holders.all(|(_, current)| current == value)
            }
            id => state.property(id, &self.property_id) == Some(value),
        }
    }
}

impl fmt::Display for EntityCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{} == {}",
            self.entity_id, self.property_id, self.property_value
        )
    }
}

/// Conjunction of conditions. An empty set is never satisfied.
pub fn all_hold(conditions: &[EntityCondition], state: &SystemState) -> bool {
    !conditions.is_empty() && conditions.iter().all(|condition| condition.evaluate(state))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lamps(values: &[(&str, &str)]) -> SystemState {
        let mut state = SystemState::new();
        for (id, value) in values {
            state.set_property(id, "power", value);
        }
        state.insert_entity("switch");
        state
    }

    #[test]
    fn literal_entity_condition() {
        let state = lamps(&[("lamp1", "on"), ("lamp2", "off")]);
        assert!(EntityCondition::new("lamp1", "power", "on").evaluate(&state));
        assert!(!EntityCondition::new("lamp2", "power", "on").evaluate(&state));
        assert!(!EntityCondition::new("switch", "power", "on").evaluate(&state));
    }

    #[test]
    fn wildcards_quantify_over_holders() {
        let mixed = lamps(&[("lamp1", "on"), ("lamp2", "off")]);
        assert!(EntityCondition::any("power", "on").evaluate(&mixed));
        assert!(!EntityCondition::all("power", "on").evaluate(&mixed));

        // Entities without the property do not falsify ALL.
        let lit = lamps(&[("lamp1", "on"), ("lamp2", "on")]);
        assert!(EntityCondition::all("power", "on").evaluate(&lit));

        let none = lamps(&[]);
        assert!(!EntityCondition::all("power", "on").evaluate(&none));
        assert!(!EntityCondition::any("power", "on").evaluate(&none));
    }

    #[test]
    fn empty_conjunction_is_not_satisfied() {
        let state = lamps(&[("lamp1", "on")]);
        assert!(!all_hold(&[], &state));
        assert!(all_hold(&[EntityCondition::any("power", "on")], &state));
    }
}
