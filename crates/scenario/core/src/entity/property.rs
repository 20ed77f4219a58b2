/// Generic `(key, value)` pair describing entity state.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PropertyData {
    pub property_id: String,
    pub property_value: String,
}

impl PropertyData {
    pub fn new(property_id: impl Into<String>, property_value: impl Into<String>) -> Self {
        Self {
            property_id: property_id.into(),
            property_value: property_value.into(),
        }
    }
}

/// Directed link from an entity to another entity.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RelationshipData {
    pub relationship_id: String,
    pub related_entity_id: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub related_end_point: String,
}

impl RelationshipData {
    pub fn new(
        relationship_id: impl Into<String>,
        related_entity_id: impl Into<String>,
        related_end_point: impl Into<String>,
    ) -> Self {
        Self {
            relationship_id: relationship_id.into(),
            related_entity_id: related_entity_id.into(),
            related_end_point: related_end_point.into(),
        }
    }
}
