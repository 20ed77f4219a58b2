//! Entity and element records.
//!
//! An entity is identified by a non-empty `identifier` that acts as the join
//! key across the whole model. An element is an entity with a spatial
//! transform. Assets are only referenced; nothing here resolves them.
mod asset;
mod property;

pub use asset::{AssetData, AssetSourceType};
pub use property::{PropertyData, RelationshipData};

use crate::geometry::LocalTransformData;

/// Identity record of a scenario entity.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EntityData {
    pub class_name: String,
    pub identifier: String,
    pub entity_type: String,
    pub category: String,
    pub description: String,
    /// Opaque configuration blob owned by the host.
    pub configuration: String,
    pub asset: AssetData,
}

impl EntityData {
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            ..Self::default()
        }
    }

    pub fn with_type(mut self, entity_type: impl Into<String>) -> Self {
        self.entity_type = entity_type.into();
        self
    }

    pub fn with_class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = class_name.into();
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_asset(mut self, asset: AssetData) -> Self {
        self.asset = asset;
        self
    }
}

/// Entity positioned in space.
///
/// The scenario holds the authoritative `local_transform`; a scene keeps a
/// shadow copy synchronized through the runtime context.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ElementData {
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub entity: EntityData,
    #[cfg_attr(feature = "serde", serde(default))]
    pub local_transform: LocalTransformData,
}

impl ElementData {
    pub fn new(entity: EntityData, local_transform: LocalTransformData) -> Self {
        Self {
            entity,
            local_transform,
        }
    }

    pub fn identifier(&self) -> &str {
        &self.entity.identifier
    }
}
