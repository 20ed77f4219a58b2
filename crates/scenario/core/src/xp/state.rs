use core::fmt;
use std::collections::{BTreeMap, BTreeSet};

use sha2::{Digest, Sha256};

use crate::entity::{PropertyData, RelationshipData};

/// SHA-256 fingerprint of a [`SystemState`].
///
/// Two states share a key exactly when every entity carries the same
/// properties and relationships.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateKey([u8; 32]);

impl StateKey {
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    pub fn from_hex(text: &str) -> Result<Self, hex::FromHexError> {
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(text, &mut bytes)?;
        Ok(Self(bytes))
    }
}

impl fmt::Display for StateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for StateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Eight hex digits are enough to tell states apart in logs.
        write!(f, "StateKey({})", &self.to_hex()[..8])
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for StateKey {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for StateKey {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = <String as serde::Deserialize>::deserialize(deserializer)?;
        Self::from_hex(&text).map_err(serde::de::Error::custom)
    }
}

/// Property and relationship values of every entity of a digital system.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SystemState {
    properties: BTreeMap<String, BTreeMap<String, String>>,
    relationships: BTreeMap<String, BTreeSet<RelationshipData>>,
}

impl SystemState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an entity with no properties. Existing values are kept.
    pub fn insert_entity(&mut self, id: &str) {
        self.properties.entry(id.to_owned()).or_default();
        self.relationships.entry(id.to_owned()).or_default();
    }

    pub fn contains(&self, id: &str) -> bool {
        self.properties.contains_key(id)
    }

    pub fn entity_ids(&self) -> impl Iterator<Item = &str> {
        self.properties.keys().map(String::as_str)
    }

    pub fn property(&self, id: &str, property: &str) -> Option<&str> {
        self.properties
            .get(id)
            .and_then(|props| props.get(property))
            .map(String::as_str)
    }

    pub fn properties(&self, id: &str) -> Option<Vec<PropertyData>> {
        self.properties.get(id).map(|props| {
            props
                .iter()
                .map(|(key, value)| PropertyData::new(key.as_str(), value.as_str()))
                .collect()
        })
    }

    /// Entities that currently carry `property`, with its value.
    pub fn holders<'a>(&'a self, property: &'a str) -> impl Iterator<Item = (&'a str, &'a str)> {
        self.properties.iter().filter_map(move |(id, props)| {
            props
                .get(property)
                .map(|value| (id.as_str(), value.as_str()))
        })
    }

    /// Sets a property value; returns whether the value changed.
    pub fn set_property(&mut self, id: &str, property: &str, value: &str) -> bool {
        let props = self.properties.entry(id.to_owned()).or_default();
        match props.get(property) {
            Some(current) if current == value => false,
            _ => {
                props.insert(property.to_owned(), value.to_owned());
                true
            }
        }
    }

    pub fn relationships(&self, id: &str) -> Option<Vec<RelationshipData>> {
        self.relationships
            .get(id)
            .map(|links| links.iter().cloned().collect())
    }

    /// Whether `id` has a `relationship_id` link to `related`; an empty
    /// `related` matches any target.
    pub fn has_relationship(&self, id: &str, relationship_id: &str, related: &str) -> bool {
        self.relationships.get(id).is_some_and(|links| {
            links.iter().any(|link| {
                link.relationship_id == relationship_id
                    && (related.is_empty() || link.related_entity_id == related)
            })
        })
    }

    /// Returns whether the link was new.
    pub fn add_relationship(&mut self, id: &str, link: RelationshipData) -> bool {
        self.relationships.entry(id.to_owned()).or_default().insert(link)
    }

    /// Removes every `relationship_id` link to `related`; returns whether
    /// anything was removed.
    pub fn remove_relationship(&mut self, id: &str, relationship_id: &str, related: &str) -> bool {
        let Some(links) = self.relationships.get_mut(id) else {
            return false;
        };
        let before = links.len();
        links.retain(|link| {
            !(link.relationship_id == relationship_id && link.related_entity_id == related)
        });
        links.len() != before
    }

    /// Deterministic fingerprint over the sorted property and relationship
    /// maps. Every field is length-prefixed so concatenations cannot collide.
    pub fn fingerprint(&self) -> StateKey {
        let mut hasher = Sha256::new();
        let empty = BTreeSet::new();

        hasher.update((self.properties.len() as u64).to_le_bytes());
        for (id, props) in &self.properties {
            hash_field(&mut hasher, id);

            hasher.update((props.len() as u64).to_le_bytes());
            for (key, value) in props {
                hash_field(&mut hasher, key);
                hash_field(&mut hasher, value);
            }

            let links = self.relationships.get(id).unwrap_or(&empty);
            hasher.update((links.len() as u64).to_le_bytes());
            for link in links {
                hash_field(&mut hasher, &link.relationship_id);
                hash_field(&mut hasher, &link.related_entity_id);
                hash_field(&mut hasher, &link.related_end_point);
            }
        }

        StateKey(hasher.finalize().into())
    }
}

fn hash_field(hasher: &mut Sha256, field: &str) {
    hasher.update((field.len() as u64).to_le_bytes());
    hasher.update(field.as_bytes());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn door_state(open: &str) -> SystemState {
        let mut state = SystemState::new();
        state.insert_entity("door");
        state.set_property("door", "state", open);
        state
    }

    #[test]
    fn fingerprint_tracks_values_not_history() {
        let closed = door_state("closed");
        let mut toggled = door_state("closed");
        toggled.set_property("door", "state", "open");
        assert_ne!(closed.fingerprint(), toggled.fingerprint());

        toggled.set_property("door", "state", "closed");
        assert_eq!(closed.fingerprint(), toggled.fingerprint());
    }

    #[test]
    fn fingerprint_separates_field_boundaries() {
        let mut a = SystemState::new();
        a.set_property("ab", "c", "x");
        let mut b = SystemState::new();
        b.set_property("a", "bc", "x");
        assert_ne!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn relationships_are_part_of_the_state() {
        let mut state = door_state("closed");
        let before = state.fingerprint();
        assert!(state.add_relationship("door", RelationshipData::new("in", "room", "")));
        assert!(state.has_relationship("door", "in", ""));
        assert_ne!(before, state.fingerprint());

        assert!(state.remove_relationship("door", "in", "room"));
        assert_eq!(before, state.fingerprint());
    }

    #[test]
    fn state_key_hex_round_trip() {
        let key = door_state("open").fingerprint();
        assert_eq!(StateKey::from_hex(&key.to_hex()).unwrap(), key);
        assert!(StateKey::from_hex("zz").is_err());
    }
}
