//! Digital system loader.

use std::path::Path;

use discen_core::DigitalSystem;

use crate::loaders::{LoadResult, load_structured};

/// Loader for digital system descriptions (RON or JSON).
///
/// # Example
///
/// ```ron
/// (
///     name: "corridor",
///     entity_types: {
///         "Door": (properties: { "state": ["open", "closed"] }),
///     },
///     entities: [
///         (id: "door", entity_type: "Door", properties: { "state": "closed" }),
///     ],
///     actions: [
///         (
///             action_id: "open",
///             parameters: [(name: "door", kind: Entity(entity_type: Some("Door")))],
///             preconditions: [Property((entity_id: "$door", property_id: "state", property_value: "closed"))],
///             effects: [SetProperty(entity_id: "$door", property_id: "state", property_value: "open")],
///         ),
///     ],
/// )
/// ```
pub struct SystemLoader;

impl SystemLoader {
    /// Loads and validates a system description.
    pub fn load(path: &Path) -> LoadResult<DigitalSystem> {
        let system: DigitalSystem = load_structured(path)?;
        system
            .validate()
            .map_err(|e| anyhow::anyhow!("Invalid digital system {}: {}", path.display(), e))?;
        Ok(system)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const LAMP_RON: &str = r#"(
        name: "lamps",
        entity_types: { "Lamp": (properties: { "power": ["on", "off"] }) },
        entities: [(id: "lamp", entity_type: "Lamp", properties: { "power": "off" })],
        actions: [(
            action_id: "switch_on",
            parameters: [(name: "lamp", kind: Entity(entity_type: Some("Lamp")))],
            preconditions: [Property((entity_id: "$lamp", property_id: "power", property_value: "off"))],
            effects: [SetProperty(entity_id: "$lamp", property_id: "power", property_value: "on")],
        )],
    )"#;

    #[test]
    fn test_load_ron_system() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("lamps.ron");
        fs::write(&path, LAMP_RON).unwrap();

        let system = SystemLoader::load(&path).unwrap();
        assert_eq!(system.name, "lamps");
        assert_eq!(system.actions.len(), 1);
    }

    #[test]
    fn test_invalid_system_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("broken.json");
        fs::write(
            &path,
            r#"{"entities":[{"id":"lamp","entity_type":"Missing"}]}"#,
        )
        .unwrap();
        assert!(SystemLoader::load(&path).is_err());
    }

    #[test]
    fn test_unknown_extension_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("lamps.yaml");
        fs::write(&path, LAMP_RON).unwrap();
        assert!(SystemLoader::load(&path).is_err());
    }
}
