//! Persisted document shapes.
//!
//! Every document carries a `version`; readers reject versions newer than
//! [`DOCUMENT_VERSION`] and accept older ones.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use discen_core::{ElementData, EntityData, Goal, ScenarioError, ScenarioState, Timeline};

use super::{RepositoryError, Result};

/// Current version written by this crate.
pub const DOCUMENT_VERSION: u32 = 1;

fn check_version(found: u32) -> Result<()> {
    if found > DOCUMENT_VERSION {
        Err(RepositoryError::UnsupportedVersion {
            found,
            supported: DOCUMENT_VERSION,
        })
    } else {
        Ok(())
    }
}

/// Entities and elements of a scenario.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScenarioDocument {
    pub version: u32,
    #[serde(default)]
    pub entities: Vec<EntityData>,
    #[serde(default)]
    pub elements: Vec<ElementData>,
}

impl ScenarioDocument {
    pub fn from_state(state: &ScenarioState) -> Self {
        let (entities, elements) = state.clone().into_parts();
        Self {
            version: DOCUMENT_VERSION,
            entities,
            elements,
        }
    }

    pub fn check_version(&self) -> Result<()> {
        check_version(self.version)
    }

    /// Rebuilds the scenario, validating identifiers and parents.
    pub fn into_state(self) -> std::result::Result<ScenarioState, ScenarioError> {
        ScenarioState::from_parts(self.entities, self.elements)
    }
}

/// One goal with its success conditions and recorded experience.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExperienceDocument {
    pub version: u32,
    pub experience: Goal,
}

impl ExperienceDocument {
    pub fn new(goal: Goal) -> Self {
        Self {
            version: DOCUMENT_VERSION,
            experience: goal,
        }
    }

    pub fn check_version(&self) -> Result<()> {
        check_version(self.version)
    }
}

/// Simulation timeline with an optional wall-clock start.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimulationDocument {
    pub version: u32,
    #[serde(default)]
    pub start_time: Option<NaiveDateTime>,
    pub timeline: Timeline,
}

impl SimulationDocument {
    pub fn new(timeline: Timeline, start_time: Option<NaiveDateTime>) -> Self {
        Self {
            version: DOCUMENT_VERSION,
            start_time,
            timeline,
        }
    }

    pub fn check_version(&self) -> Result<()> {
        check_version(self.version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{from_json_str, to_json_string};
    use discen_core::{AssetData, AssetSourceType, LocalTransformData, Vector3D};

    #[test]
    fn test_scenario_document_json_shape() {
        let mut state = ScenarioState::new();
        state
            .add_element(ElementData::new(
                EntityData::new("robot")
                    .with_type("Robot")
                    .with_asset(AssetData::new(AssetSourceType::Project, "robots/arm.glb")),
                LocalTransformData::identity().with_origin(Vector3D::new(1.0, 2.0, 3.0)),
            ))
            .unwrap();

        let json = to_json_string(&ScenarioDocument::from_state(&state)).unwrap();
        assert!(json.contains("\"identifier\": \"robot\""));
        assert!(json.contains("\"local_transform\""));

        let doc: ScenarioDocument = from_json_str(&json).unwrap();
        assert_eq!(doc.into_state().unwrap(), state);
    }

    #[test]
    fn test_newer_version_rejected() {
        let doc = ScenarioDocument {
            version: DOCUMENT_VERSION + 1,
            entities: Vec::new(),
            elements: Vec::new(),
        };
        assert!(matches!(
            doc.check_version(),
            Err(RepositoryError::UnsupportedVersion { .. })
        ));
    }
}
