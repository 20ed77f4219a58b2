//! Scenario data model and deterministic engines of the Digital Scenario
//! Framework.
//!
//! `discen-core` defines the canonical types (vectors, transforms, entities,
//! elements), the authoritative [`scenario::ScenarioState`], the experience
//! engine [`xp::XpEngine`] and simulation timelines. It performs no I/O and
//! invokes no callbacks; the runtime crate wires these pieces to hosts.
pub mod entity;
pub mod error;
pub mod geometry;
pub mod scenario;
pub mod simulation;
pub mod xp;

pub use entity::{AssetData, AssetSourceType, ElementData, EntityData, PropertyData, RelationshipData};
pub use error::{ErrorSeverity, FrameworkError};
pub use geometry::{LocalTransformData, Vector3D};
pub use scenario::{ScenarioError, ScenarioState};
pub use simulation::{Keyframe, PlaybackClock, PlaybackState, Timeline, TimelineError, TrackSample};
pub use xp::{
    ActionData, ActionResult, ActionRule, DigitalSystem, EntityCondition, Experience, Goal,
    StateKey, XpConfig, XpEngine, XpError,
};
