//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from the scenario store, the experience engine, timelines,
//! repositories and content loaders so hosts can bubble them up with a
//! consistent severity.

use thiserror::Error;

use discen_core::{ErrorSeverity, FrameworkError, ScenarioError, TimelineError, XpError};

pub use crate::repository::RepositoryError;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("context is not initialized")]
    NotInitialized,

    #[error("simulation is not initialized")]
    SimulationNotInitialized,

    #[error("no {callback} listener registered")]
    NoListener { callback: &'static str },

    #[error("lerp trim {trim} is outside [0, 1]")]
    InvalidTrim { trim: f32 },

    #[error("no simulation loaded")]
    NoSimulation,

    #[error("no experience repository configured")]
    NoRepository,

    #[error("scene has no element {id:?}")]
    SceneMissingElement { id: String },

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error(transparent)]
    Scenario(#[from] ScenarioError),

    #[error(transparent)]
    Xp(#[from] XpError),

    #[error(transparent)]
    Timeline(#[from] TimelineError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Content(#[from] anyhow::Error),
}

impl FrameworkError for RuntimeError {
    fn severity(&self) -> ErrorSeverity {
        use RuntimeError::*;
        match self {
            Scenario(e) => e.severity(),
            Xp(e) => e.severity(),
            Timeline(e) => e.severity(),
            NoListener { .. } | SceneMissingElement { .. } | NoSimulation | NoRepository => {
                ErrorSeverity::Recoverable
            }
            NotInitialized
            | SimulationNotInitialized
            | InvalidTrim { .. }
            | InvalidConfiguration(_)
            | Content(_) => ErrorSeverity::Validation,
            Repository(RepositoryError::LockPoisoned) => ErrorSeverity::Internal,
            Repository(RepositoryError::Io(_)) => ErrorSeverity::Recoverable,
            Repository(_) => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        use RuntimeError::*;
        match self {
            NotInitialized => "RUNTIME_NOT_INITIALIZED",
            SimulationNotInitialized => "RUNTIME_SIMULATION_NOT_INITIALIZED",
            NoListener { .. } => "RUNTIME_NO_LISTENER",
            InvalidTrim { .. } => "RUNTIME_INVALID_TRIM",
            NoSimulation => "RUNTIME_NO_SIMULATION",
            NoRepository => "RUNTIME_NO_REPOSITORY",
            SceneMissingElement { .. } => "RUNTIME_SCENE_MISSING_ELEMENT",
            InvalidConfiguration(_) => "RUNTIME_INVALID_CONFIGURATION",
            Scenario(e) => e.error_code(),
            Xp(e) => e.error_code(),
            Timeline(e) => e.error_code(),
            Repository(_) => "RUNTIME_REPOSITORY",
            Content(_) => "RUNTIME_CONTENT",
        }
    }
}
