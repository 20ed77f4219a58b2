//! Scenario store errors.

use crate::error::{ErrorSeverity, FrameworkError};

/// Errors raised by [`super::ScenarioState`] mutations and lookups.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScenarioError {
    /// Identifiers are the join key and may not be empty.
    #[error("entity identifier must not be empty")]
    EmptyIdentifier,

    #[error("entity '{id}' already exists")]
    DuplicateIdentifier { id: String },

    /// No entity with this identifier (it may have been deleted meanwhile).
    #[error("entity '{id}' not found")]
    NotFound { id: String },

    /// The entity exists but carries no transform.
    #[error("entity '{id}' is not an element")]
    NotAnElement { id: String },

    #[error("element '{id}' refers to unknown parent '{parent}'")]
    UnknownParent { id: String, parent: String },

    #[error("element '{id}' would be its own ancestor")]
    ParentCycle { id: String },

    #[error("transform of element '{id}' has non-finite components")]
    NonFiniteTransform { id: String },
}

impl ScenarioError {
    pub(crate) fn not_found(id: &str) -> Self {
        Self::NotFound { id: id.to_owned() }
    }
}

impl FrameworkError for ScenarioError {
    fn severity(&self) -> ErrorSeverity {
        use ScenarioError::*;
        match self {
            NotFound { .. } => ErrorSeverity::Recoverable,
            EmptyIdentifier
            | DuplicateIdentifier { .. }
            | NotAnElement { .. }
            | UnknownParent { .. }
            | ParentCycle { .. }
            | NonFiniteTransform { .. } => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        use ScenarioError::*;
        match self {
            EmptyIdentifier => "SCENARIO_EMPTY_IDENTIFIER",
            DuplicateIdentifier { .. } => "SCENARIO_DUPLICATE_IDENTIFIER",
            NotFound { .. } => "SCENARIO_NOT_FOUND",
            NotAnElement { .. } => "SCENARIO_NOT_AN_ELEMENT",
            UnknownParent { .. } => "SCENARIO_UNKNOWN_PARENT",
            ParentCycle { .. } => "SCENARIO_PARENT_CYCLE",
            NonFiniteTransform { .. } => "SCENARIO_NON_FINITE_TRANSFORM",
        }
    }
}
