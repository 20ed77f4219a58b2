//! Experience engine errors.
//!
//! Action outcomes are reported through [`super::ActionResult`]; these errors
//! cover calls that could not be evaluated at all.

use crate::error::{ErrorSeverity, FrameworkError};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum XpError {
    #[error("no digital system loaded")]
    NoSystemLoaded,

    #[error("invalid digital system: {reason}")]
    InvalidSystem { reason: String },

    #[error("goal name must not be empty")]
    EmptyGoalName,

    #[error("goal '{name}' already exists")]
    DuplicateGoal { name: String },

    #[error("goal '{name}' not found")]
    GoalNotFound { name: String },

    #[error("no current goal selected")]
    NoCurrentGoal,

    #[error("entity '{id}' not found in the digital system")]
    UnknownEntity { id: String },

    #[error("entity type '{entity_type}' not defined")]
    UnknownEntityType { entity_type: String },

    #[error("property '{property}' not defined for entity type '{entity_type}'")]
    UnknownProperty {
        entity_type: String,
        property: String,
    },
}

impl XpError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidSystem {
            reason: reason.into(),
        }
    }
}

impl FrameworkError for XpError {
    fn severity(&self) -> ErrorSeverity {
        use XpError::*;
        match self {
            GoalNotFound { .. }
            | UnknownEntity { .. }
            | UnknownEntityType { .. }
            | UnknownProperty { .. } => ErrorSeverity::Recoverable,
            NoSystemLoaded
            | InvalidSystem { .. }
            | EmptyGoalName
            | DuplicateGoal { .. }
            | NoCurrentGoal => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        use XpError::*;
        match self {
            NoSystemLoaded => "XP_NO_SYSTEM_LOADED",
            InvalidSystem { .. } => "XP_INVALID_SYSTEM",
            EmptyGoalName => "XP_EMPTY_GOAL_NAME",
            DuplicateGoal { .. } => "XP_DUPLICATE_GOAL",
            GoalNotFound { .. } => "XP_GOAL_NOT_FOUND",
            NoCurrentGoal => "XP_NO_CURRENT_GOAL",
            UnknownEntity { .. } => "XP_UNKNOWN_ENTITY",
            UnknownEntityType { .. } => "XP_UNKNOWN_ENTITY_TYPE",
            UnknownProperty { .. } => "XP_UNKNOWN_PROPERTY",
        }
    }
}
