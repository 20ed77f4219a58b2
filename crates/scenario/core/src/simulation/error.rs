use crate::error::{ErrorSeverity, FrameworkError};

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TimelineError {
    #[error("duration must be finite and positive, got {duration}")]
    InvalidDuration { duration: f32 },

    #[error("track element identifier must not be empty")]
    EmptyElementId,

    #[error("keyframe of '{element}' at {time}s lies outside [0, {duration}]")]
    KeyframeOutOfRange {
        element: String,
        time: f32,
        duration: f32,
    },

    #[error("keyframe of '{element}' at {time}s has a non-finite transform")]
    NonFiniteTransform { element: String, time: f32 },

    #[error("progress must lie within [0, 1], got {progress}")]
    InvalidProgress { progress: f32 },
}

impl FrameworkError for TimelineError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        use TimelineError::*;
        match self {
            InvalidDuration { .. } => "TIMELINE_INVALID_DURATION",
            EmptyElementId => "TIMELINE_EMPTY_ELEMENT_ID",
            KeyframeOutOfRange { .. } => "TIMELINE_KEYFRAME_OUT_OF_RANGE",
            NonFiniteTransform { .. } => "TIMELINE_NON_FINITE_TRANSFORM",
            InvalidProgress { .. } => "TIMELINE_INVALID_PROGRESS",
        }
    }
}
