//! Common error infrastructure for discen-core.
//!
//! Domain-specific errors (`ScenarioError`, `XpError`) are defined next to
//! the stores they validate. This module holds the classification shared by
//! all of them.
//!
//! # Classification
//!
//! - **Recoverable**: the caller may retry or pick another operation
//!   (unknown identifier, element deleted concurrently)
//! - **Validation**: malformed input that must be changed before retrying
//! - **Internal**: inconsistent state that indicates a bug
//! - **Fatal**: the store cannot be used any further

/// Severity level of an error, used for categorization and recovery strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum ErrorSeverity {
    /// Recoverable error - can retry with same or alternative operation.
    ///
    /// Examples: element not found, goal not found
    Recoverable,

    /// Validation error - invalid input, should not retry without changes.
    ///
    /// Examples: empty identifier, duplicate goal name, malformed system
    Validation,

    /// Internal error - unexpected state inconsistency.
    Internal,

    /// Fatal error - the store is corrupted and cannot continue.
    Fatal,
}

impl ErrorSeverity {
    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true if this error indicates an internal bug.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Common trait for all discen-core errors.
///
/// Gives hosts a uniform way to decide whether a failure is surfaced to the
/// user, retried, or only logged.
pub trait FrameworkError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a stable identifier for this error variant.
    ///
    /// Useful for log filtering and tests. Defaults to the type name.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
