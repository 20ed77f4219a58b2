//! Public runtime API surface.

pub mod errors;

pub use errors::{RepositoryError, Result, RuntimeError};
