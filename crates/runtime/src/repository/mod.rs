//! Persistence of scenarios, experiences and simulations.
//!
//! Documents are JSON with a `version` field. [`DocumentRepository`] stores
//! them by name; the context also reads and writes them at explicit paths.

mod documents;
mod error;
mod file;
mod json;
mod memory;
mod traits;

pub use documents::{DOCUMENT_VERSION, ExperienceDocument, ScenarioDocument, SimulationDocument};
pub use error::{RepositoryError, Result};
pub use file::FileRepository;
pub use json::{from_json_str, read_json, to_json_string, write_json_atomic};
pub use memory::InMemoryRepository;
pub use traits::DocumentRepository;
