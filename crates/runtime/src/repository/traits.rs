//! Repository contract for named JSON documents.

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::Result;

/// Store of documents of one kind, addressed by name.
///
/// Names are plain identifiers: non-empty, no path separators, no leading dot.
pub trait DocumentRepository<D>: Send + Sync
where
    D: Serialize + DeserializeOwned + Clone + Send + Sync,
{
    /// Save a document, replacing any previous one with the same name
    fn save(&self, name: &str, document: &D) -> Result<()>;

    /// Load a document by name
    fn load(&self, name: &str) -> Result<Option<D>>;

    /// Check if a document exists
    fn exists(&self, name: &str) -> bool;

    /// Delete a document. Deleting a missing document is not an error.
    fn delete(&self, name: &str) -> Result<()>;

    /// List stored document names in ascending order
    fn list(&self) -> Result<Vec<String>>;
}

pub(crate) fn check_name(name: &str) -> Result<()> {
    let valid = !name.is_empty()
        && !name.starts_with('.')
        && !name.contains(['/', '\\'])
        && name != "..";
    if valid {
        Ok(())
    } else {
        Err(super::RepositoryError::InvalidName(name.to_owned()))
    }
}
