//! File-based document repository.

use std::fs;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::repository::traits::check_name;
use crate::repository::{DocumentRepository, RepositoryError, Result, read_json, write_json_atomic};

const EXTENSION: &str = "json";

/// Stores each document as `{name}.json` under a base directory.
///
/// Writes go to a temporary file first and are renamed into place.
pub struct FileRepository<D> {
    base_dir: PathBuf,
    _marker: PhantomData<fn() -> D>,
}

impl<D> FileRepository<D> {
    /// Create a repository rooted at `base_dir`, creating it if needed.
    pub fn new(base_dir: impl AsRef<Path>) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        fs::create_dir_all(&base_dir).map_err(RepositoryError::Io)?;
        Ok(Self {
            base_dir,
            _marker: PhantomData,
        })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn document_path(&self, name: &str) -> PathBuf {
        self.base_dir.join(format!("{}.{}", name, EXTENSION))
    }
}

impl<D> DocumentRepository<D> for FileRepository<D>
where
    D: Serialize + DeserializeOwned + Clone + Send + Sync,
{
    fn save(&self, name: &str, document: &D) -> Result<()> {
        check_name(name)?;
        write_json_atomic(&self.document_path(name), document)
    }

    fn load(&self, name: &str) -> Result<Option<D>> {
        check_name(name)?;
        let path = self.document_path(name);
        if !path.exists() {
            return Ok(None);
        }
        read_json(&path).map(Some)
    }

    fn exists(&self, name: &str) -> bool {
        check_name(name).is_ok() && self.document_path(name).exists()
    }

    fn delete(&self, name: &str) -> Result<()> {
        check_name(name)?;
        let path = self.document_path(name);
        if path.exists() {
            fs::remove_file(&path).map_err(RepositoryError::Io)?;
            tracing::debug!(target: "discen::repository", name, "deleted document");
        }
        Ok(())
    }

    fn list(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();

        let entries = fs::read_dir(&self.base_dir).map_err(RepositoryError::Io)?;
        for entry in entries {
            let entry = entry.map_err(RepositoryError::Io)?;
            let path = entry.path();

            if path.extension().is_some_and(|ext| ext == EXTENSION)
                && let Some(stem) = path.file_stem().and_then(|s| s.to_str())
            {
                names.push(stem.to_owned());
            }
        }

        names.sort_unstable();
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_save_load_delete() {
        let temp_dir = TempDir::new().unwrap();
        let repo: FileRepository<Vec<u32>> = FileRepository::new(temp_dir.path()).unwrap();

        assert_eq!(repo.load("first").unwrap(), None);
        repo.save("first", &vec![1, 2]).unwrap();
        repo.save("second", &vec![3]).unwrap();

        assert!(repo.exists("first"));
        assert_eq!(repo.load("first").unwrap(), Some(vec![1, 2]));
        assert_eq!(repo.list().unwrap(), vec!["first", "second"]);

        repo.delete("first").unwrap();
        repo.delete("first").unwrap();
        assert!(!repo.exists("first"));
        assert_eq!(repo.list().unwrap(), vec!["second"]);
    }

    #[test]
    fn test_names_cannot_escape_base_dir() {
        let temp_dir = TempDir::new().unwrap();
        let repo: FileRepository<u32> = FileRepository::new(temp_dir.path()).unwrap();

        for name in ["", "../up", "a/b", ".hidden"] {
            assert!(matches!(
                repo.save(name, &1),
                Err(RepositoryError::InvalidName(_))
            ));
            assert!(!repo.exists(name));
        }
    }
}
