//! In-memory document repository for tests and local runs.

use std::collections::HashMap;
use std::sync::RwLock;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::repository::traits::check_name;
use crate::repository::{DocumentRepository, RepositoryError, Result};

pub struct InMemoryRepository<D> {
    documents: RwLock<HashMap<String, D>>,
}

impl<D> InMemoryRepository<D> {
    pub fn new() -> Self {
        Self {
            documents: RwLock::new(HashMap::new()),
        }
    }
}

impl<D> Default for InMemoryRepository<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D> DocumentRepository<D> for InMemoryRepository<D>
where
    D: Serialize + DeserializeOwned + Clone + Send + Sync,
{
    fn save(&self, name: &str, document: &D) -> Result<()> {
        check_name(name)?;
        let mut documents = self
            .documents
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        documents.insert(name.to_owned(), document.clone());
        Ok(())
    }

    fn load(&self, name: &str) -> Result<Option<D>> {
        check_name(name)?;
        let documents = self
            .documents
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(documents.get(name).cloned())
    }

    fn exists(&self, name: &str) -> bool {
        self.documents
            .read()
            .map(|documents| documents.contains_key(name))
            .unwrap_or(false)
    }

    fn delete(&self, name: &str) -> Result<()> {
        let mut documents = self
            .documents
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        documents.remove(name);
        Ok(())
    }

    fn list(&self) -> Result<Vec<String>> {
        let documents = self
            .documents
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        let mut names: Vec<String> = documents.keys().cloned().collect();
        names.sort_unstable();
        Ok(names)
    }
}
