//! JSON encoding helpers shared by repositories and the context.

use std::fs;
use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::{RepositoryError, Result};

pub fn to_json_string<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

pub fn from_json_str<T: DeserializeOwned>(text: &str) -> Result<T> {
    Ok(serde_json::from_str(text)?)
}

/// Writes `value` as JSON next to `path` and renames it into place, so readers
/// see either the previous file or the complete new one.
pub fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = to_json_string(value)?;

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(RepositoryError::Io)?;
    }

    let mut temp_name = path.as_os_str().to_owned();
    temp_name.push(".tmp");
    let temp_path = Path::new(&temp_name);

    // Write to temp file
    fs::write(temp_path, json).map_err(RepositoryError::Io)?;

    // Atomic rename
    if let Err(err) = fs::rename(temp_path, path) {
        let _ = fs::remove_file(temp_path);
        return Err(RepositoryError::Io(err));
    }

    tracing::debug!(target: "discen::repository", path = %path.display(), "wrote document");
    Ok(())
}

pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = fs::read_to_string(path).map_err(RepositoryError::Io)?;
    let value = from_json_str(&text)?;
    tracing::debug!(target: "discen::repository", path = %path.display(), "read document");
    Ok(value)
}
