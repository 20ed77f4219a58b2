//! Platform-specific directory utilities

use std::path::PathBuf;

/// Get the platform-specific log directory
///
/// Follows platform conventions:
/// - macOS: `~/Library/Caches/discen/logs`
/// - Linux: `~/.cache/discen/logs` (or `$XDG_CACHE_HOME/discen/logs`)
/// - Windows: `%LOCALAPPDATA%\discen\logs`
/// - Fallback: `/tmp/discen/logs`
pub fn log_dir() -> PathBuf {
    let base_dir = directories::ProjectDirs::from("", "", "discen")
        .map(|dirs| dirs.cache_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("/tmp/discen"));

    base_dir.join("logs")
}
