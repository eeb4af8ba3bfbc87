//! File persistence helpers.
//!
//! Handles loading and saving files on disk with owner-only permissions.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::StoreError;

/// Directory name used under the platform config/cache directories.
const APP_DIR: &str = "iigenmon";

// ============================================================================
// Default Paths
// ============================================================================

/// Returns the default configuration directory.
///
/// - Linux: `~/.config/iigenmon`
/// - macOS: `~/Library/Application Support/iigenmon`
/// - Windows: `%APPDATA%\iigenmon`
pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .map(|c| c.join(APP_DIR))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Returns the default cache directory.
///
/// - Linux: `~/.cache/iigenmon`
/// - macOS: `~/Library/Caches/iigenmon`
/// - Windows: `%LOCALAPPDATA%\iigenmon`
pub fn default_cache_dir() -> PathBuf {
    dirs::cache_dir()
        .map(|c| c.join(APP_DIR))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Returns the default configuration file path.
pub fn default_config_path() -> PathBuf {
    default_config_dir().join("config.json")
}

// ============================================================================
// Security: File Permissions
// ============================================================================

/// Sets restrictive file permissions (0o600) on Unix systems.
///
/// Cached login responses contain tokens, so only the owner may read them.
#[cfg(unix)]
async fn set_restrictive_permissions(path: &Path) -> Result<(), StoreError> {
    use std::os::unix::fs::PermissionsExt;

    let mut perms = tokio::fs::metadata(path).await?.permissions();
    perms.set_mode(0o600); // Owner read/write only
    tokio::fs::set_permissions(path, perms).await?;

    debug!(path = %path.display(), mode = "0600", "Set restrictive permissions");
    Ok(())
}

/// Sets restrictive directory permissions (0o700) on Unix systems.
#[cfg(unix)]
async fn set_restrictive_dir_permissions(path: &Path) -> Result<(), StoreError> {
    use std::os::unix::fs::PermissionsExt;

    let mut perms = tokio::fs::metadata(path).await?.permissions();
    perms.set_mode(0o700); // Owner read/write/execute only
    tokio::fs::set_permissions(path, perms).await?;

    debug!(path = %path.display(), mode = "0700", "Set restrictive directory permissions");
    Ok(())
}

/// No-op for non-Unix systems.
#[cfg(not(unix))]
async fn set_restrictive_permissions(_path: &Path) -> Result<(), StoreError> {
    Ok(())
}

/// No-op for non-Unix systems.
#[cfg(not(unix))]
async fn set_restrictive_dir_permissions(_path: &Path) -> Result<(), StoreError> {
    Ok(())
}

// ============================================================================
// File Operations
// ============================================================================

/// Ensures a directory exists with secure permissions.
pub async fn ensure_dir(path: &Path) -> Result<(), StoreError> {
    if !tokio::fs::try_exists(path).await? {
        debug!(path = %path.display(), "Creating directory");
        tokio::fs::create_dir_all(path).await?;
        set_restrictive_dir_permissions(path).await?;
    }
    Ok(())
}

/// Saves text to a file with secure permissions.
///
/// Creates the parent directory if needed and writes atomically (temp file
/// + rename), so a reader never sees a half-written response.
pub async fn save_text(path: &Path, contents: &str) -> Result<(), StoreError> {
    debug!(path = %path.display(), "Saving file");

    if let Some(parent) = path.parent() {
        ensure_dir(parent).await?;
    }

    let temp_path = path.with_extension("json.tmp");
    tokio::fs::write(&temp_path, contents).await?;
    set_restrictive_permissions(&temp_path).await?;
    tokio::fs::rename(&temp_path, path).await?;

    debug!(path = %path.display(), "File saved securely");
    Ok(())
}

/// Loads a file and its last-write time. `Ok(None)` if it does not exist.
pub async fn load_text(path: &Path) -> Result<Option<(String, DateTime<Utc>)>, StoreError> {
    let contents = match tokio::fs::read_to_string(path).await {
        Ok(contents) => contents,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!(path = %path.display(), "File not found");
            return Ok(None);
        }
        Err(e) => return Err(e.into()),
    };

    let modified = tokio::fs::metadata(path).await?.modified()?;
    debug!(path = %path.display(), "File loaded");
    Ok(Some((contents, DateTime::<Utc>::from(modified))))
}

/// Removes a file. A missing file is not an error.
pub async fn remove_file(path: &Path) -> Result<(), StoreError> {
    match tokio::fs::remove_file(path).await {
        Ok(()) => {
            debug!(path = %path.display(), "File removed");
            Ok(())
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

/// Loads data from a JSON file.
pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T, StoreError> {
    debug!(path = %path.display(), "Loading JSON file");

    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_dirs() {
        assert!(default_config_dir().ends_with("iigenmon"));
        assert!(default_cache_dir().ends_with("iigenmon"));
        assert!(default_config_path().ends_with("config.json"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_file_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = tempfile::tempdir().unwrap();
        let test_file = temp_dir.path().join("cache").join("alice-tokens.json");

        save_text(&test_file, "{}").await.unwrap();

        let mode = tokio::fs::metadata(&test_file)
            .await
            .unwrap()
            .permissions()
            .mode()
            & 0o777;
        assert_eq!(mode, 0o600, "File should have 0600 permissions");

        let dir_mode = tokio::fs::metadata(test_file.parent().unwrap())
            .await
            .unwrap()
            .permissions()
            .mode()
            & 0o777;
        assert_eq!(dir_mode, 0o700, "Directory should have 0700 permissions");
    }
}
