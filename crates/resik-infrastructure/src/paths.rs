//! Unified path management for Resik configuration and storage.
//!
//! All configuration and session data locations resolve through here so the
//! layout stays consistent across platforms.

use std::path::PathBuf;

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Home directory could not be determined.
    HomeDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::HomeDirNotFound => write!(f, "Cannot find home directory"),
        }
    }
}

impl std::error::Error for PathError {}

/// Unified path management for Resik.
///
/// # Directory Structure
///
/// ```text
/// ~/.config/resik/             # Config directory
/// └── config.toml              # Application configuration
///
/// ~/.local/share/resik/        # Data directory
/// └── session/                 # Session store files
///     └── userSession.json
/// ```
pub struct ResikPaths;

impl ResikPaths {
    /// Returns the Resik configuration directory.
    ///
    /// # Returns
    ///
    /// - `Ok(PathBuf)`: Path to config directory (e.g., `~/.config/resik/`)
    /// - `Err(PathError::HomeDirNotFound)`: Could not determine directory
    pub fn config_dir() -> Result<PathBuf, PathError> {
        dirs::config_dir()
            .map(|dir| dir.join("resik"))
            .ok_or(PathError::HomeDirNotFound)
    }

    /// Returns the Resik data directory.
    pub fn data_dir() -> Result<PathBuf, PathError> {
        dirs::data_dir()
            .map(|dir| dir.join("resik"))
            .ok_or(PathError::HomeDirNotFound)
    }

    /// Returns the path to the main configuration file.
    pub fn config_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Returns the directory the session store keeps its files in.
    pub fn session_dir() -> Result<PathBuf, PathError> {
        Ok(Self::data_dir()?.join("session"))
    }
}
