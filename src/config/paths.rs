//! Path management for the currency tracker
//!
//! ## Path Resolution Order
//!
//! 1. `CURRENCY_TRACKER_DIR` environment variable (if set)
//! 2. The platform config directory (`~/.config/currency-tracker` on Linux,
//!    `%APPDATA%\currency-tracker\config` on Windows)
//!
//! Every character gets a data folder `{base}/{Name}_{Server}` holding its
//! log files, the `Exported` folder and the `Backups` folder.

use std::path::PathBuf;

use directories::ProjectDirs;

use crate::error::TrackerError;
use crate::models::CharacterInfo;
use crate::storage::resolver::sanitize_file_name;

/// Environment variable overriding the base directory
pub const BASE_DIR_ENV: &str = "CURRENCY_TRACKER_DIR";

/// Name of the export folder inside a data folder
pub const EXPORT_DIR_NAME: &str = "Exported";

/// Name of the backup folder inside a data folder
pub const BACKUP_DIR_NAME: &str = "Backups";

/// Manages all paths used by the tracker
#[derive(Debug, Clone)]
pub struct TrackerPaths {
    base_dir: PathBuf,
}

impl TrackerPaths {
    /// Resolve the base directory from the environment or the platform
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined.
    pub fn new() -> Result<Self, TrackerError> {
        let base_dir = match std::env::var(BASE_DIR_ENV) {
            Ok(custom) if !custom.trim().is_empty() => PathBuf::from(custom),
            _ => ProjectDirs::from("", "", "currency-tracker")
                .map(|dirs| dirs.config_dir().to_path_buf())
                .ok_or_else(|| {
                    TrackerError::Config("Could not determine a config directory".into())
                })?,
        };

        Ok(Self { base_dir })
    }

    /// Create paths rooted at a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get the base directory
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Get the data folder for a character
    pub fn character_dir(&self, character: &CharacterInfo) -> PathBuf {
        self.base_dir
            .join(sanitize_file_name(&character.folder_name()))
    }

    /// Data folder for the active character, if there is one
    pub fn data_folder(&self, character: Option<&CharacterInfo>) -> Option<PathBuf> {
        character.map(|c| self.character_dir(c))
    }

    /// Ensure the base directory exists
    pub fn ensure_directories(&self) -> Result<(), TrackerError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| TrackerError::Io(format!("Failed to create base directory: {}", e)))
    }

    /// Ensure a character's data folder exists
    pub fn ensure_character_dir(&self, character: &CharacterInfo) -> Result<PathBuf, TrackerError> {
        let dir = self.character_dir(character);
        std::fs::create_dir_all(&dir)
            .map_err(|e| TrackerError::Io(format!("Failed to create data folder: {}", e)))?;
        Ok(dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_custom_base_dir() {
        let temp_dir = TempDir::new().unwrap();
        let paths = TrackerPaths::with_base_dir(temp_dir.path().to_path_buf());

        assert_eq!(paths.base_dir(), temp_dir.path());
        assert_eq!(paths.settings_file(), temp_dir.path().join("config.json"));
    }

    #[test]
    fn test_character_dir_is_sanitized() {
        let temp_dir = TempDir::new().unwrap();
        let paths = TrackerPaths::with_base_dir(temp_dir.path().to_path_buf());

        let character = CharacterInfo::new("Y'shtola", "Tonberry/EU");
        assert_eq!(
            paths.character_dir(&character),
            temp_dir.path().join("Y'shtola_Tonberry_EU")
        );
    }

    #[test]
    fn test_no_active_character_has_no_data_folder() {
        let paths = TrackerPaths::with_base_dir(PathBuf::from("/tmp/unused"));
        assert!(paths.data_folder(None).is_none());
    }

    #[test]
    fn test_ensure_character_dir() {
        let temp_dir = TempDir::new().unwrap();
        let paths = TrackerPaths::with_base_dir(temp_dir.path().to_path_buf());

        let dir = paths
            .ensure_character_dir(&CharacterInfo::new("Thancred", "Ragnarok"))
            .unwrap();
        assert!(dir.is_dir());
    }
}
