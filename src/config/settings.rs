//! User settings for the currency tracker
//!
//! Settings are persisted as JSON next to the character data folders.
//! Mutating methods return a [`Dirty`] signal instead of saving on their
//! own; the caller decides when to write the file.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::paths::TrackerPaths;
use crate::error::TrackerError;
use crate::export::ExportFormat;
use crate::models::CharacterInfo;

/// Whether a mutation changed persisted state
#[must_use = "a dirty settings object should be saved"]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dirty {
    Yes,
    No,
}

impl Dirty {
    /// Check if the settings need saving
    pub fn is_dirty(self) -> bool {
        matches!(self, Self::Yes)
    }

    /// Combine two signals
    pub fn or(self, other: Dirty) -> Dirty {
        if self.is_dirty() || other.is_dirty() {
            Dirty::Yes
        } else {
            Dirty::No
        }
    }
}

/// User settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Character whose data folder is active
    #[serde(default)]
    pub active_character: Option<CharacterInfo>,

    /// Built-in currencies (id -> display name)
    #[serde(default)]
    preset_currencies: BTreeMap<u32, String>,

    /// User-added currencies (id -> display name)
    #[serde(default)]
    custom_currencies: BTreeMap<u32, String>,

    /// Maximum number of backup archives kept per data folder (0 = unlimited)
    #[serde(default = "default_max_backup_files")]
    pub max_backup_files_count: usize,

    /// Default export format
    #[serde(default)]
    pub export_format: ExportFormat,

    /// Records shown per page when listing
    #[serde(default = "default_records_per_page")]
    pub records_per_page: usize,

    /// Bumped whenever the currency tables change
    #[serde(skip)]
    currency_generation: u64,
}

fn default_schema_version() -> u32 {
    1
}

fn default_max_backup_files() -> usize {
    10
}

fn default_records_per_page() -> usize {
    20
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            active_character: None,
            preset_currencies: BTreeMap::new(),
            custom_currencies: BTreeMap::new(),
            max_backup_files_count: default_max_backup_files(),
            export_format: ExportFormat::default(),
            records_per_page: default_records_per_page(),
            currency_generation: 0,
        }
    }
}

impl Settings {
    /// Load settings from disk, or create default settings if file doesn't exist
    pub fn load_or_create(paths: &TrackerPaths) -> Result<Self, TrackerError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path).map_err(|e| {
                TrackerError::Io(format!("Failed to read settings file: {}", e))
            })?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                TrackerError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &TrackerPaths) -> Result<(), TrackerError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self).map_err(|e| {
            TrackerError::Config(format!("Failed to serialize settings: {}", e))
        })?;

        std::fs::write(paths.settings_file(), contents).map_err(|e| {
            TrackerError::Io(format!("Failed to write settings file: {}", e))
        })?;

        tracing::debug!(path = %paths.settings_file().display(), "Saved settings");
        Ok(())
    }

    /// Generation of the currency tables, for cache invalidation
    pub fn currency_generation(&self) -> u64 {
        self.currency_generation
    }

    /// Built-in currencies
    pub fn preset_currencies(&self) -> &BTreeMap<u32, String> {
        &self.preset_currencies
    }

    /// User-added currencies
    pub fn custom_currencies(&self) -> &BTreeMap<u32, String> {
        &self.custom_currencies
    }

    /// Switch the active character
    pub fn set_active_character(&mut self, character: Option<CharacterInfo>) -> Dirty {
        if self.active_character == character {
            return Dirty::No;
        }
        self.active_character = character;
        Dirty::Yes
    }

    /// Register a built-in currency
    pub fn add_preset_currency(&mut self, id: u32, name: impl Into<String>) -> Dirty {
        let name = name.into();
        if self.preset_currencies.get(&id) == Some(&name) {
            return Dirty::No;
        }
        self.preset_currencies.insert(id, name);
        self.touch_currencies()
    }

    /// Add or replace a user currency
    pub fn add_custom_currency(&mut self, id: u32, name: impl Into<String>) -> Result<Dirty, TrackerError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(TrackerError::Validation("Currency name cannot be empty".into()));
        }
        if self.preset_currencies.contains_key(&id) {
            return Err(TrackerError::Validation(format!(
                "Currency {} is built in and cannot be redefined",
                id
            )));
        }
        if self.custom_currencies.get(&id) == Some(&name) {
            return Ok(Dirty::No);
        }
        self.custom_currencies.insert(id, name);
        Ok(self.touch_currencies())
    }

    /// Remove a user currency
    pub fn remove_custom_currency(&mut self, id: u32) -> Dirty {
        if self.custom_currencies.remove(&id).is_some() {
            self.touch_currencies()
        } else {
            Dirty::No
        }
    }

    /// Rename a currency, preset or custom
    pub fn rename_currency(&mut self, id: u32, name: impl Into<String>) -> Result<Dirty, TrackerError> {
        let name = name.into();
        let slot = self
            .preset_currencies
            .get_mut(&id)
            .or_else(|| self.custom_currencies.get_mut(&id))
            .ok_or(TrackerError::UnknownCurrency(id))?;

        if *slot == name {
            return Ok(Dirty::No);
        }
        *slot = name;
        Ok(self.touch_currencies())
    }

    /// Drop custom currencies shadowed by a preset with the same id
    pub fn normalize_currencies(&mut self) -> Dirty {
        let before = self.custom_currencies.len();
        let presets = &self.preset_currencies;
        self.custom_currencies.retain(|id, _| !presets.contains_key(id));

        if self.custom_currencies.len() != before {
            self.touch_currencies()
        } else {
            Dirty::No
        }
    }

    fn touch_currencies(&mut self) -> Dirty {
        self.currency_generation += 1;
        Dirty::Yes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.max_backup_files_count, 10);
        assert_eq!(settings.records_per_page, 20);
        assert_eq!(settings.export_format, ExportFormat::Csv);
        assert!(settings.active_character.is_none());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = TrackerPaths::with_base_dir(temp_dir.path().to_path_buf());

        let mut settings = Settings::default();
        let _ = settings.set_active_character(Some(CharacterInfo::new("Urianger", "Sargatanas")));
        settings.add_custom_currency(28, "Poetics").unwrap();
        settings.max_backup_files_count = 3;
        settings.save(&paths).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded.max_backup_files_count, 3);
        assert_eq!(loaded.custom_currencies().get(&28).unwrap(), "Poetics");
        assert_eq!(
            loaded.active_character,
            Some(CharacterInfo::new("Urianger", "Sargatanas"))
        );
    }

    #[test]
    fn test_mutations_report_dirty_and_bump_generation() {
        let mut settings = Settings::default();
        let start = settings.currency_generation();

        assert!(settings.add_custom_currency(28, "Poetics").unwrap().is_dirty());
        assert!(!settings.add_custom_currency(28, "Poetics").unwrap().is_dirty());
        assert_eq!(settings.currency_generation(), start + 1);

        assert!(settings.rename_currency(28, "Allagan Tomestones of Poetics").unwrap().is_dirty());
        assert!(settings.remove_custom_currency(28).is_dirty());
        assert!(!settings.remove_custom_currency(28).is_dirty());
        assert_eq!(settings.currency_generation(), start + 3);
    }

    #[test]
    fn test_custom_currency_cannot_shadow_preset() {
        let mut settings = Settings::default();
        let _ = settings.add_preset_currency(1, "Gil");
        assert!(settings.add_custom_currency(1, "Fake Gil").is_err());
        assert!(settings.add_custom_currency(2, " ").is_err());
    }

    #[test]
    fn test_normalize_drops_shadowed_custom() {
        let json = r#"{
            "preset_currencies": {"1": "Gil"},
            "custom_currencies": {"1": "Old Gil", "28": "Poetics"}
        }"#;
        let mut settings: Settings = serde_json::from_str(json).unwrap();

        assert!(settings.normalize_currencies().is_dirty());
        assert_eq!(settings.custom_currencies().len(), 1);
        assert!(!settings.normalize_currencies().is_dirty());
    }

    #[test]
    fn test_dirty_or() {
        assert!(Dirty::No.or(Dirty::Yes).is_dirty());
        assert!(!Dirty::No.or(Dirty::No).is_dirty());
    }
}
