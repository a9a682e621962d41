//! Currency display names
//!
//! Log files are named after a currency's display name, so every path
//! lookup goes through [`CurrencyNames`]. [`CurrencyRegistry`] caches the
//! merged preset and custom tables and rebuilds them only when the settings
//! report a different currency generation.

use std::collections::{BTreeMap, HashMap};

use crate::config::{Dirty, Settings};
use crate::storage::resolver::sanitize_file_name;

/// Built-in currencies registered by `ctrack init`
pub const DEFAULT_PRESETS: &[(u32, &str)] = &[
    (1, "Gil"),
    (20, "Storm Seal"),
    (21, "Serpent Seal"),
    (22, "Flame Seal"),
    (25, "Wolf Mark"),
    (27, "Allied Seal"),
    (28, "Allagan Tomestone of Poetics"),
    (29, "MGP"),
];

/// Register every missing default preset
pub fn seed_default_presets(settings: &mut Settings) -> Dirty {
    let mut dirty = Dirty::No;
    for (id, name) in DEFAULT_PRESETS {
        if !settings.preset_currencies().contains_key(id) {
            dirty = dirty.or(settings.add_preset_currency(*id, *name));
        }
    }
    dirty
}

/// Lookup from currency id to display name
pub trait CurrencyNames {
    /// Display name for a currency, if known
    fn display_name(&self, id: u32) -> Option<String>;
}

impl CurrencyNames for BTreeMap<u32, String> {
    fn display_name(&self, id: u32) -> Option<String> {
        self.get(&id).cloned()
    }
}

impl CurrencyNames for HashMap<u32, String> {
    fn display_name(&self, id: u32) -> Option<String> {
        self.get(&id).cloned()
    }
}

/// Cached view of every known currency
#[derive(Debug, Default)]
pub struct CurrencyRegistry {
    names: BTreeMap<u32, String>,
    generation: Option<u64>,
}

impl CurrencyRegistry {
    /// Create an empty registry; the first refresh always rebuilds
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from settings
    pub fn from_settings(settings: &Settings) -> Self {
        let mut registry = Self::new();
        registry.refresh(settings);
        registry
    }

    /// Rebuild the cache if the settings changed since the last refresh.
    ///
    /// Returns `true` when the cache was rebuilt.
    pub fn refresh(&mut self, settings: &Settings) -> bool {
        let generation = settings.currency_generation();
        if self.generation == Some(generation) {
            return false;
        }

        // Presets win over custom entries with the same id
        let mut names = settings.custom_currencies().clone();
        names.extend(
            settings
                .preset_currencies()
                .iter()
                .map(|(id, name)| (*id, name.clone())),
        );

        warn_on_file_name_collisions(&names);

        tracing::debug!(count = names.len(), generation, "Rebuilt currency registry");
        self.names = names;
        self.generation = Some(generation);
        true
    }

    /// All currencies in id order
    pub fn iter(&self) -> impl Iterator<Item = (u32, &str)> {
        self.names.iter().map(|(id, name)| (*id, name.as_str()))
    }

    /// Number of known currencies
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Check if no currency is known
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl CurrencyNames for CurrencyRegistry {
    fn display_name(&self, id: u32) -> Option<String> {
        self.names.get(&id).cloned()
    }
}

/// Two currencies whose names sanitize to the same file name would share logs
fn warn_on_file_name_collisions(names: &BTreeMap<u32, String>) {
    let mut seen: HashMap<String, u32> = HashMap::new();
    for (id, name) in names {
        let key = sanitize_file_name(name).to_lowercase();
        if let Some(other) = seen.insert(key, *id) {
            tracing::warn!(
                first = other,
                second = *id,
                name = %name,
                "Currencies resolve to the same log file name"
            );
        }
    }
}
