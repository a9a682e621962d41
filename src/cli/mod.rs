//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod backup;
pub mod character;
pub mod currency;
pub mod export;
pub mod log;

pub use backup::{handle_backup_command, BackupCommands};
pub use character::{handle_character_command, CharacterCommands};
pub use currency::{handle_currency_command, CurrencyCommands};
pub use export::{handle_export_command, ExportArgs};
pub use log::{handle_log_command, LogCommands};

use crate::currency::CurrencyRegistry;
use crate::error::{TrackerError, TrackerResult};

/// Resolve a currency argument given as an id or a display name
pub fn resolve_currency(registry: &CurrencyRegistry, arg: &str) -> TrackerResult<u32> {
    let arg = arg.trim();

    if let Ok(id) = arg.parse::<u32>() {
        return Ok(id);
    }

    registry
        .iter()
        .find(|(_, name)| name.eq_ignore_ascii_case(arg))
        .map(|(id, _)| id)
        .ok_or_else(|| TrackerError::Validation(format!("Currency not found: {}", arg)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;

    #[test]
    fn test_resolve_currency() {
        let mut settings = Settings::default();
        let _ = settings.add_preset_currency(1, "Gil");
        let _ = settings.add_custom_currency(28, "Poetics").unwrap();
        let registry = CurrencyRegistry::from_settings(&settings);

        assert_eq!(resolve_currency(&registry, "1").unwrap(), 1);
        assert_eq!(resolve_currency(&registry, "gil").unwrap(), 1);
        assert_eq!(resolve_currency(&registry, " Poetics ").unwrap(), 28);
        assert!(resolve_currency(&registry, "Wolf Marks").is_err());
    }
}
