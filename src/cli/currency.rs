//! Currency CLI commands
//!
//! Implements CLI commands for managing the currency tables.

use clap::Subcommand;

use crate::config::{Dirty, Settings};
use crate::currency::CurrencyRegistry;
use crate::display::format_currency_list;
use crate::error::TrackerResult;

/// Currency subcommands
#[derive(Subcommand)]
pub enum CurrencyCommands {
    /// List all known currencies
    List,
    /// Add a custom currency
    Add {
        /// Currency (item) id
        id: u32,
        /// Display name
        name: String,
    },
    /// Remove a custom currency
    Remove {
        /// Currency id
        id: u32,
    },
    /// Rename a currency
    Rename {
        /// Currency id
        id: u32,
        /// New display name
        name: String,
    },
}

/// Handle a currency command
pub fn handle_currency_command(settings: &mut Settings, cmd: CurrencyCommands) -> TrackerResult<Dirty> {
    match cmd {
        CurrencyCommands::List => {
            let registry = CurrencyRegistry::from_settings(settings);
            let custom = settings.custom_currencies();
            print!(
                "{}",
                format_currency_list(&registry, |id| custom.contains_key(&id))
            );
            Ok(Dirty::No)
        }

        CurrencyCommands::Add { id, name } => {
            let dirty = settings.add_custom_currency(id, name.trim())?;
            if dirty.is_dirty() {
                println!("Added currency {}: {}", id, name.trim());
            } else {
                println!("Currency {} is already '{}'", id, name.trim());
            }
            Ok(dirty)
        }

        CurrencyCommands::Remove { id } => {
            let dirty = settings.remove_custom_currency(id);
            if dirty.is_dirty() {
                println!("Removed currency {}", id);
            } else {
                println!("No custom currency with id {}", id);
            }
            Ok(dirty)
        }

        CurrencyCommands::Rename { id, name } => {
            let dirty = settings.rename_currency(id, name.trim())?;
            println!("Currency {} is now '{}'", id, name.trim());
            Ok(dirty)
        }
    }
}
