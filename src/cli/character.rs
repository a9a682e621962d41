//! Character CLI commands

use clap::Subcommand;

use crate::config::{Dirty, Settings, TrackerPaths};
use crate::error::TrackerResult;
use crate::models::CharacterInfo;

/// Character subcommands
#[derive(Subcommand)]
pub enum CharacterCommands {
    /// Switch the active character (creates its data folder)
    Set {
        /// Character name
        name: String,
        /// Home server
        server: String,
    },
    /// Show the active character and its data folder
    Show,
    /// Forget the active character
    Clear,
}

/// Handle a character command
pub fn handle_character_command(
    paths: &TrackerPaths,
    settings: &mut Settings,
    cmd: CharacterCommands,
) -> TrackerResult<Dirty> {
    match cmd {
        CharacterCommands::Set { name, server } => {
            let character = CharacterInfo::new(name.trim(), server.trim());
            let folder = paths.ensure_character_dir(&character)?;
            let dirty = settings.set_active_character(Some(character.clone()));
            println!("Active character: {}", character);
            println!("Data folder:      {}", folder.display());
            Ok(dirty)
        }

        CharacterCommands::Show => {
            match &settings.active_character {
                Some(character) => {
                    println!("Active character: {}", character);
                    println!(
                        "Data folder:      {}",
                        paths.character_dir(character).display()
                    );
                }
                None => {
                    println!("No active character.");
                    println!("Set one with: ctrack character set <name> <server>");
                }
            }
            Ok(Dirty::No)
        }

        CharacterCommands::Clear => {
            let dirty = settings.set_active_character(None);
            println!("Active character cleared");
            Ok(dirty)
        }
    }
}
