//! Backup CLI commands
//!
//! Implements CLI commands for backup management.

use clap::Subcommand;
use std::path::Path;

use crate::backup::BackupManager;
use crate::config::Settings;
use crate::display::format_backup_list;
use crate::error::{TrackerError, TrackerResult};

/// Backup subcommands
#[derive(Subcommand)]
pub enum BackupCommands {
    /// Back up the active character's data folder
    Create {
        /// Maximum number of archives to keep (default: from settings, 0 = unlimited)
        #[arg(short, long)]
        max: Option<usize>,
    },

    /// List the active character's backups
    List,
}

/// Handle a backup command
pub async fn handle_backup_command(
    data_folder: Option<&Path>,
    settings: &Settings,
    cmd: BackupCommands,
) -> TrackerResult<()> {
    match cmd {
        BackupCommands::Create { max } => {
            let manager = BackupManager::new(max.unwrap_or(settings.max_backup_files_count));

            println!("Creating backup...");
            let backup_path = manager.create_backup_async(data_folder).await?;
            let filename = backup_path
                .file_name()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_else(|| backup_path.display().to_string());
            println!("Backup created: {}", filename);
            println!("Location: {}", backup_path.display());
        }

        BackupCommands::List => {
            let data_folder = data_folder.ok_or(TrackerError::EmptyDataFolder)?;
            let manager = BackupManager::new(settings.max_backup_files_count);
            let backups = manager.list_backups(data_folder)?;

            print!("{}", format_backup_list(&backups));
            if backups.is_empty() {
                println!("Create one with: ctrack backup create");
            }
        }
    }

    Ok(())
}
