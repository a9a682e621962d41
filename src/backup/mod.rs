//! Backup system for the currency tracker
//!
//! Snapshots one character's data folder into a rotating set of compressed
//! archives stored in `{data folder}/Backups`.
//!
//! # Archive Format
//!
//! Each backup is a gzip-compressed tar archive named
//! `Backup_{yyyyMMddHHmmss}.tar.gz` holding a flat copy of every file
//! directly inside the data folder. Subfolders (`Backups`, `Exported`) are
//! not included.
//!
//! # Rotation
//!
//! Before a new archive is written, the oldest archives are removed until
//! the new one fits under the configured maximum. An archive locked by
//! another process is skipped and the next-oldest one is removed instead.
//! A maximum of 0 disables rotation.
//!
//! # Example
//!
//! ```rust,ignore
//! use currency_tracker::backup::BackupManager;
//!
//! let manager = BackupManager::new(settings.max_backup_files_count);
//! let archive = manager.create_backup(Some(&data_folder))?;
//! for info in manager.list_backups(&data_folder)? {
//!     println!("{} ({} bytes)", info.filename, info.size_bytes);
//! }
//! ```

mod manager;

pub use manager::{BackupInfo, BackupManager, ARCHIVE_EXTENSION, ARCHIVE_PREFIX};
