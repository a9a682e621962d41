//! Backup manager
//!
//! Handles archive creation, rotation and listing.

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::{DateTime, Local, NaiveDateTime, Utc};
use flate2::write::GzEncoder;
use flate2::Compression;
use fs2::FileExt;
use tempfile::TempDir;

use crate::config::paths::BACKUP_DIR_NAME;
use crate::error::{TrackerError, TrackerResult};

/// File name prefix of backup archives
pub const ARCHIVE_PREFIX: &str = "Backup_";

/// File name extension of backup archives
pub const ARCHIVE_EXTENSION: &str = ".tar.gz";

const ARCHIVE_TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// Metadata about a backup
#[derive(Debug, Clone)]
pub struct BackupInfo {
    /// Backup filename
    pub filename: String,
    /// Full path to backup
    pub path: PathBuf,
    /// When the archive file was created
    pub created_at: DateTime<Utc>,
    /// Size in bytes
    pub size_bytes: u64,
}

/// Creates and rotates backups of a data folder
#[derive(Debug, Clone)]
pub struct BackupManager {
    /// Maximum number of archives kept (0 = unlimited)
    max_count: usize,
}

impl BackupManager {
    /// Create a manager keeping at most `max_count` archives
    pub fn new(max_count: usize) -> Self {
        Self { max_count }
    }

    /// Backup folder inside a data folder
    pub fn backup_dir(data_folder: &Path) -> PathBuf {
        data_folder.join(BACKUP_DIR_NAME)
    }

    /// Back up every file directly inside `data_folder`.
    ///
    /// Returns the path to the created archive.
    pub fn create_backup(&self, data_folder: Option<&Path>) -> TrackerResult<PathBuf> {
        self.create_backup_at(data_folder, Local::now().naive_local())
    }

    /// Same as [`BackupManager::create_backup`] with an explicit clock reading
    pub fn create_backup_at(
        &self,
        data_folder: Option<&Path>,
        now: NaiveDateTime,
    ) -> TrackerResult<PathBuf> {
        let data_folder = require_folder(data_folder)?;
        let backup_dir = Self::backup_dir(data_folder);

        fs::create_dir_all(&backup_dir).map_err(|e| {
            TrackerError::Io(format!("Failed to create backup directory: {}", e))
        })?;

        if self.max_count > 0 {
            evict_oldest(&backup_dir, self.max_count)?;
        }

        let staging = new_staging_dir()?;
        for entry in fs::read_dir(data_folder)? {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                fs::copy(entry.path(), staging.path().join(entry.file_name())).map_err(|e| {
                    TrackerError::Backup(format!(
                        "Failed to stage {}: {}",
                        entry.path().display(),
                        e
                    ))
                })?;
            }
        }

        let archive_path = unique_archive_path(&backup_dir, now);
        write_archive(staging.path(), &archive_path)?;

        tracing::info!(archive = %archive_path.display(), "Created backup");
        Ok(archive_path)
    }

    /// Non-blocking variant of [`BackupManager::create_backup`].
    ///
    /// Runs the same steps in the same order: rotation, staging copy,
    /// compression.
    pub async fn create_backup_async(&self, data_folder: Option<&Path>) -> TrackerResult<PathBuf> {
        let data_folder = require_folder(data_folder)?.to_path_buf();
        let backup_dir = Self::backup_dir(&data_folder);
        let now = Local::now().naive_local();

        tokio::fs::create_dir_all(&backup_dir).await.map_err(|e| {
            TrackerError::Io(format!("Failed to create backup directory: {}", e))
        })?;

        if self.max_count > 0 {
            let dir = backup_dir.clone();
            let max_count = self.max_count;
            tokio::task::spawn_blocking(move || evict_oldest(&dir, max_count))
                .await
                .map_err(|e| TrackerError::Backup(format!("Rotation task failed: {}", e)))??;
        }

        let staging = new_staging_dir()?;
        let mut entries = tokio::fs::read_dir(&data_folder).await?;
        while let Some(entry) = entries.next_entry().await? {
            if entry.file_type().await?.is_file() {
                tokio::fs::copy(entry.path(), staging.path().join(entry.file_name()))
                    .await
                    .map_err(|e| {
                        TrackerError::Backup(format!(
                            "Failed to stage {}: {}",
                            entry.path().display(),
                            e
                        ))
                    })?;
            }
        }

        let archive_path = unique_archive_path(&backup_dir, now);
        let target = archive_path.clone();
        // The staging dir moves into the task and is removed when it ends
        tokio::task::spawn_blocking(move || write_archive(staging.path(), &target))
            .await
            .map_err(|e| TrackerError::Backup(format!("Compression task failed: {}", e)))??;

        tracing::info!(archive = %archive_path.display(), "Created backup");
        Ok(archive_path)
    }

    /// List the archives of a data folder, oldest first
    pub fn list_backups(&self, data_folder: &Path) -> TrackerResult<Vec<BackupInfo>> {
        list_archives(&Self::backup_dir(data_folder))
    }
}

fn require_folder(data_folder: Option<&Path>) -> TrackerResult<&Path> {
    data_folder
        .filter(|p| !p.as_os_str().is_empty())
        .ok_or(TrackerError::EmptyDataFolder)
}

fn new_staging_dir() -> TrackerResult<TempDir> {
    TempDir::new()
        .map_err(|e| TrackerError::Backup(format!("Failed to create staging directory: {}", e)))
}

fn is_archive_name(name: &str) -> bool {
    name.starts_with(ARCHIVE_PREFIX) && name.ends_with(ARCHIVE_EXTENSION)
}

/// First free `Backup_{stamp}[_{n}].tar.gz` path
fn unique_archive_path(backup_dir: &Path, now: NaiveDateTime) -> PathBuf {
    let stamp = now.format(ARCHIVE_TIMESTAMP_FORMAT).to_string();
    let mut path = backup_dir.join(format!("{}{}{}", ARCHIVE_PREFIX, stamp, ARCHIVE_EXTENSION));
    let mut counter = 1;
    while path.exists() {
        path = backup_dir.join(format!(
            "{}{}_{}{}",
            ARCHIVE_PREFIX, stamp, counter, ARCHIVE_EXTENSION
        ));
        counter += 1;
    }
    path
}

/// Archives in `backup_dir`, sorted by creation time then name
fn list_archives(backup_dir: &Path) -> TrackerResult<Vec<BackupInfo>> {
    if !backup_dir.exists() {
        return Ok(Vec::new());
    }

    let mut backups = Vec::new();

    for entry in fs::read_dir(backup_dir)
        .map_err(|e| TrackerError::Io(format!("Failed to read backup directory: {}", e)))?
    {
        let entry =
            entry.map_err(|e| TrackerError::Io(format!("Failed to read directory entry: {}", e)))?;

        let filename = entry.file_name().to_string_lossy().into_owned();
        if !is_archive_name(&filename) {
            continue;
        }

        let metadata = entry.metadata()?;
        if !metadata.is_file() {
            continue;
        }

        let created: SystemTime = metadata
            .created()
            .or_else(|_| metadata.modified())
            .unwrap_or(SystemTime::UNIX_EPOCH);

        backups.push(BackupInfo {
            filename,
            path: entry.path(),
            created_at: created.into(),
            size_bytes: metadata.len(),
        });
    }

    backups.sort_by(|a, b| {
        a.created_at
            .cmp(&b.created_at)
            .then_with(|| a.filename.cmp(&b.filename))
    });

    Ok(backups)
}

/// Remove the oldest unlocked archives so one more fits under `max_count`.
///
/// Returns the removed paths.
fn evict_oldest(backup_dir: &Path, max_count: usize) -> TrackerResult<Vec<PathBuf>> {
    let backups = list_archives(backup_dir)?;
    let needed = (backups.len() + 1).saturating_sub(max_count);
    let mut removed = Vec::new();

    for backup in backups {
        if removed.len() >= needed {
            break;
        }

        if is_locked(&backup.path) {
            tracing::warn!(archive = %backup.path.display(), "Backup archive is locked, skipping");
            continue;
        }

        match fs::remove_file(&backup.path) {
            Ok(()) => {
                tracing::debug!(archive = %backup.path.display(), "Removed old backup");
                removed.push(backup.path);
            }
            Err(e) => {
                tracing::warn!(archive = %backup.path.display(), error = %e, "Failed to remove old backup");
            }
        }
    }

    if removed.len() < needed {
        tracing::warn!(
            needed,
            removed = removed.len(),
            "Not enough unlocked archives to stay under the backup limit"
        );
    }

    Ok(removed)
}

/// Whether another handle holds a lock on the archive
fn is_locked(path: &Path) -> bool {
    let file = match OpenOptions::new().read(true).write(true).open(path) {
        Ok(file) => file,
        Err(_) => return true,
    };

    match file.try_lock_exclusive() {
        Ok(()) => {
            let _ = FileExt::unlock(&file);
            false
        }
        Err(_) => true,
    }
}

/// Compress every file in `staging` into a new archive at `archive_path`.
///
/// A partially written archive is removed on failure.
fn write_archive(staging: &Path, archive_path: &Path) -> TrackerResult<()> {
    let result = build_archive(staging, archive_path);
    if result.is_err() {
        let _ = fs::remove_file(archive_path);
    }
    result.map_err(|e| TrackerError::Backup(format!("Failed to write archive: {}", e)))
}

fn build_archive(staging: &Path, archive_path: &Path) -> std::io::Result<()> {
    let mut names: Vec<_> = fs::read_dir(staging)?
        .map(|entry| entry.map(|e| e.file_name()))
        .collect::<Result<_, _>>()?;
    names.sort();

    let file = File::create(archive_path)?;
    let mut builder = tar::Builder::new(GzEncoder::new(file, Compression::default()));
    for name in names {
        builder.append_path_with_name(staging.join(&name), &name)?;
    }

    builder.into_inner()?.finish()?.sync_all()
}
