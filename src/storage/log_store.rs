//! Log store
//!
//! Read/write primitives over single log files inside the active data
//! folder. Every primitive fails with `DataFolderUnavailable` when no data
//! folder is configured.

use std::path::{Path, PathBuf};

use crate::error::{TrackerError, TrackerResult};
use crate::models::Record;

use super::file_io::{append_lines, read_last_line, read_text, write_lines_atomic};

/// Access to the log files of one data folder
#[derive(Debug, Clone)]
pub struct LogStore {
    data_folder: Option<PathBuf>,
}

impl LogStore {
    /// Create a store for a data folder (`None` when no character is active)
    pub fn new(data_folder: Option<PathBuf>) -> Self {
        let data_folder = data_folder.filter(|p| !p.as_os_str().is_empty());
        Self { data_folder }
    }

    /// Get the data folder, or fail if none is configured
    pub fn data_folder(&self) -> TrackerResult<&Path> {
        match &self.data_folder {
            Some(folder) => Ok(folder),
            None => {
                tracing::warn!("Player data folder is missing");
                Err(TrackerError::DataFolderUnavailable)
            }
        }
    }

    /// Load every record of a log, skipping malformed lines.
    ///
    /// A missing file is an empty log.
    pub fn load_all(&self, path: &Path) -> TrackerResult<Vec<Record>> {
        self.data_folder()?;

        Ok(match read_text(path)? {
            Some(text) => parse_records(&text, path),
            None => Vec::new(),
        })
    }

    /// Non-blocking variant of [`LogStore::load_all`]
    pub async fn load_all_async(&self, path: &Path) -> TrackerResult<Vec<Record>> {
        self.data_folder()?;

        match tokio::fs::read(path).await {
            Ok(bytes) => Ok(parse_records(&String::from_utf8_lossy(&bytes), path)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(TrackerError::Storage(format!(
                "Failed to read {}: {}",
                path.display(),
                e
            ))),
        }
    }

    /// Read only the last record of a log
    pub fn load_latest(&self, path: &Path) -> TrackerResult<Option<Record>> {
        self.data_folder()?;

        let Some(line) = read_last_line(path)? else {
            return Ok(None);
        };

        match Record::parse_line(&line) {
            Ok(record) => Ok(Some(record)),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Last log line is unreadable");
                Ok(None)
            }
        }
    }

    /// Replace the whole log with `records`, in the given order
    pub fn rewrite(&self, path: &Path, records: &[Record]) -> TrackerResult<()> {
        self.data_folder()?;

        write_lines_atomic(path, records.iter().map(Record::to_line))?;
        tracing::debug!(path = %path.display(), count = records.len(), "Rewrote log");
        Ok(())
    }

    /// Add `records` after the current last line
    pub fn append(&self, path: &Path, records: &[Record]) -> TrackerResult<()> {
        self.data_folder()?;

        append_lines(path, records.iter().map(Record::to_line))?;
        tracing::debug!(path = %path.display(), count = records.len(), "Appended to log");
        Ok(())
    }
}

/// Parse log text line by line; malformed lines are logged and skipped
pub fn parse_records(text: &str, path: &Path) -> Vec<Record> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .filter_map(|(index, line)| match Record::parse_line(line) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    line = index + 1,
                    error = %e,
                    "Skipping malformed record"
                );
                None
            }
        })
        .collect()
}
