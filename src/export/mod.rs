//! Export module for the currency tracker
//!
//! Renders a record sequence into a file under `{data folder}/Exported`:
//! - CSV: header row plus one comma-separated row per record
//! - Markdown: a title line followed by a table

pub mod csv;
pub mod markdown;

pub use csv::export_records_csv;
pub use markdown::export_records_markdown;

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::config::paths::EXPORT_DIR_NAME;
use crate::currency::CurrencyNames;
use crate::error::{TrackerError, TrackerResult};
use crate::lang::Localizer;
use crate::models::Record;
use crate::storage::{write_atomic_with, LogPathResolver, LogStore};

/// Timestamp layout used in export file names
pub const EXPORT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d--%H-%M-%S";

/// Supported export formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Comma-separated values
    #[default]
    Csv,
    /// Markdown table
    Markdown,
}

impl ExportFormat {
    /// File extension, without the dot
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Markdown => "md",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Csv => write!(f, "csv"),
            Self::Markdown => write!(f, "markdown"),
        }
    }
}

impl FromStr for ExportFormat {
    type Err = TrackerError;

    /// Accepts names and the legacy numeric codes (`0` = CSV, `1` = Markdown)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "csv" | "0" => Ok(Self::Csv),
            "md" | "markdown" | "1" => Ok(Self::Markdown),
            other => Err(TrackerError::UnsupportedExportFormat(other.to_string())),
        }
    }
}

/// Writes export files for the active data folder
pub struct Exporter<'a> {
    store: &'a LogStore,
    names: &'a dyn CurrencyNames,
    localizer: &'a dyn Localizer,
}

impl<'a> Exporter<'a> {
    pub fn new(
        store: &'a LogStore,
        names: &'a dyn CurrencyNames,
        localizer: &'a dyn Localizer,
    ) -> Self {
        Self {
            store,
            names,
            localizer,
        }
    }

    /// Export `records` and return the path of the written file
    pub fn export(
        &self,
        records: &[Record],
        hint: Option<&str>,
        currency_id: u32,
        format: ExportFormat,
    ) -> TrackerResult<PathBuf> {
        self.export_at(records, hint, currency_id, format, Local::now().naive_local())
    }

    /// Same as [`Exporter::export`] with an explicit clock reading
    pub fn export_at(
        &self,
        records: &[Record],
        hint: Option<&str>,
        currency_id: u32,
        format: ExportFormat,
        now: NaiveDateTime,
    ) -> TrackerResult<PathBuf> {
        let data_folder = self.store.data_folder()?;
        let display_name = self
            .names
            .display_name(currency_id)
            .ok_or(TrackerError::UnknownCurrency(currency_id))?;
        let file_stem = LogPathResolver::new(self.names).currency_name(currency_id)?;

        let stamp = now.format(EXPORT_TIMESTAMP_FORMAT);
        let file_name = match hint.map(str::trim).filter(|h| !h.is_empty()) {
            Some(hint) => format!(
                "{}_{}_{}.{}",
                crate::storage::sanitize_file_name(hint),
                file_stem,
                stamp,
                format.extension()
            ),
            None => format!("{}_{}.{}", file_stem, stamp, format.extension()),
        };
        let path = data_folder.join(EXPORT_DIR_NAME).join(file_name);

        write_atomic_with(&path, |writer| match format {
            ExportFormat::Csv => export_records_csv(records, writer, self.localizer),
            ExportFormat::Markdown => {
                export_records_markdown(records, writer, &display_name, self.localizer)
            }
        })
        .map_err(|e| TrackerError::Export(format!("Failed to write {}: {}", path.display(), e)))?;

        tracing::info!(path = %path.display(), count = records.len(), %format, "Exported records");
        Ok(path)
    }
}
