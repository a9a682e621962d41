//! Log path resolution
//!
//! Log files are named `{CurrencyName}{suffix}.txt`:
//!
//! | Container          | File name              |
//! |--------------------|------------------------|
//! | Inventory          | `{Currency}.txt`       |
//! | Retainer           | `{Currency}_{id}.txt`  |
//! | Saddlebag          | `{Currency}_SB.txt`    |
//! | Premium saddlebag  | `{Currency}_PSB.txt`   |
//!
//! The derived name is sanitized before any I/O happens.

use std::path::{Path, PathBuf};

use crate::currency::CurrencyNames;
use crate::error::{TrackerError, TrackerResult};
use crate::models::LogTarget;

/// Extension of log files
pub const LOG_EXTENSION: &str = "txt";

const ILLEGAL_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

const RESERVED_NAMES: &[&str] = &[
    "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
    "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
];

/// Make a single path component safe on every supported filesystem.
///
/// Illegal and control characters become `_`, trailing dots and spaces are
/// dropped, and device names reserved on Windows get a `_` prefix.
pub fn sanitize_file_name(name: &str) -> String {
    let replaced: String = name
        .chars()
        .map(|c| {
            if ILLEGAL_CHARS.contains(&c) || c.is_control() {
                '_'
            } else {
                c
            }
        })
        .collect();

    let trimmed = replaced.trim_end_matches(['.', ' ']);
    if trimmed.is_empty() {
        return "_".to_string();
    }

    let stem = trimmed.split('.').next().unwrap_or(trimmed);
    if RESERVED_NAMES
        .iter()
        .any(|reserved| reserved.eq_ignore_ascii_case(stem))
    {
        return format!("_{}", trimmed);
    }

    trimmed.to_string()
}

/// Maps (currency, container) pairs to log file paths
pub struct LogPathResolver<'a> {
    names: &'a dyn CurrencyNames,
}

impl<'a> LogPathResolver<'a> {
    /// Create a resolver backed by a currency name lookup
    pub fn new(names: &'a dyn CurrencyNames) -> Self {
        Self { names }
    }

    /// Sanitized log file name for a currency and container
    pub fn file_name(&self, currency_id: u32, target: LogTarget) -> TrackerResult<String> {
        let currency_name = self
            .names
            .display_name(currency_id)
            .ok_or(TrackerError::UnknownCurrency(currency_id))?;

        Ok(format!(
            "{}.{}",
            sanitize_file_name(&format!("{}{}", currency_name, target.file_suffix())),
            LOG_EXTENSION
        ))
    }

    /// Full log path inside `data_folder`
    pub fn resolve(
        &self,
        data_folder: &Path,
        currency_id: u32,
        target: LogTarget,
    ) -> TrackerResult<PathBuf> {
        Ok(data_folder.join(self.file_name(currency_id, target)?))
    }

    /// Sanitized display name of a currency, for export file names
    pub fn currency_name(&self, currency_id: u32) -> TrackerResult<String> {
        self.names
            .display_name(currency_id)
            .map(|name| sanitize_file_name(&name))
            .ok_or(TrackerError::UnknownCurrency(currency_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn names() -> BTreeMap<u32, String> {
        let mut names = BTreeMap::new();
        names.insert(1, "Gil".to_string());
        names.insert(28, "Allagan Tomestone: Poetics".to_string());
        names
    }

    #[test]
    fn test_resolve_suffixes() {
        let names = names();
        let resolver = LogPathResolver::new(&names);
        let folder = Path::new("/data/Alphinaud_Omega");

        assert_eq!(
            resolver.resolve(folder, 1, LogTarget::Inventory).unwrap(),
            folder.join("Gil.txt")
        );
        assert_eq!(
            resolver.resolve(folder, 1, LogTarget::Retainer(9001)).unwrap(),
            folder.join("Gil_9001.txt")
        );
        assert_eq!(
            resolver.file_name(1, LogTarget::SaddleBag).unwrap(),
            "Gil_SB.txt"
        );
        assert_eq!(
            resolver.file_name(1, LogTarget::PremiumSaddleBag).unwrap(),
            "Gil_PSB.txt"
        );
    }

    #[test]
    fn test_resolve_sanitizes_currency_name() {
        let names = names();
        let resolver = LogPathResolver::new(&names);
        assert_eq!(
            resolver.file_name(28, LogTarget::Inventory).unwrap(),
            "Allagan Tomestone_ Poetics.txt"
        );
    }

    #[test]
    fn test_unknown_currency() {
        let names = names();
        let resolver = LogPathResolver::new(&names);
        let err = resolver.file_name(999, LogTarget::Inventory).unwrap_err();
        assert!(matches!(err, TrackerError::UnknownCurrency(999)));
    }

    #[test]
    fn test_distinct_targets_give_distinct_files() {
        let names = names();
        let resolver = LogPathResolver::new(&names);
        let targets = [
            LogTarget::Inventory,
            LogTarget::Retainer(1),
            LogTarget::Retainer(2),
            LogTarget::SaddleBag,
            LogTarget::PremiumSaddleBag,
        ];
        let mut files: Vec<String> = targets
            .iter()
            .map(|t| resolver.file_name(1, *t).unwrap())
            .collect();
        files.sort();
        files.dedup();
        assert_eq!(files.len(), targets.len());
    }

    #[test]
    fn test_sanitize_file_name() {
        assert_eq!(sanitize_file_name("a/b\\c"), "a_b_c");
        assert_eq!(sanitize_file_name("tab\there"), "tab_here");
        assert_eq!(sanitize_file_name("dots..."), "dots");
        assert_eq!(sanitize_file_name("..."), "_");
        assert_eq!(sanitize_file_name("con"), "_con");
        assert_eq!(sanitize_file_name("Gil"), "Gil");
    }
}
