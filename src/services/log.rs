//! Log operations
//!
//! Higher-level edits over one log file: edit by match, append, reorder and
//! the two merge flavours. Records are located by value, so every lookup is
//! a linear scan of the file. That is fine for logs of a few thousand lines
//! but grows O(n) per selected record.
//!
//! Each operation loads the file, works in memory and writes the result back
//! once. Callers must not run two mutating operations on the same log at the
//! same time.

use std::path::PathBuf;

use crate::config::TrackerPaths;
use crate::currency::CurrencyNames;
use crate::error::TrackerResult;
use crate::lang::{Localizer, MERGED_NOTE};
use crate::models::{CharacterInfo, LogTarget, Record};
use crate::storage::{LogPathResolver, LogStore};

/// Field replacements for [`LogService::edit_matching`]
#[derive(Debug, Clone, Default)]
pub struct RecordEdit {
    /// New location, if it should change
    pub location: Option<String>,
    /// New note, if it should change
    pub note: Option<String>,
}

impl RecordEdit {
    /// Create an edit that changes nothing
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the location
    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Replace the note
    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// Check if the edit changes nothing
    pub fn is_empty(&self) -> bool {
        self.location.is_none() && self.note.is_none()
    }

    fn apply(&self, record: &mut Record) {
        if let Some(location) = &self.location {
            record.location = location.clone();
        }
        if let Some(note) = &self.note {
            record.note = note.clone();
        }
    }
}

/// Service for log operations
pub struct LogService<'a> {
    store: &'a LogStore,
    resolver: LogPathResolver<'a>,
    localizer: &'a dyn Localizer,
}

impl<'a> LogService<'a> {
    /// Create a new log service
    pub fn new(
        store: &'a LogStore,
        names: &'a dyn CurrencyNames,
        localizer: &'a dyn Localizer,
    ) -> Self {
        Self {
            store,
            resolver: LogPathResolver::new(names),
            localizer,
        }
    }

    /// Path of the log for a currency and container
    pub fn log_path(&self, currency_id: u32, target: LogTarget) -> TrackerResult<PathBuf> {
        let folder = self.store.data_folder()?;
        self.resolver.resolve(folder, currency_id, target)
    }

    /// Load every record of a log
    pub fn load_all(&self, currency_id: u32, target: LogTarget) -> TrackerResult<Vec<Record>> {
        let path = self.log_path(currency_id, target)?;
        self.store.load_all(&path)
    }

    /// Non-blocking variant of [`LogService::load_all`]
    pub async fn load_all_async(
        &self,
        currency_id: u32,
        target: LogTarget,
    ) -> TrackerResult<Vec<Record>> {
        let path = self.log_path(currency_id, target)?;
        self.store.load_all_async(&path).await
    }

    /// Load the newest record of a log
    pub fn load_latest(&self, currency_id: u32, target: LogTarget) -> TrackerResult<Option<Record>> {
        let path = self.log_path(currency_id, target)?;
        self.store.load_latest(&path)
    }

    /// Load the newest record from another character's data folder
    pub fn load_latest_for(
        &self,
        paths: &TrackerPaths,
        character: &CharacterInfo,
        currency_id: u32,
        target: LogTarget,
    ) -> TrackerResult<Option<Record>> {
        let store = LogStore::new(Some(paths.character_dir(character)));
        let path = self
            .resolver
            .resolve(store.data_folder()?, currency_id, target)?;
        store.load_latest(&path)
    }

    /// Apply `edit` to every record equal to one of `selected`.
    ///
    /// Returns the number of selected records that were not found.
    pub fn edit_matching(
        &self,
        currency_id: u32,
        target: LogTarget,
        selected: &[Record],
        edit: &RecordEdit,
    ) -> TrackerResult<usize> {
        if selected.is_empty() {
            return Ok(0);
        }

        let path = self.log_path(currency_id, target)?;
        let mut records = self.store.load_all(&path)?;
        let mut failed = 0;

        for wanted in selected {
            match records.iter_mut().find(|r| **r == *wanted) {
                Some(record) => edit.apply(record),
                None => failed += 1,
            }
        }

        if failed < selected.len() && !edit.is_empty() {
            self.store.rewrite(&path, &records)?;
        }

        tracing::info!(
            currency_id,
            container = %target,
            edited = selected.len() - failed,
            failed,
            "Edited records"
        );
        Ok(failed)
    }

    /// Append one observation to the end of a log
    pub fn append_record(
        &self,
        currency_id: u32,
        target: LogTarget,
        record: Record,
    ) -> TrackerResult<()> {
        let path = self.log_path(currency_id, target)?;
        self.store.append(&path, std::slice::from_ref(&record))
    }

    /// Start a log with a single record, replacing any previous content
    pub fn add_record(&self, currency_id: u32, target: LogTarget, record: Record) -> TrackerResult<()> {
        let path = self.log_path(currency_id, target)?;
        self.store.rewrite(&path, std::slice::from_ref(&record))?;
        tracing::info!(currency_id, container = %target, "Created log");
        Ok(())
    }

    /// Sort a log by timestamp, keeping the file order of equal timestamps.
    ///
    /// Returns the number of records in the log.
    pub fn reorder(&self, currency_id: u32, target: LogTarget) -> TrackerResult<usize> {
        let path = self.log_path(currency_id, target)?;
        let mut records = self.store.load_all(&path)?;
        if records.is_empty() {
            return Ok(0);
        }

        sort_by_time(&mut records);
        self.store.rewrite(&path, &records)?;
        Ok(records.len())
    }

    /// Collapse runs of small same-location changes.
    ///
    /// Returns the merge count, which adds 2 per absorbed record (anchor plus
    /// absorbed). See [`merge_runs`].
    pub fn merge_by_threshold(
        &self,
        currency_id: u32,
        target: LogTarget,
        threshold: i64,
        one_way: bool,
    ) -> TrackerResult<usize> {
        let path = self.log_path(currency_id, target)?;
        let mut records = self.store.load_all(&path)?;
        if records.len() <= 1 {
            return Ok(0);
        }

        sort_by_time(&mut records);
        let (mut merged, count) = merge_runs(records, threshold, one_way, |n| {
            self.localizer.text(MERGED_NOTE, n)
        });
        sort_by_time(&mut merged);
        self.store.rewrite(&path, &merged)?;

        tracing::info!(
            currency_id,
            container = %target,
            threshold,
            one_way,
            merged = count,
            remaining = merged.len(),
            "Merged records by threshold"
        );
        Ok(count)
    }

    /// Replace the selected records with one record at `location`.
    ///
    /// Changes are summed and the newest selected record supplies amount and
    /// timestamp. The note is `note` if given, otherwise a "merged N" text.
    /// Returns the number of records merged; fewer than two matches leave
    /// the log untouched and return 0.
    pub fn merge_selected(
        &self,
        currency_id: u32,
        target: LogTarget,
        location: &str,
        selected: &[Record],
        note: Option<&str>,
    ) -> TrackerResult<usize> {
        if selected.len() <= 1 {
            return Ok(0);
        }

        let path = self.log_path(currency_id, target)?;
        let mut records = self.store.load_all(&path)?;

        let mut combined: Option<Record> = None;
        let mut count = 0;

        for wanted in selected {
            let Some(index) = records.iter().position(|r| r == wanted) else {
                continue;
            };
            let found = records.remove(index);
            match combined.as_mut() {
                Some(acc) => acc.absorb(&found),
                None => combined = Some(found),
            }
            count += 1;
        }

        let Some(mut combined) = combined.filter(|_| count > 1) else {
            return Ok(0);
        };

        combined.location = location.to_string();
        combined.note = match note {
            Some(note) => note.to_string(),
            None => self.localizer.text(MERGED_NOTE, count),
        };

        records.push(combined);
        sort_by_time(&mut records);
        self.store.rewrite(&path, &records)?;

        tracing::info!(currency_id, container = %target, merged = count, "Merged selected records");
        Ok(count)
    }
}

/// Stable sort by timestamp, oldest first
pub fn sort_by_time(records: &mut [Record]) {
    records.sort_by_key(|r| r.timestamp);
}

/// Fold runs of records into their first record (the anchor).
///
/// A record is absorbed while it has the anchor's location, its absolute
/// change is below `threshold` and, in one-way mode, its change has the same
/// sign as the anchor's running change. Absorbing sums the change and takes
/// the amount and timestamp of the newer record. An anchor that absorbed
/// anything gets the note produced by `note_for(records folded, anchor
/// included)`.
///
/// The returned count grows by 2 for every absorbed record.
pub fn merge_runs<F>(records: Vec<Record>, threshold: i64, one_way: bool, note_for: F) -> (Vec<Record>, usize)
where
    F: Fn(usize) -> String,
{
    let mut merged = Vec::with_capacity(records.len());
    let mut count = 0;
    let mut iter = records.into_iter().peekable();

    while let Some(mut anchor) = iter.next() {
        let mut absorbed = 0;

        while let Some(next) = iter.next_if(|next| can_absorb(&anchor, next, threshold, one_way)) {
            anchor.absorb(&next);
            absorbed += 1;
            count += 2;
        }

        if absorbed > 0 {
            anchor.note = note_for(absorbed + 1);
        }
        merged.push(anchor);
    }

    (merged, count)
}

fn can_absorb(anchor: &Record, next: &Record, threshold: i64, one_way: bool) -> bool {
    threshold > 0
        && next.location == anchor.location
        && next.change.unsigned_abs() < threshold.unsigned_abs()
        && (!one_way || anchor.same_direction(next))
}
