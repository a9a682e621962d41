//! Log CLI commands
//!
//! Selections are 1-based positions in the time-ordered listing printed by
//! `ctrack log list`, so a listing can be used directly to pick records.

use chrono::Local;
use clap::{Args, Subcommand};

use crate::config::TrackerPaths;
use crate::currency::CurrencyRegistry;
use crate::display::{format_record_details, format_record_register};
use crate::error::{TrackerError, TrackerResult};
use crate::models::{CharacterInfo, LogTarget, Record};
use crate::services::{sort_by_time, LogService, RecordEdit};

use super::resolve_currency;

/// Which log a command works on
#[derive(Args, Debug)]
pub struct LogSelector {
    /// Currency id or name
    currency: String,

    /// Container: inventory, retainer:<id>, saddlebag or premium-saddlebag
    #[arg(short, long, default_value = "inventory")]
    target: LogTarget,
}

/// Log subcommands
#[derive(Subcommand)]
pub enum LogCommands {
    /// Record a balance observation
    Add {
        #[command(flatten)]
        log: LogSelector,
        /// Balance after the event
        #[arg(allow_hyphen_values = true)]
        amount: i64,
        /// Change versus the previous record (default: difference to the latest record)
        #[arg(short, long, allow_hyphen_values = true)]
        change: Option<i64>,
        /// Where it happened
        #[arg(short, long, default_value = "")]
        location: String,
        /// Note
        #[arg(short, long)]
        note: Option<String>,
        /// Start the log over with just this record
        #[arg(long)]
        new: bool,
    },
    /// List records, oldest first
    List {
        #[command(flatten)]
        log: LogSelector,
        /// Page to show
        #[arg(short, long, default_value = "1")]
        page: usize,
        /// Show every record on one page
        #[arg(short, long)]
        all: bool,
    },
    /// Show the newest record
    Latest {
        #[command(flatten)]
        log: LogSelector,
        /// Read from another character instead of the active one
        #[arg(long, requires = "server")]
        character: Option<String>,
        /// Server of the other character
        #[arg(long, requires = "character")]
        server: Option<String>,
    },
    /// Change the location and/or note of selected records
    Edit {
        #[command(flatten)]
        log: LogSelector,
        /// Record numbers from the listing (comma-separated)
        #[arg(required = true, value_delimiter = ',')]
        records: Vec<usize>,
        /// New location
        #[arg(short, long)]
        location: Option<String>,
        /// New note
        #[arg(short, long)]
        note: Option<String>,
    },
    /// Sort the log by time
    Reorder {
        #[command(flatten)]
        log: LogSelector,
    },
    /// Collapse runs of small changes at the same location
    Merge {
        #[command(flatten)]
        log: LogSelector,
        /// Changes with an absolute value below this are merged
        #[arg(long)]
        threshold: i64,
        /// Never merge gains with losses
        #[arg(long)]
        one_way: bool,
    },
    /// Merge selected records into one
    MergeSelected {
        #[command(flatten)]
        log: LogSelector,
        /// Record numbers from the listing (comma-separated)
        #[arg(required = true, value_delimiter = ',')]
        records: Vec<usize>,
        /// Location of the merged record
        #[arg(short, long)]
        location: String,
        /// Note of the merged record (default: "merged N")
        #[arg(short, long)]
        note: Option<String>,
    },
}

/// Handle a log command
pub async fn handle_log_command(
    service: &LogService<'_>,
    registry: &CurrencyRegistry,
    paths: &TrackerPaths,
    records_per_page: usize,
    cmd: LogCommands,
) -> TrackerResult<()> {
    match cmd {
        LogCommands::Add {
            log,
            amount,
            change,
            location,
            note,
            new,
        } => {
            let id = resolve_currency(registry, &log.currency)?;

            let change = match change {
                Some(change) => change,
                None if new => amount,
                None => match service.load_latest(id, log.target)? {
                    Some(previous) => amount.saturating_sub(previous.amount),
                    None => amount,
                },
            };

            let record = Record::new(
                Local::now().naive_local(),
                amount,
                change,
                location,
                note.unwrap_or_default(),
            );

            if new {
                service.add_record(id, log.target, record.clone())?;
            } else {
                service.append_record(id, log.target, record.clone())?;
            }
            println!("Recorded: {}", record);
        }

        LogCommands::List { log, page, all } => {
            let id = resolve_currency(registry, &log.currency)?;
            let mut records = service.load_all_async(id, log.target).await?;
            sort_by_time(&mut records);

            let per_page = if all {
                records.len().max(1)
            } else {
                records_per_page.max(1)
            };
            let total_pages = records.len().div_ceil(per_page).max(1);
            let page = page.clamp(1, total_pages);
            let start = (page - 1) * per_page;
            let end = (start + per_page).min(records.len());

            print!("{}", format_record_register(&records[start..end], start + 1));
            if !records.is_empty() {
                println!(
                    "\nPage {}/{} ({} records)",
                    page,
                    total_pages,
                    records.len()
                );
            }
        }

        LogCommands::Latest {
            log,
            character,
            server,
        } => {
            let id = resolve_currency(registry, &log.currency)?;
            let latest = match (character, server) {
                (Some(name), Some(server)) => {
                    let other = CharacterInfo::new(name, server);
                    service.load_latest_for(paths, &other, id, log.target)?
                }
                _ => service.load_latest(id, log.target)?,
            };

            match latest {
                Some(record) => print!("{}", format_record_details(&record)),
                None => println!("No records found."),
            }
        }

        LogCommands::Edit {
            log,
            records,
            location,
            note,
        } => {
            let mut edit = RecordEdit::new();
            if let Some(location) = location {
                edit = edit.location(location);
            }
            if let Some(note) = note {
                edit = edit.note(note);
            }
            if edit.is_empty() {
                return Err(TrackerError::Validation(
                    "Nothing to change: pass --location and/or --note".into(),
                ));
            }

            let id = resolve_currency(registry, &log.currency)?;
            let selected = select_records(service, id, log.target, &records)?;
            let failed = service.edit_matching(id, log.target, &selected, &edit)?;

            println!("Edited {} record(s)", selected.len() - failed);
            if failed > 0 {
                println!("{} record(s) could not be found", failed);
            }
        }

        LogCommands::Reorder { log } => {
            let id = resolve_currency(registry, &log.currency)?;
            let count = service.reorder(id, log.target)?;
            println!("Reordered {} record(s)", count);
        }

        LogCommands::Merge {
            log,
            threshold,
            one_way,
        } => {
            if threshold <= 0 {
                return Err(TrackerError::Validation(
                    "Threshold must be greater than zero".into(),
                ));
            }

            let id = resolve_currency(registry, &log.currency)?;
            let count = service.merge_by_threshold(id, log.target, threshold, one_way)?;
            println!("Merged {} record(s)", count);
        }

        LogCommands::MergeSelected {
            log,
            records,
            location,
            note,
        } => {
            let id = resolve_currency(registry, &log.currency)?;
            let selected = select_records(service, id, log.target, &records)?;
            let count =
                service.merge_selected(id, log.target, &location, &selected, note.as_deref())?;

            if count == 0 {
                println!("Select at least two records to merge");
            } else {
                println!("Merged {} record(s)", count);
            }
        }
    }

    Ok(())
}

/// Look up listing positions in the time-ordered log
fn select_records(
    service: &LogService<'_>,
    currency_id: u32,
    target: LogTarget,
    positions: &[usize],
) -> TrackerResult<Vec<Record>> {
    let mut records = service.load_all(currency_id, target)?;
    sort_by_time(&mut records);
    pick(&records, positions)
}

fn pick(records: &[Record], positions: &[usize]) -> TrackerResult<Vec<Record>> {
    let mut positions = positions.to_vec();
    positions.sort_unstable();
    positions.dedup();

    positions
        .into_iter()
        .map(|position| {
            position
                .checked_sub(1)
                .and_then(|index| records.get(index))
                .cloned()
                .ok_or_else(|| {
                    TrackerError::Validation(format!(
                        "No record #{} (the log has {})",
                        position,
                        records.len()
                    ))
                })
        })
        .collect()
}
