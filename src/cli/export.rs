//! CLI command for exporting a log
//!
//! Writes the time-ordered records of one log to the `Exported` folder of
//! the active data folder.

use clap::Args;

use crate::currency::CurrencyRegistry;
use crate::error::TrackerResult;
use crate::export::{ExportFormat, Exporter};
use crate::models::LogTarget;
use crate::services::{sort_by_time, LogService};

use super::resolve_currency;

/// Export arguments
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Currency id or name
    currency: String,

    /// Container: inventory, retainer:<id>, saddlebag or premium-saddlebag
    #[arg(short, long, default_value = "inventory")]
    target: LogTarget,

    /// Output format: csv or md (default: the configured format)
    #[arg(short, long)]
    format: Option<ExportFormat>,

    /// Prefix for the output file name
    #[arg(short, long)]
    name: Option<String>,
}

/// Handle the export command
pub fn handle_export_command(
    service: &LogService<'_>,
    exporter: &Exporter<'_>,
    registry: &CurrencyRegistry,
    default_format: ExportFormat,
    args: ExportArgs,
) -> TrackerResult<()> {
    let id = resolve_currency(registry, &args.currency)?;
    let mut records = service.load_all(id, args.target)?;
    sort_by_time(&mut records);

    let format = args.format.unwrap_or(default_format);
    let path = exporter.export(&records, args.name.as_deref(), id, format)?;

    println!("Exported {} record(s) to:", records.len());
    println!("  {}", path.display());
    Ok(())
}
