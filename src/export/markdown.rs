//! Markdown export
//!
//! A title line naming the currency, then a table with one row per record.

use std::io::Write;

use crate::error::{TrackerError, TrackerResult};
use crate::lang::{Localizer, EXPORT_MD_HEADER, EXPORT_MD_TITLE};
use crate::models::{Record, TIMESTAMP_FORMAT};

/// Write records as a Markdown table
pub fn export_records_markdown<W: Write + ?Sized>(
    records: &[Record],
    writer: &mut W,
    currency_name: &str,
    localizer: &dyn Localizer,
) -> TrackerResult<()> {
    let map_err = |e: std::io::Error| TrackerError::Export(e.to_string());

    writeln!(
        writer,
        "{} {}\n\n{}",
        localizer.text(EXPORT_MD_TITLE, 0),
        currency_name,
        localizer.text(EXPORT_MD_HEADER, 0)
    )
    .map_err(map_err)?;

    for record in records {
        writeln!(
            writer,
            "| {} | {} | {} | {} | {} |",
            record.timestamp.format(TIMESTAMP_FORMAT),
            record.amount,
            record.change,
            escape_cell(&record.location),
            escape_cell(&record.note)
        )
        .map_err(map_err)?;
    }

    Ok(())
}

/// Keep cell text from breaking the table
fn escape_cell(s: &str) -> String {
    s.replace('|', "\\|").replace(['\n', '\r'], " ")
}
