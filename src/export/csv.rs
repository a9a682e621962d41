//! CSV export
//!
//! Header row from the localizer, then one comma-separated row per record.

use std::io::Write;

use crate::error::{TrackerError, TrackerResult};
use crate::lang::{Localizer, EXPORT_CSV_HEADER};
use crate::models::{Record, TIMESTAMP_FORMAT};

/// Write records as CSV
pub fn export_records_csv<W: Write + ?Sized>(
    records: &[Record],
    writer: &mut W,
    localizer: &dyn Localizer,
) -> TrackerResult<()> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    let header = localizer.text(EXPORT_CSV_HEADER, 0);
    csv_writer
        .write_record(header.split(','))
        .map_err(|e| TrackerError::Export(e.to_string()))?;

    for record in records {
        csv_writer
            .write_record([
                record.timestamp.format(TIMESTAMP_FORMAT).to_string(),
                record.amount.to_string(),
                record.change.to_string(),
                record.location.clone(),
                record.note.clone(),
            ])
            .map_err(|e| TrackerError::Export(e.to_string()))?;
    }

    csv_writer
        .flush()
        .map_err(|e| TrackerError::Export(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::EnglishLocalizer;
    use chrono::NaiveDate;

    #[test]
    fn test_export_records_csv() {
        let ts = NaiveDate::from_ymd_opt(2024, 2, 29)
            .unwrap()
            .and_hms_opt(23, 59, 1)
            .unwrap();
        let records = vec![
            Record::new(ts, 1200, 200, "Limsa Lominsa", ""),
            Record::new(ts, 1000, -200, "Old Sharlayan", "teleport, return"),
        ];

        let mut output = Vec::new();
        export_records_csv(&records, &mut output, &EnglishLocalizer).unwrap();

        let text = String::from_utf8(output).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Time,Amount,Change,Location,Note");
        assert_eq!(lines[1], "2024/02/29 23:59:01,1200,200,Limsa Lominsa,");
        assert_eq!(
            lines[2],
            "2024/02/29 23:59:01,1000,-200,Old Sharlayan,\"teleport, return\""
        );
    }
}
