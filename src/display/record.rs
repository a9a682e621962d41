//! Record display formatting
//!
//! Register rows are numbered from 1 so the numbers can be passed back to
//! commands that take a selection.

use crate::models::{Record, TIMESTAMP_FORMAT};

const LOCATION_WIDTH: usize = 20;

/// Format a single record as a register row
pub fn format_record_row(index: usize, record: &Record) -> String {
    let location = if record.location.is_empty() {
        "-"
    } else {
        &record.location
    };

    let mut row = format!(
        "{:>4}  {}  {:>+10}  {:>12}  {}",
        index,
        record.timestamp.format(TIMESTAMP_FORMAT),
        record.change,
        record.amount,
        truncate(location, LOCATION_WIDTH)
    );
    if !record.note.is_empty() {
        row.push_str("  ");
        row.push_str(&record.note);
    }
    row
}

/// Format a page of records as a register.
///
/// `first_index` is the number shown for the first record.
pub fn format_record_register(records: &[Record], first_index: usize) -> String {
    if records.is_empty() {
        return "No records found.\n".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "{:>4}  {:19}  {:>10}  {:>12}  {:lw$}  {}\n",
        "#",
        "Time",
        "Change",
        "Amount",
        "Location",
        "Note",
        lw = LOCATION_WIDTH
    ));
    output.push_str(&"-".repeat(4 + 2 + 19 + 2 + 10 + 2 + 12 + 2 + LOCATION_WIDTH + 6));
    output.push('\n');

    for (offset, record) in records.iter().enumerate() {
        output.push_str(&format_record_row(first_index + offset, record));
        output.push('\n');
    }

    output
}

/// Format one record as a detail block
pub fn format_record_details(record: &Record) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "Time:     {}\n",
        record.timestamp.format(TIMESTAMP_FORMAT)
    ));
    output.push_str(&format!("Amount:   {}\n", record.amount));
    output.push_str(&format!("Change:   {:+}\n", record.change));

    if !record.location.is_empty() {
        output.push_str(&format!("Location: {}\n", record.location));
    }
    if !record.note.is_empty() {
        output.push_str(&format!("Note:     {}\n", record.note));
    }

    output
}

/// Pad or cut a string to exactly `width` characters
fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        format!("{:width$}", s, width = width)
    } else {
        let cut: String = s.chars().take(width.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample() -> Record {
        let ts = NaiveDate::from_ymd_opt(2024, 8, 1)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap();
        Record::new(ts, 1500, -250, "Limsa Lominsa", "Repair")
    }

    #[test]
    fn test_row_contains_fields() {
        let row = format_record_row(3, &sample());
        assert!(row.trim_start().starts_with('3'));
        assert!(row.contains("2024/08/01 09:30:00"));
        assert!(row.contains("-250"));
        assert!(row.contains("1500"));
        assert!(row.contains("Limsa Lominsa"));
        assert!(row.ends_with("Repair"));
    }

    #[test]
    fn test_positive_change_has_sign() {
        let mut record = sample();
        record.change = 40;
        assert!(format_record_row(1, &record).contains("+40"));
    }

    #[test]
    fn test_register_numbering() {
        let records = vec![sample(), sample()];
        let register = format_record_register(&records, 21);
        let lines: Vec<&str> = register.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[2].trim_start().starts_with("21"));
        assert!(lines[3].trim_start().starts_with("22"));
    }

    #[test]
    fn test_empty_register() {
        assert_eq!(format_record_register(&[], 1), "No records found.\n");
    }

    #[test]
    fn test_truncate_is_char_safe() {
        assert_eq!(truncate("ab", 4), "ab  ");
        assert_eq!(truncate("Ishgardé Foundation", 8), "Ishga...");
    }

    #[test]
    fn test_details_skip_empty_fields() {
        let mut record = sample();
        record.note.clear();
        let details = format_record_details(&record);
        assert!(details.contains("Change:   -250"));
        assert!(!details.contains("Note:"));
    }
}
