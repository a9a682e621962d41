//! Transaction record model
//!
//! One balance observation, stored as one line of a log file. The line is a
//! `;`-delimited list of five fields: timestamp, amount, change, location and
//! note. Free-text fields are quoted only when they contain the delimiter or
//! a quote; line breaks inside them are flattened to spaces so that a record
//! always occupies exactly one physical line.

use chrono::{NaiveDateTime, Timelike};
use std::fmt;
use std::str::FromStr;

use crate::error::{TrackerError, TrackerResult};

/// Timestamp layout used on disk and in exports
pub const TIMESTAMP_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

const FIELD_DELIMITER: u8 = b';';
const FIELD_COUNT: usize = 5;

/// A logged balance observation
///
/// Two records are equal when all five fields are equal. Edit and merge
/// operations use this to find a caller-held copy inside a loaded file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// When the balance was observed (second precision)
    pub timestamp: NaiveDateTime,

    /// Balance after the event
    pub amount: i64,

    /// Signed delta versus the previous record
    pub change: i64,

    /// Where the event happened (may be empty)
    pub location: String,

    /// Free-text annotation (may be empty)
    pub note: String,
}

impl Record {
    /// Create a new record, truncating the timestamp to whole seconds
    pub fn new(
        timestamp: NaiveDateTime,
        amount: i64,
        change: i64,
        location: impl Into<String>,
        note: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: timestamp.with_nanosecond(0).unwrap_or(timestamp),
            amount,
            change,
            location: location.into(),
            note: normalize_note(&note.into()),
        }
    }

    /// Check whether `other` moves the balance in the same direction.
    ///
    /// Zero counts as a positive change.
    pub fn same_direction(&self, other: &Record) -> bool {
        (self.change >= 0) == (other.change >= 0)
    }

    /// Fold `other` into this record.
    ///
    /// Changes are summed. Amount and timestamp are taken from `other` only
    /// when it is strictly newer, so equal timestamps keep this record's
    /// values.
    pub fn absorb(&mut self, other: &Record) {
        if other.timestamp > self.timestamp {
            self.amount = other.amount;
            self.timestamp = other.timestamp;
        }
        self.change = self.change.saturating_add(other.change);
    }

    /// Serialize to a single log line (without the line terminator)
    pub fn to_line(&self) -> String {
        let delimiter = FIELD_DELIMITER as char;
        format!(
            "{ts}{d}{amount}{d}{change}{d}{location}{d}{note}",
            ts = self.timestamp.format(TIMESTAMP_FORMAT),
            d = delimiter,
            amount = self.amount,
            change = self.change,
            location = escape_field(&self.location),
            note = escape_field(&normalize_note(&self.note)),
        )
    }

    /// Parse a single log line
    pub fn parse_line(line: &str) -> TrackerResult<Self> {
        let line = line.trim_end_matches(['\r', '\n']);
        if line.trim().is_empty() {
            return Err(TrackerError::malformed("empty line"));
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .delimiter(FIELD_DELIMITER)
            .flexible(true)
            .from_reader(line.as_bytes());

        let mut fields = csv::StringRecord::new();
        let found = reader
            .read_record(&mut fields)
            .map_err(|e| TrackerError::malformed(e.to_string()))?;
        if !found {
            return Err(TrackerError::malformed("empty line"));
        }

        if fields.len() != FIELD_COUNT {
            return Err(TrackerError::malformed(format!(
                "expected {} fields, found {}",
                FIELD_COUNT,
                fields.len()
            )));
        }

        let timestamp = NaiveDateTime::parse_from_str(fields[0].trim(), TIMESTAMP_FORMAT)
            .map_err(|e| TrackerError::malformed(format!("bad timestamp '{}': {}", &fields[0], e)))?;
        let amount = parse_integer(&fields[1], "amount")?;
        let change = parse_integer(&fields[2], "change")?;

        Ok(Self {
            timestamp,
            amount,
            change,
            location: fields[3].to_string(),
            note: normalize_note(&fields[4]),
        })
    }
}

impl FromStr for Record {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_line(s)
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {:>+} -> {} @ {}",
            self.timestamp.format(TIMESTAMP_FORMAT),
            self.change,
            self.amount,
            if self.location.is_empty() {
                "-"
            } else {
                &self.location
            }
        )
    }
}

fn parse_integer(field: &str, name: &str) -> TrackerResult<i64> {
    field
        .trim()
        .parse()
        .map_err(|_| TrackerError::malformed(format!("bad {} '{}'", name, field)))
}

/// Whitespace-only notes are stored as empty
fn normalize_note(note: &str) -> String {
    if note.trim().is_empty() {
        String::new()
    } else {
        note.to_string()
    }
}

/// Escape a free-text field for the log line format
fn escape_field(s: &str) -> String {
    let flat: String = s
        .chars()
        .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
        .collect();

    if flat.contains(FIELD_DELIMITER as char) || flat.contains('"') {
        format!("\"{}\"", flat.replace('"', "\"\""))
    } else {
        flat
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    #[test]
    fn test_line_round_trip() {
        let record = Record::new(at(12, 30, 5), 1500, -250, "Limsa Lominsa", "Repair");
        let line = record.to_line();
        assert_eq!(line, "2024/03/09 12:30:05;1500;-250;Limsa Lominsa;Repair");
        assert_eq!(Record::parse_line(&line).unwrap(), record);
    }

    #[test]
    fn test_round_trip_with_delimiters_and_quotes() {
        let record = Record::new(at(1, 2, 3), 7, 7, "Gridania; Old", "said \"hi\"");
        let line = record.to_line();
        assert_eq!(Record::parse_line(&line).unwrap(), record);
    }

    #[test]
    fn test_empty_fields_round_trip() {
        let record = Record::new(at(0, 0, 0), 0, 0, "", "");
        let parsed: Record = record.to_line().parse().unwrap();
        assert_eq!(parsed, record);
    }

    #[test]
    fn test_whitespace_note_normalizes_to_empty() {
        let record = Record {
            timestamp: at(1, 0, 0),
            amount: 10,
            change: 10,
            location: "A".into(),
            note: "   ".into(),
        };
        let parsed = Record::parse_line(&record.to_line()).unwrap();
        assert_eq!(parsed.note, "");
    }

    #[test]
    fn test_line_breaks_are_flattened() {
        let record = Record::new(at(1, 0, 0), 10, 10, "A", "two\nlines");
        let line = record.to_line();
        assert!(!line.contains('\n'));
        assert_eq!(Record::parse_line(&line).unwrap().note, "two lines");
    }

    #[test]
    fn test_subsecond_precision_is_dropped() {
        let ts = at(4, 5, 6).with_nanosecond(123_000_000).unwrap();
        let record = Record::new(ts, 1, 1, "", "");
        assert_eq!(record.timestamp, at(4, 5, 6));
    }

    #[test]
    fn test_malformed_lines() {
        assert!(Record::parse_line("").unwrap_err().is_malformed());
        assert!(Record::parse_line("2024/03/09 12:30:05;1;2")
            .unwrap_err()
            .is_malformed());
        assert!(Record::parse_line("yesterday;1;2;A;B")
            .unwrap_err()
            .is_malformed());
        assert!(Record::parse_line("2024/03/09 12:30:05;lots;2;A;B")
            .unwrap_err()
            .is_malformed());
    }

    #[test]
    fn test_absorb_takes_newer_amount() {
        let mut anchor = Record::new(at(1, 0, 0), 100, 100, "A", "");
        anchor.absorb(&Record::new(at(2, 0, 0), 80, -20, "A", ""));
        assert_eq!(anchor.amount, 80);
        assert_eq!(anchor.change, 80);
        assert_eq!(anchor.timestamp, at(2, 0, 0));
    }

    #[test]
    fn test_absorb_equal_timestamp_keeps_anchor() {
        let mut anchor = Record::new(at(1, 0, 0), 100, 5, "A", "");
        anchor.absorb(&Record::new(at(1, 0, 0), 999, 5, "A", ""));
        assert_eq!(anchor.amount, 100);
        assert_eq!(anchor.change, 10);
    }

    #[test]
    fn test_same_direction() {
        let zero = Record::new(at(1, 0, 0), 0, 0, "", "");
        let up = Record::new(at(1, 0, 0), 0, 5, "", "");
        let down = Record::new(at(1, 0, 0), 0, -5, "", "");
        assert!(zero.same_direction(&up));
        assert!(!up.same_direction(&down));
        assert!(!zero.same_direction(&down));
    }
}
