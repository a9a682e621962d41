//! Localized text
//!
//! Human-readable strings written into logs and exports come from a
//! [`Localizer`], keyed by template name plus a count parameter.

/// Synthetic note written by merge operations
pub const MERGED_NOTE: &str = "MergedNote";
/// Header row of CSV exports
pub const EXPORT_CSV_HEADER: &str = "ExportCsvHeader";
/// Title prefix of Markdown exports
pub const EXPORT_MD_TITLE: &str = "ExportMarkdownTitle";
/// Table header and separator rows of Markdown exports
pub const EXPORT_MD_HEADER: &str = "ExportMarkdownHeader";

/// Provider of localized strings
pub trait Localizer {
    /// Render the template `key`, substituting `{n}` with `count`
    fn text(&self, key: &str, count: usize) -> String;
}

/// Built-in English strings
#[derive(Debug, Clone, Copy, Default)]
pub struct EnglishLocalizer;

impl Localizer for EnglishLocalizer {
    fn text(&self, key: &str, count: usize) -> String {
        let template = match key {
            MERGED_NOTE => "merged {n}",
            EXPORT_CSV_HEADER => "Time,Amount,Change,Location,Note",
            EXPORT_MD_TITLE => "# Transaction log:",
            EXPORT_MD_HEADER => {
                "| Time | Amount | Change | Location | Note |\n| --- | --- | --- | --- | --- |"
            }
            other => other,
        };
        template.replace("{n}", &count.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merged_note() {
        assert_eq!(EnglishLocalizer.text(MERGED_NOTE, 3), "merged 3");
    }

    #[test]
    fn test_unknown_key_falls_back_to_key() {
        assert_eq!(EnglishLocalizer.text("NoSuchKey", 0), "NoSuchKey");
    }
}
