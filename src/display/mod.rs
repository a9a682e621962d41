//! Display formatting for terminal output
//!
//! Provides utilities for formatting records, currencies and backups as
//! plain-text tables.

pub mod backup;
pub mod currency;
pub mod record;

pub use backup::format_backup_list;
pub use currency::format_currency_list;
pub use record::{format_record_details, format_record_register, format_record_row};
