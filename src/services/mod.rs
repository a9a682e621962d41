//! Service layer
//!
//! Operations built on top of the log store.

pub mod log;

pub use log::{merge_runs, sort_by_time, LogService, RecordEdit};
