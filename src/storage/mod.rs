//! Storage layer
//!
//! Flat, human-readable log files: one file per (currency, container) pair,
//! one record per line. There is no index; lookups scan the file.

pub mod file_io;
pub mod log_store;
pub mod resolver;

pub use file_io::{append_lines, read_last_line, write_atomic_with, write_lines_atomic};
pub use log_store::LogStore;
pub use resolver::{sanitize_file_name, LogPathResolver};
