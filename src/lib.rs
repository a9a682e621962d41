//! Currency Tracker - plain-text transaction logs for in-game currencies
//!
//! This library provides the core functionality for the `ctrack` command.
//! Every (currency, container) pair of a character owns one line-oriented
//! text log. The library reads, appends, edits, merges and reorders those
//! logs, exports them to CSV or Markdown and backs up whole data folders
//! into rotating archives.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Path management and persisted settings
//! - `error`: Custom error types
//! - `models`: Records, container targets and characters
//! - `currency`: Currency display-name registry
//! - `lang`: Localized strings for notes and exports
//! - `storage`: Log file I/O and path resolution
//! - `services`: Log operations (edit, merge, reorder)
//! - `export`: CSV and Markdown export
//! - `backup`: Rotating data folder backups
//! - `display`: Terminal formatting
//! - `cli`: Command handlers for the `ctrack` binary
//!
//! # Example
//!
//! ```rust,ignore
//! use currency_tracker::config::{Settings, TrackerPaths};
//! use currency_tracker::currency::CurrencyRegistry;
//! use currency_tracker::lang::EnglishLocalizer;
//! use currency_tracker::models::LogTarget;
//! use currency_tracker::services::LogService;
//! use currency_tracker::storage::LogStore;
//!
//! let paths = TrackerPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let registry = CurrencyRegistry::from_settings(&settings);
//! let store = LogStore::new(paths.data_folder(settings.active_character.as_ref()));
//! let service = LogService::new(&store, &registry, &EnglishLocalizer);
//!
//! let merged = service.merge_by_threshold(1, LogTarget::Inventory, 500, true)?;
//! ```

pub mod backup;
pub mod cli;
pub mod config;
pub mod currency;
pub mod display;
pub mod error;
pub mod export;
pub mod lang;
pub mod logging;
pub mod models;
pub mod services;
pub mod storage;

pub use error::{TrackerError, TrackerResult};
