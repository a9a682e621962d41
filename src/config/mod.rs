//! Configuration module
//!
//! - Base directory and per-character data folder resolution
//! - User settings persistence

pub mod paths;
pub mod settings;

pub use paths::TrackerPaths;
pub use settings::{Dirty, Settings};
