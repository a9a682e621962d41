//! Core data models
//!
//! Records, the containers they are logged against, and the characters that
//! own the data folders.

pub mod character;
pub mod record;
pub mod target;

pub use character::CharacterInfo;
pub use record::{Record, TIMESTAMP_FORMAT};
pub use target::{ContainerCategory, LogTarget};
