//! Character identity
//!
//! Each character owns one data folder named after it.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A player character whose logs are tracked
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CharacterInfo {
    /// Character name
    pub name: String,
    /// Home server
    pub server: String,
}

impl CharacterInfo {
    /// Create a new character info
    pub fn new(name: impl Into<String>, server: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            server: server.into(),
        }
    }

    /// Name of the character's data folder, before sanitizing
    pub fn folder_name(&self) -> String {
        format!("{}_{}", self.name, self.server)
    }
}

impl fmt::Display for CharacterInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.name, self.server)
    }
}
