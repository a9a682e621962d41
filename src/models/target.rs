//! Container targets
//!
//! Every currency keeps one log per container. Only retainers carry an
//! instance id; the other containers exist once per character.

use std::fmt;
use std::str::FromStr;

use crate::error::TrackerError;

/// Container category without payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerCategory {
    Inventory,
    Retainer,
    SaddleBag,
    PremiumSaddleBag,
}

/// The container a log belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LogTarget {
    /// The character's own inventory
    #[default]
    Inventory,
    /// A retainer, identified by its retainer id
    Retainer(u64),
    /// Chocobo saddlebag
    SaddleBag,
    /// Premium chocobo saddlebag
    PremiumSaddleBag,
}

impl LogTarget {
    /// Get the payload-free category
    pub fn category(&self) -> ContainerCategory {
        match self {
            Self::Inventory => ContainerCategory::Inventory,
            Self::Retainer(_) => ContainerCategory::Retainer,
            Self::SaddleBag => ContainerCategory::SaddleBag,
            Self::PremiumSaddleBag => ContainerCategory::PremiumSaddleBag,
        }
    }

    /// File-name suffix appended after the currency name
    pub fn file_suffix(&self) -> String {
        match self {
            Self::Inventory => String::new(),
            Self::Retainer(id) => format!("_{}", id),
            Self::SaddleBag => "_SB".to_string(),
            Self::PremiumSaddleBag => "_PSB".to_string(),
        }
    }
}

impl fmt::Display for LogTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inventory => write!(f, "inventory"),
            Self::Retainer(id) => write!(f, "retainer:{}", id),
            Self::SaddleBag => write!(f, "saddlebag"),
            Self::PremiumSaddleBag => write!(f, "premium-saddlebag"),
        }
    }
}

impl FromStr for LogTarget {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        if let Some(id) = lower.strip_prefix("retainer:") {
            return id
                .parse()
                .map(Self::Retainer)
                .map_err(|_| TrackerError::Validation(format!("Invalid retainer id: {}", id)));
        }

        match lower.as_str() {
            "inventory" | "inv" => Ok(Self::Inventory),
            "saddlebag" | "sb" => Ok(Self::SaddleBag),
            "premium-saddlebag" | "psb" => Ok(Self::PremiumSaddleBag),
            _ => Err(TrackerError::Validation(format!(
                "Unknown container '{}'. Use inventory, retainer:<id>, saddlebag or premium-saddlebag",
                s
            ))),
        }
    }
}
