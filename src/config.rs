use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::{Result, UnishoxError};

/// What to do when a code lands on an unpopulated character slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnmappedSlots {
    /// Consume the code and emit nothing.
    #[default]
    Skip,
    /// Fail the decode with [`UnishoxError::UnmappedSlot`].
    Reject,
}

/// Runtime configuration for the decoder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Cap on nested cross-buffer back-references. `None` leaves depth
    /// bounded only by the reference chains present in the table.
    pub max_nesting: Option<usize>,
    /// Policy for table gaps.
    pub unmapped_slots: UnmappedSlots,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_nesting: None,
            unmapped_slots: UnmappedSlots::Skip,
        }
    }
}

impl Config {
    /// Parse a configuration from JSON. Missing fields keep their defaults.
    pub fn from_json(text: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read a JSON configuration file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_nesting == Some(0) {
            // Even a single cross-buffer reference needs one level.
            return Err(UnishoxError::Config("max_nesting must be at least 1".into()));
        }
        Ok(())
    }
}
