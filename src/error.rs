//! Configuration errors
//!
//! The simulation itself never fails: positions, hp and charge are clamped and
//! stale intents are dropped. Only loading tuning or level data can go wrong.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// JSON could not be parsed into the expected shape
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),

    /// A tuning value is outside the range the simulation can work with
    #[error("tuning value `{name}` = {value} must be {expected}")]
    OutOfRange {
        name: &'static str,
        value: f32,
        expected: &'static str,
    },

    /// The level table has no entries
    #[error("level table is empty")]
    NoLevels,

    /// A level entry is unusable
    #[error("level {level}: {reason}")]
    InvalidLevel { level: u32, reason: String },
}
