pub mod describe;
pub mod diff;
pub mod document;

use anyhow::Result;
use fieldwise_core::{load_settings, RecursiveComparisonConfiguration};
use std::path::Path;

/// Result of a command that succeeded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Equal,
    Different,
}

impl Outcome {
    pub fn exit_code(self) -> i32 {
        match self {
            Outcome::Equal => 0,
            Outcome::Different => 1,
        }
    }
}

/// Configuration from the settings file (if any) and `FIELDWISE__*` variables
pub fn configuration(settings: Option<&Path>) -> Result<RecursiveComparisonConfiguration> {
    let settings = load_settings(settings)?;
    Ok(RecursiveComparisonConfiguration::from_settings(&settings)?)
}
