//! Declarative comparison settings loaded from files and the environment.
//!
//! Sources are layered from lowest to highest precedence:
//! 1. built-in defaults
//! 2. the settings file (TOML, YAML or JSON, chosen by extension)
//! 3. environment variables with the `FIELDWISE__` prefix, e.g.
//!    `FIELDWISE__STRICT_TYPE_CHECKING=true`
//!
//! Per-field entries are lists of objects rather than maps keyed by field
//! path, since dotted keys would be split into nested tables.

use crate::errors::{FieldwiseError, Result};
use crate::{log_op_end, log_op_error, log_op_start};
use config as cfg;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Instant;

pub const ENV_PREFIX: &str = "FIELDWISE";
const ENV_SEPARATOR: &str = "__";

/// Strategy used to find the fields of compared values
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntrospectionSetting {
    #[default]
    Fields,
    SnakeOrCamelCaseFields,
}

/// Custom failure message for some fields or types
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageSetting {
    pub targets: Vec<String>,
    pub message: String,
}

/// Numeric tolerance for some fields
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToleranceSetting {
    pub fields: Vec<String>,
    pub precision: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComparisonSettings {
    pub strict_type_checking: bool,
    pub ignore_all_actual_null_fields: bool,
    pub ignore_all_actual_empty_optional_fields: bool,
    pub ignore_all_expected_null_fields: bool,
    pub compared_fields: Vec<String>,
    pub compared_types: Vec<String>,
    pub ignored_fields: Vec<String>,
    pub ignored_fields_regexes: Vec<String>,
    pub ignored_types: Vec<String>,
    pub ignored_types_regexes: Vec<String>,
    pub ignore_collection_order: bool,
    pub ignored_collection_order_in_fields: Vec<String>,
    pub ignored_collection_order_in_fields_regexes: Vec<String>,
    pub treat_null_and_empty_iterables_as_equal: bool,
    pub allow_comparing_enum_against_string: bool,
    pub introspection: IntrospectionSetting,
    pub field_messages: Vec<MessageSetting>,
    pub type_messages: Vec<MessageSetting>,
    pub field_tolerances: Vec<ToleranceSetting>,
}

impl ComparisonSettings {
    /// Reject settings that can't produce a sensible configuration
    pub fn validate(&self) -> Result<()> {
        if let Some(tolerance) = self
            .field_tolerances
            .iter()
            .find(|t| !(t.precision >= 0.0 && t.precision.is_finite()))
        {
            return Err(FieldwiseError::InvalidSettings {
                reason: format!(
                    "precision for {:?} must be a finite non-negative number, got {}",
                    tolerance.fields, tolerance.precision
                ),
            });
        }
        if let Some(entry) = self
            .field_messages
            .iter()
            .chain(self.type_messages.iter())
            .find(|m| m.targets.is_empty())
        {
            return Err(FieldwiseError::InvalidSettings {
                reason: format!("message {:?} has no targets", entry.message),
            });
        }
        Ok(())
    }
}

/// Load settings from `path` (when given) layered over defaults and under
/// `FIELDWISE__*` environment variables
pub fn load_settings(path: Option<&Path>) -> Result<ComparisonSettings> {
    let start = Instant::now();
    log_op_start!("load_settings", path = ?path);
    match build_settings(path) {
        Ok(settings) => {
            log_op_end!(
                "load_settings",
                duration_ms = start.elapsed().as_millis() as u64
            );
            Ok(settings)
        }
        Err(err) => {
            log_op_error!(
                "load_settings",
                err.clone(),
                duration_ms = start.elapsed().as_millis() as u64
            );
            Err(err)
        }
    }
}

fn build_settings(path: Option<&Path>) -> Result<ComparisonSettings> {
    let mut builder = cfg::Config::builder();
    if let Some(path) = path {
        if !path.exists() {
            return Err(FieldwiseError::Io {
                path: path.display().to_string(),
                reason: "settings file not found".to_string(),
            });
        }
        builder = builder.add_source(cfg::File::from(path).required(true));
    }
    builder = builder.add_source(
        cfg::Environment::with_prefix(ENV_PREFIX)
            .prefix_separator(ENV_SEPARATOR)
            .separator(ENV_SEPARATOR)
            .try_parsing(true),
    );

    let settings: ComparisonSettings = builder.build()?.try_deserialize()?;
    settings.validate()?;
    Ok(settings)
}
