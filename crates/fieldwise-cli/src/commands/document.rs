//! Documents to compare, parsed by file extension

use anyhow::{Context, Result};
use fieldwise_core::FieldwiseError;
use serde_json::Value;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Yaml,
    Toml,
}

impl DocumentFormat {
    pub fn from_path(path: &Path) -> Result<Self, FieldwiseError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        match extension.as_str() {
            "json" => Ok(DocumentFormat::Json),
            "yaml" | "yml" => Ok(DocumentFormat::Yaml),
            "toml" => Ok(DocumentFormat::Toml),
            _ => Err(FieldwiseError::UnsupportedFormat { extension }),
        }
    }
}

/// Parse `content` into a JSON value
pub fn parse_document(content: &str, format: DocumentFormat) -> Result<Value> {
    let value: Value = match format {
        DocumentFormat::Json => serde_json::from_str(content)?,
        DocumentFormat::Yaml => serde_yaml::from_str(content)?,
        DocumentFormat::Toml => {
            let table: toml::Value = toml::from_str(content)?;
            serde_json::to_value(table)?
        }
    };
    Ok(value)
}

pub fn load_document(path: &Path) -> Result<Value> {
    let format = DocumentFormat::from_path(path)?;
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read \"{}\"", path.display()))?;
    parse_document(&content, format)
        .with_context(|| format!("failed to parse \"{}\"", path.display()))
}
