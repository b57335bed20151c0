//! Diff command
//!
//! Usage: fieldwise diff <ACTUAL> <EXPECTED> [--settings <FILE>] [--format text|json]

use super::document::load_document;
use super::Outcome;
use clap::{Args, ValueEnum};
use fieldwise_core::{assert_that, AssertionFailure, ComparisonDifference};
use serde_json::json;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Args)]
pub struct DiffArgs {
    /// Actual document (.json, .yaml, .yml or .toml)
    pub actual: PathBuf,

    /// Expected document
    pub expected: PathBuf,

    /// Settings file (TOML, YAML or JSON)
    #[arg(short, long)]
    pub settings: Option<PathBuf>,

    /// Report format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// Execute diff command
pub fn execute(args: DiffArgs) -> anyhow::Result<Outcome> {
    let configuration = super::configuration(args.settings.as_deref())?;
    let actual = load_document(&args.actual)?;
    let expected = load_document(&args.expected)?;
    tracing::debug!(
        actual = %args.actual.display(),
        expected = %args.expected.display(),
        "comparing documents"
    );

    let outcome = assert_that(&actual)
        .using_recursive_comparison_with(configuration)
        .check_equal_to(&expected);
    let differences = match outcome {
        Ok(()) => Vec::new(),
        Err(AssertionFailure::Differences {
            message,
            differences,
        }) => {
            if args.format == OutputFormat::Text {
                println!("{}", message.trim_start());
            }
            differences
        }
        Err(other) => return Err(other.into()),
    };

    match args.format {
        OutputFormat::Text if differences.is_empty() => {
            println!("The documents are equal when recursively comparing field by field.");
        }
        OutputFormat::Text => {}
        OutputFormat::Json => {
            let report = json!({
                "equal": differences.is_empty(),
                "differences": differences.iter().map(difference_report).collect::<Vec<_>>(),
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(if differences.is_empty() {
        Outcome::Equal
    } else {
        Outcome::Different
    })
}

fn difference_report(difference: &ComparisonDifference) -> serde_json::Value {
    let mut report = json!({
        "path": difference.path(),
        "actual": difference.actual(),
        "expected": difference.expected(),
    });
    if let Some(description) = difference.description() {
        report["description"] = json!(description);
    }
    if let Some(message) = difference.custom_message() {
        report["message"] = json!(message);
    }
    if let Some(key) = difference.key_difference() {
        report["key_difference"] = json!({
            "actual": key.actual_key,
            "expected": key.expected_key,
        });
    }
    report
}
