//! Differences found by the recursive comparison.

use crate::dual_value::DualValue;
use crate::field_location::FieldLocation;
use crate::introspect::Introspect;
use crate::representation::{to_string_of_option, Representation};
use std::cmp::Ordering;

/// Keys of a sorted map that differ at the same position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComparisonKeyDifference {
    pub actual_key: String,
    pub expected_key: String,
}

/// A mismatch at one location of the compared graphs
///
/// Values are rendered when the difference is created, so a difference
/// outlives the compared values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComparisonDifference {
    location: FieldLocation,
    actual: String,
    expected: String,
    description: Option<String>,
    custom_message: Option<String>,
    key_difference: Option<ComparisonKeyDifference>,
}

impl ComparisonDifference {
    pub fn new(location: FieldLocation, actual: String, expected: String) -> Self {
        Self {
            location,
            actual,
            expected,
            description: None,
            custom_message: None,
            key_difference: None,
        }
    }

    /// Render both sides of `dual_value`; when they render the same the type
    /// names are added so the report stays readable
    pub fn from_dual_value(dual_value: &DualValue<'_>, representation: &dyn Representation) -> Self {
        let mut actual = to_string_of_option(representation, dual_value.actual);
        let mut expected = to_string_of_option(representation, dual_value.expected);
        if actual == expected {
            if let (Some(a), Some(e)) = (dual_value.actual, dual_value.expected) {
                actual = representation.unambiguous_to_string_of(a);
                expected = representation.unambiguous_to_string_of(e);
            }
        }
        Self::new(dual_value.location.clone(), actual, expected)
    }

    pub fn root(
        actual: &dyn Introspect,
        expected: &dyn Introspect,
        representation: &dyn Representation,
    ) -> Self {
        Self::from_dual_value(&DualValue::root(actual, expected), representation)
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_custom_message(mut self, message: impl Into<String>) -> Self {
        self.custom_message = Some(message.into());
        self
    }

    pub fn with_key_difference(
        mut self,
        actual_key: impl Into<String>,
        expected_key: impl Into<String>,
    ) -> Self {
        self.key_difference = Some(ComparisonKeyDifference {
            actual_key: actual_key.into(),
            expected_key: expected_key.into(),
        });
        self
    }

    pub fn location(&self) -> &FieldLocation {
        &self.location
    }

    /// Full path with element segments, e.g. `friends.[1].name`
    pub fn path(&self) -> String {
        self.location.path_in_report()
    }

    pub fn actual(&self) -> &str {
        &self.actual
    }

    pub fn expected(&self) -> &str {
        &self.expected
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn custom_message(&self) -> Option<&str> {
        self.custom_message.as_deref()
    }

    pub fn key_difference(&self) -> Option<&ComparisonKeyDifference> {
        self.key_difference.as_ref()
    }

    /// Report block for this difference
    ///
    /// ```text
    /// field/property 'address.street' differ:
    /// - actual value  : "Main St"
    /// - expected value: "High St"
    /// ```
    pub fn multi_line_description(&self) -> String {
        if let Some(message) = &self.custom_message {
            return message.clone();
        }
        let mut out = String::new();
        out.push_str(&self.header());
        out.push('\n');
        out.push_str(&format!("- actual value  : {}\n", self.actual));
        out.push_str(&format!("- expected value: {}", self.expected));
        if let Some(description) = &self.description {
            out.push('\n');
            out.push_str(description);
        }
        if let Some(key) = &self.key_difference {
            out.push_str("\nmap key difference:\n");
            out.push_str(&format!("- actual key  : {}\n", key.actual_key));
            out.push_str(&format!("- expected key: {}", key.expected_key));
        }
        out
    }

    fn header(&self) -> String {
        let segments = self.location.decomposed_path();
        match segments {
            [] => "Top level actual and expected objects differ:".to_string(),
            [element] if element.starts_with('[') => format!(
                "Top level actual and expected objects element at index {} differ:",
                element.trim_start_matches('[').trim_end_matches(']')
            ),
            _ => format!("field/property '{}' differ:", self.location.path_in_report()),
        }
    }
}

impl Ord for ComparisonDifference {
    fn cmp(&self, other: &Self) -> Ordering {
        self.location
            .cmp(&other.location)
            .then_with(|| self.description.cmp(&other.description))
            .then_with(|| self.actual.cmp(&other.actual))
            .then_with(|| self.expected.cmp(&other.expected))
    }
}

impl PartialOrd for ComparisonDifference {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
