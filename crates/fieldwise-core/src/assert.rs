//! Assertion facade.
//!
//! ```
//! use fieldwise_core::{assert_that, introspect_struct};
//!
//! struct Person {
//!     name: String,
//!     id: u64,
//! }
//!
//! introspect_struct!(Person { name, id });
//!
//! let actual = Person { name: "Ada".to_string(), id: 1 };
//! let expected = Person { name: "Ada".to_string(), id: 2 };
//!
//! assert_that(&actual)
//!     .using_recursive_comparison()
//!     .ignoring_fields(&["id"])
//!     .is_equal_to(&expected);
//! ```

use crate::calculator::RecursiveComparisonDifferenceCalculator;
use crate::comparators::ValueComparator;
use crate::configuration::{RecursiveComparisonConfiguration, RecursiveComparisonConfigurationBuilder};
use crate::difference::ComparisonDifference;
use crate::errors::FieldwiseError;
use crate::introspect::Introspect;
use crate::introspection_strategy::IntrospectionStrategy;
use crate::recursive_assertion::RecursiveAssertionAssert;
use crate::representation::{Representation, StandardRepresentation};
use std::sync::Arc;
use thiserror::Error;

/// Why an assertion failed
#[derive(Error, Debug, Clone)]
pub enum AssertionFailure {
    /// The recursive comparison found differences
    #[error("{message}")]
    Differences {
        message: String,
        differences: Vec<ComparisonDifference>,
    },

    /// Values were expected to differ but did not
    #[error("{message}")]
    NotDifferent { message: String },

    /// Some fields failed a recursive assertion
    #[error("{message}")]
    FieldsNotSatisfying { message: String, fields: Vec<String> },

    /// Plain equality failed
    #[error("{message}")]
    NotEqual { message: String },

    /// The comparison could not run
    #[error(transparent)]
    Configuration(#[from] FieldwiseError),
}

impl AssertionFailure {
    /// Differences behind the failure, empty for other kinds of failure
    pub fn differences(&self) -> &[ComparisonDifference] {
        match self {
            AssertionFailure::Differences { differences, .. } => differences,
            _ => &[],
        }
    }
}

fn describe(description: Option<&str>, message: String) -> String {
    match description {
        Some(description) => format!("[{}] {}", description, message),
        None => message,
    }
}

/// Entry point of every assertion
pub fn assert_that<T: Introspect>(actual: &T) -> ObjectAssert<'_, T> {
    ObjectAssert {
        actual,
        description: None,
    }
}

pub struct ObjectAssert<'a, T> {
    actual: &'a T,
    description: Option<String>,
}

impl<'a, T: Introspect> ObjectAssert<'a, T> {
    /// Prefix failure messages with `[description]`
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Plain `==` check
    #[track_caller]
    pub fn is_equal_to(&self, expected: &T) -> &Self
    where
        T: PartialEq,
    {
        if self.actual != expected {
            let representation = StandardRepresentation::new();
            let message = format!(
                "\nExpecting actual:\n  {}\nto be equal to:\n  {}\nbut was not.",
                representation.to_string_of(self.actual),
                representation.to_string_of(expected)
            );
            panic!("{}", describe(self.description.as_deref(), message));
        }
        self
    }

    /// Compare field by field instead of with `==`
    ///
    /// Optionals are transparent to field paths: the payloads of two `Some`
    /// values are compared at the optional's own location, so rules and
    /// reports name `email` rather than `email.value`. A comparator
    /// registered for the `email` field receives the `Option` itself.
    ///
    /// ```
    /// use fieldwise_core::{assert_that, introspect_struct};
    ///
    /// struct Contact {
    ///     email: Option<String>,
    /// }
    ///
    /// introspect_struct!(Contact { email });
    ///
    /// let actual = Contact { email: Some("ada@example.com".to_string()) };
    /// let expected = Contact { email: Some("ada@example.org".to_string()) };
    /// let differences = assert_that(&actual)
    ///     .using_recursive_comparison()
    ///     .differences(&expected)
    ///     .unwrap();
    /// assert_eq!(differences[0].path(), "email");
    /// ```
    pub fn using_recursive_comparison(self) -> RecursiveComparisonAssert<'a> {
        self.using_recursive_comparison_with(RecursiveComparisonConfiguration::new())
    }

    /// Recursive comparison starting from an existing configuration
    pub fn using_recursive_comparison_with(
        self,
        configuration: RecursiveComparisonConfiguration,
    ) -> RecursiveComparisonAssert<'a> {
        RecursiveComparisonAssert {
            actual: self.actual,
            builder: configuration.into(),
            calculator: RecursiveComparisonDifferenceCalculator::new(),
            description: self.description,
        }
    }

    /// Check a predicate on every field of actual
    pub fn using_recursive_assertion(self) -> RecursiveAssertionAssert<'a> {
        let assert = RecursiveAssertionAssert::new(self.actual);
        match self.description {
            Some(description) => assert.with_description(description),
            None => assert,
        }
    }
}

/// Recursive comparison of actual against an expected value
///
/// Configuration methods consume and return the assertion; the first
/// configuration error (e.g. an invalid regex) is reported when the
/// comparison runs.
#[derive(Clone)]
pub struct RecursiveComparisonAssert<'a> {
    actual: &'a dyn Introspect,
    builder: RecursiveComparisonConfigurationBuilder,
    calculator: RecursiveComparisonDifferenceCalculator,
    description: Option<String>,
}

impl<'a> RecursiveComparisonAssert<'a> {
    fn configure(
        mut self,
        update: impl FnOnce(RecursiveComparisonConfigurationBuilder) -> RecursiveComparisonConfigurationBuilder,
    ) -> Self {
        self.builder = update(self.builder);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Configuration the comparison runs with
    pub fn configuration(&self) -> Result<RecursiveComparisonConfiguration, FieldwiseError> {
        self.builder.clone().build()
    }

    pub fn with_strict_type_checking(self, strict: bool) -> Self {
        self.configure(|b| b.with_strict_type_checking(strict))
    }

    pub fn ignoring_actual_null_fields(self) -> Self {
        self.configure(|b| b.ignoring_actual_null_fields())
    }

    pub fn ignoring_actual_empty_optional_fields(self) -> Self {
        self.configure(|b| b.ignoring_actual_empty_optional_fields())
    }

    pub fn ignoring_expected_null_fields(self) -> Self {
        self.configure(|b| b.ignoring_expected_null_fields())
    }

    pub fn comparing_only_fields(self, fields: &[&str]) -> Self {
        self.configure(|b| b.comparing_only_fields(fields))
    }

    pub fn comparing_only_fields_of_type<T: ?Sized>(self) -> Self {
        self.configure(|b| b.comparing_only_fields_of_type::<T>())
    }

    pub fn ignoring_fields(self, fields: &[&str]) -> Self {
        self.configure(|b| b.ignoring_fields(fields))
    }

    pub fn ignoring_fields_matching_regexes(self, regexes: &[&str]) -> Self {
        self.configure(|b| b.ignoring_fields_matching_regexes(regexes))
    }

    pub fn ignoring_fields_of_type<T: ?Sized>(self) -> Self {
        self.configure(|b| b.ignoring_fields_of_type::<T>())
    }

    pub fn ignoring_fields_of_types_matching_regexes(self, regexes: &[&str]) -> Self {
        self.configure(|b| b.ignoring_fields_of_types_matching_regexes(regexes))
    }

    pub fn using_overridden_equals(self) -> Self {
        self.configure(|b| b.using_overridden_equals())
    }

    pub fn ignoring_overridden_equals_for_fields(self, fields: &[&str]) -> Self {
        self.configure(|b| b.ignoring_overridden_equals_for_fields(fields))
    }

    pub fn ignoring_overridden_equals_for_type<T: ?Sized>(self) -> Self {
        self.configure(|b| b.ignoring_overridden_equals_for_type::<T>())
    }

    pub fn ignoring_overridden_equals_for_fields_matching_regexes(self, regexes: &[&str]) -> Self {
        self.configure(|b| b.ignoring_overridden_equals_for_fields_matching_regexes(regexes))
    }

    pub fn ignoring_overridden_equals_for_types_matching_regexes(self, regexes: &[&str]) -> Self {
        self.configure(|b| b.ignoring_overridden_equals_for_types_matching_regexes(regexes))
    }

    pub fn ignoring_collection_order(self) -> Self {
        self.configure(|b| b.ignoring_collection_order())
    }

    pub fn ignoring_collection_order_in_fields(self, fields: &[&str]) -> Self {
        self.configure(|b| b.ignoring_collection_order_in_fields(fields))
    }

    pub fn ignoring_collection_order_in_fields_matching_regexes(self, regexes: &[&str]) -> Self {
        self.configure(|b| b.ignoring_collection_order_in_fields_matching_regexes(regexes))
    }

    pub fn with_comparator_for_type<T: ?Sized>(self, comparator: Arc<dyn ValueComparator>) -> Self {
        self.configure(|b| b.with_comparator_for_type::<T>(comparator))
    }

    pub fn with_equals_for_type<T: 'static>(
        self,
        equals: impl Fn(&T, &T) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.configure(|b| b.with_equals_for_type::<T>(equals))
    }

    pub fn with_comparator_for_fields(self, comparator: Arc<dyn ValueComparator>, fields: &[&str]) -> Self {
        self.configure(|b| b.with_comparator_for_fields(comparator, fields))
    }

    pub fn with_comparator_for_fields_matching_regexes(
        self,
        comparator: Arc<dyn ValueComparator>,
        regexes: &[&str],
    ) -> Self {
        self.configure(|b| b.with_comparator_for_fields_matching_regexes(comparator, regexes))
    }

    pub fn with_error_message_for_fields(self, message: &str, fields: &[&str]) -> Self {
        self.configure(|b| b.with_error_message_for_fields(message, fields))
    }

    pub fn with_error_message_for_type<T: ?Sized>(self, message: &str) -> Self {
        self.configure(|b| b.with_error_message_for_type::<T>(message))
    }

    pub fn treating_null_and_empty_iterables_as_equal(self) -> Self {
        self.configure(|b| b.treating_null_and_empty_iterables_as_equal())
    }

    pub fn with_enums_comparable_to_strings(self) -> Self {
        self.configure(|b| b.with_enums_comparable_to_strings())
    }

    pub fn with_introspection_strategy(self, strategy: Arc<dyn IntrospectionStrategy>) -> Self {
        self.configure(|b| b.with_introspection_strategy(strategy))
    }

    pub fn with_representation(self, representation: Arc<dyn Representation>) -> Self {
        self.configure(|b| b.with_representation(representation))
    }

    /// Differences between actual and `expected` under the current configuration
    pub fn differences<E: Introspect>(
        &self,
        expected: &E,
    ) -> Result<Vec<ComparisonDifference>, FieldwiseError> {
        let configuration = self.configuration()?;
        self.calculator
            .determine_differences(self.actual, expected, &configuration)
    }

    /// Panics with every difference found
    #[track_caller]
    pub fn is_equal_to<E: Introspect>(&self, expected: &E) -> &Self {
        if let Err(failure) = self.check_equal_to(expected) {
            panic!("{}", failure);
        }
        self
    }

    /// Panics when the comparison finds no difference
    #[track_caller]
    pub fn is_not_equal_to<E: Introspect>(&self, expected: &E) -> &Self {
        if let Err(failure) = self.check_not_equal_to(expected) {
            panic!("{}", failure);
        }
        self
    }

    /// Non-panicking [`is_equal_to`](Self::is_equal_to)
    pub fn check_equal_to<E: Introspect>(&self, expected: &E) -> Result<(), AssertionFailure> {
        let configuration = self.configuration()?;
        let differences = self
            .calculator
            .determine_differences(self.actual, expected, &configuration)?;
        if differences.is_empty() {
            return Ok(());
        }
        let message = self.differences_message(expected, &differences, &configuration);
        Err(AssertionFailure::Differences {
            message: describe(self.description.as_deref(), message),
            differences,
        })
    }

    /// Non-panicking [`is_not_equal_to`](Self::is_not_equal_to)
    pub fn check_not_equal_to<E: Introspect>(&self, expected: &E) -> Result<(), AssertionFailure> {
        let configuration = self.configuration()?;
        let differences = self
            .calculator
            .determine_differences(self.actual, expected, &configuration)?;
        if !differences.is_empty() {
            return Ok(());
        }
        let representation = configuration.representation();
        let message = format!(
            "\nExpecting actual:\n  {}\nnot to be equal to:\n  {}\nwhen recursively comparing field by field\n\nThe recursive comparison was performed with this configuration:\n{}",
            representation.to_string_of(self.actual),
            representation.to_string_of(expected),
            configuration.multi_line_description()
        );
        Err(AssertionFailure::NotDifferent {
            message: describe(self.description.as_deref(), message),
        })
    }

    fn differences_message(
        &self,
        expected: &dyn Introspect,
        differences: &[ComparisonDifference],
        configuration: &RecursiveComparisonConfiguration,
    ) -> String {
        let representation = configuration.representation();
        let header = if differences.len() == 1 {
            "the following difference:".to_string()
        } else {
            format!("the following {} differences:", differences.len())
        };
        let blocks: Vec<String> = differences
            .iter()
            .map(ComparisonDifference::multi_line_description)
            .collect();
        format!(
            "\nExpecting actual:\n  {}\nto be equal to:\n  {}\nwhen recursively comparing field by field, but found {}\n\n{}\n\nThe recursive comparison was performed with this configuration:\n{}",
            representation.to_string_of(self.actual),
            representation.to_string_of(expected),
            header,
            blocks.join("\n\n"),
            configuration.multi_line_description()
        )
    }
}
