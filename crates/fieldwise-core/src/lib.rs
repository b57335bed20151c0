//! Fieldwise Core - recursive structural comparison of value graphs
//!
//! This crate provides the comparison kernel used by the `fieldwise` test
//! assertions and CLI, including:
//! - A type-erased introspection model ([`Introspect`], [`Node`]) with impls for
//!   the standard library and `serde_json::Value`
//! - The recursive comparison configuration (ignore rules, comparators,
//!   collection order, strict type checking)
//! - The difference calculator walking two graphs in lockstep with cycle detection
//! - The assertion facade (`assert_that(&x).using_recursive_comparison()...`)
//! - The recursive assertion driver checking a predicate on every field
//! - Settings loading through the `config` crate

pub mod assert;
pub mod calculator;
pub mod comparators;
pub mod configuration;
pub mod difference;
pub mod dual_value;
pub mod errors;
pub mod field_location;
pub mod introspect;
pub mod introspection_strategy;
pub mod logging_facility;
pub mod recursive_assertion;
pub mod representation;
pub mod settings;

// Re-exported for the logging macros
pub use fieldwise_core_types;

// Re-export commonly used types
pub use assert::{assert_that, AssertionFailure, ObjectAssert, RecursiveComparisonAssert};
pub use calculator::RecursiveComparisonDifferenceCalculator;
pub use comparators::{FloatTolerance, NodeEquals, TypedEquals, TypedOrdering, ValueComparator};
pub use configuration::RecursiveComparisonConfiguration;
pub use difference::{ComparisonDifference, ComparisonKeyDifference};
pub use errors::{ExError, ExErrorKind, FieldwiseError, Result};
pub use field_location::FieldLocation;
pub use introspect::{Field, Introspect, Node, SeqKind};
pub use recursive_assertion::{
    CollectionAssertionPolicy, MapAssertionPolicy, OptionalAssertionPolicy,
    RecursiveAssertionAssert, RecursiveAssertionConfiguration,
};
pub use settings::{load_settings, ComparisonSettings};
