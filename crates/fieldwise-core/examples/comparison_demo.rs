//! Recursive Comparison Demonstration
//!
//! Key concepts illustrated:
//! 1. Field by field comparison of two graphs
//! 2. Ignore rules and collection order
//! 3. Per-field comparators and messages
//! 4. Recursive assertions over every field
#![allow(clippy::unwrap_used, clippy::expect_used)]

use fieldwise_core::introspect::resolve;
use fieldwise_core::{
    assert_that, introspect_struct, FloatTolerance, Node, OptionalAssertionPolicy,
};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq)]
struct Sample {
    label: String,
    reading: f64,
    tags: Vec<String>,
    operator: Option<String>,
}

introspect_struct!(Sample {
    label,
    reading,
    tags,
    operator
});

fn sample() -> Sample {
    Sample {
        label: "probe-1".to_string(),
        reading: 20.5,
        tags: vec!["lab".to_string(), "north".to_string()],
        operator: Some("ada".to_string()),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Fieldwise Recursive Comparison Demo ===\n");

    // ===== Part 1: Reporting differences =====
    println!("## Part 1: Differences\n");

    let actual = sample();
    let mut expected = sample();
    expected.reading = 20.52;
    expected.tags.reverse();

    let failure = assert_that(&actual)
        .using_recursive_comparison()
        .check_equal_to(&expected)
        .unwrap_err();
    println!("{}\n", failure);

    // ===== Part 2: Relaxing the comparison =====
    println!("## Part 2: Tolerance and collection order\n");

    assert_that(&actual)
        .using_recursive_comparison()
        .ignoring_collection_order()
        .with_comparator_for_fields(Arc::new(FloatTolerance::new(0.05)), &["reading"])
        .is_equal_to(&expected);
    println!("✓ Equal within 0.05 when tag order is ignored\n");

    // ===== Part 3: Messages for specific fields =====
    println!("## Part 3: Field messages\n");

    expected.label = "probe-2".to_string();
    let differences = assert_that(&actual)
        .using_recursive_comparison()
        .ignoring_fields(&["reading", "tags"])
        .with_error_message_for_fields("labels identify the probe", &["label"])
        .differences(&expected)?;
    for difference in &differences {
        println!("{}\n", difference.multi_line_description());
    }

    // ===== Part 4: Recursive assertion =====
    println!("## Part 4: Recursive assertion\n");

    let mut anonymous = sample();
    anonymous.operator = None;
    let failure = assert_that(&anonymous)
        .using_recursive_assertion()
        .with_optional_assertion_policy(OptionalAssertionPolicy::OptionalObjectAndValue)
        .check_all_fields_satisfy(|value| match resolve(value).node() {
            Node::Optional(inner) => inner.is_some(),
            _ => true,
        });
    match failure {
        Ok(()) => println!("✓ Every field satisfied the predicate"),
        Err(failure) => println!("{}", failure),
    }

    Ok(())
}
