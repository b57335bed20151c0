//! Recursive Comparison Tests
//!
//! End-to-end scenarios through the assertion facade.
//!
//! ## Scenarios Covered
//!
//! 1. Equal graphs, lenient vs strict type checking
//! 2. Ignored fields, regexes, types and null fields
//! 3. Collections, sets and maps
//! 4. Cyclic graphs
//! 5. Custom comparators and messages
//! 6. Overridden equals and its exceptions
//! 7. Failure report layout

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{person, ring, team, Address, PersonDto, Role};
use fieldwise_core::{
    assert_that, introspect_struct, AssertionFailure, FieldwiseError, FloatTolerance,
    RecursiveComparisonConfiguration, TypedOrdering,
};
use serde_json::json;
use std::sync::Arc;

/// Money whose `==` only looks at the currency
#[derive(Debug)]
struct Money {
    currency: String,
    cents: i64,
}

impl PartialEq for Money {
    fn eq(&self, other: &Self) -> bool {
        self.currency == other.currency
    }
}

introspect_struct!(Money { currency, cents } with PartialEq);

#[derive(Debug)]
struct Wallet {
    owner: String,
    balance: Money,
}

introspect_struct!(Wallet { owner, balance });

fn wallet(cents: i64) -> Wallet {
    Wallet {
        owner: "Ada".to_string(),
        balance: Money {
            currency: "EUR".to_string(),
            cents,
        },
    }
}

fn paths(failure: &AssertionFailure) -> Vec<String> {
    failure.differences().iter().map(|d| d.path()).collect()
}

#[test]
fn test_equal_graphs_pass() {
    assert_that(&person())
        .using_recursive_comparison()
        .is_equal_to(&person());
}

#[test]
fn test_different_types_with_same_fields_are_equal_when_lenient() {
    let dto: PersonDto = person().into();
    assert_that(&person())
        .using_recursive_comparison()
        .is_equal_to(&dto);
}

#[test]
fn test_strict_type_checking_reports_the_root() {
    let dto: PersonDto = person().into();
    let failure = assert_that(&person())
        .using_recursive_comparison()
        .with_strict_type_checking(true)
        .check_equal_to(&dto)
        .unwrap_err();
    assert_eq!(failure.differences().len(), 1);
    let difference = &failure.differences()[0];
    assert!(difference.location().is_root());
    assert!(difference
        .description()
        .unwrap()
        .contains("enforces strict type checking"));
}

#[test]
fn test_every_differing_field_is_reported() {
    let mut other = person();
    other.name = "Grace".to_string();
    other.address.number = 99;
    other.nicknames[1] = "amazing".to_string();

    let failure = assert_that(&person())
        .using_recursive_comparison()
        .check_equal_to(&other)
        .unwrap_err();
    assert_eq!(paths(&failure), vec!["address.number", "name", "nicknames.[1]"]);
}

#[test]
fn test_ignoring_fields_regexes_and_types() {
    let mut other = person();
    other.name = "Grace".to_string();
    other.address.street = "High St".to_string();
    other.address.city = "Shelbyville".to_string();
    other.age = 99;

    assert_that(&person())
        .using_recursive_comparison()
        .ignoring_fields(&["name", "age"])
        .ignoring_fields_matching_regexes(&["address\\..*"])
        .is_equal_to(&other);

    assert_that(&person())
        .using_recursive_comparison()
        .ignoring_fields_of_type::<Address>()
        .ignoring_fields_of_type::<String>()
        .ignoring_fields(&["age"])
        .is_equal_to(&other);
}

#[test]
fn test_ignoring_a_field_in_every_collection_element() {
    let actual = json!({"friends": [{"name": "Bob", "id": 1}, {"name": "Eve", "id": 2}]});
    let expected = json!({"friends": [{"name": "Bob", "id": 7}, {"name": "Eve", "id": 8}]});
    assert_that(&actual)
        .using_recursive_comparison()
        .ignoring_fields(&["friends.id"])
        .is_equal_to(&expected);
}

#[test]
fn test_ignoring_actual_null_fields() {
    let actual = json!({"name": "Ada", "email": null});
    let expected = json!({"name": "Ada", "email": "ada@example.com"});
    let assert = assert_that(&actual).using_recursive_comparison();
    let failure = assert.check_equal_to(&expected).unwrap_err();
    assert_eq!(paths(&failure), vec!["email"]);

    assert_that(&actual)
        .using_recursive_comparison()
        .ignoring_actual_null_fields()
        .is_equal_to(&expected);
}

#[test]
fn test_ignoring_expected_null_fields() {
    let actual = json!({"name": "Ada", "email": "ada@example.com", "phone": null});
    let expected = json!({"name": "Ada", "email": null, "phone": "555-0100"});
    let failure = assert_that(&actual)
        .using_recursive_comparison()
        .check_equal_to(&expected)
        .unwrap_err();
    assert_eq!(paths(&failure), vec!["email", "phone"]);

    // only expected nulls are skipped, an actual null still differs
    let failure = assert_that(&actual)
        .using_recursive_comparison()
        .ignoring_expected_null_fields()
        .check_equal_to(&expected)
        .unwrap_err();
    assert_eq!(paths(&failure), vec!["phone"]);

    assert_that(&actual)
        .using_recursive_comparison()
        .ignoring_expected_null_fields()
        .ignoring_actual_null_fields()
        .is_equal_to(&expected);
}

#[test]
fn test_ignoring_actual_empty_optionals() {
    let mut actual = person();
    actual.email = None;
    assert_that(&actual)
        .using_recursive_comparison()
        .ignoring_actual_empty_optional_fields()
        .is_equal_to(&person());
}

#[test]
fn test_set_elements_are_matched_regardless_of_order() {
    let mut other = person();
    other.tags = ["poetry".to_string(), "music".to_string()].into_iter().collect();
    let failure = assert_that(&person())
        .using_recursive_comparison()
        .check_equal_to(&other)
        .unwrap_err();
    assert_eq!(paths(&failure), vec!["tags"]);
    assert!(failure.differences()[0]
        .description()
        .unwrap()
        .starts_with("The following expected elements were not matched in the actual HashSet:"));
}

#[test]
fn test_collection_order_can_be_ignored_per_field() {
    let mut other = person();
    other.nicknames.reverse();
    let failure = assert_that(&person())
        .using_recursive_comparison()
        .check_equal_to(&other)
        .unwrap_err();
    assert_eq!(paths(&failure), vec!["nicknames.[0]", "nicknames.[1]"]);

    assert_that(&person())
        .using_recursive_comparison()
        .ignoring_collection_order_in_fields(&["nicknames"])
        .is_equal_to(&other);
}

#[test]
fn test_sorted_map_values_are_compared_by_key() {
    let mut other = person();
    other.scores.insert("go".to_string(), 4);
    let failure = assert_that(&person())
        .using_recursive_comparison()
        .check_equal_to(&other)
        .unwrap_err();
    assert_eq!(paths(&failure), vec!["scores.go"]);
}

#[test]
fn test_optional_payloads_use_the_optional_field_rules() {
    let mut other = person();
    other.email = Some("ada@example.org".to_string());
    let failure = assert_that(&person())
        .using_recursive_comparison()
        .with_error_message_for_fields("email must match", &["email"])
        .check_equal_to(&other)
        .unwrap_err();
    assert_eq!(paths(&failure), vec!["email"]);
    assert_eq!(failure.differences()[0].custom_message(), Some("email must match"));

    assert_that(&person())
        .using_recursive_comparison()
        .ignoring_fields(&["email"])
        .is_equal_to(&other);
}

#[test]
fn test_optional_difference() {
    let mut other = person();
    other.email = None;
    let failure = assert_that(&person())
        .using_recursive_comparison()
        .check_equal_to(&other)
        .unwrap_err();
    let difference = &failure.differences()[0];
    assert_eq!(difference.path(), "email");
    assert_eq!(difference.actual(), "Some(\"ada@example.com\")");
    assert_eq!(difference.expected(), "None");
}

#[test]
fn test_equal_rings_terminate() {
    let actual = ring(&["a", "b", "c"]);
    let expected = ring(&["a", "b", "c"]);
    assert_that(&actual[0])
        .using_recursive_comparison()
        .is_equal_to(&expected[0]);
}

#[test]
fn test_different_rings_report_the_differing_link() {
    let actual = ring(&["a", "b"]);
    let expected = ring(&["a", "x"]);
    let failure = assert_that(&actual[0])
        .using_recursive_comparison()
        .check_equal_to(&expected[0])
        .unwrap_err();
    assert!(paths(&failure).contains(&"next.name".to_string()));
}

#[test]
fn test_cyclic_graphs_with_unordered_members_are_equal() {
    let actual = team("core", &["x", "y"]);
    let expected = team("core", &["y", "x"]);

    assert_that(&actual)
        .using_recursive_comparison()
        .ignoring_collection_order()
        .is_equal_to(&expected);
    assert_that(&actual)
        .using_recursive_comparison()
        .ignoring_collection_order_in_fields(&["members"])
        .is_equal_to(&expected);

    let failure = assert_that(&actual)
        .using_recursive_comparison()
        .check_equal_to(&expected)
        .unwrap_err();
    assert!(paths(&failure).contains(&"members.[0].name".to_string()));
}

#[test]
fn test_cyclic_graphs_with_unmatched_members_report_the_collection() {
    let actual = team("core", &["x", "y"]);
    let expected = team("core", &["y", "z"]);
    let failure = assert_that(&actual)
        .using_recursive_comparison()
        .ignoring_collection_order()
        .check_equal_to(&expected)
        .unwrap_err();
    assert_eq!(paths(&failure), vec!["members"]);
    assert!(failure.differences()[0]
        .description()
        .unwrap()
        .starts_with("The following expected elements were not matched in the actual"));
}

#[test]
fn test_float_tolerance_for_fields() {
    let mut other = person();
    other.height = 1.66;
    assert_that(&person())
        .using_recursive_comparison()
        .with_comparator_for_fields(Arc::new(FloatTolerance::new(0.05)), &["height"])
        .is_equal_to(&other);
}

#[test]
fn test_equals_for_type() {
    let mut other = person();
    other.name = "ADA".to_string();
    other.address.city = "SPRINGFIELD".to_string();
    other.nicknames = vec!["COUNTESS".to_string(), "ENCHANTRESS".to_string()];
    other.email = Some("ADA@EXAMPLE.COM".to_string());
    other.tags = ["MATH".to_string(), "POETRY".to_string()].into_iter().collect();
    other.address.street = "MAIN ST".to_string();
    assert_that(&person())
        .using_recursive_comparison()
        .with_equals_for_type::<String>(|a, b| a.eq_ignore_ascii_case(b))
        .is_equal_to(&other);
}

#[test]
fn test_ordering_comparator_for_type() {
    let by_decade = TypedOrdering::<u32>::new(|a, b| (a / 10).cmp(&(b / 10)));
    let by_decade: Arc<dyn fieldwise_core::ValueComparator> = Arc::new(by_decade);

    let mut other = person();
    other.age = 31;
    assert_that(&person())
        .using_recursive_comparison()
        .with_comparator_for_type::<u32>(Arc::clone(&by_decade))
        .is_equal_to(&other);

    other.age = 45;
    let failure = assert_that(&person())
        .using_recursive_comparison()
        .with_comparator_for_type::<u32>(by_decade)
        .check_equal_to(&other)
        .unwrap_err();
    assert_eq!(paths(&failure), vec!["age"]);
}

#[test]
fn test_overridden_equals_and_its_exceptions() {
    let actual = wallet(1);
    let expected = wallet(2);

    let failure = assert_that(&actual)
        .using_recursive_comparison()
        .check_equal_to(&expected)
        .unwrap_err();
    assert_eq!(paths(&failure), vec!["balance.cents"]);

    assert_that(&actual)
        .using_recursive_comparison()
        .using_overridden_equals()
        .is_equal_to(&expected);

    for exempted in [
        assert_that(&actual)
            .using_recursive_comparison()
            .using_overridden_equals()
            .ignoring_overridden_equals_for_fields(&["balance"]),
        assert_that(&actual)
            .using_recursive_comparison()
            .using_overridden_equals()
            .ignoring_overridden_equals_for_fields_matching_regexes(&["bal.*"]),
        assert_that(&actual)
            .using_recursive_comparison()
            .using_overridden_equals()
            .ignoring_overridden_equals_for_type::<Money>(),
        assert_that(&actual)
            .using_recursive_comparison()
            .using_overridden_equals()
            .ignoring_overridden_equals_for_types_matching_regexes(&[".*Money"]),
    ] {
        let failure = exempted.check_equal_to(&expected).unwrap_err();
        assert_eq!(paths(&failure), vec!["balance.cents"]);
    }
}

#[test]
fn test_overridden_equals_field_regex_does_not_match_type_names() {
    assert_that(&wallet(1))
        .using_recursive_comparison()
        .using_overridden_equals()
        .ignoring_overridden_equals_for_fields_matching_regexes(&[".*Money"])
        .is_equal_to(&wallet(2));
}

#[test]
fn test_enum_against_string() {
    let actual = json!({"role": "Admin"});
    #[derive(Debug)]
    struct Holder {
        role: Role,
    }
    fieldwise_core::introspect_struct!(Holder { role });

    let expected = Holder { role: Role::Admin };
    let failure = assert_that(&actual)
        .using_recursive_comparison()
        .check_equal_to(&expected)
        .unwrap_err();
    assert_eq!(paths(&failure), vec!["role"]);

    assert_that(&actual)
        .using_recursive_comparison()
        .with_enums_comparable_to_strings()
        .is_equal_to(&expected);
}

#[test]
fn test_custom_error_message_for_field() {
    let mut other = person();
    other.age = 12;
    let failure = assert_that(&person())
        .using_recursive_comparison()
        .with_error_message_for_fields("age is off", &["age"])
        .check_equal_to(&other)
        .unwrap_err();
    assert!(failure.to_string().contains("\n\nage is off\n\n"));
}

#[test]
fn test_comparing_only_fields() {
    let mut other = person();
    other.name = "Grace".to_string();
    other.age = 1;
    assert_that(&person())
        .using_recursive_comparison()
        .comparing_only_fields(&["address", "role"])
        .is_equal_to(&other);

    let failure = assert_that(&person())
        .using_recursive_comparison()
        .comparing_only_fields(&["adress"])
        .check_equal_to(&other)
        .unwrap_err();
    assert!(matches!(
        failure,
        AssertionFailure::Configuration(FieldwiseError::UnknownComparedFields { .. })
    ));
}

#[test]
fn test_configuration_from_settings_document() {
    let settings: fieldwise_core::ComparisonSettings = serde_json::from_value(json!({
        "ignored_fields": ["name"],
        "field_tolerances": [{"fields": ["height"], "precision": 0.1}]
    }))
    .unwrap();
    let configuration = RecursiveComparisonConfiguration::from_settings(&settings).unwrap();

    let mut other = person();
    other.name = "Grace".to_string();
    other.height = 1.7;
    assert_that(&person())
        .using_recursive_comparison_with(configuration)
        .is_equal_to(&other);
}

#[test]
fn test_failure_report_layout() {
    let actual = json!({"name": "Ada", "age": 36});
    let expected = json!({"name": "Ada", "age": 37});
    let failure = assert_that(&actual)
        .with_description("user payload")
        .using_recursive_comparison()
        .check_equal_to(&expected)
        .unwrap_err();
    let message = failure.to_string();
    assert!(message.starts_with("[user payload] \nExpecting actual:\n  {\"age\":36,\"name\":\"Ada\"}\n"));
    assert!(message.contains("but found the following difference:\n\nfield/property 'age' differ:\n- actual value  : 36\n- expected value: 37\n\n"));
    assert!(message.contains("The recursive comparison was performed with this configuration:\n"));
}

#[test]
#[should_panic(expected = "not to be equal to:")]
fn test_is_not_equal_to_panics_on_equal_graphs() {
    assert_that(&person())
        .using_recursive_comparison()
        .is_not_equal_to(&person());
}
