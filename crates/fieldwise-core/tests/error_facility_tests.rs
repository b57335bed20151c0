use fieldwise_core::errors::{ExError, ExErrorKind, FieldwiseError};
use fieldwise_core::{assert_that, AssertionFailure, RecursiveComparisonConfiguration};

#[test]
fn test_invalid_regex_verifiable_by_kind() {
    let err = RecursiveComparisonConfiguration::builder()
        .ignoring_fields_matching_regexes(&["name", "(unclosed"])
        .build()
        .unwrap_err();
    assert!(matches!(&err, FieldwiseError::InvalidRegex { pattern, .. } if pattern == "(unclosed"));

    let ex_err: ExError = err.into();
    assert_eq!(ex_err.kind(), ExErrorKind::InvalidRegex);
    assert_eq!(ex_err.code(), "ERR_INVALID_REGEX");
    assert!(ex_err.message().contains("(unclosed"));
}

#[test]
fn test_first_invalid_regex_wins() {
    let err = RecursiveComparisonConfiguration::builder()
        .ignoring_fields_matching_regexes(&["["])
        .ignoring_collection_order_in_fields_matching_regexes(&["("])
        .build()
        .unwrap_err();
    assert!(matches!(err, FieldwiseError::InvalidRegex { pattern, .. } if pattern == "["));
}

#[test]
fn test_unknown_compared_fields_carry_field_context() {
    let actual = serde_json::json!({"name": "Ada", "address": {"street": "Main St"}});
    let failure = assert_that(&actual)
        .using_recursive_comparison()
        .comparing_only_fields(&["naem", "address.zip"])
        .check_equal_to(&actual)
        .unwrap_err();

    let AssertionFailure::Configuration(err) = failure else {
        panic!("expected a configuration failure");
    };
    let ex_err: ExError = err.into();
    assert_eq!(ex_err.kind(), ExErrorKind::UnknownComparedField);
    assert_eq!(ex_err.code(), "ERR_UNKNOWN_COMPARED_FIELD");
    let field = ex_err.field().unwrap_or_default();
    assert!(field.contains("naem"));
    assert!(field.contains("zip"));
}

#[test]
fn test_invalid_settings_conversion() {
    let err = FieldwiseError::InvalidSettings {
        reason: "precision must be positive".to_string(),
    };
    let ex_err: ExError = err.into();
    assert_eq!(ex_err.kind(), ExErrorKind::InvalidSettings);
    assert_eq!(ex_err.code(), "ERR_INVALID_SETTINGS");
    assert!(ex_err.message().contains("precision"));
}

#[test]
fn test_io_conversion_keeps_path() {
    let err = FieldwiseError::Io {
        path: "/tmp/missing.toml".to_string(),
        reason: "settings file not found".to_string(),
    };
    let ex_err: ExError = err.into();
    assert_eq!(ex_err.code(), "ERR_IO");
    assert!(ex_err.message().starts_with("/tmp/missing.toml"));
}

#[test]
fn test_error_kind_code_mapping() {
    let kinds = vec![
        (ExErrorKind::InvalidInput, "ERR_INVALID_INPUT"),
        (ExErrorKind::InvalidRegex, "ERR_INVALID_REGEX"),
        (ExErrorKind::UnknownComparedField, "ERR_UNKNOWN_COMPARED_FIELD"),
        (ExErrorKind::InvalidSettings, "ERR_INVALID_SETTINGS"),
        (ExErrorKind::Io, "ERR_IO"),
        (ExErrorKind::Serialization, "ERR_SERIALIZATION"),
        (ExErrorKind::UnsupportedFormat, "ERR_UNSUPPORTED_FORMAT"),
        (ExErrorKind::Internal, "ERR_INTERNAL"),
    ];

    for (kind, expected_code) in kinds {
        assert_eq!(kind.code(), expected_code);
    }
}

#[test]
fn test_context_builders() {
    let ex_err = ExError::new(ExErrorKind::Serialization)
        .with_op("parse_document")
        .with_message("expected value at line 1");
    assert_eq!(ex_err.op(), Some("parse_document"));
    assert_eq!(
        ex_err.to_string(),
        "[ERR_SERIALIZATION] in operation 'parse_document': expected value at line 1"
    );
}
