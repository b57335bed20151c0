//! Difference calculator walking actual and expected graphs in lockstep.
//!
//! The walk uses a LIFO stack of [`DualValue`]s. Pairs of composite values
//! are recorded in a visited registry keyed by identity, so cyclic graphs
//! terminate and a pair reached again through another path is only reported
//! when its first visit found differences.

use crate::configuration::RecursiveComparisonConfiguration;
use crate::difference::ComparisonDifference;
use crate::dual_value::{DualValue, VisitedDualValues};
use crate::errors::Result;
use crate::field_location::FieldLocation;
use crate::introspect::{simple_type_name, Introspect, Node};
use crate::introspection_strategy::has_named_children;
use crate::{log_op_end, log_op_error, log_op_start};
use std::collections::BTreeSet;
use std::time::Instant;

const MISSING_FIELDS: &str =
    "actual value had less fields to compare than expected value, it did not have these fields";
const EXTRA_FIELDS: &str = "actual value had more fields to compare than expected value, these actual fields could not be found in expected";
const OVERRIDDEN_EQUALS_USED: &str =
    "Actual was compared to expected with equals as the recursive comparison was configured to do so.";

fn strict_root_description(actual: &str, expected: &str) -> String {
    format!(
        "actual and expected are considered different since the recursive comparison enforces strict type checking and the actual type {} is not equal to the expected type {}",
        actual, expected
    )
}

fn strict_value_description(actual: &str, expected: &str) -> String {
    format!(
        "the compared values are considered different since the recursive comparison enforces strict type checking and the actual value type {} is not equal to the expected value type {}",
        actual, expected
    )
}

fn size_description(kind: &str, actual: usize, expected: usize) -> String {
    format!(
        "actual and expected values are {} of different size, actual size={} when expected size={}",
        kind, actual, expected
    )
}

fn describe_names(names: &BTreeSet<&str>) -> String {
    format!("{{{}}}", names.iter().copied().collect::<Vec<_>>().join(", "))
}

/// Computes the differences between two value graphs
#[derive(Debug, Clone, Copy, Default)]
pub struct RecursiveComparisonDifferenceCalculator;

impl RecursiveComparisonDifferenceCalculator {
    pub fn new() -> Self {
        Self
    }

    /// Compare `actual` to `expected` field by field
    ///
    /// # Errors
    ///
    /// - `UnknownComparedFields` when a field passed to
    ///   `compare_only_fields` does not exist in actual
    pub fn determine_differences<'a>(
        &self,
        actual: &'a dyn Introspect,
        expected: &'a dyn Introspect,
        config: &RecursiveComparisonConfiguration,
    ) -> Result<Vec<ComparisonDifference>> {
        let start = Instant::now();
        log_op_start!(
            "determine_differences",
            strict = config.is_in_strict_type_checking_mode()
        );

        let mut context = ComparisonContext::default();
        match compute(actual, expected, config, &mut context) {
            Ok(differences) => {
                log_op_end!(
                    "determine_differences",
                    duration_ms = start.elapsed().as_millis() as u64,
                    difference_count = differences.len() as u64,
                    visited_count = context.visited.len() as u64
                );
                Ok(differences)
            }
            Err(err) => {
                log_op_error!(
                    "determine_differences",
                    err.clone(),
                    duration_ms = start.elapsed().as_millis() as u64
                );
                Err(err)
            }
        }
    }
}

fn compute<'a>(
    actual: &'a dyn Introspect,
    expected: &'a dyn Introspect,
    config: &RecursiveComparisonConfiguration,
    context: &mut ComparisonContext,
) -> Result<Vec<ComparisonDifference>> {
    let root = DualValue::root(actual, expected);
    if config.is_in_strict_type_checking_mode() && root.types_differ() {
        let difference = ComparisonDifference::from_dual_value(&root, config.representation())
            .with_description(strict_root_description(
                root.actual_type_description(),
                root.expected_type_description(),
            ));
        return Ok(vec![difference]);
    }
    if config.has_compared_fields() {
        if let Some(actual) = root.actual {
            config.check_compared_fields_exist(actual)?;
        }
    }

    let mut state = ComparisonState::new(config, context);
    state.register_for_comparison(root);
    Ok(state.run())
}

/// State shared by a comparison and the nested comparisons it starts to
/// match unordered elements
#[derive(Debug, Default)]
struct ComparisonContext {
    visited: VisitedDualValues,
    // rule paths of values of a compared type, and of their descendants
    compared_type_locations: BTreeSet<String>,
}

impl ComparisonContext {
    fn is_under_compared_type(&self, location: &FieldLocation) -> bool {
        self.compared_type_locations
            .iter()
            .any(|path| path.is_empty() || location.hierarchy_matches(path))
    }
}

struct ComparisonState<'a, 'c> {
    config: &'c RecursiveComparisonConfiguration,
    context: &'c mut ComparisonContext,
    dual_values_to_compare: Vec<DualValue<'a>>,
    differences: Vec<ComparisonDifference>,
}

impl<'a, 'c> ComparisonState<'a, 'c> {
    fn new(config: &'c RecursiveComparisonConfiguration, context: &'c mut ComparisonContext) -> Self {
        Self {
            config,
            context,
            dual_values_to_compare: Vec::new(),
            differences: Vec::new(),
        }
    }

    fn register_for_comparison(&mut self, dual_value: DualValue<'a>) {
        if !self.config.should_not_evaluate(&dual_value) {
            self.dual_values_to_compare.push(dual_value);
        }
    }

    fn run(mut self) -> Vec<ComparisonDifference> {
        while let Some(dual_value) = self.dual_values_to_compare.pop() {
            self.compare(dual_value);
        }
        self.differences.sort();
        self.differences
    }

    // ---------------------------------------------------------------------
    // Differences
    // ---------------------------------------------------------------------

    fn add_difference(&mut self, dual_value: &DualValue<'a>, description: Option<String>) {
        let mut difference =
            ComparisonDifference::from_dual_value(dual_value, self.config.representation());
        if let Some(description) = description {
            difference = difference.with_description(description);
        }
        self.record(dual_value, difference);
    }

    fn add_described_difference(&mut self, dual_value: &DualValue<'a>, description: impl Into<String>) {
        self.add_difference(dual_value, Some(description.into()));
    }

    fn record(&mut self, dual_value: &DualValue<'a>, mut difference: ComparisonDifference) {
        if !self.should_report(dual_value, difference.location()) {
            return;
        }
        if let Some(message) = self.config.error_message_for(dual_value) {
            difference = difference.with_custom_message(message);
        }
        self.context.visited.register_difference(difference.location());
        self.differences.push(difference);
    }

    // With compared types every value is walked, so differences outside
    // compared fields and compared type subtrees are dropped here.
    fn should_report(&self, dual_value: &DualValue<'a>, location: &FieldLocation) -> bool {
        if !self.config.has_compared_types() {
            return true;
        }
        let compared = self.config.is_in_compared_fields_subtree(location)
            || self.context.is_under_compared_type(location);
        compared && !self.config.should_ignore_location(location) && !self.config.should_ignore(dual_value)
    }

    // ---------------------------------------------------------------------
    // Walk
    // ---------------------------------------------------------------------

    fn compare(&mut self, dual_value: DualValue<'a>) {
        let config = self.config;

        if config.has_compared_types()
            && (config.is_of_a_compared_type(&dual_value)
                || self.context.is_under_compared_type(&dual_value.location))
        {
            self.context
                .compared_type_locations
                .insert(dual_value.location.path_in_rules().to_string());
        }

        if dual_value.has_potential_cycling_values() {
            if let Some(count) = self.context.visited.registered_differences_of(&dual_value) {
                tracing::trace!(
                    component = module_path!(),
                    field_path = %dual_value.location.path_in_report(),
                    previous_differences = count as u64,
                    "pair already visited"
                );
                if count > 0 {
                    let description =
                        format!("already visited node but now location is: {}", dual_value.location);
                    self.add_described_difference(&dual_value, description);
                }
                return;
            }
            if !config.has_compared_fields()
                || config.is_in_compared_fields_subtree(&dual_value.location)
            {
                self.context.visited.register_visited(&dual_value);
            }
        }

        if let Some(comparator) = config.custom_comparator(&dual_value) {
            let equal = match (dual_value.actual, dual_value.expected) {
                (None, None) => true,
                (Some(actual), Some(expected)) => comparator.equals(actual, expected),
                _ => false,
            };
            if !equal {
                self.add_difference(&dual_value, None);
            }
            return;
        }

        if dual_value.same_identity() {
            return;
        }

        if config.is_treating_null_and_empty_iterables_as_equal()
            && dual_value.is_actual_null_or_empty_collection()
            && dual_value.is_expected_null_or_empty_collection()
        {
            return;
        }

        let (Some(actual), Some(expected)) = (dual_value.actual, dual_value.expected) else {
            if dual_value.actual.is_some() || dual_value.expected.is_some() {
                self.add_difference(&dual_value, None);
            }
            return;
        };

        if dual_value.is_actual_an_enum() || dual_value.is_expected_an_enum() {
            self.compare_as_enums(dual_value, actual.node(), expected.node());
            return;
        }

        if dual_value.is_actual_an_error() || dual_value.is_expected_an_error() {
            self.compare_as_errors(dual_value, actual.node(), expected.node());
            return;
        }

        if dual_value.is_expected_an_ordered_collection()
            && !config.should_ignore_collection_order(&dual_value.location)
        {
            self.compare_ordered_collections(dual_value, actual.node(), expected.node());
            return;
        }

        if dual_value.is_expected_a_collection() {
            self.compare_unordered_collections(dual_value, actual.node(), expected.node());
            return;
        }

        if dual_value.is_expected_an_optional() {
            self.compare_optionals(dual_value, actual.node(), expected.node());
            return;
        }

        if dual_value.is_expected_a_sorted_map() {
            self.compare_sorted_maps(dual_value, actual.node(), expected.node());
            return;
        }

        if dual_value.is_expected_a_map() {
            self.compare_unordered_maps(dual_value, actual.node(), expected.node());
            return;
        }

        match (dual_value.is_actual_leaf(), dual_value.is_expected_leaf()) {
            (true, true) => {
                if config.is_in_strict_type_checking_mode() && dual_value.types_differ() {
                    let description = strict_value_description(
                        dual_value.actual_type_description(),
                        dual_value.expected_type_description(),
                    );
                    self.add_described_difference(&dual_value, description);
                } else if !leaf_values_equal(&actual.node(), &expected.node()) {
                    self.add_difference(&dual_value, None);
                }
                return;
            }
            (true, false) => {
                let description = format!(
                    "Actual was compared to expected with equals because it is a basic type ({}) and expected is not ({})",
                    dual_value.actual_type_description(),
                    dual_value.expected_type_description()
                );
                self.add_described_difference(&dual_value, description);
                return;
            }
            (false, true) => {
                let description = format!(
                    "Expected was compared to actual with equals because it is a basic type ({}) and actual is not ({})",
                    dual_value.expected_type_description(),
                    dual_value.actual_type_description()
                );
                self.add_described_difference(&dual_value, description);
                return;
            }
            (false, false) => {}
        }

        if config.should_honor_overridden_equals(&dual_value) {
            match actual.dyn_eq(expected) {
                Some(true) => return,
                Some(false) => {
                    self.add_described_difference(&dual_value, OVERRIDDEN_EQUALS_USED);
                    return;
                }
                None => {}
            }
        }

        if config.is_in_strict_type_checking_mode() && dual_value.types_differ() {
            let description = strict_value_description(
                dual_value.actual_type_description(),
                dual_value.expected_type_description(),
            );
            self.add_described_difference(&dual_value, description);
            return;
        }

        self.compare_fields(dual_value);
    }

    fn compare_as_enums(&mut self, dual_value: DualValue<'a>, actual: Node<'a>, expected: Node<'a>) {
        let config = self.config;
        match (&actual, &expected) {
            (
                Node::Variant {
                    name: actual_name,
                    fields: actual_fields,
                },
                Node::Variant {
                    name: expected_name,
                    fields: expected_fields,
                },
            ) => {
                if config.is_in_strict_type_checking_mode() && dual_value.types_differ() {
                    let description = strict_value_description(
                        dual_value.actual_type_description(),
                        dual_value.expected_type_description(),
                    );
                    self.add_described_difference(&dual_value, description);
                } else if actual_name != expected_name {
                    self.add_difference(&dual_value, None);
                } else if !actual_fields.is_empty() || !expected_fields.is_empty() {
                    self.compare_fields(dual_value);
                }
            }
            (Node::Variant { name, .. }, Node::Str(text)) | (Node::Str(text), Node::Variant { name, .. })
                if config.is_allowed_to_compare_enum_against_string() =>
            {
                if name != text {
                    self.add_difference(&dual_value, None);
                }
            }
            (Node::Variant { .. }, _) => {
                let description = format!(
                    "expected field is a {} but actual field is an enum",
                    dual_value.expected_type_description()
                );
                self.add_described_difference(&dual_value, description);
            }
            _ => {
                let description = format!(
                    "expected field is an enum but actual field is not ({})",
                    dual_value.actual_type_description()
                );
                self.add_described_difference(&dual_value, description);
            }
        }
    }

    fn compare_as_errors(&mut self, dual_value: DualValue<'a>, actual: Node<'a>, expected: Node<'a>) {
        let config = self.config;
        let (
            Node::Error {
                message: actual_message,
                source: actual_source,
            },
            Node::Error {
                message: expected_message,
                source: expected_source,
            },
        ) = (actual, expected)
        else {
            let description = if dual_value.is_actual_an_error() {
                format!(
                    "actual field is an error but expected field is not ({})",
                    dual_value.expected_type_description()
                )
            } else {
                format!(
                    "expected field is an error but actual field is not ({})",
                    dual_value.actual_type_description()
                )
            };
            self.add_described_difference(&dual_value, description);
            return;
        };

        if config.is_in_strict_type_checking_mode() && dual_value.types_differ() {
            let description = strict_value_description(
                dual_value.actual_type_description(),
                dual_value.expected_type_description(),
            );
            self.add_described_difference(&dual_value, description);
            return;
        }

        // Messages are owned by the error nodes, so they are compared right
        // away instead of waiting on the work stack.
        let actual_message = actual_message.into_owned();
        let expected_message = expected_message.into_owned();
        let mut message_state = ComparisonState::new(config, &mut *self.context);
        message_state.register_for_comparison(DualValue::new(
            dual_value.location.field("message"),
            Some(&actual_message),
            Some(&expected_message),
        ));
        let message_differences = message_state.run();
        self.differences.extend(message_differences);
        self.register_for_comparison(DualValue::new(
            dual_value.location.field("source"),
            actual_source,
            expected_source,
        ));
    }

    fn compare_ordered_collections(
        &mut self,
        dual_value: DualValue<'a>,
        actual: Node<'a>,
        expected: Node<'a>,
    ) {
        let (Node::Seq { items: actual_items, .. }, Node::Seq { items: expected_items, .. }) =
            (actual, expected)
        else {
            let description = format!(
                "expected field is an ordered collection but actual field is not ({})",
                dual_value.actual_type_description()
            );
            self.add_described_difference(&dual_value, description);
            return;
        };
        if !dual_value.is_actual_an_ordered_collection() {
            let description = format!(
                "expected field is an ordered collection but actual field is not ({})",
                dual_value.actual_type_description()
            );
            self.add_described_difference(&dual_value, description);
            return;
        }
        if actual_items.len() != expected_items.len() {
            let description = size_description("collections", actual_items.len(), expected_items.len());
            self.add_described_difference(&dual_value, description);
            return;
        }
        for index in (0..expected_items.len()).rev() {
            self.register_for_comparison(DualValue::new(
                dual_value.location.element(index),
                Some(actual_items[index]),
                Some(expected_items[index]),
            ));
        }
    }

    fn compare_unordered_collections(
        &mut self,
        dual_value: DualValue<'a>,
        actual: Node<'a>,
        expected: Node<'a>,
    ) {
        let (Node::Seq { items: actual_items, .. }, Node::Seq { items: expected_items, .. }) =
            (actual, expected)
        else {
            let description = format!(
                "expected field is an iterable but actual field is not ({})",
                dual_value.actual_type_description()
            );
            self.add_described_difference(&dual_value, description);
            return;
        };
        if actual_items.len() != expected_items.len() {
            let description = size_description("collections", actual_items.len(), expected_items.len());
            self.add_described_difference(&dual_value, description);
            return;
        }

        let mut unmatched_actual = actual_items;
        let mut unmatched_expected: Vec<&'a dyn Introspect> = Vec::new();
        for expected_item in expected_items {
            let position = unmatched_actual.iter().position(|actual_item| {
                self.elements_match(&dual_value.location, *actual_item, expected_item)
            });
            match position {
                Some(position) => {
                    unmatched_actual.remove(position);
                }
                None => unmatched_expected.push(expected_item),
            }
        }
        if unmatched_expected.is_empty() {
            return;
        }

        let representation = self.config.representation();
        let rendered: Vec<String> = unmatched_expected
            .iter()
            .map(|item| representation.to_string_of(*item))
            .collect();
        let description = format!(
            "The following expected elements were not matched in the actual {}:\n  [{}]",
            simple_type_name(dual_value.actual_type_description()),
            rendered.join(", ")
        );
        self.add_described_difference(&dual_value, description);
    }

    // Elements are compared at the collection location so field rules
    // such as `friends.name` still apply to them. A failed trial must not
    // count against pairs visited outside it.
    fn elements_match(
        &mut self,
        location: &FieldLocation,
        actual: &'a dyn Introspect,
        expected: &'a dyn Introspect,
    ) -> bool {
        self.context.visited.begin_trial();
        let mut nested = ComparisonState::new(self.config, &mut *self.context);
        nested.register_for_comparison(DualValue::new(location.clone(), Some(actual), Some(expected)));
        let matched = nested.run().is_empty();
        self.context.visited.end_trial();
        matched
    }

    fn compare_optionals(&mut self, dual_value: DualValue<'a>, actual: Node<'a>, expected: Node<'a>) {
        let Node::Optional(actual_value) = actual else {
            let description = format!(
                "expected field is an optional but actual field is not ({})",
                dual_value.actual_type_description()
            );
            self.add_described_difference(&dual_value, description);
            return;
        };
        let Node::Optional(expected_value) = expected else {
            return;
        };
        match (actual_value, expected_value) {
            (None, None) => {}
            (Some(actual_value), Some(expected_value)) => {
                self.register_for_comparison(DualValue::new(
                    dual_value.location.clone(),
                    Some(actual_value),
                    Some(expected_value),
                ));
            }
            _ => self.add_difference(&dual_value, None),
        }
    }

    fn compare_sorted_maps(&mut self, dual_value: DualValue<'a>, actual: Node<'a>, expected: Node<'a>) {
        let (
            Node::Map {
                sorted: true,
                entries: actual_entries,
            },
            Node::Map {
                entries: expected_entries,
                ..
            },
        ) = (actual, expected)
        else {
            let description = format!(
                "expected field is a sorted map but actual field is not ({})",
                dual_value.actual_type_description()
            );
            self.add_described_difference(&dual_value, description);
            return;
        };
        let actual_entries = self.entries_to_compare(&dual_value.location, actual_entries);
        let expected_entries = self.entries_to_compare(&dual_value.location, expected_entries);
        if actual_entries.len() != expected_entries.len() {
            let description = size_description("sorted maps", actual_entries.len(), expected_entries.len());
            self.add_described_difference(&dual_value, description);
            return;
        }

        let mut pending = Vec::new();
        for ((actual_key, actual_value), (expected_key, expected_value)) in
            actual_entries.into_iter().zip(expected_entries)
        {
            if actual_key != expected_key {
                let difference =
                    ComparisonDifference::from_dual_value(&dual_value, self.config.representation())
                        .with_key_difference(actual_key, expected_key);
                self.record(&dual_value, difference);
            } else {
                pending.push(DualValue::new(
                    dual_value.location.field(expected_key),
                    Some(actual_value),
                    Some(expected_value),
                ));
            }
        }
        for child in pending.into_iter().rev() {
            self.register_for_comparison(child);
        }
    }

    fn compare_unordered_maps(&mut self, dual_value: DualValue<'a>, actual: Node<'a>, expected: Node<'a>) {
        let (
            Node::Map {
                entries: actual_entries,
                ..
            },
            Node::Map {
                entries: expected_entries,
                ..
            },
        ) = (actual, expected)
        else {
            let description = format!(
                "expected field is a map but actual field is not ({})",
                dual_value.actual_type_description()
            );
            self.add_described_difference(&dual_value, description);
            return;
        };
        let mut actual_entries = self.entries_to_compare(&dual_value.location, actual_entries);
        let mut expected_entries = self.entries_to_compare(&dual_value.location, expected_entries);
        actual_entries.sort_by(|a, b| a.0.cmp(&b.0));
        expected_entries.sort_by(|a, b| a.0.cmp(&b.0));

        let actual_keys: BTreeSet<&str> = actual_entries.iter().map(|(k, _)| k.as_str()).collect();
        let expected_keys: BTreeSet<&str> = expected_entries.iter().map(|(k, _)| k.as_str()).collect();
        let missing: Vec<&str> = expected_keys.difference(&actual_keys).copied().collect();
        let extra: Vec<&str> = actual_keys.difference(&expected_keys).copied().collect();

        let mut lines: Vec<String> = Vec::new();
        if actual_entries.len() != expected_entries.len() {
            lines.push(size_description("maps", actual_entries.len(), expected_entries.len()));
        }
        if !missing.is_empty() {
            lines.push(format!(
                "The following keys were not found in the actual map value:\n  [{}]",
                missing.join(", ")
            ));
        }
        if !extra.is_empty() {
            lines.push(format!(
                "The following keys were present in the actual map value, but not in the expected map value:\n  [{}]",
                extra.join(", ")
            ));
        }
        if !lines.is_empty() {
            self.add_described_difference(&dual_value, lines.join("\n"));
            return;
        }

        let children: Vec<DualValue<'a>> = expected_entries
            .into_iter()
            .zip(actual_entries)
            .map(|((key, expected_value), (_, actual_value))| {
                DualValue::new(
                    dual_value.location.field(key),
                    Some(actual_value),
                    Some(expected_value),
                )
            })
            .collect();
        for child in children.into_iter().rev() {
            self.register_for_comparison(child);
        }
    }

    fn entries_to_compare(
        &self,
        location: &FieldLocation,
        entries: Vec<(String, &'a dyn Introspect)>,
    ) -> Vec<(String, &'a dyn Introspect)> {
        entries
            .into_iter()
            .filter(|(key, _)| !self.config.should_ignore_location(&location.field(key.as_str())))
            .collect()
    }

    fn compare_fields(&mut self, dual_value: DualValue<'a>) {
        let config = self.config;
        if !dual_value.actual.is_some_and(has_named_children) {
            let description = format!(
                "expected field is a struct but actual field is not ({})",
                dual_value.actual_type_description()
            );
            self.add_described_difference(&dual_value, description);
            return;
        }

        let actual_names = config.actual_children_names_to_compare(&dual_value);
        let expected_names = config.expected_children_names_to_compare(&dual_value);
        let actual_set: BTreeSet<&str> = actual_names.iter().map(String::as_str).collect();
        let expected_set: BTreeSet<&str> = expected_names.iter().map(String::as_str).collect();
        let missing: BTreeSet<&str> = expected_set.difference(&actual_set).copied().collect();
        let extra: BTreeSet<&str> = actual_set.difference(&expected_set).copied().collect();

        let description = match (missing.is_empty(), extra.is_empty()) {
            (true, true) => None,
            (false, true) => Some(format!("{}: {}", MISSING_FIELDS, describe_names(&missing))),
            (true, false) => Some(format!("{}: {}", EXTRA_FIELDS, describe_names(&extra))),
            (false, false) => Some(format!(
                "actual value and expected value fields to compare differ:\n- {}: {}\n- {}: {}",
                MISSING_FIELDS,
                describe_names(&missing),
                EXTRA_FIELDS,
                describe_names(&extra)
            )),
        };
        if let Some(description) = description {
            self.add_described_difference(&dual_value, description);
            return;
        }

        for name in actual_names.iter().rev() {
            let child = config.child_dual_value(&dual_value, name);
            self.register_for_comparison(child);
        }
    }
}

fn leaf_values_equal(actual: &Node<'_>, expected: &Node<'_>) -> bool {
    match (actual, expected) {
        (Node::Bool(a), Node::Bool(e)) => a == e,
        (Node::Str(a), Node::Str(e)) => a == e,
        (Node::Char(a), Node::Char(e)) => a == e,
        (Node::Unit, Node::Unit) => true,
        (Node::Int(a), Node::Int(e)) => a == e,
        _ => match (actual.as_f64(), expected.as_f64()) {
            (Some(a), Some(e)) => a == e || (a.is_nan() && e.is_nan()),
            _ => false,
        },
    }
}
