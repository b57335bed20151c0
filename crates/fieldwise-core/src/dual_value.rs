//! Pairs of values under comparison and the visited-pairs registry.

use crate::field_location::FieldLocation;
use crate::introspect::{identity, resolve, Identity, Introspect, Node, SeqKind};
use std::collections::HashMap;

/// `(location, actual, expected)` under comparison
///
/// Sides are resolved through pointers on construction; a side is `None`
/// when the value is absent (missing field or `Node::Null`).
#[derive(Clone)]
pub struct DualValue<'a> {
    pub location: FieldLocation,
    pub actual: Option<&'a dyn Introspect>,
    pub expected: Option<&'a dyn Introspect>,
}

fn present(value: Option<&dyn Introspect>) -> Option<&dyn Introspect> {
    value
        .map(resolve)
        .filter(|v| !matches!(v.node(), Node::Null))
}

impl<'a> DualValue<'a> {
    pub fn new(
        location: FieldLocation,
        actual: Option<&'a dyn Introspect>,
        expected: Option<&'a dyn Introspect>,
    ) -> Self {
        Self {
            location,
            actual: present(actual),
            expected: present(expected),
        }
    }

    pub fn root(actual: &'a dyn Introspect, expected: &'a dyn Introspect) -> Self {
        Self::new(FieldLocation::root(), Some(actual), Some(expected))
    }

    pub fn actual_node(&self) -> Option<Node<'a>> {
        self.actual.map(|v| v.node())
    }

    pub fn expected_node(&self) -> Option<Node<'a>> {
        self.expected.map(|v| v.node())
    }

    /// Rule path of the location
    pub fn concatenated_path(&self) -> &str {
        self.location.path_in_rules()
    }

    pub fn field_name(&self) -> &str {
        self.location.field_name()
    }

    pub fn actual_type_name(&self) -> Option<&'static str> {
        self.actual.map(|v| v.type_name())
    }

    pub fn expected_type_name(&self) -> Option<&'static str> {
        self.expected.map(|v| v.type_name())
    }

    /// Type name of actual, or `null` when absent
    pub fn actual_type_description(&self) -> &'static str {
        self.actual_type_name().unwrap_or("null")
    }

    pub fn expected_type_description(&self) -> &'static str {
        self.expected_type_name().unwrap_or("null")
    }

    /// Type of the value used by type rules: actual first, then expected
    pub fn value_type_name(&self) -> Option<&'static str> {
        self.actual_type_name().or_else(|| self.expected_type_name())
    }

    pub fn types_differ(&self) -> bool {
        self.actual_type_name() != self.expected_type_name()
    }

    pub fn has_no_null_values(&self) -> bool {
        self.actual.is_some() && self.expected.is_some()
    }

    /// Both sides present and composite, so a later pair could point back here
    pub fn has_potential_cycling_values(&self) -> bool {
        is_composite(self.actual) && is_composite(self.expected)
    }

    pub fn same_identity(&self) -> bool {
        match (self.actual, self.expected) {
            (Some(actual), Some(expected)) => identity(actual) == identity(expected),
            _ => false,
        }
    }

    pub fn is_actual_leaf(&self) -> bool {
        is(self.actual, |n| n.is_leaf())
    }

    pub fn is_expected_leaf(&self) -> bool {
        is(self.expected, |n| n.is_leaf())
    }

    pub fn is_actual_an_enum(&self) -> bool {
        is(self.actual, |n| matches!(n, Node::Variant { .. }))
    }

    pub fn is_expected_an_enum(&self) -> bool {
        is(self.expected, |n| matches!(n, Node::Variant { .. }))
    }

    pub fn is_actual_an_error(&self) -> bool {
        is(self.actual, |n| matches!(n, Node::Error { .. }))
    }

    pub fn is_expected_an_error(&self) -> bool {
        is(self.expected, |n| matches!(n, Node::Error { .. }))
    }

    pub fn is_actual_an_ordered_collection(&self) -> bool {
        is(self.actual, is_ordered)
    }

    pub fn is_expected_an_ordered_collection(&self) -> bool {
        is(self.expected, is_ordered)
    }

    pub fn is_actual_a_collection(&self) -> bool {
        is(self.actual, |n| matches!(n, Node::Seq { .. }))
    }

    pub fn is_expected_a_collection(&self) -> bool {
        is(self.expected, |n| matches!(n, Node::Seq { .. }))
    }

    pub fn is_actual_a_map(&self) -> bool {
        is(self.actual, |n| matches!(n, Node::Map { .. }))
    }

    pub fn is_expected_a_map(&self) -> bool {
        is(self.expected, |n| matches!(n, Node::Map { .. }))
    }

    pub fn is_actual_a_sorted_map(&self) -> bool {
        is(self.actual, |n| matches!(n, Node::Map { sorted: true, .. }))
    }

    pub fn is_expected_a_sorted_map(&self) -> bool {
        is(self.expected, |n| matches!(n, Node::Map { sorted: true, .. }))
    }

    pub fn is_actual_an_optional(&self) -> bool {
        is(self.actual, |n| matches!(n, Node::Optional(_)))
    }

    pub fn is_expected_an_optional(&self) -> bool {
        is(self.expected, |n| matches!(n, Node::Optional(_)))
    }

    pub fn is_actual_an_empty_optional(&self) -> bool {
        is(self.actual, |n| matches!(n, Node::Optional(None)))
    }

    pub fn is_actual_a_struct(&self) -> bool {
        is(self.actual, |n| matches!(n, Node::Struct(_)))
    }

    pub fn is_expected_a_struct(&self) -> bool {
        is(self.expected, |n| matches!(n, Node::Struct(_)))
    }

    /// Absent, or an empty collection
    pub fn is_actual_null_or_empty_collection(&self) -> bool {
        is_null_or_empty_collection(self.actual)
    }

    pub fn is_expected_null_or_empty_collection(&self) -> bool {
        is_null_or_empty_collection(self.expected)
    }
}

fn is(value: Option<&dyn Introspect>, predicate: impl Fn(&Node<'_>) -> bool) -> bool {
    value.is_some_and(|v| predicate(&v.node()))
}

fn is_ordered(node: &Node<'_>) -> bool {
    matches!(
        node,
        Node::Seq {
            kind: SeqKind::Ordered,
            ..
        }
    )
}

fn is_composite(value: Option<&dyn Introspect>) -> bool {
    is(value, |n| n.is_composite())
}

fn is_null_or_empty_collection(value: Option<&dyn Introspect>) -> bool {
    match value {
        None => true,
        Some(v) => matches!(v.node(), Node::Seq { items, .. } if items.is_empty()),
    }
}

/// Visited `(actual, expected)` pairs with the location of their first visit
/// and the number of differences found at or below it
///
/// Trial matches of unordered elements run inside a trial scope: while one is
/// open, differences are only counted against pairs first visited within it.
#[derive(Debug, Default)]
pub struct VisitedDualValues {
    visited: HashMap<(Identity, Identity), VisitedDualValue>,
    trial_depth: usize,
}

#[derive(Debug)]
struct VisitedDualValue {
    location: FieldLocation,
    difference_count: usize,
    trial_depth: usize,
}

impl VisitedDualValues {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(dual_value: &DualValue<'_>) -> Option<(Identity, Identity)> {
        match (dual_value.actual, dual_value.expected) {
            (Some(actual), Some(expected)) => Some((identity(actual), identity(expected))),
            _ => None,
        }
    }

    pub fn register_visited(&mut self, dual_value: &DualValue<'_>) {
        if let Some(key) = Self::key(dual_value) {
            let trial_depth = self.trial_depth;
            self.visited.entry(key).or_insert_with(|| VisitedDualValue {
                location: dual_value.location.clone(),
                difference_count: 0,
                trial_depth,
            });
        }
    }

    /// Difference count of an already visited pair, `None` on first visit
    pub fn registered_differences_of(&self, dual_value: &DualValue<'_>) -> Option<usize> {
        Self::key(dual_value)
            .and_then(|key| self.visited.get(&key))
            .map(|visited| visited.difference_count)
    }

    /// Count a difference against every visited pair at or above `location`
    /// that belongs to the innermost open trial
    pub fn register_difference(&mut self, location: &FieldLocation) {
        let trial_depth = self.trial_depth;
        for visited in self.visited.values_mut() {
            if visited.trial_depth >= trial_depth
                && location
                    .decomposed_path()
                    .starts_with(visited.location.decomposed_path())
            {
                visited.difference_count += 1;
            }
        }
    }

    pub fn begin_trial(&mut self) {
        self.trial_depth += 1;
    }

    pub fn end_trial(&mut self) {
        self.trial_depth = self.trial_depth.saturating_sub(1);
    }

    pub fn len(&self) -> usize {
        self.visited.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visited.is_empty()
    }
}
