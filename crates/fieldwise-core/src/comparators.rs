//! Custom equality for fields and types.
//!
//! A comparator registered for a field, a field regex or a type decides alone
//! whether the values at that location are equal; the engine does not look
//! at their children. Field comparators take precedence over regex field
//! comparators, which take precedence over type comparators.

use crate::field_location::{FieldLocation, PathPattern};
use crate::introspect::{simple_type_name, Introspect, Node};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::marker::PhantomData;
use std::sync::Arc;

/// Default precision for `f64` values
pub const DEFAULT_F64_PRECISION: f64 = 1e-15;
/// Default precision for `f32` values
pub const DEFAULT_F32_PRECISION: f64 = 1e-6;

pub trait ValueComparator: Send + Sync {
    fn equals(&self, actual: &dyn Introspect, expected: &dyn Introspect) -> bool;

    /// Shown in the configuration description
    fn description(&self) -> String;
}

fn downcast<T: 'static>(value: &dyn Introspect) -> Option<&T> {
    value.as_any()?.downcast_ref::<T>()
}

/// Equality closure over a concrete type; values that can't be downcast to
/// `T` are never equal.
pub struct TypedEquals<T> {
    equals: Box<dyn Fn(&T, &T) -> bool + Send + Sync>,
    description: String,
    _marker: PhantomData<fn(&T)>,
}

impl<T: 'static> TypedEquals<T> {
    pub fn new(equals: impl Fn(&T, &T) -> bool + Send + Sync + 'static) -> Self {
        Self {
            equals: Box::new(equals),
            description: format!(
                "TypedEquals<{}>",
                simple_type_name(std::any::type_name::<T>())
            ),
            _marker: PhantomData,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

impl<T: 'static> ValueComparator for TypedEquals<T> {
    fn equals(&self, actual: &dyn Introspect, expected: &dyn Introspect) -> bool {
        match (downcast::<T>(actual), downcast::<T>(expected)) {
            (Some(a), Some(e)) => (self.equals)(a, e),
            _ => false,
        }
    }

    fn description(&self) -> String {
        self.description.clone()
    }
}

/// Ordering closure over a concrete type; equal iff it returns `Equal`.
pub struct TypedOrdering<T> {
    compare: Box<dyn Fn(&T, &T) -> Ordering + Send + Sync>,
    description: String,
    _marker: PhantomData<fn(&T)>,
}

impl<T: 'static> TypedOrdering<T> {
    pub fn new(compare: impl Fn(&T, &T) -> Ordering + Send + Sync + 'static) -> Self {
        Self {
            compare: Box::new(compare),
            description: format!(
                "TypedOrdering<{}>",
                simple_type_name(std::any::type_name::<T>())
            ),
            _marker: PhantomData,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

impl<T: 'static> ValueComparator for TypedOrdering<T> {
    fn equals(&self, actual: &dyn Introspect, expected: &dyn Introspect) -> bool {
        match (downcast::<T>(actual), downcast::<T>(expected)) {
            (Some(a), Some(e)) => (self.compare)(a, e) == Ordering::Equal,
            _ => false,
        }
    }

    fn description(&self) -> String {
        self.description.clone()
    }
}

/// Numeric leaves are equal when `|actual - expected| <= precision`; two NaN
/// values are equal
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FloatTolerance {
    precision: f64,
}

impl FloatTolerance {
    pub fn new(precision: f64) -> Self {
        Self { precision }
    }

    pub fn precision(&self) -> f64 {
        self.precision
    }
}

impl ValueComparator for FloatTolerance {
    fn equals(&self, actual: &dyn Introspect, expected: &dyn Introspect) -> bool {
        match (actual.node().as_f64(), expected.node().as_f64()) {
            (Some(a), Some(e)) => {
                a == e || (a.is_nan() && e.is_nan()) || (a - e).abs() <= self.precision
            }
            _ => false,
        }
    }

    fn description(&self) -> String {
        format!("FloatTolerance[precision={:e}]", self.precision)
    }
}

/// Equality closure over the introspected nodes, usable on dynamic values
/// such as JSON documents
pub struct NodeEquals {
    equals: Box<dyn Fn(&Node<'_>, &Node<'_>) -> bool + Send + Sync>,
    description: String,
}

impl NodeEquals {
    pub fn new(equals: impl Fn(&Node<'_>, &Node<'_>) -> bool + Send + Sync + 'static) -> Self {
        Self {
            equals: Box::new(equals),
            description: "NodeEquals".to_string(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

impl ValueComparator for NodeEquals {
    fn equals(&self, actual: &dyn Introspect, expected: &dyn Introspect) -> bool {
        (self.equals)(&actual.node(), &expected.node())
    }

    fn description(&self) -> String {
        self.description.clone()
    }
}

// ---------------------------------------------------------------------------
// Registries
// ---------------------------------------------------------------------------

/// Comparators keyed by type name
#[derive(Clone, Default)]
pub struct TypeComparators {
    by_type: BTreeMap<String, Arc<dyn ValueComparator>>,
}

impl TypeComparators {
    /// Registry with the float tolerances for `f64` and `f32`
    pub fn with_defaults() -> Self {
        let mut comparators = Self::default();
        comparators.register("f64", Arc::new(FloatTolerance::new(DEFAULT_F64_PRECISION)));
        comparators.register("f32", Arc::new(FloatTolerance::new(DEFAULT_F32_PRECISION)));
        comparators
    }

    pub fn register(&mut self, type_name: impl Into<String>, comparator: Arc<dyn ValueComparator>) {
        self.by_type.insert(type_name.into(), comparator);
    }

    pub fn get(&self, type_name: &str) -> Option<&Arc<dyn ValueComparator>> {
        self.by_type.get(type_name)
    }

    pub fn has_comparator_for(&self, type_name: &str) -> bool {
        self.by_type.contains_key(type_name)
    }

    pub fn is_empty(&self) -> bool {
        self.by_type.is_empty()
    }

    /// Entries sorted by type name
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arc<dyn ValueComparator>)> {
        self.by_type.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Comparators keyed by field rule path or by field regexes
#[derive(Clone, Default)]
pub struct FieldComparators {
    by_field: BTreeMap<String, Arc<dyn ValueComparator>>,
    by_regexes: Vec<(Vec<PathPattern>, Arc<dyn ValueComparator>)>,
}

impl FieldComparators {
    pub fn register(&mut self, field: impl Into<String>, comparator: Arc<dyn ValueComparator>) {
        self.by_field.insert(field.into(), comparator);
    }

    pub fn register_for_regexes(
        &mut self,
        regexes: Vec<PathPattern>,
        comparator: Arc<dyn ValueComparator>,
    ) {
        self.by_regexes.push((regexes, comparator));
    }

    /// Exact field comparator first, then the first matching regex comparator
    pub fn get(&self, location: &FieldLocation) -> Option<&Arc<dyn ValueComparator>> {
        let path = location.path_in_rules();
        self.by_field.get(path).or_else(|| {
            self.by_regexes
                .iter()
                .find(|(regexes, _)| regexes.iter().any(|r| r.matches(path)))
                .map(|(_, comparator)| comparator)
        })
    }

    pub fn has_comparator_for(&self, location: &FieldLocation) -> bool {
        self.get(location).is_some()
    }

    pub fn has_field_comparators(&self) -> bool {
        !self.by_field.is_empty()
    }

    pub fn has_regex_field_comparators(&self) -> bool {
        !self.by_regexes.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.by_field.is_empty() && self.by_regexes.is_empty()
    }

    pub fn iter_fields(&self) -> impl Iterator<Item = (&str, &Arc<dyn ValueComparator>)> {
        self.by_field.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn iter_regexes(&self) -> impl Iterator<Item = (&[PathPattern], &Arc<dyn ValueComparator>)> {
        self.by_regexes.iter().map(|(k, v)| (k.as_slice(), v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typed_equals_downcasts_both_sides() {
        let case_insensitive =
            TypedEquals::<String>::new(|a, b| a.eq_ignore_ascii_case(b));
        assert!(case_insensitive.equals(&"Ada".to_string(), &"ADA".to_string()));
        assert!(!case_insensitive.equals(&"Ada".to_string(), &"Bob".to_string()));
        // wrong type never matches
        assert!(!case_insensitive.equals(&1_i32, &1_i32));
        assert_eq!(case_insensitive.description(), "TypedEquals<String>");
    }

    #[test]
    fn test_typed_ordering_equal_iff_equal_ordering() {
        let by_abs = TypedOrdering::<i32>::new(|a, b| a.abs().cmp(&b.abs()));
        assert!(by_abs.equals(&-3, &3));
        assert!(!by_abs.equals(&-3, &4));
    }

    #[test]
    fn test_float_tolerance() {
        let tolerance = FloatTolerance::new(0.01);
        assert!(tolerance.equals(&1.0_f64, &1.005_f64));
        assert!(!tolerance.equals(&1.0_f64, &1.02_f64));
        assert!(tolerance.equals(&1_i64, &1.001_f64));
        assert!(!tolerance.equals(&"1.0".to_string(), &1.0_f64));
        assert_eq!(
            FloatTolerance::new(DEFAULT_F64_PRECISION).description(),
            "FloatTolerance[precision=1e-15]"
        );
    }

    #[test]
    fn test_node_equals_on_json() {
        let same_length = NodeEquals::new(|a, b| match (a, b) {
            (Node::Str(a), Node::Str(b)) => a.len() == b.len(),
            _ => false,
        });
        let a = serde_json::json!("abc");
        let b = serde_json::json!("xyz");
        assert!(same_length.equals(&a, &b));
    }

    #[test]
    fn test_default_type_comparators() {
        let comparators = TypeComparators::with_defaults();
        assert!(comparators.has_comparator_for("f64"));
        assert!(comparators.has_comparator_for("f32"));
        let names: Vec<&str> = comparators.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["f32", "f64"]);
    }

    #[test]
    fn test_field_comparator_takes_precedence_over_regex() {
        let mut comparators = FieldComparators::default();
        comparators.register_for_regexes(
            vec![PathPattern::new("price.*").unwrap()],
            Arc::new(NodeEquals::new(|_, _| true).with_description("always")),
        );
        comparators.register(
            "price.amount",
            Arc::new(NodeEquals::new(|_, _| false).with_description("never")),
        );

        let exact = comparators.get(&FieldLocation::parse("price.amount"));
        assert_eq!(exact.map(|c| c.description()), Some("never".to_string()));
        let by_regex = comparators.get(&FieldLocation::parse("price.currency"));
        assert_eq!(by_regex.map(|c| c.description()), Some("always".to_string()));
        assert!(comparators.get(&FieldLocation::parse("name")).is_none());
    }
}
