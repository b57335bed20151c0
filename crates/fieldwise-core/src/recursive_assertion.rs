//! Recursive assertion: check a predicate on every field of a value graph.
//!
//! The root value is never asserted. Each node reached through struct
//! fields, collection elements, map values and optional payloads is passed
//! to the predicate unless a rule ignores it; the container policies decide
//! whether collections, maps and optionals are asserted themselves, through
//! their content, or both.

use crate::assert::AssertionFailure;
use crate::configuration::{compile_patterns, describe_locations, describe_regexes, to_locations};
use crate::errors::{FieldwiseError, Result};
use crate::field_location::{FieldLocation, PathPattern};
use crate::introspect::{identity, resolve, Identity, Introspect, Node};
use crate::introspection_strategy::{DefaultIntrospectionStrategy, IntrospectionStrategy};
use crate::{log_op_end, log_op_start};
use std::collections::{BTreeSet, HashSet};
use std::fmt;
use std::sync::Arc;
use std::time::Instant;

/// Which part of a collection the predicate is evaluated on
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CollectionAssertionPolicy {
    #[default]
    ElementsOnly,
    CollectionObjectOnly,
    CollectionObjectAndElements,
}

impl CollectionAssertionPolicy {
    fn description(self) -> &'static str {
        match self {
            Self::ElementsOnly => {
                "the assertion was evaluated on the collection elements but not on the collection itself"
            }
            Self::CollectionObjectOnly => {
                "the assertion was evaluated on the collection itself but not on its elements"
            }
            Self::CollectionObjectAndElements => {
                "the assertion was evaluated on the collection and its elements"
            }
        }
    }
}

/// Which part of a map the predicate is evaluated on
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MapAssertionPolicy {
    MapObjectOnly,
    #[default]
    MapValuesOnly,
    /// The map, its keys and its values
    MapObjectAndEntries,
}

impl MapAssertionPolicy {
    fn description(self) -> &'static str {
        match self {
            Self::MapObjectOnly => "the assertion was evaluated on the map itself but not on its entries",
            Self::MapValuesOnly => "the assertion was evaluated on the map values but not on the map itself",
            Self::MapObjectAndEntries => {
                "the assertion was evaluated on the map and its keys and values"
            }
        }
    }
}

/// Which part of an optional the predicate is evaluated on
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OptionalAssertionPolicy {
    #[default]
    OptionalValueOnly,
    OptionalObjectOnly,
    OptionalObjectAndValue,
}

impl OptionalAssertionPolicy {
    fn description(self) -> &'static str {
        match self {
            Self::OptionalValueOnly => {
                "the assertion was evaluated on the optional value but not on the optional itself"
            }
            Self::OptionalObjectOnly => {
                "the assertion was evaluated on the optional itself but not on its value"
            }
            Self::OptionalObjectAndValue => {
                "the assertion was evaluated on the optional and its value"
            }
        }
    }
}

#[derive(Clone)]
pub struct RecursiveAssertionConfiguration {
    ignored_fields: Vec<FieldLocation>,
    ignored_fields_regexes: Vec<PathPattern>,
    ignored_types: Vec<String>,
    ignore_primitive_fields: bool,
    ignore_all_null_fields: bool,
    collection_policy: CollectionAssertionPolicy,
    map_policy: MapAssertionPolicy,
    optional_policy: OptionalAssertionPolicy,
    introspection_strategy: Arc<dyn IntrospectionStrategy>,
}

impl Default for RecursiveAssertionConfiguration {
    fn default() -> Self {
        Self {
            ignored_fields: Vec::new(),
            ignored_fields_regexes: Vec::new(),
            ignored_types: Vec::new(),
            ignore_primitive_fields: false,
            ignore_all_null_fields: false,
            collection_policy: CollectionAssertionPolicy::default(),
            map_policy: MapAssertionPolicy::default(),
            optional_policy: OptionalAssertionPolicy::default(),
            introspection_strategy: Arc::new(DefaultIntrospectionStrategy),
        }
    }
}

impl RecursiveAssertionConfiguration {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ignore_fields<I>(&mut self, fields: I)
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        self.ignored_fields.extend(to_locations(fields));
    }

    /// # Errors
    ///
    /// - `InvalidRegex` when a pattern does not compile
    pub fn ignore_fields_matching_regexes<I>(&mut self, regexes: I) -> Result<()>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        self.ignored_fields_regexes.extend(compile_patterns(regexes)?);
        Ok(())
    }

    pub fn ignore_fields_of_type<T: ?Sized>(&mut self) {
        self.ignored_types.push(std::any::type_name::<T>().to_string());
    }

    /// Booleans, numbers and chars
    pub fn set_ignore_primitive_fields(&mut self, ignore: bool) {
        self.ignore_primitive_fields = ignore;
    }

    pub fn set_ignore_all_null_fields(&mut self, ignore: bool) {
        self.ignore_all_null_fields = ignore;
    }

    pub fn set_collection_assertion_policy(&mut self, policy: CollectionAssertionPolicy) {
        self.collection_policy = policy;
    }

    pub fn set_map_assertion_policy(&mut self, policy: MapAssertionPolicy) {
        self.map_policy = policy;
    }

    pub fn set_optional_assertion_policy(&mut self, policy: OptionalAssertionPolicy) {
        self.optional_policy = policy;
    }

    pub fn set_introspection_strategy(&mut self, strategy: Arc<dyn IntrospectionStrategy>) {
        self.introspection_strategy = strategy;
    }

    pub fn collection_assertion_policy(&self) -> CollectionAssertionPolicy {
        self.collection_policy
    }

    pub fn map_assertion_policy(&self) -> MapAssertionPolicy {
        self.map_policy
    }

    pub fn optional_assertion_policy(&self) -> OptionalAssertionPolicy {
        self.optional_policy
    }

    fn must_be_ignored(&self, value: &dyn Introspect, node: &Node<'_>, location: &FieldLocation) -> bool {
        if is_root(location) {
            return false;
        }
        (self.ignore_all_null_fields && matches!(node, Node::Null))
            || (self.ignore_primitive_fields
                && matches!(
                    node,
                    Node::Bool(_) | Node::Int(_) | Node::Float(_) | Node::Char(_)
                ))
            || self
                .ignored_fields
                .iter()
                .any(|ignored| location.exactly_matches_location(ignored))
            || self
                .ignored_fields_regexes
                .iter()
                .any(|regex| regex.matches(location.path_in_rules()))
            || self.ignored_types.iter().any(|t| t == value.type_name())
    }

    // containers are skipped when the policy only looks at their content
    fn should_evaluate(&self, node: &Node<'_>) -> bool {
        match node {
            Node::Seq { .. } => self.collection_policy != CollectionAssertionPolicy::ElementsOnly,
            Node::Map { .. } => self.map_policy != MapAssertionPolicy::MapValuesOnly,
            Node::Optional(_) => self.optional_policy != OptionalAssertionPolicy::OptionalValueOnly,
            _ => true,
        }
    }

    /// One `- ...` line per active rule
    pub fn multi_line_description(&self) -> String {
        let mut description = String::new();
        if self.ignore_all_null_fields {
            description.push_str("- all null fields were ignored in the assertion\n");
        }
        if !self.ignored_fields.is_empty() {
            description.push_str(&format!(
                "- the following fields were ignored in the assertion: {}\n",
                describe_locations(&self.ignored_fields)
            ));
        }
        if !self.ignored_fields_regexes.is_empty() {
            description.push_str(&format!(
                "- the fields matching the following regexes were ignored in the assertion: {}\n",
                describe_regexes(&self.ignored_fields_regexes)
            ));
        }
        if !self.ignored_types.is_empty() {
            description.push_str(&format!(
                "- the following types were ignored in the assertion: {}\n",
                self.ignored_types.join(", ")
            ));
        }
        if self.ignore_primitive_fields {
            description.push_str("- primitive fields were ignored in the recursive assertion\n");
        }
        description.push_str(&format!("- {}\n", self.collection_policy.description()));
        description.push_str(&format!("- {}\n", self.map_policy.description()));
        description.push_str(&format!("- {}\n", self.optional_policy.description()));
        description.push_str(&format!(
            "- the introspection strategy used was: {}\n",
            self.introspection_strategy.description()
        ));
        description
    }
}

impl fmt::Display for RecursiveAssertionConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.multi_line_description())
    }
}

impl fmt::Debug for RecursiveAssertionConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecursiveAssertionConfiguration")
            .field("ignored_fields", &self.ignored_fields)
            .field("ignored_types", &self.ignored_types)
            .field("collection_policy", &self.collection_policy)
            .field("map_policy", &self.map_policy)
            .field("optional_policy", &self.optional_policy)
            .finish_non_exhaustive()
    }
}

/// Locations of the nodes of `root` that do not satisfy `predicate`,
/// sorted by report path
pub fn failing_fields(
    root: &dyn Introspect,
    configuration: &RecursiveAssertionConfiguration,
    predicate: &dyn Fn(&dyn Introspect) -> bool,
) -> Vec<String> {
    let start = Instant::now();
    log_op_start!("recursive_assertion");
    let mut driver = RecursiveAssertionDriver {
        configuration,
        predicate,
        visited: HashSet::new(),
        failures: BTreeSet::new(),
    };
    driver.assert_recursively(root, FieldLocation::root());
    let failures: Vec<String> = driver.failures.into_iter().collect();
    log_op_end!(
        "recursive_assertion",
        duration_ms = start.elapsed().as_millis() as u64,
        visited_count = driver.visited.len() as u64,
        failure_count = failures.len() as u64
    );
    failures
}

struct RecursiveAssertionDriver<'c> {
    configuration: &'c RecursiveAssertionConfiguration,
    predicate: &'c dyn Fn(&dyn Introspect) -> bool,
    // composites already asserted; stops cycles
    visited: HashSet<Identity>,
    failures: BTreeSet<String>,
}

impl RecursiveAssertionDriver<'_> {
    fn assert_recursively(&mut self, value: &dyn Introspect, location: FieldLocation) {
        let value = resolve(value);
        let node = value.node();
        if self.configuration.must_be_ignored(value, &node, &location) {
            return;
        }
        if has_children(&node) && !self.visited.insert(identity(value)) {
            tracing::trace!(location = %location.path_in_report(), "already visited node");
            return;
        }
        if !is_root(&location) && self.configuration.should_evaluate(&node) && !(self.predicate)(value) {
            self.failures.insert(location.path_in_report());
        }
        self.recurse_into_children(value, node, &location);
    }

    fn recurse_into_children(&mut self, value: &dyn Introspect, node: Node<'_>, location: &FieldLocation) {
        match node {
            Node::Seq { items, .. } => {
                if self.configuration.collection_policy == CollectionAssertionPolicy::CollectionObjectOnly {
                    return;
                }
                for (index, item) in items.into_iter().enumerate() {
                    self.assert_recursively(item, location.element(index));
                }
            }
            Node::Map { entries, .. } => {
                let policy = self.configuration.map_policy;
                if policy == MapAssertionPolicy::MapObjectOnly {
                    return;
                }
                for (key, item) in &entries {
                    if policy == MapAssertionPolicy::MapObjectAndEntries {
                        self.assert_recursively(key, location.field(format!("[{}]", key)));
                    }
                    self.assert_recursively(*item, location.field(key.as_str()));
                }
            }
            Node::Optional(payload) => {
                if self.configuration.optional_policy == OptionalAssertionPolicy::OptionalObjectOnly {
                    return;
                }
                if let Some(payload) = payload {
                    self.assert_recursively(payload, location.clone());
                }
            }
            Node::Struct(_) | Node::Variant { .. } => {
                let configuration = self.configuration;
                let strategy = configuration.introspection_strategy.as_ref();
                for name in strategy.children_node_names(value) {
                    if let Some(child) = strategy.child_node_value(&name, value) {
                        self.assert_recursively(child, location.field(name));
                    }
                }
            }
            Node::Error {
                source: Some(source),
                ..
            } => self.assert_recursively(source, location.field("source")),
            _ => {}
        }
    }
}

// elements of a root collection are asserted
fn is_root(location: &FieldLocation) -> bool {
    location.decomposed_path().is_empty()
}

fn has_children(node: &Node<'_>) -> bool {
    match node {
        Node::Seq { items, .. } => !items.is_empty(),
        Node::Map { entries, .. } => !entries.is_empty(),
        Node::Struct(fields) | Node::Variant { fields, .. } => !fields.is_empty(),
        Node::Optional(payload) => payload.is_some(),
        Node::Error { source, .. } => source.is_some(),
        _ => false,
    }
}

/// Recursive assertion on one value
///
/// ```
/// use fieldwise_core::{assert_that, introspect_struct};
///
/// struct Account {
///     owner: String,
///     alias: Option<String>,
/// }
///
/// introspect_struct!(Account { owner, alias });
///
/// let account = Account { owner: "ada".to_string(), alias: Some("a".to_string()) };
/// assert_that(&account)
///     .using_recursive_assertion()
///     .has_no_empty_optional_fields();
/// ```
#[derive(Clone)]
pub struct RecursiveAssertionAssert<'a> {
    actual: &'a dyn Introspect,
    configuration: RecursiveAssertionConfiguration,
    error: Option<FieldwiseError>,
    description: Option<String>,
}

impl<'a> RecursiveAssertionAssert<'a> {
    pub fn new(actual: &'a dyn Introspect) -> Self {
        Self::with_configuration(actual, RecursiveAssertionConfiguration::new())
    }

    pub fn with_configuration(actual: &'a dyn Introspect, configuration: RecursiveAssertionConfiguration) -> Self {
        Self {
            actual,
            configuration,
            error: None,
            description: None,
        }
    }

    pub fn configuration(&self) -> &RecursiveAssertionConfiguration {
        &self.configuration
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn ignoring_fields(mut self, fields: &[&str]) -> Self {
        self.configuration.ignore_fields(fields);
        self
    }

    pub fn ignoring_fields_matching_regexes(mut self, regexes: &[&str]) -> Self {
        if let Err(err) = self.configuration.ignore_fields_matching_regexes(regexes) {
            self.error.get_or_insert(err);
        }
        self
    }

    pub fn ignoring_fields_of_type<T: ?Sized>(mut self) -> Self {
        self.configuration.ignore_fields_of_type::<T>();
        self
    }

    pub fn ignoring_primitive_fields(mut self) -> Self {
        self.configuration.set_ignore_primitive_fields(true);
        self
    }

    pub fn ignoring_all_null_fields(mut self) -> Self {
        self.configuration.set_ignore_all_null_fields(true);
        self
    }

    pub fn with_collection_assertion_policy(mut self, policy: CollectionAssertionPolicy) -> Self {
        self.configuration.set_collection_assertion_policy(policy);
        self
    }

    pub fn with_map_assertion_policy(mut self, policy: MapAssertionPolicy) -> Self {
        self.configuration.set_map_assertion_policy(policy);
        self
    }

    pub fn with_optional_assertion_policy(mut self, policy: OptionalAssertionPolicy) -> Self {
        self.configuration.set_optional_assertion_policy(policy);
        self
    }

    pub fn with_introspection_strategy(mut self, strategy: Arc<dyn IntrospectionStrategy>) -> Self {
        self.configuration.set_introspection_strategy(strategy);
        self
    }

    /// Panics listing every field that fails `predicate`
    #[track_caller]
    pub fn all_fields_satisfy(&self, predicate: impl Fn(&dyn Introspect) -> bool) -> &Self {
        if let Err(failure) = self.check_all_fields_satisfy(predicate) {
            panic!("{}", failure);
        }
        self
    }

    /// Non-panicking [`all_fields_satisfy`](Self::all_fields_satisfy)
    pub fn check_all_fields_satisfy(
        &self,
        predicate: impl Fn(&dyn Introspect) -> bool,
    ) -> std::result::Result<(), AssertionFailure> {
        self.check(&self.configuration, &predicate)
    }

    /// Panics when a field is `null`
    #[track_caller]
    pub fn has_no_null_fields(&self) -> &Self {
        self.all_fields_satisfy(|value| !matches!(resolve(value).node(), Node::Null))
    }

    /// Panics when an optional field is empty
    ///
    /// Optionals are asserted themselves even when the policy only looks at
    /// their values.
    #[track_caller]
    pub fn has_no_empty_optional_fields(&self) -> &Self {
        let mut configuration = self.configuration.clone();
        if configuration.optional_policy == OptionalAssertionPolicy::OptionalValueOnly {
            configuration.set_optional_assertion_policy(OptionalAssertionPolicy::OptionalObjectAndValue);
        }
        let predicate = |value: &dyn Introspect| !matches!(resolve(value).node(), Node::Optional(None));
        if let Err(failure) = self.check(&configuration, &predicate) {
            panic!("{}", failure);
        }
        self
    }

    fn check(
        &self,
        configuration: &RecursiveAssertionConfiguration,
        predicate: &dyn Fn(&dyn Introspect) -> bool,
    ) -> std::result::Result<(), AssertionFailure> {
        if let Some(err) = &self.error {
            return Err(AssertionFailure::Configuration(err.clone()));
        }
        let fields = failing_fields(self.actual, configuration, predicate);
        if fields.is_empty() {
            return Ok(());
        }
        let message = format!(
            "The following fields did not satisfy the predicate:\n  [{}]\n\nThe recursive assertion was performed with this configuration:\n{}",
            fields.join(", "),
            configuration.multi_line_description()
        );
        let message = match &self.description {
            Some(description) => format!("[{}] {}", description, message),
            None => message,
        };
        Err(AssertionFailure::FieldsNotSatisfying { message, fields })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::introspect_struct;
    use serde_json::json;
    use std::cell::OnceCell;
    use std::collections::BTreeMap;
    use std::rc::Rc;

    struct Address {
        street: String,
        number: u32,
    }

    introspect_struct!(Address { street, number });

    struct Person {
        name: String,
        age: u32,
        address: Address,
        nicknames: Vec<String>,
        scores: BTreeMap<String, u32>,
        alias: Option<String>,
    }

    introspect_struct!(Person {
        name,
        age,
        address,
        nicknames,
        scores,
        alias
    });

    fn person() -> Person {
        let mut scores = BTreeMap::new();
        scores.insert("math".to_string(), 12);
        Person {
            name: "Ada".to_string(),
            age: 36,
            address: Address {
                street: "Main St".to_string(),
                number: 5,
            },
            nicknames: vec!["a".to_string(), "".to_string()],
            scores,
            alias: None,
        }
    }

    fn failures_of(
        value: &dyn Introspect,
        configuration: &RecursiveAssertionConfiguration,
        predicate: impl Fn(&dyn Introspect) -> bool,
    ) -> Vec<String> {
        failing_fields(value, configuration, &predicate)
    }

    fn is_not_empty_string(value: &dyn Introspect) -> bool {
        !matches!(resolve(value).node(), Node::Str(s) if s.is_empty())
    }

    #[test]
    fn test_every_field_is_reached_but_not_the_root() {
        let failures = failures_of(&person(), &RecursiveAssertionConfiguration::new(), |_| false);
        assert_eq!(
            failures,
            vec![
                "address",
                "address.number",
                "address.street",
                "age",
                "name",
                "nicknames.[0]",
                "nicknames.[1]",
                "scores.math",
            ]
        );
    }

    #[test]
    fn test_failing_element_is_reported() {
        let failures = failures_of(&person(), &RecursiveAssertionConfiguration::new(), is_not_empty_string);
        assert_eq!(failures, vec!["nicknames.[1]"]);
    }

    #[test]
    fn test_ignored_fields_and_their_children_are_skipped() {
        let mut configuration = RecursiveAssertionConfiguration::new();
        configuration.ignore_fields(["address", "nicknames"]);
        configuration.ignore_fields_matching_regexes(["sc.*"]).unwrap();
        let failures = failures_of(&person(), &configuration, |_| false);
        assert_eq!(failures, vec!["age", "name"]);
    }

    #[test]
    fn test_ignored_types_and_primitives() {
        let mut configuration = RecursiveAssertionConfiguration::new();
        configuration.ignore_fields_of_type::<String>();
        configuration.set_ignore_primitive_fields(true);
        let failures = failures_of(&person(), &configuration, |_| false);
        assert_eq!(failures, vec!["address"]);
    }

    #[test]
    fn test_collection_policies() {
        let mut configuration = RecursiveAssertionConfiguration::new();
        configuration.ignore_fields(["address", "scores", "name", "age"]);
        configuration.set_collection_assertion_policy(CollectionAssertionPolicy::CollectionObjectOnly);
        assert_eq!(failures_of(&person(), &configuration, |_| false), vec!["nicknames"]);

        configuration.set_collection_assertion_policy(CollectionAssertionPolicy::CollectionObjectAndElements);
        assert_eq!(
            failures_of(&person(), &configuration, |_| false),
            vec!["nicknames", "nicknames.[0]", "nicknames.[1]"]
        );
    }

    #[test]
    fn test_map_policies() {
        let mut configuration = RecursiveAssertionConfiguration::new();
        configuration.ignore_fields(["address", "nicknames", "name", "age"]);
        configuration.set_map_assertion_policy(MapAssertionPolicy::MapObjectOnly);
        assert_eq!(failures_of(&person(), &configuration, |_| false), vec!["scores"]);

        configuration.set_map_assertion_policy(MapAssertionPolicy::MapObjectAndEntries);
        assert_eq!(
            failures_of(&person(), &configuration, |_| false),
            vec!["scores", "scores.[math]", "scores.math"]
        );
    }

    #[test]
    fn test_optional_payload_shares_the_optional_location() {
        let mut value = person();
        value.alias = Some("".to_string());
        let failures = failures_of(&value, &RecursiveAssertionConfiguration::new(), is_not_empty_string);
        assert_eq!(failures, vec!["alias", "nicknames.[1]"]);
    }

    #[test]
    fn test_cycles_terminate() {
        struct Link {
            name: String,
            next: OnceCell<Rc<Link>>,
        }

        introspect_struct!(Link { name, next });

        let link = Rc::new(Link {
            name: "".to_string(),
            next: OnceCell::new(),
        });
        let _ = link.next.set(Rc::clone(&link));
        let failures = failures_of(&link, &RecursiveAssertionConfiguration::new(), is_not_empty_string);
        assert_eq!(failures, vec!["name"]);
    }

    #[test]
    fn test_elements_of_a_root_collection_are_asserted() {
        let names = vec!["a".to_string(), "".to_string()];
        let failures = failures_of(&names, &RecursiveAssertionConfiguration::new(), is_not_empty_string);
        assert_eq!(failures, vec!["[1]"]);
    }

    #[test]
    fn test_has_no_null_fields() {
        let doc = json!({"name": "Ada", "address": {"street": null}});
        let assert = RecursiveAssertionAssert::new(&doc);
        let failure = assert
            .check_all_fields_satisfy(|value| !matches!(resolve(value).node(), Node::Null))
            .unwrap_err();
        match failure {
            AssertionFailure::FieldsNotSatisfying { fields, message } => {
                assert_eq!(fields, vec!["address.street"]);
                assert!(message.starts_with(
                    "The following fields did not satisfy the predicate:\n  [address.street]\n\nThe recursive assertion was performed with this configuration:\n"
                ));
            }
            other => panic!("unexpected failure: {other}"),
        }
        RecursiveAssertionAssert::new(&doc)
            .ignoring_all_null_fields()
            .has_no_null_fields();
    }

    #[test]
    #[should_panic(expected = "[alias]")]
    fn test_has_no_empty_optional_fields_panics() {
        RecursiveAssertionAssert::new(&person()).has_no_empty_optional_fields();
    }

    #[test]
    fn test_invalid_regex_is_reported() {
        let value = person();
        let failure = RecursiveAssertionAssert::new(&value)
            .ignoring_fields_matching_regexes(&["["])
            .check_all_fields_satisfy(|_| true)
            .unwrap_err();
        assert!(matches!(
            failure,
            AssertionFailure::Configuration(FieldwiseError::InvalidRegex { .. })
        ));
    }

    #[test]
    fn test_description_lists_policies() {
        let mut configuration = RecursiveAssertionConfiguration::new();
        configuration.ignore_fields(["name"]);
        let description = configuration.multi_line_description();
        assert!(description.starts_with("- the following fields were ignored in the assertion: name\n"));
        assert!(description.contains(
            "- the assertion was evaluated on the collection elements but not on the collection itself\n"
        ));
        assert!(description.ends_with("- the introspection strategy used was: comparing fields\n"));
    }
}
