//! Rules of a recursive comparison.
//!
//! A configuration decides which locations are compared, how values at a
//! location are compared (custom comparator, overridden equals, field by
//! field) and whether collection order matters. Field rules match on the
//! rule path of a location, i.e. without collection element segments, so
//! ignoring `friends.name` ignores the name of every friend.

use crate::comparators::{FieldComparators, FloatTolerance, TypeComparators, TypedEquals, ValueComparator};
use crate::dual_value::DualValue;
use crate::errors::{FieldwiseError, Result};
use crate::field_location::{FieldLocation, PathPattern};
use crate::introspect::{resolve, Introspect, Node};
use crate::introspection_strategy::{
    ComparingSnakeOrCamelCaseFields, DefaultIntrospectionStrategy, IntrospectionStrategy,
};
use crate::representation::{Representation, StandardRepresentation};
use crate::settings::{ComparisonSettings, IntrospectionSetting};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

const INDENT_LEVEL_2: &str = "  -";

pub(crate) fn compile_patterns<I>(regexes: I) -> Result<Vec<PathPattern>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    regexes
        .into_iter()
        .map(|regex| {
            let regex = regex.as_ref();
            PathPattern::new(regex).map_err(|err| FieldwiseError::invalid_regex(regex, &err))
        })
        .collect()
}

pub(crate) fn to_locations<I>(fields: I) -> Vec<FieldLocation>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fields
        .into_iter()
        .map(|field| FieldLocation::parse(field.as_ref()))
        .collect()
}

fn to_strings<I>(values: I) -> Vec<String>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    values.into_iter().map(|v| v.as_ref().to_string()).collect()
}

#[derive(Clone)]
pub struct RecursiveComparisonConfiguration {
    strict_type_checking: bool,

    // null / empty optional rules
    ignore_all_actual_null_fields: bool,
    ignore_all_actual_empty_optional_fields: bool,
    ignore_all_expected_null_fields: bool,

    // compared and ignored locations
    compared_fields: Vec<FieldLocation>,
    compared_types: Vec<String>,
    ignored_fields: Vec<FieldLocation>,
    ignored_fields_regexes: Vec<PathPattern>,
    ignored_types: Vec<String>,
    ignored_types_regexes: Vec<PathPattern>,

    // overridden equals
    ignore_all_overridden_equals: bool,
    ignored_overridden_equals_for_fields: Vec<FieldLocation>,
    ignored_overridden_equals_for_types: Vec<String>,
    ignored_overridden_equals_for_fields_regexes: Vec<PathPattern>,
    ignored_overridden_equals_for_types_regexes: Vec<PathPattern>,

    // collection order
    ignore_collection_order: bool,
    ignored_collection_order_in_fields: Vec<FieldLocation>,
    ignored_collection_order_in_fields_regexes: Vec<PathPattern>,

    type_comparators: TypeComparators,
    field_comparators: FieldComparators,

    field_messages: BTreeMap<String, String>,
    type_messages: BTreeMap<String, String>,

    treat_null_and_empty_iterables_as_equal: bool,
    allow_comparing_enum_against_string: bool,

    introspection_strategy: Arc<dyn IntrospectionStrategy>,
    representation: Arc<dyn Representation>,
}

impl Default for RecursiveComparisonConfiguration {
    fn default() -> Self {
        Self {
            strict_type_checking: false,
            ignore_all_actual_null_fields: false,
            ignore_all_actual_empty_optional_fields: false,
            ignore_all_expected_null_fields: false,
            compared_fields: Vec::new(),
            compared_types: Vec::new(),
            ignored_fields: Vec::new(),
            ignored_fields_regexes: Vec::new(),
            ignored_types: Vec::new(),
            ignored_types_regexes: Vec::new(),
            ignore_all_overridden_equals: true,
            ignored_overridden_equals_for_fields: Vec::new(),
            ignored_overridden_equals_for_types: Vec::new(),
            ignored_overridden_equals_for_fields_regexes: Vec::new(),
            ignored_overridden_equals_for_types_regexes: Vec::new(),
            ignore_collection_order: false,
            ignored_collection_order_in_fields: Vec::new(),
            ignored_collection_order_in_fields_regexes: Vec::new(),
            type_comparators: TypeComparators::with_defaults(),
            field_comparators: FieldComparators::default(),
            field_messages: BTreeMap::new(),
            type_messages: BTreeMap::new(),
            treat_null_and_empty_iterables_as_equal: false,
            allow_comparing_enum_against_string: false,
            introspection_strategy: Arc::new(DefaultIntrospectionStrategy),
            representation: Arc::new(StandardRepresentation::default()),
        }
    }
}

impl RecursiveComparisonConfiguration {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> RecursiveComparisonConfigurationBuilder {
        RecursiveComparisonConfigurationBuilder::default()
    }

    /// Build a configuration from declarative settings
    pub fn from_settings(settings: &ComparisonSettings) -> Result<Self> {
        settings.validate()?;
        let mut config = Self::new();
        config.set_strict_type_checking(settings.strict_type_checking);
        config.set_ignore_all_actual_null_fields(settings.ignore_all_actual_null_fields);
        config.set_ignore_all_actual_empty_optional_fields(
            settings.ignore_all_actual_empty_optional_fields,
        );
        config.set_ignore_all_expected_null_fields(settings.ignore_all_expected_null_fields);
        config.compare_only_fields(&settings.compared_fields);
        config.compare_only_fields_of_type_names(&settings.compared_types);
        config.ignore_fields(&settings.ignored_fields);
        config.ignore_fields_matching_regexes(&settings.ignored_fields_regexes)?;
        config.ignore_fields_of_type_names(&settings.ignored_types);
        config.ignore_fields_of_types_matching_regexes(&settings.ignored_types_regexes)?;
        config.set_ignore_collection_order(settings.ignore_collection_order);
        config.ignore_collection_order_in_fields(&settings.ignored_collection_order_in_fields);
        config.ignore_collection_order_in_fields_matching_regexes(
            &settings.ignored_collection_order_in_fields_regexes,
        )?;
        config.set_treat_null_and_empty_iterables_as_equal(
            settings.treat_null_and_empty_iterables_as_equal,
        );
        config.set_allow_comparing_enum_against_string(settings.allow_comparing_enum_against_string);
        match settings.introspection {
            IntrospectionSetting::Fields => {}
            IntrospectionSetting::SnakeOrCamelCaseFields => {
                config.set_introspection_strategy(Arc::new(ComparingSnakeOrCamelCaseFields))
            }
        }
        for entry in &settings.field_messages {
            config.register_error_message_for_fields(&entry.message, &entry.targets);
        }
        for entry in &settings.type_messages {
            for type_name in &entry.targets {
                config.register_error_message_for_type_name(type_name, &entry.message);
            }
        }
        for tolerance in &settings.field_tolerances {
            config.register_comparator_for_fields(
                Arc::new(FloatTolerance::new(tolerance.precision)),
                &tolerance.fields,
            );
        }
        Ok(config)
    }

    // ---------------------------------------------------------------------
    // Settings
    // ---------------------------------------------------------------------

    pub fn set_strict_type_checking(&mut self, strict_type_checking: bool) {
        self.strict_type_checking = strict_type_checking;
    }

    pub fn is_in_strict_type_checking_mode(&self) -> bool {
        self.strict_type_checking
    }

    pub fn set_ignore_all_actual_null_fields(&mut self, ignore: bool) {
        self.ignore_all_actual_null_fields = ignore;
    }

    pub fn set_ignore_all_actual_empty_optional_fields(&mut self, ignore: bool) {
        self.ignore_all_actual_empty_optional_fields = ignore;
    }

    pub fn set_ignore_all_expected_null_fields(&mut self, ignore: bool) {
        self.ignore_all_expected_null_fields = ignore;
    }

    /// Restrict the comparison to these fields (and their subfields)
    pub fn compare_only_fields<I>(&mut self, fields: I)
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        self.compared_fields.extend(to_locations(fields));
    }

    /// Restrict the comparison to fields of type `T`
    pub fn compare_only_fields_of_type<T: ?Sized>(&mut self) {
        self.compared_types.push(std::any::type_name::<T>().to_string());
    }

    /// Restrict the comparison to fields whose type name is one of `type_names`
    pub fn compare_only_fields_of_type_names<I>(&mut self, type_names: I)
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        self.compared_types.extend(to_strings(type_names));
    }

    pub fn ignore_fields<I>(&mut self, fields: I)
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        self.ignored_fields.extend(to_locations(fields));
    }

    /// Ignore fields whose whole rule path matches one of `regexes`
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

    pub fn ignore_fields_of_type_names<I>(&mut self, type_names: I)
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        self.ignored_types.extend(to_strings(type_names));
    }

    pub fn ignore_fields_of_types_matching_regexes<I>(&mut self, regexes: I) -> Result<()>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        self.ignored_types_regexes.extend(compile_patterns(regexes)?);
        Ok(())
    }

    /// Compare values with their `dyn_eq` when they provide one, except
    /// where an overridden equals exception applies
    pub fn use_overridden_equals(&mut self) {
        self.ignore_all_overridden_equals = false;
    }

    pub fn ignore_all_overridden_equals(&mut self) {
        self.ignore_all_overridden_equals = true;
    }

    pub fn ignore_overridden_equals_for_fields<I>(&mut self, fields: I)
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        self.ignored_overridden_equals_for_fields.extend(to_locations(fields));
    }

    pub fn ignore_overridden_equals_for_type<T: ?Sized>(&mut self) {
        self.ignored_overridden_equals_for_types
            .push(std::any::type_name::<T>().to_string());
    }

    pub fn ignore_overridden_equals_for_type_names<I>(&mut self, type_names: I)
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        self.ignored_overridden_equals_for_types
            .extend(to_strings(type_names));
    }

    /// Ignore the overridden equals of fields whose rule path matches one of `regexes`
    pub fn ignore_overridden_equals_for_fields_matching_regexes<I>(&mut self, regexes: I) -> Result<()>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        self.ignored_overridden_equals_for_fields_regexes
            .extend(compile_patterns(regexes)?);
        Ok(())
    }

    /// Ignore the overridden equals of types whose name matches one of `regexes`
    pub fn ignore_overridden_equals_for_types_matching_regexes<I>(&mut self, regexes: I) -> Result<()>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        self.ignored_overridden_equals_for_types_regexes
            .extend(compile_patterns(regexes)?);
        Ok(())
    }

    pub fn set_ignore_collection_order(&mut self, ignore: bool) {
        self.ignore_collection_order = ignore;
    }

    pub fn ignore_collection_order_in_fields<I>(&mut self, fields: I)
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        self.ignored_collection_order_in_fields
            .extend(to_locations(fields));
    }

    pub fn ignore_collection_order_in_fields_matching_regexes<I>(&mut self, regexes: I) -> Result<()>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        self.ignored_collection_order_in_fields_regexes
            .extend(compile_patterns(regexes)?);
        Ok(())
    }

    pub fn register_comparator_for_type<T: ?Sized>(&mut self, comparator: Arc<dyn ValueComparator>) {
        self.type_comparators
            .register(std::any::type_name::<T>(), comparator);
    }

    pub fn register_comparator_for_type_name(
        &mut self,
        type_name: impl Into<String>,
        comparator: Arc<dyn ValueComparator>,
    ) {
        self.type_comparators.register(type_name, comparator);
    }

    /// Shorthand for a [`TypedEquals`] comparator registered for `T`
    pub fn register_equals_for_type<T: 'static>(
        &mut self,
        equals: impl Fn(&T, &T) -> bool + Send + Sync + 'static,
    ) {
        self.register_comparator_for_type::<T>(Arc::new(TypedEquals::new(equals)));
    }

    pub fn register_comparator_for_fields<I>(&mut self, comparator: Arc<dyn ValueComparator>, fields: I)
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        for field in fields {
            self.field_comparators
                .register(field.as_ref(), Arc::clone(&comparator));
        }
    }

    pub fn register_comparator_for_fields_matching_regexes<I>(
        &mut self,
        comparator: Arc<dyn ValueComparator>,
        regexes: I,
    ) -> Result<()>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let patterns = compile_patterns(regexes)?;
        if patterns.is_empty() {
            return Err(FieldwiseError::InvalidInput {
                reason: "at least one regex must be given".to_string(),
            });
        }
        self.field_comparators
            .register_for_regexes(patterns, comparator);
        Ok(())
    }

    /// Replace the difference report of these fields with `message`
    pub fn register_error_message_for_fields<I>(&mut self, message: &str, fields: I)
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        for field in fields {
            self.field_messages
                .insert(field.as_ref().to_string(), message.to_string());
        }
    }

    pub fn register_error_message_for_type<T: ?Sized>(&mut self, message: &str) {
        self.register_error_message_for_type_name(std::any::type_name::<T>(), message);
    }

    pub fn register_error_message_for_type_name(&mut self, type_name: &str, message: &str) {
        self.type_messages
            .insert(type_name.to_string(), message.to_string());
    }

    pub fn set_treat_null_and_empty_iterables_as_equal(&mut self, treat_as_equal: bool) {
        self.treat_null_and_empty_iterables_as_equal = treat_as_equal;
    }

    pub fn is_treating_null_and_empty_iterables_as_equal(&self) -> bool {
        self.treat_null_and_empty_iterables_as_equal
    }

    /// Let unit enum variants match strings holding their name
    pub fn set_allow_comparing_enum_against_string(&mut self, allow: bool) {
        self.allow_comparing_enum_against_string = allow;
    }

    pub fn is_allowed_to_compare_enum_against_string(&self) -> bool {
        self.allow_comparing_enum_against_string
    }

    pub fn set_introspection_strategy(&mut self, strategy: Arc<dyn IntrospectionStrategy>) {
        self.introspection_strategy = strategy;
    }

    pub fn introspection_strategy(&self) -> &dyn IntrospectionStrategy {
        self.introspection_strategy.as_ref()
    }

    pub fn set_representation(&mut self, representation: Arc<dyn Representation>) {
        self.representation = representation;
    }

    pub fn representation(&self) -> &dyn Representation {
        self.representation.as_ref()
    }

    pub fn compared_fields(&self) -> &[FieldLocation] {
        &self.compared_fields
    }

    pub fn has_compared_fields(&self) -> bool {
        !self.compared_fields.is_empty()
    }

    pub fn has_compared_types(&self) -> bool {
        !self.compared_types.is_empty()
    }

    pub fn ignored_fields(&self) -> &[FieldLocation] {
        &self.ignored_fields
    }

    pub fn type_comparators(&self) -> &TypeComparators {
        &self.type_comparators
    }

    pub fn field_comparators(&self) -> &FieldComparators {
        &self.field_comparators
    }

    // ---------------------------------------------------------------------
    // Rules
    // ---------------------------------------------------------------------

    /// Values at this location are neither compared nor reported
    pub fn should_ignore(&self, dual_value: &DualValue<'_>) -> bool {
        self.should_ignore_location(&dual_value.location) || self.should_ignore_value(dual_value)
    }

    /// Values are not even registered for comparison. When compared types
    /// are set every value is registered so that fields of those types can
    /// be found deep in the graph.
    pub fn should_not_evaluate(&self, dual_value: &DualValue<'_>) -> bool {
        if self.has_compared_types() {
            return false;
        }
        self.should_ignore(dual_value)
    }

    /// Location matches an ignored field or an ignored field regex
    pub fn should_ignore_location(&self, location: &FieldLocation) -> bool {
        self.matches_an_ignored_field(location) || self.matches_an_ignored_field_regex(location)
    }

    fn should_ignore_value(&self, dual_value: &DualValue<'_>) -> bool {
        (self.ignore_all_actual_null_fields && dual_value.actual.is_none())
            || (self.ignore_all_expected_null_fields && dual_value.expected.is_none())
            || self.matches_an_ignored_type(dual_value)
            || (self.ignore_all_actual_empty_optional_fields
                && dual_value.is_actual_an_empty_optional())
    }

    fn matches_an_ignored_field(&self, location: &FieldLocation) -> bool {
        self.ignored_fields
            .iter()
            .any(|ignored| location.exactly_matches_location(ignored))
    }

    fn matches_an_ignored_field_regex(&self, location: &FieldLocation) -> bool {
        self.ignored_fields_regexes
            .iter()
            .any(|regex| regex.matches(location.path_in_rules()))
    }

    // an absent actual has no type; expected's type is only trusted in strict mode
    fn matches_an_ignored_type(&self, dual_value: &DualValue<'_>) -> bool {
        if self.ignored_types.is_empty() && self.ignored_types_regexes.is_empty() {
            return false;
        }
        let type_name = match (dual_value.actual, dual_value.expected) {
            (Some(actual), _) => actual.type_name(),
            (None, Some(expected)) if self.strict_type_checking => expected.type_name(),
            _ => return false,
        };
        self.ignored_types.iter().any(|t| t == type_name)
            || self
                .ignored_types_regexes
                .iter()
                .any(|regex| regex.matches(type_name))
    }

    /// True when the value type is one of the compared types
    pub fn is_of_a_compared_type(&self, dual_value: &DualValue<'_>) -> bool {
        dual_value
            .value_type_name()
            .is_some_and(|type_name| self.compared_types.iter().any(|t| t == type_name))
    }

    /// Location is a compared field or lies below one
    pub fn is_in_compared_fields_subtree(&self, location: &FieldLocation) -> bool {
        self.compared_fields
            .iter()
            .any(|compared| location.exactly_matches_location(compared) || location.has_parent(compared))
    }

    fn should_be_compared(&self, location: &FieldLocation) -> bool {
        if self.compared_fields.is_empty() || self.has_compared_types() {
            return true;
        }
        self.compared_fields.iter().any(|compared| {
            location.is_root()
                || location.exactly_matches_location(compared)
                || location.has_parent(compared)
                || location.has_child(compared)
        })
    }

    /// Pair of children called `name` of both sides of `parent`
    pub fn child_dual_value<'a>(&self, parent: &DualValue<'a>, name: &str) -> DualValue<'a> {
        let strategy = self.introspection_strategy.as_ref();
        DualValue::new(
            parent.location.field(name),
            parent
                .actual
                .and_then(|actual| strategy.child_node_value(name, actual)),
            parent
                .expected
                .and_then(|expected| strategy.child_node_value(name, expected)),
        )
    }

    /// Names of the children of actual that take part in the comparison
    pub fn actual_children_names_to_compare(&self, dual_value: &DualValue<'_>) -> Vec<String> {
        let Some(actual) = dual_value.actual else {
            return Vec::new();
        };
        let names = self.introspection_strategy.children_node_names(actual);
        self.children_names_to_compare(dual_value, names)
    }

    /// Same rules applied to the children of expected, used to report
    /// missing and extra fields
    pub fn expected_children_names_to_compare(&self, dual_value: &DualValue<'_>) -> Vec<String> {
        let Some(expected) = dual_value.expected else {
            return Vec::new();
        };
        let names = self.introspection_strategy.children_node_names(expected);
        self.children_names_to_compare(dual_value, names)
    }

    fn children_names_to_compare(&self, dual_value: &DualValue<'_>, names: Vec<String>) -> Vec<String> {
        if self.has_compared_types() {
            return names;
        }
        names
            .into_iter()
            .filter(|name| {
                let child = self.child_dual_value(dual_value, name);
                !self.should_ignore_location(&child.location)
                    && !self.should_ignore_value(&child)
                    && self.should_be_compared(&child.location)
            })
            .collect()
    }

    pub fn has_custom_comparator(&self, dual_value: &DualValue<'_>) -> bool {
        self.custom_comparator(dual_value).is_some()
    }

    /// Field comparator, then regex field comparator, then type comparator
    pub fn custom_comparator(&self, dual_value: &DualValue<'_>) -> Option<&Arc<dyn ValueComparator>> {
        self.field_comparators
            .get(&dual_value.location)
            .or_else(|| {
                dual_value
                    .value_type_name()
                    .and_then(|type_name| self.type_comparators.get(type_name))
            })
    }

    pub fn should_ignore_overridden_equals(&self, dual_value: &DualValue<'_>) -> bool {
        if dual_value.location.decomposed_path().is_empty() {
            return true;
        }
        if dual_value.is_actual_leaf() || dual_value.is_actual_an_enum() {
            return false;
        }
        if self.has_compared_fields()
            && !self
                .compared_fields
                .iter()
                .any(|compared| dual_value.location.exactly_matches_location(compared))
        {
            return true;
        }
        self.ignore_all_overridden_equals
            || self.matches_an_ignored_overridden_equals_field(&dual_value.location)
            || self.matches_an_ignored_overridden_equals_regex(&dual_value.location)
            || dual_value
                .actual_type_name()
                .is_some_and(|type_name| self.matches_an_ignored_overridden_equals_type(type_name))
    }

    pub fn should_honor_overridden_equals(&self, dual_value: &DualValue<'_>) -> bool {
        !self.should_ignore_overridden_equals(dual_value)
    }

    fn matches_an_ignored_overridden_equals_field(&self, location: &FieldLocation) -> bool {
        self.ignored_overridden_equals_for_fields
            .iter()
            .any(|field| location.exactly_matches_location(field))
    }

    fn matches_an_ignored_overridden_equals_regex(&self, location: &FieldLocation) -> bool {
        let path = location.path_in_rules();
        self.ignored_overridden_equals_for_fields_regexes
            .iter()
            .any(|regex| regex.matches(path))
    }

    fn matches_an_ignored_overridden_equals_type(&self, type_name: &str) -> bool {
        self.ignored_overridden_equals_for_types
            .iter()
            .any(|t| t == type_name)
            || self
                .ignored_overridden_equals_for_types_regexes
                .iter()
                .any(|regex| regex.matches(type_name))
    }

    pub fn should_ignore_collection_order(&self, location: &FieldLocation) -> bool {
        self.ignore_collection_order
            || self
                .ignored_collection_order_in_fields
                .iter()
                .any(|field| location.exactly_matches_location(field))
            || self
                .ignored_collection_order_in_fields_regexes
                .iter()
                .any(|regex| regex.matches(location.path_in_rules()))
    }

    /// Field message first, then the message of the value type
    pub fn error_message_for(&self, dual_value: &DualValue<'_>) -> Option<&str> {
        self.field_messages
            .get(dual_value.location.path_in_rules())
            .or_else(|| {
                dual_value
                    .value_type_name()
                    .and_then(|type_name| self.type_messages.get(type_name))
            })
            .map(String::as_str)
    }

    /// Compared fields must exist in actual. The check stops at absent values
    /// and containers since their content can't be known upfront.
    pub fn check_compared_fields_exist(&self, actual: &dyn Introspect) -> Result<()> {
        let strategy = self.introspection_strategy.as_ref();
        let mut unknown: Vec<String> = Vec::new();
        for compared in &self.compared_fields {
            let mut current = Some(actual);
            let mut parent_path: Vec<&str> = Vec::new();
            for segment in compared.decomposed_path() {
                let Some(value) = current.map(unwrap_optionals) else {
                    break;
                };
                if !matches!(value.node(), Node::Struct(_) | Node::Variant { .. }) {
                    break;
                }
                match strategy.child_node_value(segment, value) {
                    Some(child) => {
                        current = Some(child);
                        parent_path.push(segment);
                    }
                    None => {
                        unknown.push(if parent_path.is_empty() {
                            segment.clone()
                        } else {
                            format!("{} in <{}>", segment, parent_path.join("."))
                        });
                        break;
                    }
                }
            }
        }
        if unknown.is_empty() {
            return Ok(());
        }
        Err(FieldwiseError::UnknownComparedFields {
            message: format!("The following fields don't exist: {{{}}}", unknown.join(", ")),
            fields: unknown,
        })
    }

    // ---------------------------------------------------------------------
    // Description
    // ---------------------------------------------------------------------

    /// One `- ...` line per active rule
    pub fn multi_line_description(&self) -> String {
        let mut description = String::new();
        self.describe_null_and_empty_optional_rules(&mut description);
        self.describe_compared_fields_and_types(&mut description);
        self.describe_ignored_fields_and_types(&mut description);
        self.describe_overridden_equals_usage(&mut description);
        self.describe_collection_order(&mut description);
        self.describe_registered_comparators(&mut description);
        self.describe_type_checking_strictness(&mut description);
        self.describe_error_messages(&mut description);
        description.push_str(&format!(
            "- the introspection strategy used was: {}\n",
            self.introspection_strategy.description()
        ));
        if self.allow_comparing_enum_against_string {
            description.push_str("- enums can be compared against strings (and vice versa), e.g. Color::Red and \"Red\" are considered equal\n");
        }
        description
    }

    fn describe_null_and_empty_optional_rules(&self, description: &mut String) {
        if self.ignore_all_actual_null_fields {
            description.push_str("- all actual null fields were ignored in the comparison\n");
        }
        if self.ignore_all_actual_empty_optional_fields {
            description.push_str("- all actual empty optional fields were ignored in the comparison\n");
        }
        if self.ignore_all_expected_null_fields {
            description.push_str("- all expected null fields were ignored in the comparison\n");
        }
    }

    fn describe_compared_fields_and_types(&self, description: &mut String) {
        if !self.compared_fields.is_empty() {
            description.push_str(&format!(
                "- the comparison was performed on the following fields: {}\n",
                describe_locations(&self.compared_fields)
            ));
        }
        if !self.compared_types.is_empty() {
            description.push_str(&format!(
                "- the comparison was performed on any fields with types: {}\n",
                self.compared_types.join(", ")
            ));
        }
    }

    fn describe_ignored_fields_and_types(&self, description: &mut String) {
        if !self.ignored_fields.is_empty() {
            description.push_str(&format!(
                "- the following fields were ignored in the comparison: {}\n",
                describe_locations(&self.ignored_fields)
            ));
        }
        if !self.ignored_fields_regexes.is_empty() {
            description.push_str(&format!(
                "- the fields matching the following regexes were ignored in the comparison: {}\n",
                describe_regexes(&self.ignored_fields_regexes)
            ));
        }
        if !self.ignored_types.is_empty() {
            description.push_str(&format!(
                "- the following types were ignored in the comparison: {}\n",
                self.ignored_types.join(", ")
            ));
        }
        if !self.ignored_types_regexes.is_empty() {
            description.push_str(&format!(
                "- the types matching the following regexes were ignored in the comparison: {}\n",
                describe_regexes(&self.ignored_types_regexes)
            ));
        }
    }

    fn describe_overridden_equals_usage(&self, description: &mut String) {
        if self.ignore_all_overridden_equals {
            description.push_str(
                "- no overridden equals methods were used in the comparison (except for basic types)\n",
            );
            return;
        }
        description.push_str("- overridden equals methods were used in the comparison");
        let has_exceptions = !self.ignored_overridden_equals_for_fields.is_empty()
            || !self.ignored_overridden_equals_for_types.is_empty()
            || !self.ignored_overridden_equals_for_fields_regexes.is_empty()
            || !self.ignored_overridden_equals_for_types_regexes.is_empty();
        if !has_exceptions {
            description.push('\n');
            return;
        }
        description.push_str(" except for:\n");
        if !self.ignored_overridden_equals_for_fields.is_empty() {
            description.push_str(&format!(
                "{} the following fields: {}\n",
                INDENT_LEVEL_2,
                describe_locations(&self.ignored_overridden_equals_for_fields)
            ));
        }
        if !self.ignored_overridden_equals_for_types.is_empty() {
            description.push_str(&format!(
                "{} the following types: {}\n",
                INDENT_LEVEL_2,
                self.ignored_overridden_equals_for_types.join(", ")
            ));
        }
        if !self.ignored_overridden_equals_for_fields_regexes.is_empty() {
            description.push_str(&format!(
                "{} the fields matching the following regexes: {}\n",
                INDENT_LEVEL_2,
                describe_regexes(&self.ignored_overridden_equals_for_fields_regexes)
            ));
        }
        if !self.ignored_overridden_equals_for_types_regexes.is_empty() {
            description.push_str(&format!(
                "{} the types matching the following regexes: {}\n",
                INDENT_LEVEL_2,
                describe_regexes(&self.ignored_overridden_equals_for_types_regexes)
            ));
        }
    }

    fn describe_collection_order(&self, description: &mut String) {
        if self.ignore_collection_order {
            description.push_str("- collection order was ignored in all fields in the comparison\n");
        }
        if !self.ignored_collection_order_in_fields.is_empty() {
            description.push_str(&format!(
                "- collection order was ignored in the following fields in the comparison: {}\n",
                describe_locations(&self.ignored_collection_order_in_fields)
            ));
        }
        if !self.ignored_collection_order_in_fields_regexes.is_empty() {
            description.push_str(&format!(
                "- collection order was ignored in the fields matching the following regexes in the comparison: {}\n",
                describe_regexes(&self.ignored_collection_order_in_fields_regexes)
            ));
        }
        if self.treat_null_and_empty_iterables_as_equal {
            description.push_str("- null and empty iterables were considered equal\n");
        }
    }

    fn describe_registered_comparators(&self, description: &mut String) {
        if !self.type_comparators.is_empty() {
            description.push_str("- these types were compared with the following comparators:\n");
            for (type_name, comparator) in self.type_comparators.iter() {
                description.push_str(&format!(
                    "{} {} -> {}\n",
                    INDENT_LEVEL_2,
                    type_name,
                    comparator.description()
                ));
            }
        }
        if self.field_comparators.has_field_comparators() {
            description.push_str("- these fields were compared with the following comparators:\n");
            for (field, comparator) in self.field_comparators.iter_fields() {
                description.push_str(&format!(
                    "{} {} -> {}\n",
                    INDENT_LEVEL_2,
                    field,
                    comparator.description()
                ));
            }
        }
        if self.field_comparators.has_regex_field_comparators() {
            description.push_str(
                "- the fields matching these regexes were compared with the following comparators:\n",
            );
            for (regexes, comparator) in self.field_comparators.iter_regexes() {
                description.push_str(&format!(
                    "{} {} -> {}\n",
                    INDENT_LEVEL_2,
                    describe_regexes(regexes),
                    comparator.description()
                ));
            }
        }
        if self.field_comparators.has_field_comparators()
            && self.field_comparators.has_regex_field_comparators()
        {
            description.push_str("- field comparators take precedence over regex field matching comparators.\n");
        }
        if !self.field_comparators.is_empty() && !self.type_comparators.is_empty() {
            description.push_str("- field comparators take precedence over type comparators.\n");
        }
    }

    fn describe_type_checking_strictness(&self, description: &mut String) {
        if self.strict_type_checking {
            description.push_str("- actual and expected objects and their fields were considered different when of incompatible types (i.e. their type names differ) even if all their fields match, for example a Person instance will never match a PersonDto (call with_strict_type_checking(false) to change that behavior).\n");
        } else {
            description.push_str("- actual and expected objects and their fields were compared field by field recursively even if they were not of the same type, this allows for example to compare a Person to a PersonDto (call with_strict_type_checking(true) to change that behavior).\n");
        }
    }

    fn describe_error_messages(&self, description: &mut String) {
        if !self.field_messages.is_empty() {
            let fields: Vec<&str> = self.field_messages.keys().map(String::as_str).collect();
            description.push_str(&format!(
                "- these fields had overridden error messages:\n{} {}\n",
                INDENT_LEVEL_2,
                fields.join(", ")
            ));
            if !self.type_messages.is_empty() {
                description.push_str("- field custom messages take precedence over type messages.\n");
            }
        }
        if !self.type_messages.is_empty() {
            let types: Vec<&str> = self.type_messages.keys().map(String::as_str).collect();
            description.push_str(&format!(
                "- these types had overridden error messages:\n{} {}\n",
                INDENT_LEVEL_2,
                types.join(", ")
            ));
        }
    }
}

fn unwrap_optionals(value: &dyn Introspect) -> &dyn Introspect {
    let mut current = resolve(value);
    while let Node::Optional(Some(inner)) = current.node() {
        current = resolve(inner);
    }
    current
}

pub(crate) fn describe_locations(locations: &[FieldLocation]) -> String {
    locations
        .iter()
        .map(|location| location.path_in_rules())
        .collect::<Vec<_>>()
        .join(", ")
}

pub(crate) fn describe_regexes(regexes: &[PathPattern]) -> String {
    regexes
        .iter()
        .map(PathPattern::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

impl fmt::Display for RecursiveComparisonConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.multi_line_description())
    }
}

impl fmt::Debug for RecursiveComparisonConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecursiveComparisonConfiguration")
            .field("strict_type_checking", &self.strict_type_checking)
            .field("compared_fields", &self.compared_fields)
            .field("compared_types", &self.compared_types)
            .field("ignored_fields", &self.ignored_fields)
            .field("ignored_types", &self.ignored_types)
            .field("ignore_all_overridden_equals", &self.ignore_all_overridden_equals)
            .field("ignore_collection_order", &self.ignore_collection_order)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Consuming builder; the first invalid regex is reported by [`build`]
///
/// [`build`]: RecursiveComparisonConfigurationBuilder::build
#[derive(Clone, Default)]
pub struct RecursiveComparisonConfigurationBuilder {
    configuration: RecursiveComparisonConfiguration,
    error: Option<FieldwiseError>,
}

impl From<RecursiveComparisonConfiguration> for RecursiveComparisonConfigurationBuilder {
    fn from(configuration: RecursiveComparisonConfiguration) -> Self {
        Self {
            configuration,
            error: None,
        }
    }
}

impl RecursiveComparisonConfigurationBuilder {
    fn record(mut self, result: Result<()>) -> Self {
        if let Err(err) = result {
            self.error.get_or_insert(err);
        }
        self
    }

    fn with(mut self, update: impl FnOnce(&mut RecursiveComparisonConfiguration)) -> Self {
        update(&mut self.configuration);
        self
    }

    fn try_with(
        mut self,
        update: impl FnOnce(&mut RecursiveComparisonConfiguration) -> Result<()>,
    ) -> Self {
        let result = update(&mut self.configuration);
        self.record(result)
    }

    pub fn with_strict_type_checking(self, strict: bool) -> Self {
        self.with(|c| c.set_strict_type_checking(strict))
    }

    pub fn ignoring_actual_null_fields(self) -> Self {
        self.with(|c| c.set_ignore_all_actual_null_fields(true))
    }

    pub fn ignoring_actual_empty_optional_fields(self) -> Self {
        self.with(|c| c.set_ignore_all_actual_empty_optional_fields(true))
    }

    pub fn ignoring_expected_null_fields(self) -> Self {
        self.with(|c| c.set_ignore_all_expected_null_fields(true))
    }

    pub fn comparing_only_fields(self, fields: &[&str]) -> Self {
        self.with(|c| c.compare_only_fields(fields))
    }

    pub fn comparing_only_fields_of_type<T: ?Sized>(self) -> Self {
        self.with(|c| c.compare_only_fields_of_type::<T>())
    }

    pub fn ignoring_fields(self, fields: &[&str]) -> Self {
        self.with(|c| c.ignore_fields(fields))
    }

    pub fn ignoring_fields_matching_regexes(self, regexes: &[&str]) -> Self {
        self.try_with(|c| c.ignore_fields_matching_regexes(regexes))
    }

    pub fn ignoring_fields_of_type<T: ?Sized>(self) -> Self {
        self.with(|c| c.ignore_fields_of_type::<T>())
    }

    pub fn ignoring_fields_of_types_matching_regexes(self, regexes: &[&str]) -> Self {
        self.try_with(|c| c.ignore_fields_of_types_matching_regexes(regexes))
    }

    pub fn using_overridden_equals(self) -> Self {
        self.with(|c| c.use_overridden_equals())
    }

    pub fn ignoring_overridden_equals_for_fields(self, fields: &[&str]) -> Self {
        self.with(|c| c.ignore_overridden_equals_for_fields(fields))
    }

    pub fn ignoring_overridden_equals_for_type<T: ?Sized>(self) -> Self {
        self.with(|c| c.ignore_overridden_equals_for_type::<T>())
    }

    pub fn ignoring_overridden_equals_for_fields_matching_regexes(self, regexes: &[&str]) -> Self {
        self.try_with(|c| c.ignore_overridden_equals_for_fields_matching_regexes(regexes))
    }

    pub fn ignoring_overridden_equals_for_types_matching_regexes(self, regexes: &[&str]) -> Self {
        self.try_with(|c| c.ignore_overridden_equals_for_types_matching_regexes(regexes))
    }

    pub fn ignoring_collection_order(self) -> Self {
        self.with(|c| c.set_ignore_collection_order(true))
    }

    pub fn ignoring_collection_order_in_fields(self, fields: &[&str]) -> Self {
        self.with(|c| c.ignore_collection_order_in_fields(fields))
    }

    pub fn ignoring_collection_order_in_fields_matching_regexes(self, regexes: &[&str]) -> Self {
        self.try_with(|c| c.ignore_collection_order_in_fields_matching_regexes(regexes))
    }

    pub fn with_comparator_for_type<T: ?Sized>(self, comparator: Arc<dyn ValueComparator>) -> Self {
        self.with(|c| c.register_comparator_for_type::<T>(comparator))
    }

    pub fn with_equals_for_type<T: 'static>(
        self,
        equals: impl Fn(&T, &T) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.with(|c| c.register_equals_for_type::<T>(equals))
    }

    pub fn with_comparator_for_fields(self, comparator: Arc<dyn ValueComparator>, fields: &[&str]) -> Self {
        self.with(|c| c.register_comparator_for_fields(comparator, fields))
    }

    pub fn with_comparator_for_fields_matching_regexes(
        self,
        comparator: Arc<dyn ValueComparator>,
        regexes: &[&str],
    ) -> Self {
        self.try_with(|c| c.register_comparator_for_fields_matching_regexes(comparator, regexes))
    }

    pub fn with_error_message_for_fields(self, message: &str, fields: &[&str]) -> Self {
        self.with(|c| c.register_error_message_for_fields(message, fields))
    }

    pub fn with_error_message_for_type<T: ?Sized>(self, message: &str) -> Self {
        self.with(|c| c.register_error_message_for_type::<T>(message))
    }

    pub fn treating_null_and_empty_iterables_as_equal(self) -> Self {
        self.with(|c| c.set_treat_null_and_empty_iterables_as_equal(true))
    }

    pub fn with_enums_comparable_to_strings(self) -> Self {
        self.with(|c| c.set_allow_comparing_enum_against_string(true))
    }

    pub fn with_introspection_strategy(self, strategy: Arc<dyn IntrospectionStrategy>) -> Self {
        self.with(|c| c.set_introspection_strategy(strategy))
    }

    pub fn with_representation(self, representation: Arc<dyn Representation>) -> Self {
        self.with(|c| c.set_representation(representation))
    }

    pub fn build(self) -> Result<RecursiveComparisonConfiguration> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.configuration),
        }
    }
}
