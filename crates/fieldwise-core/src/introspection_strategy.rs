//! How the comparison finds the children of a struct or enum variant.

use crate::introspect::{Introspect, Node};
use std::sync::Arc;

pub trait IntrospectionStrategy: Send + Sync {
    /// Names of the children to compare, in declaration order
    fn children_node_names(&self, value: &dyn Introspect) -> Vec<String>;

    /// Value of the child called `name`, `None` when there is no such child
    fn child_node_value<'a>(
        &self,
        name: &str,
        value: &'a dyn Introspect,
    ) -> Option<&'a dyn Introspect>;

    fn description(&self) -> String;
}

/// Struct and variant fields as declared
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultIntrospectionStrategy;

impl IntrospectionStrategy for DefaultIntrospectionStrategy {
    fn children_node_names(&self, value: &dyn Introspect) -> Vec<String> {
        normalized_children_names(value, |name| name.to_string())
    }

    fn child_node_value<'a>(
        &self,
        name: &str,
        value: &'a dyn Introspect,
    ) -> Option<&'a dyn Introspect> {
        normalized_child_value(name, value, |name| name.to_string())
    }

    fn description(&self) -> String {
        "comparing fields".to_string()
    }
}

fn normalized_children_names(
    value: &dyn Introspect,
    normalize: impl Fn(&str) -> String,
) -> Vec<String> {
    let node = value.node();
    let mut names: Vec<String> = Vec::new();
    for field in node.fields().unwrap_or_default() {
        let name = normalize(&field.name);
        if !names.contains(&name) {
            names.push(name);
        }
    }
    names
}

// the requested name is normalized, the declared one may not be
fn normalized_child_value<'a>(
    name: &str,
    value: &'a dyn Introspect,
    normalize: impl Fn(&str) -> String,
) -> Option<&'a dyn Introspect> {
    let node = value.node();
    let fields = node.fields()?;
    fields
        .iter()
        .find(|field| field.name == name)
        .or_else(|| fields.iter().find(|field| normalize(&field.name) == name))
        .map(|field| field.value)
}

/// Field names are normalized before matching, so values whose types follow
/// different naming conventions can be compared
#[derive(Clone)]
pub struct ComparingNormalizedFields {
    normalizer: Arc<dyn Fn(&str) -> String + Send + Sync>,
    description: String,
}

impl ComparingNormalizedFields {
    pub fn new(
        description: impl Into<String>,
        normalizer: impl Fn(&str) -> String + Send + Sync + 'static,
    ) -> Self {
        Self {
            normalizer: Arc::new(normalizer),
            description: description.into(),
        }
    }

    pub fn normalize(&self, name: &str) -> String {
        (self.normalizer)(name)
    }
}

impl IntrospectionStrategy for ComparingNormalizedFields {
    fn children_node_names(&self, value: &dyn Introspect) -> Vec<String> {
        normalized_children_names(value, |name| self.normalize(name))
    }

    fn child_node_value<'a>(
        &self,
        name: &str,
        value: &'a dyn Introspect,
    ) -> Option<&'a dyn Introspect> {
        normalized_child_value(name, value, |name| self.normalize(name))
    }

    fn description(&self) -> String {
        self.description.clone()
    }
}

/// Matches `first_name` against `firstName`
#[derive(Debug, Clone, Copy, Default)]
pub struct ComparingSnakeOrCamelCaseFields;

impl ComparingSnakeOrCamelCaseFields {
    /// snake_case to camelCase, camelCase is left untouched
    pub fn normalize(name: &str) -> String {
        let mut normalized = String::with_capacity(name.len());
        let mut upper_next = false;
        for c in name.chars() {
            if c == '_' {
                upper_next = !normalized.is_empty();
            } else if upper_next {
                normalized.extend(c.to_uppercase());
                upper_next = false;
            } else {
                normalized.push(c);
            }
        }
        normalized
    }
}

impl IntrospectionStrategy for ComparingSnakeOrCamelCaseFields {
    fn children_node_names(&self, value: &dyn Introspect) -> Vec<String> {
        normalized_children_names(value, Self::normalize)
    }

    fn child_node_value<'a>(
        &self,
        name: &str,
        value: &'a dyn Introspect,
    ) -> Option<&'a dyn Introspect> {
        normalized_child_value(name, value, Self::normalize)
    }

    fn description(&self) -> String {
        "comparing camelCase and snake_case fields".to_string()
    }
}

/// True for values whose children are found through a strategy
pub fn has_named_children(value: &dyn Introspect) -> bool {
    matches!(value.node(), Node::Struct(_) | Node::Variant { .. })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::introspect_struct;

    struct SnakePerson {
        first_name: String,
        age: u32,
    }

    struct CamelPerson {
        #[allow(non_snake_case)]
        firstName: String,
        age: u32,
    }

    introspect_struct!(SnakePerson { first_name, age });
    introspect_struct!(CamelPerson { firstName, age });

    #[test]
    fn test_default_strategy_lists_declared_fields() {
        let person = SnakePerson {
            first_name: "Ada".to_string(),
            age: 36,
        };
        let strategy = DefaultIntrospectionStrategy;
        assert_eq!(strategy.children_node_names(&person), vec!["first_name", "age"]);
        assert!(strategy.child_node_value("age", &person).is_some());
        assert!(strategy.child_node_value("firstName", &person).is_none());
    }

    #[test]
    fn test_snake_case_normalization() {
        assert_eq!(ComparingSnakeOrCamelCaseFields::normalize("first_name"), "firstName");
        assert_eq!(ComparingSnakeOrCamelCaseFields::normalize("firstName"), "firstName");
        assert_eq!(ComparingSnakeOrCamelCaseFields::normalize("age"), "age");
        assert_eq!(ComparingSnakeOrCamelCaseFields::normalize("_private"), "private");
    }

    #[test]
    fn test_snake_and_camel_children_line_up() {
        let snake = SnakePerson {
            first_name: "Ada".to_string(),
            age: 36,
        };
        let camel = CamelPerson {
            firstName: "Ada".to_string(),
            age: 36,
        };
        let strategy = ComparingSnakeOrCamelCaseFields;
        assert_eq!(
            strategy.children_node_names(&snake),
            strategy.children_node_names(&camel)
        );
        assert!(strategy.child_node_value("firstName", &snake).is_some());
        assert!(strategy.child_node_value("firstName", &camel).is_some());
    }

    #[test]
    fn test_custom_normalizer() {
        let strategy =
            ComparingNormalizedFields::new("comparing lowercase fields", |name| name.to_lowercase());
        let doc = serde_json::json!({"Name": "Ada"});
        assert_eq!(strategy.children_node_names(&doc), vec!["name"]);
        assert!(strategy.child_node_value("name", &doc).is_some());
        assert_eq!(strategy.description(), "comparing lowercase fields");
    }

    #[test]
    fn test_leaves_have_no_children() {
        assert!(DefaultIntrospectionStrategy.children_node_names(&3_i32).is_empty());
        assert!(!has_named_children(&3_i32));
    }
}
