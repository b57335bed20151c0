//! Text rendering of introspected values for difference reports.

use crate::introspect::{identity, resolve, simple_type_name, Field, Identity, Introspect, Node, SeqKind};
use std::time::Duration;

const DEFAULT_MAX_DEPTH: usize = 16;
const DEFAULT_MAX_ELEMENTS: usize = 100;

pub trait Representation: Send + Sync {
    fn to_string_of(&self, value: &dyn Introspect) -> String;

    /// Used when two different values render to the same text
    fn unambiguous_to_string_of(&self, value: &dyn Introspect) -> String {
        format!("{} ({})", self.to_string_of(value), value.type_name())
    }
}

/// Render a possibly absent value, absent values are `null`
pub fn to_string_of_option(
    representation: &dyn Representation,
    value: Option<&dyn Introspect>,
) -> String {
    match value {
        Some(value) => representation.to_string_of(value),
        None => "null".to_string(),
    }
}

/// Rust-like rendering: `"text"`, `Some(1)`, `[a, b]`, `{k: v}`,
/// `Person { name: "Ada" }`
///
/// Unordered collections and maps are rendered sorted so reports are stable.
/// Values already being rendered higher up the graph are shown as `(cycle)`.
#[derive(Debug, Clone, Copy)]
pub struct StandardRepresentation {
    max_depth: usize,
    max_elements: usize,
}

impl Default for StandardRepresentation {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_elements: DEFAULT_MAX_ELEMENTS,
        }
    }
}

impl StandardRepresentation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Nesting level below which values are elided as `...`
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Collections longer than this are truncated with `...`
    pub fn with_max_elements(mut self, max_elements: usize) -> Self {
        self.max_elements = max_elements;
        self
    }

    fn render(&self, value: &dyn Introspect, depth: usize, stack: &mut Vec<Identity>) -> String {
        let value = resolve(value);
        if let Some(text) = render_special(value) {
            return text;
        }
        let node = value.node();
        if !node.is_composite() {
            return render_leaf(&node);
        }
        if depth >= self.max_depth {
            return "...".to_string();
        }
        let id = identity(value);
        if stack.contains(&id) {
            return "(cycle)".to_string();
        }
        stack.push(id);
        let text = self.render_composite(value, node, depth + 1, stack);
        stack.pop();
        text
    }

    fn render_composite(
        &self,
        value: &dyn Introspect,
        node: Node<'_>,
        depth: usize,
        stack: &mut Vec<Identity>,
    ) -> String {
        match node {
            Node::Variant { name, fields } => {
                format!("{}{}", name, self.render_fields(&fields, depth, stack))
            }
            Node::Struct(fields) => {
                let type_name = value.type_name();
                let prefix = if type_name.starts_with('(') {
                    ""
                } else {
                    simple_type_name(type_name)
                };
                format!("{}{}", prefix, self.render_fields(&fields, depth, stack))
            }
            Node::Seq { kind, items } => {
                let mut rendered: Vec<String> = items
                    .iter()
                    .take(self.max_elements)
                    .map(|item| self.render(*item, depth, stack))
                    .collect();
                if kind == SeqKind::Unordered {
                    rendered.sort();
                }
                if items.len() > self.max_elements {
                    rendered.push("...".to_string());
                }
                format!("[{}]", rendered.join(", "))
            }
            Node::Map { sorted, entries } => {
                let mut rendered: Vec<(String, String)> = entries
                    .iter()
                    .take(self.max_elements)
                    .map(|(key, item)| (key.clone(), self.render(*item, depth, stack)))
                    .collect();
                if !sorted {
                    rendered.sort();
                }
                let mut parts: Vec<String> = rendered
                    .into_iter()
                    .map(|(key, item)| format!("{}: {}", key, item))
                    .collect();
                if entries.len() > self.max_elements {
                    parts.push("...".to_string());
                }
                format!("{{{}}}", parts.join(", "))
            }
            Node::Optional(Some(inner)) => format!("Some({})", self.render(inner, depth, stack)),
            Node::Optional(None) => "None".to_string(),
            Node::Error { message, .. } => {
                format!("{}({:?})", simple_type_name(value.type_name()), message)
            }
            other => render_leaf(&other),
        }
    }

    fn render_fields(&self, fields: &[Field<'_>], depth: usize, stack: &mut Vec<Identity>) -> String {
        if fields.is_empty() {
            return String::new();
        }
        let positional = fields
            .iter()
            .all(|field| field.name.chars().all(|c| c.is_ascii_digit()));
        if positional {
            let items: Vec<String> = fields
                .iter()
                .map(|field| self.render(field.value, depth, stack))
                .collect();
            format!("({})", items.join(", "))
        } else {
            let items: Vec<String> = fields
                .iter()
                .map(|field| format!("{}: {}", field.name, self.render(field.value, depth, stack)))
                .collect();
            format!(" {{ {} }}", items.join(", "))
        }
    }
}

impl Representation for StandardRepresentation {
    fn to_string_of(&self, value: &dyn Introspect) -> String {
        self.render(value, 0, &mut Vec::new())
    }
}

// Types whose node loses information a reader expects to see
fn render_special(value: &dyn Introspect) -> Option<String> {
    let any = value.as_any()?;
    if let Some(json) = any.downcast_ref::<serde_json::Value>() {
        return serde_json::to_string(json).ok();
    }
    if let Some(duration) = any.downcast_ref::<Duration>() {
        return Some(format!("{:?}", duration));
    }
    None
}

fn render_leaf(node: &Node<'_>) -> String {
    match node {
        Node::Null => "null".to_string(),
        Node::Bool(b) => b.to_string(),
        Node::Int(i) => i.to_string(),
        Node::Float(f) => format!("{:?}", f),
        Node::Char(c) => format!("{:?}", c),
        Node::Str(s) => format!("{:?}", s),
        Node::Unit => "()".to_string(),
        Node::Variant { name, .. } => name.to_string(),
        other => other.kind().to_string(),
    }
}
