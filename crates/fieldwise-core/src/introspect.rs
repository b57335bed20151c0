//! Type-erased view of values for the comparison engine.
//!
//! Rust has no runtime reflection, so every value taking part in a recursive
//! comparison exposes itself through [`Introspect::node`]. A [`Node`] is a
//! shallow view: leaves may own their payload, but composite children are
//! always borrowed from the introspected value so the engine can keep them on
//! its work stack for the whole comparison.
//!
//! User types implement [`Introspect`] by hand or with [`introspect_struct!`],
//! [`introspect_enum!`] and [`introspect_error!`].

use std::any::Any;
use std::borrow::Cow;
use std::cell::OnceCell;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

/// Whether a sequence has a meaningful element order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeqKind {
    Ordered,
    Unordered,
}

/// A named child of a struct or enum variant
pub struct Field<'a> {
    pub name: Cow<'a, str>,
    pub value: &'a dyn Introspect,
}

impl<'a> Field<'a> {
    pub fn new(name: impl Into<Cow<'a, str>>, value: &'a dyn Introspect) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// Shallow, type-erased view of one value
pub enum Node<'a> {
    /// Absent value (JSON `null`)
    Null,
    Bool(bool),
    Int(i128),
    Float(f64),
    Char(char),
    Str(Cow<'a, str>),
    Unit,
    /// Enum variant; unit variants have no fields
    Variant {
        name: Cow<'a, str>,
        fields: Vec<Field<'a>>,
    },
    Seq {
        kind: SeqKind,
        items: Vec<&'a dyn Introspect>,
    },
    /// Map entries keyed by the `Display` rendering of the key
    Map {
        sorted: bool,
        entries: Vec<(String, &'a dyn Introspect)>,
    },
    Optional(Option<&'a dyn Introspect>),
    Struct(Vec<Field<'a>>),
    Error {
        message: Cow<'a, str>,
        source: Option<&'a dyn Introspect>,
    },
    /// Transparent pointer (`Box`, `Rc`, `Arc`, `&T`)
    Ref(&'a dyn Introspect),
}

impl<'a> Node<'a> {
    /// Basic values compared with plain equality
    pub fn is_leaf(&self) -> bool {
        matches!(
            self,
            Node::Bool(_)
                | Node::Int(_)
                | Node::Float(_)
                | Node::Char(_)
                | Node::Str(_)
                | Node::Unit
        )
    }

    /// Values that own children and can therefore take part in a cycle
    pub fn is_composite(&self) -> bool {
        match self {
            Node::Variant { fields, .. } => !fields.is_empty(),
            Node::Seq { .. }
            | Node::Map { .. }
            | Node::Optional(_)
            | Node::Struct(_)
            | Node::Error { .. } => true,
            _ => false,
        }
    }

    /// Named children of a struct or enum variant
    pub fn fields(&self) -> Option<&[Field<'a>]> {
        match self {
            Node::Struct(fields) | Node::Variant { fields, .. } => Some(fields),
            _ => None,
        }
    }

    /// Numeric value of an integer or float leaf
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Node::Int(i) => Some(*i as f64),
            Node::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Short description of the node kind used in difference messages
    pub fn kind(&self) -> &'static str {
        match self {
            Node::Null => "null",
            Node::Bool(_) => "a boolean",
            Node::Int(_) => "an integer",
            Node::Float(_) => "a float",
            Node::Char(_) => "a char",
            Node::Str(_) => "a string",
            Node::Unit => "a unit",
            Node::Variant { .. } => "an enum",
            Node::Seq {
                kind: SeqKind::Ordered,
                ..
            } => "an ordered collection",
            Node::Seq { .. } => "an unordered collection",
            Node::Map { sorted: true, .. } => "a sorted map",
            Node::Map { .. } => "a map",
            Node::Optional(_) => "an optional",
            Node::Struct(_) => "a struct",
            Node::Error { .. } => "an error",
            Node::Ref(_) => "a reference",
        }
    }
}

/// Exposes a value to the recursive comparison engine
pub trait Introspect {
    fn node(&self) -> Node<'_>;

    /// Type name used by type rules, strict type checking and reports
    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Needed by typed comparators (`TypedEquals`, `TypedOrdering`)
    fn as_any(&self) -> Option<&dyn Any> {
        None
    }

    /// Type-specific equality, used when the comparison honors overridden equals
    fn dyn_eq(&self, _other: &dyn Introspect) -> Option<bool> {
        None
    }
}

/// Address and type name of a value, used for cycle detection
pub type Identity = (usize, &'static str);

/// Follow `Ref` nodes to the pointee
pub fn resolve<'a>(value: &'a dyn Introspect) -> &'a dyn Introspect {
    let mut current = value;
    while let Node::Ref(inner) = current.node() {
        current = inner;
    }
    current
}

/// Identity of a value; the type name keeps a struct and its first field apart
pub fn identity(value: &dyn Introspect) -> Identity {
    (
        value as *const dyn Introspect as *const () as usize,
        value.type_name(),
    )
}

/// `crate::module::Type<Generic>` -> `Type`
pub fn simple_type_name(type_name: &str) -> &str {
    let base = type_name.split('<').next().unwrap_or(type_name);
    base.rsplit("::").next().unwrap_or(base)
}

// ---------------------------------------------------------------------------
// Leaves
// ---------------------------------------------------------------------------

macro_rules! introspect_int {
    ($($t:ty),*) => {$(
        impl Introspect for $t {
            fn node(&self) -> Node<'_> {
                Node::Int(i128::from(*self))
            }

            fn as_any(&self) -> Option<&dyn Any> {
                Some(self)
            }
        }
    )*};
}

introspect_int!(i8, i16, i32, i64, i128, u8, u16, u32, u64);

macro_rules! introspect_size {
    ($($t:ty),*) => {$(
        impl Introspect for $t {
            fn node(&self) -> Node<'_> {
                Node::Int(*self as i128)
            }

            fn as_any(&self) -> Option<&dyn Any> {
                Some(self)
            }
        }
    )*};
}

introspect_size!(isize, usize);

impl Introspect for f32 {
    fn node(&self) -> Node<'_> {
        Node::Float(f64::from(*self))
    }

    fn as_any(&self) -> Option<&dyn Any> {
        Some(self)
    }
}

impl Introspect for f64 {
    fn node(&self) -> Node<'_> {
        Node::Float(*self)
    }

    fn as_any(&self) -> Option<&dyn Any> {
        Some(self)
    }
}

impl Introspect for bool {
    fn node(&self) -> Node<'_> {
        Node::Bool(*self)
    }

    fn as_any(&self) -> Option<&dyn Any> {
        Some(self)
    }
}

impl Introspect for char {
    fn node(&self) -> Node<'_> {
        Node::Char(*self)
    }

    fn as_any(&self) -> Option<&dyn Any> {
        Some(self)
    }
}

impl Introspect for () {
    fn node(&self) -> Node<'_> {
        Node::Unit
    }

    fn as_any(&self) -> Option<&dyn Any> {
        Some(self)
    }
}

impl Introspect for str {
    fn node(&self) -> Node<'_> {
        Node::Str(Cow::Borrowed(self))
    }
}

impl Introspect for String {
    fn node(&self) -> Node<'_> {
        Node::Str(Cow::Borrowed(self.as_str()))
    }

    fn as_any(&self) -> Option<&dyn Any> {
        Some(self)
    }
}

impl<'c> Introspect for Cow<'c, str> {
    fn node(&self) -> Node<'_> {
        Node::Str(Cow::Borrowed(self.as_ref()))
    }
}

impl Introspect for Path {
    fn node(&self) -> Node<'_> {
        Node::Str(self.to_string_lossy())
    }
}

impl Introspect for PathBuf {
    fn node(&self) -> Node<'_> {
        Node::Str(self.to_string_lossy())
    }

    fn as_any(&self) -> Option<&dyn Any> {
        Some(self)
    }
}

/// Durations compare as whole nanoseconds
impl Introspect for Duration {
    fn node(&self) -> Node<'_> {
        Node::Int(i128::try_from(self.as_nanos()).unwrap_or(i128::MAX))
    }

    fn as_any(&self) -> Option<&dyn Any> {
        Some(self)
    }
}

impl Introspect for std::io::Error {
    fn node(&self) -> Node<'_> {
        Node::Error {
            message: Cow::Owned(self.to_string()),
            source: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Containers
// ---------------------------------------------------------------------------

fn ordered<'a, T: Introspect + 'a>(items: impl Iterator<Item = &'a T>) -> Node<'a> {
    Node::Seq {
        kind: SeqKind::Ordered,
        items: items.map(|item| item as &dyn Introspect).collect(),
    }
}

impl<T: Introspect> Introspect for Option<T> {
    fn node(&self) -> Node<'_> {
        Node::Optional(self.as_ref().map(|value| value as &dyn Introspect))
    }
}

/// An uninitialized cell is an empty optional; `Rc` cycles are built through it
impl<T: Introspect> Introspect for OnceCell<T> {
    fn node(&self) -> Node<'_> {
        Node::Optional(self.get().map(|value| value as &dyn Introspect))
    }
}

impl<T: Introspect> Introspect for Vec<T> {
    fn node(&self) -> Node<'_> {
        ordered(self.iter())
    }
}

impl<T: Introspect> Introspect for [T] {
    fn node(&self) -> Node<'_> {
        ordered(self.iter())
    }
}

impl<T: Introspect, const N: usize> Introspect for [T; N] {
    fn node(&self) -> Node<'_> {
        ordered(self.iter())
    }
}

impl<T: Introspect> Introspect for VecDeque<T> {
    fn node(&self) -> Node<'_> {
        ordered(self.iter())
    }
}

impl<T: Introspect> Introspect for BTreeSet<T> {
    fn node(&self) -> Node<'_> {
        ordered(self.iter())
    }
}

impl<T: Introspect, S> Introspect for HashSet<T, S> {
    fn node(&self) -> Node<'_> {
        Node::Seq {
            kind: SeqKind::Unordered,
            items: self.iter().map(|item| item as &dyn Introspect).collect(),
        }
    }
}

impl<K: Display, V: Introspect, S> Introspect for HashMap<K, V, S> {
    fn node(&self) -> Node<'_> {
        Node::Map {
            sorted: false,
            entries: self
                .iter()
                .map(|(k, v)| (k.to_string(), v as &dyn Introspect))
                .collect(),
        }
    }
}

impl<K: Display, V: Introspect> Introspect for BTreeMap<K, V> {
    fn node(&self) -> Node<'_> {
        Node::Map {
            sorted: true,
            entries: self
                .iter()
                .map(|(k, v)| (k.to_string(), v as &dyn Introspect))
                .collect(),
        }
    }
}

impl<A: Introspect, B: Introspect> Introspect for (A, B) {
    fn node(&self) -> Node<'_> {
        Node::Struct(vec![Field::new("0", &self.0), Field::new("1", &self.1)])
    }
}

impl<A: Introspect, B: Introspect, C: Introspect> Introspect for (A, B, C) {
    fn node(&self) -> Node<'_> {
        Node::Struct(vec![
            Field::new("0", &self.0),
            Field::new("1", &self.1),
            Field::new("2", &self.2),
        ])
    }
}

// ---------------------------------------------------------------------------
// Pointers
// ---------------------------------------------------------------------------

impl<T: Introspect> Introspect for &T {
    fn node(&self) -> Node<'_> {
        Node::Ref(*self)
    }
}

impl<T: Introspect> Introspect for Box<T> {
    fn node(&self) -> Node<'_> {
        Node::Ref(self.as_ref())
    }
}

impl<T: Introspect> Introspect for Rc<T> {
    fn node(&self) -> Node<'_> {
        Node::Ref(self.as_ref())
    }
}

impl<T: Introspect> Introspect for Arc<T> {
    fn node(&self) -> Node<'_> {
        Node::Ref(self.as_ref())
    }
}

// ---------------------------------------------------------------------------
// JSON documents
// ---------------------------------------------------------------------------

/// JSON objects introspect as structs so field rules apply to their keys
impl Introspect for serde_json::Value {
    fn node(&self) -> Node<'_> {
        use serde_json::Value;
        match self {
            Value::Null => Node::Null,
            Value::Bool(b) => Node::Bool(*b),
            Value::Number(n) => match n.as_i64().map(i128::from) {
                Some(i) => Node::Int(i),
                None => match n.as_u64() {
                    Some(u) => Node::Int(i128::from(u)),
                    None => Node::Float(n.as_f64().unwrap_or(f64::NAN)),
                },
            },
            Value::String(s) => Node::Str(Cow::Borrowed(s.as_str())),
            Value::Array(items) => ordered(items.iter()),
            Value::Object(map) => Node::Struct(
                map.iter()
                    .map(|(name, value)| Field::new(name.as_str(), value))
                    .collect(),
            ),
        }
    }

    fn type_name(&self) -> &'static str {
        use serde_json::Value;
        match self {
            Value::Null => "json::null",
            Value::Bool(_) => "json::bool",
            Value::Number(_) => "json::number",
            Value::String(_) => "json::string",
            Value::Array(_) => "json::array",
            Value::Object(_) => "json::object",
        }
    }

    fn as_any(&self) -> Option<&dyn Any> {
        Some(self)
    }
}

// ---------------------------------------------------------------------------
// Macros
// ---------------------------------------------------------------------------

/// Implement [`Introspect`] for a struct by listing its fields.
///
/// Adding `with PartialEq` makes the type's `==` available to comparisons
/// that honor overridden equals.
///
/// ```
/// use fieldwise_core::introspect_struct;
///
/// #[derive(PartialEq)]
/// struct Point {
///     x: i32,
///     y: i32,
/// }
///
/// introspect_struct!(Point { x, y } with PartialEq);
/// ```
#[macro_export]
macro_rules! introspect_struct {
    ($ty:ty { $($field:tt),* $(,)? } with PartialEq) => {
        impl $crate::introspect::Introspect for $ty {
            fn node(&self) -> $crate::introspect::Node<'_> {
                $crate::introspect::Node::Struct(vec![
                    $($crate::introspect::Field::new(stringify!($field), &self.$field)),*
                ])
            }

            fn as_any(&self) -> Option<&dyn ::std::any::Any> {
                Some(self)
            }

            fn dyn_eq(&self, other: &dyn $crate::introspect::Introspect) -> Option<bool> {
                Some(
                    other
                        .as_any()
                        .and_then(|other| other.downcast_ref::<Self>())
                        .is_some_and(|other| self == other),
                )
            }
        }
    };
    ($ty:ty { $($field:tt),* $(,)? }) => {
        impl $crate::introspect::Introspect for $ty {
            fn node(&self) -> $crate::introspect::Node<'_> {
                $crate::introspect::Node::Struct(vec![
                    $($crate::introspect::Field::new(stringify!($field), &self.$field)),*
                ])
            }

            fn as_any(&self) -> Option<&dyn ::std::any::Any> {
                Some(self)
            }
        }
    };
}

/// Implement [`Introspect`] for a unit-only enum by listing its variants.
#[macro_export]
macro_rules! introspect_enum {
    ($ty:ty { $($variant:ident),* $(,)? }) => {
        impl $crate::introspect::Introspect for $ty {
            fn node(&self) -> $crate::introspect::Node<'_> {
                let name = match self {
                    $(Self::$variant => stringify!($variant)),*
                };
                $crate::introspect::Node::Variant {
                    name: ::std::borrow::Cow::Borrowed(name),
                    fields: Vec::new(),
                }
            }

            fn as_any(&self) -> Option<&dyn ::std::any::Any> {
                Some(self)
            }
        }
    };
}

/// Implement [`Introspect`] for an error type through its `Display` message.
#[macro_export]
macro_rules! introspect_error {
    ($ty:ty) => {
        impl $crate::introspect::Introspect for $ty {
            fn node(&self) -> $crate::introspect::Node<'_> {
                $crate::introspect::Node::Error {
                    message: ::std::borrow::Cow::Owned(self.to_string()),
                    source: None,
                }
            }

            fn as_any(&self) -> Option<&dyn ::std::any::Any> {
                Some(self)
            }
        }
    };
}
