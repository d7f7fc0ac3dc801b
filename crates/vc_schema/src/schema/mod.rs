//! Schema constructors and introspection.

// -----------------------------------------------------------------------------
// Modules

mod object;
mod pipe;

// -----------------------------------------------------------------------------
// Exports

pub use object::{UnknownKeys, loose_object, object, object_with, strict_object};
pub use pipe::{Action, Transform, max_length, max_value, min_length, min_value, pipe};

pub(crate) use pipe::ActionKind;

use alloc::borrow::Cow;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;

use crate::{ValidationError, Value};

// -----------------------------------------------------------------------------
// Node

pub(crate) enum Node {
    Any,
    Null,
    Boolean,
    Number,
    Integer,
    String,
    Literal(Value),
    Optional {
        inner: Schema,
        default: Option<Value>,
    },
    Nullable {
        inner: Schema,
        default: Option<Value>,
    },
    Nullish {
        inner: Schema,
    },
    Array(Schema),
    Object {
        entries: Vec<(String, Schema)>,
        unknown_keys: UnknownKeys,
    },
    Pipe {
        inner: Schema,
        actions: Vec<Action>,
    },
    Unresolved(Cow<'static, str>),
}

// -----------------------------------------------------------------------------
// SchemaKind

/// The kind of a [`Schema`], for introspection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaKind {
    Any,
    Null,
    Boolean,
    Number,
    Integer,
    String,
    Literal,
    Optional,
    Nullable,
    Nullish,
    Array,
    Object,
    Pipe,
    Unresolved,
}

// -----------------------------------------------------------------------------
// Schema

/// A validation rule.
///
/// Schemas are immutable and cheap to clone, clones share the same rule.
/// Use the free constructor functions of this crate to create them.
///
/// # Examples
///
/// ```
/// use vc_schema::{SchemaKind, Value};
///
/// let name = vc_schema::string().with(vc_schema::min_length(1));
/// assert_eq!(name.kind(), SchemaKind::Pipe);
///
/// assert!(name.parse(Value::from("John")).is_ok());
/// assert!(name.parse(Value::from("")).is_err());
/// ```
#[derive(Clone)]
pub struct Schema {
    node: Arc<Node>,
}

impl Schema {
    #[inline]
    pub(crate) fn from_node(node: Node) -> Self {
        Self {
            node: Arc::new(node),
        }
    }

    #[inline]
    pub(crate) fn node(&self) -> &Node {
        &self.node
    }

    pub fn kind(&self) -> SchemaKind {
        match self.node() {
            Node::Any => SchemaKind::Any,
            Node::Null => SchemaKind::Null,
            Node::Boolean => SchemaKind::Boolean,
            Node::Number => SchemaKind::Number,
            Node::Integer => SchemaKind::Integer,
            Node::String => SchemaKind::String,
            Node::Literal(_) => SchemaKind::Literal,
            Node::Optional { .. } => SchemaKind::Optional,
            Node::Nullable { .. } => SchemaKind::Nullable,
            Node::Nullish { .. } => SchemaKind::Nullish,
            Node::Array(_) => SchemaKind::Array,
            Node::Object { .. } => SchemaKind::Object,
            Node::Pipe { .. } => SchemaKind::Pipe,
            Node::Unresolved(_) => SchemaKind::Unresolved,
        }
    }

    /// The wrapped schema of wrappers, arrays and pipelines.
    pub fn inner(&self) -> Option<&Schema> {
        match self.node() {
            Node::Optional { inner, .. }
            | Node::Nullable { inner, .. }
            | Node::Nullish { inner }
            | Node::Pipe { inner, .. }
            | Node::Array(inner) => Some(inner),
            _ => None,
        }
    }

    /// The entries of an object schema, in insertion order.
    pub fn entries(&self) -> Option<&[(String, Schema)]> {
        match self.node() {
            Node::Object { entries, .. } => Some(entries),
            _ => None,
        }
    }

    /// The entry `key` of an object schema.
    pub fn entry(&self, key: &str) -> Option<&Schema> {
        self.entries()?
            .iter()
            .find_map(|(name, schema)| (name == key).then_some(schema))
    }

    /// The unknown key policy of an object schema.
    pub fn unknown_keys(&self) -> Option<UnknownKeys> {
        match self.node() {
            Node::Object { unknown_keys, .. } => Some(*unknown_keys),
            _ => None,
        }
    }

    /// The default of `optional_with` or `nullable_with` schemas.
    pub fn default_value(&self) -> Option<&Value> {
        match self.node() {
            Node::Optional { default, .. } | Node::Nullable { default, .. } => default.as_ref(),
            _ => None,
        }
    }

    /// Returns `true` if both handles share the same rule.
    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.node, &other.node)
    }

    /// Appends an action, turning `self` into a pipeline if it is not one yet.
    pub fn with(self, action: Action) -> Schema {
        match self.node() {
            Node::Pipe { inner, actions } => {
                let mut actions = actions.clone();
                actions.push(action);
                Self::from_node(Node::Pipe {
                    inner: inner.clone(),
                    actions,
                })
            }
            _ => Self::from_node(Node::Pipe {
                inner: self,
                actions: alloc::vec![action],
            }),
        }
    }

    /// Appends a check with the given failure message.
    #[inline]
    pub fn check(
        self,
        test: impl Fn(&Value) -> bool + Send + Sync + 'static,
        message: impl Into<Cow<'static, str>>,
    ) -> Schema {
        self.with(Action::check(test, message))
    }

    /// Appends a transform of the validated value.
    #[inline]
    pub fn transform(
        self,
        map: impl Fn(Value) -> Result<Value, String> + Send + Sync + 'static,
    ) -> Schema {
        self.with(Action::transform(map))
    }

    /// See [`parse`](crate::parse).
    #[inline]
    pub fn parse(&self, input: Value) -> Result<Value, ValidationError> {
        crate::parse(self, input)
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.node() {
            Node::Any => f.write_str("any"),
            Node::Null => f.write_str("null"),
            Node::Boolean => f.write_str("boolean"),
            Node::Number => f.write_str("number"),
            Node::Integer => f.write_str("integer"),
            Node::String => f.write_str("string"),
            Node::Literal(value) => write!(f, "literal({value:?})"),
            Node::Optional { inner, default } => match default {
                Some(default) => write!(f, "optional({inner:?}, {default:?})"),
                None => write!(f, "optional({inner:?})"),
            },
            Node::Nullable { inner, default } => match default {
                Some(default) => write!(f, "nullable({inner:?}, {default:?})"),
                None => write!(f, "nullable({inner:?})"),
            },
            Node::Nullish { inner } => write!(f, "nullish({inner:?})"),
            Node::Array(item) => write!(f, "array({item:?})"),
            Node::Object { entries, .. } => {
                let mut map = f.debug_map();
                for (name, schema) in entries {
                    map.entry(name, schema);
                }
                map.finish()
            }
            Node::Pipe { inner, actions } => {
                write!(f, "pipe({inner:?}")?;
                for action in actions {
                    write!(f, ", {action:?}")?;
                }
                f.write_str(")")
            }
            Node::Unresolved(label) => write!(f, "unresolved({label})"),
        }
    }
}

// -----------------------------------------------------------------------------
// Primitives

/// Accepts anything, including a missing value.
pub fn any() -> Schema {
    Schema::from_node(Node::Any)
}

pub fn null() -> Schema {
    Schema::from_node(Node::Null)
}

pub fn boolean() -> Schema {
    Schema::from_node(Node::Boolean)
}

/// Accepts any number except `NaN`.
///
/// Infinities pass, but [`Value`]'s `Serialize` refuses them, so they cannot
/// leave the process through a serde format. Add a check with
/// `f64::is_finite` where that matters.
pub fn number() -> Schema {
    Schema::from_node(Node::Number)
}

/// Accepts finite numbers without a fractional part.
pub fn integer() -> Schema {
    Schema::from_node(Node::Integer)
}

pub fn string() -> Schema {
    Schema::from_node(Node::String)
}

/// Accepts exactly `value`.
pub fn literal(value: impl Into<Value>) -> Schema {
    Schema::from_node(Node::Literal(value.into()))
}

/// A placeholder that rejects every input, naming `label` in the issue.
///
/// Stands in for references that could not be resolved to a schema.
pub fn unresolved(label: impl Into<Cow<'static, str>>) -> Schema {
    Schema::from_node(Node::Unresolved(label.into()))
}

// -----------------------------------------------------------------------------
// Wrappers

/// Accepts a missing value, which stays missing.
pub fn optional(inner: Schema) -> Schema {
    Schema::from_node(Node::Optional {
        inner,
        default: None,
    })
}

/// Replaces a missing value with `default`, which is then validated by `inner`.
pub fn optional_with(inner: Schema, default: impl Into<Value>) -> Schema {
    Schema::from_node(Node::Optional {
        inner,
        default: Some(default.into()),
    })
}

/// Accepts `null`.
pub fn nullable(inner: Schema) -> Schema {
    Schema::from_node(Node::Nullable {
        inner,
        default: None,
    })
}

/// Replaces `null` with `default`, which is then validated by `inner`.
pub fn nullable_with(inner: Schema, default: impl Into<Value>) -> Schema {
    Schema::from_node(Node::Nullable {
        inner,
        default: Some(default.into()),
    })
}

/// Accepts `null` and a missing value.
pub fn nullish(inner: Schema) -> Schema {
    Schema::from_node(Node::Nullish { inner })
}

/// Accepts arrays whose items all match `item`.
pub fn array(item: Schema) -> Schema {
    Schema::from_node(Node::Array(item))
}
