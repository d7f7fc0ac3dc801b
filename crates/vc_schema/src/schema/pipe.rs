use alloc::borrow::Cow;
use alloc::format;
use alloc::string::String;
use alloc::sync::Arc;
use core::fmt;

use super::{Node, Schema};
use crate::Value;

/// A shared, fallible mapping of a validated value.
pub type Transform = Arc<dyn Fn(Value) -> Result<Value, String> + Send + Sync>;

type Test = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

// -----------------------------------------------------------------------------
// Action

/// One step of a pipeline, run after the wrapped schema accepted the value.
///
/// Actions run in order. The first failing action stops the pipeline.
#[derive(Clone)]
pub struct Action(pub(crate) ActionKind);

#[derive(Clone)]
pub(crate) enum ActionKind {
    Check {
        label: Cow<'static, str>,
        test: Test,
        message: Cow<'static, str>,
    },
    Transform(Transform),
}

impl Action {
    /// A check that rejects values for which `test` returns `false`.
    pub fn check(
        test: impl Fn(&Value) -> bool + Send + Sync + 'static,
        message: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self(ActionKind::Check {
            label: Cow::Borrowed("check"),
            test: Arc::new(test),
            message: message.into(),
        })
    }

    /// A transform replacing the value with the result of `map`.
    pub fn transform(map: impl Fn(Value) -> Result<Value, String> + Send + Sync + 'static) -> Self {
        Self(ActionKind::Transform(Arc::new(map)))
    }

    fn labeled(
        label: String,
        message: String,
        test: impl Fn(&Value) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self(ActionKind::Check {
            label: Cow::Owned(label),
            test: Arc::new(test),
            message: Cow::Owned(message),
        })
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            ActionKind::Check { label, .. } => f.write_str(label),
            ActionKind::Transform(_) => f.write_str("transform"),
        }
    }
}

/// `schema` followed by `map`, which runs only if `schema` accepted the value.
///
/// # Examples
///
/// ```
/// use vc_schema::Value;
///
/// let trimmed = vc_schema::pipe(vc_schema::string(), |value| match value {
///     Value::String(s) => Ok(Value::from(s.trim())),
///     other => Ok(other),
/// });
///
/// assert_eq!(trimmed.parse(Value::from("  a  ")).unwrap(), Value::from("a"));
/// ```
pub fn pipe(
    schema: Schema,
    map: impl Fn(Value) -> Result<Value, String> + Send + Sync + 'static,
) -> Schema {
    Schema::from_node(Node::Pipe {
        inner: schema,
        actions: alloc::vec![Action::transform(map)],
    })
}

// -----------------------------------------------------------------------------
// Checks

fn length_of(value: &Value) -> Option<usize> {
    match value {
        Value::String(s) => Some(s.chars().count()),
        Value::Array(items) => Some(items.len()),
        _ => None,
    }
}

/// Strings (in characters) or arrays with at least `min` elements.
pub fn min_length(min: usize) -> Action {
    Action::labeled(
        format!("min_length({min})"),
        format!("length must be at least {min}"),
        move |value| length_of(value).is_some_and(|len| len >= min),
    )
}

/// Strings (in characters) or arrays with at most `max` elements.
pub fn max_length(max: usize) -> Action {
    Action::labeled(
        format!("max_length({max})"),
        format!("length must be at most {max}"),
        move |value| length_of(value).is_some_and(|len| len <= max),
    )
}

/// Numbers greater than or equal to `min`.
pub fn min_value(min: f64) -> Action {
    Action::labeled(
        format!("min_value({min})"),
        format!("value must be at least {min}"),
        move |value| value.as_f64().is_some_and(|v| v >= min),
    )
}

/// Numbers less than or equal to `max`.
pub fn max_value(max: f64) -> Action {
    Action::labeled(
        format!("max_value({max})"),
        format!("value must be at most {max}"),
        move |value| value.as_f64().is_some_and(|v| v <= max),
    )
}
