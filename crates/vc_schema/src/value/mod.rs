//! Plain structured values.

// -----------------------------------------------------------------------------
// Modules

mod instance;
mod serde;

// -----------------------------------------------------------------------------
// Exports

pub use instance::{Instance, Object};

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

// -----------------------------------------------------------------------------
// Value

/// A plain record: field name to value.
pub type Record = BTreeMap<String, Value>;

/// A plain structured value, as carried by JSON-like transports.
///
/// [`Value::Instance`] is the only non-plain variant. It is produced by
/// transforms that materialize records into real objects, and can be lowered
/// back with [`Value::into_plain`].
#[derive(Clone, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Array(Vec<Value>),
    Record(Record),
    Instance(Instance),
}

impl Value {
    /// Builds a [`Value::Record`] from key-value pairs.
    ///
    /// Later pairs overwrite earlier ones with the same key.
    pub fn record<K, I>(pairs: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        Self::Record(pairs.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Returns the name of this value's kind, as used in issue messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::Array(_) => "array",
            Self::Record(_) => "record",
            Self::Instance(_) => "instance",
        }
    }

    #[inline]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[inline]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    #[inline]
    pub const fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(v) => Some(*v),
            _ => None,
        }
    }

    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(v) => Some(v),
            _ => None,
        }
    }

    #[inline]
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Self::Array(v) => Some(v),
            _ => None,
        }
    }

    #[inline]
    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Self::Record(v) => Some(v),
            _ => None,
        }
    }

    #[inline]
    pub fn as_instance(&self) -> Option<&Instance> {
        match self {
            Self::Instance(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the value of `key` if `self` is a record containing it.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_record().and_then(|record| record.get(key))
    }

    /// Lowers every embedded [`Instance`] to its plain view, recursively.
    ///
    /// The result contains no [`Value::Instance`].
    pub fn into_plain(self) -> Value {
        match self {
            Self::Instance(instance) => instance.to_plain().into_plain(),
            Self::Array(items) => Self::Array(items.into_iter().map(Value::into_plain).collect()),
            Self::Record(record) => Self::Record(
                record
                    .into_iter()
                    .map(|(k, v)| (k, v.into_plain()))
                    .collect(),
            ),
            plain => plain,
        }
    }

    /// Returns `true` for a finite number without fractional part.
    pub fn is_integer(&self) -> bool {
        matches!(self, Self::Number(v) if is_integral(*v))
    }

    /// Returns `true` if no [`Value::Instance`] appears anywhere in this value.
    pub fn is_plain(&self) -> bool {
        match self {
            Self::Instance(_) => false,
            Self::Array(items) => items.iter().all(Value::is_plain),
            Self::Record(record) => record.values().all(Value::is_plain),
            _ => true,
        }
    }
}

// Every finite `f64` at or above 2^52 is integral.
pub(crate) fn is_integral(v: f64) -> bool {
    const EXACT: f64 = 4_503_599_627_370_496.0;
    v.is_finite() && (v.abs() >= EXACT || (v as i64) as f64 == v)
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Number(a), Self::Number(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Array(a), Self::Array(b)) => a == b,
            (Self::Record(a), Self::Record(b)) => a == b,
            (Self::Instance(a), Self::Instance(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(v) => fmt::Debug::fmt(v, f),
            Self::Number(v) => fmt::Debug::fmt(v, f),
            Self::String(v) => fmt::Debug::fmt(v, f),
            Self::Array(v) => f.debug_list().entries(v).finish(),
            Self::Record(v) => f.debug_map().entries(v).finish(),
            Self::Instance(v) => fmt::Debug::fmt(v, f),
        }
    }
}

// -----------------------------------------------------------------------------
// Conversions

impl From<bool> for Value {
    #[inline]
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for Value {
    #[inline]
    fn from(value: &str) -> Self {
        Self::String(value.into())
    }
}

impl From<String> for Value {
    #[inline]
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<Record> for Value {
    #[inline]
    fn from(value: Record) -> Self {
        Self::Record(value)
    }
}

impl From<Instance> for Value {
    #[inline]
    fn from(value: Instance) -> Self {
        Self::Instance(value)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(value: Vec<T>) -> Self {
        Self::Array(value.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

macro_rules! impl_from_number {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                #[inline]
                fn from(value: $ty) -> Self {
                    Self::Number(value as f64)
                }
            }
        )*
    };
}

impl_from_number!(f32, f64, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;

    #[test]
    fn record_keeps_last_duplicate() {
        let value = Value::record([("a", Value::from(1)), ("a", Value::from(2))]);
        assert_eq!(value.get("a"), Some(&Value::Number(2.0)));
    }

    #[test]
    fn plain_checks_nested_values() {
        let value = Value::record([("tags", Value::from(vec!["x", "y"]))]);
        assert!(value.is_plain());
        assert_eq!(value.clone().into_plain(), value);
    }

    #[test]
    fn numbers_compare_by_value() {
        assert_eq!(Value::from(3_u8), Value::from(3.0_f64));
        assert_ne!(Value::from(3), Value::from("3"));
        assert_eq!(Value::from(None::<i32>), Value::Null);
    }
}
