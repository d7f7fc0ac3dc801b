use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use vc_schema::Value;

/// A field type that converts to and from a plain [`Value`].
///
/// The conversion only deals with the shape of the data. Validation rules
/// belong to the schema the field is declared with.
pub trait FieldValue: Sized + Send + Sync + 'static {
    fn to_value(&self) -> Value;

    /// Returns `true` if the field holds no value, like `None`.
    ///
    /// An absent field is left out of the record when its schema rejects
    /// `null`, so `optional` schemas see a missing key.
    #[inline]
    fn is_absent(&self) -> bool {
        false
    }

    /// Converts a validated value back, failing with a message on shape mismatch.
    fn from_value(value: Value) -> Result<Self, String>;
}

fn mismatch(expected: &str, value: &Value) -> String {
    format!("expected {expected}, received {}", value.kind_name())
}

impl FieldValue for bool {
    #[inline]
    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }

    fn from_value(value: Value) -> Result<Self, String> {
        value.as_bool().ok_or_else(|| mismatch("boolean", &value))
    }
}

impl FieldValue for String {
    #[inline]
    fn to_value(&self) -> Value {
        Value::String(self.clone())
    }

    fn from_value(value: Value) -> Result<Self, String> {
        match value {
            Value::String(v) => Ok(v),
            other => Err(mismatch("string", &other)),
        }
    }
}

impl FieldValue for f64 {
    #[inline]
    fn to_value(&self) -> Value {
        Value::Number(*self)
    }

    fn from_value(value: Value) -> Result<Self, String> {
        value.as_f64().ok_or_else(|| mismatch("number", &value))
    }
}

impl FieldValue for f32 {
    #[inline]
    fn to_value(&self) -> Value {
        Value::Number(f64::from(*self))
    }

    fn from_value(value: Value) -> Result<Self, String> {
        f64::from_value(value).map(|v| v as f32)
    }
}

macro_rules! impl_integer {
    ($($ty:ty),*) => {
        $(
            impl FieldValue for $ty {
                #[inline]
                fn to_value(&self) -> Value {
                    Value::Number(*self as f64)
                }

                fn from_value(value: Value) -> Result<Self, String> {
                    let integral = value.is_integer();
                    let v = f64::from_value(value)?;
                    let invalid = || format!("{v} is not a valid `{}`", stringify!($ty));
                    if !integral {
                        return Err(invalid());
                    }
                    // Exact for every integral `f64` below 2^127, saturating above.
                    <$ty>::try_from(v as i128).map_err(|_| invalid())
                }
            }
        )*
    };
}

impl_integer!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl<F: FieldValue> FieldValue for Option<F> {
    fn to_value(&self) -> Value {
        self.as_ref().map_or(Value::Null, F::to_value)
    }

    #[inline]
    fn is_absent(&self) -> bool {
        self.is_none()
    }

    fn from_value(value: Value) -> Result<Self, String> {
        match value {
            Value::Null => Ok(None),
            other => F::from_value(other).map(Some),
        }
    }
}

impl<F: FieldValue> FieldValue for Vec<F> {
    fn to_value(&self) -> Value {
        Value::Array(self.iter().map(F::to_value).collect())
    }

    fn from_value(value: Value) -> Result<Self, String> {
        match value {
            Value::Array(items) => items
                .into_iter()
                .enumerate()
                .map(|(index, item)| F::from_value(item).map_err(|e| format!("[{index}]: {e}")))
                .collect(),
            other => Err(mismatch("array", &other)),
        }
    }
}

impl FieldValue for Value {
    #[inline]
    fn to_value(&self) -> Value {
        self.clone()
    }

    #[inline]
    fn from_value(value: Value) -> Result<Self, String> {
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;

    #[test]
    fn integers_reject_fractions_and_overflow() {
        assert_eq!(u8::from_value(Value::from(200)), Ok(200));
        assert!(u8::from_value(Value::from(300)).is_err());
        assert!(i32::from_value(Value::from(1.5)).is_err());
        assert!(u32::from_value(Value::from(-1)).is_err());
    }

    #[test]
    fn wide_integers_reject_values_past_max() {
        let two_pow_64 = Value::Number(18_446_744_073_709_551_616.0);
        let two_pow_63 = Value::Number(9_223_372_036_854_775_808.0);

        assert!(u64::from_value(two_pow_64.clone()).is_err());
        assert!(usize::from_value(two_pow_64).is_err());
        assert!(i64::from_value(two_pow_63.clone()).is_err());
        assert_eq!(u64::from_value(two_pow_63), Ok(1_u64 << 63));
        assert_eq!(i64::from_value(Value::Number(-9_223_372_036_854_775_808.0)), Ok(i64::MIN));
        assert!(u64::from_value(Value::Number(1e40)).is_err());
    }

    #[test]
    fn option_maps_null() {
        assert_eq!(Option::<String>::from_value(Value::Null), Ok(None));
        assert_eq!(Some(3_i64).to_value(), Value::from(3));
        assert_eq!(None::<bool>.to_value(), Value::Null);
        assert!(None::<bool>.is_absent());
        assert!(!Some(false).is_absent());
        assert!(!false.is_absent());
    }

    #[test]
    fn vec_reports_failing_index() {
        let value = Value::Array(vec![Value::from("a"), Value::from(false)]);
        let error = Vec::<String>::from_value(value).unwrap_err();
        assert_eq!(error, "[1]: expected string, received boolean");
    }
}
