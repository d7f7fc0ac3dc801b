use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::{self, Formatter};

use serde_core::de::{Deserialize, Deserializer, Error, MapAccess, SeqAccess, Visitor};
use serde_core::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

use super::{Record, Value};

// -----------------------------------------------------------------------------
// Serialize

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Bool(v) => serializer.serialize_bool(*v),
            Self::Number(v) => serialize_number(*v, serializer),
            Self::String(v) => serializer.serialize_str(v),
            Self::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Self::Record(record) => {
                let mut map = serializer.serialize_map(Some(record.len()))?;
                for (key, value) in record {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
            // Instances leave the process in their plain shape.
            Self::Instance(instance) => instance.to_plain().serialize(serializer),
        }
    }
}

// Integral numbers are written as integers so that `30` does not come back as `30.0`.
// Infinities and `NaN` are refused, formats like JSON would silently write `null`.
fn serialize_number<S: Serializer>(v: f64, serializer: S) -> Result<S::Ok, S::Error> {
    const EXACT: f64 = 9_007_199_254_740_992.0; // 2^53

    if !v.is_finite() {
        return Err(serde_core::ser::Error::custom(format_args!(
            "cannot serialize the non-finite number {v}"
        )));
    }
    if v.abs() < EXACT && super::is_integral(v) {
        serializer.serialize_i64(v as i64)
    } else {
        serializer.serialize_f64(v)
    }
}

// -----------------------------------------------------------------------------
// Deserialize

struct ValueVisitor;

impl<'de> Visitor<'de> for ValueVisitor {
    type Value = Value;

    fn expecting(&self, formatter: &mut Formatter) -> fmt::Result {
        formatter.write_str("a plain structured value")
    }

    fn visit_bool<E: Error>(self, v: bool) -> Result<Value, E> {
        Ok(Value::Bool(v))
    }

    fn visit_i64<E: Error>(self, v: i64) -> Result<Value, E> {
        Ok(Value::Number(v as f64))
    }

    fn visit_u64<E: Error>(self, v: u64) -> Result<Value, E> {
        Ok(Value::Number(v as f64))
    }

    fn visit_f64<E: Error>(self, v: f64) -> Result<Value, E> {
        Ok(Value::Number(v))
    }

    fn visit_char<E: Error>(self, v: char) -> Result<Value, E> {
        let mut s = String::new();
        s.push(v);
        Ok(Value::String(s))
    }

    fn visit_str<E: Error>(self, v: &str) -> Result<Value, E> {
        Ok(Value::String(v.into()))
    }

    fn visit_string<E: Error>(self, v: String) -> Result<Value, E> {
        Ok(Value::String(v))
    }

    fn visit_unit<E: Error>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_none<E: Error>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Value, D::Error> {
        Value::deserialize(deserializer)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Value, A::Error> {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or_default());
        while let Some(item) = seq.next_element::<Value>()? {
            items.push(item);
        }
        Ok(Value::Array(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Value, A::Error> {
        let mut record = Record::new();
        while let Some((key, value)) = map.next_entry::<String, Value>()? {
            record.insert(key, value);
        }
        Ok(Value::Record(record))
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ValueVisitor)
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;

    #[test]
    fn json_transport() {
        let value: Value = serde_json::from_str(r#"{"name":"John Doe","age":30,"tags":["a",null]}"#).unwrap();
        assert_eq!(value.get("name"), Some(&Value::from("John Doe")));
        assert_eq!(value.get("tags"), Some(&Value::Array(vec![Value::from("a"), Value::Null])));

        let text = serde_json::to_string(&value).unwrap();
        assert_eq!(text, r#"{"age":30,"name":"John Doe","tags":["a",null]}"#);
    }

    #[test]
    fn fractional_numbers_stay_floats() {
        let text = serde_json::to_string(&Value::from(1.25)).unwrap();
        assert_eq!(text, "1.25");
    }

    #[test]
    fn non_finite_numbers_are_refused() {
        for v in [f64::INFINITY, f64::NEG_INFINITY, f64::NAN] {
            let record = Value::record([("speed", Value::Number(v))]);
            assert!(serde_json::to_string(&record).is_err());
        }
    }

    #[test]
    fn ron_transport() {
        let value = Value::record([("city", Value::from("Springfield")), ("zip", Value::from(42))]);
        let text = ron::to_string(&value).unwrap();
        let back: Value = ron::from_str(&text).unwrap();
        assert_eq!(back, value);
    }
}
