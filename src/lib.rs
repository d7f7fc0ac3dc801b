#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

pub use vc_class as class;
pub use vc_schema as schema;

pub use vc_class::{Registry, Serializable, deserialize, resolve_schema, serialize};
pub use vc_schema::{Record, Value};

#[cfg(test)]
mod tests {
    extern crate alloc;

    use alloc::string::String;

    use crate::{Registry, Serializable, Value};

    #[derive(Debug, Default, PartialEq, Serializable)]
    struct Person {
        #[serializable(schema = crate::schema::string())]
        name: String,
        #[serializable(schema = crate::schema::optional_with(crate::schema::number(), 0))]
        age: u32,
    }

    #[test]
    fn facade_round_trip() {
        let mut registry = Registry::new();
        registry.register::<Person>().unwrap();

        let value: Value = serde_json::from_str(r#"{"name":"John Doe"}"#).unwrap();
        let person: Person = crate::deserialize(&registry, value).unwrap();
        assert_eq!(
            person,
            Person {
                name: "John Doe".into(),
                age: 0
            }
        );

        let record = crate::serialize(&registry, &person).unwrap();
        assert_eq!(
            serde_json::to_string(&Value::Record(record)).unwrap(),
            r#"{"age":0,"name":"John Doe"}"#
        );
    }
}
