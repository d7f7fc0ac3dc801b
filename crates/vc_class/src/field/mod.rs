//! Field bindings: how one field of a class is read, validated and assigned.

// -----------------------------------------------------------------------------
// Modules

mod value;

// -----------------------------------------------------------------------------
// Exports

pub use value::FieldValue;

use alloc::boxed::Box;
use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use vc_schema::{Record, Schema, Value};

// -----------------------------------------------------------------------------
// Accessor

/// Where the value of a field lives.
///
/// Only [`Accessor::Instance`] fields can be serialized. [`Accessor::Static`]
/// exists so that declarations of shared state are rejected explicitly with
/// [`RegisterError::StaticFieldUnsupported`](crate::RegisterError::StaticFieldUnsupported).
pub enum Accessor<T, F: 'static> {
    /// A field stored in every instance.
    Instance {
        get: fn(&T) -> &F,
        get_mut: fn(&mut T) -> &mut F,
    },
    /// A value shared by all instances.
    Static(fn() -> &'static F),
}

impl<T, F: 'static> Clone for Accessor<T, F> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, F: 'static> Copy for Accessor<T, F> {}

impl<T, F: 'static> fmt::Debug for Accessor<T, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Instance { .. } => f.write_str("Accessor::Instance"),
            Self::Static(_) => f.write_str("Accessor::Static"),
        }
    }
}

// -----------------------------------------------------------------------------
// FieldDescriptor

/// A declared field: its name and the schema its value is validated with.
///
/// For a field holding a registered class, the schema is that class's
/// construct schema.
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    pub name: String,
    pub schema: Schema,
}

// -----------------------------------------------------------------------------
// FieldTable

// `None` leaves the key out of the record.
type Read<T> = Box<dyn Fn(&T) -> Option<Value> + Send + Sync>;
type Assign<T> = Box<dyn Fn(&mut T, Value) -> Result<(), String> + Send + Sync>;

pub(crate) struct Binding<T> {
    pub(crate) name: String,
    pub(crate) read: Read<T>,
    pub(crate) assign: Assign<T>,
}

/// The typed read/assign functions of every declared field of `T`.
pub(crate) struct FieldTable<T> {
    bindings: Vec<Binding<T>>,
}

impl<T> FieldTable<T> {
    #[inline]
    pub(crate) fn new(bindings: Vec<Binding<T>>) -> Self {
        Self { bindings }
    }

    /// Reads every bound field into a plain record.
    ///
    /// Absent fields have no key.
    pub(crate) fn read(&self, instance: &T) -> Record {
        self.bindings
            .iter()
            .filter_map(|binding| Some((binding.name.clone(), (binding.read)(instance)?)))
            .collect()
    }

    /// Assigns the validated fields of `record` onto `instance`.
    ///
    /// Absent keys leave the field untouched, keys without a binding are ignored.
    pub(crate) fn assign(&self, instance: &mut T, mut record: Record) -> Result<(), String> {
        for binding in &self.bindings {
            if let Some(value) = record.remove(&binding.name) {
                (binding.assign)(instance, value)
                    .map_err(|e| format!("field `{}`: {e}", binding.name))?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::string::{String, ToString};
    use alloc::vec;

    use super::*;

    #[derive(Default)]
    struct Tag {
        label: String,
        weight: u8,
    }

    fn table() -> FieldTable<Tag> {
        FieldTable::new(vec![
            Binding {
                name: "label".to_string(),
                read: Box::new(|t: &Tag| Some(t.label.to_value())),
                assign: Box::new(|t: &mut Tag, v: Value| -> Result<(), String> {
                    t.label = String::from_value(v)?;
                    Ok(())
                }),
            },
            Binding {
                name: "weight".to_string(),
                read: Box::new(|t: &Tag| (t.weight != 0).then(|| t.weight.to_value())),
                assign: Box::new(|t: &mut Tag, v: Value| -> Result<(), String> {
                    t.weight = u8::from_value(v)?;
                    Ok(())
                }),
            },
        ])
    }

    #[test]
    fn read_then_assign() {
        let source = Tag {
            label: "red".into(),
            weight: 3,
        };
        let record = table().read(&source);
        assert_eq!(record.len(), 2);

        let mut target = Tag::default();
        table().assign(&mut target, record).unwrap();
        assert_eq!(target.label, "red");
        assert_eq!(target.weight, 3);
    }

    #[test]
    fn absent_field_has_no_key() {
        let record = table().read(&Tag::default());
        assert_eq!(record.keys().collect::<Vec<_>>(), ["label"]);
    }

    #[test]
    fn assign_names_failing_field() {
        let mut record = Record::new();
        record.insert("weight".into(), Value::from(999));
        record.insert("ignored".into(), Value::Null);

        let mut target = Tag::default();
        let error = table().assign(&mut target, record).unwrap_err();
        assert!(error.starts_with("field `weight`:"));
        assert_eq!(target.label, "");
    }
}
