//! Conversions between registered classes and plain records.

use core::any::Any;

use vc_schema::{Record, Schema, Value};

use crate::registry::Materialized;
use crate::{ClassEntry, ClassId, Registry, SerialError, Serializable};

// -----------------------------------------------------------------------------
// serialize

/// Converts `instance` to a validated plain record.
///
/// The bound fields are read (nested registered classes recursively), then
/// validated with the class's object schema. The output of the schema is
/// returned, so defaults and transforms of field schemas apply.
/// `instance` is never modified.
///
/// # Errors
///
/// - [`SerialError::NotSerializable`] if `T` is not registered.
/// - [`SerialError::ValidationFailed`] if the current field values do not
///   satisfy the schema.
///
/// # Examples
///
/// ```
/// use vc_class::{Registry, Serializable};
/// use vc_schema::Value;
///
/// #[derive(Default, Serializable)]
/// struct Person {
///     #[serializable(schema = vc_schema::string())]
///     name: String,
///     #[serializable(schema = vc_schema::number())]
///     age: u32,
/// }
///
/// let mut registry = Registry::new();
/// registry.register::<Person>().unwrap();
///
/// let person = Person { name: "John Doe".into(), age: 30 };
/// let record = vc_class::serialize(&registry, &person).unwrap();
///
/// assert_eq!(record["name"], Value::from("John Doe"));
/// assert_eq!(record["age"], Value::from(30));
/// ```
pub fn serialize<T: Serializable>(registry: &Registry, instance: &T) -> Result<Record, SerialError> {
    let entry = lookup(registry, ClassId::of::<T>(), T::class_name())?;
    serialize_entry(entry, instance)
}

/// [`serialize`] with the class taken from the runtime type of `instance`.
///
/// # Errors
///
/// As [`serialize`]. The class reported by [`SerialError::NotSerializable`]
/// is unknown and shown as `"<unregistered>"`.
pub fn serialize_any(registry: &Registry, instance: &dyn Any) -> Result<Record, SerialError> {
    let id = ClassId::from(Any::type_id(instance));
    let entry = lookup(registry, id, "<unregistered>")?;
    serialize_entry(entry, instance)
}

fn serialize_entry(entry: &ClassEntry, instance: &dyn Any) -> Result<Record, SerialError> {
    let class = entry.name();
    let record = entry
        .read(instance)
        .ok_or(SerialError::Materialize { class })?;

    log::trace!("serializing `{class}`: {record:?}");

    match vc_schema::parse(entry.object_schema(), Value::Record(record))?.into_plain() {
        Value::Record(record) => Ok(record),
        _ => Err(SerialError::Materialize { class }),
    }
}

// -----------------------------------------------------------------------------
// deserialize

/// Validates `input` and builds a new `T` from it.
///
/// The instance is created with [`Default`] and every validated field is
/// assigned onto it. Fields holding registered classes get fresh instances
/// of their class, built the same way. Nothing is returned unless the whole
/// input is valid.
///
/// Record keys that `T` does not declare follow the registry's
/// [`UnknownKeys`](vc_schema::UnknownKeys) policy, by default they are ignored.
///
/// # Errors
///
/// - [`SerialError::NotSerializable`] if `T` is not registered.
/// - [`SerialError::ValidationFailed`] with every issue found, each with
///   the path of the offending field.
///
/// # Examples
///
/// ```
/// use vc_class::{Registry, SerialError, Serializable};
/// use vc_schema::Value;
///
/// #[derive(Default, Serializable)]
/// struct Person {
///     #[serializable(schema = vc_schema::string())]
///     name: String,
/// }
///
/// let mut registry = Registry::new();
/// registry.register::<Person>().unwrap();
///
/// let error = vc_class::deserialize::<Person>(
///     &registry,
///     Value::record([("name", Value::from(123))]),
/// );
/// let Err(SerialError::ValidationFailed(error)) = error else { panic!() };
/// assert!(error.issue_at("name").is_some());
/// ```
pub fn deserialize<T: Serializable>(registry: &Registry, input: Value) -> Result<T, SerialError> {
    let class = T::class_name();
    let entry = lookup(registry, ClassId::of::<T>(), class)?;

    log::trace!("deserializing `{class}`: {input:?}");

    match entry.construct().parse(input)? {
        Value::Instance(instance) => instance
            .try_unwrap::<Materialized<T>>()
            .map(Materialized::into_inner)
            .map_err(|_| SerialError::Materialize { class }),
        _ => Err(SerialError::Materialize { class }),
    }
}

// -----------------------------------------------------------------------------
// resolve_schema

/// The object schema aggregated for `T`, `None` if `T` is not registered.
///
/// Repeated calls return handles to the same schema until `T` is registered again.
#[inline]
pub fn resolve_schema<T: Serializable>(registry: &Registry) -> Option<Schema> {
    resolve_schema_by_id(registry, ClassId::of::<T>())
}

/// [`resolve_schema`] by class identity.
#[inline]
pub fn resolve_schema_by_id(registry: &Registry, id: ClassId) -> Option<Schema> {
    registry.get(id).map(|entry| entry.object_schema().clone())
}

#[inline]
fn lookup<'a>(
    registry: &'a Registry,
    id: ClassId,
    class: &'static str,
) -> Result<&'a ClassEntry, SerialError> {
    match registry.get(id) {
        Some(entry) => Ok(&**entry),
        None => Err(SerialError::NotSerializable { class }),
    }
}
