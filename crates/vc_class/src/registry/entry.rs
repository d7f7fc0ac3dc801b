use alloc::boxed::Box;
use alloc::format;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::any::Any;
use core::fmt;

use vc_schema::{Instance, Object, Record, Schema, UnknownKeys, Value};

use crate::field::FieldTable;
use crate::{ClassId, FieldDescriptor, Serializable};

// -----------------------------------------------------------------------------
// Materialized

/// An instance rebuilt by a construct schema, travelling inside a [`Value`].
pub(crate) struct Materialized<T> {
    instance: T,
    fields: Arc<FieldTable<T>>,
}

impl<T> Materialized<T> {
    #[inline]
    pub(crate) fn into_inner(self) -> T {
        self.instance
    }
}

impl<T: Serializable> Object for Materialized<T> {
    #[inline]
    fn type_name(&self) -> &'static str {
        T::class_name()
    }

    fn to_plain(&self) -> Value {
        Value::Record(self.fields.read(&self.instance))
    }

    #[inline]
    fn as_any(&self) -> &dyn Any {
        self
    }

    #[inline]
    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

// -----------------------------------------------------------------------------
// ClassEntry

type Reader = Box<dyn Fn(&dyn Any) -> Option<Record> + Send + Sync>;

/// The registration of one class.
///
/// Immutable once created. Registering the class again replaces the whole entry.
pub struct ClassEntry {
    id: ClassId,
    name: &'static str,
    field_names: Vec<String>,
    object_schema: Schema,
    construct: Schema,
    reader: Reader,
    fields: Arc<dyn Any + Send + Sync>,
}

impl ClassEntry {
    pub(crate) fn new<T: Serializable>(
        descriptors: Vec<FieldDescriptor>,
        fields: FieldTable<T>,
        unknown_keys: UnknownKeys,
    ) -> Self {
        let field_names = descriptors.iter().map(|d| d.name.clone()).collect();
        let object_schema = vc_schema::object_with(
            descriptors.into_iter().map(|d| (d.name, d.schema)),
            unknown_keys,
        );

        let fields = Arc::new(fields);

        let table = Arc::clone(&fields);
        let construct = vc_schema::pipe(object_schema.clone(), move |value| {
            let record = match value {
                Value::Record(record) => record,
                other => return Err(format!("expected record, received {}", other.kind_name())),
            };
            let mut instance = T::default();
            table.assign(&mut instance, record)?;
            Ok(Value::Instance(Instance::new(Materialized {
                instance,
                fields: Arc::clone(&table),
            })))
        });

        let table = Arc::clone(&fields);
        let reader: Reader = Box::new(move |instance: &dyn Any| {
            instance.downcast_ref::<T>().map(|instance| table.read(instance))
        });

        Self {
            id: ClassId::of::<T>(),
            name: T::class_name(),
            field_names,
            object_schema,
            construct,
            reader,
            fields,
        }
    }

    #[inline]
    pub fn id(&self) -> ClassId {
        self.id
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Names of the serialized fields, in declaration order.
    #[inline]
    pub fn field_names(&self) -> &[String] {
        &self.field_names
    }

    /// The object schema aggregated from the field schemas.
    #[inline]
    pub fn object_schema(&self) -> &Schema {
        &self.object_schema
    }

    /// The object schema followed by a transform that builds the instance.
    ///
    /// Parsing a record with it yields a [`Value::Instance`].
    #[inline]
    pub fn construct(&self) -> &Schema {
        &self.construct
    }

    /// Reads the fields of `instance`, `None` if it is not of this class.
    #[inline]
    pub(crate) fn read(&self, instance: &dyn Any) -> Option<Record> {
        (self.reader)(instance)
    }

    pub(crate) fn table<T: Serializable>(&self) -> Option<Arc<FieldTable<T>>> {
        Arc::clone(&self.fields).downcast::<FieldTable<T>>().ok()
    }
}

impl fmt::Debug for ClassEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassEntry")
            .field("name", &self.name)
            .field("fields", &self.field_names)
            .field("schema", &self.object_schema)
            .finish()
    }
}
