use alloc::boxed::Box;
use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use vc_schema::{Schema, Value};

use crate::field::{Binding, FieldTable};
use crate::registry::Materialized;
use crate::{Accessor, ClassId, FieldDescriptor, FieldValue, RegisterError, Registry};
use crate::{Serializable, UnresolvedClass};

// -----------------------------------------------------------------------------
// ClassBuilder

/// The pending metadata of one class under registration.
///
/// Passed to [`Serializable::declare`]. Every declaring method appends one
/// field; the fields become the entries of the class's object schema in
/// declaration order.
///
/// The builder holds the registry mutably, so nested classes can be resolved
/// (and, with [`UnresolvedClass::Register`], registered) while the outer
/// class is being declared.
pub struct ClassBuilder<'r, T> {
    registry: &'r mut Registry,
    descriptors: Vec<FieldDescriptor>,
    bindings: Vec<Binding<T>>,
}

impl<'r, T: Serializable> ClassBuilder<'r, T> {
    #[inline]
    pub(crate) fn new(registry: &'r mut Registry) -> Self {
        Self {
            registry,
            descriptors: Vec::new(),
            bindings: Vec::new(),
        }
    }

    /// The registry the class is being registered into.
    #[inline]
    pub fn registry(&self) -> &Registry {
        self.registry
    }

    /// The fields declared so far.
    #[inline]
    pub fn descriptors(&self) -> &[FieldDescriptor] {
        &self.descriptors
    }

    pub(crate) fn finish(self) -> (Vec<FieldDescriptor>, FieldTable<T>) {
        (self.descriptors, FieldTable::new(self.bindings))
    }

    /// Declares an instance field validated by `schema`.
    ///
    /// See [`bind_field`](Self::bind_field).
    #[inline]
    pub fn field<F: FieldValue>(
        &mut self,
        name: impl Into<String>,
        schema: Schema,
        get: fn(&T) -> &F,
        get_mut: fn(&mut T) -> &mut F,
    ) -> Result<&mut Self, RegisterError> {
        self.bind_field(name, schema, Accessor::Instance { get, get_mut })
    }

    /// Declares a field validated by `schema`.
    ///
    /// An absent value (see [`FieldValue::is_absent`]) is serialized as
    /// `null` if `schema` accepts `null`, otherwise its key is left out.
    /// So `Option<F>` round-trips through `optional`, `nullable` and
    /// `nullish` schemas alike.
    ///
    /// # Errors
    ///
    /// - [`RegisterError::StaticFieldUnsupported`] for [`Accessor::Static`].
    /// - [`RegisterError::DuplicateField`] if `name` is already declared.
    pub fn bind_field<F: FieldValue>(
        &mut self,
        name: impl Into<String>,
        schema: Schema,
        accessor: Accessor<T, F>,
    ) -> Result<&mut Self, RegisterError> {
        let name = name.into();
        let (get, get_mut) = self.instance_accessor(&name, accessor)?;

        // Absent values are written as `null` only where the schema takes it.
        let null_accepted = vc_schema::is(&schema, &Value::Null);

        let binding = Binding {
            name: name.clone(),
            read: Box::new(move |this: &T| {
                let field = get(this);
                if field.is_absent() && !null_accepted {
                    return None;
                }
                Some(field.to_value())
            }),
            assign: Box::new(move |this: &mut T, value: Value| -> Result<(), String> {
                *get_mut(this) = F::from_value(value)?;
                Ok(())
            }),
        };
        Ok(self.push(name, schema, binding))
    }

    /// Declares an instance field holding the class `B`.
    ///
    /// See [`bind_nested`](Self::bind_nested).
    #[inline]
    pub fn nested<B: Serializable>(
        &mut self,
        name: impl Into<String>,
        get: fn(&T) -> &B,
        get_mut: fn(&mut T) -> &mut B,
    ) -> Result<&mut Self, RegisterError> {
        self.bind_nested(name, Accessor::Instance { get, get_mut })
    }

    /// Declares a field holding the class `B`.
    ///
    /// If `B` is registered, the field is validated with `B`'s construct
    /// schema, so deserialization rebuilds a real `B`. Otherwise the
    /// registry's [`UnresolvedClass`] policy decides.
    ///
    /// The field captures `B`'s registration as it is now. Registering `B`
    /// again later does not affect classes that were declared before.
    ///
    /// # Errors
    ///
    /// - The errors of [`bind_field`](Self::bind_field).
    /// - [`RegisterError::UnregisteredClass`] under [`UnresolvedClass::Fail`].
    /// - Any error registering `B` under [`UnresolvedClass::Register`],
    ///   including [`RegisterError::CyclicClass`].
    pub fn bind_nested<B: Serializable>(
        &mut self,
        name: impl Into<String>,
        accessor: Accessor<T, B>,
    ) -> Result<&mut Self, RegisterError> {
        let name = name.into();
        let (get, get_mut) = self.instance_accessor(&name, accessor)?;

        let id = ClassId::of::<B>();
        if !self.registry.contains(id) {
            let policy = self.registry.config().unresolved_class;
            match policy {
                UnresolvedClass::Defer => return Ok(self.push_unresolved::<B>(name)),
                UnresolvedClass::Fail => {
                    return Err(RegisterError::UnregisteredClass {
                        class: T::class_name(),
                        field: name,
                        referenced: B::class_name(),
                    });
                }
                UnresolvedClass::Register => self.registry.register::<B>()?,
            }
        }

        let resolved = self
            .registry
            .get(id)
            .and_then(|entry| Some((entry.construct().clone(), entry.table::<B>()?)));
        let Some((schema, table)) = resolved else {
            return Err(RegisterError::UnregisteredClass {
                class: T::class_name(),
                field: name,
                referenced: B::class_name(),
            });
        };

        let binding = Binding {
            name: name.clone(),
            read: Box::new(move |this: &T| Some(Value::Record(table.read(get(this))))),
            assign: Box::new(move |this: &mut T, value: Value| -> Result<(), String> {
                let instance = match value {
                    Value::Instance(instance) => instance,
                    other => {
                        return Err(format!(
                            "expected an instance of `{}`, received {}",
                            B::class_name(),
                            other.kind_name()
                        ));
                    }
                };
                let materialized = instance.try_unwrap::<Materialized<B>>().map_err(|other| {
                    format!("expected `{}`, received `{}`", B::class_name(), other.type_name())
                })?;
                *get_mut(this) = materialized.into_inner();
                Ok(())
            }),
        };
        Ok(self.push(name, schema, binding))
    }

    fn instance_accessor<F: 'static>(
        &self,
        name: &str,
        accessor: Accessor<T, F>,
    ) -> Result<(fn(&T) -> &F, fn(&mut T) -> &mut F), RegisterError> {
        let (get, get_mut) = match accessor {
            Accessor::Instance { get, get_mut } => (get, get_mut),
            Accessor::Static(_) => {
                return Err(RegisterError::StaticFieldUnsupported {
                    class: T::class_name(),
                    field: name.into(),
                });
            }
        };
        if self.descriptors.iter().any(|d| d.name == name) {
            return Err(RegisterError::DuplicateField {
                class: T::class_name(),
                field: name.into(),
            });
        }
        Ok((get, get_mut))
    }

    // The reference itself stands in as the schema, so the field fails late.
    fn push_unresolved<B: Serializable>(&mut self, name: String) -> &mut Self {
        log::warn!(
            "field `{name}` of class `{}` references the unregistered class `{}`, \
             conversions of this field will fail",
            T::class_name(),
            B::class_name(),
        );

        let binding = Binding {
            name: name.clone(),
            read: Box::new(|_: &T| Some(Value::Null)),
            assign: Box::new(|_: &mut T, _: Value| -> Result<(), String> {
                Err(format!("class `{}` is not registered", B::class_name()))
            }),
        };
        self.push(name, vc_schema::unresolved(B::class_name()), binding)
    }

    fn push(&mut self, name: String, schema: Schema, binding: Binding<T>) -> &mut Self {
        self.descriptors.push(FieldDescriptor { name, schema });
        self.bindings.push(binding);
        self
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::{String, ToString};

    use super::*;
    use crate::RegistryConfig;

    static SHARED_LIMIT: u32 = 8;

    #[derive(Default)]
    struct Counter {
        count: u32,
        label: String,
    }

    impl Serializable for Counter {
        fn declare(class: &mut ClassBuilder<'_, Self>) -> Result<(), RegisterError> {
            class.field("count", vc_schema::integer(), |c| &c.count, |c| &mut c.count)?;
            Ok(())
        }
    }

    #[derive(Default)]
    struct Holder {
        counter: Counter,
    }

    impl Serializable for Holder {
        fn declare(class: &mut ClassBuilder<'_, Self>) -> Result<(), RegisterError> {
            class.nested("counter", |h| &h.counter, |h| &mut h.counter)?;
            Ok(())
        }
    }

    fn builder_for<T: Serializable>(registry: &mut Registry) -> ClassBuilder<'_, T> {
        ClassBuilder::new(registry)
    }

    #[test]
    fn rejects_static_field() {
        let mut registry = Registry::new();
        let mut class = builder_for::<Counter>(&mut registry);
        let error = class
            .bind_field("limit", vc_schema::integer(), Accessor::Static(|| &SHARED_LIMIT))
            .err()
            .unwrap();
        assert!(matches!(
            error,
            RegisterError::StaticFieldUnsupported { ref field, .. } if field == "limit"
        ));
        assert!(class.descriptors().is_empty());
    }

    #[test]
    fn rejects_duplicate_field() {
        let mut registry = Registry::new();
        let mut class = builder_for::<Counter>(&mut registry);
        class
            .field("label", vc_schema::string(), |c| &c.label, |c| &mut c.label)
            .unwrap();
        let error = class
            .field("label", vc_schema::string(), |c| &c.label, |c| &mut c.label)
            .err()
            .unwrap();
        assert_eq!(
            error,
            RegisterError::DuplicateField {
                class: Counter::class_name(),
                field: "label".to_string(),
            }
        );
        assert_eq!(class.descriptors().len(), 1);
    }

    #[test]
    fn nested_registered_uses_construct_schema() {
        let mut registry = Registry::new();
        registry.register::<Counter>().unwrap();
        let construct = registry.get(ClassId::of::<Counter>()).unwrap().construct().clone();

        let mut class = builder_for::<Holder>(&mut registry);
        class.nested("counter", |h| &h.counter, |h| &mut h.counter).unwrap();
        assert!(class.descriptors()[0].schema.ptr_eq(&construct));
    }

    #[test]
    fn nested_unregistered_policies() {
        let mut registry = Registry::new();
        let mut class = builder_for::<Holder>(&mut registry);
        class.nested("counter", |h| &h.counter, |h| &mut h.counter).unwrap();
        assert_eq!(
            class.descriptors()[0].schema.kind(),
            vc_schema::SchemaKind::Unresolved
        );

        let mut registry = Registry::with_config(RegistryConfig {
            unresolved_class: UnresolvedClass::Fail,
            ..RegistryConfig::default()
        });
        let error = registry.register::<Holder>().unwrap_err();
        assert!(matches!(error, RegisterError::UnregisteredClass { .. }));
        assert!(registry.is_empty());

        let mut registry = Registry::with_config(RegistryConfig {
            unresolved_class: UnresolvedClass::Register,
            ..RegistryConfig::default()
        });
        registry.register::<Holder>().unwrap();
        assert!(registry.contains(ClassId::of::<Counter>()));
        assert_eq!(registry.len(), 2);
    }
}
