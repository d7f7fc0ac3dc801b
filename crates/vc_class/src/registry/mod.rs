//! The class registry.
//!
//! A [`Registry`] maps each registered class to its [`ClassEntry`]: the
//! aggregated object schema and the construct schema that rebuilds instances.
//!
//! Registration needs `&mut Registry`, conversions only `&Registry`, so a
//! registry is filled once and then shared. See [`SharedRegistry`] for a
//! lock-protected handle.
//!
//! ## auto_register
//!
//! With the `auto_register` feature, classes deriving `Serializable` with
//! `#[serializable(auto_register)]` are collected through [`inventory`] and
//! registered by [`Registry::auto_register`].
//!
//! [`inventory`]: https://docs.rs/inventory

// -----------------------------------------------------------------------------
// Modules

mod class_map;
mod entry;

#[cfg(feature = "std")]
mod shared;

// -----------------------------------------------------------------------------
// Exports

pub use entry::ClassEntry;

#[cfg(feature = "std")]
pub use shared::SharedRegistry;

pub(crate) use entry::Materialized;

use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;

use vc_schema::{Record, Schema, Value};

use crate::{ClassBuilder, ClassId, RegisterError, RegistryConfig, SerialError, Serializable};
use class_map::ClassMap;

// -----------------------------------------------------------------------------
// Registry

/// The store of registered classes.
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
///     #[serializable(schema = vc_schema::optional_with(vc_schema::number(), 0))]
///     age: u32,
/// }
///
/// let mut registry = Registry::new();
/// registry.register::<Person>().unwrap();
///
/// let person: Person = registry
///     .deserialize(Value::record([("name", Value::from("John Doe"))]))
///     .unwrap();
/// assert_eq!(person.name, "John Doe");
/// assert_eq!(person.age, 0);
/// ```
pub struct Registry {
    classes: ClassMap<Arc<ClassEntry>>,
    config: RegistryConfig,
    // Classes whose declaration is running, outermost first.
    in_progress: Vec<(ClassId, &'static str)>,
}

impl Default for Registry {
    /// See [`Registry::new`].
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    /// Creates an empty registry with the default [`RegistryConfig`].
    #[inline]
    pub const fn new() -> Self {
        Self::with_config(RegistryConfig {
            unresolved_class: crate::UnresolvedClass::Defer,
            unknown_keys: vc_schema::UnknownKeys::Strip,
        })
    }

    #[inline]
    pub const fn with_config(config: RegistryConfig) -> Self {
        Self {
            classes: ClassMap::new(),
            config,
            in_progress: Vec::new(),
        }
    }

    #[inline]
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Registers the class `T`, replacing any previous registration.
    ///
    /// Runs [`Serializable::declare`], aggregates the declared field schemas
    /// into one object schema and derives the construct schema from it.
    ///
    /// On error nothing is stored, a previous registration of `T` stays.
    ///
    /// Classes already declared with a field of type `T` keep the
    /// registration they resolved at that time.
    ///
    /// # Errors
    ///
    /// Any [`RegisterError`] of the declaration, see [`ClassBuilder`].
    pub fn register<T: Serializable>(&mut self) -> Result<(), RegisterError> {
        let id = ClassId::of::<T>();

        if self.in_progress.iter().any(|(pending, _)| *pending == id) {
            let chain = self
                .in_progress
                .iter()
                .map(|(_, name)| *name)
                .chain([T::class_name()])
                .collect();
            return Err(RegisterError::CyclicClass { chain });
        }

        self.in_progress.push((id, T::class_name()));
        let declared = {
            let mut class = ClassBuilder::<T>::new(self);
            T::declare(&mut class).map(|()| class.finish())
        };
        self.in_progress.pop();

        let (descriptors, fields) = declared?;
        let entry = ClassEntry::new::<T>(descriptors, fields, self.config.unknown_keys);

        log::debug!(
            "registered class `{}` with fields {:?}",
            entry.name(),
            entry.field_names()
        );
        if self.classes.insert(id, Arc::new(entry)).is_some() {
            log::warn!(
                "class `{}` was registered again, the previous entry is replaced",
                T::class_name()
            );
        }
        Ok(())
    }

    /// Registers every class marked with `#[serializable(auto_register)]`
    /// that is not registered yet.
    ///
    /// Classes referenced by their fields are registered first, whatever
    /// the configured [`UnresolvedClass`](crate::UnresolvedClass) policy.
    /// Repeated calls only register what is still missing.
    ///
    /// Returns the number of classes registered by this call. Without the
    /// `auto_register` feature, or on platforms `inventory` does not support,
    /// nothing is collected and `0` is returned.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use vc_class::{ClassId, Registry, Serializable};
    ///
    /// #[derive(Default, Serializable)]
    /// #[serializable(auto_register)]
    /// struct Marker {
    ///     #[serializable(schema = vc_schema::boolean())]
    ///     on: bool,
    /// }
    ///
    /// let mut registry = Registry::new();
    /// registry.auto_register().unwrap();
    /// assert!(registry.contains(ClassId::of::<Marker>()));
    /// ```
    pub fn auto_register(&mut self) -> Result<usize, RegisterError> {
        #[cfg(not(feature = "auto_register"))]
        return Ok(0);

        #[cfg(feature = "auto_register")]
        {
            let before = self.len();
            let policy = self.config.unresolved_class;
            self.config.unresolved_class = crate::UnresolvedClass::Register;
            let result = crate::__macro_exports::auto_register::__register_classes(self);
            self.config.unresolved_class = policy;
            result.map(|()| self.len() - before)
        }
    }

    /// Removes the registration of `T`.
    ///
    /// Classes that captured `T` as a nested field keep working.
    pub fn unregister<T: Serializable>(&mut self) -> Option<Arc<ClassEntry>> {
        self.classes.remove(&ClassId::of::<T>())
    }

    #[inline]
    pub fn contains(&self, id: ClassId) -> bool {
        self.classes.contains(&id)
    }

    #[inline]
    pub fn get(&self, id: ClassId) -> Option<&Arc<ClassEntry>> {
        self.classes.get(&id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates over the registered classes, in no particular order.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &Arc<ClassEntry>> {
        self.classes.values()
    }

    /// Names of the registered classes, sorted.
    pub fn class_names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.iter().map(|entry| entry.name()).collect();
        names.sort_unstable();
        names
    }

    /// See [`serialize`](crate::serialize).
    #[inline]
    pub fn serialize<T: Serializable>(&self, instance: &T) -> Result<Record, SerialError> {
        crate::serialize(self, instance)
    }

    /// See [`deserialize`](crate::deserialize).
    #[inline]
    pub fn deserialize<T: Serializable>(&self, input: Value) -> Result<T, SerialError> {
        crate::deserialize(self, input)
    }

    /// See [`resolve_schema`](crate::resolve_schema).
    #[inline]
    pub fn resolve_schema<T: Serializable>(&self) -> Option<Schema> {
        crate::resolve_schema::<T>(self)
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("classes", &self.class_names())
            .field("config", &self.config)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::string::String;

    use super::*;
    use crate::UnresolvedClass;

    #[derive(Default)]
    struct Node {
        label: String,
    }

    impl Serializable for Node {
        fn declare(class: &mut ClassBuilder<'_, Self>) -> Result<(), RegisterError> {
            class.field("label", vc_schema::string(), |n| &n.label, |n| &mut n.label)?;
            Ok(())
        }

        fn class_name() -> &'static str {
            "Node"
        }
    }

    #[derive(Default)]
    struct Link {
        node: Node,
    }

    impl Serializable for Link {
        fn declare(class: &mut ClassBuilder<'_, Self>) -> Result<(), RegisterError> {
            class.nested("node", |l| &l.node, |l| &mut l.node)?;
            Ok(())
        }

        fn class_name() -> &'static str {
            "Link"
        }
    }

    // Instances are never created: registration of these fails first.
    #[derive(Default)]
    struct Tree {
        child: Box<Tree>,
    }

    impl Serializable for Tree {
        fn declare(class: &mut ClassBuilder<'_, Self>) -> Result<(), RegisterError> {
            class.nested::<Tree>("child", |t| &*t.child, |t| &mut *t.child)?;
            Ok(())
        }

        fn class_name() -> &'static str {
            "Tree"
        }
    }

    #[derive(Default)]
    struct Husband {
        wife: Box<Wife>,
    }

    #[derive(Default)]
    struct Wife {
        husband: Box<Husband>,
    }

    impl Serializable for Husband {
        fn declare(class: &mut ClassBuilder<'_, Self>) -> Result<(), RegisterError> {
            class.nested::<Wife>("wife", |h| &*h.wife, |h| &mut *h.wife)?;
            Ok(())
        }

        fn class_name() -> &'static str {
            "Husband"
        }
    }

    impl Serializable for Wife {
        fn declare(class: &mut ClassBuilder<'_, Self>) -> Result<(), RegisterError> {
            class.nested::<Husband>("husband", |w| &*w.husband, |w| &mut *w.husband)?;
            Ok(())
        }

        fn class_name() -> &'static str {
            "Wife"
        }
    }

    fn registering() -> Registry {
        Registry::with_config(RegistryConfig {
            unresolved_class: UnresolvedClass::Register,
            ..RegistryConfig::default()
        })
    }

    #[test]
    fn register_and_lookup() {
        let mut registry = Registry::new();
        assert!(registry.is_empty());

        registry.register::<Node>().unwrap();
        registry.register::<Link>().unwrap();

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.class_names(), ["Link", "Node"]);

        let entry = registry.get(ClassId::of::<Link>()).unwrap();
        assert_eq!(entry.name(), "Link");
        assert_eq!(entry.field_names(), ["node"]);
        assert_eq!(entry.object_schema().entries().map(<[_]>::len), Some(1));
    }

    #[test]
    fn register_again_replaces_entry() {
        let mut registry = Registry::new();
        registry.register::<Node>().unwrap();
        let first = Arc::clone(registry.get(ClassId::of::<Node>()).unwrap());

        registry.register::<Node>().unwrap();
        let second = registry.get(ClassId::of::<Node>()).unwrap();

        assert_eq!(registry.len(), 1);
        assert!(!Arc::ptr_eq(&first, second));
    }

    #[test]
    fn failed_registration_stores_nothing() {
        let mut registry = Registry::with_config(RegistryConfig {
            unresolved_class: UnresolvedClass::Fail,
            ..RegistryConfig::default()
        });
        let error = registry.register::<Link>().unwrap_err();
        assert_eq!(
            error,
            RegisterError::UnregisteredClass {
                class: "Link",
                field: "node".into(),
                referenced: "Node",
            }
        );
        assert!(!registry.contains(ClassId::of::<Link>()));
    }

    #[test]
    fn register_policy_registers_dependencies() {
        let mut registry = registering();
        registry.register::<Link>().unwrap();
        assert!(registry.contains(ClassId::of::<Node>()));
    }

    #[test]
    fn cycles_are_rejected() {
        let mut registry = registering();

        let error = registry.register::<Tree>().unwrap_err();
        assert_eq!(
            error,
            RegisterError::CyclicClass {
                chain: alloc::vec!["Tree", "Tree"]
            }
        );

        let error = registry.register::<Husband>().unwrap_err();
        assert_eq!(
            error,
            RegisterError::CyclicClass {
                chain: alloc::vec!["Husband", "Wife", "Husband"]
            }
        );
        assert!(registry.is_empty());

        // The declaration stack is unwound after a failure.
        registry.register::<Node>().unwrap();
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn unregister_keeps_dependents_working() {
        let mut registry = Registry::new();
        registry.register::<Node>().unwrap();
        registry.register::<Link>().unwrap();

        assert!(registry.unregister::<Node>().is_some());
        assert!(registry.unregister::<Node>().is_none());

        let link = Link {
            node: Node {
                label: "tail".into(),
            },
        };
        let record = registry.serialize(&link).unwrap();
        assert_eq!(record["node"].get("label"), Some(&Value::from("tail")));
    }
}
