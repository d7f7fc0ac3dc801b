use vc_schema::UnknownKeys;

/// What to do when a field references a class that is not registered yet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum UnresolvedClass {
    /// Keep the field, but every conversion touching it fails validation.
    ///
    /// A warning is logged when the field is declared.
    #[default]
    Defer,
    /// Refuse to register the referencing class.
    Fail,
    /// Register the referenced class first, recursively.
    Register,
}

/// Runtime options of a [`Registry`](crate::Registry).
///
/// The defaults match the behavior of a registry created with
/// [`Registry::new`](crate::Registry::new).
///
/// # Examples
///
/// ```
/// use vc_class::{Registry, RegistryConfig, UnresolvedClass};
/// use vc_schema::UnknownKeys;
///
/// let registry = Registry::with_config(RegistryConfig {
///     unresolved_class: UnresolvedClass::Register,
///     unknown_keys: UnknownKeys::Reject,
/// });
/// assert!(registry.is_empty());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct RegistryConfig {
    pub unresolved_class: UnresolvedClass,
    /// Policy of the object schemas built at registration.
    pub unknown_keys: UnknownKeys,
}
