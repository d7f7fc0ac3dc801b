use core::any::TypeId;
use core::fmt;

use crate::{ClassBuilder, RegisterError};

// -----------------------------------------------------------------------------
// ClassId

/// The identity of a serializable class.
///
/// Two classes with the same name in different modules are different classes.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassId(TypeId);

impl ClassId {
    #[inline]
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self(TypeId::of::<T>())
    }

    #[inline]
    pub const fn type_id(self) -> TypeId {
        self.0
    }
}

impl From<TypeId> for ClassId {
    #[inline]
    fn from(value: TypeId) -> Self {
        Self(value)
    }
}

impl fmt::Debug for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ClassId").field(&self.0).finish()
    }
}

// -----------------------------------------------------------------------------
// Serializable

/// A class whose instances convert to and from validated plain records.
///
/// Implementors list their serialized fields in [`declare`](Self::declare).
/// New instances are created with [`Default`] and then filled field by field,
/// so fields that are not declared keep their default value after
/// deserialization.
///
/// Usually derived, see [`derive@crate::Serializable`].
///
/// # Examples
///
/// ```
/// use vc_class::{ClassBuilder, RegisterError, Registry, Serializable};
///
/// #[derive(Default)]
/// struct Point {
///     x: f64,
///     y: f64,
/// }
///
/// impl Serializable for Point {
///     fn declare(class: &mut ClassBuilder<'_, Self>) -> Result<(), RegisterError> {
///         class
///             .field("x", vc_schema::number(), |p| &p.x, |p| &mut p.x)?
///             .field("y", vc_schema::number(), |p| &p.y, |p| &mut p.y)?;
///         Ok(())
///     }
/// }
///
/// let mut registry = Registry::new();
/// registry.register::<Point>().unwrap();
///
/// let record = registry.serialize(&Point { x: 1.0, y: 2.0 }).unwrap();
/// assert_eq!(record["y"], vc_schema::Value::from(2));
/// ```
pub trait Serializable: Default + Send + Sync + 'static {
    /// Declares the serialized fields, in order.
    fn declare(class: &mut ClassBuilder<'_, Self>) -> Result<(), RegisterError>;

    /// The name used in errors and logs.
    fn class_name() -> &'static str {
        core::any::type_name::<Self>()
    }
}
