use alloc::sync::Arc;
use core::any::Any;
use core::fmt;

use crate::Value;

// -----------------------------------------------------------------------------
// Object

/// A materialized object that can travel inside a [`Value`].
///
/// Transforms produce objects (for example a struct rebuilt from a validated
/// record), and everything that needs the plain shape again asks the object
/// for it through [`Object::to_plain`].
pub trait Object: Any + Send + Sync {
    /// Human readable name of the concrete object type.
    fn type_name(&self) -> &'static str;

    /// The plain view of this object.
    ///
    /// The returned value should itself be plain, see [`Value::is_plain`].
    fn to_plain(&self) -> Value;

    fn as_any(&self) -> &dyn Any;

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}

// -----------------------------------------------------------------------------
// Instance

/// A shared handle to a type-erased [`Object`].
///
/// Cloning an `Instance` clones the handle, not the object. Two instances are
/// equal only if they point to the same object.
#[derive(Clone)]
pub struct Instance(Arc<dyn Object>);

impl Instance {
    #[inline]
    pub fn new<O: Object>(object: O) -> Self {
        Self(Arc::new(object))
    }

    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.0.type_name()
    }

    #[inline]
    pub fn to_plain(&self) -> Value {
        self.0.to_plain()
    }

    #[inline]
    pub fn is<O: Object>(&self) -> bool {
        self.0.as_any().is::<O>()
    }

    #[inline]
    pub fn downcast_ref<O: Object>(&self) -> Option<&O> {
        self.0.as_any().downcast_ref::<O>()
    }

    /// Takes the object out of the handle.
    ///
    /// Fails with the handle unchanged if the object is not an `O`
    /// or if other handles to the same object are still alive.
    pub fn try_unwrap<O: Object>(self) -> Result<O, Self> {
        if !self.is::<O>() {
            return Err(self);
        }
        let keep = Arc::clone(&self.0);
        let any = self.0.into_any();
        let Ok(concrete) = any.downcast::<O>() else {
            return Err(Self(keep));
        };
        drop(keep);
        Arc::try_unwrap(concrete).map_err(|shared| Self(shared))
    }

    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ", self.type_name())?;
        fmt::Debug::fmt(&self.to_plain(), f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Point {
        x: f64,
    }

    impl Object for Point {
        fn type_name(&self) -> &'static str {
            "Point"
        }

        fn to_plain(&self) -> Value {
            Value::record([("x", Value::from(self.x))])
        }

        fn as_any(&self) -> &dyn Any {
            self
        }

        fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
            self
        }
    }

    #[test]
    fn unwrap_unique_instance() {
        let instance = Instance::new(Point { x: 1.5 });
        assert!(instance.is::<Point>());
        let point = instance.try_unwrap::<Point>().ok().unwrap();
        assert_eq!(point.x, 1.5);
    }

    #[test]
    fn unwrap_shared_instance_fails() {
        let instance = Instance::new(Point { x: 2.0 });
        let other = instance.clone();
        let back = instance.try_unwrap::<Point>().err().unwrap();
        assert!(back.ptr_eq(&other));
    }

    #[test]
    fn debug_shows_plain_view() {
        let instance = Instance::new(Point { x: 3.0 });
        let text = alloc::format!("{instance:?}");
        assert!(text.starts_with("Point "));
        assert!(text.contains("\"x\""));
    }
}
