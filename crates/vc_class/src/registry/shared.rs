use alloc::sync::Arc;
use core::fmt;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::Registry;

// -----------------------------------------------------------------------------
// SharedRegistry

/// A cloneable, lock-protected [`Registry`] handle.
///
/// Typically written once during initialization and read by any number of
/// threads afterwards. A panic while a lock is held does not make the
/// registry unusable, the poisoned state is ignored.
///
/// # Examples
///
/// ```
/// use vc_class::{Registry, SharedRegistry};
///
/// let shared = SharedRegistry::new(Registry::new());
/// let reader = shared.clone();
///
/// std::thread::spawn(move || assert!(reader.read().is_empty()))
///     .join()
///     .unwrap();
/// ```
#[derive(Clone, Default)]
pub struct SharedRegistry {
    /// The wrapped [`Registry`].
    pub internal: Arc<RwLock<Registry>>,
}

impl SharedRegistry {
    #[inline]
    pub fn new(registry: Registry) -> Self {
        Self {
            internal: Arc::new(RwLock::new(registry)),
        }
    }

    /// Takes a read lock on the underlying [`Registry`].
    pub fn read(&self) -> RwLockReadGuard<'_, Registry> {
        self.internal.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Takes a write lock on the underlying [`Registry`].
    pub fn write(&self) -> RwLockWriteGuard<'_, Registry> {
        self.internal
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl From<Registry> for SharedRegistry {
    #[inline]
    fn from(registry: Registry) -> Self {
        Self::new(registry)
    }
}

impl fmt::Debug for SharedRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.read(), f)
    }
}
