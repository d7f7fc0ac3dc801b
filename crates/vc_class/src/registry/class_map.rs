use core::hash::{BuildHasher, Hasher};

use hashbrown::HashMap;

use crate::ClassId;

// -----------------------------------------------------------------------------
// NoOpHasher

/// Passes the `u64` written by [`TypeId`](core::any::TypeId)'s `Hash` impl through.
#[derive(Clone, Copy, Default, Debug)]
pub(crate) struct NoOpHasher {
    hash: u64,
}

impl Hasher for NoOpHasher {
    #[inline]
    fn finish(&self) -> u64 {
        self.hash
    }

    fn write(&mut self, bytes: &[u8]) {
        for byte in bytes.iter().rev() {
            self.hash = self.hash.rotate_left(8).wrapping_add(*byte as u64);
        }
    }

    #[inline]
    fn write_u64(&mut self, i: u64) {
        self.hash = i;
    }
}

#[derive(Clone, Copy, Default, Debug)]
pub(crate) struct NoOpHashState;

impl BuildHasher for NoOpHashState {
    type Hasher = NoOpHasher;

    #[inline]
    fn build_hasher(&self) -> NoOpHasher {
        NoOpHasher::default()
    }
}

// -----------------------------------------------------------------------------
// ClassMap

/// A map keyed by [`ClassId`].
pub(crate) struct ClassMap<V>(HashMap<ClassId, V, NoOpHashState>);

impl<V> ClassMap<V> {
    #[inline]
    pub(crate) const fn new() -> Self {
        Self(HashMap::with_hasher(NoOpHashState))
    }

    #[inline]
    pub(crate) fn get(&self, id: &ClassId) -> Option<&V> {
        self.0.get(id)
    }

    #[inline]
    pub(crate) fn contains(&self, id: &ClassId) -> bool {
        self.0.contains_key(id)
    }

    /// Inserts `value`, returning the value it replaced.
    #[inline]
    pub(crate) fn insert(&mut self, id: ClassId, value: V) -> Option<V> {
        self.0.insert(id, value)
    }

    #[inline]
    pub(crate) fn remove(&mut self, id: &ClassId) -> Option<V> {
        self.0.remove(id)
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub(crate) fn values(&self) -> impl Iterator<Item = &V> {
        self.0.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_replaces() {
        let mut map = ClassMap::new();
        assert!(map.insert(ClassId::of::<u8>(), "a").is_none());
        assert_eq!(map.insert(ClassId::of::<u8>(), "b"), Some("a"));
        assert_eq!(map.get(&ClassId::of::<u8>()), Some(&"b"));
        assert!(!map.contains(&ClassId::of::<u16>()));
        assert_eq!(map.len(), 1);
        assert_eq!(map.remove(&ClassId::of::<u8>()), Some("b"));
    }

    #[test]
    fn noop_hasher_passes_u64_through() {
        let mut hasher = NoOpHashState.build_hasher();
        hasher.write_u64(1234);
        assert_eq!(hasher.finish(), 1234);
    }
}
