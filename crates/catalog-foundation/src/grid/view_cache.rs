//! Id-keyed store of live item views.

use std::fmt;
use std::hash::Hash;

use catalog_core::collections::map::HashMap;

use super::item::ViewFactory;

/// Views that currently exist, keyed by item id.
///
/// Removing an entry always goes through the factory's `dispose`, so a handle
/// is never dropped without being released.
pub struct ViewCache<K, H> {
    entries: HashMap<K, H>,
}

impl<K: Eq + Hash, H> Default for ViewCache<K, H> {
    fn default() -> Self {
        Self {
            entries: HashMap::default(),
        }
    }
}

impl<K: Eq + Hash, H> ViewCache<K, H> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &K) -> Option<&H> {
        self.entries.get(id)
    }

    pub fn get_mut(&mut self, id: &K) -> Option<&mut H> {
        self.entries.get_mut(id)
    }

    pub fn contains(&self, id: &K) -> bool {
        self.entries.contains_key(id)
    }

    /// Stores `handle` for `id`. If `id` already had a view, that view is
    /// handed back for the caller to dispose.
    #[must_use = "a replaced handle must be disposed"]
    pub fn put(&mut self, id: K, handle: H) -> Option<H> {
        self.entries.insert(id, handle)
    }

    /// Disposes and removes the view for `id`. Returns whether there was one.
    pub fn evict<F>(&mut self, id: &K, factory: &mut F) -> bool
    where
        F: ViewFactory<Handle = H>,
    {
        match self.entries.remove(id) {
            Some(handle) => {
                factory.dispose(handle);
                true
            }
            None => false,
        }
    }

    /// Disposes every view whose id fails `keep`. Returns how many went.
    pub fn retain<F>(&mut self, mut keep: impl FnMut(&K) -> bool, factory: &mut F) -> usize
    where
        F: ViewFactory<Handle = H>,
    {
        let before = self.entries.len();
        let mut doomed = Vec::new();
        let entries = std::mem::take(&mut self.entries);
        for (id, handle) in entries {
            if keep(&id) {
                self.entries.insert(id, handle);
            } else {
                doomed.push(handle);
            }
        }
        for handle in doomed {
            factory.dispose(handle);
        }
        before - self.entries.len()
    }

    /// Disposes every view. Returns how many there were.
    pub fn clear<F>(&mut self, factory: &mut F) -> usize
    where
        F: ViewFactory<Handle = H>,
    {
        let count = self.entries.len();
        for (_, handle) in self.entries.drain() {
            factory.dispose(handle);
        }
        count
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &K> {
        self.entries.keys()
    }
}

impl<K, H> fmt::Debug for ViewCache<K, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewCache")
            .field("len", &self.entries.len())
            .finish()
    }
}
