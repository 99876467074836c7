use crate::model::{Item, ItemId};
use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock};

/// Maps item identifiers back to the caller's items
///
/// Clones share the same underlying map. Readers never observe a partially
/// rebuilt registry: [`ItemRegistry::replace_all`] swaps the whole map under
/// a single write lock.
pub struct ItemRegistry {
    items: Arc<RwLock<BTreeMap<ItemId, Arc<Item>>>>,
}

impl ItemRegistry {
    pub fn new() -> Self {
        Self {
            items: Arc::new(RwLock::new(BTreeMap::new())),
        }
    }

    /// Remove every entry
    pub fn reset(&self) {
        self.write().clear();
    }

    /// Insert an item, replacing any entry with the same id
    pub fn register(&self, item: Arc<Item>) {
        self.write().insert(item.id.clone(), item);
    }

    /// Atomically replace the contents with `items`
    ///
    /// Equivalent to `reset()` followed by one `register()` per item, except
    /// that concurrent readers see either the old map or the new one.
    pub fn replace_all<'a, I>(&self, items: I)
    where
        I: IntoIterator<Item = &'a Arc<Item>>,
    {
        let fresh: BTreeMap<ItemId, Arc<Item>> = items
            .into_iter()
            .map(|item| (item.id.clone(), Arc::clone(item)))
            .collect();
        *self.write() = fresh;
    }

    pub fn resolve(&self, id: &str) -> Option<Arc<Item>> {
        self.read().get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// All registered ids in sorted order
    pub fn ids(&self) -> Vec<ItemId> {
        self.read().keys().cloned().collect()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, BTreeMap<ItemId, Arc<Item>>> {
        self.items.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, BTreeMap<ItemId, Arc<Item>>> {
        self.items.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for ItemRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for ItemRegistry {
    fn clone(&self) -> Self {
        Self {
            items: self.items.clone(),
        }
    }
}
