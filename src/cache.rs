//! Bounded least-recently-used memoization of tree derivations.

use std::hash::{Hash, Hasher};
use std::sync::{Arc, LazyLock, Mutex, MutexGuard, PoisonError};

use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;

use crate::config::DEFAULT_CACHE_CAPACITY;
use crate::derive::{TreeDerivation, derive_tree};
use crate::model::Dataset;

/// Insertion-ordered map that evicts its least recently used entry past `capacity`.
///
/// The most recently used entry sits at the back.
#[derive(Debug)]
pub struct LruMap<K, V> {
    entries: IndexMap<K, V, FxBuildHasher>,
    capacity: usize,
}

impl<K: Hash + Eq, V> LruMap<K, V> {
    /// Creates a map holding at most `capacity` entries; zero stores nothing.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: IndexMap::with_capacity_and_hasher(capacity, FxBuildHasher),
            capacity,
        }
    }

    /// Looks up a key and marks it as most recently used.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        let index = self.entries.get_index_of(key)?;
        let last = self.entries.len() - 1;
        self.entries.move_index(index, last);
        self.entries.get_index(last).map(|(_, value)| value)
    }

    /// Inserts or replaces an entry, then evicts from the front while over capacity.
    pub fn insert(&mut self, key: K, value: V) {
        if self.capacity == 0 {
            return;
        }
        let (index, _) = self.entries.insert_full(key, value);
        let last = self.entries.len() - 1;
        self.entries.move_index(index, last);
        while self.entries.len() > self.capacity {
            self.entries.shift_remove_index(0);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

// Hashes by fingerprint; equality still compares the whole dataset, so a
// fingerprint collision can never serve a wrong derivation.
#[derive(Debug)]
struct CacheKey {
    dataset: Arc<Dataset>,
    filter: String,
    selected: Option<String>,
}

impl Hash for CacheKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.dataset.fingerprint());
        self.filter.hash(state);
        self.selected.hash(state);
    }
}

impl PartialEq for CacheKey {
    fn eq(&self, other: &Self) -> bool {
        (Arc::ptr_eq(&self.dataset, &other.dataset) || *self.dataset == *other.dataset)
            && self.filter == other.filter
            && self.selected == other.selected
    }
}

impl Eq for CacheKey {}

/// Thread-safe derivation cache keyed by `(dataset, filter, selected id)`.
#[derive(Debug)]
pub struct DeriveCache {
    entries: Mutex<LruMap<CacheKey, Arc<TreeDerivation>>>,
}

static SHARED: LazyLock<Arc<DeriveCache>> =
    LazyLock::new(|| Arc::new(DeriveCache::new(DEFAULT_CACHE_CAPACITY)));

impl DeriveCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Mutex::new(LruMap::new(capacity)),
        }
    }

    /// Process-wide cache shared by all instances using [`CachePolicy::Shared`](crate::CachePolicy::Shared).
    pub fn shared() -> Arc<Self> {
        Arc::clone(&SHARED)
    }

    /// Returns the cached derivation for these inputs, deriving and storing it on a miss.
    pub fn get_or_derive(
        &self,
        dataset: &Arc<Dataset>,
        filter: &str,
        selected_id: Option<&str>,
    ) -> Arc<TreeDerivation> {
        let key = CacheKey {
            dataset: Arc::clone(dataset),
            filter: filter.to_owned(),
            selected: selected_id.map(str::to_owned),
        };
        let hit = self.lock().get(&key).cloned();
        if let Some(hit) = hit {
            tracing::trace!(filter, "derivation cache hit");
            return hit;
        }

        tracing::trace!(filter, "derivation cache miss");
        let derivation = Arc::new(derive_tree(dataset, filter, selected_id));
        self.lock().insert(key, Arc::clone(&derivation));
        derivation
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.lock().capacity()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> MutexGuard<'_, LruMap<CacheKey, Arc<TreeDerivation>>> {
        // Entries are replaced whole, so a poisoned map is still consistent.
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SidebarNode;

    #[test]
    fn lru_evicts_least_recently_used() {
        let mut map = LruMap::new(2);
        map.insert("a", 1);
        map.insert("b", 2);
        assert_eq!(map.get(&"a"), Some(&1));

        map.insert("c", 3);

        assert_eq!(map.len(), 2);
        assert_eq!(map.get(&"b"), None);
        assert_eq!(map.get(&"a"), Some(&1));
        assert_eq!(map.get(&"c"), Some(&3));
    }

    #[test]
    fn zero_capacity_stores_nothing() {
        let mut map = LruMap::new(0);
        map.insert("a", 1);

        assert!(map.is_empty());
    }

    #[test]
    fn structurally_equal_datasets_share_an_entry() {
        let cache = DeriveCache::new(8);
        let build = || Arc::new(Dataset::from_nodes([SidebarNode::leaf("a", "Alpha")]));

        let first = cache.get_or_derive(&build(), "al", None);
        let second = cache.get_or_derive(&build(), "al", None);
        let other = cache.get_or_derive(&build(), "al", Some("a"));

        assert!(Arc::ptr_eq(&first, &second));
        assert!(!Arc::ptr_eq(&first, &other));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn shared_cache_is_one_instance() {
        let shared = DeriveCache::shared();

        assert!(Arc::ptr_eq(&shared, &DeriveCache::shared()));
        assert_eq!(shared.capacity(), DEFAULT_CACHE_CAPACITY);
    }
}
