//! Entry storage for [`FactoryContainer`](crate::FactoryContainer)
//!
//! Uses DashMap for lock-free access to resolved instances.

use crate::{FactoryMap, SharedFactory, Value};
use ahash::RandomState;
use dashmap::{DashMap, DashSet};
use std::thread::{self, ThreadId};

/// Factories plus the values already resolved from them.
pub(crate) struct EntryStorage {
    /// Immutable factory map the container was built from
    factories: FactoryMap,
    /// Resolved values, keyed by identifier
    instances: DashMap<String, Value, RandomState>,
    /// Identifiers currently being resolved, per thread (cycle detection)
    resolving: DashSet<(ThreadId, String), RandomState>,
}

impl EntryStorage {
    /// Create storage for a factory map.
    ///
    /// Uses 8 shards: containers built from configuration rarely hold more
    /// than a few hundred entries.
    pub fn new(factories: FactoryMap) -> Self {
        let capacity = factories.len();

        Self {
            factories,
            instances: DashMap::with_capacity_and_hasher_and_shard_amount(
                capacity,
                RandomState::new(),
                8,
            ),
            resolving: DashSet::with_hasher(RandomState::new()),
        }
    }

    #[inline]
    pub fn factory(&self, id: &str) -> Option<&SharedFactory> {
        self.factories.get(id)
    }

    #[inline]
    pub fn contains(&self, id: &str) -> bool {
        self.factories.contains(id)
    }

    #[inline]
    pub fn factories(&self) -> &FactoryMap {
        &self.factories
    }

    /// Previously resolved value, if any
    #[inline]
    pub fn cached(&self, id: &str) -> Option<Value> {
        self.instances.get(id).map(|entry| entry.value().clone())
    }

    /// Remember a resolved value
    #[inline]
    pub fn store(&self, id: &str, value: Value) {
        self.instances.insert(id.to_owned(), value);
    }

    /// Number of resolved values held
    #[inline]
    pub fn cached_len(&self) -> usize {
        self.instances.len()
    }

    /// Mark `id` as being resolved.
    ///
    /// Returns `None` when `id` is already being resolved further up the
    /// call stack of the current thread. Other threads resolving the same
    /// identifier do not count.
    pub fn enter<'a>(&'a self, id: &str) -> Option<ResolvingGuard<'a>> {
        let key = (thread::current().id(), id.to_owned());

        if self.resolving.insert(key.clone()) {
            Some(ResolvingGuard { storage: self, key })
        } else {
            None
        }
    }
}

/// Unmarks an identifier when its resolution ends, successful or not.
pub(crate) struct ResolvingGuard<'a> {
    storage: &'a EntryStorage,
    key: (ThreadId, String),
}

impl Drop for ResolvingGuard<'_> {
    fn drop(&mut self) {
        self.storage.resolving.remove(&self.key);
    }
}
