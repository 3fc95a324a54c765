//! Factory abstraction and ordered factory maps
//!
//! A factory knows how to produce the value of one container entry given the
//! container itself. Configuration sources compile into a [`FactoryMap`] that
//! processing passes then transform.

use crate::{Container, Result, Value};
use ahash::RandomState;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Produces the value of a container entry.
///
/// Implementations are immutable and shared behind `Arc` so that passes can
/// wrap an existing factory without copying it.
pub trait Factory: Send + Sync + fmt::Debug {
    /// Produce the value, looking up dependencies in `container`
    fn resolve(&self, container: &dyn Container) -> Result<Value>;

    /// Source text of an expression producing the same value, where
    /// `container` is the name of the container variable.
    ///
    /// Factories without a source form return `None`.
    fn compiled(&self, container: &str) -> Option<String> {
        let _ = container;
        None
    }
}

/// Shared handle to a factory
pub type SharedFactory = Arc<dyn Factory>;

/// Ordered map from identifier to factory.
///
/// Iteration follows insertion order. Replacing the factory of an existing
/// identifier keeps the identifier at its original position.
#[derive(Clone, Default)]
pub struct FactoryMap {
    order: Vec<String>,
    factories: HashMap<String, SharedFactory, RandomState>,
}

impl FactoryMap {
    /// Create an empty map
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty map with pre-allocated capacity
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            order: Vec::with_capacity(capacity),
            factories: HashMap::with_capacity_and_hasher(capacity, RandomState::new()),
        }
    }

    /// Associate a factory with an identifier, returning the replaced one
    pub fn insert(&mut self, id: impl Into<String>, factory: SharedFactory) -> Option<SharedFactory> {
        let id = id.into();

        if !self.factories.contains_key(&id) {
            self.order.push(id.clone());
        }

        self.factories.insert(id, factory)
    }

    /// Remove an identifier, returning its factory
    pub fn remove(&mut self, id: &str) -> Option<SharedFactory> {
        let factory = self.factories.remove(id)?;
        self.order.retain(|existing| existing != id);
        Some(factory)
    }

    #[inline]
    pub fn get(&self, id: &str) -> Option<&SharedFactory> {
        self.factories.get(id)
    }

    #[inline]
    pub fn contains(&self, id: &str) -> bool {
        self.factories.contains_key(id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Identifiers in insertion order
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SharedFactory)> {
        self.order
            .iter()
            .filter_map(|id| self.factories.get(id).map(|factory| (id.as_str(), factory)))
    }

    /// Merge `other` into this map; `other` wins on identical identifiers
    pub fn merge(mut self, other: FactoryMap) -> FactoryMap {
        self.extend(other);
        self
    }

    /// Merge many maps left to right
    pub fn merged(maps: impl IntoIterator<Item = FactoryMap>) -> FactoryMap {
        maps.into_iter().fold(FactoryMap::new(), FactoryMap::merge)
    }
}

impl Extend<(String, SharedFactory)> for FactoryMap {
    fn extend<I: IntoIterator<Item = (String, SharedFactory)>>(&mut self, iter: I) {
        for (id, factory) in iter {
            self.insert(id, factory);
        }
    }
}

impl FromIterator<(String, SharedFactory)> for FactoryMap {
    fn from_iter<I: IntoIterator<Item = (String, SharedFactory)>>(iter: I) -> Self {
        let mut map = FactoryMap::new();
        map.extend(iter);
        map
    }
}

impl IntoIterator for FactoryMap {
    type Item = (String, SharedFactory);
    type IntoIter = std::vec::IntoIter<(String, SharedFactory)>;

    fn into_iter(mut self) -> Self::IntoIter {
        let entries: Vec<_> = self
            .order
            .drain(..)
            .filter_map(|id| self.factories.remove(&id).map(|factory| (id, factory)))
            .collect();
        entries.into_iter()
    }
}

impl fmt::Debug for FactoryMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}
