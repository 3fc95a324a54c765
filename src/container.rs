//! Container abstraction and a factory-backed implementation
//!
//! Factories only ever see a `&dyn Container`. [`FactoryContainer`] is the
//! container this crate ships for applications that do not bring their own.

use crate::storage::EntryStorage;
use crate::{ContainerError, FactoryMap, Result, Value};
use std::sync::Arc;

#[cfg(feature = "logging")]
use tracing::{debug, trace};

/// A container of identified entries.
pub trait Container {
    /// Resolve the entry associated with `id`.
    ///
    /// Fails with [`ContainerError::NotFound`] when there is none.
    fn get(&self, id: &str) -> Result<Value>;

    /// Whether an entry is associated with `id`
    fn has(&self, id: &str) -> bool;
}

/// Container resolving entries by invoking the factories of a [`FactoryMap`].
///
/// Resolved values are cached per identifier, so every factory runs at most
/// once (see [`FactoryContainer::transient`] for the opposite behavior).
/// Resolving an entry that depends on itself fails with
/// [`ContainerError::Circular`].
///
/// # Examples
///
/// ```rust
/// use container_config::{Container, FactoryContainer, FactoryMap, Parameter, Alias};
/// use std::sync::Arc;
///
/// let mut map = FactoryMap::new();
/// map.insert("logger.default", Arc::new(Parameter::literal("stderr")));
/// map.insert("log", Arc::new(Alias::new("logger.default")));
///
/// let container = FactoryContainer::new(map);
/// assert_eq!(container.get("log").unwrap().as_str(), Some("stderr"));
/// ```
#[derive(Clone)]
pub struct FactoryContainer {
    storage: Arc<EntryStorage>,
    cache: bool,
}

impl FactoryContainer {
    /// Create a caching container
    pub fn new(factories: FactoryMap) -> Self {
        #[cfg(feature = "logging")]
        debug!(
            target: "container_config",
            entries = factories.len(),
            "Creating factory container"
        );

        Self {
            storage: Arc::new(EntryStorage::new(factories)),
            cache: true,
        }
    }

    /// Create a container invoking the factory on every resolution
    pub fn transient(factories: FactoryMap) -> Self {
        Self {
            cache: false,
            ..Self::new(factories)
        }
    }

    /// The factory map this container resolves from
    #[inline]
    pub fn factories(&self) -> &FactoryMap {
        self.storage.factories()
    }

    /// Number of entries
    #[inline]
    pub fn len(&self) -> usize {
        self.storage.factories().len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.storage.factories().is_empty()
    }

    /// Number of entries already resolved and cached
    #[inline]
    pub fn resolved_len(&self) -> usize {
        self.storage.cached_len()
    }
}

impl Container for FactoryContainer {
    fn get(&self, id: &str) -> Result<Value> {
        if let Some(value) = self.storage.cached(id) {
            #[cfg(feature = "logging")]
            trace!(
                target: "container_config",
                id,
                location = "cache",
                "Entry resolved from cache"
            );
            return Ok(value);
        }

        let factory = self
            .storage
            .factory(id)
            .ok_or_else(|| ContainerError::not_found(id))?;

        let _guard = self.storage.enter(id).ok_or_else(|| {
            #[cfg(feature = "logging")]
            debug!(
                target: "container_config",
                id,
                "Circular dependency detected"
            );
            ContainerError::Circular { id: id.to_owned() }
        })?;

        #[cfg(feature = "logging")]
        trace!(
            target: "container_config",
            id,
            "Invoking factory"
        );

        let value = factory.resolve(self)?;

        if self.cache {
            self.storage.store(id, value.clone());
        }

        Ok(value)
    }

    #[inline]
    fn has(&self, id: &str) -> bool {
        self.storage.contains(id)
    }
}

impl std::fmt::Debug for FactoryContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FactoryContainer")
            .field("entries", &self.len())
            .field("resolved", &self.resolved_len())
            .field("cache", &self.cache)
            .finish()
    }
}
