use super::ProcessingPass;
use crate::{FactoryMap, Reflection, SharedFactory, Tag};
use ahash::AHashSet;
use std::fmt;
use std::sync::Arc;

#[cfg(feature = "logging")]
use tracing::trace;

/// Selects the entries belonging to a tag.
pub trait Tagging: Send + Sync + fmt::Debug {
    /// Whether the entry `id` belongs to the tag
    fn tags(&self, id: &str, factory: &SharedFactory) -> bool;
}

/// Explicit list of tagged identifiers.
#[derive(Debug, Clone, Default)]
pub struct Entries {
    ids: AHashSet<String>,
}

impl Entries {
    pub fn new<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            ids: ids.into_iter().map(Into::into).collect(),
        }
    }
}

impl Tagging for Entries {
    #[inline]
    fn tags(&self, id: &str, _factory: &SharedFactory) -> bool {
        self.ids.contains(id)
    }
}

/// Tags the entries whose identifier is a class implementing an interface.
#[derive(Clone)]
pub struct Implementations {
    interface: String,
    reflection: Arc<dyn Reflection>,
}

impl Implementations {
    pub fn new(interface: impl Into<String>, reflection: Arc<dyn Reflection>) -> Self {
        Self {
            interface: interface.into(),
            reflection,
        }
    }
}

impl Tagging for Implementations {
    fn tags(&self, id: &str, _factory: &SharedFactory) -> bool {
        self.reflection.implements(id, &self.interface)
    }
}

impl fmt::Debug for Implementations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Implementations").field(&self.interface).finish()
    }
}

/// Adds the entries selected by a [`Tagging`] strategy to the tag `id`.
///
/// An existing entry at `id` becomes the start of the list; tagged values
/// are appended to it in map order. The tag never contains itself.
#[derive(Debug, Clone)]
pub struct TaggingPass {
    id: String,
    tagging: Arc<dyn Tagging>,
}

impl TaggingPass {
    pub fn new(id: impl Into<String>, tagging: Arc<dyn Tagging>) -> Self {
        Self {
            id: id.into(),
            tagging,
        }
    }

    #[inline]
    pub fn id(&self) -> &str {
        &self.id
    }
}

impl ProcessingPass for TaggingPass {
    fn process(&self, mut factories: FactoryMap) -> FactoryMap {
        let ids: Vec<String> = factories
            .iter()
            .filter(|(id, factory)| *id != self.id && self.tagging.tags(id, factory))
            .map(|(id, _)| id.to_owned())
            .collect();

        #[cfg(feature = "logging")]
        trace!(
            target: "container_config",
            id = %self.id,
            tagged = ids.len(),
            "Tagging entries"
        );

        let tag = match factories.get(&self.id) {
            Some(previous) => Tag::extending(self.id.as_str(), Arc::clone(previous), ids),
            None => Tag::new(self.id.as_str(), ids),
        };

        factories.insert(self.id.as_str(), Arc::new(tag));
        factories
    }
}
