use super::ProcessingPass;
use crate::{Extension, ExtensionFn, FactoryMap};
use std::sync::Arc;

#[cfg(feature = "logging")]
use tracing::trace;

/// Wraps the factory of one entry in an [`Extension`].
///
/// Maps without the entry are returned unchanged.
#[derive(Debug, Clone)]
pub struct ExtensionPass {
    id: String,
    extension: ExtensionFn,
}

impl ExtensionPass {
    pub fn new(id: impl Into<String>, extension: ExtensionFn) -> Self {
        Self {
            id: id.into(),
            extension,
        }
    }

    #[inline]
    pub fn id(&self) -> &str {
        &self.id
    }
}

impl ProcessingPass for ExtensionPass {
    fn process(&self, mut factories: FactoryMap) -> FactoryMap {
        let Some(factory) = factories.get(&self.id).cloned() else {
            #[cfg(feature = "logging")]
            trace!(
                target: "container_config",
                id = %self.id,
                "No entry to extend"
            );
            return factories;
        };

        factories.insert(
            self.id.as_str(),
            Arc::new(Extension::new(factory, self.extension.clone())),
        );
        factories
    }
}
