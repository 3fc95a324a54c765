use crate::passes::{MergedProcessingPass, ProcessingPass};
use crate::FactoryMap;

#[cfg(feature = "logging")]
use tracing::debug;

/// The factories and processing passes of a configuration source.
///
/// Passes are only applied by [`ConfigurationEntry::factories`], so that
/// merged entries run their passes on the merged map.
#[derive(Debug, Clone, Default)]
pub struct ConfigurationEntry {
    map: FactoryMap,
    passes: MergedProcessingPass,
}

impl ConfigurationEntry {
    pub fn new(map: FactoryMap, passes: MergedProcessingPass) -> Self {
        Self { map, passes }
    }

    /// Entry without passes
    pub fn from_map(map: FactoryMap) -> Self {
        Self::new(map, MergedProcessingPass::default())
    }

    /// Factories before the passes run
    #[inline]
    pub fn map(&self) -> &FactoryMap {
        &self.map
    }

    #[inline]
    pub fn passes(&self) -> &MergedProcessingPass {
        &self.passes
    }

    /// Merge `other` after this entry.
    ///
    /// Factories of `other` replace the ones with the same identifier and its
    /// passes run after the passes of this entry.
    pub fn merge(self, other: ConfigurationEntry) -> ConfigurationEntry {
        ConfigurationEntry {
            map: self.map.merge(other.map),
            passes: self.passes.merge(other.passes),
        }
    }

    /// The final factory map, with every pass applied in order
    pub fn factories(&self) -> FactoryMap {
        #[cfg(feature = "logging")]
        debug!(
            target: "container_config",
            entries = self.map.len(),
            passes = self.passes.len(),
            "Applying processing passes"
        );

        self.passes.process(self.map.clone())
    }

    pub fn into_parts(self) -> (FactoryMap, MergedProcessingPass) {
        (self.map, self.passes)
    }
}
