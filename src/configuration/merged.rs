use super::{Bindings, Configuration, ConfigurationEntry, FileConfiguration};
use crate::error::ConfigError;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

#[cfg(feature = "logging")]
use tracing::debug;

/// Several configuration sources merged in order.
///
/// Later sources override the factories of earlier ones, and passes of all
/// sources run on the merged map, in source order.
#[derive(Default)]
pub struct MergedConfiguration {
    sources: Vec<Box<dyn Configuration>>,
}

impl MergedConfiguration {
    pub fn new(sources: Vec<Box<dyn Configuration>>) -> Self {
        Self { sources }
    }

    /// One [`FileConfiguration`] per path
    pub fn from_paths<I, P>(bindings: Arc<Bindings>, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        Self::new(
            paths
                .into_iter()
                .map(|path| {
                    Box::new(FileConfiguration::new(Arc::clone(&bindings), path.as_ref()))
                        as Box<dyn Configuration>
                })
                .collect(),
        )
    }

    /// Append a source
    pub fn with(mut self, source: impl Configuration + 'static) -> Self {
        self.sources.push(Box::new(source));
        self
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

impl From<Vec<Box<dyn Configuration>>> for MergedConfiguration {
    fn from(sources: Vec<Box<dyn Configuration>>) -> Self {
        Self::new(sources)
    }
}

impl Configuration for MergedConfiguration {
    fn entry(&self) -> Result<ConfigurationEntry, ConfigError> {
        let mut merged = ConfigurationEntry::default();

        for source in &self.sources {
            merged = merged.merge(source.entry()?);
        }

        #[cfg(feature = "logging")]
        debug!(
            target: "container_config",
            sources = self.sources.len(),
            entries = merged.map().len(),
            passes = merged.passes().len(),
            "Configuration sources merged"
        );

        Ok(merged)
    }
}

impl fmt::Debug for MergedConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MergedConfiguration")
            .field("sources", &self.sources.len())
            .finish()
    }
}
