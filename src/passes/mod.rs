//! Processing passes
//!
//! A pass transforms a complete [`FactoryMap`] after every configuration
//! source has been merged, so it may refer to identifiers defined by any
//! source. Passes consume the map and return a new one; they never fail.

mod extension;
mod tagging;

pub use extension::ExtensionPass;
pub use tagging::{Entries, Implementations, Tagging, TaggingPass};

use crate::FactoryMap;
use std::fmt;
use std::sync::Arc;

#[cfg(feature = "logging")]
use tracing::trace;

/// Transformation of a factory map.
pub trait ProcessingPass: Send + Sync + fmt::Debug {
    fn process(&self, factories: FactoryMap) -> FactoryMap;
}

/// Shared handle to a pass
pub type SharedPass = Arc<dyn ProcessingPass>;

/// Type-erased user pass function
type PassFn = Arc<dyn Fn(FactoryMap) -> FactoryMap + Send + Sync>;

/// A user-supplied pass function, known by name.
#[derive(Clone)]
pub struct FnPass {
    name: String,
    f: PassFn,
}

impl FnPass {
    pub fn new<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(FactoryMap) -> FactoryMap + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            f: Arc::new(f),
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl ProcessingPass for FnPass {
    fn process(&self, factories: FactoryMap) -> FactoryMap {
        (self.f)(factories)
    }
}

impl fmt::Debug for FnPass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("FnPass").field(&self.name).finish()
    }
}

/// Applies passes strictly in order, each one seeing the output of the
/// previous one.
#[derive(Debug, Clone, Default)]
pub struct MergedProcessingPass {
    passes: Vec<SharedPass>,
}

impl MergedProcessingPass {
    pub fn new(passes: Vec<SharedPass>) -> Self {
        Self { passes }
    }

    /// Append a pass
    pub fn push(&mut self, pass: SharedPass) {
        self.passes.push(pass);
    }

    /// Concatenation of this pass list and `other`
    pub fn merge(mut self, other: MergedProcessingPass) -> MergedProcessingPass {
        self.passes.extend(other.passes);
        self
    }

    #[inline]
    pub fn passes(&self) -> &[SharedPass] {
        &self.passes
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.passes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.passes.is_empty()
    }
}

impl ProcessingPass for MergedProcessingPass {
    fn process(&self, factories: FactoryMap) -> FactoryMap {
        self.passes.iter().fold(factories, |factories, pass| {
            #[cfg(feature = "logging")]
            trace!(
                target: "container_config",
                pass = ?pass,
                entries = factories.len(),
                "Applying processing pass"
            );

            pass.process(factories)
        })
    }
}

impl FromIterator<SharedPass> for MergedProcessingPass {
    fn from_iter<I: IntoIterator<Item = SharedPass>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
