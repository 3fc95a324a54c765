use crate::{Container, Factory, Result, SharedFactory, Value};
use std::fmt;
use std::sync::Arc;

/// Type-erased extension function
type ExtendFn = Arc<dyn Fn(&dyn Container, Value) -> Result<Value> + Send + Sync>;

/// A user-supplied function post-processing the value of an entry, known by
/// name.
#[derive(Clone)]
pub struct ExtensionFn {
    name: String,
    f: ExtendFn,
}

impl ExtensionFn {
    pub fn new<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&dyn Container, Value) -> Result<Value> + Send + Sync + 'static,
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

    #[inline]
    pub fn call(&self, container: &dyn Container, value: Value) -> Result<Value> {
        (self.f)(container, value)
    }
}

impl fmt::Debug for ExtensionFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ExtensionFn").field(&self.name).finish()
    }
}

/// Resolves a factory, then threads its value through an extension.
#[derive(Debug, Clone)]
pub struct Extension {
    factory: SharedFactory,
    extension: ExtensionFn,
}

impl Extension {
    pub fn new(factory: SharedFactory, extension: ExtensionFn) -> Self {
        Self { factory, extension }
    }
}

impl Factory for Extension {
    fn resolve(&self, container: &dyn Container) -> Result<Value> {
        let value = self.factory.resolve(container)?;
        self.extension.call(container, value)
    }

    fn compiled(&self, container: &str) -> Option<String> {
        let inner = self.factory.compiled(container)?;

        Some(format!(
            "bindings.invoke_extension({:?}, {container}, {inner})?",
            self.extension.name
        ))
    }
}
