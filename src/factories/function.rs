use crate::{Container, Factory, Result, Value};
use std::fmt;
use std::sync::Arc;

/// Type-erased user factory function
type FactoryFn = Arc<dyn Fn(&dyn Container) -> Result<Value> + Send + Sync>;

/// A user-supplied factory function, known by name.
///
/// The name is what configuration documents use to refer to the function
/// (see [`Bindings::factory`](crate::Bindings::factory)).
#[derive(Clone)]
pub struct FnFactory {
    name: String,
    f: FactoryFn,
}

impl FnFactory {
    pub fn new<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&dyn Container) -> Result<Value> + Send + Sync + 'static,
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

impl Factory for FnFactory {
    #[inline]
    fn resolve(&self, container: &dyn Container) -> Result<Value> {
        (self.f)(container)
    }

    fn compiled(&self, container: &str) -> Option<String> {
        Some(format!(
            "bindings.invoke_factory({:?}, {container})?",
            self.name
        ))
    }
}

impl fmt::Debug for FnFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("FnFactory").field(&self.name).finish()
    }
}
