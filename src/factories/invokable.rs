use crate::{Container, Factory, Reflection, Result, Value};
use std::fmt;
use std::sync::Arc;

/// Instantiates a class with no arguments.
#[derive(Clone)]
pub struct Invokable {
    class: String,
    reflection: Arc<dyn Reflection>,
}

impl Invokable {
    pub fn new(class: impl Into<String>, reflection: Arc<dyn Reflection>) -> Self {
        Self {
            class: class.into(),
            reflection,
        }
    }

    #[inline]
    pub fn class(&self) -> &str {
        &self.class
    }
}

impl Factory for Invokable {
    fn resolve(&self, _container: &dyn Container) -> Result<Value> {
        self.reflection.instantiate(&self.class, Vec::new())
    }

    fn compiled(&self, _container: &str) -> Option<String> {
        Some(format!(
            "bindings.classes().instantiate({:?}, Vec::new())?",
            self.class
        ))
    }
}

impl fmt::Debug for Invokable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Invokable").field(&self.class).finish()
    }
}
