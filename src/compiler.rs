//! Source rendering of factory maps
//!
//! Renders a factory map as a Rust function resolving identifiers with a
//! `match`, for applications generating their container ahead of time. The
//! rendered code expects a `bindings: &Bindings` in scope for classes and
//! named functions.
//!
//! Rendering is best effort: a factory without a source form makes the whole
//! compilation fail. It never changes how the factories behave at runtime.

use crate::error::CompileError;
use crate::factories::indent;
use crate::FactoryMap;

#[cfg(feature = "logging")]
use tracing::debug;

/// Renders factory maps as source text.
#[derive(Debug, Clone)]
pub struct Compiler {
    function: String,
    container: String,
}

impl Compiler {
    /// A compiler rendering `fn resolve(container, bindings, id)`
    pub fn new() -> Self {
        Self {
            function: "resolve".into(),
            container: "container".into(),
        }
    }

    /// Name of the rendered function
    pub fn function(mut self, name: impl Into<String>) -> Self {
        self.function = name.into();
        self
    }

    /// Name of the container parameter
    pub fn container(mut self, name: impl Into<String>) -> Self {
        self.container = name.into();
        self
    }

    pub fn compile(&self, factories: &FactoryMap) -> Result<String, CompileError> {
        let mut arms = Vec::with_capacity(factories.len() + 1);

        for (id, factory) in factories.iter() {
            let source = factory
                .compiled(&self.container)
                .ok_or_else(|| CompileError::NotCompilable { id: id.to_owned() })?;

            arms.push(format!("{id:?} => Ok({{\n{}\n}}),", indent(&source)));
        }
        arms.push("_ => Err(ContainerError::not_found(id))".to_owned());

        #[cfg(feature = "logging")]
        debug!(
            target: "container_config",
            entries = factories.len(),
            function = %self.function,
            "Factory map compiled"
        );

        let body = indent(&indent(&arms.join("\n")));

        Ok(format!(
            "pub fn {function}({container}: &dyn Container, bindings: &Bindings, id: &str) -> Result<Value> {{\n    match id {{\n{body}\n    }}\n}}\n",
            function = self.function,
            container = self.container,
        ))
    }
}

impl Default for Compiler {
    fn default() -> Self {
        Self::new()
    }
}
