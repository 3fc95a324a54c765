use crate::{Container, Factory, Reflection, Result, SharedFactory, Value};
use std::fmt;
use std::sync::Arc;

/// Instantiates a class with arguments produced by other factories.
///
/// Arguments are resolved against the container at resolution time, never
/// before.
#[derive(Clone)]
pub struct Instance {
    class: String,
    arguments: Vec<SharedFactory>,
    reflection: Arc<dyn Reflection>,
}

impl Instance {
    pub fn new(
        class: impl Into<String>,
        arguments: Vec<SharedFactory>,
        reflection: Arc<dyn Reflection>,
    ) -> Self {
        Self {
            class: class.into(),
            arguments,
            reflection,
        }
    }

    #[inline]
    pub fn class(&self) -> &str {
        &self.class
    }

    #[inline]
    pub fn arguments(&self) -> &[SharedFactory] {
        &self.arguments
    }
}

impl Factory for Instance {
    fn resolve(&self, container: &dyn Container) -> Result<Value> {
        let arguments = self
            .arguments
            .iter()
            .map(|argument| argument.resolve(container))
            .collect::<Result<Vec<_>>>()?;

        self.reflection.instantiate(&self.class, arguments)
    }

    fn compiled(&self, container: &str) -> Option<String> {
        if self.arguments.is_empty() {
            return Some(format!(
                "bindings.classes().instantiate({:?}, Vec::new())?",
                self.class
            ));
        }

        let arguments = self
            .arguments
            .iter()
            .map(|argument| argument.compiled(container).map(|source| indent(&source)))
            .collect::<Option<Vec<_>>>()?;

        Some(format!(
            "bindings.classes().instantiate({:?}, vec![\n{},\n])?",
            self.class,
            arguments.join(",\n")
        ))
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("class", &self.class)
            .field("arguments", &self.arguments)
            .finish()
    }
}

/// Indent every line of `source` by four spaces
pub(crate) fn indent(source: &str) -> String {
    source
        .lines()
        .map(|line| {
            if line.is_empty() {
                String::new()
            } else {
                format!("    {line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
