use crate::passes::{ProcessingPass, SharedPass};
use crate::{
    ClassRegistry, Container, ContainerError, ExtensionFn, FnFactory, Reflection, Result,
    ValueFactory, Value,
};
use ahash::RandomState;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Everything configuration documents may refer to by name.
///
/// Documents are plain data: a factory, an extension or a processing pass is
/// written as the name it is bound to here. Class names used by `invokables`
/// and `mappers` are looked up through [`Bindings::classes`], and
/// `parameters` go through [`Bindings::values`].
///
/// # Example
///
/// ```rust
/// use container_config::{Bindings, ExtensionFn, FnFactory, Value};
///
/// let bindings = Bindings::new()
///     .with_factory(FnFactory::new("make_logger", |_| Ok(Value::from("stderr"))))
///     .with_extension(ExtensionFn::new("add_handlers", |_, logger| Ok(logger)));
///
/// assert!(bindings.factory("make_logger").is_some());
/// assert!(bindings.extension("make_logger").is_none());
/// ```
#[derive(Clone)]
pub struct Bindings {
    factories: HashMap<String, FnFactory, RandomState>,
    extensions: HashMap<String, ExtensionFn, RandomState>,
    passes: HashMap<String, SharedPass, RandomState>,
    classes: Arc<dyn Reflection>,
    values: ValueFactory,
}

impl Bindings {
    /// No names bound, no classes, default value parsers
    pub fn new() -> Self {
        Self {
            factories: HashMap::default(),
            extensions: HashMap::default(),
            passes: HashMap::default(),
            classes: Arc::new(ClassRegistry::new()),
            values: ValueFactory::default(),
        }
    }

    /// Bind a factory under its name
    pub fn with_factory(mut self, factory: FnFactory) -> Self {
        self.factories.insert(factory.name().to_owned(), factory);
        self
    }

    /// Bind an extension under its name
    pub fn with_extension(mut self, extension: ExtensionFn) -> Self {
        self.extensions.insert(extension.name().to_owned(), extension);
        self
    }

    /// Bind a processing pass under `name`
    pub fn with_pass(mut self, name: impl Into<String>, pass: impl ProcessingPass + 'static) -> Self {
        self.passes.insert(name.into(), Arc::new(pass));
        self
    }

    /// Use `classes` to look up class names
    pub fn with_classes(mut self, classes: Arc<dyn Reflection>) -> Self {
        self.classes = classes;
        self
    }

    /// Parse parameters with `values`
    pub fn with_values(mut self, values: ValueFactory) -> Self {
        self.values = values;
        self
    }

    #[inline]
    pub fn factory(&self, name: &str) -> Option<&FnFactory> {
        self.factories.get(name)
    }

    #[inline]
    pub fn extension(&self, name: &str) -> Option<&ExtensionFn> {
        self.extensions.get(name)
    }

    #[inline]
    pub fn pass(&self, name: &str) -> Option<&SharedPass> {
        self.passes.get(name)
    }

    #[inline]
    pub fn classes(&self) -> &Arc<dyn Reflection> {
        &self.classes
    }

    #[inline]
    pub fn values(&self) -> &ValueFactory {
        &self.values
    }

    /// Names of the bound factories
    pub fn factory_names(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    /// Names of the bound extensions
    pub fn extension_names(&self) -> impl Iterator<Item = &str> {
        self.extensions.keys().map(String::as_str)
    }

    /// Names of the bound passes
    pub fn pass_names(&self) -> impl Iterator<Item = &str> {
        self.passes.keys().map(String::as_str)
    }

    /// Call the factory bound to `name`.
    ///
    /// Used by compiled containers, which refer to factories by name.
    pub fn invoke_factory(&self, name: &str, container: &dyn Container) -> Result<Value> {
        use crate::Factory;

        self.factory(name)
            .ok_or_else(|| ContainerError::failed(name, "no factory is bound to this name"))?
            .resolve(container)
    }

    /// Call the extension bound to `name` on `value`
    pub fn invoke_extension(&self, name: &str, container: &dyn Container, value: Value) -> Result<Value> {
        self.extension(name)
            .ok_or_else(|| ContainerError::failed(name, "no extension is bound to this name"))?
            .call(container, value)
    }
}

impl Default for Bindings {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Bindings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bindings")
            .field("factories", &self.factories.len())
            .field("extensions", &self.extensions.len())
            .field("passes", &self.passes.len())
            .field("values", &self.values)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::passes::FnPass;
    use crate::{FactoryContainer, FactoryMap};

    #[test]
    fn test_lookups() {
        let bindings = Bindings::new()
            .with_factory(FnFactory::new("f", |_| Ok(Value::Null)))
            .with_extension(ExtensionFn::new("e", |_, v| Ok(v)))
            .with_pass("p", FnPass::new("p", |map| map));

        assert_eq!(bindings.factory("f").map(FnFactory::name), Some("f"));
        assert!(bindings.extension("e").is_some());
        assert!(bindings.pass("p").is_some());
        assert!(bindings.factory("e").is_none());
        assert_eq!(bindings.pass_names().collect::<Vec<_>>(), ["p"]);
    }

    #[test]
    fn test_invoke_by_name() {
        let bindings = Bindings::new()
            .with_factory(FnFactory::new("answer", |_| Ok(Value::from(42i64))))
            .with_extension(ExtensionFn::new("negate", |_, v| {
                Ok(Value::from(-v.as_literal().and_then(|j| j.as_i64()).unwrap_or_default()))
            }));
        let container = FactoryContainer::new(FactoryMap::new());

        let value = bindings.invoke_factory("answer", &container).unwrap();
        assert_eq!(
            bindings.invoke_extension("negate", &container, value).unwrap(),
            Value::from(-42i64)
        );
    }

    #[test]
    fn test_invoke_unbound_name_fails() {
        let container = FactoryContainer::new(FactoryMap::new());

        assert!(matches!(
            Bindings::new().invoke_factory("nope", &container),
            Err(ContainerError::ResolutionFailed { id, .. }) if id == "nope"
        ));
    }
}
