//! Autowiring
//!
//! Builds the factory of a class from its constructor metadata: each
//! parameter is bound by a [`ParameterParser`] and the resulting argument
//! factories are resolved against the container every time the entry is
//! resolved.
//!
//! # Example
//!
//! ```rust
//! use container_config::{
//!     AutowiredInstance, ClassMetadata, ClassRegistry, Container, Definition,
//!     DefaultParameterParser, FactoryContainer, FactoryMap, ParameterMetadata, Value,
//! };
//! use std::sync::Arc;
//!
//! struct Logger;
//! struct Mailer {
//!     logger: Arc<Logger>,
//! }
//!
//! let registry = Arc::new(
//!     ClassRegistry::new()
//!         .with(ClassMetadata::new("Logger", |_| Ok(Value::service(Logger))))
//!         .with(
//!             ClassMetadata::new("Mailer", |args| {
//!                 let logger = args[0].downcast::<Logger>().expect("logger argument");
//!                 Ok(Value::service(Mailer { logger }))
//!             })
//!             .parameter(ParameterMetadata::new("logger").class("Logger")),
//!         ),
//! );
//!
//! let mut map = FactoryMap::new();
//! map.insert(
//!     "Logger",
//!     AutowiredInstance::new("Logger", Arc::new(DefaultParameterParser), registry.clone())
//!         .factory()
//!         .unwrap(),
//! );
//! map.insert(
//!     "Mailer",
//!     AutowiredInstance::new("Mailer", Arc::new(DefaultParameterParser), registry)
//!         .factory()
//!         .unwrap(),
//! );
//!
//! let container = FactoryContainer::new(map);
//! let mailer = container.get("Mailer").unwrap().downcast::<Mailer>().unwrap();
//! let logger = container.get("Logger").unwrap().downcast::<Logger>().unwrap();
//! assert!(Arc::ptr_eq(&mailer.logger, &logger));
//! ```

use crate::error::{AutowireError, UnboundParameter};
use crate::parsing::{ParameterParser, ParsingResult};
use crate::{Instance, Reflection, SharedFactory};
use std::fmt;
use std::sync::Arc;

#[cfg(feature = "logging")]
use tracing::debug;

/// Something that knows how to build the factory of an entry.
pub trait Definition {
    fn factory(&self) -> Result<SharedFactory, AutowireError>;
}

/// Definition of a class whose constructor arguments are bound automatically.
#[derive(Clone)]
pub struct AutowiredInstance {
    class: String,
    parser: Arc<dyn ParameterParser>,
    reflection: Arc<dyn Reflection>,
}

impl AutowiredInstance {
    pub fn new(
        class: impl Into<String>,
        parser: Arc<dyn ParameterParser>,
        reflection: Arc<dyn Reflection>,
    ) -> Self {
        Self {
            class: class.into(),
            parser,
            reflection,
        }
    }

    #[inline]
    pub fn class(&self) -> &str {
        &self.class
    }
}

impl Definition for AutowiredInstance {
    /// An unknown class has no parameters: it fails when the entry is
    /// resolved, not here.
    fn factory(&self) -> Result<SharedFactory, AutowireError> {
        let parameters = self
            .reflection
            .class(&self.class)
            .map(|metadata| metadata.parameters().to_vec())
            .unwrap_or_default();

        let mut arguments = Vec::with_capacity(parameters.len());
        let mut unbound = Vec::new();

        for parameter in &parameters {
            match self.parser.parse(parameter) {
                ParsingResult::Parsed(factory) => arguments.push(factory),
                ParsingResult::Failure if parameter.is_optional() => {}
                ParsingResult::Failure => unbound.push(UnboundParameter {
                    position: parameter.position,
                    name: parameter.name.clone(),
                }),
            }
        }

        if !unbound.is_empty() {
            return Err(AutowireError {
                class: self.class.clone(),
                parameters: unbound,
            });
        }

        #[cfg(feature = "logging")]
        debug!(
            target: "container_config",
            class = %self.class,
            arguments = arguments.len(),
            "Autowired class"
        );

        Ok(Arc::new(Instance::new(
            self.class.as_str(),
            arguments,
            Arc::clone(&self.reflection),
        )))
    }
}

impl fmt::Debug for AutowiredInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AutowiredInstance").field(&self.class).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::DefaultParameterParser;
    use crate::{
        ClassMetadata, ClassRegistry, ContainerError, FactoryContainer, FactoryMap,
        Parameter, ParameterMetadata, Value,
    };

    struct Connection {
        dsn: String,
        retries: i64,
    }

    fn autowire(registry: ClassRegistry, class: &str) -> Result<SharedFactory, AutowireError> {
        AutowiredInstance::new(class, Arc::new(DefaultParameterParser), Arc::new(registry)).factory()
    }

    fn connection() -> ClassMetadata {
        ClassMetadata::new("Connection", |args| {
            Ok(Value::service(Connection {
                dsn: args[0].as_str().unwrap_or_default().to_owned(),
                retries: args[1].as_literal().and_then(|json| json.as_i64()).unwrap_or(-1),
            }))
        })
    }

    #[test]
    fn test_binds_every_parameter() {
        let registry = ClassRegistry::new().with(
            connection()
                .parameter(ParameterMetadata::new("dsn").class("Dsn"))
                .parameter(ParameterMetadata::new("retries").builtin("i64").default(3)),
        );

        let factory = autowire(registry, "Connection").unwrap();

        let mut map = FactoryMap::new();
        map.insert("Dsn", Arc::new(Parameter::literal("mysql://db")));
        let container = FactoryContainer::new(map);

        let connection = factory.resolve(&container).unwrap().downcast::<Connection>().unwrap();
        assert_eq!(connection.dsn, "mysql://db");
        assert_eq!(connection.retries, 3);
    }

    #[test]
    fn test_arguments_resolved_at_resolution_time() {
        let registry = ClassRegistry::new().with(
            connection()
                .parameter(ParameterMetadata::new("dsn").class("Dsn"))
                .parameter(ParameterMetadata::new("retries").builtin("i64").nullable()),
        );
        let factory = autowire(registry, "Connection").unwrap();

        for dsn in ["sqlite://a", "sqlite://b"] {
            let mut map = FactoryMap::new();
            map.insert("Dsn", Arc::new(Parameter::literal(dsn)));
            let container = FactoryContainer::new(map);

            let connection = factory.resolve(&container).unwrap().downcast::<Connection>().unwrap();
            assert_eq!(connection.dsn, dsn);
            assert_eq!(connection.retries, -1);
        }
    }

    #[test]
    fn test_reports_every_unbound_required_parameter() {
        let registry = ClassRegistry::new().with(
            connection()
                .parameter(ParameterMetadata::new("dsn").builtin("String"))
                .parameter(ParameterMetadata::new("user").builtin("String"))
                .parameter(ParameterMetadata::new("retries").builtin("i64").default(3))
                .parameter(ParameterMetadata::new("password")),
        );

        let error = autowire(registry, "Connection").unwrap_err();

        assert_eq!(error.class, "Connection");
        let names: Vec<&str> = error.parameters.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["dsn", "user", "password"]);
        assert_eq!(error.parameters[2].position, 3);
        assert_eq!(
            error.to_string(),
            "Unable to autowire Connection::new() because no argument is bound to \
             parameter #0 `dsn`, parameter #1 `user` and parameter #3 `password`"
        );
    }

    #[test]
    fn test_skips_unbound_variadic_parameter() {
        let registry = ClassRegistry::new().with(
            ClassMetadata::new("Chain", |args| Ok(Value::from(args)))
                .parameter(ParameterMetadata::new("first").default("a"))
                .parameter(ParameterMetadata::new("rest").builtin("String").variadic()),
        );

        let factory = autowire(registry, "Chain").unwrap();
        let container = FactoryContainer::new(FactoryMap::new());

        assert_eq!(
            factory.resolve(&container).unwrap(),
            Value::List(vec![Value::from("a")])
        );
    }

    #[test]
    fn test_unknown_class_fails_at_resolution() {
        let factory = autowire(ClassRegistry::new(), "Ghost").unwrap();
        let container = FactoryContainer::new(FactoryMap::new());

        assert!(matches!(
            factory.resolve(&container),
            Err(ContainerError::NotInstantiable { class, .. }) if class == "Ghost"
        ));
    }
}
