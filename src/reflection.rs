//! Type metadata used for instantiation and autowiring
//!
//! Rust has no runtime reflection, so the host application describes the
//! types configuration may refer to: their constructor parameters, how to
//! call the constructor, and which interfaces they implement. Lookups go
//! through the [`Reflection`] trait; [`ClassRegistry`] is the in-memory
//! implementation.
//!
//! # Example
//!
//! ```rust
//! use container_config::{ClassMetadata, ClassRegistry, ParameterMetadata, Reflection, Value};
//!
//! struct Mailer {
//!     dsn: String,
//! }
//!
//! let registry = ClassRegistry::new()
//!     .with(ClassMetadata::interface("Transport"))
//!     .with(
//!         ClassMetadata::new("Mailer", |args| {
//!             let dsn = args.first().and_then(Value::as_str).unwrap_or("null://").to_owned();
//!             Ok(Value::service(Mailer { dsn }))
//!         })
//!         .parameter(ParameterMetadata::new("dsn").builtin("String").default("smtp://localhost"))
//!         .implements("Transport"),
//!     );
//!
//! assert!(registry.implements("Mailer", "Transport"));
//! assert_eq!(registry.class("Mailer").unwrap().parameters().len(), 1);
//! ```

use crate::{ContainerError, Result, Value};
use ahash::{AHashSet, RandomState};
use serde_json::Value as Json;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Declared type of a constructor parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeHint {
    /// A type registered (or registrable) as a container entry
    Class(String),
    /// A scalar or other type the container never provides
    Builtin(String),
}

impl fmt::Display for TypeHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeHint::Class(name) | TypeHint::Builtin(name) => f.write_str(name),
        }
    }
}

/// Metadata of one constructor parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterMetadata {
    pub name: String,
    pub position: usize,
    pub type_hint: Option<TypeHint>,
    pub nullable: bool,
    /// Literal default value, `Some(Json::Null)` for a `null` default
    pub default: Option<Json>,
    pub variadic: bool,
}

impl ParameterMetadata {
    /// An untyped, required, non-nullable parameter
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            position: 0,
            type_hint: None,
            nullable: false,
            default: None,
            variadic: false,
        }
    }

    /// Type hint naming a class
    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.type_hint = Some(TypeHint::Class(class.into()));
        self
    }

    /// Type hint naming a builtin type
    pub fn builtin(mut self, name: impl Into<String>) -> Self {
        self.type_hint = Some(TypeHint::Builtin(name.into()));
        self
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub fn default(mut self, value: impl Into<Json>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn variadic(mut self) -> Self {
        self.variadic = true;
        self
    }

    pub fn at(mut self, position: usize) -> Self {
        self.position = position;
        self
    }

    /// Whether the constructor can be called without this argument
    #[inline]
    pub fn is_optional(&self) -> bool {
        self.default.is_some() || self.variadic
    }
}

impl fmt::Display for ParameterMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.type_hint {
            Some(hint) if self.nullable => write!(f, "{}: Option<{}>", self.name, hint),
            Some(hint) => write!(f, "{}: {}", self.name, hint),
            None => f.write_str(&self.name),
        }
    }
}

/// Calls a constructor with already resolved arguments
pub type Constructor = Arc<dyn Fn(Vec<Value>) -> Result<Value> + Send + Sync>;

/// Metadata of a class (or interface, when it has no constructor).
#[derive(Clone)]
pub struct ClassMetadata {
    name: String,
    parameters: Vec<ParameterMetadata>,
    interfaces: Vec<String>,
    constructor: Option<Constructor>,
}

impl ClassMetadata {
    /// An instantiable class
    pub fn new<F>(name: impl Into<String>, constructor: F) -> Self
    where
        F: Fn(Vec<Value>) -> Result<Value> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            parameters: Vec::new(),
            interfaces: Vec::new(),
            constructor: Some(Arc::new(constructor)),
        }
    }

    /// A type that cannot be instantiated
    pub fn interface(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parameters: Vec::new(),
            interfaces: Vec::new(),
            constructor: None,
        }
    }

    /// Append a constructor parameter, positioned after the previous ones
    pub fn parameter(mut self, parameter: ParameterMetadata) -> Self {
        let position = self.parameters.len();
        self.parameters.push(parameter.at(position));
        self
    }

    /// Declare a direct parent interface
    pub fn implements(mut self, interface: impl Into<String>) -> Self {
        self.interfaces.push(interface.into());
        self
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn parameters(&self) -> &[ParameterMetadata] {
        &self.parameters
    }

    #[inline]
    pub fn interfaces(&self) -> &[String] {
        &self.interfaces
    }

    #[inline]
    pub fn is_instantiable(&self) -> bool {
        self.constructor.is_some()
    }

    /// Call the constructor
    pub fn instantiate(&self, arguments: Vec<Value>) -> Result<Value> {
        match &self.constructor {
            Some(constructor) => constructor(arguments),
            None => Err(ContainerError::not_instantiable(
                &self.name,
                "it has no constructor",
            )),
        }
    }
}

impl fmt::Debug for ClassMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassMetadata")
            .field("name", &self.name)
            .field("parameters", &self.parameters)
            .field("interfaces", &self.interfaces)
            .field("instantiable", &self.is_instantiable())
            .finish()
    }
}

/// Looks up type metadata by name.
pub trait Reflection: Send + Sync {
    /// Metadata of the named type, `None` when unknown
    fn class(&self, name: &str) -> Option<Arc<ClassMetadata>>;

    /// Whether `class` implements `interface`, directly or through its parents.
    ///
    /// A type never implements itself.
    fn implements(&self, class: &str, interface: &str) -> bool {
        let mut pending: Vec<String> = match self.class(class) {
            Some(metadata) => metadata.interfaces().to_vec(),
            None => return false,
        };
        let mut visited = AHashSet::new();

        while let Some(parent) = pending.pop() {
            if parent == interface {
                return true;
            }
            if !visited.insert(parent.clone()) {
                continue;
            }
            if let Some(metadata) = self.class(&parent) {
                pending.extend(metadata.interfaces().iter().cloned());
            }
        }

        false
    }

    /// Instantiate the named type
    fn instantiate(&self, class: &str, arguments: Vec<Value>) -> Result<Value> {
        self.class(class)
            .ok_or_else(|| ContainerError::not_instantiable(class, "no such class is registered"))?
            .instantiate(arguments)
    }
}

/// In-memory [`Reflection`] implementation.
#[derive(Clone, Default)]
pub struct ClassRegistry {
    classes: HashMap<String, Arc<ClassMetadata>, RandomState>,
}

impl ClassRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a type, replacing any previous one with the same name
    pub fn insert(&mut self, metadata: ClassMetadata) {
        self.classes
            .insert(metadata.name().to_owned(), Arc::new(metadata));
    }

    /// Builder form of [`insert`](Self::insert)
    pub fn with(mut self, metadata: ClassMetadata) -> Self {
        self.insert(metadata);
        self
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

impl Reflection for ClassRegistry {
    #[inline]
    fn class(&self, name: &str) -> Option<Arc<ClassMetadata>> {
        self.classes.get(name).cloned()
    }
}

impl fmt::Debug for ClassRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&String> = self.classes.keys().collect();
        names.sort();
        f.debug_struct("ClassRegistry").field("classes", &names).finish()
    }
}
