//! Error types for configuration loading and entry resolution

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while resolving a container entry.
///
/// Factories propagate these untouched; only [`Alias`](crate::Alias) in its
/// nullable form ever inspects one, and only to swallow
/// [`ContainerError::NotFound`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContainerError {
    /// No entry is associated with the identifier
    #[error("No container entry found for identifier '{id}'")]
    NotFound { id: String },

    /// The entry depends on itself
    #[error("Circular dependency detected while resolving '{id}'")]
    Circular { id: String },

    /// A class could not be instantiated
    #[error("Class {class} is not instantiable: {reason}")]
    NotInstantiable { class: String, reason: String },

    /// A factory failed to produce its value
    #[error("Failed to resolve container entry '{id}': {reason}")]
    ResolutionFailed { id: String, reason: String },
}

impl ContainerError {
    /// Create a NotFound error
    #[inline]
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }

    /// Create a ResolutionFailed error
    #[inline]
    pub fn failed(id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ResolutionFailed {
            id: id.into(),
            reason: reason.into(),
        }
    }

    /// Create a NotInstantiable error
    #[inline]
    pub fn not_instantiable(class: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::NotInstantiable {
            class: class.into(),
            reason: reason.into(),
        }
    }

    /// Whether this is the "entry absent" signal
    #[inline]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Result type alias for entry resolution
pub type Result<T> = std::result::Result<T, ContainerError>;

/// A configuration value that does not match the expected schema.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub struct SchemaViolation {
    /// Offending key path, e.g. `aliases` or `tags.listeners`
    pub key: String,
    /// Key of the offending element inside `key`, if any
    pub element: Option<String>,
    /// Human readable expected type
    pub expected: String,
    /// Human readable actual type
    pub actual: String,
}

impl fmt::Display for SchemaViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.element {
            Some(element) => write!(
                f,
                "The '{}' key of the configuration must contain only {} values, {} associated to key '{}'",
                self.key, self.expected, self.actual, element
            ),
            None => write!(
                f,
                "The '{}' key of the configuration must be {}, {} given",
                self.key, self.expected, self.actual
            ),
        }
    }
}

/// Errors raised while loading a configuration source.
///
/// Every variant names the source it comes from.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file does not exist
    #[error("No configuration file located at {}", .path.display())]
    Missing { path: PathBuf },

    /// The configuration file could not be read
    #[error("Unable to read configuration file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file extension is not a supported document format
    #[error("Unsupported configuration format for {} (expected .json or .toml)", .path.display())]
    UnsupportedFormat { path: PathBuf },

    /// The document is not well formed
    #[error("Malformed configuration document {}: {reason}", .path.display())]
    Syntax { path: PathBuf, reason: String },

    /// The document top-level value is not an object
    #[error("Configuration must be an object, {actual} given (see {})", .path.display())]
    NotAnObject { path: PathBuf, actual: String },

    /// The document does not match the configuration schema
    #[error("{violation} (see {})", .path.display())]
    Schema {
        path: PathBuf,
        violation: SchemaViolation,
    },
}

impl ConfigError {
    /// The source this error refers to
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::Missing { path }
            | Self::Io { path, .. }
            | Self::UnsupportedFormat { path }
            | Self::Syntax { path, .. }
            | Self::NotAnObject { path, .. }
            | Self::Schema { path, .. } => path,
        }
    }
}

/// One constructor parameter no argument could be bound to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnboundParameter {
    pub position: usize,
    pub name: String,
}

impl fmt::Display for UnboundParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "parameter #{} `{}`", self.position, self.name)
    }
}

/// Autowiring failed for at least one required constructor parameter.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error(
    "Unable to autowire {class}::new() because no argument is bound to {}",
    enumerate(.parameters)
)]
pub struct AutowireError {
    pub class: String,
    pub parameters: Vec<UnboundParameter>,
}

/// `a`, `a and b`, `a, b and c`
fn enumerate(parameters: &[UnboundParameter]) -> String {
    let names: Vec<String> = parameters.iter().map(ToString::to_string).collect();

    match names.split_last() {
        None => String::new(),
        Some((last, [])) => last.clone(),
        Some((last, rest)) => format!("{} and {}", rest.join(", "), last),
    }
}

/// Rendering a factory map as source text failed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    /// The factory has no source representation
    #[error("Factory of container entry '{id}' is not compilable")]
    NotCompilable { id: String },
}
