//! # container-config - Declarative Container Configuration
//!
//! Compiles configuration documents (parameters, aliases, invokable classes,
//! factories, extensions, tags, mappers and processing passes) into a map of
//! factories a container resolves entries from.
//!
//! ## Features
//!
//! - 📄 **Data documents** - JSON or TOML, validated against a schema with errors naming the file and key
//! - 🏭 **Factory wrappers** - parameters, aliases, invokables, named factories, extensions, tags
//! - 🔌 **Autowiring** - constructor arguments bound from type metadata
//! - 🧩 **Processing passes** - tagging and extension passes applied after all sources merge
//! - 🔀 **Deterministic merging** - later sources override earlier ones
//! - 📊 **Observable** - Optional tracing integration with JSON or pretty output
//!
//! ## Quick Start
//!
//! ```rust
//! use container_config::{
//!     ArrayConfiguration, Bindings, Configuration, Container, FactoryContainer, FnFactory, Value,
//! };
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! let bindings = Arc::new(
//!     Bindings::new().with_factory(FnFactory::new("make_logger", |container| {
//!         let level = container.get("log.level")?;
//!         Ok(Value::from(format!("logger at {}", level.as_str().unwrap_or("info"))))
//!     })),
//! );
//!
//! let configuration = ArrayConfiguration::new(
//!     bindings,
//!     "services.json",
//!     json!({
//!         "parameters": { "log.level": "debug" },
//!         "aliases": { "log": "logger.default" },
//!         "factories": { "logger.default": "make_logger" }
//!     }),
//! );
//!
//! let container = FactoryContainer::new(configuration.entry().unwrap().factories());
//! assert_eq!(container.get("log").unwrap().as_str(), Some("logger at debug"));
//! ```
//!
//! ## Merging Sources
//!
//! ```rust
//! use container_config::{
//!     ArrayConfiguration, Bindings, Configuration, Container, FactoryContainer,
//!     MergedConfiguration, Value,
//! };
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! let bindings = Arc::new(Bindings::new());
//!
//! let merged = MergedConfiguration::default()
//!     .with(ArrayConfiguration::new(bindings.clone(), "base.json", json!({
//!         "parameters": { "env": "prod" },
//!         "tags": { "handlers": ["handler.stderr"] }
//!     })))
//!     .with(ArrayConfiguration::new(bindings, "local.json", json!({
//!         "parameters": { "env": "dev", "handler.stderr": "stderr" }
//!     })));
//!
//! let container = FactoryContainer::new(merged.entry().unwrap().factories());
//!
//! // Later sources win
//! assert_eq!(container.get("env").unwrap(), Value::from("dev"));
//! // Passes run after merging, so tags may refer to entries of any source
//! assert_eq!(container.get("handlers").unwrap(), Value::List(vec![Value::from("stderr")]));
//! ```

mod autowiring;
mod compiler;
pub mod configuration;
mod container;
mod error;
pub mod factories;
mod factory;
#[cfg(feature = "logging")]
pub mod logging;
mod parsing;
pub mod passes;
mod reflection;
mod storage;
mod value;
pub mod values;

pub use autowiring::*;
pub use compiler::*;
pub use configuration::{
    ArrayConfiguration, Bindings, Configuration, ConfigurationEntry, FileConfiguration,
    MergedConfiguration, ParameterArray,
};
pub use container::*;
pub use error::*;
pub use factories::*;
pub use factory::*;
pub use parsing::*;
pub use passes::{MergedProcessingPass, ProcessingPass};
pub use reflection::*;
pub use value::*;
pub use values::ValueFactory;

// Re-export tracing macros for convenience when logging feature is enabled
#[cfg(feature = "logging")]
pub use tracing::{debug, error, info, trace, warn};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        Bindings, ClassMetadata, ClassRegistry, Configuration, Container, ContainerError,
        ExtensionFn, Factory, FactoryContainer, FactoryMap, FileConfiguration, FnFactory,
        MergedConfiguration, ParameterMetadata, Result, Value,
    };
    pub use std::sync::Arc;
}
