//! Configuration sources
//!
//! A configuration source produces a [`ConfigurationEntry`]: the factories it
//! defines and the processing passes to run once every source is merged.
//!
//! Documents (JSON or TOML) accept the following keys, all optional:
//!
//! | Key          | Value |
//! |--------------|-------|
//! | `parameters` | id → any value, parsed by the [`ValueFactory`](crate::ValueFactory) |
//! | `aliases`    | id → id of another entry |
//! | `invokables` | id → class instantiated without arguments |
//! | `factories`  | id → name of a bound factory |
//! | `extensions` | id → name of a bound extension |
//! | `tags`       | id → array of ids, or object of id → attributes array |
//! | `mappers`    | id → interface whose implementations are tagged |
//! | `passes`     | array of names of bound passes |
//!
//! Passes declared through `tags`, `mappers`, `extensions` and `passes` run in
//! the order those keys appear in the document.

mod bindings;
mod document;
mod entry;
mod file;
mod merged;
mod parameters;
pub mod schema;

pub use bindings::Bindings;
pub use entry::ConfigurationEntry;
pub use file::{ArrayConfiguration, FileConfiguration};
pub use merged::MergedConfiguration;
pub use parameters::ParameterArray;

use crate::error::ConfigError;

/// A source of container configuration.
pub trait Configuration {
    fn entry(&self) -> Result<ConfigurationEntry, ConfigError>;
}

impl<C: Configuration + ?Sized> Configuration for Box<C> {
    fn entry(&self) -> Result<ConfigurationEntry, ConfigError> {
        (**self).entry()
    }
}
