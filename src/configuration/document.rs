//! Compilation of a configuration document into a [`ConfigurationEntry`]

use super::schema::{Sanitized, Schema};
use super::{Bindings, ConfigurationEntry};
use crate::error::ConfigError;
use crate::passes::{
    Entries, ExtensionPass, Implementations, MergedProcessingPass, TaggingPass,
};
use crate::value::json_type_name;
use crate::{Alias, FactoryMap, Invokable, Parameter, SharedFactory};
use serde_json::Value as Json;
use std::path::Path;
use std::sync::Arc;

#[cfg(feature = "logging")]
use tracing::debug;

/// Validate `document` and build its entry, naming `source` in errors
pub(crate) fn compile(
    bindings: &Bindings,
    source: &Path,
    document: &Json,
) -> Result<ConfigurationEntry, ConfigError> {
    let Some(document) = document.as_object() else {
        return Err(ConfigError::NotAnObject {
            path: source.to_path_buf(),
            actual: json_type_name(document).to_owned(),
        });
    };

    let sanitized = Schema::configuration(bindings)
        .validate(document)
        .map_err(|violation| ConfigError::Schema {
            path: source.to_path_buf(),
            violation,
        })?;

    let map = factories(bindings, &sanitized);
    let passes = passes(bindings, &sanitized);

    #[cfg(feature = "logging")]
    debug!(
        target: "container_config",
        source = %source.display(),
        entries = map.len(),
        passes = passes.len(),
        "Configuration entry built"
    );

    Ok(ConfigurationEntry::new(map, passes))
}

/// Parameters, aliases, invokables then factories; a later kind replaces an
/// earlier one defining the same identifier.
fn factories(bindings: &Bindings, sanitized: &Sanitized) -> FactoryMap {
    let mut map = FactoryMap::new();

    for (id, raw) in sanitized.entries("parameters") {
        map.insert(id.as_str(), Arc::new(Parameter::new(bindings.values().parse(raw))));
    }

    for (id, target) in strings(sanitized, "aliases") {
        map.insert(id, Arc::new(Alias::new(target)));
    }

    for (id, class) in strings(sanitized, "invokables") {
        map.insert(id, Arc::new(Invokable::new(class, Arc::clone(bindings.classes()))));
    }

    for (id, name) in strings(sanitized, "factories") {
        if let Some(factory) = bindings.factory(name) {
            let factory: SharedFactory = Arc::new(factory.clone());
            map.insert(id, factory);
        }
    }

    map
}

/// Passes in the order their keys appear in the document
fn passes(bindings: &Bindings, sanitized: &Sanitized) -> MergedProcessingPass {
    let mut passes = MergedProcessingPass::default();

    for key in sanitized.keys() {
        match key {
            "tags" => {
                for (id, members) in sanitized.entries(key) {
                    passes.push(Arc::new(TaggingPass::new(
                        id.as_str(),
                        Arc::new(Entries::new(members_of(members))),
                    )));
                }
            }
            "mappers" => {
                for (id, interface) in strings(sanitized, key) {
                    passes.push(Arc::new(TaggingPass::new(
                        id,
                        Arc::new(Implementations::new(interface, Arc::clone(bindings.classes()))),
                    )));
                }
            }
            "extensions" => {
                for (id, name) in strings(sanitized, key) {
                    if let Some(extension) = bindings.extension(name) {
                        passes.push(Arc::new(ExtensionPass::new(id, extension.clone())));
                    }
                }
            }
            "passes" => {
                for name in sanitized.items(key).filter_map(Json::as_str) {
                    if let Some(pass) = bindings.pass(name) {
                        passes.push(Arc::clone(pass));
                    }
                }
            }
            _ => {}
        }
    }

    passes
}

/// String-valued entries of an object key
fn strings<'a>(sanitized: &'a Sanitized, key: &str) -> impl Iterator<Item = (&'a str, &'a str)> {
    sanitized
        .entries(key)
        .filter_map(|(id, value)| Some((id.as_str(), value.as_str()?)))
}

/// Tagged ids: array items, or object keys when attributes are given
fn members_of(members: &Json) -> Vec<String> {
    match members {
        Json::Array(items) => items
            .iter()
            .filter_map(Json::as_str)
            .map(str::to_owned)
            .collect(),
        Json::Object(entries) => entries.keys().cloned().collect(),
        _ => Vec::new(),
    }
}
