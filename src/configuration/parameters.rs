use super::{Configuration, ConfigurationEntry};
use crate::error::ConfigError;
use crate::{FactoryMap, Parameter, ValueFactory};
use serde_json::Value as Json;
use std::sync::Arc;

/// Configuration providing parameters only.
#[derive(Debug, Clone)]
pub struct ParameterArray {
    values: ValueFactory,
    parameters: Vec<(String, Json)>,
}

impl ParameterArray {
    pub fn new<I, S>(values: ValueFactory, parameters: I) -> Self
    where
        I: IntoIterator<Item = (S, Json)>,
        S: Into<String>,
    {
        Self {
            values,
            parameters: parameters
                .into_iter()
                .map(|(id, value)| (id.into(), value))
                .collect(),
        }
    }
}

impl Configuration for ParameterArray {
    fn entry(&self) -> Result<ConfigurationEntry, ConfigError> {
        let mut map = FactoryMap::with_capacity(self.parameters.len());

        for (id, raw) in &self.parameters {
            map.insert(id.as_str(), Arc::new(Parameter::new(self.values.parse(raw))));
        }

        Ok(ConfigurationEntry::from_map(map))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Container, FactoryContainer, Value};
    use serde_json::json;

    #[test]
    fn test_parameters_only() {
        let entry = ParameterArray::new(
            ValueFactory::default(),
            [("name", json!("app")), ("title", json!("%{name} admin"))],
        )
        .entry()
        .unwrap();

        assert!(entry.passes().is_empty());

        let container = FactoryContainer::new(entry.factories());
        assert_eq!(container.get("title").unwrap(), Value::from("app admin"));
    }

    #[test]
    fn test_literal_values() {
        let entry = ParameterArray::new(ValueFactory::literal(), [("title", json!("%{name}"))])
            .entry()
            .unwrap();

        let container = FactoryContainer::new(entry.factories());
        assert_eq!(container.get("title").unwrap(), Value::from("%{name}"));
    }
}
