use crate::values::{Literal, ParsedValue};
use crate::{Container, Factory, Result, Value};
use serde_json::Value as Json;
use std::sync::Arc;

/// Produces a parsed configuration value.
#[derive(Debug, Clone)]
pub struct Parameter {
    value: Arc<dyn ParsedValue>,
}

impl Parameter {
    pub fn new(value: Arc<dyn ParsedValue>) -> Self {
        Self { value }
    }

    /// A parameter producing `value` as is
    pub fn literal(value: impl Into<Json>) -> Self {
        Self::new(Arc::new(Literal(value.into())))
    }

    /// A parameter producing null
    pub fn null() -> Self {
        Self::literal(Json::Null)
    }
}

impl Factory for Parameter {
    #[inline]
    fn resolve(&self, container: &dyn Container) -> Result<Value> {
        self.value.value(container)
    }

    fn compiled(&self, container: &str) -> Option<String> {
        Some(self.value.compiled(container))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FactoryContainer, FactoryMap};
    use serde_json::json;

    #[test]
    fn test_literal() {
        let container = FactoryContainer::new(FactoryMap::new());

        assert_eq!(
            Parameter::literal(json!([1, 2])).resolve(&container).unwrap(),
            Value::from(json!([1, 2]))
        );
        assert_eq!(Parameter::null().resolve(&container).unwrap(), Value::Null);
    }

    #[test]
    fn test_compiled() {
        assert_eq!(Parameter::null().compiled("c").unwrap(), "Value::Null");
    }
}
