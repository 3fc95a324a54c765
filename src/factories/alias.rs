use crate::{Container, Factory, Result, Value};

/// Forwards to another container entry.
///
/// A nullable alias resolves to [`Value::Null`] when the target entry does
/// not exist. Only the "not found" failure is swallowed; any other failure of
/// the container is returned unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alias {
    id: String,
    nullable: bool,
}

impl Alias {
    /// Alias failing when the target is absent
    pub fn new(id: impl Into<String>) -> Self {
        Self::with_nullable(id, false)
    }

    /// Alias resolving to null when the target is absent
    pub fn nullable(id: impl Into<String>) -> Self {
        Self::with_nullable(id, true)
    }

    pub fn with_nullable(id: impl Into<String>, nullable: bool) -> Self {
        Self {
            id: id.into(),
            nullable,
        }
    }

    #[inline]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[inline]
    pub fn is_nullable(&self) -> bool {
        self.nullable
    }
}

impl Factory for Alias {
    fn resolve(&self, container: &dyn Container) -> Result<Value> {
        if !self.nullable {
            return container.get(&self.id);
        }

        if !container.has(&self.id) {
            return Ok(Value::Null);
        }

        match container.get(&self.id) {
            Err(e) if e.is_not_found() => Ok(Value::Null),
            other => other,
        }
    }

    fn compiled(&self, container: &str) -> Option<String> {
        if !self.nullable {
            return Some(format!("{container}.get({:?})?", self.id));
        }

        Some(format!(
            "match {container}.get({id:?}) {{\n    Err(e) if e.is_not_found() => Value::Null,\n    other => other?,\n}}",
            id = self.id
        ))
    }
}
