use crate::{Container, ContainerError, Factory, Result, SharedFactory, Value};

/// Collects the values of several entries into a list.
///
/// When the tag extends a previous factory, the previous value must be a
/// list (or null, the empty list) and the tagged values are appended to it.
#[derive(Debug, Clone)]
pub struct Tag {
    id: String,
    previous: Option<SharedFactory>,
    ids: Vec<String>,
}

impl Tag {
    /// A tag `id` grouping `ids`
    pub fn new(id: impl Into<String>, ids: Vec<String>) -> Self {
        Self {
            id: id.into(),
            previous: None,
            ids,
        }
    }

    /// A tag appending `ids` to the value of `previous`
    pub fn extending(id: impl Into<String>, previous: SharedFactory, ids: Vec<String>) -> Self {
        Self {
            id: id.into(),
            previous: Some(previous),
            ids,
        }
    }

    /// Tagged identifiers added by this tag
    #[inline]
    pub fn ids(&self) -> &[String] {
        &self.ids
    }
}

impl Factory for Tag {
    fn resolve(&self, container: &dyn Container) -> Result<Value> {
        let mut values = match &self.previous {
            Some(previous) => {
                let value = previous.resolve(container)?;
                let kind = value.kind().to_owned();

                value.into_list().ok_or_else(|| {
                    ContainerError::failed(
                        &self.id,
                        format!("a tag can only extend a list, {kind} given"),
                    )
                })?
            }
            None => Vec::with_capacity(self.ids.len()),
        };

        for id in &self.ids {
            values.push(container.get(id)?);
        }

        Ok(Value::List(values))
    }

    fn compiled(&self, container: &str) -> Option<String> {
        let tagged: Vec<String> = self
            .ids
            .iter()
            .map(|id| format!("{container}.get({id:?})?"))
            .collect();
        let tagged = format!("vec![{}]", tagged.join(", "));

        match &self.previous {
            None => Some(format!("Value::List({tagged})")),
            Some(previous) => Some(format!(
                "{{\n    let previous = {};\n    let kind = previous.kind().to_owned();\n    \
                 let previous = previous.into_list().ok_or_else(|| {{\n        \
                 ContainerError::failed({id:?}, format!(\"a tag can only extend a list, {{kind}} given\"))\n    \
                 }})?;\n    Value::List([previous, {tagged}].concat())\n}}",
                previous.compiled(container)?,
                id = self.id,
            )),
        }
    }
}
