//! Shape validation of configuration documents
//!
//! A [`Schema`] associates top-level keys with a [`Rule`]. Validation either
//! returns the document [`Sanitized`] (known keys only, missing keys set to
//! an empty object or array) or the first [`SchemaViolation`] found.

use super::Bindings;
use crate::error::SchemaViolation;
use crate::value::json_type_name;
use ahash::AHashSet;
use serde_json::{Map, Value as Json};
use std::sync::Arc;

/// Expected shape of a configuration value.
#[derive(Debug, Clone)]
pub enum Rule {
    /// Anything
    Any,
    /// A string
    String,
    /// A string among known names
    Named {
        expected: String,
        names: Arc<AHashSet<String>>,
    },
    /// An object whose values all match the inner rule
    Object(Box<Rule>),
    /// An array whose items all match the inner rule
    Array(Box<Rule>),
    /// The first alternative whose shape matches
    OneOf(Vec<Rule>),
}

impl Rule {
    pub fn object(values: Rule) -> Self {
        Rule::Object(Box::new(values))
    }

    pub fn array(items: Rule) -> Self {
        Rule::Array(Box::new(items))
    }

    /// A string naming one of `names`, described as `expected` in errors
    pub fn named<I, S>(expected: impl Into<String>, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Rule::Named {
            expected: expected.into(),
            names: Arc::new(names.into_iter().map(Into::into).collect()),
        }
    }

    /// Human readable name of the expected value
    pub fn expected(&self) -> String {
        match self {
            Rule::Any => "any".into(),
            Rule::String => "string".into(),
            Rule::Named { expected, .. } => expected.clone(),
            Rule::Object(_) => "object".into(),
            Rule::Array(_) => "array".into(),
            Rule::OneOf(rules) => rules
                .iter()
                .map(Rule::expected)
                .collect::<Vec<_>>()
                .join(" or "),
        }
    }

    /// Whether the value itself matches, without looking into its children
    fn accepts(&self, value: &Json) -> bool {
        match (self, value) {
            (Rule::Any, _) => true,
            (Rule::String, Json::String(_)) => true,
            (Rule::Named { names, .. }, Json::String(name)) => names.contains(name),
            (Rule::Object(_), Json::Object(_)) => true,
            (Rule::Array(_), Json::Array(_)) => true,
            (Rule::OneOf(rules), value) => rules.iter().any(|rule| rule.accepts(value)),
            _ => false,
        }
    }

    /// Description of a value this rule rejects
    fn actual(&self, value: &Json) -> String {
        match (self, value) {
            (Rule::Named { .. }, Json::String(name)) => format!("unbound name '{name}'"),
            _ => json_type_name(value).to_owned(),
        }
    }

    /// Validate the children of an accepted value found at `path`
    fn validate(&self, path: &str, value: &Json) -> Result<(), SchemaViolation> {
        match (self, value) {
            (Rule::Object(inner), Json::Object(entries)) => {
                for (key, child) in entries {
                    inner.validate_child(path, key, child)?;
                }
                Ok(())
            }
            (Rule::Array(inner), Json::Array(items)) => {
                for (index, child) in items.iter().enumerate() {
                    inner.validate_child(path, &index.to_string(), child)?;
                }
                Ok(())
            }
            (Rule::OneOf(rules), value) => match rules.iter().find(|rule| rule.accepts(value)) {
                Some(rule) => rule.validate(path, value),
                None => Ok(()),
            },
            _ => Ok(()),
        }
    }

    fn validate_child(&self, path: &str, key: &str, child: &Json) -> Result<(), SchemaViolation> {
        if !self.accepts(child) {
            return Err(SchemaViolation {
                key: path.to_owned(),
                element: Some(key.to_owned()),
                expected: self.expected(),
                actual: self.actual(child),
            });
        }

        self.validate(&format!("{path}.{key}"), child)
    }

    /// Value substituted for a missing key
    fn default_value(&self) -> Json {
        match self {
            Rule::Array(_) => Json::Array(Vec::new()),
            Rule::OneOf(rules) => rules.first().map(Rule::default_value).unwrap_or(Json::Null),
            Rule::Object(_) => Json::Object(Map::new()),
            _ => Json::Null,
        }
    }
}

/// Expected shape of a configuration document.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    rules: Vec<(String, Rule)>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Expect `key` to match `rule`
    pub fn rule(mut self, key: impl Into<String>, rule: Rule) -> Self {
        self.rules.push((key.into(), rule));
        self
    }

    /// The schema of configuration documents, with names checked against
    /// `bindings`
    pub fn configuration(bindings: &Bindings) -> Self {
        let member_ids = Rule::OneOf(vec![
            Rule::array(Rule::String),
            Rule::object(Rule::array(Rule::Any)),
        ]);

        Schema::new()
            .rule("parameters", Rule::object(Rule::Any))
            .rule("aliases", Rule::object(Rule::String))
            .rule("invokables", Rule::object(Rule::String))
            .rule(
                "factories",
                Rule::object(Rule::named("bound factory name", bindings.factory_names())),
            )
            .rule(
                "extensions",
                Rule::object(Rule::named("bound extension name", bindings.extension_names())),
            )
            .rule("tags", Rule::object(member_ids))
            .rule("mappers", Rule::object(Rule::String))
            .rule(
                "passes",
                Rule::array(Rule::named("bound pass name", bindings.pass_names())),
            )
    }

    fn get(&self, key: &str) -> Option<&Rule> {
        self.rules
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, rule)| rule)
    }

    /// Validate a document, keeping only the keys this schema knows.
    ///
    /// Known keys keep their document order; missing ones follow, in schema
    /// order, with their default value.
    pub fn validate(&self, document: &Map<String, Json>) -> Result<Sanitized, SchemaViolation> {
        let mut sanitized = Map::new();

        for (key, value) in document {
            let Some(rule) = self.get(key) else {
                continue;
            };

            if !rule.accepts(value) {
                return Err(SchemaViolation {
                    key: key.clone(),
                    element: None,
                    expected: rule.expected(),
                    actual: rule.actual(value),
                });
            }

            rule.validate(key, value)?;
            sanitized.insert(key.clone(), value.clone());
        }

        for (key, rule) in &self.rules {
            if !sanitized.contains_key(key) {
                sanitized.insert(key.clone(), rule.default_value());
            }
        }

        Ok(Sanitized { values: sanitized })
    }
}

/// A document that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct Sanitized {
    values: Map<String, Json>,
}

impl Sanitized {
    /// Value of a schema key
    pub fn get(&self, key: &str) -> Option<&Json> {
        self.values.get(key)
    }

    /// Entries of an object-valued key, empty when absent
    pub fn entries(&self, key: &str) -> impl Iterator<Item = (&String, &Json)> {
        self.values
            .get(key)
            .and_then(Json::as_object)
            .into_iter()
            .flatten()
    }

    /// Items of an array-valued key, empty when absent
    pub fn items(&self, key: &str) -> impl Iterator<Item = &Json> {
        self.values
            .get(key)
            .and_then(Json::as_array)
            .into_iter()
            .flatten()
    }

    /// Keys in document order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ExtensionFn, FnFactory, Value};
    use crate::passes::FnPass;
    use serde_json::json;

    fn schema() -> Schema {
        let bindings = Bindings::new()
            .with_factory(FnFactory::new("make_logger", |_| Ok(Value::Null)))
            .with_extension(ExtensionFn::new("add_handlers", |_, v| Ok(v)))
            .with_pass("sort", FnPass::new("sort", |map| map));

        Schema::configuration(&bindings)
    }

    fn validate(document: Json) -> Result<Sanitized, SchemaViolation> {
        let document = document.as_object().cloned().unwrap_or_default();
        schema().validate(&document)
    }

    fn violation(key: &str, element: Option<&str>, expected: &str, actual: &str) -> SchemaViolation {
        SchemaViolation {
            key: key.into(),
            element: element.map(Into::into),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    #[test]
    fn test_defaults_for_missing_keys() {
        let sanitized = validate(json!({})).unwrap();

        assert_eq!(sanitized.get("aliases"), Some(&json!({})));
        assert_eq!(sanitized.get("passes"), Some(&json!([])));
        assert_eq!(sanitized.keys().count(), 8);
    }

    #[test]
    fn test_unknown_keys_are_dropped() {
        let sanitized = validate(json!({ "services": 1, "aliases": { "a": "b" } })).unwrap();

        assert!(sanitized.get("services").is_none());
        assert_eq!(sanitized.entries("aliases").count(), 1);
    }

    #[test]
    fn test_document_order_is_kept() {
        let sanitized = validate(json!({
            "passes": ["sort"],
            "extensions": {},
            "tags": {},
        }))
        .unwrap();

        let keys: Vec<&str> = sanitized.keys().take(3).collect();
        assert_eq!(keys, ["passes", "extensions", "tags"]);
    }

    #[test]
    fn test_valid_document() {
        let document = json!({
            "parameters": { "port": 8080, "hosts": ["a", "b"], "nested": { "x": null } },
            "aliases": { "log": "logger.default" },
            "invokables": { "clock": "SystemClock" },
            "factories": { "logger.default": "make_logger" },
            "extensions": { "logger.default": "add_handlers" },
            "tags": {
                "handlers": ["handler.file"],
                "listeners": { "on.save": ["priority", 10] }
            },
            "mappers": { "listeners": "Listener" },
            "passes": ["sort"]
        });

        assert!(validate(document).is_ok());
    }

    #[test]
    fn test_wrong_top_level_type() {
        assert_eq!(
            validate(json!({ "aliases": ["log"] })).unwrap_err(),
            violation("aliases", None, "object", "array")
        );
        assert_eq!(
            validate(json!({ "passes": {} })).unwrap_err(),
            violation("passes", None, "array", "object")
        );
        assert_eq!(
            validate(json!({ "tags": "x" })).unwrap_err(),
            violation("tags", None, "object", "string")
        );
    }

    #[test]
    fn test_non_string_alias() {
        assert_eq!(
            validate(json!({ "aliases": { "log": 1 } })).unwrap_err(),
            violation("aliases", Some("log"), "string", "integer")
        );
    }

    #[test]
    fn test_non_string_mapper() {
        assert_eq!(
            validate(json!({ "mappers": { "listeners": null } })).unwrap_err(),
            violation("mappers", Some("listeners"), "string", "null")
        );
    }

    #[test]
    fn test_unbound_factory() {
        assert_eq!(
            validate(json!({ "factories": { "logger": "make_mailer" } })).unwrap_err(),
            violation("factories", Some("logger"), "bound factory name", "unbound name 'make_mailer'")
        );
        assert_eq!(
            validate(json!({ "factories": { "logger": true } })).unwrap_err(),
            violation("factories", Some("logger"), "bound factory name", "boolean")
        );
    }

    #[test]
    fn test_unbound_extension() {
        assert_eq!(
            validate(json!({ "extensions": { "logger": "make_logger" } })).unwrap_err(),
            violation(
                "extensions",
                Some("logger"),
                "bound extension name",
                "unbound name 'make_logger'"
            )
        );
    }

    #[test]
    fn test_unbound_pass() {
        assert_eq!(
            validate(json!({ "passes": ["sort", "shuffle"] })).unwrap_err(),
            violation("passes", Some("1"), "bound pass name", "unbound name 'shuffle'")
        );
    }

    #[test]
    fn test_tag_not_array() {
        assert_eq!(
            validate(json!({ "tags": { "handlers": "handler.file" } })).unwrap_err(),
            violation("tags", Some("handlers"), "array or object", "string")
        );
    }

    #[test]
    fn test_tag_not_array_of_strings() {
        assert_eq!(
            validate(json!({ "tags": { "handlers": ["a", 2] } })).unwrap_err(),
            violation("tags.handlers", Some("1"), "string", "integer")
        );
    }

    #[test]
    fn test_tag_attributes_not_array() {
        assert_eq!(
            validate(json!({ "tags": { "handlers": { "a": "x" } } })).unwrap_err(),
            violation("tags.handlers", Some("a"), "array", "string")
        );
    }

    #[test]
    fn test_violation_message() {
        let error = validate(json!({ "aliases": { "log": 1 } })).unwrap_err();

        assert_eq!(
            error.to_string(),
            "The 'aliases' key of the configuration must contain only string values, integer associated to key 'log'"
        );
    }
}
