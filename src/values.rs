//! Parameter value parsing
//!
//! Raw configuration values go through a [`ValueFactory`] before they become
//! [`Parameter`](crate::Parameter) factories. The factory asks each of its
//! [`ValueParser`]s in order; the first one recognizing the raw value decides
//! how it is produced at resolution time. Unrecognized values are literals.
//!
//! Built-in parsers:
//!
//! - [`EnvVarParser`]: `"%env(DATABASE_URL)%"` reads an environment variable
//! - [`InterpolationParser`]: `"https://%{host}:%{port}/"` substitutes
//!   scalar container entries

use crate::{Container, ContainerError, Result, Value};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value as Json;
use std::fmt;
use std::sync::Arc;

#[cfg(feature = "logging")]
use tracing::trace;

static ENV_VAR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^%env\(([A-Za-z_][A-Za-z0-9_]*)\)%$").expect("env var pattern is valid")
});

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"%\{([^}]+)\}").expect("placeholder pattern is valid"));

/// A parameter value, produced when the entry is resolved.
pub trait ParsedValue: Send + Sync + fmt::Debug {
    /// Produce the value
    fn value(&self, container: &dyn Container) -> Result<Value>;

    /// Source text of an expression producing the value
    fn compiled(&self, container: &str) -> String;
}

/// Recognizes raw configuration values it knows how to produce.
pub trait ValueParser: Send + Sync {
    /// `None` when the raw value is not for this parser
    fn parse(&self, raw: &Json) -> Option<Arc<dyn ParsedValue>>;
}

/// Any `Fn(&Json) -> Option<Arc<dyn ParsedValue>>` is a parser
impl<F> ValueParser for F
where
    F: Fn(&Json) -> Option<Arc<dyn ParsedValue>> + Send + Sync,
{
    fn parse(&self, raw: &Json) -> Option<Arc<dyn ParsedValue>> {
        self(raw)
    }
}

// =============================================================================
// Values
// =============================================================================

/// A value known at configuration time.
#[derive(Debug, Clone, PartialEq)]
pub struct Literal(pub Json);

impl ParsedValue for Literal {
    fn value(&self, _container: &dyn Container) -> Result<Value> {
        Ok(Value::from(self.0.clone()))
    }

    fn compiled(&self, _container: &str) -> String {
        match &self.0 {
            Json::Null => "Value::Null".to_string(),
            json => format!("Value::from(serde_json::json!({}))", json_source(json)),
        }
    }
}

/// Rust source of a `json!` body, strings written as Rust literals
fn json_source(json: &Json) -> String {
    match json {
        Json::String(s) => format!("{s:?}"),
        Json::Array(items) => {
            let items: Vec<String> = items.iter().map(json_source).collect();
            format!("[{}]", items.join(", "))
        }
        Json::Object(map) => {
            let fields: Vec<String> = map
                .iter()
                .map(|(key, value)| format!("{key:?}: {}", json_source(value)))
                .collect();
            format!("{{{}}}", fields.join(", "))
        }
        scalar => scalar.to_string(),
    }
}

/// The content of an environment variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvVar {
    name: String,
}

impl EnvVar {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl ParsedValue for EnvVar {
    fn value(&self, _container: &dyn Container) -> Result<Value> {
        std::env::var(&self.name)
            .map(Value::from)
            .map_err(|e| ContainerError::failed(&self.name, format!("environment variable {e}")))
    }

    fn compiled(&self, _container: &str) -> String {
        format!(
            "Value::from(std::env::var({:?}).map_err(|e| ContainerError::failed({:?}, e.to_string()))?)",
            self.name, self.name
        )
    }
}

/// A string with `%{id}` placeholders replaced by container entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interpolated {
    template: String,
}

impl Interpolated {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    /// Identifiers referenced by the template, in order of appearance
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        PLACEHOLDER
            .captures_iter(&self.template)
            .filter_map(|captures| captures.get(1).map(|m| m.as_str()))
    }
}

impl ParsedValue for Interpolated {
    fn value(&self, container: &dyn Container) -> Result<Value> {
        let mut output = String::with_capacity(self.template.len());
        let mut last = 0;

        for captures in PLACEHOLDER.captures_iter(&self.template) {
            let (Some(whole), Some(id)) = (captures.get(0), captures.get(1)) else {
                continue;
            };

            let value = container.get(id.as_str())?;
            let text = value.to_scalar_string().ok_or_else(|| {
                ContainerError::failed(
                    id.as_str(),
                    format!("a {} value cannot be interpolated in a string", value.kind()),
                )
            })?;

            output.push_str(&self.template[last..whole.start()]);
            output.push_str(&text);
            last = whole.end();
        }

        output.push_str(&self.template[last..]);

        Ok(Value::from(output))
    }

    fn compiled(&self, container: &str) -> String {
        let mut format = String::with_capacity(self.template.len());
        let mut arguments = Vec::new();
        let mut last = 0;

        for captures in PLACEHOLDER.captures_iter(&self.template) {
            let (Some(whole), Some(id)) = (captures.get(0), captures.get(1)) else {
                continue;
            };

            format.push_str(&escape_braces(&self.template[last..whole.start()]));
            format.push_str("{}");
            arguments.push(format!(
                "{{ let value = {container}.get({id:?})?; value.to_scalar_string().ok_or_else(|| \
                 ContainerError::failed({id:?}, format!(\"a {{}} value cannot be interpolated in a string\", value.kind())))? }}",
                id = id.as_str()
            ));
            last = whole.end();
        }

        format.push_str(&escape_braces(&self.template[last..]));

        format!("Value::from(format!({:?}, {}))", format, arguments.join(", "))
    }
}

fn escape_braces(text: &str) -> String {
    text.replace('{', "{{").replace('}', "}}")
}

// =============================================================================
// Parsers
// =============================================================================

/// Parses `"%env(NAME)%"` strings as [`EnvVar`] values
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvVarParser;

impl ValueParser for EnvVarParser {
    fn parse(&self, raw: &Json) -> Option<Arc<dyn ParsedValue>> {
        let captures = ENV_VAR.captures(raw.as_str()?)?;
        let name = captures.get(1)?.as_str();

        Some(Arc::new(EnvVar::new(name)))
    }
}

/// Parses strings containing `%{id}` placeholders as [`Interpolated`] values
#[derive(Debug, Clone, Copy, Default)]
pub struct InterpolationParser;

impl ValueParser for InterpolationParser {
    fn parse(&self, raw: &Json) -> Option<Arc<dyn ParsedValue>> {
        let template = raw.as_str()?;

        if PLACEHOLDER.is_match(template) {
            Some(Arc::new(Interpolated::new(template)))
        } else {
            None
        }
    }
}

/// Ordered chain of value parsers with a literal fallback.
#[derive(Clone)]
pub struct ValueFactory {
    parsers: Vec<Arc<dyn ValueParser>>,
}

impl ValueFactory {
    /// A factory treating every value as a literal
    pub fn literal() -> Self {
        Self {
            parsers: Vec::new(),
        }
    }

    /// Append a parser; earlier parsers take precedence
    pub fn with(mut self, parser: impl ValueParser + 'static) -> Self {
        self.parsers.push(Arc::new(parser));
        self
    }

    /// Parse a raw configuration value
    pub fn parse(&self, raw: &Json) -> Arc<dyn ParsedValue> {
        for parser in &self.parsers {
            if let Some(value) = parser.parse(raw) {
                #[cfg(feature = "logging")]
                trace!(
                    target: "container_config",
                    value = ?value,
                    "Parameter parsed"
                );
                return value;
            }
        }

        Arc::new(Literal(raw.clone()))
    }
}

impl Default for ValueFactory {
    /// Environment variables, then interpolation, then literals
    fn default() -> Self {
        Self::literal().with(EnvVarParser).with(InterpolationParser)
    }
}

impl fmt::Debug for ValueFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValueFactory")
            .field("parsers", &self.parsers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FactoryContainer, FactoryMap, Parameter};
    use serde_json::json;

    fn container(entries: &[(&str, Json)]) -> FactoryContainer {
        let mut map = FactoryMap::new();
        for (id, value) in entries {
            map.insert(*id, Arc::new(Parameter::literal(value.clone())));
        }
        FactoryContainer::new(map)
    }

    #[test]
    fn test_literal_fallback() {
        let factory = ValueFactory::default();
        let value = factory.parse(&json!({"pool": 4}));

        let container = container(&[]);
        assert_eq!(value.value(&container).unwrap(), Value::from(json!({"pool": 4})));
    }

    #[test]
    fn test_env_var() {
        // SAFETY: the variable name is unique to this test
        unsafe { std::env::set_var("CONTAINER_CONFIG_TEST_DSN", "smtp://localhost") };

        let value = ValueFactory::default().parse(&json!("%env(CONTAINER_CONFIG_TEST_DSN)%"));

        assert_eq!(
            value.value(&container(&[])).unwrap(),
            Value::from("smtp://localhost")
        );
    }

    #[test]
    fn test_missing_env_var_fails() {
        let value = EnvVar::new("CONTAINER_CONFIG_TEST_SURELY_MISSING");

        let error = value.value(&container(&[])).unwrap_err();
        assert!(!error.is_not_found());
    }

    #[test]
    fn test_interpolation() {
        let value = ValueFactory::default().parse(&json!("https://%{host}:%{port}/api"));
        let container = container(&[("host", json!("example.com")), ("port", json!(8443))]);

        assert_eq!(
            value.value(&container).unwrap(),
            Value::from("https://example.com:8443/api")
        );
    }

    #[test]
    fn test_interpolation_of_missing_entry_is_not_found() {
        let value = Interpolated::new("%{missing}");

        assert!(value.value(&container(&[])).unwrap_err().is_not_found());
    }

    #[test]
    fn test_interpolation_rejects_non_scalar() {
        let value = Interpolated::new("hosts: %{hosts}");
        let container = container(&[("hosts", json!(["a", "b"]))]);

        assert!(matches!(
            value.value(&container),
            Err(ContainerError::ResolutionFailed { .. })
        ));
    }

    #[test]
    fn test_literal_factory_ignores_placeholders() {
        let value = ValueFactory::literal().parse(&json!("%{host}"));

        assert_eq!(value.value(&container(&[])).unwrap(), Value::from("%{host}"));
    }

    #[test]
    fn test_closure_parser_takes_precedence() {
        let factory = ValueFactory::literal()
            .with(|raw: &Json| -> Option<Arc<dyn ParsedValue>> {
                (raw == &json!("parameter1")).then(|| Arc::new(Literal(json!("parsed1"))) as _)
            });

        let container = container(&[]);
        assert_eq!(
            factory.parse(&json!("parameter1")).value(&container).unwrap(),
            Value::from("parsed1")
        );
        assert_eq!(
            factory.parse(&json!("parameter2")).value(&container).unwrap(),
            Value::from("parameter2")
        );
    }

    #[test]
    fn test_compiled_forms() {
        assert_eq!(Literal(Json::Null).compiled("container"), "Value::Null");
        assert_eq!(
            Literal(json!("a")).compiled("container"),
            "Value::from(serde_json::json!(\"a\"))"
        );
        assert_eq!(
            Interpolated::new("%{host}:80").compiled("c"),
            "Value::from(format!(\"{}:80\", { let value = c.get(\"host\")?; value.to_scalar_string().ok_or_else(|| \
             ContainerError::failed(\"host\", format!(\"a {} value cannot be interpolated in a string\", value.kind())))? }))"
        );
    }

    #[test]
    fn test_compiled_literal_strings_are_rust_literals() {
        assert_eq!(
            Literal(json!("a\u{1f}\"b")).compiled("c"),
            "Value::from(serde_json::json!(\"a\\u{1f}\\\"b\"))"
        );
        assert_eq!(
            Literal(json!({"hosts": ["a\nb", 1], "tls": true})).compiled("c"),
            "Value::from(serde_json::json!({\"hosts\": [\"a\\nb\", 1], \"tls\": true}))"
        );
    }
}
