//! Runtime values produced by factories
//!
//! A container entry may be configuration data (numbers, strings, nested
//! arrays), a list collected by a tag, or an arbitrary service instance.
//! Service instances are stored type-erased as `Arc<dyn Any + Send + Sync>`
//! so they can be shared without cloning.

use serde_json::Value as Json;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Marker trait for types that can be stored as a service.
///
/// Automatically implemented for all `Send + Sync + 'static` types.
pub trait Injectable: Send + Sync + 'static {}

impl<T: Send + Sync + 'static> Injectable for T {}

/// A type-erased, shared service instance.
#[derive(Clone)]
pub struct Service {
    type_name: Arc<str>,
    instance: Arc<dyn Any + Send + Sync>,
}

impl Service {
    /// Wrap an instance, naming it after its Rust type
    #[inline]
    pub fn new<T: Injectable>(instance: T) -> Self {
        Self::named(std::any::type_name::<T>(), instance)
    }

    /// Wrap an instance under an explicit type name (usually a registered class name)
    #[inline]
    pub fn named<T: Injectable>(type_name: impl Into<Arc<str>>, instance: T) -> Self {
        Self {
            type_name: type_name.into(),
            instance: Arc::new(instance) as Arc<dyn Any + Send + Sync>,
        }
    }

    /// Wrap an already shared instance
    #[inline]
    pub fn from_arc<T: Injectable>(type_name: impl Into<Arc<str>>, instance: Arc<T>) -> Self {
        Self {
            type_name: type_name.into(),
            instance: instance as Arc<dyn Any + Send + Sync>,
        }
    }

    /// Name of the type this instance was registered as
    #[inline]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Get the concrete instance if it is a `T`
    #[inline]
    pub fn downcast<T: Injectable>(&self) -> Option<Arc<T>> {
        Arc::clone(&self.instance).downcast::<T>().ok()
    }

    /// Whether both handles point at the same instance
    #[inline]
    pub fn ptr_eq(&self, other: &Service) -> bool {
        Arc::ptr_eq(&self.instance, &other.instance)
    }
}

impl fmt::Debug for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Service")
            .field("type_name", &self.type_name)
            .finish_non_exhaustive()
    }
}

/// The value of a container entry.
#[derive(Clone, Debug, Default)]
pub enum Value {
    /// Absence of value
    #[default]
    Null,
    /// Configuration data
    Literal(Json),
    /// Values collected by a tag
    List(Vec<Value>),
    /// A service instance
    Service(Service),
}

impl Value {
    /// Wrap a service instance
    #[inline]
    pub fn service<T: Injectable>(instance: T) -> Self {
        Value::Service(Service::new(instance))
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    #[inline]
    pub fn as_literal(&self) -> Option<&Json> {
        match self {
            Value::Literal(json) => Some(json),
            _ => None,
        }
    }

    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        self.as_literal().and_then(Json::as_str)
    }

    #[inline]
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(values) => Some(values),
            _ => None,
        }
    }

    #[inline]
    pub fn as_service(&self) -> Option<&Service> {
        match self {
            Value::Service(service) => Some(service),
            _ => None,
        }
    }

    /// Get the service instance if this is a `T`
    #[inline]
    pub fn downcast<T: Injectable>(&self) -> Option<Arc<T>> {
        self.as_service().and_then(Service::downcast::<T>)
    }

    /// Interpret the value as a list of values.
    ///
    /// `Null` is the empty list and a literal JSON array contributes its items.
    /// Anything else is not a list.
    pub fn into_list(self) -> Option<Vec<Value>> {
        match self {
            Value::Null => Some(Vec::new()),
            Value::List(values) => Some(values),
            Value::Literal(Json::Array(items)) => Some(items.into_iter().map(Value::from).collect()),
            _ => None,
        }
    }

    /// Scalar literal rendered as text, used for string interpolation
    pub fn to_scalar_string(&self) -> Option<String> {
        match self.as_literal()? {
            Json::String(s) => Some(s.clone()),
            Json::Number(n) => Some(n.to_string()),
            Json::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// Name of the kind of value, used in error messages
    pub fn kind(&self) -> &str {
        match self {
            Value::Null => "null",
            Value::Literal(json) => json_type_name(json),
            Value::List(_) => "list",
            Value::Service(service) => service.type_name(),
        }
    }
}

/// Equality is structural for data and identity for services
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Literal(a), Value::Literal(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Service(a), Value::Service(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl From<Json> for Value {
    fn from(json: Json) -> Self {
        match json {
            Json::Null => Value::Null,
            other => Value::Literal(other),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Literal(Json::String(s.to_owned()))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Literal(Json::String(s))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Literal(Json::Bool(b))
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Literal(Json::from(n))
    }
}

impl From<Vec<Value>> for Value {
    fn from(values: Vec<Value>) -> Self {
        Value::List(values)
    }
}

/// JSON type names as they appear in schema errors
pub(crate) fn json_type_name(json: &Json) -> &'static str {
    match json {
        Json::Null => "null",
        Json::Bool(_) => "boolean",
        Json::Number(n) if n.is_f64() => "float",
        Json::Number(_) => "integer",
        Json::String(_) => "string",
        Json::Array(_) => "array",
        Json::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Mailer {
        dsn: String,
    }

    #[test]
    fn test_service_downcast() {
        let value = Value::service(Mailer {
            dsn: "smtp://localhost".into(),
        });

        let mailer = value.downcast::<Mailer>().unwrap();
        assert_eq!(mailer.dsn, "smtp://localhost");
        assert!(value.downcast::<String>().is_none());
    }

    #[test]
    fn test_service_from_arc_shares_instance() {
        let mailer = Arc::new(Mailer {
            dsn: "smtp://relay".into(),
        });
        let value = Value::Service(Service::from_arc("Mailer", Arc::clone(&mailer)));

        assert_eq!(value.kind(), "Mailer");
        assert!(Arc::ptr_eq(&value.downcast::<Mailer>().unwrap(), &mailer));
    }

    #[test]
    fn test_service_equality_is_identity() {
        let a = Value::service(1u32);
        let b = Value::service(1u32);

        assert_eq!(a, a.clone());
        assert_ne!(a, b);
    }

    #[test]
    fn test_json_null_becomes_null() {
        assert!(Value::from(Json::Null).is_null());
        assert_eq!(Value::from(json!("x")).as_str(), Some("x"));
    }

    #[test]
    fn test_into_list() {
        assert_eq!(Value::Null.into_list(), Some(vec![]));
        assert_eq!(
            Value::from(json!([1, null])).into_list(),
            Some(vec![Value::from(1i64), Value::Null])
        );
        assert_eq!(Value::from("x").into_list(), None);
    }

    #[test]
    fn test_json_type_names() {
        assert_eq!(json_type_name(&json!(1)), "integer");
        assert_eq!(json_type_name(&json!(1.5)), "float");
        assert_eq!(json_type_name(&json!({})), "object");
    }
}
