//! Constructor parameter binding
//!
//! Decides how one constructor parameter gets its argument when a class is
//! autowired. [`DefaultParameterParser`] evaluates, top to bottom:
//!
//! | Parameter                 | Result |
//! |---------------------------|--------|
//! | variadic                  | failure |
//! | type hint names a class   | alias to the class id, nullable when the parameter is |
//! | has a default value       | the default as a literal |
//! | nullable                  | literal null |
//! | anything else             | failure |

use crate::{Alias, Parameter, ParameterMetadata, SharedFactory, TypeHint};
use std::fmt;
use std::sync::Arc;

#[cfg(feature = "logging")]
use tracing::trace;

/// Outcome of parsing one parameter
#[derive(Clone)]
pub enum ParsingResult {
    /// The argument is produced by this factory
    Parsed(SharedFactory),
    /// No argument can be bound to the parameter
    Failure,
}

impl ParsingResult {
    #[inline]
    pub fn is_parsed(&self) -> bool {
        matches!(self, ParsingResult::Parsed(_))
    }

    /// The bound factory, if any
    #[inline]
    pub fn factory(self) -> Option<SharedFactory> {
        match self {
            ParsingResult::Parsed(factory) => Some(factory),
            ParsingResult::Failure => None,
        }
    }
}

impl fmt::Debug for ParsingResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParsingResult::Parsed(factory) => f.debug_tuple("Parsed").field(factory).finish(),
            ParsingResult::Failure => f.write_str("Failure"),
        }
    }
}

/// Binding policy for constructor parameters.
pub trait ParameterParser: Send + Sync {
    fn parse(&self, parameter: &ParameterMetadata) -> ParsingResult;
}

/// The default binding policy (see the [module documentation](self)).
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultParameterParser;

impl ParameterParser for DefaultParameterParser {
    fn parse(&self, parameter: &ParameterMetadata) -> ParsingResult {
        let result = if parameter.variadic {
            ParsingResult::Failure
        } else if let Some(TypeHint::Class(class)) = &parameter.type_hint {
            ParsingResult::Parsed(Arc::new(Alias::with_nullable(class.as_str(), parameter.nullable)))
        } else if let Some(default) = &parameter.default {
            ParsingResult::Parsed(Arc::new(Parameter::literal(default.clone())))
        } else if parameter.nullable {
            ParsingResult::Parsed(Arc::new(Parameter::null()))
        } else {
            ParsingResult::Failure
        };

        #[cfg(feature = "logging")]
        trace!(
            target: "container_config",
            parameter = %parameter,
            parsed = result.is_parsed(),
            "Parsed constructor parameter"
        );

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parsed(parameter: ParameterMetadata) -> String {
        match DefaultParameterParser.parse(&parameter) {
            ParsingResult::Parsed(factory) => format!("{factory:?}"),
            ParsingResult::Failure => "Failure".into(),
        }
    }

    fn alias(id: &str, nullable: bool) -> String {
        format!("{:?}", Alias::with_nullable(id, nullable))
    }

    fn literal(value: serde_json::Value) -> String {
        format!("{:?}", Parameter::literal(value))
    }

    #[test]
    fn test_variadic_always_fails() {
        assert_eq!(parsed(ParameterMetadata::new("xs").variadic()), "Failure");
        assert_eq!(parsed(ParameterMetadata::new("xs").class("Handler").variadic()), "Failure");
        assert_eq!(
            parsed(ParameterMetadata::new("xs").nullable().default(1).variadic()),
            "Failure"
        );
    }

    #[test]
    fn test_class_hint_binds_alias() {
        assert_eq!(parsed(ParameterMetadata::new("logger").class("Logger")), alias("Logger", false));
    }

    #[test]
    fn test_nullable_class_hint_binds_nullable_alias() {
        assert_eq!(
            parsed(ParameterMetadata::new("logger").class("Logger").nullable()),
            alias("Logger", true)
        );
    }

    #[test]
    fn test_class_hint_wins_over_default() {
        assert_eq!(
            parsed(ParameterMetadata::new("logger").class("Logger").nullable().default(json!(null))),
            alias("Logger", true)
        );
    }

    #[test]
    fn test_default_binds_literal() {
        assert_eq!(
            parsed(ParameterMetadata::new("port").builtin("u16").default(25)),
            literal(json!(25))
        );
        assert_eq!(parsed(ParameterMetadata::new("port").default(25)), literal(json!(25)));
    }

    #[test]
    fn test_default_wins_over_nullable() {
        assert_eq!(
            parsed(ParameterMetadata::new("host").builtin("String").nullable().default("localhost")),
            literal(json!("localhost"))
        );
    }

    #[test]
    fn test_nullable_binds_null() {
        assert_eq!(
            parsed(ParameterMetadata::new("host").builtin("String").nullable()),
            format!("{:?}", Parameter::null())
        );
        assert_eq!(
            parsed(ParameterMetadata::new("host").nullable()),
            format!("{:?}", Parameter::null())
        );
    }

    #[test]
    fn test_unbindable_fails() {
        assert_eq!(parsed(ParameterMetadata::new("host").builtin("String")), "Failure");
        assert_eq!(parsed(ParameterMetadata::new("host")), "Failure");
    }

    #[test]
    fn test_result_accessors() {
        let result = DefaultParameterParser.parse(&ParameterMetadata::new("x").default(1));
        assert!(result.is_parsed());
        assert!(result.factory().is_some());
        assert!(ParsingResult::Failure.factory().is_none());
    }
}
