//! Factory wrappers
//!
//! Each configuration concept compiles to one of these:
//!
//! | Configuration | Factory |
//! |---------------|---------|
//! | `parameters`  | [`Parameter`] |
//! | `aliases`     | [`Alias`] |
//! | `invokables`  | [`Invokable`] |
//! | `factories`   | [`FnFactory`] |
//! | `extensions`  | [`Extension`] (through an extension pass) |
//! | `tags`, `mappers` | [`Tag`] (through a tagging pass) |
//!
//! Autowiring produces [`Instance`] factories.

mod alias;
mod extension;
mod function;
mod instance;
mod invokable;
mod parameter;
mod tag;

pub use alias::Alias;
pub use extension::{Extension, ExtensionFn};
pub use function::FnFactory;
pub use instance::Instance;
pub(crate) use instance::indent;
pub use invokable::Invokable;
pub use parameter::Parameter;
pub use tag::Tag;
