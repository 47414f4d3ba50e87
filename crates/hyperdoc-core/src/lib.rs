//! Shared building blocks for hyperdoc.
//!
//! - [`config`]: the [`Configuration`] value object passed to every component
//! - [`inflector`]: dash/camelcase/studlycaps/underscore conversion
//! - [`validators`]: JSON:API member-name and reserved-key checks
//! - [`types`]: the [`TypeRegistry`] of bidirectional value converters
//! - [`error`]: [`ValidationError`] and [`TypeError`]

pub mod config;
pub mod error;
pub mod inflector;
pub mod types;
pub mod validators;

pub use config::{ConfigError, Configuration, NamespaceDelimiter, StringFormat};
pub use error::{TypeError, TypeResult, ValidationError, ValidationResult};
pub use types::{DataType, TypeConverter, TypeRegistry};
