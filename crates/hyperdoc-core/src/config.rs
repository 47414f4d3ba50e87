//! Serializer configuration.
//!
//! [`Configuration`] is a plain value object handed to every component that
//! needs to format names or build links. It can be built fluently or loaded
//! from TOML/JSON; either way the delimiter/format pairing is validated before
//! the value is used.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ValidationError, ValidationResult};

/// Default chrono format used by the `date` converter (RFC 3339).
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%:z";

/// Errors raised while loading a configuration from text or disk.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),

	#[error("TOML error: {0}")]
	Toml(#[from] toml::de::Error),

	#[error("JSON error: {0}")]
	Json(#[from] serde_json::Error),

	#[error("Invalid configuration: {0}")]
	Validation(#[from] ValidationError),
}

/// Case format applied to entity type names and field keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StringFormat {
	/// `blog-post`
	Dash,
	/// `blogPost`
	#[serde(rename = "camelcase")]
	CamelCase,
	/// `BlogPost`
	#[serde(rename = "studlycaps")]
	StudlyCaps,
	/// `blog_post`
	Underscore,
}

impl StringFormat {
	/// Returns the configuration name of the format.
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Dash => "dash",
			Self::CamelCase => "camelcase",
			Self::StudlyCaps => "studlycaps",
			Self::Underscore => "underscore",
		}
	}
}

impl fmt::Display for StringFormat {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for StringFormat {
	type Err = ValidationError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"dash" => Ok(Self::Dash),
			"camelcase" => Ok(Self::CamelCase),
			"studlycaps" => Ok(Self::StudlyCaps),
			"underscore" => Ok(Self::Underscore),
			other => Err(ValidationError::InvalidStringFormat(other.to_string())),
		}
	}
}

/// Delimiter placed between namespace segments of an external type name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum NamespaceDelimiter {
	/// `_`
	Underscore,
	/// `-`
	Dash,
	/// `__`
	DoubleUnderscore,
	/// `--`
	DoubleDash,
}

impl NamespaceDelimiter {
	/// Returns the literal delimiter.
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Underscore => "_",
			Self::Dash => "-",
			Self::DoubleUnderscore => "__",
			Self::DoubleDash => "--",
		}
	}
}

impl fmt::Display for NamespaceDelimiter {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for NamespaceDelimiter {
	type Err = ValidationError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"_" => Ok(Self::Underscore),
			"-" => Ok(Self::Dash),
			"__" => Ok(Self::DoubleUnderscore),
			"--" => Ok(Self::DoubleDash),
			other => Err(ValidationError::InvalidNamespaceDelimiter(other.to_string())),
		}
	}
}

impl TryFrom<String> for NamespaceDelimiter {
	type Error = ValidationError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		value.parse()
	}
}

impl From<NamespaceDelimiter> for String {
	fn from(value: NamespaceDelimiter) -> Self {
		value.as_str().to_string()
	}
}

/// Checks that a name format does not collide with the namespace delimiter.
///
/// An underscored name joined with `_` (or a dashed name joined with `-`)
/// could not be split back into its namespace segments.
pub fn validate_name_format(
	format: StringFormat,
	delimiter: NamespaceDelimiter,
) -> ValidationResult<()> {
	let conflict = matches!(
		(format, delimiter),
		(StringFormat::Underscore, NamespaceDelimiter::Underscore)
			| (StringFormat::Dash, NamespaceDelimiter::Dash)
	);
	if conflict {
		return Err(ValidationError::IncompatibleNameFormat {
			format: format.to_string(),
			delimiter: delimiter.to_string(),
		});
	}
	Ok(())
}

/// Settings consumed by the formatter, link builder and serializer.
///
/// # Examples
///
/// ```
/// use hyperdoc_core::config::{Configuration, StringFormat};
///
/// let config = Configuration::default()
/// 	.with_api_host("api.example.com")
/// 	.with_secure(true)
/// 	.with_root_endpoint("/v1")
/// 	.with_entity_name_format(StringFormat::StudlyCaps)
/// 	.unwrap();
///
/// assert_eq!(config.scheme(), "https");
/// assert_eq!(config.root_endpoint.as_deref(), Some("/v1"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Configuration {
	/// Host name placed in generated links.
	pub api_host: String,
	/// Whether links use `https`.
	pub secure: bool,
	/// Optional path prefix for generated links, e.g. `/api/v1`.
	pub root_endpoint: Option<String>,
	/// Delimiter between namespace segments of external type names.
	pub namespace_delimiter: NamespaceDelimiter,
	/// Format applied to each segment of an entity type name.
	pub entity_name_format: StringFormat,
	/// Format applied to attribute and relationship keys.
	pub field_key_format: StringFormat,
	/// Emit namespaces as path segments in links instead of delimited names.
	pub namespaces_as_resources: bool,
	/// chrono format string used by the `date` converter.
	pub date_format: String,
	/// Surface serialization errors to the caller instead of an error document.
	pub debug: bool,
}

impl Default for Configuration {
	fn default() -> Self {
		Self {
			api_host: "localhost".to_string(),
			secure: false,
			root_endpoint: None,
			namespace_delimiter: NamespaceDelimiter::Underscore,
			entity_name_format: StringFormat::Dash,
			field_key_format: StringFormat::CamelCase,
			namespaces_as_resources: false,
			date_format: DEFAULT_DATE_FORMAT.to_string(),
			debug: false,
		}
	}
}

impl Configuration {
	/// Creates a configuration with default settings.
	pub fn new() -> Self {
		Self::default()
	}

	/// Parses and validates a TOML document.
	///
	/// # Examples
	///
	/// ```
	/// use hyperdoc_core::config::{Configuration, NamespaceDelimiter};
	///
	/// let config = Configuration::from_toml_str(r#"
	/// api_host = "api.example.com"
	/// namespace_delimiter = "--"
	/// "#).unwrap();
	///
	/// assert_eq!(config.namespace_delimiter, NamespaceDelimiter::DoubleDash);
	/// assert!(!config.debug);
	/// ```
	pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
		let config: Self = toml::from_str(content)?;
		config.validate()?;
		Ok(config)
	}

	/// Parses and validates a JSON document.
	pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
		let config: Self = serde_json::from_str(content)?;
		config.validate()?;
		Ok(config)
	}

	/// Reads a TOML configuration file.
	pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
		let content = std::fs::read_to_string(path)?;
		Self::from_toml_str(&content)
	}

	/// Re-checks invariants that deserialization cannot enforce.
	pub fn validate(&self) -> ValidationResult<()> {
		validate_name_format(self.entity_name_format, self.namespace_delimiter)
	}

	/// Returns `https` or `http`.
	pub fn scheme(&self) -> &'static str {
		if self.secure { "https" } else { "http" }
	}

	/// Sets the host used in generated links.
	pub fn with_api_host(mut self, host: impl Into<String>) -> Self {
		self.api_host = host.into();
		self
	}

	/// Switches links between `https` and `http`.
	pub fn with_secure(mut self, secure: bool) -> Self {
		self.secure = secure;
		self
	}

	/// Sets the path prefix placed before every resource path.
	pub fn with_root_endpoint(mut self, endpoint: impl Into<String>) -> Self {
		self.root_endpoint = Some(endpoint.into());
		self
	}

	/// Sets the namespace delimiter, rejecting a clash with the entity format.
	pub fn with_namespace_delimiter(
		mut self,
		delimiter: NamespaceDelimiter,
	) -> ValidationResult<Self> {
		validate_name_format(self.entity_name_format, delimiter)?;
		self.namespace_delimiter = delimiter;
		Ok(self)
	}

	/// Sets the entity name format, rejecting a clash with the delimiter.
	pub fn with_entity_name_format(mut self, format: StringFormat) -> ValidationResult<Self> {
		validate_name_format(format, self.namespace_delimiter)?;
		self.entity_name_format = format;
		Ok(self)
	}

	/// Sets the wire format of attribute and relationship keys.
	pub fn with_field_key_format(mut self, format: StringFormat) -> Self {
		self.field_key_format = format;
		self
	}

	/// Renders namespace segments as separate path segments in links.
	pub fn with_namespaces_as_resources(mut self, enabled: bool) -> Self {
		self.namespaces_as_resources = enabled;
		self
	}

	/// Sets the chrono format string used for `date` attributes.
	pub fn with_date_format(mut self, format: impl Into<String>) -> Self {
		self.date_format = format.into();
		self
	}

	/// Returns serialization errors to the caller instead of an `errors` document.
	pub fn with_debug(mut self, debug: bool) -> Self {
		self.debug = debug;
		self
	}
}
