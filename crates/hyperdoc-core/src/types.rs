//! Data-type registry.
//!
//! Every attribute descriptor names a data type. The [`TypeRegistry`] maps
//! that name to a [`TypeConverter`] which coerces values in both directions:
//! domain value to wire value ([`TypeRegistry::convert_out`]) and back
//! ([`TypeRegistry::convert_in`]).
//!
//! Converters are registered once at startup and never looked up by any
//! dynamic means. Custom types are added with [`TypeRegistry::register`];
//! built-ins can be replaced with [`TypeRegistry::override_type`].
//!
//! # Examples
//!
//! ```
//! use hyperdoc_core::types::TypeRegistry;
//! use serde_json::json;
//!
//! let registry = TypeRegistry::default();
//!
//! assert_eq!(registry.convert_out("integer", &json!("42")).unwrap(), json!(42));
//! assert_eq!(registry.convert_out("boolean", &json!("off")).unwrap(), json!(false));
//! assert_eq!(registry.convert_out("string", &json!(null)).unwrap(), json!(null));
//! ```

mod container;
mod date;
mod scalar;

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::Configuration;
use crate::error::{TypeError, TypeResult};

pub use container::{ArrayConverter, ObjectConverter};
pub use date::DateConverter;
pub use scalar::{BooleanConverter, FloatConverter, IntegerConverter, MixedConverter, StringConverter};

/// Bidirectional value converter for one data type.
pub trait TypeConverter: Send + Sync {
	/// Converts a domain value into its wire representation.
	fn convert_out(&self, value: &Value) -> TypeResult<Value>;

	/// Converts a wire value into its domain representation.
	fn convert_in(&self, value: &Value) -> TypeResult<Value>;
}

/// Name of an attribute data type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DataType {
	Array,
	Object,
	Boolean,
	Date,
	Float,
	Integer,
	String,
	Mixed,
	/// A type registered at runtime.
	Custom(String),
}

impl DataType {
	/// Registry name of the type.
	pub fn as_str(&self) -> &str {
		match self {
			Self::Array => "array",
			Self::Object => "object",
			Self::Boolean => "boolean",
			Self::Date => "date",
			Self::Float => "float",
			Self::Integer => "integer",
			Self::String => "string",
			Self::Mixed => "mixed",
			Self::Custom(name) => name,
		}
	}
}

impl fmt::Display for DataType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl From<&str> for DataType {
	fn from(value: &str) -> Self {
		match value {
			"array" => Self::Array,
			"object" => Self::Object,
			"boolean" => Self::Boolean,
			"date" => Self::Date,
			"float" => Self::Float,
			"integer" => Self::Integer,
			"string" => Self::String,
			"mixed" => Self::Mixed,
			other => Self::Custom(other.to_string()),
		}
	}
}

impl From<String> for DataType {
	fn from(value: String) -> Self {
		Self::from(value.as_str())
	}
}

impl From<DataType> for String {
	fn from(value: DataType) -> Self {
		value.as_str().to_string()
	}
}

impl FromStr for DataType {
	type Err = std::convert::Infallible;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Ok(Self::from(s))
	}
}

/// Name-to-converter lookup table.
pub struct TypeRegistry {
	converters: HashMap<String, Box<dyn TypeConverter>>,
}

impl TypeRegistry {
	/// Creates a registry with the built-in converters; `date` uses the
	/// configured date format.
	pub fn new(config: &Configuration) -> Self {
		let mut registry = Self::empty();
		registry.insert(DataType::Array, ArrayConverter);
		registry.insert(DataType::Object, ObjectConverter);
		registry.insert(DataType::Boolean, BooleanConverter);
		registry.insert(DataType::Date, DateConverter::new(config.date_format.clone()));
		registry.insert(DataType::Float, FloatConverter);
		registry.insert(DataType::Integer, IntegerConverter);
		registry.insert(DataType::String, StringConverter);
		registry.insert(DataType::Mixed, MixedConverter);
		registry
	}

	/// Creates a registry with no converters.
	pub fn empty() -> Self {
		Self {
			converters: HashMap::new(),
		}
	}

	fn insert(&mut self, data_type: DataType, converter: impl TypeConverter + 'static) {
		self.converters
			.insert(data_type.as_str().to_string(), Box::new(converter));
	}

	/// Registers a new data type.
	///
	/// Fails with [`TypeError::DuplicateType`] if the name is taken.
	pub fn register(
		&mut self,
		name: impl Into<String>,
		converter: impl TypeConverter + 'static,
	) -> TypeResult<()> {
		let name = name.into();
		if self.converters.contains_key(&name) {
			return Err(TypeError::DuplicateType(name));
		}
		tracing::debug!(data_type = %name, "registered data type");
		self.converters.insert(name, Box::new(converter));
		Ok(())
	}

	/// Replaces the converter of an existing data type.
	///
	/// Fails with [`TypeError::UnknownType`] if the name is absent.
	pub fn override_type(
		&mut self,
		name: &str,
		converter: impl TypeConverter + 'static,
	) -> TypeResult<()> {
		let slot = self
			.converters
			.get_mut(name)
			.ok_or_else(|| TypeError::UnknownType(name.to_string()))?;
		*slot = Box::new(converter);
		tracing::debug!(data_type = %name, "overrode data type");
		Ok(())
	}

	/// Returns `true` if a converter exists for `name`.
	pub fn contains(&self, name: &str) -> bool {
		self.converters.contains_key(name)
	}

	/// Looks up the converter for `name`.
	pub fn get(&self, name: &str) -> TypeResult<&dyn TypeConverter> {
		self.converters
			.get(name)
			.map(|converter| converter.as_ref())
			.ok_or_else(|| TypeError::UnknownType(name.to_string()))
	}

	/// Converts a domain value to its wire form.
	pub fn convert_out(&self, name: &str, value: &Value) -> TypeResult<Value> {
		self.get(name)?.convert_out(value)
	}

	/// Converts a wire value to its domain form.
	pub fn convert_in(&self, name: &str, value: &Value) -> TypeResult<Value> {
		self.get(name)?.convert_in(value)
	}

	/// Returns every registered type name, sorted.
	pub fn type_names(&self) -> Vec<&str> {
		let mut names: Vec<&str> = self.converters.keys().map(String::as_str).collect();
		names.sort_unstable();
		names
	}
}

impl Default for TypeRegistry {
	fn default() -> Self {
		Self::new(&Configuration::default())
	}
}

impl fmt::Debug for TypeRegistry {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("TypeRegistry")
			.field("types", &self.type_names())
			.finish()
	}
}
