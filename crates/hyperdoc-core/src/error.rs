//! Error types shared by every hyperdoc crate.
//!
//! [`ValidationError`] is raised while configuration and descriptors are being
//! built; it is never recovered from internally. [`TypeError`] comes out of
//! the [`TypeRegistry`](crate::types::TypeRegistry).

use thiserror::Error;

/// Validation failures for names, formats and descriptor definitions.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
	/// A member name or field key was empty.
	#[error("Member name cannot be empty")]
	EmptyMemberName,

	/// A member name contained a character JSON:API forbids.
	#[error("Member name '{name}' contains invalid character '{character}'")]
	InvalidMemberCharacter {
		/// The offending name.
		name: String,
		/// The first forbidden character found.
		character: char,
	},

	/// A member name started or ended with `-`, `_` or a space.
	#[error("Member name '{0}' cannot start or end with '-', '_' or a space")]
	InvalidMemberBookend(String),

	/// A field key used a reserved word.
	#[error("Field key '{0}' is reserved")]
	ReservedFieldKey(String),

	/// The namespace delimiter is not one of the supported values.
	#[error("Invalid namespace delimiter '{0}' (expected one of: _, -, __, --)")]
	InvalidNamespaceDelimiter(String),

	/// The string format is not one of the supported values.
	#[error("Invalid string format '{0}' (expected one of: dash, camelcase, studlycaps, underscore)")]
	InvalidStringFormat(String),

	/// A name format would make the namespace delimiter ambiguous.
	#[error("Name format '{format}' cannot be used with namespace delimiter '{delimiter}'")]
	IncompatibleNameFormat {
		/// Configured name format.
		format: String,
		/// Configured namespace delimiter.
		delimiter: String,
	},

	/// A descriptor named a data type the registry does not know.
	#[error("Unknown data type '{data_type}' for field '{field}'")]
	UnknownDataType {
		/// Field declaring the type.
		field: String,
		/// The unknown type name.
		data_type: String,
	},

	/// An entity type name was empty or malformed.
	#[error("Invalid entity type '{0}'")]
	InvalidEntityType(String),

	/// A relationship declared something other than `one` or `many`.
	#[error("Invalid relationship cardinality '{0}' (expected 'one' or 'many')")]
	InvalidCardinality(String),
}

/// Errors raised by the [`TypeRegistry`](crate::types::TypeRegistry) and its converters.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeError {
	/// No converter is registered under the name.
	#[error("Unknown data type: {0}")]
	UnknownType(String),

	/// A converter is already registered under the name.
	#[error("Data type already registered: {0}")]
	DuplicateType(String),

	/// The value could not be coerced to the target type.
	#[error("Cannot convert {value} to {data_type}")]
	Conversion {
		/// Target type name.
		data_type: String,
		/// Rendering of the rejected value.
		value: String,
	},
}

impl TypeError {
	pub(crate) fn conversion(data_type: &str, value: &serde_json::Value) -> Self {
		Self::Conversion {
			data_type: data_type.to_string(),
			value: value.to_string(),
		}
	}
}

/// Result type alias for validation.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Result type alias for type conversion.
pub type TypeResult<T> = Result<T, TypeError>;
