//! Error types for metadata loading and caching.

use hyperdoc_core::{TypeError, ValidationError};
use thiserror::Error;

/// Errors that can occur while building, loading or caching descriptors.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum MetadataError {
	/// No mapping exists for the entity type.
	#[error("Metadata not found for entity type '{0}'")]
	NotFound(String),

	/// A key is declared both as an attribute and as a relationship.
	#[error("Field key '{key}' is already in use on entity type '{entity_type}'")]
	FieldKeyCollision {
		/// Entity type declaring the field.
		entity_type: String,
		/// The colliding key.
		key: String,
	},

	/// A name, format or definition failed validation.
	#[error("Validation error: {0}")]
	Validation(#[from] ValidationError),

	/// A data type lookup failed.
	#[error("Type error: {0}")]
	Type(#[from] TypeError),

	/// A mapping source is present but malformed.
	#[error("Invalid mapping for '{entity_type}': {message}")]
	Mapping {
		/// Entity type the mapping was loaded for.
		entity_type: String,
		/// What was wrong with it.
		message: String,
	},

	/// A cache backend failed.
	#[error("Cache error: {0}")]
	Cache(String),

	/// I/O operation failed.
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),

	/// JSON serialization/deserialization error.
	#[error("JSON error: {0}")]
	Json(#[from] serde_json::Error),

	/// YAML deserialization error.
	#[cfg(feature = "yaml")]
	#[error("YAML error: {0}")]
	Yaml(#[from] serde_yaml::Error),

	/// MessagePack encoding error.
	#[error("MessagePack encode error: {0}")]
	MessagePackEncode(#[from] rmp_serde::encode::Error),

	/// MessagePack decoding error.
	#[error("MessagePack decode error: {0}")]
	MessagePackDecode(#[from] rmp_serde::decode::Error),
}

impl MetadataError {
	pub(crate) fn mapping(entity_type: &str, message: impl Into<String>) -> Self {
		Self::Mapping {
			entity_type: entity_type.to_string(),
			message: message.into(),
		}
	}
}

/// Result type alias for metadata operations.
pub type MetadataResult<T> = Result<T, MetadataError>;

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_not_found_message() {
		let error = MetadataError::NotFound("blog/post".to_string());
		assert_eq!(
			error.to_string(),
			"Metadata not found for entity type 'blog/post'"
		);
	}

	#[rstest]
	fn test_field_key_collision_message() {
		let error = MetadataError::FieldKeyCollision {
			entity_type: "article".to_string(),
			key: "author".to_string(),
		};
		assert_eq!(
			error.to_string(),
			"Field key 'author' is already in use on entity type 'article'"
		);
	}

	#[rstest]
	fn test_validation_error_from() {
		let error: MetadataError = ValidationError::EmptyMemberName.into();
		assert!(matches!(
			error,
			MetadataError::Validation(ValidationError::EmptyMemberName)
		));
	}

	#[rstest]
	fn test_io_error_from() {
		let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
		let error: MetadataError = io_error.into();
		assert!(matches!(error, MetadataError::Io(_)));
	}
}
