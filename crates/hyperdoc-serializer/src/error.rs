//! Error types for serialization and hydration.

use hyperdoc_core::TypeError;
use hyperdoc_metadata::{Cardinality, MetadataError};
use thiserror::Error;

/// Errors raised while building, serializing or hydrating documents.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum SerializerError {
	/// Relationship data does not match the declared cardinality.
	#[error(
		"Relationship '{key}' is declared as to-{expected} but was given to-{found} data"
	)]
	RelationshipCardinality {
		/// Relationship key.
		key: String,
		/// Cardinality declared by the descriptor.
		expected: Cardinality,
		/// Shape of the supplied data.
		found: Cardinality,
	},

	/// A collection holds a resource of an unrelated type.
	#[error("Collection of '{collection_type}' cannot contain a '{member_type}' resource")]
	InvalidCollectionMember {
		/// Declared collection type.
		collection_type: String,
		/// Offending member type.
		member_type: String,
	},

	/// Data is neither a resource, a collection nor null.
	#[error("Unsupported data shape: {0}")]
	UnsupportedDataShape(String),

	/// The entity declares no relationship with this key.
	#[error("Entity type '{entity_type}' has no relationship '{key}'")]
	UnknownRelationship {
		/// Owning entity type.
		entity_type: String,
		/// Requested key.
		key: String,
	},

	/// The entity declares no attribute with this key.
	#[error("Entity type '{entity_type}' has no attribute '{key}'")]
	UnknownAttribute {
		/// Owning entity type.
		entity_type: String,
		/// Requested key.
		key: String,
	},

	/// A resource type is neither the expected type nor a polymorphic descendant.
	#[error("Resource type '{found}' is not compatible with '{expected}'")]
	IncompatibleResourceType {
		/// Declared type.
		expected: String,
		/// Supplied type.
		found: String,
	},

	/// Metadata resolution failed.
	#[error(transparent)]
	Metadata(#[from] MetadataError),

	/// A value could not be converted.
	#[error(transparent)]
	Type(#[from] TypeError),

	/// JSON encoding failed.
	#[error("JSON error: {0}")]
	Json(#[from] serde_json::Error),
}

/// Result type alias for serializer operations.
pub type SerializerResult<T> = Result<T, SerializerError>;
