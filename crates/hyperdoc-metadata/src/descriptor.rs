//! Entity, attribute and relationship descriptors.
//!
//! Descriptors are built once per process (by a driver, then merged and
//! cached by the [`MetadataRegistry`](crate::MetadataRegistry)) and are
//! read-only afterwards.

mod attribute;
mod entity;
mod relationship;

pub use attribute::AttributeDescriptor;
pub use entity::EntityDescriptor;
pub use relationship::{Cardinality, RelationshipDescriptor};

/// A field of an entity: either an attribute or a relationship.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldDescriptor {
	Attribute(AttributeDescriptor),
	Relationship(RelationshipDescriptor),
}

impl FieldDescriptor {
	/// Internal key of the field.
	pub fn key(&self) -> &str {
		match self {
			Self::Attribute(attribute) => attribute.key(),
			Self::Relationship(relationship) => relationship.key(),
		}
	}

	/// Wire name of the field.
	pub fn external_key(&self) -> &str {
		match self {
			Self::Attribute(attribute) => attribute.external_key(),
			Self::Relationship(relationship) => relationship.external_key(),
		}
	}

	/// Whether the field is written to the wire.
	pub fn should_serialize(&self) -> bool {
		match self {
			Self::Attribute(attribute) => attribute.should_serialize(),
			Self::Relationship(relationship) => relationship.should_serialize(),
		}
	}
}

impl From<AttributeDescriptor> for FieldDescriptor {
	fn from(value: AttributeDescriptor) -> Self {
		Self::Attribute(value)
	}
}

impl From<RelationshipDescriptor> for FieldDescriptor {
	fn from(value: RelationshipDescriptor) -> Self {
		Self::Relationship(value)
	}
}
