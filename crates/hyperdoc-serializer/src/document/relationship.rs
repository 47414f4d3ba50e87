use hyperdoc_metadata::Cardinality;

use super::{Resource, ResourceCollection};

/// Value held by a relationship; the variant fixes the cardinality.
#[derive(Debug, Clone, PartialEq)]
pub enum RelationshipData {
	/// To-one: a resource or nothing.
	One(Option<Box<Resource>>),
	/// To-many: a possibly empty collection.
	Many(ResourceCollection),
}

/// A relationship value attached to a resource.
#[derive(Debug, Clone, PartialEq)]
pub struct Relationship {
	key: String,
	data: RelationshipData,
}

impl Relationship {
	/// Creates a to-one relationship.
	pub fn one(key: impl Into<String>, resource: Option<Resource>) -> Self {
		Self {
			key: key.into(),
			data: RelationshipData::One(resource.map(Box::new)),
		}
	}

	/// Creates a to-many relationship.
	pub fn many(key: impl Into<String>, collection: ResourceCollection) -> Self {
		Self {
			key: key.into(),
			data: RelationshipData::Many(collection),
		}
	}

	/// Internal key of the relationship.
	pub fn key(&self) -> &str {
		&self.key
	}

	/// Linked resource or resources.
	pub fn data(&self) -> &RelationshipData {
		&self.data
	}

	pub(crate) fn data_mut(&mut self) -> &mut RelationshipData {
		&mut self.data
	}

	/// Cardinality implied by the data shape.
	pub fn cardinality(&self) -> Cardinality {
		match self.data {
			RelationshipData::One(_) => Cardinality::One,
			RelationshipData::Many(_) => Cardinality::Many,
		}
	}

	/// `true` for a set to-one or a non-empty to-many.
	pub fn has_data(&self) -> bool {
		match &self.data {
			RelationshipData::One(resource) => resource.is_some(),
			RelationshipData::Many(collection) => !collection.is_empty(),
		}
	}
}
