//! In-memory document model.
//!
//! A [`Document`] wraps primary data that is either a single [`Resource`], a
//! [`ResourceCollection`] or nothing. Resources carry their attribute values
//! and [`Relationship`]s. The model is built per request and discarded after
//! serialization.

mod collection;
mod relationship;
mod resource;

pub use collection::ResourceCollection;
pub use relationship::{Relationship, RelationshipData};
pub use resource::Resource;

use serde_json::{Map, Value};

/// Whether a document carries one resource or many.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
	One,
	Many,
}

/// Primary data of a document.
#[derive(Debug, Clone, PartialEq)]
pub enum PrimaryData {
	Resource(Box<Resource>),
	Collection(ResourceCollection),
}

/// Top-level document.
///
/// # Examples
///
/// ```
/// use hyperdoc_serializer::document::{Document, DocumentKind, Resource};
///
/// let mut document = Document::one("article");
/// document.set_resource(Resource::new("article", "1"));
///
/// assert_eq!(document.kind(), DocumentKind::One);
/// assert!(document.primary_data().is_some());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
	entity_type: String,
	kind: DocumentKind,
	data: Option<PrimaryData>,
	meta: Option<Map<String, Value>>,
}

impl Document {
	/// Creates a document whose primary data is empty: null for `one`, an
	/// empty collection for `many`.
	pub fn new(entity_type: impl Into<String>, kind: DocumentKind) -> Self {
		let entity_type = entity_type.into();
		let data = match kind {
			DocumentKind::One => None,
			DocumentKind::Many => Some(PrimaryData::Collection(ResourceCollection::new(
				entity_type.clone(),
			))),
		};
		Self {
			entity_type,
			kind,
			data,
			meta: None,
		}
	}

	/// Empty single-resource document.
	pub fn one(entity_type: impl Into<String>) -> Self {
		Self::new(entity_type, DocumentKind::One)
	}

	/// Empty collection document.
	pub fn many(entity_type: impl Into<String>) -> Self {
		Self::new(entity_type, DocumentKind::Many)
	}

	/// Replaces the primary data without checking it against the kind.
	pub fn with_data(mut self, data: Option<PrimaryData>) -> Self {
		self.data = data;
		self
	}

	/// Attaches a top-level `meta` object.
	pub fn with_meta(mut self, meta: Map<String, Value>) -> Self {
		self.meta = Some(meta);
		self
	}

	/// Entity type of the primary data.
	pub fn entity_type(&self) -> &str {
		&self.entity_type
	}

	/// Whether the primary data is one resource or a collection.
	pub fn kind(&self) -> DocumentKind {
		self.kind
	}

	/// Primary data, `None` until set.
	pub fn primary_data(&self) -> Option<&PrimaryData> {
		self.data.as_ref()
	}

	/// Top-level `meta` object, if any.
	pub fn meta(&self) -> Option<&Map<String, Value>> {
		self.meta.as_ref()
	}

	/// Sets the single resource of a `one` document.
	pub fn set_resource(&mut self, resource: Resource) {
		self.data = Some(PrimaryData::Resource(Box::new(resource)));
	}

	/// Appends to the collection of a `many` document, creating it if needed.
	pub fn push_resource(&mut self, resource: Resource) {
		match &mut self.data {
			Some(PrimaryData::Collection(collection)) => collection.push(resource),
			_ => {
				let collection =
					ResourceCollection::new(self.entity_type.clone()).with_resources([resource]);
				self.data = Some(PrimaryData::Collection(collection));
			}
		}
	}

	/// Number of primary resources.
	pub fn len(&self) -> usize {
		match &self.data {
			None => 0,
			Some(PrimaryData::Resource(_)) => 1,
			Some(PrimaryData::Collection(collection)) => collection.len(),
		}
	}

	/// Whether the document holds no primary resources.
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_many_document_starts_with_empty_collection() {
		let document = Document::many("tag");
		assert!(matches!(
			document.primary_data(),
			Some(PrimaryData::Collection(c)) if c.is_empty() && c.entity_type() == "tag"
		));
		assert!(document.is_empty());
	}

	#[rstest]
	fn test_push_resource() {
		let mut document = Document::many("tag");
		document.push_resource(Resource::new("tag", "1"));
		document.push_resource(Resource::new("tag", "2"));
		assert_eq!(document.len(), 2);
	}

	#[rstest]
	fn test_one_document_starts_null() {
		let document = Document::one("article");
		assert!(document.primary_data().is_none());
		assert_eq!(document.kind(), DocumentKind::One);
	}
}
