use std::collections::BTreeMap;

use serde_json::Value;

use super::Relationship;

/// A single entity instance: identity plus attribute and relationship values.
///
/// Identity (`type` + `id`) is fixed at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Resource {
	entity_type: String,
	id: String,
	attributes: BTreeMap<String, Value>,
	relationships: BTreeMap<String, Relationship>,
}

impl Resource {
	/// Creates an identifier-only resource.
	pub fn new(entity_type: impl Into<String>, id: impl Into<String>) -> Self {
		Self {
			entity_type: entity_type.into(),
			id: id.into(),
			attributes: BTreeMap::new(),
			relationships: BTreeMap::new(),
		}
	}

	/// Builder form of [`Self::set_attribute`].
	pub fn with_attribute(mut self, key: impl Into<String>, value: Value) -> Self {
		self.set_attribute(key, value);
		self
	}

	/// Builder form of [`Self::set_relationship`].
	pub fn with_relationship(mut self, relationship: Relationship) -> Self {
		self.set_relationship(relationship);
		self
	}

	/// Internal entity type.
	pub fn entity_type(&self) -> &str {
		&self.entity_type
	}

	/// Resource identifier.
	pub fn id(&self) -> &str {
		&self.id
	}

	/// `(type, id)` pair identifying the resource within a document.
	pub fn composite_key(&self) -> (&str, &str) {
		(&self.entity_type, &self.id)
	}

	/// Sets an attribute value by internal key.
	pub fn set_attribute(&mut self, key: impl Into<String>, value: Value) {
		self.attributes.insert(key.into(), value);
	}

	/// Attribute value by internal key.
	pub fn attribute(&self, key: &str) -> Option<&Value> {
		self.attributes.get(key)
	}

	/// Attribute values keyed by internal key.
	pub fn attributes(&self) -> &BTreeMap<String, Value> {
		&self.attributes
	}

	/// Sets a relationship, replacing one with the same key.
	pub fn set_relationship(&mut self, relationship: Relationship) {
		self.relationships
			.insert(relationship.key().to_string(), relationship);
	}

	/// Relationship by internal key.
	pub fn relationship(&self, key: &str) -> Option<&Relationship> {
		self.relationships.get(key)
	}

	pub(crate) fn relationship_mut(&mut self, key: &str) -> Option<&mut Relationship> {
		self.relationships.get_mut(key)
	}

	/// Relationships keyed by internal key.
	pub fn relationships(&self) -> &BTreeMap<String, Relationship> {
		&self.relationships
	}

	/// Returns `true` once any field value was populated. Identifier stubs
	/// are not complete and are never placed in `included`.
	pub fn is_complete(&self) -> bool {
		!self.attributes.is_empty() || !self.relationships.is_empty()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	fn test_identifier_stub_is_incomplete() {
		let stub = Resource::new("person", "9");
		assert!(!stub.is_complete());
		assert_eq!(stub.composite_key(), ("person", "9"));
	}

	#[rstest]
	fn test_attribute_makes_complete() {
		let person = Resource::new("person", "9").with_attribute("name", json!("Ada"));
		assert!(person.is_complete());
		assert_eq!(person.attribute("name"), Some(&json!("Ada")));
	}

	#[rstest]
	fn test_relationship_makes_complete() {
		let person = Resource::new("person", "9").with_relationship(Relationship::one("pet", None));
		assert!(person.is_complete());
	}
}
