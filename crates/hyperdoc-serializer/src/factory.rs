//! Metadata-checked construction of documents and resources.

use std::sync::Arc;

use hyperdoc_metadata::{Cardinality, MetadataRegistry};
use serde_json::{Map, Value};

use crate::document::{
	Document, DocumentKind, PrimaryData, Relationship, RelationshipData, Resource,
	ResourceCollection,
};
use crate::error::{SerializerError, SerializerResult};

/// Builds documents and resources, validating types and keys against the
/// [`MetadataRegistry`] and converting incoming values through its
/// [`TypeRegistry`](hyperdoc_core::TypeRegistry).
#[derive(Debug, Clone)]
pub struct ResourceFactory {
	metadata: Arc<MetadataRegistry>,
}

impl ResourceFactory {
	/// Creates a factory validating against `metadata`.
	pub fn new(metadata: Arc<MetadataRegistry>) -> Self {
		Self { metadata }
	}

	/// The registry used for validation.
	pub fn metadata(&self) -> &MetadataRegistry {
		&self.metadata
	}

	/// Creates an empty document for a known entity type.
	pub fn create_document(&self, entity_type: &str, kind: DocumentKind) -> SerializerResult<Document> {
		self.metadata.resolve(entity_type)?;
		Ok(Document::new(entity_type, kind))
	}

	/// Creates an identifier-only resource of a known entity type.
	pub fn create_resource(&self, entity_type: &str, id: impl Into<String>) -> SerializerResult<Resource> {
		self.metadata.resolve(entity_type)?;
		Ok(Resource::new(entity_type, id))
	}

	/// Checks that `found` equals `expected`, or descends from it when
	/// `expected` is polymorphic.
	pub fn validate_resource_type(&self, expected: &str, found: &str) -> SerializerResult<()> {
		if expected == found {
			return Ok(());
		}
		let declared = self.metadata.resolve(expected)?;
		if declared.is_polymorphic() && self.metadata.is_descendant_of(found, expected)? {
			return Ok(());
		}
		Err(SerializerError::IncompatibleResourceType {
			expected: expected.to_string(),
			found: found.to_string(),
		})
	}

	/// Places a resource in the document: replaces the resource of a `one`
	/// document, appends to a `many` document.
	pub fn apply_resource(&self, document: &mut Document, resource: Resource) -> SerializerResult<()> {
		self.validate_resource_type(document.entity_type(), resource.entity_type())?;
		match document.kind() {
			DocumentKind::One => document.set_resource(resource),
			DocumentKind::Many => document.push_resource(resource),
		}
		Ok(())
	}

	/// Converts and sets every declared, non-null attribute found in `values`.
	/// Undeclared keys are ignored.
	pub fn apply_attributes(&self, resource: &mut Resource, values: &Map<String, Value>) -> SerializerResult<()> {
		let descriptor = self.metadata.resolve(resource.entity_type())?;
		for (key, attribute) in descriptor.attributes() {
			let Some(value) = values.get(key).filter(|v| !v.is_null()) else {
				continue;
			};
			let converted = self
				.metadata
				.types()
				.convert_in(attribute.data_type().as_str(), value)?;
			resource.set_attribute(key.clone(), converted);
		}
		Ok(())
	}

	/// Converts and sets a single declared attribute.
	pub fn apply_attribute(&self, resource: &mut Resource, key: &str, value: &Value) -> SerializerResult<()> {
		let descriptor = self.metadata.resolve(resource.entity_type())?;
		let attribute = descriptor
			.attribute(key)
			.ok_or_else(|| SerializerError::UnknownAttribute {
				entity_type: resource.entity_type().to_string(),
				key: key.to_string(),
			})?;
		let converted = self
			.metadata
			.types()
			.convert_in(attribute.data_type().as_str(), value)?;
		resource.set_attribute(key, converted);
		Ok(())
	}

	/// Links `related` to `owner`: replaces a to-one value, appends to a
	/// to-many collection.
	pub fn apply_relationship(&self, owner: &mut Resource, key: &str, related: Resource) -> SerializerResult<()> {
		let descriptor = self.metadata.resolve(owner.entity_type())?;
		let relationship = descriptor
			.relationship(key)
			.ok_or_else(|| SerializerError::UnknownRelationship {
				entity_type: owner.entity_type().to_string(),
				key: key.to_string(),
			})?;
		self.validate_resource_type(relationship.target_entity_type(), related.entity_type())?;

		match relationship.cardinality() {
			Cardinality::One => owner.set_relationship(Relationship::one(key, Some(related))),
			Cardinality::Many => match owner.relationship_mut(key).map(Relationship::data_mut) {
				Some(RelationshipData::Many(collection)) => collection.push(related),
				_ => owner.set_relationship(Relationship::many(
					key,
					ResourceCollection::new(relationship.target_entity_type())
						.with_resources([related]),
				)),
			},
		}
		Ok(())
	}

	/// Applies several relationships, skipping keys the owner does not declare.
	pub fn apply_relationships<I>(&self, owner: &mut Resource, related: I) -> SerializerResult<()>
	where
		I: IntoIterator<Item = (String, Resource)>,
	{
		let descriptor = self.metadata.resolve(owner.entity_type())?;
		for (key, resource) in related {
			if descriptor.relationship(&key).is_none() {
				continue;
			}
			self.apply_relationship(owner, &key, resource)?;
		}
		Ok(())
	}

	/// Checks a document's primary data against its declared type.
	pub fn validate_document(&self, document: &Document) -> SerializerResult<()> {
		match document.primary_data() {
			None => Ok(()),
			Some(PrimaryData::Resource(resource)) => {
				self.validate_resource_type(document.entity_type(), resource.entity_type())
			}
			Some(PrimaryData::Collection(collection)) => collection
				.iter()
				.try_for_each(|r| self.validate_resource_type(document.entity_type(), r.entity_type())),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use hyperdoc_core::{Configuration, DataType, TypeRegistry};
	use hyperdoc_metadata::{
		AttributeDescriptor, EntityDescriptor, InMemoryDriver, RelationshipDescriptor,
	};
	use rstest::{fixture, rstest};
	use serde_json::json;

	#[fixture]
	fn factory() -> ResourceFactory {
		let driver = InMemoryDriver::new()
			.with_descriptor(
				EntityDescriptor::new("animal")
					.unwrap()
					.with_polymorphic(true)
					.with_attribute(AttributeDescriptor::new("name", DataType::String).unwrap())
					.unwrap()
					.with_attribute(AttributeDescriptor::new("legs", DataType::Integer).unwrap())
					.unwrap(),
			)
			.with_descriptor(EntityDescriptor::new("dog").unwrap().with_extends("animal").unwrap())
			.with_descriptor(EntityDescriptor::new("vehicle").unwrap())
			.with_descriptor(
				EntityDescriptor::new("person")
					.unwrap()
					.with_relationship(RelationshipDescriptor::one("car", "vehicle").unwrap())
					.unwrap()
					.with_relationship(RelationshipDescriptor::many("pets", "animal").unwrap())
					.unwrap(),
			);
		let config = Configuration::default();
		let registry = MetadataRegistry::new(driver, Arc::new(TypeRegistry::new(&config)), &config);
		ResourceFactory::new(Arc::new(registry))
	}

	#[rstest]
	fn test_create_resource_unknown_type(factory: ResourceFactory) {
		assert!(matches!(
			factory.create_resource("ghost", "1"),
			Err(SerializerError::Metadata(_))
		));
	}

	#[rstest]
	fn test_apply_resource_accepts_polymorphic_descendant(factory: ResourceFactory) {
		let mut document = factory.create_document("animal", DocumentKind::Many).unwrap();

		factory.apply_resource(&mut document, Resource::new("dog", "1")).unwrap();
		factory.apply_resource(&mut document, Resource::new("animal", "2")).unwrap();

		assert_eq!(document.len(), 2);
	}

	#[rstest]
	fn test_apply_resource_rejects_unrelated(factory: ResourceFactory) {
		let mut document = factory.create_document("animal", DocumentKind::One).unwrap();

		let err = factory
			.apply_resource(&mut document, Resource::new("vehicle", "1"))
			.unwrap_err();

		assert!(matches!(err, SerializerError::IncompatibleResourceType { .. }));
		assert!(document.is_empty());
	}

	#[rstest]
	fn test_apply_attributes_converts_and_skips(factory: ResourceFactory) {
		let mut dog = factory.create_resource("dog", "1").unwrap();
		let values = json!({"name": 12, "legs": "4", "color": "brown", "owner": null});

		factory
			.apply_attributes(&mut dog, values.as_object().unwrap())
			.unwrap();

		assert_eq!(dog.attribute("name"), Some(&json!("12")));
		assert_eq!(dog.attribute("legs"), Some(&json!(4)));
		assert!(dog.attribute("color").is_none());
	}

	#[rstest]
	fn test_apply_attribute_unknown_key(factory: ResourceFactory) {
		let mut dog = factory.create_resource("dog", "1").unwrap();
		assert!(matches!(
			factory.apply_attribute(&mut dog, "color", &json!("brown")),
			Err(SerializerError::UnknownAttribute { .. })
		));
	}

	#[rstest]
	fn test_apply_relationship_to_many_appends(factory: ResourceFactory) {
		let mut person = factory.create_resource("person", "1").unwrap();

		factory.apply_relationship(&mut person, "pets", Resource::new("dog", "1")).unwrap();
		factory.apply_relationship(&mut person, "pets", Resource::new("dog", "2")).unwrap();

		let pets = person.relationship("pets").unwrap();
		assert!(matches!(pets.data(), RelationshipData::Many(c) if c.len() == 2));
	}

	#[rstest]
	fn test_apply_relationship_to_one_replaces(factory: ResourceFactory) {
		let mut person = factory.create_resource("person", "1").unwrap();

		factory.apply_relationship(&mut person, "car", Resource::new("vehicle", "1")).unwrap();
		factory.apply_relationship(&mut person, "car", Resource::new("vehicle", "2")).unwrap();

		let car = person.relationship("car").unwrap();
		assert!(matches!(car.data(), RelationshipData::One(Some(r)) if r.id() == "2"));
	}

	#[rstest]
	fn test_apply_relationship_errors(factory: ResourceFactory) {
		let mut person = factory.create_resource("person", "1").unwrap();

		assert!(matches!(
			factory.apply_relationship(&mut person, "boss", Resource::new("person", "2")),
			Err(SerializerError::UnknownRelationship { .. })
		));
		assert!(matches!(
			factory.apply_relationship(&mut person, "car", Resource::new("dog", "2")),
			Err(SerializerError::IncompatibleResourceType { .. })
		));
	}

	#[rstest]
	fn test_apply_relationships_skips_undeclared(factory: ResourceFactory) {
		let mut person = factory.create_resource("person", "1").unwrap();

		factory
			.apply_relationships(
				&mut person,
				[
					("car".to_string(), Resource::new("vehicle", "7")),
					("boss".to_string(), Resource::new("person", "2")),
				],
			)
			.unwrap();

		assert!(person.relationship("car").is_some());
		assert!(person.relationship("boss").is_none());
	}
}
