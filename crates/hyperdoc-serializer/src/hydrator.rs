//! Reads wire documents back into the in-memory document model.

use std::collections::HashMap;
use std::sync::Arc;

use hyperdoc_metadata::{
	AttributeDescriptor, Cardinality, EntityDescriptor, MetadataRegistry, RelationshipDescriptor,
};
use serde_json::{Map, Value};

use crate::document::{Document, DocumentKind, Relationship, Resource, ResourceCollection};
use crate::error::{SerializerError, SerializerResult};
use crate::factory::ResourceFactory;

type IncludedIndex<'w> = HashMap<(String, String), &'w Value>;

/// Hydrates wire documents produced by [`Serializer`](crate::Serializer) or
/// sent by clients.
///
/// Wire types and keys are mapped back to internal names, values pass
/// through each type's `convert_in`, and members the metadata does not
/// declare are dropped. Resources found in `included` are hydrated into the
/// relationships that reference them; their own relationships stay as
/// identifier stubs.
#[derive(Debug, Clone)]
pub struct Hydrator {
	factory: ResourceFactory,
}

impl Hydrator {
	/// Creates a hydrator resolving wire types through `metadata`.
	pub fn new(metadata: Arc<MetadataRegistry>) -> Self {
		Self {
			factory: ResourceFactory::new(metadata),
		}
	}

	fn metadata(&self) -> &MetadataRegistry {
		self.factory.metadata()
	}

	/// Hydrates a document whose primary data is of `entity_type` or one of
	/// its polymorphic descendants.
	pub fn hydrate(&self, entity_type: &str, wire: &Value) -> SerializerResult<Document> {
		let data = wire.get("data").ok_or_else(|| {
			SerializerError::UnsupportedDataShape("document has no 'data' member".to_string())
		})?;
		let included = self.index_included(wire)?;

		let mut document = match data {
			Value::Null => self.factory.create_document(entity_type, DocumentKind::One)?,
			Value::Object(_) => {
				let mut document = self.factory.create_document(entity_type, DocumentKind::One)?;
				let resource = self.hydrate_resource(data, &included, 0)?;
				self.factory.apply_resource(&mut document, resource)?;
				document
			}
			Value::Array(items) => {
				let mut document = self.factory.create_document(entity_type, DocumentKind::Many)?;
				for item in items {
					let resource = self.hydrate_resource(item, &included, 0)?;
					self.factory.apply_resource(&mut document, resource)?;
				}
				document
			}
			other => {
				return Err(SerializerError::UnsupportedDataShape(format!(
					"primary data must be an object, an array or null, got {other}"
				)));
			}
		};

		if let Some(Value::Object(meta)) = wire.get("meta") {
			document = document.with_meta(meta.clone());
		}
		tracing::debug!(entity_type, resources = document.len(), "hydrated document");
		Ok(document)
	}

	fn index_included<'w>(&self, wire: &'w Value) -> SerializerResult<IncludedIndex<'w>> {
		let mut index = HashMap::new();
		let Some(included) = wire.get("included") else {
			return Ok(index);
		};
		let Value::Array(items) = included else {
			return Err(SerializerError::UnsupportedDataShape(
				"'included' must be an array".to_string(),
			));
		};
		for item in items {
			let (descriptor, id) = self.identifier(item)?;
			index.insert((descriptor.entity_type().to_string(), id), item);
		}
		Ok(index)
	}

	fn identifier(&self, value: &Value) -> SerializerResult<(Arc<EntityDescriptor>, String)> {
		let Some(external_type) = value.get("type").and_then(Value::as_str) else {
			return Err(SerializerError::UnsupportedDataShape(format!(
				"resource identifier has no string 'type': {value}"
			)));
		};
		let id = match value.get("id") {
			Some(Value::String(id)) => id.clone(),
			Some(Value::Number(id)) => id.to_string(),
			_ => {
				return Err(SerializerError::UnsupportedDataShape(format!(
					"resource identifier has no 'id': {value}"
				)));
			}
		};
		Ok((self.metadata().resolve_external(external_type)?, id))
	}

	fn hydrate_resource(
		&self,
		value: &Value,
		included: &IncludedIndex<'_>,
		depth: usize,
	) -> SerializerResult<Resource> {
		let (descriptor, id) = self.identifier(value)?;
		let mut resource = Resource::new(descriptor.entity_type(), id);

		if let Some(Value::Object(attributes)) = value.get("attributes") {
			for (key, attribute) in descriptor.attributes() {
				let Some(member) = attributes
					.get(attribute.external_key())
					.filter(|v| !v.is_null())
				else {
					continue;
				};
				resource.set_attribute(key.clone(), self.hydrate_attribute(member, attribute)?);
			}
		}

		if let Some(Value::Object(relationships)) = value.get("relationships") {
			for (key, relationship) in descriptor.relationships() {
				let Some(linkage) = relationships
					.get(relationship.external_key())
					.and_then(|r| r.get("data"))
				else {
					continue;
				};
				resource.set_relationship(self.hydrate_relationship(
					key,
					linkage,
					relationship,
					included,
					depth,
				)?);
			}
		}
		Ok(resource)
	}

	fn hydrate_attribute(&self, value: &Value, descriptor: &AttributeDescriptor) -> SerializerResult<Value> {
		let types = self.metadata().types();
		let data_type = descriptor.data_type().as_str();

		if let (Some(nested), Value::Object(members)) = (
			descriptor.attributes().filter(|_| descriptor.has_attributes()),
			value,
		) {
			let mut object = Map::new();
			for (key, sub) in nested {
				if let Some(member) = members.get(sub.external_key()).filter(|v| !v.is_null()) {
					object.insert(key.clone(), self.hydrate_attribute(member, sub)?);
				}
			}
			return Ok(types.convert_in(data_type, &Value::Object(object))?);
		}

		let converted = types.convert_in(data_type, value)?;
		match (descriptor.values_type(), converted) {
			(Some(values_type), Value::Array(items)) => Ok(Value::Array(
				items
					.iter()
					.map(|item| types.convert_in(values_type.as_str(), item))
					.collect::<Result<_, _>>()?,
			)),
			(_, converted) => Ok(converted),
		}
	}

	fn hydrate_relationship(
		&self,
		key: &str,
		linkage: &Value,
		descriptor: &RelationshipDescriptor,
		included: &IncludedIndex<'_>,
		depth: usize,
	) -> SerializerResult<Relationship> {
		let found = match linkage {
			Value::Null | Value::Object(_) => Cardinality::One,
			Value::Array(_) => Cardinality::Many,
			other => {
				return Err(SerializerError::UnsupportedDataShape(format!(
					"relationship '{key}' linkage must be an object, an array or null, got {other}"
				)));
			}
		};
		if found != descriptor.cardinality() {
			return Err(SerializerError::RelationshipCardinality {
				key: key.to_string(),
				expected: descriptor.cardinality(),
				found,
			});
		}

		match linkage {
			Value::Array(items) => {
				let mut collection = ResourceCollection::new(descriptor.target_entity_type());
				for item in items {
					collection.push(self.linked_resource(item, descriptor, included, depth)?);
				}
				Ok(Relationship::many(key, collection))
			}
			Value::Null => Ok(Relationship::one(key, None)),
			_ => Ok(Relationship::one(
				key,
				Some(self.linked_resource(linkage, descriptor, included, depth)?),
			)),
		}
	}

	fn linked_resource(
		&self,
		identifier: &Value,
		descriptor: &RelationshipDescriptor,
		included: &IncludedIndex<'_>,
		depth: usize,
	) -> SerializerResult<Resource> {
		let (target, id) = self.identifier(identifier)?;
		self.factory
			.validate_resource_type(descriptor.target_entity_type(), target.entity_type())?;

		let key = (target.entity_type().to_string(), id);
		match included.get(&key) {
			Some(full) if depth == 0 => self.hydrate_resource(full, included, depth + 1),
			_ => Ok(Resource::new(key.0, key.1)),
		}
	}
}
