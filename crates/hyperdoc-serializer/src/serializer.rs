//! Depth-aware serialization of documents into JSON:API wire structures.
//!
//! Primary data is serialized in full at depth 0. Resources reached through a
//! relationship (depth > 0) are emitted as `{type, id}` linkage only; if they
//! carry field values they are queued and serialized in full into the
//! top-level `included` array, deduplicated by `(type, id)`.
//!
//! Traversal state lives in a per-call [`Traversal`] value, so a single
//! [`Serializer`] can be shared freely between threads.

use std::collections::HashSet;
use std::sync::Arc;

use hyperdoc_core::{Configuration, TypeRegistry};
use hyperdoc_metadata::{
	AttributeDescriptor, EntityDescriptor, MetadataRegistry, RelationshipDescriptor,
};
use indexmap::IndexMap;
use serde_json::{Map, Value, json};

use crate::document::{
	Document, DocumentKind, PrimaryData, Relationship, RelationshipData, Resource,
	ResourceCollection,
};
use crate::error::{SerializerError, SerializerResult};
use crate::links::LinkBuilder;

/// Title of the error object returned when serialization fails.
pub const INTERNAL_ERROR_TITLE: &str = "An internal server error occurred.";

/// Per-call traversal state: primary keys and the pending include queue.
struct Traversal<'a> {
	primary: HashSet<(&'a str, &'a str)>,
	included: IndexMap<(&'a str, &'a str), &'a Resource>,
	cursor: usize,
}

impl<'a> Traversal<'a> {
	fn new(document: &'a Document) -> Self {
		let primary = match document.primary_data() {
			None => HashSet::new(),
			Some(PrimaryData::Resource(resource)) => HashSet::from([resource.composite_key()]),
			Some(PrimaryData::Collection(collection)) => {
				collection.iter().map(Resource::composite_key).collect()
			}
		};
		Self {
			primary,
			included: IndexMap::new(),
			cursor: 0,
		}
	}

	fn include(&mut self, resource: &'a Resource) {
		let key = resource.composite_key();
		if !resource.is_complete() || self.primary.contains(&key) || self.included.contains_key(&key) {
			return;
		}
		tracing::trace!(entity_type = key.0, id = key.1, "queued resource for inclusion");
		self.included.insert(key, resource);
	}

	fn next_included(&mut self) -> Option<&'a Resource> {
		let (_, resource) = self.included.get_index(self.cursor)?;
		self.cursor += 1;
		Some(*resource)
	}
}

/// Serializes [`Document`]s using resolved entity metadata.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use hyperdoc_core::{Configuration, DataType, TypeRegistry};
/// use hyperdoc_metadata::{AttributeDescriptor, EntityDescriptor, InMemoryDriver, MetadataRegistry};
/// use hyperdoc_serializer::Serializer;
/// use hyperdoc_serializer::document::{Document, Resource};
/// use serde_json::json;
///
/// let config = Configuration::default();
/// let driver = InMemoryDriver::new().with_descriptor(
/// 	EntityDescriptor::new("tag").unwrap()
/// 		.with_attribute(AttributeDescriptor::new("label", DataType::String).unwrap()).unwrap(),
/// );
/// let metadata = Arc::new(MetadataRegistry::new(driver, Arc::new(TypeRegistry::new(&config)), &config));
/// let serializer = Serializer::new(metadata, &config);
///
/// let mut document = Document::one("tag");
/// document.set_resource(Resource::new("tag", "rust").with_attribute("label", json!("Rust")));
///
/// let wire = serializer.serialize(&document).unwrap();
/// assert_eq!(wire["data"]["attributes"]["label"], json!("Rust"));
/// assert_eq!(wire["data"]["links"]["self"], json!("http://localhost/tag/rust"));
/// ```
#[derive(Debug, Clone)]
pub struct Serializer {
	metadata: Arc<MetadataRegistry>,
	links: LinkBuilder,
	debug: bool,
}

impl Serializer {
	/// Creates a serializer over `metadata`, taking links and debug mode from
	/// `config`.
	pub fn new(metadata: Arc<MetadataRegistry>, config: &Configuration) -> Self {
		Self {
			metadata,
			links: LinkBuilder::new(config),
			debug: config.debug,
		}
	}

	/// Overrides the debug flag taken from the configuration.
	pub fn with_debug(mut self, debug: bool) -> Self {
		self.debug = debug;
		self
	}

	/// Whether errors are returned instead of rendered as an `errors` document.
	pub fn is_debug(&self) -> bool {
		self.debug
	}

	fn types(&self) -> &TypeRegistry {
		self.metadata.types()
	}

	/// Serializes a document.
	///
	/// In debug mode errors are returned to the caller. Otherwise they are
	/// logged and replaced by an `errors` document; the `Err` path is then
	/// never taken.
	pub fn serialize(&self, document: &Document) -> SerializerResult<Value> {
		match self.serialize_document(document) {
			Ok(wire) => Ok(wire),
			Err(err) if self.debug => Err(err),
			Err(err) => {
				tracing::error!(
					entity_type = document.entity_type(),
					error = %err,
					"Document serialization failed"
				);
				Ok(error_document(&err))
			}
		}
	}

	/// Serializes a document to a JSON string.
	pub fn serialize_to_string(&self, document: &Document) -> SerializerResult<String> {
		Ok(serde_json::to_string(&self.serialize(document)?)?)
	}

	fn serialize_document(&self, document: &Document) -> SerializerResult<Value> {
		let mut traversal = Traversal::new(document);
		let data = match (document.kind(), document.primary_data()) {
			(DocumentKind::One, None) => Value::Null,
			(DocumentKind::One, Some(PrimaryData::Resource(resource))) => {
				self.serialize_resource(resource, 0, &mut traversal)?
			}
			(DocumentKind::Many, Some(PrimaryData::Collection(collection))) => {
				self.serialize_collection(collection, 0, &mut traversal)?
			}
			(DocumentKind::Many, None) => Value::Array(Vec::new()),
			(kind, Some(_)) => {
				return Err(SerializerError::UnsupportedDataShape(format!(
					"{kind:?} document for '{}' holds mismatched primary data",
					document.entity_type()
				)));
			}
		};

		let mut included = Vec::new();
		while let Some(resource) = traversal.next_included() {
			included.push(self.serialize_resource(resource, 0, &mut traversal)?);
		}

		let mut wire = Map::new();
		wire.insert("data".to_string(), data);
		if !included.is_empty() {
			wire.insert("included".to_string(), Value::Array(included));
		}
		if let Some(meta) = document.meta() {
			wire.insert("meta".to_string(), Value::Object(meta.clone()));
		}
		Ok(Value::Object(wire))
	}

	fn serialize_resource<'a>(
		&self,
		resource: &'a Resource,
		depth: usize,
		traversal: &mut Traversal<'a>,
	) -> SerializerResult<Value> {
		let descriptor = self.metadata.resolve(resource.entity_type())?;
		let external_type = descriptor.external_type();

		let mut object = Map::new();
		object.insert("type".to_string(), Value::String(external_type.to_string()));
		object.insert("id".to_string(), Value::String(resource.id().to_string()));
		if depth > 0 {
			traversal.include(resource);
			return Ok(Value::Object(object));
		}
		tracing::trace!(entity_type = resource.entity_type(), id = resource.id(), "serializing resource");

		let mut attributes = Map::new();
		for (key, attribute) in descriptor.attributes() {
			if !attribute.should_serialize() {
				continue;
			}
			let value = self.serialize_attribute(resource.attribute(key), attribute)?;
			attributes.insert(attribute.external_key().to_string(), value);
		}
		if !attributes.is_empty() {
			object.insert("attributes".to_string(), Value::Object(attributes));
		}

		object.insert(
			"links".to_string(),
			json!({ "self": self.links.self_link(external_type, resource.id()) }),
		);

		let mut relationships = Map::new();
		for (key, relationship) in descriptor.relationships() {
			if !relationship.should_serialize() {
				continue;
			}
			let value = self.serialize_relationship(
				&descriptor,
				resource,
				resource.relationship(key),
				relationship,
				depth,
				traversal,
			)?;
			relationships.insert(relationship.external_key().to_string(), value);
		}
		if !relationships.is_empty() {
			object.insert("relationships".to_string(), Value::Object(relationships));
		}

		Ok(Value::Object(object))
	}

	fn serialize_attribute(
		&self,
		value: Option<&Value>,
		descriptor: &AttributeDescriptor,
	) -> SerializerResult<Value> {
		let data_type = descriptor.data_type().as_str();
		let value = match value {
			None | Some(Value::Null) => return Ok(self.types().convert_out(data_type, &Value::Null)?),
			Some(value) => value,
		};

		if let Some(nested) = descriptor.attributes().filter(|_| descriptor.has_attributes()) {
			let Value::Object(members) = self.types().convert_out(data_type, value)? else {
				return Err(SerializerError::UnsupportedDataShape(format!(
					"attribute '{}' did not convert to an object",
					descriptor.key()
				)));
			};
			let mut object = Map::new();
			for (key, sub) in nested {
				if !sub.should_serialize() {
					continue;
				}
				let Some(member) = members.get(key).filter(|v| !v.is_null()) else {
					continue;
				};
				object.insert(
					sub.external_key().to_string(),
					self.serialize_attribute(Some(member), sub)?,
				);
			}
			return Ok(Value::Object(object));
		}

		let converted = self.types().convert_out(data_type, value)?;
		match (descriptor.values_type(), converted) {
			(Some(values_type), Value::Array(items)) => items
				.iter()
				.map(|item| self.types().convert_out(values_type.as_str(), item))
				.collect::<Result<Vec<_>, _>>()
				.map(Value::Array)
				.map_err(Into::into),
			(_, converted) => Ok(converted),
		}
	}

	fn serialize_relationship<'a>(
		&self,
		owner_descriptor: &EntityDescriptor,
		owner: &Resource,
		relationship: Option<&'a Relationship>,
		descriptor: &RelationshipDescriptor,
		depth: usize,
		traversal: &mut Traversal<'a>,
	) -> SerializerResult<Value> {
		let data = match relationship {
			Some(relationship) => {
				if relationship.cardinality() != descriptor.cardinality() {
					return Err(SerializerError::RelationshipCardinality {
						key: descriptor.key().to_string(),
						expected: descriptor.cardinality(),
						found: relationship.cardinality(),
					});
				}
				match relationship.data() {
					RelationshipData::One(Some(resource)) => {
						self.serialize_resource(resource, depth + 1, traversal)?
					}
					RelationshipData::Many(collection) if !collection.is_empty() => {
						self.serialize_collection(collection, depth + 1, traversal)?
					}
					_ => descriptor.default_empty_value(),
				}
			}
			None => descriptor.default_empty_value(),
		};

		let external_type = owner_descriptor.external_type();
		let external_key = descriptor.external_key();
		Ok(json!({
			"data": data,
			"links": {
				"self": self.links.relationship_link(external_type, owner.id(), external_key),
				"related": self.links.related_link(external_type, owner.id(), external_key),
			},
		}))
	}

	fn serialize_collection<'a>(
		&self,
		collection: &'a ResourceCollection,
		depth: usize,
		traversal: &mut Traversal<'a>,
	) -> SerializerResult<Value> {
		self.validate_collection(collection)?;
		collection
			.iter()
			.map(|resource| self.serialize_resource(resource, depth, traversal))
			.collect::<SerializerResult<Vec<_>>>()
			.map(Value::Array)
	}

	fn validate_collection(&self, collection: &ResourceCollection) -> SerializerResult<()> {
		let declared = collection.entity_type();
		let is_polymorphic = self.metadata.resolve(declared)?.is_polymorphic();
		for member_type in collection.distinct_resource_types() {
			if member_type == declared {
				continue;
			}
			if !is_polymorphic || !self.metadata.is_descendant_of(member_type, declared)? {
				return Err(SerializerError::InvalidCollectionMember {
					collection_type: declared.to_string(),
					member_type: member_type.to_string(),
				});
			}
		}
		Ok(())
	}
}

/// Builds the `errors` document returned in place of a failed serialization.
pub fn error_document(error: &SerializerError) -> Value {
	json!({
		"errors": [{
			"title": INTERNAL_ERROR_TITLE,
			"code": "500",
			"detail": error.to_string(),
		}],
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use hyperdoc_core::DataType;
	use hyperdoc_metadata::{EntityDescriptor, InMemoryDriver};
	use rstest::{fixture, rstest};

	#[fixture]
	fn serializer() -> Serializer {
		let seo = AttributeDescriptor::object("seo")
			.unwrap()
			.with_attribute(AttributeDescriptor::new("meta_title", DataType::String).unwrap())
			.unwrap()
			.with_attribute(AttributeDescriptor::new("priority", DataType::Integer).unwrap())
			.unwrap();
		let driver = InMemoryDriver::new().with_descriptor(
			EntityDescriptor::new("page")
				.unwrap()
				.with_attribute(seo)
				.unwrap()
				.with_attribute(AttributeDescriptor::array("scores", DataType::Integer).unwrap())
				.unwrap()
				.with_attribute(AttributeDescriptor::new("settings", DataType::Object).unwrap())
				.unwrap()
				.with_attribute(AttributeDescriptor::new("views", DataType::Integer).unwrap())
				.unwrap()
				.with_attribute(AttributeDescriptor::new("rating", DataType::Float).unwrap())
				.unwrap()
				.with_attribute(
					AttributeDescriptor::new("draft_notes", DataType::String)
						.unwrap()
						.with_should_serialize(false),
				)
				.unwrap(),
		);
		let config = Configuration::default();
		let metadata = MetadataRegistry::new(driver, Arc::new(TypeRegistry::new(&config)), &config);
		Serializer::new(Arc::new(metadata), &config).with_debug(true)
	}

	fn page(resource: Resource) -> Document {
		let mut document = Document::one("page");
		document.set_resource(resource);
		document
	}

	#[rstest]
	fn test_absent_attributes_use_null_conversion(serializer: Serializer) {
		let wire = serializer.serialize(&page(Resource::new("page", "1"))).unwrap();

		let attributes = &wire["data"]["attributes"];
		assert_eq!(attributes["views"], Value::Null);
		assert_eq!(attributes["scores"], Value::Null);
		assert_eq!(attributes["settings"], json!({}));
		assert_eq!(attributes["seo"], json!({}));
		assert!(attributes.get("draftNotes").is_none());
	}

	#[rstest]
	fn test_nested_object_drops_null_and_undeclared(serializer: Serializer) {
		let resource = Resource::new("page", "1").with_attribute(
			"seo",
			json!({"meta_title": "Home", "priority": "3", "canonical": "/", "ignored": null}),
		);

		let wire = serializer.serialize(&page(resource)).unwrap();

		assert_eq!(
			wire["data"]["attributes"]["seo"],
			json!({"metaTitle": "Home", "priority": 3})
		);
	}

	#[rstest]
	fn test_array_elements_use_values_type(serializer: Serializer) {
		let resource = Resource::new("page", "1").with_attribute("scores", json!(["1", 2.7, true]));

		let wire = serializer.serialize(&page(resource)).unwrap();

		assert_eq!(wire["data"]["attributes"]["scores"], json!([1, 2, 1]));
	}

	#[rstest]
	fn test_loose_scalars_are_coerced_without_debug(serializer: Serializer) {
		// Arrange
		let serializer = serializer.with_debug(false);
		let resource = Resource::new("page", "1")
			.with_attribute("views", json!("12abc"))
			.with_attribute("rating", json!("4.5 stars"))
			.with_attribute("settings", json!("compact"))
			.with_attribute("scores", json!(["n/a", "7"]));

		// Act
		let wire = serializer.serialize(&page(resource)).unwrap();

		// Assert
		let attributes = &wire["data"]["attributes"];
		assert!(wire.get("errors").is_none());
		assert_eq!(attributes["views"], json!(12));
		assert_eq!(attributes["rating"], json!(4.5));
		assert_eq!(attributes["settings"], json!({"scalar": "compact"}));
		assert_eq!(attributes["scores"], json!([0, 7]));
	}

	#[rstest]
	fn test_conversion_failure_in_debug_is_returned(serializer: Serializer) {
		let resource = Resource::new("page", "1").with_attribute("rating", json!("1e999"));

		let result = serializer.serialize(&page(resource));

		assert!(matches!(result, Err(SerializerError::Type(_))));
	}

	#[rstest]
	fn test_kind_mismatch_is_unsupported(serializer: Serializer) {
		let document = Document::many("page").with_data(Some(PrimaryData::Resource(Box::new(
			Resource::new("page", "1"),
		))));

		assert!(matches!(
			serializer.serialize(&document),
			Err(SerializerError::UnsupportedDataShape(_))
		));
	}

	#[rstest]
	fn test_empty_documents(serializer: Serializer) {
		assert_eq!(
			serializer.serialize(&Document::one("page")).unwrap(),
			json!({"data": null})
		);
		assert_eq!(
			serializer.serialize(&Document::many("page")).unwrap(),
			json!({"data": []})
		);
	}

	#[rstest]
	fn test_meta_is_emitted(serializer: Serializer) {
		let mut meta = Map::new();
		meta.insert("total".to_string(), json!(0));
		let document = Document::many("page").with_meta(meta);

		let wire = serializer.serialize(&document).unwrap();

		assert_eq!(wire["meta"], json!({"total": 0}));
	}

	#[rstest]
	fn test_serialize_to_string(serializer: Serializer) {
		let encoded = serializer.serialize_to_string(&Document::one("page")).unwrap();
		assert_eq!(encoded, r#"{"data":null}"#);
	}

	#[rstest]
	fn test_error_document_shape() {
		let err = SerializerError::UnsupportedDataShape("boom".to_string());
		assert_eq!(
			error_document(&err),
			json!({"errors": [{
				"title": "An internal server error occurred.",
				"code": "500",
				"detail": "Unsupported data shape: boom",
			}]})
		);
	}
}
