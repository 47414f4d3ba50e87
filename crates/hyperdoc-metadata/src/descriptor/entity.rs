use std::collections::BTreeMap;

use hyperdoc_core::ValidationResult;
use hyperdoc_core::validators::validate_entity_type;
use serde::{Deserialize, Serialize};

use super::{AttributeDescriptor, FieldDescriptor, RelationshipDescriptor};
use crate::error::{MetadataError, MetadataResult};

/// Attribute and relationship schema of one entity type.
///
/// Field maps are ordered by key. A key may be an attribute or a relationship
/// but never both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityDescriptor {
	entity_type: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	external_type: Option<String>,
	#[serde(default)]
	is_abstract: bool,
	#[serde(default)]
	is_polymorphic: bool,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	extends: Option<String>,
	#[serde(default)]
	attributes: BTreeMap<String, AttributeDescriptor>,
	#[serde(default)]
	relationships: BTreeMap<String, RelationshipDescriptor>,
}

impl EntityDescriptor {
	/// Creates an empty descriptor for `entity_type`.
	///
	/// # Examples
	///
	/// ```
	/// use hyperdoc_core::DataType;
	/// use hyperdoc_metadata::descriptor::{AttributeDescriptor, EntityDescriptor, RelationshipDescriptor};
	///
	/// let mut article = EntityDescriptor::new("article").unwrap();
	/// article.add_attribute(AttributeDescriptor::new("title", DataType::String).unwrap()).unwrap();
	/// article.add_relationship(RelationshipDescriptor::one("author", "person").unwrap()).unwrap();
	///
	/// // A key can only be used once across attributes and relationships
	/// let clash = AttributeDescriptor::new("author", DataType::String).unwrap();
	/// assert!(article.add_attribute(clash).is_err());
	/// ```
	pub fn new(entity_type: impl Into<String>) -> ValidationResult<Self> {
		let entity_type = entity_type.into();
		validate_entity_type(&entity_type)?;
		Ok(Self {
			entity_type,
			external_type: None,
			is_abstract: false,
			is_polymorphic: false,
			extends: None,
			attributes: BTreeMap::new(),
			relationships: BTreeMap::new(),
		})
	}

	/// Marks the entity as abstract.
	pub fn with_abstract(mut self, is_abstract: bool) -> Self {
		self.is_abstract = is_abstract;
		self
	}

	/// Lets collections of this type hold descendant types.
	pub fn with_polymorphic(mut self, is_polymorphic: bool) -> Self {
		self.is_polymorphic = is_polymorphic;
		self
	}

	/// Sets the parent entity type.
	pub fn with_extends(mut self, parent: impl Into<String>) -> ValidationResult<Self> {
		let parent = parent.into();
		validate_entity_type(&parent)?;
		self.extends = Some(parent);
		Ok(self)
	}

	/// Builder form of [`Self::add_attribute`].
	pub fn with_attribute(mut self, attribute: AttributeDescriptor) -> MetadataResult<Self> {
		self.add_attribute(attribute)?;
		Ok(self)
	}

	/// Builder form of [`Self::add_relationship`].
	pub fn with_relationship(mut self, relationship: RelationshipDescriptor) -> MetadataResult<Self> {
		self.add_relationship(relationship)?;
		Ok(self)
	}

	/// Adds or replaces an attribute.
	///
	/// Fails with [`MetadataError::FieldKeyCollision`] if a relationship
	/// already uses the key.
	pub fn add_attribute(&mut self, attribute: AttributeDescriptor) -> MetadataResult<()> {
		if self.relationships.contains_key(attribute.key()) {
			return Err(self.collision(attribute.key()));
		}
		self.attributes.insert(attribute.key().to_string(), attribute);
		Ok(())
	}

	/// Adds or replaces a relationship.
	///
	/// Fails with [`MetadataError::FieldKeyCollision`] if an attribute
	/// already uses the key.
	pub fn add_relationship(&mut self, relationship: RelationshipDescriptor) -> MetadataResult<()> {
		if self.attributes.contains_key(relationship.key()) {
			return Err(self.collision(relationship.key()));
		}
		self.relationships
			.insert(relationship.key().to_string(), relationship);
		Ok(())
	}

	/// Adds an attribute or a relationship.
	pub fn add_field(&mut self, field: FieldDescriptor) -> MetadataResult<()> {
		match field {
			FieldDescriptor::Attribute(attribute) => self.add_attribute(attribute),
			FieldDescriptor::Relationship(relationship) => self.add_relationship(relationship),
		}
	}

	fn collision(&self, key: &str) -> MetadataError {
		MetadataError::FieldKeyCollision {
			entity_type: self.entity_type.clone(),
			key: key.to_string(),
		}
	}

	/// Overlays a descendant level onto this descriptor.
	///
	/// Scalar properties come from `child`; field maps are unioned with
	/// `child` replacing same-key fields. A key that would end up as both an
	/// attribute and a relationship fails with
	/// [`MetadataError::FieldKeyCollision`].
	pub fn merge(&mut self, child: &EntityDescriptor) -> MetadataResult<()> {
		self.entity_type = child.entity_type.clone();
		self.external_type = child.external_type.clone();
		self.is_abstract = child.is_abstract;
		self.is_polymorphic = child.is_polymorphic;
		self.extends = child.extends.clone();

		for attribute in child.attributes.values() {
			self.add_attribute(attribute.clone())?;
		}
		for relationship in child.relationships.values() {
			self.add_relationship(relationship.clone())?;
		}
		Ok(())
	}

	/// Internal entity type, e.g. `blog/post`.
	pub fn entity_type(&self) -> &str {
		&self.entity_type
	}

	/// Wire name of the entity type; the internal type until a formatter ran.
	pub fn external_type(&self) -> &str {
		self.external_type.as_deref().unwrap_or(&self.entity_type)
	}

	pub(crate) fn set_external_type(&mut self, external_type: String) {
		self.external_type = Some(external_type);
	}

	pub(crate) fn has_external_names(&self) -> bool {
		self.external_type.is_some()
	}

	/// Whether the entity is abstract.
	pub fn is_abstract(&self) -> bool {
		self.is_abstract
	}

	/// Whether collections of this type accept descendants.
	pub fn is_polymorphic(&self) -> bool {
		self.is_polymorphic
	}

	/// Parent entity type, if any.
	pub fn extends(&self) -> Option<&str> {
		self.extends.as_deref()
	}

	/// Returns `true` if this type declares a parent.
	pub fn is_child_entity(&self) -> bool {
		self.extends.is_some()
	}

	/// Attributes keyed by internal key.
	pub fn attributes(&self) -> &BTreeMap<String, AttributeDescriptor> {
		&self.attributes
	}

	pub(crate) fn attributes_mut(&mut self) -> &mut BTreeMap<String, AttributeDescriptor> {
		&mut self.attributes
	}

	/// Relationships keyed by internal key.
	pub fn relationships(&self) -> &BTreeMap<String, RelationshipDescriptor> {
		&self.relationships
	}

	pub(crate) fn relationships_mut(&mut self) -> &mut BTreeMap<String, RelationshipDescriptor> {
		&mut self.relationships
	}

	/// Looks up an attribute by internal key.
	pub fn attribute(&self, key: &str) -> Option<&AttributeDescriptor> {
		self.attributes.get(key)
	}

	/// Looks up a relationship by internal key.
	pub fn relationship(&self, key: &str) -> Option<&RelationshipDescriptor> {
		self.relationships.get(key)
	}

	/// Looks up a field of either kind.
	pub fn field(&self, key: &str) -> Option<FieldDescriptor> {
		self.attribute(key)
			.cloned()
			.map(FieldDescriptor::Attribute)
			.or_else(|| {
				self.relationship(key)
					.cloned()
					.map(FieldDescriptor::Relationship)
			})
	}

	/// Whether an attribute or relationship uses `key`.
	pub fn has_field(&self, key: &str) -> bool {
		self.attributes.contains_key(key) || self.relationships.contains_key(key)
	}
}
