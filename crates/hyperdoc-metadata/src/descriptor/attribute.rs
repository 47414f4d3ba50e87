use std::collections::BTreeMap;

use hyperdoc_core::validators::{validate_field_key, validate_object_attribute_key};
use hyperdoc_core::{DataType, ValidationResult};
use serde::{Deserialize, Serialize};

/// Describes one attribute of an entity.
///
/// `object` attributes may declare a sub-schema of nested attributes; `array`
/// attributes may declare the data type of their elements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeDescriptor {
	key: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	external_key: Option<String>,
	data_type: DataType,
	#[serde(default = "default_true")]
	should_serialize: bool,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	values_type: Option<DataType>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	attributes: Option<BTreeMap<String, AttributeDescriptor>>,
}

fn default_true() -> bool {
	true
}

impl AttributeDescriptor {
	/// Creates an attribute descriptor.
	///
	/// # Examples
	///
	/// ```
	/// use hyperdoc_core::DataType;
	/// use hyperdoc_metadata::descriptor::AttributeDescriptor;
	///
	/// let title = AttributeDescriptor::new("title", DataType::String).unwrap();
	/// assert_eq!(title.key(), "title");
	/// assert!(title.should_serialize());
	///
	/// assert!(AttributeDescriptor::new("id", DataType::String).is_err());
	/// ```
	pub fn new(key: impl Into<String>, data_type: DataType) -> ValidationResult<Self> {
		let key = key.into();
		validate_field_key(&key)?;
		Ok(Self {
			key,
			external_key: None,
			data_type,
			should_serialize: true,
			values_type: None,
			attributes: None,
		})
	}

	/// Creates an `array` attribute whose elements have `values_type`.
	pub fn array(key: impl Into<String>, values_type: DataType) -> ValidationResult<Self> {
		let mut descriptor = Self::new(key, DataType::Array)?;
		descriptor.values_type = Some(values_type);
		Ok(descriptor)
	}

	/// Creates an `object` attribute with an empty sub-schema.
	pub fn object(key: impl Into<String>) -> ValidationResult<Self> {
		let mut descriptor = Self::new(key, DataType::Object)?;
		descriptor.attributes = Some(BTreeMap::new());
		Ok(descriptor)
	}

	/// Excludes the attribute from the wire when `false`.
	pub fn with_should_serialize(mut self, should_serialize: bool) -> Self {
		self.should_serialize = should_serialize;
		self
	}

	/// Declares a nested attribute. `links` and `relationships` are rejected.
	pub fn with_attribute(mut self, attribute: AttributeDescriptor) -> ValidationResult<Self> {
		self.add_attribute(attribute)?;
		Ok(self)
	}

	/// Declares a nested attribute in place.
	pub fn add_attribute(&mut self, attribute: AttributeDescriptor) -> ValidationResult<()> {
		validate_object_attribute_key(&attribute.key)?;
		self.attributes
			.get_or_insert_with(BTreeMap::new)
			.insert(attribute.key.clone(), attribute);
		Ok(())
	}

	/// Internal key of the attribute.
	pub fn key(&self) -> &str {
		&self.key
	}

	/// Wire name of the attribute; the internal key until a formatter ran.
	pub fn external_key(&self) -> &str {
		self.external_key.as_deref().unwrap_or(&self.key)
	}

	pub(crate) fn set_external_key(&mut self, external_key: String) {
		self.external_key = Some(external_key);
	}

	/// Registered data type of the attribute.
	pub fn data_type(&self) -> &DataType {
		&self.data_type
	}

	/// Whether the attribute is written to the wire.
	pub fn should_serialize(&self) -> bool {
		self.should_serialize
	}

	/// Element type of an `array` attribute, if declared.
	pub fn values_type(&self) -> Option<&DataType> {
		self.values_type.as_ref()
	}

	/// Nested sub-schema of an `object` attribute.
	pub fn attributes(&self) -> Option<&BTreeMap<String, AttributeDescriptor>> {
		self.attributes.as_ref()
	}

	pub(crate) fn attributes_mut(&mut self) -> Option<&mut BTreeMap<String, AttributeDescriptor>> {
		self.attributes.as_mut()
	}

	/// Returns `true` for `object` attributes declaring at least one nested key.
	pub fn has_attributes(&self) -> bool {
		self.data_type == DataType::Object
			&& self.attributes.as_ref().is_some_and(|attrs| !attrs.is_empty())
	}

	/// Looks up a nested attribute of an `object` attribute.
	pub fn attribute(&self, key: &str) -> Option<&AttributeDescriptor> {
		self.attributes.as_ref()?.get(key)
	}
}
