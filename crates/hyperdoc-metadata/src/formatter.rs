//! Internal-to-external name formatting.
//!
//! Internal entity types use `/` between namespace segments (`blog/post`).
//! On the wire every segment is case-formatted and the segments are joined
//! with the configured namespace delimiter (`blog-post` segments -> `blog_post`).

use hyperdoc_core::inflector;
use hyperdoc_core::validators::{NAMESPACE_SEPARATOR, validate_member_name};
use hyperdoc_core::{Configuration, NamespaceDelimiter, StringFormat, ValidationResult};

use crate::descriptor::{AttributeDescriptor, EntityDescriptor};

/// Separator used in file base names in place of [`NAMESPACE_SEPARATOR`].
const FILE_NAMESPACE_SEPARATOR: char = '.';

/// Formats entity types and field keys for the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityFormatter {
	entity_name_format: StringFormat,
	field_key_format: StringFormat,
	namespace_delimiter: NamespaceDelimiter,
}

impl EntityFormatter {
	/// Takes the name formats and delimiter from `config`.
	pub fn new(config: &Configuration) -> Self {
		Self {
			entity_name_format: config.entity_name_format,
			field_key_format: config.field_key_format,
			namespace_delimiter: config.namespace_delimiter,
		}
	}

	/// Formats an internal entity type.
	///
	/// # Examples
	///
	/// ```
	/// use hyperdoc_core::Configuration;
	/// use hyperdoc_metadata::EntityFormatter;
	///
	/// let formatter = EntityFormatter::new(&Configuration::default());
	/// assert_eq!(formatter.format_external_type("blog/blogPost").unwrap(), "blog_blog-post");
	/// ```
	pub fn format_external_type(&self, entity_type: &str) -> ValidationResult<String> {
		let external = entity_type
			.split(NAMESPACE_SEPARATOR)
			.map(|segment| inflector::format(segment, self.entity_name_format))
			.collect::<Vec<_>>()
			.join(self.namespace_delimiter.as_str());
		validate_member_name(&external)?;
		Ok(external)
	}

	/// Formats an attribute or relationship key.
	pub fn format_field(&self, key: &str) -> ValidationResult<String> {
		let external = inflector::format(key, self.field_key_format);
		validate_member_name(&external)?;
		Ok(external)
	}

	/// Delimiter joining formatted namespace segments.
	pub fn namespace_delimiter(&self) -> NamespaceDelimiter {
		self.namespace_delimiter
	}

	/// Stamps external names on a single hierarchy level.
	pub(crate) fn apply(&self, descriptor: &mut EntityDescriptor) -> ValidationResult<()> {
		let external_type = self.format_external_type(descriptor.entity_type())?;
		descriptor.set_external_type(external_type);
		for attribute in descriptor.attributes_mut().values_mut() {
			self.apply_attribute(attribute)?;
		}
		for relationship in descriptor.relationships_mut().values_mut() {
			let external_key = self.format_field(relationship.key())?;
			relationship.set_external_key(external_key);
		}
		Ok(())
	}

	fn apply_attribute(&self, attribute: &mut AttributeDescriptor) -> ValidationResult<()> {
		let external_key = self.format_field(attribute.key())?;
		attribute.set_external_key(external_key);
		if let Some(nested) = attribute.attributes_mut() {
			for sub in nested.values_mut() {
				self.apply_attribute(sub)?;
			}
		}
		Ok(())
	}

	/// File base name for an entity type: `blog/post` -> `blog.post`.
	pub fn file_base_name(entity_type: &str) -> String {
		entity_type.replace(NAMESPACE_SEPARATOR, &FILE_NAMESPACE_SEPARATOR.to_string())
	}

	/// Inverse of [`EntityFormatter::file_base_name`].
	pub fn type_from_file_base_name(base_name: &str) -> String {
		base_name.replace(FILE_NAMESPACE_SEPARATOR, &NAMESPACE_SEPARATOR.to_string())
	}
}

impl Default for EntityFormatter {
	fn default() -> Self {
		Self::new(&Configuration::default())
	}
}
