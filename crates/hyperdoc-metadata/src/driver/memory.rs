use std::collections::BTreeMap;

use super::MetadataDriver;
use crate::descriptor::EntityDescriptor;
use crate::error::{MetadataError, MetadataResult};

/// Driver over descriptors registered in code.
///
/// # Examples
///
/// ```
/// use hyperdoc_metadata::descriptor::EntityDescriptor;
/// use hyperdoc_metadata::driver::{InMemoryDriver, MetadataDriver};
///
/// let driver = InMemoryDriver::new()
/// 	.with_descriptor(EntityDescriptor::new("content").unwrap())
/// 	.with_descriptor(EntityDescriptor::new("article").unwrap().with_extends("content").unwrap());
///
/// assert_eq!(driver.type_hierarchy("article").unwrap(), vec!["content", "article"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryDriver {
	descriptors: BTreeMap<String, EntityDescriptor>,
}

impl InMemoryDriver {
	/// Creates an empty driver.
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers a descriptor, replacing any with the same type.
	pub fn with_descriptor(mut self, descriptor: EntityDescriptor) -> Self {
		self.add(descriptor);
		self
	}

	/// Registers a descriptor, replacing any with the same type.
	pub fn add(&mut self, descriptor: EntityDescriptor) {
		self.descriptors
			.insert(descriptor.entity_type().to_string(), descriptor);
	}
}

impl MetadataDriver for InMemoryDriver {
	fn load_descriptor(&self, entity_type: &str) -> MetadataResult<EntityDescriptor> {
		self.descriptors
			.get(entity_type)
			.cloned()
			.ok_or_else(|| MetadataError::NotFound(entity_type.to_string()))
	}

	fn all_type_names(&self) -> MetadataResult<Vec<String>> {
		Ok(self.descriptors.keys().cloned().collect())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_missing_type() {
		let driver = InMemoryDriver::new();
		assert!(matches!(
			driver.load_descriptor("ghost"),
			Err(MetadataError::NotFound(ref t)) if t == "ghost"
		));
	}

	#[rstest]
	fn test_hierarchy_with_missing_parent() {
		let driver = InMemoryDriver::new().with_descriptor(
			EntityDescriptor::new("dog")
				.unwrap()
				.with_extends("animal")
				.unwrap(),
		);

		assert!(matches!(
			driver.type_hierarchy("dog"),
			Err(MetadataError::NotFound(ref t)) if t == "animal"
		));
	}

	#[rstest]
	fn test_hierarchy_cycle() {
		let driver = InMemoryDriver::new()
			.with_descriptor(EntityDescriptor::new("a").unwrap().with_extends("b").unwrap())
			.with_descriptor(EntityDescriptor::new("b").unwrap().with_extends("a").unwrap());

		assert!(matches!(
			driver.type_hierarchy("a"),
			Err(MetadataError::Mapping { .. })
		));
	}

	#[rstest]
	fn test_all_type_names_sorted() {
		let driver = InMemoryDriver::new()
			.with_descriptor(EntityDescriptor::new("zebra").unwrap())
			.with_descriptor(EntityDescriptor::new("ant").unwrap());

		assert_eq!(driver.all_type_names().unwrap(), vec!["ant", "zebra"]);
	}
}
