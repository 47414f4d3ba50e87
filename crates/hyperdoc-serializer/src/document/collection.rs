use std::slice;

use super::Resource;

/// Ordered resources sharing one declared entity type.
///
/// Members may be polymorphic descendants of the declared type; that rule is
/// checked when the collection is serialized or filled through the
/// [`ResourceFactory`](crate::ResourceFactory).
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceCollection {
	entity_type: String,
	resources: Vec<Resource>,
}

impl ResourceCollection {
	/// Empty collection of `entity_type`.
	pub fn new(entity_type: impl Into<String>) -> Self {
		Self {
			entity_type: entity_type.into(),
			resources: Vec::new(),
		}
	}

	/// Appends `resources`.
	pub fn with_resources(mut self, resources: impl IntoIterator<Item = Resource>) -> Self {
		self.resources.extend(resources);
		self
	}

	/// Declared entity type of the collection.
	pub fn entity_type(&self) -> &str {
		&self.entity_type
	}

	/// Appends a resource.
	pub fn push(&mut self, resource: Resource) {
		self.resources.push(resource);
	}

	/// Resource at `index`.
	pub fn get(&self, index: usize) -> Option<&Resource> {
		self.resources.get(index)
	}

	/// Number of resources.
	pub fn len(&self) -> usize {
		self.resources.len()
	}

	/// Whether the collection holds no resources.
	pub fn is_empty(&self) -> bool {
		self.resources.is_empty()
	}

	/// Iterates the resources in order.
	pub fn iter(&self) -> slice::Iter<'_, Resource> {
		self.resources.iter()
	}

	/// Member types in order of first appearance.
	pub fn distinct_resource_types(&self) -> Vec<&str> {
		let mut types: Vec<&str> = Vec::new();
		for resource in &self.resources {
			if !types.contains(&resource.entity_type()) {
				types.push(resource.entity_type());
			}
		}
		types
	}
}

impl<'a> IntoIterator for &'a ResourceCollection {
	type Item = &'a Resource;
	type IntoIter = slice::Iter<'a, Resource>;

	fn into_iter(self) -> Self::IntoIter {
		self.iter()
	}
}

impl IntoIterator for ResourceCollection {
	type Item = Resource;
	type IntoIter = std::vec::IntoIter<Resource>;

	fn into_iter(self) -> Self::IntoIter {
		self.resources.into_iter()
	}
}
