//! Metadata drivers.
//!
//! A driver reads unmerged, single-level descriptors from a backing source.
//! Inheritance merging and caching are the
//! [`MetadataRegistry`](crate::MetadataRegistry)'s job.

mod memory;
#[cfg(feature = "yaml")]
mod yaml;

pub use memory::InMemoryDriver;
#[cfg(feature = "yaml")]
pub use yaml::{FileLocator, YamlFileDriver};

use crate::descriptor::EntityDescriptor;
use crate::error::{MetadataError, MetadataResult};

/// Source of entity descriptors.
pub trait MetadataDriver: Send + Sync {
	/// Loads the descriptor declared for exactly `entity_type`, without any
	/// inherited fields.
	///
	/// Fails with [`MetadataError::NotFound`] if no mapping exists.
	fn load_descriptor(&self, entity_type: &str) -> MetadataResult<EntityDescriptor>;

	/// Returns every entity type this driver can load.
	fn all_type_names(&self) -> MetadataResult<Vec<String>>;

	/// Returns the inheritance chain of `entity_type`, root ancestor first and
	/// `entity_type` last.
	fn type_hierarchy(&self, entity_type: &str) -> MetadataResult<Vec<String>> {
		let mut chain: Vec<String> = Vec::new();
		let mut current = Some(entity_type.to_string());
		while let Some(level) = current {
			if chain.contains(&level) {
				return Err(MetadataError::mapping(
					entity_type,
					format!("inheritance cycle through '{level}'"),
				));
			}
			current = self
				.load_descriptor(&level)?
				.extends()
				.map(str::to_string);
			chain.push(level);
		}
		chain.reverse();
		Ok(chain)
	}
}
