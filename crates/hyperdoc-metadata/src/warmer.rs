//! Cache warming.

use crate::error::MetadataResult;
use crate::registry::MetadataRegistry;

/// Fills or empties a registry's external cache for every known type.
#[derive(Debug, Clone, Copy)]
pub struct CacheWarmer<'a> {
	registry: &'a MetadataRegistry,
}

impl<'a> CacheWarmer<'a> {
	/// Creates a warmer for `registry`.
	pub fn new(registry: &'a MetadataRegistry) -> Self {
		Self { registry }
	}

	/// Clears the cache, then resolves every type into it.
	///
	/// Returns the warmed entity types; empty when no cache is enabled.
	pub fn warm(&self) -> MetadataResult<Vec<String>> {
		if !self.registry.has_cache() {
			return Ok(Vec::new());
		}
		self.clear()?;
		let types = self.registry.all_type_names()?;
		for entity_type in &types {
			self.registry.resolve(entity_type)?;
		}
		tracing::debug!(count = types.len(), "warmed descriptor cache");
		Ok(types)
	}

	/// Evicts every type from the cache and drops the memory layer.
	///
	/// Returns the cleared entity types; empty when no cache is enabled.
	pub fn clear(&self) -> MetadataResult<Vec<String>> {
		if !self.registry.has_cache() {
			return Ok(Vec::new());
		}
		self.registry.enable_cache(false);
		let result = self.evict_all();
		self.registry.enable_cache(true);
		self.registry.clear_memory();
		let types = result?;
		tracing::debug!(count = types.len(), "cleared descriptor cache");
		Ok(types)
	}

	fn evict_all(&self) -> MetadataResult<Vec<String>> {
		let types = self.registry.all_type_names()?;
		for entity_type in &types {
			self.registry.evict(entity_type)?;
		}
		Ok(types)
	}
}
