//! Resolution of fully merged entity descriptors.
//!
//! [`MetadataRegistry::resolve`] walks an entity's inheritance chain from the
//! root ancestor down, merging each level into an accumulator. Every level's
//! merged snapshot is stored in memory and, when configured, in the external
//! [`MetadataCache`], so resolving a parent later is a cache hit.
//!
//! ```text
//! resolve("article")
//!   memory? ── hit ──> done
//!   cache?  ── hit ──> memory, done
//!   driver.type_hierarchy = [content, article]
//!     content: memory/cache hit, else driver load -> validate -> format -> seed
//!     article: memory/cache hit, else driver load -> validate -> format -> merge
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use hyperdoc_core::{Configuration, TypeRegistry, ValidationError};
use parking_lot::RwLock;

use crate::cache::MetadataCache;
use crate::descriptor::{AttributeDescriptor, EntityDescriptor};
use crate::driver::MetadataDriver;
use crate::error::{MetadataError, MetadataResult};
use crate::formatter::EntityFormatter;

/// Process-wide descriptor registry with memory and external cache layers.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use hyperdoc_core::{Configuration, DataType, TypeRegistry};
/// use hyperdoc_metadata::MetadataRegistry;
/// use hyperdoc_metadata::descriptor::{AttributeDescriptor, EntityDescriptor};
/// use hyperdoc_metadata::driver::InMemoryDriver;
///
/// let driver = InMemoryDriver::new()
/// 	.with_descriptor(
/// 		EntityDescriptor::new("content").unwrap()
/// 			.with_attribute(AttributeDescriptor::new("title", DataType::String).unwrap()).unwrap(),
/// 	)
/// 	.with_descriptor(
/// 		EntityDescriptor::new("blog_post").unwrap()
/// 			.with_extends("content").unwrap()
/// 			.with_attribute(AttributeDescriptor::new("body", DataType::String).unwrap()).unwrap(),
/// 	);
/// let config = Configuration::default();
/// let registry = MetadataRegistry::new(driver, Arc::new(TypeRegistry::new(&config)), &config);
///
/// let post = registry.resolve("blog_post").unwrap();
/// assert_eq!(post.external_type(), "blog-post");
/// assert!(post.attribute("title").is_some());
/// assert!(post.attribute("body").is_some());
/// ```
pub struct MetadataRegistry {
	driver: Box<dyn MetadataDriver>,
	types: Arc<TypeRegistry>,
	formatter: EntityFormatter,
	cache: Option<Arc<dyn MetadataCache>>,
	cache_enabled: AtomicBool,
	memory: RwLock<HashMap<String, Arc<EntityDescriptor>>>,
	type_names: RwLock<Option<Vec<String>>>,
	external_types: RwLock<HashMap<String, String>>,
}

impl MetadataRegistry {
	/// Creates a registry loading descriptors from `driver`, with no external cache.
	pub fn new(
		driver: impl MetadataDriver + 'static,
		types: Arc<TypeRegistry>,
		config: &Configuration,
	) -> Self {
		Self {
			driver: Box::new(driver),
			types,
			formatter: EntityFormatter::new(config),
			cache: None,
			cache_enabled: AtomicBool::new(false),
			memory: RwLock::new(HashMap::new()),
			type_names: RwLock::new(None),
			external_types: RwLock::new(HashMap::new()),
		}
	}

	/// Attaches and enables an external cache.
	pub fn with_cache(mut self, cache: impl MetadataCache + 'static) -> Self {
		self.cache = Some(Arc::new(cache));
		self.cache_enabled.store(true, Ordering::Release);
		self
	}

	/// Turns the external cache on or off. Has no effect without a cache.
	pub fn enable_cache(&self, enabled: bool) {
		self.cache_enabled
			.store(enabled && self.cache.is_some(), Ordering::Release);
	}

	/// Returns `true` if an external cache is attached and enabled.
	pub fn has_cache(&self) -> bool {
		self.cache.is_some() && self.cache_enabled.load(Ordering::Acquire)
	}

	fn active_cache(&self) -> Option<&Arc<dyn MetadataCache>> {
		self.cache.as_ref().filter(|_| self.has_cache())
	}

	/// Type converters used to validate and convert attributes.
	pub fn types(&self) -> &TypeRegistry {
		&self.types
	}

	/// Formatter applied to every resolved descriptor.
	pub fn formatter(&self) -> &EntityFormatter {
		&self.formatter
	}

	/// Returns the fully merged descriptor for `entity_type`.
	///
	/// Fails with [`MetadataError::NotFound`] if any level of the hierarchy
	/// has no mapping.
	pub fn resolve(&self, entity_type: &str) -> MetadataResult<Arc<EntityDescriptor>> {
		if let Some(descriptor) = self.lookup(entity_type)? {
			return Ok(descriptor);
		}

		let hierarchy = self.driver.type_hierarchy(entity_type)?;
		let mut resolved: Option<Arc<EntityDescriptor>> = None;
		for level in &hierarchy {
			if let Some(descriptor) = self.lookup(level)? {
				resolved = Some(descriptor);
				continue;
			}

			let mut descriptor = self.driver.load_descriptor(level)?;
			self.validate_data_types(&descriptor)?;
			self.formatter.apply(&mut descriptor)?;
			tracing::debug!(entity_type = %level, "loaded descriptor from driver");

			let merged = match resolved.take() {
				None => descriptor,
				Some(parent) => {
					let mut accumulator = EntityDescriptor::clone(&parent);
					accumulator.merge(&descriptor)?;
					accumulator
				}
			};
			resolved = Some(self.store(merged)?);
		}

		resolved.ok_or_else(|| MetadataError::NotFound(entity_type.to_string()))
	}

	fn lookup(&self, entity_type: &str) -> MetadataResult<Option<Arc<EntityDescriptor>>> {
		if let Some(descriptor) = self.memory.read().get(entity_type) {
			tracing::trace!(entity_type, "descriptor memory hit");
			return Ok(Some(Arc::clone(descriptor)));
		}
		let Some(cache) = self.active_cache() else {
			return Ok(None);
		};
		let Some(descriptor) = cache.load(entity_type)? else {
			return Ok(None);
		};
		tracing::debug!(entity_type, "descriptor cache hit");
		let descriptor = Arc::new(descriptor);
		self.memory
			.write()
			.insert(entity_type.to_string(), Arc::clone(&descriptor));
		Ok(Some(descriptor))
	}

	fn store(&self, descriptor: EntityDescriptor) -> MetadataResult<Arc<EntityDescriptor>> {
		if let Some(cache) = self.active_cache() {
			cache.put(&descriptor)?;
		}
		let descriptor = Arc::new(descriptor);
		self.memory
			.write()
			.insert(descriptor.entity_type().to_string(), Arc::clone(&descriptor));
		Ok(descriptor)
	}

	fn validate_data_types(&self, descriptor: &EntityDescriptor) -> MetadataResult<()> {
		descriptor
			.attributes()
			.values()
			.try_for_each(|attribute| self.validate_attribute_types(attribute))
	}

	fn validate_attribute_types(&self, attribute: &AttributeDescriptor) -> MetadataResult<()> {
		let declared = std::iter::once(attribute.data_type()).chain(attribute.values_type());
		for data_type in declared {
			if !self.types.contains(data_type.as_str()) {
				return Err(ValidationError::UnknownDataType {
					field: attribute.key().to_string(),
					data_type: data_type.to_string(),
				}
				.into());
			}
		}
		attribute
			.attributes()
			.into_iter()
			.flat_map(|nested| nested.values())
			.try_for_each(|sub| self.validate_attribute_types(sub))
	}

	/// Returns every entity type known to the driver.
	pub fn all_type_names(&self) -> MetadataResult<Vec<String>> {
		if let Some(names) = self.type_names.read().as_ref() {
			return Ok(names.clone());
		}
		let names = self.driver.all_type_names()?;
		*self.type_names.write() = Some(names.clone());
		Ok(names)
	}

	/// Returns `true` if `child` inherits, directly or transitively, from
	/// `parent`. A type is not its own descendant.
	pub fn is_descendant_of(&self, child: &str, parent: &str) -> MetadataResult<bool> {
		let mut current = self.resolve(child)?;
		while let Some(ancestor) = current.extends() {
			if ancestor == parent {
				return Ok(true);
			}
			current = self.resolve(ancestor)?;
		}
		Ok(false)
	}

	/// Returns `true` if `child` directly extends `parent`.
	pub fn is_child_of(&self, child: &str, parent: &str) -> MetadataResult<bool> {
		Ok(self.resolve(child)?.extends() == Some(parent))
	}

	/// Returns `true` if `parent` appears anywhere in the chain `child` extends.
	pub fn is_ancestor_of(&self, parent: &str, child: &str) -> MetadataResult<bool> {
		self.is_descendant_of(child, parent)
	}

	/// Resolves a descriptor by its wire type name.
	pub fn resolve_external(&self, external_type: &str) -> MetadataResult<Arc<EntityDescriptor>> {
		let known = self.external_types.read().get(external_type).cloned();
		if let Some(entity_type) = known {
			return self.resolve(&entity_type);
		}
		for entity_type in self.all_type_names()? {
			let descriptor = self.resolve(&entity_type)?;
			self.external_types
				.write()
				.insert(descriptor.external_type().to_string(), entity_type);
			if descriptor.external_type() == external_type {
				return Ok(descriptor);
			}
		}
		Err(MetadataError::NotFound(external_type.to_string()))
	}

	/// Drops the in-memory layer; the external cache is untouched.
	pub fn clear_memory(&self) {
		self.memory.write().clear();
		self.external_types.write().clear();
		*self.type_names.write() = None;
	}

	/// Removes `entity_type` from memory and from the external cache.
	///
	/// Returns whether the external cache held an entry. The cache is
	/// consulted even while disabled.
	pub fn evict(&self, entity_type: &str) -> MetadataResult<bool> {
		self.memory.write().remove(entity_type);
		match &self.cache {
			Some(cache) => cache.evict(entity_type),
			None => Ok(false),
		}
	}
}

impl fmt::Debug for MetadataRegistry {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("MetadataRegistry")
			.field("formatter", &self.formatter)
			.field("has_cache", &self.has_cache())
			.field("resolved", &self.memory.read().len())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::descriptor::RelationshipDescriptor;
	use crate::driver::InMemoryDriver;
	use hyperdoc_core::DataType;
	use parking_lot::Mutex;
	use rstest::{fixture, rstest};
	use std::collections::HashMap;

	/// Cache recording every call, backed by a map.
	#[derive(Default)]
	struct RecordingCache {
		entries: Mutex<HashMap<String, EntityDescriptor>>,
		puts: Mutex<Vec<String>>,
	}

	impl MetadataCache for Arc<RecordingCache> {
		fn load(&self, entity_type: &str) -> MetadataResult<Option<EntityDescriptor>> {
			Ok(self.entries.lock().get(entity_type).cloned())
		}

		fn put(&self, descriptor: &EntityDescriptor) -> MetadataResult<()> {
			self.puts.lock().push(descriptor.entity_type().to_string());
			self.entries
				.lock()
				.insert(descriptor.entity_type().to_string(), descriptor.clone());
			Ok(())
		}

		fn evict(&self, entity_type: &str) -> MetadataResult<bool> {
			Ok(self.entries.lock().remove(entity_type).is_some())
		}
	}

	fn attr(key: &str) -> AttributeDescriptor {
		AttributeDescriptor::new(key, DataType::String).unwrap()
	}

	#[fixture]
	fn driver() -> InMemoryDriver {
		InMemoryDriver::new()
			.with_descriptor(
				EntityDescriptor::new("thing")
					.unwrap()
					.with_abstract(true)
					.with_attribute(attr("name"))
					.unwrap(),
			)
			.with_descriptor(
				EntityDescriptor::new("animal")
					.unwrap()
					.with_extends("thing")
					.unwrap()
					.with_polymorphic(true)
					.with_attribute(attr("species"))
					.unwrap()
					.with_relationship(RelationshipDescriptor::one("owner", "person").unwrap())
					.unwrap(),
			)
			.with_descriptor(
				EntityDescriptor::new("dog")
					.unwrap()
					.with_extends("animal")
					.unwrap()
					.with_attribute(attr("good_boy"))
					.unwrap(),
			)
			.with_descriptor(EntityDescriptor::new("person").unwrap())
	}

	fn registry(driver: InMemoryDriver) -> MetadataRegistry {
		let config = Configuration::default();
		MetadataRegistry::new(driver, Arc::new(TypeRegistry::new(&config)), &config)
	}

	#[rstest]
	fn test_resolve_merges_hierarchy(driver: InMemoryDriver) {
		let registry = registry(driver);

		let dog = registry.resolve("dog").unwrap();

		let keys: Vec<&str> = dog.attributes().keys().map(String::as_str).collect();
		assert_eq!(keys, vec!["good_boy", "name", "species"]);
		assert!(dog.relationship("owner").is_some());
		assert!(!dog.is_abstract());
		assert!(!dog.is_polymorphic());
		assert_eq!(dog.extends(), Some("animal"));
		assert_eq!(dog.attribute("good_boy").unwrap().external_key(), "goodBoy");
	}

	#[rstest]
	fn test_intermediate_levels_are_fully_merged(driver: InMemoryDriver) {
		// Arrange
		let registry = registry(driver);

		// Act
		registry.resolve("dog").unwrap();
		let animal = registry.resolve("animal").unwrap();

		// Assert
		assert!(animal.attribute("name").is_some());
		assert!(animal.attribute("good_boy").is_none());
		assert!(animal.is_polymorphic());
	}

	#[rstest]
	fn test_resolve_is_idempotent(driver: InMemoryDriver) {
		let registry = registry(driver);

		let first = registry.resolve("dog").unwrap();
		registry.clear_memory();
		let second = registry.resolve("dog").unwrap();

		assert_eq!(*first, *second);
	}

	#[rstest]
	fn test_missing_level_fails(driver: InMemoryDriver) {
		let registry = registry(driver.with_descriptor(
			EntityDescriptor::new("cat")
				.unwrap()
				.with_extends("feline")
				.unwrap(),
		));

		assert!(matches!(
			registry.resolve("cat"),
			Err(MetadataError::NotFound(ref t)) if t == "feline"
		));
	}

	#[rstest]
	fn test_unknown_data_type_rejected() {
		let registry = registry(
			InMemoryDriver::new().with_descriptor(
				EntityDescriptor::new("invoice")
					.unwrap()
					.with_attribute(AttributeDescriptor::new("total", DataType::from("money")).unwrap())
					.unwrap(),
			),
		);

		assert!(matches!(
			registry.resolve("invoice"),
			Err(MetadataError::Validation(ValidationError::UnknownDataType { .. }))
		));
	}

	#[rstest]
	fn test_unknown_values_type_rejected() {
		let registry = registry(
			InMemoryDriver::new().with_descriptor(
				EntityDescriptor::new("invoice")
					.unwrap()
					.with_attribute(AttributeDescriptor::array("lines", DataType::from("money")).unwrap())
					.unwrap(),
			),
		);

		assert!(registry.resolve("invoice").is_err());
	}

	#[rstest]
	fn test_cache_receives_every_level(driver: InMemoryDriver) {
		// Arrange
		let cache = Arc::new(RecordingCache::default());
		let registry = registry(driver).with_cache(Arc::clone(&cache));

		// Act
		registry.resolve("dog").unwrap();

		// Assert
		assert_eq!(*cache.puts.lock(), vec!["thing", "animal", "dog"]);
		let cached_animal = cache.entries.lock().get("animal").cloned().unwrap();
		assert!(cached_animal.attribute("name").is_some());
	}

	#[rstest]
	fn test_cache_hit_skips_driver() {
		// Arrange
		let cache = Arc::new(RecordingCache::default());
		let cached = EntityDescriptor::new("ghost")
			.unwrap()
			.with_attribute(attr("boo"))
			.unwrap();
		cache.put(&cached).unwrap();
		let registry = registry(InMemoryDriver::new()).with_cache(Arc::clone(&cache));

		// Act
		let resolved = registry.resolve("ghost").unwrap();

		// Assert
		assert!(resolved.attribute("boo").is_some());
	}

	#[rstest]
	fn test_disabled_cache_is_bypassed(driver: InMemoryDriver) {
		let cache = Arc::new(RecordingCache::default());
		let registry = registry(driver).with_cache(Arc::clone(&cache));
		registry.enable_cache(false);

		registry.resolve("person").unwrap();

		assert!(!registry.has_cache());
		assert!(cache.puts.lock().is_empty());
	}

	#[rstest]
	#[case("dog", "animal", true)]
	#[case("dog", "thing", true)]
	#[case("animal", "dog", false)]
	#[case("dog", "dog", false)]
	#[case("person", "thing", false)]
	fn test_is_descendant_of(
		driver: InMemoryDriver,
		#[case] child: &str,
		#[case] parent: &str,
		#[case] expected: bool,
	) {
		let registry = registry(driver);
		assert_eq!(registry.is_descendant_of(child, parent).unwrap(), expected);
	}

	#[rstest]
	fn test_is_child_of(driver: InMemoryDriver) {
		let registry = registry(driver);
		assert!(registry.is_child_of("dog", "animal").unwrap());
		assert!(!registry.is_child_of("dog", "thing").unwrap());
		assert!(registry.is_ancestor_of("thing", "dog").unwrap());
	}

	#[rstest]
	fn test_resolve_external() {
		let registry = registry(
			InMemoryDriver::new()
				.with_descriptor(EntityDescriptor::new("blog/blog_post").unwrap()),
		);

		let descriptor = registry.resolve_external("blog_blog-post").unwrap();

		assert_eq!(descriptor.entity_type(), "blog/blog_post");
		assert!(matches!(
			registry.resolve_external("nope"),
			Err(MetadataError::NotFound(_))
		));
	}

	#[rstest]
	fn test_all_type_names(driver: InMemoryDriver) {
		let registry = registry(driver);
		assert_eq!(
			registry.all_type_names().unwrap(),
			vec!["animal", "dog", "person", "thing"]
		);
	}
}
