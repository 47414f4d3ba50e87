use std::sync::Arc;

use hyperdoc_core::{Configuration, TypeRegistry, ValidationResult};
use hyperdoc_metadata::{CacheWarmer, MetadataDriver, MetadataRegistry};
use hyperdoc_serializer::{Hydrator, ResourceFactory, Serializer};

/// One configuration wired to one metadata registry.
///
/// Hands out serializers, factories and hydrators that share the registry,
/// so descriptors resolved by one are cached for all of them.
#[derive(Debug, Clone)]
pub struct Hyperdoc {
	config: Configuration,
	metadata: Arc<MetadataRegistry>,
}

impl Hyperdoc {
	/// Validates `config` and builds a registry over `driver` with the
	/// built-in type converters.
	pub fn new(config: Configuration, driver: impl MetadataDriver + 'static) -> ValidationResult<Self> {
		config.validate()?;
		let types = Arc::new(TypeRegistry::new(&config));
		let registry = MetadataRegistry::new(driver, types, &config);
		Self::from_registry(config, registry)
	}

	/// Uses a registry assembled by the caller, e.g. with custom converters
	/// or an external cache.
	pub fn from_registry(config: Configuration, registry: MetadataRegistry) -> ValidationResult<Self> {
		config.validate()?;
		tracing::debug!(
			api_host = %config.api_host,
			debug = config.debug,
			cached = registry.has_cache(),
			"hyperdoc context created"
		);
		Ok(Self {
			config,
			metadata: Arc::new(registry),
		})
	}

	/// The validated configuration.
	pub fn config(&self) -> &Configuration {
		&self.config
	}

	/// The shared metadata registry.
	pub fn metadata(&self) -> &Arc<MetadataRegistry> {
		&self.metadata
	}

	/// A serializer over the shared registry.
	pub fn serializer(&self) -> Serializer {
		Serializer::new(Arc::clone(&self.metadata), &self.config)
	}

	/// A resource factory over the shared registry.
	pub fn factory(&self) -> ResourceFactory {
		ResourceFactory::new(Arc::clone(&self.metadata))
	}

	/// A hydrator over the shared registry.
	pub fn hydrator(&self) -> Hydrator {
		Hydrator::new(Arc::clone(&self.metadata))
	}

	/// A cache warmer for the shared registry.
	pub fn warmer(&self) -> CacheWarmer<'_> {
		CacheWarmer::new(&self.metadata)
	}
}
