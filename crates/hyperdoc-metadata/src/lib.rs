//! Entity metadata for hyperdoc.
//!
//! This crate turns mapping sources into fully merged [`EntityDescriptor`]s:
//!
//! - **Descriptors**: [`EntityDescriptor`] with its attribute and relationship
//!   descriptors, single-parent inheritance and a polymorphism flag
//! - **Drivers**: [`MetadataDriver`] implementations that read single-level
//!   descriptors ([`InMemoryDriver`], and [`YamlFileDriver`] with the `yaml` feature)
//! - **Caches**: [`MetadataCache`] backends ([`FileCache`], and `RedisCache`
//!   with the `redis-cache` feature)
//! - **Registry**: [`MetadataRegistry`], which walks hierarchies, merges,
//!   validates data types, formats external names and caches the result
//!
//! # Features
//!
//! - `yaml` - YAML mapping-file driver (enabled by default)
//! - `redis-cache` - Redis descriptor cache
//! - `full` - All features enabled
//!
//! # Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use hyperdoc_core::{Configuration, TypeRegistry};
//! use hyperdoc_metadata::{FileCache, MetadataRegistry, YamlFileDriver};
//!
//! let config = Configuration::from_toml_file("hyperdoc.toml")?;
//! let types = Arc::new(TypeRegistry::new(&config));
//! let registry = MetadataRegistry::new(YamlFileDriver::from_directory("mappings"), types, &config)
//! 	.with_cache(FileCache::new("var/cache/hyperdoc")?);
//!
//! let article = registry.resolve("blog/article")?;
//! ```

pub mod cache;
pub mod descriptor;
pub mod driver;
pub mod error;
pub mod formatter;
pub mod registry;
pub mod warmer;

pub use cache::{CacheFormat, FileCache, MetadataCache};
#[cfg(feature = "redis-cache")]
pub use cache::{RedisCache, RedisCacheOptions};
pub use descriptor::{
	AttributeDescriptor, Cardinality, EntityDescriptor, FieldDescriptor, RelationshipDescriptor,
};
pub use driver::{InMemoryDriver, MetadataDriver};
#[cfg(feature = "yaml")]
pub use driver::{FileLocator, YamlFileDriver};
pub use error::{MetadataError, MetadataResult};
pub use formatter::EntityFormatter;
pub use registry::MetadataRegistry;
pub use warmer::CacheWarmer;
