//! # hyperdoc
//!
//! Metadata-driven JSON:API document serialization.
//!
//! Entity metadata (attributes, relationships, inheritance, polymorphism) is
//! loaded from a driver, merged across the hierarchy and cached. Documents
//! built from that metadata serialize into JSON:API wire structures with
//! formatted type names and keys, links, and compound-document `included`
//! resources.
//!
//! ## Crates
//!
//! - [`core`] - configuration, inflection, member-name validation, type converters
//! - [`metadata`] - descriptors, drivers, caches, the metadata registry
//! - [`serializer`] - document model, factory, serializer, hydrator
//!
//! ## Feature Flags
//!
//! - `yaml` (default) - YAML mapping-file metadata driver
//! - `redis-cache` - Redis-backed descriptor cache
//! - `full` - All features enabled
//!
//! ## Quick Example
//!
//! ```rust
//! use hyperdoc::prelude::*;
//! use serde_json::json;
//!
//! let driver = InMemoryDriver::new().with_descriptor(
//! 	EntityDescriptor::new("article").unwrap()
//! 		.with_attribute(AttributeDescriptor::new("title", DataType::String).unwrap()).unwrap(),
//! );
//! let hyperdoc = Hyperdoc::new(Configuration::default(), driver).unwrap();
//!
//! let factory = hyperdoc.factory();
//! let mut document = factory.create_document("article", DocumentKind::One).unwrap();
//! let mut article = factory.create_resource("article", "1").unwrap();
//! factory.apply_attribute(&mut article, "title", &json!("Hello")).unwrap();
//! factory.apply_resource(&mut document, article).unwrap();
//!
//! let wire = hyperdoc.serializer().serialize(&document).unwrap();
//! assert_eq!(wire["data"]["attributes"]["title"], json!("Hello"));
//! ```

mod context;

pub use context::Hyperdoc;

pub use hyperdoc_core as core;
pub use hyperdoc_metadata as metadata;
pub use hyperdoc_serializer as serializer;

pub mod prelude {
	pub use crate::Hyperdoc;

	pub use hyperdoc_core::{
		Configuration, DataType, NamespaceDelimiter, StringFormat, TypeConverter, TypeRegistry,
	};

	pub use hyperdoc_metadata::{
		AttributeDescriptor, CacheFormat, CacheWarmer, Cardinality, EntityDescriptor, FileCache,
		InMemoryDriver, MetadataCache, MetadataDriver, MetadataError, MetadataRegistry,
		RelationshipDescriptor,
	};

	#[cfg(feature = "yaml")]
	pub use hyperdoc_metadata::YamlFileDriver;

	#[cfg(feature = "redis-cache")]
	pub use hyperdoc_metadata::{RedisCache, RedisCacheOptions};

	pub use hyperdoc_serializer::{
		Document, DocumentKind, Hydrator, PrimaryData, Relationship, RelationshipData, Resource,
		ResourceCollection, ResourceFactory, Serializer, SerializerError, SerializerResult,
	};
}
