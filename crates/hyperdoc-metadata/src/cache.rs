//! External descriptor caches.
//!
//! The [`MetadataRegistry`](crate::MetadataRegistry) keeps an in-memory map of
//! resolved descriptors; a [`MetadataCache`] is the optional second level that
//! survives process restarts.
//!
//! | Backend | Storage | Feature |
//! |---|---|---|
//! | [`FileCache`] | one file per type, JSON or MessagePack | - |
//! | [`RedisCache`] | `SETEX` with TTL | `redis-cache` |

mod file;
#[cfg(feature = "redis-cache")]
mod redis_backend;

pub use file::FileCache;
#[cfg(feature = "redis-cache")]
pub use redis_backend::{RedisCache, RedisCacheOptions};

use serde::{Deserialize, Serialize};

use crate::descriptor::EntityDescriptor;
use crate::error::MetadataResult;

/// Key-value persistence for entity descriptors.
pub trait MetadataCache: Send + Sync {
	/// Returns the cached descriptor for `entity_type`, if any.
	fn load(&self, entity_type: &str) -> MetadataResult<Option<EntityDescriptor>>;

	/// Stores a descriptor under its entity type.
	fn put(&self, descriptor: &EntityDescriptor) -> MetadataResult<()>;

	/// Removes a descriptor. Returns `true` if something was removed.
	fn evict(&self, entity_type: &str) -> MetadataResult<bool>;
}

/// Payload encoding used by the cache backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheFormat {
	/// Human-readable JSON.
	#[default]
	Json,
	/// Compact binary MessagePack.
	MessagePack,
}

impl CacheFormat {
	/// File extension for this format.
	pub fn extension(&self) -> &'static str {
		match self {
			Self::Json => "json",
			Self::MessagePack => "msgpack",
		}
	}

	pub(crate) fn encode(&self, descriptor: &EntityDescriptor) -> MetadataResult<Vec<u8>> {
		Ok(match self {
			Self::Json => serde_json::to_vec(descriptor)?,
			// Named encoding: descriptors skip absent optional fields
			Self::MessagePack => rmp_serde::to_vec_named(descriptor)?,
		})
	}

	pub(crate) fn decode(&self, bytes: &[u8]) -> MetadataResult<EntityDescriptor> {
		Ok(match self {
			Self::Json => serde_json::from_slice(bytes)?,
			Self::MessagePack => rmp_serde::from_slice(bytes)?,
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::descriptor::{AttributeDescriptor, RelationshipDescriptor};
	use hyperdoc_core::DataType;
	use rstest::rstest;

	#[rstest]
	#[case(CacheFormat::Json)]
	#[case(CacheFormat::MessagePack)]
	fn test_format_preserves_descriptor(#[case] format: CacheFormat) {
		let descriptor = EntityDescriptor::new("article")
			.unwrap()
			.with_polymorphic(true)
			.with_attribute(AttributeDescriptor::array("tags", DataType::String).unwrap())
			.unwrap()
			.with_relationship(RelationshipDescriptor::one("author", "person").unwrap())
			.unwrap();

		let bytes = format.encode(&descriptor).unwrap();

		assert_eq!(format.decode(&bytes).unwrap(), descriptor);
	}

	#[rstest]
	fn test_decode_garbage() {
		assert!(CacheFormat::Json.decode(b"not json").is_err());
		assert!(CacheFormat::MessagePack.decode(&[0xc1]).is_err());
	}
}
