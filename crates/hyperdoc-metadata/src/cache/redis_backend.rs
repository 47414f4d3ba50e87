use parking_lot::Mutex;
use redis::Commands;

use super::{CacheFormat, MetadataCache};
use crate::descriptor::EntityDescriptor;
use crate::error::{MetadataError, MetadataResult};

/// Default key prefix.
pub const DEFAULT_PREFIX: &str = "Hyperdoc";

/// Default time-to-live, in seconds.
pub const DEFAULT_TTL: u64 = 3600;

impl From<redis::RedisError> for MetadataError {
	fn from(err: redis::RedisError) -> Self {
		MetadataError::Cache(err.to_string())
	}
}

/// Key layout and storage settings of a [`RedisCache`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedisCacheOptions {
	prefix: String,
	ttl: u64,
	format: CacheFormat,
}

impl Default for RedisCacheOptions {
	fn default() -> Self {
		Self {
			prefix: DEFAULT_PREFIX.to_string(),
			ttl: DEFAULT_TTL,
			format: CacheFormat::MessagePack,
		}
	}
}

impl RedisCacheOptions {
	/// Sets the key prefix.
	pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
		self.prefix = prefix.into();
		self
	}

	/// Sets the entry lifetime in seconds.
	pub fn with_ttl(mut self, ttl: u64) -> Self {
		self.ttl = ttl;
		self
	}

	/// Sets the encoding of stored descriptors.
	pub fn with_format(mut self, format: CacheFormat) -> Self {
		self.format = format;
		self
	}

	/// Key prefix.
	pub fn prefix(&self) -> &str {
		&self.prefix
	}

	/// Entry lifetime in seconds.
	pub fn ttl(&self) -> u64 {
		self.ttl
	}

	/// Encoding of stored descriptors.
	pub fn format(&self) -> CacheFormat {
		self.format
	}

	/// Cache key for an entity type: `<prefix>::<entity type>`.
	pub fn key(&self, entity_type: &str) -> String {
		format!("{}::{}", self.prefix, entity_type)
	}
}

/// Redis-backed descriptor cache.
///
/// Keys follow [`RedisCacheOptions::key`]; every write refreshes the TTL.
pub struct RedisCache {
	connection: Mutex<redis::Connection>,
	options: RedisCacheOptions,
}

impl RedisCache {
	/// Connects to the server at `url`, e.g. `redis://127.0.0.1/`.
	pub fn connect(url: &str) -> MetadataResult<Self> {
		let client = redis::Client::open(url)?;
		Ok(Self::new(client.get_connection()?))
	}

	/// Wraps an open connection with the default prefix, TTL and format.
	pub fn new(connection: redis::Connection) -> Self {
		Self::with_options(connection, RedisCacheOptions::default())
	}

	/// Wraps an open connection with explicit options.
	pub fn with_options(connection: redis::Connection, options: RedisCacheOptions) -> Self {
		Self {
			connection: Mutex::new(connection),
			options,
		}
	}

	/// Sets the key prefix.
	pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
		self.options = self.options.with_prefix(prefix);
		self
	}

	/// Sets the entry lifetime in seconds.
	pub fn with_ttl(mut self, ttl: u64) -> Self {
		self.options = self.options.with_ttl(ttl);
		self
	}

	/// Sets the encoding of stored descriptors.
	pub fn with_format(mut self, format: CacheFormat) -> Self {
		self.options = self.options.with_format(format);
		self
	}

	/// Current key layout and storage settings.
	pub fn options(&self) -> &RedisCacheOptions {
		&self.options
	}

	/// Cache key for an entity type.
	pub fn key(&self, entity_type: &str) -> String {
		self.options.key(entity_type)
	}
}

impl MetadataCache for RedisCache {
	fn load(&self, entity_type: &str) -> MetadataResult<Option<EntityDescriptor>> {
		let bytes: Option<Vec<u8>> = self.connection.lock().get(self.key(entity_type))?;
		bytes.map(|bytes| self.options.format.decode(&bytes)).transpose()
	}

	fn put(&self, descriptor: &EntityDescriptor) -> MetadataResult<()> {
		let bytes = self.options.format.encode(descriptor)?;
		let _: () = self
			.connection
			.lock()
			.set_ex(self.key(descriptor.entity_type()), bytes, self.options.ttl)?;
		Ok(())
	}

	fn evict(&self, entity_type: &str) -> MetadataResult<bool> {
		let removed: i64 = self.connection.lock().del(self.key(entity_type))?;
		Ok(removed > 0)
	}
}
