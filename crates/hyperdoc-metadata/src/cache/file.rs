use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use super::{CacheFormat, MetadataCache};
use crate::descriptor::EntityDescriptor;
use crate::error::{MetadataError, MetadataResult};
use crate::formatter::EntityFormatter;

/// Stores one descriptor file per entity type in a directory.
///
/// Writes go to a temporary file in the same directory which is then renamed
/// over the target, so readers never observe a partial file.
///
/// # Examples
///
/// ```
/// use hyperdoc_metadata::cache::{CacheFormat, FileCache, MetadataCache};
/// use hyperdoc_metadata::descriptor::EntityDescriptor;
///
/// let dir = tempfile::tempdir().unwrap();
/// let cache = FileCache::new(dir.path()).unwrap().with_format(CacheFormat::MessagePack);
///
/// cache.put(&EntityDescriptor::new("person").unwrap()).unwrap();
/// assert!(cache.load("person").unwrap().is_some());
/// assert!(cache.evict("person").unwrap());
/// ```
#[derive(Debug, Clone)]
pub struct FileCache {
	directory: PathBuf,
	format: CacheFormat,
}

impl FileCache {
	/// Creates a cache over an existing directory.
	pub fn new(directory: impl Into<PathBuf>) -> MetadataResult<Self> {
		let directory = directory.into();
		if !directory.is_dir() {
			return Err(MetadataError::Cache(format!(
				"cache directory {} does not exist or is not a directory",
				directory.display()
			)));
		}
		Ok(Self {
			directory,
			format: CacheFormat::default(),
		})
	}

	/// Sets the encoding of cache files.
	pub fn with_format(mut self, format: CacheFormat) -> Self {
		self.format = format;
		self
	}

	/// Directory holding the cache files.
	pub fn directory(&self) -> &Path {
		&self.directory
	}

	fn path_for(&self, entity_type: &str) -> PathBuf {
		self.directory.join(format!(
			"{}.{}",
			EntityFormatter::file_base_name(entity_type),
			self.format.extension()
		))
	}
}

impl MetadataCache for FileCache {
	fn load(&self, entity_type: &str) -> MetadataResult<Option<EntityDescriptor>> {
		let bytes = match std::fs::read(self.path_for(entity_type)) {
			Ok(bytes) => bytes,
			Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
			Err(e) => return Err(e.into()),
		};
		self.format.decode(&bytes).map(Some)
	}

	fn put(&self, descriptor: &EntityDescriptor) -> MetadataResult<()> {
		let bytes = self.format.encode(descriptor)?;
		let mut temp = NamedTempFile::new_in(&self.directory)?;
		temp.write_all(&bytes)?;
		temp.persist(self.path_for(descriptor.entity_type()))
			.map_err(|e| MetadataError::Io(e.error))?;
		Ok(())
	}

	fn evict(&self, entity_type: &str) -> MetadataResult<bool> {
		match std::fs::remove_file(self.path_for(entity_type)) {
			Ok(()) => Ok(true),
			Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
			Err(e) => Err(e.into()),
		}
	}
}
