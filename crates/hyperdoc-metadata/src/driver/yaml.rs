//! YAML mapping-file driver.
//!
//! Each entity type lives in its own `<file-base-name>.yml` file, keyed by the
//! internal type:
//!
//! ```yaml
//! blog/post:
//!   entity:
//!     extends: content
//!     polymorphic: false
//!   attributes:
//!     title: { type: string }
//!     tags: { type: array, values_type: string }
//!     seo:
//!       type: object
//!       attributes:
//!         keywords: { type: string }
//!   relationships:
//!     author: { type: one, entity: person }
//!     comments: { type: many, entity: comment, inverse: true }
//! ```
//!
//! The file for `blog/post` is `blog.post.yml`; it may sit anywhere below one
//! of the configured directories.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use hyperdoc_core::DataType;
use parking_lot::RwLock;
use serde::Deserialize;
use walkdir::WalkDir;

use super::MetadataDriver;
use crate::descriptor::{AttributeDescriptor, Cardinality, EntityDescriptor, RelationshipDescriptor};
use crate::error::{MetadataError, MetadataResult};
use crate::formatter::EntityFormatter;

const DEFAULT_EXTENSION: &str = "yml";

fn default_true() -> bool {
	true
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct EntityMapping {
	#[serde(default)]
	entity: Option<EntitySection>,
	#[serde(default)]
	attributes: Option<BTreeMap<String, AttributeMapping>>,
	#[serde(default)]
	relationships: Option<BTreeMap<String, RelationshipMapping>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct EntitySection {
	#[serde(default, rename = "abstract")]
	is_abstract: bool,
	#[serde(default)]
	polymorphic: bool,
	#[serde(default)]
	extends: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct AttributeMapping {
	#[serde(rename = "type")]
	data_type: String,
	#[serde(default = "default_true")]
	serialize: bool,
	#[serde(default)]
	values_type: Option<String>,
	#[serde(default)]
	attributes: Option<BTreeMap<String, AttributeMapping>>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RelationshipMapping {
	#[serde(rename = "type")]
	cardinality: String,
	entity: String,
	#[serde(default)]
	inverse: bool,
	#[serde(default = "default_true")]
	serialize: bool,
}

impl AttributeMapping {
	fn to_descriptor(&self, key: &str) -> MetadataResult<AttributeDescriptor> {
		let data_type = DataType::from(self.data_type.as_str());
		let mut descriptor = match (&data_type, &self.values_type) {
			(DataType::Array, Some(values_type)) => {
				AttributeDescriptor::array(key, DataType::from(values_type.as_str()))?
			}
			(DataType::Object, _) => AttributeDescriptor::object(key)?,
			_ => AttributeDescriptor::new(key, data_type)?,
		};
		for (sub_key, sub) in self.attributes.iter().flatten() {
			descriptor.add_attribute(sub.to_descriptor(sub_key)?)?;
		}
		Ok(descriptor.with_should_serialize(self.serialize))
	}
}

impl RelationshipMapping {
	fn to_descriptor(&self, key: &str) -> MetadataResult<RelationshipDescriptor> {
		let cardinality: Cardinality = self.cardinality.parse()?;
		Ok(
			RelationshipDescriptor::new(key, cardinality, self.entity.as_str())?
				.with_inverse(self.inverse)
				.with_should_serialize(self.serialize),
		)
	}
}

impl EntityMapping {
	fn to_descriptor(&self, entity_type: &str) -> MetadataResult<EntityDescriptor> {
		let section = self.entity.as_ref();
		let mut descriptor = EntityDescriptor::new(entity_type)?
			.with_abstract(section.is_some_and(|s| s.is_abstract))
			.with_polymorphic(section.is_some_and(|s| s.polymorphic));
		if let Some(parent) = section.and_then(|s| s.extends.as_deref()) {
			descriptor = descriptor.with_extends(parent)?;
		}
		for (key, attribute) in self.attributes.iter().flatten() {
			descriptor.add_attribute(attribute.to_descriptor(key)?)?;
		}
		for (key, relationship) in self.relationships.iter().flatten() {
			descriptor.add_relationship(relationship.to_descriptor(key)?)?;
		}
		Ok(descriptor)
	}
}

/// Finds mapping files below a set of directories.
#[derive(Debug, Clone)]
pub struct FileLocator {
	directories: Vec<PathBuf>,
	extension: String,
}

impl FileLocator {
	/// Searches `directories` for `.yml` files.
	pub fn new<I, P>(directories: I) -> Self
	where
		I: IntoIterator<Item = P>,
		P: Into<PathBuf>,
	{
		Self {
			directories: directories.into_iter().map(Into::into).collect(),
			extension: DEFAULT_EXTENSION.to_string(),
		}
	}

	/// Sets the mapping-file extension, without the dot.
	pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
		self.extension = extension.into();
		self
	}

	/// Directories searched for mapping files.
	pub fn directories(&self) -> &[PathBuf] {
		&self.directories
	}

	fn has_extension(&self, path: &Path) -> bool {
		path.extension().and_then(|s| s.to_str()) == Some(self.extension.as_str())
	}

	/// Returns the mapping file for `entity_type`, if any.
	pub fn find_file_for_type(&self, entity_type: &str) -> Option<PathBuf> {
		let file_name = format!(
			"{}.{}",
			EntityFormatter::file_base_name(entity_type),
			self.extension
		);
		self.directories.iter().find_map(|dir| {
			WalkDir::new(dir)
				.follow_links(true)
				.into_iter()
				.filter_map(|e| e.ok())
				.find(|entry| entry.file_type().is_file() && entry.file_name() == file_name.as_str())
				.map(|entry| entry.into_path())
		})
	}

	/// Returns every entity type with a mapping file, sorted.
	pub fn find_all_types(&self) -> MetadataResult<Vec<String>> {
		let mut types = Vec::new();
		for dir in &self.directories {
			for entry in WalkDir::new(dir).follow_links(true) {
				let entry = entry.map_err(|e| MetadataError::Io(e.into()))?;
				let path = entry.path();
				if !entry.file_type().is_file() {
					continue;
				}
				if !self.has_extension(path) {
					tracing::warn!(
						path = %path.display(),
						"Skipping file without mapping extension"
					);
					continue;
				}
				if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
					types.push(EntityFormatter::type_from_file_base_name(stem));
				}
			}
		}
		types.sort();
		types.dedup();
		Ok(types)
	}
}

/// Driver reading one YAML mapping file per entity type.
///
/// Parsed mappings are memoized for the lifetime of the driver.
#[derive(Debug)]
pub struct YamlFileDriver {
	locator: FileLocator,
	mappings: RwLock<HashMap<String, Arc<EntityMapping>>>,
}

impl YamlFileDriver {
	/// Creates a driver reading the files `locator` finds.
	pub fn new(locator: FileLocator) -> Self {
		Self {
			locator,
			mappings: RwLock::new(HashMap::new()),
		}
	}

	/// Creates a driver over a single directory.
	pub fn from_directory(directory: impl Into<PathBuf>) -> Self {
		Self::new(FileLocator::new([directory.into()]))
	}

	/// The file locator in use.
	pub fn locator(&self) -> &FileLocator {
		&self.locator
	}

	fn mapping(&self, entity_type: &str) -> MetadataResult<Arc<EntityMapping>> {
		if let Some(mapping) = self.mappings.read().get(entity_type) {
			return Ok(Arc::clone(mapping));
		}

		let path = self
			.locator
			.find_file_for_type(entity_type)
			.ok_or_else(|| MetadataError::NotFound(entity_type.to_string()))?;
		let content = std::fs::read_to_string(&path)?;
		let mut document: BTreeMap<String, Option<EntityMapping>> =
			serde_yaml::from_str(&content)?;

		let Some(mapping) = document.remove(entity_type) else {
			tracing::warn!(
				path = %path.display(),
				entity_type,
				"Mapping file is not keyed by its entity type"
			);
			return Err(MetadataError::mapping(
				entity_type,
				format!("{} is not keyed by '{entity_type}'", path.display()),
			));
		};

		let mapping = Arc::new(mapping.unwrap_or_default());
		self.mappings
			.write()
			.insert(entity_type.to_string(), Arc::clone(&mapping));
		Ok(mapping)
	}
}

impl MetadataDriver for YamlFileDriver {
	fn load_descriptor(&self, entity_type: &str) -> MetadataResult<EntityDescriptor> {
		self.mapping(entity_type)?.to_descriptor(entity_type)
	}

	fn all_type_names(&self) -> MetadataResult<Vec<String>> {
		self.locator.find_all_types()
	}
}
