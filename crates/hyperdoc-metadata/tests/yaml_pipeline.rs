//! YAML mappings resolved through the registry with a file cache.

#![cfg(feature = "yaml")]

use std::fs;
use std::path::Path;
use std::sync::Arc;

use hyperdoc_core::{Configuration, DataType, StringFormat, TypeRegistry};
use hyperdoc_metadata::{
	CacheFormat, CacheWarmer, FileCache, MetadataCache, MetadataError, MetadataRegistry,
	YamlFileDriver,
};
use proptest::prelude::*;
use rstest::{fixture, rstest};
use tempfile::TempDir;

fn write(dir: &Path, file: &str, content: &str) {
	fs::write(dir.join(file), content).unwrap();
}

fn build_mappings() -> TempDir {
	let dir = TempDir::new().unwrap();
	write(
		dir.path(),
		"content.yml",
		r#"
content:
  entity: { abstract: true, polymorphic: true }
  attributes:
    title: { type: string }
    published_at: { type: date }
  relationships:
    author: { type: one, entity: person }
"#,
	);
	write(
		dir.path(),
		"article.yml",
		r#"
article:
  entity: { extends: content }
  attributes:
    body: { type: string }
    word_count: { type: integer }
  relationships:
    tags: { type: many, entity: tag }
"#,
	);
	write(
		dir.path(),
		"feature.yml",
		r#"
feature:
  entity: { extends: article }
  attributes:
    headline_image: { type: string, serialize: false }
"#,
	);
	write(dir.path(), "person.yml", "person:\n  attributes:\n    name: { type: string }\n");
	write(dir.path(), "tag.yml", "tag: {}\n");
	dir
}

#[fixture]
fn mappings() -> TempDir {
	build_mappings()
}

fn registry(mappings: &Path, config: &Configuration) -> MetadataRegistry {
	MetadataRegistry::new(
		YamlFileDriver::from_directory(mappings),
		Arc::new(TypeRegistry::new(config)),
		config,
	)
}

#[rstest]
fn test_three_level_hierarchy(mappings: TempDir) {
	// Arrange
	let registry = registry(mappings.path(), &Configuration::default());

	// Act
	let feature = registry.resolve("feature").unwrap();

	// Assert
	let attributes: Vec<&str> = feature.attributes().keys().map(String::as_str).collect();
	let relationships: Vec<&str> = feature.relationships().keys().map(String::as_str).collect();
	assert_eq!(
		attributes,
		vec!["body", "headline_image", "published_at", "title", "word_count"]
	);
	assert_eq!(relationships, vec!["author", "tags"]);
	assert!(!feature.is_abstract());
	assert!(!feature.is_polymorphic());
	assert_eq!(feature.extends(), Some("article"));
	assert!(!feature.attribute("headline_image").unwrap().should_serialize());
	assert_eq!(
		feature.attribute("published_at").unwrap().data_type(),
		&DataType::Date
	);
}

#[rstest]
fn test_external_names_follow_configuration(mappings: TempDir) {
	let config = Configuration::default()
		.with_field_key_format(StringFormat::Dash)
		.with_entity_name_format(StringFormat::StudlyCaps)
		.unwrap();
	let registry = registry(mappings.path(), &config);

	let article = registry.resolve("article").unwrap();

	assert_eq!(article.external_type(), "Article");
	assert_eq!(article.attribute("word_count").unwrap().external_key(), "word-count");
}

#[rstest]
fn test_file_cache_is_populated_per_level(mappings: TempDir) {
	// Arrange
	let cache_dir = TempDir::new().unwrap();
	let config = Configuration::default();
	let registry = registry(mappings.path(), &config).with_cache(
		FileCache::new(cache_dir.path())
			.unwrap()
			.with_format(CacheFormat::MessagePack),
	);

	// Act
	let feature = registry.resolve("feature").unwrap();

	// Assert
	let reader = FileCache::new(cache_dir.path())
		.unwrap()
		.with_format(CacheFormat::MessagePack);
	let cached_article = reader.load("article").unwrap().unwrap();
	assert!(cached_article.attribute("title").is_some());
	assert!(cached_article.attribute("headline_image").is_none());
	assert_eq!(reader.load("feature").unwrap().as_ref(), Some(&*feature));
}

#[rstest]
fn test_cached_descriptors_survive_missing_mappings(mappings: TempDir) {
	// Arrange
	let cache_dir = TempDir::new().unwrap();
	let config = Configuration::default();
	let warm_registry =
		registry(mappings.path(), &config).with_cache(FileCache::new(cache_dir.path()).unwrap());
	CacheWarmer::new(&warm_registry).warm().unwrap();
	let empty_mappings = TempDir::new().unwrap();

	// Act
	let cold_registry = registry(empty_mappings.path(), &config)
		.with_cache(FileCache::new(cache_dir.path()).unwrap());
	let article = cold_registry.resolve("article").unwrap();

	// Assert
	assert!(article.attribute("title").is_some());
	assert!(matches!(
		registry(empty_mappings.path(), &config).resolve("article"),
		Err(MetadataError::NotFound(_))
	));
}

#[rstest]
fn test_polymorphic_descendants(mappings: TempDir) {
	let registry = registry(mappings.path(), &Configuration::default());

	assert!(registry.resolve("content").unwrap().is_polymorphic());
	assert!(registry.is_descendant_of("feature", "content").unwrap());
	assert!(registry.is_descendant_of("article", "content").unwrap());
	assert!(!registry.is_descendant_of("person", "content").unwrap());
}

proptest! {
	#[test]
	fn prop_resolve_is_idempotent(index in 0usize..5) {
		let dir = build_mappings();
		let registry = registry(dir.path(), &Configuration::default());
		let types = registry.all_type_names().unwrap();
		let entity_type = &types[index % types.len()];

		let first = registry.resolve(entity_type).unwrap();
		registry.clear_memory();
		let second = registry.resolve(entity_type).unwrap();

		prop_assert_eq!(first.attributes(), second.attributes());
		prop_assert_eq!(first.relationships(), second.relationships());
	}
}
