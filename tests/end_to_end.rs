//! YAML mappings through the full pipeline: registry, serializer, hydrator.

#![cfg(feature = "yaml")]

use std::fs;
use std::path::Path;
use std::sync::Arc;

use hyperdoc::core::ValidationError;
use hyperdoc::prelude::*;
use rstest::{fixture, rstest};
use serde_json::json;
use tempfile::TempDir;

fn write(dir: &Path, file: &str, content: &str) {
	fs::write(dir.join(file), content).unwrap();
}

#[fixture]
fn mappings() -> TempDir {
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
	fs::create_dir(dir.path().join("blog")).unwrap();
	write(
		&dir.path().join("blog"),
		"blog.post.yml",
		r#"
blog/post:
  entity: { extends: content }
  attributes:
    word_count: { type: integer }
    seo:
      type: object
      attributes:
        meta_title: { type: string }
  relationships:
    tags: { type: many, entity: tag }
"#,
	);
	write(dir.path(), "person.yml", "person:\n  attributes:\n    name: { type: string }\n");
	write(dir.path(), "tag.yml", "tag:\n  attributes:\n    label: { type: string }\n");
	dir
}

fn config() -> Configuration {
	Configuration::default()
		.with_api_host("api.example.com")
		.with_secure(true)
		.with_root_endpoint("/v1")
		.with_namespaces_as_resources(true)
		.with_debug(true)
}

fn post() -> Resource {
	Resource::new("blog/post", "1")
		.with_attribute("title", json!("Hello"))
		.with_attribute("published_at", json!("2024-05-01T10:00:00+00:00"))
		.with_attribute("word_count", json!("42"))
		.with_attribute("seo", json!({"meta_title": "Hello | Blog", "robots": "noindex"}))
		.with_relationship(Relationship::one(
			"author",
			Some(Resource::new("person", "9").with_attribute("name", json!("Ada"))),
		))
		.with_relationship(Relationship::many(
			"tags",
			ResourceCollection::new("tag").with_resources([Resource::new("tag", "rust")]),
		))
}

#[rstest]
fn test_serialize_namespaced_resource(mappings: TempDir) {
	// Arrange
	let hyperdoc = Hyperdoc::new(config(), YamlFileDriver::from_directory(mappings.path())).unwrap();
	let mut document = hyperdoc
		.factory()
		.create_document("blog/post", DocumentKind::One)
		.unwrap();
	hyperdoc.factory().apply_resource(&mut document, post()).unwrap();

	// Act
	let wire = hyperdoc.serializer().serialize(&document).unwrap();

	// Assert
	assert_eq!(
		wire,
		json!({
			"data": {
				"type": "blog_post",
				"id": "1",
				"attributes": {
					"title": "Hello",
					"publishedAt": "2024-05-01T10:00:00+00:00",
					"wordCount": 42,
					"seo": {"metaTitle": "Hello | Blog"},
				},
				"links": {"self": "https://api.example.com/v1/blog/post/1"},
				"relationships": {
					"author": {
						"data": {"type": "person", "id": "9"},
						"links": {
							"self": "https://api.example.com/v1/blog/post/1/relationships/author",
							"related": "https://api.example.com/v1/blog/post/1/author",
						},
					},
					"tags": {
						"data": [{"type": "tag", "id": "rust"}],
						"links": {
							"self": "https://api.example.com/v1/blog/post/1/relationships/tags",
							"related": "https://api.example.com/v1/blog/post/1/tags",
						},
					},
				},
			},
			"included": [{
				"type": "person",
				"id": "9",
				"attributes": {"name": "Ada"},
				"links": {"self": "https://api.example.com/v1/person/9"},
			}],
		})
	);
}

#[rstest]
fn test_hydrate_restores_internal_names(mappings: TempDir) {
	let hyperdoc = Hyperdoc::new(config(), YamlFileDriver::from_directory(mappings.path())).unwrap();
	let mut document = Document::one("blog/post");
	document.set_resource(post());
	let wire = hyperdoc.serializer().serialize(&document).unwrap();

	let hydrated = hyperdoc.hydrator().hydrate("blog/post", &wire).unwrap();

	let Some(PrimaryData::Resource(post)) = hydrated.primary_data() else {
		panic!("expected a single resource");
	};
	assert_eq!(post.attribute("word_count"), Some(&json!(42)));
	assert_eq!(post.attribute("seo"), Some(&json!({"meta_title": "Hello | Blog"})));
	assert!(matches!(
		post.relationship("author").map(Relationship::data),
		Some(RelationshipData::One(Some(author))) if author.attribute("name") == Some(&json!("Ada"))
	));
}

#[rstest]
fn test_warm_file_cache(mappings: TempDir) {
	// Arrange
	let cache_dir = TempDir::new().unwrap();
	let config = config();
	let registry = MetadataRegistry::new(
		YamlFileDriver::from_directory(mappings.path()),
		Arc::new(TypeRegistry::new(&config)),
		&config,
	)
	.with_cache(FileCache::new(cache_dir.path()).unwrap());
	let hyperdoc = Hyperdoc::from_registry(config, registry).unwrap();

	// Act
	let mut warmed = hyperdoc.warmer().warm().unwrap();

	// Assert
	warmed.sort();
	assert_eq!(warmed, vec!["blog/post", "content", "person", "tag"]);
	assert!(cache_dir.path().join("blog.post.json").exists());
}

#[rstest]
fn test_incompatible_configuration_is_rejected(mappings: TempDir) {
	let mut config = config();
	config.entity_name_format = StringFormat::Underscore;

	let result = Hyperdoc::new(config, YamlFileDriver::from_directory(mappings.path()));

	assert!(matches!(
		result,
		Err(ValidationError::IncompatibleNameFormat { .. })
	));
}
