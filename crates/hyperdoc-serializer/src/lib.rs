//! JSON:API documents for hyperdoc.
//!
//! - **Document model**: [`Document`], [`Resource`], [`ResourceCollection`]
//!   and [`Relationship`], built per request
//! - **Factory**: [`ResourceFactory`] builds the model with type and key
//!   checks against entity metadata
//! - **Serializer**: [`Serializer`] turns a document into its wire form,
//!   including compound-document `included` resources and links
//! - **Hydrator**: [`Hydrator`] reads a wire document back into the model
//!
//! ## Serializing
//!
//! ```ignore
//! let factory = ResourceFactory::new(metadata.clone());
//! let mut document = factory.create_document("blog/article", DocumentKind::One)?;
//! let mut article = factory.create_resource("blog/article", "1")?;
//! factory.apply_attribute(&mut article, "title", &json!("Hello"))?;
//! factory.apply_relationship(&mut article, "author", author)?;
//! factory.apply_resource(&mut document, article)?;
//!
//! let wire = Serializer::new(metadata, &config).serialize(&document)?;
//! ```
//!
//! Outside debug mode [`Serializer::serialize`] never fails: errors are logged
//! and replaced by an `errors` document.

pub mod document;
pub mod error;
pub mod factory;
pub mod hydrator;
pub mod links;
pub mod serializer;

pub use document::{
	Document, DocumentKind, PrimaryData, Relationship, RelationshipData, Resource,
	ResourceCollection,
};
pub use error::{SerializerError, SerializerResult};
pub use factory::ResourceFactory;
pub use hydrator::Hydrator;
pub use links::LinkBuilder;
pub use serializer::{INTERNAL_ERROR_TITLE, Serializer, error_document};
