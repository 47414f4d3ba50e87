//! Link generation for resource and relationship objects.
//!
//! ```text
//! scheme://host[/root]/type/id                       self
//! scheme://host[/root]/type/id/relationships/key     relationship self
//! scheme://host[/root]/type/id/key                   related
//! ```

use hyperdoc_core::{Configuration, NamespaceDelimiter};

/// Builds absolute links from the configured host and endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkBuilder {
	base: String,
	namespaces_as_resources: bool,
	namespace_delimiter: NamespaceDelimiter,
}

impl LinkBuilder {
	/// # Examples
	///
	/// ```
	/// use hyperdoc_core::Configuration;
	/// use hyperdoc_serializer::LinkBuilder;
	///
	/// let config = Configuration::default()
	/// 	.with_api_host("api.example.com")
	/// 	.with_secure(true)
	/// 	.with_root_endpoint("/v1/");
	/// let links = LinkBuilder::new(&config);
	///
	/// assert_eq!(links.self_link("article", "1"), "https://api.example.com/v1/article/1");
	/// assert_eq!(
	/// 	links.relationship_link("article", "1", "author"),
	/// 	"https://api.example.com/v1/article/1/relationships/author"
	/// );
	/// assert_eq!(
	/// 	links.related_link("article", "1", "author"),
	/// 	"https://api.example.com/v1/article/1/author"
	/// );
	/// ```
	pub fn new(config: &Configuration) -> Self {
		let mut base = format!(
			"{}://{}",
			config.scheme(),
			config.api_host.trim_end_matches('/')
		);
		if let Some(root) = config.root_endpoint.as_deref() {
			let root = root.trim_matches('/');
			if !root.is_empty() {
				base.push('/');
				base.push_str(root);
			}
		}
		Self {
			base,
			namespaces_as_resources: config.namespaces_as_resources,
			namespace_delimiter: config.namespace_delimiter,
		}
	}

	fn resource_path(&self, external_type: &str, id: &str) -> String {
		let path_type = if self.namespaces_as_resources {
			external_type.replace(self.namespace_delimiter.as_str(), "/")
		} else {
			external_type.to_string()
		};
		format!("{}/{}/{}", self.base, path_type, id)
	}

	/// Link to the resource itself.
	pub fn self_link(&self, external_type: &str, id: &str) -> String {
		self.resource_path(external_type, id)
	}

	/// Link to the relationship object.
	pub fn relationship_link(&self, external_type: &str, id: &str, external_key: &str) -> String {
		format!(
			"{}/relationships/{}",
			self.resource_path(external_type, id),
			external_key
		)
	}

	/// Link to the related resource(s).
	pub fn related_link(&self, external_type: &str, id: &str, external_key: &str) -> String {
		format!("{}/{}", self.resource_path(external_type, id), external_key)
	}
}
