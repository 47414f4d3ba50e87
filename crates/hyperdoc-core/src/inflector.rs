//! Case conversion for entity type names and field keys.

use convert_case::{Boundary, Case, Casing};

use crate::config::StringFormat;

/// Word boundaries: separators and lowercase-to-uppercase changes only.
/// Digits stay attached to their word, so `mp3_player` keeps `mp3`.
const BOUNDARIES: &[Boundary] = &[
	Boundary::Underscore,
	Boundary::Hyphen,
	Boundary::Space,
	Boundary::LowerUpper,
];

fn convert(word: &str, case: Case) -> String {
	word.with_boundaries(BOUNDARIES).to_case(case)
}

/// `blogPost` -> `blog_post`
pub fn underscore(word: &str) -> String {
	convert(word, Case::Snake)
}

/// `blogPost` -> `blog-post`
pub fn dasherize(word: &str) -> String {
	convert(word, Case::Kebab)
}

/// `blog_post` -> `blogPost`
pub fn camelize(word: &str) -> String {
	convert(word, Case::Camel)
}

/// `blog_post` -> `BlogPost`
pub fn studlify(word: &str) -> String {
	convert(word, Case::Pascal)
}

/// Applies the given [`StringFormat`] to `word`.
///
/// # Examples
///
/// ```
/// use hyperdoc_core::config::StringFormat;
/// use hyperdoc_core::inflector::format;
///
/// assert_eq!(format("published_at", StringFormat::CamelCase), "publishedAt");
/// assert_eq!(format("blogPost", StringFormat::Dash), "blog-post");
/// ```
pub fn format(word: &str, format: StringFormat) -> String {
	match format {
		StringFormat::Dash => dasherize(word),
		StringFormat::CamelCase => camelize(word),
		StringFormat::StudlyCaps => studlify(word),
		StringFormat::Underscore => underscore(word),
	}
}
