use std::fmt;
use std::str::FromStr;

use hyperdoc_core::validators::{validate_entity_type, validate_field_key};
use hyperdoc_core::{ValidationError, ValidationResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Shape of a relationship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cardinality {
	/// To-one: a single resource or null.
	One,
	/// To-many: a possibly empty collection.
	Many,
}

impl Cardinality {
	/// Mapping-file name of the cardinality.
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::One => "one",
			Self::Many => "many",
		}
	}
}

impl fmt::Display for Cardinality {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for Cardinality {
	type Err = ValidationError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"one" => Ok(Self::One),
			"many" => Ok(Self::Many),
			other => Err(ValidationError::InvalidCardinality(other.to_string())),
		}
	}
}

/// Describes a relationship from one entity to another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationshipDescriptor {
	key: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	external_key: Option<String>,
	target_entity_type: String,
	cardinality: Cardinality,
	#[serde(default)]
	is_inverse: bool,
	#[serde(default = "default_true")]
	should_serialize: bool,
}

fn default_true() -> bool {
	true
}

impl RelationshipDescriptor {
	/// Creates a relationship descriptor.
	///
	/// # Examples
	///
	/// ```
	/// use hyperdoc_metadata::descriptor::{Cardinality, RelationshipDescriptor};
	///
	/// let author = RelationshipDescriptor::new("author", Cardinality::One, "person").unwrap();
	/// assert_eq!(author.target_entity_type(), "person");
	/// assert!(author.default_empty_value().is_null());
	/// ```
	pub fn new(
		key: impl Into<String>,
		cardinality: Cardinality,
		target_entity_type: impl Into<String>,
	) -> ValidationResult<Self> {
		let key = key.into();
		let target_entity_type = target_entity_type.into();
		validate_field_key(&key)?;
		validate_entity_type(&target_entity_type)?;
		Ok(Self {
			key,
			external_key: None,
			target_entity_type,
			cardinality,
			is_inverse: false,
			should_serialize: true,
		})
	}

	/// Creates a to-one relationship to `target`.
	pub fn one(key: impl Into<String>, target: impl Into<String>) -> ValidationResult<Self> {
		Self::new(key, Cardinality::One, target)
	}

	/// Creates a to-many relationship to `target`.
	pub fn many(key: impl Into<String>, target: impl Into<String>) -> ValidationResult<Self> {
		Self::new(key, Cardinality::Many, target)
	}

	/// Marks the relationship as the non-owning side.
	pub fn with_inverse(mut self, is_inverse: bool) -> Self {
		self.is_inverse = is_inverse;
		self
	}

	/// Excludes the relationship from the wire when `false`.
	pub fn with_should_serialize(mut self, should_serialize: bool) -> Self {
		self.should_serialize = should_serialize;
		self
	}

	/// Internal key of the relationship.
	pub fn key(&self) -> &str {
		&self.key
	}

	/// Wire name of the relationship; the internal key until a formatter ran.
	pub fn external_key(&self) -> &str {
		self.external_key.as_deref().unwrap_or(&self.key)
	}

	pub(crate) fn set_external_key(&mut self, external_key: String) {
		self.external_key = Some(external_key);
	}

	/// Entity type on the other side of the relationship.
	pub fn target_entity_type(&self) -> &str {
		&self.target_entity_type
	}

	/// Whether the relationship is to-one or to-many.
	pub fn cardinality(&self) -> Cardinality {
		self.cardinality
	}

	/// Whether the relationship is to-one.
	pub fn is_one(&self) -> bool {
		self.cardinality == Cardinality::One
	}

	/// Whether the relationship is to-many.
	pub fn is_many(&self) -> bool {
		self.cardinality == Cardinality::Many
	}

	/// Whether the relationship is the inverse side.
	pub fn is_inverse(&self) -> bool {
		self.is_inverse
	}

	/// Whether the relationship is written to the wire.
	pub fn should_serialize(&self) -> bool {
		self.should_serialize
	}

	/// Linkage emitted when the relationship holds no data: `null` for
	/// to-one, `[]` for to-many.
	pub fn default_empty_value(&self) -> Value {
		match self.cardinality {
			Cardinality::One => Value::Null,
			Cardinality::Many => Value::Array(Vec::new()),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	#[case(Cardinality::One, json!(null))]
	#[case(Cardinality::Many, json!([]))]
	fn test_default_empty_value(#[case] cardinality: Cardinality, #[case] expected: Value) {
		let rel = RelationshipDescriptor::new("tags", cardinality, "tag").unwrap();
		assert_eq!(rel.default_empty_value(), expected);
	}

	#[rstest]
	#[case("one", Ok(Cardinality::One))]
	#[case("many", Ok(Cardinality::Many))]
	#[case("several", Err(ValidationError::InvalidCardinality("several".to_string())))]
	fn test_parse_cardinality(
		#[case] input: &str,
		#[case] expected: Result<Cardinality, ValidationError>,
	) {
		assert_eq!(input.parse::<Cardinality>(), expected);
	}

	#[rstest]
	fn test_rejects_reserved_key() {
		assert_eq!(
			RelationshipDescriptor::one("Type", "person").unwrap_err(),
			ValidationError::ReservedFieldKey("Type".to_string())
		);
	}

	#[rstest]
	fn test_rejects_invalid_target() {
		assert_eq!(
			RelationshipDescriptor::one("author", "").unwrap_err(),
			ValidationError::InvalidEntityType(String::new())
		);
	}

	#[rstest]
	fn test_inverse_flag() {
		let rel = RelationshipDescriptor::many("comments", "comment")
			.unwrap()
			.with_inverse(true);
		assert!(rel.is_inverse());
		assert!(rel.is_many());
	}
}
