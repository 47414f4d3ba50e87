//! Member-name and field-key validation.
//!
//! JSON:API restricts which characters may appear in member names and forbids
//! a handful of keys that collide with resource-object members.

use crate::error::{ValidationError, ValidationResult};

/// Separator between namespace segments of an internal entity type.
pub const NAMESPACE_SEPARATOR: char = '/';

/// Keys reserved by the resource object itself.
const RESERVED_FIELD_KEYS: &[&str] = &["type", "id"];

/// Keys reserved inside object attributes.
const RESERVED_OBJECT_KEYS: &[&str] = &["links", "relationships"];

fn is_forbidden_member_char(c: char) -> bool {
	matches!(
		c as u32,
		0x0000..=0x001F
			| 0x0021..=0x002C
			| 0x002E..=0x002F
			| 0x003A..=0x0040
			| 0x005B..=0x005E
			| 0x0060
			| 0x007B..=0x007F
	)
}

fn is_forbidden_bookend(c: char) -> bool {
	matches!(c, '-' | '_' | ' ')
}

/// Validates a JSON:API member name.
///
/// # Examples
///
/// ```
/// use hyperdoc_core::validators::validate_member_name;
///
/// assert!(validate_member_name("blog-post").is_ok());
/// assert!(validate_member_name("blog.post").is_err());
/// assert!(validate_member_name("_private").is_err());
/// ```
pub fn validate_member_name(name: &str) -> ValidationResult<()> {
	let (Some(first), Some(last)) = (name.chars().next(), name.chars().last()) else {
		return Err(ValidationError::EmptyMemberName);
	};
	if let Some(character) = name.chars().find(|c| is_forbidden_member_char(*c)) {
		return Err(ValidationError::InvalidMemberCharacter {
			name: name.to_string(),
			character,
		});
	}
	if is_forbidden_bookend(first) || is_forbidden_bookend(last) {
		return Err(ValidationError::InvalidMemberBookend(name.to_string()));
	}
	Ok(())
}

/// Validates an attribute or relationship key.
pub fn validate_field_key(key: &str) -> ValidationResult<()> {
	if key.is_empty() {
		return Err(ValidationError::EmptyMemberName);
	}
	if RESERVED_FIELD_KEYS
		.iter()
		.any(|reserved| key.eq_ignore_ascii_case(reserved))
	{
		return Err(ValidationError::ReservedFieldKey(key.to_string()));
	}
	Ok(())
}

/// Validates a key declared inside an `object` attribute.
pub fn validate_object_attribute_key(key: &str) -> ValidationResult<()> {
	validate_field_key(key)?;
	if RESERVED_OBJECT_KEYS
		.iter()
		.any(|reserved| key.eq_ignore_ascii_case(reserved))
	{
		return Err(ValidationError::ReservedFieldKey(key.to_string()));
	}
	Ok(())
}

/// Validates an internal entity type such as `blog/post`.
pub fn validate_entity_type(entity_type: &str) -> ValidationResult<()> {
	let malformed = entity_type.is_empty()
		|| entity_type
			.split(NAMESPACE_SEPARATOR)
			.any(|segment| segment.is_empty() || segment.chars().any(char::is_whitespace));
	if malformed {
		return Err(ValidationError::InvalidEntityType(entity_type.to_string()));
	}
	Ok(())
}
