//! `date` converter.
//!
//! Domain dates are RFC 3339 strings or Unix timestamps (seconds). On the wire
//! they are rendered with the configured chrono format string.

use std::fmt::Write as _;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;

use super::TypeConverter;
use crate::error::{TypeError, TypeResult};

/// Converts between domain timestamps and formatted wire strings.
#[derive(Debug, Clone)]
pub struct DateConverter {
	format: String,
}

impl DateConverter {
	/// Creates a converter that renders dates with `format`.
	pub fn new(format: impl Into<String>) -> Self {
		Self {
			format: format.into(),
		}
	}

	/// The chrono format string used for wire output.
	pub fn format(&self) -> &str {
		&self.format
	}

	fn parse(&self, value: &Value) -> TypeResult<DateTime<FixedOffset>> {
		let parsed = match value {
			Value::Number(n) => n
				.as_i64()
				.and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0))
				.map(|dt| dt.fixed_offset()),
			Value::String(s) => self.parse_str(s.trim()),
			_ => None,
		};
		parsed.ok_or_else(|| TypeError::conversion("date", value))
	}

	fn parse_str(&self, text: &str) -> Option<DateTime<FixedOffset>> {
		DateTime::parse_from_rfc3339(text)
			.or_else(|_| DateTime::parse_from_str(text, &self.format))
			.ok()
			.or_else(|| {
				NaiveDateTime::parse_from_str(text, &self.format)
					.ok()
					.map(|naive| naive.and_utc().fixed_offset())
			})
			.or_else(|| parse_date_only(text, &self.format))
			.or_else(|| parse_date_only(text, "%Y-%m-%d"))
	}
}

/// Midnight UTC of a date rendered without a time component.
fn parse_date_only(text: &str, format: &str) -> Option<DateTime<FixedOffset>> {
	NaiveDate::parse_from_str(text, format)
		.ok()
		.and_then(|date| date.and_hms_opt(0, 0, 0))
		.map(|naive| naive.and_utc().fixed_offset())
}

impl TypeConverter for DateConverter {
	fn convert_out(&self, value: &Value) -> TypeResult<Value> {
		if value.is_null() {
			return Ok(Value::Null);
		}
		let date = self.parse(value)?;
		let mut rendered = String::new();
		write!(rendered, "{}", date.format(&self.format))
			.map_err(|_| TypeError::conversion("date", value))?;
		Ok(Value::String(rendered))
	}

	fn convert_in(&self, value: &Value) -> TypeResult<Value> {
		if value.is_null() {
			return Ok(Value::Null);
		}
		Ok(Value::String(self.parse(value)?.to_rfc3339()))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::config::DEFAULT_DATE_FORMAT;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	fn test_round_trip_with_default_format() {
		let converter = DateConverter::new(DEFAULT_DATE_FORMAT);
		let value = json!("2024-03-05T10:20:30+02:00");

		let wire = converter.convert_out(&value).unwrap();
		let back = converter.convert_in(&wire).unwrap();

		assert_eq!(wire, json!("2024-03-05T10:20:30+02:00"));
		assert_eq!(back, value);
	}

	#[rstest]
	fn test_custom_format() {
		let converter = DateConverter::new("%Y/%m/%d");
		let wire = converter.convert_out(&json!("2024-03-05T10:20:30+00:00")).unwrap();
		assert_eq!(wire, json!("2024/03/05"));
	}

	#[rstest]
	#[case("%Y/%m/%d", "2024/03/05")]
	#[case("%d.%m.%Y", "05.03.2024")]
	fn test_date_only_format_reads_own_output(#[case] format: &str, #[case] rendered: &str) {
		let converter = DateConverter::new(format);

		let wire = converter.convert_out(&json!("2024-03-05T10:20:30+00:00")).unwrap();
		let back = converter.convert_in(&wire).unwrap();

		assert_eq!(wire, json!(rendered));
		assert_eq!(back, json!("2024-03-05T00:00:00+00:00"));
		assert_eq!(converter.convert_out(&back).unwrap(), wire);
	}

	#[rstest]
	fn test_timestamp_input() {
		let converter = DateConverter::new(DEFAULT_DATE_FORMAT);
		let wire = converter.convert_out(&json!(0)).unwrap();
		assert_eq!(wire, json!("1970-01-01T00:00:00+00:00"));
	}

	#[rstest]
	fn test_plain_date_input() {
		let converter = DateConverter::new(DEFAULT_DATE_FORMAT);
		let back = converter.convert_in(&json!("2024-01-31")).unwrap();
		assert_eq!(back, json!("2024-01-31T00:00:00+00:00"));
	}

	#[rstest]
	#[case(json!("yesterday"))]
	#[case(json!(true))]
	fn test_rejects_unparseable(#[case] input: Value) {
		let converter = DateConverter::new(DEFAULT_DATE_FORMAT);
		assert!(matches!(
			converter.convert_out(&input),
			Err(TypeError::Conversion { .. })
		));
	}
}
