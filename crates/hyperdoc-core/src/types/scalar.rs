//! Scalar converters: `string`, `integer`, `float`, `boolean` and `mixed`.
//!
//! Conversion is symmetric for scalars, so `convert_in` and `convert_out`
//! share one coercion function. `null` always passes through.
//!
//! Compound input (arrays and objects) is stringified and the resulting text
//! is coerced like any other string. Numeric converters read the leading
//! number of that text (`"12abc"` is 12) and fall back to zero when there is
//! none. Only a float that JSON cannot carry (an overflow such as `"1e999"`)
//! is a conversion error.

use serde_json::{Number, Value};

use super::TypeConverter;
use crate::error::{TypeError, TypeResult};

const FALSY_STRINGS: &[&str] = &["", "0", "false", "no", "off"];

fn stringify(value: &Value) -> String {
	match value {
		Value::String(s) => s.clone(),
		other => other.to_string(),
	}
}

fn coerce_string(value: &Value) -> TypeResult<Value> {
	Ok(match value {
		Value::Null => Value::Null,
		other => Value::String(stringify(other)),
	})
}

/// Longest leading slice of `text` that reads as a decimal number, after
/// leading whitespace: optional sign, digits with an optional fraction, and
/// an exponent only when digits follow it.
fn numeric_prefix(text: &str) -> &str {
	let text = text.trim_start();
	let bytes = text.as_bytes();
	let digits_from = |mut at: usize| {
		while bytes.get(at).is_some_and(u8::is_ascii_digit) {
			at += 1;
		}
		at
	};

	let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
	let integral = digits_from(end);
	let mut mantissa_digits = integral - end;
	end = integral;
	if bytes.get(end) == Some(&b'.') {
		let fraction = digits_from(end + 1);
		mantissa_digits += fraction - end - 1;
		end = fraction;
	}
	if mantissa_digits == 0 {
		return "";
	}
	if matches!(bytes.get(end), Some(b'e' | b'E')) {
		let sign = usize::from(matches!(bytes.get(end + 1), Some(b'+' | b'-')));
		let exponent = digits_from(end + 1 + sign);
		if exponent > end + 1 + sign {
			end = exponent;
		}
	}
	&text[..end]
}

/// Integer value of the numeric prefix of `text`; `0` when there is none.
fn parse_integer(text: &str) -> i64 {
	let prefix = numeric_prefix(text);
	prefix.parse::<i64>().unwrap_or_else(|_| {
		prefix
			.parse::<f64>()
			.ok()
			.filter(|f| f.is_finite())
			.map_or(0, |f| f.trunc() as i64)
	})
}

/// Float value of the numeric prefix of `text`; `0.0` when there is none.
fn parse_float(text: &str) -> f64 {
	numeric_prefix(text).parse::<f64>().unwrap_or(0.0)
}

fn coerce_integer(value: &Value) -> TypeResult<Value> {
	let result = match value {
		Value::Null => return Ok(Value::Null),
		Value::Bool(b) => i64::from(*b),
		Value::Number(n) => n
			.as_i64()
			.or_else(|| n.as_u64().map(|u| u.min(i64::MAX as u64) as i64))
			.or_else(|| n.as_f64().map(|f| f.trunc() as i64))
			.unwrap_or(0),
		other => parse_integer(&stringify(other)),
	};
	Ok(Value::from(result))
}

fn coerce_float(value: &Value) -> TypeResult<Value> {
	let result = match value {
		Value::Null => return Ok(Value::Null),
		Value::Bool(b) => f64::from(u8::from(*b)),
		Value::Number(n) => n.as_f64().unwrap_or(0.0),
		other => parse_float(&stringify(other)),
	};
	Number::from_f64(result)
		.map(Value::Number)
		.ok_or_else(|| TypeError::conversion("float", value))
}

fn coerce_boolean(value: &Value) -> TypeResult<Value> {
	Ok(match value {
		Value::Null => Value::Null,
		Value::Bool(b) => Value::Bool(*b),
		Value::Number(n) => Value::Bool(n.as_f64().is_some_and(|f| f != 0.0)),
		other => {
			let text = stringify(other);
			let text = text.trim();
			Value::Bool(
				!FALSY_STRINGS
					.iter()
					.any(|falsy| text.eq_ignore_ascii_case(falsy)),
			)
		}
	})
}

/// `string` converter.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringConverter;

impl TypeConverter for StringConverter {
	fn convert_out(&self, value: &Value) -> TypeResult<Value> {
		coerce_string(value)
	}

	fn convert_in(&self, value: &Value) -> TypeResult<Value> {
		coerce_string(value)
	}
}

/// `integer` converter. Fractional input is truncated; text without a leading
/// number is `0`.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntegerConverter;

impl TypeConverter for IntegerConverter {
	fn convert_out(&self, value: &Value) -> TypeResult<Value> {
		coerce_integer(value)
	}

	fn convert_in(&self, value: &Value) -> TypeResult<Value> {
		coerce_integer(value)
	}
}

/// `float` converter.
#[derive(Debug, Clone, Copy, Default)]
pub struct FloatConverter;

impl TypeConverter for FloatConverter {
	fn convert_out(&self, value: &Value) -> TypeResult<Value> {
		coerce_float(value)
	}

	fn convert_in(&self, value: &Value) -> TypeResult<Value> {
		coerce_float(value)
	}
}

/// `boolean` converter. `""`, `"0"`, `"false"`, `"no"` and `"off"` are false,
/// ignoring case and surrounding whitespace.
#[derive(Debug, Clone, Copy, Default)]
pub struct BooleanConverter;

impl TypeConverter for BooleanConverter {
	fn convert_out(&self, value: &Value) -> TypeResult<Value> {
		coerce_boolean(value)
	}

	fn convert_in(&self, value: &Value) -> TypeResult<Value> {
		coerce_boolean(value)
	}
}

/// `mixed` converter; values pass through untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct MixedConverter;

impl TypeConverter for MixedConverter {
	fn convert_out(&self, value: &Value) -> TypeResult<Value> {
		Ok(value.clone())
	}

	fn convert_in(&self, value: &Value) -> TypeResult<Value> {
		Ok(value.clone())
	}
}
