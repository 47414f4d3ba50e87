//! `array` and `object` converters.

use serde_json::{Map, Value};

use super::TypeConverter;
use crate::error::TypeResult;

/// Member holding a scalar wrapped by the `object` converter.
const SCALAR_KEY: &str = "scalar";

fn coerce_array(value: &Value) -> Value {
	match value {
		Value::Null => Value::Null,
		Value::Array(items) => Value::Array(items.clone()),
		Value::Object(map) => Value::Array(map.values().cloned().collect()),
		scalar => Value::Array(vec![scalar.clone()]),
	}
}

/// Values that count as empty: `null`, `false`, zero, `""`, `"0"` and
/// empty containers.
fn is_empty(value: &Value) -> bool {
	match value {
		Value::Null => true,
		Value::Bool(b) => !b,
		Value::Number(n) => n.as_f64().is_some_and(|f| f == 0.0),
		Value::String(s) => s.is_empty() || s == "0",
		Value::Array(items) => items.is_empty(),
		Value::Object(map) => map.is_empty(),
	}
}

fn coerce_object(value: &Value) -> Value {
	if is_empty(value) {
		return Value::Object(Map::new());
	}
	match value {
		Value::Object(map) => Value::Object(map.clone()),
		Value::Array(items) => Value::Object(
			items
				.iter()
				.enumerate()
				.map(|(index, item)| (index.to_string(), item.clone()))
				.collect(),
		),
		scalar => Value::Object(Map::from_iter([(SCALAR_KEY.to_string(), scalar.clone())])),
	}
}

/// `array` converter. Objects become their value list; scalars are wrapped.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArrayConverter;

impl TypeConverter for ArrayConverter {
	fn convert_out(&self, value: &Value) -> TypeResult<Value> {
		Ok(coerce_array(value))
	}

	fn convert_in(&self, value: &Value) -> TypeResult<Value> {
		Ok(coerce_array(value))
	}
}

/// `object` converter.
///
/// Always yields a string-keyed mapping: empty input becomes `{}`, a
/// sequence becomes a mapping keyed by position and any other scalar is
/// wrapped as `{"scalar": value}`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ObjectConverter;

impl TypeConverter for ObjectConverter {
	fn convert_out(&self, value: &Value) -> TypeResult<Value> {
		Ok(coerce_object(value))
	}

	fn convert_in(&self, value: &Value) -> TypeResult<Value> {
		Ok(coerce_object(value))
	}
}
