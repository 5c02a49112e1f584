//! Conversion between JSON property values and the RPC `PropertyValue`.

use super::pb;
use super::pb::property_value::Kind;
use serde_json::Value;
use std::collections::HashMap;

/// Convert a JSON object's properties to RPC property values.
pub fn json_to_properties(
    map: &serde_json::Map<String, Value>,
) -> HashMap<String, pb::PropertyValue> {
    map.iter()
        .map(|(k, v)| (k.clone(), json_to_property_value(v)))
        .collect()
}

/// Homogeneous arrays map to typed arrays; nested objects, mixed or empty
/// arrays travel as serialized JSON.
pub fn json_to_property_value(value: &Value) -> pb::PropertyValue {
    let kind = match value {
        Value::Null => Kind::NullValue(true),
        Value::Bool(b) => Kind::BoolValue(*b),
        Value::Number(n) => match n.as_i64() {
            Some(i) => Kind::IntValue(i),
            None => Kind::NumberValue(n.as_f64().unwrap_or(0.0)),
        },
        Value::String(s) => Kind::TextValue(s.clone()),
        Value::Array(items) => {
            array_kind(items).unwrap_or_else(|| Kind::JsonValue(value.to_string()))
        }
        Value::Object(_) => Kind::JsonValue(value.to_string()),
    };
    pb::PropertyValue { kind: Some(kind) }
}

fn array_kind(items: &[Value]) -> Option<Kind> {
    if items.is_empty() {
        return None;
    }
    if let Some(values) = items.iter().map(|v| v.as_str().map(str::to_owned)).collect() {
        return Some(Kind::TextArray(pb::TextArray { values }));
    }
    if let Some(values) = items.iter().map(Value::as_bool).collect() {
        return Some(Kind::BoolArray(pb::BooleanArray { values }));
    }
    if let Some(values) = items.iter().map(Value::as_i64).collect() {
        return Some(Kind::IntArray(pb::IntArray { values }));
    }
    if let Some(values) = items.iter().map(Value::as_f64).collect() {
        return Some(Kind::NumberArray(pb::NumberArray { values }));
    }
    None
}

/// Convert an RPC property value back to JSON (for search results).
pub fn property_value_to_json(value: &pb::PropertyValue) -> Value {
    match &value.kind {
        None | Some(Kind::NullValue(_)) => Value::Null,
        Some(Kind::TextValue(s)) => Value::String(s.clone()),
        Some(Kind::IntValue(i)) => serde_json::json!(*i),
        Some(Kind::NumberValue(f)) => serde_json::json!(*f),
        Some(Kind::BoolValue(b)) => Value::Bool(*b),
        Some(Kind::TextArray(a)) => serde_json::json!(a.values),
        Some(Kind::IntArray(a)) => serde_json::json!(a.values),
        Some(Kind::NumberArray(a)) => serde_json::json!(a.values),
        Some(Kind::BoolArray(a)) => serde_json::json!(a.values),
        Some(Kind::JsonValue(s)) => serde_json::from_str(s).unwrap_or(Value::String(s.clone())),
    }
}
