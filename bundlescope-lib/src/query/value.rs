use cel_interpreter::Value;
use cel_interpreter::objects::{Key, Map};
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::sync::Arc;

/// Convert JSON into a CEL value.
///
/// Integers become `Int` whenever they fit, so they compare naturally with literals.
#[must_use]
pub fn to_cel(value: &JsonValue) -> Value {
    match value {
        JsonValue::Null => Value::Null,
        JsonValue::Bool(b) => Value::Bool(*b),
        JsonValue::Number(n) => n
            .as_i64()
            .map(Value::Int)
            .or_else(|| n.as_u64().map(Value::UInt))
            .unwrap_or_else(|| Value::Float(n.as_f64().unwrap_or(f64::NAN))),
        JsonValue::String(s) => Value::String(Arc::new(s.clone())),
        JsonValue::Array(items) => Value::List(Arc::new(items.iter().map(to_cel).collect())),
        JsonValue::Object(fields) => {
            let map: HashMap<Arc<String>, Value> = fields.iter().map(|(k, v)| (Arc::new(k.clone()), to_cel(v))).collect();
            Value::Map(Map::from(map))
        }
    }
}

/// Convert a CEL value back into JSON.
///
/// Timestamps and durations become strings; values with no JSON form become `null`.
#[must_use]
pub fn from_cel(value: &Value) -> JsonValue {
    match value {
        Value::Null => JsonValue::Null,
        Value::Bool(b) => JsonValue::Bool(*b),
        Value::Int(i) => JsonValue::from(*i),
        Value::UInt(u) => JsonValue::from(*u),
        Value::Float(f) => serde_json::Number::from_f64(*f).map_or(JsonValue::Null, JsonValue::Number),
        Value::String(s) => JsonValue::String(s.to_string()),
        Value::Bytes(bytes) => JsonValue::Array(bytes.iter().map(|b| JsonValue::from(*b)).collect()),
        Value::List(items) => JsonValue::Array(items.iter().map(from_cel).collect()),
        Value::Map(map) => JsonValue::Object(map.map.iter().map(|(k, v)| (key_to_string(k), from_cel(v))).collect()),
        Value::Timestamp(ts) => JsonValue::String(ts.to_rfc3339()),
        Value::Duration(d) => JsonValue::String(d.to_string()),
        _ => JsonValue::Null,
    }
}

fn key_to_string(key: &Key) -> String {
    match key {
        Key::String(s) => s.to_string(),
        Key::Int(i) => i.to_string(),
        Key::Uint(u) => u.to_string(),
        Key::Bool(b) => b.to_string(),
    }
}
