//! Unwrapping of the protobuf `Struct`/`Value` tagged-union encoding.
//!
//! Discovery Engine attaches per-document metadata (`derivedStructData`) as a
//! loosely-typed struct. Depending on the transport it arrives either in the
//! tagged form (`{"stringValue": "..."}`, `{"structValue": {"fields": ...}}`)
//! or as plain JSON. [`unwrap_value`] flattens both into plain
//! `serde_json::Value` trees. It is pure and total: input it does not
//! recognize passes through unchanged, and plain input is returned with its
//! members recursively unwrapped, which makes the function idempotent.

use serde_json::Value;

/// Flatten one tagged value (or plain value) into plain JSON.
pub fn unwrap_value(v: &Value) -> Value {
    match v {
        Value::Object(map) => {
            if let Some(s) = map.get("stringValue") {
                return s.clone();
            }
            if let Some(n) = map.get("numberValue") {
                return n.clone();
            }
            if let Some(i) = map.get("integerValue") {
                // proto3 JSON writes int64 as a decimal string
                return match i {
                    Value::String(s) => s
                        .parse::<i64>()
                        .map(Value::from)
                        .unwrap_or_else(|_| i.clone()),
                    other => other.clone(),
                };
            }
            if let Some(b) = map.get("boolValue") {
                return b.clone();
            }
            if map.contains_key("nullValue") {
                return Value::Null;
            }
            if let Some(s) = map.get("structValue") {
                return unwrap_struct(s);
            }
            if let Some(l) = map.get("listValue") {
                let values = l.get("values").and_then(Value::as_array);
                return Value::Array(
                    values
                        .map(|vs| vs.iter().map(unwrap_value).collect())
                        .unwrap_or_default(),
                );
            }
            // plain object: recurse into members
            Value::Object(
                map.iter()
                    .map(|(k, member)| (k.clone(), unwrap_value(member)))
                    .collect(),
            )
        }
        Value::Array(items) => Value::Array(items.iter().map(unwrap_value).collect()),
        other => other.clone(),
    }
}

/// Unwrap a struct payload: either `{"fields": {...}}` or a plain object.
pub fn unwrap_struct(v: &Value) -> Value {
    match v.get("fields").and_then(Value::as_object) {
        Some(fields) => Value::Object(
            fields
                .iter()
                .map(|(k, member)| (k.clone(), unwrap_value(member)))
                .collect(),
        ),
        None => unwrap_value(v),
    }
}
