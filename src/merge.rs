//! Recursive merge of JSON-shaped value trees.
//!
//! Nested objects are merged key by key; any other conflict is resolved in
//! favour of the incoming value. Arrays are replaced, never concatenated.

use crate::error::MergeError;
use serde_json::{Map, Value};

/// Merge `src` into `dst`, overriding conflicting leaves.
pub fn merge_objects(dst: &mut Map<String, Value>, src: Map<String, Value>) {
    for (key, incoming) in src {
        match incoming {
            Value::Object(nested) => match dst.get_mut(&key) {
                Some(Value::Object(existing)) => merge_objects(existing, nested),
                _ => {
                    dst.insert(key, Value::Object(nested));
                }
            },
            other => {
                dst.insert(key, other);
            }
        }
    }
}

/// Merge an object `src` into `dst`, which must itself be an object.
pub fn merge_values(dst: &mut Value, src: Map<String, Value>) -> Result<(), MergeError> {
    match dst {
        Value::Object(map) => {
            merge_objects(map, src);
            Ok(())
        }
        other => Err(MergeError::NotAnObject {
            found: kind_name(other),
        }),
    }
}

pub(crate) fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
