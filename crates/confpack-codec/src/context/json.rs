use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use num_bigint::BigInt;
use serde_json::{Map, Value};

use crate::{NotThisType, Number};

use super::{Context, ValueKind};

/// [`Context`] over a `serde_json::Value` tree.
///
/// JSON has no blobs and no metadata: blobs are stored as base64 strings and
/// every metadata operation is a no-op. Object key order follows
/// `serde_json`'s `preserve_order` map.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonContext;

fn mismatch(expected: ValueKind, value: &Value) -> NotThisType {
    NotThisType {
        expected,
        found: JsonContext.kind(value),
    }
}

impl Context for JsonContext {
    type Value = Value;

    fn kind(&self, value: &Value) -> ValueKind {
        match value {
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Bool,
            Value::Number(_) => ValueKind::Number,
            Value::String(_) => ValueKind::String,
            Value::Array(_) => ValueKind::List,
            Value::Object(_) => ValueKind::Map,
        }
    }

    fn as_bool(&self, value: &Value) -> Result<bool, NotThisType> {
        value.as_bool().ok_or_else(|| mismatch(ValueKind::Bool, value))
    }

    fn as_number(&self, value: &Value) -> Result<Number, NotThisType> {
        let Value::Number(n) = value else {
            return Err(mismatch(ValueKind::Number, value));
        };
        if let Some(i) = n.as_i64() {
            Ok(Number::integer(i))
        } else if n.is_f64() {
            Ok(Number::Double(n.as_f64().unwrap_or(0.0)))
        } else {
            // u64 above i64::MAX, or an integer kept exactly by arbitrary precision.
            Ok(n.to_string()
                .parse::<BigInt>()
                .map(Number::Big)
                .unwrap_or_else(|_| Number::Double(n.as_f64().unwrap_or(0.0))))
        }
    }

    fn as_string<'v>(&self, value: &'v Value) -> Result<&'v str, NotThisType> {
        value.as_str().ok_or_else(|| mismatch(ValueKind::String, value))
    }

    fn as_blob<'v>(&self, value: &'v Value) -> Result<&'v [u8], NotThisType> {
        Err(mismatch(ValueKind::Blob, value))
    }

    fn as_list<'v>(&self, value: &'v Value) -> Result<&'v [Value], NotThisType> {
        value
            .as_array()
            .map(Vec::as_slice)
            .ok_or_else(|| mismatch(ValueKind::List, value))
    }

    fn as_map<'v>(&self, value: &'v Value) -> Result<Vec<(&'v str, &'v Value)>, NotThisType> {
        value
            .as_object()
            .map(|m| m.iter().map(|(k, v)| (k.as_str(), v)).collect())
            .ok_or_else(|| mismatch(ValueKind::Map, value))
    }

    fn null(&self) -> Value {
        Value::Null
    }

    fn from_bool(&self, value: bool) -> Value {
        Value::Bool(value)
    }

    fn from_number(&self, value: Number) -> Value {
        match value {
            Number::Float(_) | Number::Double(_) => serde_json::Number::from_f64(value.to_f64())
                .map(Value::Number)
                .unwrap_or(Value::Null),
            Number::Big(v) => v
                .to_string()
                .parse::<serde_json::Number>()
                .map(Value::Number)
                .unwrap_or(Value::Null),
            other => Value::Number(other.as_i64().unwrap_or_default().into()),
        }
    }

    fn from_string(&self, value: String) -> Value {
        Value::String(value)
    }

    fn from_blob(&self, value: Vec<u8>) -> Value {
        Value::String(STANDARD.encode(value))
    }

    fn from_list(&self, items: Vec<Value>) -> Value {
        Value::Array(items)
    }

    fn from_map(&self, entries: Vec<(String, Value)>) -> Value {
        Value::Object(entries.into_iter().collect::<Map<String, Value>>())
    }

    fn get<'v>(&self, key: &str, map: &'v Value) -> Option<&'v Value> {
        map.as_object().and_then(|m| m.get(key))
    }

    fn set(&self, key: &str, value: Option<Value>, mut map: Value) -> Result<Value, NotThisType> {
        let Some(obj) = map.as_object_mut() else {
            return Err(mismatch(ValueKind::Map, &map));
        };
        match value {
            Some(v) => {
                obj.insert(key.to_owned(), v);
            }
            None => {
                obj.shift_remove(key);
            }
        }
        Ok(map)
    }

    fn copy(&self, value: &Value) -> Value {
        value.clone()
    }
}
