//! JSON bridge.

use serde_json::Value;

use super::{SerializeError, Serializer};

/// Serializes values as JSON text.
///
/// Only text opening with `{`, `[` or `"` counts as serialized, so bare
/// numerals and words decrypt as plain strings under auto-detection.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSerializer;

impl Serializer for JsonSerializer {
    fn serialize(&self, value: &Value) -> Result<String, SerializeError> {
        Ok(serde_json::to_string(value)?)
    }

    fn unserialize(&self, data: &str) -> Result<Value, SerializeError> {
        Ok(serde_json::from_str(data)?)
    }

    fn detect(&self, data: &str) -> Option<Value> {
        let trimmed = data.trim_start();
        if !matches!(trimmed.as_bytes().first(), Some(b'{' | b'[' | b'"')) {
            return None;
        }
        serde_json::from_str(trimmed).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn object_round_trip() {
        let value = json!({"foo": "bar", "n": [1, 2]});
        let text = JsonSerializer.serialize(&value).unwrap();
        assert_eq!(JsonSerializer.unserialize(&text).unwrap(), value);
    }

    #[test]
    fn detection() {
        assert!(JsonSerializer.is_serialized(r#"{"foo":"bar"}"#));
        assert!(JsonSerializer.is_serialized(r#""quoted""#));
        assert!(!JsonSerializer.is_serialized("1"));
        assert!(!JsonSerializer.is_serialized("resistance is futile"));
        assert!(!JsonSerializer.is_serialized("{broken"));
    }
}
