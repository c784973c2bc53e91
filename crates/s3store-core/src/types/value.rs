//! Cache payload model.
//!
//! Values are JSON-shaped trees with one extra variant for raw bytes. Bytes
//! travel as the marker object `{"type":"Buffer","data":[...]}` and are
//! revived from that shape wherever it appears in a body.

use indexmap::IndexMap;
use serde::de::{Deserialize, Deserializer};
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use serde_json::{Number, Value};

const BUFFER_TAG: &str = "Buffer";

/// Arbitrary cache payload
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CacheValue {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    /// Raw binary data
    Bytes(Vec<u8>),
    Array(Vec<CacheValue>),
    /// Object with insertion-ordered keys
    Object(IndexMap<String, CacheValue>),
}

impl CacheValue {
    pub fn is_null(&self) -> bool {
        matches!(self, CacheValue::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            CacheValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            CacheValue::Bytes(b) => Some(b),
            _ => None,
        }
    }

    /// Look up a field of an object value
    pub fn get(&self, field: &str) -> Option<&CacheValue> {
        match self {
            CacheValue::Object(map) => map.get(field),
            _ => None,
        }
    }

    /// Convert a plain JSON tree, reviving buffer-shaped objects into bytes.
    pub fn revive(value: Value) -> Self {
        match value {
            Value::Null => CacheValue::Null,
            Value::Bool(b) => CacheValue::Bool(b),
            Value::Number(n) => CacheValue::Number(n),
            Value::String(s) => CacheValue::String(s),
            Value::Array(items) => {
                CacheValue::Array(items.into_iter().map(CacheValue::revive).collect())
            },
            Value::Object(map) => match buffer_data(&map) {
                Some(bytes) => CacheValue::Bytes(bytes),
                None => CacheValue::Object(
                    map.into_iter()
                        .map(|(k, v)| (k, CacheValue::revive(v)))
                        .collect(),
                ),
            },
        }
    }

    /// Convert into a plain JSON tree, bytes become the buffer marker shape.
    pub fn to_json(&self) -> Value {
        match self {
            CacheValue::Null => Value::Null,
            CacheValue::Bool(b) => Value::Bool(*b),
            CacheValue::Number(n) => Value::Number(n.clone()),
            CacheValue::String(s) => Value::String(s.clone()),
            CacheValue::Bytes(bytes) => serde_json::json!({
                "type": BUFFER_TAG,
                "data": bytes,
            }),
            CacheValue::Array(items) => Value::Array(items.iter().map(CacheValue::to_json).collect()),
            CacheValue::Object(map) => Value::Object(
                map.iter().map(|(k, v)| (k.clone(), v.to_json())).collect(),
            ),
        }
    }
}

/// Extract the bytes of `{"type":"Buffer","data":[...]}`.
///
/// Every element of `data` must be an integer in `0..=255`, otherwise the
/// object is left as a plain object.
fn buffer_data(map: &serde_json::Map<String, Value>) -> Option<Vec<u8>> {
    if map.get("type").and_then(Value::as_str) != Some(BUFFER_TAG) {
        return None;
    }
    let data = map.get("data")?.as_array()?;
    data.iter()
        .map(|item| item.as_u64().and_then(|n| u8::try_from(n).ok()))
        .collect()
}

impl Serialize for CacheValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CacheValue::Null => serializer.serialize_unit(),
            CacheValue::Bool(b) => serializer.serialize_bool(*b),
            CacheValue::Number(n) => n.serialize(serializer),
            CacheValue::String(s) => serializer.serialize_str(s),
            CacheValue::Bytes(bytes) => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("type", BUFFER_TAG)?;
                map.serialize_entry("data", bytes)?;
                map.end()
            },
            CacheValue::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            },
            CacheValue::Object(fields) => {
                let mut map = serializer.serialize_map(Some(fields.len()))?;
                for (k, v) in fields {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            },
        }
    }
}

impl<'de> Deserialize<'de> for CacheValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(CacheValue::revive)
    }
}

impl From<Value> for CacheValue {
    fn from(value: Value) -> Self {
        CacheValue::revive(value)
    }
}

impl From<&str> for CacheValue {
    fn from(value: &str) -> Self {
        CacheValue::String(value.to_string())
    }
}

impl From<String> for CacheValue {
    fn from(value: String) -> Self {
        CacheValue::String(value)
    }
}

impl From<Vec<u8>> for CacheValue {
    fn from(value: Vec<u8>) -> Self {
        CacheValue::Bytes(value)
    }
}

impl From<bool> for CacheValue {
    fn from(value: bool) -> Self {
        CacheValue::Bool(value)
    }
}

impl From<i64> for CacheValue {
    fn from(value: i64) -> Self {
        CacheValue::Number(value.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_buffer_revival_at_top_level() {
        let value: CacheValue =
            serde_json::from_str(r#"{"type":"Buffer","data":[104,105]}"#).unwrap();
        assert_eq!(value, CacheValue::Bytes(b"hi".to_vec()));
    }

    #[test]
    fn test_buffer_revival_nested() {
        let value = CacheValue::revive(json!({
            "name": "a",
            "parts": [{"type": "Buffer", "data": [0, 255]}],
        }));

        let parts = value.get("parts").unwrap();
        match parts {
            CacheValue::Array(items) => assert_eq!(items[0], CacheValue::Bytes(vec![0, 255])),
            other => panic!("Expected array, got {:?}", other),
        }
        assert_eq!(value.get("name").and_then(CacheValue::as_str), Some("a"));
    }

    #[test]
    fn test_non_buffer_shapes_stay_objects() {
        // out of range byte
        let value = CacheValue::revive(json!({"type": "Buffer", "data": [256]}));
        assert!(matches!(value, CacheValue::Object(_)));

        // wrong tag
        let value = CacheValue::revive(json!({"type": "Blob", "data": [1]}));
        assert!(matches!(value, CacheValue::Object(_)));

        // data is not an array
        let value = CacheValue::revive(json!({"type": "Buffer", "data": "AQ=="}));
        assert!(matches!(value, CacheValue::Object(_)));
    }

    #[test]
    fn test_bytes_serialize_as_buffer_marker() {
        let value = CacheValue::Bytes(vec![1, 2, 3]);
        let text = serde_json::to_string(&value).unwrap();
        assert_eq!(text, r#"{"type":"Buffer","data":[1,2,3]}"#);
        assert_eq!(value.to_json(), json!({"type": "Buffer", "data": [1, 2, 3]}));
    }

    #[test]
    fn test_object_key_order_is_preserved() {
        let mut fields = IndexMap::new();
        fields.insert("z".to_string(), CacheValue::from(1i64));
        fields.insert("a".to_string(), CacheValue::from(2i64));
        let value = CacheValue::Object(fields);

        let text = serde_json::to_string(&value).unwrap();
        assert_eq!(text, r#"{"z":1,"a":2}"#);
    }

    #[test]
    fn test_conversions() {
        assert_eq!(CacheValue::from("x"), CacheValue::String("x".to_string()));
        assert_eq!(CacheValue::from(7i64), CacheValue::Number(7.into()));
        assert_eq!(CacheValue::from(true), CacheValue::Bool(true));
        assert!(CacheValue::default().is_null());
        assert_eq!(CacheValue::from(vec![9u8]).as_bytes(), Some(&[9u8][..]));
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Bytes survive a trip through their JSON text form
        #[test]
        fn bytes_survive_json_text(data in prop::collection::vec(any::<u8>(), 0..256)) {
            let value = CacheValue::Bytes(data.clone());
            let text = serde_json::to_string(&value).unwrap();
            let back: CacheValue = serde_json::from_str(&text).unwrap();
            prop_assert_eq!(back, CacheValue::Bytes(data));
        }
    }
}
