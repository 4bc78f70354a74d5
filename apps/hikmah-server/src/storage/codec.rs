//! Slot encoding
//!
//! Slots hold `{"version": 1, "records": [...]}`. The bare JSON array written
//! by the browser edition of the reader is still accepted on read.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Current slot format version
pub const SLOT_FORMAT_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("slot is not valid JSON: {0}")]
    Syntax(String),

    #[error("slot format version {found} is newer than supported version {supported}")]
    UnsupportedVersion { found: u64, supported: u32 },

    #[error("slot has an unexpected shape: {0}")]
    Shape(String),

    #[error("slot records do not match the expected schema: {0}")]
    Records(String),
}

#[derive(Serialize)]
struct SlotEnvelope<'a, T> {
    version: u32,
    records: &'a [T],
}

#[derive(Deserialize)]
struct VersionedSlot {
    version: u64,
    records: Value,
}

/// Encode a record list into the current slot format
pub fn encode_records<T: Serialize>(records: &[T]) -> Result<Vec<u8>, serde_json::Error> {
    serde_json::to_vec_pretty(&SlotEnvelope {
        version: SLOT_FORMAT_VERSION,
        records,
    })
}

/// Decode a slot written in the current or the legacy format
pub fn decode_records<T: DeserializeOwned>(bytes: &[u8]) -> Result<Vec<T>, DecodeError> {
    let value: Value =
        serde_json::from_slice(bytes).map_err(|e| DecodeError::Syntax(e.to_string()))?;

    let records = match value {
        Value::Array(_) => value,
        Value::Object(_) => {
            let slot: VersionedSlot =
                serde_json::from_value(value).map_err(|e| DecodeError::Shape(e.to_string()))?;
            if slot.version > u64::from(SLOT_FORMAT_VERSION) {
                return Err(DecodeError::UnsupportedVersion {
                    found: slot.version,
                    supported: SLOT_FORMAT_VERSION,
                });
            }
            slot.records
        }
        other => {
            return Err(DecodeError::Shape(format!(
                "expected an object or array, found {}",
                json_kind(&other)
            )))
        }
    };

    serde_json::from_value(records).map_err(|e| DecodeError::Records(e.to_string()))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Item {
        id: u32,
    }

    #[test]
    fn test_encode_writes_version() {
        let bytes = encode_records(&[Item { id: 7 }]).unwrap();
        let value: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["version"], 1);
        assert_eq!(value["records"][0]["id"], 7);

        let decoded: Vec<Item> = decode_records(&bytes).unwrap();
        assert_eq!(decoded, vec![Item { id: 7 }]);
    }

    #[test]
    fn test_decode_legacy_array() {
        let decoded: Vec<Item> = decode_records(br#"[{"id":1},{"id":2}]"#).unwrap();
        assert_eq!(decoded, vec![Item { id: 1 }, Item { id: 2 }]);
    }

    #[test]
    fn test_decode_rejects_newer_version() {
        let result: Result<Vec<Item>, _> = decode_records(br#"{"version":9,"records":[]}"#);
        assert!(matches!(
            result,
            Err(DecodeError::UnsupportedVersion { found: 9, .. })
        ));
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let result: Result<Vec<Item>, _> = decode_records(b"{not json");
        assert!(matches!(result, Err(DecodeError::Syntax(_))));

        let result: Result<Vec<Item>, _> = decode_records(b"\"text\"");
        assert!(matches!(result, Err(DecodeError::Shape(_))));

        let result: Result<Vec<Item>, _> = decode_records(br#"[{"id":"one"}]"#);
        assert!(matches!(result, Err(DecodeError::Records(_))));
    }
}
