//! Wire decoding helpers
//!
//! The backend is not consistent about response envelopes: some
//! endpoints return the payload bare, others wrap it in `{ "data": … }`,
//! and list endpoints answer either a bare array or
//! `{ "items": […], "total": n }`. These helpers normalize all of the
//! observed shapes in one place so services decode through a single
//! path.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::domain::error::{ApiError, ApiResult};

/// Strip a `data` envelope when present.
fn unwrap_data(value: Value) -> Value {
    match value {
        Value::Object(mut map) if map.contains_key("data") => {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    }
}

/// Decode a single payload, enveloped or bare.
pub fn decode<T: DeserializeOwned>(value: Value) -> ApiResult<T> {
    let payload = unwrap_data(value);
    serde_json::from_value(payload).map_err(|e| ApiError::InvalidResponse(e.to_string()))
}

/// Decode a list payload. Returns the items plus the backend-reported
/// total when the endpoint answered the `{items, total}` shape.
pub fn decode_list<T: DeserializeOwned>(value: Value) -> ApiResult<(Vec<T>, Option<u64>)> {
    let payload = unwrap_data(value);
    match payload {
        Value::Array(_) => Ok((decode_items(payload)?, None)),
        Value::Object(mut map) => {
            let total = map.get("total").and_then(Value::as_u64);
            let items = map
                .remove("items")
                .ok_or_else(|| ApiError::InvalidResponse("list without items field".into()))?;
            Ok((decode_items(items)?, total))
        }
        Value::Null => Ok((Vec::new(), None)),
        other => Err(ApiError::InvalidResponse(format!(
            "expected a list, got {}",
            other
        ))),
    }
}

fn decode_items<T: DeserializeOwned>(value: Value) -> ApiResult<Vec<T>> {
    serde_json::from_value(value).map_err(|e| ApiError::InvalidResponse(e.to_string()))
}

/// First present numeric field among several observed spellings, e.g.
/// `quantityAdded` vs `added`.
pub fn first_u64(value: &Value, keys: &[&str]) -> Option<u64> {
    let object = match value {
        Value::Object(map) => map,
        _ => return None,
    };
    keys.iter().find_map(|key| object.get(*key).and_then(Value::as_u64))
}

// ── Tests ──────────────────────────────────────────────────────
