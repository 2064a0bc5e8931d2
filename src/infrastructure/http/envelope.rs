//! Backend error envelope decoding
//!
//! Error bodies come in several spellings: `{ "error": { "message" } }`,
//! `{ "message" }`, or `{ "title" }` from the framework's problem
//! responses. The first one present wins; otherwise a generic message
//! derived from the status code.

use serde_json::Value;

/// Extract the most specific human-readable message from an error body.
pub fn error_message(status: u16, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        let nested = value
            .get("error")
            .and_then(|e| e.get("message"))
            .and_then(Value::as_str);
        let flat = value.get("message").and_then(Value::as_str);
        let title = value.get("title").and_then(Value::as_str);
        if let Some(message) = nested.or(flat).or(title) {
            if !message.is_empty() {
                return message.to_string();
            }
        }
    }
    format!("request failed with status {}", status)
}

// ── Tests ──────────────────────────────────────────────────────
