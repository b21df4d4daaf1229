//! Lenient JSON extraction from model output.
//!
//! Models asked for JSON regularly wrap it in prose or markdown fences.
//! [`extract_json_object`] first tries the text as-is, then falls back to
//! the greedy brace span (first `{` through last `}`). Callers decide what
//! a `None` means: the food analyzer degrades to defaults, the recipe and
//! vision services surface a parse error with the raw content.

use serde_json::Value;

/// Pull the first JSON object out of free-form model text.
///
/// Returns `None` when no brace-delimited span parses as a JSON object.
/// Non-object JSON (a bare array or number) is rejected the same way.
pub fn extract_json_object(raw: &str) -> Option<Value> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
        if value.is_object() {
            return Some(value);
        }
    }

    let start = trimmed.find('{')?;
    let end = trimmed.rfind('}')?;
    if end <= start {
        return None;
    }

    serde_json::from_str::<Value>(&trimmed[start..=end])
        .ok()
        .filter(|value| value.is_object())
}
