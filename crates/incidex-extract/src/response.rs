//! Tolerant JSON object extraction from free-form backend output.
//!
//! Models wrap their answer in markdown fences or prose. Candidates are tried
//! in priority order and the first one that decodes to a JSON object wins.

use incidex_core::{Error, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};

/// Untyped field mapping decoded from the backend response.
pub type ParsedFields = Map<String, Value>;

/// Candidate patterns, highest priority first.
static CANDIDATE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        // ```json { ... } ```
        Regex::new(r"(?s)```json\s*(\{.*?\})\s*```").unwrap(),
        // ``` { ... } ```
        Regex::new(r"(?s)```\s*(\{.*?\})\s*```").unwrap(),
        // first {...} anywhere, non-greedy
        Regex::new(r"(?s)(\{.*?\})").unwrap(),
    ]
});

/// Locate and decode the JSON object embedded in `text`.
pub fn extract_json(text: &str) -> Result<ParsedFields> {
    let trimmed = text.trim();

    // A response that is entirely valid JSON but not an object is rejected
    // outright instead of mining it for a nested object.
    if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
        return match value {
            Value::Object(map) => Ok(map),
            other => Err(Error::malformed(
                text,
                format!("expected a JSON object, found {}", json_kind(&other)),
            )),
        };
    }

    for pattern in CANDIDATE_PATTERNS.iter() {
        let Some(caps) = pattern.captures(trimmed) else {
            continue;
        };
        if let Some(Value::Object(map)) = caps
            .get(1)
            .and_then(|m| serde_json::from_str::<Value>(m.as_str().trim()).ok())
        {
            return Ok(map);
        }
    }

    if trimmed.starts_with('{') && trimmed.ends_with('}') {
        return match serde_json::from_str::<Value>(trimmed) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(other) => Err(Error::malformed(
                text,
                format!("expected a JSON object, found {}", json_kind(&other)),
            )),
            Err(e) => Err(Error::malformed(text, format!("Failed to parse JSON: {}", e))),
        };
    }

    Err(Error::malformed(text, "No valid JSON found in response"))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
