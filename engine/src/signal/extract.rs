// Best-effort recovery of a JSON object from model text.
use serde_json::{Map, Value};

/// Text starting with `{` is parsed whole; otherwise the span from the first
/// `{` to the last `}` is tried. Anything unparsable becomes `{}`, which the
/// validator then rejects.
pub fn extract_json(raw: &str) -> Value {
    let text = raw.trim();
    let candidate = if text.starts_with('{') {
        Some(text)
    } else {
        match (text.find('{'), text.rfind('}')) {
            (Some(start), Some(end)) if start < end => Some(&text[start..=end]),
            _ => None,
        }
    };

    candidate
        .and_then(|json| serde_json::from_str(json).ok())
        .unwrap_or_else(|| Value::Object(Map::new()))
}
