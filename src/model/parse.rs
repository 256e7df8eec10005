use serde_json::Value;

/// Parses model output as JSON, unwrapping a fenced code block if present.
///
/// Returns [`Value::Null`] when no JSON can be recovered.
pub fn parse_response_json(text: &str) -> Value {
    let trimmed = text.trim();
    if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
        return value;
    }

    fenced_block(trimmed)
        .and_then(|body| serde_json::from_str::<Value>(body).ok())
        .unwrap_or(Value::Null)
}

/// Body of the first ```` ``` ```` block, skipping an optional language tag.
fn fenced_block(text: &str) -> Option<&str> {
    let start = text.find("```")?;
    let after_fence = &text[start + 3..];
    let body_start = after_fence.find('\n')? + 1;
    let body = &after_fence[body_start..];
    let end = body.find("```")?;
    Some(body[..end].trim())
}
