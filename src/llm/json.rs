//! Pulling a JSON object out of a model reply

use crate::error::{Result, ScreenerError};
use serde_json::Value;

/// Parse the JSON object in a model reply, tolerating code fences and
/// prose around it.
pub fn extract_json_object(reply: &str) -> Result<Value> {
    let trimmed = strip_fences(reply.trim());
    if trimmed.is_empty() {
        return Err(ScreenerError::Extraction("model returned an empty reply".to_string()));
    }

    if let Ok(value @ Value::Object(_)) = serde_json::from_str::<Value>(trimmed) {
        return Ok(value);
    }

    let (Some(start), Some(end)) = (trimmed.find('{'), trimmed.rfind('}')) else {
        return Err(ScreenerError::Extraction(format!(
            "no JSON object in reply: {}",
            preview(trimmed)
        )));
    };
    if end < start {
        return Err(ScreenerError::Extraction(format!(
            "no JSON object in reply: {}",
            preview(trimmed)
        )));
    }

    match serde_json::from_str::<Value>(&trimmed[start..=end]) {
        Ok(value @ Value::Object(_)) => Ok(value),
        Ok(_) => Err(ScreenerError::Extraction("reply is not a JSON object".to_string())),
        Err(err) => Err(ScreenerError::Extraction(format!(
            "invalid JSON in reply ({err}): {}",
            preview(trimmed)
        ))),
    }
}

fn strip_fences(text: &str) -> &str {
    let text = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"))
        .unwrap_or(text);
    text.strip_suffix("```").unwrap_or(text).trim()
}

fn preview(text: &str) -> String {
    text.chars().take(80).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_object() {
        let value = extract_json_object(r#"{"skills": ["rust"]}"#).unwrap();
        assert_eq!(value["skills"][0], "rust");
    }

    #[test]
    fn test_fenced_object() {
        let value = extract_json_object("```json\n{\"a\": 1}\n```").unwrap();
        assert_eq!(value["a"], 1);
    }

    #[test]
    fn test_object_inside_prose() {
        let value = extract_json_object("Here you go: {\"a\": {\"b\": 2}} Hope this helps").unwrap();
        assert_eq!(value["a"]["b"], 2);
    }

    #[test]
    fn test_rejects_non_objects() {
        assert!(extract_json_object("").is_err());
        assert!(extract_json_object("[1, 2, 3]").is_err());
        assert!(extract_json_object("no json here").is_err());
        assert!(extract_json_object("} backwards {").is_err());
    }
}
