//! Structured job and candidate profiles
//!
//! Profiles are produced by the extraction step and validated here once, at
//! the boundary. Everything downstream (scoring, shortlisting, email drafting)
//! works on the typed structures and never inspects raw JSON.

pub mod candidate;
pub mod job;
mod normalize;

pub use candidate::CandidateProfile;
pub use job::JobProfile;

use crate::error::ScreenerError;
use serde_json::{Map, Value};
use thiserror::Error;

/// Why a stored or extracted payload could not be turned into a profile.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PayloadError {
    #[error("payload is empty")]
    Empty,

    #[error("payload is not valid JSON: {0}")]
    InvalidJson(String),

    #[error("payload is not an object (found {found})")]
    NotAnObject { found: &'static str },
}

impl From<PayloadError> for ScreenerError {
    fn from(err: PayloadError) -> Self {
        ScreenerError::MalformedPayload(err.to_string())
    }
}

/// Parse raw text into a JSON value, rejecting empty input.
pub(crate) fn parse_payload(text: &str) -> Result<Value, PayloadError> {
    if text.trim().is_empty() {
        return Err(PayloadError::Empty);
    }
    serde_json::from_str(text).map_err(|e| PayloadError::InvalidJson(e.to_string()))
}

pub(crate) fn expect_object(value: &Value) -> Result<&Map<String, Value>, PayloadError> {
    value.as_object().ok_or(PayloadError::NotAnObject {
        found: json_type_name(value),
    })
}

pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_payload_rejects_blank_text() {
        assert_eq!(parse_payload("   "), Err(PayloadError::Empty));
    }

    #[test]
    fn test_parse_payload_reports_invalid_json() {
        assert!(matches!(
            parse_payload("{not json"),
            Err(PayloadError::InvalidJson(_))
        ));
    }

    #[test]
    fn test_expect_object_names_the_found_type() {
        let value = serde_json::json!(["python"]);
        assert_eq!(
            expect_object(&value),
            Err(PayloadError::NotAnObject { found: "array" })
        );
    }
}
