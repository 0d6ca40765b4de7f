//! Field-level cleaning of extracted payloads
//!
//! Missing or malformed fields never fail: set-valued fields fall back to the
//! empty set and scalar fields to `None`.

use crate::scoring::experience::parse_experience_years;
use serde_json::{Map, Value};
use std::collections::BTreeSet;

/// Which scalar entries a list field accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Entries {
    /// Strings only
    Text,
    /// Strings, plus numbers rendered as text
    TextOrNumber,
}

/// Case handling applied to each kept entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Case {
    Lower,
    Keep,
}

pub(crate) fn string_list(obj: &Map<String, Value>, key: &str, entries: Entries, case: Case) -> Vec<String> {
    let Some(Value::Array(items)) = obj.get(key) else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| scalar_text(item, entries))
        .map(|text| match case {
            Case::Lower => text.trim().to_lowercase(),
            Case::Keep => text.trim().to_string(),
        })
        .filter(|text| !text.is_empty())
        .collect()
}

pub(crate) fn string_set(obj: &Map<String, Value>, key: &str, entries: Entries) -> BTreeSet<String> {
    string_list(obj, key, entries, Case::Lower).into_iter().collect()
}

/// A scalar field rendered as text; empty strings and non-scalars become `None`.
pub(crate) fn optional_text(obj: &Map<String, Value>, key: &str, case: Case) -> Option<String> {
    let text = scalar_text(obj.get(key)?, Entries::TextOrNumber)?;
    let text = match case {
        Case::Lower => text.trim().to_lowercase(),
        Case::Keep => text.trim().to_string(),
    };
    (!text.is_empty()).then_some(text)
}

/// Years of experience given either as a number or as free text like "4.5 years".
pub(crate) fn optional_years(obj: &Map<String, Value>, key: &str) -> Option<f64> {
    match obj.get(key)? {
        Value::Number(n) => n.as_f64().filter(|years| years.is_finite()),
        Value::String(s) => parse_experience_years(s),
        _ => None,
    }
}

/// First non-empty string among several candidate keys.
pub(crate) fn first_text(obj: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| {
        obj.get(*key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    })
}

fn scalar_text(value: &Value, entries: Entries) -> Option<String> {
    match (value, entries) {
        (Value::String(s), _) => Some(s.clone()),
        (Value::Number(n), Entries::TextOrNumber) => Some(n.to_string()),
        _ => None,
    }
}
