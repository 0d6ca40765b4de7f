//! Job profile derived from a job description summary

use super::normalize::{optional_text, string_list, string_set, Case, Entries};
use super::{expect_object, parse_payload, PayloadError};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct JobProfile {
    pub required_skills: BTreeSet<String>,
    pub preferred_skills: BTreeSet<String>,
    pub domain_expertise: BTreeSet<String>,
    pub soft_skills: BTreeSet<String>,
    pub required_education: Option<String>,
    /// Free-form, e.g. "3-5 years"; parsed by the experience scorer
    pub required_experience_years: Option<String>,
    pub essential_requirements: BTreeSet<String>,
    pub key_responsibilities: Vec<String>,
}

impl JobProfile {
    /// Validate an extracted summary. Only the top-level shape is strict.
    pub fn from_value(value: &Value) -> Result<Self, PayloadError> {
        let obj = expect_object(value)?;

        Ok(Self {
            required_skills: string_set(obj, "required_skills", Entries::TextOrNumber),
            preferred_skills: string_set(obj, "preferred_skills", Entries::TextOrNumber),
            domain_expertise: string_set(obj, "domain_expertise", Entries::Text),
            soft_skills: string_set(obj, "soft_skills", Entries::Text),
            required_education: optional_text(obj, "required_education", Case::Lower),
            required_experience_years: optional_text(obj, "required_experience_years", Case::Keep),
            essential_requirements: string_set(obj, "essential_requirements", Entries::Text),
            key_responsibilities: string_list(obj, "key_responsibilities", Entries::Text, Case::Keep),
        })
    }

    pub fn from_payload(text: &str) -> Result<Self, PayloadError> {
        Self::from_value(&parse_payload(text)?)
    }

    /// True when the summary lists no skill category at all.
    pub fn has_no_skill_categories(&self) -> bool {
        self.required_skills.is_empty()
            && self.preferred_skills.is_empty()
            && self.domain_expertise.is_empty()
            && self.soft_skills.is_empty()
    }
}
