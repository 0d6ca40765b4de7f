//! Candidate profile derived from a CV

use super::normalize::{first_text, optional_years, string_list, string_set, Case, Entries};
use super::{expect_object, parse_payload, PayloadError};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeSet;

/// Only the most recent titles are kept.
pub const MAX_RECENT_JOB_TITLES: usize = 2;

const NAME_KEYS: [&str; 3] = ["name", "candidate_name", "full_name"];

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CandidateProfile {
    pub name: Option<String>,
    pub skills: BTreeSet<String>,
    pub domain_expertise: BTreeSet<String>,
    pub soft_skills: BTreeSet<String>,
    pub certifications: BTreeSet<String>,
    /// Lower-cased phrases, most relevant first as extracted
    pub education: Vec<String>,
    pub total_experience_years: Option<f64>,
    pub recent_job_titles: Vec<String>,
    pub industry_experience: BTreeSet<String>,
}

impl CandidateProfile {
    pub fn from_value(value: &Value) -> Result<Self, PayloadError> {
        let obj = expect_object(value)?;

        let mut recent_job_titles = string_list(obj, "recent_job_titles", Entries::Text, Case::Keep);
        recent_job_titles.truncate(MAX_RECENT_JOB_TITLES);

        Ok(Self {
            name: first_text(obj, &NAME_KEYS),
            skills: string_set(obj, "skills", Entries::TextOrNumber),
            domain_expertise: string_set(obj, "domain_expertise", Entries::Text),
            soft_skills: string_set(obj, "soft_skills", Entries::Text),
            certifications: string_set(obj, "certifications", Entries::Text),
            education: string_list(obj, "education", Entries::Text, Case::Lower),
            total_experience_years: optional_years(obj, "total_experience_years"),
            recent_job_titles,
            industry_experience: string_set(obj, "industry_experience", Entries::Text),
        })
    }

    pub fn from_payload(text: &str) -> Result<Self, PayloadError> {
        Self::from_value(&parse_payload(text)?)
    }

    /// Every skill-like term the candidate claims.
    pub fn all_terms(&self) -> BTreeSet<String> {
        self.skills
            .iter()
            .chain(&self.domain_expertise)
            .chain(&self.soft_skills)
            .cloned()
            .collect()
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("Candidate")
    }
}
