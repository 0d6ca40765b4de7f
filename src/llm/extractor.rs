//! Structured profile extraction through a language model

use crate::error::{Result, ScreenerError};
use crate::llm::client::ChatBackend;
use crate::llm::json::extract_json_object;
use crate::llm::prompts::{render_cv_extraction, render_job_summary, CV_SYSTEM_MESSAGE, JD_SYSTEM_MESSAGE};
use crate::profile::{CandidateProfile, JobProfile};
use log::{debug, info};

/// CVs shorter than this carry too little to extract from.
pub const MIN_CV_CHARS: usize = 50;
pub const DEFAULT_MAX_CV_CHARS: usize = 15_000;

/// Turns free text into validated profiles.
pub trait ProfileExtractor {
    fn summarize_job(&self, description: &str) -> Result<JobProfile>;
    fn extract_candidate(&self, cv_text: &str) -> Result<CandidateProfile>;
}

pub struct LlmExtractor<B> {
    backend: B,
    max_cv_chars: usize,
}

impl<B: ChatBackend> LlmExtractor<B> {
    pub fn new(backend: B, max_cv_chars: usize) -> Self {
        Self { backend, max_cv_chars }
    }
}

impl<B: ChatBackend> ProfileExtractor for LlmExtractor<B> {
    fn summarize_job(&self, description: &str) -> Result<JobProfile> {
        let description = description.trim();
        if description.is_empty() {
            return Err(ScreenerError::InvalidInput("job description is empty".to_string()));
        }

        let reply = self.backend.complete_json(JD_SYSTEM_MESSAGE, &render_job_summary(description))?;
        let value = extract_json_object(&reply)?;
        let profile = JobProfile::from_value(&value)?;
        debug!("Job summary: {} required skills", profile.required_skills.len());
        Ok(profile)
    }

    fn extract_candidate(&self, cv_text: &str) -> Result<CandidateProfile> {
        let cv_text = cv_text.trim();
        let length = cv_text.chars().count();
        if length < MIN_CV_CHARS {
            return Err(ScreenerError::InvalidInput(format!(
                "CV text too short to extract from ({length} chars)"
            )));
        }

        let cv_text = truncate_chars(cv_text, self.max_cv_chars);
        if length > self.max_cv_chars {
            info!("CV text truncated from {length} to {} chars", self.max_cv_chars);
        }

        let reply = self.backend.complete_json(CV_SYSTEM_MESSAGE, &render_cv_extraction(cv_text))?;
        let value = extract_json_object(&reply)?;
        let profile = CandidateProfile::from_value(&value)?;
        debug!("Candidate profile: {} skills", profile.skills.len());
        Ok(profile)
    }
}

fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
