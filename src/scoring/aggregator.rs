//! Weighted aggregation of the component scores

use crate::error::{RecordKind, Result, ScreenerError};
use crate::profile::{CandidateProfile, JobProfile, PayloadError};
use crate::scoring::education::score_education;
use crate::scoring::experience::score_experience;
use crate::scoring::requirements::score_requirements;
use crate::scoring::skills::score_skills;
use crate::scoring::synonyms::SynonymTable;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

pub const INVALID_PAYLOAD: &str = "Invalid JSON data structure";

/// Weight of each component in the overall score. They need not sum to 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchWeights {
    pub skills: f64,
    pub experience: f64,
    pub education: f64,
    pub requirements: f64,
}

impl Default for MatchWeights {
    fn default() -> Self {
        Self {
            skills: 0.4,
            experience: 0.25,
            education: 0.25,
            requirements: 0.1,
        }
    }
}

impl MatchWeights {
    /// Interpret a raw configuration value. Absent keys take their defaults;
    /// anything malformed discards the whole map in favour of the defaults.
    pub fn resolve(raw: Option<&toml::Value>) -> Self {
        let Some(raw) = raw else {
            return Self::default();
        };

        let parsed = raw
            .clone()
            .try_into::<MatchWeights>()
            .map_err(|e| e.to_string())
            .and_then(|weights| weights.validate().map(|_| weights));

        match parsed {
            Ok(weights) => weights,
            Err(reason) => {
                let defaults = Self::default();
                warn!("Invalid matching weights ({reason}). Using defaults: {defaults:?}");
                defaults
            }
        }
    }

    fn validate(&self) -> std::result::Result<(), String> {
        let entries = [
            ("skills", self.skills),
            ("experience", self.experience),
            ("education", self.education),
            ("requirements", self.requirements),
        ];
        for (key, weight) in entries {
            if !weight.is_finite() || weight < 0.0 {
                return Err(format!("'{key}' must be a non-negative number, got {weight}"));
            }
        }
        Ok(())
    }
}

/// Per-component scores as persisted, rounded to three decimals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchBreakdown {
    pub skills_score: f64,
    pub experience_score: f64,
    pub education_score: f64,
    pub requirements_score: f64,
    pub weights_used: MatchWeights,
}

/// Explanation recorded when a stored payload cannot be read as a profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayloadFailure {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jd_error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cv_error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MatchDetails {
    Scored(MatchBreakdown),
    Failed(PayloadFailure),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub overall_score: f64,
    pub details: MatchDetails,
}

impl MatchResult {
    pub fn breakdown(&self) -> Option<&MatchBreakdown> {
        match &self.details {
            MatchDetails::Scored(breakdown) => Some(breakdown),
            MatchDetails::Failed(_) => None,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self.details, MatchDetails::Failed(_))
    }
}

pub fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// Scores job/candidate pairs with a fixed synonym table and weight vector.
#[derive(Debug, Clone, Default)]
pub struct Matcher {
    synonyms: SynonymTable,
    weights: MatchWeights,
}

impl Matcher {
    pub fn new(synonyms: SynonymTable, weights: MatchWeights) -> Self {
        Self { synonyms, weights }
    }

    pub fn weights(&self) -> &MatchWeights {
        &self.weights
    }

    pub fn aggregate(&self, job: &JobProfile, cand: &CandidateProfile) -> MatchResult {
        let skills = score_skills(job, cand, &self.synonyms);
        let experience = score_experience(
            job.required_experience_years.as_deref(),
            cand.total_experience_years,
        );
        let education = score_education(job.required_education.as_deref(), &cand.education);
        let requirements = score_requirements(job, cand);

        let w = &self.weights;
        let overall = skills * w.skills
            + experience * w.experience
            + education * w.education
            + requirements * w.requirements;
        let overall = overall.clamp(0.0, 1.0);

        debug!(
            "Components: skills {skills:.3}, experience {experience:.3}, education {education:.3}, requirements {requirements:.3}"
        );

        MatchResult {
            overall_score: overall,
            details: MatchDetails::Scored(MatchBreakdown {
                skills_score: round3(skills),
                experience_score: round3(experience),
                education_score: round3(education),
                requirements_score: round3(requirements),
                weights_used: *w,
            }),
        }
    }

    /// Score two stored payloads.
    ///
    /// A payload that is absent altogether is an error: the pair cannot be
    /// scored. A payload that is present but unreadable scores 0.0 with the
    /// reason recorded, so a sweep over many pairs keeps going.
    pub fn score_payloads(
        &self,
        job_id: i64,
        job_payload: Option<&str>,
        candidate_id: i64,
        candidate_payload: Option<&str>,
    ) -> Result<MatchResult> {
        let job_payload = job_payload.ok_or(ScreenerError::MissingRecord {
            kind: RecordKind::Job,
            id: job_id,
        })?;
        let candidate_payload = candidate_payload.ok_or(ScreenerError::MissingRecord {
            kind: RecordKind::Candidate,
            id: candidate_id,
        })?;

        let job = JobProfile::from_payload(job_payload);
        let cand = CandidateProfile::from_payload(candidate_payload);

        let result = match (job, cand) {
            (Ok(job), Ok(cand)) => self.aggregate(&job, &cand),
            (job, cand) => {
                warn!("Invalid payload for job {job_id} or candidate {candidate_id}");
                invalid_payload_result(job.err(), cand.err())
            }
        };

        info!(
            "Calculated score {:.3} (job {job_id} vs candidate {candidate_id})",
            result.overall_score
        );
        Ok(result)
    }
}

fn invalid_payload_result(jd: Option<PayloadError>, cv: Option<PayloadError>) -> MatchResult {
    MatchResult {
        overall_score: 0.0,
        details: MatchDetails::Failed(PayloadFailure {
            error: INVALID_PAYLOAD.to_string(),
            jd_error: jd.map(|e| format!("Invalid job payload: {e}")),
            cv_error: cv.map(|e| format!("Invalid candidate payload: {e}")),
        }),
    }
}
