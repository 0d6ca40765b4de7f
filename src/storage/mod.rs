//! Storage layer for screening data
//!
//! Jobs, candidates and their match results live in SQLite. Scoring and
//! shortlisting only see the narrow [`MatchStore`] contract.

pub mod sqlite;

pub use sqlite::Database;

use crate::error::Result;
use crate::scoring::MatchResult;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobRecord {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub summary_json: Option<String>,
    pub timestamp: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateRecord {
    pub id: i64,
    pub cv_filename: String,
    pub cv_text: Option<String>,
    pub extracted_json: Option<String>,
    pub timestamp: Option<String>,
}

/// A persisted match row joined with the candidate's CV filename.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoredMatch {
    pub job_id: i64,
    pub candidate_id: i64,
    pub cv_filename: String,
    pub score: f64,
    pub shortlisted: bool,
    pub details_json: Option<String>,
    pub timestamp: Option<String>,
}

/// Row counts and the best matches, for inspecting a database.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DatabaseStats {
    pub total_jobs: usize,
    pub summarized_jobs: usize,
    pub total_candidates: usize,
    pub extracted_candidates: usize,
    pub total_matches: usize,
    pub matches_above_threshold: usize,
    pub shortlisted_matches: usize,
    pub top_matches: Vec<TopMatch>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopMatch {
    pub job_title: String,
    pub cv_filename: String,
    pub score: f64,
    pub details_json: Option<String>,
}

/// Persistence contract for match results and shortlist flags.
///
/// At most one row exists per (job, candidate) pair; writing a pair again
/// replaces it.
pub trait MatchStore {
    fn upsert_match(&self, job_id: i64, candidate_id: i64, result: &MatchResult) -> Result<()>;

    /// Every match for a job, best score first.
    fn matches_for_job(&self, job_id: i64) -> Result<Vec<StoredMatch>>;

    fn set_shortlist_status(&self, job_id: i64, candidate_id: i64, shortlisted: bool) -> Result<()>;

    fn shortlisted_for_job(&self, job_id: i64) -> Result<Vec<StoredMatch>>;
}
