//! Screening pipeline orchestration
//!
//! Ingestion fills the database, matching scores every job against every
//! candidate, and shortlisting applies the threshold per job. A failure on one
//! document or pair is logged and counted; the run carries on.

use crate::error::{Result, ScreenerError};
use crate::input::{list_cv_files, read_job_descriptions, InputManager};
use crate::llm::extractor::{ProfileExtractor, MIN_CV_CHARS};
use crate::scoring::{Matcher, ShortlistedCandidate, Shortlister};
use crate::storage::{Database, MatchStore};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info, warn};
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IngestSummary {
    /// Documents or rows read from the source
    pub seen: usize,
    pub extracted: usize,
    /// Already had a stored profile
    pub skipped_existing: usize,
    /// Too little text to work with
    pub skipped_empty: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SweepSummary {
    pub jobs: usize,
    pub candidates: usize,
    pub scored: usize,
    /// Scored 0.0 because a stored payload was unreadable
    pub invalid_payloads: usize,
    /// Job summary or candidate profile not extracted yet
    pub skipped: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobShortlist {
    pub job_id: i64,
    pub title: String,
    pub candidates: Vec<ShortlistedCandidate>,
}

/// Add every posting in the CSV and summarize the ones without a summary.
pub fn process_job_descriptions(
    db: &Database,
    extractor: &impl ProfileExtractor,
    csv_path: &Path,
) -> Result<IngestSummary> {
    info!("Processing job descriptions from {}", csv_path.display());
    let postings = read_job_descriptions(csv_path)?;
    let mut summary = IngestSummary {
        seen: postings.len(),
        ..Default::default()
    };

    for posting in &postings {
        let job_id = match db.job_id_for(&posting.title, &posting.description)? {
            Some(id) => id,
            None => db.add_job_description(&posting.title, &posting.description)?,
        };

        let has_summary = db
            .job(job_id)?
            .map(|record| record.summary_json.is_some())
            .unwrap_or(false);
        if has_summary {
            debug!("Skipping summarization for job {job_id}, summary already exists");
            summary.skipped_existing += 1;
            continue;
        }

        match extractor.summarize_job(&posting.description) {
            Ok(profile) => {
                db.update_job_summary(job_id, &profile)?;
                summary.extracted += 1;
            }
            Err(e) => {
                warn!("Failed to summarize job {job_id} '{}': {e}", posting.title);
                summary.failed += 1;
            }
        }
    }

    info!(
        "Finished {} job descriptions ({} summarized, {} already done, {} failed)",
        summary.seen, summary.extracted, summary.skipped_existing, summary.failed
    );
    Ok(summary)
}

/// Register every CV in the directory and extract the ones without a profile.
pub fn process_cvs(
    db: &Database,
    extractor: &impl ProfileExtractor,
    inputs: &mut InputManager,
    cv_directory: &Path,
) -> Result<IngestSummary> {
    info!("Processing CVs from {}", cv_directory.display());
    let files = list_cv_files(cv_directory)?;
    let mut summary = IngestSummary {
        seen: files.len(),
        ..Default::default()
    };

    for path in &files {
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());

        let cv_text = match inputs.extract_text(path) {
            Ok(text) => text,
            Err(e) => {
                warn!("Could not read {filename}: {e}");
                summary.failed += 1;
                continue;
            }
        };
        if cv_text.trim().chars().count() < MIN_CV_CHARS {
            warn!("Skipping {filename}: empty or too little text extracted");
            summary.skipped_empty += 1;
            continue;
        }

        let candidate_id = db.add_candidate(&filename, &cv_text)?;
        let has_profile = db
            .candidate(candidate_id)?
            .map(|record| record.extracted_json.is_some())
            .unwrap_or(false);
        if has_profile {
            debug!("Skipping extraction for candidate {candidate_id}, profile already exists");
            summary.skipped_existing += 1;
            continue;
        }

        match extractor.extract_candidate(&cv_text) {
            Ok(profile) => {
                db.update_candidate_extraction(candidate_id, &profile)?;
                summary.extracted += 1;
            }
            Err(e) => {
                warn!("Failed to extract candidate {candidate_id} ({filename}): {e}");
                summary.failed += 1;
            }
        }
    }

    info!(
        "Finished {} CVs ({} extracted, {} already done, {} failed)",
        summary.seen, summary.extracted, summary.skipped_existing, summary.failed
    );
    Ok(summary)
}

/// Score every job against every candidate and store the results.
///
/// Fails only when there are no jobs or no candidates at all.
pub fn run_matching(db: &Database, matcher: &Matcher, show_progress: bool) -> Result<SweepSummary> {
    let job_ids = db.job_ids()?;
    let candidate_ids = db.candidate_ids()?;

    if job_ids.is_empty() || candidate_ids.is_empty() {
        return Err(ScreenerError::NoData(format!(
            "{} jobs and {} candidates in the database, cannot run matching",
            job_ids.len(),
            candidate_ids.len()
        )));
    }

    let mut summary = SweepSummary {
        jobs: job_ids.len(),
        candidates: candidate_ids.len(),
        ..Default::default()
    };
    info!(
        "Calculating matches for {} jobs against {} candidates",
        job_ids.len(),
        candidate_ids.len()
    );

    // Candidate profiles are read once; a row that cannot be read fails its pairs only.
    let candidates: Vec<(i64, Result<Option<String>>)> = candidate_ids
        .iter()
        .map(|&candidate_id| (candidate_id, db.candidate_payload(candidate_id)))
        .collect();
    for (candidate_id, payload) in &candidates {
        if let Err(e) = payload {
            warn!("Could not read profile of candidate {candidate_id}: {e}");
        }
    }

    let pb = progress_bar((job_ids.len() * candidate_ids.len()) as u64, show_progress);

    for &job_id in &job_ids {
        let job_payload = match db.job_summary_json(job_id) {
            Ok(Some(payload)) => payload,
            Ok(None) => {
                warn!("Skipping job {job_id}: no summary");
                summary.skipped += candidates.len();
                pb.inc(candidates.len() as u64);
                continue;
            }
            Err(e) => {
                pb.println(format!("Failed to read job {job_id}: {e}"));
                warn!("Failed to read job {job_id}: {e}");
                summary.failed += candidates.len();
                pb.inc(candidates.len() as u64);
                continue;
            }
        };
        pb.set_message(format!("job {job_id}"));

        for (candidate_id, candidate_payload) in &candidates {
            let candidate_id = *candidate_id;
            pb.inc(1);
            let candidate_payload = match candidate_payload {
                Ok(Some(payload)) => payload,
                Ok(None) => {
                    debug!("Skipping candidate {candidate_id} for job {job_id}: no profile");
                    summary.skipped += 1;
                    continue;
                }
                Err(_) => {
                    summary.failed += 1;
                    continue;
                }
            };

            let scored = matcher
                .score_payloads(
                    job_id,
                    Some(job_payload.as_str()),
                    candidate_id,
                    Some(candidate_payload.as_str()),
                )
                .and_then(|result| {
                    db.upsert_match(job_id, candidate_id, &result)?;
                    Ok(result)
                });

            match scored {
                Ok(result) => {
                    summary.scored += 1;
                    if result.is_failure() {
                        summary.invalid_payloads += 1;
                    }
                }
                Err(e) => {
                    pb.println(format!("Failed to score job {job_id} / candidate {candidate_id}: {e}"));
                    warn!("Failed to score job {job_id} / candidate {candidate_id}: {e}");
                    summary.failed += 1;
                }
            }
        }
    }

    pb.finish_and_clear();
    info!("Calculated and stored {} match scores", summary.scored);
    Ok(summary)
}

/// Apply the shortlist threshold to every job with stored matches.
pub fn run_shortlisting(db: &Database, shortlister: &Shortlister) -> Result<Vec<JobShortlist>> {
    let mut shortlists = Vec::new();

    for job_id in db.job_ids()? {
        let candidates = shortlister.apply(db, job_id)?;
        if candidates.is_empty() {
            continue;
        }
        let title = db
            .job(job_id)?
            .map(|record| record.title)
            .unwrap_or_default();
        shortlists.push(JobShortlist {
            job_id,
            title,
            candidates,
        });
    }

    if shortlists.is_empty() {
        info!("No candidates were shortlisted at threshold {:.2}", shortlister.threshold());
    }
    Ok(shortlists)
}

fn progress_bar(len: u64, visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new(len);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
    {
        pb.set_style(style.progress_chars("#>-"));
    }
    pb
}
