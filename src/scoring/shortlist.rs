//! Threshold shortlisting of scored candidates

use crate::error::Result;
use crate::scoring::aggregator::round3;
use crate::storage::MatchStore;
use log::{info, warn};
use serde::Serialize;

pub const DEFAULT_THRESHOLD: f64 = 0.75;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ShortlistDecision {
    pub candidate_id: i64,
    pub score: f64,
    pub shortlisted: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShortlistedCandidate {
    pub candidate_id: i64,
    pub cv_filename: String,
    pub score: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shortlister {
    threshold: f64,
}

impl Shortlister {
    /// Thresholds outside [0, 1] are clamped; a non-number falls back to the default.
    pub fn new(threshold: f64) -> Self {
        let threshold = if threshold.is_nan() {
            warn!("Shortlisting threshold is not a number, using {DEFAULT_THRESHOLD}");
            DEFAULT_THRESHOLD
        } else if !(0.0..=1.0).contains(&threshold) {
            let clamped = threshold.clamp(0.0, 1.0);
            warn!("Shortlisting threshold {threshold} outside [0, 1], using {clamped}");
            clamped
        } else {
            threshold
        };
        Self { threshold }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// One decision per score, in input order.
    pub fn decide(&self, scores: &[(i64, f64)]) -> Vec<ShortlistDecision> {
        scores
            .iter()
            .map(|&(candidate_id, score)| ShortlistDecision {
                candidate_id,
                score,
                shortlisted: score >= self.threshold,
            })
            .collect()
    }

    /// Candidates that pass, in input order.
    pub fn shortlist(&self, scores: &[(i64, f64)]) -> Vec<i64> {
        self.decide(scores)
            .into_iter()
            .filter(|decision| decision.shortlisted)
            .map(|decision| decision.candidate_id)
            .collect()
    }

    /// Rewrite the shortlist flag of every stored match for a job.
    ///
    /// Every row is written, passing or not, so a stricter threshold or a
    /// lower rescore removes candidates shortlisted by an earlier run.
    pub fn apply(&self, store: &impl MatchStore, job_id: i64) -> Result<Vec<ShortlistedCandidate>> {
        let matches = store.matches_for_job(job_id)?;
        if matches.is_empty() {
            info!("No matches stored for job {job_id}");
            return Ok(Vec::new());
        }

        let mut shortlisted = Vec::new();
        for stored in &matches {
            let passes = stored.score >= self.threshold;
            store.set_shortlist_status(job_id, stored.candidate_id, passes)?;
            if passes {
                shortlisted.push(ShortlistedCandidate {
                    candidate_id: stored.candidate_id,
                    cv_filename: stored.cv_filename.clone(),
                    score: round3(stored.score),
                });
            }
        }

        info!(
            "Shortlisted {} of {} candidates for job {job_id} (threshold {:.2})",
            shortlisted.len(),
            matches.len(),
            self.threshold
        );
        Ok(shortlisted)
    }
}

impl Default for Shortlister {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::MatchResult;
    use crate::storage::StoredMatch;
    use std::cell::RefCell;
    use std::collections::BTreeMap;

    /// In-memory store keyed by (job, candidate).
    #[derive(Default)]
    struct MemoryStore {
        rows: RefCell<BTreeMap<(i64, i64), StoredMatch>>,
    }

    impl MemoryStore {
        fn with_scores(job_id: i64, scores: &[(i64, f64)]) -> Self {
            let store = Self::default();
            for &(candidate_id, score) in scores {
                store.rows.borrow_mut().insert(
                    (job_id, candidate_id),
                    StoredMatch {
                        job_id,
                        candidate_id,
                        cv_filename: format!("cv_{candidate_id}.pdf"),
                        score,
                        shortlisted: false,
                        details_json: None,
                        timestamp: None,
                    },
                );
            }
            store
        }

        fn flags(&self, job_id: i64) -> Vec<(i64, bool)> {
            self.rows
                .borrow()
                .values()
                .filter(|row| row.job_id == job_id)
                .map(|row| (row.candidate_id, row.shortlisted))
                .collect()
        }
    }

    impl MatchStore for MemoryStore {
        fn upsert_match(&self, job_id: i64, candidate_id: i64, result: &MatchResult) -> Result<()> {
            let mut rows = self.rows.borrow_mut();
            let row = rows.entry((job_id, candidate_id)).or_insert(StoredMatch {
                job_id,
                candidate_id,
                cv_filename: format!("cv_{candidate_id}.pdf"),
                score: 0.0,
                shortlisted: false,
                details_json: None,
                timestamp: None,
            });
            row.score = result.overall_score;
            Ok(())
        }

        fn matches_for_job(&self, job_id: i64) -> Result<Vec<StoredMatch>> {
            let mut matches: Vec<StoredMatch> = self
                .rows
                .borrow()
                .values()
                .filter(|row| row.job_id == job_id)
                .cloned()
                .collect();
            matches.sort_by(|a, b| b.score.total_cmp(&a.score));
            Ok(matches)
        }

        fn set_shortlist_status(&self, job_id: i64, candidate_id: i64, shortlisted: bool) -> Result<()> {
            if let Some(row) = self.rows.borrow_mut().get_mut(&(job_id, candidate_id)) {
                row.shortlisted = shortlisted;
            }
            Ok(())
        }

        fn shortlisted_for_job(&self, job_id: i64) -> Result<Vec<StoredMatch>> {
            Ok(self
                .matches_for_job(job_id)?
                .into_iter()
                .filter(|row| row.shortlisted)
                .collect())
        }
    }

    #[test]
    fn test_decide_uses_inclusive_threshold() {
        let decisions = Shortlister::new(0.75).decide(&[(1, 0.75), (2, 0.7499), (3, 0.9)]);
        let flags: Vec<bool> = decisions.iter().map(|d| d.shortlisted).collect();
        assert_eq!(flags, vec![true, false, true]);
    }

    #[test]
    fn test_shortlist_keeps_input_order() {
        let ids = Shortlister::new(0.5).shortlist(&[(3, 0.6), (1, 0.2), (2, 0.9)]);
        assert_eq!(ids, vec![3, 2]);
    }

    #[test]
    fn test_threshold_is_clamped() {
        assert_eq!(Shortlister::new(1.7).threshold(), 1.0);
        assert_eq!(Shortlister::new(-0.2).threshold(), 0.0);
        assert_eq!(Shortlister::new(f64::NAN).threshold(), DEFAULT_THRESHOLD);
        assert_eq!(Shortlister::default().threshold(), 0.75);
    }

    #[test]
    fn test_apply_is_idempotent() {
        let store = MemoryStore::with_scores(1, &[(10, 0.8), (11, 0.5)]);
        let shortlister = Shortlister::new(0.75);

        let first = shortlister.apply(&store, 1).unwrap();
        let flags_first = store.flags(1);
        let second = shortlister.apply(&store, 1).unwrap();

        assert_eq!(first, second);
        assert_eq!(flags_first, store.flags(1));
        assert_eq!(store.flags(1), vec![(10, true), (11, false)]);
    }

    #[test]
    fn test_apply_overwrites_previous_decisions() {
        let store = MemoryStore::with_scores(1, &[(10, 0.8), (11, 0.5)]);

        Shortlister::new(0.4).apply(&store, 1).unwrap();
        assert_eq!(store.flags(1), vec![(10, true), (11, true)]);

        Shortlister::new(0.9).apply(&store, 1).unwrap();
        assert_eq!(store.flags(1), vec![(10, false), (11, false)]);

        Shortlister::new(0.75).apply(&store, 1).unwrap();
        assert_eq!(store.flags(1), vec![(10, true), (11, false)]);
    }

    #[test]
    fn test_apply_reports_rounded_scores_best_first() {
        let store = MemoryStore::with_scores(2, &[(20, 0.76543), (21, 0.91234)]);
        let shortlisted = Shortlister::new(0.75).apply(&store, 2).unwrap();

        assert_eq!(shortlisted.len(), 2);
        assert_eq!(shortlisted[0].candidate_id, 21);
        assert_eq!(shortlisted[0].score, 0.912);
        assert_eq!(shortlisted[1].cv_filename, "cv_20.pdf");
    }

    #[test]
    fn test_apply_only_touches_one_job() {
        let store = MemoryStore::with_scores(1, &[(10, 0.9)]);
        store.set_shortlist_status(1, 10, false).unwrap();
        Shortlister::new(0.5).apply(&store, 2).unwrap();
        assert_eq!(store.flags(1), vec![(10, false)]);
    }
}
