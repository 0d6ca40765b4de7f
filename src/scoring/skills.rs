//! Skill match scoring

use crate::profile::{CandidateProfile, JobProfile};
use crate::scoring::synonyms::SynonymTable;
use log::debug;
use std::collections::BTreeSet;

pub const REQUIRED_WEIGHT: f64 = 0.60;
pub const PREFERRED_WEIGHT: f64 = 0.10;
pub const DOMAIN_WEIGHT: f64 = 0.15;
pub const SOFT_WEIGHT: f64 = 0.15;

const NEUTRAL: f64 = 0.5;

/// One skill category of the job summary, compared against a candidate pool.
struct Category<'a> {
    name: &'static str,
    raw: &'a BTreeSet<String>,
    searched: BTreeSet<String>,
    pool: &'a BTreeSet<String>,
    weight: f64,
    /// Reported when the job lists nothing for this category
    fallback: f64,
}

impl Category<'_> {
    fn listed(&self) -> bool {
        !self.raw.is_empty()
    }

    /// Matches found among the searched terms, relative to what the job listed.
    /// Synonym hits can outnumber the listed terms, so the ratio is capped at 1.
    fn ratio(&self) -> f64 {
        if !self.listed() {
            return self.fallback;
        }
        let hits = self.searched.intersection(self.pool).count();
        (hits as f64 / self.raw.len() as f64).min(1.0)
    }
}

/// Weighted skill compatibility in [0, 1].
///
/// Required, preferred and domain skills are synonym-expanded before matching;
/// soft skills are compared literally. Only categories the job actually lists
/// take part in the weighted average, so a summary without soft skills is not
/// penalised for it. A summary listing no category at all scores a neutral 0.5.
pub fn score_skills(job: &JobProfile, cand: &CandidateProfile, synonyms: &SynonymTable) -> f64 {
    if job.has_no_skill_categories() {
        debug!("  Skill match: no skill categories in job summary, neutral {NEUTRAL}");
        return NEUTRAL;
    }

    let all_terms = cand.all_terms();

    let categories = [
        Category {
            name: "required",
            raw: &job.required_skills,
            searched: synonyms.expand(&job.required_skills),
            pool: &all_terms,
            weight: REQUIRED_WEIGHT,
            fallback: NEUTRAL,
        },
        Category {
            name: "preferred",
            raw: &job.preferred_skills,
            searched: synonyms.expand(&job.preferred_skills),
            pool: &all_terms,
            weight: PREFERRED_WEIGHT,
            // preferred skills are a bonus; listing none earns nothing
            fallback: 0.0,
        },
        Category {
            name: "domain",
            raw: &job.domain_expertise,
            searched: synonyms.expand(&job.domain_expertise),
            pool: &cand.domain_expertise,
            weight: DOMAIN_WEIGHT,
            fallback: NEUTRAL,
        },
        Category {
            name: "soft",
            raw: &job.soft_skills,
            searched: job.soft_skills.clone(),
            pool: &cand.soft_skills,
            weight: SOFT_WEIGHT,
            fallback: NEUTRAL,
        },
    ];

    let mut weighted_score = 0.0;
    let mut total_weight = 0.0;

    for category in &categories {
        let ratio = category.ratio();
        if category.listed() {
            debug!(
                "    {} skills: listed {} (expanded {}) -> {:.3}",
                category.name,
                category.raw.len(),
                category.searched.len(),
                ratio
            );
            weighted_score += ratio * category.weight;
            total_weight += category.weight;
        } else {
            debug!("    {} skills: none listed -> {:.3}", category.name, ratio);
        }
    }

    // at least one category is listed, so total_weight > 0
    let score = weighted_score / total_weight;
    debug!("  Skill match: {score:.3}");
    score
}
