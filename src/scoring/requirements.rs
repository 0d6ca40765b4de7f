//! Essential requirement checks

use crate::profile::{CandidateProfile, JobProfile};
use log::debug;

/// Share of the job's essential requirements the candidate meets.
///
/// A requirement is met when it names one of the candidate's skills or
/// certifications exactly, or appears anywhere in their education text.
/// A job with no essential requirements is trivially satisfied.
pub fn score_requirements(job: &JobProfile, cand: &CandidateProfile) -> f64 {
    let requirements = &job.essential_requirements;
    if requirements.is_empty() {
        debug!("  Essential requirements: none listed -> 1.000");
        return 1.0;
    }

    let education_text = cand.education.join(" ").to_lowercase();

    let met = requirements
        .iter()
        .filter(|requirement| {
            let requirement = requirement.to_lowercase();
            let met = cand.skills.contains(&requirement)
                || cand.certifications.contains(&requirement)
                || education_text.contains(&requirement);
            debug!("    requirement '{requirement}' met: {met}");
            met
        })
        .count();

    let score = met as f64 / requirements.len() as f64;
    debug!("  Essential requirements: {met}/{} -> {score:.3}", requirements.len());
    score
}
