//! Interview request drafts for shortlisted candidates

use crate::config::EmailConfig;
use crate::error::{RecordKind, Result, ScreenerError};
use crate::profile::CandidateProfile;
use crate::scoring::ShortlistedCandidate;
use crate::storage::Database;
use askama::Template;
use log::{info, warn};
use serde::Serialize;

const FALLBACK_NAME: &str = "Candidate";

#[derive(Template)]
#[template(source = r#"Dear {{ candidate_name }},

Thank you for your interest in the {{ job_title }} position at {{ company_name }}.

Your qualifications and experience align well with what we are looking for, and we would like to invite you for an initial interview to discuss your background and the role further.

Please let us know your availability over the next few business days for a brief 30-minute call. We can be flexible with timing.

We look forward to hearing from you soon.

Best regards,

{{ sender_name }}
{{ company_name }}
"#, ext = "txt")]
struct InterviewEmail<'a> {
    candidate_name: &'a str,
    job_title: &'a str,
    company_name: &'a str,
    sender_name: &'a str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DraftEmail {
    pub candidate_id: i64,
    pub cv_filename: String,
    pub subject: String,
    pub body: String,
}

/// Draft one interview request per shortlisted candidate of a job.
///
/// Candidates whose row has disappeared are skipped with a warning.
pub fn draft_interview_requests(
    db: &Database,
    job_id: i64,
    shortlisted: &[ShortlistedCandidate],
    email: &EmailConfig,
) -> Result<Vec<DraftEmail>> {
    let job = db.job(job_id)?.ok_or(ScreenerError::MissingRecord {
        kind: RecordKind::Job,
        id: job_id,
    })?;
    info!("Drafting interview requests for job {job_id} ({})", job.title);

    let subject = format!("Interview Request: {} at {}", job.title, email.company_name);
    let mut drafts = Vec::with_capacity(shortlisted.len());

    for entry in shortlisted {
        let Some(candidate) = db.candidate(entry.candidate_id)? else {
            warn!("Skipping email for candidate {}: row not found", entry.candidate_id);
            continue;
        };

        let profile = candidate
            .extracted_json
            .as_deref()
            .and_then(|payload| CandidateProfile::from_payload(payload).ok());
        let candidate_name = profile
            .as_ref()
            .map(CandidateProfile::display_name)
            .unwrap_or(FALLBACK_NAME);

        let body = InterviewEmail {
            candidate_name,
            job_title: &job.title,
            company_name: &email.company_name,
            sender_name: &email.sender_name,
        }
        .render()?;

        drafts.push(DraftEmail {
            candidate_id: entry.candidate_id,
            cv_filename: candidate.cv_filename,
            subject: subject.clone(),
            body,
        });
    }

    info!("Drafted {} interview requests for job {job_id}", drafts.len());
    Ok(drafts)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn email_config() -> EmailConfig {
        EmailConfig {
            company_name: "Acme".to_string(),
            sender_name: "Acme Hiring Team".to_string(),
        }
    }

    fn shortlisted(candidate_id: i64, cv_filename: &str) -> ShortlistedCandidate {
        ShortlistedCandidate {
            candidate_id,
            cv_filename: cv_filename.to_string(),
            score: 0.8,
        }
    }

    #[test]
    fn test_drafts_use_candidate_name_and_company() {
        let db = Database::open_in_memory().unwrap();
        let job_id = db.add_job_description("Data Engineer", "Build pipelines").unwrap();
        let candidate_id = db.add_candidate("ada.pdf", "cv text").unwrap();
        let profile = CandidateProfile {
            name: Some("Ada Lovelace".to_string()),
            ..Default::default()
        };
        db.update_candidate_extraction(candidate_id, &profile).unwrap();

        let drafts =
            draft_interview_requests(&db, job_id, &[shortlisted(candidate_id, "ada.pdf")], &email_config())
                .unwrap();

        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].subject, "Interview Request: Data Engineer at Acme");
        assert!(drafts[0].body.starts_with("Dear Ada Lovelace,"));
        assert!(drafts[0].body.contains("Data Engineer position at Acme"));
        assert!(drafts[0].body.contains("30-minute call"));
        assert!(drafts[0].body.contains("Best regards,\n\nAcme Hiring Team\nAcme"));
    }

    #[test]
    fn test_name_falls_back_without_profile() {
        let db = Database::open_in_memory().unwrap();
        let job_id = db.add_job_description("Analyst", "Numbers").unwrap();
        let candidate_id = db.add_candidate("anon.pdf", "cv text").unwrap();

        let drafts =
            draft_interview_requests(&db, job_id, &[shortlisted(candidate_id, "anon.pdf")], &email_config())
                .unwrap();
        assert!(drafts[0].body.starts_with("Dear Candidate,"));
    }

    #[test]
    fn test_missing_candidate_is_skipped() {
        let db = Database::open_in_memory().unwrap();
        let job_id = db.add_job_description("Analyst", "Numbers").unwrap();
        let candidate_id = db.add_candidate("kept.pdf", "cv text").unwrap();

        let drafts = draft_interview_requests(
            &db,
            job_id,
            &[shortlisted(999, "gone.pdf"), shortlisted(candidate_id, "kept.pdf")],
            &email_config(),
        )
        .unwrap();

        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].cv_filename, "kept.pdf");
    }

    #[test]
    fn test_missing_job_is_an_error() {
        let db = Database::open_in_memory().unwrap();
        let err = draft_interview_requests(&db, 42, &[], &email_config()).unwrap_err();
        assert!(matches!(
            err,
            ScreenerError::MissingRecord {
                kind: RecordKind::Job,
                id: 42
            }
        ));
    }
}
