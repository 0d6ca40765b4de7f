//! Integration tests for the screening pipeline

use cv_screener::config::EmailConfig;
use cv_screener::input::{list_cv_files, read_job_descriptions, InputManager};
use cv_screener::llm::ProfileExtractor;
use cv_screener::output::draft_interview_requests;
use cv_screener::pipeline::{process_cvs, process_job_descriptions, run_matching, run_shortlisting};
use cv_screener::profile::{CandidateProfile, JobProfile};
use cv_screener::scoring::{parse_experience_years, Matcher, Shortlister};
use cv_screener::storage::{Database, MatchStore};
use cv_screener::{Result, ScreenerError};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

const VOCABULARY: &[&str] = &["python", "sql", "rust", "react", "typescript"];

/// Keyword-driven stand-in for the LLM.
struct KeywordExtractor;

fn keywords(text: &str) -> BTreeSet<String> {
    let lower = text.to_lowercase();
    VOCABULARY
        .iter()
        .filter(|word| lower.contains(*word))
        .map(|word| word.to_string())
        .collect()
}

fn field<'a>(text: &'a str, label: &str) -> Option<&'a str> {
    text.lines()
        .find_map(|line| line.trim().strip_prefix(label))
        .map(str::trim)
}

impl ProfileExtractor for KeywordExtractor {
    fn summarize_job(&self, description: &str) -> Result<JobProfile> {
        let lower = description.to_lowercase();
        Ok(JobProfile {
            required_skills: keywords(description),
            required_education: lower.contains("bachelor").then(|| "bachelor's degree".to_string()),
            required_experience_years: description
                .split('.')
                .find(|sentence| sentence.contains("years"))
                .map(|sentence| sentence.trim().to_string()),
            ..Default::default()
        })
    }

    fn extract_candidate(&self, cv_text: &str) -> Result<CandidateProfile> {
        Ok(CandidateProfile {
            name: cv_text
                .lines()
                .map(|line| line.trim_start_matches('#').trim())
                .find(|line| !line.is_empty())
                .map(str::to_string),
            skills: keywords(cv_text),
            education: field(cv_text, "Education:")
                .map(|line| vec![line.to_lowercase()])
                .unwrap_or_default(),
            total_experience_years: field(cv_text, "Experience:").and_then(parse_experience_years),
            ..Default::default()
        })
    }
}

#[test]
fn test_text_extraction_from_txt() {
    let mut manager = InputManager::new();
    let path = Path::new("tests/fixtures/sample_resume.txt");

    let text = manager.extract_text(path).unwrap();
    assert!(text.contains("John Doe"));
    assert!(text.contains("Software Engineer"));
    assert!(text.contains("React"));
    assert!(text.contains("Node.js"));
}

#[test]
fn test_text_extraction_from_markdown() {
    let mut manager = InputManager::new();
    let path = Path::new("tests/fixtures/sample_resume.md");

    let text = manager.extract_text(path).unwrap();
    assert!(text.contains("John Doe"));
    assert!(text.contains("Software Engineer"));
    assert!(text.contains("React"));
    assert!(text.contains("Node.js"));
    // Should not contain markdown formatting
    assert!(!text.contains("**"));
    assert!(!text.contains("##"));
}

#[test]
fn test_caching_functionality() {
    let mut manager = InputManager::new();
    let path = Path::new("tests/fixtures/sample_resume.txt");

    let text1 = manager.extract_text(path).unwrap();
    assert_eq!(manager.cache_size(), 1);

    let text2 = manager.extract_text(path).unwrap();
    assert_eq!(text1, text2);
    assert_eq!(manager.cache_size(), 1);
}

#[test]
fn test_unsupported_file_type() {
    let mut manager = InputManager::new();
    let err = manager
        .extract_text(Path::new("tests/fixtures/unsupported.xyz"))
        .unwrap_err();
    assert!(matches!(err, ScreenerError::UnsupportedFormat(_)));
}

#[test]
fn test_nonexistent_file() {
    let mut manager = InputManager::new();
    let err = manager
        .extract_text(Path::new("tests/fixtures/nonexistent.txt"))
        .unwrap_err();
    assert!(matches!(err, ScreenerError::InvalidInput(_)));
}

#[test]
fn test_job_csv_fixture() {
    let postings = read_job_descriptions(Path::new("tests/fixtures/jobs.csv")).unwrap();
    let titles: Vec<&str> = postings.iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, vec!["Data Engineer", "Frontend Developer", "N/A"]);
}

#[test]
fn test_cv_listing_skips_unsupported_files() {
    let files = list_cv_files(Path::new("tests/fixtures")).unwrap();
    let names: Vec<String> = files
        .iter()
        .map(|path| path.file_name().unwrap().to_string_lossy().to_string())
        .collect();
    assert_eq!(names, vec!["sample_resume.md", "sample_resume.txt"]);
}

#[test]
fn test_offline_scoring_of_fixture_payloads() {
    let job = fs::read_to_string("tests/fixtures/job_summary.json").unwrap();
    let candidate = fs::read_to_string("tests/fixtures/candidate_profile.json").unwrap();

    let result = Matcher::default()
        .score_payloads(1, Some(&job), 1, Some(&candidate))
        .unwrap();
    let breakdown = result.breakdown().unwrap();

    assert_eq!(breakdown.skills_score, 1.0);
    assert_eq!(breakdown.experience_score, 1.0);
    assert_eq!(breakdown.education_score, 1.0);
    assert_eq!(breakdown.requirements_score, 1.0);
    assert!((result.overall_score - 1.0).abs() < 1e-9);
}

#[test]
fn test_end_to_end_screening() {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("data").join("screening.sqlite");
    let db = Database::open(&db_path).unwrap();
    let extractor = KeywordExtractor;

    let jobs = process_job_descriptions(&db, &extractor, Path::new("tests/fixtures/jobs.csv")).unwrap();
    assert_eq!(jobs.seen, 3);
    assert_eq!(jobs.extracted, 3);

    let mut inputs = InputManager::new();
    let cvs = process_cvs(&db, &extractor, &mut inputs, Path::new("tests/fixtures/cvs")).unwrap();
    assert_eq!(cvs.seen, 3);
    assert_eq!(cvs.extracted, 2);
    assert_eq!(cvs.skipped_empty, 1);

    let sweep = run_matching(&db, &Matcher::default(), false).unwrap();
    assert_eq!(sweep.jobs, 3);
    assert_eq!(sweep.candidates, 2);
    assert_eq!(sweep.scored, 6);
    assert_eq!(sweep.failed, 0);

    let shortlists = run_shortlisting(&db, &Shortlister::new(0.8)).unwrap();
    assert_eq!(shortlists.len(), 1);
    let data_engineer = &shortlists[0];
    assert_eq!(data_engineer.title, "Data Engineer");
    assert_eq!(data_engineer.candidates.len(), 1);
    assert_eq!(data_engineer.candidates[0].cv_filename, "ada_lovelace.txt");
    assert_eq!(data_engineer.candidates[0].score, 1.0);

    let matches = db.matches_for_job(data_engineer.job_id).unwrap();
    assert_eq!(matches.len(), 2);
    assert!(matches[1].score < 0.5);
    assert!(!matches[1].shortlisted);

    let email = EmailConfig {
        company_name: "Acme".to_string(),
        sender_name: "Acme Hiring Team".to_string(),
    };
    let drafts =
        draft_interview_requests(&db, data_engineer.job_id, &data_engineer.candidates, &email).unwrap();
    assert_eq!(drafts.len(), 1);
    assert_eq!(drafts[0].subject, "Interview Request: Data Engineer at Acme");
    assert!(drafts[0].body.starts_with("Dear Ada Lovelace,"));

    let stats = db.stats(0.8).unwrap();
    assert_eq!(stats.total_jobs, 3);
    assert_eq!(stats.extracted_candidates, 2);
    assert_eq!(stats.total_matches, 6);
    assert_eq!(stats.shortlisted_matches, 1);
}

#[test]
fn test_rerun_reuses_stored_profiles_and_matches() {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("screening.sqlite");
    let csv = Path::new("tests/fixtures/jobs.csv");
    let cv_dir = Path::new("tests/fixtures/cvs");

    {
        let db = Database::open(&db_path).unwrap();
        process_job_descriptions(&db, &KeywordExtractor, csv).unwrap();
        process_cvs(&db, &KeywordExtractor, &mut InputManager::new(), cv_dir).unwrap();
        run_matching(&db, &Matcher::default(), false).unwrap();
    }

    let db = Database::open(&db_path).unwrap();
    let jobs = process_job_descriptions(&db, &KeywordExtractor, csv).unwrap();
    assert_eq!(jobs.extracted, 0);
    assert_eq!(jobs.skipped_existing, 3);

    let cvs = process_cvs(&db, &KeywordExtractor, &mut InputManager::new(), cv_dir).unwrap();
    assert_eq!(cvs.extracted, 0);
    assert_eq!(cvs.skipped_existing, 2);

    run_matching(&db, &Matcher::default(), false).unwrap();
    assert_eq!(db.stats(0.75).unwrap().total_matches, 6);
}

#[test]
fn test_matching_without_candidates_reports_no_data() {
    let db = Database::open_in_memory().unwrap();
    db.add_job_description("Data Engineer", "Python").unwrap();
    let err = run_matching(&db, &Matcher::default(), false).unwrap_err();
    assert!(matches!(err, ScreenerError::NoData(_)));
}
