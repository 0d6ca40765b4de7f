//! Output formatters for console and JSON

use crate::config::{OutputConfig, OutputFormat};
use crate::error::Result;
use crate::output::email::DraftEmail;
use crate::pipeline::{IngestSummary, JobShortlist, SweepSummary};
use crate::scoring::{MatchDetails, MatchResult};
use crate::storage::DatabaseStats;
use colored::*;
use serde::Serialize;
use std::path::Path;

pub trait OutputFormatter {
    fn format_match(&self, result: &MatchResult) -> Result<String>;
    fn format_shortlists(&self, shortlists: &[JobShortlist]) -> Result<String>;
    fn format_ingest(&self, source: &str, summary: &IngestSummary) -> Result<String>;
    fn format_sweep(&self, summary: &SweepSummary) -> Result<String>;
    fn format_stats(&self, stats: &DatabaseStats) -> Result<String>;
    fn format_emails(&self, drafts: &[DraftEmail]) -> Result<String>;
    fn supports_format(&self) -> OutputFormat;
}

pub struct ConsoleFormatter {
    use_colors: bool,
    detailed: bool,
}

pub struct JsonFormatter {
    pretty: bool,
}

/// Formatter for the configured output format.
pub fn formatter_for(format: OutputFormat, output: &OutputConfig) -> Box<dyn OutputFormatter> {
    match format {
        OutputFormat::Console => Box::new(ConsoleFormatter::new(output.color_output, output.detailed)),
        OutputFormat::Json => Box::new(JsonFormatter::new(true)),
    }
}

fn percent(score: f64) -> u8 {
    (score.clamp(0.0, 1.0) * 100.0).round() as u8
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool, detailed: bool) -> Self {
        Self { use_colors, detailed }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn format_header(&self, title: &str, level: u8) -> String {
        let prefix = match level {
            1 => "█",
            2 => "▓",
            _ => "▒",
        };

        let color = match level {
            1 => Color::Blue,
            2 => Color::Green,
            _ => Color::Yellow,
        };

        if self.use_colors {
            format!("\n{} {}\n", prefix.color(color).bold(), title.color(color).bold())
        } else {
            format!("\n{} {}\n", prefix, title)
        }
    }

    fn format_score_badge(&self, score: f64) -> String {
        let (badge, color) = match percent(score) {
            90..=100 => ("EXCELLENT", Color::Green),
            75..=89 => ("STRONG", Color::BrightGreen),
            60..=74 => ("FAIR", Color::Yellow),
            40..=59 => ("WEAK", Color::Red),
            _ => ("POOR", Color::BrightRed),
        };

        if self.use_colors {
            format!("[{}]", badge.color(color).bold())
        } else {
            format!("[{}]", badge)
        }
    }

    fn component_line(&self, label: &str, score: f64, weight: f64) -> String {
        format!("  {:<14} {:>5.1}%  (weight {:.2})\n", label, score * 100.0, weight)
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_match(&self, result: &MatchResult) -> Result<String> {
        let mut output = String::new();

        output.push_str(&self.format_header("🎯 MATCH SCORE", 1));
        output.push_str(&format!(
            "Overall: {:.1}% {}\n",
            result.overall_score * 100.0,
            self.format_score_badge(result.overall_score)
        ));

        match &result.details {
            MatchDetails::Scored(breakdown) => {
                let weights = &breakdown.weights_used;
                output.push_str(&self.format_header("Breakdown", 2));
                output.push_str(&self.component_line("Skills", breakdown.skills_score, weights.skills));
                output.push_str(&self.component_line(
                    "Experience",
                    breakdown.experience_score,
                    weights.experience,
                ));
                output.push_str(&self.component_line(
                    "Education",
                    breakdown.education_score,
                    weights.education,
                ));
                output.push_str(&self.component_line(
                    "Requirements",
                    breakdown.requirements_score,
                    weights.requirements,
                ));
            }
            MatchDetails::Failed(failure) => {
                output.push_str(&format!("{}\n", self.colorize(&failure.error, Color::Red)));
                for detail in [&failure.jd_error, &failure.cv_error].into_iter().flatten() {
                    output.push_str(&format!("  • {}\n", detail));
                }
            }
        }

        Ok(output)
    }

    fn format_shortlists(&self, shortlists: &[JobShortlist]) -> Result<String> {
        let mut output = self.format_header("📋 SHORTLIST", 1);

        if shortlists.is_empty() {
            output.push_str("No candidates met the threshold.\n");
            return Ok(output);
        }

        for shortlist in shortlists {
            output.push_str(&self.format_header(
                &format!("{} (job {})", shortlist.title, shortlist.job_id),
                2,
            ));
            for (rank, candidate) in shortlist.candidates.iter().enumerate() {
                output.push_str(&format!(
                    "  {:>2}. {:<40} {:.3} {}\n",
                    rank + 1,
                    candidate.cv_filename,
                    candidate.score,
                    self.format_score_badge(candidate.score)
                ));
                if self.detailed {
                    output.push_str(&format!("      candidate id {}\n", candidate.candidate_id));
                }
            }
        }

        Ok(output)
    }

    fn format_ingest(&self, source: &str, summary: &IngestSummary) -> Result<String> {
        let mut output = self.format_header(&format!("📥 {}", source), 2);
        output.push_str(&format!("Seen: {}\n", summary.seen));
        output.push_str(&format!(
            "Extracted: {}\n",
            self.colorize(&summary.extracted.to_string(), Color::Green)
        ));
        output.push_str(&format!("Already stored: {}\n", summary.skipped_existing));
        output.push_str(&format!("Too short: {}\n", summary.skipped_empty));
        if summary.failed > 0 {
            output.push_str(&format!(
                "Failed: {}\n",
                self.colorize(&summary.failed.to_string(), Color::Red)
            ));
        }
        Ok(output)
    }

    fn format_sweep(&self, summary: &SweepSummary) -> Result<String> {
        let mut output = self.format_header("🔄 MATCHING", 2);
        output.push_str(&format!(
            "{} jobs × {} candidates\n",
            summary.jobs, summary.candidates
        ));
        output.push_str(&format!(
            "Scored: {}\n",
            self.colorize(&summary.scored.to_string(), Color::Green)
        ));
        output.push_str(&format!("Skipped (not extracted yet): {}\n", summary.skipped));
        if summary.invalid_payloads > 0 {
            output.push_str(&format!(
                "Unreadable payloads: {}\n",
                self.colorize(&summary.invalid_payloads.to_string(), Color::Yellow)
            ));
        }
        if summary.failed > 0 {
            output.push_str(&format!(
                "Failed: {}\n",
                self.colorize(&summary.failed.to_string(), Color::Red)
            ));
        }
        Ok(output)
    }

    fn format_stats(&self, stats: &DatabaseStats) -> Result<String> {
        let mut output = self.format_header("🗄️  DATABASE", 1);
        output.push_str(&format!(
            "Jobs: {} ({} summarized)\n",
            stats.total_jobs, stats.summarized_jobs
        ));
        output.push_str(&format!(
            "Candidates: {} ({} extracted)\n",
            stats.total_candidates, stats.extracted_candidates
        ));
        output.push_str(&format!(
            "Matches: {} ({} above threshold, {} shortlisted)\n",
            stats.total_matches, stats.matches_above_threshold, stats.shortlisted_matches
        ));

        if !stats.top_matches.is_empty() {
            output.push_str(&self.format_header("Top matches", 3));
            for top in &stats.top_matches {
                output.push_str(&format!(
                    "  {:.3} {} ← {}\n",
                    top.score,
                    self.colorize(&top.job_title, Color::Cyan),
                    top.cv_filename
                ));
                if self.detailed {
                    if let Some(details) = &top.details_json {
                        output.push_str(&format!("        {}\n", details));
                    }
                }
            }
        }

        Ok(output)
    }

    fn format_emails(&self, drafts: &[DraftEmail]) -> Result<String> {
        let mut output = self.format_header("✉️  INTERVIEW REQUESTS", 1);
        if drafts.is_empty() {
            output.push_str("No shortlisted candidates to contact.\n");
            return Ok(output);
        }

        for draft in drafts {
            output.push_str(&self.format_header(&draft.cv_filename, 3));
            output.push_str(&format!("Subject: {}\n\n", self.colorize(&draft.subject, Color::Cyan)));
            output.push_str(&draft.body);
        }
        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Console
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    fn render<T: Serialize + ?Sized>(&self, value: &T) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(value)?)
        } else {
            Ok(serde_json::to_string(value)?)
        }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_match(&self, result: &MatchResult) -> Result<String> {
        self.render(result)
    }

    fn format_shortlists(&self, shortlists: &[JobShortlist]) -> Result<String> {
        self.render(shortlists)
    }

    fn format_ingest(&self, source: &str, summary: &IngestSummary) -> Result<String> {
        self.render(&serde_json::json!({ "source": source, "summary": summary }))
    }

    fn format_sweep(&self, summary: &SweepSummary) -> Result<String> {
        self.render(summary)
    }

    fn format_stats(&self, stats: &DatabaseStats) -> Result<String> {
        self.render(stats)
    }

    fn format_emails(&self, drafts: &[DraftEmail]) -> Result<String> {
        self.render(drafts)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Json
    }
}

pub fn save_to_file(content: &str, file_path: &Path) -> Result<()> {
    use std::fs;
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(file_path, content)?;
    Ok(())
}

pub fn suggest_filename(format: OutputFormat, stem: &str, timestamp: bool) -> String {
    let timestamp_suffix = if timestamp {
        format!("_{}", chrono::Utc::now().format("%Y%m%d_%H%M%S"))
    } else {
        String::new()
    };

    match format {
        OutputFormat::Console => format!("{}{}.txt", stem, timestamp_suffix),
        OutputFormat::Json => format!("{}{}.json", stem, timestamp_suffix),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::{MatchBreakdown, MatchWeights, PayloadFailure, ShortlistedCandidate, INVALID_PAYLOAD};
    use tempfile::tempdir;

    fn scored(overall: f64) -> MatchResult {
        MatchResult {
            overall_score: overall,
            details: MatchDetails::Scored(MatchBreakdown {
                skills_score: 0.75,
                experience_score: 1.0,
                education_score: 0.5,
                requirements_score: 1.0,
                weights_used: MatchWeights::default(),
            }),
        }
    }

    #[test]
    fn test_console_match_without_colors() {
        let output = ConsoleFormatter::new(false, false).format_match(&scored(0.8)).unwrap();
        assert!(output.contains("Overall: 80.0% [STRONG]"));
        assert!(output.contains("Skills"));
        assert!(output.contains("75.0%"));
        assert!(output.contains("(weight 0.40)"));
    }

    #[test]
    fn test_console_match_reports_payload_failure() {
        let result = MatchResult {
            overall_score: 0.0,
            details: MatchDetails::Failed(PayloadFailure {
                error: INVALID_PAYLOAD.to_string(),
                jd_error: None,
                cv_error: Some("Invalid candidate payload: empty".to_string()),
            }),
        };
        let output = ConsoleFormatter::new(false, false).format_match(&result).unwrap();
        assert!(output.contains("[POOR]"));
        assert!(output.contains(INVALID_PAYLOAD));
        assert!(output.contains("Invalid candidate payload: empty"));
    }

    #[test]
    fn test_console_shortlist_ranks_candidates() {
        let shortlists = vec![JobShortlist {
            job_id: 3,
            title: "Data Engineer".to_string(),
            candidates: vec![
                ShortlistedCandidate {
                    candidate_id: 7,
                    cv_filename: "ada.pdf".to_string(),
                    score: 0.912,
                },
                ShortlistedCandidate {
                    candidate_id: 8,
                    cv_filename: "alan.pdf".to_string(),
                    score: 0.8,
                },
            ],
        }];
        let output = ConsoleFormatter::new(false, true).format_shortlists(&shortlists).unwrap();
        assert!(output.contains("Data Engineer (job 3)"));
        assert!(output.contains(" 1. ada.pdf"));
        assert!(output.contains("0.912 [EXCELLENT]"));
        assert!(output.contains("candidate id 8"));
    }

    #[test]
    fn test_json_match_keeps_breakdown_fields() {
        let output = JsonFormatter::new(false).format_match(&scored(0.8)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["overall_score"], 0.8);
        assert_eq!(value["details"]["skills_score"], 0.75);
        assert_eq!(value["details"]["weights_used"]["skills"], 0.4);
    }

    #[test]
    fn test_json_ingest_names_source() {
        let summary = IngestSummary {
            seen: 2,
            extracted: 1,
            ..Default::default()
        };
        let output = JsonFormatter::new(true).format_ingest("cvs", &summary).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["source"], "cvs");
        assert_eq!(value["summary"]["extracted"], 1);
    }

    #[test]
    fn test_formatter_for_matches_format() {
        let output = OutputConfig {
            format: OutputFormat::Console,
            detailed: false,
            color_output: false,
        };
        assert_eq!(formatter_for(OutputFormat::Json, &output).supports_format(), OutputFormat::Json);
        assert_eq!(
            formatter_for(OutputFormat::Console, &output).supports_format(),
            OutputFormat::Console
        );
    }

    #[test]
    fn test_save_to_file_creates_parent_dirs() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("reports").join("emails.txt");
        save_to_file("hello", &path).unwrap();
        assert_eq!(std::fs::read_to_string(path).unwrap(), "hello");
    }

    #[test]
    fn test_suggest_filename() {
        assert_eq!(suggest_filename(OutputFormat::Json, "shortlist", false), "shortlist.json");
        let stamped = suggest_filename(OutputFormat::Console, "emails_job_3", true);
        assert!(stamped.starts_with("emails_job_3_"));
        assert!(stamped.ends_with(".txt"));
    }
}
