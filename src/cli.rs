//! CLI interface for the screening pipeline

use crate::config::OutputFormat;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "cv-screener")]
#[command(about = "Score CVs against job descriptions and shortlist the best matches")]
#[command(long_about = "Extract structured profiles from job descriptions and CVs with a local LLM, score every pair on skills, experience, education and essential requirements, then shortlist and draft interview requests")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Load job descriptions and CVs and extract their profiles
    Ingest {
        /// Only process the job description CSV
        #[arg(long)]
        jobs: bool,

        /// Only process the CV directory
        #[arg(long)]
        cvs: bool,
    },

    /// Score every job against every candidate
    Match,

    /// Apply the shortlisting threshold
    Shortlist {
        /// Restrict to one job id
        #[arg(short, long)]
        job: Option<i64>,

        /// Override the configured threshold
        #[arg(short, long)]
        threshold: Option<f64>,
    },

    /// Ingest, match and shortlist in one go
    Run,

    /// Score a job summary against a candidate profile, both JSON files
    Score {
        /// Job summary JSON
        #[arg(short, long)]
        job: PathBuf,

        /// Candidate profile JSON
        #[arg(short = 'C', long)]
        candidate: PathBuf,

        /// Output format: console, json
        #[arg(short, long, default_value = "console")]
        output: String,
    },

    /// Draft interview requests for a job's shortlisted candidates
    Emails {
        /// Job id
        #[arg(short, long)]
        job: i64,

        /// Save the drafts to a file; without a path a timestamped name is used
        #[arg(short, long, num_args = 0..=1)]
        save: Option<Option<PathBuf>>,
    },

    /// Show database statistics
    Inspect,

    /// Show configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Reset configuration to defaults
    Reset,

    /// Print the configuration file location
    Path,
}

/// Parse and validate output format
pub fn parse_output_format(format: &str) -> Result<OutputFormat, String> {
    match format.to_lowercase().as_str() {
        "console" => Ok(OutputFormat::Console),
        "json" => Ok(OutputFormat::Json),
        _ => Err(format!("Invalid output format: {}. Supported: console, json", format)),
    }
}

/// Validate file extension
pub fn validate_file_extension(path: &Path, allowed_extensions: &[&str]) -> Result<(), String> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => {
            if allowed_extensions.contains(&ext.to_lowercase().as_str()) {
                Ok(())
            } else {
                Err(format!(
                    "Unsupported file extension: .{}. Allowed: {}",
                    ext,
                    allowed_extensions.join(", ")
                ))
            }
        }
        None => Err("File has no extension".to_string()),
    }
}
