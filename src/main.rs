//! cv-screener: LLM-assisted CV screening against job descriptions

use anyhow::{Context, Result};
use clap::Parser;
use cv_screener::cli::{self, Cli, Commands, ConfigAction};
use cv_screener::config::{Config, OutputFormat};
use cv_screener::input::InputManager;
use cv_screener::llm::{LlmExtractor, OllamaClient};
use cv_screener::output::{
    draft_interview_requests, formatter_for, save_to_file, suggest_filename, ConsoleFormatter, OutputFormatter,
};
use cv_screener::pipeline::{self, JobShortlist};
use cv_screener::scoring::{round3, Matcher, ShortlistedCandidate, Shortlister, SynonymTable};
use cv_screener::storage::{Database, MatchStore};
use log::{error, info, warn};
use std::path::{Path, PathBuf};
use std::process;

fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    // Load configuration
    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    // Execute command
    if let Err(e) = run_command(cli.command, config, cli.config) {
        error!("Command failed: {:#}", e);
        process::exit(1);
    }
}

fn run_command(command: Commands, config: Config, config_path: Option<PathBuf>) -> Result<()> {
    let formatter = formatter_for(config.output.format, &config.output);

    match command {
        Commands::Ingest { jobs, cvs } => {
            // Neither flag means both sources
            let (jobs, cvs) = if jobs || cvs { (jobs, cvs) } else { (true, true) };
            let db = open_database(&config)?;
            ingest(&db, &config, jobs, cvs)?;
        }

        Commands::Match => {
            let db = open_database(&config)?;
            println!("🔄 Scoring every job against every candidate...");
            let summary = pipeline::run_matching(&db, &matcher(&config), true).context("Matching failed")?;
            println!("{}", formatter.format_sweep(&summary)?);
        }

        Commands::Shortlist { job, threshold } => {
            let db = open_database(&config)?;
            let shortlister =
                Shortlister::new(threshold.unwrap_or(config.matching.shortlisting_threshold));
            println!("📋 Shortlisting at threshold {:.2}", shortlister.threshold());

            let shortlists = match job {
                Some(job_id) => {
                    let record = db
                        .job(job_id)?
                        .with_context(|| format!("Job {} not found", job_id))?;
                    let candidates = shortlister.apply(&db, job_id)?;
                    vec![JobShortlist {
                        job_id,
                        title: record.title,
                        candidates,
                    }]
                }
                None => pipeline::run_shortlisting(&db, &shortlister)?,
            };
            println!("{}", formatter.format_shortlists(&shortlists)?);
        }

        Commands::Run => {
            println!("🚀 Full screening run");
            let db = open_database(&config)?;
            ingest(&db, &config, true, true)?;

            println!("\n🔄 Scoring every job against every candidate...");
            let summary = pipeline::run_matching(&db, &matcher(&config), true).context("Matching failed")?;
            println!("{}", formatter.format_sweep(&summary)?);

            let shortlister = Shortlister::new(config.matching.shortlisting_threshold);
            let shortlists = pipeline::run_shortlisting(&db, &shortlister)?;
            println!("{}", formatter.format_shortlists(&shortlists)?);
            println!("✅ Screening complete!");
        }

        Commands::Score { job, candidate, output } => {
            cli::validate_file_extension(&job, &["json"])
                .map_err(|e| anyhow::anyhow!("Job summary file: {}", e))?;
            cli::validate_file_extension(&candidate, &["json"])
                .map_err(|e| anyhow::anyhow!("Candidate profile file: {}", e))?;
            let output_format = cli::parse_output_format(&output).map_err(anyhow::Error::msg)?;

            let job_payload = std::fs::read_to_string(&job)
                .with_context(|| format!("Failed to read {}", job.display()))?;
            let candidate_payload = std::fs::read_to_string(&candidate)
                .with_context(|| format!("Failed to read {}", candidate.display()))?;

            let result = matcher(&config).score_payloads(0, Some(&job_payload), 0, Some(&candidate_payload))?;
            let formatter = formatter_for(output_format, &config.output);
            println!("{}", formatter.format_match(&result)?);
        }

        Commands::Emails { job, save } => {
            let db = open_database(&config)?;
            let shortlisted: Vec<ShortlistedCandidate> = db
                .shortlisted_for_job(job)?
                .into_iter()
                .map(|stored| ShortlistedCandidate {
                    candidate_id: stored.candidate_id,
                    cv_filename: stored.cv_filename,
                    score: round3(stored.score),
                })
                .collect();
            if shortlisted.is_empty() {
                warn!("No shortlisted candidates for job {}, run `shortlist` first", job);
            }

            let drafts = draft_interview_requests(&db, job, &shortlisted, &config.email)
                .with_context(|| format!("Failed to draft emails for job {}", job))?;
            let rendered = formatter.format_emails(&drafts)?;
            println!("{}", rendered);

            if let Some(path) = save {
                let path = path.unwrap_or_else(|| {
                    PathBuf::from(suggest_filename(
                        formatter.supports_format(),
                        &format!("interview_requests_job_{}", job),
                        true,
                    ))
                });
                // Saved drafts never carry terminal colour codes
                let content = match formatter.supports_format() {
                    OutputFormat::Console => ConsoleFormatter::new(false, config.output.detailed)
                        .format_emails(&drafts)?,
                    OutputFormat::Json => rendered,
                };
                save_to_file(&content, &path)?;
                println!("💾 Saved {} drafts to {}", drafts.len(), path.display());
            }
        }

        Commands::Inspect => {
            let db = open_database(&config)?;
            let stats = db.stats(config.matching.shortlisting_threshold)?;
            println!("{}", formatter.format_stats(&stats)?);

            let orphans = db.orphaned_shortlisted_candidates()?;
            if !orphans.is_empty() {
                println!("⚠️  Shortlisted candidate ids missing from candidates: {:?}", orphans);
            }
        }

        Commands::Config { action } => {
            let path = config_path.unwrap_or_else(Config::config_path);
            match action {
                Some(ConfigAction::Show) | None => {
                    let weights = config.match_weights();
                    println!("⚙️  Current Configuration\n");
                    println!("Database: {}", config.paths.database_path.display());
                    println!("CV Directory: {}", config.paths.cv_directory.display());
                    println!("Job Descriptions: {}", config.paths.jd_csv_path.display());
                    println!("LLM: {} @ {}", config.llm.model, config.llm.host);
                    println!("Shortlisting Threshold: {:.2}", config.matching.shortlisting_threshold);
                    println!("\nScoring Weights:");
                    println!("  Skills: {:.2}", weights.skills);
                    println!("  Experience: {:.2}", weights.experience);
                    println!("  Education: {:.2}", weights.education);
                    println!("  Requirements: {:.2}", weights.requirements);
                }

                Some(ConfigAction::Reset) => {
                    println!("🔄 Resetting configuration to defaults...");
                    Config::default().save_to(&path)?;
                    println!("✅ Configuration reset successfully!");
                }

                Some(ConfigAction::Path) => {
                    println!("{}", path.display());
                }
            }
        }
    }

    Ok(())
}

fn open_database(config: &Config) -> Result<Database> {
    let path: &Path = &config.paths.database_path;
    Database::open(path).with_context(|| format!("Failed to open database at {}", path.display()))
}

fn matcher(config: &Config) -> Matcher {
    Matcher::new(SynonymTable::default(), config.match_weights())
}

fn ingest(db: &Database, config: &Config, jobs: bool, cvs: bool) -> Result<()> {
    let formatter = formatter_for(config.output.format, &config.output);
    let client = OllamaClient::new(&config.llm).context("Failed to set up the LLM client")?;
    info!("Using model {} at {}", client.model(), config.llm.host);
    let extractor = LlmExtractor::new(client, config.llm.max_cv_chars);

    if jobs {
        println!("💼 Processing job descriptions...");
        let summary = pipeline::process_job_descriptions(db, &extractor, &config.paths.jd_csv_path)
            .context("Failed to process job descriptions")?;
        println!("{}", formatter.format_ingest("Job descriptions", &summary)?);
    }

    if cvs {
        println!("📄 Processing CVs...");
        let mut inputs = InputManager::new();
        let summary = pipeline::process_cvs(db, &extractor, &mut inputs, &config.paths.cv_directory)
            .context("Failed to process CVs")?;
        println!("{}", formatter.format_ingest("CVs", &summary)?);
    }

    Ok(())
}
