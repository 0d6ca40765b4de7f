//! Job description CSV reading

use crate::error::{Result, ScreenerError};
use csv::ReaderBuilder;
use log::{info, warn};
use std::fs;
use std::path::Path;

pub const TITLE_COLUMN: &str = "Job Title";
pub const DESCRIPTION_COLUMN: &str = "Job Description";

#[derive(Debug, Clone, PartialEq)]
pub struct JobPosting {
    pub title: String,
    pub description: String,
}

/// Read job postings from a CSV file with `Job Title` and `Job Description`
/// columns. Files that are not valid UTF-8 are decoded as ISO-8859-1.
/// Rows without a description are skipped.
pub fn read_job_descriptions(csv_path: &Path) -> Result<Vec<JobPosting>> {
    if !csv_path.is_file() {
        return Err(ScreenerError::InvalidInput(format!(
            "Job description CSV not found: {}",
            csv_path.display()
        )));
    }

    let bytes = fs::read(csv_path)?;
    let content = decode(bytes);

    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers = reader.headers()?.clone();
    let column = |name: &str| {
        headers.iter().position(|h| h.trim() == name).ok_or_else(|| {
            ScreenerError::InvalidInput(format!(
                "CSV must contain '{TITLE_COLUMN}' and '{DESCRIPTION_COLUMN}' columns"
            ))
        })
    };
    let title_idx = column(TITLE_COLUMN)?;
    let description_idx = column(DESCRIPTION_COLUMN)?;

    let mut postings = Vec::new();
    for (row, record) in reader.records().enumerate() {
        let record = record?;
        let title = record.get(title_idx).map(str::trim).unwrap_or_default();
        let description = record.get(description_idx).map(str::trim).unwrap_or_default();

        if description.is_empty() {
            warn!("Skipping job '{title}' (row {}): missing description", row + 1);
            continue;
        }

        postings.push(JobPosting {
            title: if title.is_empty() { "N/A".to_string() } else { title.to_string() },
            description: description.to_string(),
        });
    }

    info!("Read {} job descriptions from {}", postings.len(), csv_path.display());
    Ok(postings)
}

fn decode(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => text,
        // every byte maps to the code point of the same value in ISO-8859-1
        Err(err) => err.into_bytes().iter().map(|&b| b as char).collect(),
    }
}
