//! SQLite database layer

use std::path::Path;

use chrono::Utc;
use log::{debug, info};
use rusqlite::types::ValueRef;
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::error::{RecordKind, Result, ScreenerError};
use crate::profile::{CandidateProfile, JobProfile};
use crate::scoring::MatchResult;
use crate::storage::{CandidateRecord, DatabaseStats, JobRecord, MatchStore, StoredMatch, TopMatch};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS job_descriptions (
    jd_id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    original_description TEXT,
    summary_json TEXT,
    timestamp TEXT DEFAULT CURRENT_TIMESTAMP
);

CREATE TABLE IF NOT EXISTS candidates (
    candidate_id INTEGER PRIMARY KEY AUTOINCREMENT,
    cv_filename TEXT UNIQUE NOT NULL,
    cv_text TEXT,
    extracted_data_json TEXT,
    timestamp TEXT DEFAULT CURRENT_TIMESTAMP
);

CREATE TABLE IF NOT EXISTS matches (
    match_id INTEGER PRIMARY KEY AUTOINCREMENT,
    jd_id INTEGER NOT NULL,
    candidate_id INTEGER NOT NULL,
    match_score REAL,
    shortlist_status INTEGER NOT NULL DEFAULT 0,
    match_details_json TEXT,
    timestamp TEXT DEFAULT CURRENT_TIMESTAMP,
    FOREIGN KEY (jd_id) REFERENCES job_descriptions (jd_id),
    FOREIGN KEY (candidate_id) REFERENCES candidates (candidate_id),
    UNIQUE (jd_id, candidate_id)
);
";

const TOP_MATCH_LIMIT: i64 = 3;

/// SQLite database holding jobs, candidates and match results
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open (and create if needed) the database at the given path
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;
        Self::configure_pragmas(&conn)?;
        Self::create_tables(&conn)?;
        debug!("Opened database at {}", path.display());

        Ok(Self { conn })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::create_tables(&conn)?;
        Ok(Self { conn })
    }

    /// Get a reference to the connection
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    fn configure_pragmas(conn: &Connection) -> Result<()> {
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;
             PRAGMA temp_store = MEMORY;",
        )?;
        Ok(())
    }

    fn create_tables(conn: &Connection) -> Result<()> {
        conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    pub fn add_job_description(&self, title: &str, description: &str) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO job_descriptions (title, original_description, timestamp) VALUES (?, ?, ?)",
            params![title, description, now()],
        )?;
        let id = self.conn.last_insert_rowid();
        info!("Added job description '{title}' with ID {id}");
        Ok(id)
    }

    /// ID of a job previously added with the same title and description.
    pub fn job_id_for(&self, title: &str, description: &str) -> Result<Option<i64>> {
        let id = self
            .conn
            .query_row(
                "SELECT jd_id FROM job_descriptions
                 WHERE title = ? AND original_description = ?
                 ORDER BY jd_id LIMIT 1",
                [title, description],
                |row| row.get(0),
            )
            .optional()?;
        Ok(id)
    }

    pub fn update_job_summary(&self, job_id: i64, summary: &JobProfile) -> Result<()> {
        let json = serde_json::to_string(summary)?;
        let changed = self.conn.execute(
            "UPDATE job_descriptions SET summary_json = ? WHERE jd_id = ?",
            params![json, job_id],
        )?;
        ensure_found(changed, RecordKind::Job, job_id)
    }

    /// Insert a candidate, or return the ID already registered for this filename.
    pub fn add_candidate(&self, cv_filename: &str, cv_text: &str) -> Result<i64> {
        if let Some(id) = self.candidate_id_for(cv_filename)? {
            debug!("Candidate {cv_filename} already exists with ID {id}");
            return Ok(id);
        }

        self.conn.execute(
            "INSERT INTO candidates (cv_filename, cv_text, timestamp) VALUES (?, ?, ?)",
            params![cv_filename, cv_text, now()],
        )?;
        let id = self.conn.last_insert_rowid();
        info!("Added candidate {cv_filename} with ID {id}");
        Ok(id)
    }

    pub fn candidate_id_for(&self, cv_filename: &str) -> Result<Option<i64>> {
        let id = self
            .conn
            .query_row(
                "SELECT candidate_id FROM candidates WHERE cv_filename = ?",
                [cv_filename],
                |row| row.get(0),
            )
            .optional()?;
        Ok(id)
    }

    pub fn update_candidate_extraction(&self, candidate_id: i64, profile: &CandidateProfile) -> Result<()> {
        let json = serde_json::to_string(profile)?;
        let changed = self.conn.execute(
            "UPDATE candidates SET extracted_data_json = ? WHERE candidate_id = ?",
            params![json, candidate_id],
        )?;
        ensure_found(changed, RecordKind::Candidate, candidate_id)
    }

    pub fn job(&self, job_id: i64) -> Result<Option<JobRecord>> {
        let record = self
            .conn
            .query_row(
                "SELECT jd_id, title, original_description, summary_json, timestamp
                 FROM job_descriptions WHERE jd_id = ?",
                [job_id],
                |row| {
                    Ok(JobRecord {
                        id: row.get(0)?,
                        title: row.get(1)?,
                        description: row.get(2)?,
                        summary_json: row.get(3)?,
                        timestamp: row.get(4)?,
                    })
                },
            )
            .optional()?;
        Ok(record)
    }

    pub fn candidate(&self, candidate_id: i64) -> Result<Option<CandidateRecord>> {
        let record = self
            .conn
            .query_row(
                "SELECT candidate_id, cv_filename, cv_text, extracted_data_json, timestamp
                 FROM candidates WHERE candidate_id = ?",
                [candidate_id],
                |row| {
                    Ok(CandidateRecord {
                        id: row.get(0)?,
                        cv_filename: row.get(1)?,
                        cv_text: row.get(2)?,
                        extracted_json: row.get(3)?,
                        timestamp: row.get(4)?,
                    })
                },
            )
            .optional()?;
        Ok(record)
    }

    /// Stored job summary, `None` when the job is unknown or not summarized.
    pub fn job_summary_json(&self, job_id: i64) -> Result<Option<String>> {
        self.payload("SELECT summary_json FROM job_descriptions WHERE jd_id = ?", job_id)
    }

    /// Stored candidate profile, `None` when the candidate is unknown or not extracted.
    pub fn candidate_payload(&self, candidate_id: i64) -> Result<Option<String>> {
        self.payload(
            "SELECT extracted_data_json FROM candidates WHERE candidate_id = ?",
            candidate_id,
        )
    }

    fn payload(&self, sql: &str, id: i64) -> Result<Option<String>> {
        let payload = self
            .conn
            .query_row(sql, [id], |row| Ok(payload_text(row.get_ref(0)?)))
            .optional()?;
        Ok(payload.flatten())
    }

    pub fn job_ids(&self) -> Result<Vec<i64>> {
        self.ids("SELECT jd_id FROM job_descriptions ORDER BY jd_id")
    }

    pub fn candidate_ids(&self) -> Result<Vec<i64>> {
        self.ids("SELECT candidate_id FROM candidates ORDER BY candidate_id")
    }

    fn ids(&self, sql: &str) -> Result<Vec<i64>> {
        let mut stmt = self.conn.prepare(sql)?;
        let ids = stmt
            .query_map([], |row| row.get(0))?
            .collect::<std::result::Result<Vec<i64>, _>>()?;
        Ok(ids)
    }

    /// Row counts plus the best few matches across all jobs.
    pub fn stats(&self, threshold: f64) -> Result<DatabaseStats> {
        let top_matches = {
            let mut stmt = self.conn.prepare(
                "SELECT j.title, c.cv_filename, m.match_score, m.match_details_json
                 FROM matches m
                 JOIN job_descriptions j ON m.jd_id = j.jd_id
                 JOIN candidates c ON m.candidate_id = c.candidate_id
                 ORDER BY m.match_score DESC
                 LIMIT ?",
            )?;
            let rows = stmt.query_map([TOP_MATCH_LIMIT], |row| {
                Ok(TopMatch {
                    job_title: row.get(0)?,
                    cv_filename: row.get(1)?,
                    score: row.get::<_, Option<f64>>(2)?.unwrap_or(0.0),
                    details_json: row.get(3)?,
                })
            })?;
            rows.collect::<std::result::Result<Vec<_>, _>>()?
        };

        Ok(DatabaseStats {
            total_jobs: self.count("SELECT COUNT(*) FROM job_descriptions", [])?,
            summarized_jobs: self.count(
                "SELECT COUNT(*) FROM job_descriptions WHERE summary_json IS NOT NULL",
                [],
            )?,
            total_candidates: self.count("SELECT COUNT(*) FROM candidates", [])?,
            extracted_candidates: self.count(
                "SELECT COUNT(*) FROM candidates WHERE extracted_data_json IS NOT NULL",
                [],
            )?,
            total_matches: self.count("SELECT COUNT(*) FROM matches", [])?,
            matches_above_threshold: self.count(
                "SELECT COUNT(*) FROM matches WHERE match_score >= ?",
                [threshold],
            )?,
            shortlisted_matches: self.count(
                "SELECT COUNT(*) FROM matches WHERE shortlist_status = 1",
                [],
            )?,
            top_matches,
        })
    }

    fn count<P: rusqlite::Params>(&self, sql: &str, params: P) -> Result<usize> {
        let count: i64 = self.conn.query_row(sql, params, |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Shortlisted candidate IDs that have no candidate row.
    pub fn orphaned_shortlisted_candidates(&self) -> Result<Vec<i64>> {
        self.ids(
            "SELECT DISTINCT m.candidate_id FROM matches m
             LEFT JOIN candidates c ON m.candidate_id = c.candidate_id
             WHERE m.shortlist_status = 1 AND c.candidate_id IS NULL
             ORDER BY m.candidate_id",
        )
    }

    fn query_matches(&self, job_id: i64, only_shortlisted: bool) -> Result<Vec<StoredMatch>> {
        let sql = if only_shortlisted {
            "SELECT m.jd_id, m.candidate_id, c.cv_filename, m.match_score, m.shortlist_status,
                    m.match_details_json, m.timestamp
             FROM matches m JOIN candidates c ON m.candidate_id = c.candidate_id
             WHERE m.jd_id = ? AND m.shortlist_status = 1
             ORDER BY m.match_score DESC"
        } else {
            "SELECT m.jd_id, m.candidate_id, c.cv_filename, m.match_score, m.shortlist_status,
                    m.match_details_json, m.timestamp
             FROM matches m JOIN candidates c ON m.candidate_id = c.candidate_id
             WHERE m.jd_id = ?
             ORDER BY m.match_score DESC"
        };

        let mut stmt = self.conn.prepare(sql)?;
        let matches = stmt
            .query_map([job_id], stored_match_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(matches)
    }
}

impl MatchStore for Database {
    fn upsert_match(&self, job_id: i64, candidate_id: i64, result: &MatchResult) -> Result<()> {
        let details = serde_json::to_string(&result.details)?;
        self.conn.execute(
            "INSERT INTO matches (jd_id, candidate_id, match_score, match_details_json, timestamp)
             VALUES (?, ?, ?, ?, ?)
             ON CONFLICT(jd_id, candidate_id) DO UPDATE SET
                match_score = excluded.match_score,
                match_details_json = excluded.match_details_json,
                timestamp = excluded.timestamp",
            params![job_id, candidate_id, result.overall_score, details, now()],
        )?;
        debug!(
            "Stored match for job {job_id} and candidate {candidate_id}: {:.2}",
            result.overall_score
        );
        Ok(())
    }

    fn matches_for_job(&self, job_id: i64) -> Result<Vec<StoredMatch>> {
        self.query_matches(job_id, false)
    }

    fn set_shortlist_status(&self, job_id: i64, candidate_id: i64, shortlisted: bool) -> Result<()> {
        self.conn.execute(
            "UPDATE matches SET shortlist_status = ? WHERE jd_id = ? AND candidate_id = ?",
            params![shortlisted, job_id, candidate_id],
        )?;
        Ok(())
    }

    fn shortlisted_for_job(&self, job_id: i64) -> Result<Vec<StoredMatch>> {
        self.query_matches(job_id, true)
    }
}

fn stored_match_from_row(row: &Row<'_>) -> rusqlite::Result<StoredMatch> {
    Ok(StoredMatch {
        job_id: row.get(0)?,
        candidate_id: row.get(1)?,
        cv_filename: row.get(2)?,
        score: row.get::<_, Option<f64>>(3)?.unwrap_or(0.0),
        shortlisted: row.get(4)?,
        details_json: row.get(5)?,
        timestamp: row.get(6)?,
    })
}

/// Read a payload column as text whatever its storage class.
///
/// Blobs, numbers and invalid UTF-8 come back as (lossy) text so that profile
/// validation rejects them like any other malformed payload.
fn payload_text(value: ValueRef<'_>) -> Option<String> {
    match value {
        ValueRef::Null => None,
        ValueRef::Text(bytes) | ValueRef::Blob(bytes) => Some(String::from_utf8_lossy(bytes).into_owned()),
        ValueRef::Integer(value) => Some(value.to_string()),
        ValueRef::Real(value) => Some(value.to_string()),
    }
}

fn ensure_found(changed: usize, kind: RecordKind, id: i64) -> Result<()> {
    if changed == 0 {
        return Err(ScreenerError::MissingRecord { kind, id });
    }
    Ok(())
}

fn now() -> String {
    Utc::now().to_rfc3339()
}
