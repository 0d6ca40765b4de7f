//! Document ingestion
//! Reads CV documents and job description spreadsheets into plain text

pub mod file_detector;
pub mod jd_csv;
pub mod manager;
pub mod text_extractor;

pub use file_detector::FileType;
pub use jd_csv::{read_job_descriptions, JobPosting};
pub use manager::{list_cv_files, InputManager};
