//! Report rendering and interview request drafting

pub mod email;
pub mod formatter;

pub use email::{draft_interview_requests, DraftEmail};
pub use formatter::{
    formatter_for, save_to_file, suggest_filename, ConsoleFormatter, JsonFormatter, OutputFormatter,
};
