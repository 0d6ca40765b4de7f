//! CV screening library: profile extraction, match scoring and shortlisting

pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod llm;
pub mod output;
pub mod pipeline;
pub mod profile;
pub mod scoring;
pub mod storage;

pub use config::Config;
pub use error::{Result, ScreenerError};
