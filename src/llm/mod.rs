//! Language model integration
//! Turns job descriptions and CV text into structured profiles

pub mod client;
pub mod extractor;
pub mod json;
pub mod prompts;

pub use client::{ChatBackend, OllamaClient};
pub use extractor::{LlmExtractor, ProfileExtractor};
pub use json::extract_json_object;
