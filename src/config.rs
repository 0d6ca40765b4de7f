//! Configuration management for the screening pipeline

use crate::error::{Result, ScreenerError};
use crate::llm::extractor::DEFAULT_MAX_CV_CHARS;
use crate::scoring::{MatchWeights, DEFAULT_THRESHOLD};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub paths: PathsConfig,
    pub llm: LlmConfig,
    pub matching: MatchingConfig,
    pub email: EmailConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    pub database_path: PathBuf,
    pub cv_directory: PathBuf,
    pub jd_csv_path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub model: String,
    pub host: String,
    pub timeout_secs: u64,
    pub max_cv_chars: usize,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: "mistral".to_string(),
            host: "http://localhost:11434".to_string(),
            timeout_secs: 120,
            max_cv_chars: DEFAULT_MAX_CV_CHARS,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingConfig {
    pub shortlisting_threshold: f64,
    /// Kept raw so a malformed table degrades to the default weights
    /// instead of failing the whole config.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weights: Option<toml::Value>,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            shortlisting_threshold: DEFAULT_THRESHOLD,
            weights: toml::Value::try_from(MatchWeights::default()).ok(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    pub company_name: String,
    pub sender_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub detailed: bool,
    pub color_output: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum OutputFormat {
    Console,
    Json,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            paths: PathsConfig {
                database_path: PathBuf::from("data/screening.sqlite"),
                cv_directory: PathBuf::from("data/cvs"),
                jd_csv_path: PathBuf::from("data/job_descriptions.csv"),
            },
            llm: LlmConfig::default(),
            matching: MatchingConfig::default(),
            email: EmailConfig {
                company_name: "Our Company".to_string(),
                sender_name: "The Hiring Team".to_string(),
            },
            output: OutputConfig {
                format: OutputFormat::Console,
                detailed: false,
                color_output: true,
            },
        }
    }
}

impl Config {
    /// Load from `path`, or from the default location when `None`.
    /// A missing file is created with the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = path.map(Path::to_path_buf).unwrap_or_else(Self::config_path);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = toml::from_str(&content)
                .map_err(|e| ScreenerError::Configuration(format!("Failed to parse config: {}", e)))?;
            Ok(config)
        } else {
            let config = Self::default();
            config.save_to(&config_path)?;
            Ok(config)
        }
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| ScreenerError::Configuration(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("cv-screener")
            .join("config.toml")
    }

    /// Component weights, falling back to the defaults when the table is malformed.
    pub fn match_weights(&self) -> MatchWeights {
        MatchWeights::resolve(self.matching.weights.as_ref())
    }
}
