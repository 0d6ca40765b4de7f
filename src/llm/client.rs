//! Ollama chat client

use crate::config::LlmConfig;
use crate::error::{Result, ScreenerError};
use log::debug;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Anything that can answer a chat prompt with a JSON-formatted reply.
pub trait ChatBackend {
    fn complete_json(&self, system: &str, prompt: &str) -> Result<String>;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    format: &'static str,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    message: ChatMessage,
}

pub struct OllamaClient {
    endpoint: String,
    model: String,
    client: reqwest::blocking::Client,
}

impl OllamaClient {
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let timeout = Duration::from_secs(config.timeout_secs.max(1));
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| ScreenerError::Configuration(format!("ollama http client: {err}")))?;

        Ok(Self {
            endpoint: format!("{}/api/chat", config.host.trim_end_matches('/')),
            model: config.model.clone(),
            client,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

impl ChatBackend for OllamaClient {
    fn complete_json(&self, system: &str, prompt: &str) -> Result<String> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: system.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: prompt.to_string(),
                },
            ],
            format: "json",
            stream: false,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .map_err(|err| ScreenerError::Network(format!("ollama request failed: {err}")))?;

        if !response.status().is_success() {
            return Err(ScreenerError::Network(format!(
                "ollama HTTP {} from {}",
                response.status(),
                self.endpoint
            )));
        }

        let response: ChatResponse = response
            .json()
            .map_err(|err| ScreenerError::Network(format!("ollama response parse: {err}")))?;

        debug!(
            "Model {} replied with {} chars",
            self.model,
            response.message.content.len()
        );
        Ok(response.message.content.trim().to_string())
    }
}
