//! DeepSeek backend implementation
//!
//! HTTP client for the DeepSeek chat completions API (OpenAI-compatible).
//! A categorization call makes a single attempt with an explicit timeout;
//! the caller owns any retry or fallback policy.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::Category;

use super::parsing::extract_label;
use super::{AiBackend, LabelResponse};

const DEFAULT_HOST: &str = "https://api.deepseek.com";
const DEFAULT_MODEL: &str = "deepseek-chat";
const DEFAULT_TIMEOUT_SECS: u64 = 20;

/// DeepSeek categorization backend
#[derive(Clone)]
pub struct DeepSeekBackend {
    http_client: Client,
    base_url: String,
    api_key: String,
    model: String,
    timeout: Duration,
}

impl DeepSeekBackend {
    /// Create a new DeepSeek backend
    pub fn new(base_url: &str, api_key: &str, model: &str) -> Self {
        Self {
            http_client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Create a new instance with a different per-call timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Create from environment variables
    ///
    /// Requires `DEEPSEEK_API_KEY`; host and model fall back to defaults.
    pub fn from_env() -> Option<Self> {
        let api_key = std::env::var("DEEPSEEK_API_KEY").ok()?;
        let host = std::env::var("DEEPSEEK_HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string());
        let model = std::env::var("DEEPSEEK_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        Some(Self::new(&host, &api_key, &model))
    }

    fn build_prompt(allowed: &[Category]) -> String {
        let labels: Vec<&str> = allowed.iter().map(|c| c.as_str()).collect();
        format!(
            "You are a personal finance assistant. Categorize the transaction \
             description the user sends into exactly one of these categories: {}. \
             Respond with the category name only, nothing else.",
            labels.join(", ")
        )
    }
}

/// Chat completions request body
#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f64,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

/// Chat completions response body
#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: String,
}

#[async_trait]
impl AiBackend for DeepSeekBackend {
    async fn categorize(&self, description: &str, allowed: &[Category]) -> Result<LabelResponse> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: Self::build_prompt(allowed),
                },
                ChatMessage {
                    role: "user",
                    content: description.to_string(),
                },
            ],
            temperature: 0.0,
            stream: false,
        };

        let response = self
            .http_client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .timeout(self.timeout)
            .json(&request)
            .send()
            .await?;

        let chat_response: ChatResponse = response.error_for_status()?.json().await?;
        let content = chat_response
            .choices
            .first()
            .map(|c| c.message.content.as_str())
            .ok_or_else(|| Error::Categorization("Empty choices in DeepSeek response".into()))?;

        debug!(model = %self.model, response = %content, "DeepSeek categorization response");

        extract_label(content, allowed)
    }

    async fn health_check(&self) -> bool {
        self.http_client
            .get(format!("{}/models", self.base_url))
            .bearer_auth(&self.api_key)
            .timeout(Duration::from_secs(5))
            .send()
            .await
            .map(|r| r.status().is_success())
            .unwrap_or(false)
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn host(&self) -> &str {
        &self.base_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_lists_all_categories() {
        let prompt = DeepSeekBackend::build_prompt(&Category::ALL);
        for cat in Category::ALL {
            assert!(prompt.contains(cat.as_str()), "missing {}", cat);
        }
    }

    #[test]
    fn test_base_url_trailing_slash_stripped() {
        let backend = DeepSeekBackend::new("https://api.deepseek.com/", "key", "deepseek-chat");
        assert_eq!(backend.host(), "https://api.deepseek.com");
    }
}
