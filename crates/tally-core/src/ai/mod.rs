//! Pluggable AI categorization backend abstraction
//!
//! Backend-agnostic interface for the external categorization service.
//!
//! # Architecture
//!
//! - `AiBackend` trait: defines the categorization interface
//! - `AiClient` enum: concrete wrapper providing Clone + compile-time dispatch
//! - Backend implementations: `DeepSeekBackend`, `MockBackend`
//!
//! # Configuration
//!
//! Environment variables:
//! - `TALLY_AI_BACKEND`: Backend to use (deepseek, mock). Default: deepseek
//! - `DEEPSEEK_API_KEY`: API key (required for deepseek backend)
//! - `DEEPSEEK_HOST`: API base URL (default: https://api.deepseek.com)
//! - `DEEPSEEK_MODEL`: Model name (default: deepseek-chat)

mod deepseek;
mod mock;
pub mod parsing;

pub use deepseek::DeepSeekBackend;
pub use mock::{MockBackend, MockReply};

use async_trait::async_trait;

use crate::error::Result;
use crate::models::Category;

/// Raw categorization result from a backend
///
/// The backend surfaces the label as returned by the service plus its
/// resolution against the allowed vocabulary. A label outside the vocabulary
/// (`category: None`) is a contract violation; the caller decides on
/// fallback, not the client.
#[derive(Debug, Clone)]
pub struct LabelResponse {
    /// Label text as returned by the service
    pub label: String,
    /// The label resolved against the allowed set, if it resolved
    pub category: Option<Category>,
}

/// Trait defining the interface for categorization backends
///
/// Backends must be Send + Sync to allow use across async tasks. A single
/// call makes a single attempt; retry policy, if any, belongs to the caller.
#[async_trait]
pub trait AiBackend: Send + Sync {
    /// Categorize a transaction description against an allowed vocabulary
    async fn categorize(&self, description: &str, allowed: &[Category]) -> Result<LabelResponse>;

    /// Check if the backend is available
    async fn health_check(&self) -> bool;

    /// Get the model name (for logging)
    fn model(&self) -> &str;

    /// Get the host URL (for logging)
    fn host(&self) -> &str;
}

/// Concrete AI client enum
///
/// Provides Clone and compile-time dispatch without Box<dyn> overhead.
#[derive(Clone)]
pub enum AiClient {
    /// DeepSeek backend (OpenAI-compatible chat completions API)
    DeepSeek(DeepSeekBackend),
    /// Mock backend for testing
    Mock(MockBackend),
}

impl AiClient {
    /// Create an AI client from environment variables
    ///
    /// Checks `TALLY_AI_BACKEND` to determine which backend to use:
    /// - `deepseek` (default): Uses DEEPSEEK_API_KEY, DEEPSEEK_HOST, DEEPSEEK_MODEL
    /// - `mock`: Creates a mock backend for testing
    ///
    /// Returns None if the required environment variables are not set.
    pub fn from_env() -> Option<Self> {
        let backend = std::env::var("TALLY_AI_BACKEND").unwrap_or_else(|_| "deepseek".to_string());

        match backend.to_lowercase().as_str() {
            "deepseek" => DeepSeekBackend::from_env().map(AiClient::DeepSeek),
            "mock" => Some(AiClient::Mock(MockBackend::new())),
            _ => {
                tracing::warn!(backend = %backend, "Unknown TALLY_AI_BACKEND, falling back to deepseek");
                DeepSeekBackend::from_env().map(AiClient::DeepSeek)
            }
        }
    }

    /// Create a mock backend for testing
    pub fn mock() -> Self {
        AiClient::Mock(MockBackend::new())
    }
}

#[async_trait]
impl AiBackend for AiClient {
    async fn categorize(&self, description: &str, allowed: &[Category]) -> Result<LabelResponse> {
        match self {
            AiClient::DeepSeek(b) => b.categorize(description, allowed).await,
            AiClient::Mock(b) => b.categorize(description, allowed).await,
        }
    }

    async fn health_check(&self) -> bool {
        match self {
            AiClient::DeepSeek(b) => b.health_check().await,
            AiClient::Mock(b) => b.health_check().await,
        }
    }

    fn model(&self) -> &str {
        match self {
            AiClient::DeepSeek(b) => b.model(),
            AiClient::Mock(b) => b.model(),
        }
    }

    fn host(&self) -> &str {
        match self {
            AiClient::DeepSeek(b) => b.host(),
            AiClient::Mock(b) => b.host(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ai_client_mock() {
        let client = AiClient::mock();
        assert_eq!(client.model(), "mock");
        assert_eq!(client.host(), "mock://localhost");
    }

    #[tokio::test]
    async fn test_mock_health_check() {
        let client = AiClient::mock();
        assert!(client.health_check().await);
    }

    #[tokio::test]
    async fn test_mock_categorize_resolves_vocabulary_label() {
        let client = AiClient::mock();
        let result = client
            .categorize("NETFLIX.COM monthly", &Category::ALL)
            .await
            .unwrap();
        assert_eq!(result.category, Some(Category::Entertainment));
    }
}
