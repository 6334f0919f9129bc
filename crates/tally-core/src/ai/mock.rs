//! Mock backend for testing
//!
//! Provides configurable responses for the categorization boundary. Useful
//! for unit tests and development without network access or an API key.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::models::Category;

use super::parsing::resolve_label;
use super::{AiBackend, LabelResponse};

/// Behavior of the mock on each categorize call
#[derive(Debug, Clone)]
pub enum MockReply {
    /// Keyword lookup over a few well-known merchants, "Other" otherwise
    Heuristic,
    /// Always return this label (may be outside the vocabulary)
    Label(String),
    /// Fail with a categorization error
    Failure,
    /// Never complete within any reasonable timeout
    Hang,
}

/// Mock categorization backend
///
/// Counts calls so tests can assert how many AI requests an operation made.
#[derive(Clone)]
pub struct MockBackend {
    reply: MockReply,
    calls: Arc<AtomicUsize>,
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MockBackend {
    /// Create a mock with heuristic merchant matching
    pub fn new() -> Self {
        Self {
            reply: MockReply::Heuristic,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Create a mock that always returns the given label
    pub fn with_label(label: &str) -> Self {
        Self {
            reply: MockReply::Label(label.to_string()),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Create a mock that fails every call
    pub fn failing() -> Self {
        Self {
            reply: MockReply::Failure,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Create a mock that hangs, for timeout tests
    pub fn hanging() -> Self {
        Self {
            reply: MockReply::Hang,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of categorize calls made so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn heuristic_label(description: &str) -> &'static str {
        let upper = description.to_uppercase();
        if upper.contains("NETFLIX") || upper.contains("SPOTIFY") || upper.contains("STEAM") {
            "Entertainment"
        } else if upper.contains("STARBUCKS") || upper.contains("MCDONALD") {
            "Food"
        } else if upper.contains("UBER") || upper.contains("SHELL") || upper.contains("CHEVRON") {
            "Transportation"
        } else if upper.contains("AMAZON") || upper.contains("COSTCO") {
            "Shopping"
        } else if upper.contains("RENT") || upper.contains("MORTGAGE") {
            "Housing"
        } else {
            "Other"
        }
    }
}

#[async_trait]
impl AiBackend for MockBackend {
    async fn categorize(&self, description: &str, allowed: &[Category]) -> Result<LabelResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let label = match &self.reply {
            MockReply::Heuristic => Self::heuristic_label(description).to_string(),
            MockReply::Label(label) => label.clone(),
            MockReply::Failure => {
                return Err(Error::Categorization("Simulated AI failure".into()));
            }
            MockReply::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                unreachable!("mock hang completed");
            }
        };

        Ok(LabelResponse {
            category: resolve_label(&label, allowed),
            label,
        })
    }

    async fn health_check(&self) -> bool {
        !matches!(self.reply, MockReply::Failure)
    }

    fn model(&self) -> &str {
        "mock"
    }

    fn host(&self) -> &str {
        "mock://localhost"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_counts_calls() {
        let mock = MockBackend::new();
        assert_eq!(mock.calls(), 0);
        mock.categorize("UBER TRIP", &Category::ALL).await.unwrap();
        mock.categorize("STARBUCKS", &Category::ALL).await.unwrap();
        assert_eq!(mock.calls(), 2);
    }

    #[tokio::test]
    async fn test_mock_fixed_label() {
        let mock = MockBackend::with_label("Travel");
        let result = mock.categorize("anything", &Category::ALL).await.unwrap();
        assert_eq!(result.category, Some(Category::Travel));
    }

    #[tokio::test]
    async fn test_mock_invalid_label_not_resolved() {
        let mock = MockBackend::with_label("Not A Category");
        let result = mock.categorize("anything", &Category::ALL).await.unwrap();
        assert_eq!(result.label, "Not A Category");
        assert_eq!(result.category, None);
    }

    #[tokio::test]
    async fn test_mock_failure() {
        let mock = MockBackend::failing();
        assert!(mock.categorize("anything", &Category::ALL).await.is_err());
        assert_eq!(mock.calls(), 1);
    }
}
