//! Categorization decision engine
//!
//! Layers the deterministic keyword rules and the asynchronous AI backend
//! into one decision per transaction:
//!
//! 1. AI explicitly requested: call the backend; an out-of-vocabulary label,
//!    a transport failure, or a timeout degrades to `Other` with a warning.
//!    The AI path never blocks a transaction from being saved.
//! 2. Otherwise keyword rules, first match wins.
//! 3. Otherwise unresolved: the caller must obtain an explicit category from
//!    the user. No silent default in this branch, so "no confident
//!    suggestion" stays distinguishable from "AI failed".

use std::time::Duration;

use tracing::{debug, warn};

use crate::ai::{AiBackend, AiClient};
use crate::error::{Error, Result};
use crate::models::Category;
use crate::rules;

const DEFAULT_AI_TIMEOUT_SECS: u64 = 20;

/// Outcome of a categorization decision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryDecision {
    /// A category was assigned
    Resolved {
        category: Category,
        /// True when the AI path degraded to `Other`
        fallback: bool,
    },
    /// No AI requested and no keyword match; needs explicit user input
    Unresolved,
}

/// Orchestrates keyword rules and the AI backend
#[derive(Clone)]
pub struct Categorizer {
    client: Option<AiClient>,
    ai_timeout: Duration,
}

impl Categorizer {
    /// Create a categorizer; without a client the AI path always falls back
    pub fn new(client: Option<AiClient>) -> Self {
        Self {
            client,
            ai_timeout: Duration::from_secs(DEFAULT_AI_TIMEOUT_SECS),
        }
    }

    /// Create a new instance with a different AI call timeout
    pub fn with_ai_timeout(mut self, timeout: Duration) -> Self {
        self.ai_timeout = timeout;
        self
    }

    pub fn has_ai(&self) -> bool {
        self.client.is_some()
    }

    /// Explicit AI categorization request
    ///
    /// Surfaces the raw failure so callers that want to show the error can;
    /// `categorize` applies the fallback-to-Other policy on top of this.
    pub async fn categorize_with_ai(&self, description: &str) -> Result<Category> {
        let client = self
            .client
            .as_ref()
            .ok_or_else(|| Error::Categorization("No AI backend configured".into()))?;

        let response = tokio::time::timeout(
            self.ai_timeout,
            client.categorize(description, &Category::ALL),
        )
        .await
        .map_err(|_| {
            Error::Categorization(format!(
                "AI categorization timed out after {}s",
                self.ai_timeout.as_secs()
            ))
        })??;

        match response.category {
            Some(category) => {
                debug!(description, %category, "AI categorization succeeded");
                Ok(category)
            }
            None => Err(Error::Categorization(format!(
                "AI returned a label outside the vocabulary: {}",
                response.label
            ))),
        }
    }

    /// Full categorization decision for one transaction
    pub async fn categorize(
        &self,
        description: &str,
        ai_requested: bool,
        detect_seasonal: bool,
    ) -> CategoryDecision {
        if ai_requested {
            return match self.categorize_with_ai(description).await {
                Ok(category) => CategoryDecision::Resolved {
                    category,
                    fallback: false,
                },
                Err(e) => {
                    warn!(description, error = %e, "AI categorization failed, falling back to Other");
                    CategoryDecision::Resolved {
                        category: Category::Other,
                        fallback: true,
                    }
                }
            };
        }

        match rules::suggest_with_seasonal(description, detect_seasonal) {
            Some(category) => CategoryDecision::Resolved {
                category,
                fallback: false,
            },
            None => CategoryDecision::Unresolved,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::MockBackend;

    fn with_mock(mock: MockBackend) -> Categorizer {
        Categorizer::new(Some(AiClient::Mock(mock)))
    }

    #[tokio::test]
    async fn test_heuristic_path() {
        let categorizer = Categorizer::new(None);
        let decision = categorizer.categorize("Monthly Rent", false, true).await;
        assert_eq!(
            decision,
            CategoryDecision::Resolved {
                category: Category::Housing,
                fallback: false
            }
        );
    }

    #[tokio::test]
    async fn test_no_match_is_unresolved() {
        let categorizer = Categorizer::new(None);
        let decision = categorizer.categorize("Mystery charge", false, true).await;
        assert_eq!(decision, CategoryDecision::Unresolved);
    }

    #[tokio::test]
    async fn test_ai_success() {
        let categorizer = with_mock(MockBackend::with_label("Travel"));
        let decision = categorizer.categorize("Weekend trip", true, true).await;
        assert_eq!(
            decision,
            CategoryDecision::Resolved {
                category: Category::Travel,
                fallback: false
            }
        );
    }

    #[tokio::test]
    async fn test_ai_invalid_label_falls_back_to_other() {
        let categorizer = with_mock(MockBackend::with_label("Not A Category"));
        let decision = categorizer.categorize("Weekend trip", true, true).await;
        assert_eq!(
            decision,
            CategoryDecision::Resolved {
                category: Category::Other,
                fallback: true
            }
        );
    }

    #[tokio::test]
    async fn test_ai_failure_falls_back_to_other() {
        let categorizer = with_mock(MockBackend::failing());
        let decision = categorizer.categorize("Weekend trip", true, true).await;
        assert_eq!(
            decision,
            CategoryDecision::Resolved {
                category: Category::Other,
                fallback: true
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_ai_timeout_falls_back_to_other() {
        let categorizer =
            with_mock(MockBackend::hanging()).with_ai_timeout(Duration::from_secs(1));
        let decision = categorizer.categorize("Weekend trip", true, true).await;
        assert_eq!(
            decision,
            CategoryDecision::Resolved {
                category: Category::Other,
                fallback: true
            }
        );
    }

    #[tokio::test]
    async fn test_no_client_ai_request_falls_back() {
        let categorizer = Categorizer::new(None);
        let decision = categorizer.categorize("Weekend trip", true, true).await;
        assert_eq!(
            decision,
            CategoryDecision::Resolved {
                category: Category::Other,
                fallback: true
            }
        );
    }

    #[tokio::test]
    async fn test_categorize_with_ai_surfaces_error() {
        let categorizer = with_mock(MockBackend::failing());
        assert!(categorizer.categorize_with_ai("anything").await.is_err());
    }
}
