//! Ingestion service: the façade the presentation layer talks to
//!
//! Coordinates validation, categorization, CSV parsing, and the transaction
//! store. The presentation layer never touches the store or the AI client
//! directly.

use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::NaiveDate;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{info, warn};

use crate::categorize::{Categorizer, CategoryDecision};
use crate::db::{Database, SaveOutcome};
use crate::error::{Error, Result};
use crate::import;
use crate::models::{
    Category, ImportOptions, ImportReport, NewTransaction, RowFailure, Transaction,
    TransactionSource,
};
use crate::rules;

/// Cooperative cancellation handle for a bulk import
///
/// Cancelling lets in-flight AI calls finish but discards their results;
/// rows saved before the cancellation stay saved (the store is append-only,
/// cancellation is not atomic across the batch).
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// A user-entered transaction draft
///
/// The presentation layer maps its own placeholder selections before calling
/// in: "no category chosen yet" becomes `category: None`, "AI requested"
/// becomes `ai_requested: true`.
#[derive(Debug, Clone)]
pub struct ManualEntry {
    pub date: NaiveDate,
    pub description: String,
    /// Explicit user choice; takes precedence over any suggestion
    pub category: Option<Category>,
    pub amount: f64,
    /// User explicitly asked for AI categorization
    pub ai_requested: bool,
}

/// Top-level transaction ingestion façade
#[derive(Clone)]
pub struct IngestionService {
    store: Database,
    categorizer: Categorizer,
}

impl IngestionService {
    pub fn new(store: Database, categorizer: Categorizer) -> Self {
        Self { store, categorizer }
    }

    pub fn store(&self) -> &Database {
        &self.store
    }

    pub fn categorizer(&self) -> &Categorizer {
        &self.categorizer
    }

    /// Validate, categorize, and persist a manually entered transaction
    pub async fn record_manual(&self, entry: ManualEntry) -> Result<Transaction> {
        let category = match entry.category {
            Some(category) => category,
            None => {
                match self
                    .categorizer
                    .categorize(&entry.description, entry.ai_requested, true)
                    .await
                {
                    CategoryDecision::Resolved { category, .. } => category,
                    CategoryDecision::Unresolved => {
                        return Err(Error::Validation(
                            "Please select a category for this transaction".into(),
                        ));
                    }
                }
            }
        };

        let tx = NewTransaction::validated(
            entry.date,
            &entry.description,
            category,
            entry.amount,
            TransactionSource::Manual,
        )?;

        let outcome = self.store.save_transaction(&tx)?;
        Ok(outcome.transaction().clone())
    }

    /// Import a bank CSV export
    pub async fn import_file(&self, path: &Path, options: &ImportOptions) -> Result<ImportReport> {
        self.import_file_with_cancel(path, options, &CancelToken::new())
            .await
    }

    /// Import a bank CSV export with cooperative cancellation
    ///
    /// Rows with a keyword match never hit the AI. Rows without one are
    /// dispatched to the AI concurrently (bounded by `max_in_flight`) when
    /// `auto_categorize` is set, or skipped as row failures when it is not
    /// (bulk import has no user to ask, and silently defaulting would
    /// mislabel data). Saved transactions are reported in input row order.
    pub async fn import_file_with_cancel(
        &self,
        path: &Path,
        options: &ImportOptions,
        cancel: &CancelToken,
    ) -> Result<ImportReport> {
        let parsed = import::parse_file(path)?;
        let mut report = ImportReport {
            row_failures: parsed.failures,
            ..Default::default()
        };

        // Heuristic pass, and collect the rows that need an AI decision
        let mut heuristic: HashMap<usize, Category> = HashMap::new();
        let mut needs_ai: Vec<(usize, String)> = Vec::new();

        for candidate in &parsed.candidates {
            match rules::suggest_with_seasonal(&candidate.description, options.detect_seasonal) {
                Some(category) => {
                    heuristic.insert(candidate.row, category);
                }
                None if options.auto_categorize => {
                    needs_ai.push((candidate.row, candidate.description.clone()));
                }
                None => {
                    report.row_failures.push(RowFailure {
                        row: candidate.row,
                        reason: "No category match (auto-categorize disabled)".to_string(),
                    });
                }
            }
        }

        // Concurrent AI pass, bounded by a semaphore
        let ai_results = self
            .dispatch_ai_calls(needs_ai, options, cancel)
            .await;

        if cancel.is_cancelled() {
            info!("Import cancelled; discarding unsaved rows");
            return Ok(report);
        }

        // Save in input row order; the store serializes writers internally
        let skipped: std::collections::HashSet<usize> =
            report.row_failures.iter().map(|f| f.row).collect();

        for candidate in parsed.candidates {
            if cancel.is_cancelled() {
                info!("Import cancelled mid-save; remaining rows discarded");
                break;
            }
            if skipped.contains(&candidate.row) {
                continue;
            }

            let (category, fallback) = match heuristic.get(&candidate.row) {
                Some(category) => (*category, false),
                None => match ai_results.get(&candidate.row) {
                    Some(&(category, fallback)) => (category, fallback),
                    // Cancelled before this row's AI call was collected
                    None => continue,
                },
            };

            if fallback {
                report.categorization_failures.push(candidate.row);
            }

            let tx = match NewTransaction::validated(
                candidate.date,
                &candidate.description,
                category,
                candidate.amount,
                TransactionSource::Import,
            ) {
                Ok(tx) => tx,
                Err(e) => {
                    report.row_failures.push(RowFailure {
                        row: candidate.row,
                        reason: e.to_string(),
                    });
                    continue;
                }
            };

            match self.store.save_transaction(&tx)? {
                SaveOutcome::Saved(stored) => report.saved.push(stored),
                SaveOutcome::Duplicate(_) => report.duplicates += 1,
            }
        }

        info!(
            saved = report.saved.len(),
            duplicates = report.duplicates,
            row_failures = report.row_failures.len(),
            categorization_failures = report.categorization_failures.len(),
            "Import complete"
        );
        Ok(report)
    }

    /// Run AI categorization for the given rows with bounded concurrency
    ///
    /// Returns per-row (category, fell_back_to_other). Rows dispatched after
    /// cancellation are not attempted; in-flight calls complete and their
    /// results are simply discarded by the caller.
    async fn dispatch_ai_calls(
        &self,
        rows: Vec<(usize, String)>,
        options: &ImportOptions,
        cancel: &CancelToken,
    ) -> HashMap<usize, (Category, bool)> {
        let mut results = HashMap::new();
        if rows.is_empty() {
            return results;
        }

        let semaphore = Arc::new(Semaphore::new(options.max_in_flight.max(1)));
        let mut join_set = JoinSet::new();

        for (row, description) in rows {
            if cancel.is_cancelled() {
                break;
            }
            let categorizer = self.categorizer.clone();
            let semaphore = semaphore.clone();
            let detect_seasonal = options.detect_seasonal;

            join_set.spawn(async move {
                // Semaphore closed only on drop, so acquire cannot fail here
                let _permit = semaphore.acquire_owned().await;
                let decision = categorizer
                    .categorize(&description, true, detect_seasonal)
                    .await;
                (row, decision)
            });
        }

        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((row, CategoryDecision::Resolved { category, fallback })) => {
                    results.insert(row, (category, fallback));
                }
                // AI-requested categorization always resolves (worst case Other)
                Ok((row, CategoryDecision::Unresolved)) => {
                    results.insert(row, (Category::Other, true));
                }
                Err(e) => {
                    warn!(error = %e, "AI categorization task panicked; row falls back to Other");
                }
            }
        }

        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::{AiClient, MockBackend};

    fn service(mock: MockBackend) -> IngestionService {
        IngestionService::new(
            Database::in_memory().unwrap(),
            Categorizer::new(Some(AiClient::Mock(mock))),
        )
    }

    #[tokio::test]
    async fn test_record_manual_explicit_category() {
        let svc = service(MockBackend::new());
        let tx = svc
            .record_manual(ManualEntry {
                date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
                description: "Dinner out".into(),
                category: Some(Category::Food),
                amount: 42.00,
                ai_requested: false,
            })
            .await
            .unwrap();
        assert_eq!(tx.category, Category::Food);
        assert_eq!(svc.store().count_transactions().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_record_manual_heuristic() {
        let svc = service(MockBackend::new());
        let tx = svc
            .record_manual(ManualEntry {
                date: NaiveDate::from_ymd_opt(2024, 1, 12).unwrap(),
                description: "Monthly Rent".into(),
                category: None,
                amount: 1200.00,
                ai_requested: false,
            })
            .await
            .unwrap();
        assert_eq!(tx.category, Category::Housing);
    }

    #[tokio::test]
    async fn test_record_manual_no_category_no_match_rejected() {
        let svc = service(MockBackend::new());
        let result = svc
            .record_manual(ManualEntry {
                date: NaiveDate::from_ymd_opt(2024, 1, 12).unwrap(),
                description: "Mystery charge".into(),
                category: None,
                amount: 10.00,
                ai_requested: false,
            })
            .await;
        match result {
            Err(Error::Validation(reason)) => assert!(reason.contains("select a category")),
            other => panic!("expected validation error, got {:?}", other.map(|t| t.id)),
        }
    }

    #[tokio::test]
    async fn test_record_manual_rejects_bad_amount() {
        let svc = service(MockBackend::new());
        let result = svc
            .record_manual(ManualEntry {
                date: NaiveDate::from_ymd_opt(2024, 1, 12).unwrap(),
                description: "Dinner".into(),
                category: Some(Category::Food),
                amount: -3.0,
                ai_requested: false,
            })
            .await;
        assert!(matches!(result, Err(Error::Validation(_))));
        assert_eq!(svc.store().count_transactions().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_record_manual_ai_failure_saves_as_other() {
        let svc = service(MockBackend::failing());
        let tx = svc
            .record_manual(ManualEntry {
                date: NaiveDate::from_ymd_opt(2024, 1, 12).unwrap(),
                description: "Mystery charge".into(),
                category: None,
                amount: 10.00,
                ai_requested: true,
            })
            .await
            .unwrap();
        // Degraded, not dropped
        assert_eq!(tx.category, Category::Other);
    }
}
