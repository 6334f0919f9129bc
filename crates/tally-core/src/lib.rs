//! Tally Core Library
//!
//! Shared functionality for the Tally personal expense tracker:
//! - Transaction model and validation
//! - Keyword-based category rules
//! - Pluggable AI categorization backends (DeepSeek, mock)
//! - CSV import parser with per-row failure reporting
//! - SQLite transaction store
//! - Ingestion service façade for the presentation layer

pub mod ai;
pub mod categorize;
pub mod db;
pub mod error;
pub mod import;
pub mod models;
pub mod rules;
pub mod service;

pub use ai::{AiBackend, AiClient, DeepSeekBackend, LabelResponse, MockBackend};
pub use categorize::{Categorizer, CategoryDecision};
pub use db::{Database, SaveOutcome};
pub use error::{Error, Result};
pub use models::{
    Category, ImportOptions, ImportReport, NewTransaction, RowFailure, Transaction,
    TransactionSource,
};
pub use service::{CancelToken, IngestionService, ManualEntry};
