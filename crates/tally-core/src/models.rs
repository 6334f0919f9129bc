//! Domain models for Tally

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{Error, Result};

/// Canonical date format used across manual entry, import, and display
pub const DATE_FORMAT: &str = "%Y/%m/%d";

/// Spending category vocabulary
///
/// Closed set shared by manual entry, CSV import, and AI categorization.
/// The presentation layer's placeholder selections ("Select Category",
/// "AI Categorize") are not domain states and have no variant here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Housing,
    Food,
    Transportation,
    Entertainment,
    Shopping,
    Utilities,
    Seasonal,
    Education,
    Medical,
    Travel,
    Other,
}

impl Category {
    /// All categories, in vocabulary order
    pub const ALL: [Category; 11] = [
        Self::Housing,
        Self::Food,
        Self::Transportation,
        Self::Entertainment,
        Self::Shopping,
        Self::Utilities,
        Self::Seasonal,
        Self::Education,
        Self::Medical,
        Self::Travel,
        Self::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Housing => "Housing",
            Self::Food => "Food",
            Self::Transportation => "Transportation",
            Self::Entertainment => "Entertainment",
            Self::Shopping => "Shopping",
            Self::Utilities => "Utilities",
            Self::Seasonal => "Seasonal",
            Self::Education => "Education",
            Self::Medical => "Medical",
            Self::Travel => "Travel",
            Self::Other => "Other",
        }
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "housing" => Ok(Self::Housing),
            "food" => Ok(Self::Food),
            "transportation" => Ok(Self::Transportation),
            "entertainment" => Ok(Self::Entertainment),
            "shopping" => Ok(Self::Shopping),
            "utilities" => Ok(Self::Utilities),
            "seasonal" => Ok(Self::Seasonal),
            "education" => Ok(Self::Education),
            "medical" => Ok(Self::Medical),
            "travel" => Ok(Self::Travel),
            "other" => Ok(Self::Other),
            _ => Err(format!("Unknown category: {}", s)),
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Transaction source - how it was created
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TransactionSource {
    /// Manually entered
    #[default]
    Manual,
    /// Imported from bank CSV
    Import,
}

impl TransactionSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Manual => "manual",
            Self::Import => "import",
        }
    }
}

impl std::str::FromStr for TransactionSource {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "manual" => Ok(Self::Manual),
            "import" => Ok(Self::Import),
            _ => Err(format!("Unknown transaction source: {}", s)),
        }
    }
}

impl std::fmt::Display for TransactionSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A stored transaction
///
/// Immutable once persisted; edits are modeled as delete + recreate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub date: NaiveDate,
    pub description: String,
    pub category: Category,
    /// Positive = expense
    pub amount: f64,
    /// Hash for deduplication
    pub entry_hash: String,
    /// How this transaction was created
    pub source: TransactionSource,
    pub created_at: DateTime<Utc>,
}

/// A validated transaction candidate (before DB insertion)
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub date: NaiveDate,
    pub description: String,
    pub category: Category,
    pub amount: f64,
    pub entry_hash: String,
    pub source: TransactionSource,
}

impl NewTransaction {
    /// Build a validated candidate, rejecting bad input at the boundary
    pub fn validated(
        date: NaiveDate,
        description: &str,
        category: Category,
        amount: f64,
        source: TransactionSource,
    ) -> Result<Self> {
        let description = description.trim();
        if description.is_empty() {
            return Err(Error::Validation("Description must not be empty".into()));
        }
        if !amount.is_finite() {
            return Err(Error::Validation(format!(
                "Amount must be a finite number, got {}",
                amount
            )));
        }
        if amount <= 0.0 {
            return Err(Error::Validation(format!(
                "Amount must be positive (expenses only), got {}",
                amount
            )));
        }

        Ok(Self {
            date,
            description: description.to_string(),
            category,
            amount,
            entry_hash: entry_hash(&date, description, amount),
            source,
        })
    }
}

/// Parse a date in the canonical `YYYY/MM/DD` format (manual entry)
pub fn parse_canonical_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
        .map_err(|_| Error::Validation(format!("Invalid date (expected YYYY/MM/DD): {}", s)))
}

/// Generate a unique hash for deduplication
pub fn entry_hash(date: &NaiveDate, description: &str, amount: f64) -> String {
    let mut hasher = Sha256::new();
    hasher.update(date.to_string().as_bytes());
    hasher.update(description.as_bytes());
    hasher.update(amount.to_be_bytes());
    hex::encode(hasher.finalize())
}

/// One malformed CSV row, skipped rather than aborting the import
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowFailure {
    /// Zero-based data row index (header excluded)
    pub row: usize,
    pub reason: String,
}

/// Aggregate result of a bulk CSV import
#[derive(Debug, Clone, Default)]
pub struct ImportReport {
    /// Stored transactions, in input row order
    pub saved: Vec<Transaction>,
    /// Rows skipped as duplicates of already-stored transactions
    pub duplicates: usize,
    /// Malformed rows with reasons
    pub row_failures: Vec<RowFailure>,
    /// Row indexes whose category fell back to Other after an AI failure
    pub categorization_failures: Vec<usize>,
}

/// Options controlling a bulk CSV import
#[derive(Debug, Clone)]
pub struct ImportOptions {
    /// Dispatch AI categorization for rows without a keyword match
    pub auto_categorize: bool,
    /// Apply the seasonal-spending keyword rule (gifts, new year, hongbao)
    pub detect_seasonal: bool,
    /// Cap on concurrent in-flight AI calls
    pub max_in_flight: usize,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            auto_categorize: true,
            detect_seasonal: true,
            max_in_flight: 6,
        }
    }
}
