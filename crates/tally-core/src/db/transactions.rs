//! Transaction store operations

use rusqlite::{params, OptionalExtension};

use super::{parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{Category, NewTransaction, Transaction, TransactionSource};

/// Result of saving a transaction
#[derive(Debug, Clone)]
pub enum SaveOutcome {
    /// The transaction was appended to the store
    Saved(Transaction),
    /// An imported row matched an already-stored entry hash; nothing written
    Duplicate(Transaction),
}

impl SaveOutcome {
    pub fn transaction(&self) -> &Transaction {
        match self {
            Self::Saved(tx) | Self::Duplicate(tx) => tx,
        }
    }
}

impl Database {
    /// Append a transaction to the store
    ///
    /// A single INSERT, so a record is either fully written or not written
    /// at all. Imported rows are deduplicated on `entry_hash`; re-entering
    /// an identical transaction manually is allowed.
    pub fn save_transaction(&self, tx: &NewTransaction) -> Result<SaveOutcome> {
        let conn = self.conn()?;

        if tx.source == TransactionSource::Import {
            let existing: Option<i64> = conn
                .query_row(
                    "SELECT id FROM transactions WHERE entry_hash = ?",
                    params![tx.entry_hash],
                    |row| row.get(0),
                )
                .optional()?;

            if let Some(existing_id) = existing {
                let existing_tx = self.get_transaction(existing_id)?.ok_or_else(|| {
                    Error::Database(rusqlite::Error::QueryReturnedNoRows)
                })?;
                return Ok(SaveOutcome::Duplicate(existing_tx));
            }
        }

        conn.execute(
            r#"
            INSERT INTO transactions (date, description, category, amount, entry_hash, source)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
            params![
                tx.date.to_string(),
                tx.description,
                tx.category.as_str(),
                tx.amount,
                tx.entry_hash,
                tx.source.as_str(),
            ],
        )?;

        let id = conn.last_insert_rowid();
        let stored = self
            .get_transaction(id)?
            .ok_or_else(|| Error::Database(rusqlite::Error::QueryReturnedNoRows))?;
        Ok(SaveOutcome::Saved(stored))
    }

    /// Load all transactions, most recent first
    ///
    /// Ordered by date descending; equal dates keep insertion order.
    pub fn load_all(&self) -> Result<Vec<Transaction>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, date, description, category, amount, entry_hash, source, created_at
             FROM transactions
             ORDER BY date DESC, id ASC",
        )?;

        let transactions = stmt
            .query_map([], Self::row_to_transaction)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(transactions)
    }

    /// Get a single transaction by ID
    pub fn get_transaction(&self, id: i64) -> Result<Option<Transaction>> {
        let conn = self.conn()?;
        let tx = conn
            .query_row(
                "SELECT id, date, description, category, amount, entry_hash, source, created_at
                 FROM transactions WHERE id = ?",
                params![id],
                Self::row_to_transaction,
            )
            .optional()?;
        Ok(tx)
    }

    /// Count total transactions
    pub fn count_transactions(&self) -> Result<i64> {
        let conn = self.conn()?;
        let count: i64 =
            conn.query_row("SELECT COUNT(*) FROM transactions", [], |row| row.get(0))?;
        Ok(count)
    }

    fn row_to_transaction(row: &rusqlite::Row) -> rusqlite::Result<Transaction> {
        let date_str: String = row.get(1)?;
        let category_str: String = row.get(3)?;
        let source_str: String = row.get(6)?;
        let created_at_str: String = row.get(7)?;
        // A date that fails to parse means the stored record is corrupt;
        // surfacing it beats fabricating an epoch date
        let date = chrono::NaiveDate::parse_from_str(&date_str, "%Y-%m-%d").map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(1, rusqlite::types::Type::Text, Box::new(e))
        })?;
        Ok(Transaction {
            id: row.get(0)?,
            date,
            description: row.get(2)?,
            category: category_str.parse().unwrap_or(Category::Other),
            amount: row.get(4)?,
            entry_hash: row.get(5)?,
            source: source_str.parse().unwrap_or_default(),
            created_at: parse_datetime(&created_at_str),
        })
    }
}
