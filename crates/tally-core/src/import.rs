//! CSV import parser for bank transaction exports
//!
//! Fixed column order `date,description,amount`, optional header row.
//! Malformed rows are collected as per-row failures instead of aborting the
//! whole file; only an unreadable file is a hard import error.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use csv::ReaderBuilder;
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::{entry_hash, RowFailure};

/// One successfully parsed CSV row, not yet categorized or validated further
#[derive(Debug, Clone)]
pub struct RowCandidate {
    /// Zero-based data row index (header excluded)
    pub row: usize,
    pub date: NaiveDate,
    pub description: String,
    pub amount: f64,
    pub entry_hash: String,
}

/// Result of parsing a CSV file: good rows plus per-row failures
#[derive(Debug, Clone, Default)]
pub struct ParsedImport {
    pub candidates: Vec<RowCandidate>,
    pub failures: Vec<RowFailure>,
}

/// Parse a CSV file from disk
pub fn parse_file(path: &Path) -> Result<ParsedImport> {
    let file = File::open(path)
        .map_err(|e| Error::Import(format!("Failed to open {}: {}", path.display(), e)))?;
    parse_csv(file)
}

/// Parse CSV data into transaction candidates
pub fn parse_csv<R: Read>(reader: R) -> Result<ParsedImport> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut parsed = ParsedImport::default();
    let mut row = 0usize;

    for (record_index, result) in rdr.records().enumerate() {
        // A record-level error (e.g. invalid UTF-8 in one row) skips that
        // row; the reader resumes on the next record
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                parsed.failures.push(RowFailure {
                    row,
                    reason: format!("Unreadable record: {}", e),
                });
                row += 1;
                continue;
            }
        };

        // Header detection: a first record whose date and amount cells both
        // fail to parse is a header, not a data row
        if record_index == 0 && looks_like_header(&record) {
            continue;
        }

        match parse_record(&record, row) {
            Ok(candidate) => parsed.candidates.push(candidate),
            Err(reason) => parsed.failures.push(RowFailure { row, reason }),
        }
        row += 1;
    }

    debug!(
        candidates = parsed.candidates.len(),
        failures = parsed.failures.len(),
        "Parsed CSV import"
    );
    Ok(parsed)
}

fn looks_like_header(record: &csv::StringRecord) -> bool {
    let date_cell = record.get(0).unwrap_or("");
    let amount_cell = record.get(2).unwrap_or("");
    parse_date(date_cell).is_err() && parse_amount(amount_cell).is_err()
}

fn parse_record(record: &csv::StringRecord, row: usize) -> std::result::Result<RowCandidate, String> {
    if record.len() != 3 {
        return Err(format!("Expected 3 columns, got {}", record.len()));
    }

    let date = parse_date(record.get(0).unwrap_or(""))?;

    let description = record.get(1).unwrap_or("").trim().to_string();
    if description.is_empty() {
        return Err("Empty description".to_string());
    }

    let amount = parse_amount(record.get(2).unwrap_or(""))?;
    if !amount.is_finite() {
        return Err(format!("Amount is not finite: {}", amount));
    }
    if amount <= 0.0 {
        return Err(format!("Amount must be positive (expenses only): {}", amount));
    }

    Ok(RowCandidate {
        row,
        entry_hash: entry_hash(&date, &description, amount),
        date,
        description,
        amount,
    })
}

/// Parse a date string in common bank formats, normalized to a calendar date
fn parse_date(s: &str) -> std::result::Result<NaiveDate, String> {
    let s = s.trim();

    let formats = [
        "%Y/%m/%d", // 2024/01/15 (canonical)
        "%m/%d/%Y", // 01/15/2024
        "%Y-%m-%d", // 2024-01-15
        "%m-%d-%Y", // 01-15-2024
        "%m/%d/%y", // 01/15/24
        "%d/%m/%Y", // 15/01/2024 (European)
    ];

    for fmt in formats {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(date);
        }
    }

    Err(format!("Unable to parse date: {}", s))
}

/// Parse an amount string, handling currency symbols and commas
fn parse_amount(s: &str) -> std::result::Result<f64, String> {
    let cleaned: String = s
        .trim()
        .replace(['$', '¥', ',', ' '], "")
        .replace('(', "-")
        .replace(')', "");

    cleaned
        .parse::<f64>()
        .map_err(|_| format!("Unable to parse amount: {}", s))
}
