//! Core command implementations and shared utilities
//!
//! This module contains:
//! - `open_db` / `build_service` - Shared utilities to open the store and
//!   wire up the ingestion service
//! - `cmd_init` - Initialize the transaction store
//! - `cmd_list` - List recent transactions
//! - `cmd_status` - Show store and AI backend status

use std::path::Path;

use anyhow::{Context, Result};
use tally_core::ai::{AiBackend, AiClient};
use tally_core::models::DATE_FORMAT;
use tally_core::{Categorizer, Database, IngestionService};

use super::truncate;

/// Open the transaction store, creating it if needed
pub fn open_db(db_path: &Path) -> Result<Database> {
    Database::open(&db_path.to_string_lossy()).context("Failed to open transaction store")
}

/// Wire up the ingestion service with whatever AI backend the environment
/// provides; without one the AI path degrades to Other
pub fn build_service(db_path: &Path) -> Result<IngestionService> {
    let db = open_db(db_path)?;
    let categorizer = Categorizer::new(AiClient::from_env());
    Ok(IngestionService::new(db, categorizer))
}

pub fn cmd_init(db_path: &Path) -> Result<()> {
    println!("🔧 Initializing transaction store at {}...", db_path.display());

    let db = open_db(db_path)?;
    let count = db.count_transactions()?;
    if count > 0 {
        println!("   Store already holds {} transactions", count);
    }

    println!("✅ Store initialized successfully!");
    println!();
    println!("Next steps:");
    println!("  1. Import transactions: tally import --file statement.csv");
    println!("  2. Or record one: tally add --date 2024/01/15 --description \"Grocery run\" --amount 85.43 --category Food");

    Ok(())
}

pub fn cmd_list(db_path: &Path, limit: usize) -> Result<()> {
    let db = open_db(db_path)?;
    let transactions = db.load_all()?;

    if transactions.is_empty() {
        println!("No transactions found. Import some with:");
        println!("  tally import --file statement.csv");
        return Ok(());
    }

    println!();
    println!("💳 Transactions ({} of {})", limit.min(transactions.len()), transactions.len());
    println!("   ───────────────────────────────────────────────────────────");

    for tx in transactions.iter().take(limit) {
        println!(
            "   {:>5}  {}  {:<30}  {:<14}  {:>10.2}",
            tx.id,
            tx.date.format(DATE_FORMAT),
            truncate(&tx.description, 30),
            tx.category.as_str(),
            tx.amount
        );
    }

    println!();
    Ok(())
}

pub async fn cmd_status(db_path: &Path) -> Result<()> {
    use std::fs;

    println!();
    println!("📊 Tally Status");
    println!("   ───────────────────────────────────────────────────────────");
    println!("   Store: {}", db_path.display());

    if db_path.exists() {
        if let Ok(metadata) = fs::metadata(db_path) {
            let size_kb = metadata.len() as f64 / 1024.0;
            if size_kb < 1024.0 {
                println!("   Size: {:.1} KB", size_kb);
            } else {
                println!("   Size: {:.1} MB", size_kb / 1024.0);
            }
        }

        let db = open_db(db_path)?;
        println!("   Transactions: {}", db.count_transactions()?);
    } else {
        println!("   Size: (store not initialized)");
    }

    println!();
    match AiClient::from_env() {
        Some(client) => {
            println!("   AI backend: {} ({})", client.model(), client.host());
            if client.health_check().await {
                println!("   ✅ AI backend reachable");
            } else {
                println!("   ❌ AI backend unreachable");
            }
        }
        None => {
            println!("   AI backend: not configured");
            println!("   💡 Tip: Set DEEPSEEK_API_KEY to enable AI categorization");
        }
    }

    println!();
    Ok(())
}
