//! Manual transaction entry command

use std::path::Path;

use anyhow::Result;
use tally_core::models::{parse_canonical_date, Category, DATE_FORMAT};
use tally_core::ManualEntry;

use super::build_service;

pub async fn cmd_add(
    db_path: &Path,
    date: &str,
    description: &str,
    amount: f64,
    category: Option<&str>,
    ai: bool,
) -> Result<()> {
    let date = parse_canonical_date(date)?;
    let category = category
        .map(|s| s.parse::<Category>())
        .transpose()
        .map_err(|e| anyhow::anyhow!(e))?;

    let svc = build_service(db_path)?;
    if ai && !svc.categorizer().has_ai() {
        println!("💡 Tip: Set DEEPSEEK_API_KEY to enable AI categorization");
        println!("   The transaction will be recorded as Other.");
    }

    let tx = svc
        .record_manual(ManualEntry {
            date,
            description: description.to_string(),
            category,
            amount,
            ai_requested: ai,
        })
        .await?;

    println!(
        "✅ Recorded #{}: {} {} {:.2} ({})",
        tx.id,
        tx.date.format(DATE_FORMAT),
        tx.description,
        tx.amount,
        tx.category
    );

    Ok(())
}
