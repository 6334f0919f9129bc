//! CSV import command

use std::path::Path;

use anyhow::Result;
use tally_core::ImportOptions;

use super::{build_service, truncate};

pub async fn cmd_import(
    db_path: &Path,
    file: &Path,
    no_ai: bool,
    no_seasonal: bool,
    concurrency: usize,
) -> Result<()> {
    println!("📥 Importing {}...", file.display());

    let svc = build_service(db_path)?;

    let auto_categorize = !no_ai;
    if auto_categorize && !svc.categorizer().has_ai() {
        println!("💡 Tip: Set DEEPSEEK_API_KEY to enable AI categorization");
        println!("   Rows without a keyword match will be recorded as Other.");
    }

    let options = ImportOptions {
        auto_categorize,
        detect_seasonal: !no_seasonal,
        max_in_flight: concurrency,
    };
    let report = svc.import_file(file, &options).await?;

    println!("✅ Import complete!");
    println!("   Imported: {}", report.saved.len());
    if report.duplicates > 0 {
        println!("   Skipped (duplicates): {}", report.duplicates);
    }

    if !report.categorization_failures.is_empty() {
        println!(
            "   ⚠️  Recorded as Other (AI unavailable or unhelpful): {}",
            report.categorization_failures.len()
        );
    }

    if !report.row_failures.is_empty() {
        println!();
        println!("⚠️  {} rows could not be imported:", report.row_failures.len());
        for failure in &report.row_failures {
            println!("   Row {}: {}", failure.row + 1, truncate(&failure.reason, 70));
        }
    }

    Ok(())
}
