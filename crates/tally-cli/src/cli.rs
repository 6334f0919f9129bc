//! CLI argument definitions using clap
//!
//! This module contains the clap structs and enums for parsing CLI
//! arguments. The actual command implementations are in the `commands`
//! module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Tally - Track and categorize personal spending
#[derive(Parser)]
#[command(name = "tally")]
#[command(about = "Personal expense tracker with AI categorization", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path
    #[arg(long, default_value = "tally.db", global = true)]
    pub db: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the transaction store
    Init,

    /// Record a single transaction
    Add {
        /// Transaction date (YYYY/MM/DD)
        #[arg(short, long)]
        date: String,

        /// Transaction description
        #[arg(long)]
        description: String,

        /// Amount spent (positive decimal)
        #[arg(short, long)]
        amount: f64,

        /// Category (Housing, Food, Transportation, Entertainment, Shopping,
        /// Utilities, Seasonal, Education, Medical, Travel, Other)
        #[arg(short, long, conflicts_with = "ai")]
        category: Option<String>,

        /// Ask the AI to categorize instead of picking a category
        #[arg(long)]
        ai: bool,
    },

    /// Import transactions from a bank CSV export
    Import {
        /// CSV file to import (columns: date,description,amount)
        #[arg(short, long)]
        file: PathBuf,

        /// Skip AI categorization for rows without a keyword match
        #[arg(long)]
        no_ai: bool,

        /// Skip seasonal spending detection (gifts, new year, hongbao)
        #[arg(long)]
        no_seasonal: bool,

        /// Maximum concurrent AI calls
        #[arg(long, default_value = "6")]
        concurrency: usize,
    },

    /// List recent transactions
    List {
        /// Number of transactions to show
        #[arg(short, long, default_value = "10")]
        limit: usize,
    },

    /// Show store and AI backend status
    Status,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_add() {
        let cli = Cli::parse_from([
            "tally", "add", "--date", "2024/01/15", "--description", "Groceries", "--amount",
            "85.43", "--category", "Food",
        ]);
        match cli.command {
            Commands::Add {
                date,
                amount,
                category,
                ai,
                ..
            } => {
                assert_eq!(date, "2024/01/15");
                assert_eq!(amount, 85.43);
                assert_eq!(category.as_deref(), Some("Food"));
                assert!(!ai);
            }
            _ => panic!("expected add command"),
        }
    }

    #[test]
    fn test_category_conflicts_with_ai() {
        let result = Cli::try_parse_from([
            "tally", "add", "--date", "2024/01/15", "--description", "x", "--amount", "1.0",
            "--category", "Food", "--ai",
        ]);
        assert!(result.is_err());
    }
}
