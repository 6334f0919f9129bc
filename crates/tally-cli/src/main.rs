//! Tally CLI - Personal expense tracker
//!
//! Usage:
//!   tally init                               Initialize the transaction store
//!   tally add --date 2024/01/15 \
//!       --description "Grocery run" \
//!       --amount 85.43 --category Food      Record a transaction
//!   tally import --file statement.csv        Import a bank CSV export
//!   tally list --limit 20                    Show recent transactions
//!   tally status                             Show store and AI backend status

mod cli;
mod commands;

#[cfg(test)]
mod tests;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    match cli.command {
        Commands::Init => commands::cmd_init(&cli.db),
        Commands::Add {
            date,
            description,
            amount,
            category,
            ai,
        } => {
            commands::cmd_add(&cli.db, &date, &description, amount, category.as_deref(), ai).await
        }
        Commands::Import {
            file,
            no_ai,
            no_seasonal,
            concurrency,
        } => commands::cmd_import(&cli.db, &file, no_ai, no_seasonal, concurrency).await,
        Commands::List { limit } => commands::cmd_list(&cli.db, limit),
        Commands::Status => commands::cmd_status(&cli.db).await,
    }
}
