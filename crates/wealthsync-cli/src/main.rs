//! WealthSync CLI - Location-aware budgeting calculator
//!
//! Usage:
//!   wealthsync serve --port 5000       Start web server
//!   wealthsync cities                  List known cities
//!   wealthsync calc --income 50000 ... Run one calculation

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use wealthsync_core::ExpenseCategories;

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

    let reference = cli.reference.as_deref();

    match cli.command {
        Commands::Serve { port, host } => commands::cmd_serve(reference, &host, port).await,
        Commands::Cities => commands::cmd_cities(reference),
        Commands::Calc {
            income,
            expenses,
            savings_goal,
            location,
            physiological,
            safety,
            social,
            esteem,
            self_actualization,
        } => commands::cmd_calc(
            reference,
            income,
            expenses,
            savings_goal,
            &location,
            ExpenseCategories {
                physiological,
                safety,
                social,
                esteem,
                self_actualization,
            },
        ),
    }
}
