//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// WealthSync - Location-aware budgeting calculator
#[derive(Parser)]
#[command(name = "wealthsync")]
#[command(about = "Budget calculator adjusted for regional inflation and cost of living", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Reference data file (regions, cities, need thresholds)
    ///
    /// Defaults to WEALTHSYNC_REFERENCE_DATA, then
    /// ~/.local/share/wealthsync/config/reference.toml, then the built-in tables.
    #[arg(long, global = true)]
    pub reference: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the web server
    Serve {
        /// Port to listen on (defaults to the PORT environment variable, then 5000)
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to
        #[arg(long, default_value = "0.0.0.0")]
        host: String,
    },

    /// List known cities and their states
    Cities,

    /// Run a single budget calculation and print the result
    Calc {
        /// Monthly income
        #[arg(long, allow_hyphen_values = true)]
        income: f64,

        /// Monthly expenses
        #[arg(long, allow_hyphen_values = true)]
        expenses: f64,

        /// Savings goal
        #[arg(long, allow_hyphen_values = true)]
        savings_goal: f64,

        /// City, state or union territory
        #[arg(short, long, default_value = "")]
        location: String,

        /// Spend on food, shelter and other basics
        #[arg(long, default_value = "0")]
        physiological: f64,

        /// Spend on insurance and emergency savings
        #[arg(long, default_value = "0")]
        safety: f64,

        /// Spend on social activities
        #[arg(long, default_value = "0")]
        social: f64,

        /// Spend on education and personal achievements
        #[arg(long, default_value = "0")]
        esteem: f64,

        /// Spend on hobbies and self-development
        #[arg(long, default_value = "0")]
        self_actualization: f64,
    },
}
