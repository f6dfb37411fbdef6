//! Command-line parsing for the gilt yield tracker.
//!
//! The goal of this module is to keep **argument parsing** and **command
//! dispatch** separate from the reconciliation/valuation code.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "gilt", version, about = "UK 30-Year Gilt Yield Tracker")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch and reconcile the latest data, print the summary report, and
    /// optionally export a JSON snapshot.
    Report(ReportArgs),
    /// Run the property valuation scenario calculator against the current
    /// (or overridden) gilt yield.
    Value(ValueArgs),
    /// Refresh the report on an interval through the staleness cache.
    Watch(WatchArgs),
}

/// Data-source options shared by every command.
#[derive(Debug, Parser, Clone)]
pub struct FeedArgs {
    /// Bank of England series code for the historical feed.
    #[arg(long, default_value = "IUDMNZC")]
    pub series_code: String,

    /// Trailing window of historical data to request (days).
    #[arg(long, default_value_t = 366)]
    pub lookback_days: i64,

    /// Skip the live benchmark quote (series-only mode).
    #[arg(long)]
    pub no_live: bool,

    /// Use deterministic synthetic data instead of the network.
    #[arg(long)]
    pub offline: bool,

    /// Seed for the synthetic data source.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Lower edge of the accepted benchmark spread (percent).
    #[arg(long, default_value_t = 0.40)]
    pub spread_min: f64,

    /// Upper edge of the accepted benchmark spread (percent).
    #[arg(long, default_value_t = 1.00)]
    pub spread_max: f64,
}

#[derive(Debug, Parser, Clone)]
pub struct ReportArgs {
    #[command(flatten)]
    pub feed: FeedArgs,

    /// Write a JSON snapshot of the reconciled run to this path.
    #[arg(long)]
    pub export: Option<PathBuf>,
}

#[derive(Debug, Parser, Clone)]
pub struct ValueArgs {
    #[command(flatten)]
    pub feed: FeedArgs,

    /// Annual net rent (GBP).
    #[arg(long)]
    pub rent: f64,

    /// Property yield (percent). Mutually exclusive with --price.
    #[arg(long = "yield", conflicts_with = "price")]
    pub yield_pct: Option<f64>,

    /// Guide price (GBP); the yield is derived as 100 * rent / price.
    #[arg(long)]
    pub price: Option<f64>,

    /// Gilt pass-through rate (percent, 0-100).
    #[arg(long, default_value_t = 50.0)]
    pub pass_through: f64,

    /// Override the headline gilt yield instead of fetching it (percent).
    #[arg(long)]
    pub gilt: Option<f64>,
}

#[derive(Debug, Parser, Clone)]
pub struct WatchArgs {
    #[command(flatten)]
    pub report: ReportArgs,

    /// Staleness window between refreshes (seconds).
    #[arg(long, default_value_t = 300)]
    pub interval: u64,

    /// Number of refresh cycles to run (forever when omitted).
    #[arg(long)]
    pub cycles: Option<u64>,
}
