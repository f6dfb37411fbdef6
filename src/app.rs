//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - runs the refresh pipeline
//! - prints reports/scenario tables
//! - writes the optional snapshot export

use std::time::Duration;

use clap::Parser;

use crate::cli::{Command, FeedArgs, ReportArgs, ValueArgs, WatchArgs};
use crate::domain::{
    FeedSpec, SpreadBand, TrackerConfig, ValuationInputs, YieldBasis,
};
use crate::error::AppError;

pub mod cache;
pub mod pipeline;

use cache::RefreshCache;
use pipeline::RunOutput;

/// Entry point for the `gilt` binary.
pub fn run() -> Result<(), AppError> {
    let cli = crate::cli::Cli::parse();
    match cli.command {
        Command::Report(args) => handle_report(args),
        Command::Value(args) => handle_value(args),
        Command::Watch(args) => handle_watch(args),
    }
}

fn handle_report(args: ReportArgs) -> Result<(), AppError> {
    let config = tracker_config(&args.feed, args.export.clone())?;
    let output = pipeline::run_refresh_with_export(&config)?;
    print_output(&output, &config);
    if let Some(path) = &config.export {
        println!("Snapshot saved to {}", path.display());
    }
    Ok(())
}

fn handle_value(args: ValueArgs) -> Result<(), AppError> {
    let inputs = valuation_inputs(&args)?;
    let valuation = crate::value::resolve_inputs(&inputs)?;
    let config = tracker_config(&args.feed, None)?;

    // An explicit --gilt override skips the fetch entirely: scenario table
    // only, no historical projection to anchor it to.
    if let Some(gilt) = args.gilt {
        if !(gilt.is_finite() && gilt > 0.0) {
            return Err(AppError::new(2, "Gilt yield override must be > 0."));
        }
        let rows = crate::value::scenario_table(&valuation, &config.scenario_deltas_bps);
        println!(
            "{}",
            crate::report::format_scenarios(&valuation, &rows, gilt)
        );
        return Ok(());
    }

    let output = pipeline::run_refresh(&config)?;
    print_warnings(&output);

    let rows = crate::value::scenario_table(&valuation, &config.scenario_deltas_bps);
    println!(
        "{}",
        crate::report::format_scenarios(&valuation, &rows, output.view.headline_value)
    );

    let projected = crate::value::project_value_series(
        &valuation,
        &output.view.adjusted,
        output.view.headline_value,
    );
    let smoothed = crate::value::smooth_value_series(&projected, config.sma_window);
    println!(
        "{}",
        crate::report::format_value_trend(&projected, &smoothed, config.sma_window)
    );
    Ok(())
}

fn handle_watch(args: WatchArgs) -> Result<(), AppError> {
    let config = tracker_config(&args.report.feed, args.report.export.clone())?;
    let cache: RefreshCache<RunOutput> =
        RefreshCache::new(Duration::from_secs(args.interval));

    let mut cycle = 0u64;
    loop {
        let output = cache.get_or_refresh(|| pipeline::run_refresh_with_export(&config))?;
        print_output(&output, &config);

        cycle += 1;
        if let Some(max) = args.cycles {
            if cycle >= max {
                return Ok(());
            }
        }
        std::thread::sleep(Duration::from_secs(args.interval));
    }
}

fn print_output(output: &RunOutput, config: &TrackerConfig) {
    print_warnings(output);
    println!("{}", crate::report::format_run_summary(output, config));
}

fn print_warnings(output: &RunOutput) {
    for warning in &output.warnings {
        eprintln!("Warning: {warning}");
    }
}

fn tracker_config(args: &FeedArgs, export: Option<std::path::PathBuf>) -> Result<TrackerConfig, AppError> {
    if args.lookback_days <= 0 {
        return Err(AppError::new(2, "Lookback window must be > 0 days."));
    }
    if !(args.spread_min.is_finite()
        && args.spread_max.is_finite()
        && args.spread_max >= args.spread_min)
    {
        return Err(AppError::new(2, "Invalid spread band."));
    }
    Ok(TrackerConfig {
        feed: FeedSpec {
            date_marker: "DATE".to_string(),
            series_code: args.series_code.clone(),
        },
        spread_band: SpreadBand {
            min: args.spread_min,
            max: args.spread_max,
        },
        lookback_days: args.lookback_days,
        no_live: args.no_live,
        offline: args.offline,
        sample_seed: args.seed,
        export,
        ..TrackerConfig::default()
    })
}

fn valuation_inputs(args: &ValueArgs) -> Result<ValuationInputs, AppError> {
    let basis = match (args.yield_pct, args.price) {
        (Some(y), None) => YieldBasis::Direct(y),
        (None, Some(p)) => YieldBasis::GuidePrice(p),
        (None, None) => {
            return Err(AppError::new(
                2,
                "Supply either --yield or --price for the valuation.",
            ));
        }
        (Some(_), Some(_)) => {
            return Err(AppError::new(2, "--yield and --price are mutually exclusive."));
        }
    };
    Ok(ValuationInputs {
        rent: args.rent,
        basis,
        pass_through: args.pass_through / 100.0,
    })
}
