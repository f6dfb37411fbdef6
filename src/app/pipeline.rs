//! Shared refresh pipeline used by every front-end command.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! feed fetch -> parse -> statistics -> live quote -> reconcile
//!
//! The commands then focus on presentation (report vs scenario table vs
//! watch loop). The pipeline itself is synchronous and stateless: each run is
//! a pure function of its inputs plus the two fetches.

use crate::data::{BoeClient, QuoteClient, generate_quote, generate_series};
use crate::domain::{LiveQuote, ReconciledView, Series, SummaryStats, TrackerConfig};
use crate::error::AppError;
use crate::io::feed::{ParsedFeed, parse_feed};
use crate::reconcile::reconcile;
use crate::stats::compute_summary;

/// All computed outputs of a single refresh.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub series: Series,
    pub stats: SummaryStats,
    pub live: Option<LiveQuote>,
    pub view: ReconciledView,
    pub rows_read: usize,
    pub rows_dropped: usize,
    /// Non-fatal degradations (quote unavailable, spread rejected, bad rows).
    pub warnings: Vec<String>,
}

/// Execute the full refresh pipeline.
pub fn run_refresh(config: &TrackerConfig) -> Result<RunOutput, AppError> {
    let mut warnings = Vec::new();

    // 1) Historical series.
    let (series, rows_read, rows_dropped) = if config.offline {
        let series = generate_series(config.sample_seed, config.lookback_days)?;
        let n = series.len();
        (series, n, 0)
    } else {
        let client = BoeClient::new()?;
        let text = client.fetch_csv(&config.feed.series_code, config.lookback_days)?;
        let parsed = parse_feed(&text, &config.feed)?;
        flatten_feed(parsed, &mut warnings)
    };

    // 2) Summary statistics over the raw series.
    let stats = compute_summary(&series)?;

    // 3) Live quote, strictly optional.
    let live = fetch_live(config, &series, &mut warnings);

    // 4) Reconcile.
    let reconciliation = reconcile(&series, live.as_ref(), &config.spread_band);
    if let Some(warning) = reconciliation.warning {
        warnings.push(warning);
    }

    Ok(RunOutput {
        series,
        stats,
        live,
        view: reconciliation.view,
        rows_read,
        rows_dropped,
        warnings,
    })
}

/// Run the pipeline and write the snapshot if the config asks for one.
pub fn run_refresh_with_export(config: &TrackerConfig) -> Result<RunOutput, AppError> {
    let output = run_refresh(config)?;
    if let Some(path) = &config.export {
        crate::io::export::write_snapshot_json(path, &output, &config.feed.series_code)?;
    }
    Ok(output)
}

fn flatten_feed(parsed: ParsedFeed, warnings: &mut Vec<String>) -> (Series, usize, usize) {
    let dropped = parsed.row_errors.len();
    if dropped > 0 {
        warnings.push(format!("{dropped} malformed feed row(s) dropped."));
    }
    (parsed.series, parsed.rows_read, dropped)
}

fn fetch_live(
    config: &TrackerConfig,
    series: &Series,
    warnings: &mut Vec<String>,
) -> Option<LiveQuote> {
    if config.no_live {
        return None;
    }
    if config.offline {
        return match generate_quote(series) {
            Ok(quote) => Some(quote),
            Err(err) => {
                warnings.push(format!("Synthetic quote unavailable: {err}"));
                None
            }
        };
    }
    let client = match QuoteClient::new() {
        Ok(client) => client,
        Err(err) => {
            warnings.push(format!("Live quote unavailable: {err}"));
            return None;
        }
    };
    match client.fetch_quote() {
        Ok(quote) => Some(quote),
        Err(err) => {
            warnings.push(format!("Live quote unavailable: {err}"));
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offline_config() -> TrackerConfig {
        TrackerConfig {
            offline: true,
            lookback_days: 120,
            ..TrackerConfig::default()
        }
    }

    #[test]
    fn offline_run_reconciles_the_synthetic_quote() {
        let output = run_refresh(&offline_config()).unwrap();
        assert!(!output.series.is_empty());
        assert_eq!(output.stats.count, output.series.len());
        // The synthetic quote sits inside the spread band by construction.
        assert!(output.view.spread_applied);
        assert!(output.warnings.is_empty());
    }

    #[test]
    fn no_live_run_uses_the_series_headline() {
        let config = TrackerConfig {
            no_live: true,
            ..offline_config()
        };
        let output = run_refresh(&config).unwrap();
        assert!(output.live.is_none());
        assert_eq!(output.view.headline_value, output.stats.latest);
        assert!(!output.view.spread_applied);
    }

    #[test]
    fn stats_latest_matches_series_tail() {
        let output = run_refresh(&offline_config()).unwrap();
        assert_eq!(
            output.stats.latest,
            output.series.latest().unwrap().value
        );
    }
}
