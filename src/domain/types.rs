//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during a reconciliation pass
//! - exported to the JSON snapshot
//! - reloaded later for display or comparisons
//!
//! Everything here is a value object: derived outputs are recomputed from
//! upstream inputs on each run and never mutated in place.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// A single `(date, yield)` point of the historical series.
///
/// The value is a decimal percentage (e.g. `4.5321` for 4.5321%), rounded to
/// four fractional digits at parse time. Immutable once parsed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub date: NaiveDate,
    #[serde(rename = "yield")]
    pub value: f64,
}

/// An ordered yield time series.
///
/// Invariants (established by the feed parser):
/// - sorted ascending by date
/// - dates unique (duplicates dropped, first occurrence wins)
/// - non-empty for any statistic to be computable
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub observations: Vec<Observation>,
}

impl Series {
    pub fn new(observations: Vec<Observation>) -> Self {
        Self { observations }
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// The most recent observation, if any.
    pub fn latest(&self) -> Option<&Observation> {
        self.observations.last()
    }

    /// Yield values in date order.
    pub fn values(&self) -> Vec<f64> {
        self.observations.iter().map(|o| o.value).collect()
    }

    /// Return a copy with every value shifted by `delta` (dates preserved).
    pub fn shifted(&self, delta: f64) -> Series {
        Series::new(
            self.observations
                .iter()
                .map(|o| Observation {
                    date: o.date,
                    value: round4(o.value + delta),
                })
                .collect(),
        )
    }
}

/// Live benchmark bond quote for the same underlying instrument.
///
/// Only `value` is required; every descriptive field may be absent and the
/// system functions on the historical series alone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiveQuote {
    /// Last traded yield, decimal percentage.
    pub value: f64,
    /// Quote timestamp. `None` when missing or unparsable upstream.
    pub as_of: Option<NaiveDateTime>,
    /// Day-on-day change as reported by the quote source.
    pub change: Option<f64>,
    pub period_high: Option<f64>,
    pub period_low: Option<f64>,
    pub period_high_date: Option<NaiveDate>,
    pub period_low_date: Option<NaiveDate>,
    pub name: Option<String>,
    pub coupon: Option<String>,
    pub maturity: Option<String>,
}

/// Summary statistics derived from a non-empty series.
///
/// Recomputed on every run; never persisted as a source of truth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryStats {
    pub latest: f64,
    pub latest_date: NaiveDate,
    pub prior: f64,
    pub daily_delta: f64,
    pub week_delta: Option<f64>,
    pub month_delta: Option<f64>,
    pub ytd_delta: Option<f64>,
    pub period_high: f64,
    pub period_high_date: NaiveDate,
    pub period_low: f64,
    pub period_low_date: NaiveDate,
    pub count: usize,
}

/// Which source supplied the headline yield.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeadlineSource {
    /// Live benchmark quote.
    Live,
    /// Latest historical observation (series-only mode).
    Historical,
}

/// Result of merging the historical series with an optional live quote.
#[derive(Debug, Clone, PartialEq)]
pub struct ReconciledView {
    pub headline_value: f64,
    pub headline_source: HeadlineSource,
    /// Implied benchmark-vs-zero-coupon spread, when a live quote was present.
    pub spread: Option<f64>,
    /// True iff the spread passed validation and was applied to the series.
    pub spread_applied: bool,
    /// The series the presentation layer should use: uniformly shifted when
    /// the spread was applied, otherwise the input series unchanged.
    pub adjusted: Series,
}

/// One row of the valuation scenario table.
///
/// The zero-delta row is the reference row and carries no delta figures.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioRow {
    pub delta_bps: i64,
    pub new_yield: f64,
    pub new_value: f64,
    pub value_delta: Option<f64>,
    pub value_delta_pct: Option<f64>,
}

/// How the property yield is supplied to the valuation model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum YieldBasis {
    /// Direct yield in decimal percent (e.g. `5.50`).
    Direct(f64),
    /// Guide capital value; yield derived as `100 * rent / price`.
    GuidePrice(f64),
}

/// User inputs to the valuation model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValuationInputs {
    /// Annual net rent, GBP.
    pub rent: f64,
    pub basis: YieldBasis,
    /// Fraction of a gilt move assumed to pass through to the property yield,
    /// in `[0, 1]`.
    pub pass_through: f64,
}

/// Inclusive validation band for the benchmark-vs-zero-coupon spread.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpreadBand {
    pub min: f64,
    pub max: f64,
}

impl SpreadBand {
    pub fn contains(&self, spread: f64) -> bool {
        spread >= self.min && spread <= self.max
    }
}

impl Default for SpreadBand {
    /// The benchmark bond and the zero-coupon curve point are different
    /// instruments with a structurally stable spread, typically 0.40-1.00%.
    /// Values outside this band indicate feed corruption or misalignment.
    fn default() -> Self {
        Self { min: 0.40, max: 1.00 }
    }
}

/// Column markers used to locate the header row of the tabular feed.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedSpec {
    /// Exact (case-insensitive) content of the date column header cell.
    pub date_marker: String,
    /// Substring identifying the value column header cell.
    pub series_code: String,
}

impl Default for FeedSpec {
    fn default() -> Self {
        Self {
            date_marker: "DATE".to_string(),
            series_code: "IUDMNZC".to_string(),
        }
    }
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults). Modeling the magic numbers
/// here rather than as module constants keeps them testable with alternate
/// bands/instruments.
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    pub feed: FeedSpec,
    pub spread_band: SpreadBand,
    /// Trailing window of historical data to request, in days.
    pub lookback_days: i64,
    /// Scenario yield deltas in basis points (must include 0 for the
    /// reference row).
    pub scenario_deltas_bps: Vec<i64>,
    /// Trailing moving-average window, in observations.
    pub sma_window: usize,
    /// Lending margin over gilts for implied borrowing cost, in bps.
    pub lending_margin_bps: i64,
    /// Skip the live quote fetch and run in series-only mode.
    pub no_live: bool,
    /// Use the deterministic synthetic data source instead of the network.
    pub offline: bool,
    /// Seed for the synthetic data source.
    pub sample_seed: u64,
    /// Optional JSON snapshot output path.
    pub export: Option<std::path::PathBuf>,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            feed: FeedSpec::default(),
            spread_band: SpreadBand::default(),
            lookback_days: 366,
            scenario_deltas_bps: vec![-75, -50, -25, 0, 25, 50, 75],
            sma_window: 30,
            lending_margin_bps: 175,
            no_live: false,
            offline: false,
            sample_seed: 42,
            export: None,
        }
    }
}

/// Round a decimal percentage to four fractional digits.
pub fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}
