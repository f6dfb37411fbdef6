//! Merge the live benchmark quote with the historical series.
//!
//! The live quote and the historical zero-coupon series are genuinely
//! different instruments (benchmark bond vs. zero-coupon curve point) with a
//! structurally stable spread. The merge:
//!
//! - matches the quote's effective date to the nearest historical observation
//! - computes the implied spread
//! - validates the spread against the expected band before trusting it
//!
//! A spread outside the band means feed corruption or clock-skew
//! misalignment; the series is then left unadjusted rather than silently
//! producing a nonsensical shifted chart. The live quote itself remains
//! authoritative for the headline either way.

use crate::domain::{HeadlineSource, LiveQuote, ReconciledView, Series, SpreadBand, round4};
use crate::stats::nearest_value;

/// Outcome of a reconciliation pass, including any non-fatal warning.
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciliation {
    pub view: ReconciledView,
    pub warning: Option<String>,
}

/// Reconcile a non-empty series with an optional live quote.
///
/// Pure function of its inputs: reconciling the same pair twice yields an
/// identical view.
pub fn reconcile(series: &Series, live: Option<&LiveQuote>, band: &SpreadBand) -> Reconciliation {
    let Some(live) = live else {
        return Reconciliation {
            view: ReconciledView {
                headline_value: series.latest().map(|o| o.value).unwrap_or(0.0),
                headline_source: HeadlineSource::Historical,
                spread: None,
                spread_applied: false,
                adjusted: series.clone(),
            },
            warning: None,
        };
    };

    // Effective date: the quote timestamp's date part, falling back to the
    // series' latest date when the timestamp is missing.
    let effective_date = live
        .as_of
        .map(|ts| ts.date())
        .or_else(|| series.latest().map(|o| o.date));

    let matched = effective_date
        .and_then(|date| nearest_value(series, date))
        .or_else(|| series.latest().map(|o| o.value));

    let (spread, spread_applied, adjusted, warning) = match matched {
        Some(matched) => {
            let spread = round4(live.value - matched);
            if band.contains(spread) {
                (Some(spread), true, series.shifted(spread), None)
            } else {
                let warning = format!(
                    "Benchmark spread {spread:+.2}% outside expected range \
                     ({:.2}-{:.2}%); using unadjusted historical data.",
                    band.min, band.max
                );
                (Some(spread), false, series.clone(), Some(warning))
            }
        }
        None => (None, false, series.clone(), None),
    };

    Reconciliation {
        view: ReconciledView {
            headline_value: live.value,
            headline_source: HeadlineSource::Live,
            spread,
            spread_applied,
            adjusted,
        },
        warning,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Observation;
    use chrono::NaiveDate;

    fn obs(y: i32, m: u32, d: u32, value: f64) -> Observation {
        Observation {
            date: NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            value,
        }
    }

    fn quote(value: f64, as_of: Option<&str>) -> LiveQuote {
        LiveQuote {
            value,
            as_of: as_of.map(|s| {
                chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S").unwrap()
            }),
            change: None,
            period_high: None,
            period_low: None,
            period_high_date: None,
            period_low_date: None,
            name: None,
            coupon: None,
            maturity: None,
        }
    }

    #[test]
    fn series_only_mode_uses_latest_observation() {
        let series = Series::new(vec![obs(2024, 1, 1, 4.0), obs(2024, 1, 2, 4.5)]);
        let rec = reconcile(&series, None, &SpreadBand::default());
        assert_eq!(rec.view.headline_value, 4.5);
        assert_eq!(rec.view.headline_source, HeadlineSource::Historical);
        assert_eq!(rec.view.spread, None);
        assert!(!rec.view.spread_applied);
        assert_eq!(rec.view.adjusted, series);
        assert!(rec.warning.is_none());
    }

    #[test]
    fn in_band_spread_shifts_the_whole_series() {
        let series = Series::new(vec![obs(2024, 1, 1, 4.2), obs(2024, 1, 2, 4.5)]);
        let live = quote(5.10, Some("2024-01-02T09:30:00"));
        let rec = reconcile(&series, Some(&live), &SpreadBand::default());
        assert_eq!(rec.view.spread, Some(0.6));
        assert!(rec.view.spread_applied);
        assert_eq!(rec.view.headline_value, 5.10);
        assert_eq!(rec.view.headline_source, HeadlineSource::Live);
        assert_eq!(rec.view.adjusted.observations[0].value, 4.8);
        assert_eq!(rec.view.adjusted.observations[1].value, 5.1);
        assert!(rec.warning.is_none());
    }

    #[test]
    fn out_of_band_spread_is_rejected_with_warning() {
        let series = Series::new(vec![obs(2024, 1, 1, 4.2), obs(2024, 1, 2, 4.5)]);
        let live = quote(4.60, Some("2024-01-02T09:30:00"));
        let rec = reconcile(&series, Some(&live), &SpreadBand::default());
        assert_eq!(rec.view.spread, Some(0.1));
        assert!(!rec.view.spread_applied);
        // The live quote is still authoritative for the headline.
        assert_eq!(rec.view.headline_value, 4.60);
        assert_eq!(rec.view.adjusted, series);
        assert!(rec.warning.is_some());
    }

    #[test]
    fn missing_timestamp_falls_back_to_latest_date() {
        let series = Series::new(vec![obs(2024, 1, 1, 4.2), obs(2024, 1, 2, 4.5)]);
        let live = quote(5.10, None);
        let rec = reconcile(&series, Some(&live), &SpreadBand::default());
        // Matched against the latest observation (4.5), not the older one.
        assert_eq!(rec.view.spread, Some(0.6));
        assert!(rec.view.spread_applied);
    }

    #[test]
    fn quote_date_matches_nearest_observation() {
        // A stale quote date should match the older observation.
        let series = Series::new(vec![obs(2024, 1, 1, 4.0), obs(2024, 1, 20, 4.5)]);
        let live = quote(4.55, Some("2024-01-02T09:30:00"));
        let rec = reconcile(&series, Some(&live), &SpreadBand::default());
        assert_eq!(rec.view.spread, Some(0.55));
        assert!(rec.view.spread_applied);
    }

    #[test]
    fn reconciliation_is_idempotent() {
        let series = Series::new(vec![obs(2024, 1, 1, 4.2), obs(2024, 1, 2, 4.5)]);
        let live = quote(5.10, Some("2024-01-02T09:30:00"));
        let a = reconcile(&series, Some(&live), &SpreadBand::default());
        let b = reconcile(&series, Some(&live), &SpreadBand::default());
        assert_eq!(a, b);
    }
}
