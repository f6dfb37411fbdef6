//! Deterministic synthetic data for offline runs.
//!
//! `--offline` swaps the network fetchers for a seeded random-walk yield
//! series plus a synthetic benchmark quote sitting a fixed spread above it.
//! Useful for demos, and for exercising the full pipeline (including the
//! reconciler's happy path) without touching the network.

use chrono::{Datelike, Duration, Local, NaiveDate, Weekday};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::{Distribution, Normal};

use crate::domain::{LiveQuote, Observation, Series, round4};
use crate::error::AppError;

/// Starting level for the synthetic walk, decimal percent.
const BASE_YIELD: f64 = 4.60;
/// Daily move standard deviation, decimal percent.
const DAILY_SIGMA: f64 = 0.035;
/// Spread of the synthetic benchmark quote over the series, decimal percent.
const SAMPLE_SPREAD: f64 = 0.55;

/// Generate a business-day yield series ending today.
pub fn generate_series(seed: u64, lookback_days: i64) -> Result<Series, AppError> {
    if lookback_days <= 0 {
        return Err(AppError::new(2, "Lookback window must be > 0 days."));
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let normal = Normal::new(0.0, DAILY_SIGMA)
        .map_err(|e| AppError::new(4, format!("Noise distribution error: {e}")))?;

    let end = Local::now().date_naive();
    let start = end - Duration::days(lookback_days);

    let mut observations = Vec::new();
    let mut level = BASE_YIELD;
    let mut date = start;
    while date <= end {
        if is_business_day(date) {
            level = (level + normal.sample(&mut rng)).max(0.25);
            observations.push(Observation {
                date,
                value: round4(level),
            });
        }
        date = date + Duration::days(1);
    }

    if observations.is_empty() {
        return Err(AppError::new(4, "Synthetic series came out empty."));
    }
    Ok(Series::new(observations))
}

/// Build a synthetic benchmark quote aligned with the series' latest point.
pub fn generate_quote(series: &Series) -> Result<LiveQuote, AppError> {
    let latest = series
        .latest()
        .ok_or_else(|| AppError::new(4, "Cannot quote an empty synthetic series."))?;

    let values = series.values();
    let high = values.iter().cloned().fold(f64::MIN, f64::max);
    let low = values.iter().cloned().fold(f64::MAX, f64::min);

    Ok(LiveQuote {
        value: round4(latest.value + SAMPLE_SPREAD),
        as_of: latest.date.and_hms_opt(9, 30, 0),
        change: None,
        period_high: Some(round4(high + SAMPLE_SPREAD)),
        period_low: Some(round4(low + SAMPLE_SPREAD)),
        period_high_date: None,
        period_low_date: None,
        name: Some("Synthetic 30 Year Gilt".to_string()),
        coupon: None,
        maturity: None,
    })
}

fn is_business_day(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_series() {
        let a = generate_series(7, 90).unwrap();
        let b = generate_series(7, 90).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn different_seeds_differ() {
        let a = generate_series(1, 90).unwrap();
        let b = generate_series(2, 90).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn series_is_sorted_business_days_only() {
        let series = generate_series(42, 60).unwrap();
        assert!(!series.is_empty());
        for pair in series.observations.windows(2) {
            assert!(pair[0].date < pair[1].date);
        }
        for obs in &series.observations {
            assert!(is_business_day(obs.date));
        }
    }

    #[test]
    fn synthetic_quote_sits_in_the_expected_band() {
        let series = generate_series(42, 60).unwrap();
        let quote = generate_quote(&series).unwrap();
        let spread = quote.value - series.latest().unwrap().value;
        assert!((0.40..=1.00).contains(&spread));
        assert!(quote.as_of.is_some());
    }
}
