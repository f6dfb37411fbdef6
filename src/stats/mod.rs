//! Summary statistics over an ordered yield series.
//!
//! All lookups here are nearest-date matches: the feed has no observations on
//! weekends or bank holidays, so "a week ago" means the observation whose date
//! is closest to `latest - 7d`, not an exact calendar hit.

use chrono::{Datelike, Duration, NaiveDate};

use crate::domain::{Series, SummaryStats, round4};
use crate::error::AppError;

/// Find the value whose date is nearest to `target`.
///
/// O(n) scan; ties break to the first observation encountered, which is the
/// earlier date since the series is ascending. Returns `None` only for an
/// empty series.
pub fn nearest_value(series: &Series, target: NaiveDate) -> Option<f64> {
    let mut best: Option<(i64, f64)> = None;
    for obs in &series.observations {
        let diff = (obs.date - target).num_days().abs();
        if best.map(|(d, _)| diff < d).unwrap_or(true) {
            best = Some((diff, obs.value));
        }
    }
    best.map(|(_, value)| value)
}

/// Compute summary statistics for a non-empty series.
///
/// For a single-observation series, `prior` is the same observation and the
/// daily delta degenerates to 0. That is intended: a one-point series has no
/// meaningful day-on-day move, and it keeps the minimal case index-safe.
pub fn compute_summary(series: &Series) -> Result<SummaryStats, AppError> {
    let latest = series
        .latest()
        .ok_or_else(|| AppError::new(4, "Cannot compute statistics over an empty series."))?;
    let n = series.len();
    let prior = if n >= 2 {
        series.observations[n - 2]
    } else {
        *latest
    };

    let week_target = latest.date - Duration::days(7);
    let month_target = latest.date - Duration::days(30);
    // Jan 1 of the latest observation's year always exists.
    let year_start = NaiveDate::from_ymd_opt(latest.date.year(), 1, 1)
        .ok_or_else(|| AppError::new(4, "Invalid year start date."))?;

    let week_delta = nearest_value(series, week_target).map(|v| round4(latest.value - v));
    let month_delta = nearest_value(series, month_target).map(|v| round4(latest.value - v));
    let ytd_delta = nearest_value(series, year_start).map(|v| round4(latest.value - v));

    // First observation achieving the extremum wins on ties.
    let mut high = series.observations[0];
    let mut low = series.observations[0];
    for obs in &series.observations[1..] {
        if obs.value > high.value {
            high = *obs;
        }
        if obs.value < low.value {
            low = *obs;
        }
    }

    Ok(SummaryStats {
        latest: latest.value,
        latest_date: latest.date,
        prior: prior.value,
        daily_delta: round4(latest.value - prior.value),
        week_delta,
        month_delta,
        ytd_delta,
        period_high: round4(high.value),
        period_high_date: high.date,
        period_low: round4(low.value),
        period_low_date: low.date,
        count: n,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Observation;

    fn obs(y: i32, m: u32, d: u32, value: f64) -> Observation {
        Observation {
            date: NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            value,
        }
    }

    #[test]
    fn nearest_value_prefers_smaller_distance() {
        let series = Series::new(vec![obs(2024, 1, 1, 4.0), obs(2024, 1, 10, 4.5)]);
        let target = NaiveDate::from_ymd_opt(2024, 1, 3).unwrap();
        assert_eq!(nearest_value(&series, target), Some(4.0));
        let target = NaiveDate::from_ymd_opt(2024, 1, 8).unwrap();
        assert_eq!(nearest_value(&series, target), Some(4.5));
    }

    #[test]
    fn nearest_value_ties_break_to_earlier_date() {
        let series = Series::new(vec![obs(2024, 1, 1, 4.0), obs(2024, 1, 3, 4.5)]);
        // 2024-01-02 is one day from both; the earlier observation wins.
        let target = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        assert_eq!(nearest_value(&series, target), Some(4.0));
    }

    #[test]
    fn daily_delta_from_last_two_points() {
        let series = Series::new(vec![obs(2024, 1, 1, 4.0), obs(2024, 1, 2, 4.1)]);
        let stats = compute_summary(&series).unwrap();
        assert_eq!(stats.latest, 4.1);
        assert_eq!(stats.prior, 4.0);
        assert!((stats.daily_delta - 0.1).abs() < 1e-12);
        assert_eq!(stats.count, 2);
    }

    #[test]
    fn single_point_series_degenerates_to_zero_delta() {
        let series = Series::new(vec![obs(2024, 6, 15, 4.25)]);
        let stats = compute_summary(&series).unwrap();
        assert_eq!(stats.daily_delta, 0.0);
        assert_eq!(stats.prior, 4.25);
        // Every nearest-date lookup resolves to the single value.
        assert_eq!(stats.week_delta, Some(0.0));
        assert_eq!(stats.month_delta, Some(0.0));
        assert_eq!(stats.ytd_delta, Some(0.0));
        assert_eq!(stats.period_high, 4.25);
        assert_eq!(stats.period_low, 4.25);
    }

    #[test]
    fn extrema_bound_every_observation() {
        let series = Series::new(vec![
            obs(2024, 1, 1, 4.2),
            obs(2024, 1, 2, 4.9),
            obs(2024, 1, 3, 3.8),
            obs(2024, 1, 4, 4.9),
            obs(2024, 1, 5, 3.8),
        ]);
        let stats = compute_summary(&series).unwrap();
        assert_eq!(stats.period_high, 4.9);
        assert_eq!(stats.period_low, 3.8);
        // First observation achieving each extremum wins.
        assert_eq!(
            stats.period_high_date,
            NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()
        );
        assert_eq!(
            stats.period_low_date,
            NaiveDate::from_ymd_opt(2024, 1, 3).unwrap()
        );
        for o in &series.observations {
            assert!(stats.period_low <= o.value && o.value <= stats.period_high);
        }
    }

    #[test]
    fn empty_series_is_an_error() {
        assert!(compute_summary(&Series::new(vec![])).is_err());
    }
}
