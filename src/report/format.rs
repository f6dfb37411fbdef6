//! Terminal report formatting.

use chrono::NaiveDate;

use crate::app::pipeline::RunOutput;
use crate::domain::{HeadlineSource, ReconciledView, ScenarioRow, TrackerConfig};
use crate::math::sma;
use crate::value::Valuation;

/// Format the full run summary (headline, spread, deltas, range, trend).
pub fn format_run_summary(output: &RunOutput, config: &TrackerConfig) -> String {
    let mut out = String::new();
    let view = &output.view;
    let stats = &output.stats;

    out.push_str("=== gilt - UK 30-Year Gilt Yield Tracker ===\n");

    let source = match view.headline_source {
        HeadlineSource::Live => "live benchmark",
        HeadlineSource::Historical => "series latest",
    };
    let as_of = output
        .live
        .as_ref()
        .and_then(|l| l.as_of)
        .map(|ts| format!(", as at {}", ts.format("%d %b %Y %H:%M")))
        .unwrap_or_default();
    out.push_str(&format!(
        "Headline yield: {:.2}% ({source}{as_of})\n",
        view.headline_value
    ));
    out.push_str(&format!(
        "Series yield:   {:.2}% ({}, {})\n",
        stats.latest,
        config.feed.series_code,
        fmt_date(stats.latest_date)
    ));

    match view.spread {
        Some(spread) => out.push_str(&format!(
            "Spread:         {spread:+.2}% (benchmark vs zero coupon, {})\n",
            if view.spread_applied {
                "applied to chart series"
            } else {
                "rejected - outside band"
            }
        )),
        None => out.push_str("Spread:         n/a (series-only mode)\n"),
    }

    // Prefer the quote's own daily change when present; the series lags the
    // live market by a couple of business days.
    let daily = output
        .live
        .as_ref()
        .and_then(|l| l.change)
        .unwrap_or(stats.daily_delta);
    out.push_str(&format!("Daily change:   {}\n", fmt_change(Some(daily))));
    out.push_str(&format!(
        "Weekly change:  {}\n",
        fmt_change(stats.week_delta)
    ));
    out.push_str(&format!(
        "Monthly change: {}\n",
        fmt_change(stats.month_delta)
    ));
    out.push_str(&format!("YTD change:     {}\n", fmt_change(stats.ytd_delta)));

    // 52-week range: prefer the quote's own figures when present.
    let (high, high_date, low, low_date) = match output.live.as_ref() {
        Some(live) if live.period_high.is_some() && live.period_low.is_some() => (
            live.period_high.unwrap_or(stats.period_high),
            live.period_high_date,
            live.period_low.unwrap_or(stats.period_low),
            live.period_low_date,
        ),
        _ => (
            stats.period_high,
            Some(stats.period_high_date),
            stats.period_low,
            Some(stats.period_low_date),
        ),
    };
    out.push_str(&format!(
        "52-week high:   {high:.2}%{}\n",
        high_date
            .map(|d| format!("  ({})", fmt_date(d)))
            .unwrap_or_default()
    ));
    out.push_str(&format!(
        "52-week low:    {low:.2}%{}\n",
        low_date
            .map(|d| format!("  ({})", fmt_date(d)))
            .unwrap_or_default()
    ));

    let borrowing = view.headline_value + config.lending_margin_bps as f64 / 100.0;
    out.push_str(&format!(
        "Borrowing cost: {borrowing:.2}% (gilt + {}bps lending margin)\n",
        config.lending_margin_bps
    ));

    out.push_str(&format!(
        "Observations:   n={}{}\n",
        stats.count,
        if output.rows_dropped > 0 {
            format!(" ({} malformed row(s) dropped)", output.rows_dropped)
        } else {
            String::new()
        }
    ));

    if let Some(trend) = format_yield_trend(view, config.sma_window) {
        out.push_str(&trend);
        out.push('\n');
    }

    out
}

/// One-line trend summary against the trailing moving average of the
/// (possibly spread-adjusted) series.
fn format_yield_trend(view: &ReconciledView, window: usize) -> Option<String> {
    let values = view.adjusted.values();
    let smoothed = sma(&values, window);
    let last_ma = (*smoothed.last()?)?;
    let last = *values.last()?;
    let diff_bps = ((last - last_ma) * 100.0).abs().round() as i64;
    let direction = if last < last_ma { "falling" } else { "rising" };
    let relation = if last < last_ma { "below" } else { "above" };
    Some(format!(
        "{window}-day trend:   yields {direction} - {diff_bps}bps {relation} the {window}-day moving average"
    ))
}

/// Format the valuation scenario table.
pub fn format_scenarios(valuation: &Valuation, rows: &[ScenarioRow], gilt_yield: f64) -> String {
    let mut out = String::new();

    out.push_str("=== Property Valuation Scenarios ===\n");
    out.push_str(&format!(
        "Rent: {} | Property yield: {:.2}% | Gilt: {:.2}% | Pass-through: {:.0}%\n",
        fmt_gbp_full(valuation.rent),
        valuation.property_yield,
        gilt_yield,
        valuation.pass_through * 100.0
    ));
    out.push_str(&format!(
        "Current implied value: {}\n\n",
        fmt_gbp(valuation.base_value)
    ));

    out.push_str(&format!(
        "{:<10} {:>10} {:>14} {:>24}\n",
        "gilt move", "yield", "value", "change"
    ));
    out.push_str(&format!("{:-<10} {:->10} {:->14} {:->24}\n", "", "", "", ""));

    for row in rows {
        let label = if row.delta_bps == 0 {
            "current".to_string()
        } else {
            format!("{:+}bps", row.delta_bps)
        };
        let change = match (row.value_delta, row.value_delta_pct) {
            (Some(delta), Some(pct)) => {
                format!("{} ({pct:+.1}%)", fmt_gbp_signed(delta))
            }
            _ => "-".to_string(),
        };
        let yield_cell = format!("{:.2}%", row.new_yield);
        out.push_str(&format!(
            "{label:<10} {yield_cell:>10} {:>14} {change:>24}\n",
            fmt_gbp(row.new_value)
        ));
    }

    out
}

/// Trend summary for the projected implied-value series.
pub fn format_value_trend(
    projected: &[Option<f64>],
    smoothed: &[Option<f64>],
    window: usize,
) -> String {
    let last = projected.last().copied().flatten();
    let last_ma = smoothed.last().copied().flatten();
    match (last, last_ma) {
        (Some(value), Some(ma)) => {
            let relation = if value >= ma { "above" } else { "below" };
            format!(
                "Implied value {} vs {} {window}-day average ({relation} trend)",
                fmt_gbp(value),
                fmt_gbp(ma)
            )
        }
        _ => "Implied value trend: insufficient history for the moving average".to_string(),
    }
}

/// `+0.10%`, `-0.25%`, or `N/A` for an absent delta.
pub fn fmt_change(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:+.2}%"),
        None => "N/A".to_string(),
    }
}

/// Compact GBP: millions as `£4.55m`, otherwise thousands-grouped.
pub fn fmt_gbp(value: f64) -> String {
    if value.abs() >= 1e6 {
        format!("\u{a3}{:.2}m", value / 1e6)
    } else {
        fmt_gbp_full(value)
    }
}

/// Full GBP with thousands separators, no pence.
pub fn fmt_gbp_full(value: f64) -> String {
    let negative = value < 0.0;
    let rounded = value.abs().round() as u64;
    let digits = rounded.to_string();
    let mut grouped = String::new();
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{}\u{a3}{grouped}", if negative { "-" } else { "" })
}

fn fmt_gbp_signed(value: f64) -> String {
    if value >= 0.0 {
        format!("+{}", fmt_gbp_full(value))
    } else {
        fmt_gbp_full(value)
    }
}

fn fmt_date(date: NaiveDate) -> String {
    date.format("%d %b %Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ValuationInputs, YieldBasis};

    #[test]
    fn change_formatting_signs_and_na() {
        assert_eq!(fmt_change(Some(0.1)), "+0.10%");
        assert_eq!(fmt_change(Some(-0.25)), "-0.25%");
        assert_eq!(fmt_change(Some(0.0)), "+0.00%");
        assert_eq!(fmt_change(None), "N/A");
    }

    #[test]
    fn gbp_formatting() {
        assert_eq!(fmt_gbp(4_545_454.55), "\u{a3}4.55m");
        assert_eq!(fmt_gbp(250_000.0), "\u{a3}250,000");
        assert_eq!(fmt_gbp_full(1_234_567.4), "\u{a3}1,234,567");
        assert_eq!(fmt_gbp_full(999.0), "\u{a3}999");
        assert_eq!(fmt_gbp_full(-197_628.46), "-\u{a3}197,628");
    }

    #[test]
    fn scenario_table_includes_reference_row() {
        let valuation = crate::value::resolve_inputs(&ValuationInputs {
            rent: 250_000.0,
            basis: YieldBasis::Direct(5.5),
            pass_through: 0.5,
        })
        .unwrap();
        let rows = crate::value::scenario_table(&valuation, &[-25, 0, 25]);
        let table = format_scenarios(&valuation, &rows, 4.6);
        assert!(table.contains("current"));
        assert!(table.contains("+25bps"));
        assert!(table.contains("-25bps"));
        assert!(table.contains("\u{a3}4.55m"));
    }

    #[test]
    fn value_trend_reports_insufficient_history() {
        let projected = vec![Some(1.0)];
        let smoothed = vec![None];
        let line = format_value_trend(&projected, &smoothed, 30);
        assert!(line.contains("insufficient history"));
    }
}
