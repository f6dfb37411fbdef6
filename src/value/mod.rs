//! Parametric property valuation model.
//!
//! Capitalization arithmetic: an income flow divided by a yield gives an
//! implied capital value (`V = R / (Y/100)`). On top of that:
//!
//! - a scenario table over a symmetric set of gilt yield deltas, damped by a
//!   pass-through ratio
//! - a historical implied-value series projected from the (possibly
//!   spread-adjusted) yield series, smoothed with a trailing moving average
//!
//! Percentage arithmetic stays in the series' native percentage units except
//! where explicitly converting via `/100`. Monetary outputs are not rounded
//! here; formatting is a presentation concern.

use crate::domain::{ScenarioRow, Series, ValuationInputs, YieldBasis};
use crate::error::AppError;
use crate::math::sma_with_gaps;

/// Resolved, validated valuation parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Valuation {
    pub rent: f64,
    /// Property yield, decimal percent (direct or derived from guide price).
    pub property_yield: f64,
    pub pass_through: f64,
    /// Base implied capital value at the current yield.
    pub base_value: f64,
}

/// Validate inputs and compute the base implied value.
///
/// Zero or negative rent/yield/price is rejected outright; propagating them
/// would mean division by zero or a nonsensical negative capital value.
pub fn resolve_inputs(inputs: &ValuationInputs) -> Result<Valuation, AppError> {
    if !(inputs.rent.is_finite() && inputs.rent > 0.0) {
        return Err(AppError::new(2, "Annual rent must be > 0."));
    }
    if !(0.0..=1.0).contains(&inputs.pass_through) {
        return Err(AppError::new(2, "Pass-through ratio must be in [0, 1]."));
    }

    let property_yield = match inputs.basis {
        YieldBasis::Direct(y) => {
            if !(y.is_finite() && y > 0.0) {
                return Err(AppError::new(2, "Property yield must be > 0."));
            }
            y
        }
        YieldBasis::GuidePrice(p) => {
            if !(p.is_finite() && p > 0.0) {
                return Err(AppError::new(2, "Guide price must be > 0."));
            }
            100.0 * inputs.rent / p
        }
    };

    Ok(Valuation {
        rent: inputs.rent,
        property_yield,
        pass_through: inputs.pass_through,
        base_value: implied_value(inputs.rent, property_yield),
    })
}

/// Capitalize an income flow at a yield (both > 0).
pub fn implied_value(rent: f64, yield_pct: f64) -> f64 {
    rent / (yield_pct / 100.0)
}

/// Build the scenario table over the given gilt delta set (bps).
///
/// Scenarios whose shifted property yield is <= 0 are omitted; a negative
/// capitalization rate is not a valid projection. The zero-delta row is the
/// reference row and reports no delta.
pub fn scenario_table(valuation: &Valuation, deltas_bps: &[i64]) -> Vec<ScenarioRow> {
    let mut rows = Vec::with_capacity(deltas_bps.len());
    for &delta_bps in deltas_bps {
        let effective_bps = delta_bps as f64 * valuation.pass_through;
        let new_yield = valuation.property_yield + effective_bps / 100.0;
        if new_yield <= 0.0 {
            continue;
        }
        let new_value = implied_value(valuation.rent, new_yield);
        let (value_delta, value_delta_pct) = if delta_bps == 0 {
            (None, None)
        } else {
            let delta = new_value - valuation.base_value;
            (Some(delta), Some(100.0 * delta / valuation.base_value))
        };
        rows.push(ScenarioRow {
            delta_bps,
            new_yield,
            new_value,
            value_delta,
            value_delta_pct,
        });
    }
    rows
}

/// Historical implied-value projection over the yield series.
///
/// For each observation, the gilt delta vs. the current headline yield is
/// passed through into the property yield; points where the adjusted yield
/// is <= 0 become gaps.
pub fn project_value_series(
    valuation: &Valuation,
    series: &Series,
    headline_yield: f64,
) -> Vec<Option<f64>> {
    series
        .observations
        .iter()
        .map(|obs| {
            let gilt_delta = obs.value - headline_yield;
            let adjusted_yield = valuation.property_yield + gilt_delta * valuation.pass_through;
            if adjusted_yield <= 0.0 {
                None
            } else {
                Some(implied_value(valuation.rent, adjusted_yield))
            }
        })
        .collect()
}

/// Trailing moving average of a projected value series (partial-window
/// variant, since projections can contain gaps).
pub fn smooth_value_series(values: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    sma_with_gaps(values, window)
}
