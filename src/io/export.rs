//! Snapshot JSON export.
//!
//! A single overwritten snapshot of the latest reconciled run, meant for
//! downstream scripts and quick inspection. It is derived output only and is
//! never read back as a source of truth.

use std::fs::File;
use std::path::Path;

use chrono::Local;
use serde::Serialize;

use crate::app::pipeline::RunOutput;
use crate::domain::{HeadlineSource, Observation, SummaryStats};
use crate::error::AppError;

#[derive(Debug, Serialize)]
struct Snapshot<'a> {
    last_updated: String,
    series: &'a str,
    headline: f64,
    headline_source: HeadlineSource,
    spread: Option<f64>,
    spread_applied: bool,
    stats: &'a SummaryStats,
    data: &'a [Observation],
}

/// Write the snapshot JSON, overwriting any previous one.
pub fn write_snapshot_json(path: &Path, output: &RunOutput, series_code: &str) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| {
        AppError::new(
            2,
            format!("Failed to create snapshot '{}': {e}", path.display()),
        )
    })?;

    let snapshot = Snapshot {
        last_updated: Local::now().to_rfc3339(),
        series: series_code,
        headline: output.view.headline_value,
        headline_source: output.view.headline_source,
        spread: output.view.spread,
        spread_applied: output.view.spread_applied,
        stats: &output.stats,
        data: &output.view.adjusted.observations,
    };

    serde_json::to_writer_pretty(file, &snapshot)
        .map_err(|e| AppError::new(2, format!("Failed to write snapshot JSON: {e}")))?;

    Ok(())
}
