//! Tabular feed parsing and normalization.
//!
//! This module turns the loosely-structured statistical CSV feed (preamble
//! rows, ragged column counts, several date encodings) into a clean `Series`.
//!
//! Design goals:
//! - **Two-phase scan**: locate the header indices first, then filter-map the
//!   remaining rows through a fallible per-row extractor
//! - **Row-level validation** (skip bad rows, but report what happened)
//! - **Deterministic behavior** (fixed date-format priority, stable tie-breaks)
//! - **Separation of concerns**: no statistics or reconciliation logic here

use chrono::NaiveDate;
use csv::StringRecord;

use crate::domain::{FeedSpec, Observation, Series, round4};
use crate::error::AppError;

/// Date encodings seen in the feed, tried in priority order.
///
/// First successful parse wins; e.g. "01 Jan 2024", "01 January 2024",
/// "01/01/2024", "2024-01-01".
const DATE_FORMATS: [&str; 4] = ["%d %b %Y", "%d %B %Y", "%d/%m/%Y", "%Y-%m-%d"];

/// A row-level error encountered during parsing.
#[derive(Debug, Clone)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Parse output: the normalized series plus row-level accounting.
#[derive(Debug, Clone)]
pub struct ParsedFeed {
    pub series: Series,
    pub rows_read: usize,
    pub rows_used: usize,
    pub row_errors: Vec<RowError>,
}

/// Column indices located on the header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct HeaderIndices {
    date_idx: usize,
    value_idx: usize,
}

/// Parse the raw feed text into an ordered series.
///
/// A feed yielding zero valid observations is fatal; malformed individual
/// rows are dropped and reported, never fatal.
pub fn parse_feed(text: &str, spec: &FeedSpec) -> Result<ParsedFeed, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let mut records = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        // Tokenization failures are dropped like any other bad row.
        if let Ok(record) = result {
            records.push((idx + 1, record));
        }
    }

    let (header_line, header) = locate_header(&records, spec).ok_or_else(|| {
        AppError::new(
            4,
            format!(
                "Feed contains no header row with a '{}' column and series '{}'.",
                spec.date_marker, spec.series_code
            ),
        )
    })?;

    let mut observations = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (line, record) in records.iter().filter(|(line, _)| *line > header_line) {
        if is_blank(record) {
            continue;
        }
        rows_read += 1;
        match extract_observation(record, header) {
            Ok(Some(obs)) => observations.push(obs),
            Ok(None) => {} // empty date or value cell
            Err(message) => row_errors.push(RowError {
                line: *line,
                message,
            }),
        }
    }

    // The feed is expected pre-sorted, but never assume so.
    observations.sort_by_key(|o| o.date);
    observations.dedup_by_key(|o| o.date);

    if observations.is_empty() {
        return Err(AppError::new(
            4,
            "Feed produced zero valid observations; no statistics possible.",
        ));
    }

    let rows_used = observations.len();
    Ok(ParsedFeed {
        series: Series::new(observations),
        rows_read,
        rows_used,
        row_errors,
    })
}

/// Phase 1: locate the header row and its column indices.
///
/// A row is the header iff one cell equals the date marker (case-insensitive)
/// AND some cell contains the series code. A date-marker row without a value
/// column is not the header; keep scanning for a later candidate.
fn locate_header(
    records: &[(usize, StringRecord)],
    spec: &FeedSpec,
) -> Option<(usize, HeaderIndices)> {
    let date_marker = spec.date_marker.to_uppercase();
    let series_code = spec.series_code.to_uppercase();

    for (line, record) in records {
        if is_blank(record) {
            continue;
        }
        let cells: Vec<String> = record.iter().map(|c| c.trim().to_uppercase()).collect();
        let Some(date_idx) = cells.iter().position(|c| *c == date_marker) else {
            continue;
        };
        if let Some(value_idx) = cells.iter().position(|c| c.contains(&series_code)) {
            return Some((
                *line,
                HeaderIndices {
                    date_idx,
                    value_idx,
                },
            ));
        }
    }
    None
}

/// Phase 2: extract one observation from a data row.
///
/// Returns `Ok(None)` for rows with an empty date or value cell (routine in
/// this feed), `Err` with a message for rows that fail to parse.
fn extract_observation(
    record: &StringRecord,
    header: HeaderIndices,
) -> Result<Option<Observation>, String> {
    let date_cell = record.get(header.date_idx).unwrap_or("").trim();
    let value_cell = record.get(header.value_idx).unwrap_or("").trim();
    if date_cell.is_empty() || value_cell.is_empty() {
        return Ok(None);
    }

    let date = parse_feed_date(date_cell)
        .ok_or_else(|| format!("Unparsable date '{date_cell}'"))?;
    let value: f64 = value_cell
        .parse()
        .map_err(|_| format!("Unparsable value '{value_cell}'"))?;

    Ok(Some(Observation {
        date,
        value: round4(value),
    }))
}

/// Try each known date encoding in priority order; first success wins.
pub fn parse_feed_date(text: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
}

fn is_blank(record: &StringRecord) -> bool {
    record.iter().all(|cell| cell.trim().is_empty())
}
