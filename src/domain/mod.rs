//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - parsed time-series types (`Observation`, `Series`)
//! - the live benchmark quote (`LiveQuote`)
//! - derived outputs (`SummaryStats`, `ReconciledView`, `ScenarioRow`)
//! - run configuration (`TrackerConfig` and friends)

pub mod types;

pub use types::*;
