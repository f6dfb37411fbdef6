//! Data sources.
//!
//! - Bank of England statistical CSV feed (`boe`)
//! - CNBC live benchmark quote (`cnbc`)
//! - deterministic synthetic data for offline runs (`sample`)

pub mod boe;
pub mod cnbc;
pub mod sample;

pub use boe::*;
pub use cnbc::*;
pub use sample::*;
