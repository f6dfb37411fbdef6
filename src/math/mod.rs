//! Mathematical utilities: trailing moving averages.

pub mod smooth;

pub use smooth::*;
