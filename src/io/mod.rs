//! Input/output helpers.
//!
//! - tabular feed parsing + validation (`feed`)
//! - snapshot JSON export (`export`)

pub mod export;
pub mod feed;

pub use export::*;
pub use feed::*;
