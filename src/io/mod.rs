//! Input/output helpers.
//!
//! - assembled series exports (CSV/JSON) (`export`)

pub mod export;

pub use export::*;
