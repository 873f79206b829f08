//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - series configuration records (`SeriesId`, `SeriesSpec`, `SeriesConfig`)
//! - normalized observations and assembled series (`Observation`, `AssembledSeries`)
//! - request windows and year selections (`Window`, `YearRange`)
//! - range queries for front ends (`query`)

pub mod query;
pub mod types;

pub use query::*;
pub use types::*;
