//! Upstream data acquisition.
//!
//! - window planning for the 19-year request limit (`planner`)
//! - BLS API client and wire types (`bls`)
//! - payload normalization into observations (`normalize`)

pub mod bls;
pub mod normalize;
pub mod planner;

pub use bls::{BlsClient, BlsResponse, MAX_SERIES_PER_REQUEST, SeriesSource};
pub use normalize::normalize;
pub use planner::{MAX_SPAN_YEARS, MAX_YEAR, plan, plan_windows, windows};
