//! `bls-series` library crate.
//!
//! Fetches long-span BLS time series in request-sized windows and assembles
//! them into deduplicated, date-sorted series. The binary (`bls`) is a thin
//! wrapper around this library so that:
//!
//! - core logic is testable without spawning processes
//! - a presentation layer can call `SeriesAssembler` and the `domain::query`
//!   functions directly

pub mod app;
pub mod cli;
pub mod config;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod logging;
pub mod report;

pub use app::pipeline::{Assembly, AssemblyMode, AssemblyStats, SeriesAssembler};
pub use error::{AppError, SeriesError};
