//! Command-line parsing for the BLS series tool.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the acquisition/assembly code.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

use crate::app::pipeline::AssemblyMode;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "bls", version, about = "Fetch and assemble long-span BLS time series")]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug). `RUST_LOG` overrides.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Assemble the configured series and print a summary per series.
    Fetch(FetchArgs),
    /// Print the request windows for a year range (no network access).
    Plan(PlanArgs),
    /// List the configured series.
    Series(SeriesArgs),
}

#[derive(Debug, Args, Clone, Default)]
pub struct FetchArgs {
    /// JSON series configuration (defaults to the built-in set).
    #[arg(long, value_name = "JSON")]
    pub config: Option<PathBuf>,

    /// Only assemble these series ids (repeatable).
    #[arg(short = 's', long = "series", value_name = "ID")]
    pub series: Vec<String>,

    /// How ids are grouped into requests.
    #[arg(long, value_enum, default_value_t = AssemblyMode::PerSeries)]
    pub mode: AssemblyMode,

    /// Upper bound year (defaults to the current calendar year).
    #[arg(long, value_parser = year_parser())]
    pub through: Option<i32>,

    /// First year shown in the summary and exports.
    #[arg(long)]
    pub from: Option<i32>,

    /// Last year shown in the summary and exports.
    #[arg(long)]
    pub to: Option<i32>,

    /// Export observations to CSV.
    #[arg(long = "export-csv", value_name = "CSV")]
    pub export_csv: Option<PathBuf>,

    /// Export observations to JSON.
    #[arg(long = "export-json", value_name = "JSON")]
    pub export_json: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct PlanArgs {
    /// First year of the range.
    #[arg(long, value_parser = year_parser())]
    pub min: i32,

    /// Last year of the range (defaults to the current calendar year).
    #[arg(long, value_parser = year_parser())]
    pub max: Option<i32>,
}

#[derive(Debug, Args, Clone)]
pub struct SeriesArgs {
    /// JSON series configuration (defaults to the built-in set).
    #[arg(long, value_name = "JSON")]
    pub config: Option<PathBuf>,
}

/// Years the upstream service understands (four digits).
fn year_parser() -> clap::builder::RangedI64ValueParser<i32> {
    clap::value_parser!(i32).range(0..=i64::from(crate::data::MAX_YEAR))
}
