//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - loads the series configuration
//! - assembles series from the BLS API
//! - prints summaries
//! - writes optional exports

use clap::Parser;

use crate::app::pipeline::{current_year, run_assembly};
use crate::cli::{Command, FetchArgs, PlanArgs, SeriesArgs};
use crate::config::resolve_config;
use crate::domain::{SeriesConfig, SeriesId, YearRange};
use crate::error::{AppError, EXIT_CONFIG};

pub mod pipeline;

/// Entry point for the `bls` binary.
pub fn run() -> Result<(), AppError> {
    // `bls` and `bls -s EIUIR` behave like `bls fetch ...`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    crate::logging::init_logging(cli.verbose);

    match cli.command {
        Command::Fetch(args) => handle_fetch(args),
        Command::Plan(args) => handle_plan(args),
        Command::Series(args) => handle_series(args),
    }
}

fn handle_fetch(args: FetchArgs) -> Result<(), AppError> {
    let config = selected_config(&args)?;
    let through = args.through.unwrap_or_else(current_year);
    let range = year_range_from_args(args.from, args.to, through)?;

    let assembly = run_assembly(&config, args.mode, through)?;

    let summaries: Vec<_> = assembly
        .series()
        .iter()
        .map(|s| crate::report::summarize(s, range))
        .collect();
    println!(
        "{}",
        crate::report::format_fetch_report(&summaries, &assembly.stats, through)
    );

    if let Some(path) = &args.export_csv {
        crate::io::export::write_series_csv(path, assembly.series(), range)?;
        tracing::info!(path = %path.display(), "wrote CSV export");
    }
    if let Some(path) = &args.export_json {
        crate::io::export::write_series_json(path, assembly.series(), range)?;
        tracing::info!(path = %path.display(), "wrote JSON export");
    }

    Ok(())
}

fn handle_plan(args: PlanArgs) -> Result<(), AppError> {
    let max = args.max.unwrap_or_else(current_year);
    let boundaries = crate::data::plan(args.min, max)?;
    let windows = crate::data::windows(&boundaries);
    print!("{}", crate::report::format_plan(&boundaries, &windows));
    Ok(())
}

fn handle_series(args: SeriesArgs) -> Result<(), AppError> {
    let config = resolve_config(args.config.as_deref())?;
    print!("{}", crate::report::format_series_list(&config));
    Ok(())
}

fn selected_config(args: &FetchArgs) -> Result<SeriesConfig, AppError> {
    let config = resolve_config(args.config.as_deref())?;
    if args.series.is_empty() {
        return Ok(config);
    }
    let ids = args
        .series
        .iter()
        .map(|raw| SeriesId::new(raw.as_str()))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(config.restrict_to(&ids)?)
}

/// Resolve `--from/--to` into a selection; `None` when neither is given.
pub fn year_range_from_args(from: Option<i32>, to: Option<i32>, through: i32) -> Result<Option<YearRange>, AppError> {
    if from.is_none() && to.is_none() {
        return Ok(None);
    }
    let start = from.unwrap_or(0);
    let end = to.unwrap_or(through);
    if start > end {
        return Err(AppError::new(EXIT_CONFIG, format!("--from {start} is after --to {end}.")));
    }
    Ok(Some(YearRange::new(start, end)))
}

/// Rewrite argv so `bls` defaults to `bls fetch`.
///
/// Rules:
/// - `bls`                      -> `bls fetch`
/// - `bls -s EIUIR ...`         -> `bls fetch -s EIUIR ...`
/// - `bls --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("fetch".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "fetch" | "plan" | "series");
    if is_subcommand {
        return argv;
    }

    // Global verbosity flags may precede the subcommand.
    if arg1.starts_with("-v") || arg1 == "--verbose" {
        let rest_has_subcommand = argv[2..]
            .iter()
            .any(|a| matches!(a.as_str(), "fetch" | "plan" | "series"));
        if !rest_has_subcommand {
            argv.insert(argv.len().min(2), "fetch".to_string());
        }
        return argv;
    }

    // If the first token is a flag, treat it as "fetch flags".
    if arg1.starts_with('-') {
        argv.insert(1, "fetch".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}
