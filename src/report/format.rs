//! Terminal formatting.
//!
//! Formatting lives in one place so output changes stay localized.

use crate::app::pipeline::AssemblyStats;
use crate::domain::{SeriesConfig, Window};
use crate::report::SeriesSummary;

/// Header line plus one block per series.
pub fn format_fetch_report(summaries: &[SeriesSummary], stats: &AssemblyStats, current_year: i32) -> String {
    let mut out = String::new();

    out.push_str("=== bls - BLS time series ===\n");
    out.push_str(&format!(
        "Through: {current_year}  Requests: {}  Rows: {}  Duplicates dropped: {}\n",
        stats.requests, stats.rows_fetched, stats.duplicates_dropped
    ));

    for s in summaries {
        out.push('\n');
        out.push_str(&format_summary(s));
    }

    out
}

/// One series block.
pub fn format_summary(s: &SeriesSummary) -> String {
    let mut out = String::new();
    out.push_str(&format!("{} Over Time [{}]\n", s.title, s.id));
    out.push_str(&format!("  Axis: {}\n", s.axis_label));
    if let Some(r) = s.range {
        out.push_str(&format!("  Years: {}..={}\n", r.start, r.end));
    }
    out.push_str(&format!("  Observations: {}", s.count));
    if s.footnoted > 0 {
        out.push_str(&format!(" ({} footnoted)", s.footnoted));
    }
    out.push('\n');

    match (s.first_date, s.last_date) {
        (Some(first), Some(last)) => {
            out.push_str(&format!("  Dates: {first} .. {last}\n"));
        }
        _ => out.push_str("  Dates: -\n"),
    }
    out.push_str(&format!(
        "  Min: {}  Max: {}  Latest: {}\n",
        fmt_opt(s.min),
        fmt_opt(s.max),
        fmt_opt(s.latest)
    ));
    out
}

/// Boundaries and windows for `bls plan`.
pub fn format_plan(boundaries: &[i32], windows: &[Window]) -> String {
    let mut out = String::new();
    let joined: Vec<String> = boundaries.iter().map(|b| b.to_string()).collect();
    out.push_str(&format!("Boundaries: [{}]\n", joined.join(", ")));
    if windows.is_empty() {
        out.push_str("Windows: none (nothing to fetch)\n");
        return out;
    }
    out.push_str(&format!("Windows: {}\n", windows.len()));
    for w in windows {
        out.push_str(&format!("  {}  ({} years)\n", w, w.span() + 1));
    }
    out
}

/// Table of configured series for `bls series`.
pub fn format_series_list(config: &SeriesConfig) -> String {
    let id_width = config
        .series()
        .iter()
        .map(|s| s.id.as_str().len())
        .max()
        .unwrap_or(2)
        .max(2);

    let mut out = String::new();
    out.push_str(&format!("{:<id_width$}  {:>5}  {}\n", "id", "from", "title"));
    for s in config.series() {
        out.push_str(&format!(
            "{:<id_width$}  {:>5}  {}\n",
            s.id.as_str(),
            s.earliest_year,
            s.title
        ));
    }
    out
}

fn fmt_opt(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{v:.3}"),
        _ => "-".to_string(),
    }
}
