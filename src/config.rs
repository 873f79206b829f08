//! Series configuration.
//!
//! The built-in set is the four indicators charted by default. A JSON file can
//! replace it:
//!
//! ```json
//! { "series": [
//!     { "id": "LNS14000000", "earliest_year": 1948,
//!       "title": "Unemployment Rate (Seasonally Adjusted)",
//!       "axis_label": "Unemployment Rate" }
//! ] }
//! ```
//!
//! Every record is validated at load time (see `SeriesSpec::validate`).

use std::fs::File;
use std::path::Path;

use serde::Deserialize;

use crate::domain::{SeriesConfig, SeriesSpec};
use crate::error::SeriesError;

const DEFAULT_SERIES: [(&str, i32, &str, &str); 4] = [
    (
        "LNS14000000",
        1948,
        "Unemployment Rate (Seasonally Adjusted)",
        "Unemployment Rate",
    ),
    (
        "CUUR0000AA0",
        1913,
        "CPI for All Urban Consumers (CPI-U) 1967=100 (Unadjusted)",
        "CPI for All Urban Consumers (CPI-U)",
    ),
    ("EIUIR", 1983, "Imports for All Commodities", "Imports (All Commodities)"),
    ("EIUIQ", 1983, "Exports for All Commodities", "Exports (All Commodities)"),
];

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    series: Vec<SeriesSpec>,
}

/// The built-in series set.
pub fn default_config() -> Result<SeriesConfig, SeriesError> {
    let series = DEFAULT_SERIES
        .iter()
        .map(|&(id, year, title, label)| SeriesSpec::new(id, year, title, label))
        .collect::<Result<Vec<_>, _>>()?;
    SeriesConfig::new(series)
}

/// Parse and validate a configuration from JSON text.
pub fn parse_config(json: &str) -> Result<SeriesConfig, SeriesError> {
    let file: ConfigFile =
        serde_json::from_str(json).map_err(|e| SeriesError::Config(format!("invalid config JSON: {e}")))?;
    SeriesConfig::new(file.series)
}

/// Load and validate a configuration file.
pub fn load_config(path: &Path) -> Result<SeriesConfig, SeriesError> {
    let file = File::open(path)
        .map_err(|e| SeriesError::Config(format!("Failed to open config '{}': {e}", path.display())))?;
    let parsed: ConfigFile = serde_json::from_reader(file)
        .map_err(|e| SeriesError::Config(format!("Invalid config '{}': {e}", path.display())))?;
    SeriesConfig::new(parsed.series)
}

/// Load `path` when given, otherwise the built-in set.
pub fn resolve_config(path: Option<&Path>) -> Result<SeriesConfig, SeriesError> {
    match path {
        Some(p) => load_config(p),
        None => default_config(),
    }
}
