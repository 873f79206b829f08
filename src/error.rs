//! Error types.
//!
//! - `SeriesError`: typed failures of the acquisition/assembly engine
//! - `AppError`: what the binary reports (message + process exit code)

use thiserror::Error;

/// Exit code for usage and configuration problems.
pub const EXIT_CONFIG: u8 = 2;
/// Exit code for data problems (fetch, parse, empty series).
pub const EXIT_DATA: u8 = 4;

/// Failures raised while planning, fetching, normalizing, or assembling series.
///
/// None of these are recovered from: they propagate up and end the run.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SeriesError {
    /// `min_year` was greater than `max_year`, or a year was out of range.
    #[error("invalid year range {min_year}..={max_year}: min_year must be <= max_year and both within 0..=9999")]
    InvalidRange { min_year: i32, max_year: i32 },

    /// The upstream call failed or reported a non-success status.
    #[error("{}", fetch_message(.status, .message))]
    Fetch { status: Option<u16>, message: String },

    /// A payload field could not be interpreted.
    #[error("failed to parse data for series {series}: {detail}")]
    Parse { series: String, detail: String },

    /// Assembly produced no observations for a series.
    #[error("no observations assembled for series {series}")]
    EmptyRange { series: String },

    /// A request that violates the upstream protocol limits.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Invalid or unreadable configuration.
    #[error("configuration error: {0}")]
    Config(String),
}

fn fetch_message(status: &Option<u16>, message: &str) -> String {
    match status {
        Some(code) => format!("BLS request failed with status {code}: {message}"),
        None => format!("BLS request failed: {message}"),
    }
}

impl SeriesError {
    pub fn fetch(message: impl Into<String>) -> Self {
        SeriesError::Fetch {
            status: None,
            message: message.into(),
        }
    }

    pub fn parse(series: impl Into<String>, detail: impl Into<String>) -> Self {
        SeriesError::Parse {
            series: series.into(),
            detail: detail.into(),
        }
    }

    /// Process exit code used when this error ends the run.
    pub fn exit_code(&self) -> u8 {
        match self {
            SeriesError::Config(_) | SeriesError::InvalidRequest(_) => EXIT_CONFIG,
            SeriesError::InvalidRange { .. }
            | SeriesError::Fetch { .. }
            | SeriesError::Parse { .. }
            | SeriesError::EmptyRange { .. } => EXIT_DATA,
        }
    }
}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl From<SeriesError> for AppError {
    fn from(err: SeriesError) -> Self {
        AppError::new(err.exit_code(), err.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}
