//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during assembly
//! - exported to JSON/CSV
//! - handed to a presentation layer unchanged

use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::SeriesError;

/// Opaque key naming one observed indicator (e.g. `LNS14000000`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SeriesId(String);

impl SeriesId {
    /// Build an identifier, rejecting blank keys.
    pub fn new(raw: impl Into<String>) -> Result<Self, SeriesError> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(SeriesError::Config("series id must not be empty".to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for SeriesId {
    type Error = SeriesError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::new(raw)
    }
}

impl From<SeriesId> for String {
    fn from(id: SeriesId) -> Self {
        id.0
    }
}

impl fmt::Display for SeriesId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SeriesId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Configuration record for one series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesSpec {
    pub id: SeriesId,
    /// First year the upstream service has data for.
    pub earliest_year: i32,
    /// Chart/report title.
    pub title: String,
    /// Y-axis label.
    pub axis_label: String,
}

impl SeriesSpec {
    pub fn new(
        id: &str,
        earliest_year: i32,
        title: impl Into<String>,
        axis_label: impl Into<String>,
    ) -> Result<Self, SeriesError> {
        let spec = Self {
            id: SeriesId::new(id)?,
            earliest_year,
            title: title.into(),
            axis_label: axis_label.into(),
        };
        spec.validate()?;
        Ok(spec)
    }

    /// Check the field-level invariants (non-negative year, non-empty labels).
    pub fn validate(&self) -> Result<(), SeriesError> {
        if self.id.as_str().trim().is_empty() {
            return Err(SeriesError::Config("series id must not be empty".to_string()));
        }
        if self.earliest_year < 0 {
            return Err(SeriesError::Config(format!(
                "series {}: earliest_year must be non-negative (got {})",
                self.id, self.earliest_year
            )));
        }
        if self.title.trim().is_empty() {
            return Err(SeriesError::Config(format!("series {}: title must not be empty", self.id)));
        }
        if self.axis_label.trim().is_empty() {
            return Err(SeriesError::Config(format!(
                "series {}: axis_label must not be empty",
                self.id
            )));
        }
        Ok(())
    }
}

/// The full set of series to assemble, in display order.
///
/// Construct through [`SeriesConfig::new`] so every record is validated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeriesConfig {
    series: Vec<SeriesSpec>,
}

impl SeriesConfig {
    pub fn new(series: Vec<SeriesSpec>) -> Result<Self, SeriesError> {
        if series.is_empty() {
            return Err(SeriesError::Config("at least one series must be configured".to_string()));
        }
        let mut seen = std::collections::HashSet::new();
        for spec in &series {
            spec.validate()?;
            if !seen.insert(spec.id.clone()) {
                return Err(SeriesError::Config(format!("series {} is configured twice", spec.id)));
            }
        }
        Ok(Self { series })
    }

    pub fn series(&self) -> &[SeriesSpec] {
        &self.series
    }

    pub fn get(&self, id: &SeriesId) -> Option<&SeriesSpec> {
        self.series.iter().find(|s| &s.id == id)
    }

    /// Keep only the listed ids (in configuration order).
    pub fn restrict_to(&self, ids: &[SeriesId]) -> Result<Self, SeriesError> {
        for id in ids {
            if self.get(id).is_none() {
                return Err(SeriesError::Config(format!("series {id} is not configured")));
            }
        }
        let series = self
            .series
            .iter()
            .filter(|s| ids.contains(&s.id))
            .cloned()
            .collect();
        Self::new(series)
    }
}

/// One data point: a monthly value for one series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub series_id: SeriesId,
    /// First day of the observed month.
    pub date: NaiveDate,
    pub value: f64,
    /// Footnote texts joined with `,`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footnotes: Option<String>,
}

impl Observation {
    pub fn year(&self) -> i32 {
        self.date.year()
    }
}

/// One request-sized inclusive year span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Window {
    pub start_year: i32,
    pub end_year: i32,
}

impl Window {
    pub fn span(&self) -> i32 {
        self.end_year - self.start_year
    }
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start_year, self.end_year)
    }
}

/// Deduplicated, date-sorted observations for one series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssembledSeries {
    pub spec: SeriesSpec,
    pub observations: Vec<Observation>,
}

impl AssembledSeries {
    pub fn id(&self) -> &SeriesId {
        &self.spec.id
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn first(&self) -> Option<&Observation> {
        self.observations.first()
    }

    pub fn last(&self) -> Option<&Observation> {
        self.observations.last()
    }
}

/// Inclusive year selection (the presentation layer's range slider value).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearRange {
    pub start: i32,
    pub end: i32,
}

impl YearRange {
    pub fn new(start: i32, end: i32) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, year: i32) -> bool {
        self.start <= year && year <= self.end
    }
}
