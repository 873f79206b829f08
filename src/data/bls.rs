//! BLS Public Data API integration.
//!
//! One call to [`SeriesSource::fetch`] is one POST to the timeseries endpoint.
//! The service caps each request at 19 years and 50 series; callers are
//! expected to stay inside those limits (see `data::planner`), and requests
//! that do not are rejected before any network I/O.

use std::fmt;

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use crate::data::planner::MAX_SPAN_YEARS;
use crate::domain::SeriesId;
use crate::error::SeriesError;

pub const DEFAULT_BASE_URL: &str = "https://api.bls.gov/publicAPI/v2/timeseries/data/";

/// Most series identifiers the service accepts in one request.
pub const MAX_SERIES_PER_REQUEST: usize = 50;

const STATUS_SUCCEEDED: &str = "REQUEST_SUCCEEDED";

/// Something that can return the raw payload for a set of series and an
/// inclusive year range.
///
/// `BlsClient` is the production implementation; tests substitute canned
/// payloads.
pub trait SeriesSource {
    fn fetch(&self, ids: &[SeriesId], start_year: i32, end_year: i32) -> Result<BlsResponse, SeriesError>;
}

impl<T: SeriesSource + ?Sized> SeriesSource for &T {
    fn fetch(&self, ids: &[SeriesId], start_year: i32, end_year: i32) -> Result<BlsResponse, SeriesError> {
        (**self).fetch(ids, start_year, end_year)
    }
}

pub struct BlsClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl fmt::Debug for BlsClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlsClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl BlsClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Build a client from `BLS_API_KEY` (and optional `BLS_API_URL`), reading `.env` first.
    pub fn from_env() -> Result<Self, SeriesError> {
        dotenvy::dotenv().ok();
        let api_key = std::env::var("BLS_API_KEY")
            .map_err(|_| SeriesError::Config("Missing BLS_API_KEY in environment (.env).".to_string()))?;
        if api_key.trim().is_empty() {
            return Err(SeriesError::Config("BLS_API_KEY is empty.".to_string()));
        }
        let mut client = Self::new(api_key.trim());
        if let Ok(url) = std::env::var("BLS_API_URL") {
            if !url.trim().is_empty() {
                client = client.with_base_url(url.trim());
            }
        }
        Ok(client)
    }

    /// Point the client at a different endpoint (mirrors, test servers).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl SeriesSource for BlsClient {
    fn fetch(&self, ids: &[SeriesId], start_year: i32, end_year: i32) -> Result<BlsResponse, SeriesError> {
        check_request(ids, start_year, end_year)?;

        let body = RequestBody {
            registrationkey: &self.api_key,
            seriesid: ids.iter().map(SeriesId::as_str).collect(),
            startyear: start_year.to_string(),
            endyear: end_year.to_string(),
            calculations: false,
        };

        tracing::debug!(series = ids.len(), start_year, end_year, "posting BLS request");

        let resp = self
            .client
            .post(&self.base_url)
            .json(&body)
            .send()
            .map_err(|e| SeriesError::fetch(format!("transport error: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            let detail = resp.text().unwrap_or_default();
            let reason = status.canonical_reason().unwrap_or("unexpected status");
            let message = if detail.trim().is_empty() {
                reason.to_string()
            } else {
                format!("{reason}: {}", detail.trim())
            };
            return Err(SeriesError::Fetch {
                status: Some(status.as_u16()),
                message,
            });
        }

        let payload: BlsResponse = resp
            .json()
            .map_err(|e| SeriesError::fetch(format!("failed to decode BLS response: {e}")))?;

        if payload.status != STATUS_SUCCEEDED {
            return Err(SeriesError::fetch(format!(
                "BLS reported {}: {}",
                payload.status,
                payload.message.join("; ")
            )));
        }

        for note in &payload.message {
            tracing::info!(start_year, end_year, "BLS message: {note}");
        }

        Ok(payload)
    }
}

fn check_request(ids: &[SeriesId], start_year: i32, end_year: i32) -> Result<(), SeriesError> {
    if ids.is_empty() {
        return Err(SeriesError::InvalidRequest("no series requested".to_string()));
    }
    if ids.len() > MAX_SERIES_PER_REQUEST {
        return Err(SeriesError::InvalidRequest(format!(
            "{} series requested, the limit is {MAX_SERIES_PER_REQUEST}",
            ids.len()
        )));
    }
    if start_year > end_year {
        return Err(SeriesError::InvalidRequest(format!(
            "start year {start_year} is after end year {end_year}"
        )));
    }
    if end_year - start_year > MAX_SPAN_YEARS {
        return Err(SeriesError::InvalidRequest(format!(
            "{start_year}-{end_year} spans more than {MAX_SPAN_YEARS} years"
        )));
    }
    Ok(())
}

#[derive(Debug, Serialize)]
struct RequestBody<'a> {
    registrationkey: &'a str,
    seriesid: Vec<&'a str>,
    startyear: String,
    endyear: String,
    calculations: bool,
}

/// Top-level response envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlsResponse {
    #[serde(default)]
    pub status: String,
    #[serde(rename = "responseTime", default, skip_serializing_if = "Option::is_none")]
    pub response_time: Option<u64>,
    #[serde(default)]
    pub message: Vec<String>,
    #[serde(rename = "Results", default)]
    pub results: BlsResults,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BlsResults {
    #[serde(default)]
    pub series: Vec<BlsSeries>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlsSeries {
    #[serde(rename = "seriesID")]
    pub series_id: String,
    #[serde(default)]
    pub data: Vec<BlsDataPoint>,
}

/// One period record as returned by the service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlsDataPoint {
    pub year: NumberOrText,
    /// Type marker followed by the month digits, e.g. `M09`.
    pub period: String,
    #[serde(rename = "periodName", default, skip_serializing_if = "Option::is_none")]
    pub period_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latest: Option<String>,
    pub value: NumberOrText,
    #[serde(default)]
    pub footnotes: Vec<Option<Footnote>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Footnote {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// Fields the service sends sometimes as strings, sometimes as numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumberOrText {
    Number(serde_json::Number),
    Text(String),
}

impl NumberOrText {
    pub fn as_text(&self) -> String {
        match self {
            NumberOrText::Number(n) => n.to_string(),
            NumberOrText::Text(s) => s.trim().to_string(),
        }
    }
}

impl fmt::Display for NumberOrText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_text())
    }
}
