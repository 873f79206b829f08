//! Flatten a BLS payload into canonical observations.
//!
//! Each period record becomes one `Observation` dated on the first day of its
//! month. Rows are returned in payload order; sorting is the assembler's job.

use chrono::NaiveDate;

use crate::data::bls::{BlsDataPoint, BlsResponse, Footnote};
use crate::domain::{Observation, SeriesId};
use crate::error::SeriesError;

/// Separator between footnote texts on one observation.
pub const FOOTNOTE_SEPARATOR: &str = ",";

/// Period marker for monthly records (`M01`..`M12`).
const MONTHLY_MARKER: char = 'M';

/// Convert every monthly record of every series in `payload`.
///
/// Annual averages (`M13`) and non-monthly periods (quarterly, semiannual,
/// annual markers) are skipped. A value that is not numeric fails the whole
/// payload.
pub fn normalize(payload: &BlsResponse) -> Result<Vec<Observation>, SeriesError> {
    let mut out = Vec::new();
    for series in &payload.results.series {
        let series_id = SeriesId::new(series.series_id.as_str())
            .map_err(|_| SeriesError::parse("<blank>", "payload contains a series without an id"))?;

        for item in &series.data {
            if let Some(obs) = normalize_point(&series_id, item)? {
                out.push(obs);
            }
        }
    }
    Ok(out)
}

fn normalize_point(series_id: &SeriesId, item: &BlsDataPoint) -> Result<Option<Observation>, SeriesError> {
    let year_text = item.year.as_text();
    let year: i32 = year_text
        .parse()
        .map_err(|_| SeriesError::parse(series_id.as_str(), format!("invalid year '{year_text}'")))?;

    let Some(month) = parse_period(series_id, &item.period, year)? else {
        return Ok(None);
    };

    let date = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| {
        SeriesError::parse(series_id.as_str(), format!("invalid date {year}-{month:02}"))
    })?;

    let value_text = item.value.as_text();
    let value = parse_value(&value_text).ok_or_else(|| {
        SeriesError::parse(
            series_id.as_str(),
            format!("non-numeric value '{value_text}' for {year} {}", item.period),
        )
    })?;

    Ok(Some(Observation {
        series_id: series_id.clone(),
        date,
        value,
        footnotes: join_footnotes(&item.footnotes),
    }))
}

/// Month number for a monthly period code, `None` for periods that are not a
/// calendar month.
fn parse_period(series_id: &SeriesId, period: &str, year: i32) -> Result<Option<u32>, SeriesError> {
    let period = period.trim();
    let mut chars = period.chars();
    let Some(marker) = chars.next() else {
        return Err(SeriesError::parse(series_id.as_str(), format!("empty period code in {year}")));
    };

    if marker != MONTHLY_MARKER {
        tracing::debug!(series = %series_id, year, period, "skipping non-monthly period");
        return Ok(None);
    }

    let digits = chars.as_str();
    if digits.len() != 2 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(SeriesError::parse(
            series_id.as_str(),
            format!("malformed period code '{period}' in {year}"),
        ));
    }

    let month: u32 = digits
        .parse()
        .map_err(|_| SeriesError::parse(series_id.as_str(), format!("malformed period code '{period}'")))?;

    match month {
        1..=12 => Ok(Some(month)),
        13 => {
            tracing::debug!(series = %series_id, year, "skipping annual average (M13)");
            Ok(None)
        }
        _ => Err(SeriesError::parse(
            series_id.as_str(),
            format!("month out of range in period code '{period}' ({year})"),
        )),
    }
}

fn parse_value(raw: &str) -> Option<f64> {
    let v = raw.trim().parse::<f64>().ok()?;
    v.is_finite().then_some(v)
}

/// Join the texts of non-empty footnotes; `None` when there are none.
fn join_footnotes(footnotes: &[Option<Footnote>]) -> Option<String> {
    let texts: Vec<&str> = footnotes
        .iter()
        .flatten()
        .filter_map(|f| f.text.as_deref())
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect();

    (!texts.is_empty()).then(|| texts.join(FOOTNOTE_SEPARATOR))
}
