//! Export assembled series to CSV or JSON.
//!
//! The exports are meant to be easy to consume in spreadsheets or downstream scripts.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::{AssembledSeries, YearRange, filter_years};
use crate::error::{AppError, EXIT_CONFIG};

/// Write every observation as `series_id,date,value,footnotes`.
pub fn write_series_csv(path: &Path, series: &[AssembledSeries], range: Option<YearRange>) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(EXIT_CONFIG, format!("Failed to create export CSV '{}': {e}", path.display())))?;
    write_csv(file, series, range)
        .map_err(|e| AppError::new(EXIT_CONFIG, format!("Failed to write export CSV '{}': {e}", path.display())))
}

fn write_csv<W: Write>(out: W, series: &[AssembledSeries], range: Option<YearRange>) -> Result<(), csv::Error> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(["series_id", "date", "value", "footnotes"])?;
    for s in series {
        for o in selected(s, range) {
            let (date, value) = (o.date.to_string(), o.value.to_string());
            writer.write_record([
                s.id().as_str(),
                date.as_str(),
                value.as_str(),
                o.footnotes.as_deref().unwrap_or(""),
            ])?;
        }
    }
    writer.flush()?;
    Ok(())
}

fn selected(series: &AssembledSeries, range: Option<YearRange>) -> Vec<crate::domain::Observation> {
    match range {
        Some(r) => filter_years(series, r),
        None => series.observations.clone(),
    }
}

#[derive(Debug, Serialize)]
struct SeriesExport<'a> {
    id: &'a str,
    title: &'a str,
    axis_label: &'a str,
    observations: Vec<PointExport>,
}

#[derive(Debug, Serialize)]
struct PointExport {
    date: NaiveDate,
    value: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    footnotes: Option<String>,
}

/// Write the series (with their display metadata) as a pretty-printed JSON array.
pub fn write_series_json(path: &Path, series: &[AssembledSeries], range: Option<YearRange>) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(EXIT_CONFIG, format!("Failed to create export JSON '{}': {e}", path.display())))?;

    serde_json::to_writer_pretty(file, &json_view(series, range))
        .map_err(|e| AppError::new(EXIT_CONFIG, format!("Failed to write export JSON: {e}")))?;

    Ok(())
}

fn json_view(series: &[AssembledSeries], range: Option<YearRange>) -> Vec<SeriesExport<'_>> {
    series
        .iter()
        .map(|s| SeriesExport {
            id: s.id().as_str(),
            title: &s.spec.title,
            axis_label: &s.spec.axis_label,
            observations: selected(s, range)
                .into_iter()
                .map(|o| PointExport {
                    date: o.date,
                    value: o.value,
                    footnotes: o.footnotes,
                })
                .collect(),
        })
        .collect()
}
