//! Reporting utilities: per-series summaries and formatted terminal output.

pub mod format;

pub use format::*;

use chrono::NaiveDate;

use crate::domain::{AssembledSeries, Observation, YearRange, filter_years};

/// Summary statistics for one series over a year selection.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesSummary {
    pub id: String,
    pub title: String,
    pub axis_label: String,
    pub range: Option<YearRange>,
    pub count: usize,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub latest: Option<f64>,
    pub footnoted: usize,
}

/// Summarize `series`, restricted to `range` when given.
pub fn summarize(series: &AssembledSeries, range: Option<YearRange>) -> SeriesSummary {
    let selected: Vec<Observation> = match range {
        Some(r) => filter_years(series, r),
        None => series.observations.clone(),
    };

    let min = selected.iter().map(|o| o.value).reduce(f64::min);
    let max = selected.iter().map(|o| o.value).reduce(f64::max);

    SeriesSummary {
        id: series.id().to_string(),
        title: series.spec.title.clone(),
        axis_label: series.spec.axis_label.clone(),
        range,
        count: selected.len(),
        first_date: selected.first().map(|o| o.date),
        last_date: selected.last().map(|o| o.date),
        min,
        max,
        latest: selected.last().map(|o| o.value),
        footnoted: selected.iter().filter(|o| o.footnotes.is_some()).count(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{SeriesId, SeriesSpec};

    fn series() -> AssembledSeries {
        let id = SeriesId::new("LNS14000000").unwrap();
        let values = [4.0, 3.8, 3.6, 3.6, 3.6, 3.6, 3.5, 3.7, 3.5];
        let observations = values
            .iter()
            .enumerate()
            .map(|(i, v)| Observation {
                series_id: id.clone(),
                date: NaiveDate::from_ymd_opt(2022, i as u32 + 1, 1).unwrap(),
                value: *v,
                footnotes: (i == 8).then(|| "preliminary".to_string()),
            })
            .collect();
        AssembledSeries {
            spec: SeriesSpec::new("LNS14000000", 1948, "Unemployment Rate", "Rate").unwrap(),
            observations,
        }
    }

    #[test]
    fn summary_covers_whole_series() {
        let s = summarize(&series(), None);
        assert_eq!(s.count, 9);
        assert_eq!(s.first_date, NaiveDate::from_ymd_opt(2022, 1, 1));
        assert_eq!(s.last_date, NaiveDate::from_ymd_opt(2022, 9, 1));
        assert_eq!(s.min, Some(3.5));
        assert_eq!(s.max, Some(4.0));
        assert_eq!(s.latest, Some(3.5));
        assert_eq!(s.footnoted, 1);
    }

    #[test]
    fn summary_of_empty_selection_has_no_values() {
        let s = summarize(&series(), Some(YearRange::new(1990, 1999)));
        assert_eq!(s.count, 0);
        assert_eq!(s.min, None);
        assert_eq!(s.latest, None);
    }
}
