//! Read-only queries over an assembled series.
//!
//! A front end binds these to its own controls: `year_bounds` sizes a range
//! selector and `filter_years` produces the series for the selected range.

use crate::domain::{AssembledSeries, Observation, YearRange};

/// Smallest and largest year present in the series.
pub fn year_bounds(series: &AssembledSeries) -> Option<(i32, i32)> {
    // Observations are date-sorted.
    let first = series.first()?.year();
    let last = series.last()?.year();
    Some((first, last))
}

impl YearRange {
    /// The range covering every observation of `series` (the initial selection).
    pub fn full(series: &AssembledSeries) -> Option<Self> {
        year_bounds(series).map(|(start, end)| Self::new(start, end))
    }
}

/// Observations whose year falls inside `range` (inclusive), in date order.
///
/// A reversed range selects nothing.
pub fn filter_years(series: &AssembledSeries, range: YearRange) -> Vec<Observation> {
    series
        .observations
        .iter()
        .filter(|o| range.contains(o.year()))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::domain::{SeriesId, SeriesSpec};

    fn sample() -> AssembledSeries {
        let spec = SeriesSpec::new("LNS14000000", 1948, "Unemployment Rate", "Rate").unwrap();
        let observations = [(2019, 12, 3.6), (2020, 4, 14.8), (2021, 6, 5.9), (2022, 9, 3.5)]
            .into_iter()
            .map(|(y, m, v)| Observation {
                series_id: SeriesId::new("LNS14000000").unwrap(),
                date: NaiveDate::from_ymd_opt(y, m, 1).unwrap(),
                value: v,
                footnotes: None,
            })
            .collect();
        AssembledSeries { spec, observations }
    }

    #[test]
    fn bounds_cover_first_and_last_year() {
        let series = sample();
        assert_eq!(year_bounds(&series), Some((2019, 2022)));
        assert_eq!(YearRange::full(&series), Some(YearRange::new(2019, 2022)));
    }

    #[test]
    fn bounds_of_empty_series_are_none() {
        let mut series = sample();
        series.observations.clear();
        assert_eq!(year_bounds(&series), None);
    }

    #[test]
    fn filter_is_inclusive_on_both_ends() {
        let series = sample();
        let picked = filter_years(&series, YearRange::new(2020, 2021));
        let years: Vec<i32> = picked.iter().map(|o| o.year()).collect();
        assert_eq!(years, vec![2020, 2021]);
        assert_eq!(picked[0].value, 14.8);
    }

    #[test]
    fn full_range_returns_everything_and_reversed_returns_nothing() {
        let series = sample();
        let full = YearRange::full(&series).unwrap();
        assert_eq!(filter_years(&series, full), series.observations);
        assert!(filter_years(&series, YearRange::new(2022, 2019)).is_empty());
    }
}
