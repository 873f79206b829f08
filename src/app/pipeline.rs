//! Series assembly: the shared workflow behind every front end.
//!
//! plan windows -> fetch each window -> normalize -> merge (dedup + sort)
//!
//! Windows are fetched one at a time in ascending order. Any failure aborts
//! the whole assembly.

use std::collections::{BTreeMap, HashMap};

use chrono::{Datelike, Local, NaiveDate};
use clap::ValueEnum;

use crate::data::{BlsClient, MAX_SERIES_PER_REQUEST, SeriesSource, normalize, plan_windows};
use crate::domain::{AssembledSeries, Observation, SeriesConfig, SeriesId, SeriesSpec, Window};
use crate::error::SeriesError;

/// How identifiers are grouped into requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum AssemblyMode {
    /// One request per (series, window), each series planned from its own earliest year.
    #[default]
    PerSeries,
    /// Up to 50 series per request, planned from the batch's earliest year.
    Batched,
}

/// Counters for one assembly run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AssemblyStats {
    pub requests: usize,
    pub rows_fetched: usize,
    pub duplicates_dropped: usize,
}

/// Owned result of one assembly: one series per configured id, in configuration order.
#[derive(Debug, Clone, PartialEq)]
pub struct Assembly {
    series: Vec<AssembledSeries>,
    pub stats: AssemblyStats,
}

impl Assembly {
    pub fn series(&self) -> &[AssembledSeries] {
        &self.series
    }

    pub fn get(&self, id: &SeriesId) -> Option<&AssembledSeries> {
        self.series.iter().find(|s| s.id() == id)
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    pub fn into_series(self) -> Vec<AssembledSeries> {
        self.series
    }
}

pub struct SeriesAssembler<S> {
    source: S,
    mode: AssemblyMode,
}

impl<S: SeriesSource> SeriesAssembler<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            mode: AssemblyMode::default(),
        }
    }

    pub fn with_mode(mut self, mode: AssemblyMode) -> Self {
        self.mode = mode;
        self
    }

    /// Assemble every configured series up to the current calendar year.
    pub fn assemble_default(&self, config: &SeriesConfig) -> Result<Assembly, SeriesError> {
        self.assemble(config, current_year())
    }

    /// Assemble every configured series from its earliest year through `current_year`.
    pub fn assemble(&self, config: &SeriesConfig, current_year: i32) -> Result<Assembly, SeriesError> {
        let mut rows = Vec::new();
        let mut requests = 0usize;

        match self.mode {
            AssemblyMode::PerSeries => {
                for spec in config.series() {
                    let windows = plan_windows(spec.earliest_year, current_year)?;
                    requests += self.fetch_windows(std::slice::from_ref(&spec.id), &windows, &mut rows)?;
                }
            }
            AssemblyMode::Batched => {
                for batch in config.series().chunks(MAX_SERIES_PER_REQUEST) {
                    let earliest = batch
                        .iter()
                        .map(|s| s.earliest_year)
                        .min()
                        .unwrap_or(current_year);
                    let ids: Vec<SeriesId> = batch.iter().map(|s| s.id.clone()).collect();
                    let windows = plan_windows(earliest, current_year)?;
                    requests += self.fetch_windows(&ids, &windows, &mut rows)?;
                }
            }
        }

        let rows_fetched = rows.len();
        let (series, duplicates_dropped) = merge_observations(config, rows)?;

        tracing::info!(
            series = series.len(),
            requests,
            rows_fetched,
            duplicates_dropped,
            "assembly complete"
        );

        Ok(Assembly {
            series,
            stats: AssemblyStats {
                requests,
                rows_fetched,
                duplicates_dropped,
            },
        })
    }

    fn fetch_windows(
        &self,
        ids: &[SeriesId],
        windows: &[Window],
        rows: &mut Vec<Observation>,
    ) -> Result<usize, SeriesError> {
        for window in windows {
            tracing::info!(series = ids.len(), %window, "fetching window");
            let payload = self.source.fetch(ids, window.start_year, window.end_year)?;
            let normalized = normalize(&payload)?;
            tracing::debug!(%window, rows = normalized.len(), "window normalized");
            rows.extend(normalized);
        }
        Ok(windows.len())
    }
}

/// Partition rows by series, keep the first observation per date, and sort by date.
///
/// Rows for series that are not configured are dropped. Returns the assembled
/// series in configuration order and the number of duplicate rows removed.
pub fn merge_observations(
    config: &SeriesConfig,
    rows: Vec<Observation>,
) -> Result<(Vec<AssembledSeries>, usize), SeriesError> {
    let mut partitions: HashMap<&SeriesId, BTreeMap<NaiveDate, Observation>> = config
        .series()
        .iter()
        .map(|s| (&s.id, BTreeMap::new()))
        .collect();

    let mut duplicates = 0usize;
    for obs in rows {
        let Some(partition) = partitions.get_mut(&obs.series_id) else {
            tracing::debug!(series = %obs.series_id, "dropping row for unconfigured series");
            continue;
        };
        if partition.contains_key(&obs.date) {
            duplicates += 1;
            continue;
        }
        partition.insert(obs.date, obs);
    }

    let mut out = Vec::with_capacity(config.series().len());
    for spec in config.series() {
        let observations: Vec<Observation> = partitions
            .remove(&spec.id)
            .map(|p| p.into_values().collect())
            .unwrap_or_default();
        if observations.is_empty() {
            return Err(SeriesError::EmptyRange {
                series: spec.id.to_string(),
            });
        }
        out.push(assembled(spec, observations));
    }

    Ok((out, duplicates))
}

fn assembled(spec: &SeriesSpec, observations: Vec<Observation>) -> AssembledSeries {
    AssembledSeries {
        spec: spec.clone(),
        observations,
    }
}

/// Build a client from the environment and assemble `config` through `through`.
pub fn run_assembly(config: &SeriesConfig, mode: AssemblyMode, through: i32) -> Result<Assembly, SeriesError> {
    let client = BlsClient::from_env()?;
    tracing::debug!(?client, ?mode, through, "starting assembly");
    SeriesAssembler::new(client).with_mode(mode).assemble(config, through)
}

/// The calendar year of the local clock (upper bound for every plan).
pub fn current_year() -> i32 {
    Local::now().year()
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::data::BlsResponse;
    use crate::data::bls::{BlsDataPoint, BlsResults, BlsSeries, NumberOrText};

    /// Serves a full monthly history for every requested id and records each call.
    struct FakeSource {
        calls: RefCell<Vec<(Vec<String>, i32, i32)>>,
        first_year: i32,
    }

    impl FakeSource {
        fn new(first_year: i32) -> Self {
            Self {
                calls: RefCell::new(Vec::new()),
                first_year,
            }
        }
    }

    fn value_for(id: &str, year: i32, month: u32) -> f64 {
        id.len() as f64 * 1000.0 + f64::from(year - 1900) + f64::from(month) / 100.0
    }

    impl SeriesSource for FakeSource {
        fn fetch(&self, ids: &[SeriesId], start_year: i32, end_year: i32) -> Result<BlsResponse, SeriesError> {
            self.calls.borrow_mut().push((
                ids.iter().map(|i| i.to_string()).collect(),
                start_year,
                end_year,
            ));
            let series = ids
                .iter()
                .map(|id| BlsSeries {
                    series_id: id.to_string(),
                    // Newest first, like the real service.
                    data: (start_year.max(self.first_year)..=end_year)
                        .rev()
                        .flat_map(|y| (1..=12u32).rev().map(move |m| (y, m)))
                        .map(|(y, m)| BlsDataPoint {
                            year: NumberOrText::Text(y.to_string()),
                            period: format!("M{m:02}"),
                            period_name: None,
                            latest: None,
                            value: NumberOrText::Text(value_for(id.as_str(), y, m).to_string()),
                            footnotes: vec![],
                        })
                        .collect(),
                })
                .collect();
            Ok(BlsResponse {
                status: "REQUEST_SUCCEEDED".to_string(),
                response_time: None,
                message: vec![],
                results: BlsResults { series },
            })
        }
    }

    struct FailingSource;

    impl SeriesSource for FailingSource {
        fn fetch(&self, _: &[SeriesId], _: i32, _: i32) -> Result<BlsResponse, SeriesError> {
            Err(SeriesError::Fetch {
                status: Some(500),
                message: "Internal Server Error".to_string(),
            })
        }
    }

    fn config(specs: &[(&str, i32)]) -> SeriesConfig {
        SeriesConfig::new(
            specs
                .iter()
                .map(|(id, year)| SeriesSpec::new(id, *year, format!("{id} title"), "Value").unwrap())
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn overlapping_windows_collapse_to_one_observation_per_month() {
        let source = FakeSource::new(1900);
        let cfg = config(&[("LNS14000000", 2002)]);
        let assembly = SeriesAssembler::new(&source).assemble(&cfg, 2022).unwrap();

        // Windows 2002-2003 and 2003-2022 both return 2003.
        let calls = source.calls.borrow();
        assert_eq!(calls.len(), 2);
        assert_eq!((calls[0].1, calls[0].2), (2002, 2003));
        assert_eq!((calls[1].1, calls[1].2), (2003, 2022));

        let series = &assembly.series()[0];
        assert_eq!(series.len(), 21 * 12);
        assert_eq!(assembly.stats.duplicates_dropped, 12);
        assert_eq!(assembly.stats.requests, 2);

        let dates: Vec<NaiveDate> = series.observations.iter().map(|o| o.date).collect();
        assert!(dates.windows(2).all(|w| w[0] < w[1]), "dates must strictly increase");
        assert_eq!(dates[0], NaiveDate::from_ymd_opt(2002, 1, 1).unwrap());
        assert_eq!(*dates.last().unwrap(), NaiveDate::from_ymd_opt(2022, 12, 1).unwrap());
    }

    #[test]
    fn default_upper_bound_is_the_current_year() {
        let source = FakeSource::new(1900);
        let this_year = current_year();
        let cfg = config(&[("EIUIR", this_year - 1)]);
        let assembly = SeriesAssembler::new(&source).assemble_default(&cfg).unwrap();

        let calls = source.calls.borrow();
        assert_eq!(calls.len(), 1);
        assert_eq!((calls[0].1, calls[0].2), (this_year - 1, this_year));
        assert_eq!(assembly.series()[0].len(), 24);
    }

    #[test]
    fn assembling_twice_is_identical() {
        let source = FakeSource::new(1900);
        let cfg = config(&[("LNS14000000", 1948), ("EIUIR", 1983)]);
        let assembler = SeriesAssembler::new(&source);
        let a = assembler.assemble(&cfg, 2022).unwrap();
        let b = assembler.assemble(&cfg, 2022).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn per_series_mode_plans_each_series_separately() {
        let source = FakeSource::new(1900);
        let cfg = config(&[("LNS14000000", 1948), ("EIUIR", 1983)]);
        let assembly = SeriesAssembler::new(&source).assemble(&cfg, 2022).unwrap();

        // 1948..2022 -> 4 windows, 1983..2022 -> 3 windows.
        assert_eq!(source.calls.borrow().len(), 7);
        assert!(source.calls.borrow().iter().all(|(ids, _, _)| ids.len() == 1));

        let ids: Vec<&str> = assembly.series().iter().map(|s| s.id().as_str()).collect();
        assert_eq!(ids, vec!["LNS14000000", "EIUIR"]);
        assert_eq!(
            assembly.get(&SeriesId::new("EIUIR").unwrap()).unwrap().first().unwrap().date,
            NaiveDate::from_ymd_opt(1983, 1, 1).unwrap()
        );
    }

    #[test]
    fn batched_mode_shares_requests_across_series() {
        let source = FakeSource::new(1983);
        let cfg = config(&[("LNS14000000", 1990), ("EIUIR", 1983)]);
        let assembly = SeriesAssembler::new(&source)
            .with_mode(AssemblyMode::Batched)
            .assemble(&cfg, 2022)
            .unwrap();

        let calls = source.calls.borrow();
        assert_eq!(calls.len(), 3);
        assert!(calls.iter().all(|(ids, _, _)| ids.len() == 2));
        assert_eq!(calls[0].1, 1983);
        assert_eq!(assembly.len(), 2);
    }

    #[test]
    fn batched_mode_splits_at_fifty_series() {
        let source = FakeSource::new(2020);
        let specs: Vec<(String, i32)> = (0..120).map(|i| (format!("SER{i:03}"), 2010)).collect();
        let specs_ref: Vec<(&str, i32)> = specs.iter().map(|(s, y)| (s.as_str(), *y)).collect();
        let cfg = config(&specs_ref);

        SeriesAssembler::new(&source)
            .with_mode(AssemblyMode::Batched)
            .assemble(&cfg, 2022)
            .unwrap();

        let sizes: Vec<usize> = source.calls.borrow().iter().map(|(ids, _, _)| ids.len()).collect();
        assert_eq!(sizes, vec![50, 50, 20]);
    }

    #[test]
    fn series_without_data_is_an_empty_range_error() {
        // Upstream data starts after every requested window.
        let source = FakeSource::new(2030);
        let cfg = config(&[("EIUIQ", 2000)]);
        let err = SeriesAssembler::new(&source).assemble(&cfg, 2022).unwrap_err();
        assert_eq!(
            err,
            SeriesError::EmptyRange {
                series: "EIUIQ".to_string()
            }
        );
    }

    #[test]
    fn earliest_year_after_current_year_is_invalid_range() {
        let source = FakeSource::new(1900);
        let cfg = config(&[("EIUIQ", 2030)]);
        let err = SeriesAssembler::new(&source).assemble(&cfg, 2022).unwrap_err();
        assert!(matches!(err, SeriesError::InvalidRange { .. }));
        assert!(source.calls.borrow().is_empty());
    }

    #[test]
    fn fetch_failure_aborts_assembly() {
        let cfg = config(&[("EIUIQ", 2000)]);
        let err = SeriesAssembler::new(FailingSource).assemble(&cfg, 2022).unwrap_err();
        assert!(matches!(err, SeriesError::Fetch { status: Some(500), .. }));
    }

    #[test]
    fn merge_ignores_unconfigured_series_and_keeps_first_duplicate() {
        let cfg = config(&[("EIUIR", 2000)]);
        let d = NaiveDate::from_ymd_opt(2022, 1, 1).unwrap();
        let row = |id: &str, v: f64| Observation {
            series_id: SeriesId::new(id).unwrap(),
            date: d,
            value: v,
            footnotes: None,
        };
        let (series, dupes) =
            merge_observations(&cfg, vec![row("EIUIR", 1.0), row("OTHER", 9.0), row("EIUIR", 1.0)]).unwrap();
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].observations, vec![row("EIUIR", 1.0)]);
        assert_eq!(dupes, 1);
    }
}
