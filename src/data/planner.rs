//! Partition a long year range into request-sized windows.
//!
//! The BLS API accepts at most 19 years per request. `plan` returns the
//! boundary years; consecutive boundaries form one window each, and adjacent
//! windows share their boundary year so no year is lost. The assembler removes
//! the resulting duplicate observations.

use crate::domain::Window;
use crate::error::SeriesError;

/// Largest `end_year - start_year` the upstream service accepts in one call.
pub const MAX_SPAN_YEARS: i32 = 19;

/// Latest year accepted by `plan`; the service takes four-digit years.
pub const MAX_YEAR: i32 = 9999;

/// Boundary years covering `[min_year, max_year]`, at most 19 years apart.
///
/// The list is built by walking back from `max_year` in steps of 19 and
/// clamping the last step to `min_year`, so only the first window may be
/// shorter than the maximum span.
///
/// `min_year == max_year` yields the single boundary `[min_year]`, which
/// describes no fetchable window. Years outside `0..=MAX_YEAR` are rejected.
pub fn plan(min_year: i32, max_year: i32) -> Result<Vec<i32>, SeriesError> {
    if min_year > max_year || min_year < 0 || max_year > MAX_YEAR {
        return Err(SeriesError::InvalidRange { min_year, max_year });
    }
    if min_year == max_year {
        return Ok(vec![min_year]);
    }

    let (min, max, step) = (i64::from(min_year), i64::from(max_year), i64::from(MAX_SPAN_YEARS));
    let steps = (max - min + step - 1) / step;

    let mut boundaries = Vec::new();
    for k in 0..=steps {
        let year = (max - step * k).max(min);
        // Clamped into [min_year, max_year], so it fits.
        boundaries.push(i32::try_from(year).map_err(|_| SeriesError::InvalidRange { min_year, max_year })?);
    }
    boundaries.reverse();
    Ok(boundaries)
}

/// Pair consecutive boundaries into fetch windows.
///
/// Degenerate pairs (equal boundaries) are skipped; a single boundary yields
/// nothing to fetch.
pub fn windows(boundaries: &[i32]) -> Vec<Window> {
    boundaries
        .windows(2)
        .filter(|pair| pair[0] < pair[1])
        .map(|pair| Window {
            start_year: pair[0],
            end_year: pair[1],
        })
        .collect()
}

/// Convenience: `plan` followed by `windows`.
pub fn plan_windows(min_year: i32, max_year: i32) -> Result<Vec<Window>, SeriesError> {
    Ok(windows(&plan(min_year, max_year)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unemployment_range_from_1948() {
        assert_eq!(plan(1948, 2022).unwrap(), vec![1948, 1965, 1984, 2003, 2022]);
    }

    #[test]
    fn cpi_range_from_1913() {
        assert_eq!(
            plan(1913, 2022).unwrap(),
            vec![1913, 1927, 1946, 1965, 1984, 2003, 2022]
        );
    }

    #[test]
    fn century_span_clamps_first_boundary() {
        assert_eq!(
            plan(1948, 2048).unwrap(),
            vec![1948, 1953, 1972, 1991, 2010, 2029, 2048]
        );
    }

    #[test]
    fn twenty_year_difference_needs_two_windows() {
        assert_eq!(plan(2002, 2022).unwrap(), vec![2002, 2003, 2022]);
    }

    #[test]
    fn nineteen_year_difference_is_one_window() {
        assert_eq!(plan(2003, 2022).unwrap(), vec![2003, 2022]);
    }

    #[test]
    fn equal_years_give_a_single_boundary() {
        assert_eq!(plan(2022, 2022).unwrap(), vec![2022]);
        assert!(windows(&[2022]).is_empty());
    }

    #[test]
    fn reversed_range_is_rejected() {
        assert_eq!(
            plan(2023, 2022),
            Err(SeriesError::InvalidRange {
                min_year: 2023,
                max_year: 2022
            })
        );
    }

    #[test]
    fn extreme_years_are_rejected_without_overflow() {
        for (min, max) in [(0, i32::MAX), (i32::MIN, 0), (i32::MIN, i32::MAX), (-1, 2022), (2022, 10_000)] {
            assert_eq!(
                plan(min, max),
                Err(SeriesError::InvalidRange {
                    min_year: min,
                    max_year: max
                }),
                "{min}..{max}"
            );
        }
    }

    #[test]
    fn full_supported_range_keeps_endpoints() {
        let b = plan(0, MAX_YEAR).unwrap();
        assert_eq!(b[0], 0);
        assert_eq!(*b.last().unwrap(), MAX_YEAR);
        assert!(b.windows(2).all(|p| p[1] - p[0] <= MAX_SPAN_YEARS));
    }

    #[test]
    fn windows_pair_boundaries_and_share_edges() {
        let w = plan_windows(2002, 2022).unwrap();
        assert_eq!(
            w,
            vec![
                Window { start_year: 2002, end_year: 2003 },
                Window { start_year: 2003, end_year: 2022 },
            ]
        );
    }

    #[test]
    fn degenerate_pairs_are_skipped() {
        let w = windows(&[1990, 1990, 2000]);
        assert_eq!(w, vec![Window { start_year: 1990, end_year: 2000 }]);
    }
}
