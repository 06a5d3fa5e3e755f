//! Per-field averages over a window.

use chrono::NaiveDateTime;

use crate::analysis::window::{Window, select_window};
use crate::domain::{AverageResult, Dataset, Field, FieldStats, Measurement, WindowSpec};
use crate::error::PrecondResult;

/// Mean and median of the present values; missing values are only counted.
pub fn field_stats<I>(values: I) -> FieldStats
where
    I: IntoIterator<Item = Measurement>,
{
    let mut valid = Vec::new();
    let mut n_missing = 0usize;
    for v in values {
        match v {
            Some(v) => valid.push(v),
            None => n_missing += 1,
        }
    }

    if valid.is_empty() {
        return FieldStats {
            mean: None,
            median: None,
            n_valid: 0,
            n_missing,
        };
    }

    let n = valid.len();
    let mean = valid.iter().sum::<f64>() / n as f64;

    valid.sort_by(f64::total_cmp);
    let median = if n % 2 == 1 {
        valid[n / 2]
    } else {
        (valid[n / 2 - 1] + valid[n / 2]) / 2.0
    };

    FieldStats {
        mean: Some(mean),
        median: Some(median),
        n_valid: n,
        n_missing,
    }
}

/// Average every field over the window.
pub fn average_window(window: &Window<'_>) -> AverageResult {
    let stats = |field: Field| field_stats(window.records().iter().map(|r| r.value(field)));

    AverageResult {
        b: stats(Field::B),
        clock_angle: stats(Field::Clock),
        pressure: stats(Field::Pressure),
        bx: stats(Field::Bx),
        by: stats(Field::By),
        bz: stats(Field::Bz),
        density: stats(Field::Density),
        speed: stats(Field::Speed),
        dst: stats(Field::Dst),
    }
}

/// Average over the default window (24 hours before onset, onset hour excluded).
pub fn average(dataset: &Dataset, onset: NaiveDateTime) -> PrecondResult<AverageResult> {
    average_with(dataset, onset, &WindowSpec::default())
}

pub fn average_with(dataset: &Dataset, onset: NaiveDateTime, spec: &WindowSpec) -> PrecondResult<AverageResult> {
    let window = select_window(dataset, onset, spec)?;
    Ok(average_window(&window))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Record, WindowConvention};
    use chrono::{Duration, NaiveDate};

    fn t0() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2001, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    /// 48 hourly rows, |B| rising 1.0..=48.0, no pressure at all.
    fn linear_dataset() -> Dataset {
        let records = (0..48)
            .map(|h| Record {
                time: t0() + Duration::hours(h),
                b: Some(h as f64 + 1.0),
                bx: Some(1.0),
                by: Some(1.0),
                bz: Some(1.0),
                density: Some(5.0),
                speed: Some(400.0),
                pressure: None,
                dst: Some(-10.0),
            })
            .collect();
        Dataset::from_records(records).unwrap()
    }

    #[test]
    fn linear_magnitude_mean_preceding() {
        let ds = linear_dataset();
        let onset = t0() + Duration::hours(24);
        let result = average(&ds, onset).unwrap();
        assert_eq!(result.b.mean, Some(12.5));
        assert_eq!(result.b.median, Some(12.5));
        assert_eq!(result.b.n_valid, 24);
    }

    #[test]
    fn linear_magnitude_mean_closed() {
        let ds = linear_dataset();
        let onset = t0() + Duration::hours(24);
        let spec = WindowSpec {
            span_hours: 24,
            convention: WindowConvention::Closed,
        };
        let result = average_with(&ds, onset, &spec).unwrap();
        assert_eq!(result.b.mean, Some(13.0));
        assert_eq!(result.b.n_valid, 25);
    }

    #[test]
    fn all_missing_field_is_no_data() {
        let ds = linear_dataset();
        let result = average(&ds, t0() + Duration::hours(30)).unwrap();
        assert_eq!(result.pressure.mean, None);
        assert_eq!(result.pressure.median, None);
        assert_eq!(result.pressure.n_missing, 24);
        assert!(!result.pressure.has_data());
        // Other fields are unaffected.
        assert!(result.b.has_data());
        assert!((result.clock_angle.mean.unwrap() - 45.0).abs() < 1e-9);
    }

    #[test]
    fn missing_values_are_skipped_not_zeroed() {
        let stats = field_stats([Some(2.0), None, Some(4.0), None]);
        assert_eq!(stats.mean, Some(3.0));
        assert_eq!(stats.n_valid, 2);
        assert_eq!(stats.n_missing, 2);
    }

    #[test]
    fn median_odd_and_even() {
        assert_eq!(field_stats([Some(3.0), Some(1.0), Some(2.0)]).median, Some(2.0));
        assert_eq!(field_stats([Some(4.0), Some(1.0), Some(3.0), Some(2.0)]).median, Some(2.5));
    }

    #[test]
    fn repeated_calls_are_identical() {
        let ds = linear_dataset();
        let onset = t0() + Duration::hours(36);
        let a = average(&ds, onset).unwrap();
        let b = average(&ds, onset).unwrap();
        assert_eq!(a, b);
    }
}
