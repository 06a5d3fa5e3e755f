//! Pre-onset window selection.
//!
//! With the default `Preceding` convention and a 24 hour span, the window is
//! the half-open interval `[onset - 24h, onset)`: the hour exactly one day
//! before onset is included and the onset hour itself is not. `Closed`
//! additionally includes the onset hour.
//!
//! A window is only returned when it is complete. Gaps inside it, or an onset
//! too close to either end of the dataset, are range errors rather than a
//! silently shorter average.

use chrono::NaiveDateTime;
use tracing::debug;

use crate::domain::types::is_whole_hour;
use crate::domain::{Dataset, Record, WindowConvention, WindowSpec};
use crate::error::{PrecondError, PrecondResult};

/// A contiguous run of records preceding an onset.
#[derive(Debug, Clone, Copy)]
pub struct Window<'a> {
    onset: NaiveDateTime,
    spec: WindowSpec,
    records: &'a [Record],
}

impl<'a> Window<'a> {
    pub fn onset(&self) -> NaiveDateTime {
        self.onset
    }

    pub fn spec(&self) -> WindowSpec {
        self.spec
    }

    pub fn records(&self) -> &'a [Record] {
        self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Time of the first record in the window.
    pub fn start(&self) -> NaiveDateTime {
        self.records[0].time
    }

    /// Time of the last record in the window.
    pub fn end(&self) -> NaiveDateTime {
        self.records[self.records.len() - 1].time
    }
}

/// Select the complete window of records preceding `onset`.
pub fn select_window<'a>(
    dataset: &'a Dataset,
    onset: NaiveDateTime,
    spec: &WindowSpec,
) -> PrecondResult<Window<'a>> {
    if spec.span_hours == 0 {
        return Err(PrecondError::InvalidSpan(spec.span_hours));
    }
    if !is_whole_hour(onset) {
        return Err(PrecondError::InvalidOnset(onset));
    }

    let span = spec.span().ok_or(PrecondError::InvalidSpan(spec.span_hours))?;
    let earliest = dataset
        .first_time()
        .checked_add_signed(span)
        .ok_or(PrecondError::InvalidSpan(spec.span_hours))?;
    let latest = dataset.last_time();
    if onset < earliest || onset > latest {
        return Err(PrecondError::OutOfCoverage {
            onset,
            earliest,
            latest,
        });
    }

    let start = onset
        .checked_sub_signed(span)
        .ok_or(PrecondError::InvalidSpan(spec.span_hours))?;
    let records = dataset.records();
    let lo = records.partition_point(|r| r.time < start);
    let hi = match spec.convention {
        WindowConvention::Preceding => records.partition_point(|r| r.time < onset),
        WindowConvention::Closed => records.partition_point(|r| r.time <= onset),
    };

    let expected = spec.expected_records();
    let found = hi - lo;
    if found < expected {
        return Err(PrecondError::IncompleteWindow {
            onset,
            expected,
            found,
        });
    }

    let window = Window {
        onset,
        spec: *spec,
        records: &records[lo..hi],
    };
    debug!(
        %onset,
        start = %window.start(),
        end = %window.end(),
        records = window.len(),
        convention = ?spec.convention,
        "selected window"
    );
    Ok(window)
}
