//! Shared domain types.
//!
//! These types are kept small and serializable so they can be:
//!
//! - used in-memory by the loader, window selector and averager
//! - exported to JSON/CSV
//! - reloaded later for display

use std::path::PathBuf;

use chrono::{Duration, NaiveDateTime, Timelike};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::{PrecondError, PrecondResult};

/// A single measurement. `None` means the source carried its fill value.
pub type Measurement = Option<f64>;

/// One hourly solar wind observation.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// Start of the hour (UT).
    pub time: NaiveDateTime,
    /// IMF magnitude |B|, nT.
    pub b: Measurement,
    pub bx: Measurement,
    pub by: Measurement,
    pub bz: Measurement,
    /// Proton density, N/cm^3.
    pub density: Measurement,
    /// Bulk speed, km/s.
    pub speed: Measurement,
    /// Flow (dynamic) pressure, nPa.
    pub pressure: Measurement,
    pub dst: Measurement,
}

impl Record {
    /// IMF clock angle in degrees, `[0, 360)`.
    ///
    /// 0 = Bz north, 90 = By positive, 180 = Bz south, 270 = By negative.
    pub fn clock_angle(&self) -> Measurement {
        let (by, bz) = (self.by?, self.bz?);
        let deg = by.atan2(bz).to_degrees().rem_euclid(360.0);
        // rem_euclid can round a tiny negative angle up to exactly 360.
        Some(if deg >= 360.0 { 0.0 } else { deg })
    }

    pub fn value(&self, field: Field) -> Measurement {
        match field {
            Field::B => self.b,
            Field::Bx => self.bx,
            Field::By => self.by,
            Field::Bz => self.bz,
            Field::Density => self.density,
            Field::Speed => self.speed,
            Field::Pressure => self.pressure,
            Field::Dst => self.dst,
            Field::Clock => self.clock_angle(),
        }
    }
}

/// Quantities that can be averaged or plotted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    B,
    Bx,
    By,
    Bz,
    Density,
    Speed,
    Pressure,
    Dst,
    Clock,
}

impl Field {
    pub const ALL: [Field; 9] = [
        Field::B,
        Field::Clock,
        Field::Pressure,
        Field::Bx,
        Field::By,
        Field::Bz,
        Field::Density,
        Field::Speed,
        Field::Dst,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Field::B => "|B|",
            Field::Bx => "IMF Bx",
            Field::By => "IMF By",
            Field::Bz => "IMF Bz",
            Field::Density => "Density",
            Field::Speed => "Speed",
            Field::Pressure => "Pdyn",
            Field::Dst => "Dst",
            Field::Clock => "Clock",
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            Field::B | Field::Bx | Field::By | Field::Bz | Field::Dst => "nT",
            Field::Density => "cm^-3",
            Field::Speed => "km/s",
            Field::Pressure => "nPa",
            Field::Clock => "deg",
        }
    }
}

/// Hourly records in strictly ascending time order.
///
/// Gaps are allowed here; window selection is where they matter.
#[derive(Debug, Clone)]
pub struct Dataset {
    records: Vec<Record>,
}

impl Dataset {
    /// Build a dataset, checking it is non-empty, hour-aligned and strictly increasing.
    pub fn from_records(records: Vec<Record>) -> PrecondResult<Self> {
        if records.is_empty() {
            return Err(PrecondError::Empty);
        }
        for (idx, r) in records.iter().enumerate() {
            if !is_whole_hour(r.time) {
                return Err(PrecondError::parse(
                    idx + 1,
                    format!("Timestamp {} is not on a whole hour.", r.time),
                ));
            }
            if idx > 0 && r.time <= records[idx - 1].time {
                return Err(PrecondError::parse(
                    idx + 1,
                    format!(
                        "Timestamp {} does not follow {} (records must be strictly increasing).",
                        r.time,
                        records[idx - 1].time
                    ),
                ));
            }
        }
        Ok(Self { records })
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn first_time(&self) -> NaiveDateTime {
        self.records[0].time
    }

    pub fn last_time(&self) -> NaiveDateTime {
        self.records[self.records.len() - 1].time
    }

    /// Number of hours absent between the first and last record.
    pub fn missing_hours(&self) -> usize {
        let covered = (self.last_time() - self.first_time()).num_hours() as usize + 1;
        covered - self.records.len()
    }

    pub fn stats(&self) -> DatasetStats {
        DatasetStats {
            n_records: self.len(),
            first: self.first_time(),
            last: self.last_time(),
            missing_hours: self.missing_hours(),
        }
    }
}

pub(crate) fn is_whole_hour(t: NaiveDateTime) -> bool {
    t.minute() == 0 && t.second() == 0 && t.nanosecond() == 0
}

/// Summary of a loaded dataset, for reporting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetStats {
    pub n_records: usize,
    pub first: NaiveDateTime,
    pub last: NaiveDateTime,
    pub missing_hours: usize,
}

/// Which side of the onset hour the window includes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum WindowConvention {
    /// `[onset - span, onset)`: the onset hour itself is excluded.
    #[default]
    Preceding,
    /// `[onset - span, onset]`: the onset hour is included (span + 1 records).
    Closed,
}

/// Window length and boundary convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowSpec {
    pub span_hours: u32,
    pub convention: WindowConvention,
}

impl Default for WindowSpec {
    fn default() -> Self {
        Self {
            span_hours: 24,
            convention: WindowConvention::Preceding,
        }
    }
}

impl WindowSpec {
    /// Window length as a `Duration`.
    pub fn span(&self) -> Option<Duration> {
        Duration::try_hours(i64::from(self.span_hours))
    }

    /// Number of hourly records a complete window holds.
    pub fn expected_records(&self) -> usize {
        match self.convention {
            WindowConvention::Preceding => self.span_hours as usize,
            WindowConvention::Closed => self.span_hours as usize + 1,
        }
    }
}

/// Mean/median of one field over a window.
///
/// `mean == None` means no valid value was present ("no data").
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldStats {
    pub mean: Option<f64>,
    pub median: Option<f64>,
    pub n_valid: usize,
    pub n_missing: usize,
}

impl FieldStats {
    pub fn has_data(&self) -> bool {
        self.mean.is_some()
    }
}

/// Per-field statistics for one window.
///
/// `b`, `clock_angle` and `pressure` are the headline quantities; the rest
/// are reported for context.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AverageResult {
    pub b: FieldStats,
    pub clock_angle: FieldStats,
    pub pressure: FieldStats,
    pub bx: FieldStats,
    pub by: FieldStats,
    pub bz: FieldStats,
    pub density: FieldStats,
    pub speed: FieldStats,
    pub dst: FieldStats,
}

impl AverageResult {
    pub fn get(&self, field: Field) -> &FieldStats {
        match field {
            Field::B => &self.b,
            Field::Bx => &self.bx,
            Field::By => &self.by,
            Field::Bz => &self.bz,
            Field::Density => &self.density,
            Field::Speed => &self.speed,
            Field::Pressure => &self.pressure,
            Field::Dst => &self.dst,
            Field::Clock => &self.clock_angle,
        }
    }
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults).
#[derive(Debug, Clone)]
pub struct PrecondConfig {
    pub data_path: PathBuf,
    pub onset: NaiveDateTime,
    pub window: WindowSpec,

    pub plot: bool,
    pub plot_field: Field,
    pub plot_width: usize,
    pub plot_height: usize,

    pub export_window: Option<PathBuf>,
    pub export_summary: Option<PathBuf>,
}

/// A saved summary file (JSON).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryFile {
    pub tool: String,
    pub data_file: String,
    pub onset: NaiveDateTime,
    pub window_start: NaiveDateTime,
    pub window_end: NaiveDateTime,
    pub window: WindowSpec,
    pub n_records: usize,
    pub result: AverageResult,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn hour(h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2000, 7, 15)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    fn record(h: u32, by: Measurement, bz: Measurement) -> Record {
        Record {
            time: hour(h),
            b: Some(1.0),
            bx: Some(1.0),
            by,
            bz,
            density: None,
            speed: None,
            pressure: None,
            dst: None,
        }
    }

    #[test]
    fn clock_angle_quadrants() {
        let cases = [
            ((0.0, 1.0), 0.0),
            ((1.0, 0.0), 90.0),
            ((0.0, -1.0), 180.0),
            ((-1.0, 0.0), 270.0),
            ((1.0, 1.0), 45.0),
        ];
        for ((by, bz), expected) in cases {
            let angle = record(0, Some(by), Some(bz)).clock_angle().unwrap();
            assert!((angle - expected).abs() < 1e-12, "by={by} bz={bz} got {angle}");
        }
    }

    #[test]
    fn clock_angle_missing_component() {
        assert_eq!(record(0, None, Some(1.0)).clock_angle(), None);
        assert_eq!(record(0, Some(1.0), None).clock_angle(), None);
    }

    #[test]
    fn dataset_rejects_out_of_order() {
        let records = vec![record(3, None, None), record(2, None, None)];
        let err = Dataset::from_records(records).unwrap_err();
        assert!(matches!(err, PrecondError::Parse { line: 2, .. }));
    }

    #[test]
    fn dataset_counts_missing_hours() {
        let records = vec![record(0, None, None), record(1, None, None), record(5, None, None)];
        let ds = Dataset::from_records(records).unwrap();
        assert_eq!(ds.len(), 3);
        assert_eq!(ds.missing_hours(), 3);
    }

    #[test]
    fn expected_records_by_convention() {
        let mut spec = WindowSpec::default();
        assert_eq!(spec.expected_records(), 24);
        spec.convention = WindowConvention::Closed;
        assert_eq!(spec.expected_records(), 25);
    }
}
