//! Export window records to CSV.
//!
//! One row per hour with empty cells for missing values.

use std::path::Path;

use serde::Serialize;

use crate::domain::{Measurement, Record};
use crate::error::AppError;

#[derive(Debug, Serialize)]
struct WindowRow {
    time: String,
    b: Measurement,
    bx: Measurement,
    by: Measurement,
    bz: Measurement,
    density: Measurement,
    speed: Measurement,
    pressure: Measurement,
    dst: Measurement,
    clock_angle: Measurement,
}

impl From<&Record> for WindowRow {
    fn from(r: &Record) -> Self {
        Self {
            time: r.time.format("%Y-%m-%dT%H:%M").to_string(),
            b: r.b,
            bx: r.bx,
            by: r.by,
            bz: r.bz,
            density: r.density,
            speed: r.speed,
            pressure: r.pressure,
            dst: r.dst,
            clock_angle: r.clock_angle(),
        }
    }
}

/// Write the records of a window to a CSV file.
pub fn write_window_csv(path: &Path, records: &[Record]) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_path(path)
        .map_err(|e| AppError::new(2, format!("Failed to create export CSV '{}': {e}", path.display())))?;

    for r in records {
        writer
            .serialize(WindowRow::from(r))
            .map_err(|e| AppError::new(2, format!("Failed to write export CSV row: {e}")))?;
    }

    writer
        .flush()
        .map_err(|e| AppError::new(2, format!("Failed to flush export CSV: {e}")))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn writes_header_and_blank_missing_cells() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("window.csv");

        let record = Record {
            time: NaiveDate::from_ymd_opt(2000, 7, 15)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap(),
            b: Some(7.4),
            bx: Some(4.4),
            by: Some(0.0),
            bz: Some(1.0),
            density: None,
            speed: Some(478.0),
            pressure: Some(1.58),
            dst: Some(-61.0),
        };
        write_window_csv(&path, &[record]).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "time,b,bx,by,bz,density,speed,pressure,dst,clock_angle"
        );
        assert_eq!(
            lines.next().unwrap(),
            "2000-07-15T12:00,7.4,4.4,0.0,1.0,,478.0,1.58,-61.0,0.0"
        );
    }
}
