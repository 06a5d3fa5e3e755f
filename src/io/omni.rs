//! OMNIWeb hourly `.lst` reader/writer.
//!
//! Files come from the OMNIWeb form (`omniweb.gsfc.nasa.gov/form/dx1.html`)
//! with exactly these columns, whitespace separated, no header:
//!
//! ```text
//!  1 YEAR                          I4
//!  2 DOY                           I4
//!  3 Hour                          I3
//!  4 Scalar B, nT                  F6.1   fill 999.9
//!  5 BX, nT (GSE, GSM)             F6.1   fill 999.9
//!  6 BY, nT (GSM)                  F6.1   fill 999.9
//!  7 BZ, nT (GSM)                  F6.1   fill 999.9
//!  8 SW Proton Density, N/cm^3     F6.1   fill 999.9
//!  9 SW Plasma Speed, km/s         F6.0   fill 9999.
//! 10 Flow pressure                 F6.2   fill 99.99
//! 11 Dst-index, nT                 I6     fill 99999
//! ```
//!
//! Fill values become `None` here and nowhere else.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};
use tracing::{debug, info};

use crate::domain::{Dataset, Measurement, Record};
use crate::error::{PrecondError, PrecondResult};

pub const COLUMN_COUNT: usize = 11;

/// A measured column: name for messages plus its fill value.
struct MeasuredColumn {
    name: &'static str,
    fill: f64,
}

const MEASURED: [MeasuredColumn; 8] = [
    MeasuredColumn { name: "Scalar B", fill: 999.9 },
    MeasuredColumn { name: "BX", fill: 999.9 },
    MeasuredColumn { name: "BY", fill: 999.9 },
    MeasuredColumn { name: "BZ", fill: 999.9 },
    MeasuredColumn { name: "proton density", fill: 999.9 },
    MeasuredColumn { name: "plasma speed", fill: 9999.0 },
    MeasuredColumn { name: "flow pressure", fill: 99.99 },
    MeasuredColumn { name: "Dst", fill: 99999.0 },
];

/// Load an OMNIWeb hourly file.
pub fn load(path: &Path) -> PrecondResult<Dataset> {
    let file = File::open(path).map_err(|source| PrecondError::File {
        path: path.to_path_buf(),
        source,
    })?;
    let dataset = read_omni(BufReader::new(file), path)?;
    info!(
        path = %path.display(),
        records = dataset.len(),
        first = %dataset.first_time(),
        last = %dataset.last_time(),
        "loaded OMNI dataset"
    );
    Ok(dataset)
}

/// Parse OMNIWeb rows from any buffered reader.
pub fn parse_omni<R: BufRead>(reader: R) -> PrecondResult<Dataset> {
    read_omni(reader, Path::new("<input>"))
}

fn read_omni<R: BufRead>(reader: R, origin: &Path) -> PrecondResult<Dataset> {
    let mut records: Vec<Record> = Vec::new();
    // File line of each record, for errors raised after parsing.
    let mut line_numbers: Vec<usize> = Vec::new();
    let mut fills = 0usize;

    for (idx, line) in reader.lines().enumerate() {
        let line_no = idx + 1;
        let line = line.map_err(|source| PrecondError::File {
            path: origin.to_path_buf(),
            source,
        })?;
        if line.trim().is_empty() {
            continue;
        }

        let record = parse_line(&line, line_no)?;
        fills += measurements(&record).iter().filter(|m| m.is_none()).count();
        records.push(record);
        line_numbers.push(line_no);
    }

    if records.is_empty() {
        return Err(PrecondError::Empty);
    }
    debug!(rows = records.len(), fills, "parsed OMNI rows");

    Dataset::from_records(records).map_err(|err| match err {
        PrecondError::Parse { line, message } => PrecondError::Parse {
            line: line.checked_sub(1).and_then(|i| line_numbers.get(i)).copied().unwrap_or(line),
            message,
        },
        other => other,
    })
}

fn parse_line(line: &str, line_no: usize) -> PrecondResult<Record> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.len() != COLUMN_COUNT {
        return Err(PrecondError::parse(
            line_no,
            format!("Expected {COLUMN_COUNT} columns, found {}.", parts.len()),
        ));
    }

    let time = parse_time(parts[0], parts[1], parts[2]).map_err(|m| PrecondError::parse(line_no, m))?;

    let mut values = [None; 8];
    for (slot, (raw, column)) in values.iter_mut().zip(parts[3..].iter().zip(MEASURED.iter())) {
        *slot = parse_measurement(raw, column).map_err(|m| PrecondError::parse(line_no, m))?;
    }
    let [b, bx, by, bz, density, speed, pressure, dst] = values;

    Ok(Record {
        time,
        b,
        bx,
        by,
        bz,
        density,
        speed,
        pressure,
        dst,
    })
}

fn parse_time(year: &str, doy: &str, hour: &str) -> Result<NaiveDateTime, String> {
    let year: i32 = year.parse().map_err(|_| format!("Invalid year '{year}'."))?;
    let doy_n: u32 = doy.parse().map_err(|_| format!("Invalid day-of-year '{doy}'."))?;
    let hour_n: u32 = hour.parse().map_err(|_| format!("Invalid hour '{hour}'."))?;

    let date = NaiveDate::from_yo_opt(year, doy_n)
        .ok_or_else(|| format!("Day-of-year {doy_n} does not exist in {year}."))?;
    date.and_hms_opt(hour_n, 0, 0)
        .ok_or_else(|| format!("Hour {hour_n} is out of range (0-23)."))
}

fn parse_measurement(raw: &str, column: &MeasuredColumn) -> Result<Measurement, String> {
    let v: f64 = raw
        .parse()
        .map_err(|_| format!("Invalid {} value '{raw}'.", column.name))?;
    if !v.is_finite() {
        return Err(format!("Non-finite {} value '{raw}'.", column.name));
    }
    if is_fill(v, column.fill) {
        return Ok(None);
    }
    Ok(Some(v))
}

fn is_fill(v: f64, fill: f64) -> bool {
    (v - fill).abs() < 1e-6 * fill
}

fn measurements(r: &Record) -> [Measurement; 8] {
    [r.b, r.bx, r.by, r.bz, r.density, r.speed, r.pressure, r.dst]
}

/// Write a dataset in the same fixed-width layout the loader reads.
pub fn write_omni<W: Write>(mut out: W, dataset: &Dataset) -> std::io::Result<()> {
    for r in dataset.records() {
        let m = measurements(r);
        write!(out, "{:4}{:4}{:3}", r.time.year(), r.time.ordinal(), r.time.hour())?;
        // Each value gets a leading blank so wide values stay separated.
        for (v, column) in m[..5].iter().zip(MEASURED.iter()) {
            write!(out, " {:5.1}", v.unwrap_or(column.fill))?;
        }
        write!(out, " {:>5}", format!("{:.0}.", m[5].unwrap_or(MEASURED[5].fill)))?;
        write!(out, " {:5.2}", m[6].unwrap_or(MEASURED[6].fill))?;
        writeln!(out, " {:5}", m[7].unwrap_or(MEASURED[7].fill).round() as i64)?;
    }
    out.flush()
}

/// Write a dataset to an OMNIWeb-format file.
pub fn write_omni_file(path: &Path, dataset: &Dataset) -> PrecondResult<()> {
    let to_err = |source| PrecondError::File {
        path: path.to_path_buf(),
        source,
    };
    let file = File::create(path).map_err(to_err)?;
    write_omni(BufWriter::new(file), dataset).map_err(to_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const SAMPLE: &str = "\
2000 196 12   1.0   1.0   0.0   1.0  12.5  610.  9.30   -57
2000 196 13   2.0   1.0   1.0   0.0  12.5  610.  9.30   -57
2000 196 14 999.9 999.9 999.9 999.9 999.9 9999. 99.99 99999
";

    #[test]
    fn parses_rows_and_timestamps() {
        let ds = parse_omni(Cursor::new(SAMPLE)).unwrap();
        assert_eq!(ds.len(), 3);

        let first = &ds.records()[0];
        let expected = NaiveDate::from_ymd_opt(2000, 7, 14)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        assert_eq!(first.time, expected);
        assert_eq!(first.b, Some(1.0));
        assert_eq!(first.speed, Some(610.0));
        assert_eq!(first.pressure, Some(9.3));
        assert_eq!(first.dst, Some(-57.0));
    }

    #[test]
    fn fill_values_become_missing() {
        let ds = parse_omni(Cursor::new(SAMPLE)).unwrap();
        let r = &ds.records()[2];
        assert_eq!(measurements(r), [None; 8]);
        assert_eq!(r.clock_angle(), None);
    }

    #[test]
    fn blank_lines_are_skipped() {
        let text = format!("\n{SAMPLE}\n\n");
        assert_eq!(parse_omni(Cursor::new(text)).unwrap().len(), 3);
    }

    #[test]
    fn wrong_column_count_reports_line() {
        let text = "2000 196 12 1.0 1.0 0.0 1.0 12.5 610. 9.30 -57\n2000 196 13 2.0 1.0\n";
        let err = parse_omni(Cursor::new(text)).unwrap_err();
        match err {
            PrecondError::Parse { line, message } => {
                assert_eq!(line, 2);
                assert!(message.contains("Expected 11 columns"), "{message}");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn unparsable_number_is_parse_error() {
        let text = "2000 196 12 abc 1.0 0.0 1.0 12.5 610. 9.30 -57\n";
        let err = parse_omni(Cursor::new(text)).unwrap_err();
        assert!(matches!(err, PrecondError::Parse { line: 1, .. }));
    }

    #[test]
    fn invalid_day_and_hour_are_parse_errors() {
        // 1999 is not a leap year.
        let text = "1999 366 12 1.0 1.0 0.0 1.0 12.5 610. 9.30 -57\n";
        assert!(matches!(parse_omni(Cursor::new(text)), Err(PrecondError::Parse { .. })));

        let text = "2000 196 24 1.0 1.0 0.0 1.0 12.5 610. 9.30 -57\n";
        assert!(matches!(parse_omni(Cursor::new(text)), Err(PrecondError::Parse { .. })));
    }

    #[test]
    fn duplicate_timestamp_is_rejected() {
        let text = "\
2000 196 12 1.0 1.0 0.0 1.0 12.5 610. 9.30 -57
2000 196 12 1.0 1.0 0.0 1.0 12.5 610. 9.30 -57
";
        let err = parse_omni(Cursor::new(text)).unwrap_err();
        assert!(matches!(err, PrecondError::Parse { line: 2, .. }));
    }

    #[test]
    fn out_of_order_row_reports_file_line() {
        let text = "\
2000 196 13 1.0 1.0 0.0 1.0 12.5 610. 9.30 -57

2000 196 14 1.0 1.0 0.0 1.0 12.5 610. 9.30 -57

2000 196 12 1.0 1.0 0.0 1.0 12.5 610. 9.30 -57
";
        let err = parse_omni(Cursor::new(text)).unwrap_err();
        assert!(matches!(err, PrecondError::Parse { line: 5, .. }), "{err:?}");
    }

    #[test]
    fn empty_input_is_rejected() {
        assert!(matches!(parse_omni(Cursor::new("")), Err(PrecondError::Empty)));
        assert!(matches!(parse_omni(Cursor::new("  \n\n")), Err(PrecondError::Empty)));
    }

    #[test]
    fn missing_file_is_file_error() {
        let err = load(Path::new("definitely/not/here.lst")).unwrap_err();
        assert!(matches!(err, PrecondError::File { .. }));
    }

    #[test]
    fn writer_output_reads_back() {
        let ds = parse_omni(Cursor::new(SAMPLE)).unwrap();
        let mut buf = Vec::new();
        write_omni(&mut buf, &ds).unwrap();

        let text = String::from_utf8(buf).unwrap();
        let first = text.lines().next().unwrap();
        assert_eq!(first, "2000 196 12   1.0   1.0   0.0   1.0  12.5  610.  9.30   -57");

        let again = parse_omni(Cursor::new(text)).unwrap();
        assert_eq!(again.records(), ds.records());
    }

    #[test]
    fn wide_values_stay_separated() {
        let text = "2000 196 12 105.3 -60.2 40.1 -100.0 120.4 1850. 99.00  -589\n";
        let ds = parse_omni(Cursor::new(text)).unwrap();
        let mut buf = Vec::new();
        write_omni(&mut buf, &ds).unwrap();

        let written = String::from_utf8(buf).unwrap();
        assert_eq!(
            written.lines().next().unwrap(),
            "2000 196 12 105.3 -60.2  40.1 -100.0 120.4 1850. 99.00  -589"
        );
        let again = parse_omni(Cursor::new(written)).unwrap();
        assert_eq!(again.records(), ds.records());
        assert_eq!(again.records()[0].bz, Some(-100.0));
    }
}
