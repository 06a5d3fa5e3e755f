//! ASCII plotting for terminal output.
//!
//! A fixed-size character grid; output is deterministic for a given window.
//!
//! Plot elements:
//! - hourly values: `o` (missing hours are left blank)
//! - window mean: `-` line

use chrono::NaiveDateTime;

use crate::domain::{Field, FieldStats, Record};

/// Render one field of a window against hours relative to onset.
pub fn render_window_plot(
    records: &[Record],
    field: Field,
    stats: &FieldStats,
    onset: NaiveDateTime,
    width: usize,
    height: usize,
) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let points: Vec<(f64, f64)> = records
        .iter()
        .filter_map(|r| {
            let v = r.value(field)?;
            Some(((r.time - onset).num_hours() as f64, v))
        })
        .collect();

    let (t_min, t_max) = time_range(records, onset).unwrap_or((-1.0, 0.0));
    let (y_min, y_max) = value_range(&points, stats.mean);
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];

    if let Some(mean) = stats.mean {
        let row = map_y(mean, y_min, y_max, height);
        grid[row].fill('-');
    }
    // Points overlay the mean.
    for &(t, v) in &points {
        let x = map_x(t, t_min, t_max, width);
        let y = map_y(v, y_min, y_max, height);
        grid[y][x] = 'o';
    }

    let mut out = format!(
        "Plot: {} [{}] | t=[{t_min:.0}, {t_max:.0}] h from onset | y=[{y_min:.2}, {y_max:.2}]\n",
        field.label(),
        field.unit(),
    );
    for row in grid {
        out.extend(row);
        out.push('\n');
    }
    out
}

fn time_range(records: &[Record], onset: NaiveDateTime) -> Option<(f64, f64)> {
    let first = (records.first()?.time - onset).num_hours() as f64;
    let last = (records.last()?.time - onset).num_hours() as f64;
    if last > first {
        Some((first, last))
    } else {
        Some((first - 0.5, last + 0.5))
    }
}

/// Value extent over the points and the mean, widened to a unit band when flat.
fn value_range(points: &[(f64, f64)], mean: Option<f64>) -> (f64, f64) {
    let values = points.iter().map(|p| p.1).chain(mean);
    let (lo, hi) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if !lo.is_finite() {
        (-1.0, 1.0)
    } else if hi > lo {
        (lo, hi)
    } else {
        (lo - 1.0, hi + 1.0)
    }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let pad = ((max - min).abs() * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(t: f64, t_min: f64, t_max: f64, width: usize) -> usize {
    let u = ((t - t_min) / (t_max - t_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // Row 0 is the top of the plot.
    (height as f64 - 1.0 - u * (height as f64 - 1.0)).round() as usize
}
