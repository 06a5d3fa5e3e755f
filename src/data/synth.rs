//! Synthetic OMNI-like hourly solar wind series.
//!
//! Values are drawn from simple Gaussian models around quiet-time levels,
//! with an optional storm: for the 12 hours before `storm_hour` the IMF
//! turns southward and the wind speeds up, and Dst drops from then on.
//! Output is rounded to the precision of the OMNIWeb columns so a written
//! and re-read dataset is identical.

use chrono::{Duration, NaiveDateTime};
use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use crate::domain::{Dataset, Record};
use crate::error::AppError;

/// Hours before `storm_hour` during which the driver conditions are applied.
const STORM_LEAD_HOURS: usize = 12;

#[derive(Debug, Clone)]
pub struct SynthConfig {
    pub start: NaiveDateTime,
    pub hours: usize,
    pub seed: u64,
    /// Probability that any single measurement is replaced by its fill value.
    pub fill_prob: f64,
    /// Storm onset, as an hour offset from `start`.
    pub storm_hour: Option<usize>,
}

pub fn generate_dataset(config: &SynthConfig) -> Result<Dataset, AppError> {
    if config.hours == 0 {
        return Err(AppError::new(2, "Synthetic hour count must be > 0."));
    }
    if !(0.0..1.0).contains(&config.fill_prob) {
        return Err(AppError::new(2, "Fill probability must be in [0, 1)."));
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let normal = Normal::<f64>::new(0.0, 1.0)
        .map_err(|e| AppError::new(4, format!("Noise distribution error: {e}")))?;

    let mut records = Vec::with_capacity(config.hours);
    let mut dst = 0.0_f64;

    for h in 0..config.hours {
        let (storm_driving, storm_recovery) = match config.storm_hour {
            Some(s) => (h + STORM_LEAD_HOURS >= s && h < s, h >= s),
            None => (false, false),
        };

        let (bz_mean, v_mean, n_mean) = if storm_driving {
            (-8.0, 650.0, 15.0)
        } else {
            (0.0, 420.0, 5.0)
        };

        let bx = 3.0 * normal.sample(&mut rng);
        let by = 3.0 * normal.sample(&mut rng);
        let bz = bz_mean + 3.0 * normal.sample(&mut rng);
        let b = (bx * bx + by * by + bz * bz).sqrt() + 0.5 * normal.sample(&mut rng).abs();
        let density = (n_mean * (0.3 * normal.sample(&mut rng)).exp()).min(99.0);
        let speed = (v_mean + 50.0 * normal.sample(&mut rng)).clamp(250.0, 1200.0);
        // OMNIWeb's flow pressure: 2e-6 * Np * Vp^2 nPa.
        let pressure = (2e-6 * density * speed * speed).min(99.0);

        let dst_step = if storm_recovery && h < config.storm_hour.unwrap_or(0) + 6 {
            -25.0
        } else {
            -0.1 * dst
        };
        dst = (dst + dst_step + 2.0 * normal.sample(&mut rng)).clamp(-600.0, 50.0);

        let mut maybe = |v: f64| -> Option<f64> {
            if config.fill_prob > 0.0 && rng.gen_bool(config.fill_prob) {
                None
            } else {
                Some(v)
            }
        };

        records.push(Record {
            time: config.start + Duration::hours(h as i64),
            b: maybe(round_to(b, 1)),
            bx: maybe(round_to(bx, 1)),
            by: maybe(round_to(by, 1)),
            bz: maybe(round_to(bz, 1)),
            density: maybe(round_to(density, 1)),
            speed: maybe(speed.round()),
            pressure: maybe(round_to(pressure, 2)),
            dst: maybe(dst.round()),
        });
    }

    Dataset::from_records(records).map_err(AppError::from)
}

fn round_to(v: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (v * scale).round() / scale
}
