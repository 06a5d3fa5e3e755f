//! `omni-precond` library crate.
//!
//! Averages OMNIWeb hourly solar wind data over the hours leading up to a
//! geomagnetic storm onset:
//!
//! ```no_run
//! use std::path::Path;
//! use omni_precond::{analysis, io};
//!
//! let dataset = io::load(Path::new("data/omni_sample_july2000.lst"))?;
//! let onset = chrono::NaiveDate::from_ymd_opt(2000, 7, 15)
//!     .and_then(|d| d.and_hms_opt(13, 0, 0))
//!     .expect("valid date");
//! let result = analysis::average(&dataset, onset)?;
//! println!("|B| = {:?} nT", result.b.mean);
//! # Ok::<(), omni_precond::error::PrecondError>(())
//! ```
//!
//! The binary (`precond`) is a thin wrapper around this library so that:
//!
//! - core logic is testable without spawning processes
//! - load/select/average compose independently

pub mod analysis;
pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod plot;
pub mod report;
