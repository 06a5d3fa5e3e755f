//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - hourly observations and the loaded dataset (`Record`, `Dataset`)
//! - window configuration (`WindowSpec`, `WindowConvention`)
//! - averaging outputs (`FieldStats`, `AverageResult`, `SummaryFile`)

pub mod types;

pub use types::*;
