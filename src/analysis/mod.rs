//! Window selection and averaging.
//!
//! - `window`: pick the hourly records preceding a storm onset
//! - `average`: per-field mean/median over a window, skipping missing values

pub mod average;
pub mod window;

pub use average::*;
pub use window::*;
