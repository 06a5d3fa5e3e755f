//! Data sources beyond OMNIWeb files.

pub mod synth;

pub use synth::*;
