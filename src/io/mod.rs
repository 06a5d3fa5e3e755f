//! Input/output helpers.
//!
//! - OMNIWeb `.lst` load + write (`omni`)
//! - window record export to CSV (`export`)
//! - summary JSON read/write (`summary`)

pub mod export;
pub mod omni;
pub mod summary;

pub use export::*;
pub use omni::*;
pub use summary::*;
