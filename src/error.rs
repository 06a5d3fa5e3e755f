//! Error types.
//!
//! - `PrecondError`: what the library returns (load/select/average).
//! - `AppError`: what the binary reports, an exit code plus a message.

use std::path::PathBuf;

use chrono::NaiveDateTime;
use thiserror::Error;

/// Result type for library operations.
pub type PrecondResult<T> = Result<T, PrecondError>;

/// Failures surfaced by loading, window selection and averaging.
#[derive(Error, Debug)]
pub enum PrecondError {
    /// Input file missing or unreadable.
    #[error("Failed to read '{}': {source}", path.display())]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed row or field.
    #[error("Line {line}: {message}")]
    Parse { line: usize, message: String },

    /// The file had no data rows.
    #[error("No data rows found.")]
    Empty,

    /// Onset is not covered by the dataset with a full preceding span.
    #[error(
        "Onset {onset} is outside the usable range [{earliest}, {latest}] of the dataset."
    )]
    OutOfCoverage {
        onset: NaiveDateTime,
        earliest: NaiveDateTime,
        latest: NaiveDateTime,
    },

    /// The window has gaps.
    #[error("Incomplete window before {onset}: expected {expected} hourly records, found {found}.")]
    IncompleteWindow {
        onset: NaiveDateTime,
        expected: usize,
        found: usize,
    },

    /// Onset does not fall on a whole hour.
    #[error("Onset {0} is not on a whole hour.")]
    InvalidOnset(NaiveDateTime),

    /// Window span must be at least one hour.
    #[error("Invalid window span: {0} hours (must be >= 1).")]
    InvalidSpan(u32),
}

impl PrecondError {
    pub(crate) fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            line,
            message: message.into(),
        }
    }

    /// True for the range family: onset coverage and window completeness.
    pub fn is_range_error(&self) -> bool {
        matches!(
            self,
            Self::OutOfCoverage { .. }
                | Self::IncompleteWindow { .. }
                | Self::InvalidOnset(_)
                | Self::InvalidSpan(_)
        )
    }

    /// Exit code used by the binary.
    pub fn exit_code(&self) -> u8 {
        if self.is_range_error() { 3 } else { 2 }
    }
}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl From<PrecondError> for AppError {
    fn from(err: PrecondError) -> Self {
        Self::new(err.exit_code(), err.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn range_errors_map_to_exit_code_3() {
        let onset = NaiveDate::from_ymd_opt(2000, 7, 15)
            .unwrap()
            .and_hms_opt(13, 0, 0)
            .unwrap();
        let err = PrecondError::IncompleteWindow {
            onset,
            expected: 24,
            found: 20,
        };
        assert!(err.is_range_error());
        assert_eq!(AppError::from(err).exit_code(), 3);

        let err = PrecondError::parse(4, "bad");
        assert!(!err.is_range_error());
        assert_eq!(AppError::from(err).exit_code(), 2);
    }
}
