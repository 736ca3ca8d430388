//! Error types for derivation, the sweep driver and export.

use std::path::PathBuf;

use ppa_diagnostics::{Category, DiagnosticCode};
use ppa_report::ReportError;

/// Diagnostic code for a report whose metric matched zero or several times.
pub const MALFORMED_REPORT: DiagnosticCode = DiagnosticCode::new(Category::Error, 101);
/// Diagnostic code for a captured field that is not a number.
pub const INVALID_NUMBER: DiagnosticCode = DiagnosticCode::new(Category::Error, 102);
/// Diagnostic code for a report file that does not exist.
pub const REPORT_MISSING: DiagnosticCode = DiagnosticCode::new(Category::Error, 103);
/// Diagnostic code for a report file that could not be read.
pub const REPORT_UNREADABLE: DiagnosticCode = DiagnosticCode::new(Category::Error, 104);
/// Diagnostic code for a pattern that does not compile or has the wrong arity.
pub const INVALID_PATTERN: DiagnosticCode = DiagnosticCode::new(Category::Error, 105);
/// Diagnostic code for a slack at or beyond the target period.
pub const NEGATIVE_CLOCK_PERIOD: DiagnosticCode = DiagnosticCode::new(Category::Timing, 201);
/// Diagnostic code for a non-positive cycle count.
pub const INVALID_CYCLE_COUNT: DiagnosticCode = DiagnosticCode::new(Category::Error, 202);
/// Diagnostic code for a non-positive sample count.
pub const INVALID_SAMPLE_COUNT: DiagnosticCode = DiagnosticCode::new(Category::Error, 203);

/// Errors raised while computing derived metrics.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DeriveError {
    /// The slack leaves no positive clock period.
    #[error(
        "worst negative slack {wns_ns} ns leaves no positive clock period against a {target_period_ns} ns target"
    )]
    NegativeClockPeriod {
        /// The configured target period.
        target_period_ns: f64,
        /// The extracted worst negative slack.
        wns_ns: f64,
    },

    /// The cycle count is zero or negative.
    #[error("consumed cycle count must be positive, got {0}")]
    InvalidCycleCount(i64),

    /// The sample count is zero, negative or overflows.
    #[error("sample count {frame_length} x {num_frames} is not a positive integer")]
    InvalidSampleCount {
        /// Frame length of the point.
        frame_length: i64,
        /// Frame count of the point.
        num_frames: i64,
    },
}

/// Why a single point failed.
#[derive(Debug, thiserror::Error)]
pub enum PointError {
    /// Reading or extracting one of its reports failed.
    #[error(transparent)]
    Report(#[from] ReportError),

    /// Its derived metrics could not be computed.
    #[error(transparent)]
    Derive(#[from] DeriveError),
}

impl PointError {
    /// Returns the diagnostic code for this failure.
    pub fn code(&self) -> DiagnosticCode {
        match self {
            PointError::Report(e) => match e {
                ReportError::Malformed { .. } => MALFORMED_REPORT,
                ReportError::InvalidNumber { .. } => INVALID_NUMBER,
                ReportError::Missing { .. } => REPORT_MISSING,
                ReportError::Unreadable { .. } => REPORT_UNREADABLE,
                ReportError::InvalidPattern { .. } => INVALID_PATTERN,
            },
            PointError::Derive(e) => match e {
                DeriveError::NegativeClockPeriod { .. } => NEGATIVE_CLOCK_PERIOD,
                DeriveError::InvalidCycleCount(_) => INVALID_CYCLE_COUNT,
                DeriveError::InvalidSampleCount { .. } => INVALID_SAMPLE_COUNT,
            },
        }
    }
}

/// Errors that end a sweep run.
#[derive(Debug, thiserror::Error)]
pub enum SweepError {
    /// A point failed under the abort policy.
    #[error("point {point} failed: {source}")]
    PointFailed {
        /// The failing point.
        point: String,
        /// What went wrong.
        #[source]
        source: PointError,
    },

    /// A parameter the driver needs is not part of the space.
    #[error("sweep parameter '{0}' is not defined")]
    UnknownParameter(String),

    /// A record does not fit the table's column set.
    #[error("record for {point} does not match the table schema: {reason}")]
    SchemaMismatch {
        /// The point whose record was rejected.
        point: String,
        /// What differs.
        reason: String,
    },

    /// The configuration does not describe a valid sweep.
    #[error(transparent)]
    Config(#[from] ppa_config::ConfigError),

    /// The report patterns could not be built.
    #[error(transparent)]
    Pattern(#[from] ReportError),

    /// The worker pool could not be created.
    #[error("failed to start {jobs} workers: {reason}")]
    ThreadPool {
        /// Requested worker count.
        jobs: usize,
        /// The pool builder's error.
        reason: String,
    },
}

/// Errors raised while writing or re-reading an aggregate table.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// Writing or reading the file failed.
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        /// The file involved.
        path: PathBuf,
        /// The underlying error.
        source: std::io::Error,
    },

    /// The table could not be serialized.
    #[error("serialization error: {0}")]
    Serialize(String),

    /// A re-imported file is not a well-formed table.
    #[error("line {line}: {reason}")]
    Parse {
        /// One-based line number.
        line: usize,
        /// What is wrong with it.
        reason: String,
    },
}
