//! Error types for report loading and field extraction.

use std::fmt;
use std::path::PathBuf;

/// The artifacts read for each sweep point.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ReportKind {
    /// The power report.
    Power,
    /// The hierarchical utilization report.
    Utilization,
    /// The timing summary report.
    Timing,
    /// The consumed-cycles file written by the hardware generator.
    Cycles,
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportKind::Power => write!(f, "power"),
            ReportKind::Utilization => write!(f, "utilization"),
            ReportKind::Timing => write!(f, "timing"),
            ReportKind::Cycles => write!(f, "cycle count"),
        }
    }
}

/// Errors raised while reading a report or extracting a field from it.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// A metric pattern did not match exactly once.
    #[error("metric '{metric}' matched {observed} times, expected exactly one")]
    Malformed {
        /// The metric whose pattern was applied.
        metric: String,
        /// How many matches were found.
        observed: usize,
    },

    /// A matched field is not a number of the expected type.
    #[error("metric '{metric}': cannot parse '{text}' as a number")]
    InvalidNumber {
        /// The metric whose field failed to parse.
        metric: String,
        /// The captured text.
        text: String,
    },

    /// A report file does not exist at the resolved location.
    #[error("{kind} report missing for {point}: {}", .path.display())]
    Missing {
        /// The point the report belongs to.
        point: String,
        /// Which report is missing.
        kind: ReportKind,
        /// Where it was expected.
        path: PathBuf,
    },

    /// A report file exists but could not be read.
    #[error("failed to read {}: {source}", .path.display())]
    Unreadable {
        /// The file that failed.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// A pattern failed to compile or disagrees with its declared arity.
    #[error("invalid pattern for metric '{metric}': {reason}")]
    InvalidPattern {
        /// The metric the pattern belongs to.
        metric: String,
        /// What is wrong with it.
        reason: String,
    },
}

impl ReportError {
    /// Returns the metric name for extraction errors.
    pub fn metric(&self) -> Option<&str> {
        match self {
            ReportError::Malformed { metric, .. }
            | ReportError::InvalidNumber { metric, .. }
            | ReportError::InvalidPattern { metric, .. } => Some(metric),
            ReportError::Missing { .. } | ReportError::Unreadable { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_display() {
        let err = ReportError::Malformed {
            metric: "fft_util".into(),
            observed: 0,
        };
        assert_eq!(
            err.to_string(),
            "metric 'fft_util' matched 0 times, expected exactly one"
        );
        assert_eq!(err.metric(), Some("fft_util"));
    }

    #[test]
    fn missing_display_names_kind_and_path() {
        let err = ReportError::Missing {
            point: "#3 (a=1)".into(),
            kind: ReportKind::Timing,
            path: PathBuf::from("tests/a_0001/synth/post_synth_timing_summary.rpt"),
        };
        let msg = err.to_string();
        assert!(msg.starts_with("timing report missing for #3 (a=1)"));
        assert!(msg.contains("post_synth_timing_summary.rpt"));
        assert_eq!(err.metric(), None);
    }

    #[test]
    fn unreadable_display() {
        let err = ReportError::Unreadable {
            path: PathBuf::from("x.rpt"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.to_string().starts_with("failed to read x.rpt"));
    }
}
