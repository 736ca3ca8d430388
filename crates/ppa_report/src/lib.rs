//! Field extraction from post-synthesis reports.
//!
//! The synthesis tool writes three text reports per sweep point: power,
//! hierarchical utilization, and a timing summary. This crate turns them into
//! numbers.
//!
//! # Architecture
//!
//! - [`scanner`]: the [`FieldScanner`] trait and its regex implementation
//! - [`extract`]: the exact-cardinality extraction contract over a scanner
//! - [`patterns`]: the fixed metric set (power, per-scope utilization, slack)
//! - [`reader`]: locating and loading the three reports for a point
//!
//! ```ignore
//! let reader = ReportReader::new(&tests_root, layout);
//! let patterns = ReportPatterns::new(&scopes)?;
//! let metrics = patterns.extract(&reader.read(&point)?)?;
//! println!("WNS {:.3} ns", metrics.timing.wns_ns);
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod extract;
pub mod patterns;
pub mod reader;
pub mod scanner;

pub use error::{ReportError, ReportKind};
pub use extract::{extract, extract_array, extract_one, PatternSpec};
pub use patterns::{
    ExtractedMetrics, PowerMetrics, ReportPatterns, ResourceCounts, ScopeUtilization,
    TimingSummary,
};
pub use reader::{read_report, ReportReader, ReportSet};
pub use scanner::{FieldScanner, RegexScanner};
