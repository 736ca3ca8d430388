//! Sweep orchestration for post-synthesis PPA collection.
//!
//! Given a parameter space and a directory of per-point synthesis reports,
//! the [`SweepDriver`] reads every point's reports, extracts power,
//! utilization and slack, derives clock and throughput figures, and assembles
//! an [`AggregateTable`] in enumeration order. [`export`] writes the table as
//! CSV or JSON.
//!
//! ```ignore
//! let driver = SweepDriver::from_config(&config, &run)?;
//! let sink = DiagnosticSink::new();
//! let outcome = driver.run(&sink)?;
//! export(&outcome.table, &run.output, run.format)?;
//! ```

#![warn(missing_docs)]

pub mod cycles;
pub mod derive;
pub mod driver;
pub mod error;
pub mod export;
pub mod table;

pub use cycles::{CycleFile, CycleSource, FixedCycles};
pub use derive::{Derivation, DerivedMetrics};
pub use driver::{SkippedPoint, SweepDriver, SweepOutcome};
pub use error::{DeriveError, ExportError, PointError, SweepError};
pub use export::{export, import_csv, parse_csv, render_csv, render_json, ImportedTable};
pub use table::{AggregateRecord, AggregateTable, Cell, TableSchema};
