//! The aggregate table: one record per successful point, fixed columns.

use std::fmt;

use ppa_common::{ContentHash, ParameterPoint};
use ppa_report::ExtractedMetrics;
use serde::{Serialize, Serializer};

use crate::derive::DerivedMetrics;
use crate::error::SweepError;

/// Name of the throughput column.
pub const THROUGHPUT_COLUMN: &str = "max_throughput_msamples_sec";

/// One value of the table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cell {
    /// Parameter values, resource counts and cycle counts.
    Int(i64),
    /// Power figures and derived timing.
    Float(f64),
}

impl Cell {
    /// Parses a cell written by [`Display`](fmt::Display).
    ///
    /// Integers are tried first. Floats are always written with a decimal
    /// point or an exponent, so they never read back as integers.
    pub fn parse(text: &str) -> Option<Cell> {
        let text = text.trim();
        if let Ok(v) = text.parse::<i64>() {
            return Some(Cell::Int(v));
        }
        text.parse::<f64>().ok().map(Cell::Float)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Int(v) => write!(f, "{v}"),
            // Debug keeps the `.0` and prints the shortest round-tripping form.
            Cell::Float(v) => write!(f, "{v:?}"),
        }
    }
}

impl Serialize for Cell {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match *self {
            Cell::Int(v) => serializer.serialize_i64(v),
            Cell::Float(v) => serializer.serialize_f64(v),
        }
    }
}

/// The column set of a table, derived from parameter names and scope labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSchema {
    parameters: Vec<String>,
    scopes: Vec<String>,
    columns: Vec<String>,
}

impl TableSchema {
    /// Builds the schema.
    ///
    /// Columns: every parameter, the three power figures, then LUTs, FFs,
    /// RAMB18-equivalents and DSPs for every scope, then clock period, cycle
    /// count, frequency and throughput.
    pub fn new(parameters: Vec<String>, scopes: Vec<String>) -> Self {
        let mut columns = parameters.clone();
        columns.extend(["total_power", "dynamic_power", "static_power"].map(String::from));
        for resource in ["luts", "ff", "ramb18", "dsp"] {
            columns.extend(scopes.iter().map(|scope| format!("{scope}_{resource}")));
        }
        columns.extend(
            ["max_clock_ns", "consumed_cycles", "max_freq_mhz", THROUGHPUT_COLUMN]
                .map(String::from),
        );
        Self {
            parameters,
            scopes,
            columns,
        }
    }

    /// Returns the parameter names.
    pub fn parameters(&self) -> &[String] {
        &self.parameters
    }

    /// Returns the scope labels.
    pub fn scopes(&self) -> &[String] {
        &self.scopes
    }

    /// Returns every column name in order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }
}

/// Everything known about one successfully processed point.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateRecord {
    /// The point.
    pub point: ParameterPoint,
    /// Values read from its reports.
    pub metrics: ExtractedMetrics,
    /// Cycle count from the hardware generator.
    pub consumed_cycles: i64,
    /// Values computed from the above.
    pub derived: DerivedMetrics,
}

impl AggregateRecord {
    /// Returns the record's cells in [`TableSchema`] column order.
    pub fn cells(&self) -> Vec<Cell> {
        let mut cells: Vec<Cell> = self.point.values().iter().copied().map(Cell::Int).collect();
        let power = &self.metrics.power;
        cells.extend([power.total_w, power.dynamic_w, power.static_w].map(Cell::Float));

        let count = |v: u64| Cell::Int(i64::try_from(v).unwrap_or(i64::MAX));
        let scopes = &self.metrics.scopes;
        cells.extend(scopes.iter().map(|s| count(s.counts.luts)));
        cells.extend(scopes.iter().map(|s| count(s.counts.ffs)));
        cells.extend(scopes.iter().map(|s| count(s.counts.ramb18_equivalent())));
        cells.extend(scopes.iter().map(|s| count(s.counts.dsps)));

        cells.extend([
            Cell::Float(self.derived.max_clock_ns),
            Cell::Int(self.consumed_cycles),
            Cell::Float(self.derived.max_freq_mhz),
            Cell::Float(self.derived.max_throughput_msps),
        ]);
        cells
    }
}

/// Records in enumeration order under one fixed schema.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateTable {
    schema: TableSchema,
    records: Vec<AggregateRecord>,
}

impl AggregateTable {
    /// Creates an empty table.
    pub fn new(schema: TableSchema) -> Self {
        Self {
            schema,
            records: Vec::new(),
        }
    }

    /// Appends a record, checking that it carries every column.
    pub fn push(&mut self, record: AggregateRecord) -> Result<(), SweepError> {
        let mismatch = |reason: String| SweepError::SchemaMismatch {
            point: record.point.to_string(),
            reason,
        };
        if record.point.names() != self.schema.parameters() {
            return Err(mismatch(format!(
                "parameters {:?}, expected {:?}",
                record.point.names(),
                self.schema.parameters()
            )));
        }
        let labels: Vec<&str> = record.metrics.scopes.iter().map(|s| s.label.as_str()).collect();
        if labels != self.schema.scopes() {
            return Err(mismatch(format!(
                "scopes {labels:?}, expected {:?}",
                self.schema.scopes()
            )));
        }
        self.records.push(record);
        Ok(())
    }

    /// Returns the schema.
    pub fn schema(&self) -> &TableSchema {
        &self.schema
    }

    /// Returns the column names.
    pub fn columns(&self) -> &[String] {
        self.schema.columns()
    }

    /// Returns the records.
    pub fn records(&self) -> &[AggregateRecord] {
        &self.records
    }

    /// Returns the number of rows.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if no point made it into the table.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterates over the rows as cells.
    pub fn rows(&self) -> impl Iterator<Item = Vec<Cell>> + '_ {
        self.records.iter().map(AggregateRecord::cells)
    }

    /// Hashes the CSV rendering line by line, to tell whether two runs
    /// produced the same table.
    pub fn fingerprint(&self) -> ContentHash {
        let lines: Vec<String> = crate::export::csv_lines(self).collect();
        ContentHash::from_chunks(lines.iter().map(|l| l.as_bytes()))
    }
}
