//! The sweep driver: every point through read, extract, derive, append.

use ppa_common::{ParameterPoint, ParameterSpace};
use ppa_config::{FailurePolicy, ResolvedRun, SweepConfig};
use ppa_diagnostics::{Diagnostic, DiagnosticCode, DiagnosticSink};
use ppa_report::{ReportError, ReportPatterns, ReportReader};
use rayon::prelude::*;

use crate::cycles::{CycleFile, CycleSource};
use crate::derive::Derivation;
use crate::error::{DeriveError, PointError, SweepError};
use crate::table::{AggregateRecord, AggregateTable, TableSchema};

/// A point excluded from the table under the skip policy.
#[derive(Debug, Clone)]
pub struct SkippedPoint {
    /// The point.
    pub point: ParameterPoint,
    /// Diagnostic code of the failure.
    pub code: DiagnosticCode,
    /// Human-readable reason.
    pub reason: String,
}

/// The result of a completed run.
#[derive(Debug)]
pub struct SweepOutcome {
    /// Rows for every point that succeeded, in enumeration order.
    pub table: AggregateTable,
    /// Points that failed and were skipped, in enumeration order.
    pub skipped: Vec<SkippedPoint>,
}

/// Runs a parameter sweep over pre-generated synthesis reports.
///
/// Points are independent. With more than one job they are processed on a
/// dedicated rayon pool and put back in enumeration order before they reach
/// the table. Under [`FailurePolicy::Abort`] the run fails with the earliest
/// failing point in enumeration order.
pub struct SweepDriver {
    space: ParameterSpace,
    reader: ReportReader,
    patterns: ReportPatterns,
    derivation: Derivation,
    cycles: Box<dyn CycleSource>,
    frame_length: String,
    num_frames: String,
    policy: FailurePolicy,
    jobs: usize,
}

impl SweepDriver {
    /// Creates a sequential, skipping driver.
    ///
    /// The sample count is taken from the `frame_length` and `num_frames`
    /// parameters unless [`sample_parameters`](Self::sample_parameters) says
    /// otherwise.
    pub fn new(
        space: ParameterSpace,
        reader: ReportReader,
        patterns: ReportPatterns,
        derivation: Derivation,
        cycles: impl CycleSource + 'static,
    ) -> Self {
        Self {
            space,
            reader,
            patterns,
            derivation,
            cycles: Box::new(cycles),
            frame_length: "frame_length".to_string(),
            num_frames: "num_frames".to_string(),
            policy: FailurePolicy::Skip,
            jobs: 1,
        }
    }

    /// Builds a driver from a loaded configuration and resolved run settings.
    ///
    /// Cycle counts are read from the configured file in each point directory.
    pub fn from_config(config: &SweepConfig, run: &ResolvedRun) -> Result<Self, SweepError> {
        let reader = ReportReader::new(&run.tests_root, config.layout.clone());
        let driver = Self::new(
            config.parameter_space()?,
            reader.clone(),
            ReportPatterns::new(&config.scopes)?,
            Derivation::new(run.target_period_ns),
            CycleFile::new(reader),
        )
        .sample_parameters(&config.sweep.frame_length, &config.sweep.num_frames)
        .policy(run.policy)
        .jobs(run.jobs);
        Ok(driver)
    }

    /// Names the parameters whose product is the sample count.
    pub fn sample_parameters(mut self, frame_length: &str, num_frames: &str) -> Self {
        self.frame_length = frame_length.to_string();
        self.num_frames = num_frames.to_string();
        self
    }

    /// Sets the failure policy.
    pub fn policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Sets the worker count. Zero is treated as one.
    pub fn jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs.max(1);
        self
    }

    /// Returns the parameter space.
    pub fn space(&self) -> &ParameterSpace {
        &self.space
    }

    /// Returns the report reader.
    pub fn reader(&self) -> &ReportReader {
        &self.reader
    }

    /// Returns the column set of the tables this driver produces.
    pub fn schema(&self) -> TableSchema {
        TableSchema::new(
            self.space.names().map(String::from).collect(),
            self.patterns.scope_labels().map(String::from).collect(),
        )
    }

    /// Processes one point without touching any table.
    pub fn evaluate(&self, point: &ParameterPoint) -> Result<AggregateRecord, PointError> {
        tracing::debug!(point = %point, "processing point");
        let reports = self.reader.read(point)?;
        let metrics = self.patterns.extract(&reports)?;
        let consumed_cycles = self.cycles.cycles(point)?;
        // Both parameters are checked before a run starts.
        let frame_length = point.get(&self.frame_length).unwrap_or_default();
        let num_frames = point.get(&self.num_frames).unwrap_or_default();
        let derived = self.derivation.derive(
            metrics.timing.wns_ns,
            consumed_cycles,
            frame_length,
            num_frames,
        )?;
        tracing::debug!(
            point = %point,
            wns_ns = metrics.timing.wns_ns,
            max_freq_mhz = derived.max_freq_mhz,
            "derived metrics"
        );
        Ok(AggregateRecord {
            point: point.clone(),
            metrics,
            consumed_cycles,
            derived,
        })
    }

    /// Runs the whole sweep.
    ///
    /// Skipped points are reported to `sink` as warnings. Under the abort
    /// policy the failing point is reported as an error and no table is
    /// returned.
    pub fn run(&self, sink: &DiagnosticSink) -> Result<SweepOutcome, SweepError> {
        for name in [&self.frame_length, &self.num_frames] {
            if !self.space.contains(name) {
                return Err(SweepError::UnknownParameter(name.clone()));
            }
        }

        let points = self.space.points();
        tracing::info!(
            points = points.len(),
            jobs = self.jobs,
            policy = ?self.policy,
            "starting sweep"
        );

        let outcome = if self.jobs > 1 {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(self.jobs)
                .build()
                .map_err(|e| SweepError::ThreadPool {
                    jobs: self.jobs,
                    reason: e.to_string(),
                })?;
            let results: Vec<_> =
                pool.install(|| points.par_iter().map(|p| self.evaluate(p)).collect());
            self.assemble(&points, results, sink)?
        } else {
            // Lazy, so abort stops reading at the first failure.
            self.assemble(&points, points.iter().map(|p| self.evaluate(p)), sink)?
        };

        tracing::info!(
            rows = outcome.table.len(),
            skipped = outcome.skipped.len(),
            "sweep finished"
        );
        Ok(outcome)
    }

    fn assemble(
        &self,
        points: &[ParameterPoint],
        results: impl IntoIterator<Item = Result<AggregateRecord, PointError>>,
        sink: &DiagnosticSink,
    ) -> Result<SweepOutcome, SweepError> {
        let mut table = AggregateTable::new(self.schema());
        let mut skipped = Vec::new();

        for (point, result) in points.iter().zip(results) {
            let error = match result {
                Ok(record) => {
                    table.push(record)?;
                    continue;
                }
                Err(error) => error,
            };

            match self.policy {
                FailurePolicy::Abort => {
                    sink.emit(point_diagnostic(
                        Diagnostic::error(error.code(), error.to_string()),
                        point,
                        &error,
                    ));
                    return Err(SweepError::PointFailed {
                        point: point.to_string(),
                        source: error,
                    });
                }
                FailurePolicy::Skip => {
                    tracing::warn!(point = %point, error = %error, "skipping point");
                    sink.emit(point_diagnostic(
                        Diagnostic::warning(error.code(), error.to_string()),
                        point,
                        &error,
                    ));
                    skipped.push(SkippedPoint {
                        point: point.clone(),
                        code: error.code(),
                        reason: error.to_string(),
                    });
                }
            }
        }

        Ok(SweepOutcome { table, skipped })
    }
}

fn point_diagnostic(diag: Diagnostic, point: &ParameterPoint, error: &PointError) -> Diagnostic {
    let diag = diag.at_point(point.to_string());
    match error {
        PointError::Report(ReportError::Missing { path, .. })
        | PointError::Report(ReportError::Unreadable { path, .. }) => {
            diag.with_note(format!("expected at {}", path.display()))
        }
        PointError::Report(ReportError::Malformed { observed: 0, .. }) => {
            diag.with_help("check that the report was produced by a completed synthesis run")
        }
        PointError::Derive(DeriveError::NegativeClockPeriod { .. }) => {
            diag.with_help("raise the target period or check the slack sign in the timing report")
        }
        _ => diag,
    }
}
