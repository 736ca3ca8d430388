//! Locating and loading the reports of a sweep point.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use ppa_common::ParameterPoint;
use ppa_config::LayoutConfig;

use crate::error::{ReportError, ReportKind};

/// The raw text of one point's three reports.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportSet {
    /// The power report.
    pub power: String,
    /// The hierarchical utilization report.
    pub utilization: String,
    /// The timing summary report.
    pub timing: String,
}

/// Resolves report paths under a tests root and reads them.
#[derive(Debug, Clone)]
pub struct ReportReader {
    root: PathBuf,
    layout: LayoutConfig,
}

impl ReportReader {
    /// Creates a reader for points stored under `root`.
    pub fn new(root: impl Into<PathBuf>, layout: LayoutConfig) -> Self {
        Self {
            root: root.into(),
            layout,
        }
    }

    /// Returns the tests root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the layout in use.
    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    /// Returns the directory holding everything generated for `point`.
    pub fn point_dir(&self, point: &ParameterPoint) -> PathBuf {
        self.root.join(point.key(self.layout.pad_width))
    }

    /// Returns where the report of the given kind is expected for `point`.
    pub fn report_path(&self, point: &ParameterPoint, kind: ReportKind) -> PathBuf {
        let dir = self.point_dir(point);
        let synth = dir.join(&self.layout.synth_dir);
        match kind {
            ReportKind::Power => synth.join(&self.layout.power_report),
            ReportKind::Utilization => synth.join(&self.layout.utilization_report),
            ReportKind::Timing => synth.join(&self.layout.timing_report),
            ReportKind::Cycles => dir.join(&self.layout.cycles_file),
        }
    }

    /// Reads all three reports of `point`.
    ///
    /// Every report is looked up before any is read, so a point with several
    /// missing files reports the first one in power, utilization, timing
    /// order.
    pub fn read(&self, point: &ParameterPoint) -> Result<ReportSet, ReportError> {
        let kinds = [ReportKind::Power, ReportKind::Utilization, ReportKind::Timing];
        let paths = kinds.map(|kind| (kind, self.report_path(point, kind)));
        for (kind, path) in &paths {
            stat_report(point, *kind, path)?;
        }

        let [power, utilization, timing] =
            paths.map(|(kind, path)| read_report(point, kind, &path));
        tracing::debug!(point = %point, dir = %self.point_dir(point).display(), "read reports");
        Ok(ReportSet {
            power: power?,
            utilization: utilization?,
            timing: timing?,
        })
    }
}

/// Reads one report file as text.
///
/// Only a path with nothing at it is [`ReportError::Missing`]. A directory,
/// a dangling link, invalid UTF-8 or any other I/O fault is
/// [`ReportError::Unreadable`].
pub fn read_report(
    point: &ParameterPoint,
    kind: ReportKind,
    path: &Path,
) -> Result<String, ReportError> {
    stat_report(point, kind, path)?;
    fs::read_to_string(path).map_err(|source| io_error(point, kind, path, source))
}

fn stat_report(point: &ParameterPoint, kind: ReportKind, path: &Path) -> Result<(), ReportError> {
    match fs::metadata(path) {
        Ok(meta) if meta.is_file() => Ok(()),
        Ok(_) => Err(ReportError::Unreadable {
            path: path.to_path_buf(),
            source: io::Error::new(io::ErrorKind::InvalidInput, "not a regular file"),
        }),
        Err(source) => Err(io_error(point, kind, path, source)),
    }
}

fn io_error(point: &ParameterPoint, kind: ReportKind, path: &Path, source: io::Error) -> ReportError {
    // `metadata` follows links; a link whose target is gone still exists.
    let dangling = source.kind() == io::ErrorKind::NotFound && fs::symlink_metadata(path).is_ok();
    if source.kind() == io::ErrorKind::NotFound && !dangling {
        ReportError::Missing {
            point: point.to_string(),
            kind,
            path: path.to_path_buf(),
        }
    } else {
        ReportError::Unreadable {
            path: path.to_path_buf(),
            source,
        }
    }
}
