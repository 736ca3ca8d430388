//! Cycle counts supplied by the hardware generator.
//!
//! The generator reports one integer per point: how many clock cycles the
//! design consumes to process a batch. The driver only needs a way to look
//! that number up.

use std::collections::HashMap;

use ppa_common::ParameterPoint;
use ppa_report::{read_report, ReportError, ReportKind, ReportReader};

/// Metric name used in errors about the cycle count.
pub const CYCLES_METRIC: &str = "consumed_cycles";

/// Supplies the consumed cycle count of a point.
pub trait CycleSource: Send + Sync {
    /// Returns the cycle count for `point`.
    fn cycles(&self, point: &ParameterPoint) -> Result<i64, ReportError>;
}

impl<F> CycleSource for F
where
    F: Fn(&ParameterPoint) -> Result<i64, ReportError> + Send + Sync,
{
    fn cycles(&self, point: &ParameterPoint) -> Result<i64, ReportError> {
        self(point)
    }
}

/// Reads the cycle count from a file in each point directory.
///
/// The file holds a single integer, optionally surrounded by whitespace.
#[derive(Debug, Clone)]
pub struct CycleFile {
    reader: ReportReader,
}

impl CycleFile {
    /// Creates a source resolving files through `reader`'s layout.
    pub fn new(reader: ReportReader) -> Self {
        Self { reader }
    }
}

impl CycleSource for CycleFile {
    fn cycles(&self, point: &ParameterPoint) -> Result<i64, ReportError> {
        let path = self.reader.report_path(point, ReportKind::Cycles);
        let text = read_report(point, ReportKind::Cycles, &path)?;
        parse_cycles(&text)
    }
}

fn parse_cycles(text: &str) -> Result<i64, ReportError> {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    match tokens.as_slice() {
        [token] => token.parse().map_err(|_| ReportError::InvalidNumber {
            metric: CYCLES_METRIC.to_string(),
            text: token.to_string(),
        }),
        _ => Err(ReportError::Malformed {
            metric: CYCLES_METRIC.to_string(),
            observed: tokens.len(),
        }),
    }
}

/// Cycle counts held in memory, keyed by parameter values.
#[derive(Debug, Clone, Default)]
pub struct FixedCycles {
    default: i64,
    by_values: HashMap<Vec<i64>, i64>,
}

impl FixedCycles {
    /// Returns `count` for every point.
    pub fn uniform(count: i64) -> Self {
        Self {
            default: count,
            by_values: HashMap::new(),
        }
    }

    /// Overrides the count of the point with the given values.
    pub fn with(mut self, values: Vec<i64>, count: i64) -> Self {
        self.by_values.insert(values, count);
        self
    }
}

impl CycleSource for FixedCycles {
    fn cycles(&self, point: &ParameterPoint) -> Result<i64, ReportError> {
        Ok(self
            .by_values
            .get(point.values())
            .copied()
            .unwrap_or(self.default))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ppa_common::ParameterSpace;
    use ppa_config::LayoutConfig;
    use std::fs;

    fn points() -> Vec<ParameterPoint> {
        ParameterSpace::new()
            .with("frame_length", vec![128, 256])
            .unwrap()
            .points()
    }

    #[test]
    fn parse_single_integer() {
        assert_eq!(parse_cycles("20000\n").unwrap(), 20000);
        assert_eq!(parse_cycles("  -3 ").unwrap(), -3);
    }

    #[test]
    fn parse_rejects_empty_and_extra_tokens() {
        assert!(matches!(
            parse_cycles(""),
            Err(ReportError::Malformed { observed: 0, .. })
        ));
        assert!(matches!(
            parse_cycles("1 2"),
            Err(ReportError::Malformed { observed: 2, .. })
        ));
        assert!(matches!(
            parse_cycles("12.5"),
            Err(ReportError::InvalidNumber { .. })
        ));
    }

    #[test]
    fn file_source_reads_point_directory() {
        let dir = tempfile::tempdir().unwrap();
        let reader = ReportReader::new(dir.path(), LayoutConfig::default());
        let pts = points();
        let p = &pts[1];
        let path = reader.report_path(p, ReportKind::Cycles);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "4096\n").unwrap();

        let source = CycleFile::new(reader);
        assert_eq!(source.cycles(p).unwrap(), 4096);
        assert!(matches!(
            source.cycles(&pts[0]),
            Err(ReportError::Missing {
                kind: ReportKind::Cycles,
                ..
            })
        ));
    }

    #[test]
    fn file_source_directory_is_unreadable() {
        let dir = tempfile::tempdir().unwrap();
        let reader = ReportReader::new(dir.path(), LayoutConfig::default());
        let pts = points();
        fs::create_dir_all(reader.report_path(&pts[0], ReportKind::Cycles)).unwrap();
        assert!(matches!(
            CycleFile::new(reader).cycles(&pts[0]),
            Err(ReportError::Unreadable { .. })
        ));
    }

    #[test]
    fn fixed_source_with_override() {
        let source = FixedCycles::uniform(1000).with(vec![256], 2000);
        let pts = points();
        assert_eq!(source.cycles(&pts[0]).unwrap(), 1000);
        assert_eq!(source.cycles(&pts[1]).unwrap(), 2000);
    }

    #[test]
    fn closure_source() {
        let source =
            |p: &ParameterPoint| -> Result<i64, ReportError> { Ok(p.values()[0] * 10) };
        assert_eq!(source.cycles(&points()[1]).unwrap(), 2560);
    }
}
