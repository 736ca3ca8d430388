//! `ppa inspect` — extract selected points and print their figures.

use std::fmt;

use ppa_common::{Frequency, ParameterPoint, ParameterSpace};
use ppa_config::{resolve_run, RunOverrides};
use ppa_diagnostics::{Diagnostic, DiagnosticSink};
use ppa_sweep::{AggregateRecord, SweepDriver};

use crate::pipeline::{load_project, render_diagnostics};
use crate::{GlobalArgs, InspectArgs, ReportFormat};

/// Runs the `ppa inspect` command.
///
/// Returns exit code 0 if every selected point could be extracted, 1 otherwise.
pub fn run(args: &InspectArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let (project_dir, config) = load_project(global)?;
    let run = resolve_run(&config, &project_dir, &RunOverrides::default())?;
    let driver = SweepDriver::from_config(&config, &run)?;

    let assignments = args
        .params
        .iter()
        .map(|s| parse_assignment(s))
        .collect::<Result<Vec<_>, _>>()?;
    let points = select_points(driver.space(), &assignments)?;
    if points.is_empty() {
        if !global.quiet {
            eprintln!("warning: no sweep point matches the given parameters");
        }
        return Ok(0);
    }

    let sink = DiagnosticSink::new();
    for point in &points {
        match driver.evaluate(point) {
            Ok(record) => print!("{}", PointSummary(&record)),
            Err(e) => sink.emit(Diagnostic::error(e.code(), e.to_string()).at_point(point.to_string())),
        }
    }
    render_diagnostics(&sink, ReportFormat::Text, global.color);

    Ok(if sink.has_errors() { 1 } else { 0 })
}

/// Parses a `name=value` assignment.
fn parse_assignment(s: &str) -> Result<(String, i64), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{s}'"))?;
    let value = value
        .trim()
        .parse()
        .map_err(|_| format!("parameter '{}' needs an integer value, got '{value}'", name.trim()))?;
    Ok((name.trim().to_string(), value))
}

/// Returns the points matching every assignment, in enumeration order.
fn select_points(
    space: &ParameterSpace,
    assignments: &[(String, i64)],
) -> Result<Vec<ParameterPoint>, String> {
    if let Some((name, _)) = assignments.iter().find(|(name, _)| !space.contains(name)) {
        return Err(format!("'{name}' is not a sweep parameter"));
    }
    Ok(space
        .points()
        .into_iter()
        .filter(|p| assignments.iter().all(|(name, v)| p.get(name) == Some(*v)))
        .collect())
}

/// One point's figures as an indented block.
struct PointSummary<'a>(&'a AggregateRecord);

impl fmt::Display for PointSummary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let m = &self.0.metrics;
        let d = &self.0.derived;
        writeln!(f, "{}", self.0.point)?;
        writeln!(
            f,
            "  power       total {:.3} W, dynamic {:.3} W, static {:.3} W",
            m.power.total_w, m.power.dynamic_w, m.power.static_w
        )?;
        for scope in &m.scopes {
            let c = scope.counts;
            writeln!(
                f,
                "  {:<10}  {} LUT, {} FF, {} RAMB18, {} DSP",
                scope.label,
                c.luts,
                c.ffs,
                c.ramb18_equivalent(),
                c.dsps
            )?;
        }
        writeln!(
            f,
            "  timing      WNS {:.3} ns, max clock {:.3} ns ({})",
            m.timing.wns_ns,
            d.max_clock_ns,
            Frequency::from_period_ns(d.max_clock_ns)
        )?;
        writeln!(
            f,
            "  throughput  {:.2} Msamples/s at {} cycles",
            d.max_throughput_msps, self.0.consumed_cycles
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ppa_report::{
        ExtractedMetrics, PowerMetrics, ResourceCounts, ScopeUtilization, TimingSummary,
    };
    use ppa_sweep::DerivedMetrics;

    fn space() -> ParameterSpace {
        ParameterSpace::new()
            .with("frame_length", vec![128, 512])
            .unwrap()
            .with("num_frames", vec![8, 32])
            .unwrap()
    }

    #[test]
    fn assignment_parsing() {
        assert_eq!(
            parse_assignment("frame_length=512").unwrap(),
            ("frame_length".to_string(), 512)
        );
        assert_eq!(parse_assignment(" n = 3 ").unwrap(), ("n".to_string(), 3));
        assert!(parse_assignment("frame_length").is_err());
        assert!(parse_assignment("frame_length=big").is_err());
    }

    #[test]
    fn selection_by_partial_assignment() {
        let pts = select_points(&space(), &[("frame_length".into(), 512)]).unwrap();
        let idx: Vec<usize> = pts.iter().map(|p| p.index()).collect();
        assert_eq!(idx, [2, 3]);

        let pts = select_points(
            &space(),
            &[("frame_length".into(), 512), ("num_frames".into(), 32)],
        )
        .unwrap();
        assert_eq!(pts.len(), 1);
        assert_eq!(pts[0].index(), 3);

        assert_eq!(select_points(&space(), &[]).unwrap().len(), 4);
        assert!(select_points(&space(), &[("frame_length".into(), 64)])
            .unwrap()
            .is_empty());
    }

    #[test]
    fn selection_rejects_unknown_parameter() {
        let err = select_points(&space(), &[("num_mels".into(), 13)]).unwrap_err();
        assert!(err.contains("num_mels"));
    }

    #[test]
    fn record_block() {
        let record = AggregateRecord {
            point: space().points().remove(3),
            metrics: ExtractedMetrics {
                power: PowerMetrics {
                    total_w: 1.234,
                    dynamic_w: 0.987,
                    static_w: 0.247,
                },
                scopes: vec![ScopeUtilization {
                    label: "total".into(),
                    counts: ResourceCounts {
                        luts: 5000,
                        ffs: 400,
                        ramb36: 5,
                        ramb18: 10,
                        dsps: 20,
                    },
                }],
                timing: TimingSummary { wns_ns: 0.456 },
            },
            consumed_cycles: 20_000,
            derived: DerivedMetrics {
                max_clock_ns: 15.544,
                max_freq_mhz: 1000.0 / 15.544,
                max_throughput_msps: 52.7015,
            },
        };
        let text = PointSummary(&record).to_string();
        assert!(text.starts_with("#3 (frame_length=512, num_frames=32)\n"));
        assert!(text.contains("total 1.234 W"));
        assert!(text.contains("5000 LUT, 400 FF, 20 RAMB18, 20 DSP"));
        assert!(text.contains("(64.33MHz)"));
        assert!(text.contains("52.70 Msamples/s at 20000 cycles"));
    }
}
