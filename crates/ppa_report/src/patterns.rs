//! The fixed metric set read from each point's reports.
//!
//! Power comes from the summary table of the power report, utilization from
//! one row per module scope of the hierarchical utilization report, and the
//! worst negative slack from the design timing summary. Instance and module
//! names are configuration; the column layout is not.

use ppa_config::ScopeConfig;
use serde::Serialize;

use crate::error::ReportError;
use crate::extract::{extract_array, extract_one, PatternSpec};
use crate::reader::ReportSet;

/// A leading run of spaces, tabs and table borders on a single line.
const ROW_START: &str = r"^[ \t|]*";
/// A non-negative decimal number.
const DECIMAL: &str = r"(\d*\.?\d+)";
/// One utilization cell we keep.
const KEEP: &str = r"\s*\|\s*(\d+)";
/// One utilization cell we skip.
const SKIP: &str = r"\s*\|\s*\d+";

/// Power figures from the power report, in watts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PowerMetrics {
    /// Total on-chip power.
    pub total_w: f64,
    /// Dynamic power.
    pub dynamic_w: f64,
    /// Device static power.
    pub static_w: f64,
}

/// Resource counts from one row of the hierarchical utilization report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ResourceCounts {
    /// Total LUTs.
    pub luts: u64,
    /// Flip-flops.
    pub ffs: u64,
    /// RAMB36 tiles.
    pub ramb36: u64,
    /// RAMB18 tiles.
    pub ramb18: u64,
    /// DSP blocks.
    pub dsps: u64,
}

impl ResourceCounts {
    /// Block RAM expressed in RAMB18 units: each RAMB36 holds two RAMB18.
    pub fn ramb18_equivalent(&self) -> u64 {
        self.ramb18 + 2 * self.ramb36
    }
}

/// The utilization of one configured module scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScopeUtilization {
    /// The scope label (column prefix).
    pub label: String,
    /// Its resource counts.
    pub counts: ResourceCounts,
}

/// Slack figures from the timing summary, in nanoseconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TimingSummary {
    /// Worst negative slack. Positive when timing is met.
    pub wns_ns: f64,
}

/// Everything extracted for one point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractedMetrics {
    /// Power report figures.
    pub power: PowerMetrics,
    /// Utilization per scope, in configured order. The first is the top level.
    pub scopes: Vec<ScopeUtilization>,
    /// Timing summary figures.
    pub timing: TimingSummary,
}

impl ExtractedMetrics {
    /// Returns the top-level scope's utilization.
    pub fn top(&self) -> Option<&ScopeUtilization> {
        self.scopes.first()
    }
}

/// Compiled patterns for every metric of the canonical report format.
#[derive(Debug, Clone)]
pub struct ReportPatterns {
    total_power: PatternSpec,
    dynamic_power: PatternSpec,
    static_power: PatternSpec,
    scopes: Vec<(String, PatternSpec)>,
    wns: PatternSpec,
}

impl ReportPatterns {
    /// Builds the pattern set for the given module scopes.
    pub fn new(scopes: &[ScopeConfig]) -> Result<Self, ReportError> {
        let power = |label: &str| format!(r"{ROW_START}{label}\s*\|\s*{DECIMAL}");
        let scopes = scopes
            .iter()
            .map(|scope| {
                let metric = format!("{}_util", scope.label);
                Ok((scope.label.clone(), PatternSpec::regex(metric, &utilization_row(scope), 5)?))
            })
            .collect::<Result<Vec<_>, ReportError>>()?;

        Ok(Self {
            total_power: PatternSpec::regex(
                "total_power",
                &power(r"Total\s+On-Chip\s+Power\s+\(W\)"),
                1,
            )?,
            dynamic_power: PatternSpec::regex("dynamic_power", &power(r"Dynamic\s*\(W\)"), 1)?,
            static_power: PatternSpec::regex(
                "static_power",
                &power(r"Device\s+Static\s*\(W\)"),
                1,
            )?,
            scopes,
            // Header line, dashed separator line, then the value line.
            wns: PatternSpec::regex(
                "wns",
                r"^[ \t]*WNS\(ns\)[^\n]*\n[^\n]*\n[ \t]*(-?\d*\.?\d+)",
                1,
            )?,
        })
    }

    /// Returns the configured scope labels in order.
    pub fn scope_labels(&self) -> impl Iterator<Item = &str> {
        self.scopes.iter().map(|(label, _)| label.as_str())
    }

    /// Extracts the three power figures from a power report.
    pub fn power(&self, text: &str) -> Result<PowerMetrics, ReportError> {
        Ok(PowerMetrics {
            total_w: extract_one(text, &self.total_power)?,
            dynamic_w: extract_one(text, &self.dynamic_power)?,
            static_w: extract_one(text, &self.static_power)?,
        })
    }

    /// Extracts the resource counts of every scope from a utilization report.
    pub fn utilization(&self, text: &str) -> Result<Vec<ScopeUtilization>, ReportError> {
        self.scopes
            .iter()
            .map(|(label, spec)| {
                let [luts, ffs, ramb36, ramb18, dsps] = extract_array::<u64, 5>(text, spec)?;
                Ok(ScopeUtilization {
                    label: label.clone(),
                    counts: ResourceCounts {
                        luts,
                        ffs,
                        ramb36,
                        ramb18,
                        dsps,
                    },
                })
            })
            .collect()
    }

    /// Extracts the worst negative slack from a timing summary.
    pub fn timing(&self, text: &str) -> Result<TimingSummary, ReportError> {
        Ok(TimingSummary {
            wns_ns: extract_one(text, &self.wns)?,
        })
    }

    /// Extracts every metric from a point's reports.
    pub fn extract(&self, reports: &ReportSet) -> Result<ExtractedMetrics, ReportError> {
        Ok(ExtractedMetrics {
            power: self.power(&reports.power)?,
            scopes: self.utilization(&reports.utilization)?,
            timing: self.timing(&reports.timing)?,
        })
    }
}

/// Builds the row pattern for one scope.
///
/// Columns after instance and module: Total LUTs, Logic LUTs, LUTRAMs, SRLs,
/// FFs, RAMB36, RAMB18, DSP. Captured: Total LUTs, FFs, RAMB36, RAMB18, DSP.
fn utilization_row(scope: &ScopeConfig) -> String {
    format!(
        r"{ROW_START}{}\s*\|\s*{}{KEEP}{SKIP}{SKIP}{SKIP}{KEEP}{KEEP}{KEEP}{KEEP}",
        regex::escape(&scope.instance),
        regex::escape(&scope.module),
    )
}
