//! Configuration types deserialized from `ppa.toml`.

use ppa_common::{Frequency, Parameter, ParameterSpace};
use serde::Deserialize;

use crate::error::ConfigError;

/// The top-level sweep configuration parsed from `ppa.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct SweepConfig {
    /// Project metadata.
    pub project: ProjectMeta,
    /// The parameter space and how to walk it.
    pub sweep: SweepSection,
    /// Where reports live for each point.
    #[serde(default)]
    pub layout: LayoutConfig,
    /// Target clock settings used to derive the maximum frequency.
    #[serde(default)]
    pub timing: TimingConfig,
    /// Module scopes whose utilization is extracted. The first is the top level.
    #[serde(default = "default_scopes")]
    pub scopes: Vec<ScopeConfig>,
    /// Aggregate table export settings.
    #[serde(default)]
    pub export: ExportConfig,
}

impl SweepConfig {
    /// Builds the parameter space declared under `[[sweep.parameters]]`.
    pub fn parameter_space(&self) -> Result<ParameterSpace, ConfigError> {
        Ok(ParameterSpace::from_parameters(
            self.sweep.parameters.clone(),
        )?)
    }

    /// Returns the top-level scope.
    ///
    /// Validation guarantees at least one scope, so this only returns `None`
    /// for configs built by hand.
    pub fn top_scope(&self) -> Option<&ScopeConfig> {
        self.scopes.first()
    }
}

/// Project metadata.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectMeta {
    /// The project name.
    pub name: String,
    /// The project version string.
    #[serde(default)]
    pub version: String,
    /// A brief description of the design under sweep.
    #[serde(default)]
    pub description: String,
}

/// The `[sweep]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct SweepSection {
    /// Directory holding one subdirectory per point, relative to the project.
    #[serde(default = "default_tests_root")]
    pub tests_root: String,
    /// What to do when a point fails.
    #[serde(default)]
    pub policy: FailurePolicy,
    /// Number of points processed concurrently.
    #[serde(default = "default_jobs")]
    pub jobs: usize,
    /// Parameter holding the frame length, one factor of the sample count.
    #[serde(default = "default_frame_length")]
    pub frame_length: String,
    /// Parameter holding the frame count, the other factor of the sample count.
    #[serde(default = "default_num_frames")]
    pub num_frames: String,
    /// The sweep dimensions, outermost first.
    #[serde(default)]
    pub parameters: Vec<Parameter>,
}

/// How the sweep driver reacts to a point that fails extraction or derivation.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Drop the point, report why, and keep going.
    #[default]
    Skip,
    /// Stop on the first failing point and export nothing.
    Abort,
}

/// On-disk layout of the per-point report directories.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Subdirectory of each point directory holding the synthesis reports.
    pub synth_dir: String,
    /// File name of the power report.
    pub power_report: String,
    /// File name of the hierarchical utilization report.
    pub utilization_report: String,
    /// File name of the timing summary report.
    pub timing_report: String,
    /// File in the point directory holding the consumed cycle count.
    pub cycles_file: String,
    /// Digits each parameter value is zero-padded to in directory names.
    pub pad_width: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            synth_dir: "synth".to_string(),
            power_report: "post_synth_power.rpt".to_string(),
            utilization_report: "post_synth_utilization.rpt".to_string(),
            timing_report: "post_synth_timing_summary.rpt".to_string(),
            cycles_file: "consumed_cycles.txt".to_string(),
            pad_width: 4,
        }
    }
}

/// The `[timing]` section. At most one of the two fields may be set.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TimingConfig {
    /// Clock period constraint the design was synthesized against, in ns.
    pub target_period_ns: Option<f64>,
    /// The same constraint expressed as a frequency (e.g., `"62.5MHz"`).
    pub target_frequency: Option<String>,
}

/// Period used when neither timing field is set.
pub const DEFAULT_TARGET_PERIOD_NS: f64 = 16.0;

impl TimingConfig {
    /// Resolves the target clock period in nanoseconds.
    pub fn target_period_ns(&self) -> Result<f64, ConfigError> {
        let period = match (self.target_period_ns, &self.target_frequency) {
            (Some(_), Some(_)) => {
                return Err(ConfigError::ValidationError(
                    "set either timing.target_period_ns or timing.target_frequency, not both"
                        .to_string(),
                ))
            }
            (Some(ns), None) => ns,
            (None, Some(freq)) => freq
                .parse::<Frequency>()
                .map_err(|e| ConfigError::ValidationError(e.to_string()))?
                .period_ns(),
            (None, None) => DEFAULT_TARGET_PERIOD_NS,
        };
        if !period.is_finite() || period <= 0.0 {
            return Err(ConfigError::ValidationError(format!(
                "target period must be positive, got {period} ns"
            )));
        }
        Ok(period)
    }
}

/// A module scope in the hierarchical utilization report.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ScopeConfig {
    /// Column prefix in the aggregate table (e.g., `total`, `fft`).
    pub label: String,
    /// Instance column of the utilization row (e.g., `peList_0`).
    pub instance: String,
    /// Module column of the utilization row (e.g., `FFTWrapper`).
    pub module: String,
}

impl ScopeConfig {
    /// Creates a scope.
    pub fn new(
        label: impl Into<String>,
        instance: impl Into<String>,
        module: impl Into<String>,
    ) -> Self {
        Self {
            label: label.into(),
            instance: instance.into(),
            module: module.into(),
        }
    }
}

/// The `[export]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Output file, relative to the project directory.
    pub path: String,
    /// Output format.
    pub format: ExportFormat,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            path: "results.csv".to_string(),
            format: ExportFormat::Csv,
        }
    }
}

/// Serialization format of the aggregate table.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Comma-separated values with a header row.
    #[default]
    Csv,
    /// A JSON array with one object per row.
    Json,
}

/// The default scopes: the pipeline top level plus its FFT and LMFE stages.
pub fn default_scopes() -> Vec<ScopeConfig> {
    vec![
        ScopeConfig::new("total", "ProcessingPipeline", "(top)"),
        ScopeConfig::new("fft", "peList_0", "FFTWrapper"),
        ScopeConfig::new("lmfe", "peList_1", "LMFEWrapper"),
    ]
}

fn default_tests_root() -> String {
    "tests".to_string()
}

fn default_jobs() -> usize {
    1
}

fn default_frame_length() -> String {
    "frame_length".to_string()
}

fn default_num_frames() -> String {
    "num_frames".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timing_defaults_to_sixteen_ns() {
        let t = TimingConfig::default();
        assert_eq!(t.target_period_ns().unwrap(), 16.0);
    }

    #[test]
    fn timing_from_frequency() {
        let t = TimingConfig {
            target_period_ns: None,
            target_frequency: Some("100MHz".into()),
        };
        assert!((t.target_period_ns().unwrap() - 10.0).abs() < 1e-12);
    }

    #[test]
    fn timing_rejects_both_and_nonpositive() {
        let both = TimingConfig {
            target_period_ns: Some(10.0),
            target_frequency: Some("100MHz".into()),
        };
        assert!(matches!(
            both.target_period_ns(),
            Err(ConfigError::ValidationError(_))
        ));
        let zero = TimingConfig {
            target_period_ns: Some(0.0),
            target_frequency: None,
        };
        assert!(zero.target_period_ns().is_err());
    }

    #[test]
    fn default_layout_matches_vivado_names() {
        let l = LayoutConfig::default();
        assert_eq!(l.synth_dir, "synth");
        assert_eq!(l.power_report, "post_synth_power.rpt");
        assert_eq!(l.timing_report, "post_synth_timing_summary.rpt");
        assert_eq!(l.pad_width, 4);
    }

    #[test]
    fn default_scopes_top_first() {
        let scopes = default_scopes();
        assert_eq!(scopes.len(), 3);
        assert_eq!(scopes[0].module, "(top)");
    }
}
