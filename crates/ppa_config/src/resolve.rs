//! Run resolution: merging file settings with command-line overrides.

use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::types::{ExportFormat, FailurePolicy, SweepConfig};

/// Settings a caller may override on top of `ppa.toml`.
#[derive(Debug, Clone, Default)]
pub struct RunOverrides {
    /// Replaces `sweep.policy`.
    pub policy: Option<FailurePolicy>,
    /// Replaces `sweep.jobs`.
    pub jobs: Option<usize>,
    /// Replaces `export.path`.
    pub output: Option<PathBuf>,
    /// Replaces `export.format`.
    pub format: Option<ExportFormat>,
}

/// Fully resolved run settings with absolute-or-project-relative paths joined.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedRun {
    /// Directory holding one subdirectory per point.
    pub tests_root: PathBuf,
    /// Failure policy for the run.
    pub policy: FailurePolicy,
    /// Worker count.
    pub jobs: usize,
    /// Target clock period in nanoseconds.
    pub target_period_ns: f64,
    /// Export destination.
    pub output: PathBuf,
    /// Export format.
    pub format: ExportFormat,
}

/// Resolves the effective run settings for a project.
///
/// Relative paths in the config are taken relative to `project_dir`. An
/// output override is used as given, relative to the caller's working
/// directory. When no format is given anywhere the output extension decides
/// (`.json` selects JSON).
pub fn resolve_run(
    config: &SweepConfig,
    project_dir: &Path,
    overrides: &RunOverrides,
) -> Result<ResolvedRun, ConfigError> {
    let jobs = overrides.jobs.unwrap_or(config.sweep.jobs);
    if jobs == 0 {
        return Err(ConfigError::ValidationError(
            "jobs must be at least 1".to_string(),
        ));
    }

    let output = match &overrides.output {
        Some(path) => path.clone(),
        None => project_dir.join(&config.export.path),
    };

    let format = match overrides.format {
        Some(format) => format,
        None if overrides.output.is_some() => format_from_extension(&output)
            .unwrap_or(config.export.format),
        None => config.export.format,
    };

    Ok(ResolvedRun {
        tests_root: project_dir.join(&config.sweep.tests_root),
        policy: overrides.policy.unwrap_or(config.sweep.policy),
        jobs,
        target_period_ns: config.timing.target_period_ns()?,
        output,
        format,
    })
}

fn format_from_extension(path: &Path) -> Option<ExportFormat> {
    match path.extension()?.to_str()? {
        "csv" => Some(ExportFormat::Csv),
        "json" => Some(ExportFormat::Json),
        _ => None,
    }
}
