//! `ppa collect` — run the whole sweep and export the aggregate table.

use std::path::PathBuf;

use ppa_config::{resolve_run, RunOverrides};
use ppa_diagnostics::DiagnosticSink;
use ppa_sweep::{export, SweepDriver, SweepError};

use crate::pipeline::{load_project, render_diagnostics};
use crate::{CollectArgs, GlobalArgs};

/// Runs the `ppa collect` command.
///
/// Returns exit code 0 when the table was exported (even if points were
/// skipped), 1 when the run was aborted by a failing point.
pub fn run(args: &CollectArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let (project_dir, config) = load_project(global)?;
    let overrides = RunOverrides {
        policy: args.policy.map(Into::into),
        jobs: args.jobs,
        output: args.output.as_ref().map(PathBuf::from),
        format: args.format.map(Into::into),
    };
    let run = resolve_run(&config, &project_dir, &overrides)?;
    let driver = SweepDriver::from_config(&config, &run)?;

    if !global.quiet {
        eprintln!(
            "  Collecting {} ({} points, {} job(s))",
            config.project.name,
            driver.space().point_count(),
            run.jobs
        );
    }

    let sink = DiagnosticSink::new();
    let result = driver.run(&sink);
    render_diagnostics(&sink, args.report_format, global.color);

    let outcome = match result {
        Ok(outcome) => outcome,
        // Already rendered as a diagnostic.
        Err(SweepError::PointFailed { .. }) => {
            if !global.quiet {
                eprintln!("     Aborted, nothing exported");
            }
            return Ok(1);
        }
        Err(e) => return Err(e.into()),
    };

    export(&outcome.table, &run.output, run.format)?;

    if !global.quiet {
        eprintln!(
            "    Exported {} row(s) to {}",
            outcome.table.len(),
            run.output.display()
        );
        if !outcome.skipped.is_empty() {
            eprintln!("     Skipped {} point(s)", outcome.skipped.len());
            if global.verbose {
                for s in &outcome.skipped {
                    eprintln!("             {} [{}]", s.point, s.code);
                }
            }
        }
        eprintln!(" Fingerprint {}", outcome.table.fingerprint());
    }

    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ReportFormat;
    use std::fs;
    use tempfile::TempDir;

    fn project() -> TempDir {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("ppa.toml"),
            "[project]\nname = \"t\"\n\n[[sweep.parameters]]\nname = \"frame_length\"\nvalues = [128]\n\n[[sweep.parameters]]\nname = \"num_frames\"\nvalues = [8]\n",
        )
        .unwrap();
        tmp
    }

    fn global(dir: &TempDir) -> GlobalArgs {
        GlobalArgs {
            quiet: true,
            verbose: false,
            color: false,
            config: Some(dir.path().to_string_lossy().into_owned()),
        }
    }

    fn args(policy: Option<crate::Policy>) -> CollectArgs {
        CollectArgs {
            policy,
            jobs: None,
            output: None,
            format: None,
            report_format: ReportFormat::Text,
        }
    }

    #[test]
    fn skip_with_no_reports_exports_header_only() {
        let dir = project();
        let code = run(&args(None), &global(&dir)).unwrap();
        assert_eq!(code, 0);
        let csv = fs::read_to_string(dir.path().join("results.csv")).unwrap();
        assert_eq!(csv.lines().count(), 1);
        assert!(csv.starts_with("frame_length,num_frames,"));
    }

    #[test]
    fn abort_with_no_reports_exports_nothing() {
        let dir = project();
        let code = run(&args(Some(crate::Policy::Abort)), &global(&dir)).unwrap();
        assert_eq!(code, 1);
        assert!(!dir.path().join("results.csv").exists());
    }

    #[test]
    fn missing_project_is_an_error() {
        let dir = TempDir::new().unwrap();
        assert!(run(&args(None), &global(&dir)).is_err());
    }
}
