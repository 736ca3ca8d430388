//! PPA CLI — collects power, area and timing figures from a synthesis sweep.
//!
//! Provides `ppa init` to scaffold a sweep configuration, `ppa collect` to
//! extract every point's reports into one aggregate table, and `ppa inspect`
//! to look at individual points.

#![warn(missing_docs)]

mod collect;
mod init;
mod inspect;
mod pipeline;

use std::io::IsTerminal;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use ppa_config::{ExportFormat, FailurePolicy};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// ppa — post-synthesis power/performance/area collection.
#[derive(Parser, Debug)]
#[command(name = "ppa", version, about = "Synthesis sweep PPA collector")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose (debug-level) output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Control colored output.
    #[arg(long, global = true, value_enum, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    /// Path to a custom `ppa.toml` configuration file.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a `ppa.toml` with the default sweep.
    Init {
        /// Project name (creates a subdirectory). If omitted, initializes in
        /// the current directory.
        name: Option<String>,
    },
    /// Extract every sweep point and export the aggregate table.
    Collect(CollectArgs),
    /// Extract and print selected sweep points.
    Inspect(InspectArgs),
}

/// Arguments for the `ppa collect` subcommand.
#[derive(Parser, Debug)]
pub struct CollectArgs {
    /// What to do with a point whose reports cannot be used.
    #[arg(long, value_enum)]
    pub policy: Option<Policy>,

    /// Number of points processed in parallel.
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// Output path for the aggregate table.
    #[arg(short, long)]
    pub output: Option<String>,

    /// Aggregate table format (default: from `ppa.toml` or the output extension).
    #[arg(short, long, value_enum)]
    pub format: Option<TableFormat>,

    /// Output format for diagnostics.
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    pub report_format: ReportFormat,
}

/// Arguments for the `ppa inspect` subcommand.
#[derive(Parser, Debug)]
pub struct InspectArgs {
    /// Parameter assignments selecting points (e.g., `-p frame_length=512`).
    /// Unassigned parameters match every value.
    #[arg(short = 'p', long = "param", value_name = "NAME=VALUE")]
    pub params: Vec<String>,
}

/// Failure policy selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Policy {
    /// Drop failing points and keep going.
    Skip,
    /// Stop at the first failing point.
    Abort,
}

impl From<Policy> for FailurePolicy {
    fn from(p: Policy) -> Self {
        match p {
            Policy::Skip => FailurePolicy::Skip,
            Policy::Abort => FailurePolicy::Abort,
        }
    }
}

/// Aggregate table format selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum TableFormat {
    /// Comma-separated values.
    Csv,
    /// JSON array of row objects.
    Json,
}

impl From<TableFormat> for ExportFormat {
    fn from(f: TableFormat) -> Self {
        match f {
            TableFormat::Csv => ExportFormat::Csv,
            TableFormat::Json => ExportFormat::Json,
        }
    }
}

/// Controls whether colored output is produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    /// Detect from terminal capabilities.
    Auto,
    /// Always produce colored output.
    Always,
    /// Never produce colored output.
    Never,
}

/// Diagnostic output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable terminal output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Whether to print verbose/debug information.
    pub verbose: bool,
    /// Whether to use colored output.
    pub color: bool,
    /// Optional path to a custom config file.
    pub config: Option<String>,
}

fn main() {
    let cli = Cli::parse();

    let color = match cli.color {
        ColorChoice::Auto => std::io::stderr().is_terminal(),
        ColorChoice::Always => true,
        ColorChoice::Never => false,
    };

    init_tracing(cli.quiet, cli.verbose, color);

    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
        color,
        config: cli.config,
    };

    let result = match cli.command {
        Command::Init { name } => init::run(name, &global),
        Command::Collect(ref args) => collect::run(args, &global),
        Command::Inspect(ref args) => inspect::run(args, &global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}

/// Installs the log subscriber. `RUST_LOG` wins over the flags.
fn init_tracing(quiet: bool, verbose: bool, color: bool) {
    let filter = log_filter(quiet, verbose);
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(color)
                .without_time(),
        )
        .init();
}

fn log_filter(quiet: bool, verbose: bool) -> &'static str {
    if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    }
}
