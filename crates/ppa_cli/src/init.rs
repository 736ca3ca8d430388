//! `ppa init` — writes a starter `ppa.toml` for a sweep project.
//!
//! The generated config describes the default mel-spectrogram sweep:
//! `frame_length` × `num_frames` × `num_mels`, reports under `tests/`, and the
//! pipeline's top, FFT and LMFE scopes.

use std::fs;
use std::path::{Path, PathBuf};

use ppa_config::CONFIG_FILE_NAME;

use crate::GlobalArgs;

/// Runs the `ppa init` command.
///
/// If `name` is `Some`, creates a new subdirectory with that name.
/// Otherwise initializes in the current working directory.
/// Returns exit code 0 on success.
pub fn run(name: Option<String>, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let project_dir = match &name {
        Some(n) => {
            let dir = PathBuf::from(n);
            if dir.exists() {
                return Err(format!("directory '{n}' already exists").into());
            }
            fs::create_dir_all(&dir)?;
            dir
        }
        None => std::env::current_dir()?,
    };

    let created = scaffold(&project_dir)?;
    if !global.quiet {
        for path in &created {
            eprintln!("     Created {}", path.display());
        }
    }
    Ok(0)
}

/// Writes `ppa.toml` and the empty tests root into `root`.
///
/// Refuses to overwrite an existing configuration.
fn scaffold(root: &Path) -> Result<Vec<PathBuf>, Box<dyn std::error::Error>> {
    let config_path = root.join(CONFIG_FILE_NAME);
    if config_path.exists() {
        return Err(format!("{} already exists", config_path.display()).into());
    }

    let project_name = root
        .canonicalize()
        .ok()
        .and_then(|p| p.file_name().and_then(|n| n.to_str()).map(str::to_string))
        .unwrap_or_else(|| "ppa_sweep".to_string());

    fs::write(&config_path, config_template(&project_name))?;
    let tests_dir = root.join("tests");
    fs::create_dir_all(&tests_dir)?;
    Ok(vec![config_path, tests_dir])
}

fn config_template(name: &str) -> String {
    format!(
        r#"[project]
name = "{name}"
version = "0.1.0"

[sweep]
tests_root = "tests"
policy = "skip"
jobs = 1

# Outermost first. Point directories are named
# frame_length_0128_num_frames_0008_num_mels_0010 and so on.
[[sweep.parameters]]
name = "frame_length"
values = [128, 256, 512, 1024]

[[sweep.parameters]]
name = "num_frames"
values = [8, 16, 32, 64]

[[sweep.parameters]]
name = "num_mels"
values = [10, 13, 15, 20]

[layout]
synth_dir = "synth"
power_report = "post_synth_power.rpt"
utilization_report = "post_synth_utilization.rpt"
timing_report = "post_synth_timing_summary.rpt"
cycles_file = "consumed_cycles.txt"
pad_width = 4

[timing]
target_period_ns = 16.0

[[scopes]]
label = "total"
instance = "ProcessingPipeline"
module = "(top)"

[[scopes]]
label = "fft"
instance = "peList_0"
module = "FFTWrapper"

[[scopes]]
label = "lmfe"
instance = "peList_1"
module = "LMFEWrapper"

[export]
path = "results.csv"
format = "csv"
"#
    )
}
