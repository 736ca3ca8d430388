//! Shared helpers for CLI commands: locating the project and printing diagnostics.

use std::path::{Path, PathBuf};

use ppa_config::{SweepConfig, CONFIG_FILE_NAME};
use ppa_diagnostics::{DiagnosticRenderer, DiagnosticSink, JsonRenderer, TerminalRenderer};

use crate::{GlobalArgs, ReportFormat};

/// Walks up from `start` looking for the nearest directory containing `ppa.toml`.
pub fn find_project_root(start: &Path) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let mut current = start.to_path_buf();
    loop {
        if current.join(CONFIG_FILE_NAME).exists() {
            return Ok(current);
        }
        if !current.pop() {
            return Err(format!(
                "could not find {CONFIG_FILE_NAME} in {} or any parent directory",
                start.display()
            )
            .into());
        }
    }
}

/// Loads the project configuration selected by the global flags.
///
/// With `--config`, a file path is loaded directly and its directory becomes
/// the project directory; a directory path is searched for `ppa.toml`.
/// Otherwise the current directory and its parents are searched.
pub fn load_project(
    global: &GlobalArgs,
) -> Result<(PathBuf, SweepConfig), Box<dyn std::error::Error>> {
    if let Some(ref config_path) = global.config {
        let p = PathBuf::from(config_path);
        if p.is_file() {
            let config = ppa_config::load_config_file(&p)?;
            let dir = match p.parent() {
                Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
                _ => PathBuf::from("."),
            };
            return Ok((dir, config));
        }
        let config = ppa_config::load_config(&p)?;
        return Ok((p, config));
    }
    let dir = find_project_root(&std::env::current_dir()?)?;
    let config = ppa_config::load_config(&dir)?;
    Ok((dir, config))
}

/// Prints every diagnostic in emission order and returns how many there were.
///
/// Text goes to stderr; JSON goes to stdout as one array.
pub fn render_diagnostics(sink: &DiagnosticSink, format: ReportFormat, color: bool) -> usize {
    let diagnostics = sink.diagnostics();
    match format {
        ReportFormat::Text => {
            let renderer = TerminalRenderer::new(color);
            for diag in &diagnostics {
                eprintln!("{}", renderer.render(diag));
            }
        }
        ReportFormat::Json => {
            println!("{}", JsonRenderer.render_all(&diagnostics));
        }
    }
    diagnostics.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const CONFIG: &str = "[project]\nname = \"t\"\n\n[[sweep.parameters]]\nname = \"frame_length\"\nvalues = [128]\n\n[[sweep.parameters]]\nname = \"num_frames\"\nvalues = [8]\n";

    fn global(config: Option<String>) -> GlobalArgs {
        GlobalArgs {
            quiet: true,
            verbose: false,
            color: false,
            config,
        }
    }

    #[test]
    fn find_project_root_in_current_dir() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("ppa.toml"), CONFIG).unwrap();
        assert_eq!(find_project_root(tmp.path()).unwrap(), tmp.path());
    }

    #[test]
    fn find_project_root_in_parent() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("ppa.toml"), CONFIG).unwrap();
        let sub = tmp.path().join("tests").join("frame_length_0128");
        fs::create_dir_all(&sub).unwrap();
        assert_eq!(find_project_root(&sub).unwrap(), tmp.path());
    }

    #[test]
    fn find_project_root_not_found() {
        let tmp = TempDir::new().unwrap();
        let err = find_project_root(tmp.path()).unwrap_err();
        assert!(err.to_string().contains("ppa.toml"));
    }

    #[test]
    fn load_project_from_config_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("sweep.toml");
        fs::write(&path, CONFIG).unwrap();
        let (dir, config) = load_project(&global(Some(path.to_string_lossy().into_owned()))).unwrap();
        assert_eq!(dir, tmp.path());
        assert_eq!(config.project.name, "t");
    }

    #[test]
    fn load_project_from_config_dir() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("ppa.toml"), CONFIG).unwrap();
        let (dir, _) = load_project(&global(Some(tmp.path().to_string_lossy().into_owned()))).unwrap();
        assert_eq!(dir, tmp.path());
    }

    #[test]
    fn render_counts_diagnostics() {
        use ppa_diagnostics::{Category, Diagnostic, DiagnosticCode};
        let sink = DiagnosticSink::new();
        sink.emit(Diagnostic::warning(DiagnosticCode::new(Category::Error, 103), "missing"));
        assert_eq!(render_diagnostics(&sink, ReportFormat::Text, false), 1);
    }
}
