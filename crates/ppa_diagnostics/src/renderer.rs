//! Diagnostic rendering backends for terminal and machine-readable output.

use crate::diagnostic::Diagnostic;

/// Formats a diagnostic into an output string.
pub trait DiagnosticRenderer {
    /// Renders a single diagnostic.
    fn render(&self, diag: &Diagnostic) -> String;

    /// Renders a batch of diagnostics. The default joins single renderings.
    fn render_all(&self, diags: &[Diagnostic]) -> String {
        diags.iter().map(|d| self.render(d)).collect()
    }
}

/// Renders diagnostics in a rustc-like terminal format:
///
/// ```text
/// warning[E101]: metric 'fft_util' matched 0 times, expected exactly 1
///   --> #37 (frame_length=512, num_frames=16, num_mels=13)
///    = note: tests/frame_length_0512_.../synth/post_synth_utilization.rpt
/// ```
pub struct TerminalRenderer {
    /// Whether to use ANSI color codes in output.
    pub color: bool,
}

impl TerminalRenderer {
    /// Creates a new terminal renderer.
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    fn paint_header(&self, diag: &Diagnostic) -> String {
        let header = format!("{}[{}]", diag.severity, diag.code);
        if !self.color {
            return header;
        }
        let ansi = if diag.severity.is_error() { "31" } else { "33" };
        format!("\x1b[1;{ansi}m{header}\x1b[0m")
    }
}

impl DiagnosticRenderer for TerminalRenderer {
    fn render(&self, diag: &Diagnostic) -> String {
        let mut out = format!("{}: {}\n", self.paint_header(diag), diag.message);
        if let Some(point) = &diag.point {
            out.push_str(&format!("  --> {point}\n"));
        }
        for note in &diag.notes {
            out.push_str(&format!("   = note: {note}\n"));
        }
        for help in &diag.help {
            out.push_str(&format!("   = help: {help}\n"));
        }
        out
    }
}

/// Renders diagnostics as JSON: one object per diagnostic, or an array for a batch.
pub struct JsonRenderer;

impl DiagnosticRenderer for JsonRenderer {
    fn render(&self, diag: &Diagnostic) -> String {
        // Diagnostic contains only strings, enums and integers.
        serde_json::to_string(diag).unwrap_or_default()
    }

    fn render_all(&self, diags: &[Diagnostic]) -> String {
        serde_json::to_string_pretty(diags).unwrap_or_else(|_| "[]".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code::{Category, DiagnosticCode};

    fn sample() -> Diagnostic {
        Diagnostic::warning(
            DiagnosticCode::new(Category::Error, 101),
            "metric 'fft_util' matched 0 times, expected exactly 1",
        )
        .at_point("#37 (frame_length=512)")
        .with_note("post_synth_utilization.rpt")
    }

    #[test]
    fn terminal_plain() {
        let out = TerminalRenderer::new(false).render(&sample());
        assert!(out.starts_with("warning[E101]: metric 'fft_util' matched 0 times"));
        assert!(out.contains("  --> #37 (frame_length=512)\n"));
        assert!(out.contains("   = note: post_synth_utilization.rpt\n"));
        assert!(!out.contains('\x1b'));
    }

    #[test]
    fn terminal_colored_wraps_header() {
        let out = TerminalRenderer::new(true).render(&sample());
        assert!(out.starts_with("\x1b[1;33mwarning[E101]\x1b[0m"));
    }

    #[test]
    fn terminal_without_point() {
        let diag = Diagnostic::error(DiagnosticCode::new(Category::Timing, 201), "bad period");
        let out = TerminalRenderer::new(false).render(&diag);
        assert_eq!(out, "error[T201]: bad period\n");
    }

    #[test]
    fn json_batch_is_array() {
        let out = JsonRenderer.render_all(&[sample(), sample()]);
        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed.as_array().unwrap().len(), 2);
        assert_eq!(parsed[0]["severity"], "warning");
    }
}
