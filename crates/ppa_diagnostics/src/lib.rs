//! Structured diagnostics for sweep runs.
//!
//! A [`Diagnostic`] carries a severity, a code, the sweep point it concerns,
//! and optional notes. The thread-safe [`DiagnosticSink`] collects them while
//! points are processed (possibly in parallel), and a [`DiagnosticRenderer`]
//! formats them for the terminal or as JSON.

#![warn(missing_docs)]

pub mod code;
pub mod diagnostic;
pub mod renderer;
pub mod severity;
pub mod sink;

pub use code::{Category, DiagnosticCode};
pub use diagnostic::Diagnostic;
pub use renderer::{DiagnosticRenderer, JsonRenderer, TerminalRenderer};
pub use severity::Severity;
pub use sink::DiagnosticSink;
