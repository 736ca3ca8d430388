//! Parsing and validation of `ppa.toml` sweep configuration files.
//!
//! This crate reads the sweep configuration and produces a strongly-typed
//! [`SweepConfig`]: the parameter space, the on-disk report layout, the module
//! scopes to extract, the target clock period, and export settings. CLI
//! overrides are merged in by [`resolve_run`].

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod resolve;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_file, load_config_from_str, CONFIG_FILE_NAME};
pub use resolve::{resolve_run, ResolvedRun, RunOverrides};
pub use types::*;
