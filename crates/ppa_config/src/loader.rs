//! Configuration file loading and validation.

use std::collections::BTreeSet;
use std::path::Path;

use crate::error::ConfigError;
use crate::types::SweepConfig;

/// Name of the configuration file looked up in a project directory.
pub const CONFIG_FILE_NAME: &str = "ppa.toml";

/// Loads and validates `<project_dir>/ppa.toml`.
pub fn load_config(project_dir: &Path) -> Result<SweepConfig, ConfigError> {
    load_config_file(&project_dir.join(CONFIG_FILE_NAME))
}

/// Loads and validates a configuration file at an explicit path.
pub fn load_config_file(path: &Path) -> Result<SweepConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    load_config_from_str(&content)
}

/// Parses and validates a configuration from a string.
pub fn load_config_from_str(content: &str) -> Result<SweepConfig, ConfigError> {
    let config: SweepConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Checks required fields and cross-field consistency.
fn validate_config(config: &SweepConfig) -> Result<(), ConfigError> {
    if config.project.name.is_empty() {
        return Err(ConfigError::MissingField("project.name".to_string()));
    }
    if config.sweep.parameters.is_empty() {
        return Err(ConfigError::MissingField("sweep.parameters".to_string()));
    }

    let space = config.parameter_space()?;
    for (role, name) in [
        ("sweep.frame_length", &config.sweep.frame_length),
        ("sweep.num_frames", &config.sweep.num_frames),
    ] {
        if !space.contains(name) {
            return Err(ConfigError::ValidationError(format!(
                "{role} names '{name}', which is not a sweep parameter"
            )));
        }
    }

    if config.sweep.jobs == 0 {
        return Err(ConfigError::ValidationError(
            "sweep.jobs must be at least 1".to_string(),
        ));
    }

    if config.scopes.is_empty() {
        return Err(ConfigError::MissingField("scopes".to_string()));
    }
    let mut labels = BTreeSet::new();
    for scope in &config.scopes {
        if scope.label.is_empty() || scope.instance.is_empty() || scope.module.is_empty() {
            return Err(ConfigError::ValidationError(
                "every scope needs a label, an instance and a module".to_string(),
            ));
        }
        if !scope
            .label
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            return Err(ConfigError::ValidationError(format!(
                "scope label '{}' may only contain letters, digits and '_'",
                scope.label
            )));
        }
        if !labels.insert(scope.label.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "duplicate scope label '{}'",
                scope.label
            )));
        }
    }

    let layout = &config.layout;
    for (field, value) in [
        ("layout.power_report", &layout.power_report),
        ("layout.utilization_report", &layout.utilization_report),
        ("layout.timing_report", &layout.timing_report),
        ("layout.cycles_file", &layout.cycles_file),
    ] {
        if value.is_empty() {
            return Err(ConfigError::MissingField(field.to_string()));
        }
    }
    if layout.pad_width > 0 {
        for param in &config.sweep.parameters {
            if let Some(v) = param
                .values
                .iter()
                .find(|v| **v < 0 || v.to_string().len() > layout.pad_width)
            {
                return Err(ConfigError::ValidationError(format!(
                    "value {v} of '{}' does not fit layout.pad_width = {}; \
                     widen the padding or set it to 0",
                    param.name, layout.pad_width
                )));
            }
        }
    }

    config.timing.target_period_ns()?;
    Ok(())
}
