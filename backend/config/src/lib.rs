//! SheetBot runtime configuration management.
//!
//! Provides:
//! - Typed config schema (server, WhatsApp, Sheets, logging)
//! - YAML file discovery and loading
//! - `${ENV_VAR}` substitution and well-known env var overrides
//! - Default value application
//! - Validation with errors and warnings
//! - Config redaction for safe logging/display

pub mod defaults;
pub mod env;
pub mod io;
pub mod redact;
pub mod schema;
pub mod validation;

// Re-export most-used types at crate root.
pub use defaults::apply_all_defaults;
pub use env::{
    apply_env_overrides, collect_referenced_vars, process_env, resolve_env_vars,
    MissingEnvVarError,
};
pub use io::{load_raw_config, parse_yaml, resolve_config_path};
pub use redact::redact;
pub use schema::{
    LoggingConfig, ServerConfig, ServiceAccountConfig, SheetbotConfig, SheetsConfig,
    WhatsAppConfig,
};
pub use validation::{validate, ConfigValidationError, ValidationReport};

use anyhow::{Context, Result};
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// A fully prepared config plus where it came from and what validation found.
#[derive(Debug)]
pub struct LoadedConfig {
    pub config: SheetbotConfig,
    /// File the config was read from, if any.
    pub source: Option<PathBuf>,
    pub report: ValidationReport,
}

impl LoadedConfig {
    /// Emit every validation finding through `tracing`.
    pub fn log_report(&self) {
        for warning in &self.report.warnings {
            tracing::warn!(path = %warning.path, message = %warning.message, "Config warning");
        }
        for error in &self.report.errors {
            tracing::error!(path = %error.path, message = %error.message, "Config error");
        }
    }
}

/// Locate, load, substitute, override, default, and validate the config.
///
/// This is the main entry point for loading a config at runtime.
pub async fn load_and_prepare(
    explicit: Option<&Path>,
    env: &HashMap<String, String>,
) -> Result<LoadedConfig> {
    let source = resolve_config_path(explicit, env);
    let raw = match &source {
        Some(path) => load_raw_config(path).await?,
        None => Value::Object(Default::default()),
    };
    let config = prepare(raw, env)?;
    let report = validate(&config);

    Ok(LoadedConfig {
        config,
        source,
        report,
    })
}

/// Turn a raw value tree into a typed config: `${VAR}` substitution,
/// typed deserialization, env overrides, then defaults.
pub fn prepare(raw: Value, env: &HashMap<String, String>) -> Result<SheetbotConfig> {
    let value = resolve_env_vars(&raw, env).context("Failed to resolve env vars in config")?;
    let config: SheetbotConfig =
        serde_json::from_value(value).context("Failed to deserialize config")?;
    let config = apply_env_overrides(config, env)?;
    Ok(apply_all_defaults(config))
}

/// Serialize the config with all secrets masked.
pub fn redacted_value(config: &SheetbotConfig) -> Result<Value> {
    let value = serde_json::to_value(config).context("Failed to serialize config")?;
    Ok(redact(&value))
}
