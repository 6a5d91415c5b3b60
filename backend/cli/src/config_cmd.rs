//! CLI Config Command
//!
//! Prints the effective configuration with secrets masked.

use anyhow::{Context, Result};

use sheetbot_config::{redacted_value, LoadedConfig};

use crate::terminal_output::{note_info, note_warn};

pub fn run(loaded: &LoadedConfig) -> Result<()> {
    match &loaded.source {
        Some(path) => note_info(&format!("Loaded from {}", path.display())),
        None => note_info("No config file; defaults and environment only"),
    }

    let value = redacted_value(&loaded.config)?;
    let yaml = serde_yaml::to_string(&value).context("Failed to render config as YAML")?;
    print!("{yaml}");

    let problems = loaded.report.errors.len() + loaded.report.warnings.len();
    if problems > 0 {
        note_warn(&format!("{problems} validation finding(s); run `sheetbot doctor` for details"));
    }
    Ok(())
}
