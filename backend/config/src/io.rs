//! Config file discovery and reading.

use anyhow::{Context, Result};
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// Config file looked up in the working directory.
const LOCAL_CONFIG_FILE: &str = "sheetbot.yaml";

/// Config file looked up under the user config directory.
const USER_CONFIG_FILE: &str = "config.yaml";

/// Resolve which config file to read, if any.
/// Priority: explicit path > `SHEETBOT_CONFIG` env > `./sheetbot.yaml` >
/// `<user config dir>/sheetbot/config.yaml`.
pub fn resolve_config_path(
    explicit: Option<&Path>,
    env: &HashMap<String, String>,
) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    if let Some(path) = env.get("SHEETBOT_CONFIG").filter(|p| !p.is_empty()) {
        return Some(PathBuf::from(path));
    }
    let local = PathBuf::from(LOCAL_CONFIG_FILE);
    if local.exists() {
        return Some(local);
    }
    dirs::config_dir()
        .map(|dir| dir.join("sheetbot").join(USER_CONFIG_FILE))
        .filter(|path| path.exists())
}

/// Read a YAML config file into an untyped value tree.
///
/// Returns an empty object if the file doesn't exist, so a deployment can
/// run from environment variables alone.
pub async fn load_raw_config(path: &Path) -> Result<Value> {
    if !path.exists() {
        debug!(path = %path.display(), "Config file does not exist; using defaults");
        return Ok(Value::Object(Default::default()));
    }

    let raw = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let value = parse_yaml(&raw)
        .with_context(|| format!("Failed to parse config YAML at: {}", path.display()))?;

    info!(path = %path.display(), "Loaded config");
    Ok(value)
}

/// Parse YAML text; an empty document is an empty config.
pub fn parse_yaml(raw: &str) -> Result<Value> {
    if raw.trim().is_empty() {
        return Ok(Value::Object(Default::default()));
    }
    let value: Value = serde_yaml::from_str(raw)?;
    Ok(match value {
        Value::Null => Value::Object(Default::default()),
        other => other,
    })
}
