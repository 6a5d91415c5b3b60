//! Environment handling for config values.
//!
//! Two passes, both driven by an explicit variable map so tests never touch
//! the process environment:
//! - `${VAR_NAME}` references inside string values are substituted at load
//!   time. Only uppercase `[A-Z_][A-Z0-9_]*` names are matched and `$${VAR}`
//!   escapes to a literal `${VAR}`.
//! - Well-known variables (`WHATSAPP_TOKEN`, `GOOGLE_SHEETS_ID`, ...)
//!   override the corresponding config fields.

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde_json::Value;
use std::collections::HashMap;

use crate::schema::SheetbotConfig;

/// Matches `${NAME}` with an optional leading `$` marking an escape.
static ENV_REF_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\$?)\$\{([A-Z_][A-Z0-9_]*)\}").unwrap());

/// Error returned for missing env vars.
#[derive(Debug, thiserror::Error)]
#[error("Missing env var \"{var_name}\" referenced at config path: {config_path}")]
pub struct MissingEnvVarError {
    pub var_name: String,
    pub config_path: String,
}

/// Snapshot of the process environment.
pub fn process_env() -> HashMap<String, String> {
    std::env::vars().collect()
}

/// Substitute `${VAR}` references in a config JSON value tree.
///
/// Only string leaves are rewritten. A reference to an unset or empty
/// variable is an error naming the config path it appeared at.
pub fn resolve_env_vars(
    value: &Value,
    env: &HashMap<String, String>,
) -> Result<Value, MissingEnvVarError> {
    substitute_value(value, env, "")
}

fn substitute_value(
    value: &Value,
    env: &HashMap<String, String>,
    path: &str,
) -> Result<Value, MissingEnvVarError> {
    match value {
        Value::String(s) => Ok(Value::String(substitute_string(s, env, path)?)),
        Value::Array(arr) => arr
            .iter()
            .enumerate()
            .map(|(i, v)| substitute_value(v, env, &format!("{path}[{i}]")))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        Value::Object(map) => {
            let mut result = serde_json::Map::new();
            for (k, v) in map {
                let child_path = if path.is_empty() {
                    k.clone()
                } else {
                    format!("{path}.{k}")
                };
                result.insert(k.clone(), substitute_value(v, env, &child_path)?);
            }
            Ok(Value::Object(result))
        }
        other => Ok(other.clone()),
    }
}

fn substitute_string(
    s: &str,
    env: &HashMap<String, String>,
    path: &str,
) -> Result<String, MissingEnvVarError> {
    if !s.contains("${") {
        return Ok(s.to_string());
    }

    let mut missing: Option<MissingEnvVarError> = None;
    let substituted = ENV_REF_PATTERN.replace_all(s, |caps: &Captures| {
        let name = &caps[2];
        if !caps[1].is_empty() {
            return format!("${{{name}}}");
        }
        match env.get(name) {
            Some(val) if !val.is_empty() => val.clone(),
            _ => {
                missing.get_or_insert_with(|| MissingEnvVarError {
                    var_name: name.to_string(),
                    config_path: path.to_string(),
                });
                String::new()
            }
        }
    });

    match missing {
        Some(err) => Err(err),
        None => Ok(substituted.into_owned()),
    }
}

/// Collect all env var names referenced in a config value tree (for diagnostics).
pub fn collect_referenced_vars(value: &Value) -> Vec<String> {
    let mut vars = Vec::new();
    collect_vars_recursive(value, &mut vars);
    vars.sort();
    vars.dedup();
    vars
}

fn collect_vars_recursive(value: &Value, out: &mut Vec<String>) {
    match value {
        Value::String(s) => {
            for caps in ENV_REF_PATTERN.captures_iter(s) {
                if caps[1].is_empty() {
                    out.push(caps[2].to_string());
                }
            }
        }
        Value::Array(arr) => arr.iter().for_each(|v| collect_vars_recursive(v, out)),
        Value::Object(map) => map.values().for_each(|v| collect_vars_recursive(v, out)),
        _ => {}
    }
}

// ---------------------------------------------------------------------------
// Well-known variable overrides
// ---------------------------------------------------------------------------

/// Apply well-known environment variables on top of a file-loaded config.
///
/// Empty values are ignored. `GOOGLE_PRIVATE_KEY` may carry literal `\n`
/// sequences, as most dashboards store it on one line.
pub fn apply_env_overrides(
    mut config: SheetbotConfig,
    env: &HashMap<String, String>,
) -> Result<SheetbotConfig> {
    let get = |name: &str| env.get(name).filter(|v| !v.trim().is_empty()).cloned();

    if let Some(bind) = get("SHEETBOT_BIND") {
        config.server.bind = Some(bind);
    }
    if let Some((name, raw)) = ["SHEETBOT_PORT", "PORT"]
        .iter()
        .find_map(|name| get(name).map(|v| (*name, v)))
    {
        let port = raw
            .trim()
            .parse::<u16>()
            .with_context(|| format!("{name} must be a port number, got {raw:?}"))?;
        config.server.port = Some(port);
    }
    if let Some(path) = get("SHEETBOT_WEBHOOK_PATH") {
        config.server.webhook_path = Some(path);
    }

    if let Some(token) = get("WHATSAPP_VERIFY_TOKEN") {
        config.whatsapp.verify_token = Some(token);
    }
    if let Some(token) = get("WHATSAPP_TOKEN").or_else(|| get("WHATSAPP_ACCESS_TOKEN")) {
        config.whatsapp.access_token = Some(token);
    }
    if let Some(id) = get("WHATSAPP_PHONE_NUMBER_ID") {
        config.whatsapp.phone_number_id = Some(id);
    }
    if let Some(version) = get("WHATSAPP_API_VERSION") {
        config.whatsapp.api_version = Some(version);
    }

    if let Some(id) = get("GOOGLE_SHEETS_ID").or_else(|| get("GOOGLE_SHEET_ID")) {
        config.sheets.spreadsheet_id = Some(id);
    }
    if let Some(key) = get("GOOGLE_API_KEY") {
        config.sheets.api_key = Some(key);
    }
    if let Some(range) = get("ORDERS_RANGE") {
        config.sheets.orders_range = Some(range);
    }
    if let Some(range) = get("INVENTORY_RANGE") {
        config.sheets.inventory_range = Some(range);
    }
    let email = get("GOOGLE_SERVICE_ACCOUNT_EMAIL");
    let private_key = get("GOOGLE_PRIVATE_KEY").map(|k| k.replace("\\n", "\n"));
    if email.is_some() || private_key.is_some() {
        let account = config.sheets.service_account.get_or_insert_with(Default::default);
        if let Some(email) = email {
            account.client_email = email;
        }
        if let Some(key) = private_key {
            account.private_key = key;
        }
    }

    if let Some(level) = get("SHEETBOT_LOG_LEVEL") {
        config.logging.level = Some(level);
    }
    if let Some(dir) = get("SHEETBOT_LOG_DIR") {
        config.logging.dir = Some(dir);
    }
    if let Some(json) = get("SHEETBOT_LOG_JSON") {
        config.logging.json = Some(matches!(
            json.trim().to_ascii_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        ));
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn substitutes_simple_var() {
        let v = json!({"whatsapp": {"accessToken": "${WA_TOKEN}"}});
        let result = resolve_env_vars(&v, &env(&[("WA_TOKEN", "EAAB123")])).unwrap();
        assert_eq!(result["whatsapp"]["accessToken"], "EAAB123");
    }

    #[test]
    fn error_names_var_and_path() {
        let v = json!({"sheets": {"apiKey": "${MISSING_VAR}"}});
        let err = resolve_env_vars(&v, &HashMap::new()).unwrap_err();
        assert_eq!(err.var_name, "MISSING_VAR");
        assert_eq!(err.config_path, "sheets.apiKey");
    }

    #[test]
    fn escaped_reference_is_kept_literally() {
        let v = json!({"note": "cost $${PRICE} for ${ITEM}"});
        let result = resolve_env_vars(&v, &env(&[("ITEM", "tea")])).unwrap();
        assert_eq!(result["note"], "cost ${PRICE} for tea");
    }

    #[test]
    fn collects_referenced_vars() {
        let v = json!({"a": "${FOO}", "b": {"c": ["${BAR}", "$${SKIP}"]}});
        assert_eq!(collect_referenced_vars(&v), vec!["BAR", "FOO"]);
    }

    #[test]
    fn overrides_take_precedence_over_file() {
        let mut cfg = SheetbotConfig::default();
        cfg.whatsapp.verify_token = Some("from-file".into());
        let cfg = apply_env_overrides(
            cfg,
            &env(&[
                ("WHATSAPP_VERIFY_TOKEN", "from-env"),
                ("PORT", "9000"),
                ("GOOGLE_SHEETS_ID", "sheet-1"),
                ("SHEETBOT_LOG_JSON", "true"),
            ]),
        )
        .unwrap();
        assert_eq!(cfg.whatsapp.verify_token.as_deref(), Some("from-env"));
        assert_eq!(cfg.server.port, Some(9000));
        assert_eq!(cfg.sheets.spreadsheet_id.as_deref(), Some("sheet-1"));
        assert_eq!(cfg.logging.json, Some(true));
    }

    #[test]
    fn sheetbot_port_wins_over_port() {
        let cfg = apply_env_overrides(
            SheetbotConfig::default(),
            &env(&[("PORT", "9000"), ("SHEETBOT_PORT", "9100")]),
        )
        .unwrap();
        assert_eq!(cfg.server.port, Some(9100));
    }

    #[test]
    fn bad_port_is_an_error() {
        let result = apply_env_overrides(SheetbotConfig::default(), &env(&[("PORT", "http")]));
        assert!(result.unwrap_err().to_string().contains("PORT"));
    }

    #[test]
    fn private_key_newlines_are_unescaped() {
        let cfg = apply_env_overrides(
            SheetbotConfig::default(),
            &env(&[
                ("GOOGLE_SERVICE_ACCOUNT_EMAIL", "bot@p.iam.gserviceaccount.com"),
                ("GOOGLE_PRIVATE_KEY", "-----BEGIN\\nABC\\n-----END"),
            ]),
        )
        .unwrap();
        let sa = cfg.sheets.service_account.unwrap();
        assert_eq!(sa.private_key, "-----BEGIN\nABC\n-----END");
    }

    #[test]
    fn empty_values_are_ignored() {
        let mut cfg = SheetbotConfig::default();
        cfg.sheets.api_key = Some("keep".into());
        let cfg = apply_env_overrides(cfg, &env(&[("GOOGLE_API_KEY", "  ")])).unwrap();
        assert_eq!(cfg.sheets.api_key.as_deref(), Some("keep"));
    }
}
